//! Summary statistics and annual aggregates for an assembled station table.

pub mod plot;

use std::{collections::BTreeMap, fmt};

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::command::temperatures::{StationTemperatureTable, TemperatureRow};

pub use plot::{Plotter, SvgPlotter};

/// All-time extremes, each `None` when every value in its column is missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub record_high: Option<f64>,
    pub record_high_mean: Option<f64>,
    pub record_low: Option<f64>,
    pub record_low_mean: Option<f64>,
}

impl Summary {
    pub fn from_table(table: &StationTemperatureTable) -> Self {
        Summary {
            record_high: max_of(table.rows().map(|r| r.t_max)),
            record_high_mean: max_of(table.rows().map(|r| r.t_mean)),
            record_low: min_of(table.rows().map(|r| r.t_min)),
            record_low_mean: min_of(table.rows().map(|r| r.t_mean)),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All time record high temp: {}", show(self.record_high))?;
        writeln!(f, "All time record high mean temp: {}", show(self.record_high_mean))?;
        writeln!(f, "All time record low temp: {}", show(self.record_low))?;
        write!(f, "All time record low mean temp: {}", show(self.record_low_mean))
    }
}

fn show(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Max,
    Min,
}

impl Aggregate {
    pub const ALL: [Aggregate; 3] = [Aggregate::Mean, Aggregate::Max, Aggregate::Min];

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Mean => "mean",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
        }
    }

    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// One aggregate of each temperature column, per year, years ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    pub aggregate: Aggregate,
    pub years: Vec<i32>,
    pub t_mean: Vec<f64>,
    pub t_max: Vec<f64>,
    pub t_min: Vec<f64>,
}

impl AnnualSeries {
    /// Aggregates complete rows only; a row missing any temperature is left out entirely.
    pub fn from_table(table: &StationTemperatureTable, aggregate: Aggregate) -> Self {
        let mut by_year: BTreeMap<i32, Vec<&TemperatureRow>> = BTreeMap::new();
        for row in table.rows().filter(|r| !r.has_missing()) {
            by_year.entry(row.year).or_default().push(row);
        }

        let mut series = AnnualSeries {
            aggregate,
            years: Vec::with_capacity(by_year.len()),
            t_mean: Vec::with_capacity(by_year.len()),
            t_max: Vec::with_capacity(by_year.len()),
            t_min: Vec::with_capacity(by_year.len()),
        };

        for (year, rows) in by_year {
            let t_mean: Vec<f64> = rows.iter().map(|r| r.t_mean).collect();
            let t_max: Vec<f64> = rows.iter().map(|r| r.t_max).collect();
            let t_min: Vec<f64> = rows.iter().map(|r| r.t_min).collect();

            series.years.push(year);
            series.t_mean.push(aggregate.apply(&t_mean));
            series.t_max.push(aggregate.apply(&t_max));
            series.t_min.push(aggregate.apply(&t_min));
        }

        series
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Prints the table and its extremes, then hands the yearly mean, max and min to `plotter`.
pub fn report<P: Plotter + ?Sized>(table: &StationTemperatureTable, plotter: &mut P) -> Result<()> {
    if table.is_empty() {
        warn!("No observations parsed for wban {}", table.wban());
    }

    println!("{}", table);
    println!();
    println!("{}", Summary::from_table(table));
    println!();

    for aggregate in Aggregate::ALL {
        let series = AnnualSeries::from_table(table, aggregate);
        if series.is_empty() {
            warn!("No complete rows for wban {}, nothing to plot", table.wban());
            return Ok(());
        }

        plotter.plot(table.wban(), &series)?;
        info!("Plotted annual {} for {} years", aggregate.name(), series.years.len());
    }

    Ok(())
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

// -- Tests -------------------------------------------------------------------
