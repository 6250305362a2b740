//! Renders annual series as SVG line charts.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use tracing::debug;

use super::AnnualSeries;

/// Receives finished annual series. What it does with them is its own business.
pub trait Plotter {
    fn plot(&mut self, wban: u32, series: &AnnualSeries) -> Result<()>;
}

/// Writes one `<wban>-annual-<aggregate>.svg` per series into a directory.
pub struct SvgPlotter {
    output_dir: PathBuf,
}

impl SvgPlotter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        SvgPlotter {
            output_dir: output_dir.into(),
        }
    }

    pub fn chart_path(&self, wban: u32, series: &AnnualSeries) -> PathBuf {
        self.output_dir
            .join(format!("{:05}-annual-{}.svg", wban, series.aggregate.name()))
    }
}

impl Plotter for SvgPlotter {
    fn plot(&mut self, wban: u32, series: &AnnualSeries) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let path = self.chart_path(wban, series);
        draw(&path, wban, series).with_context(|| format!("Failed to draw {}", path.display()))?;

        println!("Chart saved to `{}`", path.display());
        Ok(())
    }
}

fn draw(path: &Path, wban: u32, series: &AnnualSeries) -> Result<()> {
    let (first_year, last_year) = match (series.years.first(), series.years.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(anyhow!("No years to plot")),
    };

    let (min_temp, max_temp) = series
        .t_mean
        .iter()
        .chain(&series.t_max)
        .chain(&series.t_min)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), t| {
            (min.min(*t), max.max(*t))
        });
    let y_padding = if (max_temp - min_temp).abs() > 1e-6 {
        (max_temp - min_temp) * 0.1
    } else {
        1.0
    };

    let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let caption = format!("wban {:05}: annual {} temperature", wban, series.aggregate.name());
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            first_year..last_year + 1,
            (min_temp - y_padding)..(max_temp + y_padding),
        )
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Temperature (°F)")
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(draw_error)?;

    let columns = [
        ("t_mean", &series.t_mean, GREEN),
        ("t_max", &series.t_max, RED),
        ("t_min", &series.t_min, BLUE),
    ];

    for (label, values, color) in columns {
        let points = series.years.iter().copied().zip(values.iter().copied());
        chart
            .draw_series(LineSeries::new(points, color))
            .map_err(draw_error)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    debug!("Wrote {} points per series to {}", series.years.len(), path.display());

    Ok(())
}

fn draw_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("{}", e)
}

// -- Tests -------------------------------------------------------------------
