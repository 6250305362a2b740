//! Download a station's yearly archives and assemble its daily temperatures.

use std::{collections::BTreeMap, fmt, ops::RangeInclusive};

use anyhow::{Context, Result};
use chrono::Datelike;
use tracing::{debug, info, warn};

use crate::{
    cli::create_progress_bar,
    constants::ARCHIVE_HEADER_LINES,
    deserialise::deserialise,
    download::{gunzip, Fetch},
    error::GsodError,
    reading::{DailyObservation, StationHistory},
};

use super::stations::StationDirectory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRow {
    pub year: i32,
    pub day_of_year: u32,
    pub t_mean: f64,
    pub t_max: f64,
    pub t_min: f64,
}

impl TemperatureRow {
    pub fn has_missing(&self) -> bool {
        self.t_mean.is_nan() || self.t_max.is_nan() || self.t_min.is_nan()
    }
}

/// Daily temperatures for one station, one row per (year, day of year).
#[derive(Debug, Default)]
pub struct StationTemperatureTable {
    wban: u32,
    rows: BTreeMap<(i32, u32), TemperatureRow>,
}

impl StationTemperatureTable {
    pub fn new(wban: u32) -> Self {
        StationTemperatureTable {
            wban,
            rows: BTreeMap::new(),
        }
    }

    pub fn wban(&self) -> u32 {
        self.wban
    }

    /// Adds a row unless its key is already taken. Returns whether it was added.
    pub fn insert(&mut self, row: TemperatureRow) -> bool {
        if self.get(row.year, row.day_of_year).is_some() {
            return false;
        }
        self.rows.insert((row.year, row.day_of_year), row);
        true
    }

    /// Rows in (year, day of year) order.
    pub fn rows(&self) -> impl Iterator<Item = &TemperatureRow> {
        self.rows.values()
    }

    pub fn get(&self, year: i32, day_of_year: u32) -> Option<&TemperatureRow> {
        self.rows.get(&(year, day_of_year))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Adds every observation of one year's archive, keyed by that year.
    fn add_year(&mut self, year: i32, observations: Vec<DailyObservation>) {
        for o in observations {
            let row = TemperatureRow {
                year,
                day_of_year: o.day_of_year(),
                t_mean: o.t_mean,
                t_max: o.t_max,
                t_min: o.t_min,
            };
            if !self.insert(row) {
                warn!(
                    "Duplicate observation for {} day {} ({}), keeping the first",
                    year,
                    row.day_of_year,
                    o.date
                );
            }
        }
    }
}

const DISPLAY_ROWS: usize = 5;

impl fmt::Display for StationTemperatureTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>6} {:>4} {:>8} {:>8} {:>8}",
            "year", "doy", "t_mean", "t_max", "t_min"
        )?;

        if self.len() <= DISPLAY_ROWS * 2 {
            for r in self.rows() {
                write_row(f, r)?;
            }
        } else {
            for r in self.rows().take(DISPLAY_ROWS) {
                write_row(f, r)?;
            }
            writeln!(f, "{:>6}", "...")?;
            for r in self.rows().skip(self.len() - DISPLAY_ROWS) {
                write_row(f, r)?;
            }
        }

        write!(f, "[{} rows x 3 columns]", self.len())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, r: &TemperatureRow) -> fmt::Result {
    writeln!(
        f,
        "{:>6} {:>4} {:>8.1} {:>8.1} {:>8.1}",
        r.year, r.day_of_year, r.t_mean, r.t_max, r.t_min
    )
}

/// Fetches every yearly archive for the station with `wban` and parses them into one table.
///
/// Lines that fail to parse are logged and dropped. A failed download or a
/// corrupt archive aborts the whole assembly.
pub async fn station_temperatures<F: Fetch + ?Sized>(
    fetcher: &F,
    root: &str,
    wban: u32,
    directory: &StationDirectory,
) -> Result<StationTemperatureTable> {
    let station = directory.find(wban)?;
    let years = active_years(station, wban)?;

    info!(
        "Fetching {} ({}) {}-{}",
        station.name,
        wban,
        years.start(),
        years.end()
    );

    let mut table = StationTemperatureTable::new(wban);
    let pb = create_progress_bar(years.clone().count() as u64, "Downloading archives...".to_string());

    for year in years {
        let file_name = station
            .archive_file_name(year)
            .ok_or(GsodError::MissingStationNumber { wban })?;
        let url = archive_url(root, year, &file_name);

        let body = fetcher
            .fetch(&url)
            .await
            .with_context(|| format!("Failed to fetch archive for {}", year))?;
        let contents = gunzip(&url, &body)?;

        let observations: Vec<DailyObservation> = deserialise(&contents, ARCHIVE_HEADER_LINES);
        debug!("{}: {} observations", year, observations.len());
        table.add_year(year, observations);

        pb.inc(1);
    }

    pb.finish_with_message("Archives downloaded");
    info!("Assembled {} daily rows for wban {}", table.len(), wban);

    Ok(table)
}

fn active_years(station: &StationHistory, wban: u32) -> Result<RangeInclusive<i32>, GsodError> {
    match (station.begin, station.end) {
        (Some(begin), Some(end)) => Ok(begin.year()..=end.year()),
        _ => Err(GsodError::MissingActiveRange { wban }),
    }
}

pub fn archive_url(root: &str, year: i32, file_name: &str) -> String {
    format!("{}/{:04}/{}", root.trim_end_matches('/'), year, file_name)
}

// -- Tests -------------------------------------------------------------------
