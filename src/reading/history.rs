//! Station history records from the `ish-history.txt` listing.
//!
//! Every numeric or date field is optional: a field that is blank, garbled or
//! beyond the end of a short line is recorded as `None` without affecting its
//! neighbours.

use std::ops::Range;

use chrono::NaiveDate;

use super::{parse_field, text_field, ParseError, Reading};

const USAF: Range<usize> = 0..6;
const WBAN: Range<usize> = 7..12;
const NAME: Range<usize> = 13..43;
const COUNTRY: Range<usize> = 43..45;
const STATE: Range<usize> = 49..51;
const LAT: Range<usize> = 58..64;
const LON: Range<usize> = 65..72;
const ELEVATION: Range<usize> = 73..79;

/// Year, month and day slices of a `YYYYMMDD` date column.
struct DateColumns {
    year: Range<usize>,
    month: Range<usize>,
    day: Range<usize>,
}

const BEGIN: DateColumns = DateColumns {
    year: 83..87,
    month: 87..89,
    day: 89..91,
};

const END: DateColumns = DateColumns {
    year: 92..96,
    month: 96..98,
    day: 98..100,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationHistory {
    pub usaf: Option<u32>,
    pub wban: Option<u32>,
    pub name: String,
    pub country: String,
    pub state: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation: Option<f64>,
    pub begin: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Reading for StationHistory {
    fn from_line(line: &[u8]) -> Result<Self, ParseError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::BlankLine);
        }

        Ok(StationHistory {
            usaf: parse_field(line, USAF),
            wban: parse_field(line, WBAN),
            name: text_field(line, NAME),
            country: text_field(line, COUNTRY),
            state: text_field(line, STATE),
            lat: parse_scaled(line, LAT, 1000.0),
            lon: parse_scaled(line, LON, 1000.0),
            elevation: parse_scaled(line, ELEVATION, 10.0),
            begin: parse_date(line, &BEGIN),
            end: parse_date(line, &END),
        })
    }
}

impl StationHistory {
    /// Name of the station's archive for `year`, if the station has both numbers.
    pub fn archive_file_name(&self, year: i32) -> Option<String> {
        Some(archive_file_name(self.usaf?, self.wban?, year))
    }
}

/// Canonical yearly archive name, `USAF-WBAN-YEAR.op.gz` zero padded to 6, 5 and 4 digits.
pub fn archive_file_name(usaf: u32, wban: u32, year: i32) -> String {
    format!("{:06}-{:05}-{:04}.op.gz", usaf, wban, year)
}

fn parse_scaled(line: &[u8], range: Range<usize>, scale: f64) -> Option<f64> {
    parse_field::<i32>(line, range).map(|v| v as f64 / scale)
}

fn parse_date(line: &[u8], columns: &DateColumns) -> Option<NaiveDate> {
    let year = parse_field(line, columns.year.clone())?;
    let month = parse_field(line, columns.month.clone())?;
    let day = parse_field(line, columns.day.clone())?;

    NaiveDate::from_ymd_opt(year, month, day)
}

// -- Tests ----------------------------------------------------------------------------
