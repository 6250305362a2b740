//! One day of a GSOD yearly "op" archive.

use std::ops::Range;

use chrono::{Datelike, NaiveDate};

use super::{require_field, ParseError, Reading};

const T_MEAN: Range<usize> = 25..30;
const T_MAX: Range<usize> = 102..108;
const T_MIN: Range<usize> = 110..116;
const YEAR: Range<usize> = 14..18;
const MONTH: Range<usize> = 18..20;
const DAY: Range<usize> = 20..22;

/// Decoded values at or above this mean "no data".
pub const MISSING_SENTINEL: f64 = 9000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub t_mean: f64,
    pub t_max: f64,
    pub t_min: f64,
}

impl Reading for DailyObservation {
    fn from_line(line: &[u8]) -> Result<Self, ParseError> {
        let t_mean = decode_temperature(require_field(line, "t_mean", T_MEAN)?);
        let t_max = decode_temperature(require_field(line, "t_max", T_MAX)?);
        let t_min = decode_temperature(require_field(line, "t_min", T_MIN)?);

        let year = require_field(line, "year", YEAR)?;
        let month = require_field(line, "month", MONTH)?;
        let day = require_field(line, "day", DAY)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ParseError::InvalidDate { year, month, day })?;

        Ok(DailyObservation {
            date,
            t_mean,
            t_max,
            t_min,
        })
    }
}

impl DailyObservation {
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }
}

/// Maps the missing-value sentinel to NaN and passes everything else through.
pub fn decode_temperature(value: f64) -> f64 {
    if value >= MISSING_SENTINEL {
        f64::NAN
    } else {
        value
    }
}

// -- Tests ----------------------------------------------------------------------------
