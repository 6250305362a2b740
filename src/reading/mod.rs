//! Fixed-width record parsing for the GSOD station listing and daily archives.

pub mod history;
pub mod observation;

use std::{borrow::Cow, ops::Range, str::FromStr};

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

pub use history::StationHistory;
pub use observation::DailyObservation;

/// Why a single line could not be turned into a record.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line is blank")]
    BlankLine,

    #[error("field `{field}` at bytes {start}..{end} is beyond the end of the line")]
    MissingField {
        field: &'static str,
        start: usize,
        end: usize,
    },

    #[error("field `{field}` is not a number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

// Define a trait for deserializing a line into a record.
// Lines are raw bytes: the listings are Latin-1 and every offset counts bytes.
pub trait Reading: Sized {
    fn from_line(line: &[u8]) -> Result<Self, ParseError>;
}

/// Latin-1 text of `bytes`. One byte is always one character.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    WINDOWS_1252.decode_without_bom_handling(bytes).0
}

/// Returns the bytes of `range`, or `None` if any part of it lies outside the line.
pub fn slice(line: &[u8], range: Range<usize>) -> Option<&[u8]> {
    line.get(range)
}

/// Parses the trimmed contents of `range`, `None` if absent or unparseable.
pub fn parse_field<T: FromStr>(line: &[u8], range: Range<usize>) -> Option<T> {
    std::str::from_utf8(slice(line, range)?).ok()?.trim().parse().ok()
}

/// Like [`parse_field`] but reports what went wrong.
pub fn require_field<T: FromStr>(
    line: &[u8],
    field: &'static str,
    range: Range<usize>,
) -> Result<T, ParseError> {
    let (start, end) = (range.start, range.end);
    let raw = slice(line, range).ok_or(ParseError::MissingField { field, start, end })?;
    let invalid = || ParseError::InvalidNumber {
        field,
        value: decode(raw).into_owned(),
    };

    std::str::from_utf8(raw)
        .map_err(|_| invalid())?
        .trim()
        .parse()
        .map_err(|_| invalid())
}

/// Whatever text exists within `range`, trimmed. Never fails.
pub fn text_field(line: &[u8], range: Range<usize>) -> String {
    let end = range.end.min(line.len());
    let start = range.start.min(end);

    decode(&line[start..end]).trim().to_string()
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_parse_padded_number() {
        assert_eq!(parse_field::<i32>(b"ab  42 cd", 2..6), Some(42));
        assert_eq!(parse_field::<f64>(b"+51317", 0..6), Some(51317.0));
    }

    #[test]
    fn should_be_absent_when_range_overruns_line() {
        assert_eq!(parse_field::<i32>(b"12345", 3..8), None);
        assert_eq!(parse_field::<i32>(b"", 0..2), None);
    }

    #[test]
    fn should_be_absent_when_not_a_number() {
        assert_eq!(parse_field::<i32>(b"  xx  ", 0..6), None);
        assert_eq!(parse_field::<i32>(b"      ", 0..6), None);
    }

    #[test]
    fn should_report_missing_field() {
        let err = require_field::<i32>(b"123", "year", 14..18).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "year",
                start: 14,
                end: 18
            }
        );
    }

    #[test]
    fn should_report_invalid_number() {
        let err = require_field::<f64>(b"  ab.c", "t_mean", 0..6).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "t_mean",
                value: "  ab.c".to_string()
            }
        );
    }

    #[test]
    fn should_take_partial_text() {
        assert_eq!(text_field(b"AB CDE", 3..10), "CDE");
        assert_eq!(text_field(b"AB", 5..10), "");
    }

    #[test]
    fn should_read_latin1_bytes_as_single_characters() {
        let line = b"X MONTR\xc9AL  42";

        assert_eq!(text_field(line, 2..11), "MONTR\u{c9}AL");
        assert_eq!(parse_field::<i32>(line, 10..14), Some(42));
    }

    #[test]
    fn should_report_non_ascii_number() {
        let err = require_field::<f64>(b" 3\xb04", "t_max", 0..4).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "t_max",
                value: " 3\u{b0}4".to_string()
            }
        );
    }
}
