//! Generic function for deserialising a fixed-width body to a Vec of Readings

use tracing::warn;

use crate::reading::{decode, Reading};

/// Parses every line after the first `header_lines`, dropping lines that fail.
///
/// Failures are logged with the raw line unless the line is empty, so a
/// trailing newline does not produce noise.
pub fn deserialise<R: Reading>(body: &[u8], header_lines: usize) -> Vec<R> {
    let mut readings = Vec::new();

    for line in lines(body).skip(header_lines) {
        match R::from_line(line) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                if !line.is_empty() {
                    warn!("Failed to parse line '{}': {}", decode(line), e);
                }
            }
        }
    }

    readings
}

/// Splits on `\n`, dropping a trailing `\r` from each line.
fn lines(body: &[u8]) -> impl Iterator<Item = &[u8]> {
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}


// -- Tests ----------------------------------------------------------------------------
