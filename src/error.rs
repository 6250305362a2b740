//! Failures that abort a station lookup or archive fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GsodError {
    #[error("Couldn't find wban {wban} in station histories")]
    StationNotFound { wban: u32 },

    #[error("Station with wban {wban} has no usaf number")]
    MissingStationNumber { wban: u32 },

    #[error("Station with wban {wban} has no complete begin/end date range")]
    MissingActiveRange { wban: u32 },

    #[error("Failed to download `{url}`: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decompress `{url}`")]
    Decompress {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
