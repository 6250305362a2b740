//! Download the station history listing and look stations up in it.
//!
//! See the GSOD readme for the `ish-history.txt` column layout.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    cli::create_spinner,
    constants::{ISH_HISTORY, ISH_HISTORY_HEADER_LINES},
    deserialise::deserialise,
    download::Fetch,
    error::GsodError,
    reading::StationHistory,
};

/// Every station in the listing, in listing order.
#[derive(Debug, Default)]
pub struct StationDirectory {
    stations: Vec<StationHistory>,
}

impl StationDirectory {
    /// Parses a full listing body, skipping its header.
    pub fn from_listing(body: &[u8]) -> Self {
        StationDirectory {
            stations: deserialise(body, ISH_HISTORY_HEADER_LINES),
        }
    }

    /// First station with this `wban`.
    ///
    /// A plain scan: the listing is searched once per run, so an index would
    /// cost more to build than it saves.
    pub fn find(&self, wban: u32) -> Result<&StationHistory, GsodError> {
        self.stations
            .iter()
            .find(|s| s.wban == Some(wban))
            .ok_or(GsodError::StationNotFound { wban })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationHistory> {
        self.stations.iter()
    }
}

impl From<Vec<StationHistory>> for StationDirectory {
    fn from(stations: Vec<StationHistory>) -> Self {
        StationDirectory { stations }
    }
}

pub async fn stations<F: Fetch + ?Sized>(fetcher: &F, root: &str) -> Result<StationDirectory> {
    let url = listing_url(root);

    let bar = create_spinner("Downloading station histories...".to_string());
    let body = fetcher
        .fetch(&url)
        .await
        .with_context(|| format!("Failed to fetch station histories from `{}`", url))?;
    bar.finish_with_message("Station histories downloaded");

    let directory = StationDirectory::from_listing(&body);
    if directory.is_empty() {
        warn!("No station histories found at `{}`", url);
    }

    let undated = directory
        .iter()
        .filter(|s| s.begin.is_none() || s.end.is_none())
        .count();
    info!(
        "Loaded {} station histories ({} without a complete date range)",
        directory.len(),
        undated
    );

    Ok(directory)
}

fn listing_url(root: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), ISH_HISTORY)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;
    use crate::download::fake::MemoryFetcher;

    const LA_GUARDIA: &str =
        "725030 14732 NEW YORK/LA GUARDIA           US US NY KLGA  +40779 -073880 +00030    19730101 20121231";
    const JAN_MAYEN: &str =
        "010010 99999 JAN MAYEN                     NO JN    ENJA  +70933 -008667 +00090    19310101 20120529";
    const BEAR_ISLAND: &str =
        "010140 99999 BEAR ISLAND                   NO SV    ENBJ  +74517 +019017 +00160    19490101 20121231";

    fn listing(lines: &[&str]) -> String {
        let mut text: String = (1..=ISH_HISTORY_HEADER_LINES)
            .map(|i| format!("header line {}\n", i))
            .collect();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn should_parse_listing_after_header() {
        let directory = StationDirectory::from_listing(listing(&[JAN_MAYEN, LA_GUARDIA]).as_bytes());

        assert_eq!(directory.len(), 2);
        let names: Vec<&str> = directory.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["JAN MAYEN", "NEW YORK/LA GUARDIA"]);
    }

    #[test]
    fn should_skip_blank_lines() {
        let directory = StationDirectory::from_listing(listing(&[JAN_MAYEN, "", "   ", LA_GUARDIA]).as_bytes());

        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn should_be_empty_for_header_only() {
        let directory = StationDirectory::from_listing(listing(&[]).as_bytes());

        assert!(directory.is_empty());
    }

    #[test]
    fn should_find_first_matching_wban() {
        let directory = StationDirectory::from_listing(listing(&[JAN_MAYEN, BEAR_ISLAND, LA_GUARDIA]).as_bytes());

        let station = directory.find(99999).unwrap();
        assert_eq!(station.name, "JAN MAYEN");

        let station = directory.find(14732).unwrap();
        assert_eq!(station.usaf, Some(725030));
        assert_eq!(station.begin, NaiveDate::from_ymd_opt(1973, 1, 1));
    }

    #[test]
    fn should_report_missing_wban() {
        let directory = StationDirectory::from_listing(listing(&[JAN_MAYEN, LA_GUARDIA]).as_bytes());

        match directory.find(12345) {
            Err(GsodError::StationNotFound { wban }) => assert_eq!(wban, 12345),
            other => panic!("expected station not found, got {:?}", other),
        }
    }

    #[test]
    fn should_make_listing_url() {
        assert_eq!(listing_url("http://x/gsod"), "http://x/gsod/ish-history.txt");
        assert_eq!(listing_url("http://x/gsod/"), "http://x/gsod/ish-history.txt");
    }

    #[tokio::test]
    async fn should_fetch_station_directory() {
        let fetcher = MemoryFetcher::default()
            .with("http://x/gsod/ish-history.txt", listing(&[LA_GUARDIA]));

        let directory = stations(&fetcher, "http://x/gsod").await.unwrap();

        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn should_keep_columns_aligned_after_latin1_name() {
        let mut body = listing(&[JAN_MAYEN]).into_bytes();
        let mut line = LA_GUARDIA.as_bytes().to_vec();
        line[17] = 0xC9;
        body.extend_from_slice(&line);
        body.push(b'\n');
        let fetcher = MemoryFetcher::default().with("http://x/gsod/ish-history.txt", body);

        let directory = stations(&fetcher, "http://x/gsod").await.unwrap();

        let station = directory.find(14732).unwrap();
        assert_eq!(station.name, "NEW \u{c9}ORK/LA GUARDIA");
        assert_eq!(station.country, "US");
        assert_eq!(station.lat, Some(40.779));
        assert_eq!(station.lon, Some(-73.88));
        assert_eq!(station.begin, NaiveDate::from_ymd_opt(1973, 1, 1));
        assert_eq!(station.end, NaiveDate::from_ymd_opt(2012, 12, 31));
    }

    #[tokio::test]
    async fn should_fail_when_listing_unavailable() {
        let fetcher = MemoryFetcher::default();

        assert!(stations(&fetcher, "http://x/gsod").await.is_err());
    }
}
