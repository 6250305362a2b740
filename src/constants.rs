//! Locations and layout constants for the NOAA GSOD archive.

/// Root of the GSOD tree: the station listing and one directory per year.
pub const DEFAULT_ROOT: &str = "https://www.ncei.noaa.gov/pub/data/gsod";

/// Station history listing, relative to the root.
pub const ISH_HISTORY: &str = "ish-history.txt";

/// Lines of prose and column headings above the first station in the listing.
pub const ISH_HISTORY_HEADER_LINES: usize = 22;

/// Column headings above the first day in a yearly archive.
pub const ARCHIVE_HEADER_LINES: usize = 1;

/// Directory under the user's home holding the response cache.
pub const CACHE_DIR_NAME: &str = ".wx";

/// Store within [`CACHE_DIR_NAME`].
pub const CACHE_STORE_NAME: &str = "cache";
