//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::constants::DEFAULT_ROOT;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Analyzes the temperature history of NOAA GSOD weather stations
pub struct Cli {
    /// WBAN number of the station to report on. Without it only the station
    /// histories are downloaded
    #[arg(long)]
    pub wban: Option<u32>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Root URL of the GSOD archive
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: String,

    /// Directory of the response cache [default: ~/.wx/cache]
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Download everything again, ignoring the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Directory the annual charts are written to
    #[arg(long, default_value = ".")]
    pub plot_dir: PathBuf,
}

/// Set up logging to stderr. `RUST_LOG` overrides the level chosen by `verbose`.
pub fn setup_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gsod={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------
