pub mod stations;
pub mod temperatures;

use anyhow::Result;
use tracing::info;

use crate::{
    cache::{default_cache_dir, CachedFetcher},
    download::{Fetch, HttpFetcher},
    report::{report, Plotter, SvgPlotter},
};

pub use stations::stations;
pub use temperatures::station_temperatures;

use super::Cli;

pub async fn run(cli: &Cli) -> Result<()> {
    let fetcher = make_fetcher(cli)?;
    let mut plotter = SvgPlotter::new(&cli.plot_dir);

    execute(fetcher.as_ref(), cli, &mut plotter).await
}

/// Loads the station histories and, if a station was asked for, reports on it.
pub async fn execute<F, P>(fetcher: &F, cli: &Cli, plotter: &mut P) -> Result<()>
where
    F: Fetch + ?Sized,
    P: Plotter + ?Sized,
{
    let directory = stations(fetcher, &cli.root).await?;

    let Some(wban) = cli.wban else {
        info!("No station requested, done after loading station histories");
        return Ok(());
    };

    let table = station_temperatures(fetcher, &cli.root, wban, &directory).await?;
    report(&table, plotter)
}

fn make_fetcher(cli: &Cli) -> Result<Box<dyn Fetch>> {
    if cli.no_cache {
        return Ok(Box::new(HttpFetcher::new()));
    }

    let cache_dir = match &cli.cache_dir {
        Some(dir) => dir.clone(),
        None => default_cache_dir()?,
    };

    Ok(Box::new(CachedFetcher::open(HttpFetcher::new(), cache_dir)?))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::{constants::ISH_HISTORY_HEADER_LINES, download::fake::MemoryFetcher};

    const ROOT: &str = "http://x/gsod";

    fn listing() -> String {
        let mut text = "header\n".repeat(ISH_HISTORY_HEADER_LINES);
        text.push_str(
            "725030 14732 NEW YORK/LA GUARDIA           US US NY KLGA  +40779 -073880 +00030    20100101 20101231\n",
        );
        text
    }

    fn archive() -> String {
        [
            "STN--- WBAN   YEARMODA    TEMP",
            "725030 14732  20100101    34.6 24    27.3 24  1003.4 24  1002.6 24    7.1 24   11.2 24   19.0   26.0    37.9*   30.9   0.25G 999.9  011000",
            "725030 14732  20100102    35.0 24    27.3 24  1003.4 24  1002.6 24    7.1 24   11.2 24   19.0   26.0    41.0    29.0   0.25G 999.9  011000",
        ]
        .join("\n")
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::default()
            .with(&format!("{}/ish-history.txt", ROOT), listing())
            .with_gzip(&format!("{}/2010/725030-14732-2010.op.gz", ROOT), &archive())
    }

    fn cli(args: &[&str], plot_dir: &TempDir) -> Cli {
        let plot_dir = plot_dir.path().to_string_lossy().to_string();
        let mut argv = vec!["gsod", "--root", ROOT, "--plot-dir", plot_dir.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn should_stop_after_directory_without_wban() {
        let tmp_dir = TempDir::new().unwrap();
        let fetcher = fetcher();
        let cli = cli(&[], &tmp_dir);
        let mut plotter = SvgPlotter::new(tmp_dir.path());

        execute(&fetcher, &cli, &mut plotter).await.unwrap();

        assert_eq!(fetcher.requests(), vec!["http://x/gsod/ish-history.txt"]);
        assert_eq!(std::fs::read_dir(tmp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn should_report_on_requested_station() {
        let tmp_dir = TempDir::new().unwrap();
        let fetcher = fetcher();
        let cli = cli(&["--wban", "14732"], &tmp_dir);
        let mut plotter = SvgPlotter::new(tmp_dir.path());

        execute(&fetcher, &cli, &mut plotter).await.unwrap();

        for aggregate in ["mean", "max", "min"] {
            let chart = tmp_dir.path().join(format!("14732-annual-{}.svg", aggregate));
            assert!(chart.exists(), "missing {}", chart.display());
        }
    }

    #[tokio::test]
    async fn should_fail_for_unknown_station() {
        let tmp_dir = TempDir::new().unwrap();
        let fetcher = fetcher();
        let cli = cli(&["--wban", "11111"], &tmp_dir);
        let mut plotter = SvgPlotter::new(tmp_dir.path());

        let err = execute(&fetcher, &cli, &mut plotter).await.unwrap_err();

        assert_eq!(err.to_string(), "Couldn't find wban 11111 in station histories");
    }

    #[test]
    fn should_use_cache_dir_from_cli() {
        let tmp_dir = TempDir::new().unwrap();
        let cache_dir = tmp_dir.path().join("cache");
        let cache_arg = cache_dir.to_string_lossy().to_string();
        let cli = cli(&["--cache-dir", cache_arg.as_str()], &tmp_dir);

        assert!(make_fetcher(&cli).is_ok());
        assert!(cache_dir.exists());
    }
}
