use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(name = "quotewatch", version)]
pub struct Cli {
    /// Instrument codes to track, bare or exchange-prefixed
    /// (e.g. 002583, sh000001)
    pub tickers: Vec<String>,

    /// Watchlist file carrying instruments and custom thresholds
    #[clap(long)]
    pub watchlist: Option<PathBuf>,

    /// Auto-refresh cadence in seconds (the feed updates roughly every 3s)
    #[clap(long, default_value = "3")]
    pub refresh_secs: u64,

    /// Sliding-window span for rapid-move detection, seconds
    #[clap(long, default_value = "30")]
    pub window_secs: u64,

    /// Minimum |swing| in percent of previous close that raises an alert
    #[clap(long, default_value = "2.0")]
    pub swing_threshold_pct: f64,

    /// Seconds a fired alert stays on screen without a re-trigger
    #[clap(long, default_value = "180")]
    pub retention_secs: u64,

    /// Start with the color palette disabled
    #[clap(long)]
    pub no_color: bool,

    /// Log file; the terminal itself belongs to the UI
    #[clap(long, default_value = "quotewatch.log")]
    pub log_file: PathBuf,
}
