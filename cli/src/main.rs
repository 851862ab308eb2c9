mod cli;
mod config;

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use anyhow::ensure;
use chrono::Local;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use engine::alert::AlertExpiry;
use engine::fluctuation::FluctuationConfig;
use engine::monitor::MonitorConfig;
use engine::threshold::CustomThreshold;
use engine::time::SystemClock;
use market::{SinaHqClient, query_symbol};
use tui::app::{App, AppOptions, run};
use tui::notify::LogNotifier;

use cli::Cli;
use config::{Watchlist, within_trading_hours};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    common::logger::init_file_logger("quotewatch", &cli.log_file)?;

    let watchlist = match &cli.watchlist {
        Some(path) => Watchlist::load(path)?,
        None => Watchlist::default(),
    };

    let mut tickers = watchlist.tickers;
    tickers.extend(cli.tickers.iter().cloned());
    ensure!(
        !tickers.is_empty(),
        "no instruments to track: pass ticker codes or --watchlist"
    );

    // Ids are exchange-prefixed everywhere past this point.
    let mut instruments: Vec<String> = Vec::new();
    for ticker in &tickers {
        let id = query_symbol(ticker);
        if !instruments.contains(&id) {
            instruments.push(id);
        }
    }
    let thresholds: BTreeMap<String, CustomThreshold> = watchlist
        .thresholds
        .into_iter()
        .map(|(code, threshold)| (query_symbol(&code), threshold))
        .collect();

    let options = AppOptions {
        instruments,
        thresholds,
        monitor: MonitorConfig {
            fluctuation: FluctuationConfig {
                window_secs: cli.window_secs,
                threshold_pct: cli.swing_threshold_pct,
            },
            expiry: AlertExpiry {
                retention_secs: cli.retention_secs,
            },
        },
        refresh_secs: cli.refresh_secs,
        palette_on: !cli.no_color,
        // Outside trading hours the feed is static; start paused.
        auto_refresh: within_trading_hours(Local::now()),
    };

    let source = Arc::new(SinaHqClient::new()?);
    let mut app = App::new(options, source, Arc::new(LogNotifier), Box::new(SystemClock));

    tracing::info!(
        instruments = app.instruments.len(),
        refresh_secs = cli.refresh_secs,
        "quotewatch starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
