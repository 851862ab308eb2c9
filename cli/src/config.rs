//! Watchlist file: the user-editable surface that owns instrument and
//! threshold state. The monitoring engine only ever reads it.
//!
//! ```json
//! {
//!   "tickers": ["002583", "sh000001"],
//!   "thresholds": {
//!     "002583": { "price": 18.0, "fluctuation_pct": 5.0 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use serde::Deserialize;

use engine::threshold::CustomThreshold;

#[derive(Debug, Default, Deserialize)]
pub struct Watchlist {
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Keyed by ticker code, bare or prefixed; normalized at load time.
    #[serde(default)]
    pub thresholds: BTreeMap<String, CustomThreshold>,
}

impl Watchlist {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read watchlist {}", path.display()))?;
        serde_json::from_str(&raw).context("parse watchlist json")
    }
}

/// CN A-share trading windows: weekdays 09:15–11:30 and 13:00–15:05.
/// Public holidays are not consulted; outside these windows auto-refresh
/// starts paused and can be toggled back on by hand.
pub fn within_trading_hours(now: DateTime<Local>) -> bool {
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let minutes = now.hour() * 60 + now.minute();
    (9 * 60 + 15..=11 * 60 + 30).contains(&minutes) || (13 * 60..=15 * 60 + 5).contains(&minutes)
}
