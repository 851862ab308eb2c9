//! Rapid-move detection (pump/dump signal).
//!
//! Each tracked instrument keeps a sliding window of recent quotes. On
//! every refresh the monitor measures the swing between the window's
//! highest- and lowest-priced entries:
//!
//! - The extremum that occurred *later* in time gives the swing its sign:
//!   positive when the price rose into the high, negative when it fell
//!   into the low.
//! - The percentage baseline is the previous-close price carried by the
//!   *chronologically earlier* extremum's quote. The denominator quote is
//!   always the one that happened first, never the later one.
//!
//! ```text
//! swing_pct = sign * |later.price - earlier.price| / earlier.prev_close * 100
//! ```
//!
//! A window with a single entry has swing 0 and never alerts. A zero or
//! negative baseline is undefined input and fails closed (no alert) rather
//! than surfacing an arithmetic error.

use std::collections::HashMap;

use crate::alert::FluctuationAlert;
use crate::quote::Quote;
use crate::time::TradeTime;
use crate::window::{QuoteWindow, WindowInsert};

#[derive(Clone, Copy, Debug)]
pub struct FluctuationConfig {
    /// Sliding-window span, seconds of wall-clock time.
    pub window_secs: u64,
    /// Minimum |swing_pct| that raises an alert.
    pub threshold_pct: f64,
}

impl Default for FluctuationConfig {
    fn default() -> Self {
        Self {
            window_secs: 30,
            threshold_pct: 2.0,
        }
    }
}

/// Per-instrument window state plus the swing rule above.
pub struct FluctuationMonitor {
    config: FluctuationConfig,
    windows: HashMap<String, QuoteWindow>,
}

impl FluctuationMonitor {
    pub fn new(config: FluctuationConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
        }
    }

    /// Feed one quote for one instrument; called once per instrument per
    /// refresh cycle. Returns the alert raised by this quote, if any.
    ///
    /// Stale quotes (time-of-day not strictly past the window's newest
    /// entry) are rejected silently: an expected race with polling, not an
    /// error.
    pub fn observe(&mut self, quote: Quote, now: TradeTime) -> Option<FluctuationAlert> {
        let window_secs = self.config.window_secs;
        let window = self
            .windows
            .entry(quote.instrument_id.clone())
            .or_insert_with(|| QuoteWindow::new(window_secs));

        if window.offer(quote) == WindowInsert::Stale {
            return None;
        }
        window.evict_expired(now);

        let (highest, lowest) = window.extrema()?;

        // A flat or single-entry window has both extrema at the same time
        // and carries no swing.
        let (later, earlier, sign) = if highest.time > lowest.time {
            (highest, lowest, 1.0)
        } else if lowest.time > highest.time {
            (lowest, highest, -1.0)
        } else {
            return None;
        };

        let baseline = earlier.prev_close;
        if baseline <= 0.0 {
            return None;
        }

        let swing_pct = sign * (later.price - earlier.price).abs() / baseline * 100.0;
        if swing_pct.abs() < self.config.threshold_pct {
            return None;
        }

        Some(FluctuationAlert {
            instrument_id: later.instrument_id.clone(),
            display_name: later.display_name.clone(),
            swing_pct,
            triggered_at: later.time,
        })
    }
}
