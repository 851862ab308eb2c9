use chrono::NaiveDate;

use crate::time::TradeTime;

/// Normalized snapshot of one instrument at one point in time.
///
/// Immutable once constructed; each refresh cycle replaces the prior quote
/// for the same instrument wholesale. Two quotes for the same instrument
/// are ordered by their trade time-of-day.
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    /// Stable instrument key, exchange-prefixed (e.g. `sz002583`).
    pub instrument_id: String,
    pub display_name: String,

    pub open: f64,
    pub prev_close: f64,
    /// Last traded price.
    pub price: f64,
    pub high: f64,
    pub low: f64,

    /// Cumulative traded volume, shares.
    pub volume: u64,
    /// Cumulative traded value, yuan.
    pub turnover: f64,

    pub date: NaiveDate,
    pub time: TradeTime,
}

impl Quote {
    /// Percentage change of the last price against the previous close.
    ///
    /// `None` when the previous close is zero or negative; callers treat
    /// that quote as malformed for percentage-based decisions.
    pub fn change_pct(&self) -> Option<f64> {
        if self.prev_close <= 0.0 {
            return None;
        }
        Some((self.price - self.prev_close) / self.prev_close * 100.0)
    }
}
