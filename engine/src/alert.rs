//! Fired rapid-move alerts and their time-based expiry.

use std::collections::HashMap;

use crate::time::TradeTime;

/// A rapid-move alert raised by the fluctuation monitor.
///
/// At most one active alert per instrument; a re-trigger replaces the
/// previous one in place.
#[derive(Clone, Debug, PartialEq)]
pub struct FluctuationAlert {
    pub instrument_id: String,
    pub display_name: String,
    /// Signed swing, percent of the baseline previous close.
    pub swing_pct: f64,
    /// Time-of-day of the later extremum that completed the swing.
    pub triggered_at: TradeTime,
}

/// Removes alerts a fixed time after they fire, independent of whether new
/// quotes keep arriving for the instrument.
#[derive(Clone, Copy, Debug)]
pub struct AlertExpiry {
    pub retention_secs: u64,
}

impl Default for AlertExpiry {
    fn default() -> Self {
        Self { retention_secs: 180 }
    }
}

impl AlertExpiry {
    /// Drop alerts whose trigger time is more than the retention span
    /// behind `now`. Pure function of the alert set and the clock.
    pub fn sweep(&self, alerts: &mut HashMap<String, FluctuationAlert>, now: TradeTime) {
        let retention = self.retention_secs as i64;
        alerts.retain(|_, alert| alert.triggered_at.seconds_until(now) <= retention);
    }
}
