//! MonitorEngine
//!
//! Refresh-cycle façade over the individual monitors. Responsibilities:
//!   • Feed each instrument's fresh quote into its sliding window
//!   • Collect rapid-move alerts and keep the active-alert book current
//!   • Expire alerts past their retention span
//!   • Detect edge-triggered threshold crossings against the prior cycle
//!
//! The engine exclusively owns window, alert, and last-snapshot state; the
//! caller owns the raw quote stream and hands each cycle's snapshot in by
//! value. Threshold state is owned by the user-input surface and only read
//! here. All of it is mutated on a single control thread, once per cycle.

use std::collections::{BTreeMap, HashMap};

use crate::alert::{AlertExpiry, FluctuationAlert};
use crate::fluctuation::{FluctuationConfig, FluctuationMonitor};
use crate::quote::Quote;
use crate::threshold::{CustomThreshold, ThresholdCrossing, detect_crossings};
use crate::time::TradeTime;

#[derive(Clone, Copy, Debug, Default)]
pub struct MonitorConfig {
    pub fluctuation: FluctuationConfig,
    pub expiry: AlertExpiry,
}

/// What one refresh cycle produced.
#[derive(Clone, Debug, Default)]
pub struct RefreshOutcome {
    /// Alerts raised (or re-raised) this cycle.
    pub fired: Vec<FluctuationAlert>,
    /// Threshold crossings; transient, not retained by the engine.
    pub crossings: Vec<ThresholdCrossing>,
}

pub struct MonitorEngine {
    fluctuation: FluctuationMonitor,
    expiry: AlertExpiry,
    active_alerts: HashMap<String, FluctuationAlert>,
    last_quotes: HashMap<String, Quote>,
}

impl MonitorEngine {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            fluctuation: FluctuationMonitor::new(config.fluctuation),
            expiry: config.expiry,
            active_alerts: HashMap::new(),
            last_quotes: HashMap::new(),
        }
    }

    /// Run one refresh cycle over a full quote snapshot.
    ///
    /// A partial or empty snapshot is fine: instruments absent this cycle
    /// simply skip their window update and crossing check. The cycle
    /// always completes.
    pub fn on_refresh(
        &mut self,
        quotes: HashMap<String, Quote>,
        thresholds: &BTreeMap<String, CustomThreshold>,
        now: TradeTime,
    ) -> RefreshOutcome {
        let mut fired = Vec::new();

        // Deterministic instrument order keeps alert ordering stable
        // across runs.
        let mut ordered: Vec<&Quote> = quotes.values().collect();
        ordered.sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id));

        for quote in ordered {
            if let Some(alert) = self.fluctuation.observe(quote.clone(), now) {
                self.active_alerts
                    .insert(alert.instrument_id.clone(), alert.clone());
                fired.push(alert);
            }
        }

        self.expiry.sweep(&mut self.active_alerts, now);

        let crossings = detect_crossings(&self.last_quotes, &quotes, thresholds);
        self.last_quotes = quotes;

        RefreshOutcome { fired, crossings }
    }

    /// Active alerts ordered by instrument id.
    pub fn active_alerts(&self) -> Vec<&FluctuationAlert> {
        let mut alerts: Vec<&FluctuationAlert> = self.active_alerts.values().collect();
        alerts.sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id));
        alerts
    }

    pub fn has_active_alert(&self, instrument_id: &str) -> bool {
        self.active_alerts.contains_key(instrument_id)
    }
}
