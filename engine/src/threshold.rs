//! User-set thresholds and edge-triggered crossing detection.
//!
//! Detection is a pure two-sample comparison between the previous and the
//! current refresh cycle. A crossing fires on the transition across a
//! threshold, not while the value sits on one side of it, so a stationary
//! value can never fire twice. The flip side: a crossing that occurs and
//! fully reverses between two refresh cycles is invisible.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::quote::Quote;

/// Per-instrument thresholds. Either axis may be absent, meaning that axis
/// is unmonitored.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CustomThreshold {
    /// Absolute last-price threshold, yuan.
    #[serde(default)]
    pub price: Option<f64>,
    /// Change-vs-previous-close threshold, percent.
    #[serde(default)]
    pub fluctuation_pct: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossingKind {
    Price,
    Fluctuation,
}

/// Transient crossing notification; forwarded to the sink, never retained.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdCrossing {
    pub instrument_id: String,
    pub kind: CrossingKind,
    /// The value on the new side of the threshold: the current price for
    /// [`CrossingKind::Price`], the current change percentage for
    /// [`CrossingKind::Fluctuation`].
    pub value: f64,
}

/// Edge rule: equality on the new side counts as crossed, equality only on
/// the old side does not.
fn crossed(old: f64, new: f64, threshold: f64) -> bool {
    (old < threshold && threshold <= new) || (old > threshold && threshold >= new)
}

/// Compare two full quote snapshots against the configured thresholds.
///
/// Instruments missing from either snapshot are skipped for this cycle;
/// so is the fluctuation axis of any instrument whose baseline cannot be
/// used. Nothing here aborts the batch.
pub fn detect_crossings(
    previous: &HashMap<String, Quote>,
    current: &HashMap<String, Quote>,
    thresholds: &BTreeMap<String, CustomThreshold>,
) -> Vec<ThresholdCrossing> {
    let mut events = Vec::new();

    for (id, threshold) in thresholds {
        let (Some(prev), Some(curr)) = (previous.get(id), current.get(id)) else {
            continue;
        };

        if let Some(t) = threshold.price {
            if crossed(prev.price, curr.price, t) {
                events.push(ThresholdCrossing {
                    instrument_id: id.clone(),
                    kind: CrossingKind::Price,
                    value: curr.price,
                });
            }
        }

        if let Some(t) = threshold.fluctuation_pct {
            if let (Some(old_pct), Some(new_pct)) = (prev.change_pct(), curr.change_pct()) {
                if crossed(old_pct, new_pct, t) {
                    events.push(ThresholdCrossing {
                        instrument_id: id.clone(),
                        kind: CrossingKind::Fluctuation,
                        value: new_pct,
                    });
                }
            }
        }
    }

    events
}
