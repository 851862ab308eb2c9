//! Per-instrument sliding window of recent quotes.
//!
//! The window is ordered by trade time-of-day and bounded by a wall-clock
//! age: entries more than the configured span behind "now" are evicted,
//! oldest first. Insertion requires strictly increasing quote times; a
//! quote that does not advance the window is an expected race with polling
//! and is rejected without error.

use std::collections::VecDeque;

use crate::quote::Quote;
use crate::time::TradeTime;

/// Outcome of offering a quote to a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowInsert {
    Accepted,
    /// Duplicate or out-of-order quote time; window unchanged.
    Stale,
}

pub struct QuoteWindow {
    /// Entries in insertion order, which is also time order.
    entries: VecDeque<Quote>,
    max_age_secs: i64,
}

impl QuoteWindow {
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            entries: VecDeque::new(),
            max_age_secs: max_age_secs as i64,
        }
    }

    /// Append a quote unless a more-recent-or-equal one already occupies
    /// the window.
    pub fn offer(&mut self, quote: Quote) -> WindowInsert {
        if let Some(last) = self.entries.back() {
            if quote.time <= last.time {
                return WindowInsert::Stale;
            }
        }
        self.entries.push_back(quote);
        WindowInsert::Accepted
    }

    /// Evict entries more than the window span behind `now`.
    ///
    /// `now` is wall clock, not quote time: a feed that stalls still ages
    /// its window out. Both sides are same-day times (see [`TradeTime`]).
    pub fn evict_expired(&mut self, now: TradeTime) {
        while let Some(front) = self.entries.front() {
            if front.time.seconds_until(now) > self.max_age_secs {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        self.entries.iter()
    }

    /// Highest- and lowest-priced entries in source order, the first seen
    /// winning ties. `None` on an empty window.
    pub fn extrema(&self) -> Option<(&Quote, &Quote)> {
        let mut it = self.entries.iter();
        let first = it.next()?;
        let mut highest = first;
        let mut lowest = first;
        for q in it {
            if q.price > highest.price {
                highest = q;
            }
            if q.price < lowest.price {
                lowest = q;
            }
        }
        Some((highest, lowest))
    }
}
