//! Fixed-width quote table rendered as ANSI-colorized text.
//!
//! The renderer never talks to the widget layer directly: it emits plain
//! text with SGR escapes, which [`crate::ansi::translate`] decomposes
//! into spans for whatever widget toolkit sits on top. Rising rows are
//! red and falling rows green (CN market convention); a row with an
//! active rapid-move alert is bold yellow; the header is bold.

use std::collections::{HashMap, HashSet};

use engine::quote::Quote;

const HEADER_STYLE: &str = "1";
const RISING_STYLE: &str = "31";
const FALLING_STYLE: &str = "32";
const ALERTED_STYLE: &str = "1;33";

pub fn render(
    quotes: &[&Quote],
    previous: &HashMap<String, Quote>,
    alerted: &HashSet<String>,
) -> String {
    let mut lines = Vec::with_capacity(quotes.len() + 1);
    lines.push(paint(HEADER_STYLE, &header_row()));

    for quote in quotes {
        let row = format_row(quote, previous.get(&quote.instrument_id));
        match row_style(quote, alerted) {
            Some(style) => lines.push(paint(style, &row)),
            None => lines.push(row),
        }
    }

    lines.join("\n")
}

fn paint(style: &str, text: &str) -> String {
    format!("\x1b[{style}m{text}\x1b[0m")
}

fn row_style(quote: &Quote, alerted: &HashSet<String>) -> Option<&'static str> {
    if alerted.contains(&quote.instrument_id) {
        Some(ALERTED_STYLE)
    } else if quote.price > quote.prev_close {
        Some(RISING_STYLE)
    } else if quote.price < quote.prev_close {
        Some(FALLING_STYLE)
    } else {
        None
    }
}

fn header_row() -> String {
    format!(
        "{:<12} {:>8} {:>8} {:>8} {:>8} {:>7} {:>7} {:>16} {:>16} {:>12} {:>12} {:>8}",
        "Instrument",
        "PrevCl",
        "Open",
        "Last",
        "Tick",
        "Chg",
        "Chg%",
        "High",
        "Low",
        "Vol(lots)",
        "Turn(10k)",
        "Time",
    )
}

fn format_row(q: &Quote, prior: Option<&Quote>) -> String {
    // Move since the previous refresh, not since the previous close.
    let tick = prior.map(|p| q.price - p.price).unwrap_or(0.0);
    let change = q.price - q.prev_close;

    format!(
        "{:<12} {:>8.2} {:>8.2} {:>8.2} {:>8} {:>7.2} {:>7} {:>16} {:>16} {:>12.2} {:>12.2} {:>8}",
        label(q),
        q.prev_close,
        q.open,
        q.price,
        signed(tick, 3),
        change,
        pct_cell(q.change_pct()),
        extremum_cell(q.high, q.prev_close),
        extremum_cell(q.low, q.prev_close),
        q.volume as f64 / 100.0,
        q.turnover / 10_000.0,
        q.time.to_string(),
    )
}

fn label(q: &Quote) -> &str {
    if q.display_name.is_empty() {
        &q.instrument_id
    } else {
        &q.display_name
    }
}

fn signed(v: f64, precision: usize) -> String {
    if v > 0.0 {
        format!("+{v:.precision$}")
    } else {
        format!("{v:.precision$}")
    }
}

fn pct_cell(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{p:.2}%"),
        None => "-".to_string(),
    }
}

/// Day high/low annotated with its distance from the previous close.
fn extremum_cell(value: f64, prev_close: f64) -> String {
    if prev_close <= 0.0 {
        return format!("{value:.2}(-)");
    }
    let pct = (value - prev_close) / prev_close * 100.0;
    format!("{value:.2}({}%)", signed(pct, 2))
}
