//! Sina HQ payload parser.
//!
//! The endpoint answers one JavaScript-style assignment per instrument:
//!
//! ```text
//! var hq_str_sz002583="海能达,17.290,17.530,17.550,17.970,16.960,...,2024-11-29,15:00:00,00";
//! ```
//!
//! Positional fields (subset consumed here):
//!   0 display name, 1 open, 2 previous close, 3 current, 4 day high,
//!   5 day low, 8 volume (shares), 9 turnover (yuan), 30 date, 31 time.
//!
//! A suspended instrument comes back with an empty body; that line, like
//! any other malformed line, is skipped for the cycle without failing the
//! batch.

use std::collections::HashMap;

use chrono::NaiveDate;
use engine::quote::Quote;
use engine::time::TradeTime;
use tracing::warn;

use crate::errors::QuoteFeedError;

const LINE_PREFIX: &str = "var hq_str_";
const MIN_FIELDS: usize = 32;

pub fn parse_payload(payload: &str) -> HashMap<String, Quote> {
    let mut quotes = HashMap::new();

    for raw in payload.split(';') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(Some(quote)) => {
                quotes.insert(quote.instrument_id.clone(), quote);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "skipping quote line"),
        }
    }

    quotes
}

/// `Ok(None)` when the line is not a quote assignment at all.
fn parse_line(line: &str) -> Result<Option<Quote>, QuoteFeedError> {
    let Some(rest) = line.strip_prefix(LINE_PREFIX) else {
        return Ok(None);
    };
    let Some((id, quoted_body)) = rest.split_once('=') else {
        return Ok(None);
    };

    let body = quoted_body.trim().trim_matches('"');
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Err(QuoteFeedError::malformed(
            id,
            format!("expected at least {MIN_FIELDS} fields, got {}", fields.len()),
        ));
    }

    let date = NaiveDate::parse_from_str(fields[30], "%Y-%m-%d")
        .map_err(|_| QuoteFeedError::malformed(id, format!("bad date: {}", fields[30])))?;
    let time = TradeTime::parse(fields[31])
        .ok_or_else(|| QuoteFeedError::malformed(id, format!("bad time: {}", fields[31])))?;

    Ok(Some(Quote {
        instrument_id: id.to_string(),
        display_name: fields[0].trim().to_string(),
        open: num(id, &fields, 1)?,
        prev_close: num(id, &fields, 2)?,
        price: num(id, &fields, 3)?,
        high: num(id, &fields, 4)?,
        low: num(id, &fields, 5)?,
        volume: num(id, &fields, 8)? as u64,
        turnover: num(id, &fields, 9)?,
        date,
        time,
    }))
}

fn num(id: &str, fields: &[&str], idx: usize) -> Result<f64, QuoteFeedError> {
    fields[idx]
        .parse::<f64>()
        .map_err(|_| QuoteFeedError::malformed(id, format!("field {idx} is not numeric: {}", fields[idx])))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_LINE: &str = "var hq_str_sz002583=\"海能达,17.290,17.530,17.550,17.970,16.960,17.540,17.550,255884353,4462582236.680,212300,17.540,240100,17.530,88900,17.520,161100,17.510,1177600,17.500,1011020,17.550,369900,17.560,519500,17.570,280000,17.580,180500,17.590,2024-11-29,15:00:00,00\";";

    #[test]
    fn parses_a_real_payload_line() {
        let quotes = parse_payload(GOOD_LINE);
        let q = quotes.get("sz002583").expect("line must parse");

        assert_eq!(q.display_name, "海能达");
        assert!((q.open - 17.29).abs() < 1e-9);
        assert!((q.prev_close - 17.53).abs() < 1e-9);
        assert!((q.price - 17.55).abs() < 1e-9);
        assert!((q.high - 17.97).abs() < 1e-9);
        assert!((q.low - 16.96).abs() < 1e-9);
        assert_eq!(q.volume, 255_884_353);
        assert!((q.turnover - 4_462_582_236.68).abs() < 1e-3);
        assert_eq!(q.date, NaiveDate::from_ymd_opt(2024, 11, 29).unwrap());
        assert_eq!(q.time, TradeTime::parse("15:00:00").unwrap());
    }

    #[test]
    fn parses_multiple_lines_into_one_snapshot() {
        let payload = format!(
            "{GOOD_LINE}\nvar hq_str_sz002456=\"欧菲光,13.380,13.450,13.390,13.630,13.000,13.390,13.400,341289935,4540992553.610,1804500,13.390,1595000,13.380,452900,13.370,370000,13.360,684000,13.350,1537156,13.400,292600,13.410,400500,13.420,139500,13.430,143300,13.440,2024-11-29,15:00:00,00\";"
        );
        let quotes = parse_payload(&payload);
        assert_eq!(quotes.len(), 2);
        assert!(quotes.contains_key("sz002583"));
        assert!(quotes.contains_key("sz002456"));
    }

    #[test]
    fn suspended_instrument_is_skipped_not_fatal() {
        let payload = format!("var hq_str_sz999999=\"\";{GOOD_LINE}");
        let quotes = parse_payload(&payload);
        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("sz002583"));
    }

    #[test]
    fn non_numeric_field_skips_only_that_instrument() {
        let bad = GOOD_LINE.replace("17.550", "n/a");
        let payload = format!("{bad}\n{GOOD_LINE}");
        let quotes = parse_payload(&payload);
        // The malformed copy and the good copy share an id; the good one
        // must still land.
        assert_eq!(quotes.len(), 1);
        assert!((quotes["sz002583"].price - 17.55).abs() < 1e-9);
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert!(parse_payload("// nothing here").is_empty());
        assert!(parse_payload("").is_empty());
    }
}
