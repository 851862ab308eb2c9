//! Sina HQ quote client.
//!
//! Polls `hq.sinajs.cn` over HTTP for a batch of instruments and returns
//! the parsed snapshot. The endpoint requires a finance.sina.com.cn
//! referer and updates roughly every 3 seconds.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use engine::quote::Quote;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::errors::QuoteFeedError;
use crate::parser::parse_payload;
use crate::source::QuoteSource;

const HQ_ENDPOINT: &str = "http://hq.sinajs.cn/list=";
const REFERER: &str = "http://finance.sina.com.cn";

/// Resolve a bare ticker code to its exchange-prefixed query symbol.
///
/// Shenzhen codes start with 30/00/15, Shanghai with 60/688; anything
/// else (including already-prefixed symbols) passes through unchanged.
pub fn query_symbol(ticker: &str) -> String {
    if ticker.starts_with("30") || ticker.starts_with("00") || ticker.starts_with("15") {
        format!("sz{ticker}")
    } else if ticker.starts_with("60") || ticker.starts_with("688") {
        format!("sh{ticker}")
    } else {
        ticker.to_string()
    }
}

#[derive(Clone)]
pub struct SinaHqClient {
    http: Client,
    endpoint: String,
}

impl SinaHqClient {
    pub fn new() -> Result<Self, QuoteFeedError> {
        Self::with_endpoint(HQ_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Result<Self, QuoteFeedError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl QuoteSource for SinaHqClient {
    #[instrument(
        skip(self, instruments),
        fields(requested = instruments.len()),
        level = "debug"
    )]
    async fn fetch(&self, instruments: &[String]) -> Result<HashMap<String, Quote>, QuoteFeedError> {
        let list: Vec<String> = instruments.iter().map(|t| query_symbol(t)).collect();
        let url = format!("{}{}", self.endpoint, list.join(","));

        let resp = self
            .http
            .get(&url)
            .header("referer", REFERER)
            .send()
            .await?
            .error_for_status()?;

        // The response declares its charset (gbk); reqwest transcodes.
        let payload = resp.text().await?;
        let quotes = parse_payload(&payload);

        debug!(resolved = quotes.len(), "quote batch fetched");
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shenzhen_and_shanghai_prefixes_are_inferred() {
        assert_eq!(query_symbol("002583"), "sz002583");
        assert_eq!(query_symbol("300059"), "sz300059");
        assert_eq!(query_symbol("159941"), "sz159941");
        assert_eq!(query_symbol("600839"), "sh600839");
        assert_eq!(query_symbol("688001"), "sh688001");
    }

    #[test]
    fn prefixed_and_index_symbols_pass_through() {
        assert_eq!(query_symbol("sh000001"), "sh000001");
        assert_eq!(query_symbol("sz002583"), "sz002583");
    }
}
