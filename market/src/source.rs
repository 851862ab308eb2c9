use std::collections::HashMap;

use async_trait::async_trait;
use engine::quote::Quote;

use crate::errors::QuoteFeedError;

/// Narrow retrieval contract between the monitoring core and whatever
/// actually fetches quotes.
///
/// Implementations may omit instruments they failed to resolve; callers
/// must tolerate a partial or empty result without failing the cycle.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, instruments: &[String]) -> Result<HashMap<String, Quote>, QuoteFeedError>;
}
