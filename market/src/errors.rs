use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteFeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed quote line for {instrument}: {reason}")]
    MalformedLine { instrument: String, reason: String },
}

impl QuoteFeedError {
    pub(crate) fn malformed(instrument: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            instrument: instrument.to_string(),
            reason: reason.into(),
        }
    }
}
