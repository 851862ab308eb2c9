pub mod client;
pub mod errors;
pub mod parser;
pub mod source;

pub use client::{SinaHqClient, query_symbol};
pub use errors::QuoteFeedError;
pub use source::QuoteSource;
