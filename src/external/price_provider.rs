use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("symbol not found")]
    NotFound,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily closes for `ticker` with `start <= date < end`, ascending by date.
    async fn fetch_daily_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError>;
}
