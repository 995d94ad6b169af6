//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Per-symbol lookup failures inside a batch are *not* errors at this level;
/// they are reported as [`QuoteFailure`](crate::models::QuoteFailure) markers
/// in the batch result. `MarketDataError` is reserved for whole-request
/// failures.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider response could not be decoded.
    #[error("Unexpected response from {provider}: {message}")]
    UnexpectedResponse { provider: String, message: String },

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by provider {provider}")]
    NotSupported { operation: String, provider: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure is transient and worth retrying on a later tick.
    ///
    /// Callers polling on an interval swallow transient errors (stale cache
    /// wins over a gap); terminal errors are worth surfacing.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::RateLimited { .. }
            | MarketDataError::Timeout { .. }
            | MarketDataError::Network(_) => true,
            MarketDataError::ProviderError { .. } | MarketDataError::UnexpectedResponse { .. } => {
                true
            }
            MarketDataError::SymbolNotFound(_) | MarketDataError::NotSupported { .. } => false,
        }
    }
}
