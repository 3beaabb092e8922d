//! Client error types
//!
//! Four families of failure, each distinguishable by variant:
//! local validation (raised before any network call), transport, protocol
//! (the server answered with something we cannot accept), and API errors
//! reported by the exchange itself.

use crate::traits::TransportError;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Client operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    // Validation
    #[error("Invalid pair name: {0:?}")]
    InvalidPair(String),

    #[error("Invalid trade type: {0:?}")]
    InvalidTradeType(String),

    #[error("Trade type mismatch: expected {expected}, got {actual}")]
    TradeTypeMismatch { expected: String, actual: String },

    #[error("Invalid trade method: {0:?}")]
    InvalidMethod(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid trade ID: {0}")]
    InvalidTradeId(i64),

    #[error("Invalid or empty request ID")]
    InvalidRequestId,

    #[error("Invalid or empty asset name")]
    InvalidAsset,

    #[error("Invalid or empty wallet address")]
    InvalidAddress,

    #[error("Parameter {param} is not accepted by {endpoint}")]
    UnsupportedParameter { endpoint: String, param: String },

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Transport
    #[error("{operation}: transport error: {source}")]
    Transport {
        operation: String,
        #[source]
        source: TransportError,
    },

    // Protocol
    #[error("{operation}: cannot decode response: {message}")]
    Decode { operation: String, message: String },

    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),

    // Exchange
    #[error("{0}")]
    Api(ApiError),
}

impl ExchangeError {
    /// Whether the error was raised locally, before anything was sent
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ExchangeError::Transport { .. }
                | ExchangeError::Decode { .. }
                | ExchangeError::InconsistentSnapshot(_)
                | ExchangeError::Api(_)
        )
    }

    /// The exchange-reported error, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ExchangeError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for ExchangeError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<tokenomy_core::AmountError> for ExchangeError {
    fn from(err: tokenomy_core::AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Error reported by the exchange with a non-success HTTP status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API error {status} (code {code}): {message}")]
pub struct ApiError {
    /// HTTP status of the response
    pub status: u16,
    /// Exchange error code from the response body
    pub code: i64,
    pub message: String,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        ApiErrorKind::from(self.status)
    }
}

/// Coarse classification of API errors by HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    InsufficientBalance,
    PermissionDenied,
    NotFound,
    RateLimited,
    Server,
    Other,
}

impl From<u16> for ApiErrorKind {
    fn from(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            402 => ApiErrorKind::InsufficientBalance,
            403 => ApiErrorKind::PermissionDenied,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }
}
