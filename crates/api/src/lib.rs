//! # Tokenomy API
//!
//! Client for the Tokenomy exchange REST API v2.
//!
//! ## Architecture
//!
//! - **Exact amounts** - prices and volumes are rationals end to end
//! - **Signed requests** - HMAC-SHA512 over sorted form-encoded parameters
//! - **Local validation** - bad orders fail before anything is sent
//! - **Pluggable transport** - blocking reqwest by default, any [`Transport`] in tests
//! - **Snapshot checks** - every decoded order is checked for fill consistency

pub mod errors;
#[cfg(feature = "blocking-http")]
pub mod http;
pub mod traits;
pub mod types;
pub mod v2;

// Re-export main types
pub use errors::{ApiError, ApiErrorKind, ExchangeError, Result};
#[cfg(feature = "blocking-http")]
pub use http::ReqwestTransport;
pub use traits::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::*;
pub use v2::{Client, Environment};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::errors::{ApiError, ApiErrorKind, ExchangeError, Result};
    #[cfg(feature = "blocking-http")]
    pub use crate::http::ReqwestTransport;
    pub use crate::traits::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
    pub use crate::types::*;
    pub use crate::v2::{
        Authentication, CancelRequest, Client, Credentials, Environment, HistoryQuery,
        RequestSigner, SortOrder, WithdrawRequest,
    };
    pub use tokenomy_core::prelude::*;
}
