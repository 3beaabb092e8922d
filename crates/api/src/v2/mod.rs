//! Tokenomy REST API v2
//!
//! Public market data needs no credentials. User and trade endpoints are
//! signed with the API token and secret, see [`auth`].

pub mod auth;
pub mod endpoint;
pub mod params;
pub mod response;
pub mod rest;
pub mod trade;
pub mod types;

pub use auth::{Credentials, RequestSigner, SignedRequest};
pub use endpoint::Endpoint;
pub use params::{Param, Params};
pub use rest::{Authentication, Client, Environment};
pub use trade::{CancelRequest, HistoryQuery, SortOrder, WithdrawRequest};
pub use types::*;

/// Production API address
pub const DEFAULT_ADDRESS: &str = "https://api.tokenomy.com";

/// Largest page size the server accepts
pub const DEFAULT_LIMIT: i64 = 1000;

/// Header carrying the API token
pub const HEADER_KEY: &str = "Key";

/// Header carrying the request signature
pub const HEADER_SIGN: &str = "Sign";
