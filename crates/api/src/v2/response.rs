//! Response envelope decoding
//!
//! Successful responses wrap their payload as `{"data": ...}`. Failed ones
//! (HTTP status 400 and above) carry `{"code": ..., "error": ...}`.

use crate::errors::{ApiError, ExchangeError, Result};
use crate::traits::HttpResponse;
use crate::types::Snapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    // Required, but may be null
    #[serde(deserialize_with = "nullable")]
    data: Option<T>,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default, alias = "message")]
    error: String,
}

/// Decode `response` into `T`, or into the API error it reports
///
/// The payload's snapshot checks run before it is returned.
pub fn decode<T>(operation: &str, response: &HttpResponse) -> Result<T>
where
    T: DeserializeOwned + Snapshot,
{
    if response.status >= 400 {
        let err = decode_error(response);
        warn!("⚠️ {} failed: {}", operation, err);
        return Err(ExchangeError::Api(err));
    }

    let decode_failed = |message: String| ExchangeError::Decode {
        operation: operation.to_string(),
        message,
    };

    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| decode_failed(e.to_string()))?;

    let data = match envelope.data {
        Some(data) => data,
        None => T::from_null().ok_or_else(|| decode_failed("null data".to_string()))?,
    };

    data.verify()?;
    Ok(data)
}

/// API error carried by a failed response
///
/// A body that is not a JSON error object, or one without an error text,
/// becomes the message verbatim.
pub fn decode_error(response: &HttpResponse) -> ApiError {
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) if !body.error.is_empty() => ApiError {
            status: response.status,
            code: body.code,
            message: body.error,
        },
        Ok(body) => ApiError {
            status: response.status,
            code: body.code,
            message: response.body.trim().to_string(),
        },
        Err(_) => ApiError {
            status: response.status,
            code: 0,
            message: response.body.trim().to_string(),
        },
    }
}
