//! Withdraw request identifiers
//!
//! Withdrawals are idempotent on the caller-supplied request id; resending the
//! same id never withdraws twice. These helpers generate ids that are unique
//! per process and safe to put in a form-encoded body.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

/// Upper bound on generated id length
pub const MAX_REQUEST_ID_LEN: usize = 36;

static GLOBAL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Idempotency key for a withdraw request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestId {
    /// Generate a fresh request id
    pub fn new() -> Self {
        Self(generate_id_with_prefix("WD"))
    }

    /// Wrap an id chosen by the caller, e.g. one persisted before a retry
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Generate a unique 12 character id
pub fn generate_id() -> String {
    nanoid!(12, &nanoid::alphabet::SAFE)
}

/// Generate a unique id of the form `{prefix}-{counter}-{nanoid}`, bounded by
/// [`MAX_REQUEST_ID_LEN`]
pub fn generate_id_with_prefix(prefix: &str) -> String {
    let counter = idgen_next_id();
    let id = format!("{prefix}-{counter:x}-{}", generate_id());
    id.chars().take(MAX_REQUEST_ID_LEN).collect()
}

/// Process-wide sequence number
pub fn idgen_next_id() -> u64 {
    GLOBAL_COUNTER.fetch_add(1, Ordering::SeqCst)
}
