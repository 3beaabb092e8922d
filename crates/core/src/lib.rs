//! # Tokenomy Core
//!
//! Building blocks shared by the Tokenomy API client.
//!
//! - **Exact amounts** - every price and volume is a reduced rational, never a float
//! - **Clocks** - injectable Unix-seconds source for replay-bound signing
//! - **Unified logging** - one `tracing` subscriber for the whole process
//! - **Request ids** - idempotency keys for withdrawals

pub mod amount;
pub mod timing;
pub mod logging;
pub mod id_gen;

// Re-export commonly used items
pub use amount::{Amount, AmountError};
pub use timing::{nanos, unix_to_datetime, Clock, FixedClock, PerfTimer, SystemClock};
pub use logging::init_logging;
pub use id_gen::{generate_id, RequestId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::amount::{Amount, AmountError};
    pub use crate::timing::{nanos, unix_to_datetime, Clock, FixedClock, PerfTimer, SystemClock};
    pub use crate::id_gen::{generate_id, generate_id_with_prefix, RequestId};
    pub use crate::logging::init_logging;

    // Common external types
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
