//! Unified logging integration
//!
//! Installs a `tracing` subscriber once per process, filtered through
//! `RUST_LOG` (default `info`).

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(init_tracing);
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    // Another subscriber may already be installed by the host application.
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::info!("📝 Initialized tracing logging");
    }
}

/// Order lifecycle event: submitted, cancelled, filled
#[macro_export]
macro_rules! log_order {
    ($action:expr, $order_id:expr, $pair:expr) => {
        tracing::info!("📋 ORDER {}: {} ({})", $action, $order_id, $pair);
    };
}

#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::error!("❌ {} failed: {}", $operation, $error);
    };
}
