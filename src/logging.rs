//! Tracing/logging setup
//!
//! One subscriber for the whole binary; `RUST_LOG` overrides the default
//! `info` level. The engine itself never logs, it returns warnings; the
//! build driver is what reports them here.

use tracing_subscriber::{
    Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize tracing (uses RUST_LOG env var, defaults to `info`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
