//! Creates the `tracing` subscriber used when the crate is built
//! with the `tracing` feature, bridging `log` records into spans.
//!
//! Filtering follows the `RUST_LOG` environment variable:
//! ```bash
//! RUST_LOG=mapc=debug
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialises the tracer, using tracing subscription.
/// This is optional, not calling this function will simply
/// not log traces.
pub fn initialize_tracer() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    // Initialise tracing with subscribers and environment filter
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .init();
}
