//! Structured logging initialization

use crate::config::TelemetryConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "campus_core=info,campus_admin=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. With `log_format = "json"` event
/// fields are flattened so `message` is a top-level key.
pub fn init(config: &TelemetryConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so command output on stdout stays clean
    if is_json(config) {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }

    tracing::debug!(service = %config.service_name, "Logging initialized");
}

fn is_json(config: &TelemetryConfig) -> bool {
    config.log_format.eq_ignore_ascii_case("json")
}
