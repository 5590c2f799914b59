//! Logging setup for the `aidoc` binary.
//!
//! Logs go to stderr so stdout stays clean for JSON output.

use anyhow::anyhow;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(json: bool) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init subscriber: {e}"))
}
