//! Tracing subscriber initialisation shared by the binaries

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter directive used when `RUST_LOG` is not set
///
/// `target` is the crate name as it appears in tracing targets
/// (`mspd_ps`, `mspd_pd`). The common library logs at the same level.
pub fn default_directive(target: &str, config: &LoggingConfig) -> String {
    let level = config.level.trim().to_ascii_lowercase();
    format!("{target}={level},mspd_common={level}")
}

/// Initialize tracing
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(target: &str, config: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(target, config).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
