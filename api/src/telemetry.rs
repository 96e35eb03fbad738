//! Structured logging initialisation
//!
//! `RUST_LOG` overrides the configured filter when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cs_shared::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber. Fails if one is already set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
    }

    Ok(())
}
