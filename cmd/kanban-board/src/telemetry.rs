//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over `log.filter` when set.

use anyhow::{anyhow, Result};
use configs::{LogFormat, LogSettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(settings: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|err| anyhow!("invalid log filter '{}': {err}", settings.filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    match settings.format {
        // One JSON object per event, for log shippers.
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    }
    .map_err(|err| anyhow!(err))
}
