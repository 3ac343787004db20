//! Tracing subscriber setup for embedders that want engine logs.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{GraphError, Result};

/// Installs a global `tracing` subscriber filtered by `directives`
/// (an `EnvFilter` string such as `"info"` or `"vireo=debug"`).
///
/// Optional: the engine logs through `tracing` macros either way, and an
/// embedder with its own subscriber should skip this. Calling it twice
/// fails, as does an unparsable directive string.
pub fn init_logging(directives: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directives)
        .map_err(|e| GraphError::InvalidArgument(format!("bad log filter {directives:?}: {e}")))?;
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| GraphError::InvalidArgument("logging already initialized".into()))
}
