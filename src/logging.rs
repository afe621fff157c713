//! stderr logging via `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

use crate::errors::{Result, SecTxtError};

/// Environment variable holding an `EnvFilter` directive that overrides the CLI verbosity.
pub const LOG_ENV: &str = "SECTXT_LOG";

/// Install the global subscriber. `default_directive` applies when `SECTXT_LOG` is unset
/// or unparsable.
pub fn initialize_logging(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| SecTxtError::internal_with("failed to initialize logging", e))
}
