//! CLI error types.

use lilc_config::ConfigError;
use lilc_shader::UnpackError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unpack(#[from] UnpackError),
}
