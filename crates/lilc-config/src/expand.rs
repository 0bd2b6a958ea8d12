//! `${VAR}` expansion for path strings.
//!
//! - `${VAR}` expands to the value of VAR and fails when it is unset
//! - `${VAR:-default}` falls back to `default` when VAR is unset
//!
//! Values without `${` are returned untouched, bare `$` included. Once a
//! value contains `${`, bare `$VAR` references in it are expanded too and
//! fail the same way when unset.

use crate::ConfigError;

/// Expand `${...}` references in a configuration value.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct UnsetVar(String);
