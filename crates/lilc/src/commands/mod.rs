//! CLI command implementations.

pub(crate) mod settings;
pub(crate) mod unpack;

pub(crate) use settings::SettingsArgs;
pub(crate) use unpack::UnpackArgs;
