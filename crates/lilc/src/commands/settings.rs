//! `lilc settings` command implementation.

use std::path::PathBuf;

use clap::Args;
use lilc_config::Config;
use lilc_shader::{FlagStore, SettingMode, build_shader_setting};

use crate::error::CliError;
use crate::output::Output;

/// Default file name of the shader-setting include.
const DEFAULT_SETTING_FILE: &str = "lilToonSetting.hlsl";

/// Arguments for the settings command.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// Output file (default: lilToonSetting.hlsl in the current directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover lilc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SettingsArgs {
    /// Execute the settings command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the file cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let flags = config.flag_store().unwrap_or_else(|| {
            output.warning("No [flags] section in config, every feature uses its default");
            FlagStore::new()
        });
        let text = build_shader_setting(&flags, SettingMode::File);

        let path = self
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTING_FILE));
        std::fs::write(&path, text)?;

        output.success(&format!("Shader settings written to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_writes_guarded_header() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("lilc.toml");
        std::fs::write(&config, "[flags]\nLIL_FEATURE_SHADOW = true\n").unwrap();
        let path = dir.path().join("lilToonSetting.hlsl");

        SettingsArgs {
            output: Some(path.clone()),
            config: Some(config),
        }
        .execute()
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("#ifndef LIL_SETTING_INCLUDED\n#define LIL_SETTING_INCLUDED\n"));
        assert!(text.ends_with("#endif"));
        assert!(text.contains("#define LIL_FEATURE_SHADOW\n"));
    }
}
