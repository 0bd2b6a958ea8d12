//! Configuration management for lilc.
//!
//! Parses `lilc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support `${VAR}` and `${VAR:-default}`:
//! - `paths.resources_dir`
//! - `paths.shader_libs_dir`

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lilc_shader::{
    DEFAULT_INDENT, DEFAULT_RESOURCES_DIR, DEFAULT_SHADER_LIBS_DIR, FlagStore, PipelineKind,
    UnpackerConfig, VersionContext,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override target pipeline.
    pub pipeline: Option<PipelineKind>,
    /// Override pipeline package major version.
    pub major: Option<u32>,
    /// Override pipeline package minor version.
    pub minor: Option<u32>,
    /// Override built-in blocks root.
    pub resources_dir: Option<PathBuf>,
    /// Override indentation of generated lines.
    pub indent: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lilc.toml";

/// Upper bound for `output.indent`.
const MAX_INDENT: usize = 64;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target pipeline and package version.
    pub pipeline: PipelineConfig,
    /// Path settings as written in TOML.
    paths: PathsConfigRaw,
    /// Output formatting.
    pub output: OutputConfig,
    /// Feature flags for the shader settings (optional section).
    pub flags: Option<HashMap<String, bool>>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Pipeline selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target pipeline.
    pub kind: PipelineKind,
    /// Pipeline package major version.
    pub major: u32,
    /// Pipeline package minor version.
    pub minor: u32,
}

/// Raw path configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    resources_dir: Option<String>,
    shader_libs_dir: Option<String>,
}

/// Resolved path configuration.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Root of the built-in `Default` blocks.
    pub resources_dir: PathBuf,
    /// Folder substituted for the `Includes` include prefix.
    ///
    /// Kept as text: it is written into the shader, not opened.
    pub shader_libs_dir: String,
}

/// Output formatting.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indentation of generated directive lines.
    pub indent: usize,
    /// Prefix relative includes with the container's folder.
    pub rewrite_relative_includes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            rewrite_relative_includes: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`paths.resources_dir`").
        field: String,
        /// Error message (e.g., "${`LILC_RESOURCES`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lilc.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Target pipeline and package version.
    #[must_use]
    pub fn version(&self) -> VersionContext {
        VersionContext::new(self.pipeline.kind, self.pipeline.major, self.pipeline.minor)
    }

    /// Feature flags, or `None` when the `[flags]` section is absent.
    #[must_use]
    pub fn flag_store(&self) -> Option<FlagStore> {
        self.flags.clone().map(FlagStore::from)
    }

    /// Build an unpacker configuration from the loaded values.
    #[must_use]
    pub fn unpacker_config(&self) -> UnpackerConfig {
        UnpackerConfig::new()
            .with_version(self.version())
            .with_resources_dir(self.paths_resolved.resources_dir.clone())
            .with_shader_libs_dir(self.paths_resolved.shader_libs_dir.clone())
            .with_indent(self.output.indent)
            .with_rewrite_relative_includes(self.output.rewrite_relative_includes)
            .with_flags(self.flag_store().unwrap_or_default())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.indent > MAX_INDENT {
            return Err(ConfigError::Validation(format!(
                "output.indent cannot exceed {MAX_INDENT}"
            )));
        }
        if self.paths_resolved.shader_libs_dir.is_empty() {
            return Err(ConfigError::Validation(
                "paths.shader_libs_dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(kind) = settings.pipeline {
            self.pipeline.kind = kind;
        }
        if let Some(major) = settings.major {
            self.pipeline.major = major;
        }
        if let Some(minor) = settings.minor {
            self.pipeline.minor = minor;
        }
        if let Some(resources_dir) = &settings.resources_dir {
            self.paths_resolved.resources_dir.clone_from(resources_dir);
        }
        if let Some(indent) = settings.indent {
            self.output.indent = indent;
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            paths: PathsConfigRaw::default(),
            output: OutputConfig::default(),
            flags: None,
            paths_resolved: PathsConfig {
                resources_dir: base.join(DEFAULT_RESOURCES_DIR),
                shader_libs_dir: DEFAULT_SHADER_LIBS_DIR.to_owned(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.paths.resources_dir {
            self.paths.resources_dir = Some(expand::expand_env(dir, "paths.resources_dir")?);
        }
        if let Some(ref dir) = self.paths.shader_libs_dir {
            self.paths.shader_libs_dir = Some(expand::expand_env(dir, "paths.shader_libs_dir")?);
        }
        Ok(())
    }

    /// Resolve `resources_dir` against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resources_dir = self
            .paths
            .resources_dir
            .as_deref()
            .unwrap_or(DEFAULT_RESOURCES_DIR);
        self.paths_resolved = PathsConfig {
            resources_dir: config_dir.join(resources_dir),
            shader_libs_dir: self
                .paths
                .shader_libs_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_SHADER_LIBS_DIR.to_owned()),
        };
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/project"));
        assert_eq!(config.version(), VersionContext::legacy());
        assert_eq!(
            config.paths_resolved.resources_dir,
            PathBuf::from("/project/Assets/lilToon/CustomShaderResources")
        );
        assert_eq!(
            config.paths_resolved.shader_libs_dir,
            "Assets/lilToon/Shader/Includes"
        );
        assert_eq!(config.output.indent, 12);
        assert!(!config.output.rewrite_relative_includes);
        assert!(config.flag_store().is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.pipeline.kind, PipelineKind::Legacy);
        assert_eq!(config.output.indent, 12);
    }

    #[test]
    fn test_parse_pipeline_short_names() {
        let config: Config = toml::from_str(
            r#"
[pipeline]
kind = "urp"
major = 12
minor = 1
"#,
        )
        .unwrap();
        assert_eq!(config.version(), VersionContext::new(PipelineKind::Universal, 12, 1));

        let config: Config = toml::from_str("[pipeline]\nkind = \"high-definition\"\n").unwrap();
        assert_eq!(config.pipeline.kind, PipelineKind::HighDefinition);
    }

    #[test]
    fn test_parse_unknown_pipeline_fails() {
        let result: Result<Config, _> = toml::from_str("[pipeline]\nkind = \"mobile\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flags() {
        let config: Config = toml::from_str(
            r"
[flags]
LIL_FEATURE_SHADOW = true
LIL_FEATURE_EMISSION_1ST = false
",
        )
        .unwrap();
        let flags = config.flag_store().unwrap();
        assert_eq!(flags.len(), 2);
        assert!(flags.get("LIL_FEATURE_SHADOW", false));
        assert!(!flags.get("LIL_FEATURE_EMISSION_1ST", true));
    }

    #[test]
    fn test_resolve_paths() {
        let mut config: Config = toml::from_str(
            r#"
[paths]
resources_dir = "Shared/Resources"
shader_libs_dir = "Packages/jp.lilxyzw.liltoon/Shader/Includes"
"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.paths_resolved.resources_dir,
            PathBuf::from("/project/Shared/Resources")
        );
        assert_eq!(
            config.paths_resolved.shader_libs_dir,
            "Packages/jp.lilxyzw.liltoon/Shader/Includes"
        );
    }

    #[test]
    fn test_validate_indent_limit() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.output.indent = 65;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.indent"));
    }

    #[test]
    fn test_validate_empty_shader_libs_dir() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.paths_resolved.shader_libs_dir = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/lilc.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lilc.toml");
        std::fs::write(
            &path,
            "[paths]\nresources_dir = \"Resources\"\n\n[output]\nindent = 8\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.paths_resolved.resources_dir, dir.path().join("Resources"));
        assert_eq!(config.output.indent, 8);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lilc.toml");
        std::fs::write(&path, "[pipeline]\nkind = \"urp\"\nmajor = 10\n").unwrap();

        let settings = CliSettings {
            major: Some(12),
            resources_dir: Some(PathBuf::from("/elsewhere")),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.version(), VersionContext::universal(12));
        assert_eq!(config.paths_resolved.resources_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_load_rejects_cli_indent_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lilc.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            indent: Some(100),
            ..CliSettings::default()
        };
        let result = Config::load(Some(&path), Some(&settings));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_expands_env_in_paths() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("LILC_TEST_CONFIG_LIBS", "Packages/lil/Includes");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lilc.toml");
        std::fs::write(
            &path,
            "[paths]\nshader_libs_dir = \"${LILC_TEST_CONFIG_LIBS}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.paths_resolved.shader_libs_dir, "Packages/lil/Includes");
        unsafe {
            std::env::remove_var("LILC_TEST_CONFIG_LIBS");
        }
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lilc.toml"), "").unwrap();
        let nested = dir.path().join("Assets/Shaders");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config(&nested), Some(dir.path().join("lilc.toml")));
    }

    #[test]
    fn test_unpacker_config_carries_values() {
        let mut config: Config = toml::from_str(
            r#"
[pipeline]
kind = "hdrp"
major = 12

[output]
indent = 4
rewrite_relative_includes = true

[flags]
LIL_FEATURE_SHADOW = true
"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/project"));

        let unpacker = config.unpacker_config();
        assert_eq!(unpacker.version, VersionContext::high_definition(12));
        assert_eq!(unpacker.indent, 4);
        assert!(unpacker.rewrite_relative_includes);
        assert!(unpacker.flags.get("LIL_FEATURE_SHADOW", false));
        assert_eq!(
            unpacker.resources_dir,
            PathBuf::from("/project/Assets/lilToon/CustomShaderResources")
        );
    }

    #[test]
    fn test_unpacker_config_without_flags_uses_empty_store() {
        let config = Config::default_with_base(Path::new("/project"));
        assert!(config.flag_store().is_none());

        let unpacker = config.unpacker_config();
        assert!(unpacker.flags.is_empty());
        assert!(unpacker.flags.get("LIL_OPTIMIZE_USE_FORWARDADD", true));
    }
}
