//! Container unpacking.
//!
//! Ties the stages together for one container: scan the container, expand
//! multi-compile markers, load the overlay, run the substitution pass.

use std::io;
use std::path::{Path, PathBuf};

use crate::context::{Diagnostics, ReadFileFn, SourceContext, UnpackState, default_read_file};
use crate::fragments::expand_multi_compiles;
use crate::interpreter::interpret_container;
use crate::overlay::load_overlay;
use crate::resolver::BlockResolver;
use crate::settings::{FlagStore, SettingMode, build_shader_setting};
use crate::substitution::SubstitutionPass;
use crate::version::{PipelineKind, VersionContext};

/// Default root of the built-in `Default` blocks.
pub const DEFAULT_RESOURCES_DIR: &str = "Assets/lilToon/CustomShaderResources";

/// Default folder substituted for the `Includes` include prefix.
pub const DEFAULT_SHADER_LIBS_DIR: &str = "Assets/lilToon/Shader/Includes";

/// Default indentation of generated directive lines.
pub const DEFAULT_INDENT: usize = 12;

/// Error returned when a container cannot be unpacked at all.
///
/// Problems with referenced blocks are never errors; they end up in
/// [`UnpackResult::warnings`].
#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
    #[error("Failed to read container {}: {source}", path.display())]
    ReadContainer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Output of one unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackResult {
    /// Assembled shader source.
    pub shader: String,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<String>,
    /// Every file read, container first.
    pub dependencies: Vec<PathBuf>,
}

/// Configuration for the container unpacker.
pub struct UnpackerConfig {
    /// Target pipeline and package version.
    pub version: VersionContext,
    /// Root of the built-in `Default` blocks.
    pub resources_dir: PathBuf,
    /// Folder substituted for the `Includes` include prefix.
    pub shader_libs_dir: String,
    /// Indentation of generated directive lines.
    ///
    /// Default: 12
    pub indent: usize,
    /// Prefix relative includes with the container's folder.
    pub rewrite_relative_includes: bool,
    /// Feature flags for the shader settings.
    ///
    /// Default: empty store, every flag takes its default
    pub flags: FlagStore,
    /// Callback to read files.
    ///
    /// Default: `std::fs::read_to_string`
    pub read_file: Option<Box<ReadFileFn>>,
}

impl Default for UnpackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl UnpackerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: VersionContext::legacy(),
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            shader_libs_dir: DEFAULT_SHADER_LIBS_DIR.to_owned(),
            indent: DEFAULT_INDENT,
            rewrite_relative_includes: false,
            flags: FlagStore::new(),
            read_file: None,
        }
    }

    /// Set the target pipeline version.
    #[must_use]
    pub fn with_version(mut self, version: VersionContext) -> Self {
        self.version = version;
        self
    }

    /// Set the built-in blocks root.
    #[must_use]
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = dir.into();
        self
    }

    /// Set the shader library folder.
    #[must_use]
    pub fn with_shader_libs_dir(mut self, dir: impl Into<String>) -> Self {
        self.shader_libs_dir = dir.into();
        self
    }

    /// Set the indentation of generated directive lines.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enable or disable the relative include rewrite.
    #[must_use]
    pub fn with_rewrite_relative_includes(mut self, enabled: bool) -> Self {
        self.rewrite_relative_includes = enabled;
        self
    }

    /// Set the feature flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FlagStore) -> Self {
        self.flags = flags;
        self
    }

    /// Set the file reading callback.
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + Sync + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    fn reader(&self) -> &ReadFileFn {
        self.read_file
            .as_deref()
            .unwrap_or(&default_read_file as &ReadFileFn)
    }
}

/// Expands shader containers into shader source.
///
/// The unpacker holds configuration only; every call to
/// [`unpack`](Self::unpack) starts from fresh state.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use lilc_shader::{ContainerUnpacker, UnpackerConfig, VersionContext};
///
/// let config = UnpackerConfig::new()
///     .with_version(VersionContext::legacy())
///     .with_read_file(|path: &Path| {
///         if path.ends_with("Toon.lilcontainer") {
///             Ok("Shader \"Toon\" {}\n".to_owned())
///         } else {
///             Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
///         }
///     });
///
/// let result = ContainerUnpacker::with_config(config)
///     .unpack(Path::new("Assets/Toon.lilcontainer"))
///     .unwrap();
/// assert_eq!(result.shader, "Shader \"Toon\" {}\n");
/// // No overlay next to the container.
/// assert_eq!(result.warnings.len(), 1);
/// ```
pub struct ContainerUnpacker {
    config: UnpackerConfig,
}

impl Default for ContainerUnpacker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerUnpacker {
    /// Create an unpacker with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(UnpackerConfig::default())
    }

    /// Create an unpacker with custom configuration.
    #[must_use]
    pub fn with_config(config: UnpackerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &UnpackerConfig {
        &self.config
    }

    /// Unpack the container at `container_path`.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::ReadContainer`] if the container itself cannot
    /// be read. Missing blocks, overlay or inserts are reported as warnings.
    pub fn unpack(&self, container_path: &Path) -> Result<UnpackResult, UnpackError> {
        let config = &self.config;
        let version = config.version;
        let read_file = config.reader();

        let source_text = read_file(container_path).map_err(|source| UnpackError::ReadContainer {
            path: container_path.to_path_buf(),
            source,
        })?;

        let asset_name = container_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut diag = Diagnostics::new(asset_name);
        diag.depends_on(container_path);

        let source = SourceContext {
            asset_dir: container_path.parent().unwrap_or_else(|| Path::new("")),
            resources_dir: &config.resources_dir,
            read_file,
        };
        let resolver = BlockResolver::new(source, version, config.indent);
        let mut state = UnpackState::new(self.inline_shader_setting());

        tracing::debug!(path = %container_path.display(), %version, "Unpacking container");
        let mut text = interpret_container(&source_text, &resolver, &mut state, &mut diag);
        if version.pipeline != PipelineKind::Universal {
            text = expand_multi_compiles(&text, version, config.indent, false);
        }

        load_overlay(&resolver, &mut state, &mut diag);

        let include_prefix = source.asset_dir_prefix();
        let pass = SubstitutionPass {
            version,
            indent: config.indent,
            shader_libs_dir: &config.shader_libs_dir,
            include_prefix: config
                .rewrite_relative_includes
                .then_some(include_prefix.as_str()),
        };
        let shader = pass.run(text, &state);

        let (warnings, dependencies) = diag.into_parts();
        tracing::info!(
            path = %container_path.display(),
            warnings = warnings.len(),
            dependencies = dependencies.len(),
            "Unpacked container"
        );
        Ok(UnpackResult {
            shader,
            warnings,
            dependencies,
        })
    }

    /// Shader settings spliced at `*LIL_SHADER_SETTING*`, indented to match
    /// the generated directive lines.
    fn inline_shader_setting(&self) -> String {
        let separator = format!("\n{}", " ".repeat(self.config.indent));
        build_shader_setting(&self.config.flags, SettingMode::Inline).replace('\n', &separator)
    }
}
