//! Per-invocation unpack context.
//!
//! Everything an unpack reads or accumulates lives here and is created fresh
//! for each container, so concurrent unpacks share nothing.

use std::io;
use std::path::{Path, PathBuf};

use crate::overlay::InsertSlot;
use crate::replacements::ReplaceTable;

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send + Sync;

/// Default file reading function.
pub(crate) fn default_read_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// File system access for one container.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use lilc_shader::SourceContext;
///
/// let ctx = SourceContext {
///     asset_dir: Path::new("Assets/Shaders"),
///     resources_dir: Path::new("Assets/lilToon/CustomShaderResources"),
///     read_file: &|_| Ok(String::new()),
/// };
///
/// assert_eq!(ctx.resolve_path("Pass.lilblock"), Path::new("Assets/Shaders/Pass.lilblock"));
/// ```
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    /// Folder containing the container document.
    pub asset_dir: &'a Path,
    /// Root of the built-in `Default` blocks.
    pub resources_dir: &'a Path,
    /// Callback to read a file.
    pub read_file: &'a ReadFileFn,
}

impl SourceContext<'_> {
    /// Resolve a path relative to the container's folder.
    #[must_use]
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        self.asset_dir.join(relative)
    }

    /// Resolve a file inside a subfolder of the built-in resources.
    #[must_use]
    pub fn resources_path(&self, folder: &str, file_name: &str) -> PathBuf {
        self.resources_dir.join(folder).join(file_name)
    }

    /// Read a file using the context's callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, path: &Path) -> io::Result<String> {
        (self.read_file)(path)
    }

    /// Container folder as a forward-slash prefix with a trailing `/`.
    ///
    /// Empty when the container sits in the working directory.
    #[must_use]
    pub fn asset_dir_prefix(&self) -> String {
        let dir = self.asset_dir.to_string_lossy().replace('\\', "/");
        if dir.is_empty() || dir.ends_with('/') {
            dir
        } else {
            format!("{dir}/")
        }
    }
}

/// Warnings and source dependencies collected while unpacking.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    asset_name: String,
    warnings: Vec<String>,
    dependencies: Vec<PathBuf>,
}

impl Diagnostics {
    /// Create diagnostics for the named container.
    #[must_use]
    pub fn new(asset_name: impl Into<String>) -> Self {
        Self {
            asset_name: asset_name.into(),
            ..Self::default()
        }
    }

    /// Record a referenced file that could not be read.
    pub fn missing_file(&mut self, path: &Path, error: &io::Error) {
        tracing::debug!(
            asset = %self.asset_name,
            path = %path.display(),
            error = %error,
            "File not found"
        );
        self.warnings.push(format!(
            "[{}] File not found: {}",
            self.asset_name,
            path.display()
        ));
    }

    /// Record a directive line that lacks its expected arguments.
    pub fn malformed_line(&mut self, line: &str) {
        tracing::debug!(asset = %self.asset_name, line, "Malformed directive");
        self.warnings.push(format!(
            "[{}] Malformed directive: {}",
            self.asset_name,
            line.trim()
        ));
    }

    /// Record a file the output depends on.
    pub fn depends_on(&mut self, path: &Path) {
        if !self.dependencies.iter().any(|p| p == path) {
            self.dependencies.push(path.to_path_buf());
        }
    }

    /// Warnings in the order they were raised.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Files read successfully, in first-read order.
    #[must_use]
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// Split into warnings and dependencies.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<PathBuf>) {
        (self.warnings, self.dependencies)
    }
}

/// Slots filled while scanning the container and overlay, consumed by the
/// substitution pass.
#[derive(Debug, Default)]
pub(crate) struct UnpackState {
    /// Name from the first non-comment `Shader "..."` line.
    pub orig_shader_name: Option<String>,
    pub shader_name: String,
    pub editor_name: String,
    pub pass_shader_name: String,
    pub subshader_tags: String,
    pub subshader_insert: String,
    pub subshader_insert_post: String,
    pub shader_setting: String,
    inserts: [String; InsertSlot::ALL.len()],
    pub replaces: ReplaceTable,
}

impl UnpackState {
    pub fn new(shader_setting: String) -> Self {
        Self {
            shader_setting,
            ..Self::default()
        }
    }

    /// Captured original shader name, empty when none was declared.
    pub fn original_name(&self) -> &str {
        self.orig_shader_name.as_deref().unwrap_or_default()
    }

    pub fn insert(&self, slot: InsertSlot) -> &str {
        &self.inserts[slot.index()]
    }

    pub fn insert_mut(&mut self, slot: InsertSlot) -> &mut String {
        &mut self.inserts[slot.index()]
    }
}

/// In-memory file system for tests.
#[cfg(test)]
pub(crate) fn memory_fs(files: &[(&str, &str)]) -> Box<ReadFileFn> {
    let files: std::collections::HashMap<PathBuf, String> = files
        .iter()
        .map(|(path, text)| (PathBuf::from(path), (*text).to_owned()))
        .collect();
    Box::new(move |path: &Path| {
        files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(asset_dir: &'a Path, read_file: &'a ReadFileFn) -> SourceContext<'a> {
        SourceContext {
            asset_dir,
            resources_dir: Path::new("Resources"),
            read_file,
        }
    }

    #[test]
    fn test_resolve_path() {
        let read: &ReadFileFn = &|_| Ok(String::new());
        let ctx = source(Path::new("Assets/Shaders"), read);
        assert_eq!(
            ctx.resolve_path("Blocks/Pass.lilblock"),
            PathBuf::from("Assets/Shaders/Blocks/Pass.lilblock")
        );
        assert_eq!(
            ctx.resources_path("URP", "DefaultAll.lilblock"),
            PathBuf::from("Resources/URP/DefaultAll.lilblock")
        );
    }

    #[test]
    fn test_read_file_error() {
        let read: &ReadFileFn = &|_| Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        let ctx = source(Path::new("."), read);
        assert!(ctx.read(Path::new("missing")).is_err());
    }

    #[test]
    fn test_asset_dir_prefix() {
        let read: &ReadFileFn = &|_| Ok(String::new());
        assert_eq!(source(Path::new("Assets/Foo"), read).asset_dir_prefix(), "Assets/Foo/");
        assert_eq!(source(Path::new("Assets/Foo/"), read).asset_dir_prefix(), "Assets/Foo/");
        assert_eq!(source(Path::new(""), read).asset_dir_prefix(), "");
    }

    #[test]
    fn test_missing_file_warning_names_asset_and_path() {
        let mut diag = Diagnostics::new("Toon.lilcontainer");
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        diag.missing_file(Path::new("Assets/Missing.lilblock"), &err);
        assert_eq!(
            diag.warnings(),
            ["[Toon.lilcontainer] File not found: Assets/Missing.lilblock"]
        );
    }

    #[test]
    fn test_dependencies_deduplicated() {
        let mut diag = Diagnostics::new("a");
        diag.depends_on(Path::new("x"));
        diag.depends_on(Path::new("y"));
        diag.depends_on(Path::new("x"));
        assert_eq!(diag.dependencies(), [PathBuf::from("x"), PathBuf::from("y")]);
    }

    #[test]
    fn test_state_defaults() {
        let state = UnpackState::new("#define A\n".to_owned());
        assert_eq!(state.original_name(), "");
        assert_eq!(state.insert(InsertSlot::PassPre), "");
        assert_eq!(state.shader_setting, "#define A\n");
    }
}
