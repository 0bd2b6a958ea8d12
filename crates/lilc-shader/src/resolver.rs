//! Block reference resolution.
//!
//! A block reference is either a path relative to the container's folder or a
//! `Default...` name that selects one of the built-in blocks shipped for the
//! current pipeline. Unreadable files are reported through [`Diagnostics`] and
//! contribute no text.

use std::path::{Path, PathBuf};

use crate::consts::{
    BLOCK_EXTENSION, DEFAULT_MARKER, DOTS_SM_4_5, DOTS_SM_4_5_OR_3_5, DOTS_SM_TAGS,
    PROPERTIES_FOLDER, USE_PASS_MARKER,
};
use crate::context::{Diagnostics, SourceContext};
use crate::fragments::{expand_multi_compiles, indent_join};
use crate::replacements::ReplaceTable;
use crate::version::{PipelineKind, VersionContext};

const SHADER_MODEL_4_5_TAG: &str = " \"ShaderModel\" = \"4.5\"";
const TARGET_4_5: &str = "#pragma target 4.5";
const TARGET_3_5: &str = "#pragma target 3.5";
const EXCLUDE_GL: &str = "#pragma exclude_renderers gles gles3 glcore";
const ONLY_GL: &str = "#pragma only_renderers gles gles3 glcore d3d11";

/// Kind of block a `Default` reference selects from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockCategory {
    /// Material properties, shared by every pipeline.
    Properties,
    /// Subshader bodies, one folder per pipeline.
    SubShader,
}

/// Resolves block references to text for one pipeline version.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use lilc_shader::{BlockCategory, BlockResolver, SourceContext, VersionContext};
///
/// let source = SourceContext {
///     asset_dir: Path::new("Assets/MyShader"),
///     resources_dir: Path::new("Resources"),
///     read_file: &|_| Ok(String::new()),
/// };
/// let resolver = BlockResolver::new(source, VersionContext::universal(12), 12);
///
/// assert_eq!(
///     resolver.resolve_default_or_explicit_path("DefaultAll", BlockCategory::SubShader),
///     Path::new("Resources/URP/DefaultAll.lilblock"),
/// );
/// assert_eq!(
///     resolver.resolve_default_or_explicit_path("Custom.lilblock", BlockCategory::SubShader),
///     Path::new("Assets/MyShader/Custom.lilblock"),
/// );
/// ```
#[derive(Clone, Copy)]
pub struct BlockResolver<'a> {
    source: SourceContext<'a>,
    version: VersionContext,
    indent: usize,
}

impl<'a> BlockResolver<'a> {
    /// Create a resolver.
    ///
    /// `indent` is the indentation of generated directive lines.
    #[must_use]
    pub fn new(source: SourceContext<'a>, version: VersionContext, indent: usize) -> Self {
        Self {
            source,
            version,
            indent,
        }
    }

    /// File access used by this resolver.
    #[must_use]
    pub fn source(&self) -> &SourceContext<'a> {
        &self.source
    }

    /// Pipeline version this resolver selects for.
    #[must_use]
    pub fn version(&self) -> VersionContext {
        self.version
    }

    /// Indentation of generated directive lines.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Map a block name to a file path.
    ///
    /// Names containing `Default` without a `.lilblock` extension select a
    /// built-in block: `Properties/{name}.lilblock` for properties,
    /// `{pipeline}/{name}.lilblock` for subshaders. Anything else is relative
    /// to the container's folder.
    #[must_use]
    pub fn resolve_default_or_explicit_path(&self, name: &str, category: BlockCategory) -> PathBuf {
        if name.contains(DEFAULT_MARKER) && !name.contains(BLOCK_EXTENSION) {
            let folder = match category {
                BlockCategory::Properties => PROPERTIES_FOLDER,
                BlockCategory::SubShader => self.version.pipeline.short_name(),
            };
            self.source
                .resources_path(folder, &format!("{name}{BLOCK_EXTENSION}"))
        } else {
            self.source.resolve_path(name)
        }
    }

    /// Read a block, recording it as a dependency or reporting it missing.
    pub fn read_block(&self, path: &Path, diag: &mut Diagnostics) -> Option<String> {
        match self.source.read(path) {
            Ok(text) => {
                diag.depends_on(path);
                Some(text)
            }
            Err(e) => {
                diag.missing_file(path, &e);
                None
            }
        }
    }

    /// Resolve a `lilProperties` reference.
    pub fn resolve_properties_block(&self, reference: &str, diag: &mut Diagnostics) -> Option<String> {
        let path = self.resolve_default_or_explicit_path(reference, BlockCategory::Properties);
        self.read_block(&path, diag)
    }

    /// Resolve a subshader block reference.
    ///
    /// Under the universal pipeline a block that is not a `UsePass` block is
    /// emitted twice: a shader model 4.5 variant expanded with DOTS instancing,
    /// an empty line, then a GL-compatible variant expanded without it.
    pub fn resolve_subshader_block(&self, reference: &str, diag: &mut Diagnostics) -> Option<String> {
        let path = self.resolve_default_or_explicit_path(reference, BlockCategory::SubShader);
        let text = self.read_block(&path, diag)?;
        tracing::debug!(path = %path.display(), pipeline = %self.version, "Resolved subshader block");

        let use_pass = path.to_string_lossy().contains(USE_PASS_MARKER);
        if self.version.pipeline == PipelineKind::Universal && !use_pass {
            Some(self.universal_variants(&text))
        } else {
            Some(text)
        }
    }

    /// Resolve a plain reference relative to the container's folder.
    pub fn resolve_asset_block(&self, reference: &str, diag: &mut Diagnostics) -> Option<String> {
        self.read_block(&self.source.resolve_path(reference), diag)
    }

    /// Resolve an overlay insert reference.
    ///
    /// `{stem}{pipeline}{ext}` in the container's folder is tried first and
    /// its absence is silent; then the reference itself.
    pub fn resolve_insert_fragment(&self, reference: &str, diag: &mut Diagnostics) -> Option<String> {
        let pipeline_path = self.source.resolve_path(&pipeline_file_name(
            reference,
            self.version.pipeline,
        ));
        if let Ok(text) = self.source.read(&pipeline_path) {
            diag.depends_on(&pipeline_path);
            return Some(text);
        }
        self.resolve_asset_block(reference, diag)
    }

    fn universal_variants(&self, text: &str) -> String {
        let mut dots = text.to_owned();
        let mut compat = text.to_owned();

        let target_4_5 = indent_join(&[TARGET_4_5, EXCLUDE_GL], self.indent);
        let mut dots_tokens = ReplaceTable::new();
        dots_tokens.push(DOTS_SM_TAGS, SHADER_MODEL_4_5_TAG);
        dots_tokens.push(DOTS_SM_4_5, target_4_5.as_str());
        dots_tokens.push(DOTS_SM_4_5_OR_3_5, target_4_5);
        dots_tokens.apply(&mut dots);

        let mut compat_tokens = ReplaceTable::new();
        compat_tokens.push(DOTS_SM_TAGS, "");
        compat_tokens.push(DOTS_SM_4_5, ONLY_GL);
        compat_tokens.push(DOTS_SM_4_5_OR_3_5, indent_join(&[TARGET_3_5, ONLY_GL], self.indent));
        compat_tokens.apply(&mut compat);

        let dots = expand_multi_compiles(&dots, self.version, self.indent, true);
        let compat = expand_multi_compiles(&compat, self.version, self.indent, false);
        format!("{dots}\n\n{compat}")
    }
}

/// `{stem}{pipeline}{ext}` for a referenced file; the reference's folder is
/// dropped.
fn pipeline_file_name(reference: &str, pipeline: PipelineKind) -> String {
    let path = Path::new(reference);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{stem}{}{ext}", pipeline.short_name())
}
