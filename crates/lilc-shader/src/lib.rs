//! Shader container expansion engine.
//!
//! A container document names the blocks a shader is assembled from. This
//! crate resolves those blocks for a target render pipeline and package
//! version, splices them into one text, and rewrites the placeholders they
//! carry.
//!
//! # Architecture
//!
//! - [`multi_compile_fragment`]: canned multi-compile directive blocks
//!   selected by pipeline, version and DOTS flag
//! - [`BlockResolver`]: maps block references to files, including the
//!   dual emission of universal pipeline subshaders
//! - [`LineKind`]: the container directive set, scanned line by line
//! - Overlay ([`ReplaceRule`], [`InsertRule`]): names, conditional
//!   find/replace rules and insert fragments read next to the container
//! - Substitution: the fixed-order placeholder pass
//!
//! [`ContainerUnpacker`] runs all stages. Missing files never abort an
//! unpack; they are reported in [`UnpackResult::warnings`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use lilc_shader::{ContainerUnpacker, UnpackerConfig, VersionContext};
//!
//! let config = UnpackerConfig::new()
//!     .with_version(VersionContext::universal(12))
//!     .with_resources_dir("Assets/lilToon/CustomShaderResources");
//! let result = ContainerUnpacker::with_config(config)
//!     .unpack(Path::new("Assets/MyShader/MyShader.lilcontainer"))
//!     .unwrap();
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod args;
mod consts;
mod context;
mod fragments;
mod interpreter;
mod overlay;
mod replacements;
mod resolver;
mod settings;
mod skip_variants;
mod substitution;
mod unpacker;
mod version;

pub use args::QuotedArgs;
pub use consts::OVERLAY_FILE_NAME;
pub use context::{Diagnostics, ReadFileFn, SourceContext};
pub use fragments::{
    MultiCompileStage, expand_multi_compiles, multi_compile_fragment, multi_compile_lines,
};
pub use interpreter::LineKind;
pub use overlay::{Condition, InsertRule, InsertSlot, ReplaceRule};
pub use replacements::ReplaceTable;
pub use resolver::{BlockCategory, BlockResolver};
pub use settings::{FlagStore, SettingMode, build_shader_setting};
pub use skip_variants::{SkipVariantCategory, expand_skip_variants};
pub use substitution::{fix_newline_escapes, fix_relative_includes, light_modes};
pub use unpacker::{
    ContainerUnpacker, DEFAULT_INDENT, DEFAULT_RESOURCES_DIR, DEFAULT_SHADER_LIBS_DIR,
    UnpackError, UnpackResult, UnpackerConfig,
};
pub use version::{ParsePipelineError, PipelineKind, VersionContext};
