//! Placeholder substitution pass.
//!
//! Runs once over the assembled text in a fixed order: insert fragments,
//! the `"Includes` prefix, captured subshader slots and settings, shader and
//! editor names, skip-variant markers, light modes, pipeline tag rewrites,
//! overlay replace rules, and finally the relative include fixup. Each step
//! sees the output of the previous one, so a fragment may carry placeholders
//! resolved by a later step.

use crate::consts::{
    EDITOR_NAME, INCLUDE_DIRECTIVE, INCLUDE_ROOTS, INCLUDES_PREFIX, LIGHTMODE_FORWARD_0,
    LIGHTMODE_FORWARD_1, LIGHTMODE_FORWARD_2, PASS_SHADER_NAME_TOKEN, SHADER_NAME,
    SHADER_SETTING, SUBSHADER_INSERT_POST_TOKEN, SUBSHADER_INSERT_TOKEN, SUBSHADER_TAGS_TOKEN,
};
use crate::context::UnpackState;
use crate::fragments::expand_multi_compiles;
use crate::overlay::InsertSlot;
use crate::replacements::ReplaceTable;
use crate::skip_variants::expand_skip_variants;
use crate::version::{PipelineKind, VersionContext};

const HDRP_TAG_REWRITES: [(&str, &str); 6] = [
    (r#""RenderType" = "Opaque""#, r#""RenderType" = "HDLitShader""#),
    (r#""RenderType" = "Transparent""#, r#""RenderType" = "HDLitShader""#),
    (r#""RenderType" = "TransparentCutout""#, r#""RenderType" = "HDLitShader""#),
    (r#""Queue" = "AlphaTest+10""#, r#""Queue" = "Transparent""#),
    (r#""Queue" = "AlphaTest+55""#, r#""Queue" = "Transparent""#),
    (r#""Queue" = "Transparent-100""#, r#""Queue" = "Transparent""#),
];

/// Light mode names for the three forward light-mode slots.
///
/// # Example
///
/// ```
/// use lilc_shader::{VersionContext, light_modes};
///
/// assert_eq!(light_modes(VersionContext::legacy()), ["ForwardBase"; 3]);
/// assert_eq!(light_modes(VersionContext::universal(7))[0], "UniversalForward");
/// ```
#[must_use]
pub fn light_modes(version: VersionContext) -> [&'static str; 3] {
    match version.pipeline {
        PipelineKind::Legacy => ["ForwardBase"; 3],
        PipelineKind::Universal => match version.major {
            8 => ["SRPDefaultUnlit", "UniversalForward", "LightweightForward"],
            7 => ["UniversalForward", "LightweightForward", "SRPDefaultUnlit"],
            _ => ["SRPDefaultUnlit", "UniversalForward", "UniversalForwardOnly"],
        },
        PipelineKind::HighDefinition => ["ForwardOnly", "Forward", "SRPDefaultUnlit"],
    }
}

/// Light mode remap for `text`.
///
/// The high definition pipeline maps the second slot to its third name when
/// the third slot token is absent from the text.
fn light_mode_table(version: VersionContext, text: &str) -> ReplaceTable {
    let modes = light_modes(version);
    let mut table = ReplaceTable::new();
    if version.pipeline == PipelineKind::HighDefinition && !text.contains(LIGHTMODE_FORWARD_2) {
        table.push(LIGHTMODE_FORWARD_0, modes[0]);
        table.push(LIGHTMODE_FORWARD_1, modes[2]);
    } else {
        table.push(LIGHTMODE_FORWARD_0, modes[0]);
        table.push(LIGHTMODE_FORWARD_1, modes[1]);
        table.push(LIGHTMODE_FORWARD_2, modes[2]);
    }
    table
}

/// Turn `\r\n` escape sequences into line breaks.
///
/// A lone `\n` is kept as written.
#[must_use]
pub fn fix_newline_escapes(text: &str) -> String {
    text.replace("\\r\\n", "\n")
}

/// Prefix relative `#include "..."` paths with `prefix`.
///
/// Carriage returns are stripped and every line ends with `\n`. Includes
/// rooted at `Assets/` or `Packages/`, or already carrying `prefix`, are left
/// alone, so running the pass twice changes nothing. An empty prefix leaves
/// the text untouched.
///
/// # Example
///
/// ```
/// use lilc_shader::fix_relative_includes;
///
/// let once = fix_relative_includes("#include \"lil_common.hlsl\"\n", "Shaders/Custom/");
/// assert_eq!(once, "#include \"Shaders/Custom/lil_common.hlsl\"\n");
/// assert_eq!(fix_relative_includes(&once, "Shaders/Custom/"), once);
/// ```
#[must_use]
pub fn fix_relative_includes(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_owned();
    }

    let prefixed = format!("{INCLUDE_DIRECTIVE}{prefix}");
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.replace('\r', "");
        let relative = line.contains(INCLUDE_DIRECTIVE)
            && !INCLUDE_ROOTS.iter().any(|root| line.contains(root))
            && !line.contains(&prefixed);
        if relative {
            out.push_str(&line.replace(INCLUDE_DIRECTIVE, &prefixed));
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// Settings for the substitution pass.
pub(crate) struct SubstitutionPass<'a> {
    pub version: VersionContext,
    pub indent: usize,
    /// Replaces the `Includes` folder in include paths.
    pub shader_libs_dir: &'a str,
    /// Folder prefix for relative includes, `None` to keep them as is.
    pub include_prefix: Option<&'a str>,
}

impl SubstitutionPass<'_> {
    pub fn run(&self, mut text: String, state: &UnpackState) -> String {
        let mut placeholders = ReplaceTable::new();
        for slot in InsertSlot::ALL {
            let fragment = expand_multi_compiles(state.insert(slot), self.version, self.indent, false);
            placeholders.push(slot.token(), fragment);
        }
        placeholders.push(INCLUDES_PREFIX, format!("\"{}", self.shader_libs_dir));
        placeholders.push(SUBSHADER_INSERT_TOKEN, state.subshader_insert.as_str());
        placeholders.push(SUBSHADER_INSERT_POST_TOKEN, state.subshader_insert_post.as_str());
        placeholders.push(SHADER_SETTING, state.shader_setting.as_str());
        placeholders.push(PASS_SHADER_NAME_TOKEN, state.pass_shader_name.as_str());
        placeholders.push(SUBSHADER_TAGS_TOKEN, state.subshader_tags.as_str());
        placeholders.push(SHADER_NAME, state.shader_name.as_str());
        placeholders.push(EDITOR_NAME, state.editor_name.as_str());
        placeholders.apply(&mut text);

        let mut text = expand_skip_variants(&text);

        light_mode_table(self.version, &text).apply(&mut text);

        if self.version.pipeline == PipelineKind::HighDefinition {
            let mut tags = ReplaceTable::new();
            for (from, to) in HDRP_TAG_REWRITES {
                tags.push(from, to);
            }
            tags.apply(&mut text);
        }

        let mut user = ReplaceTable::new();
        for (from, to) in state.replaces.iter() {
            user.push(fix_newline_escapes(from), fix_newline_escapes(to));
        }
        user.apply(&mut text);

        match self.include_prefix {
            Some(prefix) => fix_relative_includes(&text, prefix),
            None => text,
        }
    }
}
