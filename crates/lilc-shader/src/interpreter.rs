//! Container document scanning.
//!
//! The container is read line by line. Lines mentioning a `lil` directive are
//! dispatched; everything else is copied to the output. A directive line with
//! a `//` before its first argument is copied verbatim instead of being
//! interpreted.
//!
//! ```text
//! Shader "Hidden/lilToonCustom"
//! {
//!     lilProperties "DefaultAll"
//!     lilPassShaderName "lilToon"
//!     lilSubShaderInsert "Insert.lilblock"
//!     lilSubShaderTags {"RenderType" = "Opaque"}
//!     lilSubShaderBRP "DefaultAll"
//!     lilSubShaderURP "DefaultAll"
//! }
//! ```

use crate::args::{braced, commented_before, commented_before_quote, first_quoted};
use crate::consts::{
    COMMENT, KEYWORD_MARKER, PASS_SHADER_NAME, PROPERTIES, SHADER_DECLARATION, SKIP_SETTINGS,
    SUBSHADER, SUBSHADER_INSERT, SUBSHADER_INSERT_POST, SUBSHADER_TAGS,
};
use crate::context::{Diagnostics, UnpackState};
use crate::resolver::BlockResolver;
use crate::version::PipelineKind;

/// Directive a container line carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Copied to the output.
    Literal,
    /// `lilSkipSettings`: drop the generated shader settings.
    SkipSettings,
    /// `lilProperties "name"`.
    Properties,
    /// `lilSubShader... "name"` for the current pipeline.
    SubShader,
    /// `lilSubShaderInsertPost "path"`.
    SubShaderInsertPost,
    /// `lilSubShaderInsert "path"`.
    SubShaderInsert,
    /// `lilSubShaderTags {...}`.
    SubShaderTags,
    /// Subshader directive for another pipeline; dropped.
    ForeignSubShader,
    /// `lilPassShaderName "name"`.
    PassShaderName,
}

impl LineKind {
    /// Classify a container line for `pipeline`.
    ///
    /// Subshader lines are matched on the pipeline short name first, then on
    /// insert-post, insert and tags, in that order.
    ///
    /// # Example
    ///
    /// ```
    /// use lilc_shader::{LineKind, PipelineKind};
    ///
    /// let line = r#"    lilSubShaderURP "DefaultAll""#;
    /// assert_eq!(LineKind::classify(line, PipelineKind::Universal), LineKind::SubShader);
    /// assert_eq!(LineKind::classify(line, PipelineKind::Legacy), LineKind::ForeignSubShader);
    /// ```
    #[must_use]
    pub fn classify(line: &str, pipeline: PipelineKind) -> Self {
        if !line.contains(KEYWORD_MARKER) {
            return Self::Literal;
        }
        if line.contains(SKIP_SETTINGS) {
            Self::SkipSettings
        } else if line.contains(PROPERTIES) {
            Self::Properties
        } else if line.contains(SUBSHADER) {
            if line.contains(pipeline.short_name()) {
                Self::SubShader
            } else if line.contains(SUBSHADER_INSERT_POST) {
                Self::SubShaderInsertPost
            } else if line.contains(SUBSHADER_INSERT) {
                Self::SubShaderInsert
            } else if line.contains(SUBSHADER_TAGS) {
                Self::SubShaderTags
            } else {
                Self::ForeignSubShader
            }
        } else if line.contains(PASS_SHADER_NAME) {
            Self::PassShaderName
        } else {
            Self::Literal
        }
    }
}

/// Scan a container document and return the assembled text.
///
/// Properties and subshader blocks are appended in place; inserts, tags and
/// the pass shader name are captured into `state` for the substitution pass.
pub(crate) fn interpret_container(
    source: &str,
    resolver: &BlockResolver<'_>,
    state: &mut UnpackState,
    diag: &mut Diagnostics,
) -> String {
    let mut out = String::with_capacity(source.len());
    let pipeline = resolver.version().pipeline;

    for line in source.lines() {
        if state.orig_shader_name.is_none() && line.starts_with(SHADER_DECLARATION) {
            if commented_before_quote(line) {
                push_line(&mut out, line);
                continue;
            }
            match first_quoted(line) {
                Some(name) => state.orig_shader_name = Some(name.to_owned()),
                None => diag.malformed_line(line),
            }
        }

        let kind = LineKind::classify(line, pipeline);
        tracing::trace!(?kind, line, "Container line");
        match kind {
            LineKind::Literal => push_line(&mut out, line),
            LineKind::SkipSettings => {
                if skip_settings_commented(line) {
                    push_line(&mut out, line);
                } else {
                    state.shader_setting.clear();
                }
            }
            LineKind::Properties => {
                if let Some(text) = quoted_reference(line, &mut out, diag)
                    .and_then(|r| resolver.resolve_properties_block(r, diag))
                {
                    push_line(&mut out, &text);
                }
            }
            LineKind::SubShader => {
                if let Some(text) = quoted_reference(line, &mut out, diag)
                    .and_then(|r| resolver.resolve_subshader_block(r, diag))
                {
                    push_line(&mut out, &text);
                }
            }
            LineKind::SubShaderInsertPost => {
                if let Some(text) = quoted_reference(line, &mut out, diag)
                    .and_then(|r| resolver.resolve_asset_block(r, diag))
                {
                    state.subshader_insert_post = text;
                }
            }
            LineKind::SubShaderInsert => {
                if let Some(text) = quoted_reference(line, &mut out, diag)
                    .and_then(|r| resolver.resolve_asset_block(r, diag))
                {
                    state.subshader_insert = text;
                }
            }
            LineKind::SubShaderTags => {
                if commented_before(line, '{') {
                    push_line(&mut out, line);
                } else if let Some(tags) = braced(line) {
                    state.subshader_tags = tags.to_owned();
                } else {
                    diag.malformed_line(line);
                }
            }
            LineKind::PassShaderName => {
                if let Some(name) = quoted_reference(line, &mut out, diag) {
                    state.pass_shader_name = name.to_owned();
                }
            }
            LineKind::ForeignSubShader => {}
        }
    }

    out
}

/// First quoted argument of a directive line.
///
/// A commented-out line is copied to `out`; a line without an argument is
/// reported. Both yield `None`.
fn quoted_reference<'l>(line: &'l str, out: &mut String, diag: &mut Diagnostics) -> Option<&'l str> {
    if commented_before_quote(line) {
        push_line(out, line);
        return None;
    }
    let reference = first_quoted(line);
    if reference.is_none() {
        diag.malformed_line(line);
    }
    reference
}

/// `lilSkipSettings` is commented out when `//` appears before its first
/// character.
fn skip_settings_commented(line: &str) -> bool {
    line.find(SKIP_SETTINGS)
        .is_some_and(|pos| line[..=pos].contains(COMMENT))
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
