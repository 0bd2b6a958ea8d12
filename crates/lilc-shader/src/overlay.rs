//! Overlay document loading.
//!
//! The overlay (`lilCustomShaderDatas.lilblock`, next to the container) names
//! the shader, names its editor, and adds find/replace rules and insert
//! fragments. Rules and inserts may be gated on the original shader name:
//!
//! ```text
//! ShaderName "MyToon"
//! EditorName "MyToonInspector"
//! Replace "!Outline" "_Color" "_BaseColor"
//! InsertPassPre "Outline" "OutlinePre.lilblock"
//! ```

use crate::args::{QuotedArgs, first_quoted};
use crate::consts::{
    INSERT_PASS_POST, INSERT_PASS_PRE, INSERT_USEPASS_POST, INSERT_USEPASS_PRE, NEGATION,
    OVERLAY_FILE_NAME, SHADER_NAME, TAG_EDITOR_NAME, TAG_INSERT, TAG_INSERT_PASS_POST,
    TAG_INSERT_PASS_PRE, TAG_INSERT_USEPASS_POST, TAG_INSERT_USEPASS_PRE, TAG_REPLACE,
    TAG_SHADER_NAME,
};
use crate::context::{Diagnostics, UnpackState};
use crate::resolver::BlockResolver;

/// Where an overlay insert fragment is spliced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsertSlot {
    PassPre,
    PassPost,
    UsePassPre,
    UsePassPost,
}

impl InsertSlot {
    /// All slots, in substitution order.
    pub const ALL: [Self; 4] = [
        Self::PassPre,
        Self::PassPost,
        Self::UsePassPre,
        Self::UsePassPost,
    ];

    /// Overlay tag selecting this slot.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::PassPre => TAG_INSERT_PASS_PRE,
            Self::PassPost => TAG_INSERT_PASS_POST,
            Self::UsePassPre => TAG_INSERT_USEPASS_PRE,
            Self::UsePassPost => TAG_INSERT_USEPASS_POST,
        }
    }

    /// Placeholder the fragment replaces.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::PassPre => INSERT_PASS_PRE,
            Self::PassPost => INSERT_PASS_POST,
            Self::UsePassPre => INSERT_USEPASS_PRE,
            Self::UsePassPost => INSERT_USEPASS_POST,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Test against the original shader name.
///
/// `"Outline"` holds when the name contains `Outline`; `"!Outline"` holds
/// when it does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Condition<'a> {
    pattern: &'a str,
    negated: bool,
}

impl<'a> Condition<'a> {
    /// Parse a condition argument.
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        match name.strip_prefix(NEGATION) {
            Some(pattern) => Self {
                pattern,
                negated: true,
            },
            None => Self {
                pattern: name,
                negated: false,
            },
        }
    }

    /// Evaluate against the original shader name.
    #[must_use]
    pub fn holds(&self, original_name: &str) -> bool {
        original_name.contains(self.pattern) != self.negated
    }
}

/// `Replace ["condition"] "from" "to"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaceRule<'a> {
    pub condition: Option<Condition<'a>>,
    pub from: &'a str,
    pub to: &'a str,
}

impl<'a> ReplaceRule<'a> {
    /// Parse a replace line. Returns `None` with fewer than two arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use lilc_shader::ReplaceRule;
    ///
    /// let rule = ReplaceRule::parse(r#"Replace "Outline" "_A" "_B""#).unwrap();
    /// assert!(rule.applies_to("lilToonOutline"));
    /// assert!(!rule.applies_to("lilToon"));
    /// ```
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let args = QuotedArgs::parse(line);
        if args.len() >= 3 {
            Some(Self {
                condition: args.first().map(Condition::parse),
                from: args.get(1)?,
                to: args.get(2)?,
            })
        } else {
            Some(Self {
                condition: None,
                from: args.first()?,
                to: args.get(1)?,
            })
        }
    }

    /// Check if the rule's condition holds for the original shader name.
    #[must_use]
    pub fn applies_to(&self, original_name: &str) -> bool {
        self.condition.is_none_or(|c| c.holds(original_name))
    }
}

/// `InsertXxx ["condition"] "path"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertRule<'a> {
    pub condition: Option<Condition<'a>>,
    pub path: &'a str,
}

impl<'a> InsertRule<'a> {
    /// Parse an insert line. Returns `None` without arguments.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let args = QuotedArgs::parse(line);
        if args.len() >= 2 {
            Some(Self {
                condition: args.first().map(Condition::parse),
                path: args.get(1)?,
            })
        } else {
            Some(Self {
                condition: None,
                path: args.first()?,
            })
        }
    }

    /// Check if the rule's condition holds for the original shader name.
    #[must_use]
    pub fn applies_to(&self, original_name: &str) -> bool {
        self.condition.is_none_or(|c| c.holds(original_name))
    }
}

/// Read the overlay next to the container and fold it into `state`.
///
/// A missing overlay is reported and leaves `state` untouched.
pub(crate) fn load_overlay(
    resolver: &BlockResolver<'_>,
    state: &mut UnpackState,
    diag: &mut Diagnostics,
) {
    let path = resolver.source().resolve_path(OVERLAY_FILE_NAME);
    let Some(text) = resolver.read_block(&path, diag) else {
        return;
    };

    for line in text.lines() {
        apply_line(line, resolver, state, diag);
    }
}

fn apply_line(
    line: &str,
    resolver: &BlockResolver<'_>,
    state: &mut UnpackState,
    diag: &mut Diagnostics,
) {
    if line.contains(TAG_SHADER_NAME) {
        let Some(name) = first_quoted(line) else {
            diag.malformed_line(line);
            return;
        };
        state.shader_name = name.to_owned();
        if let Some(orig) = state.orig_shader_name.as_mut() {
            *orig = orig.replace(SHADER_NAME, name);
        }
    } else if line.contains(TAG_EDITOR_NAME) {
        match first_quoted(line) {
            Some(name) => state.editor_name = name.to_owned(),
            None => diag.malformed_line(line),
        }
    } else if line.contains(TAG_REPLACE) {
        match ReplaceRule::parse(line) {
            Some(rule) if rule.applies_to(state.original_name()) => {
                state.replaces.insert(rule.from, rule.to);
            }
            Some(_) => tracing::debug!(line, "Replace rule skipped"),
            None => diag.malformed_line(line),
        }
    } else if line.contains(TAG_INSERT) {
        for slot in InsertSlot::ALL {
            if line.contains(slot.tag()) {
                apply_insert(line, slot, resolver, state, diag);
            }
        }
    }
}

fn apply_insert(
    line: &str,
    slot: InsertSlot,
    resolver: &BlockResolver<'_>,
    state: &mut UnpackState,
    diag: &mut Diagnostics,
) {
    let Some(rule) = InsertRule::parse(line) else {
        diag.malformed_line(line);
        return;
    };
    if !rule.applies_to(state.original_name()) {
        return;
    }
    if let Some(text) = resolver.resolve_insert_fragment(rule.path, diag) {
        *state.insert_mut(slot) = text;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::context::{ReadFileFn, SourceContext, memory_fs};
    use crate::version::VersionContext;
    use pretty_assertions::assert_eq;

    fn load(files: &[(&str, &str)], original_name: Option<&str>) -> (UnpackState, Diagnostics) {
        let fs: Box<ReadFileFn> = memory_fs(files);
        let resolver = BlockResolver::new(
            SourceContext {
                asset_dir: Path::new("Shader"),
                resources_dir: Path::new("Res"),
                read_file: &*fs,
            },
            VersionContext::legacy(),
            12,
        );
        let mut state = UnpackState::default();
        state.orig_shader_name = original_name.map(str::to_owned);
        let mut diag = Diagnostics::new("Test.lilcontainer");
        load_overlay(&resolver, &mut state, &mut diag);
        (state, diag)
    }

    #[test]
    fn test_condition_gating() {
        let rule = ReplaceRule::parse(r#"Replace "Outline" "a" "b""#).unwrap();
        assert!(rule.applies_to("lilToonOutline"));
        assert!(!rule.applies_to("lilToon"));

        let negated = ReplaceRule::parse(r#"Replace "!Outline" "a" "b""#).unwrap();
        assert!(!negated.applies_to("lilToonOutline"));
        assert!(negated.applies_to("lilToon"));
    }

    #[test]
    fn test_unconditional_replace() {
        let rule = ReplaceRule::parse(r#"Replace "a" "b""#).unwrap();
        assert_eq!(rule.condition, None);
        assert_eq!((rule.from, rule.to), ("a", "b"));
        assert!(rule.applies_to(""));
    }

    #[test]
    fn test_malformed_replace() {
        assert_eq!(ReplaceRule::parse(r#"Replace "only""#), None);
        assert_eq!(InsertRule::parse("InsertPassPre"), None);
    }

    #[test]
    fn test_editor_name_last_wins() {
        let overlay = "EditorName \"Foo\"\nEditorName \"Bar\"\n";
        let (state, diag) = load(&[("Shader/lilCustomShaderDatas.lilblock", overlay)], None);
        assert_eq!(state.editor_name, "Bar");
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_shader_name_rewrites_original_name() {
        let overlay = "ShaderName \"MyToon\"\nReplace \"MyToonOutline\" \"x\" \"y\"\n";
        let (state, _) = load(
            &[("Shader/lilCustomShaderDatas.lilblock", overlay)],
            Some("Hidden/*LIL_SHADER_NAME*Outline"),
        );
        assert_eq!(state.shader_name, "MyToon");
        assert_eq!(state.original_name(), "Hidden/MyToonOutline");
        assert_eq!(state.replaces.get("x"), Some("y"));
    }

    #[test]
    fn test_replace_rules_gated_on_original_name() {
        let overlay = "Replace \"Outline\" \"a\" \"1\"\n\
                       Replace \"!Outline\" \"b\" \"2\"\n\
                       Replace \"c\" \"3\"\n\
                       Replace \"c\" \"4\"\n";
        let (state, _) = load(
            &[("Shader/lilCustomShaderDatas.lilblock", overlay)],
            Some("lilToonOutline"),
        );
        let entries: Vec<(&str, &str)> = state.replaces.iter().collect();
        assert_eq!(entries, [("a", "1"), ("c", "4")]);
    }

    #[test]
    fn test_insert_slots_independent() {
        let overlay = "InsertPassPre \"Pre.lilblock\"\n\
                       InsertUsePassPost \"!Outline\" \"Post.lilblock\"\n\
                       InsertPassPost \"Outline\" \"Post.lilblock\"\n";
        let (state, diag) = load(
            &[
                ("Shader/lilCustomShaderDatas.lilblock", overlay),
                ("Shader/Pre.lilblock", "pre"),
                ("Shader/Post.lilblock", "post"),
            ],
            Some("lilToon"),
        );
        assert_eq!(state.insert(InsertSlot::PassPre), "pre");
        assert_eq!(state.insert(InsertSlot::UsePassPost), "post");
        assert_eq!(state.insert(InsertSlot::PassPost), "");
        assert_eq!(state.insert(InsertSlot::UsePassPre), "");
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_missing_insert_warns() {
        let overlay = "InsertPassPre \"Gone.lilblock\"\n";
        let (state, diag) = load(&[("Shader/lilCustomShaderDatas.lilblock", overlay)], None);
        assert_eq!(state.insert(InsertSlot::PassPre), "");
        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.warnings()[0].contains("Gone.lilblock"));
    }

    #[test]
    fn test_missing_overlay_warns() {
        let (state, diag) = load(&[], Some("lilToon"));
        assert!(state.replaces.is_empty());
        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.warnings()[0].contains(OVERLAY_FILE_NAME));
    }
}
