//! Feature-flag driven shader settings.
//!
//! The flag store is an opaque name to boolean lookup filled by whoever owns
//! the shader settings. [`build_shader_setting`] turns it into `#define`
//! lines; child features are only emitted when their parent feature is on.

use std::collections::HashMap;

use crate::skip_variants::SkipVariantCategory;

/// Name to boolean lookup of shader feature flags.
///
/// # Example
///
/// ```
/// use lilc_shader::FlagStore;
///
/// let flags: FlagStore = [("LIL_FEATURE_SHADOW", true)].into_iter().collect();
/// assert!(flags.get("LIL_FEATURE_SHADOW", false));
/// assert!(flags.get("LIL_OPTIMIZE_USE_LIGHTMAP", true));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagStore {
    flags: HashMap<String, bool>,
}

impl FlagStore {
    /// Create an empty flag store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Look up a flag, falling back to `default` when it is absent.
    #[must_use]
    pub fn get(&self, name: &str, default: bool) -> bool {
        self.flags.get(name).copied().unwrap_or(default)
    }

    /// Number of flags explicitly set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if no flags are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FlagStore {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<HashMap<String, bool>> for FlagStore {
    fn from(flags: HashMap<String, bool>) -> Self {
        Self { flags }
    }
}

/// Where the generated settings text goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingMode {
    /// Spliced into the shader at `*LIL_SHADER_SETTING*`; appends
    /// skip-variant markers derived from the flags.
    Inline,
    /// Standalone include file with an include guard.
    File,
}

enum Node {
    /// `#define` the flag when set.
    Define(&'static str, bool),
    /// `#define` the flag and, when set, evaluate the children.
    Parent(&'static str, &'static [Node]),
    /// Evaluate the children when any gate flag is set.
    AnyOf(&'static [&'static str], &'static [Node]),
}

const fn flag(name: &'static str) -> Node {
    Node::Define(name, false)
}

const SETTING_TREE: &[Node] = &[
    flag("LIL_FEATURE_ANIMATE_MAIN_UV"),
    flag("LIL_FEATURE_MAIN_TONE_CORRECTION"),
    flag("LIL_FEATURE_MAIN_GRADATION_MAP"),
    flag("LIL_FEATURE_MAIN2ND"),
    flag("LIL_FEATURE_MAIN3RD"),
    Node::AnyOf(
        &["LIL_FEATURE_MAIN2ND", "LIL_FEATURE_MAIN3RD"],
        &[
            flag("LIL_FEATURE_DECAL"),
            flag("LIL_FEATURE_ANIMATE_DECAL"),
            flag("LIL_FEATURE_TEX_LAYER_MASK"),
            Node::Parent(
                "LIL_FEATURE_LAYER_DISSOLVE",
                &[flag("LIL_FEATURE_TEX_LAYER_DISSOLVE_NOISE")],
            ),
        ],
    ),
    flag("LIL_FEATURE_ALPHAMASK"),
    Node::Parent(
        "LIL_FEATURE_SHADOW",
        &[
            flag("LIL_FEATURE_RECEIVE_SHADOW"),
            flag("LIL_FEATURE_TEX_SHADOW_BLUR"),
            flag("LIL_FEATURE_TEX_SHADOW_BORDER"),
            flag("LIL_FEATURE_TEX_SHADOW_STRENGTH"),
            flag("LIL_FEATURE_TEX_SHADOW_1ST"),
            flag("LIL_FEATURE_TEX_SHADOW_2ND"),
            Node::Parent(
                "LIL_FEATURE_SHADOW_3RD",
                &[flag("LIL_FEATURE_TEX_SHADOW_3RD")],
            ),
        ],
    ),
    flag("LIL_FEATURE_EMISSION_1ST"),
    flag("LIL_FEATURE_EMISSION_2ND"),
    Node::AnyOf(
        &["LIL_FEATURE_EMISSION_1ST", "LIL_FEATURE_EMISSION_2ND"],
        &[
            flag("LIL_FEATURE_ANIMATE_EMISSION_UV"),
            Node::Parent(
                "LIL_FEATURE_TEX_EMISSION_MASK",
                &[flag("LIL_FEATURE_ANIMATE_EMISSION_MASK_UV")],
            ),
            flag("LIL_FEATURE_EMISSION_GRADATION"),
        ],
    ),
    flag("LIL_FEATURE_NORMAL_1ST"),
    Node::Parent(
        "LIL_FEATURE_NORMAL_2ND",
        &[flag("LIL_FEATURE_TEX_NORMAL_MASK")],
    ),
    flag("LIL_FEATURE_ANISOTROPY"),
    Node::Parent(
        "LIL_FEATURE_REFLECTION",
        &[
            flag("LIL_FEATURE_TEX_REFLECTION_SMOOTHNESS"),
            flag("LIL_FEATURE_TEX_REFLECTION_METALLIC"),
            flag("LIL_FEATURE_TEX_REFLECTION_COLOR"),
        ],
    ),
    flag("LIL_FEATURE_MATCAP"),
    flag("LIL_FEATURE_MATCAP_2ND"),
    Node::AnyOf(
        &["LIL_FEATURE_MATCAP", "LIL_FEATURE_MATCAP_2ND"],
        &[
            flag("LIL_FEATURE_TEX_MATCAP_MASK"),
            flag("LIL_FEATURE_TEX_MATCAP_NORMALMAP"),
        ],
    ),
    Node::Parent(
        "LIL_FEATURE_RIMLIGHT",
        &[
            flag("LIL_FEATURE_TEX_RIMLIGHT_COLOR"),
            flag("LIL_FEATURE_RIMLIGHT_DIRECTION"),
        ],
    ),
    flag("LIL_FEATURE_GLITTER"),
    flag("LIL_FEATURE_BACKLIGHT"),
    Node::Parent("LIL_FEATURE_PARALLAX", &[flag("LIL_FEATURE_POM")]),
    flag("LIL_FEATURE_CLIPPING_CANCELLER"),
    flag("LIL_FEATURE_DISTANCE_FADE"),
    Node::Parent(
        "LIL_FEATURE_AUDIOLINK",
        &[
            flag("LIL_FEATURE_AUDIOLINK_VERTEX"),
            flag("LIL_FEATURE_AUDIOLINK_LOCAL"),
        ],
    ),
    Node::Parent(
        "LIL_FEATURE_DISSOLVE",
        &[flag("LIL_FEATURE_TEX_DISSOLVE_NOISE")],
    ),
    flag("LIL_FEATURE_ENCRYPTION"),
    Node::Parent(
        "LIL_FEATURE_TEX_OUTLINE_COLOR",
        &[flag("LIL_FEATURE_OUTLINE_TONE_CORRECTION")],
    ),
    flag("LIL_FEATURE_ANIMATE_OUTLINE_UV"),
    flag("LIL_FEATURE_TEX_OUTLINE_WIDTH"),
    flag("LIL_FEATURE_TEX_OUTLINE_NORMAL"),
    flag("LIL_FEATURE_TEX_FUR_NORMAL"),
    flag("LIL_FEATURE_TEX_FUR_MASK"),
    flag("LIL_FEATURE_TEX_FUR_LENGTH"),
    flag("LIL_FEATURE_FUR_COLLISION"),
    flag("LIL_OPTIMIZE_APPLY_SHADOW_FA"),
    Node::Define(USE_FORWARDADD, true),
    Node::Define(USE_VERTEXLIGHT, true),
    Node::Define(USE_LIGHTMAP, true),
];

const USE_FORWARDADD: &str = "LIL_OPTIMIZE_USE_FORWARDADD";
const USE_VERTEXLIGHT: &str = "LIL_OPTIMIZE_USE_VERTEXLIGHT";
const USE_LIGHTMAP: &str = "LIL_OPTIMIZE_USE_LIGHTMAP";

const INCLUDE_GUARD_OPEN: &str = "#ifndef LIL_SETTING_INCLUDED\n#define LIL_SETTING_INCLUDED\n\n";
const INCLUDE_GUARD_CLOSE: &str = "\n#endif";

/// Build the shader settings text from feature flags.
///
/// Every emitted line ends with a line break. In [`SettingMode::Inline`] the
/// text also carries skip-variant markers for features that are disabled;
/// they are expanded later by the substitution pass.
#[must_use]
pub fn build_shader_setting(flags: &FlagStore, mode: SettingMode) -> String {
    let mut out = String::new();
    if mode == SettingMode::File {
        out.push_str(INCLUDE_GUARD_OPEN);
    }

    emit_nodes(SETTING_TREE, flags, &mut out);

    match mode {
        SettingMode::File => out.push_str(INCLUDE_GUARD_CLOSE),
        SettingMode::Inline => {
            let receives_shadow = flags.get("LIL_FEATURE_SHADOW", false)
                && flags.get("LIL_FEATURE_RECEIVE_SHADOW", false);
            if !receives_shadow && !flags.get("LIL_FEATURE_BACKLIGHT", false) {
                push_line(&mut out, SkipVariantCategory::Shadows.marker());
            }
            if !flags.get(USE_VERTEXLIGHT, true) {
                push_line(&mut out, SkipVariantCategory::AddLight.marker());
            }
            if !flags.get(USE_LIGHTMAP, true) {
                push_line(&mut out, SkipVariantCategory::Lightmaps.marker());
            }
        }
    }

    out
}

fn emit_nodes(nodes: &[Node], flags: &FlagStore, out: &mut String) {
    for node in nodes {
        match node {
            Node::Define(name, default) => {
                if flags.get(name, *default) {
                    push_define(out, name);
                }
            }
            Node::Parent(name, children) => {
                if flags.get(name, false) {
                    push_define(out, name);
                    emit_nodes(children, flags, out);
                }
            }
            Node::AnyOf(gates, children) => {
                if gates.iter().any(|gate| flags.get(gate, false)) {
                    emit_nodes(children, flags, out);
                }
            }
        }
    }
}

fn push_define(out: &mut String, name: &str) {
    out.push_str("#define ");
    push_line(out, name);
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
