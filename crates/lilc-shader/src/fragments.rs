//! Multi-compile fragment library.
//!
//! Each render stage maps to a block of compiler directives chosen from a
//! decision table keyed on pipeline, package major version and the DOTS
//! instancing flag. Tables are evaluated top to bottom and the first matching
//! band wins, so version-gated bands are listed highest threshold first.
//!
//! ```
//! use lilc_shader::{MultiCompileStage, VersionContext, multi_compile_fragment};
//!
//! let text = multi_compile_fragment(MultiCompileStage::Forward, VersionContext::legacy(), false, 12);
//! assert!(text.starts_with("#pragma multi_compile_fwdbase"));
//! ```

use crate::version::PipelineKind::{HighDefinition as Hdrp, Legacy as Brp, Universal as Urp};
use crate::version::{PipelineKind, VersionContext};

const INSTANCING: &str = "#pragma multi_compile_instancing";
const RENDERING_LAYER: &str = "#pragma instancing_options renderinglayer";
const DOTS_INSTANCING: &str = "#pragma multi_compile _ DOTS_INSTANCING_ON";
const FOG: &str = "#pragma multi_compile_vertex _ FOG_LINEAR FOG_EXP FOG_EXP2";
const EDITOR_VISUALIZATION: &str = "#pragma shader_feature EDITOR_VISUALIZATION";

/// Render stage a multi-compile block is generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MultiCompileStage {
    Forward,
    ForwardAdd,
    ShadowCaster,
    DepthOnly,
    DepthNormals,
    MotionVectors,
    SceneSelection,
    Meta,
    /// Instancing options; replaces the plain `multi_compile_instancing`
    /// pragma, including the ones emitted by the other stages.
    InstancingLayer,
}

impl MultiCompileStage {
    /// Stages in substitution order.
    ///
    /// `ForwardAdd` precedes `Forward` because the forward marker is a prefix
    /// of the forward-add marker. `InstancingLayer` runs last so it also
    /// rewrites the instancing pragmas produced by the other stages.
    pub const SUBSTITUTION_ORDER: [Self; 9] = [
        Self::ForwardAdd,
        Self::Forward,
        Self::ShadowCaster,
        Self::DepthOnly,
        Self::DepthNormals,
        Self::MotionVectors,
        Self::SceneSelection,
        Self::Meta,
        Self::InstancingLayer,
    ];

    /// Marker line in block text that expands to this stage's fragment.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Forward => "#pragma lil_multi_compile_forward",
            Self::ForwardAdd => "#pragma lil_multi_compile_forwardadd",
            Self::ShadowCaster => "#pragma lil_multi_compile_shadowcaster",
            Self::DepthOnly => "#pragma lil_multi_compile_depthonly",
            Self::DepthNormals => "#pragma lil_multi_compile_depthnormals",
            Self::MotionVectors => "#pragma lil_multi_compile_motionvectors",
            Self::SceneSelection => "#pragma lil_multi_compile_sceneselection",
            Self::Meta => "#pragma lil_multi_compile_meta",
            Self::InstancingLayer => INSTANCING,
        }
    }

    fn table(self) -> &'static [Band] {
        match self {
            Self::Forward => FORWARD,
            Self::ForwardAdd => FORWARD_ADD,
            Self::ShadowCaster => SHADOW_CASTER,
            Self::DepthOnly => DEPTH_ONLY,
            Self::DepthNormals => DEPTH_NORMALS,
            Self::MotionVectors => MOTION_VECTORS,
            Self::SceneSelection => SCENE_SELECTION,
            Self::Meta => META,
            Self::InstancingLayer => INSTANCING_LAYER,
        }
    }
}

/// One row of a decision table.
struct Band {
    pipeline: PipelineKind,
    min_major: u32,
    /// `None` matches either value of the DOTS flag.
    dots: Option<bool>,
    lines: &'static [&'static str],
}

impl Band {
    const fn new(pipeline: PipelineKind, min_major: u32, lines: &'static [&'static str]) -> Self {
        Self {
            pipeline,
            min_major,
            dots: None,
            lines,
        }
    }

    const fn dots(mut self, dots: bool) -> Self {
        self.dots = Some(dots);
        self
    }

    fn matches(&self, version: VersionContext, dots: bool) -> bool {
        self.pipeline == version.pipeline
            && version.major >= self.min_major
            && self.dots.is_none_or(|d| d == dots)
    }
}

const FORWARD: &[Band] = &[
    Band::new(
        Urp,
        12,
        &[
            "#pragma multi_compile _ _MAIN_LIGHT_SHADOWS _MAIN_LIGHT_SHADOWS_CASCADE _MAIN_LIGHT_SHADOWS_SCREEN",
            "#pragma multi_compile _ _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS",
            "#pragma multi_compile_fragment _ _ADDITIONAL_LIGHT_SHADOWS",
            "#pragma multi_compile_fragment _ _REFLECTION_PROBE_BLENDING",
            "#pragma multi_compile_fragment _ _REFLECTION_PROBE_BOX_PROJECTION",
            "#pragma multi_compile_fragment _ _SHADOWS_SOFT",
            "#pragma multi_compile_fragment _ _SCREEN_SPACE_OCCLUSION",
            "#pragma multi_compile_fragment _ _DBUFFER_MRT1 _DBUFFER_MRT2 _DBUFFER_MRT3",
            "#pragma multi_compile _ _LIGHT_LAYERS",
            "#pragma multi_compile_fragment _ _LIGHT_COOKIES",
            "#pragma multi_compile _ _CLUSTERED_RENDERING",
            "#pragma multi_compile _ LIGHTMAP_SHADOW_MIXING",
            "#pragma multi_compile _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ LIGHTMAP_ON",
            "#pragma multi_compile _ DYNAMICLIGHTMAP_ON",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Urp,
        11,
        &[
            "#pragma multi_compile _ _MAIN_LIGHT_SHADOWS _MAIN_LIGHT_SHADOWS_CASCADE _MAIN_LIGHT_SHADOWS_SCREEN",
            "#pragma multi_compile _ _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS",
            "#pragma multi_compile_fragment _ _ADDITIONAL_LIGHT_SHADOWS",
            "#pragma multi_compile_fragment _ _SHADOWS_SOFT",
            "#pragma multi_compile_fragment _ _SCREEN_SPACE_OCCLUSION",
            "#pragma multi_compile _ LIGHTMAP_SHADOW_MIXING",
            "#pragma multi_compile _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ LIGHTMAP_ON",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Urp,
        10,
        &[
            "#pragma multi_compile _ _MAIN_LIGHT_SHADOWS _MAIN_LIGHT_SHADOWS_CASCADE",
            "#pragma multi_compile _ _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS",
            "#pragma multi_compile_fragment _ _ADDITIONAL_LIGHT_SHADOWS",
            "#pragma multi_compile_fragment _ _SHADOWS_SOFT",
            "#pragma multi_compile_fragment _ _SCREEN_SPACE_OCCLUSION",
            "#pragma multi_compile _ LIGHTMAP_SHADOW_MIXING",
            "#pragma multi_compile _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ LIGHTMAP_ON",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Urp,
        0,
        &[
            "#pragma multi_compile _ _MAIN_LIGHT_SHADOWS _MAIN_LIGHT_SHADOWS_CASCADE",
            "#pragma multi_compile _ _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS",
            "#pragma multi_compile_fragment _ _ADDITIONAL_LIGHT_SHADOWS",
            "#pragma multi_compile_fragment _ _SHADOWS_SOFT",
            "#pragma multi_compile _ _MIXED_LIGHTING_SUBTRACTIVE",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ LIGHTMAP_ON",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Hdrp,
        12,
        &[
            "#pragma multi_compile _ LIGHTMAP_ON",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ DYNAMICLIGHTMAP_ON",
            "#pragma multi_compile_fragment _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile_fragment PROBE_VOLUMES_OFF PROBE_VOLUMES_L1 PROBE_VOLUMES_L2",
            "#pragma multi_compile_fragment SCREEN_SPACE_SHADOWS_OFF SCREEN_SPACE_SHADOWS_ON",
            "#pragma multi_compile_fragment DECALS_OFF DECALS_3RT DECALS_4RT",
            "#pragma multi_compile_fragment _ DECAL_SURFACE_GRADIENT",
            "#pragma multi_compile_fragment SHADOW_LOW SHADOW_MEDIUM SHADOW_HIGH SHADOW_VERY_HIGH",
            "#pragma multi_compile_fragment USE_FPTL_LIGHTLIST USE_CLUSTERED_LIGHTLIST",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_FORWARD",
            "#define HAS_LIGHTLOOP",
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Hdrp,
        10,
        &[
            "#pragma multi_compile _ LIGHTMAP_ON",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ DYNAMICLIGHTMAP_ON",
            "#pragma multi_compile_fragment _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile_fragment SCREEN_SPACE_SHADOWS_OFF SCREEN_SPACE_SHADOWS_ON",
            "#pragma multi_compile_fragment DECALS_OFF DECALS_3RT DECALS_4RT",
            "#pragma multi_compile_fragment SHADOW_LOW SHADOW_MEDIUM SHADOW_HIGH SHADOW_VERY_HIGH",
            "#pragma multi_compile_fragment USE_FPTL_LIGHTLIST USE_CLUSTERED_LIGHTLIST",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_FORWARD",
            "#define HAS_LIGHTLOOP",
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Hdrp,
        0,
        &[
            "#pragma multi_compile _ LIGHTMAP_ON",
            "#pragma multi_compile _ DIRLIGHTMAP_COMBINED",
            "#pragma multi_compile _ DYNAMICLIGHTMAP_ON",
            "#pragma multi_compile_fragment _ SHADOWS_SHADOWMASK",
            "#pragma multi_compile_fragment DECALS_OFF DECALS_3RT DECALS_4RT",
            "#pragma multi_compile_fragment SHADOW_LOW SHADOW_MEDIUM SHADOW_HIGH SHADOW_VERY_HIGH",
            "#pragma multi_compile_fragment USE_FPTL_LIGHTLIST USE_CLUSTERED_LIGHTLIST",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_FORWARD",
            "#define HAS_LIGHTLOOP",
            "#define LIL_PASS_FORWARD",
        ],
    ),
    Band::new(
        Brp,
        0,
        &[
            "#pragma multi_compile_fwdbase",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARD",
        ],
    ),
];

const FORWARD_ADD: &[Band] = &[
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_FORWARDADD"]),
    Band::new(Hdrp, 0, &[INSTANCING, "#define LIL_PASS_FORWARDADD"]),
    Band::new(
        Brp,
        0,
        &[
            "#pragma multi_compile_fragment POINT DIRECTIONAL SPOT POINT_COOKIE DIRECTIONAL_COOKIE",
            FOG,
            INSTANCING,
            "#define LIL_PASS_FORWARDADD",
        ],
    ),
];

const SHADOW_CASTER: &[Band] = &[
    Band::new(
        Urp,
        11,
        &[
            "#pragma multi_compile_vertex _ _CASTING_PUNCTUAL_LIGHT_SHADOW",
            INSTANCING,
            "#define LIL_PASS_SHADOWCASTER",
        ],
    ),
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_SHADOWCASTER"]),
    Band::new(
        Hdrp,
        0,
        &[
            INSTANCING,
            "#define SHADERPASS SHADERPASS_SHADOWS",
            "#define LIL_PASS_SHADOWCASTER",
        ],
    ),
    Band::new(
        Brp,
        0,
        &[
            "#pragma multi_compile_shadowcaster",
            INSTANCING,
            "#define LIL_PASS_SHADOWCASTER",
        ],
    ),
];

const DEPTH_ONLY: &[Band] = &[
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_DEPTHONLY"]),
    Band::new(
        Hdrp,
        10,
        &[
            "#pragma multi_compile _ WRITE_NORMAL_BUFFER",
            "#pragma multi_compile_fragment _ WRITE_MSAA_DEPTH",
            "#pragma multi_compile _ WRITE_DECAL_BUFFER",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_DEPTH_ONLY",
            "#define LIL_PASS_DEPTHONLY",
        ],
    ),
    Band::new(
        Hdrp,
        0,
        &[
            "#pragma multi_compile _ WRITE_NORMAL_BUFFER",
            "#pragma multi_compile_fragment _ WRITE_MSAA_DEPTH",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_DEPTH_ONLY",
            "#define LIL_PASS_DEPTHONLY",
        ],
    ),
    Band::new(Brp, 0, &[INSTANCING, "#define LIL_PASS_DEPTHONLY"]),
];

const DEPTH_NORMALS: &[Band] = &[
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_DEPTHNORMALS"]),
    Band::new(Hdrp, 0, &[INSTANCING, "#define LIL_PASS_DEPTHNORMALS"]),
    Band::new(Brp, 0, &[INSTANCING, "#define LIL_PASS_DEPTHNORMALS"]),
];

const MOTION_VECTORS: &[Band] = &[
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_MOTIONVECTORS"]),
    Band::new(
        Hdrp,
        10,
        &[
            "#pragma multi_compile _ WRITE_NORMAL_BUFFER",
            "#pragma multi_compile_fragment _ WRITE_MSAA_DEPTH",
            "#pragma multi_compile _ WRITE_DECAL_BUFFER",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_MOTION_VECTORS",
            "#define LIL_PASS_MOTIONVECTORS",
        ],
    ),
    Band::new(
        Hdrp,
        0,
        &[
            "#pragma multi_compile _ WRITE_NORMAL_BUFFER",
            "#pragma multi_compile_fragment _ WRITE_MSAA_DEPTH",
            INSTANCING,
            "#define SHADERPASS SHADERPASS_MOTION_VECTORS",
            "#define LIL_PASS_MOTIONVECTORS",
        ],
    ),
    Band::new(Brp, 0, &[INSTANCING, "#define LIL_PASS_MOTIONVECTORS"]),
];

const SCENE_SELECTION: &[Band] = &[
    Band::new(Urp, 0, &[INSTANCING, "#define LIL_PASS_SCENESELECTION"]),
    Band::new(
        Hdrp,
        0,
        &[
            INSTANCING,
            "#pragma editor_sync_compilation",
            "#define SHADERPASS SHADERPASS_DEPTH_ONLY",
            "#define SCENESELECTIONPASS",
            "#define LIL_PASS_SCENESELECTION",
        ],
    ),
    Band::new(Brp, 0, &[INSTANCING, "#define LIL_PASS_SCENESELECTION"]),
];

const META: &[Band] = &[
    Band::new(Urp, 0, &[EDITOR_VISUALIZATION, "#define LIL_PASS_META"]),
    Band::new(
        Hdrp,
        0,
        &[
            INSTANCING,
            EDITOR_VISUALIZATION,
            "#define SHADERPASS SHADERPASS_LIGHT_TRANSPORT",
            "#define LIL_PASS_META",
        ],
    ),
    Band::new(Brp, 0, &[EDITOR_VISUALIZATION, "#define LIL_PASS_META"]),
];

const INSTANCING_LAYER: &[Band] = &[
    Band::new(Urp, 12, &[DOTS_INSTANCING, INSTANCING, RENDERING_LAYER]).dots(true),
    Band::new(Urp, 12, &[INSTANCING, RENDERING_LAYER]),
    Band::new(Urp, 9, &[DOTS_INSTANCING, INSTANCING]).dots(true),
    Band::new(Urp, 0, &[INSTANCING]),
    Band::new(Hdrp, 9, &[DOTS_INSTANCING, INSTANCING, RENDERING_LAYER]).dots(true),
    Band::new(Hdrp, 0, &[INSTANCING, RENDERING_LAYER]),
    Band::new(Brp, 0, &[INSTANCING]),
];

/// Directive lines for a stage, before indentation is applied.
///
/// Falls back to the built-in pipeline rows when no row matches.
#[must_use]
pub fn multi_compile_lines(
    stage: MultiCompileStage,
    version: VersionContext,
    dots: bool,
) -> &'static [&'static str] {
    let table = stage.table();
    table
        .iter()
        .find(|band| band.matches(version, dots))
        .or_else(|| table.iter().find(|band| band.pipeline == Brp))
        .map_or(&[], |band| band.lines)
}

/// Multi-compile block for a stage, one directive per line.
///
/// The first line carries no indentation (it inherits the marker's), every
/// following line is indented by `indent` spaces.
#[must_use]
pub fn multi_compile_fragment(
    stage: MultiCompileStage,
    version: VersionContext,
    dots: bool,
    indent: usize,
) -> String {
    indent_join(multi_compile_lines(stage, version, dots), indent)
}

/// Join lines so that every line after the first is indented.
pub(crate) fn indent_join(lines: &[&str], indent: usize) -> String {
    let separator = format!("\n{}", " ".repeat(indent));
    lines.join(&separator)
}

/// Replace every multi-compile marker in `text` with its fragment.
#[must_use]
pub fn expand_multi_compiles(
    text: &str,
    version: VersionContext,
    indent: usize,
    dots: bool,
) -> String {
    let mut out = text.to_owned();
    for stage in MultiCompileStage::SUBSTITUTION_ORDER {
        let marker = stage.marker();
        if out.contains(marker) {
            out = out.replace(marker, &multi_compile_fragment(stage, version, dots, indent));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL_VERSIONS: [VersionContext; 12] = [
        VersionContext::new(Brp, 0, 0),
        VersionContext::new(Urp, 7, 0),
        VersionContext::new(Urp, 8, 0),
        VersionContext::new(Urp, 9, 0),
        VersionContext::new(Urp, 10, 0),
        VersionContext::new(Urp, 11, 0),
        VersionContext::new(Urp, 12, 0),
        VersionContext::new(Urp, 14, 0),
        VersionContext::new(Hdrp, 7, 0),
        VersionContext::new(Hdrp, 9, 0),
        VersionContext::new(Hdrp, 10, 0),
        VersionContext::new(Hdrp, 12, 0),
    ];

    #[test]
    fn test_every_stage_is_total() {
        for stage in MultiCompileStage::SUBSTITUTION_ORDER {
            for version in ALL_VERSIONS {
                for dots in [false, true] {
                    assert!(
                        !multi_compile_lines(stage, version, dots).is_empty(),
                        "{stage:?} {version} dots={dots}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        for stage in MultiCompileStage::SUBSTITUTION_ORDER {
            for version in ALL_VERSIONS {
                assert_eq!(
                    multi_compile_fragment(stage, version, true, 12),
                    multi_compile_fragment(stage, version, true, 12)
                );
            }
        }
    }

    #[test]
    fn test_legacy_forward() {
        let text = multi_compile_fragment(
            MultiCompileStage::Forward,
            VersionContext::legacy(),
            false,
            4,
        );
        assert_eq!(
            text,
            "#pragma multi_compile_fwdbase\n    \
             #pragma multi_compile_vertex _ FOG_LINEAR FOG_EXP FOG_EXP2\n    \
             #pragma multi_compile_instancing\n    \
             #define LIL_PASS_FORWARD"
        );
    }

    #[test]
    fn test_urp_12_takes_highest_band() {
        let version = VersionContext::universal(12);
        let forward = multi_compile_lines(MultiCompileStage::Forward, version, false);
        assert!(forward.contains(&"#pragma multi_compile _ _CLUSTERED_RENDERING"));
        assert!(forward.contains(&"#pragma multi_compile_fragment _ _LIGHT_COOKIES"));

        let shadow = multi_compile_lines(MultiCompileStage::ShadowCaster, version, false);
        assert_eq!(shadow[0], "#pragma multi_compile_vertex _ _CASTING_PUNCTUAL_LIGHT_SHADOW");

        let layer = multi_compile_lines(MultiCompileStage::InstancingLayer, version, true);
        assert_eq!(layer, &[DOTS_INSTANCING, INSTANCING, RENDERING_LAYER]);
        let layer = multi_compile_lines(MultiCompileStage::InstancingLayer, version, false);
        assert_eq!(layer, &[INSTANCING, RENDERING_LAYER]);
    }

    #[test]
    fn test_urp_forward_bands() {
        let lines = |major| multi_compile_lines(MultiCompileStage::Forward, VersionContext::universal(major), false);

        assert!(lines(11).contains(&"#pragma multi_compile_fragment _ _SCREEN_SPACE_OCCLUSION"));
        assert!(!lines(11).contains(&"#pragma multi_compile _ _CLUSTERED_RENDERING"));
        assert!(lines(11)[0].ends_with("_MAIN_LIGHT_SHADOWS_SCREEN"));
        assert!(!lines(10)[0].ends_with("_MAIN_LIGHT_SHADOWS_SCREEN"));
        assert!(lines(10).contains(&"#pragma multi_compile_fragment _ _SCREEN_SPACE_OCCLUSION"));
        assert!(lines(9).contains(&"#pragma multi_compile _ _MIXED_LIGHTING_SUBTRACTIVE"));
        assert!(lines(7).contains(&"#pragma multi_compile _ _MIXED_LIGHTING_SUBTRACTIVE"));
    }

    #[test]
    fn test_urp_shadow_caster_below_11() {
        let lines = multi_compile_lines(
            MultiCompileStage::ShadowCaster,
            VersionContext::universal(10),
            false,
        );
        assert_eq!(lines, &[INSTANCING, "#define LIL_PASS_SHADOWCASTER"]);
    }

    #[test]
    fn test_urp_instancing_layer_bands() {
        let layer = |major, dots| {
            multi_compile_lines(
                MultiCompileStage::InstancingLayer,
                VersionContext::universal(major),
                dots,
            )
        };
        assert_eq!(layer(9, true), &[DOTS_INSTANCING, INSTANCING]);
        assert_eq!(layer(9, false), &[INSTANCING]);
        assert_eq!(layer(8, true), &[INSTANCING]);
    }

    #[test]
    fn test_hdrp_bands() {
        let depth = |major| {
            multi_compile_lines(
                MultiCompileStage::DepthOnly,
                VersionContext::high_definition(major),
                false,
            )
        };
        assert!(depth(10).contains(&"#pragma multi_compile _ WRITE_DECAL_BUFFER"));
        assert!(!depth(9).contains(&"#pragma multi_compile _ WRITE_DECAL_BUFFER"));

        let forward = multi_compile_lines(
            MultiCompileStage::Forward,
            VersionContext::high_definition(12),
            false,
        );
        assert!(forward.contains(&"#pragma multi_compile_fragment _ DECAL_SURFACE_GRADIENT"));

        let layer = multi_compile_lines(
            MultiCompileStage::InstancingLayer,
            VersionContext::high_definition(9),
            true,
        );
        assert_eq!(layer, &[DOTS_INSTANCING, INSTANCING, RENDERING_LAYER]);
        let layer = multi_compile_lines(
            MultiCompileStage::InstancingLayer,
            VersionContext::high_definition(8),
            true,
        );
        assert_eq!(layer, &[INSTANCING, RENDERING_LAYER]);
    }

    #[test]
    fn test_expand_forward_add_before_forward() {
        let text = "#pragma lil_multi_compile_forwardadd";
        let out = expand_multi_compiles(text, VersionContext::legacy(), 0, false);
        assert!(out.contains("#define LIL_PASS_FORWARDADD"));
        assert!(!out.contains("#define LIL_PASS_FORWARD\n"));
        assert!(!out.contains("lil_multi_compile"));
    }

    #[test]
    fn test_expand_rewrites_nested_instancing() {
        let text = "            #pragma lil_multi_compile_forward";
        let out = expand_multi_compiles(text, VersionContext::universal(12), 12, true);
        assert!(out.contains("#pragma multi_compile _ DOTS_INSTANCING_ON"));
        assert!(out.contains("#pragma instancing_options renderinglayer"));
        assert_eq!(out.matches(INSTANCING).count(), 1);
    }

    #[test]
    fn test_expand_without_markers_is_identity() {
        let text = "Pass { }\n";
        assert_eq!(
            expand_multi_compiles(text, VersionContext::high_definition(12), 12, false),
            text
        );
    }
}
