//! Skip-variant directives.
//!
//! Block text may carry `#pragma lil_skip_variants_*` markers; each expands
//! to a `#pragma skip_variants` line listing the keywords of one category.

/// Category of shader variants a skip directive strips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipVariantCategory {
    Shadows,
    Lightmaps,
    Decals,
    AddLightShadows,
    AddLight,
    ProbeVolumes,
    AmbientOcclusion,
    LightLists,
    Reflections,
}

impl SkipVariantCategory {
    /// Categories in substitution order.
    ///
    /// `AddLightShadows` precedes `AddLight`: the add-light marker is a prefix
    /// of the add-light-shadows marker.
    pub const SUBSTITUTION_ORDER: [Self; 9] = [
        Self::Shadows,
        Self::Lightmaps,
        Self::Decals,
        Self::AddLightShadows,
        Self::AddLight,
        Self::ProbeVolumes,
        Self::AmbientOcclusion,
        Self::LightLists,
        Self::Reflections,
    ];

    /// Marker line recognized in block text.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Shadows => "#pragma lil_skip_variants_shadows",
            Self::Lightmaps => "#pragma lil_skip_variants_lightmaps",
            Self::Decals => "#pragma lil_skip_variants_decals",
            Self::AddLightShadows => "#pragma lil_skip_variants_addlightshadows",
            Self::AddLight => "#pragma lil_skip_variants_addlight",
            Self::ProbeVolumes => "#pragma lil_skip_variants_probevolumes",
            Self::AmbientOcclusion => "#pragma lil_skip_variants_ao",
            Self::LightLists => "#pragma lil_skip_variants_lightlists",
            Self::Reflections => "#pragma lil_skip_variants_reflections",
        }
    }

    /// Directive the marker expands to.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Shadows => {
                "#pragma skip_variants SHADOWS_SCREEN _MAIN_LIGHT_SHADOWS _MAIN_LIGHT_SHADOWS_CASCADE _MAIN_LIGHT_SHADOWS_SCREEN _ADDITIONAL_LIGHT_SHADOWS SCREEN_SPACE_SHADOWS_ON SHADOW_LOW SHADOW_MEDIUM SHADOW_HIGH SHADOW_VERY_HIGH"
            }
            Self::Lightmaps => {
                "#pragma skip_variants LIGHTMAP_ON DYNAMICLIGHTMAP_ON LIGHTMAP_SHADOW_MIXING SHADOWS_SHADOWMASK DIRLIGHTMAP_COMBINED _MIXED_LIGHTING_SUBTRACTIVE"
            }
            Self::Decals => {
                "#pragma skip_variants DECALS_OFF DECALS_3RT DECALS_4RT DECAL_SURFACE_GRADIENT _DBUFFER_MRT1 _DBUFFER_MRT2 _DBUFFER_MRT3"
            }
            Self::AddLightShadows => "#pragma skip_variants _ADDITIONAL_LIGHT_SHADOWS",
            Self::AddLight => {
                "#pragma skip_variants VERTEXLIGHT_ON _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS"
            }
            Self::ProbeVolumes => {
                "#pragma skip_variants PROBE_VOLUMES_OFF PROBE_VOLUMES_L1 PROBE_VOLUMES_L2"
            }
            Self::AmbientOcclusion => "#pragma skip_variants _SCREEN_SPACE_OCCLUSION",
            Self::LightLists => "#pragma skip_variants USE_FPTL_LIGHTLIST USE_CLUSTERED_LIGHTLIST",
            Self::Reflections => {
                "#pragma skip_variants _REFLECTION_PROBE_BLENDING _REFLECTION_PROBE_BOX_PROJECTION"
            }
        }
    }
}

/// Expand every skip-variant marker in `text`.
#[must_use]
pub fn expand_skip_variants(text: &str) -> String {
    let mut out = text.to_owned();
    for category in SkipVariantCategory::SUBSTITUTION_ORDER {
        if out.contains(category.marker()) {
            out = out.replace(category.marker(), category.directive());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_all_markers() {
        let text: Vec<&str> = SkipVariantCategory::SUBSTITUTION_ORDER
            .iter()
            .map(|c| c.marker())
            .collect();
        let out = expand_skip_variants(&text.join("\n"));
        assert!(!out.contains("lil_skip_variants"));
        assert_eq!(out.lines().count(), 9);
    }

    #[test]
    fn test_addlightshadows_not_split_by_addlight() {
        let out = expand_skip_variants("#pragma lil_skip_variants_addlightshadows");
        assert_eq!(out, "#pragma skip_variants _ADDITIONAL_LIGHT_SHADOWS");
    }

    #[test]
    fn test_addlight() {
        let out = expand_skip_variants("  #pragma lil_skip_variants_addlight\n");
        assert_eq!(
            out,
            "  #pragma skip_variants VERTEXLIGHT_ON _ADDITIONAL_LIGHTS_VERTEX _ADDITIONAL_LIGHTS\n"
        );
    }

    #[test]
    fn test_text_without_markers_unchanged() {
        assert_eq!(expand_skip_variants("#pragma target 4.5"), "#pragma target 4.5");
    }
}
