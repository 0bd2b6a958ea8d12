//! Render pipeline and package version selection.
//!
//! Every conditional branch in the engine is keyed on a [`VersionContext`]:
//! which pipeline the shader is generated for and the major/minor version of
//! that pipeline's package.

use std::fmt;
use std::str::FromStr;

/// Rendering backend a shader is assembled for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PipelineKind {
    /// Built-in render pipeline ("BRP").
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "brp", alias = "BRP"))]
    Legacy,
    /// Universal render pipeline ("URP").
    #[cfg_attr(feature = "serde", serde(alias = "urp", alias = "URP"))]
    Universal,
    /// High definition render pipeline ("HDRP").
    #[cfg_attr(feature = "serde", serde(alias = "hdrp", alias = "HDRP"))]
    HighDefinition,
}

impl PipelineKind {
    /// Short name used in directive matching and file name suffixes.
    ///
    /// # Example
    ///
    /// ```
    /// use lilc_shader::PipelineKind;
    ///
    /// assert_eq!(PipelineKind::Universal.short_name(), "URP");
    /// ```
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Legacy => "BRP",
            Self::Universal => "URP",
            Self::HighDefinition => "HDRP",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when a pipeline name is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown render pipeline: {0} (expected brp, urp or hdrp)")]
pub struct ParsePipelineError(String);

impl FromStr for PipelineKind {
    type Err = ParsePipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brp" | "legacy" | "built-in" => Ok(Self::Legacy),
            "urp" | "universal" => Ok(Self::Universal),
            "hdrp" | "high-definition" => Ok(Self::HighDefinition),
            _ => Err(ParsePipelineError(s.to_owned())),
        }
    }
}

/// Pipeline and package version the shader is generated for.
///
/// Immutable for the duration of one unpack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VersionContext {
    /// Target pipeline.
    pub pipeline: PipelineKind,
    /// Pipeline package major version (0 for the built-in pipeline).
    pub major: u32,
    /// Pipeline package minor version.
    pub minor: u32,
}

impl VersionContext {
    /// Create a version context.
    #[must_use]
    pub const fn new(pipeline: PipelineKind, major: u32, minor: u32) -> Self {
        Self {
            pipeline,
            major,
            minor,
        }
    }

    /// Built-in pipeline context (no package version).
    #[must_use]
    pub const fn legacy() -> Self {
        Self::new(PipelineKind::Legacy, 0, 0)
    }

    /// Universal pipeline context for the given major version.
    #[must_use]
    pub const fn universal(major: u32) -> Self {
        Self::new(PipelineKind::Universal, major, 0)
    }

    /// High definition pipeline context for the given major version.
    #[must_use]
    pub const fn high_definition(major: u32) -> Self {
        Self::new(PipelineKind::HighDefinition, major, 0)
    }
}

impl fmt::Display for VersionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.pipeline, self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        assert_eq!(PipelineKind::Legacy.short_name(), "BRP");
        assert_eq!(PipelineKind::Universal.short_name(), "URP");
        assert_eq!(PipelineKind::HighDefinition.short_name(), "HDRP");
    }

    #[test]
    fn test_parse_pipeline_aliases() {
        assert_eq!("brp".parse::<PipelineKind>().unwrap(), PipelineKind::Legacy);
        assert_eq!("URP".parse::<PipelineKind>().unwrap(), PipelineKind::Universal);
        assert_eq!(
            "high-definition".parse::<PipelineKind>().unwrap(),
            PipelineKind::HighDefinition
        );
    }

    #[test]
    fn test_parse_pipeline_unknown() {
        let err = "vulkan".parse::<PipelineKind>().unwrap_err();
        assert!(err.to_string().contains("vulkan"));
    }

    #[test]
    fn test_display_version_context() {
        assert_eq!(VersionContext::universal(12).to_string(), "URP 12.0");
        assert_eq!(VersionContext::legacy().to_string(), "BRP 0.0");
    }
}
