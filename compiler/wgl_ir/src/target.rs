//! Compilation targets shared by the validator and both backends.

use std::fmt;

/// Text format produced after validation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputFormat {
    /// GLSL ES, precision qualifiers kept.
    #[default]
    GlslEs,
    /// Desktop GLSL, precision qualifiers dropped.
    Glsl,
    /// HLSL for Direct3D 9 (shader model 3).
    Hlsl9,
    /// HLSL for Direct3D 10 (shader model 4).
    Hlsl10,
}

impl OutputFormat {
    #[inline]
    pub const fn is_hlsl(self) -> bool {
        matches!(self, OutputFormat::Hlsl9 | OutputFormat::Hlsl10)
    }

    #[inline]
    pub const fn is_glsl(self) -> bool {
        !self.is_hlsl()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::GlslEs => "GLSL ES",
            OutputFormat::Glsl => "GLSL",
            OutputFormat::Hlsl9 => "HLSL (D3D9)",
            OutputFormat::Hlsl10 => "HLSL (D3D10)",
        })
    }
}

/// Pipeline stage of the shader being compiled.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const fn from_vertex_flag(for_vertex: bool) -> Self {
        if for_vertex {
            ShaderStage::Vertex
        } else {
            ShaderStage::Fragment
        }
    }

    #[inline]
    pub const fn is_vertex(self) -> bool {
        matches!(self, ShaderStage::Vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_families() {
        assert!(OutputFormat::Hlsl10.is_hlsl());
        assert!(OutputFormat::Glsl.is_glsl());
        assert_eq!(OutputFormat::default(), OutputFormat::GlslEs);
        assert_eq!(OutputFormat::Hlsl9.to_string(), "HLSL (D3D9)");
    }

    #[test]
    fn test_stage_flag() {
        assert!(ShaderStage::from_vertex_flag(true).is_vertex());
        assert_eq!(ShaderStage::from_vertex_flag(false), ShaderStage::Fragment);
    }
}
