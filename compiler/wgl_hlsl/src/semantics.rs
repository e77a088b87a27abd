//! HLSL semantics for shader inputs and outputs.
//!
//! Every member of `VS_IN`, `VS_OUT` and `PS_OUT` carries a semantic. A
//! caller may pin a variable to a semantic through a [`SemanticInfo`]
//! table; otherwise the generator picks one from the variable's type.
//! Indexed semantics such as `TEXCOORD` number their uses with a counter
//! that restarts at each struct.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

/// Direct3D 9 semantic kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Semantic {
    Binormal,
    BlendIndices,
    BlendWeight,
    Color,
    Depth,
    Fog,
    Normal,
    Position,
    PositionT,
    PSize,
    Tangent,
    TessFactor,
    TexCoord,
    VFace,
    VPos,
}

impl Semantic {
    pub const ALL: [Semantic; 15] = [
        Semantic::Binormal,
        Semantic::BlendIndices,
        Semantic::BlendWeight,
        Semantic::Color,
        Semantic::Depth,
        Semantic::Fog,
        Semantic::Normal,
        Semantic::Position,
        Semantic::PositionT,
        Semantic::PSize,
        Semantic::Tangent,
        Semantic::TessFactor,
        Semantic::TexCoord,
        Semantic::VFace,
        Semantic::VPos,
    ];

    /// Direct3D 9 spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Semantic::Binormal => "BINORMAL",
            Semantic::BlendIndices => "BLENDINDICES",
            Semantic::BlendWeight => "BLENDWEIGHT",
            Semantic::Color => "COLOR",
            Semantic::Depth => "DEPTH",
            Semantic::Fog => "FOG",
            Semantic::Normal => "NORMAL",
            Semantic::Position => "POSITION",
            Semantic::PositionT => "POSITIONT",
            Semantic::PSize => "PSIZE",
            Semantic::Tangent => "TANGENT",
            Semantic::TessFactor => "TESSFACTOR",
            Semantic::TexCoord => "TEXCOORD",
            Semantic::VFace => "VFACE",
            Semantic::VPos => "VPOS",
        }
    }

    /// Whether the semantic takes a register index, as in `TEXCOORD3`.
    pub const fn is_indexed(self) -> bool {
        !matches!(
            self,
            Semantic::PositionT | Semantic::Fog | Semantic::VFace | Semantic::VPos
        )
    }

    /// Spelling for the target: Direct3D 10 replaces the fixed-function
    /// semantics with system values.
    pub const fn spelling(self, d3d10: bool) -> &'static str {
        if d3d10 {
            match self {
                Semantic::Color => return "SV_Target",
                Semantic::Position | Semantic::VPos => return "SV_Position",
                Semantic::VFace => return "SV_IsFrontFace",
                Semantic::Depth => return "SV_Depth",
                _ => {}
            }
        }
        self.as_str()
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown semantic name.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UnknownSemantic(pub String);

impl fmt::Display for UnknownSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HLSL semantic `{}`", self.0)
    }
}

impl std::error::Error for UnknownSemantic {}

impl FromStr for Semantic {
    type Err = UnknownSemantic;

    /// Case-insensitive, without a register index.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Semantic::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(text))
            .ok_or_else(|| UnknownSemantic(text.to_owned()))
    }
}

/// Semantic overrides by GLSL variable name.
pub type SemanticInfo = FxHashMap<String, Semantic>;

/// Next free register index per indexed semantic.
#[derive(Clone, Debug, Default)]
pub struct SemanticCounters {
    next: [u32; Semantic::ALL.len()],
}

impl SemanticCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new struct.
    pub fn reset(&mut self) {
        self.next = [0; Semantic::ALL.len()];
    }

    /// Claim `registers` consecutive registers of `semantic` and return the
    /// first index, or `None` for semantics without an index.
    pub fn claim(&mut self, semantic: Semantic, registers: u32) -> Option<u32> {
        if !semantic.is_indexed() {
            return None;
        }
        let slot = &mut self.next[semantic.slot()];
        let index = *slot;
        *slot += registers.max(1);
        Some(index)
    }

    /// The index the next claim of `semantic` would get.
    pub fn peek(&self, semantic: Semantic) -> u32 {
        self.next[semantic.slot()]
    }
}

/// `semantic` with its index, in the target's spelling.
pub fn semantic_text(semantic: Semantic, index: Option<u32>, d3d10: bool) -> String {
    let name = semantic.spelling(d3d10);
    match index {
        // System values other than render targets take no index.
        Some(_) if d3d10 && semantic == Semantic::Position => name.to_owned(),
        Some(index) => format!("{name}{index}"),
        None => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_counters_advance_by_register_count() {
        let mut counters = SemanticCounters::new();
        assert_eq!(counters.claim(Semantic::TexCoord, 1), Some(0));
        // A mat3 takes three registers.
        assert_eq!(counters.claim(Semantic::TexCoord, 3), Some(1));
        assert_eq!(counters.claim(Semantic::TexCoord, 1), Some(4));
        assert_eq!(counters.claim(Semantic::PSize, 1), Some(0));
        assert_eq!(counters.claim(Semantic::VPos, 1), None);
        assert_eq!(counters.peek(Semantic::TexCoord), 5);

        counters.reset();
        assert_eq!(counters.claim(Semantic::TexCoord, 1), Some(0));
    }

    #[test]
    fn test_d3d10_spelling() {
        assert_eq!(semantic_text(Semantic::Color, Some(0), false), "COLOR0");
        assert_eq!(semantic_text(Semantic::Color, Some(1), true), "SV_Target1");
        assert_eq!(semantic_text(Semantic::Position, Some(0), true), "SV_Position");
        assert_eq!(semantic_text(Semantic::VPos, None, true), "SV_Position");
        assert_eq!(semantic_text(Semantic::TexCoord, Some(2), true), "TEXCOORD2");
    }

    #[test]
    fn test_parse() {
        assert_eq!("texcoord".parse::<Semantic>(), Ok(Semantic::TexCoord));
        assert_eq!("BLENDWEIGHT".parse::<Semantic>(), Ok(Semantic::BlendWeight));
        assert_eq!(
            "TEXCOORD0".parse::<Semantic>(),
            Err(UnknownSemantic("TEXCOORD0".to_owned()))
        );
    }
}
