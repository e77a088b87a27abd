//! Builtin function identifiers.
//!
//! The parser tags a `Var` naming a builtin function with its [`Intrinsic`],
//! so later passes dispatch on an enum instead of comparing strings. A user
//! function that shadows a builtin name keeps the tag; the validator reports
//! the override.

macro_rules! intrinsics {
    ($($variant:ident => $name:literal,)*) => {
        /// GLSL ES 1.00 builtin functions, plus the derivative functions of
        /// `GL_OES_standard_derivatives`.
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub enum Intrinsic {
            $($variant,)*
        }

        impl Intrinsic {
            /// Every intrinsic, in declaration order.
            pub const ALL: &'static [Intrinsic] = &[$(Intrinsic::$variant,)*];

            /// The GLSL name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Intrinsic::$variant => $name,)*
                }
            }

            /// Look up a builtin function by GLSL name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Intrinsic::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

intrinsics! {
    // Angle and trigonometry
    Radians => "radians",
    Degrees => "degrees",
    Sin => "sin",
    Cos => "cos",
    Tan => "tan",
    Asin => "asin",
    Acos => "acos",
    Atan => "atan",

    // Exponential
    Pow => "pow",
    Exp => "exp",
    Log => "log",
    Exp2 => "exp2",
    Log2 => "log2",
    Sqrt => "sqrt",
    Inversesqrt => "inversesqrt",

    // Common
    Abs => "abs",
    Sign => "sign",
    Floor => "floor",
    Ceil => "ceil",
    Fract => "fract",
    Mod => "mod",
    Min => "min",
    Max => "max",
    Clamp => "clamp",
    Mix => "mix",
    Step => "step",
    Smoothstep => "smoothstep",

    // Geometric
    Length => "length",
    Distance => "distance",
    Dot => "dot",
    Cross => "cross",
    Normalize => "normalize",
    Faceforward => "faceforward",
    Reflect => "reflect",
    Refract => "refract",

    // Matrix
    MatrixCompMult => "matrixCompMult",

    // Vector relational
    LessThan => "lessThan",
    LessThanEqual => "lessThanEqual",
    GreaterThan => "greaterThan",
    GreaterThanEqual => "greaterThanEqual",
    Equal => "equal",
    NotEqual => "notEqual",
    Any => "any",
    All => "all",
    Not => "not",

    // Texture lookup
    Texture2D => "texture2D",
    Texture2DProj => "texture2DProj",
    Texture2DLod => "texture2DLod",
    Texture2DProjLod => "texture2DProjLod",
    TextureCube => "textureCube",
    TextureCubeLod => "textureCubeLod",

    // Derivatives
    DFdx => "dFdx",
    DFdy => "dFdy",
    Fwidth => "fwidth",
}

impl Intrinsic {
    pub const fn is_texture_lookup(self) -> bool {
        matches!(
            self,
            Intrinsic::Texture2D
                | Intrinsic::Texture2DProj
                | Intrinsic::Texture2DLod
                | Intrinsic::Texture2DProjLod
                | Intrinsic::TextureCube
                | Intrinsic::TextureCubeLod
        )
    }

    /// Only available with `GL_OES_standard_derivatives` enabled.
    pub const fn requires_derivatives(self) -> bool {
        matches!(self, Intrinsic::DFdx | Intrinsic::DFdy | Intrinsic::Fwidth)
    }

    /// `*Lod` lookups are vertex-only in GLSL ES 1.00.
    pub const fn is_vertex_only(self) -> bool {
        matches!(
            self,
            Intrinsic::Texture2DLod | Intrinsic::Texture2DProjLod | Intrinsic::TextureCubeLod
        )
    }

    /// Component-wise comparison functions mapped onto binary operators.
    pub const fn relational_op(self) -> Option<super::BinaryOp> {
        match self {
            Intrinsic::LessThan => Some(super::BinaryOp::Lt),
            Intrinsic::LessThanEqual => Some(super::BinaryOp::Le),
            Intrinsic::GreaterThan => Some(super::BinaryOp::Gt),
            Intrinsic::GreaterThanEqual => Some(super::BinaryOp::Ge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for &intrinsic in Intrinsic::ALL {
            assert_eq!(Intrinsic::from_name(intrinsic.name()), Some(intrinsic));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Intrinsic::from_name("texture"), None);
        assert_eq!(Intrinsic::from_name("Sin"), None);
    }

    #[test]
    fn test_classification() {
        assert!(Intrinsic::TextureCubeLod.is_texture_lookup());
        assert!(Intrinsic::TextureCubeLod.is_vertex_only());
        assert!(Intrinsic::Fwidth.requires_derivatives());
        assert!(!Intrinsic::Mod.is_texture_lookup());
        assert_eq!(
            Intrinsic::GreaterThanEqual.relational_op(),
            Some(super::super::BinaryOp::Ge)
        );
    }
}
