//! Keyword resolution.
//!
//! Identifiers are looked up in three tables after macro expansion:
//! 1. **Keywords**, which become their own token kinds
//! 2. **Type keywords**, which become [`TokenKind::Type`]; the lexer accepts
//!    the wider GLSL type vocabulary and leaves ES 1.00 legality to the
//!    validator
//! 3. **Reserved words**, which are a lexical error wherever they appear

use wgl_ir::{SamplerFlavour, SamplerKind, SamplerType, TokenKind, TypeKeyword};

/// Resolved meaning of an identifier-shaped token.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Word {
    Keyword(TokenKind),
    Reserved,
    Ident,
}

/// Classify identifier text.
pub(crate) fn lookup(text: &str) -> Word {
    if let Some(kind) = keyword(text) {
        return Word::Keyword(kind);
    }
    if let Some(ty) = type_keyword(text) {
        return Word::Keyword(TokenKind::Type(ty));
    }
    if is_reserved(text) {
        return Word::Reserved;
    }
    Word::Ident
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "attribute" => TokenKind::Attribute,
        "const" => TokenKind::Const,
        "uniform" => TokenKind::Uniform,
        "varying" => TokenKind::Varying,
        "in" => TokenKind::In,
        "out" => TokenKind::Out,
        "inout" => TokenKind::InOut,
        "invariant" => TokenKind::Invariant,
        "precision" => TokenKind::Precision,
        "lowp" => TokenKind::Lowp,
        "mediump" => TokenKind::Mediump,
        "highp" => TokenKind::Highp,
        "struct" => TokenKind::Struct,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "discard" => TokenKind::Discard,
        _ => return None,
    };
    Some(kind)
}

fn type_keyword(text: &str) -> Option<TypeKeyword> {
    let ty = match text {
        "void" => TypeKeyword::Void,
        "float" => TypeKeyword::Float,
        "int" => TypeKeyword::Int,
        "uint" => TypeKeyword::UInt,
        "bool" => TypeKeyword::Bool,
        _ => return vector_or_matrix(text).or_else(|| sampler(text).map(TypeKeyword::Sampler)),
    };
    Some(ty)
}

/// `vecN`, `bvecN`, `ivecN`, `uvecN`, `matN`, `matCxR`.
fn vector_or_matrix(text: &str) -> Option<TypeKeyword> {
    fn size(digit: &str) -> Option<u8> {
        match digit {
            "2" => Some(2),
            "3" => Some(3),
            "4" => Some(4),
            _ => None,
        }
    }

    if let Some(rest) = text.strip_prefix("vec") {
        return size(rest).map(TypeKeyword::Vec);
    }
    if let Some(rest) = text.strip_prefix("bvec") {
        return size(rest).map(TypeKeyword::BVec);
    }
    if let Some(rest) = text.strip_prefix("ivec") {
        return size(rest).map(TypeKeyword::IVec);
    }
    if let Some(rest) = text.strip_prefix("uvec") {
        return size(rest).map(TypeKeyword::UVec);
    }
    let rest = text.strip_prefix("mat")?;
    match rest.split_once('x') {
        Some((columns, rows)) => Some(TypeKeyword::Mat(size(columns)?, size(rows)?)),
        None => size(rest).map(|n| TypeKeyword::Mat(n, n)),
    }
}

fn sampler(text: &str) -> Option<SamplerType> {
    let (flavour, rest) = if let Some(rest) = text.strip_prefix("isampler") {
        (SamplerFlavour::Int, rest)
    } else if let Some(rest) = text.strip_prefix("usampler") {
        (SamplerFlavour::UInt, rest)
    } else {
        (SamplerFlavour::Float, text.strip_prefix("sampler")?)
    };
    let kind = match rest {
        "2D" => SamplerKind::Sampler2D,
        "Cube" => SamplerKind::SamplerCube,
        "3D" => SamplerKind::Sampler3D,
        "2DArray" => SamplerKind::Sampler2DArray,
        "2DMS" => SamplerKind::Sampler2DMS,
        "2DShadow" if flavour == SamplerFlavour::Float => SamplerKind::Sampler2DShadow,
        "CubeShadow" if flavour == SamplerFlavour::Float => SamplerKind::SamplerCubeShadow,
        "2DArrayShadow" if flavour == SamplerFlavour::Float => SamplerKind::Sampler2DArrayShadow,
        _ => return None,
    };
    Some(SamplerType::new(kind, flavour))
}

/// Words GLSL ES 1.00 reserves for future use.
fn is_reserved(text: &str) -> bool {
    matches!(
        text,
        "asm"
            | "class"
            | "union"
            | "enum"
            | "typedef"
            | "template"
            | "this"
            | "packed"
            | "goto"
            | "inline"
            | "noinline"
            | "volatile"
            | "public"
            | "static"
            | "extern"
            | "external"
            | "interface"
            | "flat"
            | "long"
            | "short"
            | "double"
            | "half"
            | "fixed"
            | "unsigned"
            | "superp"
            | "input"
            | "output"
            | "hvec2"
            | "hvec3"
            | "hvec4"
            | "dvec2"
            | "dvec3"
            | "dvec4"
            | "fvec2"
            | "fvec3"
            | "fvec4"
            | "sampler1D"
            | "sampler1DShadow"
            | "sampler2DRect"
            | "sampler3DRect"
            | "sampler2DRectShadow"
            | "sizeof"
            | "cast"
            | "namespace"
            | "using"
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(lookup("uniform"), Word::Keyword(TokenKind::Uniform));
        assert_eq!(lookup("discard"), Word::Keyword(TokenKind::Discard));
        assert_eq!(lookup("mediump"), Word::Keyword(TokenKind::Mediump));
    }

    #[test]
    fn test_type_keywords() {
        assert_eq!(lookup("vec3"), Word::Keyword(TokenKind::Type(TypeKeyword::Vec(3))));
        assert_eq!(lookup("bvec2"), Word::Keyword(TokenKind::Type(TypeKeyword::BVec(2))));
        assert_eq!(lookup("mat4"), Word::Keyword(TokenKind::Type(TypeKeyword::Mat(4, 4))));
        assert_eq!(lookup("mat2x3"), Word::Keyword(TokenKind::Type(TypeKeyword::Mat(2, 3))));
        assert_eq!(
            lookup("samplerCube"),
            Word::Keyword(TokenKind::Type(TypeKeyword::Sampler(SamplerType::new(
                SamplerKind::SamplerCube,
                SamplerFlavour::Float
            ))))
        );
        assert_eq!(
            lookup("isampler3D"),
            Word::Keyword(TokenKind::Type(TypeKeyword::Sampler(SamplerType::new(
                SamplerKind::Sampler3D,
                SamplerFlavour::Int
            ))))
        );
    }

    #[test]
    fn test_near_misses_are_identifiers() {
        assert_eq!(lookup("vec5"), Word::Ident);
        assert_eq!(lookup("mat2x"), Word::Ident);
        assert_eq!(lookup("isampler2DShadow"), Word::Ident);
        assert_eq!(lookup("colour"), Word::Ident);
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(lookup("static"), Word::Reserved);
        assert_eq!(lookup("double"), Word::Reserved);
        assert_eq!(lookup("sampler2DRect"), Word::Reserved);
    }
}
