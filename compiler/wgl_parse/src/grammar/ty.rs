//! Qualifiers and type specifiers.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{
    ArrayLength, Field, LayoutPair, Precision, StorageQualifier, StructType, TokenKind, Type,
    TypeKind, TypeQualifier,
};

use crate::{ParseError, Parser};

/// Wrap `ty` in an array, moving its qualifier to the array type.
pub(crate) fn array_of(mut ty: Type, length: ArrayLength) -> Type {
    let qualifier = ty.qualifier.take();
    let mut array = Type::array(ty, length);
    array.qualifier = qualifier;
    array
}

/// For the second and later declarators of `struct S { ... } a, b;`, refer
/// to the struct by tag so it is only defined once.
pub(crate) fn struct_reference(ty: &Type) -> Type {
    match &ty.kind {
        TypeKind::Struct(s) => match s.tag {
            Some(tag) => Type {
                kind: TypeKind::Name(tag),
                qualifier: ty.qualifier.clone(),
                precision: ty.precision,
                implicit_precision: ty.implicit_precision,
            },
            None => ty.clone(),
        },
        _ => ty.clone(),
    }
}

fn storage_qualifier(kind: TokenKind) -> Option<StorageQualifier> {
    match kind {
        TokenKind::Const => Some(StorageQualifier::Const),
        TokenKind::Attribute => Some(StorageQualifier::Attribute),
        TokenKind::Varying => Some(StorageQualifier::Varying),
        TokenKind::Uniform => Some(StorageQualifier::Uniform),
        TokenKind::In => Some(StorageQualifier::In),
        TokenKind::Out => Some(StorageQualifier::Out),
        TokenKind::InOut => Some(StorageQualifier::InOut),
        _ => None,
    }
}

impl Parser<'_> {
    /// Whether the current token starts a declaration rather than an
    /// expression statement.
    pub(crate) fn at_declaration_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Const
            | TokenKind::Attribute
            | TokenKind::Varying
            | TokenKind::Uniform
            | TokenKind::In
            | TokenKind::Out
            | TokenKind::InOut
            | TokenKind::Invariant
            | TokenKind::Precision
            | TokenKind::Lowp
            | TokenKind::Mediump
            | TokenKind::Highp
            | TokenKind::Struct => true,
            // `vec4(...)` is a constructor call.
            TokenKind::Type(_) => self.peek_kind(1) != TokenKind::LParen,
            kind @ TokenKind::Ident(_) => {
                self.at_layout()
                    || (self.is_struct_name(kind)
                        && matches!(self.peek_kind(1), TokenKind::Ident(_)))
            }
            _ => false,
        }
    }

    fn at_layout(&self) -> bool {
        self.current_kind() == TokenKind::Ident(self.layout)
            && self.peek_kind(1) == TokenKind::LParen
    }

    /// `lowp`, `mediump` or `highp`, if present.
    pub(crate) fn parse_precision_qualifier(&mut self) -> Precision {
        let precision = match self.current_kind() {
            TokenKind::Lowp => Precision::Low,
            TokenKind::Mediump => Precision::Medium,
            TokenKind::Highp => Precision::High,
            _ => return Precision::None,
        };
        self.advance();
        precision
    }

    /// `[layout(...)] [invariant] [storage]`
    fn parse_type_qualifier(&mut self) -> Result<Option<TypeQualifier>, ParseError> {
        let mut qualifier = TypeQualifier::default();
        let mut present = false;
        if self.at_layout() {
            qualifier.layout = self.parse_layout()?;
            present = true;
        }
        if self.eat(&TokenKind::Invariant) {
            qualifier.invariant = true;
            present = true;
        }
        if let Some(storage) = storage_qualifier(self.current_kind()) {
            self.advance();
            qualifier.storage = storage;
            present = true;
        }
        Ok(present.then_some(qualifier))
    }

    /// `layout ( id [= int] , ... )`. Accepted here so the validator can
    /// reject it with a proper diagnostic.
    fn parse_layout(&mut self) -> Result<Vec<LayoutPair>, ParseError> {
        self.advance();
        self.expect(&TokenKind::LParen)?;
        let mut pairs = Vec::new();
        loop {
            let (name, mut span) = self.expect_ident()?;
            let value = if self.eat(&TokenKind::Eq) {
                let negative = self.eat(&TokenKind::Minus);
                let value = match self.current_kind() {
                    TokenKind::Int(v) => Some(v),
                    TokenKind::UInt(v) => i32::try_from(v).ok(),
                    _ => None,
                };
                let Some(value) = value else {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "expected integer layout value, found {}",
                            self.current_kind().display_name()
                        ),
                        self.current_span(),
                    ));
                };
                span = span.merge(self.advance());
                Some(if negative { value.wrapping_neg() } else { value })
            } else {
                None
            };
            pairs.push(LayoutPair { name, value, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(pairs)
    }

    /// A basic type keyword, a struct specifier, or a declared struct name.
    pub(crate) fn parse_type_specifier(&mut self) -> Result<Type, ParseError> {
        match self.current_kind() {
            TokenKind::Type(keyword) => {
                self.advance();
                Ok(Type::new(keyword.to_kind()))
            }
            TokenKind::Struct => self.parse_struct_specifier(),
            TokenKind::Ident(name) if self.struct_names.contains(&name) => {
                self.advance();
                Ok(Type::named(name))
            }
            kind => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected type, found {}", kind.display_name()),
                self.current_span(),
            )
            .with_context("expected type")),
        }
    }

    /// Qualifiers, precision and type specifier.
    pub(crate) fn parse_fully_specified_type(&mut self) -> Result<Type, ParseError> {
        let qualifier = self.parse_type_qualifier()?;
        let precision = self.parse_precision_qualifier();
        let mut ty = self.parse_type_specifier()?;
        ty.qualifier = qualifier;
        ty.precision = precision;
        Ok(ty)
    }

    /// `[ constant-expression ]`, or `[]` for an unsized array.
    pub(crate) fn parse_array_length(&mut self) -> Result<ArrayLength, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        if self.eat(&TokenKind::RBracket) {
            return Ok(ArrayLength::default());
        }
        let expr = self.parse_conditional()?;
        self.expect(&TokenKind::RBracket)?;
        Ok(ArrayLength {
            expr: Some(expr),
            value: None,
        })
    }

    fn parse_struct_specifier(&mut self) -> Result<Type, ParseError> {
        self.expect(&TokenKind::Struct)?;
        let tag = match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Some(name)
            }
            _ => None,
        };
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let precision = self.parse_precision_qualifier();
            let mut ty = self.parse_type_specifier()?;
            ty.precision = precision;
            loop {
                let (name, name_span) = self.expect_ident()?;
                let field_ty = if self.check(&TokenKind::LBracket) {
                    let length = self.parse_array_length()?;
                    array_of(ty.clone(), length)
                } else {
                    ty.clone()
                };
                fields.push(Field {
                    name,
                    ty: field_ty,
                    span: name_span.merge(self.previous_span()),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::Semicolon)?;
        }
        self.expect(&TokenKind::RBrace)?;
        if let Some(tag) = tag {
            self.struct_names.insert(tag);
        }
        Ok(Type::new(TypeKind::Struct(Box::new(StructType { tag, fields }))))
    }
}
