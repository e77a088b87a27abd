//! Declarations.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{
    Decl, DeclKind, FunctionProto, Name, Param, Precision, Span, StorageQualifier, TokenKind,
    Type, TypeKeyword, TypeKind,
};

use super::ty::{array_of, struct_reference};
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one declaration, which may declare several names.
    ///
    /// Function definitions are accepted only when `file_scope` is set;
    /// prototypes are accepted anywhere.
    pub(crate) fn parse_declaration(&mut self, file_scope: bool) -> Result<Vec<Decl>, ParseError> {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Precision => return Ok(vec![self.parse_precision_decl()?]),
            TokenKind::Invariant
                if matches!(self.peek_kind(1), TokenKind::Ident(_))
                    && !self.is_struct_name(self.peek_kind(1)) =>
            {
                return Ok(vec![self.parse_invariant_decl()?]);
            }
            _ => {}
        }

        let ty = self.parse_fully_specified_type()?;

        // `struct S { ... };` or a bare `float;`
        if self.check(&TokenKind::Semicolon) {
            let end = self.advance();
            return Ok(vec![Decl::new(
                DeclKind::TypeDecl { ty, var_name: None },
                start.merge(end),
            )]);
        }

        let (name, name_span) = self.expect_ident()?;
        if self.check(&TokenKind::LParen) {
            return Ok(vec![self.parse_function(ty, name, start, file_scope)?]);
        }
        self.parse_declarators(ty, name, name_span, start)
    }

    /// `precision highp float;`
    fn parse_precision_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.advance();
        let precision = self.parse_precision_qualifier();
        if precision == Precision::None {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected precision qualifier, found {}",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            )
            .with_context("expected `lowp`, `mediump` or `highp`"));
        }
        let ty = self.parse_type_specifier()?;
        let end = self.expect(&TokenKind::Semicolon)?;
        Ok(Decl::new(
            DeclKind::Precision { precision, ty },
            start.merge(end),
        ))
    }

    /// `invariant gl_Position, v_color;`
    fn parse_invariant_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.advance();
        let mut names = Vec::new();
        loop {
            names.push(self.expect_ident()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::Semicolon)?;
        Ok(Decl::new(DeclKind::Invariant { names }, start.merge(end)))
    }

    /// `name [= init] | name[len]`, separated by commas, then `;`.
    fn parse_declarators(
        &mut self,
        ty: Type,
        first: Name,
        first_span: Span,
        start: Span,
    ) -> Result<Vec<Decl>, ParseError> {
        let defines_struct = matches!(ty.kind, TypeKind::Struct(_));
        let mut decls: Vec<Decl> = Vec::new();
        let mut ty = ty;
        let (mut name, mut name_span) = (first, first_span);
        loop {
            let decl_start = if decls.is_empty() { start } else { name_span };
            let kind = if defines_struct
                && decls.is_empty()
                && matches!(
                    self.current_kind(),
                    TokenKind::Comma | TokenKind::Semicolon
                ) {
                DeclKind::TypeDecl {
                    ty: ty.clone(),
                    var_name: Some(name),
                }
            } else if self.check(&TokenKind::LBracket) {
                let length = self.parse_array_length()?;
                if self.check(&TokenKind::Eq) {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        "arrays cannot have initializers in GLSL ES 1.00",
                        self.current_span(),
                    )
                    .with_context("initializer not allowed"));
                }
                DeclKind::Array {
                    ty: ty.clone(),
                    name,
                    length,
                }
            } else {
                let init = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_assignment()?)
                } else {
                    None
                };
                DeclKind::Var {
                    ty: ty.clone(),
                    name,
                    init,
                }
            };
            decls.push(Decl::new(kind, decl_start.merge(self.previous_span())));

            if defines_struct && decls.len() == 1 {
                ty = struct_reference(&ty);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            (name, name_span) = self.expect_ident()?;
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(decls)
    }

    fn parse_function(
        &mut self,
        return_type: Type,
        name: Name,
        start: Span,
        file_scope: bool,
    ) -> Result<Decl, ParseError> {
        let params = self.parse_parameters()?;
        let proto = FunctionProto {
            return_type,
            name,
            params,
        };
        if self.check(&TokenKind::LBrace) {
            if !file_scope {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    "function definitions are only allowed at global scope",
                    self.current_span(),
                )
                .with_context("nested function body"));
            }
            let body = self.parse_compound_statement()?;
            let span = start.merge(self.previous_span());
            return Ok(Decl::new(DeclKind::Function { proto, body }, span));
        }
        let end = self.expect(&TokenKind::Semicolon)?;
        Ok(Decl::new(DeclKind::Prototype(proto), start.merge(end)))
    }

    /// `( )`, `( void )`, or a comma-separated parameter list.
    fn parse_parameters(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.current_kind() == TokenKind::Type(TypeKeyword::Void)
            && self.peek_kind(1) == TokenKind::RParen
        {
            self.advance();
        }
        if self.eat(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.parse_parameter()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `[const] [in|out|inout] [precision] type [name] [[len]]`
    fn parse_parameter(&mut self) -> Result<Param, ParseError> {
        let start = self.current_span();
        let is_const = self.eat(&TokenKind::Const);
        let direction = match self.current_kind() {
            TokenKind::In => Some(StorageQualifier::In),
            TokenKind::Out => Some(StorageQualifier::Out),
            TokenKind::InOut => Some(StorageQualifier::InOut),
            _ => None,
        };
        if direction.is_some() {
            self.advance();
        }
        let storage = match (is_const, direction) {
            (true, None | Some(StorageQualifier::In)) => Some(StorageQualifier::Const),
            (true, Some(_)) => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    "`const` parameters cannot be `out` or `inout`",
                    start.merge(self.previous_span()),
                ));
            }
            (false, direction) => direction,
        };
        let precision = self.parse_precision_qualifier();
        let mut ty = self.parse_type_specifier()?;
        ty.precision = precision;
        if let Some(storage) = storage {
            ty = ty.with_storage(storage);
        }
        let name = match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Some(name)
            }
            _ => None,
        };
        if self.check(&TokenKind::LBracket) {
            let length = self.parse_array_length()?;
            ty = array_of(ty, length);
        }
        Ok(Param {
            ty,
            name,
            span: start.merge(self.previous_span()),
        })
    }
}
