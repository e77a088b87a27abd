//! Declarations: variables, structs, functions, precision and invariance.

use smallvec::SmallVec;
use wgl_diagnostic::{Diagnostic, ErrorCode};
use wgl_ir::{
    ArrayLength, Decl, DeclKind, ExprId, Field, FunctionProto, Intrinsic, Name, Precision, Span,
    StmtId, StorageQualifier, StructType, Type, TypeKind,
};

use super::names::AliasKind;
use super::{Checker, FunctionContext, FunctionSig, GlobalVariable};
use crate::builtins::{is_builtin_signature, may_be_invariant};
use crate::const_eval::ConstValue;
use crate::scope::{PrecisionKey, Symbol, SymbolKind};
use crate::types::{contains_array, contains_sampler, is_float_based, is_float_shape, same_type};
use crate::variables::VariableKind;

fn variable_kind(storage: StorageQualifier) -> Option<VariableKind> {
    match storage {
        StorageQualifier::Attribute => Some(VariableKind::Attribute),
        StorageQualifier::Uniform => Some(VariableKind::Uniform),
        StorageQualifier::Varying => Some(VariableKind::Varying),
        _ => None,
    }
}

/// Precision of a declared type, looking through arrays.
fn declared_precision(ty: &Type) -> Precision {
    match &ty.kind {
        TypeKind::Array(array) => declared_precision(&array.element),
        _ => ty.effective_precision(),
    }
}

fn same_params(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_type(x, y))
}

impl Checker<'_> {
    pub(crate) fn check_decl(&mut self, decl: &mut Decl) {
        let span = decl.span;
        match &mut decl.kind {
            DeclKind::Var { ty, name, init } => {
                let init = *init;
                self.check_variable(ty, name, init, None, span);
            }
            DeclKind::Array { ty, name, length } => {
                self.check_variable(ty, name, None, Some(length), span);
            }
            DeclKind::TypeDecl { ty, var_name } => self.check_type_decl(ty, var_name.as_mut(), span),
            DeclKind::Prototype(proto) => self.check_function(proto, None, span),
            DeclKind::Function { proto, body } => {
                let body = *body;
                self.check_function(proto, Some(body), span);
            }
            DeclKind::Precision { precision, ty } => {
                let precision = *precision;
                self.check_precision_decl(precision, ty, span);
            }
            DeclKind::Invariant { names } => self.check_invariant_decl(names, span),
        }
    }

    /// A variable or array declaration. `ty` is the element type when
    /// `length` is present. On success `name` holds the emitted name.
    fn check_variable(
        &mut self,
        ty: &mut Type,
        name: &mut Name,
        init: Option<ExprId>,
        length: Option<&mut ArrayLength>,
        span: Span,
    ) {
        let source_name = *name;
        let global = self.scopes.is_global();
        let storage = ty.storage();

        self.check_declared_name(source_name, span);
        if !self.check_type_usable(ty, span) {
            return;
        }
        self.apply_default_precision(ty, span, source_name);
        let Some(element) = self.resolve_type(ty, span) else {
            return;
        };
        let resolved = match length {
            Some(length) => {
                let Some(value) = self.fold_array_length(length, span, false) else {
                    return;
                };
                let mut element = element;
                let qualifier = element.qualifier.take();
                let mut array = Type::array(element, ArrayLength::constant(value));
                array.qualifier = qualifier;
                array
            }
            None => element,
        };

        if resolved.is_void() {
            let message = format!("`{}` cannot have type `void`", self.name_str(source_name));
            self.error(ErrorCode::E2011, span, message);
            return;
        }
        self.check_storage(storage, &resolved, global, span);
        if ty.is_invariant() && !(global && storage == StorageQualifier::Varying) {
            self.error(
                ErrorCode::E2049,
                span,
                "only global varyings can be declared `invariant`",
            );
        }
        if contains_sampler(&resolved) && storage != StorageQualifier::Uniform {
            self.error(
                ErrorCode::E2012,
                span,
                "samplers can only be declared as uniforms or function parameters",
            );
        }

        let value = match init {
            Some(init) => self.check_initializer(source_name, &resolved, storage, init),
            None => {
                if storage == StorageQualifier::Const {
                    let message = format!("const `{}` must be initialized", self.name_str(source_name));
                    self.error(ErrorCode::E2037, span, message);
                }
                None
            }
        };

        if global {
            if let Some(existing) = self.functions.get(&source_name).and_then(|sigs| sigs.first()) {
                let previous = existing.span;
                self.report_duplicate(source_name, span, previous);
                return;
            }
        }

        let interface = variable_kind(storage).filter(|_| global);
        let alias_kind = if interface.is_some() {
            AliasKind::Interface
        } else {
            AliasKind::Local
        };
        let alias = self.alias_for(source_name, alias_kind);

        let mut symbol = Symbol::variable(resolved.clone(), span);
        symbol.is_const = storage == StorageQualifier::Const && value.is_some();
        symbol.value = value.flatten();
        symbol.alias = alias;
        if interface.is_some() {
            symbol.global = Some(self.globals.len());
        }
        if !self.bind(source_name, symbol) {
            return;
        }
        if let Some(alias) = alias {
            *name = alias;
        }
        if let Some(kind) = interface {
            self.globals.push(GlobalVariable {
                kind,
                name: source_name,
                alias,
                precision: declared_precision(ty),
                ty: resolved,
                used: false,
                written: false,
            });
        }
    }

    /// Check an initializer. The outer `Option` is `Some` when the value is a
    /// constant expression; the inner one holds the folded value, if any.
    fn check_initializer(
        &mut self,
        name: Name,
        ty: &Type,
        storage: StorageQualifier,
        init: ExprId,
    ) -> Option<Option<ConstValue>> {
        let init_span = self.unit.expr(init).span;
        let init_ty = self.check_expr(init)?;
        if variable_kind(storage).is_some() {
            let message = format!("{} variables cannot be initialized", storage.as_str());
            self.error(ErrorCode::E2012, init_span, message);
            return None;
        }
        if !same_type(&init_ty, ty) {
            let message = format!(
                "cannot initialize `{}` of type `{}` with a value of type `{}`",
                self.name_str(name),
                self.describe(ty),
                self.describe(&init_ty)
            );
            self.error(ErrorCode::E2010, init_span, message);
            return None;
        }
        if storage != StorageQualifier::Const {
            return None;
        }
        if !self.is_constant(init, false) {
            let message = format!(
                "initializer of const `{}` is not a constant expression",
                self.name_str(name)
            );
            self.error(ErrorCode::E2037, init_span, message);
            return None;
        }
        Some(self.eval_const(init))
    }

    /// Storage qualifier rules for variables.
    fn check_storage(&mut self, storage: StorageQualifier, ty: &Type, global: bool, span: Span) {
        match storage {
            StorageQualifier::In | StorageQualifier::Out | StorageQualifier::InOut => {
                let message = format!("`{}` is only allowed on function parameters", storage.as_str());
                self.error(ErrorCode::E2011, span, message);
            }
            StorageQualifier::Attribute => {
                if !self.is_vertex() {
                    self.error(
                        ErrorCode::E2043,
                        span,
                        "attributes can only be declared in vertex shaders",
                    );
                } else if !global {
                    self.error(
                        ErrorCode::E2044,
                        span,
                        "attributes can only be declared at global scope",
                    );
                } else if !is_float_shape(ty) {
                    let message = format!(
                        "attributes must be a float, a float vector or a matrix, found `{}`",
                        self.describe(ty)
                    );
                    self.error(ErrorCode::E2047, span, message);
                }
            }
            StorageQualifier::Varying => {
                if !global {
                    self.error(
                        ErrorCode::E2046,
                        span,
                        "varyings can only be declared at global scope",
                    );
                } else if !is_float_based(ty) {
                    let message = format!(
                        "varyings must be a float, a float vector, a matrix or an array of these, found `{}`",
                        self.describe(ty)
                    );
                    self.error(ErrorCode::E2048, span, message);
                }
            }
            StorageQualifier::Uniform if !global => {
                self.error(
                    ErrorCode::E2045,
                    span,
                    "uniforms can only be declared at global scope",
                );
            }
            _ => {}
        }
    }

    /// `struct S { ... } [s];` or a bare `float;`.
    fn check_type_decl(&mut self, ty: &mut Type, var_name: Option<&mut Name>, span: Span) {
        if !self.check_type_usable(ty, span) {
            return;
        }
        if matches!(ty.kind, TypeKind::Struct(_)) && !self.define_struct(ty, span) {
            return;
        }
        if let Some(name) = var_name {
            self.check_variable(ty, name, None, None, span);
        }
    }

    /// Check a struct definition and bind its tag.
    fn define_struct(&mut self, ty: &mut Type, span: Span) -> bool {
        let TypeKind::Struct(definition) = &mut ty.kind else {
            return false;
        };
        if definition.fields.is_empty() {
            self.error(ErrorCode::E2041, span, "structs must have at least one field");
            return false;
        }

        let mut seen: SmallVec<[(Name, Span); 8]> = SmallVec::new();
        let mut fields = Vec::with_capacity(definition.fields.len());
        for field in &mut definition.fields {
            let nested = match &field.ty.kind {
                TypeKind::Struct(_) => true,
                TypeKind::Array(array) => matches!(array.element.kind, TypeKind::Struct(_)),
                _ => false,
            };
            if nested {
                self.error(
                    ErrorCode::E2042,
                    field.span,
                    "struct definitions cannot be nested",
                );
                continue;
            }
            if let Some(&(_, previous)) = seen.iter().find(|(name, _)| *name == field.name) {
                self.report_duplicate(field.name, field.span, previous);
                continue;
            }
            seen.push((field.name, field.span));

            self.check_declared_name(field.name, field.span);
            if !self.check_type_usable(&field.ty, field.span)
                || !self.fold_type_lengths(&mut field.ty, field.span, true)
            {
                continue;
            }
            self.apply_default_precision(&mut field.ty, field.span, field.name);
            if field.ty.is_void() {
                let message = format!("field `{}` cannot have type `void`", self.name_str(field.name));
                self.error(ErrorCode::E2011, field.span, message);
                continue;
            }
            if let Some(resolved) = self.resolve_type(&field.ty, field.span) {
                fields.push(Field {
                    name: field.name,
                    ty: resolved,
                    span: field.span,
                });
            }
        }

        let resolved = StructType {
            tag: definition.tag,
            fields,
        };
        if let Some(tag) = definition.tag {
            if self.check_declared_name(tag, span) {
                let struct_ty = Type::new(TypeKind::Struct(Box::new(resolved.clone())));
                let mut symbol = Symbol::variable(struct_ty, span);
                symbol.kind = SymbolKind::Struct(resolved);
                return self.bind(tag, symbol);
            }
        }
        true
    }

    /// A function prototype or definition.
    fn check_function(&mut self, proto: &mut FunctionProto, body: Option<StmtId>, span: Span) {
        if !self.scopes.is_global() {
            self.error(
                ErrorCode::E2050,
                span,
                "functions can only be declared at global scope",
            );
            return;
        }
        let source_name = proto.name;
        self.check_declared_name(source_name, span);

        let Some(return_type) = self.check_return_type(&mut proto.return_type, source_name, span)
        else {
            return;
        };
        let Some(params) = self.check_params(proto, source_name) else {
            return;
        };

        if self.name_str(source_name) == "main" && (!return_type.is_void() || !params.is_empty()) {
            self.error(
                ErrorCode::E2056,
                span,
                "`main` must be declared as `void main()`",
            );
        }
        if let Some(intrinsic) = Intrinsic::from_name(self.name_str(source_name)) {
            if is_builtin_signature(intrinsic, &params) {
                let message = format!("`{}` redefines a builtin function", intrinsic.name());
                self.error(ErrorCode::E2025, span, message);
                return;
            }
        }
        if let Some(existing) = self.scopes.lookup_global(source_name) {
            let previous = existing.span;
            self.report_duplicate(source_name, span, previous);
            return;
        }

        let Some(overload) = self.register_overload(source_name, &params, &return_type, body.is_some(), span)
        else {
            return;
        };

        let alias = match self.function_aliases.get(&source_name) {
            Some(&alias) => Some(alias),
            None => {
                let alias = self.alias_for(source_name, AliasKind::Local);
                if let Some(alias) = alias {
                    self.function_aliases.insert(source_name, alias);
                }
                alias
            }
        };
        if let Some(alias) = alias {
            proto.name = alias;
        }

        let Some(body) = body else {
            return;
        };
        let context = FunctionContext {
            key: (source_name, overload),
            return_type: return_type.clone(),
        };
        self.with_function(context, |checker| {
            for (param, ty) in proto.params.iter_mut().zip(params) {
                let Some(param_name) = param.name else {
                    continue;
                };
                if !checker.check_declared_name(param_name, param.span) {
                    continue;
                }
                let alias = checker.alias_for(param_name, AliasKind::Local);
                let mut symbol = Symbol::variable(ty, param.span);
                symbol.alias = alias;
                if checker.bind(param_name, symbol) {
                    if let Some(alias) = alias {
                        param.name = Some(alias);
                    }
                }
            }
            checker.check_function_body(body);
        });

        if !return_type.is_void() && !self.always_returns(body) {
            let message = format!(
                "function `{}` may reach its end without returning a value",
                self.name_str(source_name)
            );
            self.warning(ErrorCode::E2061, span, message);
        }
    }

    fn check_return_type(&mut self, ty: &mut Type, function: Name, span: Span) -> Option<Type> {
        if !self.check_type_usable(ty, span) {
            return None;
        }
        self.apply_default_precision(ty, span, function);
        let resolved = self.resolve_type(ty, span)?;
        if ty.storage() != StorageQualifier::None
            || resolved.is_array()
            || contains_sampler(&resolved)
            || contains_array(&resolved)
        {
            let message = format!(
                "`{}` cannot be used as a return type",
                self.describe(&resolved)
            );
            self.error(ErrorCode::E2051, span, message);
            return None;
        }
        Some(resolved)
    }

    /// Resolved parameter types, qualifiers kept.
    fn check_params(&mut self, proto: &mut FunctionProto, function: Name) -> Option<Vec<Type>> {
        let mut params = Vec::with_capacity(proto.params.len());
        let mut ok = true;
        for param in &mut proto.params {
            let span = param.span;
            if !self.check_type_usable(&param.ty, span) {
                ok = false;
                continue;
            }
            if param.ty.is_void() {
                self.error(ErrorCode::E2055, span, "parameters cannot have type `void`");
                ok = false;
                continue;
            }
            if !self.fold_type_lengths(&mut param.ty, span, false) {
                ok = false;
                continue;
            }
            self.apply_default_precision(&mut param.ty, span, param.name.unwrap_or(function));
            let Some(resolved) = self.resolve_type(&param.ty, span) else {
                ok = false;
                continue;
            };
            if param.ty.storage().writes_back() && contains_sampler(&resolved) {
                self.error(
                    ErrorCode::E2055,
                    span,
                    "samplers cannot be `out` or `inout` parameters",
                );
                ok = false;
                continue;
            }
            params.push(resolved);
        }
        ok.then_some(params)
    }

    /// Add a prototype or definition to the overload table and return its
    /// index there.
    fn register_overload(
        &mut self,
        name: Name,
        params: &[Type],
        return_type: &Type,
        defines: bool,
        span: Span,
    ) -> Option<usize> {
        let existing = self.functions.get(&name).and_then(|sigs| {
            sigs.iter()
                .enumerate()
                .find(|(_, sig)| same_params(&sig.params, params))
                .map(|(index, sig)| (index, sig.clone()))
        });

        let Some((index, previous)) = existing else {
            let sigs = self.functions.entry(name).or_default();
            sigs.push(FunctionSig {
                params: params.to_vec(),
                return_type: return_type.clone(),
                defined: defines,
                span,
            });
            return Some(sigs.len() - 1);
        };

        let qualifiers_differ = previous
            .params
            .iter()
            .zip(params)
            .any(|(a, b)| a.storage() != b.storage());
        let problem = if !same_type(&previous.return_type, return_type) {
            Some("is redeclared with a different return type")
        } else if qualifiers_differ {
            Some("is redeclared with different parameter qualifiers")
        } else if defines && previous.defined {
            Some("is already defined")
        } else {
            None
        };
        if let Some(problem) = problem {
            let message = format!("function `{}` {problem}", self.name_str(name));
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2053)
                    .with_message(message)
                    .with_label(span, ErrorCode::E2053.name())
                    .with_secondary_label(previous.span, "previously declared here"),
            );
            return None;
        }

        if defines {
            if let Some(sig) = self.functions.get_mut(&name).and_then(|sigs| sigs.get_mut(index)) {
                sig.defined = true;
                sig.span = span;
            }
        }
        Some(index)
    }

    /// `precision mediump float;`
    fn check_precision_decl(&mut self, precision: Precision, ty: &Type, span: Span) {
        let key = PrecisionKey::of(ty).filter(|_| ty.is_scalar() || ty.is_sampler());
        match key {
            Some(key) if self.check_type_usable(ty, span) => {
                self.scopes.set_default_precision(key, precision);
            }
            Some(_) => {}
            None => {
                let message = format!(
                    "default precision can only be set for `int`, `float` and samplers, found `{}`",
                    self.describe(ty)
                );
                self.error(ErrorCode::E2008, span, message);
            }
        }
    }

    /// `invariant a, b;`
    fn check_invariant_decl(&mut self, names: &[(Name, Span)], span: Span) {
        if !self.scopes.is_global() {
            self.error(
                ErrorCode::E2049,
                span,
                "invariant declarations are only allowed at global scope",
            );
            return;
        }
        for &(name, name_span) in names {
            let allowed = match self.scopes.lookup(name) {
                None => {
                    let message = format!("unknown variable `{}`", self.name_str(name));
                    self.error(ErrorCode::E2005, name_span, message);
                    continue;
                }
                Some(symbol) => match symbol.kind {
                    SymbolKind::Builtin => may_be_invariant(self.name_str(name)),
                    SymbolKind::Variable => symbol.ty.storage() == StorageQualifier::Varying,
                    SymbolKind::Struct(_) => false,
                },
            };
            if !allowed {
                let message = format!("`{}` cannot be declared invariant", self.name_str(name));
                self.error(ErrorCode::E2049, name_span, message);
            }
        }
    }
}
