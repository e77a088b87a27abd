//! Calls, overload resolution and constructors.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{ExprId, ExprKind, Intrinsic, Name, Span, Type, TypeKind};

use super::{CallEdge, Checker};
use crate::builtins::{resolve_intrinsic, IntrinsicError};
use crate::types::{component_count, contains_array, contains_sampler, is_es100_type, same_type};

impl Checker<'_> {
    pub(crate) fn check_call(&mut self, callee: ExprId, args: &[ExprId], span: Span) -> Option<Type> {
        let mut arg_types = Vec::with_capacity(args.len());
        let mut failed = false;
        for &arg in args {
            match self.check_expr(arg) {
                Some(ty) => arg_types.push(ty),
                None => failed = true,
            }
        }

        match self.unit.expr(callee).kind.clone() {
            ExprKind::TypeConstructor(target) => {
                let target = self.resolve_type(&target, span)?;
                if failed {
                    return None;
                }
                let ty = self.check_constructor(&target, &arg_types, span)?;
                self.types.set(callee, ty.clone());
                Some(ty)
            }
            ExprKind::Var { name, intrinsic } => {
                if failed {
                    return None;
                }
                self.check_function_call(callee, name, intrinsic, args, &arg_types, span)
            }
            _ => {
                self.error(ErrorCode::E2054, span, "expression cannot be called");
                None
            }
        }
    }

    fn argument_list(&self, arg_types: &[Type]) -> String {
        arg_types
            .iter()
            .map(|ty| self.describe(ty))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn check_function_call(
        &mut self,
        callee: ExprId,
        name: Name,
        intrinsic: Option<Intrinsic>,
        args: &[ExprId],
        arg_types: &[Type],
        span: Span,
    ) -> Option<Type> {
        if self.scopes.lookup(name).is_some_and(|s| !s.is_struct()) {
            let message = format!("`{}` is a variable, not a function", self.name_str(name));
            self.error(ErrorCode::E2054, span, message);
            return None;
        }

        let overload = self.functions.get(&name).and_then(|sigs| {
            sigs.iter()
                .enumerate()
                .find(|(_, sig)| {
                    sig.params.len() == arg_types.len()
                        && sig.params.iter().zip(arg_types).all(|(p, a)| same_type(p, a))
                })
                .map(|(index, sig)| (index, sig.clone()))
        });
        if let Some((index, sig)) = overload {
            for (param, &arg) in sig.params.iter().zip(args) {
                if param.storage().writes_back() {
                    self.check_lvalue(arg, true);
                }
            }
            let emitted = self.function_aliases.get(&name).copied().unwrap_or(name);
            self.unit.exprs[callee].kind = ExprKind::var(emitted);
            if let Some(caller) = self.function.as_ref().map(|f| f.key) {
                self.calls.push(CallEdge {
                    caller,
                    callee: (name, index),
                    span,
                });
            }
            return Some(sig.return_type.unqualified());
        }

        let Some(intrinsic) = intrinsic else {
            let message = if self.functions.contains_key(&name) {
                format!(
                    "no overload of `{}` takes ({})",
                    self.name_str(name),
                    self.argument_list(arg_types)
                )
            } else {
                format!("unknown function `{}`", self.name_str(name))
            };
            let code = if self.functions.contains_key(&name) {
                ErrorCode::E2022
            } else {
                ErrorCode::E2005
            };
            self.error(code, span, message);
            return None;
        };

        let ty = match resolve_intrinsic(intrinsic, arg_types, self.options.stage) {
            Ok(ty) => ty,
            Err(error) => {
                let function = intrinsic.name();
                let message = match error {
                    IntrinsicError::NoMatch => format!(
                        "no overload of `{function}` takes ({})",
                        self.argument_list(arg_types)
                    ),
                    IntrinsicError::VertexOnly => {
                        format!("`{function}` with a level of detail is only available in vertex shaders")
                    }
                    IntrinsicError::FragmentOnly => {
                        format!("`{function}` with a bias is only available in fragment shaders")
                    }
                };
                self.error(ErrorCode::E2022, span, message);
                return None;
            }
        };

        if intrinsic.requires_derivatives() {
            if self.is_vertex() {
                let message = format!("`{}` is only available in fragment shaders", intrinsic.name());
                self.error(ErrorCode::E2022, span, message);
                return None;
            }
            if !self.options.derivatives_enabled {
                let message = format!(
                    "`{}` requires the `GL_OES_standard_derivatives` extension",
                    intrinsic.name()
                );
                self.error(ErrorCode::E2059, span, message);
                return None;
            }
            self.uses_derivatives = true;
        }
        Some(ty)
    }

    fn check_constructor(&mut self, target: &Type, args: &[Type], span: Span) -> Option<Type> {
        if !is_es100_type(target) {
            let message = format!("`{}` is not a GLSL ES 1.00 type", self.describe(target));
            self.error(ErrorCode::E2011, span, message);
            return None;
        }
        match &target.kind {
            TypeKind::Struct(s) => {
                if contains_sampler(target) || contains_array(target) {
                    let message = format!(
                        "`{}` cannot be constructed: it contains samplers or arrays",
                        self.describe(target)
                    );
                    self.error(ErrorCode::E2020, span, message);
                    return None;
                }
                let matches = s.fields.len() == args.len()
                    && s.fields.iter().zip(args).all(|(f, a)| same_type(&f.ty, a));
                if !matches {
                    let expected: Vec<Type> = s.fields.iter().map(|f| f.ty.clone()).collect();
                    let message = format!(
                        "`{}` constructor expects ({}), found ({})",
                        self.describe(target),
                        self.argument_list(&expected),
                        self.argument_list(args)
                    );
                    self.error(ErrorCode::E2021, span, message);
                    return None;
                }
                Some(target.unqualified())
            }
            TypeKind::Basic(_) | TypeKind::Vector(_) | TypeKind::Matrix(_) if !target.is_void() => self
                .check_numeric_constructor(target, args, span)
                .then(|| target.unqualified()),
            _ => {
                let message = format!("`{}` cannot be constructed", self.describe(target));
                self.error(ErrorCode::E2020, span, message);
                None
            }
        }
    }

    /// Scalar, vector and matrix constructors: every argument contributes
    /// components, and none may be left entirely unused.
    fn check_numeric_constructor(&mut self, target: &Type, args: &[Type], span: Span) -> bool {
        let description = self.describe(target);
        if args.is_empty() {
            let message = format!("`{description}` constructor needs at least one argument");
            self.error(ErrorCode::E2021, span, message);
            return false;
        }
        if let Some(bad) = args.iter().find(|a| !a.is_numeric_shape()) {
            let message = format!("cannot construct `{description}` from `{}`", self.describe(bad));
            self.error(ErrorCode::E2021, span, message);
            return false;
        }
        if args.len() == 1 {
            return true;
        }
        if target.is_matrix() && args.iter().any(Type::is_matrix) {
            self.error(
                ErrorCode::E2021,
                span,
                "a matrix argument to a matrix constructor must be the only argument",
            );
            return false;
        }

        let needed = component_count(target);
        let mut total = 0;
        for arg in args {
            if total >= needed {
                let message = format!("too many arguments to `{description}` constructor");
                self.error(ErrorCode::E2021, span, message);
                return false;
            }
            total += component_count(arg);
        }
        if total < needed {
            let message = format!(
                "not enough components to construct `{description}`: found {total}, need {needed}"
            );
            self.error(ErrorCode::E2021, span, message);
            return false;
        }
        true
    }
}
