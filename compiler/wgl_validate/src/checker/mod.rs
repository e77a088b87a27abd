//! Semantic checker.
//!
//! # Module Structure
//!
//! - `scope_guards`: closure-based scope and function context management
//! - `names`: identifier rules and HLSL aliasing
//! - `resolve`: type resolution, array lengths and default precision
//! - `decl`: global and local declarations, structs and functions
//! - `stmt`: statements
//! - `loops`: the `for` loop restrictions of GLSL ES Appendix A
//! - `expr`: expressions, l-values, indexing and swizzles
//! - `call`: calls, overload resolution and constructors
//! - `constants`: constant-expression tests and folding over the arena
//! - `recursion`: call graph cycle detection

mod call;
mod constants;
mod decl;
mod expr;
mod loops;
mod names;
mod recursion;
mod resolve;
mod scope_guards;
mod stmt;

use rustc_hash::FxHashMap;
use wgl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use wgl_ir::{
    ExprTypes, Name, Precision, ShaderStage, Span, StringInterner, TranslationUnit, Type,
};

use crate::builtins::builtin_variables;
use crate::const_eval::{ConstValue, Scalar};
use crate::scope::{PrecisionKey, Scopes, Symbol, SymbolKind};
use crate::variables::{
    Ownership, ShaderVariable, ShaderVariables, VarType, VariableKind, VariableName,
};
use crate::{ValidateOptions, ValidateOutput};

/// One overload of a user function.
#[derive(Clone, Debug)]
pub(crate) struct FunctionSig {
    pub params: Vec<Type>,
    pub return_type: Type,
    pub defined: bool,
    pub span: Span,
}

/// A call from one user function to another.
#[derive(Clone, Debug)]
pub(crate) struct CallEdge {
    pub caller: FunctionKey,
    pub callee: FunctionKey,
    pub span: Span,
}

/// A user function overload: its name and index in the overload list.
pub(crate) type FunctionKey = (Name, usize);

/// Function whose body is being checked.
#[derive(Clone, Debug)]
pub(crate) struct FunctionContext {
    pub key: FunctionKey,
    pub return_type: Type,
}

/// An attribute, uniform or varying, tracked for the variables table.
#[derive(Clone, Debug)]
pub(crate) struct GlobalVariable {
    pub kind: VariableKind,
    pub name: Name,
    pub alias: Option<Name>,
    pub ty: Type,
    pub precision: Precision,
    pub used: bool,
    pub written: bool,
}

pub(crate) struct Checker<'a> {
    pub(crate) unit: &'a mut TranslationUnit,
    pub(crate) interner: &'a mut StringInterner,
    pub(crate) options: &'a ValidateOptions,
    pub(crate) scopes: Scopes,
    pub(crate) functions: FxHashMap<Name, Vec<FunctionSig>>,
    pub(crate) function_aliases: FxHashMap<Name, Name>,
    pub(crate) globals: Vec<GlobalVariable>,
    pub(crate) types: ExprTypes,
    pub(crate) diagnostics: DiagnosticQueue,
    pub(crate) function: Option<FunctionContext>,
    pub(crate) loop_depth: u32,
    pub(crate) switch_depth: u32,
    pub(crate) calls: Vec<CallEdge>,
    pub(crate) used_clamp: bool,
    pub(crate) uses_derivatives: bool,
    pub(crate) next_alias: u32,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(
        unit: &'a mut TranslationUnit,
        interner: &'a mut StringInterner,
        options: &'a ValidateOptions,
    ) -> Self {
        let mut checker = Checker {
            unit,
            interner,
            options,
            scopes: Scopes::new(),
            functions: FxHashMap::default(),
            function_aliases: FxHashMap::default(),
            globals: Vec::new(),
            types: ExprTypes::new(),
            diagnostics: DiagnosticQueue::new(),
            function: None,
            loop_depth: 0,
            switch_depth: 0,
            calls: Vec::new(),
            used_clamp: false,
            uses_derivatives: false,
            next_alias: 0,
        };
        checker.install_builtins();
        checker
    }

    fn install_builtins(&mut self) {
        let stage = self.options.stage;
        for builtin in builtin_variables(stage, self.interner) {
            let name = self.interner.intern(builtin.name);
            let mut symbol = Symbol::variable(builtin.ty, Span::DUMMY);
            symbol.kind = SymbolKind::Builtin;
            symbol.read_only = builtin.read_only;
            if let Some(value) = builtin.value {
                symbol.is_const = true;
                symbol.value = Some(ConstValue::scalar(Scalar::Int(value)));
            }
            let _ = self.scopes.insert(name, symbol);
        }

        // Predefined default precisions (GLSL ES 1.00 section 4.5.3).
        let defaults: &[(PrecisionKey, Precision)] = match stage {
            ShaderStage::Vertex => &[
                (PrecisionKey::Float, Precision::High),
                (PrecisionKey::Int, Precision::High),
                (PrecisionKey::Sampler2D, Precision::Low),
                (PrecisionKey::SamplerCube, Precision::Low),
            ],
            ShaderStage::Fragment => &[
                (PrecisionKey::Int, Precision::Medium),
                (PrecisionKey::Sampler2D, Precision::Low),
                (PrecisionKey::SamplerCube, Precision::Low),
            ],
        };
        for &(key, precision) in defaults {
            self.scopes.set_default_precision(key, precision);
        }
    }

    /// Check the whole unit and collect the results.
    pub(crate) fn run(mut self) -> ValidateOutput {
        let mut decls = std::mem::take(&mut self.unit.decls);
        for decl in &mut decls {
            self.check_decl(decl);
        }
        self.unit.decls = decls;

        self.check_main();
        self.check_recursion();
        self.check_called_functions_defined();

        let variables = self.collect_variables();
        tracing::debug!(
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count(),
            variables = variables.len(),
            "validated"
        );
        ValidateOutput {
            types: self.types,
            variables,
            diagnostics: self.diagnostics,
            used_clamp: self.used_clamp,
            uses_derivatives: self.uses_derivatives,
        }
    }

    fn check_main(&mut self) {
        let main = self.interner.intern("main");
        let defined = self
            .functions
            .get(&main)
            .is_some_and(|sigs| sigs.iter().any(|s| s.defined));
        if !defined {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message("missing `void main()` function definition"),
            );
        }
    }

    fn check_called_functions_defined(&mut self) {
        let mut missing = Vec::new();
        for edge in &self.calls {
            let (callee, overload) = edge.callee;
            let defined = self
                .functions
                .get(&callee)
                .and_then(|sigs| sigs.get(overload))
                .is_some_and(|sig| sig.defined);
            if !defined {
                missing.push((callee, edge.span));
            }
        }
        for (callee, span) in missing {
            let message = format!(
                "function `{}` is called but never defined",
                self.interner.lookup(callee)
            );
            self.error(ErrorCode::E2056, span, message);
        }
    }

    /// Build the variables table. Attributes and uniforms are listed when
    /// used; varyings always for HLSL and vertex shaders.
    fn collect_variables(&self) -> ShaderVariables {
        let all_varyings =
            self.options.output_format.is_hlsl() || self.options.stage.is_vertex();
        let mut variables = ShaderVariables::new(Ownership::Borrowed);
        for global in &self.globals {
            let listed = match global.kind {
                VariableKind::Attribute | VariableKind::Uniform => global.used,
                VariableKind::Varying => all_varyings || global.used,
            };
            if !listed {
                continue;
            }
            let Some(ty) = VarType::from_type(&global.ty, &*self.interner) else {
                continue;
            };
            variables.insert(
                ShaderVariable {
                    kind: global.kind,
                    name: VariableName::Interned(global.name),
                    alias_name: global.alias.map(VariableName::Interned),
                    precision: global.precision,
                    ty,
                    static_write: global.written,
                },
                &*self.interner,
            );
        }
        variables
    }

    /// Report an error labelled with the code's symbolic name.
    #[cold]
    pub(crate) fn error(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::error(code)
                .with_message(message)
                .with_label(span, code.name()),
        );
    }

    #[cold]
    pub(crate) fn warning(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::warning(code)
                .with_message(message)
                .with_label(span, code.name()),
        );
    }

    pub(crate) fn name_str(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub(crate) fn describe(&self, ty: &Type) -> String {
        ty.describe(&*self.interner)
    }

    pub(crate) fn is_vertex(&self) -> bool {
        self.options.stage.is_vertex()
    }
}
