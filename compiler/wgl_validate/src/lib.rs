//! Semantic validation for GLSL ES 1.00.
//!
//! Checks a parsed [`TranslationUnit`] against the GLSL ES 1.00 rules:
//! scoping, types, constructors, calls, the Appendix A loop and indexing
//! restrictions, storage qualifiers and precision. Along the way it
//!
//! - records the type of every expression in an [`ExprTypes`] table
//! - writes folded array lengths and inherited precisions back into the AST
//! - renames identifiers that collide with HLSL reserved words
//! - builds the [`ShaderVariables`] interface table
//!
//! All problems are collected as diagnostics; validation never stops early.

mod builtins;
mod checker;
pub mod const_eval;
mod hlsl_keywords;
mod linkage;
mod operators;
mod scope;
mod types;
mod variables;

pub use builtins::BUILTIN_CONSTANTS;
pub use hlsl_keywords::is_hlsl_reserved;
pub use linkage::validate_linkage;
pub use operators::TypeOpError;
pub use variables::{
    Ownership, ShaderVariable, ShaderVariables, VarType, VariableKind, VariableName,
};

use wgl_diagnostic::DiagnosticQueue;
use wgl_ir::{ExprTypes, OutputFormat, ShaderStage, StringInterner, TranslationUnit};

use checker::Checker;

/// Name of the generated index clamp helper, `int webgl_op_clamp(int, int)`.
pub const CLAMP_HELPER: &str = "webgl_op_clamp";

/// Validator settings.
#[derive(Clone, Debug)]
pub struct ValidateOptions {
    pub stage: ShaderStage,
    /// Target of the compilation. HLSL targets get keyword aliasing and
    /// list every varying.
    pub output_format: OutputFormat,
    /// `GL_OES_standard_derivatives` is enabled for this shader.
    pub derivatives_enabled: bool,
    /// Reject non-constant indexing of uniforms in fragment shaders.
    pub fragment_constant_uniform_indexing: bool,
    /// Clamp non-constant indices into uniform arrays and vectors.
    pub clamp_uniform_array_indexing: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            stage: ShaderStage::Fragment,
            output_format: OutputFormat::GlslEs,
            derivatives_enabled: false,
            fragment_constant_uniform_indexing: false,
            clamp_uniform_array_indexing: false,
        }
    }
}

/// Everything the semantic pass produces.
#[derive(Debug)]
pub struct ValidateOutput {
    pub types: ExprTypes,
    pub variables: ShaderVariables,
    pub diagnostics: DiagnosticQueue,
    /// Some index was rewritten to call [`CLAMP_HELPER`].
    pub used_clamp: bool,
    /// Some derivative builtin was called.
    pub uses_derivatives: bool,
}

impl ValidateOutput {
    pub fn have_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Run the semantic pass over `unit`, rewriting it in place.
#[tracing::instrument(level = "debug", skip_all, fields(stage = ?options.stage))]
pub fn validate(
    unit: &mut TranslationUnit,
    interner: &mut StringInterner,
    options: &ValidateOptions,
) -> ValidateOutput {
    Checker::new(unit, interner, options).run()
}

#[cfg(test)]
mod tests;
