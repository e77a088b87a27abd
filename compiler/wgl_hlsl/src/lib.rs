//! WGL HLSL
//!
//! Cg/HLSL generation for validated GLSL ES 1.00 shaders, targeting the D3D9
//! and D3D10 shader models.
//!
//! # Architecture
//!
//! - [`discover`]: pre-pass collecting used builtins and helpers
//! - [`rewrite`]: how intrinsic calls and constructors translate
//! - [`helpers`]: the catalog of generated helper functions
//! - [`semantics`]: HLSL semantics and their register counters
//! - [`dialect`]: the expression-level [`Dialect`](wgl_fmt::Dialect)
//! - `generator`: the whole-shader layout around the translated body
//!
//! Generation never fails. The validator has rejected everything that
//! cannot be translated, and has already renamed identifiers that collide
//! with HLSL keywords.

pub mod dialect;
pub mod discover;
mod generator;
pub mod helpers;
pub mod rewrite;
pub mod semantics;

pub use dialect::{hlsl_type_name, Hlsl};
pub use discover::{Builtins, Usage};
pub use generator::{GeneratorState, HALF_PIXEL, MAIN_NAME};
pub use helpers::Helpers;
pub use semantics::{Semantic, SemanticCounters, SemanticInfo, UnknownSemantic};

use wgl_fmt::{Emitter, StringEmitter};
use wgl_ir::{ExprTypes, OutputFormat, ShaderStage, StringInterner, TranslationUnit};
use wgl_validate::ShaderVariables;

use generator::Generator;

/// Generator settings.
#[derive(Clone, Debug)]
pub struct HlslOptions {
    /// [`OutputFormat::Hlsl9`] or [`OutputFormat::Hlsl10`].
    pub output_format: OutputFormat,
    pub stage: ShaderStage,
    pub vertex_shader_name: String,
    pub pixel_shader_name: String,
    /// Raw parameter text placed ahead of `VS_IN IN`.
    pub vertex_initial_parameters: Option<String>,
    /// Raw parameter text placed ahead of `VS_OUT IN`.
    pub pixel_initial_parameters: Option<String>,
    /// Raw member lines placed at the top of `VS_IN`.
    pub vertex_attribute_decls: Option<String>,
    pub code_prelude: Option<String>,
    pub code_postlude: Option<String>,
    pub vertex_semantic_info: SemanticInfo,
    pub pixel_semantic_info: SemanticInfo,
    /// Gather non-sampler uniforms in a `cbuffer`.
    pub use_cbuffer: bool,
}

impl Default for HlslOptions {
    fn default() -> Self {
        HlslOptions {
            output_format: OutputFormat::Hlsl9,
            stage: ShaderStage::Vertex,
            vertex_shader_name: "vs_main".to_owned(),
            pixel_shader_name: "ps_main".to_owned(),
            vertex_initial_parameters: None,
            pixel_initial_parameters: None,
            vertex_attribute_decls: None,
            code_prelude: None,
            code_postlude: None,
            vertex_semantic_info: SemanticInfo::default(),
            pixel_semantic_info: SemanticInfo::default(),
            use_cbuffer: false,
        }
    }
}

impl HlslOptions {
    #[inline]
    pub fn is_d3d10(&self) -> bool {
        self.output_format == OutputFormat::Hlsl10
    }
}

/// A shader that passed validation for an HLSL target, with everything the
/// validator learned about it.
#[derive(Copy, Clone, Debug)]
pub struct ValidatedShader<'a> {
    pub unit: &'a TranslationUnit,
    pub interner: &'a StringInterner,
    pub types: &'a ExprTypes,
    pub variables: &'a ShaderVariables,
    /// The validator rewrote some index into a call of the clamp helper.
    pub used_clamp: bool,
}

/// Generate HLSL for `shader` into `out`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(format = %options.output_format, stage = ?options.stage)
)]
pub fn generate_to(
    out: &mut dyn Emitter,
    shader: &ValidatedShader<'_>,
    options: &HlslOptions,
) -> GeneratorState {
    debug_assert!(options.output_format.is_hlsl(), "not an HLSL target");
    let state = Generator::new(out, shader, options).run();
    tracing::debug!(
        helpers = state.usage.helpers.bits().count_ones(),
        "generated HLSL"
    );
    state
}

/// Generate HLSL for `shader`.
pub fn generate(shader: &ValidatedShader<'_>, options: &HlslOptions) -> String {
    let mut out = StringEmitter::new();
    generate_to(&mut out, shader, options);
    out.trim_trailing_blank_lines();
    out.ensure_trailing_newline();
    out.output()
}
