//! Compilation settings.

use wgl_hlsl::{HlslOptions, SemanticInfo};
use wgl_ir::{OutputFormat, ShaderStage};
use wgl_lexer::LexOptions;
use wgl_validate::ValidateOptions;

/// Everything a host can configure about one validation.
///
/// Built from [`Configuration::default`] and the `with_*` methods:
///
/// ```text
/// Configuration::default()
///     .with_output_format(OutputFormat::Hlsl9)
///     .with_vertex(true)
/// ```
#[derive(Clone, Debug)]
pub struct Configuration {
    pub output_format: OutputFormat,
    /// Vertex shader when set, fragment shader otherwise.
    pub for_vertex: bool,
    /// `#version` written ahead of GLSL output when above 100.
    pub output_version: u32,
    /// The target has `highp` in fragment shaders.
    pub support_highp_fragment: bool,
    /// `GL_OES_standard_derivatives` may be enabled by the source.
    pub support_oes_derivatives: bool,
    /// Forward diagnostics to the host console.
    pub console_logging: bool,
    /// Produce translated output; otherwise validate only.
    pub generate_output: bool,
    /// Return an owned copy of the shader's interface variables.
    pub want_variables: bool,

    // === HLSL layout ===
    pub vertex_shader_name: String,
    pub pixel_shader_name: String,
    pub vertex_initial_parameters: Option<String>,
    pub pixel_initial_parameters: Option<String>,
    pub vertex_attribute_decls: Option<String>,
    pub code_prelude: Option<String>,
    pub code_postlude: Option<String>,
    pub vertex_semantic_info: SemanticInfo,
    pub pixel_semantic_info: SemanticInfo,
    pub use_cbuffer: bool,

    // === Extra checks and rewrites ===
    pub fragment_constant_uniform_indexing: bool,
    pub clamp_uniform_array_indexing: bool,
    /// Rewrite `s`/`t`/`p`/`q` swizzles to `x`/`y`/`z`/`w` while parsing.
    pub rewrite_texcoords: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        let hlsl = HlslOptions::default();
        Configuration {
            output_format: OutputFormat::GlslEs,
            for_vertex: false,
            output_version: 100,
            support_highp_fragment: true,
            support_oes_derivatives: false,
            console_logging: false,
            generate_output: true,
            want_variables: false,
            vertex_shader_name: hlsl.vertex_shader_name,
            pixel_shader_name: hlsl.pixel_shader_name,
            vertex_initial_parameters: None,
            pixel_initial_parameters: None,
            vertex_attribute_decls: None,
            code_prelude: None,
            code_postlude: None,
            vertex_semantic_info: SemanticInfo::default(),
            pixel_semantic_info: SemanticInfo::default(),
            use_cbuffer: false,
            fragment_constant_uniform_indexing: false,
            clamp_uniform_array_indexing: false,
            rewrite_texcoords: false,
        }
    }
}

impl Configuration {
    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    #[must_use]
    pub fn with_vertex(mut self, for_vertex: bool) -> Self {
        self.for_vertex = for_vertex;
        self
    }

    #[must_use]
    pub fn with_output_version(mut self, version: u32) -> Self {
        self.output_version = version;
        self
    }

    #[must_use]
    pub fn with_highp_fragment(mut self, supported: bool) -> Self {
        self.support_highp_fragment = supported;
        self
    }

    #[must_use]
    pub fn with_oes_derivatives(mut self, supported: bool) -> Self {
        self.support_oes_derivatives = supported;
        self
    }

    #[must_use]
    pub fn with_console_logging(mut self, enabled: bool) -> Self {
        self.console_logging = enabled;
        self
    }

    #[must_use]
    pub fn with_generate_output(mut self, generate: bool) -> Self {
        self.generate_output = generate;
        self
    }

    #[must_use]
    pub fn with_variables(mut self, want: bool) -> Self {
        self.want_variables = want;
        self
    }

    #[must_use]
    pub fn with_shader_names(mut self, vertex: impl Into<String>, pixel: impl Into<String>) -> Self {
        self.vertex_shader_name = vertex.into();
        self.pixel_shader_name = pixel.into();
        self
    }

    #[must_use]
    pub fn with_vertex_initial_parameters(mut self, text: impl Into<String>) -> Self {
        self.vertex_initial_parameters = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_pixel_initial_parameters(mut self, text: impl Into<String>) -> Self {
        self.pixel_initial_parameters = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_vertex_attribute_decls(mut self, text: impl Into<String>) -> Self {
        self.vertex_attribute_decls = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_code_prelude(mut self, text: impl Into<String>) -> Self {
        self.code_prelude = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_code_postlude(mut self, text: impl Into<String>) -> Self {
        self.code_postlude = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_vertex_semantic_info(mut self, info: SemanticInfo) -> Self {
        self.vertex_semantic_info = info;
        self
    }

    #[must_use]
    pub fn with_pixel_semantic_info(mut self, info: SemanticInfo) -> Self {
        self.pixel_semantic_info = info;
        self
    }

    #[must_use]
    pub fn with_cbuffer(mut self, enabled: bool) -> Self {
        self.use_cbuffer = enabled;
        self
    }

    #[must_use]
    pub fn with_fragment_constant_uniform_indexing(mut self, enabled: bool) -> Self {
        self.fragment_constant_uniform_indexing = enabled;
        self
    }

    #[must_use]
    pub fn with_clamp_uniform_array_indexing(mut self, enabled: bool) -> Self {
        self.clamp_uniform_array_indexing = enabled;
        self
    }

    #[must_use]
    pub fn with_rewrite_texcoords(mut self, enabled: bool) -> Self {
        self.rewrite_texcoords = enabled;
        self
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        ShaderStage::from_vertex_flag(self.for_vertex)
    }

    pub(crate) fn lex_options(&self) -> LexOptions {
        LexOptions {
            stage: self.stage(),
            support_highp_fragment: self.support_highp_fragment,
            support_oes_derivatives: self.support_oes_derivatives,
        }
    }

    pub(crate) fn validate_options(&self, derivatives_enabled: bool) -> ValidateOptions {
        ValidateOptions {
            stage: self.stage(),
            output_format: self.output_format,
            derivatives_enabled,
            fragment_constant_uniform_indexing: self.fragment_constant_uniform_indexing,
            clamp_uniform_array_indexing: self.clamp_uniform_array_indexing,
        }
    }

    pub(crate) fn hlsl_options(&self) -> HlslOptions {
        HlslOptions {
            output_format: self.output_format,
            stage: self.stage(),
            vertex_shader_name: self.vertex_shader_name.clone(),
            pixel_shader_name: self.pixel_shader_name.clone(),
            vertex_initial_parameters: self.vertex_initial_parameters.clone(),
            pixel_initial_parameters: self.pixel_initial_parameters.clone(),
            vertex_attribute_decls: self.vertex_attribute_decls.clone(),
            code_prelude: self.code_prelude.clone(),
            code_postlude: self.code_postlude.clone(),
            vertex_semantic_info: self.vertex_semantic_info.clone(),
            pixel_semantic_info: self.pixel_semantic_info.clone(),
            use_cbuffer: self.use_cbuffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wgl_hlsl::Semantic;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.output_format, OutputFormat::GlslEs);
        assert_eq!(config.stage(), ShaderStage::Fragment);
        assert_eq!(config.output_version, 100);
        assert!(config.generate_output);
        assert_eq!(config.vertex_shader_name, "vs_main");
        assert_eq!(config.pixel_shader_name, "ps_main");
    }

    #[test]
    fn test_hlsl_options_follow_configuration() {
        let mut semantics = SemanticInfo::default();
        semantics.insert("normal".to_owned(), Semantic::Normal);
        let config = Configuration::default()
            .with_output_format(OutputFormat::Hlsl10)
            .with_vertex(true)
            .with_shader_names("vmain", "pmain")
            .with_vertex_semantic_info(semantics)
            .with_cbuffer(true);
        let options = config.hlsl_options();
        assert_eq!(options.stage, ShaderStage::Vertex);
        assert!(options.is_d3d10());
        assert!(options.use_cbuffer);
        assert_eq!(options.vertex_shader_name, "vmain");
        assert_eq!(
            options.vertex_semantic_info.get("normal"),
            Some(&Semantic::Normal)
        );
    }

    #[test]
    fn test_validate_options() {
        let config = Configuration::default().with_clamp_uniform_array_indexing(true);
        let options = config.validate_options(true);
        assert!(options.derivatives_enabled);
        assert!(options.clamp_uniform_array_indexing);
        assert!(!options.fragment_constant_uniform_indexing);
    }
}
