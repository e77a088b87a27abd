//! Whole-shader layout.
//!
//! The translated shader is laid out as:
//!
//! 1. code prelude
//! 2. struct definitions hoisted out of global declarations
//! 3. the uniform block
//! 4. the input and output structs of the entry point
//! 5. helper functions
//! 6. static globals for the IO structs and builtin mirrors
//! 7. the translated declarations, `main` renamed to `webgl_main`
//! 8. the entry point
//! 9. code postlude

use wgl_fmt::{Emitter, PrintOptions, Printer};
use wgl_ir::{Decl, DeclKind, FunctionProto, Name, StorageQualifier, Type, TypeKind};
use wgl_validate::{ShaderVariable, VarType, CLAMP_HELPER};

use crate::dialect::{hlsl_type_name, Hlsl};
use crate::discover::{Builtins, Usage};
use crate::semantics::{semantic_text, Semantic, SemanticCounters, SemanticInfo};
use crate::{HlslOptions, ValidatedShader};

/// Name the user's `main` is emitted under.
pub const MAIN_NAME: &str = "webgl_main";

/// Uniform holding the half-pixel offset of the D3D9 viewport.
pub const HALF_PIXEL: &str = "webgl_op_half_pixel";

/// Everything the generator learns or allocates along the way.
#[derive(Debug, Default)]
pub struct GeneratorState {
    pub counters: SemanticCounters,
    pub usage: Usage,
    /// First `TEXCOORD` register after the varyings, for `gl_PointCoord`.
    pub point_coord_register: u32,
}

pub struct Generator<'a> {
    printer: Printer<'a, Hlsl<'a>>,
    shader: &'a ValidatedShader<'a>,
    options: &'a HlslOptions,
    state: GeneratorState,
}

impl<'a> Generator<'a> {
    pub fn new(
        out: &'a mut dyn Emitter,
        shader: &'a ValidatedShader<'a>,
        options: &'a HlslOptions,
    ) -> Self {
        let d3d10 = options.is_d3d10();
        let print_options = PrintOptions {
            output_format: options.output_format,
            stage: options.stage,
            support_highp_fragment: true,
        };
        let dialect = Hlsl::new(shader.types, options.stage, d3d10);
        Generator {
            printer: Printer::new(shader.unit, shader.interner, print_options, dialect, out),
            shader,
            options,
            state: GeneratorState::default(),
        }
    }

    pub fn run(mut self) -> GeneratorState {
        self.state.usage = Usage::collect(self.shader.unit, self.shader.interner, self.shader.types);

        self.raw_text(self.options.code_prelude.as_deref());
        self.hoisted_structs();
        self.uniform_block();
        if self.is_vertex() {
            self.vertex_structs();
        } else {
            self.pixel_structs();
        }
        self.helpers();
        self.statics();
        self.declarations();
        if self.is_vertex() {
            self.vertex_entry_point();
        } else {
            self.pixel_entry_point();
        }
        self.raw_text(self.options.code_postlude.as_deref());
        self.state
    }

    fn is_vertex(&self) -> bool {
        self.options.stage.is_vertex()
    }

    fn d3d10(&self) -> bool {
        self.options.is_d3d10()
    }

    fn uses(&self, builtin: Builtins) -> bool {
        self.state.usage.builtins.contains(builtin)
    }

    fn name(&self, name: Name) -> &'a str {
        self.shader.interner.lookup(name)
    }

    fn raw_text(&mut self, text: Option<&str>) {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return;
        };
        self.printer.emit(text);
        if !text.ends_with('\n') {
            self.printer.newline();
        }
    }

    // === Structs ===

    /// Tagged struct definitions at global scope, so the uniform block and
    /// IO structs can name them.
    fn hoisted_structs(&mut self) {
        let unit = self.shader.unit;
        let mut any = false;
        for decl in &unit.decls {
            if let DeclKind::TypeDecl { ty, .. } = &decl.kind {
                if hoisted_tag(ty).is_some() {
                    self.printer.start_line();
                    self.printer.print_type_specifier(&ty.unqualified());
                    self.printer.emit(";");
                    self.printer.newline();
                    any = true;
                }
            }
        }
        if self.uses(Builtins::DEPTH_RANGE) {
            self.printer.line("struct gl_DepthRangeParameters {");
            self.printer.indent();
            self.printer.line("float near;");
            self.printer.line("float far;");
            self.printer.line("float diff;");
            self.printer.dedent();
            self.printer.line("};");
            any = true;
        }
        if any {
            self.printer.newline();
        }
    }

    fn uniform_block(&mut self) {
        let half_pixel = self.is_vertex() && !self.d3d10();
        if self.options.use_cbuffer {
            self.printer.line("cbuffer webgl_uniforms : register (b0) {");
            self.printer.indent();
            if half_pixel {
                self.printer.line(&format!("float2 {HALF_PIXEL};"));
            }
            for variable in self.shader.variables.uniforms() {
                if variable.ty.is_sampler() {
                    continue;
                }
                let line = format!("{};", self.declarator(variable));
                self.printer.line(&line);
            }
            self.printer.dedent();
            self.printer.line("};");
            self.printer.newline();
        } else if half_pixel {
            self.printer.line(&format!("float2 {HALF_PIXEL};"));
            self.printer.newline();
        }
    }

    fn vertex_structs(&mut self) {
        let options = self.options;
        self.struct_header("VS_IN");
        if let Some(decls) = options.vertex_attribute_decls.as_deref() {
            for line in decls.lines().filter(|l| !l.trim().is_empty()) {
                self.printer.line(line.trim());
            }
        }
        let table = &options.vertex_semantic_info;
        for attribute in self.shader.variables.attributes() {
            let default = match attribute.ty {
                VarType::Basic(_) => Semantic::PSize,
                _ => Semantic::TexCoord,
            };
            self.interface_member(attribute, default, table);
        }
        self.struct_footer();

        self.vs_out_struct(&options.vertex_semantic_info);
    }

    fn pixel_structs(&mut self) {
        let options = self.options;
        self.vs_out_struct(&options.pixel_semantic_info);
        self.state.point_coord_register = self.state.counters.peek(Semantic::TexCoord);

        self.struct_header("PS_OUT");
        let d3d10 = self.d3d10();
        if self.uses(Builtins::FRAG_DATA) {
            let slots = self.state.usage.frag_data_slots.clone();
            for slot in slots {
                let semantic = semantic_text(Semantic::Color, Some(slot), d3d10);
                self.printer.line(&format!("float4 gl_FragData{slot} : {semantic};"));
            }
        } else {
            let semantic = options
                .pixel_semantic_info
                .get("gl_FragColor")
                .copied()
                .unwrap_or(Semantic::Color);
            let index = self.state.counters.claim(semantic, 1);
            let semantic = semantic_text(semantic, index, d3d10);
            self.printer.line(&format!("float4 gl_FragColor : {semantic};"));
        }
        self.struct_footer();
    }

    /// The vertex outputs, which are also the pixel inputs.
    fn vs_out_struct(&mut self, table: &SemanticInfo) {
        let d3d10 = self.d3d10();
        self.struct_header("VS_OUT");
        let position = semantic_text(Semantic::Position, None, d3d10);
        self.printer.line(&format!("float4 gl_Position : {position};"));
        for varying in self.shader.variables.varyings() {
            self.interface_member(varying, Semantic::TexCoord, table);
        }
        if self.is_vertex() && self.uses(Builtins::POINT_SIZE) {
            let size = semantic_text(Semantic::PSize, None, d3d10);
            self.printer.line(&format!("float gl_PointSize : {size};"));
        }
        self.struct_footer();
    }

    fn struct_header(&mut self, name: &str) {
        self.state.counters.reset();
        self.printer.line(&format!("struct {name} {{"));
        self.printer.indent();
    }

    fn struct_footer(&mut self) {
        self.printer.dedent();
        self.printer.line("};");
        self.printer.newline();
    }

    /// `type name : SEMANTICn;` for an attribute or varying.
    fn interface_member(&mut self, variable: &ShaderVariable, default: Semantic, table: &SemanticInfo) {
        let source_name = variable.name.resolve(self.shader.interner);
        let semantic = table.get(source_name).copied().unwrap_or(default);
        let index = self.state.counters.claim(semantic, registers(&variable.ty));
        let semantic = semantic_text(semantic, index, self.d3d10());
        let line = format!("{} : {semantic};", self.declarator(variable));
        self.printer.line(&line);
    }

    /// `type name[n]` in HLSL, under the name used in the generated code.
    fn declarator(&self, variable: &ShaderVariable) -> String {
        let interner = self.shader.interner;
        let name = variable
            .alias_name
            .as_ref()
            .unwrap_or(&variable.name)
            .resolve(interner);
        let d3d10 = self.d3d10();
        format!("{} {name}{}", base_type_text(&variable.ty, d3d10), array_suffix(&variable.ty))
    }

    // === Helpers and statics ===

    fn helpers(&mut self) {
        let d3d10 = self.d3d10();
        let mut any = false;
        for source in self.state.usage.helpers.sources(d3d10) {
            self.printer.emit(&source);
            self.printer.newline();
            any = true;
        }
        if self.shader.used_clamp {
            self.printer.emit(&format!(
                "int {CLAMP_HELPER}(int x, int hi) {{\n    return clamp(x, 0, hi);\n}}\n"
            ));
            self.printer.newline();
            any = true;
        }
        if any {
            tracing::trace!(helpers = ?self.state.usage.helpers, "emitted helpers");
        }
    }

    fn statics(&mut self) {
        if self.is_vertex() {
            self.printer.line("static VS_IN IN;");
            self.printer.line("static VS_OUT OUT;");
        } else {
            self.printer.line("static VS_OUT IN;");
            self.printer.line("static PS_OUT OUT;");
            if self.uses(Builtins::FRAG_COORD) {
                self.printer.line("static float4 gl_FragCoord;");
            }
            if self.uses(Builtins::POINT_COORD) {
                self.printer.line("static float2 gl_PointCoord;");
            }
            if self.uses(Builtins::FRONT_FACING) {
                self.printer.line("static bool gl_FrontFacing;");
            }
        }
        if self.uses(Builtins::DEPTH_RANGE) {
            self.printer
                .line("static gl_DepthRangeParameters gl_DepthRange = { 0.0, 1.0, 1.0 };");
        }
        self.printer.newline();
    }

    // === Declarations ===

    fn declarations(&mut self) {
        let unit = self.shader.unit;
        let mut printed_any = false;
        let mut previous_was_function = false;
        for decl in &unit.decls {
            if !self.is_translated(decl) {
                continue;
            }
            let is_function = matches!(decl.kind, DeclKind::Function { .. });
            if printed_any && (is_function || previous_was_function) {
                self.printer.newline();
            }
            self.global_decl(decl);
            printed_any = true;
            previous_was_function = is_function;
        }
        if printed_any {
            self.printer.newline();
        }
    }

    /// Whether a global declaration has an HLSL counterpart in the body.
    /// Interface variables live in the IO structs and the uniform block.
    fn is_translated(&self, decl: &Decl) -> bool {
        match &decl.kind {
            DeclKind::Precision { .. } | DeclKind::Invariant { .. } => false,
            DeclKind::Prototype(_) | DeclKind::Function { .. } => true,
            DeclKind::Var { ty, .. } | DeclKind::Array { ty, .. } | DeclKind::TypeDecl { ty, .. } => {
                match ty.storage() {
                    StorageQualifier::Attribute | StorageQualifier::Varying => return false,
                    StorageQualifier::Uniform
                        if self.options.use_cbuffer && !element_type(ty).is_sampler() =>
                    {
                        return false;
                    }
                    _ => {}
                }
                // A bare struct definition was hoisted.
                !matches!(
                    &decl.kind,
                    DeclKind::TypeDecl { var_name: None, ty } if hoisted_tag(ty).is_some()
                )
            }
        }
    }

    fn global_decl(&mut self, decl: &Decl) {
        self.printer.start_line();
        match &decl.kind {
            DeclKind::Prototype(proto) if self.is_main(proto) => {
                self.printer.emit(&format!("void {MAIN_NAME}();"));
            }
            DeclKind::Function { proto, body } if self.is_main(proto) => {
                self.printer.emit(&format!("void {MAIN_NAME}() "));
                self.printer.print_stmt(*body);
            }
            DeclKind::Var { ty, .. } | DeclKind::Array { ty, .. } | DeclKind::TypeDecl { ty, .. } => {
                self.global_variable(decl, ty);
            }
            _ => {
                self.printer.print_decl(decl);
            }
        }
        self.printer.newline();
    }

    fn is_main(&self, proto: &FunctionProto) -> bool {
        self.name(proto.name) == "main"
    }

    fn global_variable(&mut self, decl: &Decl, ty: &Type) {
        let uniform = ty.storage() == StorageQualifier::Uniform;
        let prefix = if uniform { "" } else { "static " };
        self.printer.emit(prefix);

        if let (DeclKind::TypeDecl { var_name: Some(var_name), .. }, Some(tag)) =
            (&decl.kind, hoisted_tag(ty))
        {
            // The definition was hoisted; only the variable remains.
            self.printer.emit_name(tag);
            self.printer.emit(" ");
            self.printer.emit_name(*var_name);
            self.printer.emit(";");
            return;
        }

        if uniform {
            let mut stripped = decl.clone();
            strip_storage(&mut stripped);
            self.printer.print_decl(&stripped);
        } else {
            self.printer.print_decl(decl);
        }

        if uniform && self.d3d10() && element_type(ty).is_sampler() {
            if let Some(name) = decl.declared_name() {
                self.printer.newline();
                self.printer.start_line();
                self.printer.emit("SamplerState ");
                self.printer.emit_name(name);
                self.printer.emit("Sampler");
                match &decl.kind {
                    DeclKind::Array { length, .. } => self.printer.print_array_length(length),
                    _ => self.printer.print_array_suffix(ty),
                }
                self.printer.emit(";");
            }
        }
    }

    // === Entry points ===

    fn entry_parameters(&mut self, initial: Option<&str>) {
        let Some(text) = initial.map(str::trim_end).filter(|t| !t.is_empty()) else {
            return;
        };
        self.printer.emit(text);
        if !text.ends_with(',') {
            self.printer.emit(",");
        }
        self.printer.emit(" ");
    }

    fn vertex_entry_point(&mut self) {
        self.printer.emit("VS_OUT ");
        self.printer.emit(&self.options.vertex_shader_name);
        self.printer.emit("(");
        self.entry_parameters(self.options.vertex_initial_parameters.as_deref());
        self.printer.emit("VS_IN IN) {");
        self.printer.newline();
        self.printer.indent();
        self.printer.line("::IN = IN;");
        self.printer.line(&format!("{MAIN_NAME}();"));
        if self.d3d10() {
            self.printer.line("OUT.gl_Position.y = -OUT.gl_Position.y;");
        } else {
            self.printer.line(&format!(
                "OUT.gl_Position.x = OUT.gl_Position.x - {HALF_PIXEL}.x*OUT.gl_Position.w;"
            ));
            self.printer.line(&format!(
                "OUT.gl_Position.y = -(OUT.gl_Position.y - {HALF_PIXEL}.y*OUT.gl_Position.w);"
            ));
        }
        self.printer
            .line("OUT.gl_Position.z = 0.5 * (OUT.gl_Position.z + OUT.gl_Position.w);");
        self.printer.line("return OUT;");
        self.printer.dedent();
        self.printer.line("}");
    }

    fn pixel_entry_point(&mut self) {
        let d3d10 = self.d3d10();
        self.printer.emit("PS_OUT ");
        self.printer.emit(&self.options.pixel_shader_name);
        self.printer.emit("(");
        self.entry_parameters(self.options.pixel_initial_parameters.as_deref());
        self.printer.emit("VS_OUT IN");
        if self.uses(Builtins::FRAG_COORD) && !d3d10 {
            let vpos = semantic_text(Semantic::VPos, None, d3d10);
            self.printer.emit(&format!(", float4 webgl_op_frag_coord : {vpos}"));
        }
        if self.uses(Builtins::POINT_COORD) {
            let register = self.state.point_coord_register;
            self.printer.emit(&format!(
                ", float2 webgl_op_point_coord : {}",
                semantic_text(Semantic::TexCoord, Some(register), d3d10)
            ));
        }
        if self.uses(Builtins::FRONT_FACING) {
            let ty = if d3d10 { "bool" } else { "float" };
            let vface = semantic_text(Semantic::VFace, None, d3d10);
            self.printer.emit(&format!(", {ty} webgl_op_front_facing : {vface}"));
        }
        self.printer.emit(") {");
        self.printer.newline();
        self.printer.indent();
        self.printer.line("::IN = IN;");
        if self.uses(Builtins::FRAG_COORD) {
            if d3d10 {
                self.printer.line("gl_FragCoord = IN.gl_Position;");
            } else {
                self.printer.line("gl_FragCoord = webgl_op_frag_coord;");
            }
        }
        if self.uses(Builtins::POINT_COORD) {
            self.printer.line("gl_PointCoord = webgl_op_point_coord;");
        }
        if self.uses(Builtins::FRONT_FACING) {
            if d3d10 {
                self.printer.line("gl_FrontFacing = webgl_op_front_facing;");
            } else {
                self.printer.line("gl_FrontFacing = webgl_op_front_facing > 0.0;");
            }
        }
        self.printer.line(&format!("{MAIN_NAME}();"));
        self.printer.line("return OUT;");
        self.printer.dedent();
        self.printer.line("}");
    }
}

/// The tag of a named struct definition, which is printed ahead of the
/// uniforms.
fn hoisted_tag(ty: &Type) -> Option<Name> {
    match &ty.kind {
        TypeKind::Struct(s) => s.tag,
        _ => None,
    }
}

fn element_type(ty: &Type) -> &Type {
    match &ty.kind {
        TypeKind::Array(array) => element_type(&array.element),
        _ => ty,
    }
}

fn strip_storage(decl: &mut Decl) {
    if let DeclKind::Var { ty, .. } | DeclKind::Array { ty, .. } | DeclKind::TypeDecl { ty, .. } =
        &mut decl.kind
    {
        ty.qualifier = None;
    }
}

/// Registers an interface variable occupies: one per matrix column and
/// array element.
fn registers(ty: &VarType) -> u32 {
    match ty {
        VarType::Matrix(m) => u32::from(m.columns),
        VarType::Array { element, length } => registers(element) * length,
        _ => 1,
    }
}

fn base_type_text(ty: &VarType, d3d10: bool) -> String {
    match ty {
        VarType::Basic(b) => hlsl_type_name(&TypeKind::Basic(*b), d3d10).to_owned(),
        VarType::Vector(v) => hlsl_type_name(&TypeKind::Vector(*v), d3d10).to_owned(),
        VarType::Matrix(m) => hlsl_type_name(&TypeKind::Matrix(*m), d3d10).to_owned(),
        VarType::Sampler(s) => hlsl_type_name(&TypeKind::Sampler(*s), d3d10).to_owned(),
        VarType::Array { element, .. } => base_type_text(element, d3d10),
        VarType::Struct { tag: Some(tag), .. } => tag.to_string(),
        VarType::Struct { tag: None, fields } => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, ty)| format!("{} {name}{};", base_type_text(ty, d3d10), array_suffix(ty)))
                .collect();
            format!("struct {{ {} }}", fields.join(" "))
        }
    }
}

fn array_suffix(ty: &VarType) -> String {
    match ty {
        VarType::Array { element, length } => format!("[{length}]{}", array_suffix(element)),
        _ => String::new(),
    }
}
