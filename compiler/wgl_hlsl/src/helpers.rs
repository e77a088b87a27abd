//! Generated helper functions.
//!
//! GLSL builtins without an exact HLSL counterpart are routed through small
//! helper functions emitted ahead of the shader body. The generator first
//! collects the set of helpers the shader needs into a [`Helpers`] mask,
//! then emits exactly those, always in catalog order.

use bitflags::bitflags;
use wgl_ir::BasicType;

use crate::rewrite::TextureOp;

bitflags! {
    /// Set of helper functions used by one shader.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Helpers: u64 {
        // === Scalar operand widened to a vector ===

        const MOD_FVEC2 = 1 << 0;
        const MOD_FVEC3 = 1 << 1;
        const MOD_FVEC4 = 1 << 2;
        const MIN_FVEC2 = 1 << 3;
        const MIN_FVEC3 = 1 << 4;
        const MIN_FVEC4 = 1 << 5;
        const MAX_FVEC2 = 1 << 6;
        const MAX_FVEC3 = 1 << 7;
        const MAX_FVEC4 = 1 << 8;
        const CLAMP_FVEC2 = 1 << 9;
        const CLAMP_FVEC3 = 1 << 10;
        const CLAMP_FVEC4 = 1 << 11;
        const LERP_FVEC2 = 1 << 12;
        const LERP_FVEC3 = 1 << 13;
        const LERP_FVEC4 = 1 << 14;
        const STEP_FVEC2 = 1 << 15;
        const STEP_FVEC3 = 1 << 16;
        const STEP_FVEC4 = 1 << 17;
        const SMOOTHSTEP_FVEC2 = 1 << 18;
        const SMOOTHSTEP_FVEC3 = 1 << 19;
        const SMOOTHSTEP_FVEC4 = 1 << 20;

        // === Matrix and vector comparison ===

        const MATCOMPMULT_MAT2 = 1 << 21;
        const MATCOMPMULT_MAT3 = 1 << 22;
        const MATCOMPMULT_MAT4 = 1 << 23;
        const EQUAL_FVEC2 = 1 << 24;
        const EQUAL_FVEC3 = 1 << 25;
        const EQUAL_FVEC4 = 1 << 26;
        const EQUAL_IVEC2 = 1 << 27;
        const EQUAL_IVEC3 = 1 << 28;
        const EQUAL_IVEC4 = 1 << 29;
        const EQUAL_BVEC2 = 1 << 30;
        const EQUAL_BVEC3 = 1 << 31;
        const EQUAL_BVEC4 = 1 << 32;

        // === Texture lookups ===

        const TEX2D_BIAS = 1 << 33;
        const TEX2D_PROJ3 = 1 << 34;
        const TEX2D_PROJ3_BIAS = 1 << 35;
        const TEX2D_PROJ4_BIAS = 1 << 36;
        const TEX2D_LOD = 1 << 37;
        const TEX2D_PROJ3_LOD = 1 << 38;
        const TEX2D_PROJ4_LOD = 1 << 39;
        const TEXCUBE_BIAS = 1 << 40;
        const TEXCUBE_LOD = 1 << 41;

        // === Matrix upsizing constructors ===

        const MAT2_TO_MAT3 = 1 << 42;
        const MAT2_TO_MAT4 = 1 << 43;
        const MAT3_TO_MAT4 = 1 << 44;
    }
}

/// How a helper's body is built.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Template {
    Mod(u8),
    Min(u8),
    Max(u8),
    Clamp(u8),
    Lerp(u8),
    Step(u8),
    Smoothstep(u8),
    MatCompMult(u8),
    Equal(BasicType, u8),
    Texture(TextureOp),
    MatUpsize(u8, u8),
}

/// Every helper in emission order.
const CATALOG: [(Helpers, &str, Template); 45] = [
    (Helpers::MOD_FVEC2, "webgl_op_mod_fvec2", Template::Mod(2)),
    (Helpers::MOD_FVEC3, "webgl_op_mod_fvec3", Template::Mod(3)),
    (Helpers::MOD_FVEC4, "webgl_op_mod_fvec4", Template::Mod(4)),
    (Helpers::MIN_FVEC2, "webgl_op_min_fvec2", Template::Min(2)),
    (Helpers::MIN_FVEC3, "webgl_op_min_fvec3", Template::Min(3)),
    (Helpers::MIN_FVEC4, "webgl_op_min_fvec4", Template::Min(4)),
    (Helpers::MAX_FVEC2, "webgl_op_max_fvec2", Template::Max(2)),
    (Helpers::MAX_FVEC3, "webgl_op_max_fvec3", Template::Max(3)),
    (Helpers::MAX_FVEC4, "webgl_op_max_fvec4", Template::Max(4)),
    (Helpers::CLAMP_FVEC2, "webgl_op_clamp_fvec2", Template::Clamp(2)),
    (Helpers::CLAMP_FVEC3, "webgl_op_clamp_fvec3", Template::Clamp(3)),
    (Helpers::CLAMP_FVEC4, "webgl_op_clamp_fvec4", Template::Clamp(4)),
    (Helpers::LERP_FVEC2, "webgl_op_lerp_fvec2", Template::Lerp(2)),
    (Helpers::LERP_FVEC3, "webgl_op_lerp_fvec3", Template::Lerp(3)),
    (Helpers::LERP_FVEC4, "webgl_op_lerp_fvec4", Template::Lerp(4)),
    (Helpers::STEP_FVEC2, "webgl_op_step_fvec2", Template::Step(2)),
    (Helpers::STEP_FVEC3, "webgl_op_step_fvec3", Template::Step(3)),
    (Helpers::STEP_FVEC4, "webgl_op_step_fvec4", Template::Step(4)),
    (Helpers::SMOOTHSTEP_FVEC2, "webgl_op_smoothstep_fvec2", Template::Smoothstep(2)),
    (Helpers::SMOOTHSTEP_FVEC3, "webgl_op_smoothstep_fvec3", Template::Smoothstep(3)),
    (Helpers::SMOOTHSTEP_FVEC4, "webgl_op_smoothstep_fvec4", Template::Smoothstep(4)),
    (Helpers::MATCOMPMULT_MAT2, "webgl_op_matcompmult_mat2", Template::MatCompMult(2)),
    (Helpers::MATCOMPMULT_MAT3, "webgl_op_matcompmult_mat3", Template::MatCompMult(3)),
    (Helpers::MATCOMPMULT_MAT4, "webgl_op_matcompmult_mat4", Template::MatCompMult(4)),
    (Helpers::EQUAL_FVEC2, "webgl_op_equal_fvec2", Template::Equal(BasicType::Float, 2)),
    (Helpers::EQUAL_FVEC3, "webgl_op_equal_fvec3", Template::Equal(BasicType::Float, 3)),
    (Helpers::EQUAL_FVEC4, "webgl_op_equal_fvec4", Template::Equal(BasicType::Float, 4)),
    (Helpers::EQUAL_IVEC2, "webgl_op_equal_ivec2", Template::Equal(BasicType::Int, 2)),
    (Helpers::EQUAL_IVEC3, "webgl_op_equal_ivec3", Template::Equal(BasicType::Int, 3)),
    (Helpers::EQUAL_IVEC4, "webgl_op_equal_ivec4", Template::Equal(BasicType::Int, 4)),
    (Helpers::EQUAL_BVEC2, "webgl_op_equal_bvec2", Template::Equal(BasicType::Bool, 2)),
    (Helpers::EQUAL_BVEC3, "webgl_op_equal_bvec3", Template::Equal(BasicType::Bool, 3)),
    (Helpers::EQUAL_BVEC4, "webgl_op_equal_bvec4", Template::Equal(BasicType::Bool, 4)),
    (Helpers::TEX2D_BIAS, "webgl_op_tex2Dbias", Template::Texture(TextureOp::Tex2DBias)),
    (Helpers::TEX2D_PROJ3, "webgl_op_tex2Dproj3", Template::Texture(TextureOp::Tex2DProj3)),
    (
        Helpers::TEX2D_PROJ3_BIAS,
        "webgl_op_tex2Dproj3bias",
        Template::Texture(TextureOp::Tex2DProj3Bias),
    ),
    (
        Helpers::TEX2D_PROJ4_BIAS,
        "webgl_op_tex2Dproj4bias",
        Template::Texture(TextureOp::Tex2DProj4Bias),
    ),
    (Helpers::TEX2D_LOD, "webgl_op_tex2Dlod", Template::Texture(TextureOp::Tex2DLod)),
    (
        Helpers::TEX2D_PROJ3_LOD,
        "webgl_op_tex2Dproj3lod",
        Template::Texture(TextureOp::Tex2DProj3Lod),
    ),
    (
        Helpers::TEX2D_PROJ4_LOD,
        "webgl_op_tex2Dproj4lod",
        Template::Texture(TextureOp::Tex2DProj4Lod),
    ),
    (Helpers::TEXCUBE_BIAS, "webgl_op_texCUBEbias", Template::Texture(TextureOp::TexCubeBias)),
    (Helpers::TEXCUBE_LOD, "webgl_op_texCUBElod", Template::Texture(TextureOp::TexCubeLod)),
    (Helpers::MAT2_TO_MAT3, "webgl_op_mat2ToMat3", Template::MatUpsize(2, 3)),
    (Helpers::MAT2_TO_MAT4, "webgl_op_mat2ToMat4", Template::MatUpsize(2, 4)),
    (Helpers::MAT3_TO_MAT4, "webgl_op_mat3ToMat4", Template::MatUpsize(3, 4)),
];

/// Pick the variant of a size-indexed helper family.
fn by_size(family: [Helpers; 3], size: u8) -> Helpers {
    family[usize::from(size.clamp(2, 4) - 2)]
}

impl Helpers {
    pub fn modulo(size: u8) -> Helpers {
        by_size([Self::MOD_FVEC2, Self::MOD_FVEC3, Self::MOD_FVEC4], size)
    }

    pub fn min(size: u8) -> Helpers {
        by_size([Self::MIN_FVEC2, Self::MIN_FVEC3, Self::MIN_FVEC4], size)
    }

    pub fn max(size: u8) -> Helpers {
        by_size([Self::MAX_FVEC2, Self::MAX_FVEC3, Self::MAX_FVEC4], size)
    }

    pub fn clamp(size: u8) -> Helpers {
        by_size([Self::CLAMP_FVEC2, Self::CLAMP_FVEC3, Self::CLAMP_FVEC4], size)
    }

    pub fn lerp(size: u8) -> Helpers {
        by_size([Self::LERP_FVEC2, Self::LERP_FVEC3, Self::LERP_FVEC4], size)
    }

    pub fn step(size: u8) -> Helpers {
        by_size([Self::STEP_FVEC2, Self::STEP_FVEC3, Self::STEP_FVEC4], size)
    }

    pub fn smoothstep(size: u8) -> Helpers {
        by_size(
            [Self::SMOOTHSTEP_FVEC2, Self::SMOOTHSTEP_FVEC3, Self::SMOOTHSTEP_FVEC4],
            size,
        )
    }

    pub fn matrix_comp_mult(size: u8) -> Helpers {
        by_size(
            [Self::MATCOMPMULT_MAT2, Self::MATCOMPMULT_MAT3, Self::MATCOMPMULT_MAT4],
            size,
        )
    }

    /// `equal` for vectors of `element`. Unsigned vectors compare like
    /// signed ones.
    pub fn equal(element: BasicType, size: u8) -> Helpers {
        let family = match element {
            BasicType::Bool => [Self::EQUAL_BVEC2, Self::EQUAL_BVEC3, Self::EQUAL_BVEC4],
            BasicType::Int | BasicType::UInt => {
                [Self::EQUAL_IVEC2, Self::EQUAL_IVEC3, Self::EQUAL_IVEC4]
            }
            BasicType::Float | BasicType::Void => {
                [Self::EQUAL_FVEC2, Self::EQUAL_FVEC3, Self::EQUAL_FVEC4]
            }
        };
        by_size(family, size)
    }

    /// Constructor helper widening a square matrix, if one exists.
    pub fn matrix_upsize(from: u8, to: u8) -> Option<Helpers> {
        match (from, to) {
            (2, 3) => Some(Self::MAT2_TO_MAT3),
            (2, 4) => Some(Self::MAT2_TO_MAT4),
            (3, 4) => Some(Self::MAT3_TO_MAT4),
            _ => None,
        }
    }

    /// Name of a single helper.
    pub fn name(self) -> &'static str {
        CATALOG
            .iter()
            .find(|(flag, _, _)| *flag == self)
            .map_or("", |(_, name, _)| name)
    }

    /// Source of every helper in the set, in catalog order.
    pub fn sources(self, d3d10: bool) -> impl Iterator<Item = String> {
        CATALOG
            .iter()
            .filter(move |(flag, _, _)| self.contains(*flag))
            .map(move |(_, name, template)| source(name, *template, d3d10))
    }
}

fn float_type(size: u8) -> String {
    if size == 1 {
        "float".to_owned()
    } else {
        format!("float{size}")
    }
}

fn source(name: &str, template: Template, d3d10: bool) -> String {
    match template {
        Template::Mod(n) => {
            let v = float_type(n);
            format!("{v} {name}({v} x, float y) {{\n    return x - y * floor(x / y);\n}}\n")
        }
        Template::Min(n) | Template::Max(n) => {
            let v = float_type(n);
            let op = if matches!(template, Template::Min(_)) {
                "min"
            } else {
                "max"
            };
            format!("{v} {name}({v} x, float y) {{\n    return {op}(x, ({v})y);\n}}\n")
        }
        Template::Clamp(n) => {
            let v = float_type(n);
            format!(
                "{v} {name}({v} x, float minVal, float maxVal) {{\n    \
                 return clamp(x, ({v})minVal, ({v})maxVal);\n}}\n"
            )
        }
        Template::Lerp(n) => {
            let v = float_type(n);
            format!("{v} {name}({v} x, {v} y, float a) {{\n    return lerp(x, y, ({v})a);\n}}\n")
        }
        Template::Step(n) => {
            let v = float_type(n);
            format!("{v} {name}(float edge, {v} x) {{\n    return step(({v})edge, x);\n}}\n")
        }
        Template::Smoothstep(n) => {
            let v = float_type(n);
            format!(
                "{v} {name}(float edge0, float edge1, {v} x) {{\n    \
                 return smoothstep(({v})edge0, ({v})edge1, x);\n}}\n"
            )
        }
        Template::MatCompMult(n) => {
            let m = format!("float{n}x{n}");
            format!("{m} {name}({m} a, {m} b) {{\n    return a * b;\n}}\n")
        }
        Template::Equal(element, n) => {
            let v = match element {
                BasicType::Bool => format!("bool{n}"),
                BasicType::Int | BasicType::UInt => format!("int{n}"),
                BasicType::Float | BasicType::Void => float_type(n),
            };
            format!("bool{n} {name}({v} a, {v} b) {{\n    return a == b;\n}}\n")
        }
        Template::Texture(op) => texture_source(name, op, d3d10),
        Template::MatUpsize(from, to) => {
            let body = match (from, to) {
                (2, 3) => "float3x3(m[0], 0.0, m[1], 0.0, 0.0, 0.0, 1.0)",
                (2, 4) => {
                    "float4x4(m[0], 0.0, 0.0, m[1], 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)"
                }
                _ => "float4x4(m[0], 0.0, m[1], 0.0, m[2], 0.0, 0.0, 0.0, 0.0, 1.0)",
            };
            format!("float{to}x{to} {name}(float{from}x{from} m) {{\n    return {body};\n}}\n")
        }
    }
}

fn texture_source(name: &str, op: TextureOp, d3d10: bool) -> String {
    let cube = op.is_cube();
    let coord = match op {
        TextureOp::Tex2D | TextureOp::Tex2DBias | TextureOp::Tex2DLod => "float2",
        TextureOp::Tex2DProj3
        | TextureOp::Tex2DProj3Bias
        | TextureOp::Tex2DProj3Lod
        | TextureOp::TexCube
        | TextureOp::TexCubeBias
        | TextureOp::TexCubeLod => "float3",
        TextureOp::Tex2DProj4 | TextureOp::Tex2DProj4Bias | TextureOp::Tex2DProj4Lod => "float4",
    };
    let extra = if op.is_bias() {
        ", float b"
    } else if op.is_lod() {
        ", float l"
    } else {
        ""
    };
    let projected = if op.is_proj3() {
        "c.xy / c.z"
    } else if op.is_proj4() {
        "c.xy / c.w"
    } else {
        "c"
    };

    if d3d10 {
        let texture = if cube { "TextureCube" } else { "Texture2D" };
        let body = if op.is_bias() {
            format!("t.SampleBias(s, {projected}, b)")
        } else if op.is_lod() {
            format!("t.SampleLevel(s, {projected}, l)")
        } else {
            format!("t.Sample(s, {projected})")
        };
        return format!(
            "float4 {name}({texture} t, SamplerState s, {coord} c{extra}) {{\n    return {body};\n}}\n"
        );
    }

    let sampler = if cube { "samplerCUBE" } else { "sampler2D" };
    let body = match op {
        TextureOp::Tex2DBias => "tex2Dbias(s, float4(c, 0.0, b))".to_owned(),
        TextureOp::Tex2DProj3 => "tex2Dproj(s, float4(c.xy, 0.0, c.z))".to_owned(),
        TextureOp::Tex2DLod => "tex2Dlod(s, float4(c, 0.0, l))".to_owned(),
        TextureOp::TexCubeBias => "texCUBEbias(s, float4(c, b))".to_owned(),
        TextureOp::TexCubeLod => "texCUBElod(s, float4(c, l))".to_owned(),
        _ if op.is_bias() => format!("tex2Dbias(s, float4({projected}, 0.0, b))"),
        _ if op.is_lod() => format!("tex2Dlod(s, float4({projected}, 0.0, l))"),
        _ => format!("tex2D(s, {projected})"),
    };
    format!("float4 {name}({sampler} s, {coord} c{extra}) {{\n    return {body};\n}}\n")
}
