//! HLSL spelling of expressions and types.
//!
//! The shared printer walks the AST; [`Hlsl`] takes over the nodes whose
//! HLSL form differs from GLSL. Everything else, including statement and
//! declaration layout, prints as GLSL with HLSL type names.

use wgl_fmt::{Dialect, Operand, Printer};
use wgl_ir::{
    Assoc, BasicType, BinaryOp, ExprId, ExprKind, ExprTypes, Intrinsic, MatrixType, PrecAssoc, Precedence,
    SamplerKind, ShaderStage, StorageQualifier, Type, TypeKind,
};
use wgl_validate::BUILTIN_CONSTANTS;

use crate::discover::{frag_data_slot, is_frag_data};
use crate::rewrite::{
    call_form, constructor_form, leading_swizzle, trim_pieces, CallForm, ConstructorForm,
    TextureOp,
};

const PREFIX: PrecAssoc = PrecAssoc::new(Precedence::Prefix, Assoc::Right);

/// HLSL spelling of a basic, vector, matrix or sampler type.
///
/// A GLSL `matCxR` becomes `floatCxR`: HLSL indexes matrices by row, so
/// each GLSL column is stored as an HLSL row and `m[i]` keeps its meaning.
pub fn hlsl_type_name(kind: &TypeKind, d3d10: bool) -> &'static str {
    match kind {
        TypeKind::Basic(b) => b.as_str(),
        TypeKind::Vector(v) => match v.as_str() {
            "vec2" => "float2",
            "vec3" => "float3",
            "vec4" => "float4",
            "ivec2" => "int2",
            "ivec3" => "int3",
            "ivec4" => "int4",
            "uvec2" => "uint2",
            "uvec3" => "uint3",
            "uvec4" => "uint4",
            "bvec2" => "bool2",
            "bvec3" => "bool3",
            "bvec4" => "bool4",
            other => other,
        },
        TypeKind::Matrix(m) => matrix_name(*m),
        TypeKind::Sampler(s) => match (s.kind, d3d10) {
            (SamplerKind::SamplerCube | SamplerKind::SamplerCubeShadow, false) => "samplerCUBE",
            (SamplerKind::SamplerCube | SamplerKind::SamplerCubeShadow, true) => "TextureCube",
            (SamplerKind::Sampler3D, false) => "sampler3D",
            (SamplerKind::Sampler3D, true) => "Texture3D",
            (_, false) => "sampler2D",
            (_, true) => "Texture2D",
        },
        TypeKind::Name(_) | TypeKind::Array(_) | TypeKind::Struct(_) => {
            debug_assert!(false, "hlsl_type_name on a composite type");
            ""
        }
    }
}

fn matrix_name(m: MatrixType) -> &'static str {
    match (m.columns, m.rows) {
        (2, 2) => "float2x2",
        (2, 3) => "float2x3",
        (2, 4) => "float2x4",
        (3, 2) => "float3x2",
        (3, 3) => "float3x3",
        (3, 4) => "float3x4",
        (4, 2) => "float4x2",
        (4, 3) => "float4x3",
        _ => "float4x4",
    }
}

/// `float3(...)`, `int2(...)` style name for `ty`, used around rewritten
/// constructors.
fn constructor_name(ty: &Type, d3d10: bool) -> &'static str {
    match &ty.kind {
        TypeKind::Basic(_) | TypeKind::Vector(_) | TypeKind::Matrix(_) => {
            hlsl_type_name(&ty.kind, d3d10)
        }
        _ => "",
    }
}

/// The HLSL dialect for one shader.
pub struct Hlsl<'a> {
    pub types: &'a ExprTypes,
    pub stage: ShaderStage,
    pub d3d10: bool,
}

impl<'a> Hlsl<'a> {
    pub fn new(types: &'a ExprTypes, stage: ShaderStage, d3d10: bool) -> Self {
        Hlsl { types, stage, d3d10 }
    }

    /// Struct prefix for a variable that lives in the entry point's input
    /// or output struct.
    fn escape(&self, name: &str, ty: Option<&Type>) -> Option<&'static str> {
        match (self.stage, name) {
            (ShaderStage::Vertex, "gl_Position" | "gl_PointSize")
            | (ShaderStage::Fragment, "gl_FragColor") => return Some("OUT."),
            _ => {}
        }
        match ty.map(Type::storage) {
            Some(StorageQualifier::Attribute) => Some("IN."),
            Some(StorageQualifier::Varying) if self.stage.is_vertex() => Some("OUT."),
            Some(StorageQualifier::Varying) => Some("IN."),
            _ => None,
        }
    }

    fn is_matrix(&self, id: ExprId) -> bool {
        self.types.get(id).is_some_and(Type::is_matrix)
    }

    /// Vector or matrix operand, compared with `all` or `any`.
    fn is_aggregate(&self, id: ExprId) -> bool {
        self.types
            .get(id)
            .is_some_and(|ty| ty.is_vector() || ty.is_matrix())
    }
}

impl Dialect for Hlsl<'_> {
    fn type_name(&self, kind: &TypeKind) -> &'static str {
        hlsl_type_name(kind, self.d3d10)
    }

    fn print_expr(printer: &mut Printer<'_, Self>, id: ExprId, operand: Operand) -> bool {
        let unit = printer.unit;
        let types = printer.dialect.types;
        match &unit.expr(id).kind {
            ExprKind::Var {
                name,
                intrinsic: None,
            } => {
                let text = printer.name(*name);
                if let Some((_, value)) = BUILTIN_CONSTANTS.iter().find(|(n, _)| *n == text) {
                    printer.emit_fmt(format_args!("{value}"));
                    return true;
                }
                match printer.dialect.escape(text, types.get(id)) {
                    Some(prefix) => {
                        printer.emit(prefix);
                        printer.emit(text);
                        true
                    }
                    None => false,
                }
            }
            ExprKind::Call { callee, args } => match &unit.expr(*callee).kind {
                ExprKind::TypeConstructor(ty) => {
                    let target = types.get(*callee).unwrap_or(ty.as_ref());
                    print_constructor(printer, target, args, operand)
                }
                ExprKind::Var {
                    intrinsic: Some(intrinsic),
                    ..
                } => {
                    print_builtin_call(printer, *intrinsic, args, operand);
                    true
                }
                _ => false,
            },
            ExprKind::Binary { op, lhs, rhs } => print_binary(printer, *op, *lhs, *rhs, operand),
            ExprKind::Assign {
                op: Some(BinaryOp::Mul),
                lhs,
                rhs,
            } if printer.dialect.is_matrix(*rhs) && !types.get(*lhs).is_some_and(Type::is_scalar) => {
                // `v *= m` is `v = mul(m, v)`.
                printer.enter_op_scope(PrecAssoc::ASSIGN, operand);
                printer.print_expr(*lhs, Operand::Left);
                printer.emit(" = mul");
                printer.print_args(&[*rhs, *lhs]);
                printer.leave_op_scope();
                true
            }
            ExprKind::Select { base, field } => {
                let text = printer.name(*field);
                let is_vector = types.get(*base).is_some_and(Type::is_vector);
                if !is_vector || !text.contains(['s', 't', 'p', 'q']) {
                    return false;
                }
                let swizzle: String = text
                    .chars()
                    .map(|c| match c {
                        's' => 'x',
                        't' => 'y',
                        'p' => 'z',
                        'q' => 'w',
                        other => other,
                    })
                    .collect();
                printer.enter_op_scope(PrecAssoc::HIGHEST, operand);
                printer.print_expr(*base, Operand::Left);
                printer.emit(".");
                printer.emit(&swizzle);
                printer.leave_op_scope();
                true
            }
            ExprKind::Index { base, index } if is_frag_data(unit, printer.interner, *base) => {
                let slot = frag_data_slot(unit, *index);
                printer.emit_fmt(format_args!("OUT.gl_FragData{slot}"));
                true
            }
            _ => false,
        }
    }
}

fn print_binary(
    printer: &mut Printer<'_, Hlsl<'_>>,
    op: BinaryOp,
    lhs: ExprId,
    rhs: ExprId,
    operand: Operand,
) -> bool {
    let dialect = &printer.dialect;
    match op {
        BinaryOp::Mul
            if (dialect.is_matrix(lhs) || dialect.is_matrix(rhs))
                && !dialect.types.get(lhs).is_some_and(Type::is_scalar)
                && !dialect.types.get(rhs).is_some_and(Type::is_scalar) =>
        {
            printer.emit("mul");
            printer.print_args(&[rhs, lhs]);
            true
        }
        BinaryOp::Xor => {
            printer.print_binary(BinaryOp::Ne.prec_assoc(), lhs, "!=", rhs, operand);
            true
        }
        BinaryOp::Eq | BinaryOp::Ne if dialect.is_aggregate(lhs) => {
            let (reduce, symbol) = if op == BinaryOp::Eq {
                ("all", "==")
            } else {
                ("any", "!=")
            };
            printer.emit(reduce);
            printer.enter_arg_list_scope();
            printer.print_binary(op.prec_assoc(), lhs, symbol, rhs, Operand::Right);
            printer.leave_arg_list_scope();
            true
        }
        _ => false,
    }
}

fn print_builtin_call(
    printer: &mut Printer<'_, Hlsl<'_>>,
    intrinsic: Intrinsic,
    args: &[ExprId],
    operand: Operand,
) {
    match call_form(intrinsic, args, printer.dialect.types) {
        CallForm::Rename(name) => {
            printer.emit(name);
            printer.print_args(args);
        }
        CallForm::Helper(helper) => {
            printer.emit(helper.name());
            printer.print_args(args);
        }
        CallForm::ModInline => {
            if let [x, y] = *args {
                print_mod(printer, x, y, operand);
            }
        }
        CallForm::Relational(op) => {
            if let [lhs, rhs] = *args {
                printer.print_binary(op.prec_assoc(), lhs, op.as_symbol(), rhs, operand);
            }
        }
        CallForm::Not => {
            if let [inner] = *args {
                printer.print_prefix("!", inner, operand);
            }
        }
        CallForm::VectorEqual { helper, negate } => {
            if negate {
                printer.enter_op_scope(PREFIX, operand);
                printer.emit("!");
            }
            printer.emit(helper.name());
            printer.print_args(args);
            if negate {
                printer.leave_op_scope();
            }
        }
        CallForm::Texture(op) => print_texture(printer, op, args, operand),
    }
}

/// `x - y * floor(x / y)`
fn print_mod(printer: &mut Printer<'_, Hlsl<'_>>, x: ExprId, y: ExprId, operand: Operand) {
    printer.enter_op_scope(BinaryOp::Sub.prec_assoc(), operand);
    printer.print_expr(x, Operand::Left);
    printer.emit(" - ");
    printer.enter_op_scope(BinaryOp::Mul.prec_assoc(), Operand::Right);
    printer.print_expr(y, Operand::Left);
    printer.emit(" * floor");
    printer.enter_arg_list_scope();
    printer.enter_op_scope(BinaryOp::Div.prec_assoc(), Operand::Right);
    printer.print_expr(x, Operand::Left);
    printer.emit(" / ");
    printer.print_expr(y, Operand::Right);
    printer.leave_op_scope();
    printer.leave_arg_list_scope();
    printer.leave_op_scope();
    printer.leave_op_scope();
}

/// Whether `id` is a bare texture variable, the only form that gets the
/// D3D10 `.Sample` method call.
fn is_plain_texture(printer: &Printer<'_, Hlsl<'_>>, id: ExprId) -> bool {
    matches!(printer.unit.expr(id).kind, ExprKind::Var { .. })
}

/// Whether a `SamplerState` can be named for texture `id`: a variable or
/// an element of a texture array.
fn has_sampler_state(printer: &Printer<'_, Hlsl<'_>>, id: ExprId) -> bool {
    match &printer.unit.expr(id).kind {
        ExprKind::Var { .. } => true,
        ExprKind::Index { base, .. } => has_sampler_state(printer, *base),
        _ => false,
    }
}

/// The `SamplerState` paired with texture `id`: `texSampler` or
/// `texSampler[i]`.
fn print_sampler_state(printer: &mut Printer<'_, Hlsl<'_>>, id: ExprId) {
    let unit = printer.unit;
    match &unit.expr(id).kind {
        ExprKind::Var { name, .. } => {
            printer.emit_name(*name);
            printer.emit("Sampler");
        }
        ExprKind::Index { base, index } => {
            print_sampler_state(printer, *base);
            printer.emit("[");
            printer.print_expr_top(*index);
            printer.emit("]");
        }
        _ => {}
    }
}

fn print_texture(
    printer: &mut Printer<'_, Hlsl<'_>>,
    op: TextureOp,
    args: &[ExprId],
    operand: Operand,
) {
    let Some((&texture, rest)) = args.split_first() else {
        return;
    };
    let d3d10 = printer.dialect.d3d10;
    let helper = op.helper();
    if !d3d10 || !has_sampler_state(printer, texture) {
        match helper {
            Some(helper) => printer.emit(helper.name()),
            None => printer.emit(op.native_name()),
        }
        printer.print_args(args);
        return;
    }
    if helper.is_none() && !is_plain_texture(printer, texture) {
        // `tex2D(t[1], uv)`
        printer.emit(op.native_name());
        printer.print_args(args);
        return;
    }

    if let Some(helper) = helper {
        // D3D10 helpers take the texture and its sampler state.
        printer.emit(helper.name());
        printer.enter_arg_list_scope();
        printer.print_expr(texture, Operand::Right);
        printer.emit(", ");
        print_sampler_state(printer, texture);
        for &arg in rest {
            printer.emit(", ");
            printer.print_expr(arg, Operand::Right);
        }
        printer.leave_arg_list_scope();
        return;
    }

    printer.enter_op_scope(PrecAssoc::HIGHEST, operand);
    printer.print_expr(texture, Operand::Left);
    printer.emit(".Sample");
    printer.enter_arg_list_scope();
    print_sampler_state(printer, texture);
    printer.emit(", ");
    if let (TextureOp::Tex2DProj4, Some(&coord)) = (op, rest.first()) {
        printer.enter_op_scope(BinaryOp::Div.prec_assoc(), Operand::Right);
        print_swizzled(printer, coord, None, "xy", Operand::Left);
        printer.emit(" / ");
        print_swizzled(printer, coord, None, "w", Operand::Right);
        printer.leave_op_scope();
    } else {
        for (i, &arg) in rest.iter().enumerate() {
            if i > 0 {
                printer.emit(", ");
            }
            printer.print_expr(arg, Operand::Right);
        }
    }
    printer.leave_arg_list_scope();
    printer.leave_op_scope();
}

/// `base[column].swizzle`, parenthesizing `base` as needed.
fn print_swizzled(
    printer: &mut Printer<'_, Hlsl<'_>>,
    base: ExprId,
    column: Option<u8>,
    swizzle: &str,
    operand: Operand,
) {
    printer.enter_op_scope(PrecAssoc::HIGHEST, operand);
    printer.print_expr(base, Operand::Left);
    if let Some(column) = column {
        printer.emit_fmt(format_args!("[{column}]"));
    }
    if !swizzle.is_empty() {
        printer.emit(".");
        printer.emit(swizzle);
    }
    printer.leave_op_scope();
}

/// Returns `false` to print the constructor unchanged.
fn print_constructor(
    printer: &mut Printer<'_, Hlsl<'_>>,
    target: &Type,
    args: &[ExprId],
    operand: Operand,
) -> bool {
    let types = printer.dialect.types;
    let d3d10 = printer.dialect.d3d10;
    let name = constructor_name(target, d3d10);
    match constructor_form(target, args, types) {
        ConstructorForm::AsIs => false,
        ConstructorForm::Replicate | ConstructorForm::MatrixCast => {
            // `((float3)(x))`
            let [arg] = *args else {
                return false;
            };
            printer.emit("((");
            printer.emit(name);
            printer.emit(")");
            printer.print_args(&[arg]);
            printer.emit(")");
            true
        }
        ConstructorForm::Widen(size) => {
            // `float3(float4(a, b).xyz)`
            let element = target.element_type().unwrap_or(BasicType::Float);
            let wide = Type::vector(element, size);
            let take = u8::try_from(target.size()).unwrap_or(size);
            printer.emit(name);
            printer.enter_arg_list_scope();
            printer.enter_op_scope(PrecAssoc::HIGHEST, Operand::Right);
            printer.emit(constructor_name(&wide, d3d10));
            printer.print_args(args);
            printer.emit(".");
            printer.emit(leading_swizzle(take));
            printer.leave_op_scope();
            printer.leave_arg_list_scope();
            true
        }
        ConstructorForm::ScaledIdentity => {
            let [arg] = *args else {
                return false;
            };
            let n = target.as_matrix().map_or(2, |m| m.columns);
            let identity: Vec<&str> = (0..n)
                .flat_map(|row| (0..n).map(move |col| if row == col { "1.0" } else { "0.0" }))
                .collect();
            printer.enter_op_scope(BinaryOp::Mul.prec_assoc(), operand);
            printer.print_expr(arg, Operand::Left);
            printer.emit_fmt(format_args!(" * {name}({})", identity.join(", ")));
            printer.leave_op_scope();
            true
        }
        ConstructorForm::MatrixUpsize(helper) => {
            printer.emit(helper.name());
            printer.print_args(args);
            true
        }
        ConstructorForm::Trim => {
            printer.emit(name);
            printer.enter_arg_list_scope();
            for (i, piece) in trim_pieces(target.size(), args, types).into_iter().enumerate() {
                if i > 0 {
                    printer.emit(", ");
                }
                let swizzle = if piece.take < piece.holds {
                    leading_swizzle(piece.take)
                } else {
                    ""
                };
                if piece.column.is_none() && swizzle.is_empty() {
                    printer.print_expr(piece.arg, Operand::Right);
                } else {
                    print_swizzled(printer, piece.arg, piece.column, swizzle, Operand::Right);
                }
            }
            printer.leave_arg_list_scope();
            true
        }
    }
}
