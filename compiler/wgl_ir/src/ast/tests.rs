use pretty_assertions::assert_eq;

use super::*;
use crate::{Name, StringInterner};

fn struct_type(fields: Vec<(Name, Type)>) -> Type {
    Type::new(TypeKind::Struct(Box::new(StructType {
        tag: None,
        fields: fields
            .into_iter()
            .map(|(name, ty)| Field {
                name,
                ty,
                span: Span::DUMMY,
            })
            .collect(),
    })))
}

#[test]
fn test_type_size_basic_and_vector() {
    assert_eq!(Type::float().size(), 1);
    assert_eq!(Type::sampler(SamplerKind::Sampler2D).size(), 1);
    assert_eq!(Type::vector(BasicType::Float, 3).size(), 3);
    assert_eq!(Type::vector(BasicType::Bool, 4).size(), 4);
}

#[test]
fn test_type_size_matrix() {
    assert_eq!(Type::matrix(2, 2).size(), 4);
    assert_eq!(Type::matrix(3, 3).size(), 9);
    assert_eq!(Type::matrix(4, 2).size(), 8);
}

#[test]
fn test_type_size_array_and_struct() {
    let array = Type::array(Type::vector(BasicType::Float, 4), ArrayLength::constant(3));
    assert_eq!(array.size(), 12);

    let mut interner = StringInterner::new();
    let s = struct_type(vec![
        (interner.intern("a"), Type::float()),
        (interner.intern("b"), Type::matrix(3, 3)),
        (interner.intern("c"), array),
    ]);
    assert_eq!(s.size(), 1 + 9 + 12);
}

#[test]
fn test_type_size_nested_struct_array_struct() {
    let mut interner = StringInterner::new();
    // struct Light { vec3 dir; float power; }
    let light = struct_type(vec![
        (interner.intern("dir"), Type::vector(BasicType::Float, 3)),
        (interner.intern("power"), Type::float()),
    ]);
    assert_eq!(light.size(), 4);

    // struct Rig { Light lights[5]; mat2 basis; }
    let rig = struct_type(vec![
        (
            interner.intern("lights"),
            Type::array(light, ArrayLength::constant(5)),
        ),
        (interner.intern("basis"), Type::matrix(2, 2)),
    ]);
    assert_eq!(rig.size(), 24);

    // struct Scene { Rig rigs[2]; int count; }
    let scene = struct_type(vec![
        (interner.intern("rigs"), Type::array(rig, ArrayLength::constant(2))),
        (interner.intern("count"), Type::int()),
    ]);
    assert_eq!(scene.size(), 49);
}

#[test]
fn test_vector_helpers() {
    let v = VectorType::of(BasicType::Int, 3);
    assert_eq!(v.magnitude(), 3);
    assert_eq!(v.element_type(), BasicType::Int);
    assert!(v.has_element_type(BasicType::Int));
    assert!(!v.same_element_type(VectorType::of(BasicType::Float, 3)));
    assert_eq!(v.as_str(), "ivec3");
}

#[test]
fn test_vector_of_is_total() {
    for element in [BasicType::Float, BasicType::Int, BasicType::UInt, BasicType::Bool] {
        for size in 2..=4 {
            let v = VectorType::of(element, size);
            assert!(!v.as_str().starts_with('<'));
        }
    }
}

#[test]
fn test_matrix_helpers() {
    let m = MatrixType::new(3, 2);
    assert_eq!(m.columns(), 3);
    assert_eq!(m.rows(), 2);
    assert!(!m.is_square());
    assert_eq!(m.column_type(), VectorType::of(BasicType::Float, 2));
    assert_eq!(m.as_str(), "mat3x2");
    assert_eq!(MatrixType::square(4).as_str(), "mat4");
}

#[test]
fn test_qualifier_and_precision() {
    let ty = Type::float()
        .with_storage(StorageQualifier::Uniform)
        .with_precision(Precision::High);
    assert_eq!(ty.storage(), StorageQualifier::Uniform);
    assert_eq!(ty.effective_precision(), Precision::High);
    assert_eq!(ty.unqualified(), Type::float());

    let mut implicit = Type::float();
    implicit.implicit_precision = Precision::Medium;
    assert_eq!(implicit.effective_precision(), Precision::Medium);
}

#[test]
fn test_describe() {
    let mut interner = StringInterner::new();
    let light = interner.intern("Light");
    assert_eq!(Type::named(light).describe(&interner), "Light");
    let array = Type::array(Type::matrix(2, 2), ArrayLength::constant(2));
    assert_eq!(array.describe(&interner), "mat2[2]");
}

#[test]
fn test_clone_shallow_leaf() {
    let expr = Expr::new(ExprKind::float(1.0), Span::new(0, 3));
    assert_eq!(expr.clone_shallow(), Some(expr.clone()));
}

#[test]
fn test_unit_alloc_and_lookup() {
    let mut interner = StringInterner::new();
    let main = interner.intern("main");
    let mut unit = TranslationUnit::new();
    let body = unit.alloc_stmt(StmtKind::Body(Vec::new()), Span::DUMMY);
    unit.decls.push(Decl::new(
        DeclKind::Function {
            proto: FunctionProto {
                return_type: Type::void(),
                name: main,
                params: Vec::new(),
            },
            body,
        },
        Span::DUMMY,
    ));
    let (proto, found) = unit.find_function(main).unwrap_or_else(|| panic!("main"));
    assert_eq!(proto.name, main);
    assert_eq!(found, body);
    assert_eq!(unit.decls[0].declared_name(), Some(main));
}

#[test]
fn test_expr_types_side_table() {
    let mut types = ExprTypes::new();
    let id = ExprId::new(5);
    assert!(types.get(id).is_none());
    types.set(id, Type::vector(BasicType::Float, 2));
    assert_eq!(types.get(id), Some(&Type::vector(BasicType::Float, 2)));
    assert!(types.get(ExprId::new(0)).is_none());
}
