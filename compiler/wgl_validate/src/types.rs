//! Structural type queries over resolved types.
//!
//! Qualifiers and precision never take part in type identity.

use wgl_ir::{BasicType, Type, TypeKind};

/// Same type, ignoring qualifiers and precision.
pub fn same_type(a: &Type, b: &Type) -> bool {
    same_kind(&a.kind, &b.kind)
}

fn same_kind(a: &TypeKind, b: &TypeKind) -> bool {
    match (a, b) {
        (TypeKind::Array(x), TypeKind::Array(y)) => {
            x.length.value == y.length.value && same_type(&x.element, &y.element)
        }
        (TypeKind::Struct(x), TypeKind::Struct(y)) => {
            x.tag == y.tag
                && x.fields.len() == y.fields.len()
                && x
                    .fields
                    .iter()
                    .zip(&y.fields)
                    .all(|(f, g)| f.name == g.name && same_type(&f.ty, &g.ty))
        }
        (TypeKind::Struct(s), TypeKind::Name(n)) | (TypeKind::Name(n), TypeKind::Struct(s)) => {
            s.tag == Some(*n)
        }
        _ => a == b,
    }
}

/// Whether `ty` is or contains a value matching `pred`, looking through
/// arrays and struct fields.
pub fn contains(ty: &Type, pred: &impl Fn(&Type) -> bool) -> bool {
    if pred(ty) {
        return true;
    }
    match &ty.kind {
        TypeKind::Array(array) => contains(&array.element, pred),
        TypeKind::Struct(s) => s.fields.iter().any(|f| contains(&f.ty, pred)),
        _ => false,
    }
}

pub fn contains_sampler(ty: &Type) -> bool {
    contains(ty, &Type::is_sampler)
}

pub fn contains_array(ty: &Type) -> bool {
    contains(ty, &Type::is_array)
}

/// Types that exist in GLSL ES 1.00. `uint`, non-square matrices and the
/// later samplers are parsed but rejected.
pub fn is_es100_type(ty: &Type) -> bool {
    match &ty.kind {
        TypeKind::Basic(b) => *b != BasicType::UInt,
        TypeKind::Vector(v) => v.element != BasicType::UInt,
        TypeKind::Matrix(m) => m.is_square(),
        TypeKind::Sampler(s) => s.is_es100(),
        TypeKind::Array(array) => is_es100_type(&array.element),
        TypeKind::Struct(s) => s.fields.iter().all(|f| is_es100_type(&f.ty)),
        TypeKind::Name(_) => true,
    }
}

/// Float scalar, vector or matrix: the types allowed for attributes.
pub fn is_float_shape(ty: &Type) -> bool {
    ty.is_matrix() || (ty.is_numeric_shape() && ty.element_type() == Some(BasicType::Float))
}

/// Element type is `float`, looking through arrays.
pub fn is_float_based(ty: &Type) -> bool {
    match &ty.kind {
        TypeKind::Array(array) => is_float_based(&array.element),
        _ => ty.element_type() == Some(BasicType::Float),
    }
}

/// Scalar `int`.
pub fn is_int_scalar(ty: &Type) -> bool {
    ty.is_basic(BasicType::Int)
}

/// Number of scalar components contributed to a constructor.
pub fn component_count(ty: &Type) -> u32 {
    match ty.kind {
        TypeKind::Basic(_) | TypeKind::Vector(_) | TypeKind::Matrix(_) => ty.size(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wgl_ir::{
        ArrayLength, Field, Precision, SamplerKind, Span, StorageQualifier, StringInterner,
        StructType,
    };

    use super::*;

    #[test]
    fn test_qualifiers_do_not_matter() {
        let a = Type::vector(BasicType::Float, 3).with_precision(Precision::High);
        let b = Type::vector(BasicType::Float, 3).with_storage(StorageQualifier::Uniform);
        assert!(same_type(&a, &b));
        assert!(!same_type(&a, &Type::vector(BasicType::Float, 4)));
    }

    #[test]
    fn test_arrays_compare_lengths() {
        let a = Type::array(Type::float(), ArrayLength::constant(4));
        let b = Type::array(Type::float().with_precision(Precision::Low), ArrayLength::constant(4));
        let c = Type::array(Type::float(), ArrayLength::constant(2));
        assert!(same_type(&a, &b));
        assert!(!same_type(&a, &c));
    }

    #[test]
    fn test_struct_matches_its_tag() {
        let mut interner = StringInterner::new();
        let tag = interner.intern("Light");
        let resolved = Type::new(TypeKind::Struct(Box::new(StructType {
            tag: Some(tag),
            fields: vec![Field {
                name: interner.intern("color"),
                ty: Type::sampler(SamplerKind::Sampler2D),
                span: Span::DUMMY,
            }],
        })));
        assert!(same_type(&resolved, &Type::named(tag)));
        assert!(contains_sampler(&resolved));
        assert!(!contains_array(&resolved));
    }

    #[test]
    fn test_es100_types() {
        assert!(is_es100_type(&Type::matrix(3, 3)));
        assert!(!is_es100_type(&Type::matrix(2, 3)));
        assert!(!is_es100_type(&Type::basic(BasicType::UInt)));
        assert!(!is_es100_type(&Type::sampler(SamplerKind::Sampler3D)));
    }

    #[test]
    fn test_shapes() {
        assert!(is_float_shape(&Type::matrix(2, 2)));
        assert!(!is_float_shape(&Type::vector(BasicType::Int, 2)));
        assert!(is_float_based(&Type::array(Type::float(), ArrayLength::constant(2))));
        assert_eq!(component_count(&Type::matrix(3, 3)), 9);
        assert_eq!(component_count(&Type::sampler(SamplerKind::Sampler2D)), 0);
    }
}
