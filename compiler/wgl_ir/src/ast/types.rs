//! Type model.
//!
//! A [`Type`] pairs a [`TypeKind`] with its qualifiers and precision. Struct
//! types referenced by tag are stored as [`TypeKind::Name`] and resolved by the
//! validator. Types are cloned deeply; there is no sharing between
//! declarations.

use crate::{ExprId, Name, Span, StringInterner};

/// Scalar element types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BasicType {
    Void,
    Int,
    UInt,
    Bool,
    Float,
}

impl BasicType {
    pub const fn as_str(self) -> &'static str {
        match self {
            BasicType::Void => "void",
            BasicType::Int => "int",
            BasicType::UInt => "uint",
            BasicType::Bool => "bool",
            BasicType::Float => "float",
        }
    }
}

/// `vecN`, `bvecN`, `ivecN` and `uvecN`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorType {
    pub element: BasicType,
    pub size: u8,
}

impl VectorType {
    /// The vector of `size` elements of type `element`.
    ///
    /// Defined for every non-void element and sizes 2 through 4.
    pub fn of(element: BasicType, size: u8) -> Self {
        debug_assert!((2..=4).contains(&size), "vector size {size}");
        debug_assert!(element != BasicType::Void, "void vector");
        VectorType { element, size }
    }

    #[inline]
    pub const fn element_type(self) -> BasicType {
        self.element
    }

    #[inline]
    pub const fn magnitude(self) -> u8 {
        self.size
    }

    #[inline]
    pub fn has_element_type(self, element: BasicType) -> bool {
        self.element == element
    }

    #[inline]
    pub fn same_element_type(self, other: VectorType) -> bool {
        self.element == other.element
    }

    pub const fn as_str(self) -> &'static str {
        match (self.element, self.size) {
            (BasicType::Float, 2) => "vec2",
            (BasicType::Float, 3) => "vec3",
            (BasicType::Float, 4) => "vec4",
            (BasicType::Bool, 2) => "bvec2",
            (BasicType::Bool, 3) => "bvec3",
            (BasicType::Bool, 4) => "bvec4",
            (BasicType::Int, 2) => "ivec2",
            (BasicType::Int, 3) => "ivec3",
            (BasicType::Int, 4) => "ivec4",
            (BasicType::UInt, 2) => "uvec2",
            (BasicType::UInt, 3) => "uvec3",
            (BasicType::UInt, 4) => "uvec4",
            _ => "<invalid vector>",
        }
    }
}

/// `matCxR`; the element type is always float.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixType {
    pub columns: u8,
    pub rows: u8,
}

impl MatrixType {
    pub fn new(columns: u8, rows: u8) -> Self {
        debug_assert!((2..=4).contains(&columns) && (2..=4).contains(&rows));
        MatrixType { columns, rows }
    }

    /// Square `matN`.
    pub fn square(n: u8) -> Self {
        Self::new(n, n)
    }

    #[inline]
    pub const fn columns(self) -> u8 {
        self.columns
    }

    #[inline]
    pub const fn rows(self) -> u8 {
        self.rows
    }

    #[inline]
    pub const fn is_square(self) -> bool {
        self.columns == self.rows
    }

    /// The type of one column.
    pub fn column_type(self) -> VectorType {
        VectorType::of(BasicType::Float, self.rows)
    }

    pub const fn as_str(self) -> &'static str {
        match (self.columns, self.rows) {
            (2, 2) => "mat2",
            (3, 3) => "mat3",
            (4, 4) => "mat4",
            (2, 3) => "mat2x3",
            (2, 4) => "mat2x4",
            (3, 2) => "mat3x2",
            (3, 4) => "mat3x4",
            (4, 2) => "mat4x2",
            (4, 3) => "mat4x3",
            _ => "<invalid matrix>",
        }
    }
}

/// Sampler dimensionality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerKind {
    Sampler2D,
    SamplerCube,
    Sampler3D,
    Sampler2DShadow,
    SamplerCubeShadow,
    Sampler2DArray,
    Sampler2DArrayShadow,
    Sampler2DMS,
}

/// Element flavour of a sampler: `sampler*`, `isampler*` or `usampler*`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerFlavour {
    Float,
    Int,
    UInt,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerType {
    pub kind: SamplerKind,
    pub flavour: SamplerFlavour,
}

impl SamplerType {
    pub const fn new(kind: SamplerKind, flavour: SamplerFlavour) -> Self {
        SamplerType { kind, flavour }
    }

    /// `sampler2D` or `samplerCube`, the only samplers in GLSL ES 1.00.
    pub fn is_es100(self) -> bool {
        self.flavour == SamplerFlavour::Float
            && matches!(self.kind, SamplerKind::Sampler2D | SamplerKind::SamplerCube)
    }

    pub const fn as_str(self) -> &'static str {
        use SamplerFlavour as F;
        use SamplerKind as K;
        match (self.flavour, self.kind) {
            (F::Float, K::Sampler2D) => "sampler2D",
            (F::Float, K::SamplerCube) => "samplerCube",
            (F::Float, K::Sampler3D) => "sampler3D",
            (F::Float, K::Sampler2DArray) => "sampler2DArray",
            (F::Float, K::Sampler2DMS) => "sampler2DMS",
            (_, K::Sampler2DShadow) => "sampler2DShadow",
            (_, K::SamplerCubeShadow) => "samplerCubeShadow",
            (_, K::Sampler2DArrayShadow) => "sampler2DArrayShadow",
            (F::Int, K::Sampler2D) => "isampler2D",
            (F::Int, K::SamplerCube) => "isamplerCube",
            (F::Int, K::Sampler3D) => "isampler3D",
            (F::Int, K::Sampler2DArray) => "isampler2DArray",
            (F::Int, K::Sampler2DMS) => "isampler2DMS",
            (F::UInt, K::Sampler2D) => "usampler2D",
            (F::UInt, K::SamplerCube) => "usamplerCube",
            (F::UInt, K::Sampler3D) => "usampler3D",
            (F::UInt, K::Sampler2DArray) => "usampler2DArray",
            (F::UInt, K::Sampler2DMS) => "usampler2DMS",
        }
    }
}

/// Builtin type keywords as they appear in the token stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKeyword {
    Void,
    Float,
    Int,
    UInt,
    Bool,
    Vec(u8),
    BVec(u8),
    IVec(u8),
    UVec(u8),
    /// `matC` or `matCxR`, as (columns, rows).
    Mat(u8, u8),
    Sampler(SamplerType),
}

impl TypeKeyword {
    pub fn to_kind(self) -> TypeKind {
        match self {
            TypeKeyword::Void => TypeKind::Basic(BasicType::Void),
            TypeKeyword::Float => TypeKind::Basic(BasicType::Float),
            TypeKeyword::Int => TypeKind::Basic(BasicType::Int),
            TypeKeyword::UInt => TypeKind::Basic(BasicType::UInt),
            TypeKeyword::Bool => TypeKind::Basic(BasicType::Bool),
            TypeKeyword::Vec(n) => TypeKind::Vector(VectorType::of(BasicType::Float, n)),
            TypeKeyword::BVec(n) => TypeKind::Vector(VectorType::of(BasicType::Bool, n)),
            TypeKeyword::IVec(n) => TypeKind::Vector(VectorType::of(BasicType::Int, n)),
            TypeKeyword::UVec(n) => TypeKind::Vector(VectorType::of(BasicType::UInt, n)),
            TypeKeyword::Mat(c, r) => TypeKind::Matrix(MatrixType::new(c, r)),
            TypeKeyword::Sampler(s) => TypeKind::Sampler(s),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.to_kind() {
            TypeKind::Basic(b) => b.as_str(),
            TypeKind::Vector(v) => v.as_str(),
            TypeKind::Matrix(m) => m.as_str(),
            TypeKind::Sampler(s) => s.as_str(),
            _ => "<type>",
        }
    }
}

/// Precision qualifiers.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Precision {
    pub const fn as_str(self) -> &'static str {
        match self {
            Precision::None => "",
            Precision::Low => "lowp",
            Precision::Medium => "mediump",
            Precision::High => "highp",
        }
    }
}

/// Storage qualifiers, including parameter directions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageQualifier {
    #[default]
    None,
    Const,
    Attribute,
    Varying,
    Uniform,
    In,
    Out,
    InOut,
}

impl StorageQualifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageQualifier::None => "",
            StorageQualifier::Const => "const",
            StorageQualifier::Attribute => "attribute",
            StorageQualifier::Varying => "varying",
            StorageQualifier::Uniform => "uniform",
            StorageQualifier::In => "in",
            StorageQualifier::Out => "out",
            StorageQualifier::InOut => "inout",
        }
    }

    /// `out` and `inout` parameters write back to their argument.
    pub const fn writes_back(self) -> bool {
        matches!(self, StorageQualifier::Out | StorageQualifier::InOut)
    }
}

/// One `name` or `name = value` entry of a layout qualifier.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPair {
    pub name: Name,
    pub value: Option<i32>,
    pub span: Span,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeQualifier {
    pub storage: StorageQualifier,
    pub invariant: bool,
    pub layout: Vec<LayoutPair>,
}

impl TypeQualifier {
    pub fn storage(storage: StorageQualifier) -> Self {
        TypeQualifier {
            storage,
            ..TypeQualifier::default()
        }
    }
}

/// Array length: the parsed size expression and, once folded, its value.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayLength {
    pub expr: Option<ExprId>,
    pub value: Option<u32>,
}

impl ArrayLength {
    /// A length known without folding.
    pub fn constant(value: u32) -> Self {
        ArrayLength {
            expr: None,
            value: Some(value),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayType {
    pub element: Type,
    pub length: ArrayLength,
}

/// A struct member.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: Name,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructType {
    pub tag: Option<Name>,
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn field(&self, name: Name) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Basic(BasicType),
    Vector(VectorType),
    Matrix(MatrixType),
    Sampler(SamplerType),
    /// A struct referenced by tag, not yet resolved.
    Name(Name),
    Array(Box<ArrayType>),
    Struct(Box<StructType>),
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    pub kind: TypeKind,
    pub qualifier: Option<TypeQualifier>,
    /// Precision written in the source.
    pub precision: Precision,
    /// Precision inherited from a default `precision` declaration.
    pub implicit_precision: Precision,
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            qualifier: None,
            precision: Precision::None,
            implicit_precision: Precision::None,
        }
    }

    pub fn basic(basic: BasicType) -> Self {
        Self::new(TypeKind::Basic(basic))
    }

    pub fn float() -> Self {
        Self::basic(BasicType::Float)
    }

    pub fn int() -> Self {
        Self::basic(BasicType::Int)
    }

    pub fn bool() -> Self {
        Self::basic(BasicType::Bool)
    }

    pub fn void() -> Self {
        Self::basic(BasicType::Void)
    }

    pub fn vector(element: BasicType, size: u8) -> Self {
        Self::new(TypeKind::Vector(VectorType::of(element, size)))
    }

    pub fn matrix(columns: u8, rows: u8) -> Self {
        Self::new(TypeKind::Matrix(MatrixType::new(columns, rows)))
    }

    pub fn sampler(kind: SamplerKind) -> Self {
        Self::new(TypeKind::Sampler(SamplerType::new(kind, SamplerFlavour::Float)))
    }

    pub fn named(tag: Name) -> Self {
        Self::new(TypeKind::Name(tag))
    }

    pub fn array(element: Type, length: ArrayLength) -> Self {
        Self::new(TypeKind::Array(Box::new(ArrayType { element, length })))
    }

    #[must_use]
    pub fn with_storage(mut self, storage: StorageQualifier) -> Self {
        self.qualifier
            .get_or_insert_with(TypeQualifier::default)
            .storage = storage;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// The storage qualifier, `None` when unqualified.
    pub fn storage(&self) -> StorageQualifier {
        self.qualifier
            .as_ref()
            .map_or(StorageQualifier::None, |q| q.storage)
    }

    pub fn is_invariant(&self) -> bool {
        self.qualifier.as_ref().is_some_and(|q| q.invariant)
    }

    /// Copy without qualifier or precision, as used for expression types.
    pub fn unqualified(&self) -> Type {
        Type::new(self.kind.clone())
    }

    /// Explicit precision, falling back to the inherited default.
    pub fn effective_precision(&self) -> Precision {
        if self.precision == Precision::None {
            self.implicit_precision
        } else {
            self.precision
        }
    }

    /// Number of scalar components.
    ///
    /// Arrays must have a folded length and names must be resolved; otherwise
    /// debug builds assert and release builds return 0.
    pub fn size(&self) -> u32 {
        match &self.kind {
            TypeKind::Basic(_) | TypeKind::Sampler(_) => 1,
            TypeKind::Vector(v) => u32::from(v.size),
            TypeKind::Matrix(m) => u32::from(m.columns) * u32::from(m.rows),
            TypeKind::Array(array) => {
                debug_assert!(array.length.value.is_some(), "size of unsized array");
                array.length.value.unwrap_or(0) * array.element.size()
            }
            TypeKind::Struct(s) => s.fields.iter().map(|f| f.ty.size()).sum(),
            TypeKind::Name(_) => {
                debug_assert!(false, "size of unresolved type name");
                0
            }
        }
    }

    /// Scalar element type of a basic, vector or matrix type.
    pub fn element_type(&self) -> Option<BasicType> {
        match &self.kind {
            TypeKind::Basic(b) => Some(*b),
            TypeKind::Vector(v) => Some(v.element),
            TypeKind::Matrix(_) => Some(BasicType::Float),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Basic(BasicType::Void))
    }

    /// Non-void basic type.
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, TypeKind::Basic(b) if b != BasicType::Void)
    }

    pub fn is_basic(&self, basic: BasicType) -> bool {
        matches!(self.kind, TypeKind::Basic(b) if b == basic)
    }

    pub fn is_float_scalar(&self) -> bool {
        self.is_basic(BasicType::Float)
    }

    pub fn is_bool_scalar(&self) -> bool {
        self.is_basic(BasicType::Bool)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.kind, TypeKind::Vector(_))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self.kind, TypeKind::Matrix(_))
    }

    pub fn is_sampler(&self) -> bool {
        matches!(self.kind, TypeKind::Sampler(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    /// Scalar, vector or matrix.
    pub fn is_numeric_shape(&self) -> bool {
        self.is_scalar() || self.is_vector() || self.is_matrix()
    }

    pub fn as_vector(&self) -> Option<VectorType> {
        match self.kind {
            TypeKind::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<MatrixType> {
        match self.kind {
            TypeKind::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// GLSL spelling for diagnostics, e.g. `vec3`, `float[4]`, `Light`.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match &self.kind {
            TypeKind::Basic(b) => b.as_str().to_owned(),
            TypeKind::Vector(v) => v.as_str().to_owned(),
            TypeKind::Matrix(m) => m.as_str().to_owned(),
            TypeKind::Sampler(s) => s.as_str().to_owned(),
            TypeKind::Name(n) => interner.lookup(*n).to_owned(),
            TypeKind::Struct(s) => match s.tag {
                Some(tag) => interner.lookup(tag).to_owned(),
                None => "struct".to_owned(),
            },
            TypeKind::Array(array) => {
                let element = array.element.describe(interner);
                match array.length.value {
                    Some(n) => format!("{element}[{n}]"),
                    None => format!("{element}[]"),
                }
            }
        }
    }
}
