//! Shader interface variables: attributes, uniforms and varyings.
//!
//! A [`ShaderVariables`] table is produced by every successful validation and
//! consumed by the HLSL generator and by linkage checking. Types are stored
//! as [`VarType`], which is free of interner handles, so an `Owned` table stays
//! meaningful after the compilation context is gone.

use std::cmp::Ordering;
use std::fmt;

use wgl_ir::{
    BasicType, MatrixType, Name, Precision, SamplerType, StringInterner, Type, TypeKind,
    VectorType,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VariableKind {
    Attribute,
    Uniform,
    Varying,
}

impl VariableKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            VariableKind::Attribute => "attribute",
            VariableKind::Uniform => "uniform",
            VariableKind::Varying => "varying",
        }
    }
}

/// Whether names are interner handles or owned strings.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Ownership {
    Borrowed,
    Owned,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum VariableName {
    /// Handle into the compilation's interner.
    Interned(Name),
    Owned(Box<str>),
}

impl VariableName {
    pub fn resolve<'a>(&'a self, interner: &'a StringInterner) -> &'a str {
        match self {
            VariableName::Interned(name) => interner.lookup(*name),
            VariableName::Owned(text) => text,
        }
    }

    /// Text of an owned name; `None` for interned ones.
    pub fn as_owned(&self) -> Option<&str> {
        match self {
            VariableName::Interned(_) => None,
            VariableName::Owned(text) => Some(text),
        }
    }

    fn detach(&self, interner: &StringInterner) -> VariableName {
        VariableName::Owned(self.resolve(interner).into())
    }
}

/// Interner-free copy of a variable's type.
#[derive(Clone, PartialEq, Debug)]
pub enum VarType {
    Basic(BasicType),
    Vector(VectorType),
    Matrix(MatrixType),
    Sampler(SamplerType),
    Array {
        element: Box<VarType>,
        length: u32,
    },
    Struct {
        tag: Option<Box<str>>,
        fields: Vec<(Box<str>, VarType)>,
    },
}

impl VarType {
    /// Convert a resolved type. Unresolved names and unsized arrays give
    /// `None`; the validator reports both before variables are collected.
    pub fn from_type(ty: &Type, interner: &StringInterner) -> Option<VarType> {
        Some(match &ty.kind {
            TypeKind::Basic(b) => VarType::Basic(*b),
            TypeKind::Vector(v) => VarType::Vector(*v),
            TypeKind::Matrix(m) => VarType::Matrix(*m),
            TypeKind::Sampler(s) => VarType::Sampler(*s),
            TypeKind::Array(array) => VarType::Array {
                element: Box::new(VarType::from_type(&array.element, interner)?),
                length: array.length.value?,
            },
            TypeKind::Struct(s) => VarType::Struct {
                tag: s.tag.map(|t| interner.lookup(t).into()),
                fields: s
                    .fields
                    .iter()
                    .map(|f| {
                        VarType::from_type(&f.ty, interner)
                            .map(|ty| (interner.lookup(f.name).into(), ty))
                    })
                    .collect::<Option<_>>()?,
            },
            TypeKind::Name(_) => return None,
        })
    }

    /// Number of scalar components.
    pub fn size(&self) -> u32 {
        match self {
            VarType::Basic(_) | VarType::Sampler(_) => 1,
            VarType::Vector(v) => u32::from(v.size),
            VarType::Matrix(m) => u32::from(m.columns) * u32::from(m.rows),
            VarType::Array { element, length } => element.size() * length,
            VarType::Struct { fields, .. } => fields.iter().map(|(_, ty)| ty.size()).sum(),
        }
    }

    pub fn is_sampler(&self) -> bool {
        matches!(self, VarType::Sampler(_))
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Basic(b) => f.write_str(b.as_str()),
            VarType::Vector(v) => f.write_str(v.as_str()),
            VarType::Matrix(m) => f.write_str(m.as_str()),
            VarType::Sampler(s) => f.write_str(s.as_str()),
            VarType::Array { element, length } => write!(f, "{element}[{length}]"),
            VarType::Struct { tag: Some(tag), .. } => f.write_str(tag),
            VarType::Struct { tag: None, .. } => f.write_str("struct"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ShaderVariable {
    pub kind: VariableKind,
    pub name: VariableName,
    /// Name used in the generated code when the source name was aliased.
    pub alias_name: Option<VariableName>,
    pub precision: Precision,
    pub ty: VarType,
    /// Assigned to somewhere in the shader; only tracked for varyings.
    pub static_write: bool,
}

impl ShaderVariable {
    fn detach(&self, interner: &StringInterner) -> ShaderVariable {
        ShaderVariable {
            name: self.name.detach(interner),
            alias_name: self.alias_name.as_ref().map(|a| a.detach(interner)),
            ..self.clone()
        }
    }
}

/// Name-sorted attribute, uniform and varying lists.
#[derive(Clone, PartialEq, Debug)]
pub struct ShaderVariables {
    ownership: Ownership,
    attributes: Vec<ShaderVariable>,
    uniforms: Vec<ShaderVariable>,
    varyings: Vec<ShaderVariable>,
}

impl Default for ShaderVariables {
    fn default() -> Self {
        ShaderVariables::new(Ownership::Borrowed)
    }
}

impl ShaderVariables {
    pub fn new(ownership: Ownership) -> Self {
        ShaderVariables {
            ownership,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            varyings: Vec::new(),
        }
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn attributes(&self) -> &[ShaderVariable] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[ShaderVariable] {
        &self.uniforms
    }

    pub fn varyings(&self) -> &[ShaderVariable] {
        &self.varyings
    }

    pub fn list(&self, kind: VariableKind) -> &[ShaderVariable] {
        match kind {
            VariableKind::Attribute => &self.attributes,
            VariableKind::Uniform => &self.uniforms,
            VariableKind::Varying => &self.varyings,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len() + self.uniforms.len() + self.varyings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert in name order. An entry whose name is already present is
    /// dropped and `false` returned.
    pub fn insert(&mut self, variable: ShaderVariable, interner: &StringInterner) -> bool {
        let list = match variable.kind {
            VariableKind::Attribute => &mut self.attributes,
            VariableKind::Uniform => &mut self.uniforms,
            VariableKind::Varying => &mut self.varyings,
        };
        let name = variable.name.resolve(interner);
        match list.binary_search_by(|entry| entry.name.resolve(interner).cmp(name)) {
            Ok(_) => false,
            Err(at) => {
                list.insert(at, variable);
                true
            }
        }
    }

    /// Find by source name.
    pub fn find(
        &self,
        kind: VariableKind,
        name: &str,
        interner: &StringInterner,
    ) -> Option<&ShaderVariable> {
        let list = self.list(kind);
        list.binary_search_by(|entry| entry.name.resolve(interner).cmp(name))
            .ok()
            .map(|at| &list[at])
    }

    /// Deep copy with owned names, independent of the interner.
    pub fn owned_copy(&self, interner: &StringInterner) -> ShaderVariables {
        let detach = |list: &[ShaderVariable]| list.iter().map(|v| v.detach(interner)).collect();
        ShaderVariables {
            ownership: Ownership::Owned,
            attributes: detach(&self.attributes),
            uniforms: detach(&self.uniforms),
            varyings: detach(&self.varyings),
        }
    }
}

/// Order two owned variables by name; interned names sort first.
pub(crate) fn compare_owned(a: &ShaderVariable, b: &ShaderVariable) -> Ordering {
    a.name.as_owned().cmp(&b.name.as_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn variable(kind: VariableKind, name: Name, ty: VarType) -> ShaderVariable {
        ShaderVariable {
            kind,
            name: VariableName::Interned(name),
            alias_name: None,
            precision: Precision::None,
            ty,
            static_write: false,
        }
    }

    #[test]
    fn test_insert_keeps_name_order() {
        let mut interner = StringInterner::new();
        let mut vars = ShaderVariables::default();
        for name in ["zeta", "alpha", "mid"] {
            let name = interner.intern(name);
            let float = VarType::Basic(BasicType::Float);
            assert!(vars.insert(variable(VariableKind::Uniform, name, float), &interner));
        }
        let names: Vec<_> = vars
            .uniforms()
            .iter()
            .map(|v| v.name.resolve(&interner))
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut interner = StringInterner::new();
        let name = interner.intern("u");
        let mut vars = ShaderVariables::default();
        assert!(vars.insert(
            variable(VariableKind::Uniform, name, VarType::Basic(BasicType::Float)),
            &interner
        ));
        assert!(!vars.insert(
            variable(VariableKind::Uniform, name, VarType::Basic(BasicType::Int)),
            &interner
        ));
        let found = vars.find(VariableKind::Uniform, "u", &interner);
        assert_eq!(found.map(|v| v.ty.clone()), Some(VarType::Basic(BasicType::Float)));
    }

    #[test]
    fn test_owned_copy_outlives_interner() {
        let owned = {
            let mut interner = StringInterner::new();
            let name = interner.intern("position");
            let mut vars = ShaderVariables::default();
            let vec4 = VarType::Vector(VectorType::of(BasicType::Float, 4));
            vars.insert(variable(VariableKind::Attribute, name, vec4), &interner);
            vars.owned_copy(&interner)
        };
        assert_eq!(owned.ownership(), Ownership::Owned);
        assert_eq!(owned.attributes()[0].name.as_owned(), Some("position"));
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn test_var_type_size_and_display() {
        let mut interner = StringInterner::new();
        let tag = interner.intern("Light");
        let ty = VarType::Array {
            element: Box::new(VarType::Struct {
                tag: Some(interner.lookup(tag).into()),
                fields: vec![
                    ("color".into(), VarType::Vector(VectorType::of(BasicType::Float, 3))),
                    ("power".into(), VarType::Basic(BasicType::Float)),
                ],
            }),
            length: 2,
        };
        assert_eq!(ty.size(), 8);
        assert_eq!(ty.to_string(), "Light[2]");
    }
}
