//! Lexical scopes and default precisions.
//!
//! GLSL ES puts variables and struct tags in one namespace per scope. Default
//! precisions set by `precision` statements are scoped the same way.

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use wgl_ir::{BasicType, Name, Precision, SamplerKind, Span, StructType, Type, TypeKind};

use crate::const_eval::ConstValue;

#[derive(Clone, Debug)]
pub(crate) enum SymbolKind {
    /// User variable or parameter.
    Variable,
    /// `gl_*` variable or constant.
    Builtin,
    /// Struct tag, resolved.
    Struct(StructType),
}

#[derive(Clone, Debug)]
pub(crate) struct Symbol {
    pub kind: SymbolKind,
    /// Declared type, struct names resolved, qualifier kept.
    pub ty: Type,
    pub span: Span,
    pub read_only: bool,
    /// Index of a `for` loop: read-only, and counts as a constant index.
    pub loop_index: bool,
    /// `const` with a constant initializer.
    pub is_const: bool,
    pub value: Option<ConstValue>,
    /// Name to emit in place of the source name.
    pub alias: Option<Name>,
    /// Entry in the checker's global variable table.
    pub global: Option<usize>,
}

impl Symbol {
    pub fn variable(ty: Type, span: Span) -> Self {
        Symbol {
            kind: SymbolKind::Variable,
            ty,
            span,
            read_only: false,
            loop_index: false,
            is_const: false,
            value: None,
            alias: None,
            global: None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, SymbolKind::Struct(_))
    }
}

/// Types that take a default precision.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum PrecisionKey {
    Int,
    Float,
    Sampler2D,
    SamplerCube,
}

impl PrecisionKey {
    /// The key for `ty`, `None` for types without precision (bool, structs).
    pub fn of(ty: &Type) -> Option<PrecisionKey> {
        match &ty.kind {
            TypeKind::Sampler(s) => match s.kind {
                SamplerKind::Sampler2D => Some(PrecisionKey::Sampler2D),
                SamplerKind::SamplerCube => Some(PrecisionKey::SamplerCube),
                _ => None,
            },
            TypeKind::Array(array) => PrecisionKey::of(&array.element),
            _ => match ty.element_type()? {
                BasicType::Int | BasicType::UInt => Some(PrecisionKey::Int),
                BasicType::Float => Some(PrecisionKey::Float),
                BasicType::Bool | BasicType::Void => None,
            },
        }
    }
}

#[derive(Default, Debug)]
struct Scope {
    symbols: FxHashMap<Name, Symbol>,
    precisions: SmallVec<[(PrecisionKey, Precision); 4]>,
}

/// Stack of scopes; the bottom one is the global scope.
#[derive(Debug)]
pub(crate) struct Scopes {
    stack: SmallVec<[Scope; 8]>,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            stack: smallvec![Scope::default()],
        }
    }

    pub fn push(&mut self) {
        self.stack.push(Scope::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.stack.len() > 1, "popped the global scope");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn is_global(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn lookup(&self, name: Name) -> Option<&Symbol> {
        self.stack.iter().rev().find_map(|s| s.symbols.get(&name))
    }

    pub fn lookup_mut(&mut self, name: Name) -> Option<&mut Symbol> {
        self.stack
            .iter_mut()
            .rev()
            .find_map(|s| s.symbols.get_mut(&name))
    }

    /// Binding of `name` in the innermost scope only.
    pub fn lookup_local(&self, name: Name) -> Option<&Symbol> {
        self.stack.last().and_then(|s| s.symbols.get(&name))
    }

    pub fn lookup_global(&self, name: Name) -> Option<&Symbol> {
        self.stack.first().and_then(|s| s.symbols.get(&name))
    }

    /// Bind `name` in the innermost scope. On a clash the existing binding's
    /// span is returned and nothing changes.
    pub fn insert(&mut self, name: Name, symbol: Symbol) -> Result<(), Span> {
        let Some(scope) = self.stack.last_mut() else {
            return Ok(());
        };
        if let Some(existing) = scope.symbols.get(&name) {
            return Err(existing.span);
        }
        scope.symbols.insert(name, symbol);
        Ok(())
    }

    /// Resolved struct type for `tag`.
    pub fn lookup_struct(&self, tag: Name) -> Option<&StructType> {
        match &self.lookup(tag)?.kind {
            SymbolKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn set_default_precision(&mut self, key: PrecisionKey, precision: Precision) {
        let Some(scope) = self.stack.last_mut() else {
            return;
        };
        match scope.precisions.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = precision,
            None => scope.precisions.push((key, precision)),
        }
    }

    pub fn default_precision(&self, key: PrecisionKey) -> Precision {
        self.stack
            .iter()
            .rev()
            .find_map(|s| s.precisions.iter().find(|(k, _)| *k == key).map(|e| e.1))
            .unwrap_or(Precision::None)
    }
}
