//! Declarations, qualifiers and types.

use wgl_ir::{
    ArrayLength, Decl, DeclKind, ExprId, FunctionProto, Name, Param, PrecAssoc, Precision,
    StorageQualifier, StructType, Type, TypeKind,
};

use super::{Dialect, Printer};

impl<D: Dialect> Printer<'_, D> {
    /// Print one declaration with its terminating `;` or body.
    ///
    /// Returns `false` when nothing was printed: precision declarations are
    /// dropped for targets without precision qualifiers.
    pub fn print_decl(&mut self, decl: &Decl) -> bool {
        match &decl.kind {
            DeclKind::Var { ty, name, init } => {
                self.print_type(ty);
                self.print_var_declarator(*name, *init);
            }
            DeclKind::Array { ty, name, length } => {
                self.print_type(ty);
                self.emit(" ");
                self.emit_name(*name);
                self.print_array_length(length);
            }
            DeclKind::Prototype(proto) => self.print_proto(proto),
            DeclKind::Function { proto, body } => {
                self.print_proto(proto);
                self.emit(" ");
                self.print_stmt(*body);
                return true;
            }
            DeclKind::TypeDecl { ty, var_name } => {
                self.print_type(ty);
                if let Some(name) = var_name {
                    self.emit(" ");
                    self.emit_name(*name);
                }
            }
            DeclKind::Precision { precision, ty } => {
                let Some(precision) = self.options.printed_precision(*precision) else {
                    return false;
                };
                self.emit("precision ");
                self.emit(precision.as_str());
                self.emit(" ");
                self.print_type_specifier(ty);
            }
            DeclKind::Invariant { names } => {
                self.emit("invariant ");
                for (i, (name, _)) in names.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_name(*name);
                }
            }
        }
        self.emit(";");
        true
    }

    /// The declarators of one declaration statement, regrouped as
    /// `float a, b[2], c = 1.0;`. The type is printed once, from the first.
    pub fn print_decl_group(&mut self, decls: &[Decl]) {
        let Some((first, rest)) = decls.split_first() else {
            return;
        };
        if rest.is_empty() {
            self.print_decl(first);
            return;
        }
        match &first.kind {
            DeclKind::Var { ty, .. } | DeclKind::Array { ty, .. } | DeclKind::TypeDecl { ty, .. } => {
                self.print_type(ty);
            }
            _ => {
                debug_assert!(false, "declarator group starts with {first:?}");
            }
        }
        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                self.emit(",");
            }
            match &decl.kind {
                DeclKind::Var { name, init, .. } => self.print_var_declarator(*name, *init),
                DeclKind::Array { name, length, .. } => {
                    self.emit(" ");
                    self.emit_name(*name);
                    self.print_array_length(length);
                }
                DeclKind::TypeDecl {
                    var_name: Some(name),
                    ..
                } => {
                    self.emit(" ");
                    self.emit_name(*name);
                }
                _ => {}
            }
        }
        self.emit(";");
    }

    fn print_var_declarator(&mut self, name: Name, init: Option<ExprId>) {
        self.emit(" ");
        self.emit_name(name);
        if let Some(init) = init {
            self.emit(" = ");
            self.print_expr_in(init, PrecAssoc::ASSIGN);
        }
    }

    /// `[length]`, using the folded value when known.
    pub fn print_array_length(&mut self, length: &ArrayLength) {
        self.emit("[");
        match (length.value, length.expr) {
            (Some(value), _) => self.emit_fmt(format_args!("{value}")),
            (None, Some(expr)) => self.print_expr_in(expr, PrecAssoc::COND),
            (None, None) => {}
        }
        self.emit("]");
    }

    /// `return_type name(params)`
    pub fn print_proto(&mut self, proto: &FunctionProto) {
        self.print_type(&proto.return_type);
        self.emit(" ");
        self.emit_name(proto.name);
        self.print_params(&proto.params);
    }

    pub fn print_params(&mut self, params: &[Param]) {
        self.emit("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.print_param(param);
        }
        self.emit(")");
    }

    pub fn print_param(&mut self, param: &Param) {
        self.print_type(&param.ty);
        if let Some(name) = param.name {
            self.emit(" ");
            self.emit_name(name);
        }
        self.print_array_suffix(&param.ty);
    }

    /// Qualifiers, precision and specifier of `ty`. For an array type the
    /// element is printed; the size goes after the name, see
    /// [`Printer::print_array_suffix`].
    pub fn print_type(&mut self, ty: &Type) {
        if let Some(qualifier) = &ty.qualifier {
            if !qualifier.layout.is_empty() {
                self.emit("layout(");
                for (i, pair) in qualifier.layout.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_name(pair.name);
                    if let Some(value) = pair.value {
                        self.emit_fmt(format_args!(" = {value}"));
                    }
                }
                self.emit(") ");
            }
            if qualifier.invariant {
                self.emit("invariant ");
            }
            if qualifier.storage != StorageQualifier::None {
                self.emit(qualifier.storage.as_str());
                self.emit(" ");
            }
        }
        let element = array_element(ty);
        let precision = if element.precision == Precision::None {
            ty.precision
        } else {
            element.precision
        };
        if let Some(precision) = self.options.printed_precision(precision) {
            self.emit(precision.as_str());
            self.emit(" ");
        }
        self.print_type_specifier(element);
    }

    /// `[n]` for each array level of `ty`, outermost first.
    pub fn print_array_suffix(&mut self, ty: &Type) {
        if let TypeKind::Array(array) = &ty.kind {
            self.print_array_length(&array.length);
            self.print_array_suffix(&array.element);
        }
    }

    /// The bare type: a keyword, a struct tag, or an anonymous struct
    /// definition.
    pub fn print_type_specifier(&mut self, ty: &Type) {
        match &ty.kind {
            TypeKind::Name(tag) => self.emit_name(*tag),
            TypeKind::Struct(s) => self.print_struct(s),
            TypeKind::Array(array) => {
                self.print_type_specifier(&array.element);
                self.print_array_length(&array.length);
            }
            kind => {
                let name = self.dialect.type_name(kind);
                self.emit(name);
            }
        }
    }

    /// `struct Tag { fields }`. Later uses of a tagged struct are
    /// `TypeKind::Name` and print the tag alone.
    fn print_struct(&mut self, s: &StructType) {
        self.emit("struct ");
        if let Some(tag) = s.tag {
            self.emit_name(tag);
            self.emit(" ");
        }
        self.emit("{");
        self.newline();
        self.indent();
        for field in &s.fields {
            self.start_line();
            self.print_type(&field.ty);
            self.emit(" ");
            self.emit_name(field.name);
            self.print_array_suffix(&field.ty);
            self.emit(";");
            self.newline();
        }
        self.dedent();
        self.start_line();
        self.emit("}");
    }
}

fn array_element(ty: &Type) -> &Type {
    match &ty.kind {
        TypeKind::Array(array) => array_element(&array.element),
        _ => ty,
    }
}
