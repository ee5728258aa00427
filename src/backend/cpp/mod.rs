//! C++ backend adapter.
//!
//! Maps the abstract type/ownership model onto C++20:
//!
//! | source shape            | C++                         |
//! |-------------------------|-----------------------------|
//! | string view / storage   | `std::string_view` / `std::string` |
//! | value (storage) class   | `Foo`                       |
//! | read-only / mutable borrow | `const Foo *` / `Foo *`  |
//! | shared-owning reference | `std::shared_ptr<Foo>`      |
//! | storage array           | `std::array<T, N>`          |
//! | list / map              | `std::vector` / `std::map`  |
//!
//! The trait implementation here only dispatches; the policies live in:
//! - [`types`]: type spellings, literals, conversions
//! - [`calls`]: intrinsics, construction, string operators, loops, throw
//! - [`decls`]: unit prologues, classes, members, resources

mod calls;
mod decls;
mod types;

use ember_core::lang::cpp_keywords;
use ember_core::lang::operators::Priority;

use super::config::EmitConfig;
use super::conversions::Conversion;
use super::emit::{EmitError, Emitter, Usage};
use super::target::{Backend, ConstScope};
use super::writer::CodeWriter;
use crate::tree::{
    BinaryOp, Class, ConstDecl, EnumDecl, Expr, ExprKind, Field, Intrinsic, Literal, Method, Type, VarDecl,
    Visibility,
};

/// The C++ backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppBackend;

impl CppBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for CppBackend {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn type_name(&self, ty: &Type, promote: bool) -> Result<String, EmitError> {
        self.cpp_type(ty, promote)
    }

    fn literal(&self, _cx: &Emitter<'_>, expr: &Expr, lit: &Literal) -> Result<String, EmitError> {
        self.cpp_literal(&expr.ty, lit)
    }

    fn conversion(&self, cx: &Emitter<'_>, target: &Type, expr: &Expr) -> Result<Conversion, EmitError> {
        self.cpp_conversion(cx, target, expr)
    }

    fn escape_identifier(&self, name: &str) -> String {
        if cpp_keywords::is_keyword(name) {
            format!("{}_", name)
        } else {
            name.to_string()
        }
    }

    fn member_access(&self, receiver: &Expr) -> &'static str {
        if matches!(receiver.kind, ExprKind::This) || receiver.ty.ptr_modifier().is_some() {
            "->"
        } else {
            "."
        }
    }

    fn equality(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        self.string_comparison(cx, op, left, right, parent)
    }

    fn comparison(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        self.string_comparison(cx, op, left, right, parent)
    }

    fn assignment(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        self.cpp_assignment(cx, op, left, right, parent)
    }

    fn concatenation(&self, cx: &Emitter<'_>, left: &Expr, right: &Expr, parent: Priority) -> Result<String, EmitError> {
        self.cpp_concatenation(cx, left, right, parent)
    }

    fn intrinsic(
        &self,
        cx: &Emitter<'_>,
        expr: &Expr,
        intrinsic: Intrinsic,
        receiver: Option<&Expr>,
        args: &[Expr],
        parent: Priority,
    ) -> Result<String, EmitError> {
        self.cpp_intrinsic(cx, expr, intrinsic, receiver, args, parent)
    }

    fn new_object(
        &self,
        cx: &Emitter<'_>,
        expr: &Expr,
        length: Option<&Expr>,
        _parent: Priority,
    ) -> Result<String, EmitError> {
        self.cpp_new(cx, expr, length)
    }

    fn default_initializer(&self, ty: &Type) -> &'static str {
        types::default_initializer(ty)
    }

    fn foreach_header(
        &self,
        cx: &Emitter<'_>,
        element: &VarDecl,
        value: Option<&VarDecl>,
        collection: &Expr,
    ) -> Result<String, EmitError> {
        self.cpp_foreach_header(cx, element, value, collection)
    }

    fn throw_statement(&self, cx: &Emitter<'_>, message: &Expr) -> Result<String, EmitError> {
        Ok(format!(
            "throw std::runtime_error({});",
            cx.coerce(&Type::string_storage(), message, Priority::Statement)?
        ))
    }

    fn fallthrough_statement(&self) -> &'static str {
        "[[fallthrough]];"
    }

    fn const_declaration(&self, cx: &Emitter<'_>, decl: &ConstDecl, scope: ConstScope) -> Result<String, EmitError> {
        self.cpp_const_declaration(cx, decl, scope)
    }

    fn line_comment(&self, text: &str) -> String {
        format!("// {}", text)
    }

    fn write_interface_prologue(&self, out: &mut CodeWriter, usage: &Usage) {
        decls::write_interface_prologue(out, usage);
    }

    fn write_implementation_prologue(&self, out: &mut CodeWriter, config: &EmitConfig) {
        out.linef(format_args!("#include \"{}\"", config.interface_file));
    }

    fn open_namespace(&self, out: &mut CodeWriter, name: &str) {
        out.linef(format_args!("namespace {} {{", name));
    }

    fn close_namespace(&self, out: &mut CodeWriter, name: &str) {
        out.linef(format_args!("}}  // namespace {}", name));
    }

    fn write_forward_declaration(&self, out: &mut CodeWriter, class: &Class) {
        out.linef(format_args!("class {};", class.name));
    }

    fn write_enum(&self, out: &mut CodeWriter, decl: &EnumDecl) {
        decls::write_enum(self, out, decl);
    }

    fn open_class(&self, out: &mut CodeWriter, class: &Class) {
        out.open_block(&decls::class_header(class));
    }

    fn close_class(&self, out: &mut CodeWriter, _class: &Class) {
        out.close_block_with("};");
    }

    fn visibility_keyword(&self, visibility: Visibility) -> &'static str {
        match visibility {
            // C++ has no assembly-level visibility.
            Visibility::Public | Visibility::Internal => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    fn write_visibility_label(&self, out: &mut CodeWriter, keyword: &str) {
        out.outdented_line(&format!("{}:", keyword));
    }

    fn write_constructor_declaration(&self, out: &mut CodeWriter, class: &Class) {
        out.line(&decls::constructor_declaration(class));
    }

    fn write_destructor_declaration(&self, out: &mut CodeWriter, class: &Class) {
        out.linef(format_args!("virtual ~{}() = default;", class.name));
    }

    fn field_declaration(&self, cx: &Emitter<'_>, field: &Field) -> Result<String, EmitError> {
        self.cpp_field_declaration(cx, field)
    }

    fn method_declaration(&self, cx: &Emitter<'_>, class: &Class, method: &Method) -> Result<String, EmitError> {
        self.cpp_method_declaration(cx, class, method)
    }

    fn method_definition_header(
        &self,
        cx: &Emitter<'_>,
        class: &Class,
        method: &Method,
    ) -> Result<String, EmitError> {
        self.cpp_method_definition_header(cx, class, method)
    }

    fn constructor_definition_header(&self, _cx: &Emitter<'_>, class: &Class) -> String {
        format!("{0}::{0}()", class.name)
    }

    fn write_resource_declaration(&self, out: &mut CodeWriter, ident: &str, len: usize) {
        out.linef(format_args!("extern const uint8_t {}[{}];", ident, len));
    }

    fn write_resource_definition(&self, out: &mut CodeWriter, ident: &str, bytes: &[u8]) {
        decls::write_resource_definition(out, ident, bytes);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tree::Program;

    #[test]
    fn test_keywords_get_trailing_underscore() {
        let backend = CppBackend::new();
        assert_eq!(backend.escape_identifier("delete"), "delete_");
        assert_eq!(backend.escape_identifier("count"), "count");
    }

    #[test]
    fn test_resource_identifier_sanitizes() {
        assert_eq!(CppBackend.resource_identifier("icon.png"), "icon_png");
        assert_eq!(CppBackend.resource_identifier("ui/bg-1.jpg"), "ui_bg_1_jpg");
    }

    #[test]
    fn test_member_access_by_receiver_shape() {
        use crate::tree::PtrModifier;
        let backend = CppBackend;
        let this = Expr::new(ExprKind::This, Type::class_value("A"));
        assert_eq!(backend.member_access(&this), "->");
        assert_eq!(backend.member_access(&Expr::local("p", Type::class_value("A"))), ".");
        assert_eq!(
            backend.member_access(&Expr::local("p", Type::class_ptr("A", PtrModifier::Shared))),
            "->"
        );
    }

    #[test]
    fn test_throw_carries_message() {
        let program = Program::new();
        let cx = Emitter::new(&CppBackend, &program);
        let line = CppBackend.throw_statement(&cx, &Expr::string("bad state")).unwrap();
        assert_eq!(line, "throw std::runtime_error(\"bad state\");");
    }
}
