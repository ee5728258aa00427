//! Backend policy interface.
//!
//! A [`Backend`] supplies the target-specific decisions the shared [`Emitter`] cannot make alone:
//! type spellings, ownership-modifier syntax, conversions, call syntax for intrinsic methods,
//! construction, and declaration syntax. The emitter owns traversal, parenthesization and layout
//! policy; it calls into the backend at well-defined seams and never inspects target text.
//!
//! Hooks that have a sensible C-family default (equality, comparison, assignment, concatenation)
//! are provided methods; a backend overrides them to rewrite the whole expression shape.
//!
//! ## Notes
//! - Every hook may fail with [`EmitError`]; the emitter propagates without catching.
//! - Hooks that return expression text return it *unparenthesized relative to `parent`* only when
//!   documented; by default they receive `parent` and are responsible for wrapping
//!   (use [`Emitter::wrap`]).

use ember_core::lang::operators::Priority;

use super::config::EmitConfig;
use super::conversions::Conversion;
use super::emit::{EmitError, Emitter, Usage};
use super::writer::CodeWriter;
use crate::tree::{
    BinaryOp, Class, ConstDecl, EnumDecl, Expr, Field, Intrinsic, Literal, Method, Type, VarDecl, Visibility,
};

/// Where a constant declaration appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstScope {
    Class,
    Local,
}

/// Target-language policy object.
pub trait Backend {
    /// Short name of the target (used in logs).
    fn name(&self) -> &'static str;

    // --- types and values ------------------------------------------------------

    /// Spell a type. `promote` widens narrow integers to the target's arithmetic width.
    fn type_name(&self, ty: &Type, promote: bool) -> Result<String, EmitError>;

    /// Spell a literal of static type `expr.ty`.
    fn literal(&self, cx: &Emitter<'_>, expr: &Expr, lit: &Literal) -> Result<String, EmitError>;

    /// Decide the conversion needed to use `expr` where `target` is expected.
    ///
    /// Must return [`Conversion::None`] when `expr` already has type `target`.
    fn conversion(&self, cx: &Emitter<'_>, target: &Type, expr: &Expr) -> Result<Conversion, EmitError>;

    /// Escape an identifier that collides with a target keyword.
    fn escape_identifier(&self, name: &str) -> String;

    /// Keyword for the current receiver.
    fn this_keyword(&self) -> &'static str {
        "this"
    }

    /// Member-access token for `receiver` (e.g. `.` or `->`).
    fn member_access(&self, receiver: &Expr) -> &'static str;

    /// Scope-resolution token for static members.
    fn static_access(&self) -> &'static str {
        "::"
    }

    /// Identifier of an embedded resource: every non-alphanumeric character becomes `_`.
    fn resource_identifier(&self, name: &str) -> String {
        name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
    }

    // --- expression hooks -------------------------------------------------------

    /// Render `left == right` / `left != right`.
    fn equality(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        cx.write_binary(op, left, right, parent)
    }

    /// Render `<`, `<=`, `>`, `>=`.
    fn comparison(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        cx.write_binary(op, left, right, parent)
    }

    /// Render plain and compound assignment.
    fn assignment(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        cx.write_assignment(op, left, right, parent)
    }

    /// Render `+` whose result is a string.
    fn concatenation(&self, cx: &Emitter<'_>, left: &Expr, right: &Expr, parent: Priority) -> Result<String, EmitError> {
        cx.write_binary(BinaryOp::Add, left, right, parent)
    }

    /// Render a call to a library intrinsic.
    fn intrinsic(
        &self,
        cx: &Emitter<'_>,
        expr: &Expr,
        intrinsic: Intrinsic,
        receiver: Option<&Expr>,
        args: &[Expr],
        parent: Priority,
    ) -> Result<String, EmitError>;

    /// Render construction of `expr.ty` (object or array of `length` elements).
    fn new_object(&self, cx: &Emitter<'_>, expr: &Expr, length: Option<&Expr>, parent: Priority)
    -> Result<String, EmitError>;

    // --- statements -------------------------------------------------------------

    /// Initializer suffix for a declaration without an explicit value (e.g. `{}`), or `""`.
    fn default_initializer(&self, ty: &Type) -> &'static str;

    /// Header of a range loop, without the opening brace.
    fn foreach_header(
        &self,
        cx: &Emitter<'_>,
        element: &VarDecl,
        value: Option<&VarDecl>,
        collection: &Expr,
    ) -> Result<String, EmitError>;

    /// Full statement raising an error carrying `message`.
    fn throw_statement(&self, cx: &Emitter<'_>, message: &Expr) -> Result<String, EmitError>;

    /// Statement marking an explicit fallthrough into the next switch case.
    fn fallthrough_statement(&self) -> &'static str;

    /// Whether `switch` accepts string operands natively. When not, the emitter lowers it.
    fn supports_string_switch(&self) -> bool {
        false
    }

    /// Full constant declaration line.
    fn const_declaration(&self, cx: &Emitter<'_>, decl: &ConstDecl, scope: ConstScope) -> Result<String, EmitError>;

    // --- declarations -----------------------------------------------------------

    fn line_comment(&self, text: &str) -> String;

    /// File prologue of the interface unit (guards, includes).
    fn write_interface_prologue(&self, out: &mut CodeWriter, usage: &Usage);

    /// File prologue of the implementation unit (reference to the interface unit).
    fn write_implementation_prologue(&self, out: &mut CodeWriter, config: &EmitConfig);

    fn open_namespace(&self, out: &mut CodeWriter, name: &str);
    fn close_namespace(&self, out: &mut CodeWriter, name: &str);

    fn write_forward_declaration(&self, out: &mut CodeWriter, class: &Class);
    fn write_enum(&self, out: &mut CodeWriter, decl: &EnumDecl);

    fn open_class(&self, out: &mut CodeWriter, class: &Class);
    fn close_class(&self, out: &mut CodeWriter, class: &Class);

    /// Visibility keyword for a member group (targets without `internal` map it elsewhere).
    fn visibility_keyword(&self, visibility: Visibility) -> &'static str;
    fn write_visibility_label(&self, out: &mut CodeWriter, keyword: &str);

    /// Declaration of the synthesized default constructor.
    fn write_constructor_declaration(&self, out: &mut CodeWriter, class: &Class);
    /// Declaration of the virtual destructor of a polymorphic root class.
    fn write_destructor_declaration(&self, out: &mut CodeWriter, class: &Class);

    fn field_declaration(&self, cx: &Emitter<'_>, field: &Field) -> Result<String, EmitError>;
    fn method_declaration(&self, cx: &Emitter<'_>, class: &Class, method: &Method) -> Result<String, EmitError>;

    /// Header of an out-of-line method definition, without the opening brace.
    fn method_definition_header(&self, cx: &Emitter<'_>, class: &Class, method: &Method)
    -> Result<String, EmitError>;
    /// Header of an out-of-line constructor definition, without the opening brace.
    fn constructor_definition_header(&self, cx: &Emitter<'_>, class: &Class) -> String;

    /// Length-only declaration of a resource in the interface unit.
    fn write_resource_declaration(&self, out: &mut CodeWriter, ident: &str, len: usize);
    /// Defining byte-array initializer of a resource in the implementation unit.
    fn write_resource_definition(&self, out: &mut CodeWriter, ident: &str, bytes: &[u8]);
}
