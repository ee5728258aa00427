//! Render the typed tree as target source text.
//!
//! This module defines [`Emitter`], the backend-agnostic traversal engine, and wires together the
//! focused submodules that implement it. The target-specific decisions are delegated to the
//! injected [`Backend`]; everything that is common to C-family targets (precedence, coercion
//! dispatch, statement shapes, member layout, class ordering) lives here.
//!
//! ## Notes
//! - The tree is never mutated. The only state the emitter carries is the class/method currently
//!   being emitted, used for unqualified member access, return coercion and error locations.
//! - Conversions are decided by [`Backend::conversion`] and applied by [`Emitter::coerce`]; do not
//!   hand-code casts in emission code.
//!
//! ## See also
//! - [`expressions`]: precedence-aware expression printing
//! - [`statements`]: statement emission
//! - [`layout`]: member grouping and topological class order
//! - [`usage`]: scan the tree for the library features it needs
//! - [`program`]: the two-pass program emitter

mod errors;
mod expressions;
mod layout;
mod program;
mod statements;
mod usage;

pub use errors::EmitError;
pub use expressions::{binary_priority, operand_priorities};
pub use layout::{ClassOrder, Member, MemberGroup, constructor_visibility, member_groups};
pub use program::{GeneratedUnits, ProgramEmitter, generate};
pub use usage::Usage;

use std::cell::Cell;

use ember_core::lang::operators::Priority;

use super::target::Backend;
use crate::tree::{Class, Expr, Method, Program, Span, Type};

/// Backend-agnostic expression and statement renderer.
///
/// One emitter serves one generation run over one immutable [`Program`].
pub struct Emitter<'a> {
    backend: &'a dyn Backend,
    program: &'a Program,
    current_class: Cell<Option<&'a Class>>,
    current_method: Cell<Option<&'a Method>>,
}

impl<'a> Emitter<'a> {
    pub fn new(backend: &'a dyn Backend, program: &'a Program) -> Self {
        Self {
            backend,
            program,
            current_class: Cell::new(None),
            current_method: Cell::new(None),
        }
    }

    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// Class whose members are being emitted.
    pub fn current_class(&self) -> Option<&'a Class> {
        self.current_class.get()
    }

    pub fn set_current_class(&self, class: Option<&'a Class>) {
        self.current_class.set(class);
        self.current_method.set(None);
    }

    /// Method whose body is being emitted (`None` inside constructors and initializers).
    pub fn current_method(&self) -> Option<&'a Method> {
        self.current_method.get()
    }

    pub fn set_current_method(&self, method: Option<&'a Method>) {
        self.current_method.set(method);
    }

    /// Whether `class` names the class currently being emitted.
    pub(crate) fn in_class(&self, class: &str) -> bool {
        self.current_class.get().is_some_and(|c| c.name == class)
    }

    /// Describe where emission currently is, for error messages.
    pub fn location(&self, span: Span) -> String {
        let mut scope = String::new();
        if let Some(class) = self.current_class.get() {
            scope.push_str(&class.name);
        }
        if let Some(method) = self.current_method.get() {
            if !scope.is_empty() {
                scope.push_str("::");
            }
            scope.push_str(&method.name);
        }
        if scope.is_empty() {
            span.to_string()
        } else {
            format!("{} at {}", scope, span)
        }
    }

    /// Spell a type through the backend, attaching the current location to failures.
    pub fn type_name(&self, ty: &Type, promote: bool) -> Result<String, EmitError> {
        self.backend
            .type_name(ty, promote)
            .map_err(|e| e.or_at(&self.location(Span::default())))
    }

    /// Escape an identifier through the backend.
    pub fn ident(&self, name: &str) -> String {
        self.backend.escape_identifier(name)
    }

    /// Parenthesize `text` (an expression binding at `own`) when printed in a `parent` context that
    /// binds tighter.
    pub fn wrap(&self, text: String, own: Priority, parent: Priority) -> String {
        if parent > own { format!("({})", text) } else { text }
    }

    /// Render `expr` for use where a value of type `target` is expected.
    ///
    /// Emits exactly what [`Emitter::render`] emits when no conversion is needed.
    pub fn coerce(&self, target: &Type, expr: &Expr, parent: Priority) -> Result<String, EmitError> {
        let conversion = self
            .backend
            .conversion(self, target, expr)
            .map_err(|e| e.or_at(&self.location(expr.span)))?;
        match (conversion.operand_priority(), conversion.result_priority()) {
            (Some(operand), Some(result)) => {
                let text = conversion.apply(self.render(expr, operand)?);
                Ok(self.wrap(text, result, parent))
            }
            _ => self.render(expr, parent),
        }
    }
}
