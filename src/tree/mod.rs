//! Typed tree consumed by the code generator.
//!
//! The tree is built once by the front end (already resolved and type-checked) and is immutable
//! for the whole generation run. Nothing in this crate mutates it.
//!
//! ## Module organization
//!
//! - [`types`]: type nodes (integers, string shapes, arrays, classes with ownership modifiers)
//! - [`expr`]: expression nodes
//! - [`stmt`]: statement nodes
//! - [`decl`]: classes, members and enums

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

use std::collections::HashMap;
use std::fmt;

pub use decl::{
    Class, ClassCallType, ConstDecl, EnumConstant, EnumDecl, Field, Method, MethodCallType, Param, Visibility,
};
pub use expr::{BinaryOp, Callee, Expr, ExprKind, Intrinsic, Literal, MethodSig, PostfixOp, PrefixOp, Symbol, SymbolKind};
pub use stmt::{Case, Stmt, Switch};
pub use types::{ArrayShape, IntKind, Ownership, PtrModifier, StringShape, Type};

/// Source span preserved from the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Local variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub value: Option<Expr>,
}

impl VarDecl {
    pub fn new(name: &str, ty: Type, value: Option<Expr>) -> Self {
        Self {
            name: name.to_string(),
            ty,
            value,
        }
    }
}

/// A complete program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub classes: Vec<Class>,
    pub enums: Vec<EnumDecl>,
    /// Embedded binary resources by original name.
    pub resources: HashMap<String, Vec<u8>>,
    /// Raw target-language blocks emitted verbatim at top level.
    pub natives: Vec<String>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}
