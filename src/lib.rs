#![forbid(unsafe_code)]
//! Ember code generation back end
//!
//! Ember is a small C-family language. This crate is the back end of its source-to-source
//! compiler: it takes the front end's resolved, type-checked tree and emits target source text,
//! one interface unit and one implementation unit per program. The shared traversal engine is
//! retargetable; the C++ adapter ([`backend::CppBackend`]) is the reference backend.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `backend` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Fatal conditions**: Every emission failure is an [`backend::EmitError`]; the caller discards both units.
//!
//! ## Examples
//!
//! ```rust
//! use ember::backend::{CppBackend, EmitConfig, generate};
//! use ember::tree::{Class, Field, Program, Type};
//!
//! let mut point = Class::new("Point");
//! point.fields.push(Field::new("x", Type::i32()));
//! let mut program = Program::new();
//! program.classes.push(point);
//!
//! let units = generate(&program, &CppBackend, &EmitConfig::default()).unwrap();
//! assert!(units.interface.contains("int32_t x{};"));
//! ```

pub mod backend;
pub mod tree;

pub use backend::{Backend, CppBackend, EmitConfig, EmitError, GeneratedUnits, generate};
pub use tree::Program;
