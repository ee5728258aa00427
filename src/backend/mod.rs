//! Ember code generation backend
//!
//! This module turns the typed tree into target-language source text.
//!
//! The pipeline is:
//! 1. [`emit::ClassOrder`] settles the class definition order (rejecting layout cycles)
//! 2. [`emit::ProgramEmitter`] writes the interface unit, then the implementation unit
//! 3. Every target-specific decision is delegated to the active [`Backend`]
//!
//! ## Module Organization
//!
//! - `emit/` - backend-agnostic traversal: expressions, statements, layout, usage scan, program
//! - `target.rs` - the [`Backend`] policy trait
//! - `conversions.rs` - conversion shapes applied at value boundaries
//! - `writer.rs` - indentation-aware output sink
//! - `config.rs` - emission configuration
//! - `cpp/` - the C++ adapter

#![deny(clippy::unwrap_used)]

pub mod config;
pub mod conversions;
pub mod cpp;
pub mod emit;
pub mod target;
pub mod writer;

pub use config::EmitConfig;
pub use conversions::Conversion;
pub use cpp::CppBackend;
pub use emit::{EmitError, Emitter, GeneratedUnits, ProgramEmitter, generate};
pub use target::{Backend, ConstScope};
pub use writer::CodeWriter;
