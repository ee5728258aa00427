//! Provide the canonical language vocabulary shared by the Ember code generator and its backends.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic tables that every
//! backend agrees on:
//! - the operator set with its spelling, fixity and [`Priority`](lang::operators::Priority) level, and
//! - the reserved words of the C++ target, used to escape identifiers.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global mutable state, and no tree types.

pub mod lang;
