//! Ember language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. `OperatorId`) and look up spellings and metadata via
//! registry tables instead of scattering string checks across the code generator.
//!
//! ## Examples
//! ```rust
//! use ember_core::lang::operators::{self, OperatorId, Priority};
//!
//! assert_eq!(operators::as_str(OperatorId::Add), "+");
//! assert_eq!(operators::info_for(OperatorId::Add).priority, Priority::Add);
//! ```

pub mod cpp_keywords;
pub mod operators;
