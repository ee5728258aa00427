//! Conversion strategies applied at assignment, argument, return and initializer boundaries.
//!
//! The source language has one abstract type/ownership model; a target language usually needs an
//! explicit conversion when a value crosses from one shape to another (value → borrow,
//! shared → borrow, view → storage, wide → narrow integer).
//!
//! This module is the **single place** that knows how a conversion wraps already-rendered text and
//! what binding strength the result has. *Which* conversion applies is backend policy, decided by
//! [`Backend::conversion`](super::target::Backend::conversion).
//!
//! ## Conversion shapes
//!
//! | shape               | example (C++)                     | operand printed at | result binds as |
//! |---------------------|-----------------------------------|--------------------|-----------------|
//! | [`Conversion::None`]   | `x`                            | caller's level     | unchanged       |
//! | [`Conversion::Prefix`] | `&x`                           | `Unary`            | `Unary`         |
//! | [`Conversion::Suffix`] | `x.get()`                      | `Primary`          | `Primary`       |
//! | [`Conversion::Call`]   | `std::string(x)`               | `Statement`        | `Primary`       |

use ember_core::lang::operators::Priority;

/// Result of conversion analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Pass value as-is
    None,
    /// Prefix operator, e.g. address-of `&`
    Prefix(&'static str),
    /// Postfix member call, e.g. `.get()` to unwrap a shared handle
    Suffix(&'static str),
    /// Function-call or cast syntax around the value, e.g. `static_cast<uint8_t>`
    Call(String),
}

impl Conversion {
    pub fn is_none(&self) -> bool {
        matches!(self, Conversion::None)
    }

    /// Level the converted operand must be printed at.
    ///
    /// `None` for [`Conversion::None`]: the operand keeps the caller's level.
    pub fn operand_priority(&self) -> Option<Priority> {
        match self {
            Conversion::None => None,
            Conversion::Prefix(_) => Some(Priority::Unary),
            Conversion::Suffix(_) => Some(Priority::Primary),
            Conversion::Call(_) => Some(Priority::Statement),
        }
    }

    /// Binding strength of the converted expression.
    pub fn result_priority(&self) -> Option<Priority> {
        match self {
            Conversion::None => None,
            Conversion::Prefix(_) => Some(Priority::Unary),
            Conversion::Suffix(_) | Conversion::Call(_) => Some(Priority::Primary),
        }
    }

    /// Apply this conversion to an already-rendered operand.
    pub fn apply(&self, operand: String) -> String {
        match self {
            Conversion::None => operand,
            Conversion::Prefix(op) => format!("{}{}", op, operand),
            Conversion::Suffix(suffix) => format!("{}{}", operand, suffix),
            Conversion::Call(func) => format!("{}({})", func, operand),
        }
    }
}
