//! Define error types for tree → target emission.
//!
//! Every condition here is fatal: generation either fully succeeds or the caller discards all
//! partial output. There is no recoverable error class.
//!
//! ## Notes
//!
//! - Prefer actionable messages: name the construct (operator, type shape, call-type) and where it
//!   was found (enclosing class/method and source span).

use miette::Diagnostic;
use thiserror::Error;

/// Error during emission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EmitError {
    /// The active backend has no mapping for a node kind, operator, type shape or call-type.
    #[error("unsupported construct: {construct} (at {location})")]
    #[diagnostic(
        code(ember::emit::unsupported),
        help("the active backend cannot translate this construct; rewrite it or use a native block")
    )]
    Unsupported { construct: String, location: String },

    /// The class layout graph has a cycle through inheritance or by-value fields.
    #[error("circular dependency: class `{class}` depends on itself through its base class or by-value fields")]
    #[diagnostic(
        code(ember::emit::circular_dependency),
        help("break the cycle by holding one of the classes through a pointer instead of by value")
    )]
    CircularDependency { class: String },

    /// A literal value has no textual form in the target syntax.
    #[error("unrepresentable literal `{literal}` (at {location})")]
    #[diagnostic(code(ember::emit::unrepresentable_literal), help("compute the value at runtime instead"))]
    UnrepresentableLiteral { literal: String, location: String },
}

impl EmitError {
    pub fn unsupported(construct: impl Into<String>, location: impl Into<String>) -> Self {
        EmitError::Unsupported {
            construct: construct.into(),
            location: location.into(),
        }
    }

    /// Fill in the location when the raising hook had none to give.
    pub(crate) fn or_at(self, location: &str) -> Self {
        match self {
            EmitError::Unsupported { construct, location: l } if l.is_empty() => EmitError::Unsupported {
                construct,
                location: location.to_string(),
            },
            EmitError::UnrepresentableLiteral { literal, location: l } if l.is_empty() => {
                EmitError::UnrepresentableLiteral {
                    literal,
                    location: location.to_string(),
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_construct_and_location() {
        let err = EmitError::unsupported("type `null`", "Point::x at 3..9");
        assert_eq!(err.to_string(), "unsupported construct: type `null` (at Point::x at 3..9)");
    }

    #[test]
    fn test_circular_dependency_names_class() {
        let err = EmitError::CircularDependency {
            class: "Node".to_string(),
        };
        assert!(err.to_string().contains("`Node`"));
    }

    #[test]
    fn test_or_at_fills_only_missing_location() {
        let filled = EmitError::unsupported("x", "").or_at("A::f");
        assert_eq!(filled, EmitError::unsupported("x", "A::f"));

        let kept = EmitError::unsupported("x", "B::g").or_at("A::f");
        assert_eq!(kept, EmitError::unsupported("x", "B::g"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = EmitError::CircularDependency { class: "A".to_string() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("ember::emit::circular_dependency"));
    }
}
