//! Operator vocabulary.
//!
//! This module defines the canonical operator set of the C-family source language along with the
//! metadata the code generator needs to print minimal parentheses: spelling, [`Priority`] level,
//! associativity and fixity.
//!
//! ## Notes
//! - Spellings are the C-family tokens, which every supported target shares.
//! - [`Priority`] is a total order from loosest ([`Priority::Statement`]) to tightest
//!   ([`Priority::Primary`]). Backends compare levels with `<`/`>`.
//!
//! ## Examples
//! ```rust
//! use ember_core::lang::operators::{self, OperatorId, Priority};
//!
//! assert_eq!(operators::from_str("<<"), Some(OperatorId::Shl));
//! assert!(operators::info_for(OperatorId::Mul).priority > Priority::Add);
//! ```

/// Binding strength of an expression, from loosest to tightest.
///
/// A sub-expression needs parentheses when the context it is printed in binds tighter than the
/// sub-expression itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Top level: statement expressions, call arguments, initializers.
    Statement,
    Assign,
    Cond,
    CondOr,
    CondAnd,
    Or,
    Xor,
    And,
    Equality,
    Rel,
    Shift,
    Add,
    Mul,
    /// Prefix operators.
    Unary,
    /// Postfix operators, calls, member access, indexing, literals and names.
    Primary,
}

impl Priority {
    /// All levels in ascending order.
    pub const ALL: &'static [Priority] = &[
        Priority::Statement,
        Priority::Assign,
        Priority::Cond,
        Priority::CondOr,
        Priority::CondAnd,
        Priority::Or,
        Priority::Xor,
        Priority::And,
        Priority::Equality,
        Priority::Rel,
        Priority::Shift,
        Priority::Add,
        Priority::Mul,
        Priority::Unary,
        Priority::Primary,
    ];

    /// Return the next tighter level (saturating at [`Priority::Primary`]).
    pub fn tighter(self) -> Priority {
        let index = Priority::ALL.iter().position(|p| *p == self).unwrap_or(Priority::ALL.len() - 1);
        Priority::ALL.get(index + 1).copied().unwrap_or(Priority::Primary)
    }
}

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define where an operator sits relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,

    // Conditional (`?:`)
    Conditional,

    // Logical
    CondOr,
    CondAnd,

    // Bitwise
    BitOr,
    BitXor,
    BitAnd,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Arithmetic
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Prefix
    Neg,
    Plus,
    Complement,
    Not,
    PreIncrement,
    PreDecrement,

    // Postfix
    PostIncrement,
    PostDecrement,
    Index,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `spelling` for [`OperatorId::Conditional`] and [`OperatorId::Index`] is the opening token only.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub priority: Priority,
    pub associativity: Associativity,
    pub fixity: Fixity,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Assignment
    op(OperatorId::Assign, "=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::AddAssign, "+=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::SubAssign, "-=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::MulAssign, "*=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::DivAssign, "/=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::ModAssign, "%=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::ShlAssign, "<<=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::ShrAssign, ">>=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::AndAssign, "&=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::OrAssign, "|=", Priority::Assign, Associativity::Right, Fixity::Infix),
    op(OperatorId::XorAssign, "^=", Priority::Assign, Associativity::Right, Fixity::Infix),
    // Conditional
    op(OperatorId::Conditional, "?", Priority::Cond, Associativity::Right, Fixity::Infix),
    // Logical
    op(OperatorId::CondOr, "||", Priority::CondOr, Associativity::Left, Fixity::Infix),
    op(OperatorId::CondAnd, "&&", Priority::CondAnd, Associativity::Left, Fixity::Infix),
    // Bitwise
    op(OperatorId::BitOr, "|", Priority::Or, Associativity::Left, Fixity::Infix),
    op(OperatorId::BitXor, "^", Priority::Xor, Associativity::Left, Fixity::Infix),
    op(OperatorId::BitAnd, "&", Priority::And, Associativity::Left, Fixity::Infix),
    // Comparison
    op(OperatorId::Eq, "==", Priority::Equality, Associativity::Left, Fixity::Infix),
    op(OperatorId::NotEq, "!=", Priority::Equality, Associativity::Left, Fixity::Infix),
    op(OperatorId::Lt, "<", Priority::Rel, Associativity::Left, Fixity::Infix),
    op(OperatorId::LtEq, "<=", Priority::Rel, Associativity::Left, Fixity::Infix),
    op(OperatorId::Gt, ">", Priority::Rel, Associativity::Left, Fixity::Infix),
    op(OperatorId::GtEq, ">=", Priority::Rel, Associativity::Left, Fixity::Infix),
    // Arithmetic
    op(OperatorId::Shl, "<<", Priority::Shift, Associativity::Left, Fixity::Infix),
    op(OperatorId::Shr, ">>", Priority::Shift, Associativity::Left, Fixity::Infix),
    op(OperatorId::Add, "+", Priority::Add, Associativity::Left, Fixity::Infix),
    op(OperatorId::Sub, "-", Priority::Add, Associativity::Left, Fixity::Infix),
    op(OperatorId::Mul, "*", Priority::Mul, Associativity::Left, Fixity::Infix),
    op(OperatorId::Div, "/", Priority::Mul, Associativity::Left, Fixity::Infix),
    op(OperatorId::Mod, "%", Priority::Mul, Associativity::Left, Fixity::Infix),
    // Prefix
    op(OperatorId::Neg, "-", Priority::Unary, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Plus, "+", Priority::Unary, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Complement, "~", Priority::Unary, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Not, "!", Priority::Unary, Associativity::Right, Fixity::Prefix),
    op(OperatorId::PreIncrement, "++", Priority::Unary, Associativity::Right, Fixity::Prefix),
    op(OperatorId::PreDecrement, "--", Priority::Unary, Associativity::Right, Fixity::Prefix),
    // Postfix
    op(OperatorId::PostIncrement, "++", Priority::Primary, Associativity::Left, Fixity::Postfix),
    op(OperatorId::PostDecrement, "--", Priority::Primary, Associativity::Left, Fixity::Postfix),
    op(OperatorId::Index, "[", Priority::Primary, Associativity::Left, Fixity::Postfix),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Return the spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Resolve an infix operator spelling to its identifier.
///
/// ## Notes
/// - Only infix operators are searched: `-` resolves to [`OperatorId::Sub`], never [`OperatorId::Neg`].
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|o| o.fixity == Fixity::Infix && o.spelling == spelling)
        .map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    priority: Priority,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        priority,
        associativity,
        fixity,
    }
}
