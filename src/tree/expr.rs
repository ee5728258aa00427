//! Expression nodes of the typed tree.
//!
//! Every expression carries its resolved static type and a source span. Intrinsic library methods
//! are represented as an enum ([`Intrinsic`]) rather than stringly-typed names so backends get
//! exhaustiveness checking when they map them.

use ember_core::lang::operators::OperatorId;

use super::types::Type;
use super::{Span, VarDecl};

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Resolved static type.
    pub ty: Type,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self {
            kind,
            ty,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn null() -> Self {
        Expr::new(ExprKind::Literal(Literal::Null), Type::Null)
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn int(value: i64, ty: Type) -> Self {
        Expr::new(ExprKind::Literal(Literal::Int(value)), ty)
    }

    pub fn float(value: f64, ty: Type) -> Self {
        Expr::new(ExprKind::Literal(Literal::Float(value)), ty)
    }

    /// A string literal. Literals are views onto static storage.
    pub fn string(value: &str) -> Self {
        Expr::new(ExprKind::Literal(Literal::String(value.to_string())), Type::string_view())
    }

    pub fn local(name: &str, ty: Type) -> Self {
        Expr::symbol(None, name, SymbolKind::Local, ty)
    }

    pub fn param(name: &str, ty: Type) -> Self {
        Expr::symbol(None, name, SymbolKind::Param, ty)
    }

    pub fn symbol(left: Option<Expr>, name: &str, kind: SymbolKind, ty: Type) -> Self {
        Expr::new(
            ExprKind::Symbol {
                left: left.map(Box::new),
                symbol: Symbol {
                    name: name.to_string(),
                    kind,
                },
            },
            ty,
        )
    }

    pub fn prefix(op: PrefixOp, operand: Expr) -> Self {
        let ty = match op {
            PrefixOp::Not => Type::Bool,
            _ => operand.ty.clone(),
        };
        Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn postfix(op: PostfixOp, operand: Expr) -> Self {
        let ty = operand.ty.clone();
        Expr::new(
            ExprKind::Postfix {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn conditional(cond: Expr, on_true: Expr, on_false: Expr) -> Self {
        let ty = on_true.ty.clone();
        Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                on_true: Box::new(on_true),
                on_false: Box::new(on_false),
            },
            ty,
        )
    }

    pub fn call(callee: Callee, receiver: Option<Expr>, args: Vec<Expr>, ty: Type) -> Self {
        Expr::new(
            ExprKind::Call {
                callee,
                receiver: receiver.map(Box::new),
                args,
            },
            ty,
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// What a symbol reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Param,
    Field { class: String, is_static: bool },
    /// Class-level constant (`class: None` for a local constant).
    Const { class: Option<String> },
    EnumConstant { enum_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

/// Binary operators, including assignment and array indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
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
    CondOr,
    CondAnd,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `left[right]`
    Index,
}

impl BinaryOp {
    pub fn operator_id(self) -> OperatorId {
        match self {
            BinaryOp::Assign => OperatorId::Assign,
            BinaryOp::AddAssign => OperatorId::AddAssign,
            BinaryOp::SubAssign => OperatorId::SubAssign,
            BinaryOp::MulAssign => OperatorId::MulAssign,
            BinaryOp::DivAssign => OperatorId::DivAssign,
            BinaryOp::ModAssign => OperatorId::ModAssign,
            BinaryOp::ShlAssign => OperatorId::ShlAssign,
            BinaryOp::ShrAssign => OperatorId::ShrAssign,
            BinaryOp::AndAssign => OperatorId::AndAssign,
            BinaryOp::OrAssign => OperatorId::OrAssign,
            BinaryOp::XorAssign => OperatorId::XorAssign,
            BinaryOp::CondOr => OperatorId::CondOr,
            BinaryOp::CondAnd => OperatorId::CondAnd,
            BinaryOp::BitOr => OperatorId::BitOr,
            BinaryOp::BitXor => OperatorId::BitXor,
            BinaryOp::BitAnd => OperatorId::BitAnd,
            BinaryOp::Eq => OperatorId::Eq,
            BinaryOp::NotEq => OperatorId::NotEq,
            BinaryOp::Lt => OperatorId::Lt,
            BinaryOp::LtEq => OperatorId::LtEq,
            BinaryOp::Gt => OperatorId::Gt,
            BinaryOp::GtEq => OperatorId::GtEq,
            BinaryOp::Shl => OperatorId::Shl,
            BinaryOp::Shr => OperatorId::Shr,
            BinaryOp::Add => OperatorId::Add,
            BinaryOp::Sub => OperatorId::Sub,
            BinaryOp::Mul => OperatorId::Mul,
            BinaryOp::Div => OperatorId::Div,
            BinaryOp::Mod => OperatorId::Mod,
            BinaryOp::Index => OperatorId::Index,
        }
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::AndAssign
                | BinaryOp::OrAssign
                | BinaryOp::XorAssign
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq)
    }

    /// Arithmetic and bitwise operators whose C-family result undergoes integer promotion.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Neg,
    Plus,
    Complement,
    Not,
    Increment,
    Decrement,
}

impl PrefixOp {
    pub fn operator_id(self) -> OperatorId {
        match self {
            PrefixOp::Neg => OperatorId::Neg,
            PrefixOp::Plus => OperatorId::Plus,
            PrefixOp::Complement => OperatorId::Complement,
            PrefixOp::Not => OperatorId::Not,
            PrefixOp::Increment => OperatorId::PreIncrement,
            PrefixOp::Decrement => OperatorId::PreDecrement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn operator_id(self) -> OperatorId {
        match self {
            PostfixOp::Increment => OperatorId::PostIncrement,
            PostfixOp::Decrement => OperatorId::PostDecrement,
        }
    }
}

/// Library methods every backend must map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    StringContains,
    StringStartsWith,
    StringEndsWith,
    StringSubstring,
    StringLength,
    ListAdd,
    ListInsert,
    ListRemoveAt,
    ListClear,
    ListCount,
    ListContains,
    MapContainsKey,
    MapRemove,
    MapClear,
    MathMin,
    MathMax,
    MathAbs,
    ConsoleWriteLine,
}

/// Signature of a user-defined method, as resolved by the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub class: String,
    pub name: String,
    pub is_static: bool,
    pub params: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Method(MethodSig),
    Intrinsic(Intrinsic),
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),

    /// Symbol reference, optionally qualified by a left-hand expression.
    Symbol { left: Option<Box<Expr>>, symbol: Symbol },

    /// The receiver of the current method.
    This,
    /// The receiver viewed as its parent class (only valid as a call receiver).
    Base,

    Prefix { op: PrefixOp, operand: Box<Expr> },
    Postfix { op: PostfixOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Conditional {
        cond: Box<Expr>,
        on_true: Box<Expr>,
        on_false: Box<Expr>,
    },

    /// Collection literal (`{ a, b, c }`).
    Collection(Vec<Expr>),

    /// Variable declaration used as an expression (e.g. a `for` initializer).
    VarDecl(Box<VarDecl>),

    Call {
        callee: Callee,
        receiver: Option<Box<Expr>>,
        args: Vec<Expr>,
    },

    /// Construction of the expression's type: an object, or an array of `length` elements.
    New { length: Option<Box<Expr>> },

    /// Reference to an embedded binary resource by its original name.
    Resource(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::types::IntKind;

    #[test]
    fn test_not_is_boolean() {
        let e = Expr::prefix(PrefixOp::Not, Expr::local("x", Type::Bool));
        assert_eq!(e.ty, Type::Bool);
    }

    #[test]
    fn test_neg_keeps_operand_type() {
        let e = Expr::prefix(PrefixOp::Neg, Expr::local("x", Type::Int(IntKind::I64)));
        assert_eq!(e.ty, Type::Int(IntKind::I64));
    }

    #[test]
    fn test_operator_families() {
        assert!(BinaryOp::ShlAssign.is_assignment());
        assert!(!BinaryOp::Shl.is_assignment());
        assert!(BinaryOp::NotEq.is_equality());
        assert!(BinaryOp::GtEq.is_comparison());
        assert!(BinaryOp::BitXor.is_arithmetic());
        assert!(!BinaryOp::CondAnd.is_arithmetic());
    }

    #[test]
    fn test_string_literal_is_a_view() {
        assert_eq!(Expr::string("hi").ty, Type::string_view());
    }
}
