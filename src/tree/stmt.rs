//! Statement nodes of the typed tree.

use super::decl::ConstDecl;
use super::expr::Expr;
use super::VarDecl;

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement (`expr;`)
    Expr(Expr),

    Block(Vec<Stmt>),

    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While { cond: Expr, body: Box<Stmt> },

    DoWhile { body: Box<Stmt>, cond: Expr },

    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        advance: Option<Expr>,
        body: Box<Stmt>,
    },

    /// Iterate a list, array or map. `value` is only present for maps.
    Foreach {
        element: VarDecl,
        value: Option<VarDecl>,
        collection: Expr,
        body: Box<Stmt>,
    },

    Switch(Switch),

    Break,
    Continue,
    Return(Option<Expr>),
    Throw(Expr),

    /// Raw target-language passthrough.
    Native(String),

    /// Local constant declaration.
    Const(ConstDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub value: Expr,
    pub cases: Vec<Case>,
    pub default: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub values: Vec<Expr>,
    pub body: Vec<Stmt>,
    /// Explicit fallthrough into the next case.
    pub fallthrough: bool,
}

impl Stmt {
    /// Whether control can reach the end of this statement.
    ///
    /// Conservative: loops and switches are assumed to complete.
    pub fn completes_normally(&self) -> bool {
        match self {
            Stmt::Break | Stmt::Continue | Stmt::Return(_) | Stmt::Throw(_) => false,
            Stmt::Block(stmts) => stmts.last().is_none_or(Stmt::completes_normally),
            Stmt::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => then_branch.completes_normally() || else_branch.completes_normally(),
            _ => true,
        }
    }
}

/// Whether a statement list can fall off its end.
pub fn body_completes_normally(body: &[Stmt]) -> bool {
    body.last().is_none_or(Stmt::completes_normally)
}
