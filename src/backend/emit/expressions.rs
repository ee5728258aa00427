//! Precedence-aware expression printing.
//!
//! Every operator node has an intrinsic [`Priority`]. A node is parenthesized when the context it is
//! printed in (`parent`) binds tighter than the node itself. Operand contexts are chosen per
//! operator by [`operand_priorities`], which is where associativity is encoded: the operand on the
//! non-associating side is printed one level tighter, so `a - (b - c)` keeps its parentheses while
//! `a - b - c` needs none.
//!
//! On top of the level comparison a few exceptions are encoded explicitly:
//! - subtraction's right operand is printed at multiplicative level;
//! - a prefix `-`/`--` whose operand starts with `-` (and `+`/`++` with `+`) is separated by a space
//!   so the tokens do not glue (`- --x`, not `---x`);
//! - `&` inside `&&`/`||`, and `^` inside `|`, are always parenthesized.
//!
//! Negative numeric literals bind as prefix expressions.

use ember_core::lang::operators::{self, Priority};

use super::{EmitError, Emitter};
use crate::tree::{
    BinaryOp, Callee, Expr, ExprKind, Literal, MethodSig, PostfixOp, PrefixOp, Symbol, SymbolKind, Type, VarDecl,
};

/// Contexts the left and right operands of `op` are printed in.
pub fn operand_priorities(op: BinaryOp) -> (Priority, Priority) {
    match op {
        BinaryOp::CondOr => (Priority::CondOr, Priority::CondOr),
        BinaryOp::CondAnd => (Priority::CondAnd, Priority::CondAnd),
        BinaryOp::BitOr => (Priority::Or, Priority::Or),
        BinaryOp::BitXor => (Priority::Xor, Priority::Xor),
        BinaryOp::BitAnd => (Priority::And, Priority::And),
        // Equality and relational operators never chain.
        BinaryOp::Eq | BinaryOp::NotEq => (Priority::Rel, Priority::Rel),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => (Priority::Shift, Priority::Shift),
        BinaryOp::Shl | BinaryOp::Shr => (Priority::Shift, Priority::Add),
        BinaryOp::Add => (Priority::Add, Priority::Mul),
        BinaryOp::Sub => (Priority::Add, Priority::Mul),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (Priority::Mul, Priority::Unary),
        BinaryOp::Index => (Priority::Primary, Priority::Statement),
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
        | BinaryOp::XorAssign => (Priority::CondOr, Priority::Assign),
    }
}

/// Intrinsic binding strength of a binary operator.
pub fn binary_priority(op: BinaryOp) -> Priority {
    operators::info_for(op.operator_id()).priority
}

/// Mixed bitwise/logical nesting that is parenthesized regardless of levels.
fn forces_parens(op: BinaryOp, parent: Priority) -> bool {
    match op {
        BinaryOp::BitAnd => matches!(parent, Priority::CondAnd | Priority::CondOr),
        BinaryOp::BitXor => parent == Priority::Or,
        _ => false,
    }
}

impl<'a> Emitter<'a> {
    /// Render an expression in a context binding at `parent`.
    ///
    /// ## Errors
    /// - [`EmitError::Unsupported`] when the backend has no mapping for a node, type or intrinsic.
    /// - [`EmitError::UnrepresentableLiteral`] for literals without a target spelling.
    pub fn render(&self, expr: &Expr, parent: Priority) -> Result<String, EmitError> {
        let at = |e: EmitError| e.or_at(&self.location(expr.span));
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let text = self.backend.literal(self, expr, lit).map_err(at)?;
                let own = if is_negative_literal(lit) { Priority::Unary } else { Priority::Primary };
                Ok(self.wrap(text, own, parent))
            }
            ExprKind::Symbol { left, symbol } => self.render_symbol(left.as_deref(), symbol, expr),
            ExprKind::This => Ok(self.backend.this_keyword().to_string()),
            ExprKind::Base => Err(EmitError::unsupported(
                "`base` outside a method-call receiver",
                self.location(expr.span),
            )),
            ExprKind::Prefix { op, operand } => self.render_prefix(*op, operand, parent),
            ExprKind::Postfix { op, operand } => self.render_postfix(*op, operand),
            ExprKind::Binary { op, left, right } => self.render_binary(*op, left, right, expr, parent),
            ExprKind::Conditional {
                cond,
                on_true,
                on_false,
            } => {
                let text = format!(
                    "{} ? {} : {}",
                    self.render(cond, Priority::CondOr)?,
                    self.coerce(&expr.ty, on_true, Priority::Cond)?,
                    self.coerce(&expr.ty, on_false, Priority::Cond)?
                );
                Ok(self.wrap(text, Priority::Cond, parent))
            }
            ExprKind::Collection(items) => self.render_collection(items, expr),
            ExprKind::VarDecl(decl) => self.render_var_decl(decl),
            ExprKind::Call {
                callee,
                receiver,
                args,
            } => match callee {
                Callee::Method(sig) => self.render_method_call(sig, receiver.as_deref(), args),
                Callee::Intrinsic(intrinsic) => self
                    .backend
                    .intrinsic(self, expr, *intrinsic, receiver.as_deref(), args, parent)
                    .map_err(at),
            },
            ExprKind::New { length } => self.backend.new_object(self, expr, length.as_deref(), parent).map_err(at),
            ExprKind::Resource(name) => {
                if !self.program.resources.contains_key(name) {
                    return Err(EmitError::unsupported(
                        format!("reference to unknown resource `{}`", name),
                        self.location(expr.span),
                    ));
                }
                Ok(self.backend.resource_identifier(name))
            }
        }
    }

    /// Render a non-assignment binary operator as `left op right`.
    ///
    /// This is the base behavior of the equality, comparison and concatenation hooks.
    pub fn write_binary(&self, op: BinaryOp, left: &Expr, right: &Expr, parent: Priority) -> Result<String, EmitError> {
        let (left_at, right_at) = operand_priorities(op);
        let text = format!(
            "{} {} {}",
            self.render(left, left_at)?,
            operators::as_str(op.operator_id()),
            self.render(right, right_at)?
        );
        if forces_parens(op, parent) {
            return Ok(format!("({})", text));
        }
        Ok(self.wrap(text, binary_priority(op), parent))
    }

    /// Render plain or compound assignment; the right side of `=` is coerced to the target's type.
    pub fn write_assignment(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        let (left_at, right_at) = operand_priorities(op);
        let value = if op == BinaryOp::Assign {
            self.coerce(&left.ty, right, right_at)?
        } else {
            self.render(right, right_at)?
        };
        let text = format!(
            "{} {} {}",
            self.render(left, left_at)?,
            operators::as_str(op.operator_id()),
            value
        );
        Ok(self.wrap(text, Priority::Assign, parent))
    }

    /// Render a local declaration: `T name = value` or `T name` plus the default initializer.
    pub fn render_var_decl(&self, decl: &VarDecl) -> Result<String, EmitError> {
        let ty = self.type_name(&decl.ty, false)?;
        let name = self.ident(&decl.name);
        match &decl.value {
            Some(value) => Ok(format!("{} {} = {}", ty, name, self.coerce(&decl.ty, value, Priority::Assign)?)),
            None => Ok(format!("{} {}{}", ty, name, self.backend.default_initializer(&decl.ty))),
        }
    }

    /// Render call arguments, coercing each to its parameter type when known.
    pub fn render_args(&self, params: &[Type], args: &[Expr]) -> Result<String, EmitError> {
        let rendered = args
            .iter()
            .enumerate()
            .map(|(i, arg)| match params.get(i) {
                Some(ty) => self.coerce(ty, arg, Priority::Statement),
                None => self.render(arg, Priority::Statement),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join(", "))
    }

    fn render_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        expr: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        if op.is_assignment() {
            self.backend.assignment(self, op, left, right, parent)
        } else if op.is_equality() {
            self.backend.equality(self, op, left, right, parent)
        } else if op.is_comparison() {
            self.backend.comparison(self, op, left, right, parent)
        } else if op == BinaryOp::Add && expr.ty.is_string() {
            self.backend.concatenation(self, left, right, parent)
        } else if op == BinaryOp::Index {
            Ok(format!(
                "{}[{}]",
                self.render(left, Priority::Primary)?,
                self.render(right, Priority::Statement)?
            ))
        } else {
            self.write_binary(op, left, right, parent)
        }
    }

    fn render_prefix(&self, op: PrefixOp, operand: &Expr, parent: Priority) -> Result<String, EmitError> {
        let spelling = operators::as_str(op.operator_id());
        let inner = self.render(operand, Priority::Unary)?;
        let glue = match (spelling.chars().last(), inner.chars().next()) {
            (Some('-'), Some('-')) | (Some('+'), Some('+')) => " ",
            _ => "",
        };
        Ok(self.wrap(format!("{}{}{}", spelling, glue, inner), Priority::Unary, parent))
    }

    fn render_postfix(&self, op: PostfixOp, operand: &Expr) -> Result<String, EmitError> {
        Ok(format!(
            "{}{}",
            self.render(operand, Priority::Primary)?,
            operators::as_str(op.operator_id())
        ))
    }

    fn render_collection(&self, items: &[Expr], expr: &Expr) -> Result<String, EmitError> {
        let elem = match &expr.ty {
            Type::List(elem) | Type::Array { elem, .. } => Some(elem.as_ref()),
            _ => None,
        };
        let rendered = items
            .iter()
            .map(|item| match elem {
                Some(ty) => self.coerce(ty, item, Priority::Statement),
                None => self.render(item, Priority::Statement),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{{{}}}", rendered.join(", ")))
    }

    /// Qualify `name` with its class by scope resolution unless emitting inside that class.
    fn scoped(&self, class: &str, name: &str) -> String {
        if self.in_class(class) {
            name.to_string()
        } else {
            format!("{}{}{}", class, self.backend.static_access(), name)
        }
    }

    fn render_symbol(&self, left: Option<&Expr>, symbol: &Symbol, expr: &Expr) -> Result<String, EmitError> {
        let name = self.ident(&symbol.name);
        match &symbol.kind {
            SymbolKind::Local | SymbolKind::Param => Ok(name),
            SymbolKind::Field { class, is_static: true } => match left {
                None => Ok(self.scoped(class, &name)),
                Some(_) => Ok(format!("{}{}{}", class, self.backend.static_access(), name)),
            },
            SymbolKind::Field { is_static: false, .. } => match left {
                Some(receiver) => self.member(receiver, &name, expr),
                None => Ok(name),
            },
            // Constants are always reached by scope resolution; an instance qualifier is dropped.
            SymbolKind::Const { class: Some(class) } => match left {
                None => Ok(self.scoped(class, &name)),
                Some(_) => Ok(format!("{}{}{}", class, self.backend.static_access(), name)),
            },
            SymbolKind::Const { class: None } => Ok(name),
            SymbolKind::EnumConstant { enum_name } => {
                Ok(format!("{}{}{}", enum_name, self.backend.static_access(), name))
            }
        }
    }

    /// `receiver.name` / `receiver->name`.
    fn member(&self, receiver: &Expr, name: &str, expr: &Expr) -> Result<String, EmitError> {
        if matches!(receiver.kind, ExprKind::Base) {
            return Err(EmitError::unsupported(
                "field access through `base`",
                self.location(expr.span),
            ));
        }
        Ok(format!(
            "{}{}{}",
            self.render(receiver, Priority::Primary)?,
            self.backend.member_access(receiver),
            name
        ))
    }

    fn render_method_call(&self, sig: &MethodSig, receiver: Option<&Expr>, args: &[Expr]) -> Result<String, EmitError> {
        let args = self.render_args(&sig.params, args)?;
        let name = self.ident(&sig.name);
        let callee = match receiver {
            None if sig.is_static => self.scoped(&sig.class, &name),
            None => name,
            Some(_) if sig.is_static => format!("{}{}{}", sig.class, self.backend.static_access(), name),
            Some(Expr {
                kind: ExprKind::Base, ..
            }) => format!("{}{}{}", sig.class, self.backend.static_access(), name),
            Some(receiver) => format!(
                "{}{}{}",
                self.render(receiver, Priority::Primary)?,
                self.backend.member_access(receiver),
                name
            ),
        };
        Ok(format!("{}({})", callee, args))
    }
}

fn is_negative_literal(lit: &Literal) -> bool {
    match lit {
        Literal::Int(v) => *v < 0,
        Literal::Float(v) => v.is_sign_negative(),
        _ => false,
    }
}
