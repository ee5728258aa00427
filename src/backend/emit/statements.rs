//! Emit statements.
//!
//! Statement shapes are shared by all C-family targets: blocks are always braced, `if` chains are
//! written as `} else if (...) {`, and `switch` case labels sit one level left of their bodies.
//! Targets that cannot switch on strings get the switch lowered to an `if` / `else if` chain.

use ember_core::lang::operators::Priority;

use super::super::target::ConstScope;
use super::super::writer::CodeWriter;
use super::{EmitError, Emitter};
use crate::tree::stmt::body_completes_normally;
use crate::tree::{BinaryOp, Expr, ExprKind, Stmt, Switch};

impl<'a> Emitter<'a> {
    /// Emit one statement.
    pub fn write_stmt(&self, out: &mut CodeWriter, stmt: &Stmt) -> Result<(), EmitError> {
        match stmt {
            Stmt::Expr(expr) => {
                let text = match &expr.kind {
                    ExprKind::VarDecl(decl) => self.render_var_decl(decl)?,
                    _ => self.render(expr, Priority::Statement)?,
                };
                out.linef(format_args!("{};", text));
            }
            Stmt::Block(stmts) => {
                out.open_block("");
                self.write_stmts(out, stmts)?;
                out.close_block();
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => self.write_if(out, cond, then_branch, else_branch.as_deref())?,
            Stmt::While { cond, body } => {
                out.open_block(&format!("while ({})", self.render(cond, Priority::Statement)?));
                self.write_block_contents(out, body)?;
                out.close_block();
            }
            Stmt::DoWhile { body, cond } => {
                out.open_block("do");
                self.write_block_contents(out, body)?;
                out.close_block_with(&format!("}} while ({});", self.render(cond, Priority::Statement)?));
            }
            Stmt::For {
                init,
                cond,
                advance,
                body,
            } => {
                let init = init.as_ref().map(|e| self.render(e, Priority::Statement)).transpose()?;
                let cond = cond.as_ref().map(|e| self.render(e, Priority::Statement)).transpose()?;
                let advance = advance.as_ref().map(|e| self.render(e, Priority::Statement)).transpose()?;
                let mut header = format!("for ({};", init.unwrap_or_default());
                if let Some(cond) = cond {
                    header.push(' ');
                    header.push_str(&cond);
                }
                header.push(';');
                if let Some(advance) = advance {
                    header.push(' ');
                    header.push_str(&advance);
                }
                header.push(')');
                out.open_block(&header);
                self.write_block_contents(out, body)?;
                out.close_block();
            }
            Stmt::Foreach {
                element,
                value,
                collection,
                body,
            } => {
                let header = self
                    .backend
                    .foreach_header(self, element, value.as_ref(), collection)
                    .map_err(|e| e.or_at(&self.location(collection.span)))?;
                out.open_block(&header);
                self.write_block_contents(out, body)?;
                out.close_block();
            }
            Stmt::Switch(switch) => {
                if switch.value.ty.is_string() && !self.backend.supports_string_switch() {
                    self.write_lowered_switch(out, switch)?;
                } else {
                    self.write_switch(out, switch)?;
                }
            }
            Stmt::Break => out.line("break;"),
            Stmt::Continue => out.line("continue;"),
            Stmt::Return(None) => out.line("return;"),
            Stmt::Return(Some(value)) => {
                let text = match self.current_method().and_then(|m| m.return_type.as_ref()) {
                    Some(ty) => self.coerce(ty, value, Priority::Statement)?,
                    None => self.render(value, Priority::Statement)?,
                };
                out.linef(format_args!("return {};", text));
            }
            Stmt::Throw(message) => {
                let line = self
                    .backend
                    .throw_statement(self, message)
                    .map_err(|e| e.or_at(&self.location(message.span)))?;
                out.line(&line);
            }
            Stmt::Native(text) => out.raw(text),
            Stmt::Const(decl) => {
                let line = self
                    .backend
                    .const_declaration(self, decl, ConstScope::Local)
                    .map_err(|e| e.or_at(&self.location(decl.value.span)))?;
                out.line(&line);
            }
        }
        Ok(())
    }

    pub fn write_stmts(&self, out: &mut CodeWriter, stmts: &[Stmt]) -> Result<(), EmitError> {
        for stmt in stmts {
            self.write_stmt(out, stmt)?;
        }
        Ok(())
    }

    /// Emit the inside of a braced body: a block's statements, or a single statement.
    pub fn write_block_contents(&self, out: &mut CodeWriter, body: &Stmt) -> Result<(), EmitError> {
        match body {
            Stmt::Block(stmts) => self.write_stmts(out, stmts),
            other => self.write_stmt(out, other),
        }
    }

    fn write_if(
        &self,
        out: &mut CodeWriter,
        cond: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Result<(), EmitError> {
        out.open_block(&format!("if ({})", self.render(cond, Priority::Statement)?));
        self.write_block_contents(out, then_branch)?;
        let mut next = else_branch;
        while let Some(branch) = next {
            out.dedent();
            match branch {
                Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                } => {
                    out.linef(format_args!("}} else if ({}) {{", self.render(cond, Priority::Statement)?));
                    out.indent();
                    self.write_block_contents(out, then_branch)?;
                    next = else_branch.as_deref();
                }
                other => {
                    out.line("} else {");
                    out.indent();
                    self.write_block_contents(out, other)?;
                    next = None;
                }
            }
        }
        out.close_block();
        Ok(())
    }

    fn write_switch(&self, out: &mut CodeWriter, switch: &Switch) -> Result<(), EmitError> {
        out.open_block(&format!("switch ({})", self.render(&switch.value, Priority::Statement)?));
        for case in &switch.cases {
            for value in &case.values {
                out.outdented_line(&format!("case {}:", self.render(value, Priority::Statement)?));
            }
            let exit = if case.fallthrough {
                Some(self.backend.fallthrough_statement())
            } else {
                body_completes_normally(&case.body).then_some("break;")
            };
            self.write_case_body(out, &case.body, exit)?;
        }
        if let Some(default) = &switch.default {
            out.outdented_line("default:");
            self.write_case_body(out, default, body_completes_normally(default).then_some("break;"))?;
        }
        out.close_block();
        Ok(())
    }

    /// Emit a case body followed by its exit statement.
    ///
    /// A body declaring locals gets its own braces; a later label must not jump past an initialization.
    fn write_case_body(&self, out: &mut CodeWriter, body: &[Stmt], exit: Option<&str>) -> Result<(), EmitError> {
        let scoped = body.iter().any(declares_local);
        if scoped {
            out.open_block("");
        }
        self.write_stmts(out, body)?;
        if let Some(exit) = exit {
            out.line(exit);
        }
        if scoped {
            out.close_block();
        }
        Ok(())
    }

    /// Lower a switch the target cannot express into an `if` / `else if` chain.
    ///
    /// The switch value is re-evaluated for every comparison.
    fn write_lowered_switch(&self, out: &mut CodeWriter, switch: &Switch) -> Result<(), EmitError> {
        let mut opened = false;
        for case in &switch.cases {
            if case.fallthrough {
                return Err(EmitError::unsupported(
                    "fallthrough in a lowered string switch",
                    self.location(switch.value.span),
                ));
            }
            let body = self.lowered_case_body(&case.body, &switch.value)?;
            let cond = case
                .values
                .iter()
                .map(|v| self.backend.equality(self, BinaryOp::Eq, &switch.value, v, Priority::CondOr))
                .collect::<Result<Vec<_>, _>>()?
                .join(" || ");
            if opened {
                out.dedent();
                out.linef(format_args!("}} else if ({}) {{", cond));
                out.indent();
            } else {
                out.open_block(&format!("if ({})", cond));
                opened = true;
            }
            self.write_stmts(out, &body)?;
        }
        if let Some(default) = &switch.default {
            let body = self.lowered_case_body(default, &switch.value)?;
            if opened {
                out.dedent();
                out.line("} else {");
                out.indent();
            } else {
                out.open_block("");
                opened = true;
            }
            self.write_stmts(out, &body)?;
        }
        if opened {
            out.close_block();
        }
        Ok(())
    }

    /// Strip the trailing `break` (also from a trailing block); any other `break` that would leave the
    /// switch cannot be lowered.
    fn lowered_case_body(&self, body: &[Stmt], value: &Expr) -> Result<Vec<Stmt>, EmitError> {
        let body = strip_trailing_break(body);
        if body.iter().any(breaks_enclosing_switch) {
            return Err(EmitError::unsupported(
                "non-trailing `break` in a lowered string switch",
                self.location(value.span),
            ));
        }
        Ok(body)
    }
}

fn strip_trailing_break(body: &[Stmt]) -> Vec<Stmt> {
    match body.split_last() {
        Some((Stmt::Break, rest)) => rest.to_vec(),
        Some((Stmt::Block(inner), rest)) => {
            let mut stripped = rest.to_vec();
            stripped.push(Stmt::Block(strip_trailing_break(inner)));
            stripped
        }
        _ => body.to_vec(),
    }
}

/// Whether `stmt` introduces a local into the enclosing scope.
fn declares_local(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Const(_) => true,
        Stmt::Expr(expr) => matches!(expr.kind, ExprKind::VarDecl(_)),
        _ => false,
    }
}

/// Whether `stmt` contains a `break` that targets the enclosing switch.
fn breaks_enclosing_switch(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Break => true,
        Stmt::Block(stmts) => stmts.iter().any(breaks_enclosing_switch),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => breaks_enclosing_switch(then_branch) || else_branch.as_deref().is_some_and(breaks_enclosing_switch),
        // Loops and nested switches capture their own `break`.
        _ => false,
    }
}
