//! Library feature scanner.
//!
//! Walks the whole tree once and records which library facilities the emitted code will need, so a
//! backend can write exactly the includes/imports the program uses. The scanner is a pure analyzer:
//! it does not render anything and does not depend on the backend.

use std::collections::HashSet;

use crate::tree::{
    ArrayShape, BinaryOp, Callee, Class, Expr, ExprKind, Intrinsic, Ownership, Program, PtrModifier, Stmt,
    StringShape, Type,
};

/// Library facilities a program uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub fixed_width_ints: bool,
    pub string_views: bool,
    pub string_storage: bool,
    pub shared_pointers: bool,
    pub lists: bool,
    pub maps: bool,
    pub storage_arrays: bool,
    pub throws: bool,
    pub resources: bool,
    /// Number-to-text conversion in string concatenation.
    pub number_formatting: bool,
    pub(crate) intrinsics: HashSet<Intrinsic>,
}

impl Usage {
    /// Scan every class, member, statement and expression of `program`.
    pub fn scan(program: &Program) -> Self {
        let mut usage = Usage {
            resources: !program.resources.is_empty(),
            ..Usage::default()
        };
        for class in &program.classes {
            usage.class(class);
        }
        usage
    }

    /// Whether the program calls `intrinsic` anywhere.
    pub fn uses(&self, intrinsic: Intrinsic) -> bool {
        self.intrinsics.contains(&intrinsic)
    }

    fn class(&mut self, class: &Class) {
        for c in &class.consts {
            self.constant(&c.ty, &c.value);
        }
        for field in &class.fields {
            self.ty(&field.ty);
            if let Some(value) = &field.value {
                self.expr(value);
            }
        }
        if let Some(body) = &class.constructor {
            self.stmts(body);
        }
        for method in &class.methods {
            if let Some(ty) = &method.return_type {
                self.ty(ty);
            }
            for param in &method.params {
                self.ty(&param.ty);
                if let Some(default) = &param.default {
                    self.expr(default);
                }
            }
            if let Some(body) = &method.body {
                self.stmt(body);
            }
        }
    }

    /// Constants of string type are emitted as views.
    fn constant(&mut self, ty: &Type, value: &Expr) {
        if ty.is_string() {
            self.string_views = true;
        }
        self.ty(ty);
        self.expr(value);
    }

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Null | Type::Bool | Type::Float | Type::Double | Type::Enum(_) => {}
            Type::Int(_) => self.fixed_width_ints = true,
            Type::String(StringShape::View) => self.string_views = true,
            Type::String(StringShape::Storage) => self.string_storage = true,
            Type::Array { elem, shape } => {
                match shape {
                    ArrayShape::Storage { .. } => self.storage_arrays = true,
                    ArrayShape::Pointer(PtrModifier::Shared) => self.shared_pointers = true,
                    ArrayShape::Pointer(_) => {}
                }
                self.ty(elem);
            }
            Type::Class { ownership, .. } => {
                if *ownership == Ownership::Ptr(PtrModifier::Shared) {
                    self.shared_pointers = true;
                }
            }
            Type::List(elem) => {
                self.lists = true;
                self.ty(elem);
            }
            Type::Map(key, value) => {
                self.maps = true;
                // Map keys of string type are stored as owning strings.
                if key.is_string() {
                    self.string_storage = true;
                }
                self.ty(key);
                self.ty(value);
            }
        }
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::Block(stmts) => self.stmts(stmts),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond);
                self.stmt(then_branch);
                if let Some(branch) = else_branch {
                    self.stmt(branch);
                }
            }
            Stmt::While { cond, body } | Stmt::DoWhile { body, cond } => {
                self.expr(cond);
                self.stmt(body);
            }
            Stmt::For {
                init,
                cond,
                advance,
                body,
            } => {
                for expr in [init, cond, advance].into_iter().flatten() {
                    self.expr(expr);
                }
                self.stmt(body);
            }
            Stmt::Foreach {
                element,
                value,
                collection,
                body,
            } => {
                self.ty(&element.ty);
                if let Some(value) = value {
                    self.ty(&value.ty);
                }
                self.expr(collection);
                self.stmt(body);
            }
            Stmt::Switch(switch) => {
                self.expr(&switch.value);
                for case in &switch.cases {
                    for value in &case.values {
                        self.expr(value);
                    }
                    self.stmts(&case.body);
                }
                if let Some(default) = &switch.default {
                    self.stmts(default);
                }
            }
            Stmt::Return(Some(expr)) => self.expr(expr),
            Stmt::Throw(message) => {
                self.throws = true;
                self.string_storage = true;
                self.expr(message);
            }
            Stmt::Const(decl) => self.constant(&decl.ty, &decl.value),
            Stmt::Break | Stmt::Continue | Stmt::Return(None) | Stmt::Native(_) => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        self.ty(&expr.ty);
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::This | ExprKind::Base | ExprKind::Resource(_) => {}
            ExprKind::Symbol { left, .. } => {
                if let Some(left) = left {
                    self.expr(left);
                }
            }
            ExprKind::Prefix { operand, .. } | ExprKind::Postfix { operand, .. } => self.expr(operand),
            ExprKind::Binary { op, left, right } => {
                if matches!(op, BinaryOp::Add | BinaryOp::AddAssign)
                    && expr.ty.is_string()
                    && !(left.ty.is_string() && right.ty.is_string())
                {
                    self.number_formatting = true;
                }
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Conditional {
                cond,
                on_true,
                on_false,
            } => {
                self.expr(cond);
                self.expr(on_true);
                self.expr(on_false);
            }
            ExprKind::Collection(items) => {
                for item in items {
                    self.expr(item);
                }
            }
            ExprKind::VarDecl(decl) => {
                self.ty(&decl.ty);
                if let Some(value) = &decl.value {
                    self.expr(value);
                }
            }
            ExprKind::Call {
                callee,
                receiver,
                args,
            } => {
                if let Callee::Intrinsic(intrinsic) = callee {
                    self.intrinsics.insert(*intrinsic);
                }
                if let Some(receiver) = receiver {
                    self.expr(receiver);
                }
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::New { length } => {
                if let Some(length) = length {
                    self.expr(length);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Field, IntKind, Method, MethodCallType};

    #[test]
    fn test_empty_program_uses_nothing() {
        assert_eq!(Usage::scan(&Program::new()), Usage::default());
    }

    #[test]
    fn test_field_types_are_scanned() {
        let mut program = Program::new();
        let mut class = Class::new("Inventory");
        class.fields.push(Field::new("count", Type::Int(IntKind::U8)));
        class.fields.push(Field::new("items", Type::list(Type::class_ptr("Item", PtrModifier::Shared))));
        class.fields.push(Field::new("index", Type::map(Type::string_view(), Type::i32())));
        program.classes.push(class);

        let usage = Usage::scan(&program);
        assert!(usage.fixed_width_ints);
        assert!(usage.lists);
        assert!(usage.shared_pointers);
        assert!(usage.maps);
        assert!(usage.string_storage);
        assert!(usage.string_views);
        assert!(!usage.storage_arrays);
    }

    #[test]
    fn test_intrinsics_and_throws_in_bodies_are_scanned() {
        let mut program = Program::new();
        let mut class = Class::new("Log");
        let call = Expr::call(
            Callee::Intrinsic(Intrinsic::ConsoleWriteLine),
            None,
            vec![Expr::string("hi")],
            Type::Null,
        );
        class.methods.push(
            Method::new("write", MethodCallType::Static)
                .with_body(vec![Stmt::Expr(call), Stmt::Throw(Expr::string("boom"))]),
        );
        program.classes.push(class);

        let usage = Usage::scan(&program);
        assert!(usage.uses(Intrinsic::ConsoleWriteLine));
        assert!(!usage.uses(Intrinsic::MathAbs));
        assert!(usage.throws);
    }

    #[test]
    fn test_resources_are_noted() {
        let mut program = Program::new();
        program.resources.insert("icon.png".to_string(), vec![1, 2, 3]);
        assert!(Usage::scan(&program).resources);
    }
}
