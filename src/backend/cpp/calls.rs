//! C++ rendering of intrinsic calls, construction, string operators and range loops.

use ember_core::lang::operators::{self, Priority};

use super::CppBackend;
use crate::backend::emit::{EmitError, Emitter, binary_priority, operand_priorities};
use crate::tree::{
    ArrayShape, BinaryOp, Expr, Intrinsic, Ownership, PtrModifier, StringShape, Type, VarDecl,
};

impl CppBackend {
    fn receiver<'e>(
        &self,
        cx: &Emitter<'_>,
        intrinsic: Intrinsic,
        receiver: Option<&'e Expr>,
        expr: &Expr,
    ) -> Result<&'e Expr, EmitError> {
        receiver.ok_or_else(|| {
            EmitError::unsupported(format!("{:?} without a receiver", intrinsic), cx.location(expr.span))
        })
    }

    fn arity(
        &self,
        cx: &Emitter<'_>,
        intrinsic: Intrinsic,
        args: &[Expr],
        expected: usize,
        expr: &Expr,
    ) -> Result<(), EmitError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(EmitError::unsupported(
                format!("{:?} with {} arguments (expected {})", intrinsic, args.len(), expected),
                cx.location(expr.span),
            ))
        }
    }

    /// Receiver text for a string method; literals become views so the method exists.
    fn string_receiver(&self, cx: &Emitter<'_>, receiver: &Expr) -> Result<String, EmitError> {
        if receiver.is_literal() {
            Ok(format!("std::string_view({})", cx.render(receiver, Priority::Statement)?))
        } else {
            cx.render(receiver, Priority::Primary)
        }
    }

    pub(super) fn cpp_intrinsic(
        &self,
        cx: &Emitter<'_>,
        expr: &Expr,
        intrinsic: Intrinsic,
        receiver: Option<&Expr>,
        args: &[Expr],
        parent: Priority,
    ) -> Result<String, EmitError> {
        let arg = |i: usize| -> Result<String, EmitError> {
            match args.get(i) {
                Some(a) => cx.render(a, Priority::Statement),
                None => Ok(String::new()),
            }
        };
        match intrinsic {
            Intrinsic::StringContains => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                let text = format!("{}.find({}) != std::string::npos", self.string_receiver(cx, r)?, arg(0)?);
                Ok(cx.wrap(text, Priority::Equality, parent))
            }
            Intrinsic::StringStartsWith | Intrinsic::StringEndsWith => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                let method = if intrinsic == Intrinsic::StringStartsWith {
                    "starts_with"
                } else {
                    "ends_with"
                };
                Ok(format!("{}.{}({})", self.string_receiver(cx, r)?, method, arg(0)?))
            }
            Intrinsic::StringSubstring => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                if args.len() == 1 {
                    Ok(format!("{}.substr({})", self.string_receiver(cx, r)?, arg(0)?))
                } else {
                    self.arity(cx, intrinsic, args, 2, expr)?;
                    Ok(format!("{}.substr({}, {})", self.string_receiver(cx, r)?, arg(0)?, arg(1)?))
                }
            }
            Intrinsic::StringLength | Intrinsic::ListCount => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 0, expr)?;
                let method = if intrinsic == Intrinsic::StringLength { "length" } else { "size" };
                Ok(format!(
                    "static_cast<{}>({}.{}())",
                    cx.type_name(&expr.ty, false)?,
                    self.string_receiver(cx, r)?,
                    method
                ))
            }
            Intrinsic::ListAdd => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                Ok(format!("{}.push_back({})", cx.render(r, Priority::Primary)?, self.element(cx, r, &args[0])?))
            }
            Intrinsic::ListInsert => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 2, expr)?;
                let list = cx.render(r, Priority::Primary)?;
                Ok(format!(
                    "{0}.insert({0}.begin() + {1}, {2})",
                    list,
                    cx.render(&args[0], Priority::Mul)?,
                    self.element(cx, r, &args[1])?
                ))
            }
            Intrinsic::ListRemoveAt => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                let list = cx.render(r, Priority::Primary)?;
                Ok(format!("{0}.erase({0}.begin() + {1})", list, cx.render(&args[0], Priority::Mul)?))
            }
            Intrinsic::ListClear | Intrinsic::MapClear => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 0, expr)?;
                Ok(format!("{}.clear()", cx.render(r, Priority::Primary)?))
            }
            Intrinsic::ListContains => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                let list = cx.render(r, Priority::Primary)?;
                let text = format!(
                    "std::find({0}.begin(), {0}.end(), {1}) != {0}.end()",
                    list,
                    self.element(cx, r, &args[0])?
                );
                Ok(cx.wrap(text, Priority::Equality, parent))
            }
            Intrinsic::MapContainsKey | Intrinsic::MapRemove => {
                let r = self.receiver(cx, intrinsic, receiver, expr)?;
                self.arity(cx, intrinsic, args, 1, expr)?;
                let method = if intrinsic == Intrinsic::MapContainsKey { "contains" } else { "erase" };
                Ok(format!("{}.{}({})", cx.render(r, Priority::Primary)?, method, arg(0)?))
            }
            Intrinsic::MathMin | Intrinsic::MathMax => {
                self.arity(cx, intrinsic, args, 2, expr)?;
                let function = if intrinsic == Intrinsic::MathMin { "std::min" } else { "std::max" };
                Ok(format!(
                    "{}<{}>({}, {})",
                    function,
                    cx.type_name(&expr.ty, false)?,
                    cx.coerce(&expr.ty, &args[0], Priority::Statement)?,
                    cx.coerce(&expr.ty, &args[1], Priority::Statement)?
                ))
            }
            Intrinsic::MathAbs => {
                self.arity(cx, intrinsic, args, 1, expr)?;
                Ok(format!("std::abs({})", arg(0)?))
            }
            Intrinsic::ConsoleWriteLine => {
                let text = match args {
                    [] => "std::cout << '\\n'".to_string(),
                    [value] => format!("std::cout << {} << '\\n'", self.printable(cx, value)?),
                    _ => {
                        return Err(EmitError::unsupported(
                            format!("{:?} with {} arguments", intrinsic, args.len()),
                            cx.location(expr.span),
                        ));
                    }
                };
                Ok(cx.wrap(text, Priority::Shift, parent))
            }
        }
    }

    /// A list element argument, coerced to the list's element type.
    fn element(&self, cx: &Emitter<'_>, list: &Expr, value: &Expr) -> Result<String, EmitError> {
        match &list.ty {
            Type::List(elem) => cx.coerce(elem, value, Priority::Statement),
            _ => cx.render(value, Priority::Statement),
        }
    }

    /// Stream operand; 8-bit integers would print as characters, so narrow ints are widened.
    fn printable(&self, cx: &Emitter<'_>, value: &Expr) -> Result<String, EmitError> {
        match value.ty {
            Type::Int(kind) if kind.bits() < 32 => Ok(format!(
                "static_cast<{}>({})",
                cx.type_name(&value.ty, true)?,
                cx.render(value, Priority::Statement)?
            )),
            _ => cx.render(value, Priority::Add),
        }
    }

    pub(super) fn cpp_new(&self, cx: &Emitter<'_>, expr: &Expr, length: Option<&Expr>) -> Result<String, EmitError> {
        match &expr.ty {
            Type::Class {
                name,
                ownership: Ownership::Ptr(PtrModifier::Shared),
            } => Ok(format!("std::make_shared<{}>()", name)),
            Type::Class {
                name,
                ownership: Ownership::Value,
            } => Ok(format!("{}()", name)),
            Type::Array {
                elem,
                shape: ArrayShape::Pointer(PtrModifier::Shared),
            } => match length {
                Some(length) => Ok(format!(
                    "std::make_shared<{}[]>({})",
                    cx.type_name(elem, false)?,
                    cx.render(length, Priority::Statement)?
                )),
                None => Err(EmitError::unsupported(
                    "shared array construction without a length",
                    cx.location(expr.span),
                )),
            },
            Type::Array {
                shape: ArrayShape::Storage { .. },
                ..
            } => Ok(format!("{}{{}}", cx.type_name(&expr.ty, false)?)),
            Type::List(_) | Type::Map(..) => Ok(format!("{}()", cx.type_name(&expr.ty, false)?)),
            other => Err(EmitError::unsupported(
                format!("construction of `{}`", other),
                cx.location(expr.span),
            )),
        }
    }

    /// `==`/`!=`/`<`/... with a string literal on the left: the literal becomes a view so an
    /// overloaded operator is found.
    pub(super) fn string_comparison(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        if !(left.is_literal() && left.ty.is_string()) {
            return cx.write_binary(op, left, right, parent);
        }
        let (_, right_at) = operand_priorities(op);
        let text = format!(
            "std::string_view({}) {} {}",
            cx.render(left, Priority::Statement)?,
            operators::as_str(op.operator_id()),
            cx.render(right, right_at)?
        );
        Ok(cx.wrap(text, binary_priority(op), parent))
    }

    /// `+=` appending a number to a string goes through `std::to_string`.
    pub(super) fn cpp_assignment(
        &self,
        cx: &Emitter<'_>,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        if op == BinaryOp::AddAssign && left.ty.is_string() && !right.ty.is_string() {
            let text = format!(
                "{} += std::to_string({})",
                cx.render(left, Priority::CondOr)?,
                cx.render(right, Priority::Statement)?
            );
            return Ok(cx.wrap(text, Priority::Assign, parent));
        }
        cx.write_assignment(op, left, right, parent)
    }

    /// String `+`: the left operand must be an owning string for `operator+` to apply; numbers are
    /// formatted with `std::to_string`; a non-literal view on the right is materialized.
    pub(super) fn cpp_concatenation(
        &self,
        cx: &Emitter<'_>,
        left: &Expr,
        right: &Expr,
        parent: Priority,
    ) -> Result<String, EmitError> {
        let (left_at, right_at) = operand_priorities(BinaryOp::Add);
        let left_text = match left.ty {
            Type::String(StringShape::Storage) => cx.render(left, left_at)?,
            Type::String(StringShape::View) => format!("std::string({})", cx.render(left, Priority::Statement)?),
            _ => format!("std::to_string({})", cx.render(left, Priority::Statement)?),
        };
        let right_text = match right.ty {
            Type::String(StringShape::View) if !right.is_literal() => {
                format!("std::string({})", cx.render(right, Priority::Statement)?)
            }
            Type::String(_) => cx.render(right, right_at)?,
            _ => format!("std::to_string({})", cx.render(right, Priority::Statement)?),
        };
        Ok(cx.wrap(format!("{} + {}", left_text, right_text), Priority::Add, parent))
    }

    pub(super) fn cpp_foreach_header(
        &self,
        cx: &Emitter<'_>,
        element: &VarDecl,
        value: Option<&VarDecl>,
        collection: &Expr,
    ) -> Result<String, EmitError> {
        if let Type::Array {
            shape: ArrayShape::Pointer(_),
            ..
        } = collection.ty
        {
            return Err(EmitError::unsupported(
                "foreach over an array pointer (length unknown)",
                cx.location(collection.span),
            ));
        }
        let range = cx.render(collection, Priority::Statement)?;
        if let Some(value) = value {
            return Ok(format!(
                "for (const auto &[{}, {}] : {})",
                cx.ident(&element.name),
                cx.ident(&value.name),
                range
            ));
        }
        let by_value = matches!(
            element.ty,
            Type::Bool
                | Type::Int(_)
                | Type::Float
                | Type::Double
                | Type::Enum(_)
                | Type::String(StringShape::View)
                | Type::Class {
                    ownership: Ownership::Ptr(PtrModifier::ReadOnly | PtrModifier::Mutable),
                    ..
                }
        );
        if by_value {
            Ok(format!(
                "for ({} {} : {})",
                cx.type_name(&element.ty, false)?,
                cx.ident(&element.name),
                range
            ))
        } else {
            Ok(format!("for (auto &{} : {})", cx.ident(&element.name), range))
        }
    }
}
