//! C++ type spellings, literals and conversions.

use super::CppBackend;
use crate::backend::conversions::Conversion;
use crate::backend::emit::{EmitError, Emitter};
use crate::tree::{
    ArrayShape, ExprKind, Expr, IntKind, Literal, Ownership, PrefixOp, PtrModifier, StringShape, Type,
};

fn int_name(kind: IntKind) -> &'static str {
    match kind {
        IntKind::I8 => "int8_t",
        IntKind::I16 => "int16_t",
        IntKind::I32 => "int32_t",
        IntKind::I64 => "int64_t",
        IntKind::U8 => "uint8_t",
        IntKind::U16 => "uint16_t",
        IntKind::U32 => "uint32_t",
        IntKind::U64 => "uint64_t",
    }
}

/// Initializer written after a declaration that has no explicit value.
///
/// Scalars, raw pointers, enums and inline arrays are value-initialized; class types, strings,
/// containers and shared handles have a default constructor that already does it.
pub(super) fn default_initializer(ty: &Type) -> &'static str {
    match ty {
        Type::Bool | Type::Int(_) | Type::Float | Type::Double | Type::Enum(_) => "{}",
        Type::Array {
            shape: ArrayShape::Storage { .. },
            ..
        } => "{}",
        Type::Array {
            shape: ArrayShape::Pointer(m),
            ..
        }
        | Type::Class {
            ownership: Ownership::Ptr(m),
            ..
        } if m.is_borrow() => "{}",
        _ => "",
    }
}

/// Integer kind after C-family promotion: arithmetic on operands narrower than 32 bits yields `int`.
fn effective_int_kind(expr: &Expr) -> Option<IntKind> {
    let Type::Int(kind) = expr.ty else {
        return None;
    };
    let promoted = match &expr.kind {
        ExprKind::Binary { op, .. } => op.is_arithmetic(),
        ExprKind::Prefix { op, .. } => matches!(op, PrefixOp::Neg | PrefixOp::Plus | PrefixOp::Complement),
        _ => false,
    };
    if promoted && kind.bits() < 32 {
        Some(IntKind::I32)
    } else {
        Some(kind)
    }
}

/// Whether every value of `source` fits in `target`.
fn int_widens(source: IntKind, target: IntKind) -> bool {
    if source.is_signed() == target.is_signed() {
        target.bits() >= source.bits()
    } else {
        !source.is_signed() && target.bits() > source.bits()
    }
}

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl CppBackend {
    pub(super) fn cpp_type(&self, ty: &Type, promote: bool) -> Result<String, EmitError> {
        Ok(match ty {
            Type::Null => return Err(EmitError::unsupported("`null` as a declared type", "")),
            Type::Bool => "bool".to_string(),
            Type::Int(kind) if promote && kind.bits() < 32 => "int".to_string(),
            Type::Int(kind) => int_name(*kind).to_string(),
            Type::Float => "float".to_string(),
            Type::Double => "double".to_string(),
            Type::String(StringShape::View) => "std::string_view".to_string(),
            Type::String(StringShape::Storage) => "std::string".to_string(),
            Type::Array { elem, shape } => {
                let elem = self.cpp_type(elem, false)?;
                match shape {
                    ArrayShape::Storage { len } => format!("std::array<{}, {}>", elem, len),
                    ArrayShape::Pointer(PtrModifier::ReadOnly) => format!("const {} *", elem),
                    ArrayShape::Pointer(PtrModifier::Mutable) => format!("{} *", elem),
                    ArrayShape::Pointer(PtrModifier::Shared) => format!("std::shared_ptr<{}[]>", elem),
                }
            }
            Type::Class { name, ownership } => match ownership {
                Ownership::Value => name.clone(),
                Ownership::Ptr(PtrModifier::ReadOnly) => format!("const {} *", name),
                Ownership::Ptr(PtrModifier::Mutable) => format!("{} *", name),
                Ownership::Ptr(PtrModifier::Shared) => format!("std::shared_ptr<{}>", name),
            },
            Type::Enum(name) => name.clone(),
            Type::List(elem) => format!("std::vector<{}>", self.cpp_type(elem, false)?),
            Type::Map(key, value) => {
                // Keys must own their text: a view key would dangle once the source buffer goes.
                let key = if key.is_string() {
                    "std::string".to_string()
                } else {
                    self.cpp_type(key, false)?
                };
                format!("std::map<{}, {}>", key, self.cpp_type(value, false)?)
            }
        })
    }

    pub(super) fn cpp_literal(&self, ty: &Type, lit: &Literal) -> Result<String, EmitError> {
        Ok(match lit {
            Literal::Null => "nullptr".to_string(),
            Literal::Bool(b) => b.to_string(),
            // `-9223372036854775808` is unary minus applied to an out-of-range literal.
            Literal::Int(i64::MIN) => "INT64_MIN".to_string(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) if !v.is_finite() => {
                return Err(EmitError::UnrepresentableLiteral {
                    literal: v.to_string(),
                    location: String::new(),
                });
            }
            Literal::Float(v) if *ty == Type::Float => format!("{:?}f", v),
            Literal::Float(v) => format!("{:?}", v),
            Literal::String(s) => escape_string(s),
        })
    }

    pub(super) fn cpp_conversion(&self, cx: &Emitter<'_>, target: &Type, expr: &Expr) -> Result<Conversion, EmitError> {
        let source = &expr.ty;
        if source == target || *source == Type::Null {
            return Ok(Conversion::None);
        }
        let conversion = match (target, source) {
            (Type::Int(to), Type::Int(_)) => match effective_int_kind(expr) {
                _ if expr.is_literal() => Conversion::None,
                Some(from) if int_widens(from, *to) => Conversion::None,
                _ => Conversion::Call(format!("static_cast<{}>", int_name(*to))),
            },
            (Type::Int(_) | Type::Enum(_), Type::Float | Type::Double | Type::Enum(_))
            | (Type::Enum(_), Type::Int(_)) => Conversion::Call(format!("static_cast<{}>", cx.type_name(target, false)?)),
            (Type::Float, Type::Double) if !expr.is_literal() => Conversion::Call("static_cast<float>".to_string()),

            (Type::String(StringShape::Storage), Type::String(StringShape::View)) if !expr.is_literal() => {
                Conversion::Call("std::string".to_string())
            }

            (
                Type::Class {
                    ownership: Ownership::Ptr(to),
                    ..
                },
                Type::Class { ownership: from, .. },
            ) => match (to, from) {
                (to, Ownership::Value) if to.is_borrow() => Conversion::Prefix("&"),
                (to, Ownership::Ptr(PtrModifier::Shared)) if to.is_borrow() => Conversion::Suffix(".get()"),
                (PtrModifier::ReadOnly, Ownership::Ptr(PtrModifier::Mutable)) => Conversion::None,
                (PtrModifier::Mutable, Ownership::Ptr(PtrModifier::Mutable)) => Conversion::None,
                (PtrModifier::Shared, Ownership::Ptr(PtrModifier::Shared)) => Conversion::None,
                (to, from) => {
                    return Err(EmitError::unsupported(
                        format!("conversion from {:?} to {:?} class reference", from, to),
                        "",
                    ));
                }
            },
            (
                Type::Class {
                    ownership: Ownership::Value,
                    ..
                },
                Type::Class {
                    ownership: Ownership::Ptr(_),
                    ..
                },
            ) => Conversion::Prefix("*"),

            (
                Type::Array {
                    shape: ArrayShape::Pointer(to),
                    ..
                },
                Type::Array { shape: from, .. },
            ) => match (to, from) {
                (to, ArrayShape::Storage { .. }) if to.is_borrow() => Conversion::Suffix(".data()"),
                (to, ArrayShape::Pointer(PtrModifier::Shared)) if to.is_borrow() => Conversion::Suffix(".get()"),
                (PtrModifier::ReadOnly, ArrayShape::Pointer(PtrModifier::Mutable)) => Conversion::None,
                (to, ArrayShape::Pointer(from)) if to == from => Conversion::None,
                (to, from) => {
                    return Err(EmitError::unsupported(
                        format!("conversion from {:?} array to {:?} array reference", from, to),
                        "",
                    ));
                }
            },
            _ => Conversion::None,
        };
        Ok(conversion)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::target::Backend;
    use crate::tree::{BinaryOp, Program};

    fn convert(target: &Type, expr: &Expr) -> Result<Conversion, EmitError> {
        let program = Program::new();
        let cx = Emitter::new(&CppBackend, &program);
        CppBackend.conversion(&cx, target, expr)
    }

    #[test]
    fn test_int_spellings_and_promotion() {
        let b = CppBackend;
        assert_eq!(b.cpp_type(&Type::Int(IntKind::U8), false).unwrap(), "uint8_t");
        assert_eq!(b.cpp_type(&Type::Int(IntKind::U8), true).unwrap(), "int");
        assert_eq!(b.cpp_type(&Type::Int(IntKind::I64), true).unwrap(), "int64_t");
    }

    #[test]
    fn test_ownership_spellings() {
        let b = CppBackend;
        assert_eq!(b.cpp_type(&Type::class_value("Foo"), false).unwrap(), "Foo");
        assert_eq!(
            b.cpp_type(&Type::class_ptr("Foo", PtrModifier::ReadOnly), false).unwrap(),
            "const Foo *"
        );
        assert_eq!(
            b.cpp_type(&Type::class_ptr("Foo", PtrModifier::Shared), false).unwrap(),
            "std::shared_ptr<Foo>"
        );
        assert_eq!(
            b.cpp_type(&Type::array_ptr(Type::Int(IntKind::U8), PtrModifier::Shared), false)
                .unwrap(),
            "std::shared_ptr<uint8_t[]>"
        );
        assert_eq!(
            b.cpp_type(&Type::array_storage(Type::Bool, 3), false).unwrap(),
            "std::array<bool, 3>"
        );
    }

    #[test]
    fn test_map_string_keys_are_owning() {
        let ty = Type::map(Type::string_view(), Type::list(Type::i32()));
        assert_eq!(
            CppBackend.cpp_type(&ty, false).unwrap(),
            "std::map<std::string, std::vector<int32_t>>"
        );
    }

    #[test]
    fn test_null_type_is_unsupported() {
        assert!(matches!(
            CppBackend.cpp_type(&Type::Null, false),
            Err(EmitError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_literals() {
        let b = CppBackend;
        assert_eq!(b.cpp_literal(&Type::Null, &Literal::Null).unwrap(), "nullptr");
        assert_eq!(b.cpp_literal(&Type::i32(), &Literal::Int(-3)).unwrap(), "-3");
        assert_eq!(
            b.cpp_literal(&Type::Int(IntKind::I64), &Literal::Int(i64::MIN)).unwrap(),
            "INT64_MIN"
        );
        assert_eq!(b.cpp_literal(&Type::Float, &Literal::Float(0.5)).unwrap(), "0.5f");
        assert_eq!(b.cpp_literal(&Type::Double, &Literal::Float(2.0)).unwrap(), "2.0");
        assert_eq!(
            b.cpp_literal(&Type::string_view(), &Literal::String("a\"b\\\n\u{1}".to_string()))
                .unwrap(),
            "\"a\\\"b\\\\\\n\\001\""
        );
    }

    #[test]
    fn test_non_finite_float_is_unrepresentable() {
        let err = CppBackend.cpp_literal(&Type::Double, &Literal::Float(f64::NAN)).unwrap_err();
        assert!(matches!(err, EmitError::UnrepresentableLiteral { .. }));
    }

    #[test]
    fn test_same_type_needs_no_conversion() {
        let e = Expr::local("p", Type::class_ptr("Foo", PtrModifier::Shared));
        assert_eq!(convert(&e.ty.clone(), &e).unwrap(), Conversion::None);
    }

    #[test]
    fn test_narrowing_int_is_cast() {
        let wide = Expr::local("n", Type::i32());
        assert_eq!(
            convert(&Type::Int(IntKind::U8), &wide).unwrap(),
            Conversion::Call("static_cast<uint8_t>".to_string())
        );
        assert_eq!(convert(&Type::Int(IntKind::I64), &wide).unwrap(), Conversion::None);
        assert_eq!(
            convert(&Type::Int(IntKind::U8), &Expr::int(7, Type::i32())).unwrap(),
            Conversion::None
        );
    }

    #[test]
    fn test_promoted_arithmetic_is_cast_back() {
        let a = Expr::local("a", Type::Int(IntKind::U8));
        let b = Expr::local("b", Type::Int(IntKind::U8));
        let sum = Expr::binary(BinaryOp::Add, a, b, Type::Int(IntKind::U16));
        assert_eq!(
            convert(&Type::Int(IntKind::U16), &Expr::local("x", Type::Int(IntKind::U8))).unwrap(),
            Conversion::None
        );
        assert_eq!(
            convert(&Type::Int(IntKind::U32), &sum).unwrap(),
            Conversion::Call("static_cast<uint32_t>".to_string())
        );
    }

    #[test]
    fn test_ownership_conversions() {
        let value = Expr::local("v", Type::class_value("Foo"));
        let shared = Expr::local("s", Type::class_ptr("Foo", PtrModifier::Shared));
        let borrow = Type::class_ptr("Foo", PtrModifier::ReadOnly);
        assert_eq!(convert(&borrow, &value).unwrap(), Conversion::Prefix("&"));
        assert_eq!(convert(&borrow, &shared).unwrap(), Conversion::Suffix(".get()"));
        assert_eq!(convert(&Type::class_value("Foo"), &shared).unwrap(), Conversion::Prefix("*"));

        let mutable = Expr::local("m", Type::class_ptr("Foo", PtrModifier::Mutable));
        assert_eq!(convert(&borrow, &mutable).unwrap(), Conversion::None);
        assert!(convert(&Type::class_ptr("Foo", PtrModifier::Shared), &mutable).is_err());
    }

    #[test]
    fn test_array_conversions() {
        let storage = Expr::local("buf", Type::array_storage(Type::Int(IntKind::U8), 4));
        let target = Type::array_ptr(Type::Int(IntKind::U8), PtrModifier::ReadOnly);
        assert_eq!(convert(&target, &storage).unwrap(), Conversion::Suffix(".data()"));
    }

    #[test]
    fn test_string_materialization() {
        let view = Expr::local("name", Type::string_view());
        assert_eq!(
            convert(&Type::string_storage(), &view).unwrap(),
            Conversion::Call("std::string".to_string())
        );
        assert_eq!(convert(&Type::string_storage(), &Expr::string("x")).unwrap(), Conversion::None);
        let storage = Expr::local("s", Type::string_storage());
        assert_eq!(convert(&Type::string_view(), &storage).unwrap(), Conversion::None);
    }

    #[test]
    fn test_default_initializers() {
        assert_eq!(default_initializer(&Type::i32()), "{}");
        assert_eq!(default_initializer(&Type::class_ptr("A", PtrModifier::Mutable)), "{}");
        assert_eq!(default_initializer(&Type::class_ptr("A", PtrModifier::Shared)), "");
        assert_eq!(default_initializer(&Type::string_storage()), "");
        assert_eq!(default_initializer(&Type::class_value("A")), "");
    }
}
