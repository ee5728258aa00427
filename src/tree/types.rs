//! Type nodes of the typed tree.
//!
//! Types are a closed, tag-identified variant set. The code generator matches on type *shape*;
//! identity of interned built-in types is a front-end concern and never relied on here.

use std::fmt;

/// Fixed-width integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntKind {
    pub fn bits(self) -> u32 {
        match self {
            IntKind::I8 | IntKind::U8 => 8,
            IntKind::I16 | IntKind::U16 => 16,
            IntKind::I32 | IntKind::U32 => 32,
            IntKind::I64 | IntKind::U64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }
}

/// Shape of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringShape {
    /// Non-owning, cheaply constructed from an existing buffer.
    View,
    /// Owning and growable.
    Storage,
}

/// The three ownership modifiers a pointer-like type can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PtrModifier {
    /// Read-only borrow.
    ReadOnly,
    /// Mutable borrow.
    Mutable,
    /// Shared-owning, reference-counted handle.
    Shared,
}

impl PtrModifier {
    pub fn is_borrow(self) -> bool {
        matches!(self, PtrModifier::ReadOnly | PtrModifier::Mutable)
    }
}

/// Ownership of a class-typed value: by value (storage) or through one of the pointer modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Embedded by value, lifetime tied to the declaring scope.
    Value,
    Ptr(PtrModifier),
}

/// Shape of an array type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayShape {
    /// Fixed length, owned inline.
    Storage { len: usize },
    Pointer(PtrModifier),
}

/// A resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Type of the `null` literal.
    Null,
    Bool,
    Int(IntKind),
    Float,
    Double,
    String(StringShape),
    Array { elem: Box<Type>, shape: ArrayShape },
    Class { name: String, ownership: Ownership },
    Enum(String),
    /// Generic growable list.
    List(Box<Type>),
    /// Generic ordered map.
    Map(Box<Type>, Box<Type>),
}

impl Type {
    pub fn i32() -> Self {
        Type::Int(IntKind::I32)
    }

    pub fn string_view() -> Self {
        Type::String(StringShape::View)
    }

    pub fn string_storage() -> Self {
        Type::String(StringShape::Storage)
    }

    pub fn class_value(name: &str) -> Self {
        Type::Class {
            name: name.to_string(),
            ownership: Ownership::Value,
        }
    }

    pub fn class_ptr(name: &str, modifier: PtrModifier) -> Self {
        Type::Class {
            name: name.to_string(),
            ownership: Ownership::Ptr(modifier),
        }
    }

    pub fn array_storage(elem: Type, len: usize) -> Self {
        Type::Array {
            elem: Box::new(elem),
            shape: ArrayShape::Storage { len },
        }
    }

    pub fn array_ptr(elem: Type, modifier: PtrModifier) -> Self {
        Type::Array {
            elem: Box::new(elem),
            shape: ArrayShape::Pointer(modifier),
        }
    }

    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Float | Type::Double)
    }

    /// The pointer modifier of a class or array pointer, if any.
    pub fn ptr_modifier(&self) -> Option<PtrModifier> {
        match self {
            Type::Class {
                ownership: Ownership::Ptr(m),
                ..
            } => Some(*m),
            Type::Array {
                shape: ArrayShape::Pointer(m),
                ..
            } => Some(*m),
            _ => None,
        }
    }

    /// The class a by-value (storage) type embeds, looking through storage arrays.
    ///
    /// This is the structural dependency edge used for class ordering.
    pub fn embedded_class(&self) -> Option<&str> {
        match self {
            Type::Class {
                name,
                ownership: Ownership::Value,
            } => Some(name),
            Type::Array {
                elem,
                shape: ArrayShape::Storage { .. },
            } => elem.embedded_class(),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Null => write!(f, "null"),
            Type::Bool => write!(f, "bool"),
            Type::Int(kind) => write!(f, "{}{}", if kind.is_signed() { "i" } else { "u" }, kind.bits()),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::String(StringShape::View) => write!(f, "string"),
            Type::String(StringShape::Storage) => write!(f, "string()"),
            Type::Array { elem, shape } => match shape {
                ArrayShape::Storage { len } => write!(f, "{}[{}]", elem, len),
                ArrayShape::Pointer(m) => write!(f, "{}[]{}", elem, modifier_suffix(*m)),
            },
            Type::Class { name, ownership } => match ownership {
                Ownership::Value => write!(f, "{}()", name),
                Ownership::Ptr(m) => write!(f, "{}{}", name, modifier_suffix(*m)),
            },
            Type::Enum(name) => write!(f, "{}", name),
            Type::List(elem) => write!(f, "List<{}>", elem),
            Type::Map(k, v) => write!(f, "SortedDictionary<{}, {}>", k, v),
        }
    }
}

fn modifier_suffix(m: PtrModifier) -> &'static str {
    match m {
        PtrModifier::ReadOnly => "",
        PtrModifier::Mutable => "!",
        PtrModifier::Shared => "#",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_kind_width_and_sign() {
        assert_eq!(IntKind::U8.bits(), 8);
        assert!(!IntKind::U8.is_signed());
        assert_eq!(IntKind::I64.bits(), 64);
        assert!(IntKind::I64.is_signed());
    }

    #[test]
    fn test_ptr_modifier_of_class_and_array() {
        assert_eq!(
            Type::class_ptr("Foo", PtrModifier::Shared).ptr_modifier(),
            Some(PtrModifier::Shared)
        );
        assert_eq!(
            Type::array_ptr(Type::i32(), PtrModifier::Mutable).ptr_modifier(),
            Some(PtrModifier::Mutable)
        );
        assert_eq!(Type::class_value("Foo").ptr_modifier(), None);
    }

    #[test]
    fn test_embedded_class_looks_through_storage_arrays() {
        assert_eq!(Type::class_value("Cell").embedded_class(), Some("Cell"));
        assert_eq!(
            Type::array_storage(Type::class_value("Cell"), 4).embedded_class(),
            Some("Cell")
        );
        assert_eq!(Type::class_ptr("Cell", PtrModifier::Shared).embedded_class(), None);
        assert_eq!(
            Type::array_ptr(Type::class_value("Cell"), PtrModifier::ReadOnly).embedded_class(),
            None
        );
    }

    #[test]
    fn test_display_uses_source_notation() {
        assert_eq!(Type::class_ptr("Foo", PtrModifier::Mutable).to_string(), "Foo!");
        assert_eq!(Type::array_storage(Type::Int(IntKind::U8), 16).to_string(), "u8[16]");
        assert_eq!(Type::string_storage().to_string(), "string()");
    }
}
