//! Declaration nodes: classes, their members, and enums.

use super::expr::Expr;
use super::stmt::Stmt;
use super::types::Type;
use super::Span;

/// Member visibility. Every member belongs to exactly one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
}

impl Visibility {
    /// Emission order of the visibility groups.
    pub const ORDER: [Visibility; 4] = [
        Visibility::Public,
        Visibility::Protected,
        Visibility::Internal,
        Visibility::Private,
    ];
}

/// Call-type of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassCallType {
    #[default]
    Normal,
    /// Only static members; cannot be instantiated.
    Static,
    Abstract,
    Sealed,
}

/// Call-type of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodCallType {
    Static,
    /// Non-virtual, implicitly final.
    #[default]
    Normal,
    Abstract,
    Virtual,
    Override,
    /// Override that cannot be overridden further.
    Sealed,
}

impl MethodCallType {
    pub fn is_virtual(self) -> bool {
        matches!(self, MethodCallType::Abstract | MethodCallType::Virtual)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Type,
    pub value: Expr,
    pub visibility: Visibility,
}

impl ConstDecl {
    pub fn new(name: &str, ty: Type, value: Expr) -> Self {
        Self {
            name: name.to_string(),
            ty,
            value,
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub value: Option<Expr>,
    pub visibility: Visibility,
    /// Class-level storage (always true for members of a static class).
    pub is_static: bool,
}

impl Field {
    /// A public field without an initializer.
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
            value: None,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_value(mut self, value: Expr) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    /// `None` means the method returns no value.
    pub return_type: Option<Type>,
    pub call_type: MethodCallType,
    /// Whether the method may mutate its receiver.
    pub mutates: bool,
    pub params: Vec<Param>,
    /// `None` for abstract methods.
    pub body: Option<Stmt>,
    pub visibility: Visibility,
    pub span: Span,
}

impl Method {
    /// A public, non-mutating method returning no value, without parameters or body.
    pub fn new(name: &str, call_type: MethodCallType) -> Self {
        Self {
            name: name.to_string(),
            return_type: None,
            call_type,
            mutates: false,
            params: Vec::new(),
            body: None,
            visibility: Visibility::Public,
            span: Span::default(),
        }
    }

    pub fn with_return_type(mut self, ty: Type) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(Stmt::Block(body));
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn mutating(mut self) -> Self {
        self.mutates = true;
        self
    }

    pub fn is_static(&self) -> bool {
        self.call_type == MethodCallType::Static
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub base: Option<String>,
    pub call_type: ClassCallType,
    /// Explicit constructor body, if one was declared.
    pub constructor: Option<Vec<Stmt>>,
    pub consts: Vec<ConstDecl>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub span: Span,
}

impl Class {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: None,
            call_type: ClassCallType::Normal,
            constructor: None,
            consts: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            span: Span::default(),
        }
    }

    /// Whether this class introduces virtual dispatch (declares virtual or abstract methods).
    pub fn declares_virtual_methods(&self) -> bool {
        self.methods.iter().any(|m| m.call_type.is_virtual())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub constants: Vec<EnumConstant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_builder_defaults() {
        let m = Method::new("run", MethodCallType::Virtual);
        assert_eq!(m.visibility, Visibility::Public);
        assert!(!m.mutates);
        assert!(m.body.is_none());
        assert!(m.call_type.is_virtual());
    }

    #[test]
    fn test_class_with_abstract_method_declares_virtuals() {
        let mut class = Class::new("Shape");
        assert!(!class.declares_virtual_methods());
        class.methods.push(Method::new("area", MethodCallType::Abstract));
        assert!(class.declares_virtual_methods());
    }

    #[test]
    fn test_override_is_not_a_new_virtual() {
        assert!(!MethodCallType::Override.is_virtual());
        assert!(!MethodCallType::Sealed.is_virtual());
    }
}
