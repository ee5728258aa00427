//! C++ declaration syntax: unit prologues, classes, members and embedded resources.

use ember_core::lang::operators::Priority;

use super::CppBackend;
use crate::backend::emit::{EmitError, Emitter, Usage};
use crate::backend::target::ConstScope;
use crate::backend::writer::CodeWriter;
use crate::tree::{Class, ClassCallType, ConstDecl, EnumDecl, Field, Intrinsic, Method, MethodCallType, Type};

/// Bytes per line of a resource initializer.
const RESOURCE_BYTES_PER_LINE: usize = 16;

/// Standard headers in include order, with the usage that requires each.
const HEADERS: &[(&str, fn(&Usage) -> bool)] = &[
    ("algorithm", |u| {
        u.uses(Intrinsic::ListContains) || u.uses(Intrinsic::MathMin) || u.uses(Intrinsic::MathMax)
    }),
    ("array", |u| u.storage_arrays),
    ("cmath", |u| u.uses(Intrinsic::MathAbs)),
    ("cstdint", |u| u.fixed_width_ints || u.resources),
    ("cstdlib", |u| u.uses(Intrinsic::MathAbs)),
    ("iostream", |u| u.uses(Intrinsic::ConsoleWriteLine)),
    ("map", |u| u.maps),
    ("memory", |u| u.shared_pointers),
    ("stdexcept", |u| u.throws),
    ("string", |u| {
        u.string_storage || u.number_formatting || u.uses(Intrinsic::StringContains)
    }),
    ("string_view", |u| u.string_views),
    ("vector", |u| u.lists),
];

pub(super) fn write_interface_prologue(out: &mut CodeWriter, usage: &Usage) {
    out.line("#pragma once");
    let headers: Vec<&str> = HEADERS
        .iter()
        .filter(|(_, needed)| needed(usage))
        .map(|(name, _)| *name)
        .collect();
    if !headers.is_empty() {
        out.blank_line();
        for header in headers {
            out.linef(format_args!("#include <{}>", header));
        }
    }
}

pub(super) fn write_enum(backend: &CppBackend, out: &mut CodeWriter, decl: &EnumDecl) {
    let constants: Vec<String> = decl
        .constants
        .iter()
        .map(|c| {
            let name = backend.escape(&c.name);
            match c.value {
                Some(value) => format!("{} = {}", name, value),
                None => name,
            }
        })
        .collect();
    if constants.is_empty() {
        out.linef(format_args!("enum class {} {{}};", decl.name));
    } else {
        out.linef(format_args!("enum class {} {{ {} }};", decl.name, constants.join(", ")));
    }
}

pub(super) fn class_header(class: &Class) -> String {
    let mut header = format!("class {}", class.name);
    if class.call_type == ClassCallType::Sealed {
        header.push_str(" final");
    }
    if let Some(base) = &class.base {
        header.push_str(" : public ");
        header.push_str(base);
    }
    header
}

pub(super) fn constructor_declaration(class: &Class) -> String {
    if class.call_type == ClassCallType::Static {
        format!("{}() = delete;", class.name)
    } else if class.constructor.is_some() {
        format!("{}();", class.name)
    } else {
        format!("{}() = default;", class.name)
    }
}

pub(super) fn write_resource_definition(out: &mut CodeWriter, ident: &str, bytes: &[u8]) {
    out.open_block(&format!("const uint8_t {}[{}] =", ident, bytes.len()));
    let lines: Vec<String> = bytes
        .chunks(RESOURCE_BYTES_PER_LINE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|b| format!("{:#04x}", b))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if i == last {
            out.line(line);
        } else {
            out.linef(format_args!("{},", line));
        }
    }
    out.close_block_with("};");
}

impl CppBackend {
    pub(super) fn escape(&self, name: &str) -> String {
        crate::backend::target::Backend::escape_identifier(self, name)
    }

    pub(super) fn cpp_const_declaration(
        &self,
        cx: &Emitter<'_>,
        decl: &ConstDecl,
        scope: ConstScope,
    ) -> Result<String, EmitError> {
        // `std::string` is not a literal type; string constants are views onto static storage.
        let ty = match &decl.ty {
            Type::String(_) => Type::string_view(),
            Type::Class { .. } | Type::List(_) | Type::Map(..) => {
                return Err(EmitError::unsupported(
                    format!("constant `{}` of non-literal type `{}`", decl.name, decl.ty),
                    cx.location(decl.value.span),
                ));
            }
            other => other.clone(),
        };
        let keyword = match scope {
            ConstScope::Class => "static constexpr",
            ConstScope::Local => "constexpr",
        };
        Ok(format!(
            "{} {} {} = {};",
            keyword,
            cx.type_name(&ty, false)?,
            self.escape(&decl.name),
            cx.coerce(&ty, &decl.value, Priority::Assign)?
        ))
    }

    pub(super) fn cpp_field_declaration(&self, cx: &Emitter<'_>, field: &Field) -> Result<String, EmitError> {
        let is_static = field.is_static || cx.current_class().is_some_and(|c| c.call_type == ClassCallType::Static);
        let prefix = if is_static { "static inline " } else { "" };
        let ty = cx.type_name(&field.ty, false)?;
        let name = self.escape(&field.name);
        match &field.value {
            Some(value) => Ok(format!(
                "{}{} {} = {};",
                prefix,
                ty,
                name,
                cx.coerce(&field.ty, value, Priority::Assign)?
            )),
            None => Ok(format!("{}{} {}{};", prefix, ty, name, super::types::default_initializer(&field.ty))),
        }
    }

    fn return_type(&self, cx: &Emitter<'_>, method: &Method) -> Result<String, EmitError> {
        match &method.return_type {
            Some(ty) => cx.type_name(ty, false),
            None => Ok("void".to_string()),
        }
    }

    fn params(&self, cx: &Emitter<'_>, method: &Method, with_defaults: bool) -> Result<String, EmitError> {
        let params = method
            .params
            .iter()
            .map(|p| {
                let decl = format!("{} {}", cx.type_name(&p.ty, false)?, self.escape(&p.name));
                match &p.default {
                    Some(default) if with_defaults => {
                        Ok(format!("{} = {}", decl, cx.coerce(&p.ty, default, Priority::Assign)?))
                    }
                    _ => Ok(decl),
                }
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        Ok(params.join(", "))
    }

    /// `const` qualifier for instance methods that leave the receiver untouched.
    fn receiver_qualifier(method: &Method) -> &'static str {
        if method.mutates || method.is_static() { "" } else { " const" }
    }

    pub(super) fn cpp_method_declaration(
        &self,
        cx: &Emitter<'_>,
        _class: &Class,
        method: &Method,
    ) -> Result<String, EmitError> {
        let (prefix, suffix) = match method.call_type {
            MethodCallType::Static => ("static ", ""),
            MethodCallType::Normal => ("", ""),
            MethodCallType::Abstract => ("virtual ", " = 0"),
            MethodCallType::Virtual => ("virtual ", ""),
            MethodCallType::Override => ("", " override"),
            MethodCallType::Sealed => ("", " final"),
        };
        Ok(format!(
            "{}{} {}({}){}{};",
            prefix,
            self.return_type(cx, method)?,
            self.escape(&method.name),
            self.params(cx, method, true)?,
            Self::receiver_qualifier(method),
            suffix
        ))
    }

    pub(super) fn cpp_method_definition_header(
        &self,
        cx: &Emitter<'_>,
        class: &Class,
        method: &Method,
    ) -> Result<String, EmitError> {
        Ok(format!(
            "{} {}::{}({}){}",
            self.return_type(cx, method)?,
            class.name,
            self.escape(&method.name),
            self.params(cx, method, false)?,
            Self::receiver_qualifier(method)
        ))
    }
}
