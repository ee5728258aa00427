//! Emit a full program as an interface unit and an implementation unit.
//!
//! Generation is two strictly sequential passes over the same immutable tree. Everything the second
//! pass relies on (class order, resource validation) is settled before the first line of the first
//! unit is written, so a fatal condition never leaves a half-written class behind.
//!
//! ## Unit layout
//!
//! Interface unit: banner, prologue (guard + includes), native blocks, namespace open, forward
//! declarations in input order, enums, class definitions in dependency order, resource declarations
//! sorted by name, namespace close.
//!
//! Implementation unit: banner, reference to the interface unit, namespace open, constructor and
//! method definitions grouped by class in input order, resource definitions sorted by name,
//! namespace close.
//!
//! Sections are separated by a single blank line.

use std::collections::HashMap;

use super::super::config::EmitConfig;
use super::super::target::{Backend, ConstScope};
use super::super::writer::CodeWriter;
use super::layout::{ClassOrder, Member, member_groups};
use super::usage::Usage;
use super::{EmitError, Emitter};
use crate::tree::{Class, ClassCallType, MethodCallType, Program};

/// The two artifacts of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnits {
    /// Declarations (header) unit.
    pub interface: String,
    /// Definitions unit; references the interface unit by file name.
    pub implementation: String,
}

/// Orchestrates one generation run.
pub struct ProgramEmitter<'a> {
    cx: Emitter<'a>,
    program: &'a Program,
    config: &'a EmitConfig,
}

/// Generate both units for `program` with `backend`.
///
/// ## Errors
/// - Any [`EmitError`] raised while emitting; partial output is dropped.
pub fn generate(program: &Program, backend: &dyn Backend, config: &EmitConfig) -> Result<GeneratedUnits, EmitError> {
    ProgramEmitter::new(backend, program, config).generate()
}

impl<'a> ProgramEmitter<'a> {
    pub fn new(backend: &'a dyn Backend, program: &'a Program, config: &'a EmitConfig) -> Self {
        Self {
            cx: Emitter::new(backend, program),
            program,
            config,
        }
    }

    /// Run both passes.
    #[tracing::instrument(skip_all, fields(backend = self.cx.backend().name(), class_count = self.program.classes.len()))]
    pub fn generate(&self) -> Result<GeneratedUnits, EmitError> {
        let order = ClassOrder::compute(self.program)?;
        let resources = self.sorted_resources()?;
        let interface = self.emit_interface(&order, &resources)?;
        let implementation = self.emit_implementation(&resources)?;
        Ok(GeneratedUnits {
            interface,
            implementation,
        })
    }

    /// Resources sorted by original name, keyed by their target identifier.
    fn sorted_resources(&self) -> Result<Vec<(String, &'a [u8])>, EmitError> {
        let mut names: Vec<&String> = self.program.resources.keys().collect();
        names.sort();
        let mut resources = Vec::with_capacity(names.len());
        let mut claimed: HashMap<String, &String> = HashMap::with_capacity(names.len());
        for name in names {
            let bytes = self.program.resources.get(name).map(Vec::as_slice).unwrap_or_default();
            if bytes.is_empty() {
                return Err(EmitError::unsupported(format!("empty resource `{}`", name), name.clone()));
            }
            let ident = self.cx.backend().resource_identifier(name);
            if let Some(previous) = claimed.insert(ident.clone(), name) {
                return Err(EmitError::unsupported(
                    format!("resources `{}` and `{}` share identifier `{}`", previous, name, ident),
                    name.clone(),
                ));
            }
            resources.push((ident, bytes));
        }
        Ok(resources)
    }

    fn banner(&self, out: &mut CodeWriter) {
        out.line(&self.cx.backend().line_comment(&self.config.banner));
    }

    #[tracing::instrument(skip_all)]
    fn emit_interface(&self, order: &ClassOrder<'a>, resources: &[(String, &'a [u8])]) -> Result<String, EmitError> {
        let backend = self.cx.backend();
        let mut out = CodeWriter::new(self.config);

        self.banner(&mut out);
        backend.write_interface_prologue(&mut out, &Usage::scan(self.program));

        for native in &self.program.natives {
            out.blank_line();
            out.raw(native);
        }

        if let Some(namespace) = &self.config.namespace {
            out.blank_line();
            backend.open_namespace(&mut out, namespace);
        }

        if !self.program.classes.is_empty() {
            out.blank_line();
            for class in &self.program.classes {
                backend.write_forward_declaration(&mut out, class);
            }
        }

        for decl in &self.program.enums {
            out.blank_line();
            backend.write_enum(&mut out, decl);
        }

        for &class in order.classes() {
            out.blank_line();
            self.write_class_definition(&mut out, class)?;
        }

        if !resources.is_empty() {
            out.blank_line();
            for (ident, bytes) in resources {
                backend.write_resource_declaration(&mut out, ident, bytes.len());
            }
        }

        if let Some(namespace) = &self.config.namespace {
            out.blank_line();
            backend.close_namespace(&mut out, namespace);
        }

        Ok(out.finish())
    }

    fn write_class_definition(&self, out: &mut CodeWriter, class: &'a Class) -> Result<(), EmitError> {
        let backend = self.cx.backend();
        tracing::debug!(class = %class.name, "emitting class definition");
        self.cx.set_current_class(Some(class));

        backend.open_class(out, class);
        let mut label: Option<&str> = None;
        for group in member_groups(class) {
            let keyword = backend.visibility_keyword(group.visibility);
            if label != Some(keyword) {
                backend.write_visibility_label(out, keyword);
                label = Some(keyword);
            }
            for member in group.members {
                match member {
                    Member::Constructor => backend.write_constructor_declaration(out, class),
                    Member::Destructor => backend.write_destructor_declaration(out, class),
                    Member::Const(decl) => {
                        let line = backend
                            .const_declaration(&self.cx, decl, ConstScope::Class)
                            .map_err(|e| e.or_at(&self.cx.location(decl.value.span)))?;
                        out.line(&line);
                    }
                    Member::Field(field) => {
                        let line = backend
                            .field_declaration(&self.cx, field)
                            .map_err(|e| e.or_at(&format!("{}::{}", class.name, field.name)))?;
                        out.line(&line);
                    }
                    Member::Method(method) => {
                        self.cx.set_current_method(Some(method));
                        let line = backend
                            .method_declaration(&self.cx, class, method)
                            .map_err(|e| e.or_at(&self.cx.location(method.span)))?;
                        out.line(&line);
                        self.cx.set_current_method(None);
                    }
                }
            }
        }
        backend.close_class(out, class);

        self.cx.set_current_class(None);
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    fn emit_implementation(&self, resources: &[(String, &'a [u8])]) -> Result<String, EmitError> {
        let backend = self.cx.backend();
        let mut out = CodeWriter::new(self.config);

        self.banner(&mut out);
        backend.write_implementation_prologue(&mut out, self.config);

        if let Some(namespace) = &self.config.namespace {
            out.blank_line();
            backend.open_namespace(&mut out, namespace);
        }

        for class in &self.program.classes {
            self.write_class_definitions(&mut out, class)?;
        }

        for (ident, bytes) in resources {
            tracing::debug!(resource = %ident, len = bytes.len(), "emitting resource");
            out.blank_line();
            backend.write_resource_definition(&mut out, ident, bytes);
        }

        if let Some(namespace) = &self.config.namespace {
            out.blank_line();
            backend.close_namespace(&mut out, namespace);
        }

        Ok(out.finish())
    }

    /// Out-of-line constructor and method definitions of one class.
    fn write_class_definitions(&self, out: &mut CodeWriter, class: &'a Class) -> Result<(), EmitError> {
        let backend = self.cx.backend();
        self.cx.set_current_class(Some(class));

        if let Some(body) = &class.constructor {
            if class.call_type == ClassCallType::Static {
                return Err(EmitError::unsupported(
                    "constructor body in a static class",
                    self.cx.location(class.span),
                ));
            }
            out.blank_line();
            out.open_block(&backend.constructor_definition_header(&self.cx, class));
            self.cx.write_stmts(out, body)?;
            out.close_block();
        }

        for method in &class.methods {
            if method.call_type == MethodCallType::Abstract {
                continue;
            }
            self.cx.set_current_method(Some(method));
            let Some(body) = &method.body else {
                return Err(EmitError::unsupported(
                    "non-abstract method without a body",
                    self.cx.location(method.span),
                ));
            };
            let header = backend
                .method_definition_header(&self.cx, class, method)
                .map_err(|e| e.or_at(&self.cx.location(method.span)))?;
            out.blank_line();
            out.open_block(&header);
            self.cx.write_block_contents(out, body)?;
            out.close_block();
        }

        self.cx.set_current_class(None);
        Ok(())
    }
}
