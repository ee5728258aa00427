//! Class layout policy: member grouping and topological class order.
//!
//! ## Member groups
//! Members are emitted in visibility groups ordered public, protected, internal, private. Inside a
//! group the order is: synthesized constructor, destructor, constants, fields, methods, each kept in
//! declaration order.
//!
//! ## Class order
//! A class definition may only follow the definitions of its base class and of every class it embeds
//! by value. [`ClassOrder::compute`] walks those edges depth-first with a three-state marker that
//! lives for a single call.

use std::collections::HashMap;

use super::EmitError;
use crate::tree::{Class, ClassCallType, ConstDecl, Field, Method, Program, Visibility};

/// One emitted member of a class declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    Constructor,
    Destructor,
    Const(&'a ConstDecl),
    Field(&'a Field),
    Method(&'a Method),
}

/// The members of one visibility group, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberGroup<'a> {
    pub visibility: Visibility,
    pub members: Vec<Member<'a>>,
}

/// Visibility of the synthesized default constructor for a class call-type.
pub fn constructor_visibility(call_type: ClassCallType) -> Visibility {
    match call_type {
        ClassCallType::Normal | ClassCallType::Sealed => Visibility::Public,
        ClassCallType::Abstract => Visibility::Protected,
        ClassCallType::Static => Visibility::Private,
    }
}

/// Whether the class gets a virtual destructor: it is a root of a polymorphic hierarchy.
fn needs_virtual_destructor(class: &Class) -> bool {
    class.base.is_none() && class.declares_virtual_methods()
}

/// Group a class's members for emission. Empty groups are omitted.
pub fn member_groups(class: &Class) -> Vec<MemberGroup<'_>> {
    let ctor_visibility = constructor_visibility(class.call_type);
    Visibility::ORDER
        .iter()
        .filter_map(|&visibility| {
            let mut members = Vec::new();
            if visibility == ctor_visibility {
                members.push(Member::Constructor);
            }
            if visibility == Visibility::Public && needs_virtual_destructor(class) {
                members.push(Member::Destructor);
            }
            members.extend(
                class
                    .consts
                    .iter()
                    .filter(|c| c.visibility == visibility)
                    .map(Member::Const),
            );
            members.extend(
                class
                    .fields
                    .iter()
                    .filter(|f| f.visibility == visibility)
                    .map(Member::Field),
            );
            members.extend(
                class
                    .methods
                    .iter()
                    .filter(|m| m.visibility == visibility)
                    .map(Member::Method),
            );
            (!members.is_empty()).then_some(MemberGroup { visibility, members })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency order of a program's class definitions.
#[derive(Debug)]
pub struct ClassOrder<'a> {
    classes: Vec<&'a Class>,
}

impl<'a> ClassOrder<'a> {
    /// Order every class after its base class and the classes it embeds by value.
    ///
    /// Classes without constraints keep their input order. References to classes that are not part
    /// of the program add no edge.
    ///
    /// ## Errors
    /// - [`EmitError::CircularDependency`] naming the first class found on a cycle.
    pub fn compute(program: &'a Program) -> Result<Self, EmitError> {
        let mut marks: HashMap<&'a str, Mark> = program
            .classes
            .iter()
            .map(|c| (c.name.as_str(), Mark::Unvisited))
            .collect();
        let mut classes = Vec::with_capacity(program.classes.len());
        for class in &program.classes {
            visit(program, class, &mut marks, &mut classes)?;
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[&'a Class] {
        &self.classes
    }
}

fn visit<'a>(
    program: &'a Program,
    class: &'a Class,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<&'a Class>,
) -> Result<(), EmitError> {
    match marks.get(class.name.as_str()).copied().unwrap_or(Mark::Unvisited) {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            return Err(EmitError::CircularDependency {
                class: class.name.clone(),
            });
        }
        Mark::Unvisited => {}
    }
    marks.insert(class.name.as_str(), Mark::InProgress);

    let dependencies = class
        .base
        .as_deref()
        .into_iter()
        .chain(class.fields.iter().filter_map(|f| f.ty.embedded_class()));
    for name in dependencies {
        if let Some(dependency) = program.class(name) {
            visit(program, dependency, marks, order)?;
        }
    }

    marks.insert(class.name.as_str(), Mark::Done);
    tracing::trace!(class = %class.name, "class ordered");
    order.push(class);
    Ok(())
}
