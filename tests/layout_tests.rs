//! Class layout tests: dependency order, cycle rejection and member grouping.

use ember::backend::EmitError;
use ember::backend::emit::{ClassOrder, Member, constructor_visibility, member_groups};
use ember::tree::{Class, ClassCallType, ConstDecl, Expr, Field, Method, MethodCallType, Program, Type, Visibility};
use proptest::prelude::*;

fn names(order: &ClassOrder<'_>) -> Vec<String> {
    order.classes().iter().map(|c| c.name.clone()).collect()
}

fn embedding(name: &str, embedded: &[&str]) -> Class {
    let mut class = Class::new(name);
    for (i, dep) in embedded.iter().enumerate() {
        class.fields.push(Field::new(&format!("f{}", i), Type::class_value(dep)));
    }
    class
}

#[test]
fn test_unconstrained_classes_keep_input_order() {
    let mut program = Program::new();
    for name in ["Zeta", "Alpha", "Mid"] {
        program.classes.push(Class::new(name));
    }
    let order = ClassOrder::compute(&program).expect("acyclic");
    assert_eq!(names(&order), vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn test_base_and_embedded_classes_come_first() {
    let mut program = Program::new();
    let mut button = embedding("Button", &["Label"]);
    button.base = Some("Widget".to_string());
    program.classes.push(button);
    program.classes.push(embedding("Label", &["Font"]));
    program.classes.push(Class::new("Widget"));
    program.classes.push(Class::new("Font"));

    let order = ClassOrder::compute(&program).expect("acyclic");
    assert_eq!(names(&order), vec!["Widget", "Font", "Label", "Button"]);
}

#[test]
fn test_storage_array_of_class_is_an_edge() {
    let mut program = Program::new();
    let mut grid = Class::new("Grid");
    grid.fields
        .push(Field::new("cells", Type::array_storage(Type::class_value("Cell"), 9)));
    program.classes.push(grid);
    program.classes.push(Class::new("Cell"));

    let order = ClassOrder::compute(&program).expect("acyclic");
    assert_eq!(names(&order), vec!["Cell", "Grid"]);
}

#[test]
fn test_self_embedding_is_a_cycle() {
    let mut program = Program::new();
    program.classes.push(embedding("Loop", &["Loop"]));
    let err = ClassOrder::compute(&program).unwrap_err();
    assert_eq!(err, EmitError::CircularDependency { class: "Loop".to_string() });
}

#[test]
fn test_inheritance_cycle_is_rejected() {
    let mut program = Program::new();
    let mut a = Class::new("A");
    a.base = Some("C".to_string());
    let mut b = Class::new("B");
    b.base = Some("A".to_string());
    let mut c = Class::new("C");
    c.base = Some("B".to_string());
    program.classes.extend([a, b, c]);

    let err = ClassOrder::compute(&program).unwrap_err();
    assert!(matches!(err, EmitError::CircularDependency { .. }));
}

#[test]
fn test_member_kinds_ordered_within_group() {
    let mut class = Class::new("Config");
    class
        .methods
        .push(Method::new("load", MethodCallType::Normal).with_body(Vec::new()));
    class.fields.push(Field::new("path", Type::string_storage()));
    class
        .consts
        .push(ConstDecl::new("VERSION", Type::i32(), Expr::int(3, Type::i32())));

    let groups = member_groups(&class);
    assert_eq!(groups.len(), 1);
    let kinds: Vec<&str> = groups[0]
        .members
        .iter()
        .map(|m| match m {
            Member::Constructor => "ctor",
            Member::Destructor => "dtor",
            Member::Const(_) => "const",
            Member::Field(_) => "field",
            Member::Method(_) => "method",
        })
        .collect();
    assert_eq!(kinds, vec!["ctor", "const", "field", "method"]);
}

#[test]
fn test_every_member_lands_in_exactly_one_group() {
    let mut class = Class::new("Mixed");
    for (i, visibility) in Visibility::ORDER.iter().enumerate() {
        class
            .fields
            .push(Field::new(&format!("f{}", i), Type::Bool).with_visibility(*visibility));
        class.methods.push(
            Method::new(&format!("m{}", i), MethodCallType::Normal)
                .with_visibility(*visibility)
                .with_body(Vec::new()),
        );
    }
    let groups = member_groups(&class);
    let visibilities: Vec<Visibility> = groups.iter().map(|g| g.visibility).collect();
    assert_eq!(visibilities, Visibility::ORDER.to_vec());

    let total: usize = groups.iter().map(|g| g.members.len()).sum();
    // Eight members plus the synthesized constructor.
    assert_eq!(total, 9);
}

#[test]
fn test_static_class_constructor_is_private() {
    let mut class = Class::new("Helpers");
    class.call_type = ClassCallType::Static;
    let groups = member_groups(&class);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].visibility, constructor_visibility(ClassCallType::Static));
    assert_eq!(groups[0].visibility, Visibility::Private);
}

/// Acyclic dependency graph: class `i` may embed any class `j < i`; input order is shuffled.
fn acyclic_program() -> impl Strategy<Value = (Program, Vec<(usize, usize)>)> {
    (2usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
        .prop_map(|(adjacency, input_order)| {
            let mut edges = Vec::new();
            for (i, row) in adjacency.iter().enumerate() {
                for (j, &present) in row.iter().enumerate().take(i) {
                    if present {
                        edges.push((i, j));
                    }
                }
            }
            let mut program = Program::new();
            for &i in &input_order {
                let mut class = Class::new(&format!("C{}", i));
                for &(_, j) in edges.iter().filter(|(from, _)| *from == i) {
                    class
                        .fields
                        .push(Field::new(&format!("c{}", j), Type::class_value(&format!("C{}", j))));
                }
                program.classes.push(class);
            }
            (program, edges)
        })
}

proptest! {
    /// Property: every class is emitted after the classes it embeds, and exactly once
    #[test]
    fn class_order_respects_dependencies((program, edges) in acyclic_program()) {
        let order = ClassOrder::compute(&program).expect("acyclic");
        let names = names(&order);
        prop_assert_eq!(names.len(), program.classes.len());
        let position = |i: usize| names.iter().position(|n| *n == format!("C{}", i));
        for (from, to) in edges {
            prop_assert!(position(to) < position(from), "C{} must precede C{}: {:?}", to, from, names);
        }
    }
}
