//! Golden snapshot tests for whole-program codegen
//!
//! Each test builds a typed tree by hand, runs both passes with the C++ backend and compares the
//! interface and implementation units against inline snapshots.
//!
//! Run with: `cargo test --test codegen_snapshot_tests`
//! Review changes: `cargo insta review`
//! Trace emission: `RUST_LOG=ember=debug cargo test --test codegen_snapshot_tests -- --nocapture`

use ember::backend::{CppBackend, EmitConfig, EmitError, GeneratedUnits, generate};
use ember::tree::{
    BinaryOp, Callee, Class, ClassCallType, ConstDecl, EnumConstant, EnumDecl, Expr, ExprKind, Field, Intrinsic,
    Method, MethodCallType, Param, Program, PtrModifier, Stmt, SymbolKind, Type, Visibility,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn generate_cpp(program: &Program) -> GeneratedUnits {
    init_tracing();
    generate(program, &CppBackend, &EmitConfig::default()).expect("generation failed")
}

fn generate_err(program: &Program) -> EmitError {
    init_tracing();
    generate(program, &CppBackend, &EmitConfig::default()).expect_err("generation should fail")
}

fn field_ref(class: &str, name: &str, ty: Type) -> Expr {
    Expr::symbol(
        None,
        name,
        SymbolKind::Field {
            class: class.to_string(),
            is_static: false,
        },
        ty,
    )
}

fn point() -> Class {
    let mut point = Class::new("Point");
    point.fields.push(Field::new("x", Type::i32()));
    point.fields.push(Field::new("y", Type::i32()));
    point
}

#[test]
fn test_plain_class_with_fields() {
    let mut program = Program::new();
    program.classes.push(point());

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <cstdint>

    class Point;

    class Point {
    public:
        Point() = default;
        int32_t x{};
        int32_t y{};
    };
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"
    "#);
}

#[test]
fn test_shared_field_constructed_with_make_shared() {
    let shared_node = Type::class_ptr("Node", PtrModifier::Shared);
    let mut scene = Class::new("Scene");
    scene.fields.push(Field::new("root", shared_node.clone()));
    scene.constructor = Some(vec![Stmt::Expr(Expr::binary(
        BinaryOp::Assign,
        field_ref("Scene", "root", shared_node.clone()),
        Expr::new(ExprKind::New { length: None }, shared_node.clone()),
        shared_node,
    ))]);

    let mut program = Program::new();
    program.classes.push(Class::new("Node"));
    program.classes.push(scene);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <memory>

    class Node;
    class Scene;

    class Node {
    public:
        Node() = default;
    };

    class Scene {
    public:
        Scene();
        std::shared_ptr<Node> root;
    };
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"

    Scene::Scene() {
        root = std::make_shared<Node>();
    }
    "#);
}

#[test]
fn test_contains_nested_under_equality() {
    let text = Expr::param("text", Type::string_view());
    let contains = Expr::call(
        Callee::Intrinsic(Intrinsic::StringContains),
        Some(text),
        vec![Expr::string("{")],
        Type::Bool,
    );
    let check = Expr::binary(BinaryOp::Eq, contains, Expr::bool(false), Type::Bool);

    let mut parser = Class::new("Parser");
    parser.methods.push(
        Method::new("is_plain", MethodCallType::Static)
            .with_return_type(Type::Bool)
            .with_params(vec![Param::new("text", Type::string_view())])
            .with_body(vec![Stmt::Return(Some(check))]),
    );
    let mut program = Program::new();
    program.classes.push(parser);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <string>
    #include <string_view>

    class Parser;

    class Parser {
    public:
        Parser() = default;
        static bool is_plain(std::string_view text);
    };
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"

    bool Parser::is_plain(std::string_view text) {
        return (text.find("{") != std::string::npos) == false;
    }
    "#);
}

#[test]
fn test_resources_sorted_and_sanitized() {
    let mut program = Program::new();
    program.resources.insert("icon.png".to_string(), vec![0x89, 0x50, 0x4e]);
    program.resources.insert("a.bin".to_string(), vec![1, 2]);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <cstdint>

    extern const uint8_t a_bin[2];
    extern const uint8_t icon_png[3];
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"

    const uint8_t a_bin[2] = {
        0x01, 0x02
    };

    const uint8_t icon_png[3] = {
        0x89, 0x50, 0x4e
    };
    "#);
}

#[test]
fn test_polymorphic_hierarchy() {
    let radius = field_ref("Circle", "radius", Type::Double);
    let mut circle = Class::new("Circle");
    circle.base = Some("Shape".to_string());
    circle.call_type = ClassCallType::Sealed;
    circle
        .fields
        .push(Field::new("radius", Type::Double).with_visibility(Visibility::Private));
    circle.methods.push(
        Method::new("area", MethodCallType::Override)
            .with_return_type(Type::Double)
            .with_body(vec![Stmt::Return(Some(Expr::binary(
                BinaryOp::Mul,
                radius.clone(),
                radius,
                Type::Double,
            )))]),
    );

    let mut shape = Class::new("Shape");
    shape.call_type = ClassCallType::Abstract;
    shape
        .methods
        .push(Method::new("area", MethodCallType::Abstract).with_return_type(Type::Double));

    let mut program = Program::new();
    program.classes.push(circle);
    program.classes.push(shape);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    class Circle;
    class Shape;

    class Shape {
    public:
        virtual ~Shape() = default;
        virtual double area() const = 0;
    protected:
        Shape() = default;
    };

    class Circle final : public Shape {
    public:
        Circle() = default;
        double area() const override;
    private:
        double radius{};
    };
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"

    double Circle::area() const {
        return radius * radius;
    }
    "#);
}

#[test]
fn test_static_class_members() {
    let x = Expr::param("x", Type::i32());
    let mut util = Class::new("MathUtil");
    util.call_type = ClassCallType::Static;
    util.consts
        .push(ConstDecl::new("SCALE", Type::Double, Expr::float(2.5, Type::Double)));
    util.methods.push(
        Method::new("square", MethodCallType::Static)
            .with_return_type(Type::i32())
            .with_params(vec![Param::new("x", Type::i32())])
            .with_body(vec![Stmt::Return(Some(Expr::binary(
                BinaryOp::Mul,
                x.clone(),
                x,
                Type::i32(),
            )))]),
    );
    let mut program = Program::new();
    program.classes.push(util);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <cstdint>

    class MathUtil;

    class MathUtil {
    public:
        static constexpr double SCALE = 2.5;
        static int32_t square(int32_t x);
    private:
        MathUtil() = delete;
    };
    "#);
    insta::assert_snapshot!(units.implementation, @r#"
    // Generated automatically with "ember". Do not edit.
    #include "output.hpp"

    int32_t MathUtil::square(int32_t x) {
        return x * x;
    }
    "#);
}

#[test]
fn test_namespace_wraps_both_units() {
    let mut program = Program::new();
    program.classes.push(point());
    let config = EmitConfig::new().with_namespace("geo").with_interface_file("geo.hpp");

    let units = generate(&program, &CppBackend, &config).expect("generation failed");
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #include <cstdint>

    namespace geo {

    class Point;

    class Point {
    public:
        Point() = default;
        int32_t x{};
        int32_t y{};
    };

    }  // namespace geo
    "#);
    assert!(units.implementation.contains("#include \"geo.hpp\"\n"));
    assert!(units.implementation.contains("namespace geo {\n"));
    assert!(units.implementation.ends_with("}  // namespace geo\n"));
}

#[test]
fn test_enums_natives_and_keyword_escaping() {
    let mut program = Program::new();
    program.natives.push("#define EMBER_NATIVE 1".to_string());
    program.enums.push(EnumDecl {
        name: "Mode".to_string(),
        constants: vec![
            EnumConstant {
                name: "Idle".to_string(),
                value: None,
            },
            EnumConstant {
                name: "Busy".to_string(),
                value: Some(4),
            },
        ],
    });
    let mut job = Class::new("Job");
    job.fields.push(Field::new("mode", Type::Enum("Mode".to_string())));
    job.fields.push(Field::new("delete", Type::Bool));
    program.classes.push(job);

    let units = generate_cpp(&program);
    insta::assert_snapshot!(units.interface, @r#"
    // Generated automatically with "ember". Do not edit.
    #pragma once

    #define EMBER_NATIVE 1

    class Job;

    enum class Mode { Idle, Busy = 4 };

    class Job {
    public:
        Job() = default;
        Mode mode{};
        bool delete_{};
    };
    "#);
}

#[test]
fn test_visibility_labels_follow_groups() {
    let mut widget = Class::new("Widget");
    widget.fields.push(Field::new("id", Type::i32()));
    widget
        .fields
        .push(Field::new("parent", Type::i32()).with_visibility(Visibility::Protected));
    widget
        .fields
        .push(Field::new("slot", Type::i32()).with_visibility(Visibility::Internal));
    widget
        .fields
        .push(Field::new("cache", Type::i32()).with_visibility(Visibility::Private));
    let mut program = Program::new();
    program.classes.push(widget);

    let units = generate_cpp(&program);
    assert!(units.interface.contains(
        "class Widget {\npublic:\n    Widget() = default;\n    int32_t id{};\nprotected:\n    int32_t parent{};\npublic:\n    int32_t slot{};\nprivate:\n    int32_t cache{};\n};\n"
    ));
}

#[test]
fn test_throw_and_string_concatenation() {
    let name = Expr::param("name", Type::string_view());
    let message = Expr::binary(BinaryOp::Add, Expr::string("unknown: "), name, Type::string_storage());
    let mut registry = Class::new("Registry");
    registry.methods.push(
        Method::new("fail", MethodCallType::Normal)
            .with_params(vec![Param::new("name", Type::string_view())])
            .with_body(vec![Stmt::Throw(message)]),
    );
    let mut program = Program::new();
    program.classes.push(registry);

    let units = generate_cpp(&program);
    assert!(units.interface.contains("#include <stdexcept>\n"));
    assert!(units.interface.contains("    void fail(std::string_view name) const;\n"));
    assert!(units.implementation.contains(
        "void Registry::fail(std::string_view name) const {\n    throw std::runtime_error(std::string(\"unknown: \") + std::string(name));\n}\n"
    ));
}

#[test]
fn test_generation_is_deterministic() {
    let mut program = Program::new();
    program.classes.push(point());
    for (i, name) in ["z.dat", "m.dat", "b.dat", "q.dat"].iter().enumerate() {
        program.resources.insert(name.to_string(), vec![i as u8 + 1; 20]);
    }
    let first = generate_cpp(&program);
    let second = generate_cpp(&program);
    assert_eq!(first, second);
}

#[test]
fn test_layout_cycle_is_fatal() {
    let mut a = Class::new("A");
    a.fields.push(Field::new("b", Type::class_value("B")));
    let mut b = Class::new("B");
    b.fields.push(Field::new("a", Type::class_value("A")));
    let mut program = Program::new();
    program.classes.push(a);
    program.classes.push(b);

    let err = generate_err(&program);
    assert_eq!(err, EmitError::CircularDependency { class: "A".to_string() });
}

#[test]
fn test_empty_resource_is_rejected() {
    let mut program = Program::new();
    program.resources.insert("empty.bin".to_string(), Vec::new());
    assert!(matches!(generate_err(&program), EmitError::Unsupported { .. }));
}

#[test]
fn test_colliding_resource_identifiers_are_rejected() {
    let mut program = Program::new();
    program.resources.insert("a.b".to_string(), vec![1]);
    program.resources.insert("a_b".to_string(), vec![2]);
    match generate_err(&program) {
        EmitError::Unsupported { construct, .. } => assert!(construct.contains("share identifier `a_b`"), "{}", construct),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_static_class_constructor_body_is_rejected() {
    let mut util = Class::new("Util");
    util.call_type = ClassCallType::Static;
    util.constructor = Some(Vec::new());
    let mut program = Program::new();
    program.classes.push(util);
    assert!(matches!(generate_err(&program), EmitError::Unsupported { .. }));
}

#[test]
fn test_bodyless_concrete_method_is_rejected() {
    let mut class = Class::new("Half");
    class.methods.push(Method::new("run", MethodCallType::Normal));
    let mut program = Program::new();
    program.classes.push(class);

    let err = generate_err(&program);
    assert!(matches!(err, EmitError::Unsupported { ref location, .. } if location.contains("Half::run")));
}
