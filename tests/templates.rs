//! End-to-end template construction scenarios.

use codegraft::ast::{LiteralValue, Node, NodeKind};
use codegraft::{b, p, x, Error, Hole};

fn none() -> Vec<Hole> {
    Vec::new()
}

#[test]
fn block_of_two_assignments() {
    let stmts = b(&["a = b + c; d = e + f;"], none()).unwrap();
    assert_eq!(stmts.len(), 2);
    for stmt in &stmts {
        let NodeKind::ExpressionStatement { expression } = &stmt.kind else {
            panic!("expected expression statement");
        };
        let NodeKind::AssignmentExpression { right, .. } = &expression.kind else {
            panic!("expected assignment");
        };
        let NodeKind::BinaryExpression { .. } = &right.kind else {
            panic!("expected binary right-hand side");
        };
    }
}

#[test]
fn falsy_statement_hole_is_elided() {
    let stmts = b(&["a++; ", " b++"], vec![Hole::Bool(false)]).unwrap();
    assert_eq!(stmts.len(), 2);
    let first = codegraft::print_block(&stmts, &Default::default()).unwrap();
    assert_eq!(first.code, "a++;\nb++;");
}

#[test]
fn array_hole_flattens_into_elements() {
    let items = vec![
        x(&["a"], none()).unwrap(),
        x(&["b"], none()).unwrap(),
        x(&["c"], none()).unwrap(),
    ];
    let expr = x(&["[", "]"], vec![Hole::Nodes(items)]).unwrap();
    let NodeKind::ArrayExpression { elements } = &expr.kind else {
        panic!("expected array expression");
    };
    let names: Vec<_> = elements
        .iter()
        .map(|el| match &el.as_ref().unwrap().kind {
            NodeKind::Identifier { name } => name.clone(),
            other => panic!("expected identifier, got {}", other.type_name()),
        })
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn property_array_hole_flattens_into_object() {
    let props = vec![
        p(&["a"], none()).unwrap(),
        p(&["b"], none()).unwrap(),
        p(&["c"], none()).unwrap(),
    ];
    let expr = x(&["{", "}"], vec![Hole::Nodes(props)]).unwrap();
    let NodeKind::ObjectExpression { properties } = &expr.kind else {
        panic!("expected object expression");
    };
    assert_eq!(properties.len(), 3);
    for property in properties {
        let NodeKind::Property { shorthand, .. } = &property.kind else {
            panic!("expected property");
        };
        assert!(shorthand);
    }
}

#[test]
fn falsy_property_value_removes_property() {
    let expr = x(&["{ a: 1, b: ", " }"], vec![Hole::Bool(false)]).unwrap();
    let NodeKind::ObjectExpression { properties } = &expr.kind else {
        panic!("expected object expression");
    };
    assert_eq!(properties.len(), 1);
    let NodeKind::Property { key, .. } = &properties[0].kind else {
        panic!("expected property");
    };
    assert!(matches!(&key.kind, NodeKind::Identifier { name } if name == "a"));
}

#[test]
fn null_hole_removes_list_element() {
    let expr = x(&["f(a, ", ", b)"], vec![Hole::Null]).unwrap();
    let NodeKind::CallExpression { arguments, .. } = &expr.kind else {
        panic!("expected call");
    };
    assert_eq!(arguments.len(), 2);
}

#[test]
fn fragments_compose() {
    let inner = x(&["a + b"], none()).unwrap();
    let call = x(&["f(", ")"], vec![Hole::from(inner)]).unwrap();
    let stmts = b(&["const out = ", ";"], vec![Hole::from(call)]).unwrap();
    let printed = codegraft::print_block(&stmts, &Default::default()).unwrap();
    assert_eq!(printed.code, "const out = f(a + b);");
}

#[test]
fn string_holes_become_identifiers() {
    let stmts = b(
        &["function ", "(", ") { return ", "; }"],
        vec![Hole::from("run"), Hole::from("input"), Hole::from("input")],
    )
    .unwrap();
    let printed = codegraft::print_block(&stmts, &Default::default()).unwrap();
    assert_eq!(printed.code, "function run(input) {\n\treturn input;\n}");
}

#[test]
fn string_hole_inside_quotes_becomes_text() {
    let expr = x(&["log('count: ", "')"], vec![Hole::from("high")]).unwrap();
    let NodeKind::CallExpression { arguments, .. } = &expr.kind else {
        panic!("expected call");
    };
    match &arguments[0].kind {
        NodeKind::Literal {
            value: LiteralValue::String(s),
            ..
        } => assert_eq!(s, "count: high"),
        other => panic!("expected string literal, got {}", other.type_name()),
    }
}

#[test]
fn quasi_holes_escape_backticks() {
    let expr = x(&["`a", "b`"], vec![Hole::from("`")]).unwrap();
    let NodeKind::TemplateLiteral { quasis, .. } = &expr.kind else {
        panic!("expected template literal");
    };
    let NodeKind::TemplateElement { raw, cooked, .. } = &quasis[0].kind else {
        panic!("expected quasi");
    };
    assert_eq!(raw, "a\\`b");
    assert_eq!(cooked.as_deref(), Some("a`b"));
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "`a\\`b`");
}

#[test]
fn quasi_holes_escape_interpolation_and_backslash() {
    let expr = x(&["`v = ", "`"], vec![Hole::from("${n}")]).unwrap();
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "`v = \\${n}`");

    let expr = x(&["`p: ", "`"], vec![Hole::from("a\\b")]).unwrap();
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "`p: a\\\\b`");
}

#[test]
fn number_holes_become_literals() {
    let expr = x(&["range(", ", ", ")"], vec![Hole::from(1), Hole::from(10)]).unwrap();
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "range(1, 10)");
}

#[test]
fn node_hole_replaces_identifier_position() {
    let member = x(&["console.log"], none()).unwrap();
    let expr = x(&["", "(m)"], vec![Hole::from(member)]).unwrap();
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "console.log(m)");
}

#[test]
fn sigils_survive_construction() {
    let stmts = b(&["let foo = @bar;"], none()).unwrap();
    let NodeKind::VariableDeclaration { declarations, .. } = &stmts[0].kind else {
        panic!("expected declaration");
    };
    let NodeKind::VariableDeclarator { init, .. } = &declarations[0].kind else {
        panic!("expected declarator");
    };
    let init = init.as_ref().unwrap();
    assert!(init.is_sigil());
}

#[test]
fn broken_template_is_a_parse_error() {
    let err = x(&["this is broken"], none()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn no_placeholders_survive_substitution() {
    let stmts = b(
        &["const a = ", "; f(", ", '", "');"],
        vec![Hole::from(7), Hole::from("x"), Hole::from("text")],
    )
    .unwrap();
    let printed = codegraft::print_block(&stmts, &Default::default()).unwrap();
    assert!(!printed.code.contains("__cg_hole"));
}

#[test]
fn property_template_with_value_hole() {
    let prop = p(&["answer: ", ""], vec![Hole::from(42)]).unwrap();
    let printed = codegraft::print(&prop, &Default::default()).unwrap();
    assert_eq!(printed.code, "answer: 42");
}

#[test]
fn mutated_fragments_print() {
    // Callers commonly push into a fragment after building it.
    let mut expr = x(&["{ a: 1 }"], none()).unwrap();
    let extra = p(&["b: 2"], none()).unwrap();
    if let NodeKind::ObjectExpression { properties } = &mut expr.kind {
        properties.push(extra);
    }
    let printed = codegraft::print(&expr, &Default::default()).unwrap();
    assert_eq!(printed.code, "{ a: 1, b: 2 }");
}

#[test]
fn statement_list_hole_in_function_body() {
    let body = b(&["let acc = 0; acc += step;"], none()).unwrap();
    let stmts = b(
        &["function sum() { ", " return acc; }"],
        vec![Hole::from(body)],
    )
    .unwrap();
    let printed = codegraft::print_block(&stmts, &Default::default()).unwrap();
    assert_eq!(
        printed.code,
        "function sum() {\n\tlet acc = 0;\n\tacc += step;\n\treturn acc;\n}"
    );
}

#[test]
fn optional_hole_from_option() {
    let some: Hole = Some(Node::ident("present")).into();
    let nothing: Hole = Option::<Node>::None.into();
    let expr = x(&["[", ", ", "]"], vec![some, nothing]).unwrap();
    let NodeKind::ArrayExpression { elements } = &expr.kind else {
        panic!("expected array");
    };
    assert_eq!(elements.len(), 1);
}
