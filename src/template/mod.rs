//! Template-driven AST construction.
//!
//! A template is `N + 1` source chunks around `N` holes. Stitching joins the
//! chunks with per-hole placeholder identifiers, the result parses through the
//! adapter, and a substitution walk grafts the hole values back in with the
//! coercion, flattening, and elision rules of each hole kind.
//!
//! Three entry points configure the parse mode: [`b`] for a statement list,
//! [`x`] for a single expression, [`p`] for a single object property.

mod hole;
mod stitch;
mod substitute;

pub use hole::Hole;

use crate::ast::Node;
use crate::error::Result;
use crate::parse;
use stitch::stitch;
use substitute::Substituter;

/// Placeholder namespace for holes. The parser adapter separately owns the
/// `__cg_at__`/`__cg_hash__` sigil tunnels.
pub(crate) const HOLE_PREFIX: &str = "__cg_hole_";

pub(crate) fn placeholder_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(HOLE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn placeholder_name(i: usize) -> String {
    format!("{HOLE_PREFIX}{i}")
}

/// Build a block of statements from a template.
pub fn b(chunks: &[&str], holes: Vec<Hole>) -> Result<Vec<Node>> {
    let source = stitch(chunks, holes.len())?;
    let mut body = parse::parse_statements(&source, false)?;
    let mut sub = Substituter::new(holes);
    sub.stmt_list(&mut body)?;
    sub.finish()?;
    Ok(body)
}

/// Build a single expression from a template.
pub fn x(chunks: &[&str], holes: Vec<Hole>) -> Result<Node> {
    let source = stitch(chunks, holes.len())?;
    let node = parse::parse_expr_mode(&source, false)?;
    let mut sub = Substituter::new(holes);
    let node = sub.root_expr(node)?;
    sub.finish()?;
    Ok(node)
}

/// Build a single object property from a template.
pub fn p(chunks: &[&str], holes: Vec<Hole>) -> Result<Node> {
    let source = stitch(chunks, holes.len())?;
    let node = parse::parse_property(&source, false)?;
    let mut sub = Substituter::new(holes);
    let node = sub.root_prop(node)?;
    sub.finish()?;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LiteralValue, NodeKind};
    use crate::error::Error;

    fn no_holes() -> Vec<Hole> {
        Vec::new()
    }

    // ==================== b ====================

    #[test]
    fn b_parses_statement_lists() {
        let stmts = b(&["a = b + c; d = e + f;"], no_holes()).unwrap();
        assert_eq!(stmts.len(), 2);
        for stmt in &stmts {
            let NodeKind::ExpressionStatement { expression } = &stmt.kind else {
                panic!("expected expression statement");
            };
            let NodeKind::AssignmentExpression { right, .. } = &expression.kind else {
                panic!("expected assignment");
            };
            assert!(matches!(right.kind, NodeKind::BinaryExpression { .. }));
        }
    }

    #[test]
    fn b_splices_statement_lists() {
        let inner = b(&["x(); y();"], no_holes()).unwrap();
        let stmts = b(&["before(); ", " after();"], vec![Hole::Nodes(inner)]).unwrap();
        assert_eq!(stmts.len(), 4);
    }

    #[test]
    fn b_elides_falsy_statements() {
        let stmts = b(&["a++; ", " b++"], vec![Hole::Bool(false)]).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0].kind, NodeKind::ExpressionStatement { .. }));
        assert!(matches!(stmts[1].kind, NodeKind::ExpressionStatement { .. }));
    }

    #[test]
    fn b_unwraps_statement_valued_holes() {
        let ret = b(&["return 1;"], no_holes()).unwrap().remove(0);
        let stmts = b(&["f(); ", ""], vec![Hole::Node(ret)]).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[1].kind, NodeKind::ReturnStatement { .. }));
    }

    #[test]
    fn b_keeps_wrapper_for_expression_holes() {
        let stmts = b(&["", ";"], vec![Hole::Node(Node::ident("go"))]).unwrap();
        assert_eq!(stmts.len(), 1);
        let NodeKind::ExpressionStatement { expression } = &stmts[0].kind else {
            panic!("expected wrapper");
        };
        assert!(matches!(&expression.kind, NodeKind::Identifier { name } if name == "go"));
    }

    // ==================== x ====================

    #[test]
    fn x_builds_expressions() {
        let expr = x(&["a + b"], no_holes()).unwrap();
        assert!(matches!(expr.kind, NodeKind::BinaryExpression { .. }));
    }

    #[test]
    fn x_root_hole() {
        let expr = x(&["", ""], vec![Hole::Node(Node::number(7.0))]).unwrap();
        assert!(matches!(
            expr.kind,
            NodeKind::Literal {
                value: LiteralValue::Number(_),
                ..
            }
        ));
    }

    #[test]
    fn x_flattens_arrays() {
        let items = vec![
            x(&["a"], no_holes()).unwrap(),
            x(&["b"], no_holes()).unwrap(),
            x(&["c"], no_holes()).unwrap(),
        ];
        let expr = x(&["[", "]"], vec![Hole::Nodes(items)]).unwrap();
        let NodeKind::ArrayExpression { elements } = &expr.kind else {
            panic!("expected array");
        };
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn x_coerces_strings_and_numbers() {
        let expr = x(&["f(", ", ", ")"], vec![Hole::from("arg"), Hole::from(3)]).unwrap();
        let NodeKind::CallExpression { arguments, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(&arguments[0].kind, NodeKind::Identifier { name } if name == "arg"));
        assert!(matches!(
            &arguments[1].kind,
            NodeKind::Literal {
                value: LiteralValue::Number(n),
                ..
            } if *n == 3.0
        ));
    }

    #[test]
    fn x_substitutes_inside_string_literals() {
        let expr = x(&["f('hello ", "')"], vec![Hole::from("world")]).unwrap();
        let NodeKind::CallExpression { arguments, .. } = &expr.kind else {
            panic!("expected call");
        };
        match &arguments[0].kind {
            NodeKind::Literal {
                value: LiteralValue::String(s),
                raw,
            } => {
                assert_eq!(s, "hello world");
                assert!(raw.is_none());
            }
            other => panic!("expected string literal, got {}", other.type_name()),
        }
    }

    #[test]
    fn x_substitutes_inside_template_quasis() {
        let expr = x(&["`pre ", " post`"], vec![Hole::from("mid")]).unwrap();
        let NodeKind::TemplateLiteral { quasis, .. } = &expr.kind else {
            panic!("expected template literal");
        };
        let NodeKind::TemplateElement { raw, .. } = &quasis[0].kind else {
            panic!("expected quasi");
        };
        assert_eq!(raw, "pre mid post");
    }

    #[test]
    fn x_removes_falsy_properties() {
        let expr = x(&["{ a: 1, b: ", " }"], vec![Hole::Bool(false)]).unwrap();
        let NodeKind::ObjectExpression { properties } = &expr.kind else {
            panic!("expected object");
        };
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn x_removes_falsy_arguments() {
        let expr = x(&["f(a, ", ")"], vec![Hole::Null]).unwrap();
        let NodeKind::CallExpression { arguments, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert_eq!(arguments.len(), 1);
    }

    #[test]
    fn x_splices_properties() {
        let props = vec![
            p(&["a"], no_holes()).unwrap(),
            p(&["b"], no_holes()).unwrap(),
            p(&["c"], no_holes()).unwrap(),
        ];
        let expr = x(&["{", "}"], vec![Hole::Nodes(props)]).unwrap();
        let NodeKind::ObjectExpression { properties } = &expr.kind else {
            panic!("expected object");
        };
        assert_eq!(properties.len(), 3);
        for prop in properties {
            match &prop.kind {
                NodeKind::Property { shorthand, .. } => assert!(shorthand),
                other => panic!("expected property, got {}", other.type_name()),
            }
        }
    }

    #[test]
    fn x_replaces_identifier_with_member_expression() {
        let member = x(&["a.b"], no_holes()).unwrap();
        let expr = x(&["", "(1)"], vec![Hole::Node(member)]).unwrap();
        let NodeKind::CallExpression { callee, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(callee.kind, NodeKind::MemberExpression { .. }));
    }

    #[test]
    fn x_rejects_true_holes() {
        assert!(matches!(
            x(&["f(", ")"], vec![Hole::Bool(true)]),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn x_rejects_falsy_in_scalar_position() {
        assert!(matches!(
            x(&["a + ", ""], vec![Hole::Bool(false)]),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn x_surfaces_parse_errors() {
        assert!(matches!(
            x(&["this is broken"], no_holes()),
            Err(Error::Parse(_))
        ));
    }

    // ==================== p ====================

    #[test]
    fn p_builds_properties() {
        let prop = p(&["a: ", ""], vec![Hole::from(1)]).unwrap();
        let NodeKind::Property { value, .. } = &prop.kind else {
            panic!("expected property");
        };
        assert!(matches!(
            value.kind,
            NodeKind::Literal {
                value: LiteralValue::Number(_),
                ..
            }
        ));
    }

    #[test]
    fn p_root_hole_accepts_property_nodes() {
        let inner = p(&["a: 1"], no_holes()).unwrap();
        let prop = p(&["", ""], vec![Hole::Node(inner)]).unwrap();
        assert!(matches!(prop.kind, NodeKind::Property { .. }));
    }

    #[test]
    fn p_key_hole_from_string() {
        let prop = p(&["", ": 1"], vec![Hole::from("key")]).unwrap();
        let NodeKind::Property { key, .. } = &prop.kind else {
            panic!("expected property");
        };
        assert!(matches!(&key.kind, NodeKind::Identifier { name } if name == "key"));
    }
}
