//! Shorthand constructors for hand-assembled fragments.
//!
//! Templates cover most construction; these helpers exist for the cases where
//! a caller (or a test) builds a node directly, e.g. a located literal that a
//! template hole will graft in.

use super::{LiteralValue, Node, NodeKind};

impl Node {
    /// An `Identifier` node.
    pub fn ident(name: impl Into<String>) -> Self {
        Node::new(NodeKind::Identifier { name: name.into() })
    }

    /// A numeric `Literal` with a canonical `raw`.
    pub fn number(value: f64) -> Self {
        let raw = fmt_number(value);
        Node::new(NodeKind::Literal {
            value: LiteralValue::Number(value),
            raw: Some(raw),
        })
    }

    /// A string `Literal` without `raw`; the printer quotes it canonically.
    pub fn string(value: impl Into<String>) -> Self {
        Node::new(NodeKind::Literal {
            value: LiteralValue::String(value.into()),
            raw: None,
        })
    }

    /// A boolean `Literal`.
    pub fn bool(value: bool) -> Self {
        Node::new(NodeKind::Literal {
            value: LiteralValue::Boolean(value),
            raw: Some(if value { "true".into() } else { "false".into() }),
        })
    }

    /// The `null` literal.
    pub fn null() -> Self {
        Node::new(NodeKind::Literal {
            value: LiteralValue::Null,
            raw: Some("null".into()),
        })
    }

    /// A `Literal` with an explicit `raw` spelling, emitted verbatim.
    pub fn literal(value: LiteralValue, raw: impl Into<String>) -> Self {
        Node::new(NodeKind::Literal {
            value,
            raw: Some(raw.into()),
        })
    }

    /// Wrap a statement list in a `Program`, the shape `print` expects for
    /// block fragments.
    pub fn program(body: Vec<Node>) -> Self {
        Node::new(NodeKind::Program { body })
    }

    /// Wrap an expression in an `ExpressionStatement`.
    pub fn statement(expression: Node) -> Self {
        Node::new(NodeKind::ExpressionStatement {
            expression: Box::new(expression),
        })
    }
}

/// Shortest-roundtrip-ish decimal form; integers print without a fraction.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_raw_is_integer_for_whole_values() {
        let n = Node::number(42.0);
        match n.kind {
            NodeKind::Literal { raw, .. } => assert_eq!(raw.as_deref(), Some("42")),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn number_raw_keeps_fraction() {
        let n = Node::number(1.5);
        match n.kind {
            NodeKind::Literal { raw, .. } => assert_eq!(raw.as_deref(), Some("1.5")),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn sigil_detection() {
        assert!(Node::ident("@foo").is_sigil());
        assert!(Node::ident("#bar").is_sigil());
        assert!(!Node::ident("baz").is_sigil());
    }
}
