//! Hole values: what a template interpolation point accepts.

use crate::ast::Node;

/// A value supplied for a template hole. Coercion to a node is directed by
/// the position the hole's placeholder lands in after parsing.
#[derive(Debug, Clone)]
pub enum Hole {
    /// A node grafted in verbatim.
    Node(Node),
    /// A node list spliced into the enclosing list position.
    Nodes(Vec<Node>),
    /// Becomes an `Identifier` in identifier positions and literal text in
    /// string positions.
    Str(String),
    /// Becomes a numeric `Literal`.
    Num(f64),
    /// Only `false` has a meaning: it elides the enclosing element.
    Bool(bool),
    /// Elides the enclosing element.
    Null,
}

impl Hole {
    /// `false` and `Null` holes remove the element that contains them.
    pub(crate) fn is_elision(&self) -> bool {
        matches!(self, Hole::Bool(false) | Hole::Null)
    }
}

impl From<Node> for Hole {
    fn from(node: Node) -> Self {
        Hole::Node(node)
    }
}

impl From<Vec<Node>> for Hole {
    fn from(nodes: Vec<Node>) -> Self {
        Hole::Nodes(nodes)
    }
}

impl From<&str> for Hole {
    fn from(s: &str) -> Self {
        Hole::Str(s.to_string())
    }
}

impl From<String> for Hole {
    fn from(s: String) -> Self {
        Hole::Str(s)
    }
}

impl From<f64> for Hole {
    fn from(n: f64) -> Self {
        Hole::Num(n)
    }
}

impl From<i32> for Hole {
    fn from(n: i32) -> Self {
        Hole::Num(n as f64)
    }
}

impl From<i64> for Hole {
    fn from(n: i64) -> Self {
        Hole::Num(n as f64)
    }
}

impl From<u32> for Hole {
    fn from(n: u32) -> Self {
        Hole::Num(n as f64)
    }
}

impl From<bool> for Hole {
    fn from(b: bool) -> Self {
        Hole::Bool(b)
    }
}

impl<T: Into<Hole>> From<Option<T>> for Hole {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Hole::Null,
        }
    }
}
