//! codegraft: programmatic construction and printing of JavaScript ASTs.
//!
//! Code-generation tools assemble ESTree-shaped fragments from source-like
//! templates with holes, compose them, and print the result back to formatted
//! source text together with a source map tying embedded nodes to their
//! original locations.
//!
//! # Templates
//!
//! A template is a sequence of source chunks around hole values. [`b`] builds
//! a statement list, [`x`] a single expression, [`p`] a single object
//! property:
//!
//! ```
//! use codegraft::{b, x, Hole};
//!
//! let answer = codegraft::ast::Node::number(42.0);
//! let expr = x(&["console.log(", ")"], vec![Hole::from(answer)]).unwrap();
//! let stmts = b(&["const result = ", ";"], vec![Hole::from(expr)]).unwrap();
//! assert_eq!(stmts.len(), 1);
//! ```
//!
//! Hole values coerce by position: nodes graft verbatim, strings become
//! identifiers (or literal text inside quotes), numbers become literals,
//! arrays splice into list positions, and `false`/`Null` remove the enclosing
//! element.
//!
//! # Printing
//!
//! [`print`] walks a fragment and emits code plus a Source Map Revision 3
//! document. Nodes carrying `loc` metadata contribute mapping segments; a
//! `get_name` hook can mangle binding identifiers, with original names
//! recorded in the map.
//!
//! Identifiers starting with `@` or `#` are sigils: they parse and build
//! freely but [`print`] rejects any that survive, since they are a contract
//! with an external rewriter.

pub mod ast;
mod error;
mod parse;
mod print;
mod template;

pub use error::{Error, Result};
pub use parse::{parse, parse_expression, ParseOptions};
pub use print::{print, print_block, Mappings, PrintOptions, Printed, SourceMap};
pub use template::{b, p, x, Hole};
