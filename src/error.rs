//! Error types for template construction and printing.

use thiserror::Error;

/// All errors produced by the builder and the printer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A stitched template (or caller-supplied source) failed to parse.
    /// Carries the underlying parser message.
    #[error("{0}")]
    Parse(String),

    /// A hole value cannot be used in the position it landed in.
    #[error("{0}")]
    Template(String),

    /// The printer reached an identifier still carrying a `@`/`#` sigil.
    /// Sigils are a contract with an external rewriter and must be gone
    /// by print time.
    #[error("Unhandled sigil {0}")]
    UnhandledSigil(String),

    /// The printer reached a node it has no emitter for.
    #[error("Unhandled type {0}")]
    UnhandledType(String),
}

/// Convenient `Result` alias for fallible builder and printer operations.
pub type Result<T> = std::result::Result<T, Error>;
