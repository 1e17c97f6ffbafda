//! Parser adapter.
//!
//! A thin front-end over swc's ECMAScript parser. Three modes feed the three
//! template entry points: a statement list (parsed as a module), a single
//! expression (parsed wrapped as `( … );` so trailing tokens fail instead of
//! being silently dropped), and a single object property (wrapped in
//! `({ … });` and unwrapped). Sigil identifiers are tunneled through the
//! parser as ordinary identifiers and restored during lowering.

pub(crate) mod lower;
pub(crate) mod sigil;

use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap};
use swc_core::ecma::ast::{self as swc, EsVersion};
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::ast::Node;
use crate::error::{Error, Result};
use lower::LowerCtx;

/// Options for the public parse entry points.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Attach `loc` metadata resolved from the parsed text. The template
    /// engine parses with this off so stitched placeholder sources never leak
    /// into emitted source maps.
    pub locations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { locations: true }
    }
}

/// Parse a whole program (module goal). Returns a `Program` node.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node> {
    let body = parse_statements(source, options.locations)?;
    Ok(Node::program(body))
}

/// Parse a single expression.
pub fn parse_expression(source: &str, options: &ParseOptions) -> Result<Node> {
    parse_expr_mode(source, options.locations)
}

pub(crate) fn parse_statements(source: &str, locations: bool) -> Result<Vec<Node>> {
    let tunneled = sigil::tunnel(source);
    run(&tunneled, locations, 0, |cx, module| {
        cx.module_items(&module.body)
    })
}

pub(crate) fn parse_expr_mode(source: &str, locations: bool) -> Result<Node> {
    let tunneled = sigil::tunnel(source);
    // The parens keep object literals in expression position and make any
    // trailing tokens a hard error; the newline keeps a final line comment
    // from eating the wrapper. Lowering subtracts the one-column shift.
    let wrapped = format!("({tunneled}\n);");
    run(&wrapped, locations, 1, |cx, module| {
        let inner = sole_wrapped_expr(&module)?;
        cx.expr(inner)
    })
}

/// Parse a single object property by wrapping the input in a parenthesized
/// object literal and extracting its sole property.
pub(crate) fn parse_property(source: &str, locations: bool) -> Result<Node> {
    let tunneled = sigil::tunnel(source);
    let wrapped = format!("({{ {tunneled}\n }});");
    run(&wrapped, locations, 3, |cx, module| {
        let inner = sole_wrapped_expr(&module)?;
        let swc::Expr::Object(obj) = inner else {
            return Err(Error::Parse("expected an object property".into()));
        };
        match obj.props.as_slice() {
            [prop] => cx.prop(prop),
            [] => Err(Error::Parse("expected a property, found none".into())),
            _ => Err(Error::Parse("expected a single property".into())),
        }
    })
}

/// Unwrap the `( … );` wrapper the expression and property modes add.
fn sole_wrapped_expr(module: &swc::Module) -> Result<&swc::Expr> {
    let [swc::ModuleItem::Stmt(swc::Stmt::Expr(stmt))] = module.body.as_slice() else {
        return Err(Error::Parse("expected a single expression".into()));
    };
    let swc::Expr::Paren(paren) = &*stmt.expr else {
        return Err(Error::Parse("expected a single expression".into()));
    };
    Ok(&paren.expr)
}

fn run<R>(
    source: &str,
    locations: bool,
    line1_col_shift: u32,
    finish: impl FnOnce(&LowerCtx, swc::Module) -> Result<R>,
) -> Result<R> {
    let cm: Lrc<SourceMap> = Lrc::new(SourceMap::default());
    let fm = cm.new_source_file(FileName::Anon.into(), source.to_string());
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::Es2022,
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|err| Error::Parse(err.kind().msg().to_string()))?;
    // Recoverable diagnostics still mean the input is not the program the
    // caller wrote; fail rather than build from a guessed tree.
    if let Some(err) = parser.take_errors().into_iter().next() {
        return Err(Error::Parse(err.kind().msg().to_string()));
    }

    let cx = LowerCtx::new(&cm, &comments, locations, line1_col_shift);
    finish(&cx, module)
}
