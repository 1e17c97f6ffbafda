//! The printer: AST to source text plus source map.
//!
//! A recursive-descent emitter over the ESTree variants. Statement lists are
//! laid out one per line, block bodies indent by one hard tab, and expression
//! parenthesization is derived from the precedence table rather than
//! remembered from source. Every node carrying `loc` metadata contributes
//! mapping segments on entry and exit.

mod expr;
mod precedence;
mod sourcemap;

pub use sourcemap::{Mappings, SourceMap};

use crate::ast::{Node, NodeKind, VariableKind};
use crate::error::{Error, Result};
use sourcemap::MappingEmitter;

/// Options accepted by [`print`].
pub struct PrintOptions {
    /// File name recorded as `sources[0]`; without it the map carries
    /// generated-only segments and an empty `sources`.
    pub source_map_source: Option<String>,
    /// Original source text stored verbatim in `sourcesContent[0]`.
    pub source_map_content: Option<String>,
    /// VLQ-encode `mappings` (the default) or leave the decoded arrays.
    pub source_map_encode_mappings: bool,
    /// Name-mangling hook applied to binding and reference identifiers. When
    /// the result differs from the original, the mapping records the
    /// original name.
    pub get_name: Option<Box<dyn Fn(&str) -> String>>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            source_map_source: None,
            source_map_content: None,
            source_map_encode_mappings: true,
            get_name: None,
        }
    }
}

/// The result of [`print`]: generated code and its source map.
#[derive(Debug)]
pub struct Printed {
    pub code: String,
    pub map: SourceMap,
}

/// Print a single node (program, statement, expression, or property).
pub fn print(node: &Node, options: &PrintOptions) -> Result<Printed> {
    let mut printer = Printer::new(options);
    printer.root(node)?;
    Ok(printer.finish(options))
}

/// Print a statement list, as returned by a block template.
pub fn print_block(statements: &[Node], options: &PrintOptions) -> Result<Printed> {
    let mut printer = Printer::new(options);
    printer.stmt_list(statements)?;
    Ok(printer.finish(options))
}

pub(crate) struct Printer<'a> {
    out: String,
    /// Generated position, 0-based, columns in UTF-16 code units.
    line: u32,
    col: u32,
    indent: usize,
    map: MappingEmitter,
    options: &'a PrintOptions,
}

impl<'a> Printer<'a> {
    fn new(options: &'a PrintOptions) -> Self {
        Self {
            out: String::with_capacity(256),
            line: 0,
            col: 0,
            indent: 0,
            map: MappingEmitter::new(options.source_map_source.is_some()),
            options,
        }
    }

    fn finish(self, options: &PrintOptions) -> Printed {
        let (names, mappings) = self.map.into_parts(options.source_map_encode_mappings);
        let map = SourceMap {
            version: 3,
            sources: options.source_map_source.iter().cloned().collect(),
            sources_content: options.source_map_content.iter().cloned().collect(),
            names,
            mappings,
        };
        Printed {
            code: self.out,
            map,
        }
    }

    fn root(&mut self, node: &Node) -> Result<()> {
        match &node.kind {
            NodeKind::Program { body } => self.stmt_list(body),
            NodeKind::Property { .. } => self.property(node),
            _ if node.is_statement() => self.stmt(node),
            _ => self.expr(node, precedence::SEQUENCE),
        }
    }

    // ==================== writer ====================

    pub(crate) fn word(&mut self, s: &str) {
        if let Some(last_newline) = s.rfind('\n') {
            self.line += s.bytes().filter(|&b| b == b'\n').count() as u32;
            self.col = s[last_newline + 1..].encode_utf16().count() as u32;
        } else {
            self.col += s.encode_utf16().count() as u32;
        }
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
        self.col = 0;
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.col = self.indent as u32;
    }

    // ==================== mappings ====================

    pub(crate) fn map_start(&mut self, node: &Node) {
        if let Some(loc) = &node.loc {
            self.map.add(self.line, self.col, loc.start, None);
        }
    }

    pub(crate) fn map_start_named(&mut self, node: &Node, name: &str) {
        if let Some(loc) = &node.loc {
            self.map.add(self.line, self.col, loc.start, Some(name));
        }
    }

    pub(crate) fn map_end(&mut self, node: &Node) {
        if let Some(loc) = &node.loc {
            self.map.add(self.line, self.col, loc.end, None);
        }
    }

    // ==================== comments ====================

    pub(crate) fn leading_comments(&mut self, node: &Node) {
        for comment in &node.leading_comments {
            if comment.block && !comment.text.contains('\n') {
                self.word("/*");
                self.word(&comment.text);
                self.word("*/ ");
            } else if comment.block {
                self.word("/*");
                self.word(&comment.text);
                self.word("*/");
                self.newline();
            } else {
                self.word("//");
                self.word(&comment.text);
                self.newline();
            }
        }
    }

    pub(crate) fn trailing_comments(&mut self, node: &Node) {
        for comment in &node.trailing_comments {
            if comment.block {
                self.word(" /*");
                self.word(&comment.text);
                self.word("*/");
            } else {
                self.word(" //");
                self.word(&comment.text);
            }
        }
    }

    // ==================== statements ====================

    pub(crate) fn stmt_list(&mut self, statements: &[Node]) -> Result<()> {
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.stmt(statement)?;
        }
        Ok(())
    }

    pub(crate) fn stmt(&mut self, node: &Node) -> Result<()> {
        self.leading_comments(node);
        self.map_start(node);
        self.stmt_inner(node)?;
        self.map_end(node);
        self.trailing_comments(node);
        Ok(())
    }

    fn stmt_inner(&mut self, node: &Node) -> Result<()> {
        use NodeKind::*;
        match &node.kind {
            ExpressionStatement { expression } => {
                if forbidden_stmt_start(expression) {
                    self.word("(");
                    self.expr(expression, precedence::SEQUENCE)?;
                    self.word(")");
                } else {
                    self.expr(expression, precedence::SEQUENCE)?;
                }
                self.word(";");
            }
            BlockStatement { body } => self.block(body)?,
            EmptyStatement => self.word(";"),
            DebuggerStatement => self.word("debugger;"),
            WithStatement { object, body } => {
                self.word("with (");
                self.expr(object, precedence::SEQUENCE)?;
                self.word(") ");
                self.nested_stmt(body)?;
            }
            ReturnStatement { argument } => {
                self.word("return");
                if let Some(argument) = argument {
                    self.word(" ");
                    self.expr(argument, precedence::SEQUENCE)?;
                }
                self.word(";");
            }
            LabeledStatement { label, body } => {
                self.plain_ident(label)?;
                self.word(": ");
                self.stmt(body)?;
            }
            BreakStatement { label } => {
                self.word("break");
                if let Some(label) = label {
                    self.word(" ");
                    self.plain_ident(label)?;
                }
                self.word(";");
            }
            ContinueStatement { label } => {
                self.word("continue");
                if let Some(label) = label {
                    self.word(" ");
                    self.plain_ident(label)?;
                }
                self.word(";");
            }
            IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.word("if (");
                self.expr(test, precedence::SEQUENCE)?;
                self.word(") ");
                self.nested_stmt(consequent)?;
                if let Some(alternate) = alternate {
                    self.word(" else ");
                    self.nested_stmt(alternate)?;
                }
            }
            SwitchStatement {
                discriminant,
                cases,
            } => {
                self.word("switch (");
                self.expr(discriminant, precedence::SEQUENCE)?;
                self.word(") {");
                self.indent += 1;
                for case in cases {
                    self.newline();
                    self.switch_case(case)?;
                }
                self.indent -= 1;
                self.newline();
                self.word("}");
            }
            ThrowStatement { argument } => {
                self.word("throw ");
                self.expr(argument, precedence::SEQUENCE)?;
                self.word(";");
            }
            TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.word("try ");
                self.nested_stmt(block)?;
                if let Some(handler) = handler {
                    self.catch_clause(handler)?;
                }
                if let Some(finalizer) = finalizer {
                    self.word(" finally ");
                    self.nested_stmt(finalizer)?;
                }
            }
            WhileStatement { test, body } => {
                self.word("while (");
                self.expr(test, precedence::SEQUENCE)?;
                self.word(") ");
                self.nested_stmt(body)?;
            }
            DoWhileStatement { body, test } => {
                self.word("do ");
                self.nested_stmt(body)?;
                self.word(" while (");
                self.expr(test, precedence::SEQUENCE)?;
                self.word(");");
            }
            ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.word("for (");
                if let Some(init) = init {
                    match &init.kind {
                        VariableDeclaration { .. } => self.variable_declaration(init, false)?,
                        _ => self.expr(init, precedence::SEQUENCE)?,
                    }
                }
                self.word("; ");
                if let Some(test) = test {
                    self.expr(test, precedence::SEQUENCE)?;
                }
                self.word("; ");
                if let Some(update) = update {
                    self.expr(update, precedence::SEQUENCE)?;
                }
                self.word(") ");
                self.nested_stmt(body)?;
            }
            ForInStatement { left, right, body } => {
                self.word("for (");
                self.for_head(left)?;
                self.word(" in ");
                self.expr(right, precedence::ASSIGNMENT)?;
                self.word(") ");
                self.nested_stmt(body)?;
            }
            ForOfStatement {
                left,
                right,
                body,
                is_await,
            } => {
                self.word(if *is_await { "for await (" } else { "for (" });
                self.for_head(left)?;
                self.word(" of ");
                self.expr(right, precedence::ASSIGNMENT)?;
                self.word(") ");
                self.nested_stmt(body)?;
            }
            VariableDeclaration { .. } => self.variable_declaration(node, true)?,
            FunctionDeclaration {
                id,
                params,
                body,
                is_async,
                generator,
            } => self.function(id.as_deref(), params, body, *is_async, *generator)?,
            ClassDeclaration {
                id,
                super_class,
                body,
            } => self.class(id.as_deref(), super_class.as_deref(), body)?,

            ImportDeclaration { specifiers, source } => self.import_decl(specifiers, source)?,
            ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                self.word("export ");
                if let Some(declaration) = declaration {
                    self.stmt(declaration)?;
                } else {
                    if specifiers.is_empty() {
                        self.word("{}");
                    } else {
                        self.word("{ ");
                        for (i, spec) in specifiers.iter().enumerate() {
                            if i > 0 {
                                self.word(", ");
                            }
                            self.export_specifier(spec)?;
                        }
                        self.word(" }");
                    }
                    if let Some(source) = source {
                        self.word(" from ");
                        self.expr(source, precedence::PRIMARY)?;
                    }
                    self.word(";");
                }
            }
            ExportDefaultDeclaration { declaration } => {
                self.word("export default ");
                match &declaration.kind {
                    FunctionDeclaration { .. } | ClassDeclaration { .. } => {
                        self.stmt(declaration)?
                    }
                    _ => {
                        self.expr(declaration, precedence::ASSIGNMENT)?;
                        self.word(";");
                    }
                }
            }
            ExportAllDeclaration { source, exported } => {
                self.word("export *");
                if let Some(exported) = exported {
                    self.word(" as ");
                    self.module_name(exported)?;
                }
                self.word(" from ");
                self.expr(source, precedence::PRIMARY)?;
                self.word(";");
            }

            // Anything expression-shaped in statement position prints as an
            // expression statement.
            _ => {
                self.expr(node, precedence::SEQUENCE)?;
                self.word(";");
            }
        }
        Ok(())
    }

    pub(crate) fn block(&mut self, body: &[Node]) -> Result<()> {
        if body.is_empty() {
            self.word("{}");
            return Ok(());
        }
        self.word("{");
        self.indent += 1;
        for statement in body {
            self.newline();
            self.stmt(statement)?;
        }
        self.indent -= 1;
        self.newline();
        self.word("}");
        Ok(())
    }

    /// A statement in `if`/loop body position: blocks open on the same line,
    /// single statements stay inline.
    fn nested_stmt(&mut self, body: &Node) -> Result<()> {
        match &body.kind {
            NodeKind::BlockStatement { body: stmts } => {
                self.leading_comments(body);
                self.map_start(body);
                self.block(stmts)?;
                self.map_end(body);
                self.trailing_comments(body);
                Ok(())
            }
            _ => self.stmt(body),
        }
    }

    fn switch_case(&mut self, node: &Node) -> Result<()> {
        let NodeKind::SwitchCase { test, consequent } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        self.leading_comments(node);
        self.map_start(node);
        match test {
            Some(test) => {
                self.word("case ");
                self.expr(test, precedence::SEQUENCE)?;
                self.word(":");
            }
            None => self.word("default:"),
        }
        self.indent += 1;
        for statement in consequent {
            self.newline();
            self.stmt(statement)?;
        }
        self.indent -= 1;
        self.map_end(node);
        self.trailing_comments(node);
        Ok(())
    }

    fn catch_clause(&mut self, node: &Node) -> Result<()> {
        let NodeKind::CatchClause { param, body } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        self.leading_comments(node);
        match param {
            Some(param) => {
                self.word(" catch (");
                self.expr(param, precedence::SEQUENCE)?;
                self.word(") ");
            }
            None => self.word(" catch "),
        }
        self.nested_stmt(body)
    }

    fn for_head(&mut self, left: &Node) -> Result<()> {
        match &left.kind {
            NodeKind::VariableDeclaration { .. } => self.variable_declaration(left, false),
            _ => self.expr(left, precedence::ASSIGNMENT),
        }
    }

    fn variable_declaration(&mut self, node: &Node, semi: bool) -> Result<()> {
        let NodeKind::VariableDeclaration { kind, declarations } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        self.keyword(*kind);
        for (i, declarator) in declarations.iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.declarator(declarator)?;
        }
        if semi {
            self.word(";");
        }
        Ok(())
    }

    fn keyword(&mut self, kind: VariableKind) {
        self.word(kind.as_str());
        self.word(" ");
    }

    fn declarator(&mut self, node: &Node) -> Result<()> {
        let NodeKind::VariableDeclarator { id, init } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        self.leading_comments(node);
        self.map_start(node);
        self.expr(id, precedence::ASSIGNMENT)?;
        if let Some(init) = init {
            self.word(" = ");
            self.expr(init, precedence::ASSIGNMENT)?;
        }
        self.map_end(node);
        self.trailing_comments(node);
        Ok(())
    }

    // ==================== modules ====================

    fn import_decl(&mut self, specifiers: &[Node], source: &Node) -> Result<()> {
        self.word("import ");
        if specifiers.is_empty() {
            self.expr(source, precedence::PRIMARY)?;
            self.word(";");
            return Ok(());
        }
        let mut first = true;
        let mut named_open = false;
        for spec in specifiers {
            match &spec.kind {
                NodeKind::ImportDefaultSpecifier { local } => {
                    if !first {
                        self.word(", ");
                    }
                    self.binding_ident(local)?;
                    first = false;
                }
                NodeKind::ImportNamespaceSpecifier { local } => {
                    if !first {
                        self.word(", ");
                    }
                    self.word("* as ");
                    self.binding_ident(local)?;
                    first = false;
                }
                NodeKind::ImportSpecifier { imported, local } => {
                    if named_open {
                        self.word(", ");
                    } else {
                        if !first {
                            self.word(", ");
                        }
                        self.word("{ ");
                        named_open = true;
                    }
                    self.module_name(imported)?;
                    if !same_name(imported, local) {
                        self.word(" as ");
                        self.binding_ident(local)?;
                    }
                    first = false;
                }
                _ => return Err(Error::UnhandledType(spec.type_name().to_string())),
            }
        }
        if named_open {
            self.word(" }");
        }
        self.word(" from ");
        self.expr(source, precedence::PRIMARY)?;
        self.word(";");
        Ok(())
    }

    fn export_specifier(&mut self, node: &Node) -> Result<()> {
        let NodeKind::ExportSpecifier { local, exported } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        self.module_name(local)?;
        if !same_name(local, exported) {
            self.word(" as ");
            self.module_name(exported)?;
        }
        Ok(())
    }

    /// An import/export name: an identifier (no mangling hook) or a string
    /// literal.
    fn module_name(&mut self, node: &Node) -> Result<()> {
        match &node.kind {
            NodeKind::Identifier { .. } => self.plain_ident(node),
            _ => self.expr(node, precedence::PRIMARY),
        }
    }

    /// A local binding introduced by an import; the mangling hook applies.
    fn binding_ident(&mut self, node: &Node) -> Result<()> {
        self.expr(node, precedence::PRIMARY)
    }
}

/// Expressions that would be misparsed at the start of a statement.
fn forbidden_stmt_start(node: &Node) -> bool {
    use NodeKind::*;
    match &node.kind {
        ObjectExpression { .. } | ObjectPattern { .. } | FunctionExpression { .. }
        | ClassExpression { .. } => true,
        BinaryExpression { left, .. }
        | LogicalExpression { left, .. }
        | AssignmentExpression { left, .. } => forbidden_stmt_start(left),
        MemberExpression { object, .. } => forbidden_stmt_start(object),
        CallExpression { callee, .. } => forbidden_stmt_start(callee),
        TaggedTemplateExpression { tag, .. } => forbidden_stmt_start(tag),
        ConditionalExpression { test, .. } => forbidden_stmt_start(test),
        SequenceExpression { expressions } => {
            expressions.first().is_some_and(forbidden_stmt_start)
        }
        UpdateExpression {
            prefix: false,
            argument,
            ..
        } => forbidden_stmt_start(argument),
        ChainExpression { expression } => forbidden_stmt_start(expression),
        _ => false,
    }
}

fn same_name(a: &Node, b: &Node) -> bool {
    match (&a.kind, &b.kind) {
        (NodeKind::Identifier { name: an }, NodeKind::Identifier { name: bn }) => an == bn,
        _ => false,
    }
}
