//! Expression, pattern, and class-member emission.

use crate::ast::{LiteralValue, LogicalOp, MethodKind, Node, NodeKind, PropertyKind, UnaryOp};
use crate::ast::builder::fmt_number;
use crate::error::{Error, Result};

use super::precedence::{self, ASSIGNMENT, CALL_MEMBER, EXPONENT, POSTFIX, PRIMARY, SEQUENCE, UNARY};
use super::Printer;

impl Printer<'_> {
    /// Emit an expression, parenthesizing when it binds looser than `min`.
    pub(crate) fn expr(&mut self, node: &Node, min: u8) -> Result<()> {
        self.expr_paren(node, precedence::of(&node.kind) < min)
    }

    fn expr_paren(&mut self, node: &Node, parens: bool) -> Result<()> {
        self.leading_comments(node);
        if parens {
            self.word("(");
        }
        if let NodeKind::Identifier { name } = &node.kind {
            self.identifier(node, name, true)?;
        } else {
            self.map_start(node);
            self.expr_inner(node)?;
            self.map_end(node);
        }
        if parens {
            self.word(")");
        }
        self.trailing_comments(node);
        Ok(())
    }

    /// Identifier emission: the one place the sigil check and the mangling
    /// hook live. A mangled identifier records its original name in the
    /// mapping segment.
    pub(crate) fn identifier(&mut self, node: &Node, name: &str, hook: bool) -> Result<()> {
        if name.starts_with('@') || name.starts_with('#') {
            return Err(Error::UnhandledSigil(name.to_string()));
        }
        let emitted = match &self.options.get_name {
            Some(get_name) if hook => get_name(name),
            _ => name.to_string(),
        };
        if emitted != name {
            self.map_start_named(node, name);
        } else {
            self.map_start(node);
        }
        self.word(&emitted);
        self.map_end(node);
        Ok(())
    }

    /// An identifier outside hook scope: labels, non-computed keys and
    /// member properties, import/export external names.
    pub(crate) fn plain_ident(&mut self, node: &Node) -> Result<()> {
        match &node.kind {
            NodeKind::Identifier { name } => self.identifier(node, name, false),
            _ => Err(Error::UnhandledType(node.type_name().to_string())),
        }
    }

    fn expr_inner(&mut self, node: &Node) -> Result<()> {
        use NodeKind::*;
        match &node.kind {
            PrivateIdentifier { name } => {
                self.word("#");
                self.word(name);
            }
            Literal { value, raw } => match raw {
                Some(raw) => self.word(raw),
                None => self.literal_value(value),
            },
            TemplateLiteral {
                quasis,
                expressions,
            } => {
                self.word("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    if let TemplateElement { raw, .. } = &quasi.kind {
                        self.map_start(quasi);
                        self.word(raw);
                        self.map_end(quasi);
                    }
                    if let Some(expression) = expressions.get(i) {
                        self.word("${");
                        self.expr(expression, SEQUENCE)?;
                        self.word("}");
                    }
                }
                self.word("`");
            }
            TaggedTemplateExpression { tag, quasi } => {
                self.expr(tag, CALL_MEMBER)?;
                self.expr(quasi, PRIMARY)?;
            }

            ThisExpression => self.word("this"),
            Super => self.word("super"),
            MetaProperty { meta, property } => {
                self.plain_ident(meta)?;
                self.word(".");
                self.plain_ident(property)?;
            }

            ArrayExpression { elements } | ArrayPattern { elements } => {
                self.word("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.word(", ");
                    }
                    if let Some(element) = element {
                        self.expr(element, ASSIGNMENT)?;
                    }
                }
                // A trailing elision only counts with a final comma.
                if matches!(elements.last(), Some(None)) {
                    self.word(",");
                }
                self.word("]");
            }
            ObjectExpression { properties } | ObjectPattern { properties } => {
                if properties.is_empty() {
                    self.word("{}");
                } else {
                    self.word("{ ");
                    for (i, property) in properties.iter().enumerate() {
                        if i > 0 {
                            self.word(", ");
                        }
                        self.property(property)?;
                    }
                    self.word(" }");
                }
            }
            SpreadElement { argument } | RestElement { argument } => {
                self.word("...");
                self.expr(argument, ASSIGNMENT)?;
            }
            AssignmentPattern { left, right } => {
                self.expr(left, PRIMARY)?;
                self.word(" = ");
                self.expr(right, ASSIGNMENT)?;
            }

            FunctionExpression {
                id,
                params,
                body,
                is_async,
                generator,
            } => self.function(id.as_deref(), params, body, *is_async, *generator)?,
            ArrowFunctionExpression {
                params,
                body,
                is_async,
            } => {
                if *is_async {
                    self.word("async ");
                }
                self.params(params)?;
                self.word(" => ");
                match &body.kind {
                    BlockStatement { .. } => self.nested_stmt(body)?,
                    _ => {
                        let parens = starts_with_object(body);
                        self.expr_paren(
                            body,
                            parens || precedence::of(&body.kind) < ASSIGNMENT,
                        )?;
                    }
                }
            }
            ClassExpression {
                id,
                super_class,
                body,
            } => self.class(id.as_deref(), super_class.as_deref(), body)?,

            UnaryExpression { op, argument } => {
                self.word(op.as_str());
                if op.is_keyword() || sign_clash(*op, argument) {
                    self.word(" ");
                }
                self.expr(argument, UNARY)?;
            }
            UpdateExpression {
                op,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.word(op.as_str());
                    self.expr(argument, UNARY)?;
                } else {
                    self.expr(argument, POSTFIX)?;
                    self.word(op.as_str());
                }
            }
            BinaryExpression { op, left, right } => {
                let prec = precedence::binary(*op);
                let (left_min, right_min) = if prec == EXPONENT {
                    // `**` is right-associative and rejects an unparenthesized
                    // unary on its left.
                    (POSTFIX, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expr(left, left_min)?;
                self.word(" ");
                self.word(op.as_str());
                self.word(" ");
                self.expr(right, right_min)?;
            }
            LogicalExpression { op, left, right } => {
                let prec = precedence::logical(*op);
                let force_left = nullish_mix(*op, left);
                let force_right = nullish_mix(*op, right);
                self.expr_paren(left, force_left || precedence::of(&left.kind) < prec)?;
                self.word(" ");
                self.word(op.as_str());
                self.word(" ");
                self.expr_paren(right, force_right || precedence::of(&right.kind) < prec + 1)?;
            }
            AssignmentExpression { op, left, right } => {
                self.expr(left, CALL_MEMBER)?;
                self.word(" ");
                self.word(op.as_str());
                self.word(" ");
                self.expr(right, ASSIGNMENT)?;
            }
            ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, precedence::NULLISH)?;
                self.word(" ? ");
                self.expr(consequent, ASSIGNMENT)?;
                self.word(" : ");
                self.expr(alternate, ASSIGNMENT)?;
            }

            MemberExpression {
                object,
                property,
                computed,
                optional,
            } => {
                let parens =
                    precedence::of(&object.kind) < CALL_MEMBER || needs_dot_guard(object);
                self.expr_paren(object, parens)?;
                if *computed {
                    self.word(if *optional { "?.[" } else { "[" });
                    self.expr(property, SEQUENCE)?;
                    self.word("]");
                } else {
                    self.word(if *optional { "?." } else { "." });
                    match &property.kind {
                        Identifier { .. } => self.plain_ident(property)?,
                        _ => self.expr(property, PRIMARY)?,
                    }
                }
            }
            ChainExpression { expression } => self.expr(expression, CALL_MEMBER)?,
            CallExpression {
                callee,
                arguments,
                optional,
            } => {
                self.expr(callee, CALL_MEMBER)?;
                if *optional {
                    self.word("?.");
                }
                self.arguments(arguments)?;
            }
            NewExpression { callee, arguments } => {
                self.word("new ");
                let parens =
                    precedence::of(&callee.kind) < CALL_MEMBER || contains_call(callee);
                self.expr_paren(callee, parens)?;
                self.arguments(arguments)?;
            }
            ImportExpression { source, options } => {
                self.word("import(");
                self.expr(source, ASSIGNMENT)?;
                if let Some(options) = options {
                    self.word(", ");
                    self.expr(options, ASSIGNMENT)?;
                }
                self.word(")");
            }
            SequenceExpression { expressions } => {
                for (i, expression) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.word(", ");
                    }
                    self.expr(expression, ASSIGNMENT)?;
                }
            }
            YieldExpression { argument, delegate } => {
                self.word("yield");
                if *delegate {
                    self.word("*");
                }
                if let Some(argument) = argument {
                    self.word(" ");
                    self.expr(argument, ASSIGNMENT)?;
                }
            }
            AwaitExpression { argument } => {
                self.word("await ");
                self.expr(argument, UNARY)?;
            }

            ClassBody { .. } => self.class_body(node)?,

            other => return Err(Error::UnhandledType(other.type_name().to_string())),
        }
        Ok(())
    }

    fn literal_value(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::Null => self.word("null"),
            LiteralValue::Boolean(true) => self.word("true"),
            LiteralValue::Boolean(false) => self.word("false"),
            LiteralValue::Number(n) => self.word(&fmt_number(*n)),
            LiteralValue::String(s) => {
                let quoted = quote_string(s);
                self.word(&quoted);
            }
            LiteralValue::BigInt(digits) => {
                self.word(digits);
                self.word("n");
            }
            LiteralValue::RegExp { pattern, flags } => {
                self.word("/");
                self.word(pattern);
                self.word("/");
                self.word(flags);
            }
        }
    }

    // ==================== objects ====================

    pub(crate) fn property(&mut self, node: &Node) -> Result<()> {
        match &node.kind {
            NodeKind::SpreadElement { .. } | NodeKind::RestElement { .. } => {
                self.expr(node, ASSIGNMENT)
            }
            NodeKind::Property {
                key,
                value,
                kind,
                computed,
                shorthand,
                method,
            } => {
                self.leading_comments(node);
                self.map_start(node);
                match kind {
                    PropertyKind::Get | PropertyKind::Set => {
                        self.word(if matches!(kind, PropertyKind::Get) {
                            "get "
                        } else {
                            "set "
                        });
                        self.prop_key(key, *computed)?;
                        self.method_tail(value)?;
                    }
                    PropertyKind::Init if *method => {
                        self.method_head(value)?;
                        self.prop_key(key, *computed)?;
                        self.method_tail(value)?;
                    }
                    PropertyKind::Init => {
                        if *shorthand && !self.shorthand_expands(key, value) {
                            // Key and value are the same reference.
                            self.expr(value, ASSIGNMENT)?;
                        } else {
                            self.prop_key(key, *computed)?;
                            self.word(": ");
                            self.expr(value, ASSIGNMENT)?;
                        }
                    }
                }
                self.map_end(node);
                self.trailing_comments(node);
                Ok(())
            }
            other => Err(Error::UnhandledType(other.type_name().to_string())),
        }
    }

    /// A shorthand property stops being shorthand when the mangling hook
    /// renames the value reference (`{ a }` → `{ a: b }`) or when the value
    /// is an assignment pattern.
    fn shorthand_expands(&self, key: &Node, value: &Node) -> bool {
        if matches!(value.kind, NodeKind::AssignmentPattern { .. }) {
            // `{ a = 1 }` still prints from the pattern, not the key.
            return false;
        }
        match (&key.kind, &value.kind, &self.options.get_name) {
            (
                NodeKind::Identifier { name: key_name },
                NodeKind::Identifier { name: value_name },
                Some(get_name),
            ) => get_name(value_name) != *key_name,
            (
                NodeKind::Identifier { name: key_name },
                NodeKind::Identifier { name: value_name },
                None,
            ) => key_name != value_name,
            _ => true,
        }
    }

    fn prop_key(&mut self, key: &Node, computed: bool) -> Result<()> {
        if computed {
            self.word("[");
            self.expr(key, ASSIGNMENT)?;
            self.word("]");
            return Ok(());
        }
        match &key.kind {
            NodeKind::Identifier { .. } => self.plain_ident(key),
            _ => self.expr(key, PRIMARY),
        }
    }

    // ==================== functions and classes ====================

    pub(crate) fn function(
        &mut self,
        id: Option<&Node>,
        params: &[Node],
        body: &Node,
        is_async: bool,
        generator: bool,
    ) -> Result<()> {
        if is_async {
            self.word("async ");
        }
        self.word("function");
        if generator {
            self.word("*");
        }
        if let Some(id) = id {
            self.word(" ");
            self.expr(id, PRIMARY)?;
        }
        self.params(params)?;
        self.word(" ");
        self.nested_stmt(body)
    }

    pub(crate) fn params(&mut self, params: &[Node]) -> Result<()> {
        self.word("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.expr(param, ASSIGNMENT)?;
        }
        self.word(")");
        Ok(())
    }

    pub(crate) fn class(
        &mut self,
        id: Option<&Node>,
        super_class: Option<&Node>,
        body: &Node,
    ) -> Result<()> {
        self.word("class");
        if let Some(id) = id {
            self.word(" ");
            self.expr(id, PRIMARY)?;
        }
        if let Some(super_class) = super_class {
            self.word(" extends ");
            self.expr(super_class, CALL_MEMBER)?;
        }
        self.word(" ");
        self.class_body(body)
    }

    fn class_body(&mut self, node: &Node) -> Result<()> {
        let NodeKind::ClassBody { body } = &node.kind else {
            return Err(Error::UnhandledType(node.type_name().to_string()));
        };
        if body.is_empty() {
            self.word("{}");
            return Ok(());
        }
        self.word("{");
        self.indent += 1;
        for member in body {
            self.newline();
            self.class_member(member)?;
        }
        self.indent -= 1;
        self.newline();
        self.word("}");
        Ok(())
    }

    fn class_member(&mut self, node: &Node) -> Result<()> {
        self.leading_comments(node);
        self.map_start(node);
        match &node.kind {
            NodeKind::MethodDefinition {
                key,
                value,
                kind,
                computed,
                is_static,
            } => {
                if *is_static {
                    self.word("static ");
                }
                match kind {
                    MethodKind::Get => self.word("get "),
                    MethodKind::Set => self.word("set "),
                    MethodKind::Constructor => {}
                    MethodKind::Method => self.method_head(value)?,
                }
                self.prop_key(key, *computed)?;
                self.method_tail(value)?;
            }
            NodeKind::PropertyDefinition {
                key,
                value,
                computed,
                is_static,
            } => {
                if *is_static {
                    self.word("static ");
                }
                self.prop_key(key, *computed)?;
                if let Some(value) = value {
                    self.word(" = ");
                    self.expr(value, ASSIGNMENT)?;
                }
                self.word(";");
            }
            NodeKind::StaticBlock { body } => {
                self.word("static ");
                self.block(body)?;
            }
            other => return Err(Error::UnhandledType(other.type_name().to_string())),
        }
        self.map_end(node);
        self.trailing_comments(node);
        Ok(())
    }

    /// `async `/`*` prefixes of a method, read off its function value.
    fn method_head(&mut self, value: &Node) -> Result<()> {
        if let NodeKind::FunctionExpression {
            is_async,
            generator,
            ..
        } = &value.kind
        {
            if *is_async {
                self.word("async ");
            }
            if *generator {
                self.word("*");
            }
        }
        Ok(())
    }

    /// Parameter list and body of a method, read off its function value.
    fn method_tail(&mut self, value: &Node) -> Result<()> {
        let NodeKind::FunctionExpression { params, body, .. } = &value.kind else {
            return Err(Error::UnhandledType(value.type_name().to_string()));
        };
        self.params(params)?;
        self.word(" ");
        self.nested_stmt(body)
    }

    pub(crate) fn arguments(&mut self, arguments: &[Node]) -> Result<()> {
        self.word("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.expr(argument, ASSIGNMENT)?;
        }
        self.word(")");
        Ok(())
    }
}

// ==================== shape checks ====================

fn nullish_mix(parent: LogicalOp, child: &Node) -> bool {
    use LogicalOp::*;
    let NodeKind::LogicalExpression { op: child_op, .. } = &child.kind else {
        return false;
    };
    matches!(
        (parent, child_op),
        (NullishCoalescing, Or)
            | (NullishCoalescing, And)
            | (Or, NullishCoalescing)
            | (And, NullishCoalescing)
    )
}

/// `- -x` and `+ +x` need the space; without it the signs merge into an
/// update operator.
fn sign_clash(op: UnaryOp, argument: &Node) -> bool {
    let leading = match &argument.kind {
        NodeKind::UnaryExpression { op, .. } => Some(op.as_str().as_bytes()[0]),
        NodeKind::UpdateExpression { prefix: true, op, .. } => Some(op.as_str().as_bytes()[0]),
        _ => None,
    };
    match (op, leading) {
        (UnaryOp::Minus, Some(b'-')) | (UnaryOp::Plus, Some(b'+')) => true,
        _ => false,
    }
}

/// An integer literal before `.` would read as a decimal point.
fn needs_dot_guard(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Literal {
            value: LiteralValue::Number(n),
            raw,
        } => match raw {
            Some(raw) => raw.bytes().all(|b| b.is_ascii_digit()),
            None => n.fract() == 0.0,
        },
        _ => false,
    }
}

/// A `new` callee containing a call must be parenthesized so the arguments
/// do not rebind.
fn contains_call(node: &Node) -> bool {
    match &node.kind {
        NodeKind::CallExpression { .. }
        | NodeKind::ImportExpression { .. }
        | NodeKind::ChainExpression { .. }
        | NodeKind::TaggedTemplateExpression { .. } => true,
        NodeKind::MemberExpression { object, .. } => contains_call(object),
        _ => false,
    }
}

/// Concise arrow bodies starting with `{` need parens to stay expressions.
fn starts_with_object(node: &Node) -> bool {
    match &node.kind {
        NodeKind::ObjectExpression { .. } | NodeKind::ObjectPattern { .. } => true,
        NodeKind::BinaryExpression { left, .. }
        | NodeKind::LogicalExpression { left, .. }
        | NodeKind::AssignmentExpression { left, .. } => starts_with_object(left),
        NodeKind::MemberExpression { object, .. } => starts_with_object(object),
        NodeKind::CallExpression { callee, .. } => starts_with_object(callee),
        NodeKind::ConditionalExpression { test, .. } => starts_with_object(test),
        NodeKind::SequenceExpression { expressions } => {
            expressions.first().is_some_and(starts_with_object)
        }
        _ => false,
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_with_single_quotes_and_escapes() {
        assert_eq!(quote_string("it's"), "'it\\'s'");
        assert_eq!(quote_string("a\nb"), "'a\\nb'");
        assert_eq!(quote_string("\u{1}"), "'\\x01'");
    }

    #[test]
    fn dot_guard_on_integer_literals() {
        assert!(needs_dot_guard(&Node::number(5.0)));
        assert!(!needs_dot_guard(&Node::number(5.5)));
        assert!(!needs_dot_guard(&Node::ident("x")));
    }
}
