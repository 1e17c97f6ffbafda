//! Post-parse placeholder substitution.
//!
//! The stitched source parses with one placeholder identifier per hole; this
//! walk finds each placeholder *through its parent's field* so that holes can
//! splice arrays, remove the element enclosing a falsy hole, and swap nodes in
//! for identifiers. Replacement subtrees are grafted as-is and not re-walked.

use crate::ast::builder::fmt_number;
use crate::ast::{LiteralValue, Node, NodeKind, PropertyKind};
use crate::error::{Error, Result};

use super::{Hole, HOLE_PREFIX, placeholder_index};

pub(crate) struct Substituter {
    holes: Vec<Option<Hole>>,
}

impl Substituter {
    pub(crate) fn new(holes: Vec<Hole>) -> Self {
        Self {
            holes: holes.into_iter().map(Some).collect(),
        }
    }

    /// Every hole must have been consumed by the walk.
    pub(crate) fn finish(self) -> Result<()> {
        for (i, hole) in self.holes.iter().enumerate() {
            if hole.is_some() {
                return Err(Error::Template(format!(
                    "hole {i} was not reached by substitution"
                )));
            }
        }
        Ok(())
    }

    fn take(&mut self, idx: usize) -> Result<Hole> {
        self.holes
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or_else(|| Error::Template(format!("placeholder {idx} resolved twice")))
    }

    fn is_elision(&self, idx: usize) -> bool {
        matches!(self.holes.get(idx), Some(Some(h)) if h.is_elision())
    }

    // ==================== hole resolution ====================

    /// Resolve a hole standing in expression position.
    fn resolve_expr(&mut self, idx: usize) -> Result<Node> {
        match self.take(idx)? {
            Hole::Node(node) => Ok(node),
            Hole::Str(s) => Ok(Node::ident(s)),
            Hole::Num(n) => Ok(Node::number(n)),
            Hole::Nodes(_) => Err(Error::Template(
                "node list used outside a list position".into(),
            )),
            Hole::Bool(false) | Hole::Null => Err(Error::Template(
                "falsy hole in a position that cannot be elided".into(),
            )),
            Hole::Bool(true) => Err(Error::Template("`true` is not a valid hole value".into())),
        }
    }

    /// Resolve a hole standing in identifier position. Nodes are grafted
    /// verbatim even when they are not identifiers.
    fn resolve_ident(&mut self, idx: usize) -> Result<Node> {
        match self.take(idx)? {
            Hole::Node(node) => Ok(node),
            Hole::Str(s) => Ok(Node::ident(s)),
            other => Err(Error::Template(format!(
                "cannot use {} in identifier position",
                hole_kind(&other)
            ))),
        }
    }

    // ==================== slots ====================

    /// A mandatory child that is an expression (or pattern).
    fn slot(&mut self, slot: &mut Node) -> Result<()> {
        if let Some(idx) = placeholder_of(slot) {
            *slot = self.resolve_expr(idx)?;
            return Ok(());
        }
        self.walk(slot)
    }

    fn boxed_slot(&mut self, slot: &mut Box<Node>) -> Result<()> {
        self.slot(slot.as_mut())
    }

    /// An optional child; a falsy hole elides it.
    fn opt_slot(&mut self, slot: &mut Option<Box<Node>>) -> Result<()> {
        if let Some(node) = slot {
            if let Some(idx) = placeholder_of(node) {
                if self.is_elision(idx) {
                    self.take(idx)?;
                    *slot = None;
                } else {
                    **node = self.resolve_expr(idx)?;
                }
                return Ok(());
            }
            self.walk(node)?;
        }
        Ok(())
    }

    /// A child that must stay identifier-like (labels, non-computed keys).
    fn ident_slot(&mut self, slot: &mut Node) -> Result<()> {
        if let Some(idx) = placeholder_of(slot) {
            *slot = self.resolve_ident(idx)?;
            return Ok(());
        }
        self.walk(slot)
    }

    fn opt_ident_slot(&mut self, slot: &mut Option<Box<Node>>) -> Result<()> {
        if let Some(node) = slot {
            if let Some(idx) = placeholder_of(node) {
                if self.is_elision(idx) {
                    self.take(idx)?;
                    *slot = None;
                } else {
                    **node = self.resolve_ident(idx)?;
                }
                return Ok(());
            }
            self.walk(node)?;
        }
        Ok(())
    }

    // ==================== lists ====================

    /// Expression-valued list fields: arguments, sequence expressions,
    /// parameters. A placeholder element can be replaced, spliced, or
    /// removed.
    fn expr_list(&mut self, list: &mut Vec<Node>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            match placeholder_of(&list[i]) {
                Some(idx) => match self.take(idx)? {
                    Hole::Node(node) => {
                        list[i] = node;
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let n = nodes.len();
                        list.splice(i..=i, nodes);
                        i += n;
                    }
                    Hole::Str(s) => {
                        list[i] = Node::ident(s);
                        i += 1;
                    }
                    Hole::Num(n) => {
                        list[i] = Node::number(n);
                        i += 1;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    Hole::Bool(true) => {
                        return Err(Error::Template("`true` is not a valid hole value".into()));
                    }
                },
                None => {
                    self.walk(&mut list[i])?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Array literal / array pattern elements, where `None` marks an elision.
    fn option_list(&mut self, list: &mut Vec<Option<Node>>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            let Some(element) = &mut list[i] else {
                i += 1;
                continue;
            };
            match placeholder_of(element) {
                Some(idx) => match self.take(idx)? {
                    Hole::Node(node) => {
                        *element = node;
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let n = nodes.len();
                        list.splice(i..=i, nodes.into_iter().map(Some));
                        i += n;
                    }
                    Hole::Str(s) => {
                        *element = Node::ident(s);
                        i += 1;
                    }
                    Hole::Num(n) => {
                        *element = Node::number(n);
                        i += 1;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    Hole::Bool(true) => {
                        return Err(Error::Template("`true` is not a valid hole value".into()));
                    }
                },
                None => {
                    self.walk(element)?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Statement lists. A placeholder parses as an `ExpressionStatement`
    /// wrapping a lone identifier; statement-valued holes replace the whole
    /// statement, expression-valued holes keep the wrapper.
    pub(crate) fn stmt_list(&mut self, list: &mut Vec<Node>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            match stmt_placeholder(&list[i]) {
                Some(idx) => match self.take(idx)? {
                    Hole::Node(node) => {
                        list[i] = into_statement(node);
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let n = nodes.len();
                        list.splice(i..=i, nodes.into_iter().map(into_statement));
                        i += n;
                    }
                    Hole::Str(s) => {
                        set_statement_expr(&mut list[i], Node::ident(s));
                        i += 1;
                    }
                    Hole::Num(n) => {
                        set_statement_expr(&mut list[i], Node::number(n));
                        i += 1;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    Hole::Bool(true) => {
                        return Err(Error::Template("`true` is not a valid hole value".into()));
                    }
                },
                None => {
                    self.walk(&mut list[i])?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Object literal / object pattern properties. A placeholder parses as a
    /// shorthand property; a non-shorthand property whose value is a falsy
    /// hole is removed whole.
    fn prop_list(&mut self, list: &mut Vec<Node>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            if let Some(idx) = shorthand_placeholder(&list[i]) {
                match self.take(idx)? {
                    Hole::Node(node) => {
                        list[i] = into_property(node)?;
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let props = nodes
                            .into_iter()
                            .map(into_property)
                            .collect::<Result<Vec<_>>>()?;
                        let n = props.len();
                        list.splice(i..=i, props);
                        i += n;
                    }
                    Hole::Str(s) => {
                        list[i] = shorthand(Node::ident(s));
                        i += 1;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    other => {
                        return Err(Error::Template(format!(
                            "cannot use {} as an object property",
                            hole_kind(&other)
                        )));
                    }
                }
                continue;
            }
            // `{ b: ${false} }` drops the property entirely.
            if let NodeKind::Property { value, .. } = &list[i].kind
                && let Some(idx) = placeholder_of(value)
                && self.is_elision(idx)
            {
                self.take(idx)?;
                list.remove(i);
                continue;
            }
            self.walk(&mut list[i])?;
            i += 1;
        }
        Ok(())
    }

    /// Class members. A placeholder parses as a value-less property
    /// definition with an identifier key.
    fn member_list(&mut self, list: &mut Vec<Node>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            match member_placeholder(&list[i]) {
                Some(idx) => match self.take(idx)? {
                    Hole::Node(node) => {
                        list[i] = node;
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let n = nodes.len();
                        list.splice(i..=i, nodes);
                        i += n;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    other => {
                        return Err(Error::Template(format!(
                            "cannot use {} as a class member",
                            hole_kind(&other)
                        )));
                    }
                },
                None => {
                    self.walk(&mut list[i])?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Declarator list: a placeholder parses as a declarator with a bare
    /// identifier pattern and no initializer.
    fn declarator_list(&mut self, list: &mut Vec<Node>) -> Result<()> {
        let mut i = 0;
        while i < list.len() {
            match declarator_placeholder(&list[i]) {
                Some(idx) => match self.take(idx)? {
                    Hole::Node(node) => {
                        list[i] = into_declarator(node);
                        i += 1;
                    }
                    Hole::Nodes(nodes) => {
                        let decls: Vec<Node> = nodes.into_iter().map(into_declarator).collect();
                        let n = decls.len();
                        list.splice(i..=i, decls);
                        i += n;
                    }
                    Hole::Str(s) => {
                        set_declarator_id(&mut list[i], Node::ident(s));
                        i += 1;
                    }
                    Hole::Bool(false) | Hole::Null => {
                        list.remove(i);
                    }
                    other => {
                        return Err(Error::Template(format!(
                            "cannot use {} as a declarator",
                            hole_kind(&other)
                        )));
                    }
                },
                None => {
                    self.walk(&mut list[i])?;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    // ==================== text positions ====================

    /// Replace placeholder tokens inside literal text (string literals,
    /// comments) with stringified hole values.
    fn text(&mut self, text: &mut String) -> Result<bool> {
        let mut changed = false;
        while let Some((start, idx, len)) = find_token(text) {
            let value = match self.take(idx)? {
                Hole::Str(s) => s,
                Hole::Num(n) => fmt_number(n),
                other => {
                    return Err(Error::Template(format!(
                        "cannot use {} inside literal text",
                        hole_kind(&other)
                    )));
                }
            };
            text.replace_range(start..start + len, &value);
            changed = true;
        }
        Ok(changed)
    }

    /// Replace placeholder tokens inside a template quasi. The printer emits
    /// `raw` verbatim between the backticks, so the value written there has
    /// backticks, `${`, and backslashes escaped; `cooked` gets the value
    /// as-is. Raw and cooked spell the same token sequence, so the first
    /// token of each names the same hole.
    fn quasi_text(&mut self, raw: &mut String, cooked: &mut Option<String>) -> Result<()> {
        while let Some((start, idx, len)) = find_token(raw) {
            let value = match self.take(idx)? {
                Hole::Str(s) => s,
                Hole::Num(n) => fmt_number(n),
                other => {
                    return Err(Error::Template(format!(
                        "cannot use {} inside literal text",
                        hole_kind(&other)
                    )));
                }
            };
            raw.replace_range(start..start + len, &escape_quasi(&value));
            if let Some(cooked) = cooked.as_mut()
                && let Some((cooked_start, cooked_idx, cooked_len)) = find_token(cooked)
                && cooked_idx == idx
            {
                cooked.replace_range(cooked_start..cooked_start + cooked_len, &value);
            }
        }
        Ok(())
    }

    fn comments(&mut self, node: &mut Node) -> Result<()> {
        for comment in node
            .leading_comments
            .iter_mut()
            .chain(node.trailing_comments.iter_mut())
        {
            self.text(&mut comment.text)?;
        }
        Ok(())
    }

    // ==================== the walk ====================

    pub(crate) fn walk(&mut self, node: &mut Node) -> Result<()> {
        self.comments(node)?;
        use NodeKind::*;
        match &mut node.kind {
            Program { body } | BlockStatement { body } | StaticBlock { body } => {
                self.stmt_list(body)?
            }

            Identifier { name } => {
                if placeholder_index(name).is_some() {
                    return Err(Error::Template(
                        "hole in a position templates cannot fill".into(),
                    ));
                }
            }
            PrivateIdentifier { .. } | ThisExpression | Super | EmptyStatement
            | DebuggerStatement | MetaProperty { .. } => {}

            Literal { value, raw } => {
                if let LiteralValue::String(s) = value
                    && self.text(s)?
                {
                    // The raw text still spells the placeholder; re-quote.
                    *raw = None;
                }
            }
            TemplateLiteral {
                quasis,
                expressions,
            } => {
                for quasi in quasis.iter_mut() {
                    if let TemplateElement { raw, cooked, .. } = &mut quasi.kind {
                        self.quasi_text(raw, cooked)?;
                    }
                }
                for expr in expressions {
                    self.slot(expr)?;
                }
            }
            TemplateElement { .. } => {}
            TaggedTemplateExpression { tag, quasi } => {
                self.boxed_slot(tag)?;
                self.walk(quasi)?;
            }

            ArrayExpression { elements } | ArrayPattern { elements } => {
                self.option_list(elements)?
            }
            ObjectExpression { properties } | ObjectPattern { properties } => {
                self.prop_list(properties)?
            }
            Property {
                key,
                value,
                computed,
                ..
            } => {
                // Shorthand placeholders never reach here; the property-list
                // and root handling resolve them before walking.
                if *computed {
                    self.boxed_slot(key)?;
                } else {
                    self.ident_slot(key)?;
                }
                self.boxed_slot(value)?;
            }
            SpreadElement { argument } | RestElement { argument } => self.boxed_slot(argument)?,

            FunctionExpression {
                id, params, body, ..
            }
            | FunctionDeclaration {
                id, params, body, ..
            } => {
                self.opt_ident_slot(id)?;
                self.expr_list(params)?;
                self.walk(body)?;
            }
            ArrowFunctionExpression { params, body, .. } => {
                self.expr_list(params)?;
                self.boxed_slot(body)?;
            }
            ClassExpression {
                id,
                super_class,
                body,
            }
            | ClassDeclaration {
                id,
                super_class,
                body,
            } => {
                self.opt_ident_slot(id)?;
                self.opt_slot(super_class)?;
                self.walk(body)?;
            }
            ClassBody { body } => self.member_list(body)?,
            MethodDefinition {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.boxed_slot(key)?;
                } else {
                    self.ident_slot(key)?;
                }
                self.walk(value)?;
            }
            PropertyDefinition {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.boxed_slot(key)?;
                } else {
                    self.ident_slot(key)?;
                }
                self.opt_slot(value)?;
            }

            UnaryExpression { argument, .. }
            | UpdateExpression { argument, .. }
            | AwaitExpression { argument }
            | ThrowStatement { argument } => self.boxed_slot(argument)?,
            YieldExpression { argument, .. } | ReturnStatement { argument } => {
                self.opt_slot(argument)?
            }
            BinaryExpression { left, right, .. }
            | LogicalExpression { left, right, .. }
            | AssignmentExpression { left, right, .. }
            | AssignmentPattern { left, right } => {
                self.boxed_slot(left)?;
                self.boxed_slot(right)?;
            }
            MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                self.boxed_slot(object)?;
                if *computed {
                    self.boxed_slot(property)?;
                } else {
                    self.ident_slot(property)?;
                }
            }
            ChainExpression { expression } => self.boxed_slot(expression)?,
            ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.boxed_slot(test)?;
                self.boxed_slot(consequent)?;
                self.boxed_slot(alternate)?;
            }
            CallExpression {
                callee, arguments, ..
            } => {
                self.boxed_slot(callee)?;
                self.expr_list(arguments)?;
            }
            NewExpression { callee, arguments } => {
                self.boxed_slot(callee)?;
                self.expr_list(arguments)?;
            }
            ImportExpression { source, options } => {
                self.boxed_slot(source)?;
                self.opt_slot(options)?;
            }
            SequenceExpression { expressions } => self.expr_list(expressions)?,

            ExpressionStatement { expression } => self.boxed_slot(expression)?,
            WithStatement { object, body } => {
                self.boxed_slot(object)?;
                self.walk(body)?;
            }
            LabeledStatement { label, body } => {
                self.ident_slot(label)?;
                self.walk(body)?;
            }
            BreakStatement { label } | ContinueStatement { label } => self.opt_ident_slot(label)?,
            IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.boxed_slot(test)?;
                self.walk(consequent)?;
                if let Some(alt) = alternate {
                    self.walk(alt)?;
                }
            }
            SwitchStatement {
                discriminant,
                cases,
            } => {
                self.boxed_slot(discriminant)?;
                for case in cases {
                    self.walk(case)?;
                }
            }
            SwitchCase { test, consequent } => {
                self.opt_slot(test)?;
                self.stmt_list(consequent)?;
            }
            TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.walk(block)?;
                if let Some(h) = handler {
                    self.walk(h)?;
                }
                if let Some(f) = finalizer {
                    self.walk(f)?;
                }
            }
            CatchClause { param, body } => {
                self.opt_ident_slot(param)?;
                self.walk(body)?;
            }
            WhileStatement { test, body } => {
                self.boxed_slot(test)?;
                self.walk(body)?;
            }
            DoWhileStatement { body, test } => {
                self.walk(body)?;
                self.boxed_slot(test)?;
            }
            ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.opt_slot(init)?;
                self.opt_slot(test)?;
                self.opt_slot(update)?;
                self.walk(body)?;
            }
            ForInStatement { left, right, body } | ForOfStatement { left, right, body, .. } => {
                self.boxed_slot(left)?;
                self.boxed_slot(right)?;
                self.walk(body)?;
            }
            VariableDeclaration { declarations, .. } => self.declarator_list(declarations)?,
            VariableDeclarator { id, init } => {
                self.ident_slot(id)?;
                self.opt_slot(init)?;
            }

            ImportDeclaration { specifiers, source } => {
                self.expr_list(specifiers)?;
                self.boxed_slot(source)?;
            }
            ImportSpecifier { imported, local } => {
                self.ident_slot(imported)?;
                self.ident_slot(local)?;
            }
            ImportDefaultSpecifier { local } | ImportNamespaceSpecifier { local } => {
                self.ident_slot(local)?
            }
            ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                if let Some(decl) = declaration {
                    self.walk(decl)?;
                }
                self.expr_list(specifiers)?;
                self.opt_slot(source)?;
            }
            ExportSpecifier { local, exported } => {
                self.ident_slot(local)?;
                self.ident_slot(exported)?;
            }
            ExportDefaultDeclaration { declaration } => self.boxed_slot(declaration)?,
            ExportAllDeclaration { source, exported } => {
                self.boxed_slot(source)?;
                self.opt_ident_slot(exported)?;
            }
        }
        Ok(())
    }

    // ==================== roots ====================

    /// Root of an `x` template: the whole expression may itself be a hole.
    pub(crate) fn root_expr(&mut self, mut node: Node) -> Result<Node> {
        if let Some(idx) = placeholder_of(&node) {
            return self.resolve_expr(idx);
        }
        self.walk(&mut node)?;
        Ok(node)
    }

    /// Root of a `p` template: a hole parses as a shorthand property.
    pub(crate) fn root_prop(&mut self, mut node: Node) -> Result<Node> {
        if let Some(idx) = shorthand_placeholder(&node) {
            return match self.take(idx)? {
                Hole::Node(n) => into_property(n),
                Hole::Str(s) => Ok(shorthand(Node::ident(s))),
                other => Err(Error::Template(format!(
                    "cannot use {} as a property",
                    hole_kind(&other)
                ))),
            };
        }
        self.walk(&mut node)?;
        Ok(node)
    }
}

// ==================== probes and shapes ====================

fn placeholder_of(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::Identifier { name } => placeholder_index(name),
        _ => None,
    }
}

/// A lone placeholder in statement position parses as an expression
/// statement over an identifier.
fn stmt_placeholder(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::ExpressionStatement { expression } => placeholder_of(expression),
        _ => None,
    }
}

/// In an object literal a lone placeholder parses as a shorthand property.
fn shorthand_placeholder(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::Property {
            shorthand: true,
            key,
            ..
        } => placeholder_of(key),
        _ => None,
    }
}

/// In a class body a lone placeholder parses as a value-less property
/// definition.
fn member_placeholder(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::PropertyDefinition {
            key,
            value: None,
            computed: false,
            ..
        } => placeholder_of(key),
        _ => None,
    }
}

fn declarator_placeholder(node: &Node) -> Option<usize> {
    match &node.kind {
        NodeKind::VariableDeclarator { id, init: None } => placeholder_of(id),
        _ => None,
    }
}

/// Expression-valued holes in statement position keep their
/// `ExpressionStatement` wrapper; statements stand alone.
fn into_statement(node: Node) -> Node {
    if node.is_statement() {
        node
    } else {
        Node::statement(node)
    }
}

fn set_statement_expr(stmt: &mut Node, expr: Node) {
    if let NodeKind::ExpressionStatement { expression } = &mut stmt.kind {
        *expression = Box::new(expr);
    }
}

fn set_declarator_id(decl: &mut Node, id: Node) {
    if let NodeKind::VariableDeclarator { id: slot, .. } = &mut decl.kind {
        *slot = Box::new(id);
    }
}

fn into_declarator(node: Node) -> Node {
    match &node.kind {
        NodeKind::VariableDeclarator { .. } => node,
        _ => Node::new(NodeKind::VariableDeclarator {
            id: Box::new(node),
            init: None,
        }),
    }
}

/// Coerce a node standing in property position.
fn into_property(node: Node) -> Result<Node> {
    match &node.kind {
        NodeKind::Property { .. }
        | NodeKind::SpreadElement { .. }
        | NodeKind::RestElement { .. } => Ok(node),
        NodeKind::Identifier { .. } => Ok(shorthand(node)),
        other => Err(Error::Template(format!(
            "cannot use {} as an object property",
            other.type_name()
        ))),
    }
}

fn shorthand(ident: Node) -> Node {
    Node::new(NodeKind::Property {
        key: Box::new(ident.clone()),
        value: Box::new(ident),
        kind: PropertyKind::Init,
        computed: false,
        shorthand: true,
        method: false,
    })
}

/// Escape text spliced into a quasi's raw spelling so it cannot terminate
/// the template literal or open an interpolation.
fn escape_quasi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

fn hole_kind(hole: &Hole) -> &'static str {
    match hole {
        Hole::Node(_) => "a node",
        Hole::Nodes(_) => "a node list",
        Hole::Str(_) => "a string",
        Hole::Num(_) => "a number",
        Hole::Bool(_) => "a boolean",
        Hole::Null => "a null",
    }
}

/// Find the first placeholder token inside literal text. Returns
/// `(byte offset, hole index, token length)`.
fn find_token(text: &str) -> Option<(usize, usize, usize)> {
    let start = text.find(HOLE_PREFIX)?;
    let digits: String = text[start + HOLE_PREFIX.len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let idx = digits.parse().ok()?;
    Some((start, idx, HOLE_PREFIX.len() + digits.len()))
}
