//! Lowering from swc's typed AST to the ESTree node model.
//!
//! Besides the shape translation this restores tunneled sigil names, resolves
//! spans to line/column locations when asked, flattens `ParenExpr` (the
//! printer re-derives parentheses from precedence), splits swc's merged
//! `BinExpr` into Binary/Logical, and re-attaches comments collected during
//! the parse.

use swc_core::common::comments::{Comment as SwcComment, CommentKind, Comments, SingleThreadedComments};
use swc_core::common::{BytePos, SourceMap, Span, Spanned};
use swc_core::ecma::ast as swc;

use super::sigil;
use crate::ast::{
    AssignOp, BinaryOp, Comment, LiteralValue, LogicalOp, MethodKind, Node, NodeKind, Position,
    PropertyKind, SourceLocation, UnaryOp, UpdateOp, VariableKind,
};
use crate::error::{Error, Result};

pub(crate) struct LowerCtx<'a> {
    cm: &'a SourceMap,
    comments: &'a SingleThreadedComments,
    locations: bool,
    /// Column shift introduced on line 1 by the `(` / `({ ` wrappers.
    line1_col_shift: u32,
}

impl<'a> LowerCtx<'a> {
    pub(crate) fn new(
        cm: &'a SourceMap,
        comments: &'a SingleThreadedComments,
        locations: bool,
        line1_col_shift: u32,
    ) -> Self {
        Self {
            cm,
            comments,
            locations,
            line1_col_shift,
        }
    }

    // ==================== metadata ====================

    fn position(&self, pos: BytePos) -> Position {
        let loc = self.cm.lookup_char_pos(pos);
        let mut column = loc.col.0 as u32;
        if loc.line == 1 {
            column = column.saturating_sub(self.line1_col_shift);
        }
        Position::new(loc.line as u32, column)
    }

    fn loc(&self, span: Span) -> Option<SourceLocation> {
        if !self.locations || span.lo.0 == 0 {
            return None;
        }
        Some(SourceLocation::new(
            self.position(span.lo),
            self.position(span.hi),
        ))
    }

    fn leading(&self, pos: BytePos) -> Vec<Comment> {
        self.comments
            .take_leading(pos)
            .map(convert_comments)
            .unwrap_or_default()
    }

    fn trailing(&self, pos: BytePos) -> Vec<Comment> {
        self.comments
            .take_trailing(pos)
            .map(convert_comments)
            .unwrap_or_default()
    }

    fn node(&self, span: Span, kind: NodeKind) -> Node {
        let mut node = Node::new(kind);
        node.loc = self.loc(span);
        node.leading_comments = self.leading(span.lo);
        node.trailing_comments = self.trailing(span.hi);
        node
    }

    // ==================== program level ====================

    pub(crate) fn module_items(&self, items: &[swc::ModuleItem]) -> Result<Vec<Node>> {
        items.iter().map(|item| self.module_item(item)).collect()
    }

    fn module_item(&self, item: &swc::ModuleItem) -> Result<Node> {
        match item {
            swc::ModuleItem::Stmt(s) => self.stmt(s),
            swc::ModuleItem::ModuleDecl(d) => self.module_decl(d),
        }
    }

    // ==================== statements ====================

    pub(crate) fn stmt(&self, s: &swc::Stmt) -> Result<Node> {
        // Take statement-level comments before children lower and claim them.
        let span = s.span();
        let leading = self.leading(span.lo);
        let trailing = self.trailing(span.hi);
        let mut node = self.stmt_inner(s)?;
        if !leading.is_empty() {
            node.leading_comments.splice(0..0, leading);
        }
        node.trailing_comments.extend(trailing);
        Ok(node)
    }

    fn stmt_inner(&self, s: &swc::Stmt) -> Result<Node> {
        use swc::Stmt::*;
        Ok(match s {
            Block(b) => self.block(b)?,
            Empty(e) => self.node(e.span, NodeKind::EmptyStatement),
            Debugger(d) => self.node(d.span, NodeKind::DebuggerStatement),
            With(w) => self.node(
                w.span,
                NodeKind::WithStatement {
                    object: self.boxed(&w.obj)?,
                    body: Box::new(self.stmt(&w.body)?),
                },
            ),
            Return(r) => self.node(
                r.span,
                NodeKind::ReturnStatement {
                    argument: self.opt_boxed(r.arg.as_deref())?,
                },
            ),
            Labeled(l) => self.node(
                l.span,
                NodeKind::LabeledStatement {
                    label: Box::new(self.ident(&l.label)),
                    body: Box::new(self.stmt(&l.body)?),
                },
            ),
            Break(b) => self.node(
                b.span,
                NodeKind::BreakStatement {
                    label: b.label.as_ref().map(|l| Box::new(self.ident(l))),
                },
            ),
            Continue(c) => self.node(
                c.span,
                NodeKind::ContinueStatement {
                    label: c.label.as_ref().map(|l| Box::new(self.ident(l))),
                },
            ),
            If(i) => self.node(
                i.span,
                NodeKind::IfStatement {
                    test: self.boxed(&i.test)?,
                    consequent: Box::new(self.stmt(&i.cons)?),
                    alternate: match &i.alt {
                        Some(alt) => Some(Box::new(self.stmt(alt)?)),
                        None => None,
                    },
                },
            ),
            Switch(sw) => self.node(
                sw.span,
                NodeKind::SwitchStatement {
                    discriminant: self.boxed(&sw.discriminant)?,
                    cases: sw
                        .cases
                        .iter()
                        .map(|c| self.switch_case(c))
                        .collect::<Result<_>>()?,
                },
            ),
            Throw(t) => self.node(
                t.span,
                NodeKind::ThrowStatement {
                    argument: self.boxed(&t.arg)?,
                },
            ),
            Try(t) => self.node(
                t.span,
                NodeKind::TryStatement {
                    block: Box::new(self.block(&t.block)?),
                    handler: match &t.handler {
                        Some(h) => Some(Box::new(self.catch_clause(h)?)),
                        None => None,
                    },
                    finalizer: match &t.finalizer {
                        Some(f) => Some(Box::new(self.block(f)?)),
                        None => None,
                    },
                },
            ),
            While(w) => self.node(
                w.span,
                NodeKind::WhileStatement {
                    test: self.boxed(&w.test)?,
                    body: Box::new(self.stmt(&w.body)?),
                },
            ),
            DoWhile(d) => self.node(
                d.span,
                NodeKind::DoWhileStatement {
                    body: Box::new(self.stmt(&d.body)?),
                    test: self.boxed(&d.test)?,
                },
            ),
            For(f) => self.node(
                f.span,
                NodeKind::ForStatement {
                    init: match &f.init {
                        Some(swc::VarDeclOrExpr::VarDecl(v)) => Some(Box::new(self.var_decl(v)?)),
                        Some(swc::VarDeclOrExpr::Expr(e)) => Some(self.boxed(e)?),
                        None => None,
                    },
                    test: self.opt_boxed(f.test.as_deref())?,
                    update: self.opt_boxed(f.update.as_deref())?,
                    body: Box::new(self.stmt(&f.body)?),
                },
            ),
            ForIn(f) => self.node(
                f.span,
                NodeKind::ForInStatement {
                    left: Box::new(self.for_head(&f.left)?),
                    right: self.boxed(&f.right)?,
                    body: Box::new(self.stmt(&f.body)?),
                },
            ),
            ForOf(f) => self.node(
                f.span,
                NodeKind::ForOfStatement {
                    left: Box::new(self.for_head(&f.left)?),
                    right: self.boxed(&f.right)?,
                    body: Box::new(self.stmt(&f.body)?),
                    is_await: f.is_await,
                },
            ),
            Decl(d) => self.decl(d)?,
            Expr(e) => self.node(
                e.span,
                NodeKind::ExpressionStatement {
                    expression: self.boxed(&e.expr)?,
                },
            ),
        })
    }

    pub(crate) fn block(&self, b: &swc::BlockStmt) -> Result<Node> {
        Ok(self.node(
            b.span,
            NodeKind::BlockStatement {
                body: b.stmts.iter().map(|s| self.stmt(s)).collect::<Result<_>>()?,
            },
        ))
    }

    fn switch_case(&self, c: &swc::SwitchCase) -> Result<Node> {
        Ok(self.node(
            c.span,
            NodeKind::SwitchCase {
                test: self.opt_boxed(c.test.as_deref())?,
                consequent: c.cons.iter().map(|s| self.stmt(s)).collect::<Result<_>>()?,
            },
        ))
    }

    fn catch_clause(&self, h: &swc::CatchClause) -> Result<Node> {
        Ok(self.node(
            h.span,
            NodeKind::CatchClause {
                param: match &h.param {
                    Some(p) => Some(Box::new(self.pat(p)?)),
                    None => None,
                },
                body: Box::new(self.block(&h.body)?),
            },
        ))
    }

    fn for_head(&self, head: &swc::ForHead) -> Result<Node> {
        match head {
            swc::ForHead::VarDecl(v) => self.var_decl(v),
            swc::ForHead::Pat(p) => self.pat(p),
            swc::ForHead::UsingDecl(_) => {
                Err(Error::Parse("using declarations are not supported".into()))
            }
        }
    }

    // ==================== declarations ====================

    fn decl(&self, d: &swc::Decl) -> Result<Node> {
        match d {
            swc::Decl::Fn(f) => {
                let (params, body) = self.function_parts(&f.function)?;
                Ok(self.node(
                    f.function.span,
                    NodeKind::FunctionDeclaration {
                        id: Some(Box::new(self.ident(&f.ident))),
                        params,
                        body: Box::new(body),
                        is_async: f.function.is_async,
                        generator: f.function.is_generator,
                    },
                ))
            }
            swc::Decl::Class(c) => {
                let (super_class, body) = self.class_parts(&c.class)?;
                Ok(self.node(
                    c.class.span,
                    NodeKind::ClassDeclaration {
                        id: Some(Box::new(self.ident(&c.ident))),
                        super_class,
                        body,
                    },
                ))
            }
            swc::Decl::Var(v) => self.var_decl(v),
            other => Err(Error::Parse(format!(
                "unsupported declaration: {other:?}"
            ))),
        }
    }

    fn var_decl(&self, v: &swc::VarDecl) -> Result<Node> {
        let kind = match v.kind {
            swc::VarDeclKind::Var => VariableKind::Var,
            swc::VarDeclKind::Let => VariableKind::Let,
            swc::VarDeclKind::Const => VariableKind::Const,
        };
        Ok(self.node(
            v.span,
            NodeKind::VariableDeclaration {
                kind,
                declarations: v
                    .decls
                    .iter()
                    .map(|d| self.var_declarator(d))
                    .collect::<Result<_>>()?,
            },
        ))
    }

    fn var_declarator(&self, d: &swc::VarDeclarator) -> Result<Node> {
        Ok(self.node(
            d.span,
            NodeKind::VariableDeclarator {
                id: Box::new(self.pat(&d.name)?),
                init: self.opt_boxed(d.init.as_deref())?,
            },
        ))
    }

    // ==================== expressions ====================

    fn boxed(&self, e: &swc::Expr) -> Result<Box<Node>> {
        Ok(Box::new(self.expr(e)?))
    }

    fn opt_boxed(&self, e: Option<&swc::Expr>) -> Result<Option<Box<Node>>> {
        match e {
            Some(e) => Ok(Some(self.boxed(e)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn expr(&self, e: &swc::Expr) -> Result<Node> {
        use swc::Expr::*;
        Ok(match e {
            This(t) => self.node(t.span, NodeKind::ThisExpression),
            Ident(i) => self.ident(i),
            Lit(l) => self.lit(l),
            Array(a) => self.node(
                a.span,
                NodeKind::ArrayExpression {
                    elements: a
                        .elems
                        .iter()
                        .map(|el| el.as_ref().map(|el| self.expr_or_spread(el)).transpose())
                        .collect::<Result<_>>()?,
                },
            ),
            Object(o) => self.node(
                o.span,
                NodeKind::ObjectExpression {
                    properties: o.props.iter().map(|p| self.prop(p)).collect::<Result<_>>()?,
                },
            ),
            Fn(f) => {
                let (params, body) = self.function_parts(&f.function)?;
                self.node(
                    f.function.span,
                    NodeKind::FunctionExpression {
                        id: f.ident.as_ref().map(|i| Box::new(self.ident(i))),
                        params,
                        body: Box::new(body),
                        is_async: f.function.is_async,
                        generator: f.function.is_generator,
                    },
                )
            }
            Arrow(a) => self.node(
                a.span,
                NodeKind::ArrowFunctionExpression {
                    params: a.params.iter().map(|p| self.pat(p)).collect::<Result<_>>()?,
                    body: Box::new(match &*a.body {
                        swc::BlockStmtOrExpr::BlockStmt(b) => self.block(b)?,
                        swc::BlockStmtOrExpr::Expr(e) => self.expr(e)?,
                    }),
                    is_async: a.is_async,
                },
            ),
            Class(c) => {
                let (super_class, body) = self.class_parts(&c.class)?;
                self.node(
                    c.class.span,
                    NodeKind::ClassExpression {
                        id: c.ident.as_ref().map(|i| Box::new(self.ident(i))),
                        super_class,
                        body,
                    },
                )
            }
            Unary(u) => self.node(
                u.span,
                NodeKind::UnaryExpression {
                    op: unary_op(u.op),
                    argument: self.boxed(&u.arg)?,
                },
            ),
            Update(u) => self.node(
                u.span,
                NodeKind::UpdateExpression {
                    op: match u.op {
                        swc::UpdateOp::PlusPlus => UpdateOp::Increment,
                        swc::UpdateOp::MinusMinus => UpdateOp::Decrement,
                    },
                    prefix: u.prefix,
                    argument: self.boxed(&u.arg)?,
                },
            ),
            Bin(b) => {
                let left = self.boxed(&b.left)?;
                let right = self.boxed(&b.right)?;
                match logical_op(b.op) {
                    Some(op) => self.node(b.span, NodeKind::LogicalExpression { op, left, right }),
                    None => self.node(
                        b.span,
                        NodeKind::BinaryExpression {
                            op: binary_op(b.op)?,
                            left,
                            right,
                        },
                    ),
                }
            }
            Assign(a) => self.node(
                a.span,
                NodeKind::AssignmentExpression {
                    op: assign_op(a.op),
                    left: Box::new(self.assign_target(&a.left)?),
                    right: self.boxed(&a.right)?,
                },
            ),
            Member(m) => self.member(m, false)?,
            SuperProp(sp) => {
                let object = Box::new(self.node(sp.obj.span, NodeKind::Super));
                let (property, computed) = match &sp.prop {
                    swc::SuperProp::Ident(i) => (Box::new(self.ident_name(i)), false),
                    swc::SuperProp::Computed(c) => (self.boxed(&c.expr)?, true),
                };
                self.node(
                    sp.span,
                    NodeKind::MemberExpression {
                        object,
                        property,
                        computed,
                        optional: false,
                    },
                )
            }
            Cond(c) => self.node(
                c.span,
                NodeKind::ConditionalExpression {
                    test: self.boxed(&c.test)?,
                    consequent: self.boxed(&c.cons)?,
                    alternate: self.boxed(&c.alt)?,
                },
            ),
            Call(c) => match &c.callee {
                swc::Callee::Import(_) => {
                    let mut args = c.args.iter();
                    let source = args
                        .next()
                        .ok_or_else(|| Error::Parse("import() requires a source".into()))?;
                    let options = args.next();
                    self.node(
                        c.span,
                        NodeKind::ImportExpression {
                            source: Box::new(self.expr_or_spread(source)?),
                            options: match options {
                                Some(o) => Some(Box::new(self.expr_or_spread(o)?)),
                                None => None,
                            },
                        },
                    )
                }
                callee => {
                    let callee = match callee {
                        swc::Callee::Expr(e) => self.expr(e)?,
                        swc::Callee::Super(s) => self.node(s.span, NodeKind::Super),
                        swc::Callee::Import(_) => unreachable!(),
                    };
                    self.node(
                        c.span,
                        NodeKind::CallExpression {
                            callee: Box::new(callee),
                            arguments: self.arguments(&c.args)?,
                            optional: false,
                        },
                    )
                }
            },
            New(n) => self.node(
                n.span,
                NodeKind::NewExpression {
                    callee: self.boxed(&n.callee)?,
                    arguments: match &n.args {
                        Some(args) => self.arguments(args)?,
                        None => Vec::new(),
                    },
                },
            ),
            Seq(s) => self.node(
                s.span,
                NodeKind::SequenceExpression {
                    expressions: s.exprs.iter().map(|e| self.expr(e)).collect::<Result<_>>()?,
                },
            ),
            Tpl(t) => self.tpl(t)?,
            TaggedTpl(t) => self.node(
                t.span,
                NodeKind::TaggedTemplateExpression {
                    tag: self.boxed(&t.tag)?,
                    quasi: Box::new(self.tpl(&t.tpl)?),
                },
            ),
            Yield(y) => self.node(
                y.span,
                NodeKind::YieldExpression {
                    argument: self.opt_boxed(y.arg.as_deref())?,
                    delegate: y.delegate,
                },
            ),
            Await(a) => self.node(
                a.span,
                NodeKind::AwaitExpression {
                    argument: self.boxed(&a.arg)?,
                },
            ),
            MetaProp(m) => {
                let (meta, property) = match m.kind {
                    swc::MetaPropKind::NewTarget => ("new", "target"),
                    swc::MetaPropKind::ImportMeta => ("import", "meta"),
                };
                self.node(
                    m.span,
                    NodeKind::MetaProperty {
                        meta: Box::new(Node::ident(meta)),
                        property: Box::new(Node::ident(property)),
                    },
                )
            }
            Paren(p) => self.expr(&p.expr)?,
            PrivateName(p) => self.node(
                p.span,
                NodeKind::PrivateIdentifier {
                    name: p.name.to_string(),
                },
            ),
            OptChain(oc) => self.node(
                oc.span,
                NodeKind::ChainExpression {
                    expression: Box::new(self.opt_chain(oc)?),
                },
            ),
            other => {
                return Err(Error::Parse(format!(
                    "unsupported expression: {}",
                    short_debug(other)
                )));
            }
        })
    }

    fn member(&self, m: &swc::MemberExpr, optional: bool) -> Result<Node> {
        let object = self.boxed(&m.obj)?;
        let (property, computed) = match &m.prop {
            swc::MemberProp::Ident(i) => (Box::new(self.ident_name(i)), false),
            swc::MemberProp::PrivateName(p) => (
                Box::new(self.node(
                    p.span,
                    NodeKind::PrivateIdentifier {
                        name: p.name.to_string(),
                    },
                )),
                false,
            ),
            swc::MemberProp::Computed(c) => (self.boxed(&c.expr)?, true),
        };
        Ok(self.node(
            m.span,
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                optional,
            },
        ))
    }

    /// Lower an optional chain without re-wrapping nested links in
    /// `ChainExpression`; only the outermost link gets the wrapper.
    fn opt_chain(&self, oc: &swc::OptChainExpr) -> Result<Node> {
        match &*oc.base {
            swc::OptChainBase::Member(m) => {
                let object = Box::new(self.chain_inner(&m.obj)?);
                let (property, computed) = match &m.prop {
                    swc::MemberProp::Ident(i) => (Box::new(self.ident_name(i)), false),
                    swc::MemberProp::PrivateName(p) => (
                        Box::new(self.node(
                            p.span,
                            NodeKind::PrivateIdentifier {
                                name: p.name.to_string(),
                            },
                        )),
                        false,
                    ),
                    swc::MemberProp::Computed(c) => (Box::new(self.chain_inner(&c.expr)?), true),
                };
                Ok(self.node(
                    m.span,
                    NodeKind::MemberExpression {
                        object,
                        property,
                        computed,
                        optional: oc.optional,
                    },
                ))
            }
            swc::OptChainBase::Call(c) => Ok(self.node(
                c.span,
                NodeKind::CallExpression {
                    callee: Box::new(self.chain_inner(&c.callee)?),
                    arguments: self.arguments(&c.args)?,
                    optional: oc.optional,
                },
            )),
        }
    }

    fn chain_inner(&self, e: &swc::Expr) -> Result<Node> {
        match e {
            swc::Expr::OptChain(oc) => self.opt_chain(oc),
            swc::Expr::Member(m) => self.member(m, false),
            _ => self.expr(e),
        }
    }

    fn arguments(&self, args: &[swc::ExprOrSpread]) -> Result<Vec<Node>> {
        args.iter().map(|a| self.expr_or_spread(a)).collect()
    }

    fn expr_or_spread(&self, a: &swc::ExprOrSpread) -> Result<Node> {
        match a.spread {
            Some(dots) => {
                let argument = self.boxed(&a.expr)?;
                let span = Span::new(dots.lo, a.expr.span().hi);
                Ok(self.node(span, NodeKind::SpreadElement { argument }))
            }
            None => self.expr(&a.expr),
        }
    }

    fn tpl(&self, t: &swc::Tpl) -> Result<Node> {
        Ok(self.node(
            t.span,
            NodeKind::TemplateLiteral {
                quasis: t
                    .quasis
                    .iter()
                    .map(|q| {
                        self.node(
                            q.span,
                            NodeKind::TemplateElement {
                                raw: q.raw.to_string(),
                                cooked: q.cooked.as_ref().map(|c| c.to_string()),
                                tail: q.tail,
                            },
                        )
                    })
                    .collect(),
                expressions: t.exprs.iter().map(|e| self.expr(e)).collect::<Result<_>>()?,
            },
        ))
    }

    fn lit(&self, l: &swc::Lit) -> Node {
        use swc::Lit::*;
        match l {
            Str(s) => self.node(
                s.span,
                NodeKind::Literal {
                    value: LiteralValue::String(s.value.to_string()),
                    raw: s.raw.as_ref().map(|r| r.to_string()),
                },
            ),
            Bool(b) => self.node(
                b.span,
                NodeKind::Literal {
                    value: LiteralValue::Boolean(b.value),
                    raw: Some(if b.value { "true".into() } else { "false".into() }),
                },
            ),
            Null(n) => self.node(
                n.span,
                NodeKind::Literal {
                    value: LiteralValue::Null,
                    raw: Some("null".into()),
                },
            ),
            Num(n) => self.node(
                n.span,
                NodeKind::Literal {
                    value: LiteralValue::Number(n.value),
                    raw: n.raw.as_ref().map(|r| r.to_string()),
                },
            ),
            BigInt(b) => self.node(
                b.span,
                NodeKind::Literal {
                    value: LiteralValue::BigInt(b.value.to_string()),
                    raw: b.raw.as_ref().map(|r| r.to_string()),
                },
            ),
            Regex(r) => self.node(
                r.span,
                NodeKind::Literal {
                    value: LiteralValue::RegExp {
                        pattern: r.exp.to_string(),
                        flags: r.flags.to_string(),
                    },
                    raw: Some(format!("/{}/{}", r.exp, r.flags)),
                },
            ),
            // JSX parsing is disabled.
            JSXText(_) => unreachable!(),
        }
    }

    fn ident(&self, i: &swc::Ident) -> Node {
        self.node(
            i.span,
            NodeKind::Identifier {
                name: sigil::restore(&i.sym),
            },
        )
    }

    fn ident_name(&self, i: &swc::IdentName) -> Node {
        self.node(
            i.span,
            NodeKind::Identifier {
                name: sigil::restore(&i.sym),
            },
        )
    }

    fn assign_target(&self, t: &swc::AssignTarget) -> Result<Node> {
        match t {
            swc::AssignTarget::Simple(s) => match s {
                swc::SimpleAssignTarget::Ident(b) => Ok(self.ident(&b.id)),
                swc::SimpleAssignTarget::Member(m) => self.member(m, false),
                swc::SimpleAssignTarget::SuperProp(sp) => {
                    self.expr(&swc::Expr::SuperProp(sp.clone()))
                }
                swc::SimpleAssignTarget::Paren(p) => self.expr(&p.expr),
                swc::SimpleAssignTarget::OptChain(oc) => {
                    self.expr(&swc::Expr::OptChain(oc.clone()))
                }
                other => Err(Error::Parse(format!(
                    "unsupported assignment target: {other:?}"
                ))),
            },
            swc::AssignTarget::Pat(p) => match p {
                swc::AssignTargetPat::Array(a) => self.array_pat(a),
                swc::AssignTargetPat::Object(o) => self.object_pat(o),
                swc::AssignTargetPat::Invalid(_) => {
                    Err(Error::Parse("invalid assignment target".into()))
                }
            },
        }
    }

    // ==================== objects and classes ====================

    pub(crate) fn prop(&self, p: &swc::PropOrSpread) -> Result<Node> {
        match p {
            swc::PropOrSpread::Spread(s) => {
                let argument = self.boxed(&s.expr)?;
                let span = Span::new(s.dot3_token.lo, s.expr.span().hi);
                Ok(self.node(span, NodeKind::SpreadElement { argument }))
            }
            swc::PropOrSpread::Prop(p) => self.prop_inner(p),
        }
    }

    fn prop_inner(&self, p: &swc::Prop) -> Result<Node> {
        use swc::Prop::*;
        Ok(match p {
            Shorthand(i) => {
                let key = self.ident(i);
                let value = key.clone();
                self.node(
                    i.span,
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: PropertyKind::Init,
                        computed: false,
                        shorthand: true,
                        method: false,
                    },
                )
            }
            KeyValue(kv) => {
                let (key, computed) = self.prop_name(&kv.key)?;
                let span = Span::new(kv.key.span().lo, kv.value.span().hi);
                self.node(
                    span,
                    NodeKind::Property {
                        key: Box::new(key),
                        value: self.boxed(&kv.value)?,
                        kind: PropertyKind::Init,
                        computed,
                        shorthand: false,
                        method: false,
                    },
                )
            }
            Assign(a) => {
                // `({ a = 1 })` — only valid when reinterpreted as a pattern.
                let key = self.ident(&a.key);
                let value = self.node(
                    a.span(),
                    NodeKind::AssignmentPattern {
                        left: Box::new(key.clone()),
                        right: self.boxed(&a.value)?,
                    },
                );
                self.node(
                    a.span(),
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: PropertyKind::Init,
                        computed: false,
                        shorthand: true,
                        method: false,
                    },
                )
            }
            Getter(g) => {
                let (key, computed) = self.prop_name(&g.key)?;
                let body = match &g.body {
                    Some(b) => self.block(b)?,
                    None => Node::new(NodeKind::BlockStatement { body: Vec::new() }),
                };
                let value = self.node(
                    g.span,
                    NodeKind::FunctionExpression {
                        id: None,
                        params: Vec::new(),
                        body: Box::new(body),
                        is_async: false,
                        generator: false,
                    },
                );
                self.node(
                    g.span,
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: PropertyKind::Get,
                        computed,
                        shorthand: false,
                        method: false,
                    },
                )
            }
            Setter(s) => {
                let (key, computed) = self.prop_name(&s.key)?;
                let body = match &s.body {
                    Some(b) => self.block(b)?,
                    None => Node::new(NodeKind::BlockStatement { body: Vec::new() }),
                };
                let value = self.node(
                    s.span,
                    NodeKind::FunctionExpression {
                        id: None,
                        params: vec![self.pat(&s.param)?],
                        body: Box::new(body),
                        is_async: false,
                        generator: false,
                    },
                );
                self.node(
                    s.span,
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: PropertyKind::Set,
                        computed,
                        shorthand: false,
                        method: false,
                    },
                )
            }
            Method(m) => {
                let (key, computed) = self.prop_name(&m.key)?;
                let (params, body) = self.function_parts(&m.function)?;
                let value = self.node(
                    m.function.span,
                    NodeKind::FunctionExpression {
                        id: None,
                        params,
                        body: Box::new(body),
                        is_async: m.function.is_async,
                        generator: m.function.is_generator,
                    },
                );
                let span = Span::new(m.key.span().lo, m.function.span.hi);
                self.node(
                    span,
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: PropertyKind::Init,
                        computed,
                        shorthand: false,
                        method: true,
                    },
                )
            }
        })
    }

    fn prop_name(&self, k: &swc::PropName) -> Result<(Node, bool)> {
        Ok(match k {
            swc::PropName::Ident(i) => (self.ident_name(i), false),
            swc::PropName::Str(s) => (self.lit(&swc::Lit::Str(s.clone())), false),
            swc::PropName::Num(n) => (self.lit(&swc::Lit::Num(n.clone())), false),
            swc::PropName::BigInt(b) => (self.lit(&swc::Lit::BigInt(b.clone())), false),
            swc::PropName::Computed(c) => (self.expr(&c.expr)?, true),
        })
    }

    fn function_parts(&self, f: &swc::Function) -> Result<(Vec<Node>, Node)> {
        let params = f
            .params
            .iter()
            .map(|p| self.pat(&p.pat))
            .collect::<Result<Vec<_>>>()?;
        let body = match &f.body {
            Some(b) => self.block(b)?,
            None => Node::new(NodeKind::BlockStatement { body: Vec::new() }),
        };
        Ok((params, body))
    }

    fn class_parts(&self, c: &swc::Class) -> Result<(Option<Box<Node>>, Box<Node>)> {
        let super_class = self.opt_boxed(c.super_class.as_deref())?;
        let mut members = Vec::new();
        for member in &c.body {
            if let Some(node) = self.class_member(member)? {
                members.push(node);
            }
        }
        let body = self.node(c.span, NodeKind::ClassBody { body: members });
        Ok((super_class, Box::new(body)))
    }

    fn class_member(&self, m: &swc::ClassMember) -> Result<Option<Node>> {
        use swc::ClassMember::*;
        Ok(match m {
            Constructor(c) => {
                let params = c
                    .params
                    .iter()
                    .map(|p| match p {
                        swc::ParamOrTsParamProp::Param(p) => self.pat(&p.pat),
                        swc::ParamOrTsParamProp::TsParamProp(_) => {
                            Err(Error::Parse("unsupported constructor parameter".into()))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                let body = match &c.body {
                    Some(b) => self.block(b)?,
                    None => Node::new(NodeKind::BlockStatement { body: Vec::new() }),
                };
                let (key, computed) = self.prop_name(&c.key)?;
                let value = self.node(
                    c.span,
                    NodeKind::FunctionExpression {
                        id: None,
                        params,
                        body: Box::new(body),
                        is_async: false,
                        generator: false,
                    },
                );
                Some(self.node(
                    c.span,
                    NodeKind::MethodDefinition {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: MethodKind::Constructor,
                        computed,
                        is_static: false,
                    },
                ))
            }
            Method(m) => {
                let (key, computed) = self.prop_name(&m.key)?;
                Some(self.method_definition(
                    m.span,
                    key,
                    computed,
                    m.is_static,
                    m.kind,
                    &m.function,
                )?)
            }
            PrivateMethod(m) => {
                let key = self.node(
                    m.key.span,
                    NodeKind::PrivateIdentifier {
                        name: m.key.name.to_string(),
                    },
                );
                Some(self.method_definition(m.span, key, false, m.is_static, m.kind, &m.function)?)
            }
            ClassProp(p) => {
                let (key, computed) = self.prop_name(&p.key)?;
                Some(self.node(
                    p.span,
                    NodeKind::PropertyDefinition {
                        key: Box::new(key),
                        value: self.opt_boxed(p.value.as_deref())?,
                        computed,
                        is_static: p.is_static,
                    },
                ))
            }
            PrivateProp(p) => {
                let key = self.node(
                    p.key.span,
                    NodeKind::PrivateIdentifier {
                        name: p.key.name.to_string(),
                    },
                );
                Some(self.node(
                    p.span,
                    NodeKind::PropertyDefinition {
                        key: Box::new(key),
                        value: self.opt_boxed(p.value.as_deref())?,
                        computed: false,
                        is_static: p.is_static,
                    },
                ))
            }
            StaticBlock(sb) => {
                let body = match self.block(&sb.body)? {
                    Node {
                        kind: NodeKind::BlockStatement { body },
                        ..
                    } => body,
                    _ => unreachable!(),
                };
                Some(self.node(sb.span, NodeKind::StaticBlock { body }))
            }
            // Stray semicolons between members.
            Empty(_) => None,
            other => {
                return Err(Error::Parse(format!(
                    "unsupported class member: {other:?}"
                )));
            }
        })
    }

    fn method_definition(
        &self,
        span: Span,
        key: Node,
        computed: bool,
        is_static: bool,
        kind: swc::MethodKind,
        function: &swc::Function,
    ) -> Result<Node> {
        let (params, body) = self.function_parts(function)?;
        let value = self.node(
            function.span,
            NodeKind::FunctionExpression {
                id: None,
                params,
                body: Box::new(body),
                is_async: function.is_async,
                generator: function.is_generator,
            },
        );
        let kind = match kind {
            swc::MethodKind::Method => MethodKind::Method,
            swc::MethodKind::Getter => MethodKind::Get,
            swc::MethodKind::Setter => MethodKind::Set,
        };
        Ok(self.node(
            span,
            NodeKind::MethodDefinition {
                key: Box::new(key),
                value: Box::new(value),
                kind,
                computed,
                is_static,
            },
        ))
    }

    // ==================== patterns ====================

    pub(crate) fn pat(&self, p: &swc::Pat) -> Result<Node> {
        use swc::Pat::*;
        Ok(match p {
            Ident(b) => self.ident(&b.id),
            Array(a) => self.array_pat(a)?,
            Object(o) => self.object_pat(o)?,
            Rest(r) => self.rest_pat(r)?,
            Assign(a) => self.node(
                a.span,
                NodeKind::AssignmentPattern {
                    left: Box::new(self.pat(&a.left)?),
                    right: self.boxed(&a.right)?,
                },
            ),
            Expr(e) => self.expr(e)?,
            Invalid(_) => return Err(Error::Parse("invalid pattern".into())),
        })
    }

    fn array_pat(&self, a: &swc::ArrayPat) -> Result<Node> {
        Ok(self.node(
            a.span,
            NodeKind::ArrayPattern {
                elements: a
                    .elems
                    .iter()
                    .map(|el| el.as_ref().map(|el| self.pat(el)).transpose())
                    .collect::<Result<_>>()?,
            },
        ))
    }

    fn rest_pat(&self, r: &swc::RestPat) -> Result<Node> {
        Ok(self.node(
            r.span,
            NodeKind::RestElement {
                argument: Box::new(self.pat(&r.arg)?),
            },
        ))
    }

    fn object_pat(&self, o: &swc::ObjectPat) -> Result<Node> {
        let mut properties = Vec::with_capacity(o.props.len());
        for prop in &o.props {
            properties.push(match prop {
                swc::ObjectPatProp::KeyValue(kv) => {
                    let (key, computed) = self.prop_name(&kv.key)?;
                    let span = Span::new(kv.key.span().lo, kv.value.span().hi);
                    self.node(
                        span,
                        NodeKind::Property {
                            key: Box::new(key),
                            value: Box::new(self.pat(&kv.value)?),
                            kind: PropertyKind::Init,
                            computed,
                            shorthand: false,
                            method: false,
                        },
                    )
                }
                swc::ObjectPatProp::Assign(a) => {
                    let key = self.ident(&a.key.id);
                    let value = match &a.value {
                        Some(v) => self.node(
                            a.span,
                            NodeKind::AssignmentPattern {
                                left: Box::new(key.clone()),
                                right: self.boxed(v)?,
                            },
                        ),
                        None => key.clone(),
                    };
                    self.node(
                        a.span,
                        NodeKind::Property {
                            key: Box::new(key),
                            value: Box::new(value),
                            kind: PropertyKind::Init,
                            computed: false,
                            shorthand: true,
                            method: false,
                        },
                    )
                }
                swc::ObjectPatProp::Rest(r) => self.rest_pat(r)?,
            });
        }
        Ok(self.node(o.span, NodeKind::ObjectPattern { properties }))
    }

    // ==================== modules ====================

    fn module_decl(&self, d: &swc::ModuleDecl) -> Result<Node> {
        use swc::ModuleDecl::*;
        Ok(match d {
            Import(i) => self.node(
                i.span,
                NodeKind::ImportDeclaration {
                    specifiers: i
                        .specifiers
                        .iter()
                        .map(|s| self.import_specifier(s))
                        .collect::<Result<_>>()?,
                    source: Box::new(self.lit(&swc::Lit::Str((*i.src).clone()))),
                },
            ),
            ExportDecl(e) => {
                let declaration = self.decl(&e.decl)?;
                self.node(
                    e.span,
                    NodeKind::ExportNamedDeclaration {
                        declaration: Some(Box::new(declaration)),
                        specifiers: Vec::new(),
                        source: None,
                    },
                )
            }
            ExportNamed(e) => {
                // `export * as ns from '…'` arrives as a namespace specifier
                // but is an ExportAllDeclaration in ESTree terms.
                if let [swc::ExportSpecifier::Namespace(ns)] = e.specifiers.as_slice() {
                    let source = e
                        .src
                        .as_ref()
                        .ok_or_else(|| Error::Parse("namespace export requires a source".into()))?;
                    return Ok(self.node(
                        e.span,
                        NodeKind::ExportAllDeclaration {
                            source: Box::new(self.lit(&swc::Lit::Str((**source).clone()))),
                            exported: Some(Box::new(self.module_export_name(&ns.name))),
                        },
                    ));
                }
                self.node(
                    e.span,
                    NodeKind::ExportNamedDeclaration {
                        declaration: None,
                        specifiers: e
                            .specifiers
                            .iter()
                            .map(|s| self.export_specifier(s))
                            .collect::<Result<_>>()?,
                        source: match &e.src {
                            Some(s) => Some(Box::new(self.lit(&swc::Lit::Str((**s).clone())))),
                            None => None,
                        },
                    },
                )
            }
            ExportDefaultDecl(e) => {
                let declaration = match &e.decl {
                    swc::DefaultDecl::Fn(f) => {
                        let (params, body) = self.function_parts(&f.function)?;
                        self.node(
                            f.function.span,
                            NodeKind::FunctionDeclaration {
                                id: f.ident.as_ref().map(|i| Box::new(self.ident(i))),
                                params,
                                body: Box::new(body),
                                is_async: f.function.is_async,
                                generator: f.function.is_generator,
                            },
                        )
                    }
                    swc::DefaultDecl::Class(c) => {
                        let (super_class, body) = self.class_parts(&c.class)?;
                        self.node(
                            c.class.span,
                            NodeKind::ClassDeclaration {
                                id: c.ident.as_ref().map(|i| Box::new(self.ident(i))),
                                super_class,
                                body,
                            },
                        )
                    }
                    swc::DefaultDecl::TsInterfaceDecl(_) => {
                        return Err(Error::Parse("unsupported default export".into()));
                    }
                };
                self.node(
                    e.span,
                    NodeKind::ExportDefaultDeclaration {
                        declaration: Box::new(declaration),
                    },
                )
            }
            ExportDefaultExpr(e) => self.node(
                e.span,
                NodeKind::ExportDefaultDeclaration {
                    declaration: self.boxed(&e.expr)?,
                },
            ),
            ExportAll(e) => self.node(
                e.span,
                NodeKind::ExportAllDeclaration {
                    source: Box::new(self.lit(&swc::Lit::Str((*e.src).clone()))),
                    exported: None,
                },
            ),
            other => {
                return Err(Error::Parse(format!(
                    "unsupported module declaration: {other:?}"
                )));
            }
        })
    }

    fn import_specifier(&self, s: &swc::ImportSpecifier) -> Result<Node> {
        use swc::ImportSpecifier::*;
        Ok(match s {
            Named(n) => {
                let local = self.ident(&n.local);
                let imported = match &n.imported {
                    Some(name) => self.module_export_name(name),
                    None => local.clone(),
                };
                self.node(
                    n.span,
                    NodeKind::ImportSpecifier {
                        imported: Box::new(imported),
                        local: Box::new(local),
                    },
                )
            }
            Default(d) => self.node(
                d.span,
                NodeKind::ImportDefaultSpecifier {
                    local: Box::new(self.ident(&d.local)),
                },
            ),
            Namespace(n) => self.node(
                n.span,
                NodeKind::ImportNamespaceSpecifier {
                    local: Box::new(self.ident(&n.local)),
                },
            ),
        })
    }

    fn export_specifier(&self, s: &swc::ExportSpecifier) -> Result<Node> {
        match s {
            swc::ExportSpecifier::Named(n) => {
                let local = self.module_export_name(&n.orig);
                let exported = match &n.exported {
                    Some(name) => self.module_export_name(name),
                    None => local.clone(),
                };
                Ok(self.node(
                    n.span,
                    NodeKind::ExportSpecifier {
                        local: Box::new(local),
                        exported: Box::new(exported),
                    },
                ))
            }
            other => Err(Error::Parse(format!(
                "unsupported export specifier: {other:?}"
            ))),
        }
    }

    fn module_export_name(&self, name: &swc::ModuleExportName) -> Node {
        match name {
            swc::ModuleExportName::Ident(i) => self.ident(i),
            swc::ModuleExportName::Str(s) => self.lit(&swc::Lit::Str(s.clone())),
        }
    }
}

fn convert_comments(comments: Vec<SwcComment>) -> Vec<Comment> {
    comments
        .into_iter()
        .map(|c| Comment {
            block: c.kind == CommentKind::Block,
            text: c.text.to_string(),
        })
        .collect()
}

fn unary_op(op: swc::UnaryOp) -> UnaryOp {
    use swc::UnaryOp::*;
    match op {
        Minus => UnaryOp::Minus,
        Plus => UnaryOp::Plus,
        Bang => UnaryOp::Bang,
        Tilde => UnaryOp::Tilde,
        TypeOf => UnaryOp::TypeOf,
        Void => UnaryOp::Void,
        Delete => UnaryOp::Delete,
    }
}

fn logical_op(op: swc::BinaryOp) -> Option<LogicalOp> {
    match op {
        swc::BinaryOp::LogicalAnd => Some(LogicalOp::And),
        swc::BinaryOp::LogicalOr => Some(LogicalOp::Or),
        swc::BinaryOp::NullishCoalescing => Some(LogicalOp::NullishCoalescing),
        _ => None,
    }
}

fn binary_op(op: swc::BinaryOp) -> Result<BinaryOp> {
    use swc::BinaryOp::*;
    Ok(match op {
        EqEq => BinaryOp::EqEq,
        NotEq => BinaryOp::NotEq,
        EqEqEq => BinaryOp::EqEqEq,
        NotEqEq => BinaryOp::NotEqEq,
        Lt => BinaryOp::Lt,
        LtEq => BinaryOp::LtEq,
        Gt => BinaryOp::Gt,
        GtEq => BinaryOp::GtEq,
        LShift => BinaryOp::LShift,
        RShift => BinaryOp::RShift,
        ZeroFillRShift => BinaryOp::ZeroFillRShift,
        Add => BinaryOp::Add,
        Sub => BinaryOp::Sub,
        Mul => BinaryOp::Mul,
        Div => BinaryOp::Div,
        Mod => BinaryOp::Mod,
        Exp => BinaryOp::Exp,
        BitOr => BinaryOp::BitOr,
        BitXor => BinaryOp::BitXor,
        BitAnd => BinaryOp::BitAnd,
        In => BinaryOp::In,
        InstanceOf => BinaryOp::InstanceOf,
        LogicalAnd | LogicalOr | NullishCoalescing => {
            return Err(Error::Parse("logical operator in binary position".into()));
        }
    })
}

fn assign_op(op: swc::AssignOp) -> AssignOp {
    use swc::AssignOp::*;
    match op {
        Assign => AssignOp::Assign,
        AddAssign => AssignOp::AddAssign,
        SubAssign => AssignOp::SubAssign,
        MulAssign => AssignOp::MulAssign,
        DivAssign => AssignOp::DivAssign,
        ModAssign => AssignOp::ModAssign,
        LShiftAssign => AssignOp::LShiftAssign,
        RShiftAssign => AssignOp::RShiftAssign,
        ZeroFillRShiftAssign => AssignOp::ZeroFillRShiftAssign,
        BitOrAssign => AssignOp::BitOrAssign,
        BitXorAssign => AssignOp::BitXorAssign,
        BitAndAssign => AssignOp::BitAndAssign,
        ExpAssign => AssignOp::ExpAssign,
        AndAssign => AssignOp::AndAssign,
        OrAssign => AssignOp::OrAssign,
        NullishAssign => AssignOp::NullishAssign,
    }
}

fn short_debug(e: &swc::Expr) -> String {
    let full = format!("{e:?}");
    full.split('(').next().unwrap_or("unknown").to_string()
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::parse::{parse_expr_mode, parse_statements};

    #[test]
    fn lowers_template_literals() {
        let expr = parse_expr_mode("`a${b}c`", false).unwrap();
        let NodeKind::TemplateLiteral { quasis, expressions } = &expr.kind else {
            panic!("expected template literal");
        };
        assert_eq!(quasis.len(), 2);
        assert_eq!(expressions.len(), 1);
    }

    #[test]
    fn lowers_optional_chains_with_single_wrapper() {
        let expr = parse_expr_mode("a?.b.c", false).unwrap();
        let NodeKind::ChainExpression { expression } = &expr.kind else {
            panic!("expected chain expression");
        };
        let NodeKind::MemberExpression { object, optional, .. } = &expression.kind else {
            panic!("expected member");
        };
        assert!(!optional);
        assert!(matches!(
            object.kind,
            NodeKind::MemberExpression { optional: true, .. }
        ));
    }

    #[test]
    fn flattens_parens() {
        let expr = parse_expr_mode("((a + b))", false).unwrap();
        assert!(matches!(expr.kind, NodeKind::BinaryExpression { .. }));
    }

    #[test]
    fn splits_logical_from_binary() {
        let expr = parse_expr_mode("a && b", false).unwrap();
        assert!(matches!(expr.kind, NodeKind::LogicalExpression { .. }));
    }

    #[test]
    fn lowers_classes() {
        let body = parse_statements(
            "class A extends B { constructor() { super(); } get x() { return 1; } static y = 2; }",
            false,
        )
        .unwrap();
        let NodeKind::ClassDeclaration { body: class_body, super_class, .. } = &body[0].kind else {
            panic!("expected class");
        };
        assert!(super_class.is_some());
        let NodeKind::ClassBody { body: members } = &class_body.kind else {
            panic!("expected class body");
        };
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn attaches_leading_comments_to_statements() {
        let body = parse_statements("// note\nfoo();", true).unwrap();
        assert_eq!(body[0].leading_comments.len(), 1);
        assert_eq!(body[0].leading_comments[0].text, " note");
        assert!(!body[0].leading_comments[0].block);
    }

    #[test]
    fn lowers_exports() {
        let body = parse_statements("export { a as b }; export * as ns from 'm';", false).unwrap();
        assert!(matches!(body[0].kind, NodeKind::ExportNamedDeclaration { .. }));
        match &body[1].kind {
            NodeKind::ExportAllDeclaration { exported, .. } => assert!(exported.is_some()),
            _ => panic!("expected export all"),
        }
    }
}
