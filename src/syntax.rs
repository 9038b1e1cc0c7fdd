//! Immutable template syntax tree
//!
//! Templates are parsed by minijinja's parser and lowered once into a small
//! tagged union holding only what variable discovery inspects:
//! - name references, tagged with the context they appear in
//! - `for` loops
//! - filter applications
//! - literal constants
//!
//! Every other construct becomes a [`Node::Group`] that keeps its children in
//! document order, so a pre-order walk visits nodes in the order they appear in
//! the template.

use minijinja::machinery::{self, ast};
use minijinja::Value;

use crate::error::TemplatemanError;

/// How a name reference uses its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    /// The value is read
    Load,
    /// The name is bound (loop variable, `set` target, `with` target)
    Store,
    /// Macro parameter
    Param,
}

/// A `{% for target in iter %}` construct
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub target: Node,
    pub iter: Node,
    pub body: Vec<Node>,
    pub else_body: Vec<Node>,
    /// `{% for x in xs if cond %}`
    pub filter_expr: Option<Node>,
}

/// A filter application: `target|name(args, key=value)`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub name: String,
    /// None for filter blocks, which apply to their body
    pub target: Option<Node>,
    pub args: Vec<Node>,
    pub kwargs: Vec<(String, Node)>,
    /// `*args` / `**kwargs` splats
    pub splats: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Name { id: String, ctx: NameContext },
    Loop(Box<Loop>),
    Filter(Box<Filter>),
    Const(Value),
    /// Any other construct, reduced to its children
    Group(Vec<Node>),
}

impl Node {
    pub fn load(id: &str) -> Self {
        Node::Name {
            id: id.to_string(),
            ctx: NameContext::Load,
        }
    }

    pub fn store(id: &str) -> Self {
        Node::Name {
            id: id.to_string(),
            ctx: NameContext::Store,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Node::Const(value.into())
    }

    /// Bare name referenced by this node, if it is a name reference
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Node::Name { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Direct children in document order
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Name { .. } | Node::Const(_) => Vec::new(),
            Node::Loop(l) => {
                let mut out = vec![&l.target, &l.iter];
                out.extend(&l.body);
                out.extend(&l.else_body);
                out.extend(l.filter_expr.as_ref());
                out
            }
            Node::Filter(f) => {
                let mut out: Vec<&Node> = f.target.iter().collect();
                out.extend(&f.args);
                out.extend(f.kwargs.iter().map(|(_, v)| v));
                out.extend(&f.splats);
                out
            }
            Node::Group(children) => children.iter().collect(),
        }
    }

    /// Pre-order walk over this node and all its descendants
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Parsed template, ready for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    /// Parse template source. `name` is only used in diagnostics.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplatemanError> {
        let stmt = machinery::parse(source, name, Default::default(), Default::default())
            .map_err(|err| TemplatemanError::TemplateSyntax {
                name: name.to_string(),
                details: err.to_string(),
            })?;

        Ok(Self {
            root: lower_stmt(&stmt),
        })
    }

    /// Wrap an already built tree
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        self.root.walk(visit);
    }
}

// ─────────────────────────────────────────────────────────────
// Lowering from minijinja's AST
// ─────────────────────────────────────────────────────────────

fn lower_stmts(stmts: &[ast::Stmt<'_>]) -> Vec<Node> {
    stmts.iter().map(lower_stmt).collect()
}

fn lower_stmt(stmt: &ast::Stmt<'_>) -> Node {
    match stmt {
        ast::Stmt::Template(t) => Node::Group(lower_stmts(&t.children)),
        ast::Stmt::EmitExpr(e) => lower_expr(&e.expr),
        ast::Stmt::ForLoop(l) => Node::Loop(Box::new(Loop {
            target: lower_target(&l.target),
            iter: lower_expr(&l.iter),
            body: lower_stmts(&l.body),
            else_body: lower_stmts(&l.else_body),
            filter_expr: l.filter_expr.as_ref().map(lower_expr),
        })),
        ast::Stmt::IfCond(c) => {
            let mut out = vec![lower_expr(&c.expr)];
            out.extend(lower_stmts(&c.true_body));
            out.extend(lower_stmts(&c.false_body));
            Node::Group(out)
        }
        ast::Stmt::WithBlock(w) => {
            let mut out: Vec<Node> = w.assignments.iter().map(|(t, _)| lower_target(t)).collect();
            out.extend(w.assignments.iter().map(|(_, v)| lower_expr(v)));
            out.extend(lower_stmts(&w.body));
            Node::Group(out)
        }
        ast::Stmt::Set(s) => Node::Group(vec![lower_target(&s.target), lower_expr(&s.expr)]),
        ast::Stmt::SetBlock(s) => {
            let mut out = vec![lower_target(&s.target)];
            out.extend(s.filter.as_ref().map(lower_expr));
            out.extend(lower_stmts(&s.body));
            Node::Group(out)
        }
        ast::Stmt::AutoEscape(a) => {
            let mut out = vec![lower_expr(&a.enabled)];
            out.extend(lower_stmts(&a.body));
            Node::Group(out)
        }
        ast::Stmt::FilterBlock(f) => {
            let mut out = lower_stmts(&f.body);
            out.push(lower_expr(&f.filter));
            Node::Group(out)
        }
        ast::Stmt::Block(b) => Node::Group(lower_stmts(&b.body)),
        ast::Stmt::Extends(e) => lower_expr(&e.name),
        ast::Stmt::Include(i) => lower_expr(&i.name),
        ast::Stmt::Import(i) => lower_expr(&i.expr),
        ast::Stmt::FromImport(i) => lower_expr(&i.expr),
        ast::Stmt::Macro(m) => Node::Group(lower_macro(m)),
        ast::Stmt::CallBlock(c) => {
            let mut out = vec![lower_call(&c.call)];
            out.extend(lower_macro(&c.macro_decl));
            Node::Group(out)
        }
        ast::Stmt::Do(d) => lower_call(&d.call),
        _ => Node::Group(Vec::new()),
    }
}

/// Left-hand side of a binding; plain names and tuples of names are stored
fn lower_target(expr: &ast::Expr<'_>) -> Node {
    match expr {
        ast::Expr::Var(v) => Node::store(v.id),
        ast::Expr::List(l) => Node::Group(l.items.iter().map(lower_target).collect()),
        other => lower_expr(other),
    }
}

fn lower_param(expr: &ast::Expr<'_>) -> Node {
    match expr {
        ast::Expr::Var(v) => Node::Name {
            id: v.id.to_string(),
            ctx: NameContext::Param,
        },
        other => lower_expr(other),
    }
}

fn lower_expr(expr: &ast::Expr<'_>) -> Node {
    match expr {
        ast::Expr::Var(v) => Node::load(v.id),
        ast::Expr::Const(c) => Node::Const(c.value.clone()),
        ast::Expr::Slice(s) => {
            let mut out = vec![lower_expr(&s.expr)];
            out.extend(s.start.as_ref().map(lower_expr));
            out.extend(s.stop.as_ref().map(lower_expr));
            out.extend(s.step.as_ref().map(lower_expr));
            Node::Group(out)
        }
        ast::Expr::UnaryOp(u) => Node::Group(vec![lower_expr(&u.expr)]),
        ast::Expr::BinOp(b) => Node::Group(vec![lower_expr(&b.left), lower_expr(&b.right)]),
        ast::Expr::IfExpr(i) => {
            let mut out = vec![lower_expr(&i.test_expr), lower_expr(&i.true_expr)];
            out.extend(i.false_expr.as_ref().map(lower_expr));
            Node::Group(out)
        }
        ast::Expr::Filter(f) => {
            let (args, kwargs, splats) = lower_call_args(&f.args);
            Node::Filter(Box::new(Filter {
                name: f.name.to_string(),
                target: f.expr.as_ref().map(lower_expr),
                args,
                kwargs,
                splats,
            }))
        }
        ast::Expr::Test(t) => {
            let (args, kwargs, splats) = lower_call_args(&t.args);
            let mut out = vec![lower_expr(&t.expr)];
            out.extend(args);
            out.extend(kwargs.into_iter().map(|(_, v)| v));
            out.extend(splats);
            Node::Group(out)
        }
        ast::Expr::GetAttr(g) => Node::Group(vec![lower_expr(&g.expr)]),
        ast::Expr::GetItem(g) => {
            Node::Group(vec![lower_expr(&g.expr), lower_expr(&g.subscript_expr)])
        }
        ast::Expr::Call(c) => lower_call(c),
        ast::Expr::List(l) => Node::Group(l.items.iter().map(lower_expr).collect()),
        ast::Expr::Map(m) => Node::Group(
            m.keys
                .iter()
                .zip(&m.values)
                .flat_map(|(k, v)| [lower_expr(k), lower_expr(v)])
                .collect(),
        ),
        #[allow(unreachable_patterns)]
        _ => Node::Group(Vec::new()),
    }
}

/// Callee, then positional, keyword and splat arguments
fn lower_call(call: &ast::Call<'_>) -> Node {
    let (args, kwargs, splats) = lower_call_args(&call.args);
    let mut out = vec![lower_expr(&call.expr)];
    out.extend(args);
    out.extend(kwargs.into_iter().map(|(_, v)| v));
    out.extend(splats);
    Node::Group(out)
}

/// Parameters, their defaults, then the body
fn lower_macro(m: &ast::Macro<'_>) -> Vec<Node> {
    let mut out: Vec<Node> = m.args.iter().map(lower_param).collect();
    out.extend(m.defaults.iter().map(lower_expr));
    out.extend(lower_stmts(&m.body));
    out
}

type LoweredArgs = (Vec<Node>, Vec<(String, Node)>, Vec<Node>);

fn lower_call_args(call_args: &[ast::CallArg<'_>]) -> LoweredArgs {
    let mut args = Vec::new();
    let mut kwargs = Vec::new();
    let mut splats = Vec::new();
    for arg in call_args {
        match arg {
            ast::CallArg::Pos(e) => args.push(lower_expr(e)),
            ast::CallArg::Kwarg(name, e) => kwargs.push((name.to_string(), lower_expr(e))),
            ast::CallArg::PosSplat(e) | ast::CallArg::KwargSplat(e) => splats.push(lower_expr(e)),
        }
    }
    (args, kwargs, splats)
}
