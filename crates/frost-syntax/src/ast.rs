//! Typed AST node variants and the symbol-action stream each node exposes.
//!
//! Every node has a debug label, an ordered child iterator (for the `tree`
//! printer) and a symbol-action stream (for free-variable analysis and
//! destructuring's use-before-define rule).

use std::rc::Rc;

use frost_core::ValueRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Negate,
    Not,
}

/// One arm of an `if`/`elif`/`else` chain, always evaluated in source order.
#[derive(Debug, Clone)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: Expr,
}

/// A map-literal entry key: either identifier sugar for a string key, or a
/// bracketed computed expression.
#[derive(Debug, Clone)]
pub enum MapKeyExpr {
    Identifier(String),
    Computed(Expr),
}

#[derive(Debug, Clone)]
pub struct MapEntry {
    pub key: MapKeyExpr,
    pub value: Expr,
}

/// One name in an array-destructure pattern: a binding or a discard `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternName {
    Bind(String),
    Discard,
}

#[derive(Debug, Clone)]
pub struct ArrayPattern {
    pub names: Vec<PatternName>,
    pub rest: Option<PatternName>,
}

#[derive(Debug, Clone)]
pub struct MapPatternEntry {
    pub key: MapKeyExpr,
    pub binding: PatternName,
}

#[derive(Debug, Clone)]
pub struct MapPattern {
    pub entries: Vec<MapPatternEntry>,
}

/// A literal segment or a `${name}` placeholder inside a format string.
#[derive(Debug, Clone)]
pub enum FormatSegment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct LambdaNode {
    pub params: Vec<String>,
    pub body: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(ValueRef),
    NameLookup(String),
    Binop { lhs: Box<Expr>, op: BinOp, rhs: Box<Expr> },
    Unop { op: UnOp, operand: Box<Expr> },
    Index { base: Box<Expr>, index: Box<Expr> },
    FunctionCall { callee: Box<Expr>, args: Vec<Expr> },
    If { branches: Vec<IfBranch>, else_body: Option<Box<Expr>> },
    ArrayConstructor(Vec<Expr>),
    MapConstructor(Vec<MapEntry>),
    Lambda(Rc<LambdaNode>),
    Map { structure: Box<Expr>, operation: Box<Expr> },
    Filter { structure: Box<Expr>, operation: Box<Expr> },
    Foreach { structure: Box<Expr>, operation: Box<Expr> },
    Reduce { structure: Box<Expr>, operation: Box<Expr>, init: Option<Box<Expr>> },
    Define { name: String, expr: Box<Expr>, export: bool },
    ArrayDestructure { pattern: ArrayPattern, expr: Box<Expr>, export: bool },
    MapDestructure { pattern: MapPattern, expr: Box<Expr>, export: bool },
    FormatString(Vec<FormatSegment>),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind }
    }

    /// Debug label for the `tree` printer; does not recurse into children.
    pub fn label(&self) -> String {
        match &self.kind {
            ExprKind::Literal(v) => format!("Literal({})", v.to_internal_string(false)),
            ExprKind::NameLookup(name) => format!("NameLookup({name})"),
            ExprKind::Binop { op, .. } => format!("Binop({op:?})"),
            ExprKind::Unop { op, .. } => format!("Unop({op:?})"),
            ExprKind::Index { .. } => "Index".to_string(),
            ExprKind::FunctionCall { .. } => "FunctionCall".to_string(),
            ExprKind::If { .. } => "If".to_string(),
            ExprKind::ArrayConstructor(_) => "ArrayConstructor".to_string(),
            ExprKind::MapConstructor(_) => "MapConstructor".to_string(),
            ExprKind::Lambda(l) => format!("Lambda({:?})", l.params),
            ExprKind::Map { .. } => "Map".to_string(),
            ExprKind::Filter { .. } => "Filter".to_string(),
            ExprKind::Foreach { .. } => "Foreach".to_string(),
            ExprKind::Reduce { init, .. } => format!("Reduce(init={})", init.is_some()),
            ExprKind::Define { name, export, .. } => format!("Define({name}, export={export})"),
            ExprKind::ArrayDestructure { export, .. } => format!("ArrayDestructure(export={export})"),
            ExprKind::MapDestructure { export, .. } => format!("MapDestructure(export={export})"),
            ExprKind::FormatString(_) => "FormatString".to_string(),
        }
    }

    /// Ordered child nodes, in the order they are visited during evaluation.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::NameLookup(_) => vec![],
            ExprKind::Binop { lhs, rhs, .. } => vec![lhs, rhs],
            ExprKind::Unop { operand, .. } => vec![operand],
            ExprKind::Index { base, index } => vec![base, index],
            ExprKind::FunctionCall { callee, args } => {
                let mut c = vec![callee.as_ref()];
                c.extend(args.iter());
                c
            }
            ExprKind::If { branches, else_body } => {
                let mut c = Vec::new();
                for b in branches {
                    c.push(&b.condition);
                    c.push(&b.body);
                }
                if let Some(e) = else_body {
                    c.push(e.as_ref());
                }
                c
            }
            ExprKind::ArrayConstructor(elems) => elems.iter().collect(),
            ExprKind::MapConstructor(entries) => entries
                .iter()
                .flat_map(|e| {
                    let mut v = Vec::new();
                    if let MapKeyExpr::Computed(k) = &e.key {
                        v.push(k);
                    }
                    v.push(&e.value);
                    v
                })
                .collect(),
            ExprKind::Lambda(l) => l.body.iter().collect(),
            ExprKind::Map { structure, operation }
            | ExprKind::Filter { structure, operation }
            | ExprKind::Foreach { structure, operation } => vec![structure, operation],
            ExprKind::Reduce { structure, operation, init } => {
                let mut c = vec![structure.as_ref(), operation.as_ref()];
                if let Some(i) = init {
                    c.push(i.as_ref());
                }
                c
            }
            ExprKind::Define { expr, .. } => vec![expr],
            ExprKind::ArrayDestructure { expr, .. } => vec![expr],
            ExprKind::MapDestructure { pattern, expr, .. } => {
                let mut c: Vec<&Expr> = pattern
                    .entries
                    .iter()
                    .filter_map(|e| match &e.key {
                        MapKeyExpr::Computed(k) => Some(k),
                        MapKeyExpr::Identifier(_) => None,
                    })
                    .collect();
                c.push(expr);
                c
            }
            ExprKind::FormatString(_) => vec![],
        }
    }
}

/// A program is a sequence of top-level statements (possibly empty).
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Expr>,
}
