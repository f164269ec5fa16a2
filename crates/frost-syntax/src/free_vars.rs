//! Free-variable analysis: produces the ordered symbol-action stream for
//! each AST node and, from it, the free-name set a lambda must capture.

use std::collections::HashSet;

use frost_core::error::{FrostError, Result};
use indexmap::IndexSet;

use crate::ast::{Expr, ExprKind, MapKeyExpr, PatternName};

/// One read or write an AST node performs, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolAction {
    Usage(String),
    Definition(String),
}

use SymbolAction::{Definition, Usage};

/// The ordered stream of reads/writes `expr` performs when evaluated.
///
/// A nested `Lambda` contributes `Usage` events for its own free names
/// (the names it will capture), not a walk of its body: evaluating a
/// lambda literal only *constructs* a closure, it does not run the body.
pub fn action_stream(expr: &Expr) -> Vec<SymbolAction> {
    let mut out = Vec::new();
    collect(expr, &mut out);
    out
}

fn collect(expr: &Expr, out: &mut Vec<SymbolAction>) {
    match &expr.kind {
        ExprKind::Literal(_) => {}
        ExprKind::NameLookup(name) => out.push(Usage(name.clone())),
        ExprKind::Binop { lhs, rhs, .. } => {
            collect(lhs, out);
            collect(rhs, out);
        }
        ExprKind::Unop { operand, .. } => collect(operand, out),
        ExprKind::Index { base, index } => {
            collect(base, out);
            collect(index, out);
        }
        ExprKind::FunctionCall { callee, args } => {
            collect(callee, out);
            for a in args {
                collect(a, out);
            }
        }
        ExprKind::If { branches, else_body } => {
            for branch in branches {
                collect(&branch.condition, out);
                collect(&branch.body, out);
            }
            if let Some(e) = else_body {
                collect(e, out);
            }
        }
        ExprKind::ArrayConstructor(elems) => {
            for e in elems {
                collect(e, out);
            }
        }
        ExprKind::MapConstructor(entries) => {
            for entry in entries {
                if let MapKeyExpr::Computed(k) = &entry.key {
                    collect(k, out);
                }
                collect(&entry.value, out);
            }
        }
        ExprKind::Lambda(lambda) => {
            for name in free_names_lenient(&lambda.params, &lambda.body) {
                out.push(Usage(name));
            }
        }
        ExprKind::Map { structure, operation }
        | ExprKind::Filter { structure, operation }
        | ExprKind::Foreach { structure, operation } => {
            collect(structure, out);
            collect(operation, out);
        }
        ExprKind::Reduce { structure, operation, init } => {
            collect(structure, out);
            collect(operation, out);
            if let Some(i) = init {
                collect(i, out);
            }
        }
        ExprKind::Define { name, expr, .. } => {
            collect(expr, out);
            out.push(Definition(name.clone()));
        }
        ExprKind::ArrayDestructure { pattern, expr, .. } => {
            collect(expr, out);
            for name in &pattern.names {
                if let PatternName::Bind(n) = name {
                    out.push(Definition(n.clone()));
                }
            }
            if let Some(PatternName::Bind(n)) = &pattern.rest {
                out.push(Definition(n.clone()));
            }
        }
        ExprKind::MapDestructure { pattern, expr, .. } => {
            collect(expr, out);
            for entry in &pattern.entries {
                if let MapKeyExpr::Computed(k) = &entry.key {
                    collect(k, out);
                }
                if let PatternName::Bind(n) = &entry.binding {
                    out.push(Definition(n.clone()));
                }
            }
        }
        ExprKind::FormatString(segments) => {
            for seg in segments {
                if let crate::ast::FormatSegment::Placeholder(name) = seg {
                    out.push(Usage(name.clone()));
                }
            }
        }
    }
}

/// Free names of a lambda body given its parameters, without enforcing
/// duplicate-parameter or parameter-redefinition rules. Used when a lambda
/// is nested inside another lambda's body: its own construction-time
/// errors are checked when *it* is evaluated, not by its enclosing scope's
/// analysis.
fn free_names_lenient(params: &[String], body: &[Expr]) -> Vec<String> {
    let mut defined: HashSet<String> = params.iter().cloned().collect();
    let mut free = IndexSet::new();
    for stmt in body {
        for action in action_stream(stmt) {
            match action {
                Usage(name) => {
                    if !defined.contains(&name) {
                        free.insert(name);
                    }
                }
                Definition(name) => {
                    defined.insert(name);
                }
            }
        }
    }
    free.into_iter().collect()
}

/// Full construction-time analysis for a lambda: rejects duplicate
/// parameters and parameters redefined by a body statement, then returns
/// the ordered list of free names to capture.
pub fn analyze_closure(params: &[String], body: &[Expr]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    for p in params {
        if !seen.insert(p.as_str()) {
            return Err(FrostError::unrecoverable(format!(
                "Duplicate parameter name '{p}' in function definition"
            )));
        }
    }

    let mut defined: HashSet<String> = params.iter().cloned().collect();
    let mut free = IndexSet::new();
    for stmt in body {
        for action in action_stream(stmt) {
            match action {
                Usage(name) => {
                    if !defined.contains(&name) {
                        free.insert(name);
                    }
                }
                Definition(name) => {
                    if params.contains(&name) {
                        return Err(FrostError::unrecoverable(format!(
                            "Parameter '{name}' redefined in function body"
                        )));
                    }
                    defined.insert(name);
                }
            }
        }
    }
    Ok(free.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, LambdaNode};
    use std::rc::Rc;

    fn name(n: &str) -> Expr {
        Expr::new(ExprKind::NameLookup(n.to_string()))
    }

    #[test]
    fn simple_body_captures_one_free_name() {
        let body = vec![Expr::new(ExprKind::Binop {
            lhs: Box::new(name("x")),
            op: BinOp::Add,
            rhs: Box::new(name("y")),
        })];
        let free = analyze_closure(&["x".to_string()], &body).unwrap();
        assert_eq!(free, vec!["y".to_string()]);
    }

    #[test]
    fn define_before_use_removes_name_from_free_set() {
        let body = vec![
            Expr::new(ExprKind::Define { name: "x".to_string(), expr: Box::new(name("y")), export: false }),
            name("x"),
        ];
        let free = analyze_closure(&[], &body).unwrap();
        assert_eq!(free, vec!["y".to_string()]);
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let err = analyze_closure(&["x".to_string(), "x".to_string()], &[]).unwrap_err();
        assert!(err.message.contains("Duplicate parameter"));
    }

    #[test]
    fn redefining_a_parameter_in_the_body_is_rejected() {
        let body = vec![Expr::new(ExprKind::Define { name: "x".to_string(), expr: Box::new(name("y")), export: false })];
        let err = analyze_closure(&["x".to_string()], &body).unwrap_err();
        assert!(err.message.contains("redefined"));
    }

    #[test]
    fn nested_lambda_contributes_its_own_free_names() {
        let inner = Rc::new(LambdaNode { params: vec!["z".to_string()], body: vec![name("outer_var")] });
        let body = vec![Expr::new(ExprKind::Lambda(inner))];
        let free = analyze_closure(&[], &body).unwrap();
        assert_eq!(free, vec!["outer_var".to_string()]);
    }
}
