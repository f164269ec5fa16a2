//! User-defined closures: capture-table construction and call semantics.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::{Scope, SymbolTable};
use frost_core::value::{Callable, Value, ValueRef};
use frost_syntax::ast::LambdaNode;
use frost_syntax::free_vars::analyze_closure;

use crate::evaluator::evaluate_body;

#[derive(Debug)]
pub struct Closure {
    lambda: Rc<LambdaNode>,
    captures: SymbolTable<'static>,
}

impl Closure {
    /// Performs free-variable analysis against `lambda`'s own params and
    /// body, then looks each free name up in `construction_scope` to build
    /// the capture table. Missing captures are unrecoverable: the closure
    /// could never run correctly.
    pub fn new(lambda: Rc<LambdaNode>, construction_scope: &dyn Scope) -> Result<Self> {
        let free = analyze_closure(&lambda.params, &lambda.body)?;
        let mut captures = SymbolTable::new();
        for name in &free {
            let value = construction_scope.lookup(name).map_err(|_| {
                tracing::debug!(symbol = %name, "closure construction failed: missing capture");
                FrostError::unrecoverable(format!("No definition found for captured symbol {name}"))
            })?;
            captures.define(name, value)?;
        }
        Ok(Self { lambda, captures })
    }
}

impl Callable for Closure {
    fn call(&self, args: &[ValueRef]) -> Result<ValueRef> {
        if args.len() > self.lambda.params.len() {
            return Err(FrostError::recoverable(format!(
                "Function <closure> called with too many arguments. Called with {} but accepts no more than {}.",
                args.len(),
                self.lambda.params.len()
            )));
        }
        let mut frame = SymbolTable::with_fallback(&self.captures);
        for (i, param) in self.lambda.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or_else(|| Rc::new(Value::Null));
            frame.define(param, value)?;
        }
        evaluate_body(&self.lambda.body, &mut frame)
    }

    fn debug_dump(&self) -> String {
        "<closure>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_syntax::ast::{Expr, ExprKind};

    fn int(i: i64) -> ValueRef {
        Rc::new(Value::Int(i))
    }

    #[test]
    fn missing_capture_is_unrecoverable() {
        let lambda = Rc::new(LambdaNode {
            params: vec!["x".to_string()],
            body: vec![Expr::new(ExprKind::Binop {
                lhs: Box::new(Expr::new(ExprKind::NameLookup("x".to_string()))),
                op: frost_syntax::ast::BinOp::Add,
                rhs: Box::new(Expr::new(ExprKind::NameLookup("y".to_string()))),
            })],
        });
        let root = SymbolTable::new();
        let err = Closure::new(lambda, &root).unwrap_err();
        assert!(err.message.contains("captured symbol y"));
        assert_eq!(err.severity, frost_core::error::Severity::Unrecoverable);
    }

    #[test]
    fn call_binds_missing_trailing_params_to_null() {
        let lambda = Rc::new(LambdaNode {
            params: vec!["x".to_string(), "y".to_string()],
            body: vec![Expr::new(ExprKind::NameLookup("y".to_string()))],
        });
        let root = SymbolTable::new();
        let closure = Closure::new(lambda, &root).unwrap();
        let result = closure.call(&[int(1)]).unwrap();
        assert_eq!(*result, Value::Null);
    }

    #[test]
    fn call_rejects_excess_arguments() {
        let lambda = Rc::new(LambdaNode { params: vec!["x".to_string()], body: vec![] });
        let root = SymbolTable::new();
        let closure = Closure::new(lambda, &root).unwrap();
        let err = closure.call(&[int(1), int(2)]).unwrap_err();
        assert!(err.is_recoverable());
    }
}
