//! Tree-walking evaluator: per-node evaluation of arithmetic, control flow,
//! the higher-order forms, destructuring, and exports.
//!
//! Every node is evaluated against a [`SymbolTable`] frame. Statement nodes
//! (`Define`, `ArrayDestructure`, `MapDestructure`) bind names as a side
//! effect and are not themselves "expression statements" — see
//! [`evaluate_body`] and [`execute_program`] for how that distinction
//! surfaces in a function body's or program's result value.

use std::rc::Rc;

use indexmap::IndexMap;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::{Scope, SymbolTable};
use frost_core::value::{deep_equal, type_name, Callable, FrostMap, Value, ValueRef};
use frost_syntax::ast::{
    ArrayPattern, BinOp, Expr, ExprKind, FormatSegment, MapKeyExpr, MapPattern, PatternName,
    Program, UnOp,
};

use crate::closure::Closure;

fn null() -> ValueRef {
    Rc::new(Value::Null)
}

/// Calls `callee`, erroring if it isn't a [`Value::Function`].
pub fn call_function(callee: &Value, args: &[ValueRef]) -> Result<ValueRef> {
    match callee {
        Value::Function(f) => f.call(args),
        other => Err(FrostError::recoverable(format!(
            "Cannot call incompatible type: {} is not a function",
            type_name(other)
        ))),
    }
}

/// Evaluates a single expression node against `frame`.
pub fn evaluate(expr: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    match &expr.kind {
        ExprKind::Literal(v) => Ok(v.clone()),
        ExprKind::NameLookup(name) => frame.lookup(name),
        ExprKind::Binop { lhs, op, rhs } => eval_binop(lhs, *op, rhs, frame),
        ExprKind::Unop { op, operand } => eval_unop(*op, operand, frame),
        ExprKind::Index { base, index } => eval_index(base, index, frame),
        ExprKind::FunctionCall { callee, args } => eval_call(callee, args, frame),
        ExprKind::If { branches, else_body } => eval_if(branches, else_body, frame),
        ExprKind::ArrayConstructor(elems) => {
            let mut out = Vec::with_capacity(elems.len());
            for e in elems {
                out.push(evaluate(e, frame)?);
            }
            Ok(Rc::new(Value::Array(Rc::new(out))))
        }
        ExprKind::MapConstructor(entries) => {
            let mut map = FrostMap::new();
            for entry in entries {
                let key = eval_map_key(&entry.key, frame)?;
                let value = evaluate(&entry.value, frame)?;
                map.insert(key, value)?;
            }
            Ok(Rc::new(Value::Map(Rc::new(map))))
        }
        ExprKind::Lambda(lambda) => {
            let closure = Closure::new(lambda.clone(), &*frame)?;
            Ok(Rc::new(Value::Function(Rc::new(closure))))
        }
        ExprKind::Map { structure, operation } => eval_map(structure, operation, frame),
        ExprKind::Filter { structure, operation } => eval_filter(structure, operation, frame),
        ExprKind::Foreach { structure, operation } => eval_foreach(structure, operation, frame),
        ExprKind::Reduce { structure, operation, init } => {
            eval_reduce(structure, operation, init.as_deref(), frame)
        }
        ExprKind::FormatString(segments) => eval_format_string(segments, frame),
        // Statement forms: usable as an expression (e.g. as the last
        // statement of a block) but they always evaluate to Null; their
        // real effect is the binding, handled by `execute_statement`.
        ExprKind::Define { .. } | ExprKind::ArrayDestructure { .. } | ExprKind::MapDestructure { .. } => {
            execute_statement(expr, frame).map(|r| r.value)
        }
    }
}

fn eval_map_key(key: &MapKeyExpr, frame: &mut SymbolTable) -> Result<ValueRef> {
    match key {
        MapKeyExpr::Identifier(name) => Ok(Rc::new(Value::String(Rc::from(name.as_str())))),
        MapKeyExpr::Computed(expr) => evaluate(expr, frame),
    }
}

fn eval_binop(lhs: &Expr, op: BinOp, rhs: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    // `and`/`or` short-circuit and return the deciding operand itself,
    // not a coerced boolean.
    match op {
        BinOp::Or => {
            let l = evaluate(lhs, frame)?;
            return if l.truthy() { Ok(l) } else { evaluate(rhs, frame) };
        }
        BinOp::And => {
            let l = evaluate(lhs, frame)?;
            return if !l.truthy() { Ok(l) } else { evaluate(rhs, frame) };
        }
        _ => {}
    }

    let l = evaluate(lhs, frame)?;
    let r = evaluate(rhs, frame)?;
    let result = match op {
        BinOp::Add => l.add(&r)?,
        BinOp::Subtract => l.subtract(&r)?,
        BinOp::Multiply => l.multiply(&r)?,
        BinOp::Divide => l.divide(&r)?,
        BinOp::Modulus => l.modulus(&r)?,
        BinOp::Equal => l.equal(&r),
        BinOp::NotEqual => l.not_equal(&r),
        BinOp::LessThan => l.less_than(&r)?,
        BinOp::LessThanOrEqual => l.less_than_or_equal(&r)?,
        BinOp::GreaterThan => l.greater_than(&r)?,
        BinOp::GreaterThanOrEqual => l.greater_than_or_equal(&r)?,
        BinOp::And | BinOp::Or => unreachable!("handled above"),
    };
    Ok(Rc::new(result))
}

fn eval_unop(op: UnOp, operand: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    let v = evaluate(operand, frame)?;
    match op {
        UnOp::Negate => Ok(Rc::new(v.negate()?)),
        UnOp::Not => Ok(Rc::new(v.logical_not())),
    }
}

fn eval_index(base: &Expr, index: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    let base_val = evaluate(base, frame)?;
    let index_val = evaluate(index, frame)?;
    match &*base_val {
        Value::Array(arr) => match &*index_val {
            Value::Int(i) => Ok(Value::index_array(arr, *i).unwrap_or_else(null)),
            other => Err(FrostError::recoverable(format!(
                "Cannot index Array with incompatible type: {}",
                type_name(other)
            ))),
        },
        Value::Map(map) => Ok(map.get(&index_val).cloned().unwrap_or_else(null)),
        other => Err(FrostError::recoverable(format!(
            "Cannot index incompatible type: {}",
            type_name(other)
        ))),
    }
}

fn eval_call(callee: &Expr, args: &[Expr], frame: &mut SymbolTable) -> Result<ValueRef> {
    let callee_val = evaluate(callee, frame)?;
    let mut arg_vals = Vec::with_capacity(args.len());
    for a in args {
        arg_vals.push(evaluate(a, frame)?);
    }
    call_function(&callee_val, &arg_vals)
}

fn eval_if(
    branches: &[frost_syntax::ast::IfBranch],
    else_body: &Option<Box<Expr>>,
    frame: &mut SymbolTable,
) -> Result<ValueRef> {
    for branch in branches {
        let cond = evaluate(&branch.condition, frame)?;
        if cond.truthy() {
            return evaluate(&branch.body, frame);
        }
    }
    match else_body {
        Some(e) => evaluate(e, frame),
        None => Ok(null()),
    }
}

fn as_array(v: &Value) -> Option<&Rc<Vec<ValueRef>>> {
    match v {
        Value::Array(a) => Some(a),
        _ => None,
    }
}

fn as_map(v: &Value) -> Option<&Rc<FrostMap>> {
    match v {
        Value::Map(m) => Some(m),
        _ => None,
    }
}

fn eval_map(structure: &Expr, operation: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    let structure_val = evaluate(structure, frame)?;
    let op_val = evaluate(operation, frame)?;
    if let Some(arr) = as_array(&structure_val) {
        let mut out = Vec::with_capacity(arr.len());
        for elem in arr.iter() {
            out.push(call_function(&op_val, &[elem.clone()])?);
        }
        return Ok(Rc::new(Value::Array(Rc::new(out))));
    }
    if let Some(map) = as_map(&structure_val) {
        let mut out = FrostMap::new();
        for (k, v) in map.iter() {
            let result = call_function(&op_val, &[k.clone(), v.clone()])?;
            let entry_map = match &*result {
                Value::Map(m) if m.len() == 1 => m.clone(),
                other => {
                    return Err(FrostError::recoverable(format!(
                        "map callback must return a single-entry Map, got {}",
                        type_name(other)
                    )))
                }
            };
            let (k2, v2) = entry_map.iter().next().expect("checked len == 1");
            if out.contains_key(k2) {
                return Err(FrostError::recoverable(format!(
                    "Key collision in map output for key {}",
                    k2.to_internal_string(true)
                )));
            }
            out.insert(k2.clone(), v2.clone())?;
        }
        return Ok(Rc::new(Value::Map(Rc::new(out))));
    }
    Err(FrostError::recoverable(format!(
        "Cannot map over incompatible type: {}",
        type_name(&structure_val)
    )))
}

fn eval_filter(structure: &Expr, operation: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    let structure_val = evaluate(structure, frame)?;
    let pred_val = evaluate(operation, frame)?;
    if let Some(arr) = as_array(&structure_val) {
        let mut out = Vec::new();
        for elem in arr.iter() {
            if call_function(&pred_val, &[elem.clone()])?.truthy() {
                out.push(elem.clone());
            }
        }
        return Ok(Rc::new(Value::Array(Rc::new(out))));
    }
    if let Some(map) = as_map(&structure_val) {
        let mut out = FrostMap::new();
        for (k, v) in map.iter() {
            if call_function(&pred_val, &[k.clone(), v.clone()])?.truthy() {
                out.insert(k.clone(), v.clone())?;
            }
        }
        return Ok(Rc::new(Value::Map(Rc::new(out))));
    }
    Err(FrostError::recoverable(format!(
        "Cannot filter over incompatible type: {}",
        type_name(&structure_val)
    )))
}

fn eval_foreach(structure: &Expr, operation: &Expr, frame: &mut SymbolTable) -> Result<ValueRef> {
    let structure_val = evaluate(structure, frame)?;
    let op_val = evaluate(operation, frame)?;
    if let Some(arr) = as_array(&structure_val) {
        for elem in arr.iter() {
            if !call_function(&op_val, &[elem.clone()])?.truthy() {
                break;
            }
        }
        return Ok(null());
    }
    if let Some(map) = as_map(&structure_val) {
        for (k, v) in map.iter() {
            if !call_function(&op_val, &[k.clone(), v.clone()])?.truthy() {
                break;
            }
        }
        return Ok(null());
    }
    Err(FrostError::recoverable(format!(
        "Cannot iterate over incompatible type: {}",
        type_name(&structure_val)
    )))
}

fn eval_reduce(
    structure: &Expr,
    operation: &Expr,
    init: Option<&Expr>,
    frame: &mut SymbolTable,
) -> Result<ValueRef> {
    let structure_val = evaluate(structure, frame)?;
    let op_val = evaluate(operation, frame)?;

    if let Some(arr) = as_array(&structure_val) {
        return match init {
            Some(init_expr) => {
                let mut acc = evaluate(init_expr, frame)?;
                for elem in arr.iter() {
                    acc = call_function(&op_val, &[acc, elem.clone()])?;
                }
                Ok(acc)
            }
            None => {
                let mut iter = arr.iter();
                let Some(first) = iter.next() else {
                    return Ok(null());
                };
                let mut acc = first.clone();
                for elem in iter {
                    acc = call_function(&op_val, &[acc, elem.clone()])?;
                }
                Ok(acc)
            }
        };
    }

    if let Some(map) = as_map(&structure_val) {
        let Some(init_expr) = init else {
            return Err(FrostError::recoverable(
                "reduce over a Map requires an init value",
            ));
        };
        let mut acc = evaluate(init_expr, frame)?;
        for (k, v) in map.iter() {
            acc = call_function(&op_val, &[acc, k.clone(), v.clone()])?;
        }
        return Ok(acc);
    }

    Err(FrostError::recoverable(format!(
        "Cannot reduce incompatible type: {}",
        type_name(&structure_val)
    )))
}

fn eval_format_string(segments: &[FormatSegment], frame: &mut SymbolTable) -> Result<ValueRef> {
    let mut out = String::new();
    for seg in segments {
        match seg {
            FormatSegment::Literal(text) => out.push_str(text),
            FormatSegment::Placeholder(name) => {
                let value = frame.lookup(name)?;
                out.push_str(&value.to_internal_string(false));
            }
        }
    }
    Ok(Rc::new(Value::String(Rc::from(out.as_str()))))
}

/// Outcome of executing one top-level statement: the value it leaves
/// behind (`Null` for pure-binding statements, which are not "expression
/// statements") plus any `export` contributions it makes.
pub struct StatementOutcome {
    pub value: ValueRef,
    pub is_expression: bool,
    pub exports: Vec<(String, ValueRef)>,
}

/// Executes one statement, performing any binding it contains.
pub fn execute_statement(stmt: &Expr, frame: &mut SymbolTable) -> Result<StatementOutcome> {
    match &stmt.kind {
        ExprKind::Define { name, expr, export } => {
            let value = evaluate(expr, frame)?;
            frame.define(name, value.clone())?;
            let exports = if *export { vec![(name.clone(), value)] } else { vec![] };
            Ok(StatementOutcome { value: null(), is_expression: false, exports })
        }
        ExprKind::ArrayDestructure { pattern, expr, export } => {
            let value = evaluate(expr, frame)?;
            let exports = destructure_array(pattern, &value, *export, frame)?;
            Ok(StatementOutcome { value: null(), is_expression: false, exports })
        }
        ExprKind::MapDestructure { pattern, expr, export } => {
            let value = evaluate(expr, frame)?;
            let exports = destructure_map(pattern, &value, *export, frame)?;
            Ok(StatementOutcome { value: null(), is_expression: false, exports })
        }
        _ => {
            let value = evaluate(stmt, frame)?;
            Ok(StatementOutcome { value, is_expression: true, exports: vec![] })
        }
    }
}

fn destructure_array(
    pattern: &ArrayPattern,
    value: &Value,
    export: bool,
    frame: &mut SymbolTable,
) -> Result<Vec<(String, ValueRef)>> {
    let Value::Array(arr) = value else {
        return Err(FrostError::recoverable(format!(
            "Cannot destructure incompatible type as Array: {}",
            type_name(value)
        )));
    };
    let required = pattern.names.len();
    if pattern.rest.is_some() {
        if arr.len() < required {
            return Err(FrostError::recoverable(format!(
                "Array destructure expected at least {required} elements, got {}",
                arr.len()
            )));
        }
    } else if arr.len() != required {
        return Err(FrostError::recoverable(format!(
            "Array destructure expected exactly {required} elements, got {}",
            arr.len()
        )));
    }

    let mut exports = Vec::new();
    for (i, name) in pattern.names.iter().enumerate() {
        if let PatternName::Bind(n) = name {
            let value = arr[i].clone();
            frame.define(n, value.clone())?;
            if export {
                exports.push((n.clone(), value));
            }
        }
    }
    if let Some(PatternName::Bind(n)) = &pattern.rest {
        let rest: Vec<ValueRef> = arr[required..].to_vec();
        let value = Rc::new(Value::Array(Rc::new(rest)));
        frame.define(n, value.clone())?;
        if export {
            exports.push((n.clone(), value));
        }
    }
    Ok(exports)
}

fn destructure_map(
    pattern: &MapPattern,
    value: &Value,
    export: bool,
    frame: &mut SymbolTable,
) -> Result<Vec<(String, ValueRef)>> {
    let Value::Map(map) = value else {
        return Err(FrostError::recoverable(format!(
            "Cannot destructure incompatible type as Map: {}",
            type_name(value)
        )));
    };

    let mut exports = Vec::new();
    for entry in &pattern.entries {
        let key = match &entry.key {
            MapKeyExpr::Identifier(name) => Rc::new(Value::String(Rc::from(name.as_str()))),
            MapKeyExpr::Computed(expr) => evaluate(expr, frame)?,
        };
        let bound = map.get(&key).cloned().unwrap_or_else(null);
        if let PatternName::Bind(n) = &entry.binding {
            frame.define(n, bound.clone())?;
            if export {
                exports.push((n.clone(), bound));
            }
        }
    }
    Ok(exports)
}

/// Executes a lambda/closure body: statements run in order; the result is
/// the value of the last *expression* statement, or `Null` if the last
/// statement is a binding statement or the body is empty.
pub fn evaluate_body(body: &[Expr], frame: &mut SymbolTable) -> Result<ValueRef> {
    let mut result = null();
    for stmt in body {
        let outcome = execute_statement(stmt, frame)?;
        result = if outcome.is_expression { outcome.value } else { null() };
    }
    Ok(result)
}

/// The result of executing a whole program: its trailing value, plus the
/// export record collected from every `export def` / exported
/// destructure binding at the top level.
pub struct ProgramOutcome {
    pub value: ValueRef,
    pub exports: IndexMap<String, ValueRef>,
}

/// Executes every top-level statement of `program` against `frame`,
/// collecting the export record. Repeated `export` of the same name is
/// treated as a redefinition (unrecoverable), per §9 of the design.
pub fn execute_program(program: &Program, frame: &mut SymbolTable) -> Result<ProgramOutcome> {
    let mut exports = IndexMap::new();
    let mut value = null();
    for stmt in &program.statements {
        let outcome = execute_statement(stmt, frame)?;
        value = if outcome.is_expression { outcome.value } else { null() };
        for (name, exported_value) in outcome.exports {
            if exports.contains_key(&name) {
                tracing::debug!(%name, "rejecting repeated export");
                return Err(FrostError::unrecoverable(format!(
                    "Redefinition of exported name '{name}'"
                )));
            }
            exports.insert(name, exported_value);
        }
    }
    tracing::trace!(exports = exports.len(), "program executed");
    Ok(ProgramOutcome { value, exports })
}

/// True iff `a` and `b` are the same value under [`deep_equal`]; exposed
/// for callers (e.g. builtins) that need value equality without going
/// through the `==` operator's `Result`-returning wrapper.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    deep_equal(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::symbol_table::SymbolTable;
    use frost_syntax::parser::parse_program;

    fn run(src: &str) -> ValueRef {
        let program = parse_program(src).unwrap();
        let mut frame = SymbolTable::new();
        execute_program(&program, &mut frame).unwrap().value
    }

    #[test]
    fn if_elif_else_picks_first_truthy_branch() {
        let v = run("if true: 1 elif 0: 2 else: 3");
        assert_eq!(*v, Value::Int(1));
    }

    #[test]
    fn export_collects_into_record_and_leaves_trailing_value() {
        let program = parse_program("def x = 1\nexport def y = x + 2\ny").unwrap();
        let mut frame = SymbolTable::new();
        let outcome = execute_program(&program, &mut frame).unwrap();
        assert_eq!(*outcome.value, Value::Int(3));
        assert_eq!(outcome.exports.len(), 1);
        assert_eq!(*outcome.exports["y"], Value::Int(3));
    }

    #[test]
    fn map_over_array_preserves_order() {
        let program = parse_program("map [1,2,3] with fn(x) -> { x * x }").unwrap();
        let mut frame = SymbolTable::new();
        let outcome = execute_program(&program, &mut frame).unwrap();
        assert_eq!(outcome.value.to_internal_string(false), "[1, 4, 9]");
    }

    #[test]
    fn reduce_over_map_with_init() {
        let v = run("reduce {a:1, b:2} with fn(acc,k,v) -> { acc + v } init: 0");
        assert_eq!(*v, Value::Int(3));
    }

    #[test]
    fn reduce_over_map_without_init_is_recoverable_error() {
        let program = parse_program("reduce {a:1} with fn(acc,k,v) -> { acc }").unwrap();
        let mut frame = SymbolTable::new();
        let err = execute_program(&program, &mut frame).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn reduce_single_element_array_returns_element_without_calling_f() {
        let v = run("reduce [42] with fn(acc,x) -> { acc / 0 }");
        assert_eq!(*v, Value::Int(42));
    }

    #[test]
    fn reduce_empty_array_is_null() {
        let v = run("reduce [] with fn(acc,x) -> { acc }");
        assert_eq!(*v, Value::Null);
    }

    #[test]
    fn array_destructure_with_rest() {
        let v = run("def [a, _, ...rest] = [10, 20, 30, 40]; rest");
        assert_eq!(v.to_internal_string(false), "[30, 40]");
    }

    #[test]
    fn array_destructure_wrong_length_without_rest_is_error() {
        let program = parse_program("def [a, b] = [1, 2, 3]").unwrap();
        let mut frame = SymbolTable::new();
        let err = execute_program(&program, &mut frame).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn map_destructure_missing_key_binds_null() {
        let v = run("def {x: a, missing: b} = {x: 1}; b");
        assert_eq!(*v, Value::Null);
    }

    #[test]
    fn ufcs_threads_into_innermost_call() {
        let v = run("def f = fn(x,y) -> { [x, y] }\n1 @ f(2)");
        assert_eq!(v.to_internal_string(false), "[1, 2]");
    }

    #[test]
    fn and_or_return_deciding_operand_not_a_bool() {
        assert_eq!(*run("0 or 5"), Value::Int(5));
        assert_eq!(*run("5 and 0"), Value::Int(0));
        assert_eq!(*run("3 and 7"), Value::Int(7));
    }

    #[test]
    fn foreach_stops_on_falsy_return_and_yields_null() {
        // With no builtins installed, mutation isn't observable; we only
        // check the short-circuit doesn't evaluate the erroring branch.
        let v = run("foreach [1,2,3] with fn(x) -> { if x == 2: false else: 1 / 0 }");
        assert_eq!(*v, Value::Null);
    }

    #[test]
    fn closure_missing_capture_is_unrecoverable_during_evaluation() {
        let program = parse_program("fn(x) -> { x + y }").unwrap();
        let mut frame = SymbolTable::new();
        let err = execute_program(&program, &mut frame).unwrap_err();
        assert_eq!(err.severity, frost_core::error::Severity::Unrecoverable);
        assert!(err.message.contains("captured symbol y"));
    }

    #[test]
    fn index_out_of_range_is_null_not_error() {
        assert_eq!(*run("[1,2,3][10]"), Value::Null);
        assert_eq!(*run("[1,2,3][-10]"), Value::Null);
    }

    #[test]
    fn division_by_zero_reports_divide_or_zero() {
        let program = parse_program("1 / 0").unwrap();
        let mut frame = SymbolTable::new();
        let err = execute_program(&program, &mut frame).unwrap_err();
        assert!(err.message.contains("divide") || err.message.contains("zero"));
    }

    #[test]
    fn format_string_interpolates_by_lookup() {
        let src = "def name = \"world\"\n$\"hi ${name}\"";
        let v = run(src);
        assert_eq!(v.to_internal_string(false), "hi world");
    }
}
