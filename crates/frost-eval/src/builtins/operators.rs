//! Binary operators exposed as ordinary callables (`plus`, `minus`, …),
//! so higher-order forms like `reduce`/`fold` can take an operator
//! directly instead of a wrapping lambda.

use std::rc::Rc;

use frost_core::error::Result;
use frost_core::value::{deep_equal, Value, ValueRef};

use super::{native, Arity};
use frost_core::symbol_table::SymbolTable;

macro_rules! free_binop {
    ($table:expr, $name:literal, $method:ident) => {
        $table.define(
            $name,
            native($name, Arity::exact(2), |a| Ok(Rc::new(a[0].$method(&a[1])?))),
        )?;
    };
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    free_binop!(table, "plus", add);
    free_binop!(table, "minus", subtract);
    free_binop!(table, "times", multiply);
    free_binop!(table, "divide", divide);
    free_binop!(table, "less_than", less_than);
    free_binop!(table, "less_than_or_equal", less_than_or_equal);
    free_binop!(table, "greater_than", greater_than);
    free_binop!(table, "greater_than_or_equal", greater_than_or_equal);

    table.define("equal", native("equal", Arity::exact(2), |a| {
        Ok(Rc::new(a[0].equal(&a[1])))
    }))?;
    table.define("not_equal", native("not_equal", Arity::exact(2), |a| {
        Ok(Rc::new(a[0].not_equal(&a[1])))
    }))?;
    table.define("deep_equal", native("deep_equal", Arity::exact(2), |a| {
        Ok(Rc::new(Value::Bool(deep_equal(&a[0], &a[1]))))
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_syntax::parser::parse_program;

    fn run(src: &str) -> ValueRef {
        let program = parse_program(src).unwrap();
        let mut table = SymbolTable::new();
        install(&mut table).unwrap();
        crate::evaluator::execute_program(&program, &mut table).unwrap().value
    }

    #[test]
    fn plus_matches_the_add_operator() {
        assert_eq!(*run("plus(1, 2)"), Value::Int(3));
    }

    #[test]
    fn deep_equal_compares_structurally() {
        assert_eq!(*run("deep_equal([1,2], [1,2])"), Value::Bool(true));
    }

    #[test]
    fn operator_function_composes_with_reduce() {
        assert_eq!(*run("reduce [1,2,3,4] with plus"), Value::Int(10));
    }
}
