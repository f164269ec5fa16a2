//! Function combinators: `pack_call` (apply an Array of arguments to a
//! function) and `and_then` (null-safe chaining: skip the call if the
//! value is `Null`).

use frost_core::error::Result;
use frost_core::symbol_table::SymbolTable;
use frost_core::value::Value;

use crate::evaluator::call_function;

use super::{expect_array, native, Arity};

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("pack_call", native("pack_call", Arity::exact(2), |a| {
        let args = expect_array(&a[1], "pack_call")?;
        call_function(&a[0], args)
    }))?;

    table.define("and_then", native("and_then", Arity::exact(2), |a| {
        if matches!(&*a[0], Value::Null) {
            return Ok(a[0].clone());
        }
        call_function(&a[1], &[a[0].clone()])
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::value::ValueRef;
    use frost_syntax::parser::parse_program;

    fn run(src: &str) -> ValueRef {
        let program = parse_program(src).unwrap();
        let mut table = SymbolTable::new();
        crate::builtins::install(&mut table).unwrap();
        crate::evaluator::execute_program(&program, &mut table).unwrap().value
    }

    #[test]
    fn pack_call_unpacks_an_array_of_arguments() {
        assert_eq!(*run("pack_call(fn(a,b) -> { a + b }, [1, 2])"), Value::Int(3));
    }

    #[test]
    fn and_then_calls_the_function_on_a_nonnull_value() {
        assert_eq!(*run("and_then(5, fn(x) -> { x + 1 })"), Value::Int(6));
    }

    #[test]
    fn and_then_short_circuits_on_null() {
        assert_eq!(*run("and_then(null, fn(x) -> { x + 1 })"), Value::Null);
    }
}
