//! Type predicates, container introspection, and `to_string`.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{type_name, Value, ValueRef};

use super::{native, Arity};

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("keys", native("keys", Arity::exact(1), |a| {
        match &*a[0] {
            Value::Map(m) => Ok(Rc::new(Value::Array(Rc::new(m.keys().cloned().collect())))),
            other => Err(FrostError::recoverable(format!(
                "Function keys expects a Map, got {}",
                type_name(other)
            ))),
        }
    }))?;

    table.define("values", native("values", Arity::exact(1), |a| {
        match &*a[0] {
            Value::Map(m) => Ok(Rc::new(Value::Array(Rc::new(m.values().cloned().collect())))),
            other => Err(FrostError::recoverable(format!(
                "Function values expects a Map, got {}",
                type_name(other)
            ))),
        }
    }))?;

    table.define("len", native("len", Arity::exact(1), |a| {
        let n = match &*a[0] {
            Value::String(s) => s.chars().count(),
            Value::Array(arr) => arr.len(),
            Value::Map(m) => m.len(),
            other => {
                return Err(FrostError::recoverable(format!(
                    "Function len expects a Map, Array, or String, got {}",
                    type_name(other)
                )))
            }
        };
        Ok(Rc::new(Value::Int(n as i64)))
    }))?;

    table.define("type", native("type", Arity::exact(1), |a| {
        Ok(Rc::new(Value::String(Rc::from(type_name(&a[0])))))
    }))?;

    table.define("is_null", native("is_null", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Null))))
    }))?;
    table.define("is_int", native("is_int", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Int(_)))))
    }))?;
    table.define("is_float", native("is_float", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Float(_)))))
    }))?;
    table.define("is_bool", native("is_bool", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Bool(_)))))
    }))?;
    table.define("is_string", native("is_string", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::String(_)))))
    }))?;
    table.define("is_array", native("is_array", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Array(_)))))
    }))?;
    table.define("is_map", native("is_map", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Map(_)))))
    }))?;
    table.define("is_function", native("is_function", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Function(_)))))
    }))?;
    table.define("is_nonnull", native("is_nonnull", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(!matches!(&*a[0], Value::Null))))
    }))?;
    table.define("is_numeric", native("is_numeric", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Int(_) | Value::Float(_)))))
    }))?;
    table.define("is_primitive", native("is_primitive", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(
            &*a[0],
            Value::Null | Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::String(_)
        ))))
    }))?;
    table.define("is_structured", native("is_structured", Arity::exact(1), |a| {
        Ok(Rc::new(Value::Bool(matches!(&*a[0], Value::Array(_) | Value::Map(_)))))
    }))?;

    table.define("to_string", native("to_string", Arity::exact(1), |a| {
        Ok(Rc::new(Value::String(Rc::from(a[0].to_internal_string(false).as_str()))))
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
    fn type_reports_capitalized_labels() {
        assert_eq!(run("type(1)").to_internal_string(false), "Int");
        assert_eq!(run("type(1.0)").to_internal_string(false), "Float");
        assert_eq!(run("type([1])").to_internal_string(false), "Array");
    }

    #[test]
    fn len_covers_all_three_container_kinds() {
        assert_eq!(*run(r#"len("abc")"#), Value::Int(3));
        assert_eq!(*run("len([1,2])"), Value::Int(2));
        assert_eq!(*run("len({a:1,b:2})"), Value::Int(2));
    }

    #[test]
    fn keys_and_values_preserve_insertion_order() {
        assert_eq!(run("keys({b:1, a:2})").to_internal_string(false), "[\"b\", \"a\"]");
        assert_eq!(run("values({b:1, a:2})").to_internal_string(false), "[1, 2]");
    }
}
