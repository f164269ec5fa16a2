//! Math functions: thin wrappers over `f64`/`i64` standard-library
//! operations (§4.6 — "unary float and binary variants from the standard
//! library, plus `abs, round, hypot, mod`").
//!
//! Every unary and binary function here coerces its arguments to `Float`
//! and returns a `Float`, even when called with `Int` arguments — only
//! `abs`, `round`, and `mod` are Int-aware.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{type_name, Value, ValueRef};

use super::{native, Arity};

fn as_f64(v: &Value, who: &str) -> Result<f64> {
    match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        other => Err(FrostError::recoverable(format!(
            "Function {who} expects a numeric argument, got {}",
            type_name(other)
        ))),
    }
}

macro_rules! unary_fn {
    ($table:expr, $name:literal, $op:expr) => {
        $table.define(
            $name,
            native($name, Arity::exact(1), |a| {
                let x = as_f64(&a[0], $name)?;
                Ok(Rc::new(Value::Float(($op)(x))))
            }),
        )?;
    };
}

macro_rules! binary_fn {
    ($table:expr, $name:literal, $op:expr) => {
        $table.define(
            $name,
            native($name, Arity::exact(2), |a| {
                let x = as_f64(&a[0], $name)?;
                let y = as_f64(&a[1], $name)?;
                Ok(Rc::new(Value::Float(($op)(x, y))))
            }),
        )?;
    };
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    unary_fn!(table, "sqrt", f64::sqrt);
    unary_fn!(table, "cbrt", f64::cbrt);
    unary_fn!(table, "sin", f64::sin);
    unary_fn!(table, "cos", f64::cos);
    unary_fn!(table, "tan", f64::tan);
    unary_fn!(table, "asin", f64::asin);
    unary_fn!(table, "acos", f64::acos);
    unary_fn!(table, "atan", f64::atan);
    unary_fn!(table, "sinh", f64::sinh);
    unary_fn!(table, "cosh", f64::cosh);
    unary_fn!(table, "tanh", f64::tanh);
    unary_fn!(table, "asinh", f64::asinh);
    unary_fn!(table, "acosh", f64::acosh);
    unary_fn!(table, "atanh", f64::atanh);
    unary_fn!(table, "log", f64::ln);
    unary_fn!(table, "log1p", f64::ln_1p);
    unary_fn!(table, "log2", f64::log2);
    unary_fn!(table, "log10", f64::log10);
    unary_fn!(table, "ceil", f64::ceil);
    unary_fn!(table, "floor", f64::floor);
    unary_fn!(table, "trunc", f64::trunc);
    unary_fn!(table, "exp", f64::exp);
    unary_fn!(table, "exp2", f64::exp2);
    unary_fn!(table, "expm1", f64::exp_m1);

    binary_fn!(table, "pow", f64::powf);
    binary_fn!(table, "min", f64::min);
    binary_fn!(table, "max", f64::max);
    binary_fn!(table, "atan2", f64::atan2);

    table.define("hypot", native("hypot", Arity::range(2, 3), |a| {
        let x = as_f64(&a[0], "hypot")?;
        let y = as_f64(&a[1], "hypot")?;
        let h = x.hypot(y);
        let h = match a.get(2) {
            Some(z) => h.hypot(as_f64(z, "hypot")?),
            None => h,
        };
        Ok(Rc::new(Value::Float(h)))
    }))?;

    table.define("abs", native("abs", Arity::exact(1), |a| {
        match &*a[0] {
            Value::Int(i) => {
                if *i == i64::MIN {
                    return Err(FrostError::recoverable(
                        "Function abs cannot take abs of minimum Int",
                    ));
                }
                Ok(Rc::new(Value::Int(i.abs())))
            }
            Value::Float(f) => Ok(Rc::new(Value::Float(f.abs()))),
            other => Err(FrostError::recoverable(format!(
                "Function abs expects a numeric argument, got {}",
                type_name(other)
            ))),
        }
    }))?;

    table.define("round", native("round", Arity::exact(1), |a| {
        match &*a[0] {
            Value::Int(i) => Ok(Rc::new(Value::Int(*i))),
            Value::Float(f) => {
                let rounded = f.round();
                if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 || rounded.is_nan() {
                    return Err(FrostError::recoverable(
                        "Function round produced a value out of range of Int",
                    ));
                }
                Ok(Rc::new(Value::Int(rounded as i64)))
            }
            other => Err(FrostError::recoverable(format!(
                "Function round expects a numeric argument, got {}",
                type_name(other)
            ))),
        }
    }))?;

    table.define("mod", native("mod", Arity::exact(2), |a| {
        let lhs = match &*a[0] {
            Value::Int(i) => *i,
            other => {
                return Err(FrostError::recoverable(format!(
                    "Function mod expects an Int, got {}",
                    type_name(other)
                )))
            }
        };
        let rhs = match &*a[1] {
            Value::Int(i) => *i,
            other => {
                return Err(FrostError::recoverable(format!(
                    "Function mod expects an Int, got {}",
                    type_name(other)
                )))
            }
        };
        if rhs == 0 {
            return Err(FrostError::recoverable("Cannot modulus by 0"));
        }
        if rhs == -1 && lhs == i64::MIN {
            return Err(FrostError::recoverable(
                "Function mod cannot modulus minimum Int by -1",
            ));
        }
        Ok(Rc::new(Value::Int(lhs % rhs)))
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
    fn abs_preserves_int_type() {
        assert_eq!(*run("abs(-3)"), Value::Int(3));
    }

    #[test]
    fn sqrt_of_four_is_two() {
        assert_eq!(run("sqrt(4.0)").to_internal_string(false), "2.0");
    }

    #[test]
    fn min_and_max_always_return_float() {
        assert_eq!(run("min(2, 3)").to_internal_string(false), "2.0");
        assert_eq!(run("max(2, 3)").to_internal_string(false), "3.0");
    }

    #[test]
    fn mod_on_ints_matches_modulus_operator() {
        assert_eq!(*run("mod(7, 3)"), Value::Int(1));
    }

    #[test]
    fn mod_rejects_float_operands() {
        let program = parse_program("mod(7.5, 3)").unwrap();
        let mut table = SymbolTable::new();
        install(&mut table).unwrap();
        let err = crate::evaluator::execute_program(&program, &mut table).unwrap_err();
        assert!(err.message.contains("Function mod"));
    }

    #[test]
    fn round_rounds_ties_away_from_zero() {
        assert_eq!(*run("round(2.5)"), Value::Int(3));
        assert_eq!(*run("round(-2.5)"), Value::Int(-3));
    }

    #[test]
    fn hypot_matches_pythagorean_triple() {
        assert_eq!(run("hypot(3.0, 4.0)").to_internal_string(false), "5.0");
    }

    #[test]
    fn hypot_accepts_a_third_dimension() {
        assert_eq!(
            run("hypot(1.0, 2.0, 2.0)").to_internal_string(false),
            "3.0"
        );
    }
}
