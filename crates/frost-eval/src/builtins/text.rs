//! String functions: `split`, `join`, `trim`, `upper`, `lower`,
//! `contains`, `starts_with`, `ends_with`, `replace`, `index_of`.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{Value, ValueRef};

use super::{expect_array, expect_string, native, Arity};

fn string(s: String) -> ValueRef {
    Rc::new(Value::String(Rc::from(s.as_str())))
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("split", native("split", Arity::exact(2), |a| {
        let s = expect_string(&a[0], "split")?;
        let sep = expect_string(&a[1], "split")?;
        let parts: Vec<ValueRef> = if sep.is_empty() {
            s.chars().map(|c| string(c.to_string())).collect()
        } else {
            s.split(sep).map(|p| string(p.to_string())).collect()
        };
        Ok(Rc::new(Value::Array(Rc::new(parts))))
    }))?;

    table.define("join", native("join", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "join")?;
        let sep = expect_string(&a[1], "join")?;
        let mut out = String::new();
        for (i, elem) in arr.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            match &**elem {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_internal_string(false)),
            }
        }
        Ok(string(out))
    }))?;

    table.define("trim", native("trim", Arity::exact(1), |a| {
        let s = expect_string(&a[0], "trim")?;
        Ok(string(s.trim().to_string()))
    }))?;

    table.define("upper", native("upper", Arity::exact(1), |a| {
        let s = expect_string(&a[0], "upper")?;
        Ok(string(s.to_uppercase()))
    }))?;

    table.define("lower", native("lower", Arity::exact(1), |a| {
        let s = expect_string(&a[0], "lower")?;
        Ok(string(s.to_lowercase()))
    }))?;

    table.define("contains", native("contains", Arity::exact(2), |a| {
        let s = expect_string(&a[0], "contains")?;
        let needle = expect_string(&a[1], "contains")?;
        Ok(Rc::new(Value::Bool(s.contains(needle))))
    }))?;

    table.define("starts_with", native("starts_with", Arity::exact(2), |a| {
        let s = expect_string(&a[0], "starts_with")?;
        let prefix = expect_string(&a[1], "starts_with")?;
        Ok(Rc::new(Value::Bool(s.starts_with(prefix))))
    }))?;

    table.define("ends_with", native("ends_with", Arity::exact(2), |a| {
        let s = expect_string(&a[0], "ends_with")?;
        let suffix = expect_string(&a[1], "ends_with")?;
        Ok(Rc::new(Value::Bool(s.ends_with(suffix))))
    }))?;

    table.define("replace", native("replace", Arity::exact(3), |a| {
        let s = expect_string(&a[0], "replace")?;
        let from = expect_string(&a[1], "replace")?;
        let to = expect_string(&a[2], "replace")?;
        Ok(string(s.replace(from, to)))
    }))?;

    table.define("index_of", native("index_of", Arity::exact(2), |a| {
        let s = expect_string(&a[0], "index_of")?;
        let needle = expect_string(&a[1], "index_of")?;
        match s.find(needle) {
            Some(byte_idx) => Ok(Rc::new(Value::Int(s[..byte_idx].chars().count() as i64))),
            None => Ok(Rc::new(Value::Int(-1))),
        }
    }))?;

    table.define("concat", native("concat", Arity::at_least(1), |a| {
        let mut out = String::new();
        for v in a {
            match &**v {
                Value::String(s) => out.push_str(s),
                other => {
                    return Err(FrostError::recoverable(format!(
                        "Function concat expects a String, got {}",
                        frost_core::value::type_name(other)
                    )))
                }
            }
        }
        Ok(string(out))
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
    fn split_and_join_round_trip_on_a_separator() {
        assert_eq!(
            run(r#"join(split("a,b,c", ","), "-")"#).to_internal_string(false),
            "a-b-c"
        );
    }

    #[test]
    fn upper_and_lower_are_ascii_and_unicode_aware() {
        assert_eq!(run(r#"upper("abc")"#).to_internal_string(false), "ABC");
        assert_eq!(run(r#"lower("ABC")"#).to_internal_string(false), "abc");
    }

    #[test]
    fn index_of_counts_characters_not_bytes() {
        assert_eq!(*run(r#"index_of("abc", "c")"#), Value::Int(2));
        assert_eq!(*run(r#"index_of("abc", "z")"#), Value::Int(-1));
    }

    #[test]
    fn contains_starts_ends_with_cover_substring_checks() {
        assert_eq!(*run(r#"contains("hello", "ell")"#), Value::Bool(true));
        assert_eq!(*run(r#"starts_with("hello", "he")"#), Value::Bool(true));
        assert_eq!(*run(r#"ends_with("hello", "lo")"#), Value::Bool(true));
    }
}
