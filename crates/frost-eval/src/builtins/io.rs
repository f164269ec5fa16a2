//! Console output and map-driven string formatting: `print`, `mformat`,
//! `mprint`.
//!
//! `mformat`/`mprint` substitute `${key}` placeholders in a format string
//! with values looked up in a replacement `Map` — a runtime counterpart to
//! the language's own `$"...${name}..."` literal, which instead resolves
//! placeholders against lexical scope at parse time.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{Value, ValueRef};

use super::{expect_string, native, Arity};

fn null() -> ValueRef {
    Rc::new(Value::Null)
}

fn is_identifier_like(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn mformat_impl(fmt: &str, map: &frost_core::value::FrostMap) -> Result<String> {
    let mut out = String::new();
    let mut rest = fmt;
    loop {
        let Some(start) = rest.find("${") else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(FrostError::recoverable("Unterminated format placeholder"));
        };
        let key = &after[..end];
        if key.is_empty() {
            return Err(FrostError::recoverable("Empty format placeholder"));
        }
        if !is_identifier_like(key) {
            return Err(FrostError::recoverable(format!(
                "Invalid format placeholder: {key}"
            )));
        }
        let key_value = Value::String(Rc::from(key));
        let replacement = map.get(&key_value).ok_or_else(|| {
            FrostError::recoverable(format!("Missing replacement for key: {key}"))
        })?;
        if matches!(&**replacement, Value::Null) {
            return Err(FrostError::recoverable(format!(
                "Replacement value for key {key} is null"
            )));
        }
        out.push_str(&replacement.to_internal_string(false));
        rest = &after[end + 1..];
    }
    Ok(out)
}

fn expect_map<'v>(v: &'v Value, who: &str) -> Result<&'v frost_core::value::FrostMap> {
    match v {
        Value::Map(m) => Ok(m),
        other => Err(FrostError::recoverable(format!(
            "Function {who} expects a Map, got {}",
            frost_core::value::type_name(other)
        ))),
    }
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("print", native("print", Arity::exact(1), |a| {
        println!("{}", a[0].to_internal_string(false));
        Ok(null())
    }))?;

    table.define("mformat", native("mformat", Arity::exact(2), |a| {
        let fmt = expect_string(&a[0], "mformat")?;
        let map = expect_map(&a[1], "mformat")?;
        Ok(Rc::new(Value::String(Rc::from(mformat_impl(fmt, map)?.as_str()))))
    }))?;

    table.define("mprint", native("mprint", Arity::exact(2), |a| {
        let fmt = expect_string(&a[0], "mprint")?;
        let map = expect_map(&a[1], "mprint")?;
        println!("{}", mformat_impl(fmt, map)?);
        Ok(null())
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
    fn print_returns_null_regardless_of_argument() {
        assert_eq!(*run(r#"print("hello")"#), Value::Null);
    }

    #[test]
    fn mformat_substitutes_placeholders_from_the_map() {
        assert_eq!(
            run(r#"mformat("hello ${name}!", {name: "world"})"#).to_internal_string(false),
            "hello world!"
        );
    }

    #[test]
    fn mformat_rejects_a_missing_key() {
        let program = parse_program(r#"mformat("${missing}", {})"#).unwrap();
        let mut table = SymbolTable::new();
        install(&mut table).unwrap();
        let err = crate::evaluator::execute_program(&program, &mut table).unwrap_err();
        assert!(err.message.contains("Missing replacement"));
    }

    #[test]
    fn mformat_rejects_a_null_replacement() {
        let program = parse_program(r#"mformat("${x}", {x: null})"#).unwrap();
        let mut table = SymbolTable::new();
        install(&mut table).unwrap();
        let err = crate::evaluator::execute_program(&program, &mut table).unwrap_err();
        assert!(err.message.contains("is null"));
    }
}
