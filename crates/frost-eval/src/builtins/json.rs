//! `parse_json` / `to_json`: conversion between Frost values and
//! `serde_json::Value`.
//!
//! Maps round-trip through JSON objects, which requires string keys; a
//! non-string map key is a recoverable error when serializing, exactly
//! like any other incompatible-type error in this surface.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{FrostMap, Value, ValueRef};

use super::{expect_string, native, Arity};

fn from_json(v: &serde_json::Value) -> ValueRef {
    let value = match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::String(Rc::from(s.as_str())),
        serde_json::Value::Array(items) => {
            Value::Array(Rc::new(items.iter().map(from_json).collect()))
        }
        serde_json::Value::Object(obj) => {
            let mut map = FrostMap::new();
            for (k, v) in obj {
                map.insert(Rc::new(Value::String(Rc::from(k.as_str()))), from_json(v))
                    .expect("string keys are always valid map keys");
            }
            Value::Map(Rc::new(map))
        }
    };
    Rc::new(value)
}

fn to_json(v: &Value) -> Result<serde_json::Value> {
    Ok(match v {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(to_json(item)?);
            }
            serde_json::Value::Array(out)
        }
        Value::Map(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map.iter() {
                let key = match &**k {
                    Value::String(s) => s.to_string(),
                    other => {
                        return Err(FrostError::recoverable(format!(
                            "Map with non-string key: \"{}\" cannot be serialized to JSON",
                            other.to_internal_string(false)
                        )))
                    }
                };
                obj.insert(key, to_json(v)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Function(_) => {
            return Err(FrostError::recoverable("Cannot serialize function to JSON"))
        }
    })
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("parse_json", native("parse_json", Arity::exact(1), |a| {
        let s = expect_string(&a[0], "parse_json")?;
        let parsed: serde_json::Value = serde_json::from_str(s).map_err(|e| {
            FrostError::recoverable(format!("Function parse_json could not parse input: {e}"))
        })?;
        Ok(from_json(&parsed))
    }))?;

    table.define("to_json", native("to_json", Arity::exact(1), |a| {
        let json = to_json(&a[0])?;
        let text = serde_json::to_string(&json).expect("a converted Frost value always serializes");
        Ok(Rc::new(Value::String(Rc::from(text.as_str()))))
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
    fn parse_json_builds_nested_arrays_and_maps() {
        let v = run(r#"parse_json("{\"a\": [1, 2, true, null]}")"#);
        match &*v {
            Value::Map(m) => {
                let arr = m.get(&Value::String(Rc::from("a"))).unwrap();
                assert_eq!(arr.to_internal_string(false), "[1, 2, true, null]");
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn to_json_round_trips_an_array_of_ints() {
        assert_eq!(run("to_json([1,2,3])").to_internal_string(false), "[1,2,3]");
    }

    #[test]
    fn to_json_rejects_non_string_map_keys() {
        let program = parse_program("to_json({[1]: 2})").unwrap();
        let mut table = SymbolTable::new();
        install(&mut table).unwrap();
        let err = crate::evaluator::execute_program(&program, &mut table).unwrap_err();
        assert!(err.message.contains("cannot be serialized to JSON"));
    }
}
