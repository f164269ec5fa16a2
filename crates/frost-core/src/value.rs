//! The dynamic value: a shared-immutable tagged sum with operator
//! semantics, equality/ordering rules, and the two structural containers
//! (`Array`, `Map`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{FrostError, Result};

/// Values are shared by reference and never mutated after construction.
pub type ValueRef = Rc<Value>;

/// Polymorphic over `{call(args) -> value, debug_dump() -> string}`.
/// Implemented by user-defined closures, built-ins, and bound-cell
/// getters/setters.
pub trait Callable: fmt::Debug {
    fn call(&self, args: &[ValueRef]) -> Result<ValueRef>;
    fn debug_dump(&self) -> String;
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(Rc<str>),
    Array(Rc<Vec<ValueRef>>),
    Map(Rc<FrostMap>),
    Function(Rc<dyn Callable>),
}

/// Insertion-ordered mapping from primitive value to value. Lookup equality
/// treats numerically-equal `Int`/`Float` keys as the same key.
#[derive(Debug, Default)]
pub struct FrostMap {
    entries: IndexMap<MapKey, ValueRef>,
}

impl FrostMap {
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Validates `key` is primitive, then inserts/overwrites in place
    /// (existing keys keep their original position, matching `+` merge
    /// semantics: later writers override earlier values, not earlier order).
    pub fn insert(&mut self, key: ValueRef, value: ValueRef) -> Result<()> {
        let map_key = MapKey::new(key)?;
        self.entries.insert(map_key, value);
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Option<&ValueRef> {
        let probe = MapKey::probe(key)?;
        self.entries.get(&probe)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ValueRef, &ValueRef)> {
        self.entries.iter().map(|(k, v)| (&k.0, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ValueRef> {
        self.entries.keys().map(|k| &k.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &ValueRef> {
        self.entries.values()
    }
}

impl PartialEq for FrostMap {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.iter().all(|(k, v)| {
            other.get(k).is_some_and(|ov| deep_equal(v, ov))
        })
    }
}

impl FromIterator<(ValueRef, ValueRef)> for Result<FrostMap> {
    fn from_iter<I: IntoIterator<Item = (ValueRef, ValueRef)>>(iter: I) -> Self {
        let mut map = FrostMap::new();
        for (k, v) in iter {
            map.insert(k, v)?;
        }
        Ok(map)
    }
}

/// Wraps a primitive [`ValueRef`] so it can serve as an [`IndexMap`] key
/// with value-equality semantics (`Int(3)` and `Float(3.0)` are the same
/// key).
#[derive(Debug, Clone)]
struct MapKey(ValueRef);

#[derive(PartialEq, Eq, Hash)]
enum NumKey {
    Int(i64),
    FloatBits(u64),
}

fn numeric_key(v: &Value) -> Option<NumKey> {
    match v {
        Value::Int(i) => Some(NumKey::Int(*i)),
        Value::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some(NumKey::Int(*f as i64))
            } else {
                Some(NumKey::FloatBits(f.to_bits()))
            }
        }
        _ => None,
    }
}

fn is_primitive(v: &Value) -> bool {
    matches!(
        v,
        Value::Null | Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::String(_)
    )
}

impl MapKey {
    fn new(value: ValueRef) -> Result<Self> {
        if !is_primitive(&value) {
            return Err(FrostError::recoverable(format!(
                "Cannot use {} as a map key: only Null, Int, Float, Bool, and String keys are allowed",
                type_name(&value)
            )));
        }
        Ok(Self(value))
    }

    /// Build a throwaway key for lookup only; non-primitive probes simply
    /// never match (index/lookup on a non-primitive key is never an error).
    fn probe(value: &Value) -> Option<Self> {
        is_primitive(value).then(|| Self(Rc::new(value.clone())))
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        match (numeric_key(&self.0), numeric_key(&other.0)) {
            (Some(a), Some(b)) => a == b,
            (None, None) => deep_equal(&self.0, &other.0),
            _ => false,
        }
    }
}
impl Eq for MapKey {}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match numeric_key(&self.0) {
            Some(nk) => nk.hash(state),
            None => match &*self.0 {
                Value::Null => 0u8.hash(state),
                Value::Bool(b) => {
                    1u8.hash(state);
                    b.hash(state);
                }
                Value::String(s) => {
                    2u8.hash(state);
                    s.hash(state);
                }
                _ => unreachable!("non-primitive key rejected at construction"),
            },
        }
    }
}

pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "Null",
        Value::Int(_) => "Int",
        Value::Float(_) => "Float",
        Value::Bool(_) => "Bool",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Map(_) => "Map",
        Value::Function(_) => "Function",
    }
}

fn incompatible(verb: &str, op: &str, a: &Value, b: &Value) -> FrostError {
    FrostError::recoverable(format!(
        "Cannot {verb} incompatible types: {} {op} {}",
        type_name(a),
        type_name(b)
    ))
}

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Function(_) => true,
        }
    }

    pub fn logical_not(&self) -> Value {
        Value::Bool(!self.truthy())
    }

    pub fn negate(&self) -> Result<Value> {
        match self {
            Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(FrostError::recoverable(format!(
                "Cannot negate incompatible type: {}",
                type_name(other)
            ))),
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::String(a), Value::String(b)) => {
                Ok(Value::String(Rc::from(format!("{a}{b}"))))
            }
            (Value::Array(a), Value::Array(b)) => {
                let mut out = Vec::with_capacity(a.len() + b.len());
                out.extend(a.iter().cloned());
                out.extend(b.iter().cloned());
                Ok(Value::Array(Rc::new(out)))
            }
            (Value::Map(a), Value::Map(b)) => {
                let mut merged = FrostMap::new();
                for (k, v) in a.iter() {
                    merged.insert(k.clone(), v.clone())?;
                }
                for (k, v) in b.iter() {
                    merged.insert(k.clone(), v.clone())?;
                }
                Ok(Value::Map(Rc::new(merged)))
            }
            (a, b) => Err(incompatible("add", "+", a, b)),
        }
    }

    pub fn subtract(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            (a, b) => Err(incompatible("subtract", "-", a, b)),
        }
    }

    pub fn multiply(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
            (Value::String(s), Value::Int(n)) | (Value::Int(n), Value::String(s)) => {
                Ok(Value::String(Rc::from(repeat_string(s, *n)?)))
            }
            (Value::Array(arr), Value::Int(n)) | (Value::Int(n), Value::Array(arr)) => {
                Ok(Value::Array(Rc::new(repeat_array(arr, *n)?)))
            }
            (a, b) => Err(incompatible("multiply", "*", a, b)),
        }
    }

    pub fn divide(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(_), Value::Int(0)) => {
                Err(FrostError::recoverable("Cannot divide by zero"))
            }
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 / b)),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a / *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
            (a, b) => Err(incompatible("divide", "/", a, b)),
        }
    }

    pub fn modulus(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(_), Value::Int(0)) => {
                Err(FrostError::recoverable("Cannot take modulus by zero"))
            }
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
            (a, b) => Err(incompatible("take modulus of", "%", a, b)),
        }
    }

    pub fn equal(&self, rhs: &Value) -> Value {
        Value::Bool(deep_equal(self, rhs))
    }

    pub fn not_equal(&self, rhs: &Value) -> Value {
        Value::Bool(!deep_equal(self, rhs))
    }

    pub fn less_than(&self, rhs: &Value) -> Result<Value> {
        compare(self, rhs).map(|o| Value::Bool(o == std::cmp::Ordering::Less))
    }

    pub fn less_than_or_equal(&self, rhs: &Value) -> Result<Value> {
        compare(self, rhs).map(|o| Value::Bool(o != std::cmp::Ordering::Greater))
    }

    pub fn greater_than(&self, rhs: &Value) -> Result<Value> {
        compare(self, rhs).map(|o| Value::Bool(o == std::cmp::Ordering::Greater))
    }

    pub fn greater_than_or_equal(&self, rhs: &Value) -> Result<Value> {
        compare(self, rhs).map(|o| Value::Bool(o != std::cmp::Ordering::Less))
    }

    /// Python-style signed indexing: `-n <= i < n` returns the element,
    /// out of range yields `Null` rather than an error.
    pub fn index_array(array: &[ValueRef], index: i64) -> Option<ValueRef> {
        let len = array.len() as i64;
        if index >= 0 && index < len {
            return Some(array[index as usize].clone());
        }
        if index < 0 && len + index >= 0 {
            return Some(array[(len + index) as usize].clone());
        }
        None
    }

    /// Canonical textual form, used by format-string interpolation,
    /// `to_string`, and printed output.
    pub fn to_internal_string(&self, pretty: bool) -> String {
        let mut out = String::new();
        write_value(&mut out, self, false, pretty, 0);
        out
    }
}

fn repeat_string(s: &str, n: i64) -> Result<String> {
    if n < 0 {
        return Err(FrostError::recoverable(
            "Cannot multiply a String by a negative Int",
        ));
    }
    Ok(s.repeat(n as usize))
}

fn repeat_array(arr: &[ValueRef], n: i64) -> Result<Vec<ValueRef>> {
    if n < 0 {
        return Err(FrostError::recoverable(
            "Cannot multiply an Array by a negative Int",
        ));
    }
    let mut out = Vec::with_capacity(arr.len() * n as usize);
    for _ in 0..n {
        out.extend(arr.iter().cloned());
    }
    Ok(out)
}

fn compare(a: &Value, b: &Value) -> Result<std::cmp::Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Int(x), Value::Float(y)) => {
            (*x as f64).partial_cmp(y).ok_or_else(|| nan_error(a, b))
        }
        (Value::Float(x), Value::Int(y)) => {
            x.partial_cmp(&(*y as f64)).ok_or_else(|| nan_error(a, b))
        }
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).ok_or_else(|| nan_error(a, b)),
        (Value::String(x), Value::String(y)) => Ok(x.as_bytes().cmp(y.as_bytes())),
        _ => Err(FrostError::recoverable(format!(
            "Cannot compare incompatible types: {} and {}",
            type_name(a),
            type_name(b)
        ))),
    }
}

fn nan_error(a: &Value, b: &Value) -> FrostError {
    FrostError::recoverable(format!(
        "Cannot compare incompatible types: {} and {} (NaN)",
        type_name(a),
        type_name(b)
    ))
}

/// Structural deep-equality for primitives/containers; `Function` compares
/// by identity of the underlying callable.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Map(x), Value::Map(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn write_value(out: &mut String, v: &Value, in_structure: bool, pretty: bool, depth: usize) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) => {
            if in_structure {
                out.push('"');
                escape_into(out, s);
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        Value::Array(arr) => {
            out.push('[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, elem, true, pretty, depth + 1);
            }
            out.push(']');
        }
        Value::Map(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, k, true, pretty, depth + 1);
                out.push_str(": ");
                write_value(out, v, true, pretty, depth + 1);
            }
            out.push('}');
        }
        Value::Function(f) => out.push_str(&f.debug_dump()),
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
}

/// Shortest round-trip decimal with a mandatory `.`, matching the lexical
/// form required of `Float`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{f}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> ValueRef {
        Rc::new(Value::Int(i))
    }

    fn float(f: f64) -> ValueRef {
        Rc::new(Value::Float(f))
    }

    #[test]
    fn int_float_are_never_deep_equal() {
        assert!(!deep_equal(&Value::Int(3), &Value::Float(3.0)));
        assert!(!deep_equal(&Value::Int(3), &Value::Float(3.5)));
    }

    #[test]
    fn map_keys_normalize_numeric_equivalents() {
        let mut map = FrostMap::new();
        map.insert(int(3), Rc::new(Value::String(Rc::from("three")))).unwrap();
        let found = map.get(&Value::Float(3.0)).unwrap();
        assert_eq!(found.to_internal_string(false), "three");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn map_rejects_non_primitive_keys() {
        let mut map = FrostMap::new();
        let arr_key = Rc::new(Value::Array(Rc::new(vec![int(1)])));
        let err = map.insert(arr_key, int(1)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn index_array_supports_negative_indices() {
        let arr = vec![int(10), int(20), int(30)];
        assert_eq!(Value::index_array(&arr, 0).unwrap().to_internal_string(false), "10");
        assert_eq!(Value::index_array(&arr, -1).unwrap().to_internal_string(false), "30");
        assert!(Value::index_array(&arr, 3).is_none());
        assert!(Value::index_array(&arr, -4).is_none());
    }

    #[test]
    fn arithmetic_promotes_int_to_float() {
        let result = Value::Int(2).add(&Value::Float(0.5)).unwrap();
        assert_eq!(result.to_internal_string(false), "2.5");
    }

    #[test]
    fn incompatible_arithmetic_reports_types() {
        let err = Value::Int(1).add(&Value::Bool(true)).unwrap_err();
        assert!(err.message.contains("Int"));
        assert!(err.message.contains("Bool"));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let err = Value::Int(1).divide(&Value::Int(0)).unwrap_err();
        assert!(err.message.contains("divide") || err.message.contains("zero"));
    }

    #[test]
    fn truthy_matches_emptiness_rules() {
        assert!(!Value::Int(0).truthy());
        assert!(!Value::String(Rc::from("")).truthy());
        assert!(Value::String(Rc::from("x")).truthy());
        assert!(!Value::Array(Rc::new(vec![])).truthy());
    }

    #[test]
    fn float_formatting_always_has_a_decimal_point() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(3.5), "3.5");
    }

    #[test]
    fn to_internal_string_quotes_nested_strings_not_top_level() {
        let s = Value::String(Rc::from("hi"));
        assert_eq!(s.to_internal_string(false), "hi");
        let arr = Value::Array(Rc::new(vec![float(1.0), Rc::new(s)]));
        assert_eq!(arr.to_internal_string(false), "[1.0, \"hi\"]");
    }
}
