//! Range producers and array-oriented combinators: `range`, `stride`,
//! `take`, `drop`, `slide`, `chunk`, `zip`, `xprod`, `take_while`,
//! `drop_while`, `chunk_by`, `group_by`, `count_by`, `scan`, `fold`,
//! `transform`, `select`, `reverse`, `sorted`, `any`, `all`, `none`.

use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{deep_equal, FrostMap, Value, ValueRef};

use crate::evaluator::call_function;

use super::{expect_array, expect_int, native, Arity};

fn array(v: Vec<ValueRef>) -> ValueRef {
    Rc::new(Value::Array(Rc::new(v)))
}

pub fn install(table: &mut SymbolTable) -> Result<()> {
    table.define("range", native("range", Arity::range(1, 3), |a| {
        let (start, end, step) = match a.len() {
            1 => (0, expect_int(&a[0], "range")?, 1),
            2 => (expect_int(&a[0], "range")?, expect_int(&a[1], "range")?, 1),
            _ => (
                expect_int(&a[0], "range")?,
                expect_int(&a[1], "range")?,
                expect_int(&a[2], "range")?,
            ),
        };
        if step == 0 {
            return Err(FrostError::recoverable("Function range called with a zero step"));
        }
        let mut out = Vec::new();
        let mut i = start;
        if step > 0 {
            while i < end {
                out.push(Rc::new(Value::Int(i)));
                i += step;
            }
        } else {
            while i > end {
                out.push(Rc::new(Value::Int(i)));
                i += step;
            }
        }
        Ok(array(out))
    }))?;

    table.define("stride", native("stride", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "stride")?;
        let n = expect_int(&a[1], "stride")?;
        if n <= 0 {
            return Err(FrostError::recoverable(
                "Function stride requires its numeric argument to be >0",
            ));
        }
        Ok(array(arr.iter().step_by(n as usize).cloned().collect()))
    }))?;

    table.define("take", native("take", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "take")?;
        let n = expect_int(&a[1], "take")?;
        if n < 0 {
            return Err(FrostError::recoverable(
                "Function take requires its numeric argument to be >=0",
            ));
        }
        Ok(array(arr.iter().take(n as usize).cloned().collect()))
    }))?;

    table.define("drop", native("drop", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "drop")?;
        let n = expect_int(&a[1], "drop")?;
        if n < 0 {
            return Err(FrostError::recoverable(
                "Function drop requires its numeric argument to be >=0",
            ));
        }
        Ok(array(arr.iter().skip(n as usize).cloned().collect()))
    }))?;

    table.define("slide", native("slide", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "slide")?;
        let n = expect_int(&a[1], "slide")?;
        if n <= 0 {
            return Err(FrostError::recoverable("Function slide requires its numeric argument to be >0"));
        }
        let n = n as usize;
        let out = arr
            .windows(n.min(arr.len().max(1)))
            .filter(|w| w.len() == n)
            .map(|w| array(w.to_vec()))
            .collect();
        Ok(array(out))
    }))?;

    table.define("chunk", native("chunk", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "chunk")?;
        let n = expect_int(&a[1], "chunk")?;
        if n <= 0 {
            return Err(FrostError::recoverable("Function chunk requires its numeric argument to be >0"));
        }
        let out = arr.chunks(n as usize).map(|c| array(c.to_vec())).collect();
        Ok(array(out))
    }))?;

    table.define("zip", native("zip", Arity::at_least(2), |a| {
        let arrays: Vec<&[ValueRef]> = a
            .iter()
            .map(|v| expect_array(v, "zip"))
            .collect::<Result<_>>()?;
        let len = arrays.iter().map(|v| v.len()).min().unwrap_or(0);
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(array(arrays.iter().map(|v| v[i].clone()).collect()));
        }
        Ok(array(out))
    }))?;

    table.define("xprod", native("xprod", Arity::exact(2), |a| {
        let left = expect_array(&a[0], "xprod")?;
        let right = expect_array(&a[1], "xprod")?;
        let mut out = Vec::with_capacity(left.len() * right.len());
        for l in left {
            for r in right {
                out.push(array(vec![l.clone(), r.clone()]));
            }
        }
        Ok(array(out))
    }))?;

    table.define("take_while", native("take_while", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "take_while")?;
        let mut out = Vec::new();
        for elem in arr {
            if !call_function(&a[1], &[elem.clone()])?.truthy() {
                break;
            }
            out.push(elem.clone());
        }
        Ok(array(out))
    }))?;

    table.define("drop_while", native("drop_while", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "drop_while")?;
        let mut i = 0;
        while i < arr.len() && call_function(&a[1], &[arr[i].clone()])?.truthy() {
            i += 1;
        }
        Ok(array(arr[i..].to_vec()))
    }))?;

    table.define("chunk_by", native("chunk_by", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "chunk_by")?;
        let mut out: Vec<ValueRef> = Vec::new();
        let mut current: Vec<ValueRef> = Vec::new();
        for elem in arr {
            if let Some(last) = current.last() {
                if !call_function(&a[1], &[last.clone(), elem.clone()])?.truthy() {
                    out.push(array(std::mem::take(&mut current)));
                }
            }
            current.push(elem.clone());
        }
        if !current.is_empty() {
            out.push(array(current));
        }
        Ok(array(out))
    }))?;

    table.define("group_by", native("group_by", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "group_by")?;
        let mut map = FrostMap::new();
        let mut groups: Vec<(ValueRef, Vec<ValueRef>)> = Vec::new();
        for elem in arr {
            let key = call_function(&a[1], &[elem.clone()])?;
            match groups.iter_mut().find(|(k, _)| deep_equal(k, &key)) {
                Some((_, bucket)) => bucket.push(elem.clone()),
                None => groups.push((key, vec![elem.clone()])),
            }
        }
        for (key, bucket) in groups {
            map.insert(key, array(bucket))?;
        }
        Ok(Rc::new(Value::Map(Rc::new(map))))
    }))?;

    table.define("count_by", native("count_by", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "count_by")?;
        let mut map = FrostMap::new();
        let mut counts: Vec<(ValueRef, i64)> = Vec::new();
        for elem in arr {
            let key = call_function(&a[1], &[elem.clone()])?;
            match counts.iter_mut().find(|(k, _)| deep_equal(k, &key)) {
                Some((_, n)) => *n += 1,
                None => counts.push((key, 1)),
            }
        }
        for (key, n) in counts {
            map.insert(key, Rc::new(Value::Int(n)))?;
        }
        Ok(Rc::new(Value::Map(Rc::new(map))))
    }))?;

    table.define("scan", native("scan", Arity::exact(3), |a| {
        let arr = expect_array(&a[0], "scan")?;
        let mut acc = a[1].clone();
        let mut out = Vec::with_capacity(arr.len());
        for elem in arr {
            acc = call_function(&a[2], &[acc, elem.clone()])?;
            out.push(acc.clone());
        }
        Ok(array(out))
    }))?;

    table.define("fold", native("fold", Arity::exact(3), |a| {
        let arr = expect_array(&a[0], "fold")?;
        let mut acc = a[1].clone();
        for elem in arr {
            acc = call_function(&a[2], &[acc, elem.clone()])?;
        }
        Ok(acc)
    }))?;

    table.define("transform", native("transform", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "transform")?;
        let mut out = Vec::with_capacity(arr.len());
        for elem in arr {
            out.push(call_function(&a[1], &[elem.clone()])?);
        }
        Ok(array(out))
    }))?;

    table.define("select", native("select", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "select")?;
        let mut out = Vec::new();
        for elem in arr {
            if call_function(&a[1], &[elem.clone()])?.truthy() {
                out.push(elem.clone());
            }
        }
        Ok(array(out))
    }))?;

    table.define("reverse", native("reverse", Arity::exact(1), |a| {
        let arr = expect_array(&a[0], "reverse")?;
        let mut out = arr.to_vec();
        out.reverse();
        Ok(array(out))
    }))?;

    table.define("sorted", native("sorted", Arity::range(1, 2), |a| {
        let arr = expect_array(&a[0], "sorted")?;
        let mut out = arr.to_vec();
        if let Some(cmp) = a.get(1) {
            let mut err = None;
            out.sort_by(|x, y| {
                if err.is_some() {
                    return std::cmp::Ordering::Equal;
                }
                match call_function(cmp, &[x.clone(), y.clone()]) {
                    Ok(v) if v.truthy() => std::cmp::Ordering::Less,
                    Ok(_) => std::cmp::Ordering::Greater,
                    Err(e) => {
                        err = Some(e);
                        std::cmp::Ordering::Equal
                    }
                }
            });
            if let Some(e) = err {
                return Err(e);
            }
        } else {
            let mut err = None;
            out.sort_by(|x, y| {
                if err.is_some() {
                    return std::cmp::Ordering::Equal;
                }
                match x.less_than(y) {
                    Ok(v) if v.truthy() => std::cmp::Ordering::Less,
                    Ok(_) => std::cmp::Ordering::Greater,
                    Err(e) => {
                        err = Some(e);
                        std::cmp::Ordering::Equal
                    }
                }
            });
            if let Some(e) = err {
                return Err(e);
            }
        }
        Ok(array(out))
    }))?;

    table.define("any", native("any", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "any")?;
        for elem in arr {
            if call_function(&a[1], &[elem.clone()])?.truthy() {
                return Ok(Rc::new(Value::Bool(true)));
            }
        }
        Ok(Rc::new(Value::Bool(false)))
    }))?;

    table.define("all", native("all", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "all")?;
        for elem in arr {
            if !call_function(&a[1], &[elem.clone()])?.truthy() {
                return Ok(Rc::new(Value::Bool(false)));
            }
        }
        Ok(Rc::new(Value::Bool(true)))
    }))?;

    table.define("none", native("none", Arity::exact(2), |a| {
        let arr = expect_array(&a[0], "none")?;
        for elem in arr {
            if call_function(&a[1], &[elem.clone()])?.truthy() {
                return Ok(Rc::new(Value::Bool(false)));
            }
        }
        Ok(Rc::new(Value::Bool(true)))
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
    fn range_two_args_is_half_open() {
        assert_eq!(run("range(1, 4)").to_internal_string(false), "[1, 2, 3]");
    }

    #[test]
    fn chunk_splits_into_fixed_size_groups_with_remainder() {
        assert_eq!(run("chunk([1,2,3,4,5], 2)").to_internal_string(false), "[[1, 2], [3, 4], [5]]");
    }

    #[test]
    fn take_and_drop_are_complementary() {
        assert_eq!(run("take([1,2,3,4], 2)").to_internal_string(false), "[1, 2]");
        assert_eq!(run("drop([1,2,3,4], 2)").to_internal_string(false), "[3, 4]");
    }

    #[test]
    fn fold_matches_reduce_with_init_semantics() {
        assert_eq!(*run("fold([1,2,3], 0, fn(acc,x) -> { acc + x })"), Value::Int(6));
    }

    #[test]
    fn sorted_defaults_to_ascending_numeric_order() {
        assert_eq!(run("sorted([3,1,2])").to_internal_string(false), "[1, 2, 3]");
    }

    #[test]
    fn group_by_preserves_first_seen_key_order() {
        assert_eq!(
            run("group_by([1,2,3,4], fn(x) -> { mod(x, 2) })").to_internal_string(false),
            "{1: [1, 3], 0: [2, 4]}"
        );
    }

    #[test]
    fn any_all_none_short_circuit() {
        assert_eq!(*run("any([1,2,3], fn(x) -> { x > 2 })"), Value::Bool(true));
        assert_eq!(*run("all([1,2,3], fn(x) -> { x > 0 })"), Value::Bool(true));
        assert_eq!(*run("none([1,2,3], fn(x) -> { x > 5 })"), Value::Bool(true));
    }
}
