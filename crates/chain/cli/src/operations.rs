//! Built-in operations over JSON values
//!
//! | name       | arguments            | result                          |
//! |------------|----------------------|---------------------------------|
//! | `identity` | exactly one          | the argument                    |
//! | `list`     | any                  | array of the arguments          |
//! | `sum`      | numbers              | integer sum, or float if needed |
//! | `concat`   | any                  | string concatenation            |
//! | `merge`    | objects              | keys merged left to right       |

use chain_manifest::OperationCatalog;
use chain_types::BoxError;
use serde_json::{Map, Number, Value};

/// Catalog holding every built-in operation
pub fn builtin_catalog() -> OperationCatalog<Value> {
    let mut catalog = OperationCatalog::new();
    catalog
        .register_sync("identity", identity)
        .register_sync("list", list)
        .register_sync("sum", sum)
        .register_sync("concat", concat)
        .register_sync("merge", merge);
    catalog
}

fn identity(args: Vec<Value>) -> Result<Value, BoxError> {
    match <[Value; 1]>::try_from(args) {
        Ok([value]) => Ok(value),
        Err(args) => Err(format!("identity expects 1 argument, got {}", args.len()).into()),
    }
}

fn list(args: Vec<Value>) -> Result<Value, BoxError> {
    Ok(Value::Array(args))
}

fn sum(args: Vec<Value>) -> Result<Value, BoxError> {
    if let Some(integers) = args.iter().map(Value::as_i64).collect::<Option<Vec<i64>>>() {
        let total = integers
            .into_iter()
            .try_fold(0i64, i64::checked_add)
            .ok_or("sum overflowed")?;
        return Ok(Value::from(total));
    }

    let mut total = 0.0;
    for arg in &args {
        total += arg
            .as_f64()
            .ok_or_else(|| format!("sum expects numbers, got {}", arg))?;
    }
    Number::from_f64(total)
        .map(Value::Number)
        .ok_or_else(|| "sum is not a finite number".into())
}

fn concat(args: Vec<Value>) -> Result<Value, BoxError> {
    let mut joined = String::new();
    for arg in args {
        match arg {
            Value::String(s) => joined.push_str(&s),
            other => joined.push_str(&other.to_string()),
        }
    }
    Ok(Value::String(joined))
}

fn merge(args: Vec<Value>) -> Result<Value, BoxError> {
    let mut merged = Map::new();
    for arg in args {
        match arg {
            Value::Object(map) => merged.extend(map),
            other => return Err(format!("merge expects objects, got {}", other).into()),
        }
    }
    Ok(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity() {
        assert_eq!(identity(vec![json!("x")]).unwrap(), json!("x"));
        let err = identity(vec![json!(1), json!(2)]).unwrap_err();
        assert_eq!(err.to_string(), "identity expects 1 argument, got 2");
    }

    #[test]
    fn test_list_keeps_order() {
        assert_eq!(list(vec![json!(2), json!("a")]).unwrap(), json!([2, "a"]));
        assert_eq!(list(Vec::new()).unwrap(), json!([]));
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(vec![json!(2), json!(3)]).unwrap(), json!(5));
        assert_eq!(sum(vec![json!(1), json!(0.5)]).unwrap(), json!(1.5));
        assert_eq!(sum(Vec::new()).unwrap(), json!(0));
        assert!(sum(vec![json!(1), json!("two")]).is_err());
        assert!(sum(vec![json!(i64::MAX), json!(1)]).is_err());
    }

    #[test]
    fn test_concat() {
        assert_eq!(
            concat(vec![json!("n="), json!(3), json!("!")]).unwrap(),
            json!("n=3!")
        );
    }

    #[test]
    fn test_merge() {
        let merged = merge(vec![json!({"a": 1, "b": 1}), json!({"b": 2})]).unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 2}));
        assert!(merge(vec![json!([1])]).is_err());
    }

    #[test]
    fn test_catalog_names() {
        assert_eq!(
            builtin_catalog().names(),
            vec!["concat", "identity", "list", "merge", "sum"]
        );
    }
}
