//! Present-and-non-null accessors over JSON objects
//!
//! The vendor omits keys it has no value for, but also sends explicit nulls.
//! Both mean "unset" for optional descriptor fields, so every optional
//! accessor folds the two cases together instead of repeating the check at
//! each call site. Required accessors fail with [`MappingError`].

use serde_json::{Map, Value};

use crate::error::MappingError;

pub(crate) fn as_object<'a>(
    value: &'a Value,
    context: &'static str,
) -> Result<&'a Map<String, Value>, MappingError> {
    value
        .as_object()
        .ok_or(MappingError::NotAnObject { context })
}

/// Key present and non-null, or `None`.
pub(crate) fn opt_value<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

pub(crate) fn opt_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    opt_value(obj, key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn opt_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    opt_value(obj, key).and_then(Value::as_bool)
}

pub(crate) fn opt_i64(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    opt_value(obj, key).and_then(Value::as_i64)
}

/// Optional list of strings. A present list with a non-string entry is a
/// mapping failure, not a silent truncation.
pub(crate) fn opt_string_list(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<Option<Vec<String>>, MappingError> {
    let Some(value) = opt_value(obj, key) else {
        return Ok(None);
    };
    let invalid = MappingError::InvalidType {
        key,
        context,
        expected: "array of strings",
    };
    let items = value.as_array().ok_or(invalid.clone())?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(invalid.clone())
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

pub(crate) fn req_value<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<&'a Value, MappingError> {
    opt_value(obj, key).ok_or(MappingError::MissingKey { key, context })
}

pub(crate) fn req_str(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<String, MappingError> {
    req_value(obj, key, context)?
        .as_str()
        .map(str::to_string)
        .ok_or(MappingError::InvalidType {
            key,
            context,
            expected: "string",
        })
}

pub(crate) fn req_bool(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<bool, MappingError> {
    req_value(obj, key, context)?
        .as_bool()
        .ok_or(MappingError::InvalidType {
            key,
            context,
            expected: "boolean",
        })
}

/// Record ids may arrive as JSON numbers or strings; both normalize to the
/// string form the rest of the SDK keys on.
pub(crate) fn req_id(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<String, MappingError> {
    match req_value(obj, key, context)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(MappingError::InvalidType {
            key,
            context,
            expected: "string or number",
        }),
    }
}

/// Numeric hint fields: absent or null defaults to 0, and values the vendor
/// transmits as digit strings are coerced to numbers.
pub(crate) fn i64_or_zero(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<i64, MappingError> {
    match opt_value(obj, key) {
        None => Ok(0),
        Some(Value::Number(n)) => n.as_i64().ok_or(MappingError::InvalidType {
            key,
            context,
            expected: "integer",
        }),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| MappingError::InvalidType {
            key,
            context,
            expected: "integer",
        }),
        Some(_) => Err(MappingError::InvalidType {
            key,
            context,
            expected: "integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn explicit_null_counts_as_absent() {
        let o = obj(json!({"a": null, "b": "x"}));
        assert_eq!(opt_str(&o, "a"), None);
        assert_eq!(opt_str(&o, "b"), Some("x".to_string()));
        assert!(matches!(
            req_str(&o, "a", "test"),
            Err(MappingError::MissingKey { key: "a", .. })
        ));
    }

    #[test]
    fn ids_normalize_to_strings() {
        let o = obj(json!({"num": 4876876000000002175i64, "str": "42"}));
        assert_eq!(req_id(&o, "num", "test").unwrap(), "4876876000000002175");
        assert_eq!(req_id(&o, "str", "test").unwrap(), "42");
    }

    #[test]
    fn string_lists_reject_non_string_entries() {
        let o = obj(json!({"ok": ["a", "b"], "bad": ["a", 7], "scalar": "x"}));
        assert_eq!(
            opt_string_list(&o, "ok", "test").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(opt_string_list(&o, "absent", "test").unwrap(), None);
        assert!(matches!(
            opt_string_list(&o, "bad", "test"),
            Err(MappingError::InvalidType { key: "bad", .. })
        ));
        assert!(matches!(
            opt_string_list(&o, "scalar", "test"),
            Err(MappingError::InvalidType { key: "scalar", .. })
        ));
    }

    #[test]
    fn numeric_hints_default_and_coerce() {
        let o = obj(json!({"as_string": "250", "as_number": 5}));
        assert_eq!(i64_or_zero(&o, "absent", "test").unwrap(), 0);
        assert_eq!(i64_or_zero(&o, "as_string", "test").unwrap(), 250);
        assert_eq!(i64_or_zero(&o, "as_number", "test").unwrap(), 5);
    }
}
