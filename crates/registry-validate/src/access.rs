//! Dynamic member and list access over a serialized model graph.
//!
//! Every rule reads the graph through these functions. Lookups are pure and
//! repeatable; nothing here mutates or caches.

use crate::error::{EngineError, Result};
use serde_json::Value;
use std::borrow::Cow;

/// Shared `null`, read in place of absent values.
pub(crate) static NULL: Value = Value::Null;

/// Resolves `name` on `item`.
///
/// - `Ok(None)`: the item itself is absent (`null`), nothing to check.
/// - `Ok(Some(v))`: the field exists; `v` may be `null` or an empty string.
/// - `Err(FieldNotFound)`: the item is a record without that field.
/// - `Err(NotARecord)`: the item is a primitive or list.
pub fn get_field<'v>(item: &'v Value, name: &str, path: &str) -> Result<Option<&'v Value>> {
    match item {
        Value::Null => Ok(None),
        Value::Object(map) => match map.get(name) {
            Some(value) => Ok(Some(value)),
            None => Err(EngineError::FieldNotFound {
                field: name.to_string(),
                path: path.to_string(),
            }),
        },
        _ => Err(EngineError::NotARecord {
            field: name.to_string(),
            path: path.to_string(),
        }),
    }
}

/// Resolves an optional member on a list element.
///
/// With no member name the element itself is the value (lists of primitives).
/// A `null` field collapses to `None`, same as an absent item.
pub fn member_value<'v>(
    item: &'v Value,
    member: Option<&str>,
    path: &str,
) -> Result<Option<&'v Value>> {
    let value = match member {
        Some(name) => get_field(item, name, path)?,
        None => Some(item),
    };
    Ok(value.filter(|v| !v.is_null()))
}

/// Returns the elements of a list value.
///
/// `null` yields an empty slice; an empty list is not an error.
pub fn items<'v>(list: &'v Value, path: &str) -> Result<&'v [Value]> {
    match list {
        Value::Null => Ok(&[][..]),
        Value::Array(values) => Ok(values.as_slice()),
        _ => Err(EngineError::NotAList {
            path: path.to_string(),
        }),
    }
}

/// Restartable iterator over the elements of a list value.
pub fn iterate<'v>(list: &'v Value, path: &str) -> Result<std::slice::Iter<'v, Value>> {
    items(list, path).map(|values| values.iter())
}

/// String form of a value used for comparisons and messages.
///
/// Strings are returned verbatim, other scalars as their JSON text,
/// `null` as `None`.
pub fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Whether a value counts as blank: absent, or a whitespace-only string.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Path of the `index`-th element of the list at `path`.
pub fn element_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Path of `member` below `path`.
pub fn member_path(path: &str, member: &str) -> String {
    if path.is_empty() {
        member.to_string()
    } else {
        format!("{path}.{member}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_item_is_nothing_to_check() {
        assert_eq!(get_field(&Value::Null, "Language", "Names[0]").unwrap(), None);
    }

    #[test]
    fn unknown_field_is_fatal() {
        let item = json!({ "Value": "x" });
        let err = get_field(&item, "Language", "Names[0]").unwrap_err();
        assert_eq!(
            err,
            EngineError::FieldNotFound {
                field: "Language".into(),
                path: "Names[0]".into()
            }
        );
    }

    #[test]
    fn field_on_primitive_is_fatal() {
        let err = get_field(&json!("fi"), "Language", "Languages[0]").unwrap_err();
        assert!(matches!(err, EngineError::NotARecord { .. }));
    }

    #[test]
    fn present_field_may_be_empty() {
        let item = json!({ "Value": "" });
        assert_eq!(get_field(&item, "Value", "").unwrap(), Some(&json!("")));
    }

    #[test]
    fn member_value_collapses_null() {
        let item = json!({ "Value": null });
        assert_eq!(member_value(&item, Some("Value"), "").unwrap(), None);
        assert_eq!(member_value(&json!("fi"), None, "").unwrap(), Some(&json!("fi")));
    }

    #[test]
    fn iterate_null_and_empty() {
        assert_eq!(iterate(&Value::Null, "Names").unwrap().count(), 0);
        assert_eq!(iterate(&json!([]), "Names").unwrap().count(), 0);
        assert!(iterate(&json!("x"), "Names").is_err());
    }

    #[test]
    fn iterate_is_restartable() {
        let list = json!(["a", "b"]);
        let values = items(&list, "L").unwrap();
        assert_eq!(values.iter().count(), 2);
        assert_eq!(values.iter().count(), 2);
    }

    #[test]
    fn text_forms() {
        assert_eq!(text(&json!("a")).as_deref(), Some("a"));
        assert_eq!(text(&json!(5)).as_deref(), Some("5"));
        assert_eq!(text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(text(&Value::Null), None);
    }

    #[test]
    fn paths() {
        assert_eq!(element_path("Names", 2), "Names[2]");
        assert_eq!(member_path("Names[2]", "Value"), "Names[2].Value");
        assert_eq!(member_path("", "Value"), "Value");
    }
}
