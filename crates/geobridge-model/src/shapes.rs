//! Normalizers for the server's shape-shifting JSON.
//!
//! Several response fields change type with cardinality: a list with one
//! member is serialized as a bare object, an empty list is omitted entirely,
//! and "list of names" documents come in at least two nestings
//! (`{"coverage": [...]}` and `{"list": {"string": [...]}}`). Everything here
//! collapses those variants into plain `Vec`s so the models never branch on
//! shape.

use serde_json::Value;

/// Normalize absent / single object / array into a canonical `Vec`.
pub fn one_or_many(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Extract a list of strings from a wrapper document, e.g.
/// `{"string": ["a", "b"]}`, `{"string": "a"}` or `{"list": {"string": [..]}}`.
///
/// An empty-string wrapper (the server's encoding for "no entries") yields an
/// empty vector.
pub fn string_list(value: Option<&Value>, item_key: &str) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    // Unwrap an optional "list" nesting first.
    let inner = value.get("list").unwrap_or(value);
    let items = match inner {
        Value::Object(_) => one_or_many(inner.get(item_key)),
        // A bare string or bare array in place of the wrapper object.
        Value::String(_) | Value::Array(_) => one_or_many(Some(inner)),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_owned))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extract the `name` of every member of a resource collection document,
/// e.g. `{"workspaces": {"workspace": [{"name": ...}, ...]}}` with the outer
/// wrapper already removed. A collection with no members is served as an
/// empty string instead of an empty object.
pub fn named_members(value: Option<&Value>, item_key: &str) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    one_or_many(value.get(item_key))
        .iter()
        .filter_map(|m| match m {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_or_many_absent_is_empty() {
        assert!(one_or_many(None).is_empty());
        assert!(one_or_many(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn one_or_many_single_object_becomes_one_element() {
        let v = json!({"name": "only"});
        let items = one_or_many(Some(&v));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "only");
    }

    #[test]
    fn one_or_many_array_passes_through() {
        let v = json!([{"name": "a"}, {"name": "b"}]);
        assert_eq!(one_or_many(Some(&v)).len(), 2);
    }

    #[test]
    fn string_list_handles_both_nestings() {
        let flat = json!({"string": ["de", "fr"]});
        assert_eq!(string_list(Some(&flat), "string"), vec!["de", "fr"]);

        let nested = json!({"list": {"string": ["de", "fr"]}});
        assert_eq!(string_list(Some(&nested), "string"), vec!["de", "fr"]);
    }

    #[test]
    fn string_list_single_value() {
        let v = json!({"string": "only"});
        assert_eq!(string_list(Some(&v), "string"), vec!["only"]);
    }

    #[test]
    fn string_list_empty_string_wrapper() {
        let v = json!("");
        assert!(string_list(Some(&v), "string").is_empty());
    }

    #[test]
    fn named_members_mixed_shapes() {
        let many = json!({"workspace": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(named_members(Some(&many), "workspace"), vec!["a", "b"]);

        let one = json!({"workspace": {"name": "solo"}});
        assert_eq!(named_members(Some(&one), "workspace"), vec!["solo"]);

        let none = json!("");
        assert!(named_members(Some(&none), "workspace").is_empty());
    }
}
