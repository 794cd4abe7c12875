//! Dotted field paths into JSON bodies
//!
//! Supports the simple `$.a.b.c` form: each segment is an object key.

use serde_json::{Map, Value};

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.trim();
    path.strip_prefix("$.").unwrap_or(path).split('.')
}

/// Look up the value at `path`
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}

/// Look up the value at `path` for modification
pub(crate) fn lookup_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    segments(path).try_fold(value, |current, part| match current {
        Value::Object(map) => map.get_mut(part),
        _ => None,
    })
}

/// Extract a page token at `path`.
///
/// Absent and null give `None`, strings and numbers give their text. Any
/// other value is rejected with its kind.
pub(crate) fn lookup_token(value: &Value, path: &str) -> Result<Option<String>, &'static str> {
    match lookup(value, path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(kind(other)),
    }
}

/// Returns `true` if `assign` can reach `path` without replacing a
/// non-object value along the way
pub(crate) fn is_assignable(value: &Value, path: &str) -> bool {
    let mut current = value;
    let mut parts = segments(path).peekable();
    while let Some(part) = parts.next() {
        let Value::Object(map) = current else {
            return false;
        };
        if parts.peek().is_none() {
            return true;
        }
        match map.get(part) {
            Some(next) => current = next,
            None => return true,
        }
    }
    true
}

/// Set `path` to `new`, creating intermediate objects as needed
pub(crate) fn assign(value: &mut Value, path: &str, new: Value) {
    let parts: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    // Indexing an object inserts a missing key as null; make_object then
    // replaces that null on the next step.
    let parent = parents.iter().fold(value, |current, part| {
        make_object(current);
        &mut current[*part]
    });
    make_object(parent);
    parent[*last] = new;
}

fn make_object(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
}

/// Remove the value at `path`, if present
pub(crate) fn remove(value: &mut Value, path: &str) {
    let path = path.trim();
    let path = path.strip_prefix("$.").unwrap_or(path);
    let (parent, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (lookup_mut(value, parent), key),
        None => (Some(value), path),
    };
    if let Some(Value::Object(map)) = parent {
        map.remove(key);
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let body = json!({"meta": {"next": "abc"}, "items": [1, 2]});
        assert_eq!(lookup(&body, "meta.next"), Some(&json!("abc")));
        assert_eq!(lookup(&body, "$.meta.next"), Some(&json!("abc")));
        assert_eq!(lookup(&body, "items"), Some(&json!([1, 2])));
        assert_eq!(lookup(&body, "meta.missing"), None);
        assert_eq!(lookup(&body, "items.0"), None);
    }

    #[test]
    fn test_lookup_token() {
        let body = json!({"s": "tok", "n": 42, "null": null, "obj": {}, "flag": true});
        assert_eq!(lookup_token(&body, "s"), Ok(Some("tok".to_string())));
        assert_eq!(lookup_token(&body, "n"), Ok(Some("42".to_string())));
        assert_eq!(lookup_token(&body, "null"), Ok(None));
        assert_eq!(lookup_token(&body, "absent"), Ok(None));
        assert_eq!(lookup_token(&body, "obj"), Err("object"));
        assert_eq!(lookup_token(&body, "flag"), Err("boolean"));
    }

    #[test]
    fn test_assign_creates_parents() {
        let mut body = json!({"filter": "x"});
        assign(&mut body, "paging.token", json!("T1"));
        assert_eq!(body, json!({"filter": "x", "paging": {"token": "T1"}}));

        assign(&mut body, "$.paging.token", json!("T2"));
        assert_eq!(body["paging"]["token"], "T2");
    }

    #[test]
    fn test_is_assignable() {
        let body = json!({"filter": "x", "paging": {}});
        assert!(is_assignable(&body, "pageToken"));
        assert!(is_assignable(&body, "paging.token"));
        assert!(is_assignable(&body, "fresh.nested.token"));
        assert!(!is_assignable(&body, "filter.token"));
        assert!(!is_assignable(&json!([]), "pageToken"));
    }

    #[test]
    fn test_remove() {
        let mut body = json!({"pageToken": "T1", "paging": {"token": "T2", "size": 5}});
        remove(&mut body, "pageToken");
        remove(&mut body, "paging.token");
        remove(&mut body, "absent.token");
        assert_eq!(body, json!({"paging": {"size": 5}}));
    }
}
