//! Forgiving accessors over `serde_json::Value`.
//!
//! Model output drifts from the requested schema in small ways: numbers where
//! strings were asked for, a bare string where a list was expected, objects
//! where a title would do. These helpers absorb that drift and never fail.

use serde_json::{Map, Value};

use crate::model::Resource;

pub(crate) type Object = Map<String, Value>;

/// First present value among `keys` (camelCase first, then aliases).
pub(crate) fn pick<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Scalar as trimmed text; `None` for blanks, nulls, arrays and objects.
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Like `text` but keeps leading indentation, for code blocks.
pub(crate) fn code(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim_end().to_string()),
        _ => None,
    }
}

pub(crate) fn text_or(value: Option<&Value>, default: &str) -> String {
    text(value).unwrap_or_else(|| default.to_string())
}

/// A list of strings. A lone scalar becomes a one-item list; items that are
/// not scalars are dropped.
pub(crate) fn text_list(value: Option<&Value>) -> Vec<String> {
    text_list_if_present(value).unwrap_or_default()
}

/// `None` when the value is absent or cannot be read as a list at all, so
/// callers can tell "missing" apart from "present but empty".
pub(crate) fn text_list_if_present(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(items.iter().filter_map(|item| text(Some(item))).collect()),
        scalar @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
            Some(text(Some(scalar)).into_iter().collect())
        }
        _ => None,
    }
}

pub(crate) fn object(value: Option<&Value>) -> Option<&Object> {
    value?.as_object()
}

/// Items of an array; a single object is treated as a one-item array.
pub(crate) fn items(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    }
}

/// Object items only.
pub(crate) fn objects(value: Option<&Value>) -> Vec<&Object> {
    items(value)
        .into_iter()
        .filter_map(Value::as_object)
        .collect()
}

/// Title from either a bare string or an object carrying `title`/`name`.
pub(crate) fn title_of(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => text(pick(obj, &["title", "name", "topic"])),
        other => text(Some(other)),
    }
}

pub(crate) fn resources(value: Option<&Value>) -> Vec<Resource> {
    items(value).into_iter().filter_map(resource).collect()
}

fn resource(value: &Value) -> Option<Resource> {
    let Value::Object(obj) = value else {
        // A bare string is either a URL or a title.
        let raw = text(Some(value))?;
        let is_url = raw.starts_with("http") || raw.starts_with('/');
        return Some(Resource {
            title: raw.clone(),
            kind: None,
            url: is_url.then_some(raw),
            description: None,
        });
    };

    let url = text(pick(obj, &["url", "link", "href"]));
    let title = text(pick(obj, &["title", "name"])).or_else(|| url.clone())?;
    Some(Resource {
        title,
        kind: text(pick(obj, &["type", "kind"])),
        url,
        description: text(obj.get("description")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_coerce_to_text() {
        assert_eq!(text(Some(&json!(" hi "))), Some("hi".into()));
        assert_eq!(text(Some(&json!(30))), Some("30".into()));
        assert_eq!(text(Some(&json!(true))), Some("true".into()));
        assert_eq!(text(Some(&json!(""))), None);
        assert_eq!(text(Some(&json!(["a"]))), None);
        assert_eq!(text(None), None);
    }

    #[test]
    fn lists_accept_scalars_and_drop_junk() {
        assert_eq!(text_list(Some(&json!("solo"))), vec!["solo"]);
        assert_eq!(
            text_list(Some(&json!(["a", 2, null, {"x": 1}, " "]))),
            vec!["a", "2"]
        );
        assert!(text_list(Some(&json!({"a": 1}))).is_empty());
        assert_eq!(text_list_if_present(Some(&json!({"a": 1}))), None);
        assert_eq!(text_list_if_present(Some(&json!([]))), Some(Vec::new()));
    }

    #[test]
    fn code_keeps_indentation() {
        let snippet = code(Some(&json!("  let x = 1;\n  x\n"))).unwrap();
        assert_eq!(snippet, "  let x = 1;\n  x");
    }

    #[test]
    fn resources_fall_back_to_url_for_title() {
        let parsed = resources(Some(&json!([
            {"url": "https://a.dev", "type": "Docs"},
            {"description": "orphan"},
            "https://b.dev",
            42
        ])));
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].title, "https://a.dev");
        assert_eq!(parsed[0].kind.as_deref(), Some("Docs"));
        assert_eq!(parsed[1].url.as_deref(), Some("https://b.dev"));
        assert_eq!(parsed[2].title, "42");
        assert!(parsed[2].url.is_none());
    }
}
