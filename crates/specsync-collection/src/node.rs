//! Shape-level view of collection documents
//!
//! Collections arrive as untyped JSON. Nodes are classified here instead of
//! deserialized into structs, so a malformed node is skipped rather than
//! failing the whole document.

use serde_json::{Map, Value};

/// Classified tree node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Ordered sequence of child nodes
    Sequence(&'a [Value]),

    /// Object carrying a nested `item` field (collection root or folder)
    Group(&'a Value),

    /// Request leaf: no nested items, has an `id`
    Request(Request<'a>),

    /// Anything else (scalars, objects without `item` or `id`)
    Ignored,
}

impl<'a> Node<'a> {
    /// Classify a raw JSON node
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => match map.get("item") {
                Some(items) => Self::Group(items),
                None => map
                    .get("id")
                    .and_then(Value::as_str)
                    .map_or(Self::Ignored, |id| Self::Request(Request { id, node: map })),
            },
            _ => Self::Ignored,
        }
    }
}

/// Request leaf borrowed from a collection
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    id: &'a str,
    node: &'a Map<String, Value>,
}

impl<'a> Request<'a> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// The `request` object, if the leaf carries one as an object
    #[must_use]
    pub fn request(&self) -> Option<&'a Map<String, Value>> {
        self.node.get("request").and_then(Value::as_object)
    }

    /// HTTP method (`GET` when unspecified)
    #[must_use]
    pub fn method(&self) -> &'a str {
        self.request()
            .and_then(|r| r.get("method"))
            .and_then(Value::as_str)
            .unwrap_or("GET")
    }

    /// The `url` value: either a plain string or a structured object
    #[must_use]
    pub fn url(&self) -> Option<&'a Value> {
        match self.node.get("request") {
            Some(Value::String(_)) => self.node.get("request"),
            Some(Value::Object(request)) => request.get("url"),
            _ => None,
        }
    }

    /// Ordered header objects (`request.header`), empty when absent
    #[must_use]
    pub fn headers(&self) -> &'a [Value] {
        self.request()
            .and_then(|r| r.get("header"))
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Ordered sample responses, empty when absent
    #[must_use]
    pub fn responses(&self) -> &'a [Value] {
        self.node
            .get("response")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Leaf object without `id`, `uid` and `response`
    #[must_use]
    pub fn stripped(&self) -> Value {
        strip_fields(self.node, &["id", "uid", "response"])
    }
}

/// Copy of `object` without the named keys
#[must_use]
pub fn strip_fields(object: &Map<String, Value>, fields: &[&str]) -> Value {
    Value::Object(
        object
            .iter()
            .filter(|(key, _)| !fields.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

/// Copy of `value` without `id`/`uid`; non-objects are cloned as-is
#[must_use]
pub fn strip_identifiers(value: &Value) -> Value {
    match value {
        Value::Object(object) => strip_fields(object, &["id", "uid"]),
        other => other.clone(),
    }
}

/// The collection object, unwrapping a `{"collection": {...}}` envelope
#[must_use]
pub fn collection_root(document: &Value) -> &Value {
    match document.get("collection") {
        Some(inner @ Value::Object(_)) => inner,
        _ => document,
    }
}

/// Owning identifier of a collection: `info.uid`, then a top-level `uid`
#[must_use]
pub fn root_id(document: &Value) -> Option<&str> {
    let root = collection_root(document);
    root.get("info")
        .and_then(|info| info.get("uid"))
        .or_else(|| root.get("uid"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_shapes() {
        assert!(matches!(Node::classify(&json!([1, 2])), Node::Sequence(items) if items.len() == 2));
        assert!(matches!(Node::classify(&json!({"id": "f", "item": []})), Node::Group(_)));
        assert!(matches!(Node::classify(&json!({"id": "r"})), Node::Request(r) if r.id() == "r"));
        assert!(matches!(Node::classify(&json!({"name": "no id"})), Node::Ignored));
        assert!(matches!(Node::classify(&json!("text")), Node::Ignored));
        assert!(matches!(Node::classify(&json!({"id": 7})), Node::Ignored));
    }

    #[test]
    fn request_accessors() {
        let leaf = json!({
            "id": "1-r",
            "uid": "1-r",
            "name": "Get user",
            "request": {
                "method": "POST",
                "header": [{"key": "Authorization", "value": "x"}],
                "url": {"raw": "{{base}}/users"}
            },
            "response": [{"id": "1-s", "code": 200}]
        });
        let Node::Request(request) = Node::classify(&leaf) else {
            panic!("expected request leaf");
        };

        assert_eq!(request.method(), "POST");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.responses().len(), 1);
        assert_eq!(request.url().unwrap()["raw"], json!("{{base}}/users"));
        assert_eq!(
            request.stripped(),
            json!({
                "name": "Get user",
                "request": {
                    "method": "POST",
                    "header": [{"key": "Authorization", "value": "x"}],
                    "url": {"raw": "{{base}}/users"}
                }
            })
        );
    }

    #[test]
    fn string_request_defaults() {
        let leaf = json!({"id": "r", "request": "https://example.com/ping"});
        let Node::Request(request) = Node::classify(&leaf) else {
            panic!("expected request leaf");
        };

        assert_eq!(request.method(), "GET");
        assert_eq!(request.url(), Some(&json!("https://example.com/ping")));
        assert!(request.headers().is_empty());
        assert!(request.responses().is_empty());
    }

    #[test]
    fn strip_identifiers_keeps_other_fields() {
        let response = json!({"id": "1-x", "uid": "1-x", "code": 201});
        assert_eq!(strip_identifiers(&response), json!({"code": 201}));
        assert_eq!(strip_identifiers(&json!(3)), json!(3));
    }

    #[test]
    fn root_id_lookup() {
        let bare = json!({"info": {"uid": "12-abc"}, "item": []});
        let wrapped = json!({"collection": {"info": {"uid": "12-abc"}, "item": []}});
        let flat = json!({"uid": "12-abc", "item": []});

        assert_eq!(root_id(&bare), Some("12-abc"));
        assert_eq!(root_id(&wrapped), Some("12-abc"));
        assert_eq!(root_id(&flat), Some("12-abc"));
        assert_eq!(root_id(&json!({"item": []})), None);
    }
}
