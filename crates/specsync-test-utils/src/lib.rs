//! Testing utilities for specsync workspace
//!
//! Shared collection and OpenAPI fixtures.

#![allow(missing_docs)]

use serde_json::{json, Value};

/// Root id of [`users_collection`]
pub const ORIGINAL_ROOT_ID: &str = "1234-5678-root";

/// Owner prefix of [`ORIGINAL_ROOT_ID`]
pub const ORIGINAL_OWNER: &str = "1234";

pub fn header(key: &str, value: &str) -> Value {
    json!({"key": key, "value": value})
}

pub fn authorization() -> Value {
    header("Authorization", "Bearer {{token}}")
}

pub fn x_trace() -> Value {
    header("X-Trace", "{{traceId}}")
}

/// Response object with an id, as exported collections carry them
pub fn response(id: &str, code: u16) -> Value {
    json!({"id": id, "uid": id, "name": format!("{code}"), "code": code, "body": ""})
}

/// Request leaf with a structured url
///
/// `raw` is split into host and path segments the way collection exports do.
pub fn request(id: &str, method: &str, raw: &str, headers: Vec<Value>, responses: Vec<Value>) -> Value {
    let mut parts = raw.split('/');
    let host = parts.next().unwrap_or_default();
    let path: Vec<&str> = parts.collect();
    json!({
        "id": id,
        "uid": id,
        "name": format!("{method} {raw}"),
        "request": {
            "method": method,
            "header": headers,
            "url": {"raw": raw, "host": [host], "path": path}
        },
        "response": responses
    })
}

pub fn folder(id: &str, name: &str, items: Vec<Value>) -> Value {
    json!({"id": id, "name": name, "item": items})
}

pub fn collection(root_id: &str, items: Vec<Value>) -> Value {
    json!({
        "info": {"uid": root_id, "name": "fixture", "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"},
        "item": items
    })
}

/// Original collection: `GET {{baseUrl}}/users/{id}` with an Authorization header
pub fn users_collection() -> Value {
    collection(
        ORIGINAL_ROOT_ID,
        vec![folder(
            "1234-users",
            "users",
            vec![request(
                "1234-get-user",
                "GET",
                "{{baseUrl}}/users/{id}",
                vec![authorization()],
                vec![],
            )],
        )],
    )
}

/// Generated collection with the users request and the given extras
///
/// Ids of a generated collection never match the original ones.
pub fn generated_collection(user_headers: Vec<Value>, user_responses: Vec<Value>, extra: Vec<Value>) -> Value {
    let mut items = vec![request(
        "9-get-user",
        "GET",
        "{{baseUrl}}/users/{id}",
        user_headers,
        user_responses,
    )];
    items.extend(extra);
    collection("9-generated", items)
}

pub fn operation(summary: &str) -> Value {
    json!({"summary": summary, "responses": {"200": {"description": "OK"}}})
}

pub fn openapi(paths: Value) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "fixture", "version": "1.0.0"},
        "servers": [{"url": "https://api.example.com"}],
        "paths": paths
    })
}

/// Every string-valued `id`/`uid` anywhere in `value`
pub fn all_ids(value: &Value) -> Vec<String> {
    let mut ids = Vec::new();
    collect_ids(value, &mut ids);
    ids
}

fn collect_ids(value: &Value, ids: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("id" | "uid", Value::String(id)) => ids.push(id.clone()),
                    _ => collect_ids(child, ids),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_ids(item, ids)),
        _ => {}
    }
}
