//! OpenAPI documents from observed traffic
//!
//! Each observed transaction is a flat JSON object of dotted keys
//! (`name`, `request.method`, `http.statusCode`, `request.headers.<name>`,
//! `appName`, `tags.Domain`). [`generate_openapi`] folds them into a
//! candidate document for the merge engine: one path item per route, one
//! operation per method, one response per observed status code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// `:name` placeholders of a route
static COLON_PARAM: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r":(\w+)"));

/// `{name}` placeholders of an OpenAPI path
static BRACE_PARAM: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"\{(\w+)\}"));

static IPV4: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$"));

/// Transaction name prefixes that wrap `<METHOD> <route>`
const WRAPPED_PREFIXES: [&str; 2] = ["WebTransaction/Custom", "WebTransaction/Expressjs"];

const HEADER_PREFIX: &str = "request.headers.";

/// Headers that never become parameters; `host` feeds `servers` instead
pub const EXCLUDED_HEADERS: [&str; 1] = ["host"];

/// Title used when no transaction names its service
pub const DEFAULT_TITLE: &str = "Auto generated API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Header,
}

/// Path or header parameter of a generated path item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type")]
    pub schema_type: String,
}

impl Parameter {
    /// Required string parameter
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: true,
            schema_type: "string".to_string(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Entry of the document's `servers` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// Rewrite `:name` placeholders as `{name}`
#[must_use]
pub fn convert_path(path: &str) -> String {
    match COLON_PARAM.as_ref() {
        Ok(pattern) => pattern.replace_all(path, "{${1}}").into_owned(),
        Err(_) => path.to_string(),
    }
}

/// Whether some segment of `route` is a `{name}` placeholder
#[must_use]
pub fn has_path_params(route: &str) -> bool {
    route.split('/').any(|segment| segment.starts_with('{') && segment.ends_with('}'))
}

/// Required path parameters for every `{name}` in `route`, in order
#[must_use]
pub fn path_params(route: &str) -> Vec<Parameter> {
    let Ok(pattern) = BRACE_PARAM.as_ref() else {
        return Vec::new();
    };
    pattern
        .captures_iter(route)
        .filter_map(|caps| caps.get(1))
        .map(|name| Parameter::new(name.as_str(), ParameterLocation::Path))
        .collect()
}

/// Header parameters observed in a transaction, `host` excluded
#[must_use]
pub fn header_params(transaction: &Map<String, Value>) -> Vec<Parameter> {
    transaction
        .keys()
        .filter_map(|key| key.strip_prefix(HEADER_PREFIX))
        .filter(|name| !name.is_empty() && !EXCLUDED_HEADERS.contains(name))
        .map(|name| {
            Parameter::new(name, ParameterLocation::Header).with_description("A header observed in recorded traffic")
        })
        .collect()
}

fn is_ipv4(host: &str) -> bool {
    IPV4.as_ref().is_ok_and(|pattern| pattern.is_match(host))
}

/// One server per distinct host, bare IPv4 addresses dropped
///
/// First-seen order is kept.
#[must_use]
pub fn servers<'a>(hosts: impl IntoIterator<Item = &'a str>) -> Vec<Server> {
    let mut servers: Vec<Server> = Vec::new();
    for host in hosts {
        if is_ipv4(host) || servers.iter().any(|s| s.url == host) {
            continue;
        }
        servers.push(Server { url: host.to_string() });
    }
    servers
}

/// Route of a transaction name
///
/// Names like `WebTransaction/Expressjs/GET /users/{id}` wrap the method and
/// route; the route's first segment is dropped and the rest re-rooted at
/// `/`. Any other name is already a route.
#[must_use]
pub fn route_path(name: &str, method: &str) -> String {
    if method.is_empty() {
        return name.to_string();
    }
    let Some(prefix) = WRAPPED_PREFIXES.iter().find(|prefix| name.starts_with(*prefix)) else {
        return name.to_string();
    };

    let wrapped = name.get(prefix.len() + 1..).unwrap_or_default();
    match wrapped.split(' ').nth(1) {
        Some(route) if !route.is_empty() => format!("/{}", route.split('/').skip(1).collect::<Vec<_>>().join("/")),
        _ => "/".to_string(),
    }
}

/// `"<code> <reason phrase>"`, or just the code when it has no phrase
#[must_use]
pub fn response_description(status: &str) -> String {
    let reason = status
        .parse::<u16>()
        .ok()
        .and_then(|code| http::StatusCode::from_u16(code).ok())
        .and_then(|code| code.canonical_reason());
    match reason {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}

fn text<'a>(transaction: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    transaction.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn status_of(transaction: &Map<String, Value>) -> Option<String> {
    match transaction.get("http.statusCode")? {
        Value::Number(code) => Some(code.to_string()),
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        _ => None,
    }
}

/// Add `params` to the path item's `parameters`, skipping name/location repeats
fn add_parameters(item: &mut Map<String, Value>, params: Vec<Parameter>) {
    if params.is_empty() {
        return;
    }
    let list = item
        .entry("parameters")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(list) = list else {
        return;
    };
    for param in params {
        let seen = list.iter().any(|existing| {
            existing.get("name").and_then(Value::as_str) == Some(param.name.as_str())
                && existing.get("in") == Some(&json!(param.location))
        });
        if !seen {
            list.push(json!(param));
        }
    }
}

/// Candidate OpenAPI 3.0 document for a batch of observed transactions
///
/// Transactions that are not objects or lack a name or method are skipped.
/// The last transaction naming `appName` / `tags.Domain` sets the title and
/// contact.
#[tracing::instrument(skip_all, fields(transactions = transactions.len()))]
pub fn generate_openapi(transactions: &[Value]) -> Value {
    let mut paths = Map::new();
    let mut hosts: Vec<&str> = Vec::new();
    let mut title = DEFAULT_TITLE;
    let mut domain = None;
    let mut skipped = 0usize;

    for transaction in transactions {
        let Some(transaction) = transaction.as_object() else {
            skipped += 1;
            continue;
        };
        let (Some(name), Some(method)) = (text(transaction, "name"), text(transaction, "request.method")) else {
            tracing::debug!("skipping transaction without name or method");
            skipped += 1;
            continue;
        };
        let method = method.to_ascii_lowercase();
        let route = route_path(&convert_path(name), &method);

        if let Some(app) = text(transaction, "appName") {
            title = app;
        }
        if let Some(tag) = text(transaction, "tags.Domain") {
            domain = Some(tag);
        }
        if let Some(host) = text(transaction, "request.headers.host") {
            hosts.push(host);
        }

        let item = paths
            .entry(route.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(item) = item else {
            continue;
        };
        let operation = item
            .entry(method)
            .or_insert_with(|| json!({"summary": "", "responses": {}}));
        if let (Some(status), Some(Value::Object(responses))) = (status_of(transaction), operation.get_mut("responses")) {
            let description = response_description(&status);
            responses.insert(status, json!({ "description": description }));
        }

        add_parameters(item, path_params(&route));
        add_parameters(item, header_params(transaction));
    }

    tracing::info!(paths = paths.len(), skipped, "generated document from transactions");

    let mut info = json!({
        "title": title,
        "version": "1.0.0",
        "description": format!("Endpoints hosted by the {title} service."),
    });
    if let Some(domain) = domain {
        info["contact"] = json!({ "name": format!("{domain} squad") });
    }
    json!({
        "openapi": "3.0.0",
        "info": info,
        "servers": servers(hosts),
        "paths": paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transaction(name: &str, method: &str, status: u16) -> Value {
        json!({
            "name": name,
            "request.method": method,
            "http.statusCode": status,
            "request.headers.host": "api.example.com",
            "request.headers.accept": "application/json",
            "appName": "orders-service",
            "tags.Domain": "commerce"
        })
    }

    #[test]
    fn colon_params_become_braces() {
        assert_eq!(convert_path("/users/:id/orders/:orderId"), "/users/{id}/orders/{orderId}");
        assert_eq!(convert_path("/health"), "/health");
    }

    #[test]
    fn path_params_in_order() {
        assert!(has_path_params("/users/{id}"));
        assert!(!has_path_params("/users/id"));
        let names: Vec<_> = path_params("/users/{id}/orders/{orderId}")
            .into_iter()
            .map(|p| (p.name, p.location, p.required))
            .collect();
        assert_eq!(
            names,
            vec![
                ("id".to_string(), ParameterLocation::Path, true),
                ("orderId".to_string(), ParameterLocation::Path, true),
            ]
        );
    }

    #[test]
    fn headers_skip_host() {
        let observed = transaction("/users", "GET", 200);
        let params = header_params(observed.as_object().unwrap());
        assert_eq!(params.len(), 1);
        assert_eq!(
            serde_json::to_value(&params[0]).unwrap(),
            json!({
                "name": "accept",
                "in": "header",
                "description": "A header observed in recorded traffic",
                "required": true,
                "type": "string"
            })
        );
    }

    #[test]
    fn servers_drop_bare_ipv4() {
        let hosts = ["api.example.com", "10.0.0.12", "api.example.com", "10.0.0.12:8080"];
        assert_eq!(
            servers(hosts),
            vec![
                Server { url: "api.example.com".into() },
                Server { url: "10.0.0.12:8080".into() },
            ]
        );
    }

    #[test]
    fn wrapped_names_are_unwrapped() {
        assert_eq!(route_path("WebTransaction/Expressjs/GET /users/{id}", "get"), "/users/{id}");
        assert_eq!(route_path("WebTransaction/Custom/POST /orders", "post"), "/orders");
        assert_eq!(route_path("WebTransaction/Custom/POST", "post"), "/");
        assert_eq!(route_path("WebTransaction/Expressjs/GET /users", ""), "WebTransaction/Expressjs/GET /users");
        assert_eq!(route_path("/plain/route", "get"), "/plain/route");
    }

    #[test]
    fn descriptions_use_reason_phrase() {
        assert_eq!(response_description("404"), "404 Not Found");
        assert_eq!(response_description("299"), "299");
    }

    #[test]
    fn document_groups_methods_and_statuses() {
        let transactions = vec![
            transaction("WebTransaction/Expressjs/GET /users/:id", "GET", 200),
            transaction("WebTransaction/Expressjs/GET /users/:id", "GET", 404),
            transaction("WebTransaction/Expressjs/DELETE /users/:id", "DELETE", 204),
            json!({"request.method": "GET"}),
            json!(42),
        ];
        let document = generate_openapi(&transactions);

        assert_eq!(document["info"]["title"], "orders-service");
        assert_eq!(document["info"]["contact"]["name"], "commerce squad");
        assert_eq!(document["servers"], json!([{"url": "api.example.com"}]));

        let item = &document["paths"]["/users/{id}"];
        assert_eq!(
            item["get"]["responses"],
            json!({"200": {"description": "200 OK"}, "404": {"description": "404 Not Found"}})
        );
        assert_eq!(item["delete"]["responses"], json!({"204": {"description": "204 No Content"}}));

        let params: Vec<_> = item["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| (p["name"].clone(), p["in"].clone()))
            .collect();
        assert_eq!(
            params,
            vec![(json!("id"), json!("path")), (json!("accept"), json!("header"))]
        );
    }

    #[test]
    fn empty_batch_is_a_valid_document() {
        let document = generate_openapi(&[]);
        assert_eq!(document["info"]["title"], DEFAULT_TITLE);
        assert_eq!(document["paths"], json!({}));
        assert_eq!(document["servers"], json!([]));
    }

    #[test]
    fn generated_document_merges_as_candidate() {
        let base = json!({"openapi": "3.0.0", "info": {"title": "orders"}, "paths": {"/health": {"get": {}}}});
        let candidate = generate_openapi(&[transaction("/orders/:id", "PUT", 200)]);

        let merged = crate::merge::merge_openapi(&base, &candidate, crate::policy::MergePolicy::default()).unwrap();
        assert_eq!(merged["info"]["title"], "orders");
        assert!(merged["paths"]["/orders/{id}"]["put"].is_object());
        assert_eq!(merged["paths"]["/health"], json!({"get": {}}));
    }
}
