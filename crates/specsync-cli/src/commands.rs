//! Subcommand implementations
//!
//! Each command reads its inputs, calls the engine and returns the text to
//! print. Files are JSON when named `*.json` and YAML otherwise.

use anyhow::{Context, Result};
use serde_json::Value;
use specsync_core::{SequentialIds, SyncEngine};
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or_default()
}

pub(crate) fn read_document(engine: &SyncEngine, path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    engine
        .parse_schema(&text, file_name(path))
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

fn render_json(engine: &SyncEngine, value: &Value) -> Result<String> {
    Ok(engine.render_schema(value, "output.json")?)
}

/// `specsync reconcile <original> <new>`: patch payload as JSON
pub(crate) fn reconcile(engine: &SyncEngine, original: &Path, new_tree: &Path, sequential_ids: bool) -> Result<String> {
    let original = read_document(engine, original)?;
    let new_tree = read_document(engine, new_tree)?;

    let payload = if sequential_ids {
        engine.reconcile_with(&original, &new_tree, SequentialIds::default())?
    } else {
        engine.reconcile(&original, &new_tree)?
    };
    render_json(engine, &serde_json::to_value(&payload)?)
}

/// `specsync diff <a> <b>`: diff artifact, also written to disk
pub(crate) fn diff(engine: &SyncEngine, base: &Path, candidate: &Path, out: Option<PathBuf>) -> Result<String> {
    let base = read_document(engine, base)?;
    let candidate = read_document(engine, candidate)?;

    let artifact = engine.diff_schemas(&base, &candidate)?;
    let text = render_json(engine, &serde_json::to_value(&artifact)?)?;
    let out = out.unwrap_or_else(|| engine.config().diff_artifact_path.clone());
    write_text(&out, &text)?;
    Ok(text)
}

/// `specsync generate <transactions>`: candidate document from observed traffic
///
/// Rendered in the format of `out` when given, else as JSON.
pub(crate) fn generate(engine: &SyncEngine, transactions: &Path, out: Option<&Path>) -> Result<String> {
    let observed = read_document(engine, transactions)?;
    let Value::Array(observed) = observed else {
        anyhow::bail!("{} does not hold a list of transactions", transactions.display());
    };

    let document = engine.generate_schema(&observed);
    let text = match out {
        Some(out) => engine.render_schema(&document, file_name(out))?,
        None => render_json(engine, &document)?,
    };
    if let Some(out) = out {
        write_text(out, &text)?;
    }
    Ok(text)
}

/// `specsync merge <base> <candidate>`: merged document
///
/// Rendered in the format of `out` when given, else of `base`.
pub(crate) fn merge(
    engine: &SyncEngine,
    base_path: &Path,
    candidate: &Path,
    out: Option<&Path>,
    non_breaking: bool,
) -> Result<String> {
    let base = read_document(engine, base_path)?;
    let candidate = read_document(engine, candidate)?;

    let merged = if non_breaking {
        engine.merge_non_breaking(&base, &candidate)?
    } else {
        engine.merge_schemas(&base, &candidate)?
    };

    let target = out.unwrap_or(base_path);
    let text = engine.render_schema(&merged, file_name(target))?;
    if let Some(out) = out {
        write_text(out, &text)?;
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use specsync_core::SyncConfig;
    use specsync_test_utils::{generated_collection, openapi, operation, request, users_collection, x_trace};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn reconcile_prints_payload() {
        let dir = TempDir::new().unwrap();
        let original = write(&dir, "original.json", &users_collection());
        let orders = request("9-o", "POST", "{{baseUrl}}/orders", vec![], vec![]);
        let new_tree = write(&dir, "new.json", &generated_collection(vec![x_trace()], vec![], vec![orders]));

        let text = reconcile(&SyncEngine::default(), &original, &new_tree, true).unwrap();
        let payload: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(payload["entity"], json!({"version": "2.1.0"}));
        assert_eq!(payload["patches"][0]["actions"], json!(["update"]));
        assert_eq!(payload["patches"][1]["id"], json!("1234-new0"));
        assert!(text.starts_with("{\n    \"entity\""));
    }

    #[test]
    fn diff_writes_artifact_under_created_dirs() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "a.json", &openapi(json!({"/users": {"get": operation("list")}})));
        let candidate = write(&dir, "b.json", &openapi(json!({"/users": {}})));
        let out = dir.path().join("assets").join("diff").join("diff.json");

        let engine = SyncEngine::new(SyncConfig::new().with_diff_artifact_path(&out));
        let text = diff(&engine, &base, &candidate, None).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), text);
        let artifact: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            artifact,
            json!({"patches": [{"type": "Deleted", "path": ["/users", "get"], "value": operation("list")}]})
        );
    }

    #[test]
    fn merge_renders_yaml_for_yaml_output() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "base.json", &openapi(json!({"/users": {"get": operation("list")}})));
        let candidate = write(&dir, "candidate.json", &openapi(json!({"/orders": {"post": operation("create")}})));
        let out = dir.path().join("merged.yaml");

        let text = merge(&SyncEngine::default(), &base, &candidate, Some(&out), false).unwrap();
        assert!(text.contains("/orders:"));
        assert!(text.contains("/users:"));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), text);
    }

    #[test]
    fn merge_of_identical_documents_fails() {
        let dir = TempDir::new().unwrap();
        let spec = openapi(json!({"/users": {"get": operation("list")}}));
        let base = write(&dir, "base.json", &spec);
        let candidate = write(&dir, "candidate.json", &spec);

        let err = merge(&SyncEngine::default(), &base, &candidate, None, false).unwrap_err();
        assert!(format!("{err:#}").contains("no diff found"));
        assert!(merge(&SyncEngine::default(), &base, &candidate, None, true).is_ok());
    }

    #[test]
    fn generate_writes_document() {
        let dir = TempDir::new().unwrap();
        let observed = json!([
            {"name": "WebTransaction/Expressjs/GET /users/:id", "request.method": "GET", "http.statusCode": 200},
            {"name": "/orders", "request.method": "POST", "http.statusCode": 201, "request.headers.host": "10.1.2.3"}
        ]);
        let transactions = write(&dir, "transactions.json", &observed);
        let out = dir.path().join("generated").join("candidate.json");

        let text = generate(&SyncEngine::default(), &transactions, Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), text);

        let document: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(document["servers"], json!([]));
        assert_eq!(
            document["paths"]["/orders"]["post"]["responses"]["201"],
            json!({"description": "201 Created"})
        );
        assert!(document["paths"]["/users/{id}"]["get"].is_object());
    }

    #[test]
    fn generate_rejects_non_list_input() {
        let dir = TempDir::new().unwrap();
        let transactions = write(&dir, "transactions.json", &json!({"name": "/users"}));
        let err = generate(&SyncEngine::default(), &transactions, None).unwrap_err();
        assert!(err.to_string().contains("does not hold a list of transactions"));
    }

    #[test]
    fn missing_input_has_context() {
        let err = read_document(&SyncEngine::default(), Path::new("/nonexistent/in.json")).unwrap_err();
        assert!(err.to_string().starts_with("reading /nonexistent/in.json"));
    }
}
