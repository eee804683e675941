//! # JSON Document Loader
//!
//! A [`Document`] is a decoded JSON value together with the path it came
//! from; the path is the base every relative reference inside the document
//! is resolved against.
//!
//! [`Document::load`] returns a `Result` for callers that want the typed
//! error. [`Document::load_into`] is the linter-facing form: on failure it
//! records one `Io`/`Parse` diagnostic and returns `None`, so a linter
//! checks "did I get a document" and carries on.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LoadError;
use crate::path::resolve_path;

/// A decoded JSON document and its on-disk location.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    value: Value,
}

impl Document {
    /// Read and decode the JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded document");
        Ok(Self { path, value })
    }

    /// Load `path`, recording a `Failed to read or parse` diagnostic on failure.
    pub fn load_into(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Option<Self> {
        match Self::load(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                diags.report(load_error_kind(&e), load_failure_message(&e));
                None
            }
        }
    }

    /// Wrap an already-decoded value. Used by tests and by callers that
    /// obtained the JSON elsewhere.
    pub fn from_value(path: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Top-level field lookup. `None` when the key is absent or the document
    /// is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Resolve a path string relative to this document's directory.
    pub fn resolve(&self, candidate: &str) -> PathBuf {
        resolve_path(&self.path, candidate)
    }

    /// Resolve `candidate` and require that something exists there (file or
    /// directory). On a miss, records
    /// `<context>: <problem>: '<candidate>' (resolved: '<path>')`.
    pub fn check_exists(
        &self,
        candidate: &str,
        context: &str,
        problem: &str,
        diags: &mut Diagnostics,
    ) -> Option<PathBuf> {
        let resolved = self.resolve(candidate);
        if resolved.exists() {
            return Some(resolved);
        }
        diags.report(
            DiagnosticKind::Reference,
            format!(
                "{context}: {problem}: '{candidate}' (resolved: '{}')",
                resolved.display()
            ),
        );
        None
    }

    /// File name component, for messages about nested documents.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Message text for a document that could not be loaded.
pub fn load_failure_message(err: &LoadError) -> String {
    let cause = match err {
        LoadError::Io { source, .. } => source.to_string(),
        LoadError::Parse { source, .. } => source.to_string(),
    };
    format!("Failed to read or parse {}: {cause}", err.path().display())
}

fn load_error_kind(err: &LoadError) -> DiagnosticKind {
    match err {
        LoadError::Io { .. } => DiagnosticKind::Io,
        LoadError::Parse { .. } => DiagnosticKind::Parse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpc.json");
        std::fs::write(&path, br#"{"pduMetaDataSize": 24}"#).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.path(), path.as_path());
        assert_eq!(doc.get("pduMetaDataSize"), Some(&json!(24)));
        assert_eq!(doc.file_name(), "rpc.json");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{\"servers\": [").unwrap();
        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn load_into_records_single_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"not json").unwrap();

        let mut diags = Diagnostics::new();
        assert!(Document::load_into(&path, &mut diags).is_none());
        assert_eq!(diags.len(), 1);
        let d = &diags.as_slice()[0];
        assert_eq!(d.kind, DiagnosticKind::Parse);
        assert!(d.message.starts_with("Failed to read or parse "));
        assert!(d.message.contains("bad.json"));
    }

    #[test]
    fn load_into_missing_file_is_io_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut diags = Diagnostics::new();
        assert!(Document::load_into(dir.path().join("nope.json"), &mut diags).is_none());
        assert_eq!(diags.count_kind(DiagnosticKind::Io), 1);
    }

    #[test]
    fn resolve_is_relative_to_document_directory() {
        let doc = Document::from_value("/a/b/rpc.json", json!({}));
        assert_eq!(doc.resolve("../shared/x.json"), PathBuf::from("/a/shared/x.json"));
    }

    #[test]
    fn check_exists_reports_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pdu.json"), b"{}").unwrap();
        let doc = Document::from_value(dir.path().join("rpc.json"), json!({}));

        let mut diags = Diagnostics::new();
        let found = doc.check_exists("./pdu.json", "rpc.pdu_config_path", "not found", &mut diags);
        assert_eq!(found, Some(dir.path().join("pdu.json")));
        assert!(diags.is_empty());

        let missing = doc.check_exists("gone.json", "rpc.pdu_config_path", "not found", &mut diags);
        assert!(missing.is_none());
        let expected = format!(
            "rpc.pdu_config_path: not found: 'gone.json' (resolved: '{}')",
            dir.path().join("gone.json").display()
        );
        assert_eq!(diags.messages(), vec![expected]);
        assert_eq!(diags.count_kind(DiagnosticKind::Reference), 1);
    }

    #[test]
    fn check_exists_accepts_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("cache")).unwrap();
        let doc = Document::from_value(dir.path().join("ep.json"), json!({}));
        let mut diags = Diagnostics::new();
        assert!(doc.check_exists("cache", "endpoint.cache", "not found", &mut diags).is_some());
    }

    #[test]
    fn get_on_non_object_is_none() {
        let doc = Document::from_value("/x.json", json!([1, 2]));
        assert!(doc.get("servers").is_none());
    }
}
