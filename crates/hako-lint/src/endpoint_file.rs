//! # Endpoint File Linter
//!
//! An endpoint file (the target of `rpc.endpoints[].endpoints[].config_path`)
//! names three further paths: the PDU definition, the cache and the comm
//! settings. Each is resolved against the endpoint file's own directory and
//! must exist. The keys are checked independently.
//!
//! A missing target reads `<file>: path for '<key>' not found: ...`; shape
//! problems use the `endpoint.<key> '<file>'` context.

use std::path::Path;

use hako_core::{Diagnostics, Document, LintConfig};

/// Lint the endpoint file at `path`. Load failures become a single diagnostic.
pub fn lint_endpoint_file(path: &Path, config: &LintConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let Some(doc) = Document::load_into(path, &mut diags) else {
        return diags;
    };
    let file = doc.file_name();

    if diags
        .expect_object(Some(doc.value()), &format!("endpoint '{file}'"))
        .is_none()
    {
        return diags;
    }

    for key in &config.endpoint_file_paths {
        let ctx = format!("endpoint.{key} '{file}'");
        if let Some(value) = diags.expect_non_empty_str(doc.get(key), &ctx) {
            doc.check_exists(value, &file, &format!("path for '{key}' not found"), &mut diags);
        }
    }

    tracing::debug!(path = %path.display(), findings = diags.len(), "linted endpoint file");
    diags
}
