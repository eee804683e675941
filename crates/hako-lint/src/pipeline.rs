//! # Lint Pipeline
//!
//! Drives one run: load and lint the manifest, follow its
//! `rpc_service_config_path` to the RPC document, lint that, then reconcile
//! the two. Every stage folds its findings into one ordered collector.
//!
//! The only early exit is a manifest that cannot be read or parsed; the run
//! then reports that single failure and nothing else. A missing RPC document
//! is reported by the manifest linter and simply skipped here.

use std::path::Path;

use serde::{Serialize, Serializer};

use hako_core::{Diagnostic, Diagnostics, Document, LintConfig};

use crate::manifest::{lint_manifest, rpc_service_config_path};
use crate::reconcile::reconcile;
use crate::rpc::lint_rpc;

/// Outcome of linting one manifest and everything it references.
///
/// Serializes as `{"ok": bool, "error_count": n, "errors": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    diagnostics: Diagnostics,
}

impl LintReport {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// True when no finding was recorded.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl Serialize for LintReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            ok: bool,
            error_count: usize,
            errors: &'a [Diagnostic],
        }
        Wire {
            ok: self.is_ok(),
            error_count: self.error_count(),
            errors: self.diagnostics.as_slice(),
        }
        .serialize(serializer)
    }
}

/// Runs the full check sequence with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    /// Lint the manifest at `manifest_path` and the RPC document it names.
    pub fn lint(&self, manifest_path: &Path) -> LintReport {
        let mut diags = Diagnostics::new();

        let Some(manifest) = Document::load_into(manifest_path, &mut diags) else {
            tracing::warn!(
                path = %manifest_path.display(),
                "manifest could not be loaded, skipping all checks"
            );
            return LintReport::new(diags);
        };

        diags.merge(lint_manifest(&manifest, &self.config));

        if let Some(rel) = rpc_service_config_path(&manifest) {
            let rpc_path = manifest.resolve(rel);
            if rpc_path.exists() {
                if let Some(rpc) = Document::load_into(&rpc_path, &mut diags) {
                    let report = lint_rpc(&rpc, &self.config);
                    diags.merge(report.diagnostics);
                    diags.merge(reconcile(&manifest, &report.index));
                }
            } else {
                tracing::debug!(path = %rpc_path.display(), "rpc document absent, skipping");
            }
        }

        LintReport::new(diags)
    }
}

/// Lint `manifest_path` with the default configuration.
pub fn lint_file(manifest_path: &Path) -> LintReport {
    Linter::default().lint(manifest_path)
}
