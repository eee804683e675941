//! # Cross-File Reconciler
//!
//! The one check that spans both documents: every participant `nodeId` in
//! the manifest must be declared in the RPC document's endpoint index.
//! Skipped entirely when the index is empty, since an RPC document that
//! yielded no nodes has already been reported on by its own linter.

use hako_core::shape::non_empty_str;
use hako_core::{DiagnosticKind, Diagnostics, Document};

use crate::endpoint_index::EndpointIndex;
use crate::manifest::participants;

/// Check participant node ids against the endpoint index.
pub fn reconcile(manifest: &Document, index: &EndpointIndex) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if index.is_empty() {
        tracing::debug!("endpoint index empty, skipping cross-file checks");
        return diags;
    }

    for (i, participant) in participants(manifest).iter().enumerate() {
        let Some(node_id) = non_empty_str(participant.get("nodeId")) else {
            continue;
        };
        if !index.contains_node(node_id) {
            diags.report(
                DiagnosticKind::Reference,
                format!("remote-api.participants[{i}]: nodeId '{node_id}' not found in rpc.json's endpoints"),
            );
        }
    }

    tracing::info!(findings = diags.len(), "reconciled manifest against rpc endpoints");
    diags
}
