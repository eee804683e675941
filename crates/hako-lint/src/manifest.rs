//! # Participant Manifest Linter
//!
//! Checks a remote API participant manifest (historically `remote-api.json`).
//! Four groups of checks run independently and all of them always run:
//!
//! - `rpc_service_config_path` names an existing file.
//! - `servers`: objects with unique, non-empty `nodeId`.
//! - `time_source_type` is a known source, `poll_sleep_time_usec` is positive.
//! - `participants`: objects with unique `name` and `nodeId`, a known
//!   `server_nodeId`, a known `role` and a positive poll interval.
//!
//! `server_nodeId` is only checked when `servers` itself was a list, so a
//! missing server list yields one diagnostic rather than one per participant.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use hako_core::{DiagnosticKind, Diagnostics, Document, LintConfig};

const ROOT: &str = "remote-api";

/// Lint a loaded manifest document.
pub fn lint_manifest(doc: &Document, config: &LintConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if diags.expect_object(Some(doc.value()), ROOT).is_some() {
        check_rpc_path(doc, &mut diags);
        let servers = check_servers(doc, &mut diags);
        check_time_settings(doc, config, &mut diags);
        check_participants(doc, config, servers.as_ref(), &mut diags);
    }
    tracing::info!(
        path = %doc.path().display(),
        findings = diags.len(),
        "linted participant manifest"
    );
    diags
}

/// The manifest's `rpc_service_config_path`, if it is a non-empty string.
pub fn rpc_service_config_path(doc: &Document) -> Option<&str> {
    doc.get("rpc_service_config_path")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The manifest's `participants` list, or an empty slice when absent or
/// not a list.
pub fn participants(doc: &Document) -> &[Value] {
    doc.get("participants")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn check_rpc_path(doc: &Document, diags: &mut Diagnostics) {
    let ctx = format!("{ROOT}.rpc_service_config_path");
    if let Some(rel) = diags.expect_non_empty_str(doc.get("rpc_service_config_path"), &ctx) {
        doc.check_exists(rel, &ctx, "not found", diags);
    }
}

/// Returns the declared server node ids, or `None` if `servers` is not a list.
fn check_servers<'a>(doc: &'a Document, diags: &mut Diagnostics) -> Option<BTreeSet<&'a str>> {
    let servers = diags.expect_list(doc.get("servers"), &format!("{ROOT}.servers"))?;

    let mut ids = BTreeSet::new();
    for (i, server) in servers.iter().enumerate() {
        let ctx = format!("{ROOT}.servers[{i}]");
        let Some(server) = diags.expect_object(Some(server), &ctx) else {
            continue;
        };
        let Some(node_id) = diags.expect_non_empty_str(server.get("nodeId"), &format!("{ctx}.nodeId"))
        else {
            continue;
        };
        if !ids.insert(node_id) {
            diags.report(
                DiagnosticKind::Uniqueness,
                format!("{ROOT}.servers: duplicate nodeId '{node_id}'"),
            );
        }
    }
    Some(ids)
}

fn check_time_settings(doc: &Document, config: &LintConfig, diags: &mut Diagnostics) {
    let ctx = format!("{ROOT}.time_source_type");
    if let Some(source) = diags.expect_str(doc.get("time_source_type"), &ctx) {
        if !config.is_time_source_type(source) {
            diags.report(
                DiagnosticKind::Range,
                format!("{ctx}: invalid value '{source}'"),
            );
        }
    }
    check_poll_sleep(doc.get("poll_sleep_time_usec"), ROOT, diags);
}

fn check_poll_sleep(value: Option<&Value>, owner: &str, diags: &mut Diagnostics) {
    let ctx = format!("{owner}.poll_sleep_time_usec");
    if let Some(usec) = diags.expect_integer(value, &ctx) {
        if usec <= 0 {
            diags.report(DiagnosticKind::Range, format!("{ctx}: must be > 0"));
        }
    }
}

fn check_participants(
    doc: &Document,
    config: &LintConfig,
    servers: Option<&BTreeSet<&str>>,
    diags: &mut Diagnostics,
) {
    let list_ctx = format!("{ROOT}.participants");
    let Some(participants) = diags.expect_list(doc.get("participants"), &list_ctx) else {
        return;
    };

    let mut names: BTreeSet<&str> = BTreeSet::new();
    let mut node_ids: BTreeSet<&str> = BTreeSet::new();

    for (i, participant) in participants.iter().enumerate() {
        let ctx = format!("{list_ctx}[{i}]");
        let Some(p) = diags.expect_object(Some(participant), &ctx) else {
            continue;
        };

        for (field, seen) in [("name", &mut names), ("nodeId", &mut node_ids)] {
            if let Some(value) = diags.expect_non_empty_str(p.get(field), &format!("{ctx}.{field}")) {
                if !seen.insert(value) {
                    diags.report(
                        DiagnosticKind::Uniqueness,
                        format!("{list_ctx}: duplicate {field} '{value}'"),
                    );
                }
            }
        }

        if let Some(servers) = servers {
            check_server_ref(p, &ctx, servers, diags);
        }

        let role_ctx = format!("{ctx}.role");
        if let Some(role) = diags.expect_non_empty_str(p.get("role"), &role_ctx) {
            if !config.is_participant_role(role) {
                diags.report(
                    DiagnosticKind::Range,
                    format!("{role_ctx}: invalid value '{role}'"),
                );
            }
        }

        check_poll_sleep(p.get("poll_sleep_time_usec"), &ctx, diags);
    }
}

fn check_server_ref(
    participant: &Map<String, Value>,
    ctx: &str,
    servers: &BTreeSet<&str>,
    diags: &mut Diagnostics,
) {
    let field_ctx = format!("{ctx}.server_nodeId");
    let Some(server) = diags.expect_non_empty_str(participant.get("server_nodeId"), &field_ctx) else {
        return;
    };
    if !servers.contains(server) {
        diags.report(
            DiagnosticKind::Reference,
            format!("{field_ctx} '{server}': not found in {ROOT}.servers"),
        );
    }
}
