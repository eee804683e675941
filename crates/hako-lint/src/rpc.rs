//! # RPC Service Linter
//!
//! Checks an RPC service definition (historically `rpc.json`):
//!
//! 1. `pduMetaDataSize` equals the configured header size.
//! 2. `pdu_config_path` names an existing file.
//! 3. The endpoint node list is loaded and indexed ([`EndpointIndex`]).
//! 4. Every endpoint `config_path` exists, and the endpoint file it names
//!    passes [`lint_endpoint_file`].
//! 5. Every service: unique name, client count within `maxClients`, server
//!    endpoint reference(s) resolve, client names unique, channel ids
//!    distinct across all clients of the service, client endpoints resolve.
//!
//! The steps run in order because 5 consults the index built in 3, but a
//! failure in any step is only recorded; nothing here aborts.
//!
//! ## Endpoint Source
//!
//! When `endpoints_config_path` is present the node list is read from that
//! sidecar file (resolved against the RPC document) and the inline
//! `endpoints` field is ignored. Otherwise the inline `endpoints` list is
//! used. Endpoint `config_path`s are resolved against the RPC document in
//! both cases.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde_json::Value;

use hako_core::shape::{kind_name, non_empty_str};
use hako_core::{DiagnosticKind, Diagnostics, Document, LintConfig};

use crate::endpoint_file::lint_endpoint_file;
use crate::endpoint_index::{endpoint_entries, EndpointIndex, EndpointRole, ENDPOINTS_CONTEXT};

/// Findings for one RPC document plus the endpoint index built from it.
#[derive(Debug, Clone, Default)]
pub struct RpcReport {
    pub diagnostics: Diagnostics,
    pub index: EndpointIndex,
}

/// Lint a loaded RPC document.
pub fn lint_rpc(doc: &Document, config: &LintConfig) -> RpcReport {
    let mut linter = RpcLinter {
        doc,
        config,
        diags: Diagnostics::new(),
        index: EndpointIndex::default(),
    };
    linter.run();
    tracing::info!(
        path = %doc.path().display(),
        nodes = linter.index.len(),
        findings = linter.diags.len(),
        "linted rpc document"
    );
    RpcReport {
        diagnostics: linter.diags,
        index: linter.index,
    }
}

struct RpcLinter<'a> {
    doc: &'a Document,
    config: &'a LintConfig,
    diags: Diagnostics,
    index: EndpointIndex,
}

impl<'a> RpcLinter<'a> {
    fn run(&mut self) {
        if self.diags.expect_object(Some(self.doc.value()), "rpc").is_none() {
            return;
        }
        self.check_pdu_meta_data_size();
        self.check_pdu_config_path();

        let nodes = self.endpoint_nodes();
        self.index = EndpointIndex::build(&nodes, &mut self.diags);
        self.check_endpoint_config_paths(&nodes);
        self.check_services();
    }

    fn check_pdu_meta_data_size(&mut self) {
        let expected = self.config.pdu_meta_data_size;
        let ctx = "rpc.pduMetaDataSize";
        if let Some(size) = self.diags.expect_integer(self.doc.get("pduMetaDataSize"), ctx) {
            if size != expected {
                self.diags.report(
                    DiagnosticKind::Range,
                    format!("{ctx}: must be {expected}, got {size}"),
                );
            }
        }
    }

    fn check_pdu_config_path(&mut self) {
        let ctx = "rpc.pdu_config_path";
        if let Some(path) = self.diags.expect_non_empty_str(self.doc.get("pdu_config_path"), ctx) {
            self.doc.check_exists(path, ctx, "not found", &mut self.diags);
        }
    }

    /// The endpoint node list, from the sidecar file or inline.
    fn endpoint_nodes(&mut self) -> Cow<'a, [Value]> {
        let doc: &'a Document = self.doc;
        if let Some(sidecar) = doc.get("endpoints_config_path") {
            tracing::debug!(source = "sidecar", "reading endpoint nodes");
            return Cow::Owned(self.load_sidecar(sidecar));
        }
        tracing::debug!(source = "inline", "reading endpoint nodes");
        match self.diags.expect_list(doc.get("endpoints"), ENDPOINTS_CONTEXT) {
            Some(nodes) => Cow::Borrowed(nodes),
            None => Cow::Owned(Vec::new()),
        }
    }

    fn load_sidecar(&mut self, value: &Value) -> Vec<Value> {
        let ctx = "rpc.endpoints_config_path";
        let Some(rel) = self.diags.expect_non_empty_str(Some(value), ctx) else {
            return Vec::new();
        };
        let Some(path) = self.doc.check_exists(rel, ctx, "not found", &mut self.diags) else {
            return Vec::new();
        };
        let Some(sidecar) = Document::load_into(&path, &mut self.diags) else {
            return Vec::new();
        };
        match sidecar.into_value() {
            Value::Array(nodes) => nodes,
            other => {
                self.diags.report(
                    DiagnosticKind::Shape,
                    format!("{ctx} '{rel}': expected list, got {}", kind_name(Some(&other))),
                );
                Vec::new()
            }
        }
    }

    fn check_endpoint_config_paths(&mut self, nodes: &[Value]) {
        for entry in endpoint_entries(nodes) {
            let ctx = format!(
                "{ENDPOINTS_CONTEXT}[{}].endpoints[{}]",
                entry.node_index, entry.endpoint_index
            );
            let Some(config_path) = self
                .diags
                .expect_non_empty_str(entry.config_path, &format!("{ctx}.config_path"))
            else {
                continue;
            };
            let node = match entry.node_id {
                Some(id) => id.to_string(),
                None => format!("<endpoints[{}]>", entry.node_index),
            };
            let label = format!("{ENDPOINTS_CONTEXT}[{}] node '{node}'", entry.node_index);
            if let Some(resolved) =
                self.doc
                    .check_exists(config_path, &label, "config_path not found", &mut self.diags)
            {
                tracing::debug!(
                    node = ?entry.node_id,
                    endpoint = ?entry.endpoint_id,
                    path = %resolved.display(),
                    "linting endpoint file"
                );
                self.diags.merge(lint_endpoint_file(&resolved, self.config));
            }
        }
    }

    fn check_services(&mut self) {
        let doc: &'a Document = self.doc;
        let Some(services) = self.diags.expect_list(doc.get("services"), "rpc.services") else {
            return;
        };

        let mut names: BTreeSet<&str> = BTreeSet::new();
        for (si, svc) in services.iter().enumerate() {
            let Some(svc) = self.diags.expect_object(Some(svc), &format!("rpc.services[{si}]")) else {
                continue;
            };

            let name = match non_empty_str(svc.get("name")) {
                Some(name) => {
                    if !names.insert(name) {
                        self.diags.report(
                            DiagnosticKind::Uniqueness,
                            format!("rpc.services: duplicate service name '{name}'"),
                        );
                    }
                    name.to_string()
                }
                None => format!("<services[{si}]>"),
            };
            let owner = format!("rpc.services[{si}] '{name}'");

            let clients = match svc.get("clients") {
                Some(value) => self.diags.expect_list(Some(value), &format!("{owner}: clients")),
                None => None,
            };
            self.check_client_count(svc.get("maxClients"), clients, &owner);
            self.check_server_endpoints(svc, &owner);
            if let Some(clients) = clients {
                self.check_clients(clients, &owner);
            }
        }
    }

    fn check_client_count(&mut self, max_clients: Option<&Value>, clients: Option<&[Value]>, owner: &str) {
        let Some(max_clients) = max_clients else {
            return;
        };
        let Some(max) = self
            .diags
            .expect_integer(Some(max_clients), &format!("{owner}: maxClients"))
        else {
            return;
        };
        if let Some(clients) = clients {
            let count = clients.len();
            if i64::try_from(count).map_or(true, |n| n > max) {
                self.diags.report(
                    DiagnosticKind::Range,
                    format!("{owner}: clients.length({count}) > maxClients({max})"),
                );
            }
        }
    }

    /// `server_endpoints` (a list) wins over `server_endpoint` (a single ref).
    fn check_server_endpoints(&mut self, svc: &serde_json::Map<String, Value>, owner: &str) {
        if let Some(value) = svc.get("server_endpoints") {
            let Some(refs) = self
                .diags
                .expect_list(Some(value), &format!("{owner}: server_endpoints"))
            else {
                return;
            };
            for (k, r) in refs.iter().enumerate() {
                self.index.check_ref(
                    Some(r),
                    owner,
                    &format!("server_endpoints[{k}]"),
                    EndpointRole::Server,
                    &mut self.diags,
                );
            }
        } else {
            self.index.check_ref(
                svc.get("server_endpoint"),
                owner,
                "server_endpoint",
                EndpointRole::Server,
                &mut self.diags,
            );
        }
    }

    fn check_clients(&mut self, clients: &[Value], owner: &str) {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut channels: BTreeSet<i64> = BTreeSet::new();

        for (ci, client) in clients.iter().enumerate() {
            let Some(client) = self
                .diags
                .expect_object(Some(client), &format!("{owner}: clients[{ci}]"))
            else {
                continue;
            };

            if let Some(name) = non_empty_str(client.get("name")) {
                if !names.insert(name) {
                    self.diags.report(
                        DiagnosticKind::Uniqueness,
                        format!("{owner}: duplicate client name '{name}'"),
                    );
                }
            }

            for key in ["requestChannelId", "responseChannelId"] {
                let ctx = format!("{owner}: clients[{ci}].{key}");
                if let Some(channel) = self.diags.expect_integer(client.get(key), &ctx) {
                    if !channels.insert(channel) {
                        self.diags.report(
                            DiagnosticKind::Uniqueness,
                            format!("{owner}: channel collision: {channel} ({key})"),
                        );
                    }
                }
            }

            self.index.check_ref(
                client.get("client_endpoint"),
                owner,
                &format!("clients[{ci}].client_endpoint"),
                EndpointRole::Client,
                &mut self.diags,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    /// Temp directory holding a PDU config and one valid endpoint file.
    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path();
            std::fs::write(root.join("pdu.json"), b"{}").unwrap();
            std::fs::write(root.join("pdudef.json"), b"{}").unwrap();
            std::fs::write(root.join("cache.json"), b"{}").unwrap();
            std::fs::write(root.join("comm.json"), b"{}").unwrap();
            write(
                &root.join("ep1.json"),
                json!({"pdu_def_path": "pdudef.json", "cache": "cache.json", "comm": "comm.json"}),
            );
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn lint(&self, rpc: serde_json::Value) -> RpcReport {
            let doc = Document::from_value(self.path("rpc.json"), rpc);
            lint_rpc(&doc, &LintConfig::default())
        }
    }

    fn write(path: &Path, value: serde_json::Value) {
        std::fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }

    fn valid_rpc() -> serde_json::Value {
        json!({
            "pduMetaDataSize": 24,
            "pdu_config_path": "./pdu.json",
            "endpoints": [
                {"nodeId": "N1", "endpoints": [
                    {"id": "E1", "config_path": "./ep1.json"},
                    {"id": "E2", "config_path": "./ep1.json"}
                ]}
            ],
            "services": [
                {
                    "name": "Service/Add",
                    "maxClients": 2,
                    "server_endpoint": {"nodeId": "N1", "endpointId": "E1"},
                    "clients": [
                        {"name": "c1", "requestChannelId": 0, "responseChannelId": 1,
                         "client_endpoint": {"nodeId": "N1", "endpointId": "E2"}}
                    ]
                }
            ]
        })
    }

    #[test]
    fn valid_document_is_clean_and_indexed() {
        let fx = Fixture::new();
        let report = fx.lint(valid_rpc());
        assert!(report.diagnostics.is_empty(), "{}", report.diagnostics);
        assert!(report.index.contains_endpoint("N1", "E2"));
    }

    #[test]
    fn wrong_meta_data_size_is_range_error() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["pduMetaDataSize"] = json!(16);
        let report = fx.lint(rpc);
        assert_eq!(report.diagnostics.messages(), vec!["rpc.pduMetaDataSize: must be 24, got 16"]);
        assert_eq!(report.diagnostics.count_kind(DiagnosticKind::Range), 1);
    }

    #[test]
    fn missing_pdu_config_path_reports_only_that_field() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc.as_object_mut().unwrap().remove("pdu_config_path");
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec!["rpc.pdu_config_path: expected string, got missing"]
        );
    }

    #[test]
    fn dangling_endpoint_config_path() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["endpoints"][0]["endpoints"][1]["config_path"] = json!("../elsewhere/ep2.json");
        let report = fx.lint(rpc);
        let resolved = fx.dir.path().parent().unwrap().join("elsewhere/ep2.json");
        assert_eq!(
            report.diagnostics.messages(),
            vec![format!(
                "rpc.endpoints[0] node 'N1': config_path not found: '../elsewhere/ep2.json' (resolved: '{}')",
                resolved.display()
            )]
        );
    }

    #[test]
    fn dangling_pdu_config_path() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["pdu_config_path"] = json!("./pdu_missing.json");
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec![format!(
                "rpc.pdu_config_path: not found: './pdu_missing.json' (resolved: '{}')",
                fx.path("pdu_missing.json").display()
            )]
        );
        assert_eq!(report.diagnostics.count_kind(DiagnosticKind::Reference), 1);
    }

    #[test]
    fn unnamed_node_config_path_uses_placeholder() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["endpoints"]
            .as_array_mut()
            .unwrap()
            .push(json!({"endpoints": [{"id": "E9", "config_path": "nowhere.json"}]}));
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec![
                "rpc.endpoints[1].nodeId: expected string, got missing".to_string(),
                format!(
                    "rpc.endpoints[1] node '<endpoints[1]>': config_path not found: 'nowhere.json' (resolved: '{}')",
                    fx.path("nowhere.json").display()
                ),
            ]
        );
    }

    #[test]
    fn endpoint_file_findings_are_folded_in() {
        let fx = Fixture::new();
        write(&fx.path("ep1.json"), json!({"pdu_def_path": "pdudef.json", "cache": "cache.json"}));
        let report = fx.lint(valid_rpc());
        // ep1.json is referenced twice, so its finding appears once per reference.
        assert_eq!(
            report.diagnostics.messages(),
            vec![
                "endpoint.comm 'ep1.json': expected string, got missing",
                "endpoint.comm 'ep1.json': expected string, got missing",
            ]
        );
    }

    #[test]
    fn sidecar_endpoints_take_precedence_over_inline() {
        let fx = Fixture::new();
        write(
            &fx.path("endpoints.json"),
            json!([{"nodeId": "N7", "endpoints": [{"id": "S1", "config_path": "ep1.json"}]}]),
        );
        let rpc = json!({
            "pduMetaDataSize": 24,
            "pdu_config_path": "pdu.json",
            "endpoints_config_path": "endpoints.json",
            "endpoints": [{"nodeId": "N1", "endpoints": [{"id": "E1", "config_path": "ep1.json"}]}],
            "services": [{"name": "s", "server_endpoint": {"nodeId": "N7", "endpointId": "S1"}}]
        });
        let report = fx.lint(rpc);
        assert!(report.diagnostics.is_empty(), "{}", report.diagnostics);
        assert!(report.index.contains_node("N7"));
        assert!(!report.index.contains_node("N1"));
    }

    #[test]
    fn sidecar_that_is_not_a_list() {
        let fx = Fixture::new();
        write(&fx.path("endpoints.json"), json!({"nodeId": "N1"}));
        let rpc = json!({
            "pduMetaDataSize": 24,
            "pdu_config_path": "pdu.json",
            "endpoints_config_path": "endpoints.json",
            "services": []
        });
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec!["rpc.endpoints_config_path 'endpoints.json': expected list, got object"]
        );
        assert!(report.index.is_empty());
    }

    #[test]
    fn missing_sidecar_is_reference_error() {
        let fx = Fixture::new();
        let rpc = json!({
            "pduMetaDataSize": 24,
            "pdu_config_path": "pdu.json",
            "endpoints_config_path": "nope.json",
            "services": []
        });
        let report = fx.lint(rpc);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics.messages()[0]
            .starts_with("rpc.endpoints_config_path: not found: 'nope.json' (resolved: '"));
    }

    #[test]
    fn too_many_clients_cites_counts() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["services"][0]["maxClients"] = json!(0);
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec!["rpc.services[0] 'Service/Add': clients.length(1) > maxClients(0)"]
        );
    }

    #[test]
    fn channel_collision_pooled_across_request_and_response() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["services"][0]["clients"] = json!([
            {"name": "a", "requestChannelId": 0, "responseChannelId": 1,
             "client_endpoint": {"nodeId": "N1", "endpointId": "E2"}},
            {"name": "b", "requestChannelId": 1, "responseChannelId": 2,
             "client_endpoint": {"nodeId": "N1", "endpointId": "E2"}}
        ]);
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec!["rpc.services[0] 'Service/Add': channel collision: 1 (requestChannelId)"]
        );
    }

    #[test]
    fn duplicate_service_and_client_names() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        let svc = rpc["services"][0].clone();
        rpc["services"].as_array_mut().unwrap().push(svc);
        rpc["services"][0]["clients"] = json!([
            {"name": "c", "requestChannelId": 0, "responseChannelId": 1,
             "client_endpoint": {"nodeId": "N1", "endpointId": "E2"}},
            {"name": "c", "requestChannelId": 2, "responseChannelId": 3,
             "client_endpoint": {"nodeId": "N1", "endpointId": "E2"}}
        ]);
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec![
                "rpc.services[0] 'Service/Add': duplicate client name 'c'",
                "rpc.services: duplicate service name 'Service/Add'",
            ]
        );
    }

    #[test]
    fn plural_server_endpoints_each_checked() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        let svc = rpc["services"][0].as_object_mut().unwrap();
        svc.remove("server_endpoint");
        svc.insert(
            "server_endpoints".to_string(),
            json!([
                {"nodeId": "N1", "endpointId": "E1"},
                {"nodeId": "N1", "endpointId": "E9"},
                {"nodeId": "N2", "endpointId": "E1"}
            ]),
        );
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec![
                "rpc.services[0] 'Service/Add': server endpointId 'E9' not found under node 'N1'",
                "rpc.services[0] 'Service/Add': server nodeId 'N2' not found in rpc.endpoints",
            ]
        );
    }

    #[test]
    fn unnamed_service_uses_placeholder() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["services"][0].as_object_mut().unwrap().remove("name");
        rpc["services"][0]["server_endpoint"]["endpointId"] = json!("");
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec!["rpc.services[0] '<services[0]>': server_endpoint.endpointId: missing or empty string"]
        );
    }

    #[test]
    fn client_shape_errors_do_not_cascade() {
        let fx = Fixture::new();
        let mut rpc = valid_rpc();
        rpc["services"][0]["clients"] = json!([
            "nope",
            {"requestChannelId": "0", "responseChannelId": 5}
        ]);
        let report = fx.lint(rpc);
        assert_eq!(
            report.diagnostics.messages(),
            vec![
                "rpc.services[0] 'Service/Add': clients[0]: expected object, got string",
                "rpc.services[0] 'Service/Add': clients[1].requestChannelId: expected integer, got string",
                "rpc.services[0] 'Service/Add': clients[1].client_endpoint: expected object, got missing",
            ]
        );
    }

    #[test]
    fn non_object_document() {
        let fx = Fixture::new();
        let report = fx.lint(json!([]));
        assert_eq!(report.diagnostics.messages(), vec!["rpc: expected object, got list"]);
    }
}
