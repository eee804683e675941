//! # Endpoint Index
//!
//! `nodeId -> {endpoint id}` built once per RPC document from its endpoint
//! node list. Every endpoint reference in the services section, and the
//! cross-file participant check, is answered from this index.
//!
//! Building is permissive: a malformed node or endpoint entry is reported
//! and skipped, a node is registered as soon as its `nodeId` is readable
//! (even with zero endpoints), and a duplicate endpoint id is reported but
//! still kept so later references to it do not cascade into "not found".
//! Repeated `nodeId` entries merge into one set.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use hako_core::shape::non_empty_str;
use hako_core::{DiagnosticKind, Diagnostics};

/// Field path used in messages about the endpoint node list, whichever
/// source it was read from.
pub const ENDPOINTS_CONTEXT: &str = "rpc.endpoints";

/// Which side of a service an endpoint reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Server,
    Client,
}

impl EndpointRole {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
        }
    }
}

/// Declared endpoint ids, grouped by node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointIndex {
    nodes: BTreeMap<String, BTreeSet<String>>,
}

impl EndpointIndex {
    /// Scan an endpoint node list and build the index.
    pub fn build(nodes: &[Value], diags: &mut Diagnostics) -> Self {
        let mut index = Self::default();

        for (i, node) in nodes.iter().enumerate() {
            let ctx = format!("{ENDPOINTS_CONTEXT}[{i}]");
            let Some(node) = diags.expect_object(Some(node), &ctx) else {
                continue;
            };
            let Some(node_id) = diags.expect_non_empty_str(node.get("nodeId"), &format!("{ctx}.nodeId"))
            else {
                continue;
            };

            if index.nodes.contains_key(node_id) {
                tracing::debug!(node_id, entry = i, "merging repeated endpoint node entry");
            }
            let ids = index.nodes.entry(node_id.to_string()).or_default();

            let Some(endpoints) = diags.expect_list(node.get("endpoints"), &format!("{ctx}.endpoints"))
            else {
                continue;
            };

            for (j, ep) in endpoints.iter().enumerate() {
                let ep_ctx = format!("{ctx}.endpoints[{j}]");
                let Some(ep) = diags.expect_object(Some(ep), &ep_ctx) else {
                    continue;
                };
                let Some(ep_id) = diags.expect_non_empty_str(ep.get("id"), &format!("{ep_ctx}.id"))
                else {
                    continue;
                };
                if !ids.insert(ep_id.to_string()) {
                    diags.report(
                        DiagnosticKind::Uniqueness,
                        format!("{ctx} node '{node_id}': duplicate endpoint id '{ep_id}'"),
                    );
                }
            }
        }

        index
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn contains_endpoint(&self, node_id: &str, endpoint_id: &str) -> bool {
        self.nodes
            .get(node_id)
            .is_some_and(|ids| ids.contains(endpoint_id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check an `{nodeId, endpointId}` reference.
    ///
    /// `owner` prefixes every message (e.g. `rpc.services[0] 'svc'`) and
    /// `field` names the reference inside it (e.g. `server_endpoint`). The
    /// endpoint id is only looked up once the node is known, so an unknown
    /// node yields a single diagnostic.
    pub fn check_ref(
        &self,
        value: Option<&Value>,
        owner: &str,
        field: &str,
        role: EndpointRole,
        diags: &mut Diagnostics,
    ) {
        let Some(reference) = diags.expect_object(value, &format!("{owner}: {field}")) else {
            return;
        };
        let Some(node_id) =
            diags.expect_non_empty_str(reference.get("nodeId"), &format!("{owner}: {field}.nodeId"))
        else {
            return;
        };
        let Some(endpoint_id) = diags.expect_non_empty_str(
            reference.get("endpointId"),
            &format!("{owner}: {field}.endpointId"),
        ) else {
            return;
        };

        let role = role.as_str();
        if !self.contains_node(node_id) {
            diags.report(
                DiagnosticKind::Reference,
                format!("{owner}: {role} nodeId '{node_id}' not found in {ENDPOINTS_CONTEXT}"),
            );
        } else if !self.contains_endpoint(node_id, endpoint_id) {
            diags.report(
                DiagnosticKind::Reference,
                format!("{owner}: {role} endpointId '{endpoint_id}' not found under node '{node_id}'"),
            );
        }
    }
}

/// Every endpoint entry with a readable `config_path`, for the second pass
/// over the node list. Entries the index builder already rejected are
/// skipped silently here.
pub(crate) fn endpoint_entries(nodes: &[Value]) -> impl Iterator<Item = EndpointEntry<'_>> {
    nodes.iter().enumerate().flat_map(|(i, node)| {
        let node_id = non_empty_str(node.get("nodeId"));
        node.get("endpoints")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .enumerate()
            .filter(|(_, ep)| ep.is_object())
            .map(move |(j, ep)| EndpointEntry {
                node_index: i,
                endpoint_index: j,
                node_id,
                endpoint_id: non_empty_str(ep.get("id")),
                config_path: ep.get("config_path"),
            })
    })
}

/// One endpoint declaration, borrowed from the node list.
pub(crate) struct EndpointEntry<'a> {
    pub node_index: usize,
    pub endpoint_index: usize,
    pub node_id: Option<&'a str>,
    pub endpoint_id: Option<&'a str>,
    pub config_path: Option<&'a Value>,
}
