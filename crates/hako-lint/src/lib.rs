//! # hako-lint: Cross-File Consistency Checks for Hakoniwa Remote API
//!
//! Lints a remote API participant manifest together with the RPC service
//! definition it points at. Single-file schema validation is assumed to have
//! run already; this crate catches what a schema cannot see:
//!
//! - path references between files that do not resolve,
//! - duplicate identifiers, names and channel ids,
//! - node and endpoint references that name nothing declared.
//!
//! ## Modules
//!
//! - [`manifest`]: the participant manifest (`remote-api.json`).
//! - [`rpc`]: the RPC service definition (`rpc.json`), including
//!   [`endpoint_index`] construction and per-endpoint [`endpoint_file`]
//!   linting.
//! - [`reconcile`]: participant `nodeId`s against the RPC endpoint index.
//! - [`pipeline`]: the driver tying the above into one [`LintReport`].
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = hako_lint::lint_file(Path::new("config/remote-api.json"));
//! if !report.is_ok() {
//!     for d in report.diagnostics() {
//!         eprintln!("{d}");
//!     }
//! }
//! ```

pub mod endpoint_file;
pub mod endpoint_index;
pub mod manifest;
pub mod pipeline;
pub mod reconcile;
pub mod rpc;

pub use endpoint_file::lint_endpoint_file;
pub use endpoint_index::{EndpointIndex, EndpointRole};
pub use manifest::lint_manifest;
pub use pipeline::{lint_file, LintReport, Linter};
pub use reconcile::reconcile;
pub use rpc::{lint_rpc, RpcReport};
