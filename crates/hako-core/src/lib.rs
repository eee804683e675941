//! # hako-core: Foundations for the Hakoniwa Config Linter
//!
//! The leaf crate of the linter workspace. It knows nothing about remote-api
//! manifests or RPC service definitions; it provides the small set of
//! primitives every linter is built from:
//!
//! - [`document`]: load a JSON file into a [`Document`], capturing I/O and
//!   parse failures as [`LoadError`] instead of panicking.
//! - [`path`]: resolve a path string against the directory of the document
//!   that mentions it, with lexical normalisation.
//! - [`shape`]: "expect field of kind K at path P" accessors that record a
//!   shape diagnostic and hand back a typed view on success.
//! - [`diagnostics`]: the ordered finding collector threaded through every
//!   check.
//! - [`config`]: the fixed domain constants, overridable from YAML.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hako-*` crates.
//! - Lint findings are data ([`Diagnostic`]), never Rust errors. Only
//!   operational failures (unreadable files, bad config) use `thiserror`
//!   error types.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod path;
pub mod shape;

pub use config::LintConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use document::Document;
pub use error::{ConfigError, LoadError};
pub use path::{normalize, resolve_path};
pub use shape::{Kind, ShapeMismatch, Shaped};
