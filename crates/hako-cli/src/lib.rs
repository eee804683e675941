//! # hako-cli: Hakoniwa Remote API Config Linter
//!
//! Command-line front end for [`hako_lint`]. Argument parsing and output
//! rendering live here; every check lives in the library crates.
//!
//! ## Crate Policy
//!
//! - Handler functions return the process exit code as `u8`; `main` maps it.
//! - Lint findings are printed, not returned as errors. `anyhow` is reserved
//!   for failures that stop the command itself.

pub mod lint;
