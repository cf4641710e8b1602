//! Cubrir: Coverage plumbing for CI jobs
//!
//! Cubrir (Spanish: "to cover") is the core library behind `cubridor`, a CI
//! helper that runs a test binary under a coverage instrumentation tool and
//! forwards the resulting Cobertura report to external quality services.
//!
//! The library owns the two pieces of the job that are more than glue:
//!
//! - [`tokenize`]: split a shell-like command string into process arguments,
//!   honoring quoting and escapes, without ever failing;
//! - [`rewrite_paths`]: rewrite the path prefixes inside a Cobertura report so
//!   file paths are portable between the CI host and the reporting service.
//!
//! Both are pure functions: no filesystem, environment, or clock access. The
//! orchestration around them (tool installation, process execution, uploads)
//! lives in the `cubridor` binary crate.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod coverage;
pub mod paths;
pub mod rewrite;
pub mod tokenize;

pub use coverage::CoverageInvocation;
pub use paths::{
    force_native, force_posix, force_windows, relative_from, repository_name, PathStyle,
};
pub use rewrite::{rewrite_paths, RewriteContext, RewriteOutcome};
pub use tokenize::tokenize;
