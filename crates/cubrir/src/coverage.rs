//! Coverage tool invocation
//!
//! Builds the argument vector for the coverage instrumentation tool. Pure
//! construction only - spawning the process and reading the report back is
//! the caller's job.

use crate::paths::{relative_from, PathStyle};
use serde::{Deserialize, Serialize};

/// One instrumented run of a test command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageInvocation {
    /// Directory holding the sources to report coverage for.
    pub source_dir: String,
    /// Build directory the test command runs in.
    pub binary_dir: String,
    /// Path the Cobertura report is exported to.
    pub report_path: String,
    /// Tokenized test command (program followed by its arguments).
    pub command: Vec<String>,
    /// Separator convention of the paths above.
    pub style: PathStyle,
}

impl CoverageInvocation {
    /// Create an invocation using the host platform's separator convention.
    #[must_use]
    pub fn new(
        source_dir: impl Into<String>,
        binary_dir: impl Into<String>,
        report_path: impl Into<String>,
        command: Vec<String>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            binary_dir: binary_dir.into(),
            report_path: report_path.into(),
            command,
            style: PathStyle::native(),
        }
    }

    /// Override the separator convention.
    #[must_use]
    pub const fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// The full argument vector for the coverage tool.
    ///
    /// Module and source filters carry a trailing separator so the tool
    /// matches them as directory prefixes. The export path is relative to
    /// the binary directory because the tool runs with that as its working
    /// directory. The test command follows a literal `--`.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let style = self.style;
        let modules = style.with_trailing_separator(&self.binary_dir);
        let excluded_modules =
            style.with_trailing_separator(&style.join(&[&self.binary_dir, "vcpkg_installed"]));
        let sources = style.with_trailing_separator(&self.source_dir);
        let excluded_sources =
            style.with_trailing_separator(&style.join(&[&self.source_dir, "test"]));
        let export = relative_from(&self.binary_dir, &self.report_path, style);

        let mut args = vec![
            format!("--modules={modules}"),
            format!("--excluded_modules={excluded_modules}"),
            format!("--sources={sources}"),
            format!("--excluded_sources={excluded_sources}"),
            format!("--working_dir={}", self.binary_dir),
            "--cover_children".to_string(),
            format!("--export_type=cobertura:{export}"),
            "--".to_string(),
        ];
        args.extend(self.command.iter().cloned());
        args
    }
}
