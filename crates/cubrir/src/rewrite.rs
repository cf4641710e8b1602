//! Cobertura report path rewriting
//!
//! The coverage tool writes absolute host paths into its report: the
//! `<source>` element and the `name=`/`filename=` attributes. The reporting
//! services need paths that are relative to the repository and use forward
//! slashes. This pass rewrites exactly those anchors by literal substring
//! matching - it is text surgery with known markers, not XML editing, and it
//! never fails: a missing marker skips that step and leaves the text alone.

use crate::paths::PathStyle;
use serde::{Deserialize, Serialize};

const SOURCE_OPEN: &str = "<source>";
const SOURCE_CLOSE: &str = "</source>";

/// Context for one rewrite pass over a report.
///
/// All inputs are explicit rather than read from the process environment: the
/// workspace root, the build directory, and the repository name are threaded
/// in explicitly, along with the separator convention the fragments use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteContext {
    /// Absolute path of the CI job's working directory.
    pub workspace_root: String,
    /// Absolute path of the build directory the test binary ran in.
    pub binary_dir: String,
    /// Repository name (without the owner prefix).
    pub repository: String,
    /// Separator convention of the path fragments above.
    pub style: PathStyle,
}

impl RewriteContext {
    /// Create a context using the host platform's separator convention.
    #[must_use]
    pub fn new(
        workspace_root: impl Into<String>,
        binary_dir: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            binary_dir: binary_dir.into(),
            repository: repository.into(),
            style: PathStyle::native(),
        }
    }

    /// Override the separator convention.
    #[must_use]
    pub const fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }
}

/// What a rewrite pass did.
///
/// The pass is best-effort by design: a step whose marker or prefix does not
/// occur is a no-op, reported here instead of raised as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// The rewritten report text.
    pub text: String,
    /// Whether a `<source>` element was found and its content replaced.
    pub source_rewritten: bool,
    /// Attribute values stripped of the binary-directory prefix.
    pub binary_prefixes_stripped: usize,
    /// Attribute values stripped of the workspace-relative repository prefix.
    pub workspace_prefixes_stripped: usize,
}

impl RewriteOutcome {
    /// Whether any step beyond separator normalization applied.
    #[must_use]
    pub fn rewrote_anything(&self) -> bool {
        self.source_rewritten
            || self.binary_prefixes_stripped > 0
            || self.workspace_prefixes_stripped > 0
    }
}

/// Rewrite the path anchors of a Cobertura report.
///
/// Steps, in order:
///
/// 1. replace the first `<source>…</source>` content with
///    `workspace_root` joined with `repository`, capturing the original
///    content first;
/// 2. strip `binary_dir` plus a trailing separator as a literal prefix from
///    every `name="…"`/`filename="…"` attribute value;
/// 3. strip the workspace-relative repository prefix (derived from step 1's
///    capture) the same way;
/// 4. normalize every remaining backslash to a forward slash.
///
/// Steps 2 and 3 match against un-normalized text, which is why step 4 runs
/// last. Running the pass on its own output again changes nothing.
#[must_use]
pub fn rewrite_paths(report: &str, ctx: &RewriteContext) -> RewriteOutcome {
    let mut text = report.to_string();
    let mut source_rewritten = false;
    let mut workspace_without_root = None;

    if !ctx.repository.is_empty() {
        if let Some((start, end)) = locate_source_content(&text) {
            let original_root_len = text[start..end].len();
            let trimmed = ctx
                .workspace_root
                .get(original_root_len..)
                .unwrap_or("")
                .trim_start_matches(['/', '\\']);
            workspace_without_root = Some(trimmed.to_string());

            let replacement = ctx.style.join(&[&ctx.workspace_root, &ctx.repository]);
            text.replace_range(start..end, &replacement);
            source_rewritten = true;
        }
    }

    let binary_prefixes_stripped = if ctx.binary_dir.is_empty() {
        0
    } else {
        let prefix = ctx.style.with_trailing_separator(&ctx.binary_dir);
        let (stripped, count) = strip_attribute_prefixes(&text, &prefix);
        text = stripped;
        count
    };

    let workspace_prefixes_stripped = match workspace_without_root {
        Some(without_root) => {
            let joined = ctx.style.join(&[&without_root, &ctx.repository]);
            let prefix = ctx.style.with_trailing_separator(&joined);
            let (stripped, count) = strip_attribute_prefixes(&text, &prefix);
            text = stripped;
            count
        }
        None => 0,
    };

    text = text.replace('\\', "/");

    RewriteOutcome {
        text,
        source_rewritten,
        binary_prefixes_stripped,
        workspace_prefixes_stripped,
    }
}

/// Byte range of the first `<source>` element's content.
fn locate_source_content(text: &str) -> Option<(usize, usize)> {
    let open = text.find(SOURCE_OPEN)?;
    let start = open + SOURCE_OPEN.len();
    let close = text[start..].find(SOURCE_CLOSE)?;
    Some((start, start + close))
}

/// Remove `prefix` from the front of every `name="…"`/`filename="…"`
/// attribute value it literally opens. Returns the new text and the number
/// of values stripped.
fn strip_attribute_prefixes(text: &str, prefix: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut idx = 0;

    while let Some(rel) = text[idx..].find("=\"") {
        let eq_pos = idx + rel;
        let value_start = eq_pos + 2;
        out.push_str(&text[idx..value_start]);
        idx = value_start;

        let head = &text[..eq_pos];
        let is_path_attribute = head.ends_with(" name") || head.ends_with(" filename");
        if is_path_attribute && text[idx..].starts_with(prefix) {
            idx += prefix.len();
            count += 1;
        }
    }
    out.push_str(&text[idx..]);
    (out, count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const WINDOWS_REPORT: &str = concat!(
        r#"<?xml version="1.0" encoding="utf-8"?>"#,
        "\n<coverage>\n",
        "  <sources>\n",
        r"    <source>C:\ws\repo</source>",
        "\n  </sources>\n",
        r#"  <package name="C:\ws\repo\build\test.exe">"#,
        "\n",
        r#"    <class name="x" filename="C:\ws\repo\build\src\x.cpp">"#,
        "\n",
        r#"    <class name="y" filename="C:\ws\repo\build\src\sub\y.cpp">"#,
        "\n  </package>\n</coverage>\n"
    );

    fn windows_context() -> RewriteContext {
        RewriteContext::new(r"C:\ws", r"C:\ws\repo\build", "repo")
            .with_style(PathStyle::Windows)
    }

    mod source_element_tests {
        use super::*;

        #[test]
        fn test_source_content_replaced_with_workspace_and_repository() {
            let outcome = rewrite_paths(WINDOWS_REPORT, &windows_context());
            assert!(outcome.source_rewritten);
            assert!(outcome.text.contains("<source>C:/ws/repo</source>"));
        }

        #[test]
        fn test_missing_source_element_skips_steps_one_and_three() {
            let report = r#"<coverage><class name="a" filename="C:\b\src\x.cpp"/></coverage>"#;
            let ctx = RewriteContext::new(r"C:\ws", r"C:\b", "repo").with_style(PathStyle::Windows);
            let outcome = rewrite_paths(report, &ctx);

            assert!(!outcome.source_rewritten);
            assert_eq!(outcome.workspace_prefixes_stripped, 0);
            // Step 2 and normalization still apply.
            assert_eq!(outcome.binary_prefixes_stripped, 1);
            assert!(outcome.text.contains(r#"filename="src/x.cpp""#));
        }

        #[test]
        fn test_only_first_source_element_is_rewritten() {
            let report = "<source>/ws/a</source><source>/ws/b</source>";
            let ctx = RewriteContext::new("/ws", "/ws/a/build", "repo").with_style(PathStyle::Posix);
            let outcome = rewrite_paths(report, &ctx);
            assert_eq!(outcome.text, "<source>/ws/repo</source><source>/ws/b</source>");
        }
    }

    mod prefix_strip_tests {
        use super::*;

        #[test]
        fn test_binary_prefix_stripped_from_all_attributes() {
            let outcome = rewrite_paths(WINDOWS_REPORT, &windows_context());
            assert_eq!(outcome.binary_prefixes_stripped, 3);
            assert!(outcome.text.contains(r#"filename="src/x.cpp""#));
            assert!(outcome.text.contains(r#"filename="src/sub/y.cpp""#));
            assert!(outcome.text.contains(r#"package name="test.exe""#));
        }

        #[test]
        fn test_binary_dir_with_trailing_separator_matches_same() {
            let ctx = RewriteContext::new(r"C:\ws", "C:\\ws\\repo\\build\\", "repo")
                .with_style(PathStyle::Windows);
            let outcome = rewrite_paths(WINDOWS_REPORT, &ctx);
            assert_eq!(outcome.binary_prefixes_stripped, 3);
        }

        #[test]
        fn test_unmatched_binary_prefix_is_noop_besides_normalization() {
            let ctx = RewriteContext::new(r"C:\ws", r"D:\other\build", "repo")
                .with_style(PathStyle::Windows);
            let outcome = rewrite_paths(WINDOWS_REPORT, &ctx);
            assert_eq!(outcome.binary_prefixes_stripped, 0);
            assert!(outcome.text.contains(r#"filename="C:/ws/repo/build/src/x.cpp""#));
        }

        #[test]
        fn test_workspace_relative_prefix_stripped() {
            // Source root is the workspace itself, so the workspace-relative
            // fragment is `repo\` and filenames carry it.
            let report = concat!(
                r"<source>C:\ws</source>",
                "\n",
                r#"<class name="x" filename="repo\src\x.cpp"/>"#,
            );
            let ctx = windows_context();
            let outcome = rewrite_paths(report, &ctx);
            assert_eq!(outcome.workspace_prefixes_stripped, 1);
            assert!(outcome.text.contains(r#"filename="src/x.cpp""#));
        }

        #[test]
        fn test_value_not_at_start_is_untouched() {
            let report = r#"<source>/ws/repo</source><class name="pre/ws/repo/build/x"/>"#;
            let ctx = RewriteContext::new("/ws", "/ws/repo/build", "repo")
                .with_style(PathStyle::Posix);
            let outcome = rewrite_paths(report, &ctx);
            assert_eq!(outcome.binary_prefixes_stripped, 0);
            assert!(outcome.text.contains(r#"name="pre/ws/repo/build/x""#));
        }

        #[test]
        fn test_unrelated_attributes_are_untouched() {
            let report = r#"<source>/ws/repo</source><line number="/ws/repo/build/x"/>"#;
            let ctx = RewriteContext::new("/ws", "/ws/repo/build", "repo")
                .with_style(PathStyle::Posix);
            let outcome = rewrite_paths(report, &ctx);
            assert_eq!(outcome.binary_prefixes_stripped, 0);
            assert!(outcome.text.contains(r#"number="/ws/repo/build/x""#));
        }
    }

    mod normalization_tests {
        use super::*;

        #[test]
        fn test_all_backslashes_become_forward_slashes() {
            let outcome = rewrite_paths(WINDOWS_REPORT, &windows_context());
            assert!(!outcome.text.contains('\\'));
        }

        #[test]
        fn test_posix_report_needs_no_normalization() {
            let report = r#"<source>/ws/repo</source><class name="c" filename="/ws/repo/build/x.cpp"/>"#;
            let ctx = RewriteContext::new("/ws", "/ws/repo/build", "repo")
                .with_style(PathStyle::Posix);
            let outcome = rewrite_paths(report, &ctx);
            assert!(outcome.text.contains(r#"filename="x.cpp""#));
            assert!(outcome.text.contains("<source>/ws/repo</source>"));
        }
    }

    mod idempotence_tests {
        use super::*;

        #[test]
        fn test_second_pass_is_a_noop() {
            let ctx = windows_context();
            let first = rewrite_paths(WINDOWS_REPORT, &ctx);
            let second = rewrite_paths(&first.text, &ctx);

            assert_eq!(second.text, first.text);
            assert_eq!(second.binary_prefixes_stripped, 0);
            assert_eq!(second.workspace_prefixes_stripped, 0);
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_rewrote_anything() {
            let outcome = rewrite_paths(WINDOWS_REPORT, &windows_context());
            assert!(outcome.rewrote_anything());

            let untouched = rewrite_paths("<x/>", &windows_context());
            assert!(!untouched.rewrote_anything());
        }

        #[test]
        fn test_empty_repository_disables_source_rewrite() {
            let ctx = RewriteContext::new(r"C:\ws", r"C:\ws\repo\build", "")
                .with_style(PathStyle::Windows);
            let outcome = rewrite_paths(WINDOWS_REPORT, &ctx);
            assert!(!outcome.source_rewritten);
            // Binary stripping is still useful without a repository name.
            assert_eq!(outcome.binary_prefixes_stripped, 3);
        }

        #[test]
        fn test_outcome_serializes() {
            let outcome = rewrite_paths(WINDOWS_REPORT, &windows_context());
            let json = serde_json::to_string(&outcome).unwrap();
            assert!(json.contains("source_rewritten"));
        }
    }
}
