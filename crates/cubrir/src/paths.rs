//! Path-convention helpers
//!
//! The CI job and the reporting services disagree about path separators: the
//! coverage tool emits whatever the host uses, while the services expect
//! forward slashes. These helpers keep the conversion in one place and let
//! the rewriter be explicit about which convention it is matching against.

use serde::{Deserialize, Serialize};

/// Path separator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    /// Forward-slash separators.
    Posix,
    /// Backslash separators.
    Windows,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

impl PathStyle {
    /// Convention of the host platform.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// The separator character for this convention.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    /// Join path fragments with this convention's separator.
    ///
    /// Empty fragments are skipped; separators already present at the joint
    /// are not doubled.
    #[must_use]
    pub fn join(self, parts: &[&str]) -> String {
        let sep = self.separator();
        let mut out = String::new();
        for part in parts.iter().filter(|p| !p.is_empty()) {
            if out.is_empty() {
                out.push_str(part.trim_end_matches(['/', '\\']));
            } else {
                out.push(sep);
                out.push_str(part.trim_matches(['/', '\\']));
            }
        }
        out
    }

    /// `path` with exactly one trailing separator in this convention.
    #[must_use]
    pub fn with_trailing_separator(self, path: &str) -> String {
        let mut out = path.trim_end_matches(['/', '\\']).to_string();
        out.push(self.separator());
        out
    }
}

/// Convert all separators to forward slashes, collapsing repeats.
#[must_use]
pub fn force_posix(path: &str) -> String {
    convert_separators(path, '/')
}

/// Convert all separators to backslashes, collapsing repeats.
#[must_use]
pub fn force_windows(path: &str) -> String {
    convert_separators(path, '\\')
}

/// Convert all separators to the host platform's convention.
#[must_use]
pub fn force_native(path: &str) -> String {
    convert_separators(path, PathStyle::native().separator())
}

fn convert_separators(path: &str, sep: char) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = false;
    for c in path.chars() {
        if c == '/' || c == '\\' {
            if !last_was_sep {
                out.push(sep);
            }
            last_was_sep = true;
        } else {
            out.push(c);
            last_was_sep = false;
        }
    }
    out
}

/// Repository name from an `owner/name` slug: the text after the first `/`.
/// A slug without a `/` is returned unchanged.
#[must_use]
pub fn repository_name(slug: &str) -> &str {
    slug.find('/').map_or(slug, |i| &slug[i + 1..])
}

/// Lexical relative path from `base` to `target`, in the given convention.
///
/// Both inputs may use either separator kind. The computation is purely
/// textual: components are compared exactly, with no filesystem access and
/// no case folding. Identical paths yield an empty string.
#[must_use]
pub fn relative_from(base: &str, target: &str, style: PathStyle) -> String {
    let base_parts: Vec<&str> = components(base);
    let target_parts: Vec<&str> = components(target);

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(b, t)| b == t)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..");
    }
    parts.extend(&target_parts[common..]);
    style.join(&parts)
}

fn components(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|c| !c.is_empty()).collect()
}
