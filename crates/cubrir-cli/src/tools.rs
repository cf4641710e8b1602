//! External tool acquisition
//!
//! The coverage tool and the analysis converter are fetched from their
//! GitHub releases and kept in an artifact cache keyed by release asset id,
//! so repeat jobs skip the download. Transfers go through a `curl`
//! subprocess; cache failures degrade to warnings and never abort the job.

use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Key-value artifact cache for tool directories.
///
/// The contract mirrors a CI cache service: `restore` materializes a
/// previously saved directory under `dest` and reports whether it did,
/// `save` stores `src` under `key`. Both are best-effort.
pub trait ToolCache {
    /// Restore the entry for `key` into `dest`. Returns `false` on a miss
    /// or on any error.
    fn restore(&self, dest: &Path, key: &str) -> bool;

    /// Save `src` under `key`. Returns `false` on any error.
    fn save(&self, src: &Path, key: &str) -> bool;
}

/// Directory-backed [`ToolCache`].
#[derive(Debug, Clone)]
pub struct DirCache {
    root: PathBuf,
}

impl DirCache {
    /// Create a cache rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ToolCache for DirCache {
    fn restore(&self, dest: &Path, key: &str) -> bool {
        let entry = self.root.join(key);
        entry.is_dir() && copy_dir_all(&entry, dest).is_ok()
    }

    fn save(&self, src: &Path, key: &str) -> bool {
        copy_dir_all(src, &self.root.join(key)).is_ok()
    }
}

/// [`ToolCache`] that never hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ToolCache for NoCache {
    fn restore(&self, _dest: &Path, _key: &str) -> bool {
        false
    }

    fn save(&self, _src: &Path, _key: &str) -> bool {
        false
    }
}

fn copy_dir_all(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// One downloadable asset of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Asset id, stable per upload - used as the cache key component.
    pub id: u64,
    /// File name of the asset.
    pub name: String,
    /// Direct download URL.
    pub download_url: String,
    /// Human-readable release name.
    pub release: String,
}

#[derive(Deserialize)]
struct Release {
    name: Option<String>,
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize)]
struct Asset {
    id: u64,
    name: String,
    browser_download_url: String,
}

/// Pick the first matching asset out of a release API response.
pub(crate) fn select_asset(
    release_json: &str,
    matches: impl Fn(&str) -> bool,
) -> Option<ReleaseAsset> {
    let release: Release = serde_json::from_str(release_json).ok()?;
    let label = release
        .name
        .or(release.tag_name)
        .unwrap_or_else(|| "unknown release".to_string());
    release
        .assets
        .into_iter()
        .find(|a| matches(&a.name))
        .map(|a| ReleaseAsset {
            id: a.id,
            name: a.name,
            download_url: a.browser_download_url,
            release: label,
        })
}

/// Query the latest release of `owner/repo` and pick an asset by name.
pub fn latest_release_asset(
    owner: &str,
    repo: &str,
    token: Option<&str>,
    matches: impl Fn(&str) -> bool,
) -> CliResult<ReleaseAsset> {
    let url = format!("https://api.github.com/repos/{owner}/{repo}/releases/latest");
    let mut cmd = Command::new("curl");
    cmd.args(["-s", "-S", "-L"]);
    if let Some(token) = token {
        cmd.arg("-H").arg(format!("authorization: Bearer {token}"));
    }
    cmd.arg(&url);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(CliError::tool_setup(format!(
            "querying latest release of {owner}/{repo} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let body = String::from_utf8_lossy(&output.stdout);
    select_asset(&body, matches).ok_or_else(|| {
        CliError::tool_setup(format!("no matching asset in latest release of {owner}/{repo}"))
    })
}

/// Download `url` to `dest`, creating parent directories.
pub fn download(url: &str, dest: &Path) -> CliResult<()> {
    let status = Command::new("curl")
        .args(["-s", "-S", "-L", "-o"])
        .arg(dest)
        .arg("--create-dirs")
        .arg(url)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::tool_setup(format!("downloading {url} failed ({status})")))
    }
}

fn run_unpacker(program: &Path, args: &[&str]) -> CliResult<()> {
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::tool_setup(format!(
            "{} exited with {status}",
            program.display()
        )))
    }
}

/// Asset filter for the coverage instrumentation tool installer.
pub fn is_coverage_tool_asset(name: &str) -> bool {
    name.contains("-x64-") && name.ends_with(".exe")
}

/// Asset filter for the installer unpacker.
pub fn is_unpacker_asset(name: &str) -> bool {
    name.ends_with("-windows.zip")
}

/// Asset filter for the analysis converter.
pub fn is_converter_asset(name: &str) -> bool {
    name.ends_with(".jar")
}

/// Install the coverage instrumentation tool under `temp_dir`, reusing the
/// cache when the latest release is already there. Returns the path of the
/// tool executable.
///
/// The release ships as an installer, so a cache miss also fetches the
/// unpacker and extracts the installer instead of running it.
pub fn setup_coverage_tool(
    reporter: &mut ProgressReporter,
    cache: &dyn ToolCache,
    temp_dir: &Path,
    github_token: Option<&str>,
) -> CliResult<PathBuf> {
    let tool_dir = temp_dir.join("OpenCppCoverage");

    reporter.group("Installing OpenCppCoverage");
    let asset = latest_release_asset(
        "OpenCppCoverage",
        "OpenCppCoverage",
        github_token,
        is_coverage_tool_asset,
    )?;
    let key = format!("opencppcoverage-{}", asset.id);

    if cache.restore(&tool_dir, &key) {
        reporter.info(&format!("Found {} in {}", asset.release, tool_dir.display()));
    } else {
        let unpacker = latest_release_asset(
            "dscharrer",
            "innoextract",
            github_token,
            is_unpacker_asset,
        )?;
        reporter.start_step(&format!("Downloading {}", unpacker.release));
        let unpacker_archive = temp_dir.join(&unpacker.name);
        download(&unpacker.download_url, &unpacker_archive)?;
        reporter.finish_step();

        let temp = temp_dir.to_string_lossy();
        run_unpacker(
            Path::new("7z"),
            &[
                "x",
                "-aos",
                &format!("-o{temp}"),
                &unpacker_archive.to_string_lossy(),
                "innoextract.exe",
            ],
        )?;

        reporter.start_step(&format!("Downloading {}", asset.release));
        let installer = temp_dir.join(&asset.name);
        download(&asset.download_url, &installer)?;
        reporter.finish_step();

        run_unpacker(
            &temp_dir.join("innoextract"),
            &[
                "-e",
                "-m",
                "--output-dir",
                &tool_dir.to_string_lossy(),
                &installer.to_string_lossy(),
            ],
        )?;

        if !cache.save(&tool_dir, &key) {
            reporter.warning(&format!("Failed to cache {}", tool_dir.display()));
        }
        reporter.info(&format!("Installed {} at {}", asset.release, tool_dir.display()));
    }

    Ok(tool_dir.join("app").join("OpenCppCoverage.exe"))
}

/// Install the analysis converter jar under `temp_dir`, reusing the cache
/// when the latest release is already there. Returns the jar path.
pub fn setup_converter_jar(
    reporter: &mut ProgressReporter,
    cache: &dyn ToolCache,
    temp_dir: &Path,
    github_token: Option<&str>,
) -> CliResult<PathBuf> {
    let tool_dir = temp_dir.join("codacy-clang-tidy");

    reporter.group("Installing codacy-clang-tidy");
    let asset = latest_release_asset("codacy", "codacy-clang-tidy", github_token, is_converter_asset)?;
    let key = format!("codacy-clang-tidy-{}", asset.id);
    let jar = tool_dir.join(&asset.name);

    if cache.restore(&tool_dir, &key) {
        reporter.info(&format!(
            "Found codacy-clang-tidy {} in cache at {}",
            asset.release,
            tool_dir.display()
        ));
    } else {
        reporter.start_step(&format!("Downloading codacy-clang-tidy {}", asset.release));
        download(&asset.download_url, &jar)?;
        reporter.finish_step();

        if !cache.save(&tool_dir, &key) {
            reporter.warning(&format!("Failed to cache {}", tool_dir.display()));
        }
    }

    Ok(jar)
}

/// Hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
