//! Result forwarding to the external services
//!
//! Coverage goes to two services: the codecov bash uploader and the codacy
//! reporter script. Analysis issues go to the codacy commit API. All
//! transfers run through `bash`/`curl` subprocesses from the repository
//! checkout; tokens travel only inside the spawned command lines and are
//! never echoed to the job log.

use crate::error::{CliError, CliResult};
use std::path::Path;
use std::process::Command;

const CODACY_API: &str = "https://api.codacy.com/2.0/commit";

/// Shell command invoking the codecov bash uploader on `coverage_dir`.
#[must_use]
pub fn codecov_command(coverage_dir: &str) -> String {
    format!("bash <(curl -sS https://codecov.io/bash) -Z -s {coverage_dir} -f '*.xml'")
}

/// Shell command invoking the codacy reporter script on `reports_glob`.
///
/// The language argument is required - without it the service does not
/// detect the coverage.
#[must_use]
pub fn codacy_coverage_command(script: &str, reports_glob: &str, token: &str, commit: &str) -> String {
    format!("./{script} report -r '{reports_glob}' -l CPP -t {token} --commit-uuid {commit}")
}

/// URL receiving converted analysis issues for `commit`.
#[must_use]
pub fn issues_url(commit: &str) -> String {
    format!("{CODACY_API}/{commit}/issuesRemoteResults")
}

/// URL marking the analysis results for `commit` complete.
#[must_use]
pub fn results_final_url(commit: &str) -> String {
    format!("{CODACY_API}/{commit}/resultsFinal")
}

fn run_shell(command: &str, cwd: &Path, what: &str) -> CliResult<()> {
    let status = Command::new("bash")
        .args(["-c", command])
        .current_dir(cwd)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::upload(format!("{what} exited with {status}")))
    }
}

/// Upload the reports under `coverage_dir` to codecov, running from the
/// repository checkout.
pub fn send_codecov(coverage_dir: &str, checkout: &Path) -> CliResult<()> {
    run_shell(&codecov_command(coverage_dir), checkout, "codecov uploader")
}

/// Upload the reports matching `reports_glob` to codacy via the previously
/// fetched reporter script.
pub fn send_codacy_coverage(
    script: &str,
    reports_glob: &str,
    token: &str,
    commit: &str,
    checkout: &Path,
) -> CliResult<()> {
    run_shell(
        &codacy_coverage_command(script, reports_glob, token, commit),
        checkout,
        "codacy reporter",
    )
}

/// POST the converted analysis issues file for `commit`.
pub fn post_analysis_issues(
    token: &str,
    commit: &str,
    issues_file: &Path,
    checkout: &Path,
) -> CliResult<()> {
    let status = Command::new("curl")
        .args(["-s", "-S", "-X", "POST", "-L"])
        .arg("-H")
        .arg(format!("project-token: {token}"))
        .args(["-H", "Content-type: application/json"])
        .args(["-w", "\\n"])
        .arg("-d")
        .arg(format!("@{}", issues_file.display()))
        .arg(issues_url(commit))
        .current_dir(checkout)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::upload(format!("posting issues exited with {status}")))
    }
}

/// Mark the analysis results for `commit` complete.
pub fn finalize_analysis(token: &str, commit: &str, checkout: &Path) -> CliResult<()> {
    let status = Command::new("curl")
        .args(["-s", "-S", "-X", "POST", "-L"])
        .arg("-H")
        .arg(format!("project-token: {token}"))
        .args(["-H", "Content-type: application/json"])
        .args(["-w", "\\n"])
        .arg(results_final_url(commit))
        .current_dir(checkout)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::upload(format!("finalizing results exited with {status}")))
    }
}
