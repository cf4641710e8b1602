//! Analyze command handler
//!
//! Gathers clang-tidy log output from the build directory, converts it to
//! the quality service's issue format via the converter jar, and posts the
//! result against the commit.

use crate::commands::AnalyzeArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::handlers::absolutize;
use crate::output::ProgressReporter;
use crate::tools::{self, DirCache};
use crate::upload;
use cubrir::repository_name;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Execute the analyze command
pub fn execute_analyze(config: &CliConfig, args: &AnalyzeArgs) -> CliResult<()> {
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let temp_dir = PathBuf::from(&config.temp_dir);
    let cache = DirCache::new(temp_dir.join("cache"));

    let jar =
        tools::setup_converter_jar(&mut reporter, &cache, &temp_dir, args.github_token.as_deref())?;

    let repository = repository_name(&args.repository).to_string();
    let checkout = args.workspace.join(&repository);

    reporter.group("Sending code analysis to codacy");
    let logs = collect_logs(&args.binary_dir)?;
    if logs.is_empty() {
        reporter.warning(&format!(
            "No clang-tidy logs found in {}",
            args.binary_dir.display()
        ));
        return Ok(());
    }
    if config.verbosity.is_verbose() {
        for log in &logs {
            reporter.info(&format!("Converting {}", log.display()));
        }
    }

    let combined = concatenate(&logs)?;
    let converted = run_converter(&jar, &combined)?;
    let issues = normalize_converter_output(&converted);

    // The POST runs from the checkout, so the issues file must not be left
    // relative to the job's working directory.
    let issues_file = absolutize(&temp_dir.join("clang-tidy.json"))?;
    fs::write(&issues_file, issues)?;

    upload::post_analysis_issues(&args.codacy_token, &args.commit, &issues_file, &checkout)?;
    upload::finalize_analysis(&args.codacy_token, &args.commit, &checkout)?;
    reporter.success(&format!("Forwarded {} log file(s)", logs.len()));

    Ok(())
}

/// The clang-tidy logs directly inside `binary_dir`, sorted by name.
/// Nested directories are not searched.
fn collect_logs(binary_dir: &Path) -> CliResult<Vec<PathBuf>> {
    let pattern = format!("{}/clang-tidy-*.log", binary_dir.display());
    let paths = glob::glob(&pattern)
        .map_err(|e| CliError::analysis(format!("invalid log pattern: {e}")))?;
    let mut logs: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
    logs.sort();
    Ok(logs)
}

fn concatenate(logs: &[PathBuf]) -> CliResult<String> {
    let mut combined = String::new();
    for log in logs {
        combined.push_str(&fs::read_to_string(log)?);
    }
    Ok(combined)
}

/// Feed the combined logs through the converter jar on stdin, capturing the
/// converted issues from stdout.
fn run_converter(jar: &Path, input: &str) -> CliResult<String> {
    let mut child = Command::new("java")
        .arg("-jar")
        .arg(jar)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(CliError::analysis(format!(
            "converter exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Collapse doubled backslashes in the converted issues to forward slashes
/// so the service receives portable paths.
fn normalize_converter_output(converted: &str) -> String {
    converted.replace("\\\\", "/")
}
