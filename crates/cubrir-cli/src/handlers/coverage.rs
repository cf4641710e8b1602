//! Coverage command handler
//!
//! Runs the configured test command under the coverage instrumentation
//! tool, rewrites the emitted Cobertura report so its paths are portable,
//! and forwards the result to the two coverage services.

use crate::commands::CoverageArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::handlers::absolutize;
use crate::output::ProgressReporter;
use crate::tools::{self, sha256_hex, DirCache, ToolCache};
use crate::upload;
use cubrir::{
    force_native, force_posix, repository_name, rewrite_paths, tokenize, CoverageInvocation,
    RewriteContext,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const CODACY_SCRIPT: &str = ".codacy-coverage.sh";
const CODACY_SCRIPT_URL: &str = "https://coverage.codacy.com/get.sh";

/// Execute the coverage command
pub fn execute_coverage(config: &CliConfig, args: &CoverageArgs) -> CliResult<()> {
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let temp_dir = PathBuf::from(&config.temp_dir);
    let cache = DirCache::new(temp_dir.join("cache"));

    let repository = repository_name(&args.repository).to_string();
    let checkout = args.workspace.join(&repository);
    let upload_results = config.upload && !args.no_upload;

    let tool =
        tools::setup_coverage_tool(&mut reporter, &cache, &temp_dir, args.github_token.as_deref())?;

    let codacy = if upload_results {
        Some(prepare_codacy_reporter(&mut reporter, &cache, &checkout)?)
    } else {
        None
    };

    let coverage_dir = temp_dir.join("coverage");
    fs::create_dir_all(&coverage_dir)?;
    let report_file = coverage_dir.join(format!("{repository}.xml"));

    reporter.group(&format!("Getting code coverage for {repository}"));
    let invocation = build_invocation(args, &report_file)?;
    run_instrumented(&tool, &invocation)?;

    rewrite_report(&mut reporter, config, args, &repository, &report_file, &coverage_dir)?;

    if let Some(codacy) = codacy {
        send_results(&mut reporter, &cache, &codacy, &coverage_dir, args, &checkout)?;
    }

    Ok(())
}

/// State of the fetched codacy reporter script.
struct CodacyReporter {
    cache_key: String,
    cache_hit: bool,
}

/// Fetch the codacy reporter script into the checkout and restore its
/// working directory from the cache, keyed by the script's digest.
fn prepare_codacy_reporter(
    reporter: &mut ProgressReporter,
    cache: &dyn ToolCache,
    checkout: &Path,
) -> CliResult<CodacyReporter> {
    reporter.group("Loading codacy coverage reporter");
    let script_path = checkout.join(CODACY_SCRIPT);
    tools::download(CODACY_SCRIPT_URL, &script_path)?;

    let script = fs::read(&script_path)?;
    let cache_key = format!("codacy-coverage-{}", sha256_hex(&script));
    let cache_hit = cache.restore(&checkout.join(".codacy-coverage"), &cache_key);
    if cache_hit {
        reporter.info(".codacy-coverage is found in cache");
    }

    Ok(CodacyReporter {
        cache_key,
        cache_hit,
    })
}

/// Build the instrumented invocation from the command-line inputs.
///
/// The export path is computed relative to the binary directory because
/// that is the tool's working directory, so both paths are resolved against
/// the current directory first.
fn build_invocation(args: &CoverageArgs, report_file: &Path) -> CliResult<CoverageInvocation> {
    let command = tokenize(&args.command);
    if command.is_empty() {
        return Err(CliError::config("the test command is empty"));
    }

    let source_dir = force_native(&absolutize(&args.source_dir)?.to_string_lossy());
    let binary_dir = force_native(&absolutize(&args.binary_dir)?.to_string_lossy());
    let report_path = force_native(&absolutize(report_file)?.to_string_lossy());

    Ok(CoverageInvocation::new(source_dir, binary_dir, report_path, command))
}

/// Run the coverage tool; a failing instrumented run fails the job.
fn run_instrumented(tool: &Path, invocation: &CoverageInvocation) -> CliResult<()> {
    let status = Command::new(tool)
        .args(invocation.to_args())
        .current_dir(&invocation.binary_dir)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::coverage(format!(
            "instrumented run exited with {status}"
        )))
    }
}

/// Summary of the rewrite pass, written next to the report.
#[derive(Debug, Serialize)]
struct RewriteSummary {
    report: String,
    source_rewritten: bool,
    binary_prefixes_stripped: usize,
    workspace_prefixes_stripped: usize,
}

/// Rewrite the report in place, keeping a pristine copy and a summary of
/// what the pass did.
fn rewrite_report(
    reporter: &mut ProgressReporter,
    config: &CliConfig,
    args: &CoverageArgs,
    repository: &str,
    report_file: &Path,
    coverage_dir: &Path,
) -> CliResult<()> {
    let data = fs::read_to_string(report_file)?;
    if config.keep_original {
        fs::write(
            coverage_dir.join(format!("{repository}-original.xml")),
            &data,
        )?;
    }

    // The report carries the paths the instrumented run saw, so the context
    // must use the same resolved form as the invocation.
    let ctx = RewriteContext::new(
        force_native(&absolutize(&args.workspace)?.to_string_lossy()),
        force_native(&absolutize(&args.binary_dir)?.to_string_lossy()),
        repository,
    );
    let outcome = rewrite_paths(&data, &ctx);

    if !outcome.source_rewritten {
        reporter.warning("No <source> element found; report paths left as emitted");
    }
    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "Stripped {} build and {} workspace path prefixes",
            outcome.binary_prefixes_stripped, outcome.workspace_prefixes_stripped
        ));
    }

    fs::write(report_file, &outcome.text)?;

    let summary = RewriteSummary {
        report: report_file.display().to_string(),
        source_rewritten: outcome.source_rewritten,
        binary_prefixes_stripped: outcome.binary_prefixes_stripped,
        workspace_prefixes_stripped: outcome.workspace_prefixes_stripped,
    };
    let summary_json = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::coverage(format!("serializing rewrite summary: {e}")))?;
    fs::write(coverage_dir.join(format!("{repository}-rewrite.json")), summary_json)?;

    Ok(())
}

/// Forward the rewritten reports to both services and save the reporter's
/// working directory to the cache if it was freshly created.
fn send_results(
    reporter: &mut ProgressReporter,
    cache: &dyn ToolCache,
    codacy: &CodacyReporter,
    coverage_dir: &Path,
    args: &CoverageArgs,
    checkout: &Path,
) -> CliResult<()> {
    // The upload commands run from the checkout, so the coverage directory
    // must not be left relative to the job's working directory.
    let coverage_dir_posix = force_posix(&absolutize(coverage_dir)?.to_string_lossy());

    reporter.group("Sending coverage to codecov");
    upload::send_codecov(&coverage_dir_posix, checkout)?;

    reporter.group("Sending coverage to codacy");
    let reports_glob = format!("{coverage_dir_posix}/*.xml");
    upload::send_codacy_coverage(
        CODACY_SCRIPT,
        &reports_glob,
        &args.codacy_token,
        &args.commit,
        checkout,
    )?;

    if !codacy.cache_hit {
        if cache.save(&checkout.join(".codacy-coverage"), &codacy.cache_key) {
            reporter.info("Added .codacy-coverage to cache");
        } else {
            reporter.warning("Failed to cache .codacy-coverage");
        }
    }

    Ok(())
}
