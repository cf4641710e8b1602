//! CLI command definitions using clap

use crate::config::ColorChoice;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cubridor: run tests under coverage instrumentation and forward the
/// results to external quality services
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Directory for working files (downloads, caches, reports)
    #[arg(long, default_value = ".cubrir", global = true)]
    pub temp_dir: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a test command under coverage instrumentation and upload the
    /// rewritten Cobertura report
    Coverage(CoverageArgs),

    /// Forward clang-tidy log output to the quality service
    Analyze(AnalyzeArgs),
}

/// Color output choice on the command line
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Arguments for the coverage command
#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Test command to run under instrumentation (shell-like quoting)
    #[arg(long)]
    pub command: String,

    /// Directory holding the sources to report coverage for
    #[arg(long)]
    pub source_dir: PathBuf,

    /// Build directory the test command runs in
    #[arg(long)]
    pub binary_dir: PathBuf,

    /// Repository slug (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Workspace root the repository is checked out under
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: PathBuf,

    /// Commit id reported alongside the coverage
    #[arg(long, env = "GITHUB_SHA")]
    pub commit: String,

    /// API token used to query tool releases
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Quality service project token
    #[arg(long, env = "CODACY_PROJECT_TOKEN", hide_env_values = true)]
    pub codacy_token: String,

    /// Produce the rewritten report but skip all uploads
    #[arg(long)]
    pub no_upload: bool,
}

/// Arguments for the analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Build directory holding the clang-tidy-*.log files
    #[arg(long)]
    pub binary_dir: PathBuf,

    /// Repository slug (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Workspace root the repository is checked out under
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: PathBuf,

    /// Commit id the issues are reported against
    #[arg(long, env = "GITHUB_SHA")]
    pub commit: String,

    /// API token used to query tool releases
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Quality service project token
    #[arg(long, env = "CODACY_PROJECT_TOKEN", hide_env_values = true)]
    pub codacy_token: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_coverage_args_parse() {
        let cli = Cli::parse_from([
            "cubridor",
            "coverage",
            "--command",
            "test.exe --fast",
            "--source-dir",
            "source",
            "--binary-dir",
            "build",
            "--repository",
            "owner/repo",
            "--workspace",
            "/ws",
            "--commit",
            "abc123",
            "--codacy-token",
            "secret",
        ]);
        match cli.command {
            Commands::Coverage(args) => {
                assert_eq!(args.command, "test.exe --fast");
                assert_eq!(args.repository, "owner/repo");
                assert!(!args.no_upload);
            }
            Commands::Analyze(_) => panic!("expected coverage subcommand"),
        }
    }

    #[test]
    fn test_analyze_args_parse() {
        let cli = Cli::parse_from([
            "cubridor",
            "analyze",
            "--binary-dir",
            "build",
            "--repository",
            "owner/repo",
            "--workspace",
            "/ws",
            "--commit",
            "abc123",
            "--codacy-token",
            "secret",
        ]);
        match cli.command {
            Commands::Analyze(args) => assert_eq!(args.repository, "owner/repo"),
            Commands::Coverage(_) => panic!("expected analyze subcommand"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "cubridor",
            "-vv",
            "--color",
            "never",
            "analyze",
            "--binary-dir",
            "build",
            "--repository",
            "o/r",
            "--workspace",
            "/ws",
            "--commit",
            "c",
            "--codacy-token",
            "t",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorArg::Never));
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
    }
}
