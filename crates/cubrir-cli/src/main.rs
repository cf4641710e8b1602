//! Cubridor: forward coverage and analysis results from CI jobs
//!
//! ## Usage
//!
//! ```bash
//! cubridor coverage --command "test.exe" --source-dir source --binary-dir build
//! cubridor analyze --binary-dir build
//! ```

use clap::Parser;
use cubridor::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);

    match cli.command {
        Commands::Coverage(args) => handlers::coverage::execute_coverage(&config, &args),
        Commands::Analyze(args) => handlers::analyze::execute_analyze(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_temp_dir(cli.temp_dir.to_string_lossy())
}
