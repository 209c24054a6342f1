#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use officiate_core::ErrorCode;
use officiate_core::config::{ProjectConfig, load_project_config};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ofc: referee staffing feasibility via maximum flow",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Check whether a problem can be fully staffed",
        long_about = "Load a problem file (.json or .toml), validate it, and decide whether every \
                      match can be covered by certified referees within their daily hours.\n\n\
                      Exit status: 0 feasible, 2 infeasible, 1 on error.",
        after_help = "EXAMPLES:\n    # Check a problem file\n    ofc check tournament.json\n\n    # Emit machine-readable output\n    ofc check tournament.toml --format json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "Generate a synthetic problem",
        long_about = "Generate a seeded synthetic problem and write it as JSON.",
        after_help = "EXAMPLES:\n    # Print a problem to stdout\n    ofc generate --matches 40 --referees 13\n\n    # Write to a file with a fixed seed\n    ofc generate --matches 40 --referees 13 --days 3 --seed 7 -o problem.json"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        about = "Run the feasibility sweep",
        long_about = "Evaluate generated problems of growing size and write one CSV row per run. \
                      Defaults come from the [experiment] section of officiate.toml.",
        after_help = "EXAMPLES:\n    # Run the default sweep\n    ofc experiment\n\n    # Fix the seed and write elsewhere\n    ofc experiment --seed 3 --output sweep.csv"
    )]
    Experiment(cmd::experiment::ExperimentArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("OFFICIATE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "officiate=debug,info"
        } else {
            "officiate=info,warn"
        })
    });

    let format = env::var("OFFICIATE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // Logs go to stderr so stdout stays parseable.
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = match env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: cannot read working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (config, config_error) = match load_project_config(&project_root) {
        Ok(config) => (config, None),
        Err(err) => (ProjectConfig::default(), Some(err)),
    };
    let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());

    if let Some(err) = config_error {
        report_error(
            output,
            &CliError::coded(format!("{err:#}"), ErrorCode::ConfigParseError),
        );
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Check(ref args) => cmd::check::run_check(args, output, &project_root),
        Commands::Generate(ref args) => {
            cmd::generate::run_generate(args, output, &project_root).map(|()| ExitCode::SUCCESS)
        }
        Commands::Experiment(ref args) => cmd::experiment::run_experiment_cmd(
            args,
            &config.experiment,
            output,
            &project_root,
        )
        .map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            report_error(output, &CliError::new(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

fn report_error(output: OutputMode, error: &CliError) {
    if render_error(output, error).is_err() {
        eprintln!("error: {}", error.message);
    }
}
