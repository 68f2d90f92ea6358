// crates/dojo-cli/src/main.rs
// ============================================================================
// Module: Dojo CLI Entry Point
// Description: Command dispatcher for training runs and page inspection.
// Purpose: Drive the trainer client from the command line with typed errors.
// Dependencies: clap, dojo-client, dojo-page, dojo-types, env_logger, log, serde_json
// ============================================================================

//! ## Overview
//! The dojo CLI starts training projects, runs code against the runner, and
//! renders the resulting output tree. It also asks the trainer queue for the
//! next challenge (`suggest`), inspects saved trainer pages (`routes`), and
//! validates the TOML configuration (`config validate`). Errors go to stderr
//! with a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;
#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dojo_client::Client;
use dojo_client::Session;
use dojo_client::SuggestStrategy;
use dojo_client::SuggestedChallenge;
use dojo_client::TestResult;
use dojo_client::result::Output;
use dojo_page::PageBootstrap;
use dojo_types::ChallengeId;
use dojo_types::KnownLang;
use thiserror::Error;

use crate::config::DojoConfig;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dojo", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a training project and run code against the runner.
    Train(TrainCommand),
    /// Ask the trainer queue for the next challenge to train on.
    Suggest(SuggestCommand),
    /// Extract the route table from a saved trainer page.
    Routes(RoutesCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `train` command.
#[derive(Args, Debug)]
struct TrainCommand {
    /// Challenge identifier (24 hexadecimal characters).
    challenge: String,
    /// Training language.
    #[arg(long, default_value = "rust")]
    lang: String,
    /// Path to the solution code file.
    #[arg(long, value_name = "FILE")]
    code: PathBuf,
    /// Path to a test fixture file; the session's example fixture when absent.
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,
    /// Attempt against the hidden fixture and finalize on success.
    #[arg(long, action = ArgAction::SetTrue)]
    submit: bool,
    /// Configuration file path.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Arguments for the `suggest` command.
#[derive(Args, Debug)]
struct SuggestCommand {
    /// Training language.
    #[arg(long, default_value = "rust")]
    lang: String,
    /// Queue strategy to peek.
    #[arg(long, value_enum, default_value_t = StrategyArg::RankUp)]
    strategy: StrategyArg,
    /// Remove the suggestion from the queue instead of peeking.
    #[arg(long, action = ArgAction::SetTrue)]
    dequeue: bool,
    /// Configuration file path.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Queue strategies selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// Fundamentals practice queue.
    Fundamental,
    /// Rank-up queue, the trainer default.
    RankUp,
    /// Retraining queue of previously solved challenges.
    Practice,
    /// Beta challenges awaiting approval.
    Beta,
    /// Random pick.
    Random,
}

impl From<StrategyArg> for SuggestStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Fundamental => Self::Fundamental,
            StrategyArg::RankUp => Self::RankUp,
            StrategyArg::Practice => Self::Practice,
            StrategyArg::Beta => Self::Beta,
            StrategyArg::Random => Self::Random,
        }
    }
}

/// Arguments for the `routes` command.
#[derive(Args, Debug)]
struct RoutesCommand {
    /// Path to a saved trainer page.
    #[arg(long, value_name = "FILE")]
    page: PathBuf,
}

/// Supported config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate {
        /// Configuration file path.
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("dojo {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Train(command) => command_train(&command),
        Commands::Suggest(command) => command_suggest(&command),
        Commands::Routes(command) => command_routes(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Train Command
// ============================================================================

/// Executes the `train` command.
fn command_train(command: &TrainCommand) -> CliResult<ExitCode> {
    let challenge = ChallengeId::from_str(&command.challenge)
        .map_err(|err| CliError::new(format!("invalid challenge id: {err}")))?;
    let lang = KnownLang::from_str(&command.lang)
        .map_err(|err| CliError::new(format!("invalid language: {err}")))?;
    let config = DojoConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let client = Client::new(&config.http, config.credentials)
        .map_err(|err| CliError::new(format!("failed to build client: {err}")))?;

    let code = read_input(&command.code)?;
    log::info!("starting project for challenge {challenge} in {lang}");
    let project = client
        .start_project(&challenge, lang)
        .map_err(|err| CliError::new(format!("failed to start project: {err}")))?;
    let info = client
        .start_session(&project)
        .map_err(|err| CliError::new(format!("failed to open session: {err}")))?;
    let session = Session::from_project(&client, &project, &info);

    let fixture = match &command.fixture {
        Some(path) => read_input(path)?,
        None => info.example_fixture.clone(),
    };
    let result = if command.submit {
        let result = session
            .attempt(&code, &fixture)
            .map_err(|err| CliError::new(format!("attempt failed: {err}")))?;
        if run_passed(&result) {
            session
                .submit()
                .map_err(|err| CliError::new(format!("finalize failed: {err}")))?;
            write_stdout_line("solution finalized")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        result
    } else {
        session
            .test(&code, &fixture)
            .map_err(|err| CliError::new(format!("test run failed: {err}")))?
    };

    render_result(&result)?;
    Ok(if run_passed(&result) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Reads an input file as UTF-8 text.
fn read_input(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", path.display())))
}

/// Reports whether a run completed with no failures or errors.
fn run_passed(result: &TestResult) -> bool {
    result.result.completed
        && !result.result.server_error
        && result.result.failed == 0
        && result.result.errors == 0
}

/// Renders a run result to stdout.
fn render_result(result: &TestResult) -> CliResult<()> {
    for node in &result.result.output {
        render_output(node, 0)?;
    }
    if let Some(stdout) = &result.stdout {
        write_stdout_line(stdout).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    if let Some(stderr) = &result.stderr {
        let _ = write_stderr_line(stderr);
    }
    let summary = format!(
        "passed: {} failed: {} errors: {} ({} ms)",
        result.result.passed, result.result.failed, result.result.errors, result.result.wall_time
    );
    write_stdout_line(&summary).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Renders one output node with indentation.
fn render_output(node: &Output, depth: usize) -> CliResult<()> {
    let indent = "  ".repeat(depth);
    let line = match node {
        Output::Describe {
            pass,
            v,
            items,
        }
        | Output::It {
            pass,
            v,
            items,
        } => {
            let marker = if *pass {
                "+"
            } else {
                "-"
            };
            write_stdout_line(&format!("{indent}{marker} {v}"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            for item in items {
                render_output(item, depth + 1)?;
            }
            return Ok(());
        }
        Output::Passed {
            v,
        } => format!("{indent}PASSED {v}"),
        Output::Failed {
            v,
        } => format!("{indent}FAILED {v}"),
        Output::Log {
            v,
        } => format!("{indent}{v}"),
        Output::Error {
            v,
        } => format!("{indent}ERROR {v}"),
        Output::CompletedIn {
            v,
        } => format!("{indent}completed in {v} ms"),
    };
    write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Suggest Command
// ============================================================================

/// Executes the `suggest` command.
fn command_suggest(command: &SuggestCommand) -> CliResult<ExitCode> {
    let lang = KnownLang::from_str(&command.lang)
        .map_err(|err| CliError::new(format!("invalid language: {err}")))?;
    let config = DojoConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let client = Client::new(&config.http, config.credentials)
        .map_err(|err| CliError::new(format!("failed to build client: {err}")))?;
    let suggested = client
        .suggest_challenge(lang, command.strategy.into(), command.dequeue)
        .map_err(|err| CliError::new(format!("suggestion failed: {err}")))?;
    render_suggestion(&suggested)?;
    Ok(ExitCode::SUCCESS)
}

/// Renders a suggested challenge to stdout.
fn render_suggestion(suggested: &SuggestedChallenge) -> CliResult<()> {
    let mut lines = vec![
        format!("name: {}", suggested.name),
        format!("id: {}", suggested.id),
        format!("url: {}", suggested.href),
    ];
    if let Some(rank) = suggested.rank {
        lines.push(format!("rank: {rank}"));
    }
    if !suggested.system_tags.is_empty() {
        lines.push(format!("tags: {}", suggested.system_tags.join(", ")));
    }
    for line in &lines {
        write_stdout_line(line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Routes Command
// ============================================================================

/// Executes the `routes` command.
fn command_routes(command: &RoutesCommand) -> CliResult<ExitCode> {
    let page = read_input(&command.page)?;
    let bootstrap = PageBootstrap::from_page(&page)
        .map_err(|err| CliError::new(format!("failed to extract bootstrap: {err}")))?;
    let rendered = serde_json::to_string_pretty(&bootstrap.routes)
        .map_err(|err| CliError::new(format!("failed to render routes: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate {
            path,
        } => command_config_validate(path.as_deref()),
    }
}

/// Executes the `config validate` command.
fn command_config_validate(path: Option<&Path>) -> CliResult<ExitCode> {
    DojoConfig::load(path).map_err(|err| CliError::new(format!("invalid config: {err}")))?;
    write_stdout_line("configuration is valid")
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
