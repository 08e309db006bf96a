// crates/session-gate-cli/src/main.rs
// ============================================================================
// Module: Session Gate CLI Entry Point
// Description: Command dispatcher for serving and inspecting the session gate.
// Purpose: Provide a localized CLI for the demo server and config checks.
// Dependencies: clap, session-gate-config, session-gate-http, tokio, tracing-subscriber.
// ============================================================================

//! ## Overview
//! The session gate CLI runs the demo HTTP server, validates configuration
//! files, and reports how the configured gate treats a given action. All
//! user-facing strings are routed through the i18n catalog; diagnostics go to
//! stderr through `tracing`.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use session_gate_cli::i18n::Locale;
use session_gate_cli::i18n::set_locale;
use session_gate_cli::t;
use session_gate_config::SessionGateConfig;
use session_gate_config::SessionStoreType;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "SESSION_GATE_LANG";
/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "session_gate=info";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "session-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `SESSION_GATE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the demo application behind the session gate.
    Serve(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Report how the configured gate treats an action.
    Check(CheckCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a session gate configuration file.
    Validate(ConfigArgs),
}

/// Config path selection shared by commands.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Config file path (defaults to `SESSION_GATE_CONFIG` or session-gate.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Action identifier to test against the whitelist and blacklist.
    #[arg(long, value_name = "NAME")]
    action: String,
    /// Config path selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Simplified Chinese.
    Zh,
}

/// Converts CLI language selections into locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::EnUs,
            LangArg::Zh => Self::ZhCn,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::EnUs {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    init_tracing();
    match command {
        Commands::Serve(args) => command_serve(&args).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Check(command) => command_check(&command),
    }
}

/// Installs the stderr `tracing` subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    write_stderr_line(&t!("serve.starting", bind = config.server.bind))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    session_gate_http::serve(&config)
        .await
        .map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(&args),
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&config_summary(&config))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders a one-line summary of a validated config.
fn config_summary(config: &SessionGateConfig) -> String {
    let enabled = if config.gate.enabled { t!("config.enabled") } else { t!("config.disabled") };
    let store = match config.session_store.store_type {
        SessionStoreType::Memory => "memory",
        SessionStoreType::File => "file",
    };
    t!(
        "config.validate.summary",
        enabled = enabled,
        auth_key = config.gate.auth_key,
        whitelist = config.gate.actions.whitelist.len(),
        blacklist = config.gate.actions.blacklist.len(),
        store = store,
    )
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    for line in check_report(&config, &command.action)? {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Describes how the configured gate treats `action`.
fn check_report(config: &SessionGateConfig, action: &str) -> CliResult<Vec<String>> {
    let settings = config
        .gate_settings()
        .map_err(|err| CliError::new(t!("check.settings_failed", error = err)))?;
    let mut lines = Vec::new();
    if settings.auth_key.is_usable() {
        lines.push(t!(
            "check.auth_key",
            session = settings.auth_key.session_name(),
            key = settings.auth_key.session_key(),
        ));
    } else {
        lines.push(t!("check.auth_key_unset"));
    }
    if !settings.enabled {
        lines.push(t!("check.disabled"));
    }
    if settings.matcher.matches(action) {
        lines.push(t!("check.gated", action = action));
    } else {
        lines.push(t!("check.not_gated", action = action));
    }
    Ok(lines)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates config for a command.
fn load_config(args: &ConfigArgs) -> CliResult<SessionGateConfig> {
    SessionGateConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::EnUs)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
