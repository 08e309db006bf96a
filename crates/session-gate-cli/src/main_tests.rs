// crates/session-gate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Entry Point Tests
// Description: Unit tests for argument parsing, locale resolution, and reports.
// Purpose: Ensure CLI wiring stays stable without spawning the binary.
// Dependencies: session-gate-cli main module
// ============================================================================

//! ## Overview
//! Exercises clap parsing, locale selection, and the `check` report builder.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

use super::*;

fn config(toml_str: &str) -> SessionGateConfig {
    SessionGateConfig::from_toml_bytes(toml_str.as_bytes()).expect("valid config")
}

#[test]
fn parses_check_command() {
    let cli =
        Cli::try_parse_from(["session-gate", "check", "--action", "User.Get", "--config", "a.toml"])
            .expect("parse");
    match cli.command {
        Some(Commands::Check(command)) => {
            assert_eq!(command.action, "User.Get");
            assert_eq!(command.config.config, Some(PathBuf::from("a.toml")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn parses_config_validate_and_global_lang() {
    let cli = Cli::try_parse_from(["session-gate", "config", "validate", "--lang", "zh"])
        .expect("parse");
    assert!(matches!(cli.lang, Some(LangArg::Zh)));
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommand::Validate(ConfigArgs {
                config: None
            })
        })
    ));
}

#[test]
fn check_requires_action() {
    assert!(Cli::try_parse_from(["session-gate", "check"]).is_err());
}

#[test]
fn version_flag_is_global() {
    let cli = Cli::try_parse_from(["session-gate", "--version"]).expect("parse");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn resolve_locale_prefers_flag_then_env() {
    assert_eq!(resolve_locale(Some(LangArg::Zh), Some("en")).unwrap(), Locale::ZhCn);
    assert_eq!(resolve_locale(None, Some("zh-CN")).unwrap(), Locale::ZhCn);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::EnUs);
    assert!(resolve_locale(None, Some("fr")).is_err());
}

#[test]
fn check_report_reports_gated_and_ungated_actions() {
    let config = config(
        r#"
[gate.actions]
whitelist = ["User.*"]
blacklist = ["User.Login"]
"#,
    );
    let gated = check_report(&config, "User.Get").unwrap();
    assert_eq!(gated[0], "Auth key: session default, key authed.");
    assert_eq!(gated.last().map(String::as_str), Some("Action User.Get is gated."));

    let exempt = check_report(&config, "User.Login").unwrap();
    assert_eq!(exempt.last().map(String::as_str), Some("Action User.Login is not gated."));
}

#[test]
fn check_report_flags_unset_key_and_disabled_gate() {
    let config = config("[gate]\nenabled = false\nauth_key = \"admin.\"\n");
    let lines = check_report(&config, "User.Get").unwrap();
    assert_eq!(lines[0], "Auth key is unset; every action passes.");
    assert_eq!(lines[1], "Gate starts disabled; every action passes until it is enabled.");
}

#[test]
fn config_summary_counts_patterns() {
    let config =
        config("[gate.actions]\nwhitelist = [\"A.*\", \"B.*\"]\nblacklist = [\"A.Open\"]\n");
    let summary = config_summary(&config);
    assert!(summary.contains("2 whitelist"), "{summary}");
    assert!(summary.contains("1 blacklist"), "{summary}");
    assert!(summary.contains("memory session store"), "{summary}");
}
