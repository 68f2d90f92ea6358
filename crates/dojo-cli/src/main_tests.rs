// crates/dojo-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Argument Tests
// Description: Parsing tests for the dojo CLI definition.
// Purpose: Verify subcommand and flag parsing without network access.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! Exercises the clap definition: subcommand routing, flag defaults, and
//! rejection of malformed invocations.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;

use crate::Cli;
use crate::Commands;
use crate::ConfigCommand;
use crate::StrategyArg;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn train_parses_with_defaults() {
    let cli = Cli::try_parse_from([
        "dojo",
        "train",
        "0123456789abcdef01234567",
        "--code",
        "solution.rs",
    ])
    .unwrap();
    let Some(Commands::Train(command)) = cli.command else {
        panic!("expected train command");
    };
    assert_eq!(command.challenge, "0123456789abcdef01234567");
    assert_eq!(command.lang, "rust");
    assert_eq!(command.code, PathBuf::from("solution.rs"));
    assert_eq!(command.fixture, None);
    assert!(!command.submit);
    assert_eq!(command.config, None);
}

#[test]
fn train_accepts_submit_and_fixture() {
    let cli = Cli::try_parse_from([
        "dojo",
        "train",
        "0123456789abcdef01234567",
        "--lang",
        "haskell",
        "--code",
        "solution.hs",
        "--fixture",
        "fixture.hs",
        "--submit",
    ])
    .unwrap();
    let Some(Commands::Train(command)) = cli.command else {
        panic!("expected train command");
    };
    assert_eq!(command.lang, "haskell");
    assert_eq!(command.fixture, Some(PathBuf::from("fixture.hs")));
    assert!(command.submit);
}

#[test]
fn train_requires_code_path() {
    let parsed = Cli::try_parse_from(["dojo", "train", "0123456789abcdef01234567"]);
    assert!(parsed.is_err());
}

#[test]
fn suggest_parses_with_defaults() {
    let cli = Cli::try_parse_from(["dojo", "suggest"]).unwrap();
    let Some(Commands::Suggest(command)) = cli.command else {
        panic!("expected suggest command");
    };
    assert_eq!(command.lang, "rust");
    assert!(matches!(command.strategy, StrategyArg::RankUp));
    assert!(!command.dequeue);
}

#[test]
fn suggest_accepts_strategy_and_dequeue() {
    let cli = Cli::try_parse_from([
        "dojo",
        "suggest",
        "--lang",
        "haskell",
        "--strategy",
        "beta",
        "--dequeue",
    ])
    .unwrap();
    let Some(Commands::Suggest(command)) = cli.command else {
        panic!("expected suggest command");
    };
    assert_eq!(command.lang, "haskell");
    assert!(matches!(command.strategy, StrategyArg::Beta));
    assert!(command.dequeue);
}

#[test]
fn routes_parses_page_path() {
    let cli = Cli::try_parse_from(["dojo", "routes", "--page", "trainer.html"]).unwrap();
    let Some(Commands::Routes(command)) = cli.command else {
        panic!("expected routes command");
    };
    assert_eq!(command.page, PathBuf::from("trainer.html"));
}

#[test]
fn config_validate_parses_optional_path() {
    let cli = Cli::try_parse_from(["dojo", "config", "validate", "--path", "dojo.toml"]).unwrap();
    let Some(Commands::Config {
        command: ConfigCommand::Validate {
            path,
        },
    }) = cli.command
    else {
        panic!("expected config validate command");
    };
    assert_eq!(path, Some(PathBuf::from("dojo.toml")));
}

#[test]
fn version_flag_parses_without_subcommand() {
    let cli = Cli::try_parse_from(["dojo", "--version"]).unwrap();
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn unknown_subcommand_is_rejected() {
    let parsed = Cli::try_parse_from(["dojo", "frobnicate"]);
    assert!(parsed.is_err());
}
