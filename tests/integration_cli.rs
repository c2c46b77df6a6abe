// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use branch_mirror::cli::{Cli, Command, try_parse_from};
use clap::Parser;
use std::path::Path;

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = Cli::try_parse_from(["branch-mirror", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["branch-mirror"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// Sync / Plan Commands
// =============================================================================

#[test]
fn cli_sync_all_repos() {
    let cli = try_parse_from(["branch-mirror", "sync", "/etc/mirror.yaml"]).unwrap();
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };
    assert_eq!(args.config.config, Path::new("/etc/mirror.yaml"));
    assert!(args.repos.is_empty());
}

#[test]
fn cli_sync_dry_with_logging() {
    let cli = try_parse_from([
        "branch-mirror",
        "--dry",
        "--log-file",
        "logs/mirror.log",
        "--file-log-level",
        "5",
        "sync",
        "mirror.yaml",
        "--repo",
        "foo",
    ])
    .unwrap();

    assert!(cli.global.dry);
    let log = cli.global.log_config();
    assert_eq!(log.log_file(), Some("logs/mirror.log"));
    assert_eq!(log.file_level().as_u8(), 5);
    assert_eq!(log.console_level().as_u8(), 3);
}

#[test]
fn cli_plan_requires_config() {
    assert!(try_parse_from(["branch-mirror", "plan"]).is_err());
}

#[test]
fn cli_unknown_command() {
    assert!(try_parse_from(["branch-mirror", "build"]).is_err());
}

#[test]
fn cli_repeated_set() {
    let cli = try_parse_from([
        "branch-mirror",
        "-s",
        "branchMapping.master=main",
        "--set",
        "branchMapping.develop=dev",
        "options",
        "mirror.yaml",
    ])
    .unwrap();
    assert_eq!(cli.global.options.len(), 2);
}
