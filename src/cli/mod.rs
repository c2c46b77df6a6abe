// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! branch-mirror [global options] <command>
//! sync    CONFIG [--repo NAME]...          mirror branches and tags
//! plan    CONFIG [--repo NAME]... [--json] print actions, change nothing
//! options CONFIG                           print resolved configuration
//! version
//! ```

pub mod global;
pub mod sync;


use crate::cli::global::GlobalOptions;
use crate::cli::sync::{ConfigArgs, PlanArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// Mirror branches and tags of local Git repositories from one remote to another.
#[derive(Debug, Parser)]
#[command(
    name = "branch-mirror",
    author,
    version,
    about = "Git branch and tag mirroring tool",
    long_about = "branch-mirror Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  For every configured repository, branches of the source remote are\n\
                  created or hard-reset locally and force-pushed to the target remote,\n\
                  renamed through `branchMapping`. All local tags are pushed afterwards.",
    after_help = "CONFIGURATION:\n\n\
                  The YAML file lists `repos` (path, sourceRemote, targetRemote) and an\n\
                  optional `branchMapping`. Values can be overridden with --set\n\
                  key=value or with MIRROR__ environment variables, using `__` as the\n\
                  key separator (MIRROR__BRANCHMAPPING__MASTER=main)."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the configuration.
    Options(ConfigArgs),

    /// Mirrors the configured repositories.
    Sync(SyncArgs),

    /// Prints the actions a sync would take without changing anything.
    Plan(PlanArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
