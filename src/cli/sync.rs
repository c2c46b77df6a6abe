// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for `sync`, `plan` and `options`.

use clap::Args;
use std::path::PathBuf;

/// Arguments naming the configuration file.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// YAML configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only processes the named repository. Can be specified multiple times.
    #[arg(short = 'r', long = "repo", value_name = "NAME", action = clap::ArgAction::Append)]
    pub repos: Vec<String>,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sync: SyncArgs,

    /// Prints the plan as JSON.
    #[arg(long)]
    pub json: bool,
}
