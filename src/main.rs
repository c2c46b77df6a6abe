// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Version | Options | Sync | Plan
//! ```

use std::process::ExitCode;

use branch_mirror::cli::global::GlobalOptions;
use branch_mirror::cli::{self, Command};
use branch_mirror::cmd::config::{load_config, run_options_command};
use branch_mirror::cmd::sync::{run_plan_command, run_sync_command};
use branch_mirror::config::SyncConfig;
use branch_mirror::logging::init_logging;
use std::path::Path;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match init_logging(&cli.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli)
}

fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options(args)) => {
            load(&cli.global, &args.config).map(|config| run_options_command(&config))
        }
        Some(Command::Sync(args)) => load(&cli.global, &args.config.config)
            .and_then(|config| run_sync_command(args, &config, cli.global.dry)),
        Some(Command::Plan(args)) => load(&cli.global, &args.sync.config.config)
            .and_then(|config| run_plan_command(args, &config)),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn load(global: &GlobalOptions, path: &Path) -> branch_mirror::error::Result<SyncConfig> {
    load_config(path, &global.options)
}
