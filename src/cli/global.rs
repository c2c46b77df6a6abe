// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --dry             ← Log mutations instead of running them
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (defaults to --log-level)
//! --log-file FILE   ← Also log to FILE
//! --log-json        ← Log file as JSON lines
//! --set KEY=VAL     ← Direct config override
//!
//! Precedence: --set > MIRROR__* environment > config file
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::logging::{LogConfig, LogLevel};

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Logs every fetch, checkout, reset, push and remote creation instead of
    /// running it. Remote branch listings are still queried.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true,
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true,
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Writes the log file as JSON lines.
    #[arg(long = "log-json", global = true, requires = "log_file")]
    pub log_json: bool,

    /// Sets a configuration value, such as 'branchMapping.master=main'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", global = true,
        action = clap::ArgAction::Append)]
    pub options: Vec<String>,
}

impl GlobalOptions {
    /// Logging configuration from the command line.
    ///
    /// The file level falls back to the console level.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let console_level = self
            .log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(LogLevel::INFO);

        let file_level = self
            .file_log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(console_level);

        LogConfig::builder()
            .with_console_level(console_level)
            .with_file_level(file_level)
            .maybe_with_log_file(self.log_file.as_ref().map(|p| p.display().to_string()))
            .with_json_file(self.log_json)
            .build()
    }
}
