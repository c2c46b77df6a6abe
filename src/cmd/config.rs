// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands.

use anyhow::Context;
use std::path::Path;

use crate::config::SyncConfig;
use crate::error::Result;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "MIRROR";

/// Load `path`, then environment overrides, then `--set` overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, an override is malformed
/// or the result does not validate.
pub fn load_config(path: &Path, overrides: &[String]) -> Result<SyncConfig> {
    SyncConfig::builder()
        .add_yaml_file(path)
        .with_env_prefix(ENV_PREFIX)
        .set_all(overrides)?
        .build()
        .with_context(|| format!("failed to load config from {}", path.display()))
}

/// Display current configuration options.
pub fn run_options_command(config: &SyncConfig) {
    for line in config.format_options() {
        println!("{line}");
    }
}
