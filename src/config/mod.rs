// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for branch-mirror.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. config file given on the command line (YAML)
//! 2. MIRROR__* env vars
//! 3. --set overrides
//! ```
//!
//! # File Layout
//!
//! ```yaml
//! repos:
//!   foo:
//!     path: /srv/mirror/foo
//!     sourceRemote:
//!       name: origin
//!     targetRemote:
//!       name: github
//!       url: git@github.com:bar/foo.git
//! branchMapping:
//!   master: main
//! ```
//!
//! The parsed [`SyncConfig`] is immutable; it is handed by reference to the
//! synchronizer.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigError, MirrorResult, Result};

use loader::ConfigLoader;
use types::{BranchMapping, RepoEntry};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SyncConfig {
    /// Repositories keyed by a name used only for logging and selection.
    pub repos: BTreeMap<String, RepoEntry>,
    /// Branch rename table.
    ///
    /// The lowercase alias accepts keys coming from environment variables.
    #[serde(alias = "branchmapping")]
    pub branch_mapping: BranchMapping,
}

impl SyncConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use branch_mirror::config::SyncConfig;
    ///
    /// let config = SyncConfig::builder()
    ///     .add_yaml_file("mirror.yaml")
    ///     .with_env_prefix("MIRROR")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid YAML or does not describe
    /// a valid `SyncConfig`.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_yaml_str(content).build()
    }

    /// Target branch name for a source branch short name.
    #[must_use]
    pub fn map_branch<'a>(&'a self, branch: &'a str) -> &'a str {
        self.branch_mapping.map_branch(branch)
    }

    /// Check the invariants serde cannot express.
    ///
    /// Target remote URLs are not checked here; they are only needed when the
    /// remote has to be created.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending key.
    pub fn validate(&self) -> MirrorResult<()> {
        for (name, repo) in &self.repos {
            let section = format!("repos.{name}");
            if repo.path.as_os_str().is_empty() {
                return Err(missing(&section, "path"));
            }
            if repo.source_remote.name.trim().is_empty() {
                return Err(missing(&format!("{section}.sourceRemote"), "name"));
            }
            if repo.target_remote.name.trim().is_empty() {
                return Err(missing(&format!("{section}.targetRemote"), "name"));
            }
            if repo.source_remote.name == repo.target_remote.name {
                return Err(ConfigError::InvalidValue {
                    section,
                    key: "targetRemote.name".to_string(),
                    message: format!(
                        "target remote must differ from source remote '{}'",
                        repo.source_remote.name
                    ),
                }
                .into());
            }
        }

        for (from, to) in self.branch_mapping.iter() {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    section: "branchMapping".to_string(),
                    key: from.clone(),
                    message: format!("branch names must not be empty ('{from}' -> '{to}')"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Repositories to process, in name order.
    ///
    /// An empty `names` selects every repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a name that is not configured.
    pub fn select(&self, names: &[String]) -> MirrorResult<Vec<(&str, &RepoEntry)>> {
        if names.is_empty() {
            return Ok(self
                .repos
                .iter()
                .map(|(name, repo)| (name.as_str(), repo))
                .collect());
        }

        if let Some(unknown) = names.iter().find(|n| !self.repos.contains_key(*n)) {
            return Err(ConfigError::NotFound(unknown.clone()).into());
        }
        Ok(self
            .repos
            .iter()
            .filter(|(name, _)| names.contains(name))
            .map(|(name, repo)| (name.as_str(), repo))
            .collect())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        for (name, repo) in &self.repos {
            options.insert(format!("repos.{name}.path"), repo.path.display().to_string());
            options.insert(
                format!("repos.{name}.sourceRemote.name"),
                repo.source_remote.name.clone(),
            );
            options.insert(
                format!("repos.{name}.targetRemote.name"),
                repo.target_remote.name.clone(),
            );
            if let Some(url) = &repo.target_remote.url {
                options.insert(format!("repos.{name}.targetRemote.url"), url.clone());
            }
        }
        for (from, to) in self.branch_mapping.iter() {
            options.insert(format!("branchMapping.{from}"), to.clone());
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

fn missing(section: &str, key: &str) -> crate::error::MirrorError {
    ConfigError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    }
    .into()
}
