// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for branch-mirror.
//!
//! # Config Structure
//!
//! ```text
//! SyncConfig: repos (name → RepoEntry), branchMapping
//! RepoEntry:  path, sourceRemote, targetRemote
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A remote as named in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Remote name inside the local repository.
    pub name: String,
    /// URL used to create the remote when it does not exist yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RemoteConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One repository to mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepoEntry {
    /// Local working copy.
    pub path: PathBuf,
    /// Remote whose branches are mirrored.
    #[serde(alias = "sourceremote")]
    pub source_remote: RemoteConfig,
    /// Remote that receives the force-pushes.
    #[serde(alias = "targetremote")]
    pub target_remote: RemoteConfig,
}

/// Branch rename table applied at push time.
///
/// Branches without an entry keep their name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchMapping(BTreeMap<String, String>);

impl BranchMapping {
    #[must_use]
    pub const fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Target name for `branch`, falling back to `branch` itself.
    #[must_use]
    pub fn map_branch<'a>(&'a self, branch: &'a str) -> &'a str {
        self.0.get(branch).map_or(branch, String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BranchMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
