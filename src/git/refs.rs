// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference snapshots exchanged with the git backends.
//!
//! ```text
//! refs/heads/master          LocalBranchRef  (short: master)
//! refs/heads/master (remote) RemoteBranchRef (as advertised by ls-remote)
//! refs/tags/v1.0             TagRef          (short: v1.0)
//! ```

use serde::Serialize;
use std::fmt;

pub const REFS_PREFIX: &str = "refs/";
pub const HEADS_PREFIX: &str = "refs/heads/";
pub const TAGS_PREFIX: &str = "refs/tags/";
pub const REMOTES_PREFIX: &str = "refs/remotes/";

/// Strip the well-known namespace prefix from a full reference name.
///
/// `refs/remotes/origin/dev` shortens to `origin/dev`; unknown namespaces
/// are returned unchanged.
#[must_use]
pub fn short_ref_name(full: &str) -> &str {
    [HEADS_PREFIX, TAGS_PREFIX, REMOTES_PREFIX]
        .iter()
        .find_map(|prefix| full.strip_prefix(prefix))
        .unwrap_or(full)
}

/// A branch advertised by a remote.
///
/// `name` is kept exactly as the remote listing reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteBranchRef {
    pub name: String,
    pub commit: String,
}

impl RemoteBranchRef {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: commit.into(),
        }
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        short_ref_name(&self.name)
    }
}

/// A branch that exists in the local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalBranchRef {
    pub name: String,
    pub commit: String,
}

impl LocalBranchRef {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: commit.into(),
        }
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        short_ref_name(&self.name)
    }
}

/// A local tag. Only the name matters for mirroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRef {
    pub name: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        short_ref_name(&self.name)
    }
}

/// Outcome of a network operation that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transfer {
    /// Refs were changed.
    Updated,
    /// Nothing to do; treated as success.
    UpToDate,
}

impl Transfer {
    #[must_use]
    pub const fn is_up_to_date(self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::UpToDate => write!(f, "already up to date"),
        }
    }
}

/// Checkout request.
///
/// With `start_point` set the branch is (re)created there, overwriting any
/// existing ref of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub branch: String,
    pub start_point: Option<String>,
    pub force: bool,
}

impl Checkout {
    /// Switch to an existing branch, discarding local changes.
    pub fn existing(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            start_point: None,
            force: true,
        }
    }

    /// Force-create `branch` at `commit` and switch to it.
    pub fn create(branch: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            start_point: Some(commit.into()),
            force: true,
        }
    }

    #[must_use]
    pub fn short_branch(&self) -> &str {
        short_ref_name(&self.branch)
    }
}

/// Push flavour. Both modes force-update the remote refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// All ref updates succeed or none do.
    Atomic,
    /// Also push annotated tags reachable from the pushed refs.
    FollowTags,
}

/// Ref-spec that force-pushes a local branch to `refs/heads/<target>`.
#[must_use]
pub fn branch_refspec(local_ref: &str, target_short: &str) -> String {
    format!("+{local_ref}:{HEADS_PREFIX}{target_short}")
}

/// Ref-spec that force-pushes a tag onto the same name.
#[must_use]
pub fn tag_refspec(tag_short: &str) -> String {
    format!("+{TAGS_PREFIX}{tag_short}:{TAGS_PREFIX}{tag_short}")
}

/// Parse `git ls-remote` output, keeping only branch refs in listing order.
///
/// Each line is `<commit>\t<ref name>`; blank lines are skipped.
///
/// # Errors
///
/// Returns the offending line if it does not have the two tab-separated fields.
pub fn parse_ls_remote(output: &str) -> Result<Vec<RemoteBranchRef>, String> {
    let mut branches = Vec::new();
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let (commit, name) = line.split_once('\t').ok_or_else(|| line.to_string())?;
        let name = name.trim();
        if name.starts_with(HEADS_PREFIX) {
            branches.push(RemoteBranchRef::new(name, commit.trim()));
        }
    }
    Ok(branches)
}
