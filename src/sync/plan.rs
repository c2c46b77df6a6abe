// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch reconciliation policy.
//!
//! ```text
//! remote branch r ──► local with same full name?
//!                        no  ─► CreateLocal(r)
//!                        yes ─► UpdateLocal(r, local)
//!                     then  ─► PushBranch(r.name, map(r.short))
//! after all branches  ─► PushTag(t) for every local tag
//! ```
//!
//! Matching compares full reference names exactly as received. The remote
//! listing advertises `refs/heads/<b>`, which lines up with local heads; a
//! listing that returned `refs/remotes/<remote>/<b>` would never match and
//! every branch would be recreated on each run.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::config::types::BranchMapping;
use crate::git::refs::{LocalBranchRef, RemoteBranchRef, TagRef, branch_refspec, tag_refspec};

/// One step of a repository synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconciliationAction {
    /// Force-create the local branch at the remote commit.
    CreateLocal { remote: RemoteBranchRef },
    /// Check out the existing branch, pull it and hard-reset it to the remote commit.
    UpdateLocal {
        remote: RemoteBranchRef,
        local: LocalBranchRef,
    },
    /// Force-push a local branch to `refs/heads/<target>` on the target remote.
    PushBranch { local_ref: String, target: String },
    /// Force-push `refs/tags/<tag>` onto the same name.
    PushTag { tag: String },
}

impl ReconciliationAction {
    /// Ref-spec for push actions.
    #[must_use]
    pub fn refspec(&self) -> Option<String> {
        match self {
            Self::PushBranch { local_ref, target } => Some(branch_refspec(local_ref, target)),
            Self::PushTag { tag } => Some(tag_refspec(tag)),
            Self::CreateLocal { .. } | Self::UpdateLocal { .. } => None,
        }
    }
}

impl fmt::Display for ReconciliationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateLocal { remote } => {
                write!(f, "create {} at {}", remote.name, remote.commit)
            }
            Self::UpdateLocal { remote, local } => write!(
                f,
                "update {} {} -> {}",
                local.name, local.commit, remote.commit
            ),
            Self::PushBranch { .. } | Self::PushTag { .. } => {
                write!(f, "push {}", self.refspec().unwrap_or_default())
            }
        }
    }
}

/// Plan create-or-update and push actions for every remote branch.
///
/// Remote branches keep the order the listing returned; each yields exactly
/// one create-or-update immediately followed by its push.
#[must_use]
pub fn plan_branches(
    remote_branches: &[RemoteBranchRef],
    local_branches: &[LocalBranchRef],
    mapping: &BranchMapping,
) -> Vec<ReconciliationAction> {
    let locals: HashMap<&str, &LocalBranchRef> = local_branches
        .iter()
        .map(|local| (local.name.as_str(), local))
        .collect();

    let mut actions = Vec::with_capacity(remote_branches.len() * 2);
    for remote in remote_branches {
        let local_ref = match locals.get(remote.name.as_str()) {
            Some(local) => {
                actions.push(ReconciliationAction::UpdateLocal {
                    remote: remote.clone(),
                    local: (*local).clone(),
                });
                local.name.clone()
            }
            None => {
                actions.push(ReconciliationAction::CreateLocal {
                    remote: remote.clone(),
                });
                remote.name.clone()
            }
        };
        actions.push(ReconciliationAction::PushBranch {
            local_ref,
            target: mapping.map_branch(remote.short_name()).to_string(),
        });
    }
    actions
}

/// One push per tag, never renamed.
#[must_use]
pub fn plan_tags(tags: &[TagRef]) -> Vec<ReconciliationAction> {
    tags.iter()
        .map(|tag| ReconciliationAction::PushTag {
            tag: tag.short_name().to_string(),
        })
        .collect()
}

/// Full plan: all branch actions, then all tag pushes.
#[must_use]
pub fn plan(
    remote_branches: &[RemoteBranchRef],
    local_branches: &[LocalBranchRef],
    tags: &[TagRef],
    mapping: &BranchMapping,
) -> Vec<ReconciliationAction> {
    let mut actions = plan_branches(remote_branches, local_branches, mapping);
    actions.extend(plan_tags(tags));
    actions
}
