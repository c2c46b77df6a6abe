// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository synchronization.
//!
//! ```text
//! sync_repos ──► RepoSync::run (one repository, name order)
//!                  1. open
//!                  2. list remotes, add target remote if missing
//!                  3. ls-remote source          (snapshot)
//!                  4. fetch every remote
//!                  5. plan_branches ─► create/update ─► push   (per branch)
//!                  6. plan_tags     ─► push                     (per tag)
//! ```
//!
//! The first failing step aborts the whole run. Repositories already
//! processed keep their changes.

pub mod plan;

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

use crate::config::SyncConfig;
use crate::config::types::{BranchMapping, RepoEntry};
use crate::error::{ConfigError, GitError, MirrorError, MirrorResult, SyncError};
use crate::git::backend::GitBackend;
use crate::git::refs::{
    Checkout, LocalBranchRef, PushMode, RemoteBranchRef, TagRef, Transfer,
};

pub use plan::{ReconciliationAction, plan, plan_branches, plan_tags};

/// Counters for what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub repos: usize,
    pub created: usize,
    pub updated: usize,
    pub branches_pushed: usize,
    pub tags_pushed: usize,
    /// Fetches, pulls and pushes that reported "already up to date".
    pub up_to_date: usize,
}

impl SyncReport {
    fn merge(&mut self, other: Self) {
        self.repos += other.repos;
        self.created += other.created;
        self.updated += other.updated;
        self.branches_pushed += other.branches_pushed;
        self.tags_pushed += other.tags_pushed;
        self.up_to_date += other.up_to_date;
    }

    fn count(&mut self, transfer: Transfer) {
        if transfer.is_up_to_date() {
            self.up_to_date += 1;
        }
    }
}

/// Synchronize the given repositories in order, stopping at the first error.
///
/// # Errors
///
/// Returns the first [`MirrorError`] raised by any repository.
pub fn sync_repos<B: GitBackend + ?Sized>(
    backend: &B,
    repos: &[(&str, &RepoEntry)],
    mapping: &BranchMapping,
    dry_run: bool,
) -> MirrorResult<SyncReport> {
    let mut report = SyncReport::default();
    for (name, repo) in repos {
        let repo_report = RepoSync::new(backend, name, repo, mapping)
            .dry_run(dry_run)
            .run()?;
        report.merge(repo_report);
    }
    Ok(report)
}

/// Synchronize every repository of `config`.
///
/// # Errors
///
/// Returns the first [`MirrorError`] raised by any repository.
pub fn sync_all<B: GitBackend + ?Sized>(
    backend: &B,
    config: &SyncConfig,
    dry_run: bool,
) -> MirrorResult<SyncReport> {
    let repos = config.select(&[])?;
    sync_repos(backend, &repos, &config.branch_mapping, dry_run)
}

/// Synchronizer for a single repository.
pub struct RepoSync<'a, B: ?Sized> {
    backend: &'a B,
    name: &'a str,
    repo: &'a RepoEntry,
    mapping: &'a BranchMapping,
    dry_run: bool,
}

impl<'a, B: GitBackend + ?Sized> RepoSync<'a, B> {
    pub const fn new(
        backend: &'a B,
        name: &'a str,
        repo: &'a RepoEntry,
        mapping: &'a BranchMapping,
    ) -> Self {
        Self {
            backend,
            name,
            repo,
            mapping,
            dry_run: false,
        }
    }

    /// Log mutating and network-write steps instead of running them.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn path(&self) -> &Path {
        &self.repo.path
    }

    fn path_str(&self) -> String {
        self.repo.path.display().to_string()
    }

    fn source(&self) -> &str {
        &self.repo.source_remote.name
    }

    fn target(&self) -> &str {
        &self.repo.target_remote.name
    }

    /// Run every step for this repository.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] (or a [`ConfigError`] for a missing target URL)
    /// for the first step that fails.
    pub fn run(&self) -> MirrorResult<SyncReport> {
        let _span = info_span!("repo", name = %self.name).entered();
        info!(path = %self.path().display(), "Synchronizing repository");

        let mut report = SyncReport {
            repos: 1,
            ..SyncReport::default()
        };

        self.open()?;
        let remotes = self.remotes()?;
        self.ensure_source_remote(&remotes)?;
        self.ensure_target_remote(&remotes)?;

        // The snapshot is taken before any fetch updates local state.
        let remote_branches = self.snapshot_source()?;
        for remote in &remotes {
            if let Some(transfer) = self.fetch(remote)? {
                report.count(transfer);
            }
        }

        let local_branches = self.local_branches()?;
        for action in plan_branches(&remote_branches, &local_branches, self.mapping) {
            self.apply(&action, &mut report)?;
        }

        let tags = self.tags()?;
        for action in plan_tags(&tags) {
            self.apply(&action, &mut report)?;
        }

        info!(
            created = report.created,
            updated = report.updated,
            branches = report.branches_pushed,
            tags = report.tags_pushed,
            "Repository synchronized"
        );
        Ok(report)
    }

    /// Compute the actions a run would take, without fetching or mutating.
    ///
    /// Local branches and tags reflect the repository as it is now, so a
    /// branch that only appears after a fetch is planned as a create.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] if the repository cannot be opened or read.
    pub fn plan(&self) -> MirrorResult<Vec<ReconciliationAction>> {
        self.open()?;
        let remotes = self.remotes()?;
        self.ensure_source_remote(&remotes)?;
        let remote_branches = self.snapshot_source()?;
        let local_branches = self.local_branches()?;
        let tags = self.tags()?;
        Ok(plan(&remote_branches, &local_branches, &tags, self.mapping))
    }

    fn open(&self) -> MirrorResult<()> {
        self.backend.open(self.path()).map_err(|e| {
            SyncError::RepoOpenFailed {
                path: self.path_str(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn remotes(&self) -> MirrorResult<Vec<String>> {
        self.backend
            .remotes(self.path())
            .map_err(|e| self.remote_list_error("*", e))
    }

    fn remote_list_error(&self, remote: &str, message: impl ToString) -> MirrorError {
        SyncError::RemoteListFailed {
            path: self.path_str(),
            remote: remote.to_string(),
            message: message.to_string(),
        }
        .into()
    }

    fn ensure_source_remote(&self, remotes: &[String]) -> MirrorResult<()> {
        if remotes.iter().any(|r| r == self.source()) {
            Ok(())
        } else {
            let missing = GitError::RemoteNotFound {
                remote: self.source().to_string(),
            };
            Err(self.remote_list_error(self.source(), missing))
        }
    }

    fn ensure_target_remote(&self, remotes: &[String]) -> MirrorResult<()> {
        let target = self.target();
        if remotes.iter().any(|r| r == target) {
            debug!(remote = target, "Target remote present");
            return Ok(());
        }

        let Some(url) = self.repo.target_remote.url.as_deref() else {
            return Err(ConfigError::MissingKey {
                section: format!("repos.{}.targetRemote", self.name),
                key: "url".to_string(),
            }
            .into());
        };

        if self.dry_run {
            info!(remote = target, url, "[DRY-RUN] would create remote");
            return Ok(());
        }

        info!(remote = target, url, "Creating remote");
        self.backend
            .add_remote(self.path(), target, url)
            .map_err(|e| {
                SyncError::RemoteCreateFailed {
                    path: self.path_str(),
                    remote: target.to_string(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    fn snapshot_source(&self) -> MirrorResult<Vec<RemoteBranchRef>> {
        let branches = self
            .backend
            .list_remote_branches(self.path(), self.source())
            .map_err(|e| self.remote_list_error(self.source(), e))?;
        debug!(
            remote = self.source(),
            count = branches.len(),
            "Listed source branches"
        );
        Ok(branches)
    }

    fn fetch(&self, remote: &str) -> MirrorResult<Option<Transfer>> {
        if self.dry_run {
            info!(remote, "[DRY-RUN] would fetch");
            return Ok(None);
        }

        info!(remote, "Fetching");
        let transfer = self
            .backend
            .fetch(self.path(), remote)
            .map_err(|e| SyncError::FetchFailed {
                path: self.path_str(),
                remote: remote.to_string(),
                message: e.to_string(),
            })?;
        if transfer.is_up_to_date() {
            info!(remote, "Fetch: {transfer}");
        }
        Ok(Some(transfer))
    }

    fn local_branches(&self) -> MirrorResult<Vec<LocalBranchRef>> {
        self.backend.local_branches(self.path()).map_err(|e| {
            SyncError::RefListFailed {
                path: self.path_str(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn tags(&self) -> MirrorResult<Vec<TagRef>> {
        self.backend.tags(self.path()).map_err(|e| {
            SyncError::RefListFailed {
                path: self.path_str(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn apply(&self, action: &ReconciliationAction, report: &mut SyncReport) -> MirrorResult<()> {
        match action {
            ReconciliationAction::CreateLocal { remote } => {
                self.create_local(remote)?;
                report.created += 1;
            }
            ReconciliationAction::UpdateLocal { remote, local } => {
                if let Some(transfer) = self.update_local(remote, local)? {
                    report.count(transfer);
                }
                report.updated += 1;
            }
            ReconciliationAction::PushBranch { .. } => {
                if let Some(transfer) = self.push(action, PushMode::Atomic)? {
                    report.count(transfer);
                }
                self.log_status();
                report.branches_pushed += 1;
            }
            ReconciliationAction::PushTag { .. } => {
                if let Some(transfer) = self.push(action, PushMode::FollowTags)? {
                    report.count(transfer);
                }
                report.tags_pushed += 1;
            }
        }
        Ok(())
    }

    fn checkout_error(&self, branch: &str, message: impl ToString) -> MirrorError {
        SyncError::CheckoutFailed {
            path: self.path_str(),
            branch: branch.to_string(),
            message: message.to_string(),
        }
        .into()
    }

    fn create_local(&self, remote: &RemoteBranchRef) -> MirrorResult<()> {
        let branch = remote.short_name();
        if self.dry_run {
            info!(branch, commit = %remote.commit, "[DRY-RUN] would create branch");
            return Ok(());
        }

        info!(branch, commit = %remote.commit, "Creating branch");
        self.backend
            .checkout(self.path(), &Checkout::create(&remote.name, &remote.commit))
            .map_err(|e| self.checkout_error(branch, e))?;

        let head = self
            .backend
            .head(self.path())
            .map_err(|e| self.checkout_error(branch, e))?;
        if head.commit != remote.commit || head.name != remote.name {
            return Err(SyncError::BranchCheckInconsistent {
                path: self.path_str(),
                expected_name: remote.name.clone(),
                actual_name: head.name,
                expected_commit: remote.commit.clone(),
                actual_commit: head.commit,
            }
            .into());
        }
        Ok(())
    }

    fn update_local(
        &self,
        remote: &RemoteBranchRef,
        local: &LocalBranchRef,
    ) -> MirrorResult<Option<Transfer>> {
        let branch = local.short_name();
        if self.dry_run {
            info!(
                branch,
                from = %local.commit,
                to = %remote.commit,
                "[DRY-RUN] would update branch"
            );
            return Ok(None);
        }

        self.backend
            .checkout(self.path(), &Checkout::existing(&local.name))
            .map_err(|e| self.checkout_error(branch, e))?;
        let head = self
            .backend
            .head(self.path())
            .map_err(|e| self.checkout_error(branch, e))?;
        info!(branch, commit = %head.commit, "Checked out branch");

        let transfer = self
            .backend
            .pull(self.path(), self.source(), &remote.name)
            .map_err(|e| SyncError::PullFailed {
                path: self.path_str(),
                remote: self.source().to_string(),
                branch: branch.to_string(),
                message: e.to_string(),
            })?;
        if transfer.is_up_to_date() {
            info!(branch, remote = self.source(), "Pull: {transfer}");
        }

        // Reset to the snapshot commit so local equals remote before the push.
        self.backend
            .reset_hard(self.path(), &remote.commit)
            .map_err(|e| SyncError::ResetFailed {
                path: self.path_str(),
                branch: branch.to_string(),
                commit: remote.commit.clone(),
                message: e.to_string(),
            })?;
        info!(branch, commit = %remote.commit, "Branch reset");
        Ok(Some(transfer))
    }

    fn push(&self, action: &ReconciliationAction, mode: PushMode) -> MirrorResult<Option<Transfer>> {
        let Some(refspec) = action.refspec() else {
            return Ok(None);
        };
        let remote = self.target();
        if self.dry_run {
            info!(remote, refspec = %refspec, "[DRY-RUN] would push");
            return Ok(None);
        }

        info!(remote, refspec = %refspec, "Pushing");
        let transfer = self
            .backend
            .push(self.path(), remote, std::slice::from_ref(&refspec), mode)
            .map_err(|e| SyncError::PushFailed {
                path: self.path_str(),
                remote: remote.to_string(),
                refspec: refspec.clone(),
                message: e.to_string(),
            })?;
        if transfer.is_up_to_date() {
            info!(remote, refspec = %refspec, "Push: {transfer}");
        }
        Ok(Some(transfer))
    }

    fn log_status(&self) {
        if self.dry_run {
            return;
        }
        match self.backend.has_uncommitted_changes(self.path()) {
            Ok(dirty) => debug!(dirty, "Working tree status"),
            Err(e) => warn!(error = %e, "Failed to read working tree status"),
        }
    }
}
