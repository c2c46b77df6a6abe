// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sync` and `plan` command implementations.

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::cli::sync::{PlanArgs, SyncArgs};
use crate::config::SyncConfig;
use crate::config::types::{BranchMapping, RepoEntry};
use crate::error::{MirrorResult, Result};
use crate::git::backend::{GitBackend, HybridBackend, ShellBackend};
use crate::sync::{ReconciliationAction, RepoSync, SyncReport, sync_repos};

/// Main handler for the sync command.
///
/// # Errors
///
/// Returns the first error raised while synchronizing; repositories after
/// the failing one are not processed.
pub fn run_sync_command(args: &SyncArgs, config: &SyncConfig, dry_run: bool) -> Result<()> {
    ShellBackend::ensure_available()?;
    let repos = config.select(&args.repos)?;

    let report = sync_repos(&HybridBackend::new(), &repos, &config.branch_mapping, dry_run)
        .context("synchronization aborted")?;
    log_report(&report, dry_run);
    Ok(())
}

fn log_report(report: &SyncReport, dry_run: bool) {
    info!(
        repos = report.repos,
        created = report.created,
        updated = report.updated,
        branches = report.branches_pushed,
        tags = report.tags_pushed,
        up_to_date = report.up_to_date,
        dry_run,
        "Synchronization finished"
    );
}

/// Planned actions of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoPlan {
    pub name: String,
    pub path: String,
    pub actions: Vec<ReconciliationAction>,
}

/// Plan every repository in order without changing anything.
///
/// # Errors
///
/// Returns the first error raised while reading a repository.
pub fn plan_repos<B: GitBackend + ?Sized>(
    backend: &B,
    repos: &[(&str, &RepoEntry)],
    mapping: &BranchMapping,
) -> MirrorResult<Vec<RepoPlan>> {
    repos
        .iter()
        .map(|(name, repo)| {
            let actions = RepoSync::new(backend, name, repo, mapping).plan()?;
            Ok(RepoPlan {
                name: (*name).to_string(),
                path: repo.path.display().to_string(),
                actions,
            })
        })
        .collect()
}

/// Human readable plan listing.
#[must_use]
pub fn format_plan(plans: &[RepoPlan]) -> Vec<String> {
    let mut lines = Vec::new();
    for plan in plans {
        lines.push(format!("{} ({})", plan.name, plan.path));
        if plan.actions.is_empty() {
            lines.push("  nothing to do".to_string());
        }
        lines.extend(plan.actions.iter().map(|action| format!("  {action}")));
    }
    lines
}

/// Main handler for the plan command.
///
/// # Errors
///
/// Returns an error if a repository cannot be read or the plan cannot be
/// serialized.
pub fn run_plan_command(args: &PlanArgs, config: &SyncConfig) -> Result<()> {
    ShellBackend::ensure_available()?;
    let repos = config.select(&args.sync.repos)?;
    let plans = plan_repos(&HybridBackend::new(), &repos, &config.branch_mapping)
        .context("planning aborted")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plans).context("failed to serialize plan")?
        );
    } else {
        for line in format_plan(&plans) {
            println!("{line}");
        }
    }
    Ok(())
}
