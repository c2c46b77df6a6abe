// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end synchronization tests.
//!
//! Each test builds a bare `source.git`, a bare `target.git` and a working
//! clone of the source, then mirrors through the real git backends.

use branch_mirror::cmd::sync::{format_plan, plan_repos};
use branch_mirror::config::SyncConfig;
use branch_mirror::config::types::{BranchMapping, RemoteConfig, RepoEntry};
use branch_mirror::error::{MirrorError, SyncError};
use branch_mirror::git::backend::{GitQuery, HybridBackend};
use branch_mirror::sync::{RepoSync, sync_all, sync_repos};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to run git commands in a directory, returning trimmed stdout.
fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Commit of `reference` in `repo`, or `None` if it does not exist.
fn rev(repo: &Path, reference: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--verify", "-q", reference])
        .current_dir(repo)
        .output()
        .expect("failed to run git");
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn commit_file(repo: &Path, name: &str, content: &str) -> String {
    fs::write(repo.join(name), content).unwrap();
    git(&["add", name], repo);
    git(&["commit", "-q", "-m", name], repo);
    git(&["rev-parse", "HEAD"], repo)
}

struct Fixture {
    _temp: TempDir,
    source: PathBuf,
    target: PathBuf,
    seed: PathBuf,
    work: PathBuf,
    master: String,
    dev: String,
}

impl Fixture {
    /// Source with `master`, `dev` and tag `v1`; `work` is a fresh clone.
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp.path();
        let source = root.join("source.git");
        let target = root.join("target.git");
        let seed = root.join("seed");
        let work = root.join("work");
        for dir in [&source, &target, &seed] {
            fs::create_dir(dir).unwrap();
        }

        git(&["init", "-q", "--bare", "-b", "master"], &source);
        git(&["init", "-q", "--bare", "-b", "master"], &target);

        git(&["init", "-q", "-b", "master"], &seed);
        git(&["config", "commit.gpgsign", "false"], &seed);
        git(&["config", "tag.gpgsign", "false"], &seed);
        let master = commit_file(&seed, "README.md", "# mirror");
        git(&["tag", "v1"], &seed);
        git(&["checkout", "-q", "-b", "dev"], &seed);
        let dev = commit_file(&seed, "dev.txt", "dev");
        git(&["checkout", "-q", "master"], &seed);
        git(&["remote", "add", "origin", source.to_str().unwrap()], &seed);
        git(&["push", "-q", "origin", "master", "dev", "v1"], &seed);

        git(
            &["clone", "-q", source.to_str().unwrap(), work.to_str().unwrap()],
            root,
        );

        Self {
            _temp: temp,
            source,
            target,
            seed,
            work,
            master,
            dev,
        }
    }

    fn entry(&self) -> RepoEntry {
        RepoEntry {
            path: self.work.clone(),
            source_remote: RemoteConfig::named("origin"),
            target_remote: RemoteConfig::named("github")
                .with_url(self.target.to_str().unwrap()),
        }
    }
}

fn master_to_main() -> BranchMapping {
    [("master", "main")].into_iter().collect()
}

#[test]
fn sync_mirrors_branches_with_mapping_and_tags() {
    let fx = Fixture::new();
    let repo = fx.entry();

    let report = RepoSync::new(&HybridBackend::new(), "foo", &repo, &master_to_main())
        .run()
        .unwrap();

    assert_eq!(report.updated, 1, "master exists in the clone");
    assert_eq!(report.created, 1, "dev only exists remotely");
    assert_eq!(report.tags_pushed, 1);

    assert_eq!(rev(&fx.target, "refs/heads/main"), Some(fx.master.clone()));
    assert_eq!(rev(&fx.target, "refs/heads/dev"), Some(fx.dev.clone()));
    assert_eq!(rev(&fx.target, "refs/heads/master"), None);
    assert!(rev(&fx.target, "refs/tags/v1").is_some());

    assert_eq!(rev(&fx.work, "refs/heads/dev"), Some(fx.dev.clone()));
    let remotes = HybridBackend::new().remotes(&fx.work).unwrap();
    assert!(remotes.contains(&"github".to_string()));
}

#[test]
fn second_run_creates_nothing() {
    let fx = Fixture::new();
    let repo = fx.entry();
    let backend = HybridBackend::new();
    let mapping = master_to_main();

    RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();
    let second = RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();

    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);
    // Both pulls, both branch pushes and the tag push report no change.
    assert!(second.up_to_date >= 5, "report: {second:?}");
    assert_eq!(rev(&fx.target, "refs/heads/main"), Some(fx.master.clone()));
}

#[test]
fn source_changes_reach_target() {
    let fx = Fixture::new();
    let repo = fx.entry();
    let backend = HybridBackend::new();
    let mapping = master_to_main();
    RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();

    let advanced = commit_file(&fx.seed, "CHANGELOG.md", "v2");
    git(&["push", "-q", "origin", "master"], &fx.seed);

    RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();

    assert_eq!(rev(&fx.work, "refs/heads/master"), Some(advanced.clone()));
    assert_eq!(rev(&fx.target, "refs/heads/main"), Some(advanced));
}

#[test]
fn rewritten_source_history_replaces_local_and_target() {
    let fx = Fixture::new();
    let repo = fx.entry();
    let backend = HybridBackend::new();
    let mapping = master_to_main();
    RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();

    git(
        &["commit", "--amend", "-q", "--allow-empty", "-m", "rewritten"],
        &fx.seed,
    );
    let rewritten = git(&["rev-parse", "HEAD"], &fx.seed);
    git(&["push", "-q", "-f", "origin", "master"], &fx.seed);

    let report = RepoSync::new(&backend, "foo", &repo, &mapping).run().unwrap();

    assert_eq!(report.updated, 2);
    assert_ne!(rewritten, fx.master);
    assert_eq!(rev(&fx.work, "refs/heads/master"), Some(rewritten.clone()));
    assert_eq!(rev(&fx.target, "refs/heads/main"), Some(rewritten));
}

#[test]
fn failing_fetch_stops_before_reconciliation() {
    let fx = Fixture::new();
    let missing = fx.work.parent().unwrap().join("missing.git");
    git(&["remote", "add", "broken", missing.to_str().unwrap()], &fx.work);
    git(
        &["remote", "add", "github", fx.target.to_str().unwrap()],
        &fx.work,
    );
    let repo = fx.entry();

    let err = RepoSync::new(&HybridBackend::new(), "foo", &repo, &master_to_main())
        .run()
        .unwrap_err();

    let MirrorError::Sync(sync) = err else {
        panic!("expected sync error");
    };
    assert!(matches!(*sync, SyncError::FetchFailed { ref remote, .. } if remote == "broken"));
    assert_eq!(rev(&fx.target, "refs/heads/main"), None);
    assert_eq!(rev(&fx.work, "refs/heads/dev"), None);
}

#[test]
fn dry_run_changes_nothing() {
    let fx = Fixture::new();
    let repo = fx.entry();

    let report = RepoSync::new(&HybridBackend::new(), "foo", &repo, &master_to_main())
        .dry_run(true)
        .run()
        .unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.branches_pushed, 2);
    assert_eq!(rev(&fx.target, "refs/heads/main"), None);
    assert_eq!(rev(&fx.work, "refs/heads/dev"), None);
    let remotes = HybridBackend::new().remotes(&fx.work).unwrap();
    assert_eq!(remotes, ["origin"]);
}

#[test]
fn missing_target_url_is_reported() {
    let fx = Fixture::new();
    let mut repo = fx.entry();
    repo.target_remote.url = None;

    let err = RepoSync::new(&HybridBackend::new(), "foo", &repo, &master_to_main())
        .run()
        .unwrap_err();

    assert!(matches!(err, MirrorError::Config(_)));
}

#[test]
fn unopenable_repository_stops_the_run() {
    let fx = Fixture::new();
    let good = fx.entry();
    let mut bad = fx.entry();
    bad.path = fx.work.parent().unwrap().join("nowhere");
    // "a" fails first, so "b" is never touched.
    let repos = [("a", &bad), ("b", &good)];

    let err = sync_repos(&HybridBackend::new(), &repos, &master_to_main(), false).unwrap_err();

    assert!(err.to_string().contains("failed to open repo"));
    assert_eq!(rev(&fx.target, "refs/heads/main"), None);
}

#[test]
fn sync_all_uses_config() {
    let fx = Fixture::new();
    let yaml = format!(
        r"
repos:
  foo:
    path: {work}
    sourceRemote:
      name: origin
    targetRemote:
      name: github
      url: {target}
branchMapping:
  master: main
",
        work = fx.work.display(),
        target = fx.target.display(),
    );
    let config = SyncConfig::parse(&yaml).unwrap();

    let report = sync_all(&HybridBackend::new(), &config, false).unwrap();

    assert_eq!(report.repos, 1);
    assert_eq!(rev(&fx.target, "refs/heads/main"), Some(fx.master.clone()));
}

#[test]
fn plan_lists_actions_without_mutating() {
    let fx = Fixture::new();
    let repo = fx.entry();
    let repos = [("foo", &repo)];

    let plans = plan_repos(&HybridBackend::new(), &repos, &master_to_main()).unwrap();
    let text = format_plan(&plans)
        .join("\n")
        .replace(&fx.master, "<master>")
        .replace(&fx.dev, "<dev>")
        .replace(&fx.work.display().to_string(), "<work>");

    insta::assert_snapshot!(text, @r"
    foo (<work>)
      create refs/heads/dev at <dev>
      push +refs/heads/dev:refs/heads/dev
      update refs/heads/master <master> -> <master>
      push +refs/heads/master:refs/heads/main
      push +refs/tags/v1:refs/tags/v1
    ");
    assert_eq!(rev(&fx.target, "refs/heads/main"), None);
    assert!(fx.source.exists());
}
