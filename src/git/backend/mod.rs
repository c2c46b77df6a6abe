// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery    (local read)   --> GixBackend   (pure Rust gix)
//! GitTransfer (network)      --> ShellBackend (git CLI)
//! GitMutation (local write)  --> ShellBackend (git CLI)
//!
//! HybridBackend = GixBackend reads + ShellBackend everything else
//! ```

use crate::error::{GitError, GixError, MirrorResult, ProcessError};
use std::path::Path;
use tracing::trace;

use super::refs::{
    Checkout, HEADS_PREFIX, LocalBranchRef, PushMode, REFS_PREFIX, RemoteBranchRef, TAGS_PREFIX,
    TagRef, Transfer, parse_ls_remote,
};

// --- Query Trait (Read-only operations) ---

/// Read-only queries against a local repository.
pub trait GitQuery {
    /// Verify that `path` is an openable repository.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the path is not a git repository.
    fn open(&self, path: &Path) -> MirrorResult<()>;

    /// Names of all configured remotes.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository configuration cannot be read.
    fn remotes(&self, repo: &Path) -> MirrorResult<Vec<String>>;

    /// All `refs/heads/*` branches with their commits.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if references cannot be enumerated or peeled.
    fn local_branches(&self, repo: &Path) -> MirrorResult<Vec<LocalBranchRef>>;

    /// All `refs/tags/*` tags.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if references cannot be enumerated.
    fn tags(&self, repo: &Path) -> MirrorResult<Vec<TagRef>>;

    /// The branch HEAD points at, with its commit.
    ///
    /// # Errors
    ///
    /// Returns `GitError::DetachedHead` if HEAD is not symbolic, or another
    /// `GitError` if it cannot be resolved.
    fn head(&self, repo: &Path) -> MirrorResult<LocalBranchRef>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the status check fails.
    fn has_uncommitted_changes(&self, repo: &Path) -> MirrorResult<bool>;
}

// --- Transfer Trait (Network operations) ---

/// Operations that talk to a remote.
///
/// "Already up to date" is reported as [`Transfer::UpToDate`], never as an error.
pub trait GitTransfer {
    /// Branches advertised by `remote`, in the order the remote lists them.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be contacted.
    fn list_remote_branches(
        &self,
        repo: &Path,
        remote: &str,
    ) -> MirrorResult<Vec<RemoteBranchRef>>;

    /// Fetch everything from `remote`, including all tags.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch fails.
    fn fetch(&self, repo: &Path, remote: &str) -> MirrorResult<Transfer>;

    /// Force-pull a single branch from `remote` into the checked out branch.
    ///
    /// The branch is moved to the fetched commit even when histories
    /// diverged; nothing is merged.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    fn pull(&self, repo: &Path, remote: &str, ref_name: &str) -> MirrorResult<Transfer>;

    /// Force-push `refspecs` to `remote`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the push is rejected or fails.
    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        mode: PushMode,
    ) -> MirrorResult<Transfer>;
}

// --- Mutation Trait (Write operations) ---

/// Local operations that modify repository state.
pub trait GitMutation {
    /// Add a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be added.
    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> MirrorResult<()>;

    /// Switch branches, optionally force-creating the branch first.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout fails.
    fn checkout(&self, repo: &Path, checkout: &Checkout) -> MirrorResult<()>;

    /// Reset the current branch, index and working tree to `commit`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reset fails.
    fn reset_hard(&self, repo: &Path, commit: &str) -> MirrorResult<()>;
}

/// Everything the synchronizer needs from git.
pub trait GitBackend: GitQuery + GitTransfer + GitMutation {}

impl<T: GitQuery + GitTransfer + GitMutation + ?Sized> GitBackend for T {}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GixBackend;

impl GixBackend {
    fn repo(path: &Path) -> MirrorResult<gix::Repository> {
        gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))).into())
    }

    /// Collect references under `prefix` as `(full name, commit)` pairs.
    fn references(path: &Path, prefix: &str, peel: bool) -> MirrorResult<Vec<(String, String)>> {
        let refs_err =
            |e: &dyn std::fmt::Display| GitError::Gix(GixError::References(e.to_string()));

        let repo = Self::repo(path)?;
        let platform = repo.references().map_err(|e| refs_err(&e))?;
        let mut found = Vec::new();
        for reference in platform.prefixed(prefix).map_err(|e| refs_err(&e))? {
            let reference = reference.map_err(|e| refs_err(&e))?;
            let name = reference.name().as_bstr().to_string();
            let commit = if peel {
                reference
                    .try_id()
                    .ok_or_else(|| refs_err(&format!("{name} is a symbolic reference")))?
                    .to_string()
            } else {
                String::new()
            };
            found.push((name, commit));
        }
        Ok(found)
    }
}

impl GitQuery for GixBackend {
    fn open(&self, path: &Path) -> MirrorResult<()> {
        Self::repo(path).map(|_| ())
    }

    fn remotes(&self, repo: &Path) -> MirrorResult<Vec<String>> {
        let repo = Self::repo(repo)?;
        Ok(repo
            .remote_names()
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn local_branches(&self, repo: &Path) -> MirrorResult<Vec<LocalBranchRef>> {
        Ok(Self::references(repo, HEADS_PREFIX, true)?
            .into_iter()
            .map(|(name, commit)| LocalBranchRef::new(name, commit))
            .collect())
    }

    fn tags(&self, repo: &Path) -> MirrorResult<Vec<TagRef>> {
        Ok(Self::references(repo, TAGS_PREFIX, false)?
            .into_iter()
            .map(|(name, _)| TagRef::new(name))
            .collect())
    }

    fn head(&self, path: &Path) -> MirrorResult<LocalBranchRef> {
        let repo = Self::repo(path)?;
        let name = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?
            .ok_or_else(|| GitError::DetachedHead {
                path: path.display().to_string(),
            })?;
        let id = repo
            .head_id()
            .map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;
        Ok(LocalBranchRef::new(name.as_bstr().to_string(), id.to_string()))
    }

    fn has_uncommitted_changes(&self, path: &Path) -> MirrorResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = Self::repo(path)?;
        if repo.workdir().is_none() {
            return Err(GitError::Gix(GixError::BareRepository).into());
        }

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Required for anything touching the network, where the user's SSH agent,
/// credential helpers and `~/.gitconfig` must apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBackend;

impl ShellBackend {
    /// Fail early if `git` cannot be found in PATH.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn ensure_available() -> MirrorResult<()> {
        which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(())
    }

    /// Execute a git command, returning trimmed stdout.
    ///
    /// Sets `GCM_INTERACTIVE=never`, `GIT_TERMINAL_PROMPT=0` and `LC_ALL=C`
    /// so output can be parsed.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> MirrorResult<String> {
        use std::process::Command;

        let command = format!("git {}", args.join(" "));
        trace!(cwd = %cwd.display(), %command, "running");

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| ProcessError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn for_each_ref(repo: &Path, prefix: &str) -> MirrorResult<Vec<(String, String)>> {
        let command = "git for-each-ref";
        let output = Self::git_command(
            &["for-each-ref", "--format=%(refname)\t%(objectname)", prefix],
            repo,
        )?;
        output
            .lines()
            .filter(|l| !l.is_empty())
            .map(|line| {
                line.split_once('\t')
                    .map(|(name, id)| (name.to_string(), id.to_string()))
                    .ok_or_else(|| {
                        GitError::MalformedOutput {
                            command: command.to_string(),
                            line: line.to_string(),
                        }
                        .into()
                    })
            })
            .collect()
    }
}

/// A push is up to date when git reports every ref with the `=` flag.
///
/// `git push --porcelain` prints `<flag>\t<from>:<to>\t<summary>` per ref,
/// framed by `To <url>` and `Done`.
pub(crate) fn push_was_noop(porcelain: &str) -> bool {
    let mut flags = porcelain
        .lines()
        .filter(|l| l.contains('\t'))
        .filter_map(|l| l.chars().next())
        .peekable();
    flags.peek().is_none() || flags.all(|flag| flag == '=')
}

impl GitQuery for ShellBackend {
    fn open(&self, path: &Path) -> MirrorResult<()> {
        if !path.is_dir() || Self::git_command(&["rev-parse", "--git-dir"], path).is_err() {
            return Err(GitError::RepoNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn remotes(&self, repo: &Path) -> MirrorResult<Vec<String>> {
        let output = Self::git_command(&["remote"], repo)?;
        Ok(output
            .lines()
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn local_branches(&self, repo: &Path) -> MirrorResult<Vec<LocalBranchRef>> {
        Ok(Self::for_each_ref(repo, HEADS_PREFIX)?
            .into_iter()
            .map(|(name, commit)| LocalBranchRef::new(name, commit))
            .collect())
    }

    fn tags(&self, repo: &Path) -> MirrorResult<Vec<TagRef>> {
        Ok(Self::for_each_ref(repo, TAGS_PREFIX)?
            .into_iter()
            .map(|(name, _)| TagRef::new(name))
            .collect())
    }

    fn head(&self, repo: &Path) -> MirrorResult<LocalBranchRef> {
        let name = Self::git_command(&["symbolic-ref", "-q", "HEAD"], repo).map_err(|_| {
            GitError::DetachedHead {
                path: repo.display().to_string(),
            }
        })?;
        let commit = Self::git_command(&["rev-parse", "HEAD"], repo)?;
        Ok(LocalBranchRef::new(name, commit))
    }

    fn has_uncommitted_changes(&self, repo: &Path) -> MirrorResult<bool> {
        let output = Self::git_command(&["status", "--porcelain"], repo)?;
        Ok(!output.is_empty())
    }
}

impl GitTransfer for ShellBackend {
    fn list_remote_branches(
        &self,
        repo: &Path,
        remote: &str,
    ) -> MirrorResult<Vec<RemoteBranchRef>> {
        let output = Self::git_command(&["ls-remote", remote], repo)?;
        parse_ls_remote(&output).map_err(|line| {
            GitError::MalformedOutput {
                command: format!("git ls-remote {remote}"),
                line,
            }
            .into()
        })
    }

    fn fetch(&self, repo: &Path, remote: &str) -> MirrorResult<Transfer> {
        // up to date when nothing under refs/ moved
        let before = Self::for_each_ref(repo, REFS_PREFIX)?;
        Self::git_command(&["fetch", "--tags", "--force", remote], repo)?;
        let after = Self::for_each_ref(repo, REFS_PREFIX)?;
        Ok(if before == after {
            Transfer::UpToDate
        } else {
            Transfer::Updated
        })
    }

    fn pull(&self, repo: &Path, remote: &str, ref_name: &str) -> MirrorResult<Transfer> {
        Self::git_command(&["fetch", "--force", "--no-tags", remote, ref_name], repo)?;
        let fetched = Self::git_command(&["rev-parse", "FETCH_HEAD"], repo)?;
        let head = Self::git_command(&["rev-parse", "HEAD"], repo)?;
        if fetched == head {
            return Ok(Transfer::UpToDate);
        }
        // no merge: local commits missing from the remote are dropped
        Self::git_command(&["reset", "--hard", "-q", &fetched], repo)?;
        Ok(Transfer::Updated)
    }

    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        mode: PushMode,
    ) -> MirrorResult<Transfer> {
        let mut args = vec!["push", "--porcelain", "--force"];
        args.push(match mode {
            PushMode::Atomic => "--atomic",
            PushMode::FollowTags => "--follow-tags",
        });
        args.push(remote);
        args.extend(refspecs.iter().map(String::as_str));

        let output = Self::git_command(&args, repo)?;
        Ok(if push_was_noop(&output) {
            Transfer::UpToDate
        } else {
            Transfer::Updated
        })
    }
}

impl GitMutation for ShellBackend {
    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> MirrorResult<()> {
        Self::git_command(&["remote", "add", name, url], repo)?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, checkout: &Checkout) -> MirrorResult<()> {
        let mut args = vec!["-c", "advice.detachedHead=false", "checkout", "-q"];
        if checkout.force {
            args.push("-f");
        }
        match &checkout.start_point {
            Some(commit) => args.extend(["-B", checkout.short_branch(), commit.as_str()]),
            None => args.push(checkout.short_branch()),
        }
        Self::git_command(&args, repo)?;
        Ok(())
    }

    fn reset_hard(&self, repo: &Path, commit: &str) -> MirrorResult<()> {
        Self::git_command(&["reset", "--hard", "-q", commit], repo)?;
        Ok(())
    }
}

// --- HybridBackend (gix reads, CLI writes) ---

/// Default backend: local reads through gix, everything else through git.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridBackend {
    query: GixBackend,
    shell: ShellBackend,
}

impl HybridBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: GixBackend,
            shell: ShellBackend,
        }
    }
}

impl GitQuery for HybridBackend {
    fn open(&self, path: &Path) -> MirrorResult<()> {
        self.query.open(path)
    }

    fn remotes(&self, repo: &Path) -> MirrorResult<Vec<String>> {
        self.query.remotes(repo)
    }

    fn local_branches(&self, repo: &Path) -> MirrorResult<Vec<LocalBranchRef>> {
        self.query.local_branches(repo)
    }

    fn tags(&self, repo: &Path) -> MirrorResult<Vec<TagRef>> {
        self.query.tags(repo)
    }

    fn head(&self, repo: &Path) -> MirrorResult<LocalBranchRef> {
        self.query.head(repo)
    }

    fn has_uncommitted_changes(&self, repo: &Path) -> MirrorResult<bool> {
        self.query.has_uncommitted_changes(repo)
    }
}

impl GitTransfer for HybridBackend {
    fn list_remote_branches(
        &self,
        repo: &Path,
        remote: &str,
    ) -> MirrorResult<Vec<RemoteBranchRef>> {
        self.shell.list_remote_branches(repo, remote)
    }

    fn fetch(&self, repo: &Path, remote: &str) -> MirrorResult<Transfer> {
        self.shell.fetch(repo, remote)
    }

    fn pull(&self, repo: &Path, remote: &str, ref_name: &str) -> MirrorResult<Transfer> {
        self.shell.pull(repo, remote, ref_name)
    }

    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        mode: PushMode,
    ) -> MirrorResult<Transfer> {
        self.shell.push(repo, remote, refspecs, mode)
    }
}

impl GitMutation for HybridBackend {
    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> MirrorResult<()> {
        self.shell.add_remote(repo, name, url)
    }

    fn checkout(&self, repo: &Path, checkout: &Checkout) -> MirrorResult<()> {
        self.shell.checkout(repo, checkout)
    }

    fn reset_hard(&self, repo: &Path, commit: &str) -> MirrorResult<()> {
        self.shell.reset_hard(repo, commit)
    }
}
