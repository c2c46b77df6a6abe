// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          MirrorError (16 bytes)
//!                   |
//!     +------+------+------+------+
//!     |      |      |      |
//!     v      v      v      v
//!    Git  Config  Sync  Process
//!    Box   Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Git      Gix, CommandFailed, MalformedOutput,
//!            RepoNotFound, DetachedHead, RemoteNotFound
//!   Config   ParseError, MissingKey, InvalidValue, NotFound
//!   Sync     RepoOpen, RemoteList, Fetch, Checkout,
//!            Pull, Reset, Push, BranchCheck
//!   Process  ExecutableNotFound, SpawnFailed
//!
//! All variants boxed => MirrorError is one pointer plus discriminant.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`MirrorError`].
pub type MirrorResult<T> = std::result::Result<T, MirrorError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at 16 bytes on the stack.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Repository synchronization step failed.
    #[error("sync error: {0}")]
    Sync(#[from] Box<SyncError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for MirrorError {
                fn from(err: $error) -> Self {
                    MirrorError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    SyncError => Sync,
    ProcessError => Process,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// gix has many error types; the ones that carry no useful structure for
/// callers are flattened to their message.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to iterate or peel references.
    #[error("failed to read references: {0}")]
    References(String),

    /// Failed to compute working tree status.
    #[error("failed to compute status: {0}")]
    Status(String),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Git produced output that could not be parsed.
    #[error("unexpected output from {command}: '{line}'")]
    MalformedOutput { command: String, line: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// HEAD does not point at a branch.
    #[error("HEAD is detached in {path}")]
    DetachedHead { path: String },

    /// Remote is not configured in the repository.
    #[error("remote not found: {remote}")]
    RemoteNotFound { remote: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '{section}': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Requested repository is not part of the configuration.
    #[error("repository not configured: {0}")]
    NotFound(String),
}

// --- Sync Errors ---

/// Failures of individual synchronization steps.
///
/// Every variant is fatal for the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to open repo from {path}: {message}")]
    RepoOpenFailed { path: String, message: String },

    /// Remotes or remote refs could not be enumerated.
    #[error("failed to list remote '{remote}' in '{path}': {message}")]
    RemoteListFailed {
        path: String,
        remote: String,
        message: String,
    },

    #[error("failed to create remote '{remote}' in '{path}': {message}")]
    RemoteCreateFailed {
        path: String,
        remote: String,
        message: String,
    },

    /// Local branches or tags could not be enumerated.
    #[error("failed to list local refs in '{path}': {message}")]
    RefListFailed { path: String, message: String },

    #[error("failed to fetch {remote} in '{path}': {message}")]
    FetchFailed {
        path: String,
        remote: String,
        message: String,
    },

    #[error("failed to checkout {branch} in {path}: {message}")]
    CheckoutFailed {
        path: String,
        branch: String,
        message: String,
    },

    #[error("failed to pull {branch} from '{remote}' in {path}: {message}")]
    PullFailed {
        path: String,
        remote: String,
        branch: String,
        message: String,
    },

    #[error("failed to reset branch {branch} to {commit} in {path}: {message}")]
    ResetFailed {
        path: String,
        branch: String,
        commit: String,
        message: String,
    },

    #[error("failed to push {refspec} to '{remote}' from {path}: {message}")]
    PushFailed {
        path: String,
        remote: String,
        refspec: String,
        message: String,
    },

    /// A freshly created branch does not match the remote branch it was created from.
    #[error(
        "failed to check out branch correctly in {path}: {actual_commit} vs {expected_commit}; {actual_name} vs {expected_name}"
    )]
    BranchCheckInconsistent {
        path: String,
        expected_name: String,
        actual_name: String,
        expected_commit: String,
        actual_commit: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
