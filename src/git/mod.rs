// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git collaborator layer.
//!
//! ```text
//!          sync::RepoSync
//!                |
//!                v
//!      ,---------------------,
//!      |  backend (traits)   |
//!      | Query/Transfer/Mut  |
//!      '--+--------------+---'
//!         |              |
//!         v              v
//!    GixBackend     ShellBackend
//!    .remotes       .ls-remote/fetch
//!    .branches      .pull/push
//!    .tags/.head    .checkout/reset
//!         \              /
//!          HybridBackend (default)
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for network access and writes.

pub mod backend;
pub mod refs;
