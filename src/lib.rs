// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            options / sync / plan
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  YAML repos + branch map  |
//!              '-------------+-------------'
//!                            v
//!                          sync
//!               plan (reconciler) + RepoSync
//!                            |
//!                            v
//!                           git
//!              GitQuery / GitTransfer / GitMutation
//!                  gix reads, git CLI writes
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod sync;
