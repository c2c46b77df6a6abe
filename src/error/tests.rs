// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, MirrorError, MirrorResult, SyncError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "repos.foo.targetRemote".to_string(),
        key: "url".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'url' in section 'repos.foo.targetRemote'"
    );
}

#[test]
fn test_sync_error_display_carries_context() {
    let err: MirrorError = SyncError::PushFailed {
        path: "/srv/foo".to_string(),
        remote: "github".to_string(),
        refspec: "+refs/heads/master:refs/heads/main".to_string(),
        message: "rejected".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"sync error: failed to push +refs/heads/master:refs/heads/main to 'github' from /srv/foo: rejected"
    );
}

#[test]
fn test_branch_check_display() {
    let err = SyncError::BranchCheckInconsistent {
        path: "/srv/foo".to_string(),
        expected_name: "refs/heads/master".to_string(),
        actual_name: "refs/heads/dev".to_string(),
        expected_commit: "abc123".to_string(),
        actual_commit: "def456".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to check out branch correctly in /srv/foo: def456 vs abc123; refs/heads/dev vs refs/heads/master"
    );
}

#[test]
fn test_mirror_error_size() {
    // Every variant is a thin Box: pointer + discriminant
    let size = std::mem::size_of::<MirrorError>();
    assert!(size <= 16, "MirrorError is {size} bytes, expected <= 16");
}

#[test]
fn test_mirror_result_size() {
    let size = std::mem::size_of::<MirrorResult<()>>();
    assert!(size <= 24, "MirrorResult<()> is {size} bytes, expected <= 24");
}
