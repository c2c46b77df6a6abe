// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the config module with realistic YAML configurations.

use branch_mirror::cmd::config::load_config;
use branch_mirror::config::SyncConfig;
use std::fs;
use std::path::Path;

const MIRROR_YAML: &str = r"
repos:
  foo:
    path: /srv/mirror/foo
    sourceRemote:
      name: origin
    targetRemote:
      name: github
      url: git@github.com:bar/foo.git
  bar:
    path: /srv/mirror/bar
    sourceRemote:
      name: upstream
    targetRemote:
      name: origin
branchMapping:
  master: main
";

#[test]
fn config_parse_full_example() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();

    let names: Vec<_> = config.repos.keys().map(String::as_str).collect();
    assert_eq!(names, ["bar", "foo"]);

    let foo = &config.repos["foo"];
    assert_eq!(foo.path, Path::new("/srv/mirror/foo"));
    assert_eq!(foo.source_remote.name, "origin");
    assert_eq!(foo.target_remote.name, "github");
    assert_eq!(
        foo.target_remote.url.as_deref(),
        Some("git@github.com:bar/foo.git")
    );

    let bar = &config.repos["bar"];
    assert_eq!(bar.source_remote.name, "upstream");
    assert_eq!(bar.target_remote.url, None);
}

#[test]
fn config_serializes_back_to_yaml_keys() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["branchMapping"]["master"], "main");
    assert_eq!(value["repos"]["foo"]["targetRemote"]["name"], "github");
    assert!(value["repos"]["bar"]["targetRemote"].get("url").is_none());
}

#[test]
fn config_mapping_defaults_to_identity() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();
    assert_eq!(config.map_branch("master"), "main");
    assert_eq!(config.map_branch("develop"), "develop");
    assert_eq!(config.map_branch("main"), "main");
}

#[test]
fn config_without_mapping() {
    let config = SyncConfig::parse(
        r"
repos:
  foo:
    path: /srv/foo
    sourceRemote:
      name: origin
    targetRemote:
      name: github
",
    )
    .unwrap();
    assert!(config.branch_mapping.is_empty());
    assert_eq!(config.map_branch("master"), "master");
}

#[test]
fn config_select_keeps_name_order() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();
    let names: Vec<_> = config
        .select(&["foo".to_string(), "bar".to_string()])
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["bar", "foo"]);
}

#[test]
fn config_select_unknown_repo() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();
    let err = config.select(&["baz".to_string()]).unwrap_err();
    insta::assert_snapshot!(err, @"config error: repository not configured: baz");
}

#[test]
fn config_file_with_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("mirror.yaml");
    fs::write(&path, MIRROR_YAML).unwrap();

    let config = load_config(&path, &["branchMapping.develop=dev".to_string()]).unwrap();

    assert_eq!(config.map_branch("master"), "main");
    assert_eq!(config.map_branch("develop"), "dev");
}

#[test]
fn config_options_listing() {
    let config = SyncConfig::parse(MIRROR_YAML).unwrap();
    let options = config.format_options();
    assert!(options.iter().any(|l| l.starts_with("branchMapping.master")));
    assert!(options.iter().any(|l| l.ends_with("= git@github.com:bar/foo.git")));
    assert_eq!(options.len(), 8);
}
