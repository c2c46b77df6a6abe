// branch-mirror: Git branch and tag mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_range() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    insta::assert_snapshot!(
        LogLevel::new(7).unwrap_err(),
        @"invalid value for 'log_level' in section 'logging': log level must be 0-6, got 7"
    );
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(u8::from(LogLevel::DEBUG), 4);
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(|level| format!("{} {}", level.as_u8(), level.to_filter_string()))
        .collect();

    insta::assert_snapshot!(filters.join("\n"), @r"
    0 off
    1 error
    2 warn
    3 warn,branch_mirror=info
    4 warn,branch_mirror=debug
    5 warn,branch_mirror=trace
    6 trace
    ");
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&LogLevel::TRACE).unwrap(), "5");
    assert!(serde_json::from_str::<LogLevel>("7").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), None);
    assert!(!config.json_file());
    assert!(!config.show_target());
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_log_file("logs/mirror.log".to_string())
        .with_json_file(true)
        .build();

    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.log_file(), Some("logs/mirror.log"));
    assert!(config.json_file());
}
