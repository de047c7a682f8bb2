// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::raw::{RawProjectConfig, RawSettings};

fn valid_raw_project(name: &str) -> RawProjectConfig {
    RawProjectConfig {
        name: name.to_string(),
        cwd: "/tmp/a".to_string(),
        start_cmd: "node server.js".to_string(),
        idle_timeout: None,
        disabled: false,
        aliases: Vec::new(),
    }
}

#[test]
fn valid_config_round_trips() {
    let mut raw = RawConfig::default();
    raw.projects.insert("alpha".to_string(), valid_raw_project("alpha"));

    let config = validate(raw).expect("valid config");
    assert_eq!(config.projects.len(), 1);
    assert_eq!(config.projects["alpha"].name.as_str(), "alpha");
}

#[test]
fn mismatched_name_and_key_is_rejected() {
    let mut raw = RawConfig::default();
    raw.projects.insert("alpha".to_string(), valid_raw_project("beta"));

    let errors = validate(raw).unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, ValidationError::Project { name, .. } if name == "alpha")));
}

#[test]
fn empty_cwd_and_start_cmd_both_reported() {
    let mut raw = RawConfig::default();
    raw.projects.insert(
        "alpha".to_string(),
        RawProjectConfig {
            name: "alpha".to_string(),
            cwd: "  ".to_string(),
            start_cmd: "".to_string(),
            idle_timeout: None,
            disabled: false,
            aliases: Vec::new(),
        },
    );

    let errors = validate(raw).unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn invalid_project_name_is_reported() {
    let mut raw = RawConfig::default();
    raw.projects.insert("Alpha".to_string(), valid_raw_project("Alpha"));

    let errors = validate(raw).unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn multiple_invalid_projects_collect_all_errors() {
    let mut raw = RawConfig::default();
    raw.projects.insert("Alpha".to_string(), valid_raw_project("Alpha"));
    raw.projects.insert("beta".to_string(), valid_raw_project("mismatch"));

    let errors = validate(raw).unwrap_err();
    assert!(errors.len() >= 2);
}

#[test]
fn idle_timeout_zero_is_preserved_as_never_auto_stop() {
    let mut raw = RawConfig::default();
    let mut project = valid_raw_project("alpha");
    project.idle_timeout = Some("0".to_string());
    raw.projects.insert("alpha".to_string(), project);

    let config = validate(raw).unwrap();
    assert_eq!(config.projects["alpha"].idle_timeout, Some(0));
}

#[test]
fn invalid_duration_string_is_reported() {
    let mut raw = RawConfig::default();
    let mut project = valid_raw_project("alpha");
    project.idle_timeout = Some("10x".to_string());
    raw.projects.insert("alpha".to_string(), project);

    let errors = validate(raw).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn settings_defaults_apply_when_missing() {
    let raw = RawConfig::default();
    let config = validate(raw).unwrap();
    assert_eq!(config.settings, Settings::default());
}

#[test]
fn settings_parse_duration_strings() {
    let mut raw = RawConfig::default();
    raw.settings = RawSettings {
        idle_timeout: Some("5m".to_string()),
        ..RawSettings::default()
    };
    let config = validate(raw).unwrap();
    assert_eq!(config.settings.idle_timeout, 300_000);
}

#[test]
fn inverted_port_range_is_rejected() {
    let mut raw = RawConfig::default();
    raw.settings.port_range = Some([5000, 4000]);
    let errors = validate(raw).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn min_timeout_greater_than_max_timeout_is_rejected() {
    let mut raw = RawConfig::default();
    raw.settings.min_timeout = Some("30m".to_string());
    raw.settings.max_timeout = Some("10m".to_string());
    let errors = validate(raw).unwrap_err();
    assert_eq!(errors.len(), 1);
}
