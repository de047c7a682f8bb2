// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config_types::ProjectConfig;
use crate::name::ProjectName;
use std::path::PathBuf;

fn sample_config() -> Config {
    let mut config = Config::default();
    config.projects.insert(
        "alpha".into(),
        ProjectConfig {
            name: ProjectName::parse("alpha").unwrap(),
            cwd: PathBuf::from("/tmp/a"),
            start_cmd: "node server.js".into(),
            idle_timeout: None,
            disabled: false,
            aliases: vec!["a".into(), "Alpha-Alt".into()],
        },
    );
    config
}

#[test]
fn resolves_canonical_name() {
    let table = RoutingTable::from_config(&sample_config());
    let project = table.resolve("alpha").unwrap();
    assert_eq!(project.name.as_str(), "alpha");
}

#[test]
fn resolves_alias_to_same_project() {
    let table = RoutingTable::from_config(&sample_config());
    let by_name = table.resolve("alpha").unwrap();
    let by_alias = table.resolve("a").unwrap();
    assert_eq!(by_name.name, by_alias.name);
}

#[test]
fn resolve_is_case_insensitive() {
    let table = RoutingTable::from_config(&sample_config());
    assert!(table.resolve("ALPHA").is_some());
    assert!(table.resolve("alpha-alt").is_some());
}

#[test]
fn unknown_label_resolves_to_none() {
    let table = RoutingTable::from_config(&sample_config());
    assert!(table.resolve("ghost").is_none());
}

#[test]
fn empty_config_yields_empty_table() {
    let table = RoutingTable::from_config(&Config::default());
    assert!(table.is_empty());
}
