// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory routing table: subdomain label to project config.
//!
//! Rebuilt wholesale on every config load and published atomically — the
//! proxy only ever holds a single `Arc` snapshot, never a partially updated
//! table.

use crate::config_types::{Config, ProjectConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a lowercased subdomain label (canonical name or alias) to the project
/// it routes to.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    labels: HashMap<String, Arc<ProjectConfig>>,
}

impl RoutingTable {
    /// Build a fresh table from a parsed config. Both the canonical name and
    /// every alias resolve to the same `Arc<ProjectConfig>`.
    pub fn from_config(config: &Config) -> Self {
        let mut labels = HashMap::new();
        for project in config.projects.values() {
            let project = Arc::new(project.clone());
            labels.insert(project.name.as_str().to_ascii_lowercase(), project.clone());
            for alias in &project.aliases {
                labels.insert(alias.to_ascii_lowercase(), project.clone());
            }
        }
        Self { labels }
    }

    /// Look up a subdomain label (already expected lowercase, but this
    /// lowercases defensively since `Host` headers are not guaranteed to be).
    pub fn resolve(&self, label: &str) -> Option<Arc<ProjectConfig>> {
        self.labels.get(&label.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
