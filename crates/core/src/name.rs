// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated project name / subdomain label.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A project name, validated against `^[a-z][a-z0-9-]*$` with length <= 63.
///
/// This is also the routing label used for the canonical `<name>.localhost`
/// subdomain; aliases are separate strings that resolve to the same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

/// Error returned when a project name fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid project name {0:?}: must match ^[a-z][a-z0-9-]*$ and be <= 63 bytes")]
pub struct InvalidProjectName(pub String);

impl ProjectName {
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidProjectName> {
        let s = s.into();
        if is_valid_label(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidProjectName(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Matches `^[a-z][a-z0-9-]*$`, length <= 63, without pulling in `regex`.
fn is_valid_label(s: &str) -> bool {
    if s.is_empty() || s.len() > 63 {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ProjectName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
