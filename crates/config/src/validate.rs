// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Converts a [`RawConfig`] into a validated [`lazydev_core::Config`],
//! collecting every validation failure instead of stopping at the first.

use crate::error::ValidationError;
use crate::paths::expand_tilde;
use crate::raw::RawConfig;
use lazydev_core::{duration::parse_duration_ms, Config, PortRange, ProjectConfig, ProjectName, Settings};
use std::collections::BTreeMap;

pub fn validate(raw: RawConfig) -> Result<Config, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let settings = validate_settings(&raw.settings, &mut errors);
    let mut projects = BTreeMap::new();

    for (key, raw_project) in raw.projects {
        match validate_project(&key, raw_project, settings.as_ref()) {
            Ok(project) => {
                projects.insert(key, project);
            }
            Err(mut project_errors) => errors.append(&mut project_errors),
        }
    }

    if errors.is_empty() {
        Ok(Config {
            settings: settings.unwrap_or_default(),
            projects,
        })
    } else {
        Err(errors)
    }
}

fn validate_settings(
    raw: &crate::raw::RawSettings,
    errors: &mut Vec<ValidationError>,
) -> Option<Settings> {
    let defaults = Settings::default();
    let mut ok = true;

    let idle_timeout = parse_duration_field(raw.idle_timeout.as_deref(), defaults.idle_timeout, "idle_timeout", errors, &mut ok);
    let startup_timeout = parse_duration_field(raw.startup_timeout.as_deref(), defaults.startup_timeout, "startup_timeout", errors, &mut ok);
    let scan_interval = parse_duration_field(raw.scan_interval.as_deref(), defaults.scan_interval, "scan_interval", errors, &mut ok);
    let min_timeout = parse_duration_field(raw.min_timeout.as_deref(), defaults.min_timeout, "min_timeout", errors, &mut ok);
    let max_timeout = parse_duration_field(raw.max_timeout.as_deref(), defaults.max_timeout, "max_timeout", errors, &mut ok);

    let port_range = match raw.port_range {
        Some([min, max]) if min <= max => PortRange { min, max },
        Some([min, max]) => {
            errors.push(ValidationError::Settings(format!(
                "port_range [{min}, {max}] has min > max"
            )));
            ok = false;
            defaults.port_range
        }
        None => defaults.port_range,
    };

    if min_timeout > max_timeout {
        errors.push(ValidationError::Settings(format!(
            "min_timeout ({min_timeout}) must not exceed max_timeout ({max_timeout})"
        )));
        ok = false;
    }

    if !ok {
        return None;
    }

    Some(Settings {
        proxy_port: raw.proxy_port.unwrap_or(defaults.proxy_port),
        idle_timeout,
        startup_timeout,
        port_range,
        scan_interval,
        dynamic_timeout: raw.dynamic_timeout.unwrap_or(defaults.dynamic_timeout),
        min_timeout,
        max_timeout,
    })
}

fn parse_duration_field(
    raw: Option<&str>,
    default: u64,
    field: &str,
    errors: &mut Vec<ValidationError>,
    ok: &mut bool,
) -> u64 {
    match raw {
        None => default,
        Some(s) => match parse_duration_ms(s) {
            Ok(ms) => ms,
            Err(e) => {
                errors.push(ValidationError::Settings(format!("{field}: {e}")));
                *ok = false;
                default
            }
        },
    }
}

fn validate_project(
    key: &str,
    raw: crate::raw::RawProjectConfig,
    settings: Option<&Settings>,
) -> Result<ProjectConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if raw.name != key {
        errors.push(ValidationError::Project {
            name: key.to_string(),
            reason: format!("name field {:?} does not match map key {:?}", raw.name, key),
        });
    }

    let name = match ProjectName::parse(raw.name.clone()) {
        Ok(name) => Some(name),
        Err(e) => {
            errors.push(ValidationError::Project {
                name: key.to_string(),
                reason: e.to_string(),
            });
            None
        }
    };

    if raw.cwd.trim().is_empty() {
        errors.push(ValidationError::Project {
            name: key.to_string(),
            reason: "cwd must not be empty".to_string(),
        });
    }

    if raw.start_cmd.trim().is_empty() {
        errors.push(ValidationError::Project {
            name: key.to_string(),
            reason: "start_cmd must not be empty".to_string(),
        });
    }

    let idle_timeout = match raw.idle_timeout.as_deref() {
        None => None,
        Some(s) => match parse_duration_ms(s) {
            Ok(ms) => Some(ms),
            Err(e) => {
                errors.push(ValidationError::Project {
                    name: key.to_string(),
                    reason: format!("idle_timeout: {e}"),
                });
                None
            }
        },
    };

    let _ = settings; // reserved: per-project defaults are resolved by the supervisor/idle controller, not here.

    if errors.is_empty() {
        if let Some(name) = name {
            return Ok(ProjectConfig {
                name,
                cwd: expand_tilde(&raw.cwd),
                start_cmd: raw.start_cmd,
                idle_timeout,
                disabled: raw.disabled,
                aliases: raw.aliases,
            });
        }
    }
    Err(errors)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
