// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple       = { "alpha", true },
    with_digits  = { "alpha2", true },
    with_dash    = { "my-app", true },
    single_char  = { "a", true },
    leading_digit = { "2alpha", false },
    leading_dash  = { "-alpha", false },
    uppercase    = { "Alpha", false },
    empty        = { "", false },
    underscore   = { "my_app", false },
    dot          = { "my.app", false },
)]
fn parse_validates_label(input: &str, expect_ok: bool) {
    assert_eq!(ProjectName::parse(input).is_ok(), expect_ok);
}

#[test]
fn parse_rejects_over_63_bytes() {
    let long = format!("a{}", "b".repeat(63));
    assert!(ProjectName::parse(long).is_err());
}

#[test]
fn parse_accepts_exactly_63_bytes() {
    let label = format!("a{}", "b".repeat(62));
    assert_eq!(label.len(), 63);
    assert!(ProjectName::parse(label).is_ok());
}

#[test]
fn display_round_trips_input() {
    let name = ProjectName::parse("alpha").unwrap();
    assert_eq!(name.to_string(), "alpha");
    assert_eq!(name.as_str(), "alpha");
}
