// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple = { "myapp.localhost", "myapp" },
    with_port = { "myapp.localhost:8080", "myapp" },
    uppercase = { "MyApp.localhost", "myapp" },
    bare_localhost = { "localhost", "" },
    bare_localhost_with_port = { "localhost:80", "" },
    non_localhost_host = { "example.com", "" },
    multi_label = { "a.b.localhost", "a.b" },
)]
fn extracts_expected_label(host_header: &str, expected: &str) {
    assert_eq!(subdomain_label(host_header), expected);
}
