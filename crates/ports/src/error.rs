// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from the port allocator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("no available ports in range [{min}, {max}]")]
    NoPortsAvailable { min: u16, max: u16 },
}
