// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lazydev-storage: WAL-backed durable state store for project runtime
//! state, metrics, and captured logs.

pub mod error;
pub mod materialized;
pub mod op;
pub mod snapshot;
pub mod store;
pub mod wal;

pub use error::{SnapshotError, StoreError, WalError};
pub use materialized::{MaterializedState, LOG_RETENTION_CAP};
pub use op::StoreOp;
pub use snapshot::{Snapshot, CURRENT_SNAPSHOT_VERSION};
pub use store::StateStore;
pub use wal::{Wal, WalEntry};
