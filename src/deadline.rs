// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Whole-operation time limit for `-m`

use std::time::Duration;

use tokio::task::JoinHandle;

/// Exit status used when the operation runs out of time
pub const TIMEOUT_EXIT_CODE: i32 = 28;

/// Terminate the process once `limit` has elapsed
///
/// Abort the returned handle to cancel the deadline.
pub fn spawn_deadline(limit: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(limit).await;
        tracing::error!(
            "Operation timed out after {} milliseconds, aborting",
            limit.as_millis()
        );
        std::process::exit(TIMEOUT_EXIT_CODE);
    })
}
