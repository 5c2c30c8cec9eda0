// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! User-facing progress output.

use chrono::{DateTime, Local};

use crate::error::RdsError;

/// Format used for "will check again at" times.
pub const CHECK_TIME_FORMAT: &str = "%H:%M:%S";

/// One non-available observation made by the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTick {
    pub instance_name: String,
    /// Status reported by the provider, e.g. "creating".
    pub status: String,
    /// 1-based number of the status check that produced this tick.
    pub attempt: u32,
    /// When the next status check is due.
    pub next_check_at: DateTime<Local>,
}

/// Sink for human-readable progress and failure messages.
///
/// Fire-and-forget: implementations must not fail.
pub trait ProgressReporter: Send + Sync {
    fn display_text(&self, message: &str);

    fn display_error(&self, error: &RdsError);

    /// Called once per non-available observation, before the poller sleeps.
    fn poll_pending(&self, tick: &PollTick) {
        self.display_text(&format!(
            "RDS instance {} is {}, will check again at {}",
            tick.instance_name,
            tick.status,
            tick.next_check_at.format(CHECK_TIME_FORMAT)
        ));
    }
}

/// Reporter that writes to the terminal.
///
/// Poll ticks go to the log rather than stdout; the command loop already
/// prints its own "not available yet" line on a timer.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter;

impl ProgressReporter for TerminalReporter {
    fn display_text(&self, message: &str) {
        println!("{}", message);
    }

    fn display_error(&self, error: &RdsError) {
        eprintln!("FAILED\n{}", error);
    }

    fn poll_pending(&self, tick: &PollTick) {
        tracing::info!(
            instance_name = %tick.instance_name,
            status = %tick.status,
            attempt = tick.attempt,
            next_check_at = %tick.next_check_at.format(CHECK_TIME_FORMAT),
            "Instance not available yet"
        );
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn display_text(&self, _message: &str) {}

    fn display_error(&self, _error: &RdsError) {}

    fn poll_pending(&self, _tick: &PollTick) {}
}
