//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use core::cell::Cell;

use crate::*;

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    /// Clock starting at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Touch device that replays queued reports
pub struct MockTouchDevice {
    info: TouchInfo,
    reports: heapless::Deque<TouchReport, 16>,
    polls: usize,
}

impl MockTouchDevice {
    /// Create an empty mock with the given capabilities
    pub fn new(info: TouchInfo) -> Self {
        Self {
            info,
            reports: heapless::Deque::new(),
            polls: 0,
        }
    }

    /// Queue a report for a later poll. Returns `false` if the queue is full.
    pub fn push_report(&mut self, report: TouchReport) -> bool {
        self.reports.push_back(report).is_ok()
    }

    /// Number of polls served so far
    pub fn poll_count(&self) -> usize {
        self.polls
    }
}

impl TouchDevice for MockTouchDevice {
    type Error = core::convert::Infallible;

    async fn poll(&mut self) -> Result<TouchReport, Self::Error> {
        self.polls = self.polls.saturating_add(1);
        Ok(self.reports.pop_front().unwrap_or_default())
    }

    fn info(&self) -> TouchInfo {
        self.info
    }
}
