// Run-wide statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::TestState;

/// Run statistics, maintained by the runner independently of any reporter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub suites: usize,
    pub tests: usize,
    pub passes: usize,
    pub failures: usize,
    pub pending: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub duration_ms: u64,
}

impl RunStats {
    /// Record the run start; later calls keep the first value
    pub fn mark_start(&mut self, at: DateTime<Utc>) {
        self.start.get_or_insert(at);
    }

    /// Record the run end and derive the duration
    pub fn mark_end(&mut self, at: DateTime<Utc>) {
        self.end = Some(at);
        if let Some(start) = self.start {
            self.duration_ms = (at - start).num_milliseconds().max(0) as u64;
        }
    }

    /// Count a finished test by its state
    pub fn record_test(&mut self, state: Option<TestState>) {
        match state {
            Some(TestState::Passed) => {
                self.tests += 1;
                self.passes += 1;
            }
            Some(TestState::Failed) => {
                self.tests += 1;
                self.failures += 1;
            }
            Some(TestState::Pending) => self.pending += 1,
            Some(TestState::NotExecuted) | None => {}
        }
    }
}
