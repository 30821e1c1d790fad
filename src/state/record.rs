// Test record - one per test case observed during the run

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{ScopeId, TestError, TestId, TestState};

/// Test record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRecord {
    pub id: TestId,
    pub title: String,
    pub scope: ScopeId,
    pub file: Option<PathBuf>,
    /// `None` until the runner resolves an outcome
    pub state: Option<TestState>,
    /// Declared as skipped before the run started
    pub pending: bool,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Duration as measured by the runner, when it reports one
    pub duration_ms: Option<u64>,
    pub error: Option<TestError>,
    pub attachments: Vec<PathBuf>,
}

impl TestRecord {
    pub(crate) fn new(id: TestId, scope: ScopeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            scope,
            file: None,
            state: None,
            pending: false,
            start: None,
            end: None,
            duration_ms: None,
            error: None,
            attachments: Vec::new(),
        }
    }

    /// Pending by resolved state, or declared skipped and never resolved
    pub fn is_pending(&self) -> bool {
        match self.state {
            Some(TestState::Pending) => true,
            None => self.pending,
            Some(_) => false,
        }
    }

    /// Duration in milliseconds: the runner's value, else end - start, else zero
    pub fn duration_ms(&self) -> u64 {
        if let Some(ms) = self.duration_ms {
            return ms;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as u64,
            _ => 0,
        }
    }

    /// Mark as passed
    pub fn pass(&mut self) {
        self.state = Some(TestState::Passed);
        self.error = None;
    }

    /// Mark as failed with the given error
    pub fn fail(&mut self, error: TestError) {
        self.state = Some(TestState::Failed);
        self.error = Some(error);
    }

    /// Mark as skipped
    pub fn skip(&mut self) {
        self.pending = true;
        self.state = Some(TestState::Pending);
    }
}
