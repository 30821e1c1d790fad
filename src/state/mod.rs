// State module - Test-run model
// The object graph a test runner exposes to reporters: scopes, tests and run statistics

pub mod metrics;
pub mod record;
pub mod tree;

pub use metrics::RunStats;
pub use record::TestRecord;
pub use tree::{Scope, ScopeId, SuiteTree, TestId};

use serde::{Deserialize, Serialize};

/// Final state of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestState {
    Passed,
    Failed,
    Pending,
    NotExecuted,
}

impl TestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::NotExecuted => "not_executed",
        }
    }
}

impl std::fmt::Display for TestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error attached to a failed test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl TestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serde_names() {
        let json = serde_json::to_string(&TestState::NotExecuted).unwrap();
        assert_eq!(json, "\"not_executed\"");

        let state: TestState = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(state, TestState::Pending);
    }

    #[test]
    fn test_error_builder() {
        let err = TestError::new("boom").with_stack("at foo.js:1");
        assert_eq!(err.message, "boom");
        assert_eq!(err.stack.as_deref(), Some("at foo.js:1"));
    }
}
