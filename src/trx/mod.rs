// TRX document model
//
// The root element of a TRX report is a [`TestRun`]. A [`TestRun`] carries run metadata
// (name, user, settings, [`Times`]) and one [`UnitTestResult`] per reported test. The
// `TestDefinitions`, `TestEntries`, `TestLists` and `ResultSummary` sections are derived from
// the results when the document is serialized.

mod serialize;

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const TRX_NAMESPACE: &str = "http://microsoft.com/schemas/VisualStudio/TeamTest/2010";
/// Test type GUID of MSTest unit tests
pub const UNIT_TEST_TYPE: &str = "13cdc9d9-ddb5-4fa4-a97d-d965ccfc6d4b";
pub const RESULTS_NOT_IN_A_LIST_ID: &str = "8c84fa94-04c1-424b-9868-57a2d4851a1d";
pub const ALL_LOADED_RESULTS_ID: &str = "19431567-8539-422a-85d7-44ee4e166bda";
pub const ADAPTER_TYPE_NAME: &str = "executor://trx-reporter/v1";
pub const DEFAULT_SETTINGS_NAME: &str = "Default";

/// Outcome of a single result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    NotExecuted,
    Pending,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::NotExecuted => "NotExecuted",
            Self::Pending => "Pending",
        }
    }
}

/// Run-level timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct Times {
    pub creation: DateTime<Utc>,
    pub queuing: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSettings {
    pub id: Uuid,
    pub name: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_SETTINGS_NAME.to_string(),
        }
    }
}

/// Definition of the test a result belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTest {
    pub id: Uuid,
    /// Fully qualified name
    pub name: String,
    pub method_name: String,
    pub class_name: String,
    pub code_base: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub message: String,
    pub stack_trace: Option<String>,
}

/// One executed (or not executed) test
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTestResult {
    pub test: UnitTest,
    pub execution_id: Uuid,
    pub computer_name: String,
    pub outcome: Outcome,
    pub duration: Duration,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub error: Option<ErrorInfo>,
    /// Directory under `<report>/In/` holding this result's files
    pub relative_results_directory: Option<String>,
    /// File names relative to the results directory
    pub result_files: Vec<String>,
}

impl UnitTestResult {
    /// Results directory, defaulting to the execution id when unset
    pub fn ensure_results_directory(&mut self) -> &str {
        let execution_id = self.execution_id;
        self.relative_results_directory
            .get_or_insert_with(|| execution_id.to_string())
    }

    pub fn add_result_file(&mut self, path: impl Into<String>) {
        self.result_files.push(path.into());
    }
}

/// Result counters for `ResultSummary`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_executed: usize,
    pub pending: usize,
}

/// TRX report document
#[derive(Debug, Clone, PartialEq)]
pub struct TestRun {
    pub id: Uuid,
    pub name: String,
    pub run_user: String,
    pub settings: TestSettings,
    pub times: Times,
    pub results: Vec<UnitTestResult>,
}

impl TestRun {
    pub fn new(name: impl Into<String>, run_user: impl Into<String>, times: Times) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            run_user: run_user.into(),
            settings: TestSettings::default(),
            times,
            results: Vec::new(),
        }
    }

    /// Append a result. A test id already used in this document is re-derived from the
    /// occurrence number, so repeated titles keep stable but distinct definitions.
    pub fn add_result(&mut self, mut result: UnitTestResult) {
        let base = result.test.id;
        let mut occurrence = 1u32;
        while self.results.iter().any(|r| r.test.id == result.test.id) {
            result.test.id = Uuid::new_v5(&base, occurrence.to_string().as_bytes());
            occurrence += 1;
        }
        self.results.push(result);
    }

    pub fn counters(&self) -> Counters {
        let mut counters = Counters {
            total: self.results.len(),
            ..Counters::default()
        };
        for result in &self.results {
            match result.outcome {
                Outcome::Passed => counters.passed += 1,
                Outcome::Failed => counters.failed += 1,
                Outcome::NotExecuted => counters.not_executed += 1,
                Outcome::Pending => counters.pending += 1,
            }
        }
        counters.executed = counters.passed + counters.failed;
        counters
    }

    /// `Failed` if any result failed, `Completed` otherwise
    pub fn summary_outcome(&self) -> &'static str {
        if self.results.iter().any(|r| r.outcome == Outcome::Failed) {
            "Failed"
        } else {
            "Completed"
        }
    }
}

/// TimeSpan notation used by TRX: `hh:mm:ss.fffffff`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        duration.subsec_nanos() / 100
    )
}
