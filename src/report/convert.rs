// Map a test record onto a TRX result

use std::path::Path;
use std::time::Duration;

use uuid::Uuid;

use crate::config::ReporterOptions;
use crate::state::{SuiteTree, TestRecord, TestState};
use crate::trx::{ErrorInfo, Outcome, UnitTest, UnitTestResult};
use crate::utils::FileUtils;

/// TRX outcome for a test state
pub fn outcome_for(state: Option<TestState>, options: &ReporterOptions) -> Outcome {
    match state {
        Some(TestState::Passed) => Outcome::Passed,
        Some(TestState::Failed) => Outcome::Failed,
        Some(TestState::Pending) if options.treat_pending_as_not_executed => Outcome::NotExecuted,
        Some(TestState::Pending) => Outcome::Pending,
        Some(TestState::NotExecuted) | None => Outcome::NotExecuted,
    }
}

/// Build the result entry for one test
pub fn test_to_result(
    record: &TestRecord,
    tree: &SuiteTree,
    computer_name: &str,
    cwd: &Path,
    options: &ReporterOptions,
) -> UnitTestResult {
    let full_title = tree.full_title(record.id);
    let code_base = record
        .file
        .as_deref()
        .map(|file| FileUtils::relative_to(file, cwd))
        .unwrap_or_default();

    let class_name = match tree.scope_full_title(record.scope) {
        scope if !scope.is_empty() => scope,
        _ => record
            .file
            .as_deref()
            .and_then(|f| f.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Root".to_string()),
    };

    // Stable across runs so viewers can track history per test
    let test_id = Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{}::{}", code_base, full_title).as_bytes(),
    );

    // Declared-skipped tests can arrive without a resolved state
    let state = if record.is_pending() {
        Some(TestState::Pending)
    } else {
        record.state
    };

    UnitTestResult {
        test: UnitTest {
            id: test_id,
            name: full_title,
            method_name: record.title.clone(),
            class_name,
            code_base,
        },
        execution_id: Uuid::new_v4(),
        computer_name: computer_name.to_string(),
        outcome: outcome_for(state, options),
        duration: Duration::from_millis(record.duration_ms()),
        start_time: record.start,
        end_time: record.end,
        error: record.error.as_ref().map(|e| ErrorInfo {
            message: e.message.clone(),
            stack_trace: e.stack.clone(),
        }),
        relative_results_directory: None,
        result_files: Vec::new(),
    }
}
