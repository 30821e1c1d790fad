// Report module - TRX reporting

pub mod attachments;
pub mod convert;
pub mod identity;
pub mod output;
pub mod trx_reporter;

use crate::runner::{Failure, Run};
use crate::state::{ScopeId, TestId};
use anyhow::Result;
pub use identity::RunIdentity;
pub use output::ReportDestination;
pub use trx_reporter::{RunSummary, StepFailure, TrxReporter};

/// Reporter trait
///
/// Callbacks run synchronously on the runner's thread, in event order.
pub trait Reporter {
    /// Called once before any test runs
    fn on_run_start(&mut self, _run: &Run) {}

    /// Called when a test starts
    fn on_test_start(&mut self, run: &mut Run, test: TestId);

    /// Called when a test finishes; its state is already set
    fn on_test_end(&mut self, run: &mut Run, test: TestId);

    /// Called when a test body or a setup/teardown step fails
    fn on_failure(&mut self, run: &Run, failure: &Failure);

    /// Called when a scope and everything nested in it has finished
    fn on_scope_end(&mut self, run: &mut Run, scope: ScopeId);

    /// Called when the entire run finishes
    fn on_run_end(&mut self, run: &mut Run) -> Result<()>;
}
