// TRX reporter - accumulates finished tests and writes one TRX document at run end

use std::path::PathBuf;

use anyhow::Result;
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use super::Reporter;
use super::attachments::relocate_attachments;
use super::convert::test_to_result;
use super::identity::RunIdentity;
use super::output::{ReportDestination, resolve_output_path, write_report};
use crate::config::{ENV_TRX_REPORTER_FILE, ReporterOptions};
use crate::runner::{Failure, FailureOrigin, Run, RunSnapshot};
use crate::state::{ScopeId, TestError, TestId, TestState};
use crate::time::{Clock, SystemClock};
use crate::trx::{TestRun, Times};

/// A setup/teardown step failure not yet resolved by its scope ending
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub title: String,
    pub scope: ScopeId,
    pub error: TestError,
}

/// Outcome of writing the report
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub destination: ReportDestination,
    /// The serialized TRX document
    pub document: String,
    pub results: usize,
    pub excluded_pending: usize,
    pub warnings: Vec<String>,
}

/// TRX reporter
pub struct TrxReporter {
    options: ReporterOptions,
    env_output: Option<String>,
    identity: RunIdentity,
    cwd: PathBuf,
    clock: Box<dyn Clock>,
    tests: IndexSet<TestId>,
    step_failure: Option<StepFailure>,
    summary: Option<RunSummary>,
}

impl TrxReporter {
    /// Create new TRX reporter. The output fallback is read from the environment here.
    pub fn new(options: ReporterOptions) -> Self {
        Self {
            options,
            env_output: std::env::var(ENV_TRX_REPORTER_FILE).ok(),
            identity: RunIdentity::detect(),
            cwd: std::env::current_dir().unwrap_or_default(),
            clock: Box::new(SystemClock),
            tests: IndexSet::new(),
            step_failure: None,
            summary: None,
        }
    }

    /// Override the environment fallback for the output path
    pub fn with_env_output(mut self, env_output: Option<String>) -> Self {
        self.env_output = env_output;
        self
    }

    pub fn with_identity(mut self, identity: RunIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Directory test file paths are made relative to
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &ReporterOptions {
        &self.options
    }

    /// Reported tests in accumulation order
    pub fn accumulated(&self) -> impl Iterator<Item = TestId> + '_ {
        self.tests.iter().copied()
    }

    pub fn pending_step_failure(&self) -> Option<&StepFailure> {
        self.step_failure.as_ref()
    }

    /// Summary of the last written report
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Mark every unresolved test under the failed step's scope as failed
    fn resolve_step_failure(&mut self, run: &mut Run, step: StepFailure) {
        let scope_title = run.tree.scope_full_title(step.scope);
        let error = step_failure_error(&step, &scope_title);

        for test in run.tree.each_test(step.scope) {
            let record = run.tree.test_mut(test);
            if matches!(record.state, None | Some(TestState::Pending)) {
                debug!("{} failed by step \"{}\"", record.title, step.title);
                record.fail(error.clone());
                self.tests.insert(test);
            }
        }
    }

    /// Build the TRX document from the accumulated tests and write it out
    pub fn finish(&mut self, run: &mut Run) -> Result<RunSummary> {
        let now = self.clock.now();

        let snapshot = RunSnapshot {
            stats: run.stats().clone(),
            tests: self.tests.iter().map(|id| run.tree.test(*id).clone()).collect(),
        };
        run.attach_results(snapshot);

        let stats = run.stats();
        let times = Times {
            creation: now,
            queuing: now,
            start: stats.start.unwrap_or(now),
            finish: stats.end.unwrap_or(now),
        };
        let mut document = TestRun::new(
            self.identity.run_name(&now),
            self.identity.user.clone(),
            times,
        );

        let output = resolve_output_path(self.options.output.as_deref(), self.env_output.as_deref());

        let mut excluded_pending = 0;
        for id in &self.tests {
            let record = run.tree.test(*id);
            if self.options.exclude_pending && record.is_pending() {
                excluded_pending += 1;
                continue;
            }

            let mut result =
                test_to_result(record, &run.tree, &self.identity.host, &self.cwd, &self.options);
            if let Some(path) = &output {
                relocate_attachments(&mut result, &record.attachments, path);
            }
            document.add_result(result);
        }

        let mut warnings = Vec::new();
        if excluded_pending > 0 && self.options.warn_excluded_pending {
            let message = excluded_pending_warning(excluded_pending);
            warn!("{}", message);
            warnings.push(message);
        }

        let xml = document.to_xml()?;
        let destination = match output {
            Some(path) => ReportDestination::File(path),
            None => ReportDestination::Stdout,
        };
        write_report(&destination, &xml)?;

        if let ReportDestination::File(path) = &destination {
            info!("TRX report written to {}", path.display());
        }

        Ok(RunSummary {
            destination,
            document: xml,
            results: document.results.len(),
            excluded_pending,
            warnings,
        })
    }
}

/// Error given to tests that never ran because a step in their scope failed
fn step_failure_error(step: &StepFailure, scope_title: &str) -> TestError {
    let mut message = format!("{} failed in \"{}\"", step.title, scope_title);
    if !step.error.message.is_empty() {
        message.push_str(": ");
        message.push_str(&step.error.message);
    }
    TestError {
        message,
        stack: step.error.stack.clone(),
    }
}

pub fn excluded_pending_warning(count: usize) -> String {
    if count == 1 {
        "1 pending test was excluded from the TRX report".to_string()
    } else {
        format!("{} pending tests were excluded from the TRX report", count)
    }
}

impl Reporter for TrxReporter {
    fn on_test_start(&mut self, run: &mut Run, test: TestId) {
        run.tree.test_mut(test).start = Some(self.clock.now());
    }

    fn on_test_end(&mut self, run: &mut Run, test: TestId) {
        run.tree.test_mut(test).end = Some(self.clock.now());
        self.tests.insert(test);
    }

    fn on_failure(&mut self, _run: &Run, failure: &Failure) {
        if let FailureOrigin::Step { title, scope } = &failure.origin {
            debug!("step \"{}\" failed", title);
            self.step_failure = Some(StepFailure {
                title: title.clone(),
                scope: *scope,
                error: failure.error.clone(),
            });
        }
    }

    fn on_scope_end(&mut self, run: &mut Run, scope: ScopeId) {
        match self.step_failure.take() {
            Some(step) if step.scope == scope => self.resolve_step_failure(run, step),
            other => self.step_failure = other,
        }
    }

    fn on_run_end(&mut self, run: &mut Run) -> Result<()> {
        let summary = self.finish(run)?;
        self.summary = Some(summary);
        Ok(())
    }
}
