// Runner - the object reporters observe
// Owns the suite tree and run statistics and forwards lifecycle events to a reporter

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::report::Reporter;
use crate::state::{RunStats, ScopeId, SuiteTree, TestError, TestId, TestRecord};
use crate::time::{Clock, SystemClock};

/// Lifecycle events, in the order a sequential runner emits them
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    RunStart,
    TestStart(TestId),
    TestEnd(TestId),
    Failure(Failure),
    ScopeEnd(ScopeId),
    RunEnd,
}

/// Where a failure was raised
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOrigin {
    /// Inside a test body
    Test(TestId),
    /// Inside a setup/teardown step (hook, fixture) attached to `scope`
    Step { title: String, scope: ScopeId },
}

/// A failure reported by the runner
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub origin: FailureOrigin,
    pub error: TestError,
}

impl Failure {
    pub fn test(test: TestId, error: TestError) -> Self {
        Self {
            origin: FailureOrigin::Test(test),
            error,
        }
    }

    pub fn step(title: impl Into<String>, scope: ScopeId, error: TestError) -> Self {
        Self {
            origin: FailureOrigin::Step {
                title: title.into(),
                scope,
            },
            error,
        }
    }
}

/// Statistics and reported tests captured when the run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub stats: RunStats,
    pub tests: Vec<TestRecord>,
}

/// One test run
pub struct Run {
    pub tree: SuiteTree,
    stats: RunStats,
    results: Option<RunSnapshot>,
    clock: Box<dyn Clock>,
}

impl Default for Run {
    fn default() -> Self {
        Self::new(SuiteTree::new())
    }
}

impl Run {
    pub fn new(tree: SuiteTree) -> Self {
        Self::with_clock(tree, Box::new(SystemClock))
    }

    pub fn with_clock(tree: SuiteTree, clock: Box<dyn Clock>) -> Self {
        Self {
            tree,
            stats: RunStats::default(),
            results: None,
            clock,
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Snapshot left behind by the reporter at run end
    pub fn results(&self) -> Option<&RunSnapshot> {
        self.results.as_ref()
    }

    pub fn attach_results(&mut self, snapshot: RunSnapshot) {
        self.results = Some(snapshot);
    }

    /// Update statistics for `event`, then hand it to `reporter`
    pub fn dispatch(&mut self, event: RunnerEvent, reporter: &mut dyn Reporter) -> Result<()> {
        let now = self.clock.now();
        debug!("dispatch {:?}", event);

        match event {
            RunnerEvent::RunStart => {
                self.stats.mark_start(now);
                reporter.on_run_start(self);
            }
            RunnerEvent::TestStart(test) => {
                self.stats.mark_start(now);
                reporter.on_test_start(self, test);
            }
            RunnerEvent::TestEnd(test) => {
                self.stats.record_test(self.tree.test(test).state);
                reporter.on_test_end(self, test);
            }
            RunnerEvent::Failure(failure) => {
                reporter.on_failure(self, &failure);
            }
            RunnerEvent::ScopeEnd(scope) => {
                if !self.tree.is_root(scope) {
                    self.stats.suites += 1;
                }
                reporter.on_scope_end(self, scope);
            }
            RunnerEvent::RunEnd => {
                self.stats.mark_end(now);
                return reporter.on_run_end(self);
            }
        }

        Ok(())
    }
}
