// Events module - replays an NDJSON lifecycle event stream into a Run and a Reporter

pub mod wire;

pub use wire::WireEvent;

use std::collections::HashMap;
use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

use crate::report::Reporter;
use crate::runner::{Failure, Run, RunnerEvent};
use crate::state::{ScopeId, TestId};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("line {line}: invalid event: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: unknown suite `{id}`")]
    UnknownSuite { line: usize, id: String },

    #[error("line {line}: unknown test `{id}`")]
    UnknownTest { line: usize, id: String },

    #[error("line {line}: duplicate id `{id}`")]
    DuplicateId { line: usize, id: String },

    #[error("line {line}: fail event needs either `test` or `hook`")]
    MissingFailureOrigin { line: usize },

    #[error("line {line}: event after run_end")]
    AfterRunEnd { line: usize },

    #[error("line {line}: reporter failed: {message}")]
    Reporter { line: usize, message: String },

    #[error("failed to read event stream: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives a [`Run`] from decoded wire events
pub struct EventReplayer {
    run: Run,
    suites: HashMap<String, ScopeId>,
    tests: HashMap<String, TestId>,
    line: usize,
    finished: bool,
}

impl Default for EventReplayer {
    fn default() -> Self {
        Self::new(Run::default())
    }
}

impl EventReplayer {
    pub fn new(run: Run) -> Self {
        Self {
            run,
            suites: HashMap::new(),
            tests: HashMap::new(),
            line: 0,
            finished: false,
        }
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    pub fn into_run(self) -> Run {
        self.run
    }

    /// Whether `run_end` has been replayed
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Id of a test declared in the stream
    pub fn test_id(&self, id: &str) -> Option<TestId> {
        self.tests.get(id).copied()
    }

    /// Replay every line of `reader`
    pub fn replay<R: BufRead>(
        &mut self,
        reader: R,
        reporter: &mut dyn Reporter,
    ) -> Result<(), StreamError> {
        for line in reader.lines() {
            self.apply_line(&line?, reporter)?;
        }
        Ok(())
    }

    /// Decode and apply one line; blank lines are skipped
    pub fn apply_line(&mut self, line: &str, reporter: &mut dyn Reporter) -> Result<(), StreamError> {
        self.line += 1;
        if line.trim().is_empty() {
            return Ok(());
        }
        let event: WireEvent =
            serde_json::from_str(line).map_err(|source| StreamError::InvalidEvent {
                line: self.line,
                source,
            })?;
        self.apply(event, reporter)
    }

    /// End the run if the stream stopped before `run_end`
    pub fn finish(&mut self, reporter: &mut dyn Reporter) -> Result<(), StreamError> {
        if self.finished {
            return Ok(());
        }
        self.apply(WireEvent::RunEnd, reporter)
    }

    pub fn apply(&mut self, event: WireEvent, reporter: &mut dyn Reporter) -> Result<(), StreamError> {
        let line = self.line;
        if self.finished {
            return Err(StreamError::AfterRunEnd { line });
        }

        let runner_event = match event {
            WireEvent::RunStart => RunnerEvent::RunStart,
            WireEvent::Suite {
                id,
                title,
                parent,
                file,
            } => {
                if self.suites.contains_key(&id) {
                    return Err(StreamError::DuplicateId { line, id });
                }
                let parent = self.scope(parent.as_deref())?;
                let scope = self.run.tree.add_scope(parent, title);
                if file.is_some() {
                    self.run.tree.scope_mut(scope).file = file;
                }
                self.suites.insert(id, scope);
                return Ok(());
            }
            WireEvent::Test {
                id,
                title,
                suite,
                file,
                pending,
            } => {
                if self.tests.contains_key(&id) {
                    return Err(StreamError::DuplicateId { line, id });
                }
                let scope = self.scope(suite.as_deref())?;
                let test = self.run.tree.add_test(scope, title);
                let record = self.run.tree.test_mut(test);
                if file.is_some() {
                    record.file = file;
                }
                record.pending = pending;
                self.tests.insert(id, test);
                return Ok(());
            }
            WireEvent::TestStart { id } => RunnerEvent::TestStart(self.test(&id)?),
            WireEvent::TestEnd {
                id,
                state,
                duration_ms,
                error,
                attachments,
            } => {
                let test = self.test(&id)?;
                let record = self.run.tree.test_mut(test);
                record.state = Some(state);
                record.duration_ms = duration_ms;
                if error.is_some() {
                    record.error = error;
                }
                record.attachments = attachments;
                RunnerEvent::TestEnd(test)
            }
            WireEvent::Fail {
                test: Some(id),
                error,
                ..
            } => {
                let test = self.test(&id)?;
                self.run.tree.test_mut(test).error = Some(error.clone());
                RunnerEvent::Failure(Failure::test(test, error))
            }
            WireEvent::Fail {
                test: None,
                hook: Some(title),
                suite,
                error,
            } => {
                let scope = self.scope(suite.as_deref())?;
                RunnerEvent::Failure(Failure::step(title, scope, error))
            }
            WireEvent::Fail { .. } => return Err(StreamError::MissingFailureOrigin { line }),
            WireEvent::SuiteEnd { id } => RunnerEvent::ScopeEnd(self.scope(Some(&id))?),
            WireEvent::RunEnd => {
                self.finished = true;
                RunnerEvent::RunEnd
            }
        };

        debug!("line {}: {:?}", line, runner_event);
        self.run
            .dispatch(runner_event, reporter)
            .map_err(|e| StreamError::Reporter {
                line,
                message: format!("{:#}", e),
            })
    }

    fn scope(&self, id: Option<&str>) -> Result<ScopeId, StreamError> {
        match id {
            None => Ok(self.run.tree.root()),
            Some(id) => self
                .suites
                .get(id)
                .copied()
                .ok_or_else(|| StreamError::UnknownSuite {
                    line: self.line,
                    id: id.to_string(),
                }),
        }
    }

    fn test(&self, id: &str) -> Result<TestId, StreamError> {
        self.tests
            .get(id)
            .copied()
            .ok_or_else(|| StreamError::UnknownTest {
                line: self.line,
                id: id.to_string(),
            })
    }
}
