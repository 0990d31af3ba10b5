//! Step bookkeeping for a single run.

use bragi_types::{TaskKind, WorkflowStep};
use chrono::Utc;

use crate::{WorkflowError, WorkflowObserver};

/// Owns the step list of one run and reports every transition.
///
/// Steps are addressed by their index in the task kind's step table. A step
/// that never begins stays `pending`, which is how steps after a failure are
/// reported.
pub(crate) struct StepTracker<'a> {
    execution_id: &'a str,
    observer: &'a dyn WorkflowObserver,
    steps: Vec<WorkflowStep>,
}

impl<'a> StepTracker<'a> {
    pub(crate) fn new(kind: TaskKind, execution_id: &'a str, observer: &'a dyn WorkflowObserver) -> Self {
        Self {
            execution_id,
            observer,
            steps: kind.step_names().into_iter().map(WorkflowStep::pending).collect(),
        }
    }

    /// Move step `index` to `running`.
    pub(crate) fn begin(&mut self, index: usize) -> Result<(), WorkflowError> {
        let step = self.step_mut(index)?;
        step.start(Utc::now())?;
        let step = &self.steps[index];
        self.observer.step_started(self.execution_id, step);
        Ok(())
    }

    /// Record the outcome of a running step and pass it through.
    pub(crate) fn settle<T>(&mut self, index: usize, outcome: Result<T, WorkflowError>) -> Result<T, WorkflowError> {
        let now = Utc::now();
        let step = self.step_mut(index)?;
        match &outcome {
            Ok(_) => step.complete(now)?,
            Err(error) => step.fail(now, error.to_string())?,
        }
        let step = &self.steps[index];
        self.observer.step_finished(self.execution_id, step);
        outcome
    }

    /// Run a synchronous step from start to finish.
    pub(crate) fn run<T>(&mut self, index: usize, body: impl FnOnce() -> Result<T, WorkflowError>) -> Result<T, WorkflowError> {
        self.begin(index)?;
        let outcome = body();
        self.settle(index, outcome)
    }

    pub(crate) fn into_steps(self) -> Vec<WorkflowStep> {
        self.steps
    }

    fn step_mut(&mut self, index: usize) -> Result<&mut WorkflowStep, WorkflowError> {
        let count = self.steps.len();
        self.steps.get_mut(index).ok_or_else(|| WorkflowError::Unexpected {
            message: format!("step index {index} out of range for {count} steps"),
        })
    }
}
