//! Hooks invoked as a workflow run progresses.
//!
//! Observers see every step transition in order. They cannot influence the
//! run; they exist for logging and progress reporting.

use bragi_types::{TaskKind, WorkflowStep};
use tracing::{debug, info, warn};

/// Progress callbacks for a workflow run. Every hook defaults to a no-op.
pub trait WorkflowObserver: Send + Sync {
    /// A run was assigned an execution id and is about to start its first step.
    fn run_started(&self, _kind: TaskKind, _execution_id: &str) {}

    /// `step` just moved to `running`.
    fn step_started(&self, _execution_id: &str, _step: &WorkflowStep) {}

    /// `step` just moved to `completed` or `failed`.
    fn step_finished(&self, _execution_id: &str, _step: &WorkflowStep) {}

    /// The run returned its envelope.
    fn run_finished(&self, _kind: TaskKind, _execution_id: &str, _success: bool, _duration_ms: u64) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}

/// Observer that emits structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl WorkflowObserver for TracingObserver {
    fn run_started(&self, kind: TaskKind, execution_id: &str) {
        info!(task = %kind, execution_id, "workflow started");
    }

    fn step_started(&self, execution_id: &str, step: &WorkflowStep) {
        debug!(execution_id, step = %step.name, "step started");
    }

    fn step_finished(&self, execution_id: &str, step: &WorkflowStep) {
        let elapsed_ms = step.elapsed_ms().unwrap_or_default();
        match &step.error {
            Some(error) => warn!(execution_id, step = %step.name, elapsed_ms, error = %error, "step failed"),
            None => debug!(execution_id, step = %step.name, elapsed_ms, "step completed"),
        }
    }

    fn run_finished(&self, kind: TaskKind, execution_id: &str, success: bool, duration_ms: u64) {
        if success {
            info!(task = %kind, execution_id, duration_ms, "workflow completed");
        } else {
            warn!(task = %kind, execution_id, duration_ms, "workflow failed");
        }
    }
}
