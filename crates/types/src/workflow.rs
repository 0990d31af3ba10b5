//! Step and envelope models shared by the workflow engine and its callers.
//!
//! A workflow run owns an ordered list of [`WorkflowStep`]s, one per entry in
//! the task kind's step table. Steps move `pending -> running -> completed`
//! or `pending -> running -> failed`; the transition helpers on
//! [`WorkflowStep`] reject anything else so a step can never regress.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod validation;

/// The three task kinds the executor knows how to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Summarise a conversation the reader missed.
    CatchUp,
    /// Rewrite a message toward a requested intent.
    Rewrite,
    /// Explain a complex document in plain language.
    Explain,
}

impl TaskKind {
    /// All task kinds in a stable order.
    pub const ALL: [TaskKind; 3] = [TaskKind::CatchUp, TaskKind::Rewrite, TaskKind::Explain];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::CatchUp => "catch-up",
            TaskKind::Rewrite => "rewrite",
            TaskKind::Explain => "explain",
        }
    }

    /// The fixed, ordered step table for this task kind.
    pub fn step_names(&self) -> [&'static str; 4] {
        match self {
            TaskKind::CatchUp => ["validate-input", "preprocess-content", "ai-analysis", "format-results"],
            TaskKind::Rewrite => ["validate-input", "analyze-tone", "ai-rewrite", "quality-check"],
            TaskKind::Explain => ["validate-input", "detect-category", "ai-explanation", "add-disclaimers"],
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "catch-up" => Ok(TaskKind::CatchUp),
            "rewrite" => Ok(TaskKind::Rewrite),
            "explain" => Ok(TaskKind::Explain),
            other => Err(format!("unknown task kind '{other}'")),
        }
    }
}

/// Lifecycle status of a single workflow step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStepStatus {
    /// Not started yet. Steps after a failure stay here.
    #[default]
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl WorkflowStepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStepStatus::Pending => "pending",
            WorkflowStepStatus::Running => "running",
            WorkflowStepStatus::Completed => "completed",
            WorkflowStepStatus::Failed => "failed",
        }
    }

    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStepStatus::Completed | WorkflowStepStatus::Failed)
    }
}

impl fmt::Display for WorkflowStepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected step lifecycle transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("step '{step}' cannot move from {from} to {to}")]
pub struct StepTransitionError {
    pub step: String,
    pub from: WorkflowStepStatus,
    pub to: WorkflowStepStatus,
}

/// A named unit of work within a workflow run, with its own status and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub name: String,
    pub status: WorkflowStepStatus,
    /// Set when the step enters `running`.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Set when the step leaves `running`.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Present only when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowStep {
    /// Create a step in the `pending` state.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: WorkflowStepStatus::Pending,
            start_time: None,
            end_time: None,
            error: None,
        }
    }

    /// Move a pending step to `running`, stamping its start time.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), StepTransitionError> {
        self.transition(WorkflowStepStatus::Pending, WorkflowStepStatus::Running)?;
        self.start_time = Some(at);
        Ok(())
    }

    /// Move a running step to `completed`, stamping its end time.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), StepTransitionError> {
        self.transition(WorkflowStepStatus::Running, WorkflowStepStatus::Completed)?;
        self.end_time = Some(self.clamped_end(at));
        Ok(())
    }

    /// Move a running step to `failed`, recording the error message.
    pub fn fail(&mut self, at: DateTime<Utc>, error: impl Into<String>) -> Result<(), StepTransitionError> {
        self.transition(WorkflowStepStatus::Running, WorkflowStepStatus::Failed)?;
        self.end_time = Some(self.clamped_end(at));
        self.error = Some(error.into());
        Ok(())
    }

    /// Milliseconds spent running, once the step has finished.
    pub fn elapsed_ms(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }

    fn transition(&mut self, expected: WorkflowStepStatus, next: WorkflowStepStatus) -> Result<(), StepTransitionError> {
        if self.status != expected {
            return Err(StepTransitionError {
                step: self.name.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    // Wall clocks can step backwards; an end time never precedes the start.
    fn clamped_end(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        match self.start_time {
            Some(start) if at < start => start,
            _ => at,
        }
    }
}

/// Uniform success/failure envelope returned by every workflow run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionResult<T> {
    /// True iff every step completed.
    pub success: bool,
    /// Task output, present iff `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable cause, present iff not `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_id: String,
    /// Final state of every step in declaration order.
    pub steps: Vec<WorkflowStep>,
    /// Wall-clock milliseconds from invocation to return.
    pub duration: u64,
}

impl<T> WorkflowExecutionResult<T> {
    pub fn succeeded(execution_id: String, data: T, steps: Vec<WorkflowStep>, duration: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            execution_id,
            steps,
            duration,
        }
    }

    pub fn failed(execution_id: String, error: impl Into<String>, steps: Vec<WorkflowStep>, duration: u64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            execution_id,
            steps,
            duration,
        }
    }

    /// The step that failed, if any.
    pub fn failed_step(&self) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.status == WorkflowStepStatus::Failed)
    }

    /// Transform the payload while keeping the envelope intact.
    pub fn map_data<U>(self, transform: impl FnOnce(T) -> U) -> WorkflowExecutionResult<U> {
        WorkflowExecutionResult {
            success: self.success,
            data: self.data.map(transform),
            error: self.error,
            execution_id: self.execution_id,
            steps: self.steps,
            duration: self.duration,
        }
    }
}
