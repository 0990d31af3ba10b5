//! Task pipelines.
//!
//! Every task kind runs the same four-step shape:
//!
//! 1. `validate-input`, shared and driven by the task kind's input rule
//! 2. a local pre-processing step ([`TaskPipeline::prepare`])
//! 3. the text-generation step, using [`TaskPipeline::prompt`] and decoding
//!    the answer into [`TaskPipeline::Draft`]
//! 4. a local post-processing step ([`TaskPipeline::finish`])
//!
//! The executor owns the sequencing and step bookkeeping; a pipeline only
//! supplies the task-specific pieces.

use bragi_types::TaskKind;
use serde::de::DeserializeOwned;

use crate::WorkflowError;

pub mod catch_up;
pub mod explain;
pub mod rewrite;

pub use catch_up::CatchUpPipeline;
pub use explain::{Category, ExplainPipeline};
pub use rewrite::{RewritePipeline, ToneSignals};

/// Task-specific pieces of a workflow run.
pub trait TaskPipeline: Send + Sync {
    /// Result of the pre-processing step, carried to the later steps.
    type Prepared: Send + Sync;
    /// Shape the model response is decoded into. Fields should be optional.
    type Draft: DeserializeOwned + Send;
    /// Final, fully defaulted output.
    type Output: Send;

    /// Which step table and model configuration this pipeline uses.
    fn kind(&self) -> TaskKind;

    /// The text checked by `validate-input`.
    fn primary_input(&self) -> &str;

    /// Extra checks on secondary inputs, run after the length check.
    fn validate_secondary(&self) -> Result<(), WorkflowError> {
        Ok(())
    }

    /// Step 2. Must be pure and synchronous.
    fn prepare(&self) -> Result<Self::Prepared, WorkflowError>;

    /// Instruction sent to the text generator in step 3.
    fn prompt(&self, prepared: &Self::Prepared) -> String;

    /// Step 4. Fill defaults and enforce output invariants.
    fn finish(&self, prepared: Self::Prepared, draft: Self::Draft) -> Result<Self::Output, WorkflowError>;
}

/// List field of a model draft. The field and any entry may be `null`.
pub type DraftList<T> = Option<Vec<Option<T>>>;

/// Collect the non-null entries of a draft list.
pub(crate) fn present_entries<T>(list: DraftList<T>) -> Vec<T> {
    list.unwrap_or_default().into_iter().flatten().collect()
}
