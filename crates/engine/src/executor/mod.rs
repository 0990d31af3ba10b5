//! Execution engine: drives a [`TaskPipeline`] through its four steps and
//! packages the outcome in a [`WorkflowExecutionResult`].
//!
//! - `validate-input` applies the task kind's input rule
//! - the pre-processing and post-processing steps are delegated to the pipeline
//! - the generation step calls the injected [`TextGenerator`]
//!
//! The executor never returns an error. Every failure is recorded on the
//! step that raised it and surfaced through the envelope.

use std::sync::Arc;
use std::time::Instant;

use bragi_types::workflow::validation::validate_primary_input;
use bragi_types::{
    CatchUpResult, ExplainResult, ModelConfig, RewriteResult, TaskKind, UserContext, WorkflowExecutionResult,
};
use bragi_util::trimmed_char_count;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::workflow::{CatchUpPipeline, ExplainPipeline, RewritePipeline, TaskPipeline};
use crate::{TextGenerator, TracingObserver, WorkflowError, WorkflowObserver};

mod tracker;
pub mod types;

use tracker::StepTracker;
pub use types::{TaskOutput, TaskRequest};

/// Index of each step within a task kind's step table.
const VALIDATE_STEP: usize = 0;
const PREPARE_STEP: usize = 1;
const GENERATE_STEP: usize = 2;
const FINISH_STEP: usize = 3;

/// Runs workflows against an injected text generator.
///
/// Cheap to clone; clones share the generator and observer.
#[derive(Clone)]
pub struct WorkflowExecutor {
    generator: Arc<dyn TextGenerator>,
    observer: Arc<dyn WorkflowObserver>,
    model: Option<String>,
}

impl WorkflowExecutor {
    /// Create an executor that logs progress through `tracing`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            observer: Arc::new(TracingObserver),
            model: None,
        }
    }

    /// Replace the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use `model` for every task kind instead of the default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sampling configuration sent with the generation step of `kind`.
    pub fn config_for(&self, kind: TaskKind) -> ModelConfig {
        let config = ModelConfig::for_task(kind);
        match &self.model {
            Some(model) => config.with_model(model.clone()),
            None => config,
        }
    }

    /// Whether the text generator's backing service is reachable.
    pub async fn health_check(&self) -> bool {
        self.generator.health_check().await
    }

    /// Run any task kind.
    pub async fn run(&self, request: TaskRequest, context: Option<&UserContext>) -> WorkflowExecutionResult<TaskOutput> {
        match request {
            TaskRequest::CatchUp { text } => self
                .execute(&CatchUpPipeline::new(text), context)
                .await
                .map_data(TaskOutput::from),
            TaskRequest::Rewrite { text, intent } => self
                .execute(&RewritePipeline::new(text, intent), context)
                .await
                .map_data(TaskOutput::from),
            TaskRequest::Explain { text, category } => self
                .execute(&ExplainPipeline::new(text, category), context)
                .await
                .map_data(TaskOutput::from),
        }
    }

    pub async fn run_catch_up(&self, text: &str, context: Option<&UserContext>) -> WorkflowExecutionResult<CatchUpResult> {
        self.execute(&CatchUpPipeline::new(text), context).await
    }

    pub async fn run_rewrite(
        &self,
        text: &str,
        intent: &str,
        context: Option<&UserContext>,
    ) -> WorkflowExecutionResult<RewriteResult> {
        self.execute(&RewritePipeline::new(text, intent), context).await
    }

    pub async fn run_explain(
        &self,
        text: &str,
        category: Option<&str>,
        context: Option<&UserContext>,
    ) -> WorkflowExecutionResult<ExplainResult> {
        self.execute(&ExplainPipeline::new(text, category.map(str::to_string)), context)
            .await
    }

    /// Drive `pipeline` through its step table.
    pub async fn execute<P: TaskPipeline>(
        &self,
        pipeline: &P,
        context: Option<&UserContext>,
    ) -> WorkflowExecutionResult<P::Output> {
        let started = Instant::now();
        let kind = pipeline.kind();
        let execution_id = new_execution_id(kind);
        self.observer.run_started(kind, &execution_id);

        let mut tracker = StepTracker::new(kind, &execution_id, self.observer.as_ref());
        let outcome = self.drive(pipeline, context, &mut tracker).await;
        let steps = tracker.into_steps();

        let duration = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.observer.run_finished(kind, &execution_id, outcome.is_ok(), duration);

        match outcome {
            Ok(data) => WorkflowExecutionResult::succeeded(execution_id, data, steps, duration),
            Err(error) => WorkflowExecutionResult::failed(execution_id, error.to_string(), steps, duration),
        }
    }

    async fn drive<P: TaskPipeline>(
        &self,
        pipeline: &P,
        context: Option<&UserContext>,
        tracker: &mut StepTracker<'_>,
    ) -> Result<P::Output, WorkflowError> {
        let kind = pipeline.kind();
        debug!(task = %kind, input_chars = trimmed_char_count(pipeline.primary_input()), "validating input");
        tracker.run(VALIDATE_STEP, || {
            validate_primary_input(kind, pipeline.primary_input()).map_err(WorkflowError::invalid_input)?;
            pipeline.validate_secondary()
        })?;

        let prepared = tracker.run(PREPARE_STEP, || pipeline.prepare())?;

        tracker.begin(GENERATE_STEP)?;
        let generated = self.generate(pipeline, &prepared, context).await;
        let draft = tracker.settle(GENERATE_STEP, generated)?;

        tracker.run(FINISH_STEP, || pipeline.finish(prepared, draft))
    }

    async fn generate<P: TaskPipeline>(
        &self,
        pipeline: &P,
        prepared: &P::Prepared,
        context: Option<&UserContext>,
    ) -> Result<P::Draft, WorkflowError> {
        let prompt = pipeline.prompt(prepared);
        let config = self.config_for(pipeline.kind());
        debug!(model = %config.model, prompt_chars = prompt.chars().count(), "invoking text generator");

        let value = self
            .generator
            .generate(&prompt, &config, context)
            .await
            .map_err(|error| WorkflowError::generation(format!("{error:#}")))?;

        if !value.is_object() {
            return Err(WorkflowError::malformed_response("expected a JSON object"));
        }
        serde_json::from_value(value).map_err(|error| WorkflowError::malformed_response(error.to_string()))
    }
}

/// `<kind>-<unix millis>-<8 hex chars>`.
fn new_execution_id(kind: TaskKind) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{kind}-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}
