//! # Bragi Engine
//!
//! The Bragi Engine runs the writing-assistant workflows: catch-up summaries,
//! message rewrites, and plain-language explanations. Each run walks a fixed
//! four-step table, records the status and timing of every step, and returns a
//! uniform [`WorkflowExecutionResult`] envelope whether it succeeds or fails.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bragi_api::ChatClient;
//! use bragi_engine::{ApiTextGenerator, TaskRequest, WorkflowExecutor};
//! use bragi_types::{TaskKind, UserContext};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let generator = ApiTextGenerator::new(ChatClient::new_from_env()?);
//! let executor = WorkflowExecutor::new(Arc::new(generator));
//!
//! let request = TaskRequest::from_parts(TaskKind::Rewrite, "send me the report now", Some("friendly".into()));
//! let result = executor.run(request, Some(&UserContext::new("u1"))).await;
//! for step in &result.steps {
//!     println!("{}: {}", step.name, step.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`workflow`**: per-task pipelines supplying the pre-processing, prompt, and post-processing
//! - **`executor`**: step sequencing, status tracking, and envelope construction
//! - **`generator`**: the injected text-generation collaborator
//! - **`templates`**: instruction templates sent to the generator
//! - **`observer`**: progress hooks, logged through `tracing` by default

pub mod errors;
pub mod executor;
pub mod generator;
pub mod observer;
pub mod templates;
pub mod workflow;

pub use bragi_types::{WorkflowExecutionResult, WorkflowStep, WorkflowStepStatus};
pub use errors::WorkflowError;
pub use executor::{TaskOutput, TaskRequest, WorkflowExecutor};
pub use generator::{ApiTextGenerator, TextGenerator};
pub use observer::{NoopObserver, TracingObserver, WorkflowObserver};
pub use workflow::{Category, TaskPipeline};
