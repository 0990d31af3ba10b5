use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bragi_engine::{
    Category, TaskOutput, TaskRequest, TextGenerator, WorkflowExecutor, WorkflowObserver, WorkflowStepStatus,
};
use bragi_types::{DEFAULT_MODEL, Deadline, ModelConfig, TaskKind, UrgencyLevel, UserContext, WorkflowStep};
use serde_json::{Value, json};

/// Generator that replays a canned answer and records every call.
struct StubGenerator {
    answer: Result<Value, String>,
    calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone)]
struct Call {
    prompt: String,
    config: ModelConfig,
    user_id: Option<String>,
}

impl StubGenerator {
    fn answering(answer: Value) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(answer),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str, config: &ModelConfig, context: Option<&UserContext>) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.to_string(),
            config: config.clone(),
            user_id: context.map(|ctx| ctx.user_id.clone()),
        });
        self.answer.clone().map_err(|message| anyhow!(message))
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl WorkflowObserver for RecordingObserver {
    fn run_started(&self, kind: TaskKind, _execution_id: &str) {
        self.events.lock().unwrap().push(format!("run_started:{kind}"));
    }

    fn step_started(&self, _execution_id: &str, step: &WorkflowStep) {
        self.events.lock().unwrap().push(format!("{}:{}", step.name, step.status));
    }

    fn step_finished(&self, _execution_id: &str, step: &WorkflowStep) {
        self.events.lock().unwrap().push(format!("{}:{}", step.name, step.status));
    }

    fn run_finished(&self, _kind: TaskKind, _execution_id: &str, success: bool, _duration_ms: u64) {
        self.events.lock().unwrap().push(format!("run_finished:{success}"));
    }
}

fn executor(generator: &Arc<StubGenerator>) -> WorkflowExecutor {
    WorkflowExecutor::new(generator.clone())
}

fn statuses(steps: &[WorkflowStep]) -> Vec<WorkflowStepStatus> {
    steps.iter().map(|step| step.status).collect()
}

fn assert_step_invariants(steps: &[WorkflowStep]) {
    for step in steps {
        match step.status {
            WorkflowStepStatus::Pending => {
                assert!(step.start_time.is_none() && step.end_time.is_none(), "{step:?}");
            }
            WorkflowStepStatus::Completed | WorkflowStepStatus::Failed => {
                let (start, end) = (step.start_time.unwrap(), step.end_time.unwrap());
                assert!(start <= end, "{step:?}");
            }
            WorkflowStepStatus::Running => panic!("step left running: {step:?}"),
        }
        assert_eq!(step.end_time.is_some(), step.status.is_terminal(), "{step:?}");
        assert_eq!(step.error.is_some(), step.status == WorkflowStepStatus::Failed);
    }
}

#[tokio::test]
async fn catch_up_fills_missing_fields() {
    let generator = StubGenerator::answering(json!({
        "summary": "Ship Friday",
        "keyDecisions": ["Ship Friday"],
        "actionItems": ["Alice: QA"],
    }));
    let request = TaskRequest::from_parts(TaskKind::CatchUp, "  Team decided to ship Friday.   Alice owns QA.  ", None);

    let result = executor(&generator).run(request, Some(&UserContext::new("u1"))).await;

    assert!(result.success, "{:?}", result.error);
    assert!(result.error.is_none());
    let Some(TaskOutput::CatchUp(data)) = result.data else {
        panic!("expected catch-up output");
    };
    assert_eq!(data.summary, "Ship Friday");
    assert!(data.deadlines.is_empty());
    assert!(data.important_discussions.is_empty());

    assert_eq!(
        result.steps.iter().map(|step| step.name.as_str()).collect::<Vec<_>>(),
        TaskKind::CatchUp.step_names()
    );
    assert!(result.steps.iter().all(|step| step.status == WorkflowStepStatus::Completed));
    assert_step_invariants(&result.steps);
    assert!(result.execution_id.starts_with("catch-up-"));

    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("Team decided to ship Friday. Alice owns QA."));
    assert_eq!(calls[0].user_id.as_deref(), Some("u1"));
    assert_eq!(calls[0].config, ModelConfig::for_task(TaskKind::CatchUp));
}

#[tokio::test]
async fn catch_up_tolerates_null_entries_in_model_output() {
    let generator = StubGenerator::answering(json!({
        "summary": "Ship Friday",
        "keyDecisions": [null, "Ship Friday"],
        "deadlines": [{ "task": "Release", "deadline": null }],
    }));

    let result = executor(&generator)
        .run_catch_up("Team decided to ship Friday. Release has no date yet.", None)
        .await;

    assert!(result.success, "{:?}", result.error);
    let data = result.data.expect("catch-up output");
    assert_eq!(data.key_decisions, vec!["Ship Friday".to_string()]);
    assert_eq!(
        data.deadlines,
        vec![Deadline {
            task: "Release".into(),
            deadline: String::new()
        }]
    );
    assert_step_invariants(&result.steps);
}

#[tokio::test]
async fn short_rewrite_fails_validation_without_calling_the_generator() {
    let generator = StubGenerator::answering(json!({ "rewrittenText": "unused" }));

    let result = executor(&generator)
        .run(TaskRequest::from_parts(TaskKind::Rewrite, "hi", Some("professional".into())), None)
        .await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert!(result.error.as_deref().unwrap().contains("too short"));
    assert_eq!(
        statuses(&result.steps),
        vec![
            WorkflowStepStatus::Failed,
            WorkflowStepStatus::Pending,
            WorkflowStepStatus::Pending,
            WorkflowStepStatus::Pending,
        ]
    );
    assert_step_invariants(&result.steps);
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn rewrite_without_intent_fails_validation() {
    let generator = StubGenerator::answering(json!({}));

    let result = executor(&generator)
        .run(TaskRequest::from_parts(TaskKind::Rewrite, "please send the report", None), None)
        .await;

    assert_eq!(result.error.as_deref(), Some("Intent is required"));
    assert_eq!(result.failed_step().map(|step| step.name.as_str()), Some("validate-input"));
}

#[tokio::test]
async fn whitespace_only_input_is_rejected_for_every_kind() {
    let generator = StubGenerator::answering(json!({}));
    let executor = executor(&generator);

    for kind in TaskKind::ALL {
        let result = executor
            .run(TaskRequest::from_parts(kind, "      \n\t      ", Some("calm".into())), None)
            .await;
        assert!(!result.success, "{kind}");
        assert_eq!(result.steps[0].status, WorkflowStepStatus::Failed, "{kind}");
    }
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn generator_failure_fails_the_ai_step() {
    let generator = StubGenerator::failing("Groq API error: 503");

    let result = executor(&generator)
        .run_explain("The quarterly system upgrade requires a reboot on Sunday.", None, None)
        .await;

    assert!(!result.success);
    let error = result.error.as_deref().unwrap();
    assert!(error.contains("Groq API error: 503"), "{error}");
    assert_eq!(
        statuses(&result.steps),
        vec![
            WorkflowStepStatus::Completed,
            WorkflowStepStatus::Completed,
            WorkflowStepStatus::Failed,
            WorkflowStepStatus::Pending,
        ]
    );
    assert_eq!(result.steps[2].name, "ai-explanation");
    assert_step_invariants(&result.steps);
}

#[tokio::test]
async fn malformed_model_output_fails_the_ai_step() {
    for answer in [json!(["not", "an", "object"]), json!({ "keyDecisions": "should be a list" })] {
        let generator = StubGenerator::answering(answer);
        let result = executor(&generator)
            .run_catch_up("Standup notes: the deploy slipped to Monday.", None)
            .await;

        assert!(!result.success);
        assert_eq!(result.failed_step().map(|step| step.name.as_str()), Some("ai-analysis"));
        assert_eq!(result.steps[3].status, WorkflowStepStatus::Pending);
    }
}

#[tokio::test]
async fn rewrite_returns_model_text_and_requested_tone() {
    let generator = StubGenerator::answering(json!({
        "rewrittenText": "  Could you send the report by end of day?  ",
        "improvements": ["Softened the demand"],
        "tone": "model-chosen",
    }));

    let result = executor(&generator)
        .run_rewrite("send me the report NOW", "friendly", None)
        .await;

    let data = result.data.expect("rewrite output");
    assert_eq!(data.original_text, "send me the report NOW");
    assert_eq!(data.rewritten_text, "  Could you send the report by end of day?  ");
    assert_eq!(data.improvements, vec!["Softened the demand".to_string()]);
    assert_eq!(data.tone, "friendly");

    let calls = generator.calls();
    assert!(calls[0].prompt.contains("Make it warm and friendly"));
    assert_eq!(calls[0].config.temperature, 0.7);
}

#[tokio::test]
async fn identical_rewrite_fails_quality_check() {
    let generator = StubGenerator::answering(json!({ "rewrittenText": "send me the report" }));

    let result = executor(&generator)
        .run_rewrite("send me the report", "professional", None)
        .await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().starts_with("Rewrite quality check failed"));
    assert_eq!(result.failed_step().map(|step| step.name.as_str()), Some("quality-check"));
    assert_eq!(&statuses(&result.steps)[..3], &[WorkflowStepStatus::Completed; 3]);
}

#[tokio::test]
async fn rewrite_differing_only_in_whitespace_passes_quality_check() {
    let generator = StubGenerator::answering(json!({ "rewrittenText": "Please send the report\n" }));

    let result = executor(&generator)
        .run_rewrite("Please send the report", "professional", None)
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.data.expect("rewrite output").rewritten_text, "Please send the report\n");
}

#[tokio::test]
async fn explain_prefers_medical_over_legal_and_appends_disclaimer() {
    let generator = StubGenerator::answering(json!({
        "tldr": "You need a follow-up",
        "simpleExplanation": "Your doctor wants to see you again.",
        "keyPoints": ["Book a visit"],
        "actionRequired": true,
        "urgencyLevel": "HIGH",
    }));

    let result = executor(&generator)
        .run_explain("The patient consent form is a legal agreement about the diagnosis.", None, None)
        .await;

    let data = result.data.expect("explain output");
    let disclaimer = Category::Medical.disclaimer().unwrap();
    assert!(data.simple_explanation.starts_with("Your doctor wants to see you again.\n\n"));
    assert!(data.simple_explanation.ends_with(disclaimer));
    assert!(data.action_required);
    assert_eq!(data.urgency_level, UrgencyLevel::High);
    assert!(generator.calls()[0].prompt.contains("This is a medical document."));
}

#[tokio::test]
async fn financial_disclaimer_appears_exactly_once() {
    let disclaimer = Category::Financial.disclaimer().unwrap();
    let generator = StubGenerator::answering(json!({
        "simpleExplanation": format!("Your bank is raising fees.\n\n{disclaimer}"),
    }));

    let result = executor(&generator)
        .run_explain("Notice from your bank about updated account fees.", Some("financial"), None)
        .await;

    let data = result.data.expect("explain output");
    assert_eq!(data.simple_explanation.matches(disclaimer).count(), 1);
    assert!(data.simple_explanation.ends_with(disclaimer));
    assert_eq!(data.urgency_level, UrgencyLevel::Medium);
    assert!(!data.action_required);
}

#[tokio::test]
async fn technical_and_unknown_categories_get_no_disclaimer() {
    let generator = StubGenerator::answering(json!({ "simpleExplanation": "It restarts the servers." }));
    let executor = executor(&generator);

    let technical = executor
        .run_explain("The system code deploys on every merge to main.", None, None)
        .await;
    assert_eq!(technical.data.unwrap().simple_explanation, "It restarts the servers.");

    let unknown = executor
        .run_explain("The patient chart is attached for your review today.", Some("poetry"), None)
        .await;
    assert_eq!(unknown.data.unwrap().simple_explanation, "It restarts the servers.");
}

#[tokio::test]
async fn observer_sees_transitions_in_order() {
    let generator = StubGenerator::answering(json!({ "rewrittenText": "Could we revisit this tomorrow?" }));
    let observer = Arc::new(RecordingObserver::default());
    let executor = WorkflowExecutor::new(generator.clone()).with_observer(observer.clone());

    executor.run_rewrite("this is terrible, fix it now", "de-escalate", None).await;

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "run_started:rewrite",
            "validate-input:running",
            "validate-input:completed",
            "analyze-tone:running",
            "analyze-tone:completed",
            "ai-rewrite:running",
            "ai-rewrite:completed",
            "quality-check:running",
            "quality-check:completed",
            "run_finished:true",
        ]
    );
}

#[tokio::test]
async fn model_override_applies_to_every_kind() {
    let generator = StubGenerator::answering(json!({ "rewrittenText": "Thanks, that works for me." }));
    let executor = WorkflowExecutor::new(generator.clone()).with_model("llama-3.3-70b");

    assert_eq!(ModelConfig::for_task(TaskKind::Explain).model, DEFAULT_MODEL);
    for kind in TaskKind::ALL {
        let config = executor.config_for(kind);
        assert_eq!(config.model, "llama-3.3-70b");
        assert_eq!(config.max_tokens, ModelConfig::for_task(kind).max_tokens);
    }

    executor.run_rewrite("ok fine whatever", "calm", None).await;
    assert_eq!(generator.calls()[0].config.model, "llama-3.3-70b");
}

#[tokio::test]
async fn concurrent_runs_get_distinct_execution_ids() {
    let generator = StubGenerator::answering(json!({ "summary": "Nothing new" }));
    let executor = executor(&generator);

    let (first, second) = tokio::join!(
        executor.run_catch_up("Nothing happened in the channel today.", None),
        executor.run_catch_up("Nothing happened in the channel today.", None),
    );
    assert_ne!(first.execution_id, second.execution_id);
    assert!(first.success && second.success);
}
