//! Route table and handlers.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use bragi_engine::{TaskOutput, TaskRequest, WorkflowExecutionResult, WorkflowExecutor};
use bragi_types::{TaskKind, UserContext};
use bragi_util::truncate_for_log;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::RouteError;

/// Deadline applied to each task run unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const TEXT_REQUIRED: &str = "Text input is required";
const INTENT_REQUIRED: &str = "Intent is required";
const INVALID_JSON: &str = "Invalid JSON body";
const LOG_PREVIEW_CHARS: usize = 80;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    executor: WorkflowExecutor,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(executor: WorkflowExecutor) -> Self {
        Self {
            executor,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Build the `/api/ai` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ai/catch-up", post(catch_up))
        .route("/api/ai/rewrite", post(rewrite))
        .route("/api/ai/explain", post(explain))
        .route("/api/ai/health", get(health))
        .with_state(state)
}

type TaskResponse = Result<Json<WorkflowExecutionResult<TaskOutput>>, RouteError>;

async fn catch_up(State(state): State<AppState>, body: Bytes) -> TaskResponse {
    let body = parse_body(&body)?;
    let text = required_string(&body, "text", TEXT_REQUIRED)?;
    run_task(&state, TaskKind::CatchUp, text, None, user_context(&body)).await
}

async fn rewrite(State(state): State<AppState>, body: Bytes) -> TaskResponse {
    let body = parse_body(&body)?;
    let text = required_string(&body, "text", TEXT_REQUIRED)?;
    let intent = required_string(&body, "intent", INTENT_REQUIRED)?;
    run_task(&state, TaskKind::Rewrite, text, Some(intent), user_context(&body)).await
}

async fn explain(State(state): State<AppState>, body: Bytes) -> TaskResponse {
    let body = parse_body(&body)?;
    let text = required_string(&body, "text", TEXT_REQUIRED)?;
    let category = body.get("category").and_then(Value::as_str).map(str::to_string);
    run_task(&state, TaskKind::Explain, text, category, user_context(&body)).await
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let groq = state.executor.health_check().await;
    Json(json!({
        "status": "ok",
        "services": { "groq": groq },
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn run_task(
    state: &AppState,
    kind: TaskKind,
    text: String,
    secondary: Option<String>,
    context: UserContext,
) -> TaskResponse {
    debug!(
        task = %kind,
        user_id = %context.user_id,
        text = %truncate_for_log(&text, LOG_PREVIEW_CHARS),
        "task request accepted"
    );
    let request = TaskRequest::from_parts(kind, text, secondary);
    let run = state.executor.run(request, Some(&context));

    let result = match tokio::time::timeout(state.request_timeout, run).await {
        Ok(result) => result,
        Err(_) => {
            warn!(task = %kind, timeout_ms = state.request_timeout.as_millis() as u64, "task request timed out");
            return Err(RouteError::TimedOut);
        }
    };

    if !result.success {
        return Err(RouteError::WorkflowFailed(result.error));
    }
    Ok(Json(result))
}

/// Parse the body as JSON. Non-object JSON yields an empty map, so the field
/// checks report what is missing.
fn parse_body(body: &Bytes) -> Result<Map<String, Value>, RouteError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(_) => Err(RouteError::BadRequest(INVALID_JSON)),
    }
}

/// A non-empty string field, or `message` as a bad request.
fn required_string(body: &Map<String, Value>, field: &str, message: &'static str) -> Result<String, RouteError> {
    match body.get(field) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(RouteError::BadRequest(message)),
    }
}

fn user_context(body: &Map<String, Value>) -> UserContext {
    match body.get("userId").and_then(Value::as_str) {
        Some(user_id) if !user_id.is_empty() => UserContext::new(user_id),
        _ => UserContext::anonymous(),
    }
}
