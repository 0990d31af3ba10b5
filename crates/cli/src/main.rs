use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bragi_api::{ChatClient, DEFAULT_API_BASE, api_key_from_env};
use bragi_engine::{ApiTextGenerator, WorkflowExecutor};
use bragi_server::{AppState, BragiHttpServer};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve the Bragi writing-assistant workflows over HTTP.
#[derive(Debug, Parser)]
#[command(name = "bragi", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BRAGI_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Base URL of the chat-completions provider.
    #[arg(long, env = "GROQ_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Model id used for every task kind.
    #[arg(long, env = "BRAGI_MODEL")]
    model: Option<String>,

    /// Seconds a task request may run before answering 504.
    #[arg(long, env = "BRAGI_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let api_key = api_key_from_env().context("GROQ_API_KEY must be set")?;
    let client = ChatClient::new(&args.api_base, &api_key)
        .with_context(|| format!("invalid provider configuration for {}", args.api_base))?;

    let mut generator = ApiTextGenerator::new(client);
    if let Some(model) = &args.model {
        generator = generator.with_health_model(model);
    }
    let mut executor = WorkflowExecutor::new(Arc::new(generator));
    if let Some(model) = &args.model {
        executor = executor.with_model(model);
    }

    let state = AppState::new(executor).with_request_timeout(Duration::from_secs(args.request_timeout_secs));
    let server = BragiHttpServer::new(args.bind, state).start().await?;
    info!(
        address = %server.bound_address(),
        api_base = %args.api_base,
        model = args.model.as_deref().unwrap_or("default"),
        "bragi ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown requested");
    server.stop().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
