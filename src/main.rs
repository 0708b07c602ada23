use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use onqo_audit::audit::{
    audit_router, AnswerSet, AuditFlow, AuditService, AuditStore, DocumentStore,
    HostedCompletionClient, LogMailer, MemoryStore, NarrativeGateway, QuestionKey,
    UnconfiguredGateway, PROCESSING_HOLD,
};
use onqo_audit::config::AppConfig;
use onqo_audit::error::AppError;
use onqo_audit::telemetry;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "ONQO Audit Service",
    about = "Run the ONQO digital readiness audit service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a readiness audit locally for demos and spot checks
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum AuditCommand {
    /// Walk a representative questionnaire and print the assembled report
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Skip the wizard's simulated processing hold
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Audit {
            command: AuditCommand::Sample(args),
        } => run_sample_audit(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // Storage and narrative strategies are fixed here, once, from config.
    let store: Arc<dyn AuditStore> = match &config.storage.data_dir {
        Some(dir) => Arc::new(DocumentStore::open(dir)?),
        None => Arc::new(MemoryStore::default()),
    };
    let narrative: Arc<dyn NarrativeGateway> =
        match HostedCompletionClient::from_config(&config.narrative) {
            Some(client) => Arc::new(client),
            None => Arc::new(UnconfiguredGateway),
        };
    let service = Arc::new(AuditService::new(store, narrative, Arc::new(LogMailer)));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(audit_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, narrative_configured = config.narrative.is_configured(), "audit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_sample_audit(args: SampleArgs) -> Result<(), AppError> {
    let answers = sample_answers();

    let mut flow = AuditFlow::start();
    while let Some(key) = flow.current_question() {
        println!("{} [{}]", key.prompt(), answers.get(key));
        flow.record_answer(answers.get(key));
        if let Err(err) = flow.advance() {
            eprintln!("questionnaire halted: {err}");
            return Ok(());
        }
    }

    if !args.no_wait {
        // Same hold the wizard's processing screen applies.
        std::thread::sleep(PROCESSING_HOLD);
    }

    let report = match flow.local_report() {
        Some(report) => report,
        None => {
            eprintln!("no report assembled");
            return Ok(());
        }
    };

    println!("\nReadiness Index: {}/10 - {}", report.score, report.readiness_label);

    println!("\nExecutive summary");
    println!("{}", report.summary);

    println!("\nStructural signals");
    for impact in &report.gap_impacts {
        println!("- {}", impact.gap);
        println!("  Why this matters: {}", impact.why_it_matters);
    }

    println!("\nFocus signal: {}", report.focus_signal);

    println!("\nWhat to examine next");
    for (index, step) in report.next_steps.iter().enumerate() {
        println!("{}. {}", index + 1, step);
    }

    Ok(())
}

fn sample_answers() -> AnswerSet {
    AnswerSet::new()
        .with(QuestionKey::Industry, "SaaS")
        .with(QuestionKey::BusinessSize, "Mid-Market ($10M - $50M)")
        .with(QuestionKey::Infrastructure, "Hybrid (Cloud + On-premise)")
        .with(QuestionKey::Bottleneck, "Manual reporting and approval handoffs")
        .with(QuestionKey::Automation, "Partially automated / Scripts")
        .with(QuestionKey::Data, "Spread across team-owned spreadsheets")
        .with(QuestionKey::AiReadiness, "Evaluating vendors")
        .with(QuestionKey::CustomerJourney, "Instrumented up to activation")
        .with(
            QuestionKey::TechStack,
            "HubSpot, Slack, Notion, Jira, Zendesk, Looker, Snowflake",
        )
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
