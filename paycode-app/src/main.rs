//! # Paycode Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize tracing (with optional OTLP export)
//! - Initialize the repository adapter
//! - Either serve the HTTP API (plus the optional expiry sweeper) or run a
//!   single expiry sweep and exit

mod config;
mod publisher;

use chrono::Utc;
use clap::{Parser, Subcommand};
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paycode_hex::{
    ExpirySweeper, PaymentCodeService,
    inbound::{AppState, HttpServer},
};
use paycode_repo::{LogNotifier, Repo, build_repo};

use crate::config::Config;
use crate::publisher::Publisher;

#[derive(Parser)]
#[command(name = "paycode-server")]
#[command(version, about = "Payment code service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Expire every past-due payment code once, then exit
    Sweep,
}

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("paycode-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let otel = config.otlp_endpoint.as_deref().map(init_tracer).transpose()?;
    let (telemetry, otel_provider) = match otel {
        Some((tracer, provider)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,paycode_app=debug,paycode_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;
    info!(backend = repo.backend(), "repository ready");

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, repo).await,
        Command::Sweep => sweep_once(repo).await,
    };

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    result
}

async fn serve(config: &Config, repo: Repo) -> anyhow::Result<()> {
    let publisher = Publisher::from_queue_url(config.payment_queue_url.as_deref());
    info!(publisher = %publisher.describe(), "payment publisher selected");

    if let Some(period) = config.sweep_interval {
        let service = PaymentCodeService::new(repo.clone(), LogNotifier);
        tokio::spawn(ExpirySweeper::new(service, period).run());
    }

    let server = HttpServer::new(AppState::new(repo, LogNotifier, publisher));
    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting payment code server on port {}", config.port);

    server.run(&addr).await
}

async fn sweep_once(repo: Repo) -> anyhow::Result<()> {
    let service = PaymentCodeService::new(repo, LogNotifier);
    service.expire_past_due(Utc::now()).await?;
    info!("expiry sweep complete");
    Ok(())
}
