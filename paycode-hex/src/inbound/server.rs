//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use paycode_types::{PaymentCodeNotifier, PaymentPublisher};

use super::handlers::{self, AppState};
use crate::Store;
use crate::openapi::ApiDoc;

/// HTTP Server for the Payment Codes API.
pub struct HttpServer<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher> {
    state: Arc<AppState<S, N, P>>,
}

impl<S: Store, N: PaymentCodeNotifier, P: PaymentPublisher> HttpServer<S, N, P> {
    /// Creates a new HTTP server over the given services.
    pub fn new(state: AppState<S, N, P>) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/payment-codes",
                post(handlers::create_payment_code::<S, N, P>),
            )
            .route(
                "/payment-codes/{id}",
                get(handlers::get_payment_code::<S, N, P>),
            )
            .route("/inquiries", post(handlers::create_inquiry::<S, N, P>))
            .route("/payments", post(handlers::create_payment::<S, N, P>))
            .with_state(self.state.clone())
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .fallback(handlers::not_found)
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
