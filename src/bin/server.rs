//! HTTP server binary for pdf2manual (feature `server`).
//!
//! Exposes the extraction pipeline over HTTP:
//!
//! * `POST /process_pdf`     — `{"file_path": "..."}` (path or URL)
//! * `POST /process_upload`  — multipart upload, `file` field
//! * `GET  /health`          — liveness probe

use anyhow::{Context, Result};
use pdf2manual::api;
use pdf2manual::ProcessingConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf2manual=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ProcessingConfig::default();
    config.model = env_var("PDF2MANUAL_MODEL");
    config.provider_name = env_var("PDF2MANUAL_PROVIDER");
    if let Some(secs) = env_var("PDF2MANUAL_API_TIMEOUT") {
        config.api_timeout_secs = secs
            .parse()
            .context("PDF2MANUAL_API_TIMEOUT must be an integer number of seconds")?;
    }

    let app = api::app(Arc::new(config)).layer(TraceLayer::new_for_http());

    let bind = env_var("PDF2MANUAL_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    info!("pdf2manual server listening on http://{bind}");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
