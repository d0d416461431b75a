//! HTTP surface for the prediction service: `GET /` liveness and
//! `POST /predict`, with permissive CORS.
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cropyield_core::types::{ErrorBody, StatusMessage};
use cropyield_core::{Error, Prediction};
use cropyield_service::{PredictionService, LIVENESS_MESSAGE};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

pub fn router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

pub async fn serve(addr: SocketAddr, service: Arc<PredictionService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "cropyield-server listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn home() -> Json<StatusMessage> {
    Json(StatusMessage { message: LIVENESS_MESSAGE.to_string() })
}

async fn predict(
    State(service): State<Arc<PredictionService>>,
    body: Bytes,
) -> Result<Json<Prediction>, (StatusCode, Json<ErrorBody>)> {
    // Translation is a blocking call; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || service.handle(&body)).await;
    match outcome {
        Ok(Ok(prediction)) => Ok(Json(prediction)),
        Ok(Err(err)) => Err(error_response(err)),
        Err(join_err) => Err(error_response(Error::Internal(format!("Internal error: {join_err}")))),
    }
}

pub fn status_for(err: &Error) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: Error) -> (StatusCode, Json<ErrorBody>) {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "prediction failed");
    }
    (status, Json(ErrorBody { error: err.to_string() }))
}
