use anyhow::{Context, Result};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use ic_connector::{BotProcessor, Connector, ConnectorError, HttpBotProcessor, TurnOutcome};
use ic_core::ConnectorConfig;
use ic_egress_common::HttpReplyTransport;
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing::{error, info, warn};

mod respond;

use respond::{ack, failure};

type SharedProcessor = Arc<dyn BotProcessor>;

const REQUEST_ID_HEADER: &str = "x-request-id";
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
struct AppState {
    connector: Arc<Connector<SharedProcessor>>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/ingress/intercom", post(handle_intercom))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    ic_telemetry::install("ic-ingress-intercom", env!("CARGO_PKG_VERSION"))?;

    let config = ConnectorConfig::from_env().context("intercom connector configuration")?;
    let processor_url =
        std::env::var("BOT_PROCESSOR_URL").context("BOT_PROCESSOR_URL must be set")?;
    let processor_key = std::env::var("BOT_PROCESSOR_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let processor: SharedProcessor = Arc::new(HttpBotProcessor::new(processor_url, processor_key)?);
    let transport = Arc::new(HttpReplyTransport::new(Some(REPLY_TIMEOUT))?);
    let state = AppState {
        connector: Arc::new(Connector::new(processor, config, transport)),
    };

    let addr: SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| "0.0.0.0:8090".into())
        .parse()
        .context("invalid BIND address")?;

    info!("ingress-intercom listening on {addr}");
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

async fn handle_intercom(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let rid = request_id(&headers);

    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(request_id = %rid, error = %err, "failed to decode intercom webhook");
            return failure(StatusCode::BAD_REQUEST, &rid, "invalid json").into_response();
        }
    };

    match state.connector.process_event(&raw).await {
        Ok(TurnOutcome::Ignored(reason)) => {
            info!(request_id = %rid, reason = reason.as_str(), "intercom event ignored");
            ack(&rid, "ignored").into_response()
        }
        Ok(TurnOutcome::Delivered(report)) => {
            info!(
                request_id = %rid,
                conversation_id = %report.conversation_id,
                replies = report.delivered_count(),
                "intercom turn delivered"
            );
            ack(&rid, "delivered").into_response()
        }
        Err(ConnectorError::Decode(err)) => {
            warn!(request_id = %rid, error = %err, "unexpected intercom notification shape");
            failure(StatusCode::BAD_REQUEST, &rid, "invalid notification").into_response()
        }
        Err(err) => {
            error!(request_id = %rid, error = %err, "intercom turn failed");
            failure(StatusCode::BAD_GATEWAY, &rid, &err.to_string()).into_response()
        }
    }
}
