//! Call API handlers

use super::dto::{ApiResponse, CallCreatedResponse};
use crate::application::OutboundCallOrchestrator;
use crate::domain::call::request::InboundCallWebhook;
use crate::domain::shared::error::DomainError;
use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use std::sync::Arc;
use tracing::info;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<OutboundCallOrchestrator>,
}

/// Create and start an outbound call.
///
/// The body is parsed here rather than through the `Json` extractor so that
/// invalid JSON and schema violations both come back as 400.
pub async fn create_outbound_call(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CallCreatedResponse>, DomainError> {
    info!("API: Creating outbound call");

    let handle = state.orchestrator.create_outbound_call(&body).await?;

    Ok(Json(CallCreatedResponse {
        conversation_id: handle.conversation_id.into_string(),
    }))
}

/// Carrier webhook for inbound calls
///
/// Form rejections are mapped to `MalformedRequest` so a missing field gets
/// the same 400 as an empty one.
pub async fn inbound_call(
    State(state): State<AppState>,
    form: Result<Form<InboundCallWebhook>, FormRejection>,
) -> Result<Json<CallCreatedResponse>, DomainError> {
    let Form(webhook) = form.map_err(|e| DomainError::MalformedRequest(e.body_text()))?;

    info!("API: Inbound call from {}", webhook.from);

    let handle = state.orchestrator.accept_inbound(webhook).await?;

    Ok(Json(CallCreatedResponse {
        conversation_id: handle.conversation_id.into_string(),
    }))
}

/// Health check
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("OK".to_string()))
}
