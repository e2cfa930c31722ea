//! Entrada dos webhooks do ClickUp que recalculam o due date
//!
//! Fluxo por entrega:
//! 1. Normaliza path, query e corpo em um `WebhookPayload`
//! 2. Sem `task_id` → 400
//! 3. Busca a tarefa, calcula `start_date + time_estimate` e grava no ClickUp
//!
//! O processamento roda em uma task própria do runtime: se o cliente fechar a
//! conexão, a atualização em andamento continua até o fim.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::models::{DeliveryState, DueDateResult, RawBody};
use crate::services::{parse_form, to_iso8601};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// `GET|POST /webhook` e `/api/clickup/webhook`
pub async fn handle_due_date_webhook(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> AppResult<Json<Value>> {
    process_delivery(state, None, query, body).await
}

/// `GET|POST /webhook/:task_id`
pub async fn handle_due_date_webhook_for_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> AppResult<Json<Value>> {
    process_delivery(state, Some(task_id), query, body).await
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn process_delivery(
    state: Arc<AppState>,
    path_task_id: Option<String>,
    raw_query: Option<String>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let delivery_id = Uuid::new_v4();
    let span = info_span!("delivery", %delivery_id);

    run_delivery(state, path_task_id, raw_query, body)
        .instrument(span)
        .await
}

async fn run_delivery(
    state: Arc<AppState>,
    path_task_id: Option<String>,
    raw_query: Option<String>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let start_time = Instant::now();

    let query = parse_form(raw_query.as_deref().unwrap_or(""));
    let payload = state.normalizer.normalize(
        path_task_id.as_deref(),
        &query,
        RawBody::from_bytes(&body),
    );

    let Some(task_id) = payload.task_id.clone() else {
        log_validation_error("task_id", "not found in path, query or body");
        log_delivery_state("-", DeliveryState::InvalidInput);
        return Err(AppError::InvalidInput("Missing task_id".to_string()));
    };
    log_delivery_state(&task_id, DeliveryState::Received);
    log_delivery_state(&task_id, DeliveryState::Normalized);
    log_webhook_received(
        &task_id,
        payload.task_id_source,
        payload.event.as_deref(),
        payload.body_format.as_str(),
    );

    let service = state.due_dates.clone();
    let id = task_id.clone();
    let handle = tokio::spawn(async move { service.process(&id).await }.in_current_span());

    let result = handle
        .await
        .map_err(|e| AppError::InternalError(format!("Processing task aborted: {}", e)))?
        .map_err(|e| {
            log_error(&format!("❌ Task {}: {}", task_id, e));
            log_delivery_state(&task_id, e.state());
            AppError::from(e)
        })?;

    let final_state = match &result {
        DueDateResult::Computed(_) => DeliveryState::Updated,
        DueDateResult::Skipped(_) => DeliveryState::Skipped,
    };
    log_delivery_state(&task_id, final_state);

    let response = match result {
        DueDateResult::Computed(due_date_ms) => json!({
            "success": true,
            "state": final_state,
            "task_id": task_id,
            "event": payload.event,
            "due_date": to_iso8601(due_date_ms),
            "due_date_ms": due_date_ms
        }),
        DueDateResult::Skipped(reason) => json!({
            "success": false,
            "state": final_state,
            "task_id": task_id,
            "message": reason
        }),
    };

    log_request_processed("webhook", 200, start_time.elapsed().as_millis() as u64);
    Ok(Json(response))
}
