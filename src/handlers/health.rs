use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

const SERVICE_NAME: &str = "clickup-due-date-webhook";

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Pronto quando o token consegue ler `GET /user` no ClickUp
pub async fn ready_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    log_health_check();

    let (clickup_status, upstream_status) = match state.due_dates.tasks().test_connection().await
    {
        Ok(_) => ("connected", None),
        Err(e) => {
            log_clickup_api_error("test_connection", e.upstream_status(), &e.to_string());
            ("disconnected", e.upstream_status())
        }
    };
    let ready = clickup_status == "connected";

    let mut clickup = json!({
        "status": clickup_status,
        "base_url": state.settings.clickup.base_url,
        "team_resolution": state.settings.team.enabled
    });
    if let Some(status) = upstream_status {
        clickup["upstream_status"] = json!(status);
    }

    let response = json!({
        "ready": ready,
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": { "clickup": clickup }
    });

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
