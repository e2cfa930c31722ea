use axum::{
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    handle_due_date_webhook, handle_due_date_webhook_for_task, health_check, method_not_allowed,
    ready_check,
};
use crate::AppState;

/// GET e POST; qualquer outro método responde 405 em JSON
fn webhook_route() -> MethodRouter<Arc<AppState>> {
    get(handle_due_date_webhook)
        .post(handle_due_date_webhook)
        .fallback(method_not_allowed)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/webhook", webhook_route())
        .route(
            "/webhook/:task_id",
            get(handle_due_date_webhook_for_task)
                .post(handle_due_date_webhook_for_task)
                .fallback(method_not_allowed),
        )
        // Caminho usado pelas automações antigas
        .route("/api/clickup/webhook", webhook_route())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
