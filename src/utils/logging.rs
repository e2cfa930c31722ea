use tracing::{debug, error, info, warn};

use crate::models::{DeliveryState, TaskIdSource};

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!(
        "Request processed: {} - Status: {} - Duration: {}ms",
        endpoint, status, duration_ms
    );
}

pub fn log_webhook_received(
    task_id: &str,
    source: Option<TaskIdSource>,
    event: Option<&str>,
    body_format: &str,
) {
    info!(
        "📩 Webhook received: task_id={} (from {}), event={}, body={}",
        task_id,
        source.map(|s| s.as_str()).unwrap_or("-"),
        event.unwrap_or("-"),
        body_format
    );
}

/// Estados finais em `info`, intermediários em `debug`
pub fn log_delivery_state(task_id: &str, state: DeliveryState) {
    if state.is_terminal() {
        info!("🏁 Task {} → {}", task_id, state);
    } else {
        debug!("Task {} → {}", task_id, state);
    }
}

pub fn log_due_date_computed(task_id: &str, due_date_ms: i64, iso: &str) {
    info!("🧮 Computed due_date for {} = {} ({})", task_id, due_date_ms, iso);
}

pub fn log_task_updated(task_id: &str, due_date_ms: i64) {
    info!("✅ Updated task {} with due_date {}", task_id, due_date_ms);
}

pub fn log_task_skipped(task_id: &str, reason: &str) {
    warn!("⚠️ Task {} skipped: {}", task_id, reason);
}

pub fn log_clickup_api_error(operation: &str, status: Option<u16>, error: &str) {
    error!(
        "ClickUp API error: {} - Status: {:?} - Error: {}",
        operation, status, error
    );
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 ClickUp due-date webhook starting on port {}", port);
}

pub fn log_server_ready(host: &str, port: u16) {
    info!("✅ Server ready and listening on http://{}:{}", host, port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}
