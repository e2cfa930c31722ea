use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clickup::ClickUpError;
use serde_json::{json, Value};
use std::fmt;

use crate::models::DeliveryState;
use crate::services::ProcessError;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    MethodNotAllowed,
    UpstreamFetchFailed(ClickUpError),
    TeamLookupFailed(ClickUpError),
    NoWorkspaceFound(String),
    UpstreamUpdateFailed(ClickUpError),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "{}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::UpstreamFetchFailed(err) => write!(f, "Failed to fetch task: {}", err),
            AppError::TeamLookupFailed(err) => write!(f, "Failed to list workspaces: {}", err),
            AppError::NoWorkspaceFound(msg) => write!(f, "No workspace found: {}", msg),
            AppError::UpstreamUpdateFailed(err) => write!(f, "Failed to update task: {}", err),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ProcessError> for AppError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::FetchFailed { source, .. } => AppError::UpstreamFetchFailed(source),
            ProcessError::TeamLookupFailed(source) => AppError::TeamLookupFailed(source),
            ProcessError::NoWorkspaceFound(msg) => AppError::NoWorkspaceFound(msg),
            ProcessError::UpdateFailed { source, .. } => AppError::UpstreamUpdateFailed(source),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn state(&self) -> Option<DeliveryState> {
        match self {
            AppError::InvalidInput(_) => Some(DeliveryState::InvalidInput),
            AppError::UpstreamFetchFailed(_) => Some(DeliveryState::FetchFailed),
            AppError::TeamLookupFailed(_) => Some(DeliveryState::TeamLookupFailed),
            AppError::NoWorkspaceFound(_) => Some(DeliveryState::NoWorkspaceFound),
            AppError::UpstreamUpdateFailed(_) => Some(DeliveryState::UpdateFailed),
            _ => None,
        }
    }

    fn upstream(&self) -> Option<&ClickUpError> {
        match self {
            AppError::UpstreamFetchFailed(err)
            | AppError::TeamLookupFailed(err)
            | AppError::UpstreamUpdateFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Corpo do ClickUp como JSON se possível, senão como string
fn upstream_payload(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "status": status.as_u16()
        });

        if let Some(state) = self.state() {
            body["state"] = json!(state);
        }

        if let Some(err) = self.upstream() {
            if let Some(upstream_status) = err.upstream_status() {
                body["upstream_status"] = json!(upstream_status);
            }
            if let Some(raw) = err.upstream_body() {
                body["upstream"] = upstream_payload(raw);
            }
        }

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let response = AppError::InvalidInput("Missing task_id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing task_id");
        assert_eq!(body["state"], "invalid_input");
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_upstream_payload_verbatim() {
        let err = AppError::UpstreamFetchFailed(ClickUpError::ApiError {
            status: 404,
            message: "Task not found".into(),
            body: r#"{"err":"Task not found","ECODE":"ITEM_013"}"#.into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["state"], "fetch_failed");
        assert_eq!(body["upstream_status"], 404);
        assert_eq!(
            body["upstream"],
            json!({"err": "Task not found", "ECODE": "ITEM_013"})
        );
    }

    #[tokio::test]
    async fn test_non_json_upstream_body_is_kept_as_string() {
        let err = AppError::UpstreamUpdateFailed(ClickUpError::ApiError {
            status: 502,
            message: "Bad Gateway".into(),
            body: "<html>bad gateway</html>".into(),
        });
        let body = body_json(err.into_response()).await;
        assert_eq!(body["state"], "update_failed");
        assert_eq!(body["upstream"], "<html>bad gateway</html>");
    }

    #[test]
    fn test_process_error_mapping() {
        let err: AppError = ProcessError::NoWorkspaceFound("none".into()).into();
        assert_eq!(err.state(), Some(DeliveryState::NoWorkspaceFound));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
