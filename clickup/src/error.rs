//! Tipos de erro para o crate clickup

use thiserror::Error;

/// Erros do cliente ClickUp
#[derive(Debug, Error)]
pub enum ClickUpError {
    /// Erro de transporte (DNS, conexão, timeout do reqwest)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro da API do ClickUp (status code não-2xx)
    ///
    /// `body` guarda o corpo da resposta exatamente como veio do ClickUp.
    #[error("ClickUp API error (status {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        body: String,
    },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Recurso não encontrado (task, team, etc)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ClickUpError {
    /// Status HTTP devolvido pelo ClickUp, quando houve resposta
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClickUpError::ApiError { status, .. } => Some(*status),
            ClickUpError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Corpo bruto devolvido pelo ClickUp, quando houve resposta não-2xx
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            ClickUpError::ApiError { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, ClickUpError>;
