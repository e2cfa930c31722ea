//! Cliente HTTP para a API do ClickUp

use crate::error::{ClickUpError, Result};
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// URL base da API v2 do ClickUp
pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Timeout total padrão das requisições
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout de conexão padrão
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Cliente para interagir com a API do ClickUp (v2)
///
/// O token é enviado cru no header `Authorization` (Personal Token `pk_...`),
/// sem prefixo `Bearer`, que é o formato aceito pela API v2.
#[derive(Clone)]
pub struct ClickUpClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

impl fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickUpClient")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClickUpClient {
    /// Cria um novo cliente ClickUp
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(api_token, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        api_token: impl Into<String>,
        total_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(ClickUpError::ConfigError(
                "ClickUp API token is empty".to_string(),
            ));
        }

        let http_client = HttpClient::builder()
            .timeout(total_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                ClickUpError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Aponta o cliente para outra URL base (proxy, mock em testes)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Executa uma requisição GET
    pub(crate) async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", &self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Executa uma requisição GET e parseia JSON
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get(endpoint).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Executa uma requisição PUT
    pub(crate) async fn put(&self, endpoint: &str, body: &Value) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("PUT {} with body: {}", url, body);

        let response = self
            .http_client
            .put(&url)
            .header("Authorization", &self.api_token)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Executa uma requisição PUT e devolve o corpo como JSON
    ///
    /// Um corpo vazio ou não-JSON em resposta 2xx vira `Value::Null`:
    /// a atualização já foi aceita pelo ClickUp.
    pub(crate) async fn put_value(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let response = self.put(endpoint, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_default();

        tracing::error!("ClickUp API error ({}): {}", status_code, error_body);

        // Tentar extrair mensagem de erro do JSON
        let message = serde_json::from_str::<Value>(&error_body)
            .ok()
            .and_then(|json| {
                json.get("err")
                    .or_else(|| json.get("error"))
                    .or_else(|| json.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if error_body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    error_body.clone()
                }
            });

        Err(ClickUpError::ApiError {
            status: status_code,
            message,
            body: error_body,
        })
    }

    /// Obtém o token de autenticação
    pub fn token(&self) -> &str {
        &self.api_token
    }

    /// Obtém a URL base da API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ClickUpClient::new("test-token").unwrap();
        assert_eq!(client.token(), "test-token");
        assert_eq!(client.base_url(), "https://api.clickup.com/api/v2");
    }

    #[test]
    fn test_client_with_custom_timeouts() {
        let client = ClickUpClient::with_timeouts(
            "test-token",
            Duration::from_secs(60),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.token(), "test-token");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = ClickUpClient::new("   ").unwrap_err();
        assert!(matches!(err, ClickUpError::ConfigError(_)));
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let client = ClickUpClient::new("t")
            .unwrap()
            .with_base_url("http://127.0.0.1:9999/api/v2/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999/api/v2");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = ClickUpClient::new("pk_secret_value").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("pk_secret_value"));
        assert!(rendered.contains("<redacted>"));
    }
}
