use serde::Serialize;
use serde_json::{Map, Value};

/// Campo onde corpos que não são JSON nem form-urlencoded ficam guardados
pub const CATCH_ALL_FIELD: &str = "raw";

/// Corpo da requisição como chegou ao handler
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Sem corpo
    Empty,
    /// Corpo já parseado por outra camada (ex.: JSON decodificado pelo framework)
    Parsed(Value),
    /// Texto cru; o formato é descoberto pelo normalizador
    Text(String),
}

impl RawBody {
    /// Constrói a partir dos bytes da requisição; bytes inválidos em UTF-8
    /// são substituídos em vez de rejeitar a entrega.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return RawBody::Empty;
        }
        RawBody::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Formato detectado do corpo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    #[default]
    Empty,
    /// Objeto recebido já estruturado
    Structured,
    Json,
    FormUrlEncoded,
    /// Texto sem estrutura, guardado em `raw`
    Opaque,
}

impl BodyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFormat::Empty => "empty",
            BodyFormat::Structured => "structured",
            BodyFormat::Json => "json",
            BodyFormat::FormUrlEncoded => "form_url_encoded",
            BodyFormat::Opaque => "opaque",
        }
    }
}

/// De onde veio o `task_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskIdSource {
    PathParam,
    QueryParam,
    BodyTaskId,
    BodyTaskObjectId,
    BodyPayloadTaskId,
    BodyDataTaskId,
}

impl TaskIdSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskIdSource::PathParam => "path",
            TaskIdSource::QueryParam => "query.task_id",
            TaskIdSource::BodyTaskId => "body.task_id",
            TaskIdSource::BodyTaskObjectId => "body.task.id",
            TaskIdSource::BodyPayloadTaskId => "body.payload.task_id",
            TaskIdSource::BodyDataTaskId => "body.data.task_id",
        }
    }
}

/// Resultado da normalização de uma entrega de webhook
///
/// Ausência de `task_id` é um resultado válido: o handler decide responder 400.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub task_id: Option<String>,
    pub task_id_source: Option<TaskIdSource>,
    pub event: Option<String>,
    pub body_format: BodyFormat,
    #[serde(skip)]
    pub body: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_blank_is_empty() {
        assert_eq!(RawBody::from_bytes(b""), RawBody::Empty);
        assert_eq!(RawBody::from_bytes(b"  \n"), RawBody::Empty);
    }

    #[test]
    fn test_from_bytes_keeps_text() {
        assert_eq!(
            RawBody::from_bytes(b"task_id=abc"),
            RawBody::Text("task_id=abc".to_string())
        );
    }

    #[test]
    fn test_from_bytes_replaces_invalid_utf8() {
        match RawBody::from_bytes(&[b'a', 0xff, b'b']) {
            RawBody::Text(s) => assert_eq!(s, "a\u{fffd}b"),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
