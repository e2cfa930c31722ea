//! Normalização de entregas de webhook
//!
//! Remetentes mandam o `task_id` em lugares diferentes (path, query string,
//! corpo JSON plano ou aninhado, form-urlencoded). Este módulo absorve essa
//! variação e devolve sempre um `WebhookPayload`.
//!
//! A precedência é uma lista ordenada de extratores; o primeiro que devolver
//! valor não-vazio vence e as fontes nunca são mescladas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::models::{BodyFormat, RawBody, TaskIdSource, WebhookPayload, CATCH_ALL_FIELD};

/// Parâmetros da query string (primeira ocorrência de cada chave)
pub type QueryParams = HashMap<String, String>;

/// Decodifica uma query string ou corpo form-urlencoded
///
/// Chaves repetidas mantêm a primeira ocorrência.
pub fn parse_form(input: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Fontes e formatos aceitos pelo normalizador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Segmento de path `/webhook/{task_id}`
    pub accept_path: bool,
    /// `?task_id=` e `?event=`
    pub accept_query: bool,
    /// Corpo JSON
    pub accept_json: bool,
    /// Corpo `application/x-www-form-urlencoded`
    pub accept_form: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            accept_path: true,
            accept_query: true,
            accept_json: true,
            accept_form: true,
        }
    }
}

/// Visão emprestada da requisição usada pelos extratores
pub struct RequestParts<'a> {
    pub path_task_id: Option<&'a str>,
    pub query: &'a QueryParams,
    pub body: &'a Map<String, Value>,
}

type Extractor = fn(&RequestParts<'_>) -> Option<String>;

fn path_task_id(r: &RequestParts<'_>) -> Option<String> {
    non_empty(r.path_task_id)
}

fn query_task_id(r: &RequestParts<'_>) -> Option<String> {
    query_field(r, "task_id")
}

fn body_task_id(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["task_id"])
}

fn body_task_object_id(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["task", "id"])
}

fn body_payload_task_id(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["payload", "task_id"])
}

fn body_data_task_id(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["data", "task_id"])
}

fn query_event(r: &RequestParts<'_>) -> Option<String> {
    query_field(r, "event")
}

fn body_event(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["event"])
}

fn body_type(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["type"])
}

fn body_webhook_event(r: &RequestParts<'_>) -> Option<String> {
    body_field(r.body, &["webhook_event"])
}

const TASK_ID_EXTRACTORS: &[(TaskIdSource, Extractor)] = &[
    (TaskIdSource::PathParam, path_task_id),
    (TaskIdSource::QueryParam, query_task_id),
    (TaskIdSource::BodyTaskId, body_task_id),
    (TaskIdSource::BodyTaskObjectId, body_task_object_id),
    (TaskIdSource::BodyPayloadTaskId, body_payload_task_id),
    (TaskIdSource::BodyDataTaskId, body_data_task_id),
];

/// `true` quando o extrator lê da query string
const EVENT_EXTRACTORS: &[(bool, Extractor)] = &[
    (true, query_event),
    (false, body_event),
    (false, body_type),
    (false, body_webhook_event),
];

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn query_field(parts: &RequestParts<'_>, key: &str) -> Option<String> {
    non_empty(parts.query.get(key).map(String::as_str))
}

/// Navega objetos aninhados; aceita string ou número na folha
fn body_field(body: &Map<String, Value>, path: &[&str]) -> Option<String> {
    let (first, rest) = path.split_first()?;
    let mut current = body.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    match current {
        Value::String(s) => non_empty(Some(s.as_str())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn catch_all(value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(CATCH_ALL_FIELD.to_string(), value);
    map
}

/// Normalizador de entregas, parametrizado pelas fontes aceitas
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Extrai `task_id` e `event`. Nunca falha.
    pub fn normalize(
        &self,
        path_task_id: Option<&str>,
        query: &QueryParams,
        raw_body: RawBody,
    ) -> WebhookPayload {
        let (body_format, body) = self.parse_body(raw_body);
        let (task_id, task_id_source) = self.resolve_task_id(path_task_id, query, &body).unzip();
        let event = self.resolve_event(query, &body);

        WebhookPayload {
            task_id,
            task_id_source,
            event,
            body_format,
            body,
        }
    }

    /// Aplica a política de parsing do corpo, na ordem:
    /// objeto já estruturado → JSON estrito → form-urlencoded (se houver `=`)
    /// → texto opaco em `raw`.
    pub fn parse_body(&self, raw_body: RawBody) -> (BodyFormat, Map<String, Value>) {
        match raw_body {
            RawBody::Empty => (BodyFormat::Empty, Map::new()),
            RawBody::Parsed(Value::Object(map)) if map.is_empty() => {
                (BodyFormat::Empty, Map::new())
            }
            RawBody::Parsed(Value::Object(map)) => (BodyFormat::Structured, map),
            RawBody::Parsed(Value::String(text)) => self.parse_text(text),
            RawBody::Parsed(Value::Null) => (BodyFormat::Empty, Map::new()),
            RawBody::Parsed(other) => (BodyFormat::Opaque, catch_all(other)),
            RawBody::Text(text) => self.parse_text(text),
        }
    }

    fn parse_text(&self, text: String) -> (BodyFormat, Map<String, Value>) {
        if text.trim().is_empty() {
            return (BodyFormat::Empty, Map::new());
        }

        // JSON válido nunca é reinterpretado como form, mesmo com JSON desligado
        if let Ok(json) = serde_json::from_str::<Value>(&text) {
            return match json {
                Value::Object(map) if self.config.accept_json => (BodyFormat::Json, map),
                Value::Object(_) => (BodyFormat::Opaque, catch_all(Value::String(text))),
                other if self.config.accept_json => (BodyFormat::Json, catch_all(other)),
                _ => (BodyFormat::Opaque, catch_all(Value::String(text))),
            };
        }

        if self.config.accept_form && text.contains('=') {
            let map = parse_form(text.trim())
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return (BodyFormat::FormUrlEncoded, map);
        }

        (BodyFormat::Opaque, catch_all(Value::String(text)))
    }

    /// Primeiro `task_id` não-vazio na ordem de precedência, com a fonte
    pub fn resolve_task_id(
        &self,
        path_task_id: Option<&str>,
        query: &QueryParams,
        body: &Map<String, Value>,
    ) -> Option<(String, TaskIdSource)> {
        let parts = RequestParts {
            path_task_id,
            query,
            body,
        };

        TASK_ID_EXTRACTORS
            .iter()
            .filter(|(source, _)| self.source_enabled(*source))
            .find_map(|(source, extract)| extract(&parts).map(|id| (id, *source)))
    }

    fn resolve_event(&self, query: &QueryParams, body: &Map<String, Value>) -> Option<String> {
        let parts = RequestParts {
            path_task_id: None,
            query,
            body,
        };

        EVENT_EXTRACTORS
            .iter()
            .filter(|(from_query, _)| !from_query || self.config.accept_query)
            .find_map(|(_, extract)| extract(&parts))
    }

    fn source_enabled(&self, source: TaskIdSource) -> bool {
        match source {
            TaskIdSource::PathParam => self.config.accept_path,
            TaskIdSource::QueryParam => self.config.accept_query,
            _ => true,
        }
    }
}

/// Normaliza com todas as fontes habilitadas
pub fn normalize(
    path_task_id: Option<&str>,
    query: &QueryParams,
    raw_body: RawBody,
) -> WebhookPayload {
    Normalizer::default().normalize(path_task_id, query, raw_body)
}
