//! Recorte de uma tarefa do ClickUp com os campos de agenda

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Campos de agenda de uma tarefa, lidos de `GET /task/{task_id}`
///
/// Valores ausentes, nulos ou não-numéricos viram `None`: o chamador
/// decide o que fazer com uma tarefa sem agenda.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,

    /// Data de início (epoch ms)
    #[serde(default, deserialize_with = "lenient_millis")]
    pub start_date: Option<i64>,

    /// Estimativa de tempo (ms)
    #[serde(default, deserialize_with = "lenient_millis")]
    pub time_estimate: Option<i64>,

    /// Due date atual (epoch ms), apenas para log
    #[serde(default, deserialize_with = "lenient_millis")]
    pub due_date: Option<i64>,
}

/// Interpreta um valor JSON como inteiro em milissegundos
///
/// Aceita número inteiro, número de ponto flutuante sem parte fracionária
/// e string numérica (com espaços nas pontas). Qualquer outra coisa é `None`.
pub fn parse_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_millis))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
