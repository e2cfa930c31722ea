//! Workspaces (teams na API v2)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Workspace visível para o token (`GET /team`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// O que fazer quando há vários workspaces e nenhum casa com o nome configurado
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamFallback {
    /// Usa o primeiro workspace na ordem devolvida pela API
    #[default]
    First,
    /// Falha a requisição
    Reject,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "team id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_id_accepts_number() {
        let team: Team =
            serde_json::from_value(json!({"id": 9013456, "name": "Elearning Team"})).unwrap();
        assert_eq!(team.id, "9013456");
        assert_eq!(team.name, "Elearning Team");
    }

    #[test]
    fn test_fallback_deserializes_lowercase() {
        let f: TeamFallback = serde_json::from_value(json!("reject")).unwrap();
        assert_eq!(f, TeamFallback::Reject);
        assert_eq!(TeamFallback::default(), TeamFallback::First);
    }
}
