// ============================================================================
// Task Manager - leitura e atualização de tarefas do ClickUp
// ============================================================================
//
// Operações:
// - get_task: busca start_date / time_estimate de uma tarefa
// - set_due_date: grava due_date (com ou sem horário), opcionalmente
//   escopado a um workspace via `team_id`
// - test_connection: valida o token (readiness)

use crate::client::ClickUpClient;
use crate::error::Result;
use crate::types::TaskSnapshot;
use serde_json::{json, Value};

/// Gerenciador de tarefas do ClickUp
///
/// Implementa `Clone` e pode ser compartilhado entre requisições; não guarda
/// estado além do cliente HTTP.
#[derive(Clone, Debug)]
pub struct TaskManager {
    client: ClickUpClient,
}

impl TaskManager {
    pub fn new(client: ClickUpClient) -> Self {
        Self { client }
    }

    /// Busca uma tarefa pelo ID
    ///
    /// # Endpoint da API
    ///
    /// `GET /api/v2/task/{task_id}`
    ///
    /// # Retorno
    ///
    /// - `Ok(TaskSnapshot)`: campos de agenda (podem estar vazios)
    /// - `Err(ClickUpError::ApiError)`: status não-2xx, com o corpo original
    /// - `Err(ClickUpError::HttpError)`: falha de transporte
    pub async fn get_task(&self, task_id: &str) -> Result<TaskSnapshot> {
        let endpoint = format!("/task/{}", urlencoding::encode(task_id));
        let mut task: TaskSnapshot = self.client.get_json(&endpoint).await?;

        if task.id.is_empty() {
            task.id = task_id.to_string();
        }

        tracing::debug!(
            "📥 Task {} lida: start_date={:?}, time_estimate={:?}, due_date={:?}",
            task.id,
            task.start_date,
            task.time_estimate,
            task.due_date
        );
        Ok(task)
    }

    /// Define a data de entrega (due date) de uma tarefa
    ///
    /// # Endpoint da API
    ///
    /// `PUT /api/v2/task/{task_id}` (com `?team_id=` quando informado)
    ///
    /// # ⚠️ Timestamps em MILISSEGUNDOS
    ///
    /// - ✅ Correto: `1672531200000`
    /// - ❌ Errado: `1672531200`
    ///
    /// `include_time = true` grava `due_date_time: true`, ou seja, o ClickUp
    /// exibe o horário e não apenas a data.
    pub async fn set_due_date(
        &self,
        task_id: &str,
        timestamp_ms: i64,
        include_time: bool,
        team_id: Option<&str>,
    ) -> Result<Value> {
        let mut endpoint = format!("/task/{}", urlencoding::encode(task_id));
        if let Some(team_id) = team_id {
            endpoint.push_str(&format!("?team_id={}", urlencoding::encode(team_id)));
        }

        let body = json!({
            "due_date": timestamp_ms,
            "due_date_time": include_time
        });

        let updated = self.client.put_value(&endpoint, &body).await?;
        tracing::debug!(
            "✅ Due date da task {} definida: {} (include_time: {}, team_id: {:?})",
            task_id,
            timestamp_ms,
            include_time,
            team_id
        );
        Ok(updated)
    }

    /// Testa conectividade com a API do ClickUp
    ///
    /// `GET /api/v2/user`. Usado pelo readiness check para validar o token.
    pub async fn test_connection(&self) -> Result<Value> {
        self.client.get_json("/user").await
    }
}
