//! Cálculo e gravação de due date
//!
//! `due_date = start_date + time_estimate`, ambos em epoch ms, sem conversão
//! de fuso. O resultado é gravado com `due_date_time: true` para o ClickUp
//! exibir o horário além da data.

use chrono::{DateTime, SecondsFormat, Utc};
use clickup::{ClickUpError, TaskManager, TaskSnapshot, TeamResolver};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::models::{DeliveryState, DueDateResult};
use crate::utils::logging::*;

/// Motivo padrão quando a tarefa não tem agenda
pub const MISSING_FIELDS_REASON: &str = "missing start_date or time_estimate";

/// Falhas do processamento de uma tarefa
///
/// Cada variante indica qual chamada remota falhou.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to fetch task {task_id}: {source}")]
    FetchFailed {
        task_id: String,
        #[source]
        source: ClickUpError,
    },

    #[error("failed to list workspaces: {0}")]
    TeamLookupFailed(#[source] ClickUpError),

    #[error("no workspace found: {0}")]
    NoWorkspaceFound(String),

    #[error("failed to update task {task_id}: {source}")]
    UpdateFailed {
        task_id: String,
        #[source]
        source: ClickUpError,
    },
}

impl ProcessError {
    pub fn state(&self) -> DeliveryState {
        match self {
            ProcessError::FetchFailed { .. } => DeliveryState::FetchFailed,
            ProcessError::TeamLookupFailed(_) => DeliveryState::TeamLookupFailed,
            ProcessError::NoWorkspaceFound(_) => DeliveryState::NoWorkspaceFound,
            ProcessError::UpdateFailed { .. } => DeliveryState::UpdateFailed,
        }
    }
}

/// Calcula o due date a partir da agenda da tarefa
///
/// Só produz `Computed` quando os dois campos existem e são diferentes de
/// zero. Somas que estouram `i64` ou que não cabem em uma data do calendário
/// também viram `Skipped`.
pub fn compute_due_date(task: &TaskSnapshot) -> DueDateResult {
    let (start, estimate) = match (task.start_date, task.time_estimate) {
        (Some(start), Some(estimate)) if start != 0 && estimate != 0 => (start, estimate),
        _ => return DueDateResult::Skipped(MISSING_FIELDS_REASON.to_string()),
    };

    match start.checked_add(estimate) {
        Some(due) if to_iso8601(due).is_some() => DueDateResult::Computed(due),
        _ => DueDateResult::Skipped(format!(
            "due_date out of range (start_date={}, time_estimate={})",
            start, estimate
        )),
    }
}

/// Epoch ms → ISO-8601 UTC com milissegundos (`2023-11-14T23:13:20.000Z`)
pub fn to_iso8601(epoch_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Busca a tarefa, calcula e grava o due date
#[derive(Clone, Debug)]
pub struct DueDateService {
    tasks: TaskManager,
    teams: Option<Arc<TeamResolver>>,
}

impl DueDateService {
    pub fn new(tasks: TaskManager) -> Self {
        Self { tasks, teams: None }
    }

    /// Ativa a resolução de workspace antes de cada atualização
    pub fn with_team_resolver(mut self, resolver: Arc<TeamResolver>) -> Self {
        self.teams = Some(resolver);
        self
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.tasks
    }

    /// Processa uma tarefa
    ///
    /// - `Ok(Computed(ms))`: due date calculado e gravado no ClickUp
    /// - `Ok(Skipped(motivo))`: tarefa sem agenda, nenhuma atualização feita
    /// - `Err(ProcessError)`: falha em uma das chamadas remotas
    pub async fn process(&self, task_id: &str) -> Result<DueDateResult, ProcessError> {
        let task = self
            .tasks
            .get_task(task_id)
            .await
            .map_err(|source| ProcessError::FetchFailed {
                task_id: task_id.to_string(),
                source,
            })?;
        log_delivery_state(task_id, DeliveryState::TaskFetched);

        let due_date = match compute_due_date(&task) {
            DueDateResult::Computed(due_date) => due_date,
            DueDateResult::Skipped(reason) => {
                log_task_skipped(task_id, &reason);
                return Ok(DueDateResult::Skipped(reason));
            }
        };
        log_delivery_state(task_id, DeliveryState::Computed);
        log_due_date_computed(
            task_id,
            due_date,
            to_iso8601(due_date).as_deref().unwrap_or("?"),
        );

        let team_id = match &self.teams {
            Some(resolver) => Some(resolve_team_id(resolver).await?),
            None => None,
        };

        self.tasks
            .set_due_date(task_id, due_date, true, team_id.as_deref())
            .await
            .map_err(|source| ProcessError::UpdateFailed {
                task_id: task_id.to_string(),
                source,
            })?;

        if task.due_date == Some(due_date) {
            info!("ℹ️ Task {} já tinha due_date {}; regravado", task_id, due_date);
        }
        log_task_updated(task_id, due_date);

        Ok(DueDateResult::Computed(due_date))
    }
}

async fn resolve_team_id(resolver: &TeamResolver) -> Result<String, ProcessError> {
    match resolver.resolve().await {
        Ok(team) => Ok(team.id),
        Err(ClickUpError::NotFound(msg)) => Err(ProcessError::NoWorkspaceFound(msg)),
        Err(e) => Err(ProcessError::TeamLookupFailed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickup::{ClickUpClient, TeamFallback};
    use httpmock::prelude::*;
    use serde_json::json;

    fn task(start: Option<i64>, estimate: Option<i64>) -> TaskSnapshot {
        TaskSnapshot {
            id: "t".to_string(),
            start_date: start,
            time_estimate: estimate,
            due_date: None,
        }
    }

    fn service_for(server: &MockServer) -> DueDateService {
        let client = ClickUpClient::new("pk_test")
            .unwrap()
            .with_base_url(server.base_url());
        DueDateService::new(TaskManager::new(client))
    }

    #[test]
    fn test_compute_adds_estimate_to_start() {
        let result = compute_due_date(&task(Some(1_700_000_000_000), Some(3_600_000)));
        assert_eq!(result, DueDateResult::Computed(1_700_003_600_000));
    }

    #[test]
    fn test_compute_is_exact_for_many_pairs() {
        for (start, estimate) in [(1, 1), (86_400_000, 1), (1_600_000_000_000, 7_200_000), (1_700_000_000_123, 999)] {
            match compute_due_date(&task(Some(start), Some(estimate))) {
                DueDateResult::Computed(due) => {
                    assert_eq!(due, start + estimate);
                    let iso = to_iso8601(due).unwrap();
                    let parsed = DateTime::parse_from_rfc3339(&iso).unwrap();
                    assert_eq!(parsed.timestamp_millis(), due);
                }
                other => panic!("expected Computed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_compute_skips_missing_or_zero() {
        let cases = [
            task(None, Some(1)),
            task(Some(1), None),
            task(Some(0), Some(1)),
            task(Some(1), Some(0)),
            task(None, None),
        ];
        for t in cases {
            assert_eq!(
                compute_due_date(&t),
                DueDateResult::Skipped(MISSING_FIELDS_REASON.to_string())
            );
        }
    }

    #[test]
    fn test_compute_skips_overflow() {
        let result = compute_due_date(&task(Some(i64::MAX), Some(1)));
        assert!(!result.is_computed());
    }

    #[test]
    fn test_iso_format_has_millis_and_z() {
        assert_eq!(
            to_iso8601(1_700_003_600_000).as_deref(),
            Some("2023-11-14T23:13:20.000Z")
        );
    }

    #[tokio::test]
    async fn test_process_updates_task() {
        let server = MockServer::start_async().await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(GET).path("/task/86evfm5bq");
                then.status(200).json_body(json!({
                    "id": "86evfm5bq",
                    "start_date": "1700000000000",
                    "time_estimate": "3600000"
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/task/86evfm5bq")
                    .json_body(json!({"due_date": 1_700_003_600_000i64, "due_date_time": true}));
                then.status(200).json_body(json!({"id": "86evfm5bq"}));
            })
            .await;

        let result = service_for(&server).process("86evfm5bq").await.unwrap();

        assert_eq!(result, DueDateResult::Computed(1_700_003_600_000));
        fetch.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_skips_without_update() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/task/abc");
                then.status(200)
                    .json_body(json!({"id": "abc", "start_date": "1700000000000"}));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/task/abc");
                then.status(200);
            })
            .await;

        let result = service_for(&server).process("abc").await.unwrap();

        assert_eq!(result, DueDateResult::Skipped(MISSING_FIELDS_REASON.to_string()));
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_process_fetch_failure_is_distinct() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/task/abc");
                then.status(401).body(r#"{"err":"Token invalid","ECODE":"OAUTH_025"}"#);
            })
            .await;

        let err = service_for(&server).process("abc").await.unwrap_err();
        assert_eq!(err.state(), DeliveryState::FetchFailed);
        match err {
            ProcessError::FetchFailed { source, .. } => {
                assert_eq!(source.upstream_status(), Some(401));
                assert_eq!(
                    source.upstream_body(),
                    Some(r#"{"err":"Token invalid","ECODE":"OAUTH_025"}"#)
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_process_update_failure_is_distinct() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/task/abc");
                then.status(200)
                    .json_body(json!({"id": "abc", "start_date": 1000, "time_estimate": 500}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/task/abc");
                then.status(400).json_body(json!({"err": "Team must be specified"}));
            })
            .await;

        let err = service_for(&server).process("abc").await.unwrap_err();
        assert_eq!(err.state(), DeliveryState::UpdateFailed);
    }

    #[tokio::test]
    async fn test_process_with_team_resolution() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/task/abc");
                then.status(200)
                    .json_body(json!({"id": "abc", "start_date": 1000, "time_estimate": 500}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/team");
                then.status(200).json_body(json!({"teams": [
                    {"id": "2", "name": "Other"},
                    {"id": "1", "name": "Elearning Team"}
                ]}));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/task/abc").query_param("team_id", "1");
                then.status(200).json_body(json!({"id": "abc"}));
            })
            .await;

        let client = ClickUpClient::new("pk_test")
            .unwrap()
            .with_base_url(server.base_url());
        let resolver = TeamResolver::new(client, Some("Elearning".into()), TeamFallback::First);
        let service = service_for(&server).with_team_resolver(Arc::new(resolver));

        assert_eq!(service.process("abc").await.unwrap(), DueDateResult::Computed(1500));
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_no_workspace_skips_update() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/task/abc");
                then.status(200)
                    .json_body(json!({"id": "abc", "start_date": 1000, "time_estimate": 500}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/team");
                then.status(200).json_body(json!({"teams": [
                    {"id": "2", "name": "Other"},
                    {"id": "3", "name": "Another"}
                ]}));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/task/abc");
                then.status(200);
            })
            .await;

        let client = ClickUpClient::new("pk_test")
            .unwrap()
            .with_base_url(server.base_url());
        let resolver = TeamResolver::new(client, Some("Elearning".into()), TeamFallback::Reject);
        let service = service_for(&server).with_team_resolver(Arc::new(resolver));

        let err = service.process("abc").await.unwrap_err();
        assert_eq!(err.state(), DeliveryState::NoWorkspaceFound);
        update.assert_hits_async(0).await;
    }
}
