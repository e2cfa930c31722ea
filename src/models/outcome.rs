use serde::Serialize;
use std::fmt;

/// Resultado do cálculo de due date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDateResult {
    /// `start_date + time_estimate`, em epoch ms
    Computed(i64),
    /// Tarefa sem os campos necessários; não é erro
    Skipped(String),
}

impl DueDateResult {
    pub fn is_computed(&self) -> bool {
        matches!(self, DueDateResult::Computed(_))
    }
}

/// Estados de uma entrega de webhook
///
/// `Received → Normalized → TaskFetched → {Skipped | Computed → Updated}`,
/// com saídas de erro em `InvalidInput`, `FetchFailed`, `TeamLookupFailed`,
/// `NoWorkspaceFound` e `UpdateFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Received,
    Normalized,
    TaskFetched,
    Computed,
    Skipped,
    Updated,
    InvalidInput,
    FetchFailed,
    TeamLookupFailed,
    NoWorkspaceFound,
    UpdateFailed,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryState::Received => "received",
            DeliveryState::Normalized => "normalized",
            DeliveryState::TaskFetched => "task_fetched",
            DeliveryState::Computed => "computed",
            DeliveryState::Skipped => "skipped",
            DeliveryState::Updated => "updated",
            DeliveryState::InvalidInput => "invalid_input",
            DeliveryState::FetchFailed => "fetch_failed",
            DeliveryState::TeamLookupFailed => "team_lookup_failed",
            DeliveryState::NoWorkspaceFound => "no_workspace_found",
            DeliveryState::UpdateFailed => "update_failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            DeliveryState::Received
                | DeliveryState::Normalized
                | DeliveryState::TaskFetched
                | DeliveryState::Computed
        )
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        for state in [
            DeliveryState::Skipped,
            DeliveryState::Updated,
            DeliveryState::InvalidInput,
            DeliveryState::FetchFailed,
            DeliveryState::TeamLookupFailed,
            DeliveryState::NoWorkspaceFound,
            DeliveryState::UpdateFailed,
        ] {
            assert!(state.is_terminal(), "{state} should be terminal");
        }
        assert!(!DeliveryState::TaskFetched.is_terminal());
    }

    #[test]
    fn test_serialized_name_matches_as_str() {
        let value = serde_json::to_value(DeliveryState::NoWorkspaceFound).unwrap();
        assert_eq!(value, DeliveryState::NoWorkspaceFound.as_str());
    }
}
