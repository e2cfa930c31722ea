//! Resolução de workspace (team)
//!
//! Quando o token enxerga mais de um workspace, o ClickUp exige `team_id`
//! em algumas atualizações. A escolha segue esta ordem:
//!
//! 1. Nenhum workspace → erro `NotFound`
//! 2. Um único workspace → ele
//! 3. Vários → o primeiro cujo nome contém a dica configurada
//!    (sem diferenciar maiúsculas nem acentos)
//! 4. Nenhum casou → `TeamFallback` decide (primeiro da lista ou erro)

use crate::client::ClickUpClient;
use crate::error::{ClickUpError, Result};
use crate::types::{Team, TeamFallback};
use deunicode::deunicode;
use serde::Deserialize;
use tokio::sync::OnceCell;

/// Lista os workspaces visíveis para o token
///
/// `GET /api/v2/team`. Aceita tanto `{"teams": [...]}` quanto um array puro.
pub async fn list_teams(client: &ClickUpClient) -> Result<Vec<Team>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TeamsResponse {
        Wrapped { teams: Vec<Team> },
        Bare(Vec<Team>),
    }

    let response: TeamsResponse = client.get_json("/team").await?;
    let teams = match response {
        TeamsResponse::Wrapped { teams } => teams,
        TeamsResponse::Bare(teams) => teams,
    };

    tracing::debug!("📋 {} workspace(s) visíveis para o token", teams.len());
    Ok(teams)
}

fn fold_name(name: &str) -> String {
    deunicode(name).to_lowercase()
}

/// Escolhe o workspace a usar dentre os listados
pub fn select_team<'a>(
    teams: &'a [Team],
    name_hint: Option<&str>,
    fallback: TeamFallback,
) -> Option<&'a Team> {
    match teams {
        [] => None,
        [only] => Some(only),
        _ => {
            let hint = name_hint
                .map(fold_name)
                .filter(|h| !h.trim().is_empty());

            if let Some(hint) = hint {
                if let Some(team) = teams.iter().find(|t| fold_name(&t.name).contains(&hint)) {
                    return Some(team);
                }
                tracing::warn!(
                    "⚠️ Nenhum workspace contém '{}' no nome ({} disponíveis)",
                    hint,
                    teams.len()
                );
            }

            match fallback {
                TeamFallback::First => teams.first(),
                TeamFallback::Reject => None,
            }
        }
    }
}

/// Resolve o workspace usado no `team_id` das atualizações
///
/// Com `cache` ligado, a lista de workspaces é consultada uma única vez por
/// processo; sem cache, a cada chamada. Em caso de erro nada é guardado.
#[derive(Debug)]
pub struct TeamResolver {
    client: ClickUpClient,
    name_hint: Option<String>,
    fallback: TeamFallback,
    cache: Option<OnceCell<Team>>,
}

impl TeamResolver {
    pub fn new(client: ClickUpClient, name_hint: Option<String>, fallback: TeamFallback) -> Self {
        Self {
            client,
            name_hint,
            fallback,
            cache: Some(OnceCell::new()),
        }
    }

    /// Desliga o cache: cada `resolve` volta a listar os workspaces
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub async fn resolve(&self) -> Result<Team> {
        match &self.cache {
            Some(cell) => cell.get_or_try_init(|| self.fetch_and_select()).await.cloned(),
            None => self.fetch_and_select().await,
        }
    }

    async fn fetch_and_select(&self) -> Result<Team> {
        let teams = list_teams(&self.client).await?;

        let team = select_team(&teams, self.name_hint.as_deref(), self.fallback)
            .cloned()
            .ok_or_else(|| {
                ClickUpError::NotFound(match (teams.len(), self.name_hint.as_deref()) {
                    (0, _) => "no workspace visible to the API token".to_string(),
                    (n, Some(hint)) => {
                        format!("none of the {} workspaces matches '{}'", n, hint)
                    }
                    (n, None) => format!(
                        "{} workspaces visible and no name hint configured",
                        n
                    ),
                })
            })?;

        tracing::info!("🏢 Workspace selecionado: {} ({})", team.name, team.id);
        Ok(team)
    }
}
