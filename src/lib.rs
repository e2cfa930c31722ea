// Webhook que recalcula o due date de tarefas do ClickUp
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use clickup::{ClickUpClient, ClickUpError, TaskManager, TeamResolver};
use std::sync::Arc;

// AppState é definido aqui para ser compartilhado
#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: config::Settings,
    pub due_dates: services::DueDateService,
    pub normalizer: services::Normalizer,
}

impl AppState {
    /// Monta cliente ClickUp, resolvedor de workspace e normalizador
    pub fn from_settings(settings: config::Settings) -> Result<Self, ClickUpError> {
        let client = ClickUpClient::with_timeouts(
            settings.clickup.token.clone(),
            settings.clickup.timeout(),
            settings.clickup.connect_timeout(),
        )?
        .with_base_url(settings.clickup.base_url.as_str());

        let mut due_dates = services::DueDateService::new(TaskManager::new(client.clone()));

        if settings.team.enabled {
            let resolver = TeamResolver::new(
                client,
                settings.team.name_hint.clone(),
                settings.team.fallback,
            );
            let resolver = if settings.team.cache {
                resolver
            } else {
                resolver.without_cache()
            };
            due_dates = due_dates.with_team_resolver(Arc::new(resolver));
        }

        Ok(Self {
            normalizer: services::Normalizer::new(settings.webhook),
            due_dates,
            settings,
        })
    }
}
