use clickup::TeamFallback;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::services::NormalizerConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub clickup: ClickUpSettings,
    #[serde(default)]
    pub webhook: NormalizerConfig,
    #[serde(default)]
    pub team: TeamSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct ClickUpSettings {
    /// Personal token enviado no header `Authorization`. Sem valor padrão.
    #[serde(default)]
    pub token: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl ClickUpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl fmt::Debug for ClickUpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickUpSettings")
            .field("token", &if self.token.is_empty() { "<empty>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Resolução de workspace antes do PUT (`?team_id=`)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TeamSettings {
    pub enabled: bool,
    /// Trecho do nome do workspace preferido, ex.: "Elearning"
    pub name_hint: Option<String>,
    pub fallback: TeamFallback,
    /// Consulta `GET /team` uma vez por processo
    pub cache: bool,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            name_hint: None,
            fallback: TeamFallback::First,
            cache: true,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Self::defaults(Config::builder())?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DUEDATE_SERVER__PORT=9000, DUEDATE_TEAM__NAME_HINT=Elearning, ...
            .add_source(
                Environment::with_prefix("DUEDATE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // Nome usado pelo middleware antigo; CLICKUP_API_KEY tem prioridade
        if let Ok(token) = std::env::var("CLICKUP_API_TOKEN") {
            builder = builder.set_override("clickup.token", token)?;
        }
        if let Ok(token) = std::env::var("CLICKUP_API_KEY") {
            builder = builder.set_override("clickup.token", token)?;
        }

        Self::from_builder(builder)
    }

    /// Valores padrão de tudo, exceto o token
    pub fn defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("clickup.base_url", clickup::client::DEFAULT_BASE_URL)?
            .set_default("clickup.timeout_secs", 30)?
            .set_default("clickup.connect_timeout_secs", 5)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.clickup.token.trim().is_empty() {
            return Err(ConfigError::Message(
                "ClickUp token not configured (set CLICKUP_API_KEY)".to_string(),
            ));
        }
        if self.clickup.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "clickup.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.clickup.connect_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "clickup.connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ConfigBuilder<DefaultState> {
        Settings::defaults(Config::builder()).unwrap()
    }

    #[test]
    fn test_defaults_with_token() {
        let settings = Settings::from_builder(
            builder().set_override("clickup.token", "pk_test").unwrap(),
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.clickup.base_url, "https://api.clickup.com/api/v2");
        assert_eq!(settings.clickup.timeout(), Duration::from_secs(30));
        assert_eq!(settings.clickup.connect_timeout(), Duration::from_secs(5));
        assert_eq!(settings.webhook, NormalizerConfig::default());
        assert!(!settings.team.enabled);
        assert!(settings.team.cache);
        assert_eq!(settings.team.fallback, TeamFallback::First);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = Settings::from_builder(builder()).unwrap_err();
        assert!(err.to_string().contains("CLICKUP_API_KEY"));
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let result = Settings::from_builder(builder().set_override("clickup.token", "  ").unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let with_token = || builder().set_override("clickup.token", "pk_test").unwrap();

        let err = Settings::from_builder(with_token().set_override("clickup.timeout_secs", 0).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("clickup.timeout_secs"));

        let err = Settings::from_builder(
            with_token()
                .set_override("clickup.connect_timeout_secs", 0)
                .unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("clickup.connect_timeout_secs"));
    }

    #[test]
    fn test_team_and_webhook_overrides() {
        let settings = Settings::from_builder(
            builder()
                .set_override("clickup.token", "pk_test")
                .unwrap()
                .set_override("team.enabled", true)
                .unwrap()
                .set_override("team.name_hint", "Elearning")
                .unwrap()
                .set_override("team.fallback", "reject")
                .unwrap()
                .set_override("webhook.accept_form", false)
                .unwrap(),
        )
        .unwrap();

        assert!(settings.team.enabled);
        assert_eq!(settings.team.name_hint.as_deref(), Some("Elearning"));
        assert_eq!(settings.team.fallback, TeamFallback::Reject);
        assert!(!settings.webhook.accept_form);
        assert!(settings.webhook.accept_json);
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::from_builder(
            builder().set_override("clickup.token", "pk_secret").unwrap(),
        )
        .unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("pk_secret"));
    }
}
