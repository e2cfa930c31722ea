//! Cliente enxuto da API ClickUp
//!
//! Cobre o necessário para recalcular due dates a partir de webhooks:
//!
//! - Leitura de tarefas (`start_date`, `time_estimate`)
//! - Atualização de `due_date` com `due_date_time`
//! - Resolução de workspace (`team_id`) quando o token enxerga vários
//!
//! # API ClickUp v2
//!
//! - **Tasks**: `/task/{task_id}`
//! - **Teams**: `/team`
//! - **User**: `/user`
//!
//! # Exemplo Básico
//!
//! ```rust,no_run
//! use clickup::{ClickUpClient, tasks::TaskManager};
//!
//! # async fn example() -> clickup::Result<()> {
//! // IMPORTANTE: Ler de variáveis de ambiente (NUNCA hardcode!)
//! let api_token = std::env::var("CLICKUP_API_KEY").unwrap_or_default();
//!
//! let manager = TaskManager::new(ClickUpClient::new(api_token)?);
//! let task = manager.get_task("86evfm5bq").await?;
//!
//! if let (Some(start), Some(estimate)) = (task.start_date, task.time_estimate) {
//!     manager.set_due_date(&task.id, start + estimate, true, None).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod tasks;
pub mod teams;
pub mod types;

// Re-exports principais
pub use client::ClickUpClient;
pub use error::{ClickUpError, Result};
pub use tasks::TaskManager;
pub use teams::TeamResolver;
pub use types::{TaskSnapshot, Team, TeamFallback};
