//! Tipos do ClickUp API
//!
//! ## ⚠️ Notas Importantes
//!
//! - **Timestamps**: Sempre em milissegundos (i64), nunca segundos
//! - **start_date / due_date**: a API v2 devolve como string numérica
//!   (`"1700000000000"`), enquanto `time_estimate` costuma vir como número.
//!   Os dois formatos são aceitos.

pub mod task;
pub mod team;

pub use task::TaskSnapshot;
pub use team::{Team, TeamFallback};
