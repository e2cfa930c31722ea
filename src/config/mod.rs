pub mod settings;

pub use settings::{ClickUpSettings, ServerSettings, Settings, TeamSettings};
