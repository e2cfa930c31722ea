pub mod due_date_webhook;
pub mod health;

pub use due_date_webhook::*;
pub use health::*;
