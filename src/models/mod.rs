pub mod outcome;
pub mod webhook_payload;

pub use outcome::{DeliveryState, DueDateResult};
pub use webhook_payload::{BodyFormat, RawBody, TaskIdSource, WebhookPayload, CATCH_ALL_FIELD};
