pub mod due_date;
pub mod normalizer;

pub use due_date::{compute_due_date, to_iso8601, DueDateService, ProcessError, MISSING_FIELDS_REASON};
pub use normalizer::{normalize, parse_form, Normalizer, NormalizerConfig, QueryParams};
