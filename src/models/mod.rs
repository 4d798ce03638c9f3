pub mod attributes;
pub mod batch;
pub mod config;
pub mod dialect;
pub mod query;

pub use attributes::DEFAULT_SPAN_NAME;
pub use batch::{batch_prefixed, BatchResult, BATCH_PREFIX};
pub use config::*;
pub use dialect::Dialect;
pub use query::SanitizedQuery;
