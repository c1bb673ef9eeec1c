pub mod constants;
pub mod errors;
pub mod ingestion_types;
pub mod models;
pub mod types;

// Re-exports
pub use chrono;
pub use ordered_float;
#[macro_use]
pub extern crate prettytable;
pub use rust_decimal;
pub use serde;
pub use serde_json;
pub use serde_yaml;
pub use thiserror;
pub use tracing;
