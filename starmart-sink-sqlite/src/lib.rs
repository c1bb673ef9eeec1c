pub mod ddl;
mod errors;
pub mod metadata;
mod types;
mod warehouse;

pub use errors::StorageError;
pub use rusqlite;
pub use types::SqliteField;
pub use warehouse::{PublishReport, Warehouse};
