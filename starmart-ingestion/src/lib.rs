pub mod connectors;

pub use async_trait;
pub use connectors::{get_connector, Connector};
pub use starmart_types;
pub use tokio;
