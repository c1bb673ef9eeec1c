use async_trait::async_trait;
use starmart_types::{
    errors::connector::{ConnectorError, MalformedReason},
    ingestion_types::RawTransaction,
    models::source::SourceConfig,
    serde_json::{self, Value},
};
use std::fmt::Debug;

pub mod file;
pub mod http;

pub use file::FileConnector;
pub use http::HttpConnector;

#[async_trait]
pub trait Connector: Send + Sync + Debug {
    /// Short name of the source kind, used in logs.
    fn type_name(&self) -> &'static str;

    /// Where records are read from.
    fn address(&self) -> &str;

    /// Checks the source can be reached without reading the whole feed.
    async fn validate_connection(&self) -> Result<(), ConnectorError>;

    /// Reads the complete current feed.
    ///
    /// Either every record is returned, in feed order, or the call fails.
    /// Partial reads are never returned.
    async fn extract(&self) -> Result<Vec<RawTransaction>, ConnectorError>;
}

pub fn get_connector(config: SourceConfig) -> Result<Box<dyn Connector>, ConnectorError> {
    match config {
        SourceConfig::Http(config) => Ok(Box::new(HttpConnector::new(config)?)),
        SourceConfig::File(config) => Ok(Box::new(FileConnector::new(config))),
    }
}

/// Deserializes feed records and applies the shape checks.
///
/// `first_index` is the position of the first value in the whole feed, so
/// errors point at the right record when reading pages.
pub(crate) fn parse_records(
    address: &str,
    values: Vec<Value>,
    first_index: usize,
) -> Result<Vec<RawTransaction>, ConnectorError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let index = first_index + i;
            let record_error = |message: String| {
                ConnectorError::malformed(address, MalformedReason::Record { index, message })
            };
            let transaction: RawTransaction =
                serde_json::from_value(value).map_err(|e| record_error(e.to_string()))?;
            transaction.check_shape().map_err(record_error)?;
            Ok(transaction)
        })
        .collect()
}
