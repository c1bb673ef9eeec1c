use super::{parse_records, Connector};
use async_trait::async_trait;
use starmart_types::{
    chrono::NaiveDateTime,
    constants::{CSV_DATETIME_FORMAT, TIMESTAMP_FORMAT},
    errors::connector::{ConnectorError, MalformedReason, UnreachableReason},
    ingestion_types::{FeedEnvelope, RawTransaction},
    models::source::FileSourceConfig,
    serde_json::{self, Value},
    tracing::info,
};
use std::path::Path;

/// Reads the feed from a local `.csv` or `.json` export.
#[derive(Debug)]
pub struct FileConnector {
    config: FileSourceConfig,
}

impl FileConnector {
    pub fn new(config: FileSourceConfig) -> Self {
        Self { config }
    }

    fn extension(&self) -> String {
        Path::new(&self.config.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn malformed(&self, reason: MalformedReason) -> ConnectorError {
        ConnectorError::malformed(&self.config.path, reason)
    }

    async fn read(&self) -> Result<Vec<u8>, ConnectorError> {
        tokio::fs::read(&self.config.path)
            .await
            .map_err(|e| ConnectorError::unreachable(&self.config.path, UnreachableReason::Io(e)))
    }

    fn parse_json(&self, bytes: &[u8]) -> Result<Vec<RawTransaction>, ConnectorError> {
        let values = match serde_json::from_slice(bytes)
            .map_err(|e| self.malformed(MalformedReason::Json(e)))?
        {
            Value::Array(values) => values,
            envelope => {
                serde_json::from_value::<FeedEnvelope>(envelope)
                    .map_err(|e| self.malformed(MalformedReason::Json(e)))?
                    .data
            }
        };
        parse_records(&self.config.path, values, 0)
    }

    fn parse_csv(&self, bytes: &[u8]) -> Result<Vec<RawTransaction>, ConnectorError> {
        let datetime_format = self
            .config
            .datetime_format
            .as_deref()
            .unwrap_or(CSV_DATETIME_FORMAT);

        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader
            .headers()
            .map_err(|e| self.malformed(MalformedReason::Csv(Box::new(e))))?
            .clone();

        let mut transactions = vec![];
        for (index, row) in reader.records().enumerate() {
            let record_error = |message: String| {
                self.malformed(MalformedReason::Record { index, message })
            };
            let row = row.map_err(|e| record_error(e.to_string()))?;
            let mut transaction: RawTransaction = row
                .deserialize(Some(&headers))
                .map_err(|e| record_error(e.to_string()))?;
            transaction.check_shape().map_err(record_error)?;

            // Exports carry day-first timestamps; anything else is left to the transformer.
            if let Ok(timestamp) =
                NaiveDateTime::parse_from_str(transaction.timestamp.trim(), datetime_format)
            {
                transaction.timestamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
            }
            transactions.push(transaction);
        }
        Ok(transactions)
    }
}

#[async_trait]
impl Connector for FileConnector {
    fn type_name(&self) -> &'static str {
        "file"
    }

    fn address(&self) -> &str {
        &self.config.path
    }

    async fn validate_connection(&self) -> Result<(), ConnectorError> {
        tokio::fs::metadata(&self.config.path)
            .await
            .map(|_| ())
            .map_err(|e| ConnectorError::unreachable(&self.config.path, UnreachableReason::Io(e)))
    }

    async fn extract(&self) -> Result<Vec<RawTransaction>, ConnectorError> {
        info!("Extracting transactions from {}", self.config.path);
        let extension = self.extension();
        match extension.as_str() {
            "csv" => {
                let bytes = self.read().await?;
                self.parse_csv(&bytes)
            }
            "json" => {
                let bytes = self.read().await?;
                self.parse_json(&bytes)
            }
            _ => Err(self.malformed(MalformedReason::UnsupportedFormat(extension))),
        }
    }
}
