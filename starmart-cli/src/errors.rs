#![allow(clippy::enum_variant_names)]

use starmart_sink_sqlite::StorageError;
use starmart_types::errors::{
    connector::ConnectorError,
    internal::BoxedError,
    pipeline::{AggregateError, DimensionError, FactError, TransformError},
    types::TypeError,
};
use starmart_types::thiserror::{self, Error};
use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("[extract] {0}")]
    Extract(#[from] ConnectorError),
    #[error("[transform] {0}")]
    Transform(#[from] TransformError),
    #[error("[dimensions] {0}")]
    Dimension(#[from] DimensionError),
    #[error("[facts] {0}")]
    Fact(#[from] FactError),
    #[error("[aggregates] {0}")]
    Aggregate(#[from] AggregateError),
    #[error("[load] {0}")]
    Storage(#[from] StorageError),
    #[error("[load] Cannot lay out warehouse tables: {0}")]
    Schema(#[from] TypeError),
    #[error(transparent)]
    CliError(#[from] CliError),
}

/// Failure classes callers can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceUnreachable,
    SourceMalformed,
    Validation,
    EmptyBatch,
    KeyResolution,
    AggregateCompute,
    StorageWrite,
    Config,
}

impl OrchestrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestrationError::Extract(ConnectorError::SourceUnreachable { .. }) => {
                ErrorKind::SourceUnreachable
            }
            OrchestrationError::Extract(ConnectorError::SourceMalformed { .. }) => {
                ErrorKind::SourceMalformed
            }
            OrchestrationError::Transform(_) => ErrorKind::Validation,
            OrchestrationError::Dimension(DimensionError::EmptyBatch) => ErrorKind::EmptyBatch,
            OrchestrationError::Fact(FactError::KeyResolution { .. }) => ErrorKind::KeyResolution,
            OrchestrationError::Aggregate(_) => ErrorKind::AggregateCompute,
            OrchestrationError::Storage(_) | OrchestrationError::Schema(_) => {
                ErrorKind::StorageWrite
            }
            OrchestrationError::CliError(_) => ErrorKind::Config,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to parse starmart config: {0}")]
    FailedToParseYaml(#[source] BoxedError),
    #[error("File system error {0:?}: {1}")]
    FileSystem(PathBuf, #[source] std::io::Error),
    #[error("Failed to create tokio runtime: {0}")]
    FailedToCreateTokioRuntime(#[source] std::io::Error),
}
