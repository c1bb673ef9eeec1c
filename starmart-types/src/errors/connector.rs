#![allow(clippy::enum_variant_names)]
use crate::errors::internal::BoxedError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Cannot reach source {address}: {reason}")]
    SourceUnreachable {
        address: String,
        #[source]
        reason: UnreachableReason,
    },

    #[error("Source {address} returned data in an unexpected shape: {reason}")]
    SourceMalformed {
        address: String,
        #[source]
        reason: MalformedReason,
    },
}

impl ConnectorError {
    pub fn unreachable(address: impl Into<String>, reason: UnreachableReason) -> Self {
        ConnectorError::SourceUnreachable {
            address: address.into(),
            reason,
        }
    }

    pub fn malformed(address: impl Into<String>, reason: MalformedReason) -> Self {
        ConnectorError::SourceMalformed {
            address: address.into(),
            reason,
        }
    }
}

#[derive(Error, Debug)]
pub enum UnreachableReason {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(#[source] BoxedError),

    #[error("responded with HTTP status {0}")]
    Status(u16),

    #[error("cannot read file: {0}")]
    Io(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MalformedReason {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid csv: {0}")]
    Csv(#[source] BoxedError),

    #[error("record {index}: {message}")]
    Record { index: usize, message: String },

    #[error("envelope announced {expected} records but {received} were received")]
    CountMismatch { expected: usize, received: usize },

    #[error("page of {received} records exceeds the requested limit of {page_size}")]
    PageOverflow { page_size: usize, received: usize },

    #[error("feed kept returning full pages past the {limit} pages its total allows")]
    TooManyPages { limit: usize },

    #[error("unsupported file format {0:?}, expected .csv or .json")]
    UnsupportedFormat(String),
}
