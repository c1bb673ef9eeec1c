use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Transaction {transaction_id}: customer age {age} is outside the bucketable range (0, 100]")]
    AgeOutOfRange { transaction_id: String, age: i64 },

    #[error("Transaction {transaction_id}: cannot parse timestamp {value:?}")]
    InvalidTimestamp {
        transaction_id: String,
        value: String,
    },
}

impl TransformError {
    pub fn transaction_id(&self) -> &str {
        match self {
            TransformError::AgeOutOfRange { transaction_id, .. }
            | TransformError::InvalidTimestamp { transaction_id, .. } => transaction_id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("Cannot build the date dimension from an empty batch")]
    EmptyBatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactError {
    #[error("Transaction {transaction_id}: {dimension} key {natural_key:?} has no dimension entry")]
    KeyResolution {
        transaction_id: String,
        dimension: &'static str,
        natural_key: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Numeric overflow while computing {aggregate}")]
    Overflow { aggregate: &'static str },

    #[error("Fact row references {table} key {key} which does not exist")]
    DanglingKey { table: &'static str, key: u64 },
}
