use starmart_types::errors::types::TypeError;
use starmart_types::thiserror::{self, Error};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot open warehouse {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Cannot write table {table}: {source}")]
    StorageWrite {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Table {table} does not match its schema: {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: TypeError,
    },

    #[error("Warehouse transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),

    #[error("Cannot read table {table}: {source}")]
    Read {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl StorageError {
    pub(crate) fn write(table: &str) -> impl FnOnce(rusqlite::Error) -> StorageError + '_ {
        move |source| StorageError::StorageWrite {
            table: table.to_owned(),
            source,
        }
    }

    pub(crate) fn read(table: &str) -> impl FnOnce(rusqlite::Error) -> StorageError + '_ {
        move |source| StorageError::Read {
            table: table.to_owned(),
            source,
        }
    }
}
