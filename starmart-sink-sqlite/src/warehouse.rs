use crate::{
    ddl::{self, STAGING_PREFIX},
    metadata::PublishLog,
    types::SqliteField,
    StorageError,
};
use rusqlite::{params_from_iter, types::Value, Connection, OpenFlags, TransactionBehavior};
use starmart_types::{
    chrono::Utc,
    tracing::{debug, info, warn},
    types::Table,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishReport {
    /// Row count of every published table, read back after commit.
    pub row_counts: Vec<(String, u64)>,
    /// Indexes that could not be created.
    pub failed_indexes: Vec<String>,
}

/// Exclusive handle on the warehouse database for the duration of a run.
///
/// The connection closes when the handle is dropped.
#[derive(Debug)]
pub struct Warehouse {
    conn: Connection,
    path: String,
    publish_log: bool,
}

impl Warehouse {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_owned(),
            source,
        })?;
        debug!("Opened warehouse {path}");
        Ok(Self {
            conn,
            path: path.to_owned(),
            publish_log: true,
        })
    }

    /// Opens an existing warehouse for queries only. A missing file is an
    /// error rather than a new empty database.
    pub fn open_read_only(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| StorageError::Open {
                path: path.to_owned(),
                source,
            })?;
        debug!("Opened warehouse {path} read-only");
        Ok(Self {
            conn,
            path: path.to_owned(),
            publish_log: false,
        })
    }

    /// Skips writing the publish log table.
    pub fn without_publish_log(mut self) -> Self {
        self.publish_log = false;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replaces the warehouse with `tables` in one transaction.
    ///
    /// Every table is first written under a staging name, then the live
    /// tables are dropped and the staging tables renamed in their place.
    /// Readers see either the previous warehouse or the new one. Index
    /// failures are logged and reported but do not fail the publish.
    pub fn publish(&mut self, tables: &[Table]) -> Result<PublishReport, StorageError> {
        for table in tables {
            table
                .validate()
                .map_err(|source| StorageError::InvalidTable {
                    table: table.name.clone(),
                    source,
                })?;
        }

        let mut staged: Vec<&Table> = tables.iter().collect();
        let log_table;
        if self.publish_log {
            log_table = PublishLog::new().table(tables, Utc::now().naive_utc());
            staged.push(&log_table);
        }

        let mut tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::Transaction)?;

        for leftover in staging_tables(&tx)? {
            debug!("Dropping leftover {leftover}");
            tx.execute_batch(&ddl::get_drop_table_query(&leftover))
                .map_err(StorageError::write(&leftover))?;
        }

        for table in &staged {
            write_staging(&tx, table)?;
        }

        for table in &staged {
            let staging = ddl::staging_name(&table.name);
            tx.execute_batch(&ddl::get_drop_table_query(&table.name))
                .map_err(StorageError::write(&table.name))?;
            tx.execute_batch(&ddl::get_rename_table_query(&staging, &table.name))
                .map_err(StorageError::write(&table.name))?;
        }

        let mut failed_indexes = vec![];
        for table in tables {
            let field_names = table.schema.field_names();
            for index in &table.schema.secondary_indexes {
                let columns: Vec<&str> = index.fields.iter().map(|idx| field_names[*idx]).collect();
                let query = ddl::get_create_index_query(&index.name, &table.name, &columns);

                let savepoint = tx.savepoint().map_err(StorageError::Transaction)?;
                match savepoint.execute_batch(&query) {
                    Ok(()) => savepoint.commit().map_err(StorageError::Transaction)?,
                    // Dropping the savepoint rolls it back
                    Err(e) => {
                        warn!("Cannot create index {} on {}: {e}", index.name, table.name);
                        failed_indexes.push(index.name.clone());
                    }
                }
            }
        }

        tx.commit().map_err(StorageError::Transaction)?;
        info!("Published {} tables to {}", tables.len(), self.path);

        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        let row_counts = self
            .row_counts(&names)?
            .into_iter()
            .map(|(name, count)| (name, count.unwrap_or_default()))
            .collect();
        Ok(PublishReport {
            row_counts,
            failed_indexes,
        })
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool, StorageError> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table_name],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .map_err(StorageError::read(table_name))
    }

    /// Row count per table, `None` for tables that do not exist.
    pub fn row_counts(
        &self,
        table_names: &[&str],
    ) -> Result<Vec<(String, Option<u64>)>, StorageError> {
        table_names
            .iter()
            .map(|name| {
                if !self.table_exists(name)? {
                    return Ok((name.to_string(), None));
                }
                let count = self
                    .conn
                    .query_row(&ddl::get_count_query(name), [], |row| row.get::<_, i64>(0))
                    .map_err(StorageError::read(name))?;
                Ok((name.to_string(), Some(count.max(0) as u64)))
            })
            .collect()
    }

    /// Every row of `table_name` in insertion order.
    pub fn fetch_rows(&self, table_name: &str) -> Result<Vec<Vec<Value>>, StorageError> {
        let query = format!("SELECT * FROM {} ORDER BY rowid", ddl::quote(table_name));
        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(StorageError::read(table_name))?;
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(StorageError::read(table_name))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::read(table_name))
    }
}

fn staging_tables(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let pattern = format!("{STAGING_PREFIX}%");
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE ?1 ESCAPE '\\'")
        .map_err(StorageError::read("sqlite_master"))?;
    let names = stmt
        .query_map([pattern.replace('_', "\\_")], |row| row.get::<_, String>(0))
        .map_err(StorageError::read("sqlite_master"))?;
    names
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StorageError::read("sqlite_master"))
}

fn write_staging(conn: &Connection, table: &Table) -> Result<(), StorageError> {
    let staging = ddl::staging_name(&table.name);
    conn.execute_batch(&ddl::get_create_table_query(&staging, &table.schema))
        .map_err(StorageError::write(&table.name))?;

    let mut stmt = conn
        .prepare(&ddl::get_insert_query(&staging, &table.schema))
        .map_err(StorageError::write(&table.name))?;
    for record in &table.records {
        stmt.execute(params_from_iter(record.values.iter().map(SqliteField)))
            .map_err(StorageError::write(&table.name))?;
    }
    debug!("Staged {} rows for {}", table.records.len(), table.name);
    Ok(())
}
