use starmart_types::{
    chrono::NaiveDateTime,
    types::{FieldDefinition, FieldType, Record, Schema, Table},
};

// Publish log constants
pub const PUBLISH_LOG_TABLE: &str = "__starmart_publish_log";
pub const META_TABLE_COL: &str = "table_name";
pub const META_ROW_COUNT_COL: &str = "row_count";
pub const META_PUBLISHED_AT_COL: &str = "published_at";

/// Records which tables the last publish wrote and how many rows each had.
pub struct PublishLog {
    pub schema: Schema,
}

impl PublishLog {
    pub fn new() -> Self {
        let mut schema = Schema::new();
        schema
            .field(
                FieldDefinition::new(META_TABLE_COL, FieldType::String, false),
                true,
            )
            .field(
                FieldDefinition::new(META_ROW_COUNT_COL, FieldType::UInt, false),
                false,
            )
            .field(
                FieldDefinition::new(META_PUBLISHED_AT_COL, FieldType::Timestamp, false),
                false,
            );
        Self { schema }
    }

    pub fn table(&self, tables: &[Table], published_at: NaiveDateTime) -> Table {
        let records = tables
            .iter()
            .map(|table| {
                Record::new(vec![
                    table.name.as_str().into(),
                    (table.records.len() as u64).into(),
                    published_at.into(),
                ])
            })
            .collect();
        Table::new(PUBLISH_LOG_TABLE, self.schema.clone(), records)
    }
}

impl Default for PublishLog {
    fn default() -> Self {
        Self::new()
    }
}
