use starmart_types::types::{FieldDefinition, FieldType, Schema};

/// Prefix of tables being built before they replace the live ones.
pub const STAGING_PREFIX: &str = "__staging_";

pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

pub fn staging_name(table_name: &str) -> String {
    format!("{STAGING_PREFIX}{table_name}")
}

pub fn map_field_to_type(field: &FieldDefinition) -> &'static str {
    match field.typ {
        FieldType::UInt | FieldType::Int | FieldType::Boolean => "INTEGER",
        FieldType::Float | FieldType::Decimal => "REAL",
        FieldType::String | FieldType::Timestamp | FieldType::Date => "TEXT",
    }
}

pub fn get_create_table_query(table_name: &str, schema: &Schema) -> String {
    let mut parts = schema
        .fields
        .iter()
        .map(|field| {
            let typ = map_field_to_type(field);
            let null = if field.nullable { "" } else { " NOT NULL" };
            format!("{} {typ}{null}", quote(&field.name))
        })
        .collect::<Vec<_>>();

    if !schema.primary_index.is_empty() {
        let pk = schema
            .primary_index
            .iter()
            .map(|idx| quote(&schema.fields[*idx].name))
            .collect::<Vec<_>>();
        parts.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }

    format!("CREATE TABLE {} (\n{}\n)", quote(table_name), parts.join(",\n"))
}

pub fn get_insert_query(table_name: &str, schema: &Schema) -> String {
    let columns = schema
        .fields
        .iter()
        .map(|field| quote(&field.name))
        .collect::<Vec<_>>();
    let params = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table_name),
        columns.join(", "),
        params.join(", ")
    )
}

pub fn get_create_index_query(index_name: &str, table_name: &str, columns: &[&str]) -> String {
    let columns = columns.iter().map(|c| quote(c)).collect::<Vec<_>>();
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
        quote(index_name),
        quote(table_name),
        columns.join(", ")
    )
}

pub fn get_drop_table_query(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote(table_name))
}

pub fn get_rename_table_query(from: &str, to: &str) -> String {
    format!("ALTER TABLE {} RENAME TO {}", quote(from), quote(to))
}

pub fn get_count_query(table_name: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote(table_name))
}
