use crate::errors::types::TypeError;
use serde::{Deserialize, Serialize};

mod field;

pub use field::{Field, FieldType};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub typ: FieldType,
    pub nullable: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, typ: FieldType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            typ,
            nullable,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: String,
    /// Indexes of the fields forming the index key
    pub fields: Vec<usize>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Schema {
    /// Column definitions, in storage order.
    pub fields: Vec<FieldDefinition>,

    /// Indexes of the fields forming the primary key. Empty for tables
    /// without a natural identity, such as aggregates.
    pub primary_index: Vec<usize>,

    /// Secondary indexes created after the table is published.
    pub secondary_indexes: Vec<IndexDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, definition: FieldDefinition, primary_key: bool) -> &mut Self {
        self.fields.push(definition);
        if primary_key {
            self.primary_index.push(self.fields.len() - 1);
        }
        self
    }

    pub fn index(
        &mut self,
        name: impl Into<String>,
        field_names: &[&str],
    ) -> Result<&mut Self, TypeError> {
        let fields = field_names
            .iter()
            .map(|name| self.get_field_index(name).map(|(idx, _)| idx))
            .collect::<Result<Vec<_>, _>>()?;
        self.secondary_indexes.push(IndexDefinition {
            name: name.into(),
            fields,
        });
        Ok(self)
    }

    pub fn get_field_index(&self, name: &str) -> Result<(usize, &FieldDefinition), TypeError> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .ok_or_else(|| TypeError::InvalidFieldName(name.to_owned()))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Record {
    /// List of values, following the definitions of `fields` of the associated schema
    pub values: Vec<Field>,
}

impl Record {
    pub fn new(values: Vec<Field>) -> Record {
        Record { values }
    }

    pub fn get_value(&self, idx: usize) -> Result<&Field, TypeError> {
        self.values
            .get(idx)
            .ok_or(TypeError::InvalidFieldIndex(idx))
    }
}

/// A fully materialized table ready to be published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            schema,
            records,
        }
    }

    /// Checks every record against the schema width and nullability.
    pub fn validate(&self) -> Result<(), TypeError> {
        let expected = self.schema.fields.len();
        for record in &self.records {
            if record.values.len() != expected {
                return Err(TypeError::FieldCountMismatch {
                    expected,
                    actual: record.values.len(),
                });
            }
            for (value, definition) in record.values.iter().zip(&self.schema.fields) {
                let valid = match value.get_type() {
                    None => definition.nullable,
                    Some(typ) => typ == definition.typ,
                };
                if !valid {
                    return Err(TypeError::InvalidFieldValue {
                        name: definition.name.clone(),
                        field_type: definition.typ,
                        nullable: definition.nullable,
                    });
                }
            }
        }
        Ok(())
    }
}
