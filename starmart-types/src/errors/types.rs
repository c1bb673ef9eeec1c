use crate::types::FieldType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid field index: {0}")]
    InvalidFieldIndex(usize),
    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),
    #[error("Record has {actual} values but schema defines {expected} fields")]
    FieldCountMismatch { expected: usize, actual: usize },
    #[error("Invalid value for field {name}, field type: {field_type}, nullable: {nullable}")]
    InvalidFieldValue {
        name: String,
        field_type: FieldType,
        nullable: bool,
    },
}
