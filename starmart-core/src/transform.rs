use starmart_types::{
    chrono::{Datelike, NaiveDate, NaiveDateTime},
    errors::pipeline::TransformError,
    ingestion_types::RawTransaction,
    models::config::ValidationPolicy,
    tracing::warn,
};

/// Upper-inclusive age bands. An age belongs to the first band whose upper
/// bound it does not exceed, provided it is above zero.
const AGE_GROUPS: [(i64, &str); 5] = [
    (25, "18-25"),
    (35, "26-35"),
    (45, "36-45"),
    (55, "46-55"),
    (100, "56+"),
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Label of the age band `age` falls in, `None` outside (0, 100].
pub fn age_group(age: i64) -> Option<&'static str> {
    if age <= 0 {
        return None;
    }
    AGE_GROUPS
        .iter()
        .find(|(upper, _)| age <= *upper)
        .map(|(_, label)| *label)
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Surrogate keys of the business entities a transaction refers to. Left
/// empty by the transformer and resolved when facts are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityKeys {
    pub product: Option<u64>,
    pub customer: Option<u64>,
    pub staff: Option<u64>,
    pub supplier: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformedTransaction {
    pub raw: RawTransaction,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// `YYYY-MM`
    pub year_month: String,
    pub age_group: &'static str,
    pub keys: EntityKeys,
}

impl TryFrom<RawTransaction> for TransformedTransaction {
    type Error = TransformError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let timestamp =
            parse_timestamp(&raw.timestamp).ok_or_else(|| TransformError::InvalidTimestamp {
                transaction_id: raw.transaction_id.clone(),
                value: raw.timestamp.clone(),
            })?;
        let age_group =
            age_group(raw.customer_age).ok_or_else(|| TransformError::AgeOutOfRange {
                transaction_id: raw.transaction_id.clone(),
                age: raw.customer_age,
            })?;

        let date = timestamp.date();
        Ok(Self {
            raw,
            timestamp,
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            year_month: date.format("%Y-%m").to_string(),
            age_group,
            keys: EntityKeys::default(),
        })
    }
}

#[derive(Debug, Default)]
pub struct TransformOutput {
    pub transactions: Vec<TransformedTransaction>,
    /// Rows dropped under [`ValidationPolicy::Reject`].
    pub rejected: Vec<TransformError>,
}

/// Derives calendar fields and age groups for every row, in input order.
pub fn transform(
    raw: Vec<RawTransaction>,
    policy: ValidationPolicy,
) -> Result<TransformOutput, TransformError> {
    let mut output = TransformOutput {
        transactions: Vec::with_capacity(raw.len()),
        rejected: vec![],
    };
    for transaction in raw {
        match TransformedTransaction::try_from(transaction) {
            Ok(transformed) => output.transactions.push(transformed),
            Err(e) => match policy {
                ValidationPolicy::Abort => return Err(e),
                ValidationPolicy::Reject => {
                    warn!("Rejecting row: {e}");
                    output.rejected.push(e);
                }
            },
        }
    }
    Ok(output)
}
