use crate::transform::TransformedTransaction;
use starmart_types::{
    chrono::{Datelike, NaiveDate, Weekday},
    errors::pipeline::DimensionError,
    tracing::info,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRow {
    pub date_key: u64,
    pub full_date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: String,
    /// ISO week number
    pub week: u32,
    pub day: u32,
    /// Monday = 0
    pub day_of_week: u32,
    pub day_name: String,
    pub is_weekend: bool,
    pub year_month: String,
}

impl From<NaiveDate> for DateRow {
    fn from(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            date_key: date_key(date),
            full_date: date,
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
            month: date.month(),
            month_name: date.format("%B").to_string(),
            week: date.iso_week().week(),
            day: date.day(),
            day_of_week,
            day_name: date.format("%A").to_string(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            year_month: date.format("%Y-%m").to_string(),
        }
    }
}

/// `YYYYMMDD` as an integer.
pub fn date_key(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateDimension {
    /// One row per day from the first to the last transaction date, ascending.
    pub rows: Vec<DateRow>,
}

impl DateDimension {
    /// Row for `date_key`.
    pub fn get(&self, date_key: u64) -> Option<&DateRow> {
        self.rows
            .binary_search_by_key(&date_key, |row| row.date_key)
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

/// Generates every calendar day between the earliest and the latest
/// transaction date, including days without transactions.
pub fn build_date_dimension(
    batch: &[TransformedTransaction],
) -> Result<DateDimension, DimensionError> {
    let min = batch
        .iter()
        .map(|t| t.date)
        .min()
        .ok_or(DimensionError::EmptyBatch)?;
    let max = batch
        .iter()
        .map(|t| t.date)
        .max()
        .ok_or(DimensionError::EmptyBatch)?;

    let rows: Vec<DateRow> = min
        .iter_days()
        .take_while(|date| *date <= max)
        .map(DateRow::from)
        .collect();

    info!("Built dim_date with {} rows ({min} to {max})", rows.len());
    Ok(DateDimension { rows })
}
