use crate::transform::TransformedTransaction;
use starmart_types::{errors::pipeline::DimensionError, tracing::info};
use std::collections::{BTreeMap, HashMap};

mod customer;
mod date;
mod product;
mod staff;
mod supplier;

pub use customer::{CustomerDimension, CustomerRow};
pub use date::{build_date_dimension, date_key, DateDimension, DateRow};
pub use product::{ProductDimension, ProductRow};
pub use staff::{StaffDimension, StaffRow};
pub use supplier::{SupplierDimension, SupplierRow};

/// A business entity deduplicated out of the transaction batch.
pub trait Dimension {
    /// Entity name used in logs and key resolution errors.
    const NAME: &'static str;

    type Row;

    fn natural_key(transaction: &TransformedTransaction) -> &str;

    /// Builds the dimension row for `key` from the representative transaction.
    fn row(key: u64, transaction: &TransformedTransaction) -> Self::Row;
}

/// Natural key to surrogate key mapping of one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    keys: HashMap<String, u64>,
}

impl KeyMap {
    pub fn get(&self, natural_key: &str) -> Option<u64> {
        self.keys.get(natural_key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionTable<R> {
    /// Rows ordered by surrogate key.
    pub rows: Vec<R>,
    pub keys: KeyMap,
}

/// Deduplicates `batch` by natural key.
///
/// Descriptive attributes come from the first transaction seen for each key.
/// Surrogate keys are assigned from 1 in natural key order, so the same batch
/// always yields the same keys.
pub fn build_dimension<D: Dimension>(batch: &[TransformedTransaction]) -> DimensionTable<D::Row> {
    let mut first_seen: BTreeMap<&str, &TransformedTransaction> = BTreeMap::new();
    for transaction in batch {
        first_seen
            .entry(D::natural_key(transaction))
            .or_insert(transaction);
    }

    let mut rows = Vec::with_capacity(first_seen.len());
    let mut keys = HashMap::with_capacity(first_seen.len());
    for (key, (natural_key, transaction)) in (1..).zip(first_seen) {
        keys.insert(natural_key.to_owned(), key);
        rows.push(D::row(key, transaction));
    }

    info!("Built dim_{} with {} rows", D::NAME, rows.len());
    DimensionTable {
        rows,
        keys: KeyMap { keys },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    pub product: DimensionTable<ProductRow>,
    pub customer: DimensionTable<CustomerRow>,
    pub date: DateDimension,
    pub staff: DimensionTable<StaffRow>,
    pub supplier: DimensionTable<SupplierRow>,
}

pub fn build_dimensions(batch: &[TransformedTransaction]) -> Result<Dimensions, DimensionError> {
    let date = build_date_dimension(batch)?;
    Ok(Dimensions {
        product: build_dimension::<ProductDimension>(batch),
        customer: build_dimension::<CustomerDimension>(batch),
        date,
        staff: build_dimension::<StaffDimension>(batch),
        supplier: build_dimension::<SupplierDimension>(batch),
    })
}
