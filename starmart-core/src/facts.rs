use crate::{
    dimensions::{date_key, Dimensions, KeyMap},
    transform::TransformedTransaction,
};
use starmart_types::{
    chrono::NaiveDateTime,
    errors::pipeline::FactError,
    ingestion_types::TransactionStatus,
    rust_decimal::Decimal,
    tracing::info,
};

/// One row of `fact_transactions`: foreign keys, measures and the natural
/// attributes aggregates group by.
#[derive(Debug, Clone, PartialEq)]
pub struct FactTransaction {
    pub product_key: u64,
    pub customer_key: u64,
    pub date_key: u64,
    pub staff_key: u64,
    pub supplier_key: u64,
    pub transaction_id: String,
    pub transaction_datetime: NaiveDateTime,
    pub order_type: String,
    pub payment_method: String,
    pub transaction_status: TransactionStatus,
    pub quantity: u32,
    pub total_amount: Decimal,
    pub discount_applied: Decimal,
    pub delivery_time_min: f64,
    pub customer_rating: f64,
    pub inventory_level: i64,
}

fn resolve(
    keys: &KeyMap,
    dimension: &'static str,
    natural_key: &str,
    transaction_id: &str,
) -> Result<u64, FactError> {
    keys.get(natural_key)
        .ok_or_else(|| FactError::KeyResolution {
            transaction_id: transaction_id.to_owned(),
            dimension,
            natural_key: natural_key.to_owned(),
        })
}

fn build_fact(
    transaction: &TransformedTransaction,
    dimensions: &Dimensions,
) -> Result<FactTransaction, FactError> {
    let raw = &transaction.raw;
    let id = raw.transaction_id.as_str();
    let product_key = resolve(&dimensions.product.keys, "product", &raw.product_id, id)?;
    let customer_key = resolve(&dimensions.customer.keys, "customer", &raw.customer_id, id)?;
    let staff_key = resolve(&dimensions.staff.keys, "staff", &raw.staff_id, id)?;
    let supplier_key = resolve(&dimensions.supplier.keys, "supplier", &raw.supplier_id, id)?;

    let date_key = date_key(transaction.date);
    if dimensions.date.get(date_key).is_none() {
        return Err(FactError::KeyResolution {
            transaction_id: raw.transaction_id.clone(),
            dimension: "date",
            natural_key: transaction.date.to_string(),
        });
    }

    Ok(FactTransaction {
        product_key,
        customer_key,
        date_key,
        staff_key,
        supplier_key,
        transaction_id: raw.transaction_id.clone(),
        transaction_datetime: transaction.timestamp,
        order_type: raw.order_type.clone(),
        payment_method: raw.payment_method.clone(),
        transaction_status: raw.status,
        quantity: raw.quantity,
        total_amount: raw.total_amount,
        discount_applied: raw.discount_applied,
        delivery_time_min: raw.delivery_time_min,
        customer_rating: raw.customer_rating,
        inventory_level: raw.inventory_level,
    })
}

/// Emits exactly one fact per transaction, in batch order.
///
/// Every natural key must be covered by `dimensions`. A miss means the
/// dimensions were built from a different batch and fails the whole build.
pub fn build_facts(
    batch: &[TransformedTransaction],
    dimensions: &Dimensions,
) -> Result<Vec<FactTransaction>, FactError> {
    let facts = batch
        .iter()
        .map(|transaction| build_fact(transaction, dimensions))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Built fact_transactions with {} rows", facts.len());
    Ok(facts)
}
