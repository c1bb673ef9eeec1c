use super::Dimension;
use crate::transform::TransformedTransaction;
use starmart_types::rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub product_key: u64,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub product_type: String,
    pub unit_price: Option<Decimal>,
}

pub struct ProductDimension;

impl Dimension for ProductDimension {
    const NAME: &'static str = "product";

    type Row = ProductRow;

    fn natural_key(transaction: &TransformedTransaction) -> &str {
        &transaction.raw.product_id
    }

    fn row(key: u64, transaction: &TransformedTransaction) -> ProductRow {
        let raw = &transaction.raw;
        ProductRow {
            product_key: key,
            product_id: raw.product_id.clone(),
            product_name: raw.product_name.clone(),
            category: raw.category.clone(),
            brand: raw.brand.clone(),
            model: raw.model.clone(),
            product_type: raw.product_type.clone(),
            unit_price: raw.unit_price,
        }
    }
}
