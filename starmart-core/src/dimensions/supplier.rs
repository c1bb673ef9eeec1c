use super::Dimension;
use crate::transform::TransformedTransaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRow {
    pub supplier_key: u64,
    pub supplier_id: String,
}

pub struct SupplierDimension;

impl Dimension for SupplierDimension {
    const NAME: &'static str = "supplier";

    type Row = SupplierRow;

    fn natural_key(transaction: &TransformedTransaction) -> &str {
        &transaction.raw.supplier_id
    }

    fn row(key: u64, transaction: &TransformedTransaction) -> SupplierRow {
        SupplierRow {
            supplier_key: key,
            supplier_id: transaction.raw.supplier_id.clone(),
        }
    }
}
