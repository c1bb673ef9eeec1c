use super::Dimension;
use crate::transform::TransformedTransaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRow {
    pub staff_key: u64,
    pub staff_id: String,
}

pub struct StaffDimension;

impl Dimension for StaffDimension {
    const NAME: &'static str = "staff";

    type Row = StaffRow;

    fn natural_key(transaction: &TransformedTransaction) -> &str {
        &transaction.raw.staff_id
    }

    fn row(key: u64, transaction: &TransformedTransaction) -> StaffRow {
        StaffRow {
            staff_key: key,
            staff_id: transaction.raw.staff_id.clone(),
        }
    }
}
