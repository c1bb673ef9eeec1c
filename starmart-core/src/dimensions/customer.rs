use super::Dimension;
use crate::transform::TransformedTransaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub customer_key: u64,
    pub customer_id: String,
    pub customer_age: i64,
    pub customer_gender: String,
    pub age_group: String,
}

pub struct CustomerDimension;

impl Dimension for CustomerDimension {
    const NAME: &'static str = "customer";

    type Row = CustomerRow;

    fn natural_key(transaction: &TransformedTransaction) -> &str {
        &transaction.raw.customer_id
    }

    fn row(key: u64, transaction: &TransformedTransaction) -> CustomerRow {
        CustomerRow {
            customer_key: key,
            customer_id: transaction.raw.customer_id.clone(),
            customer_age: transaction.raw.customer_age,
            customer_gender: transaction.raw.customer_gender.clone(),
            age_group: transaction.age_group.to_owned(),
        }
    }
}
