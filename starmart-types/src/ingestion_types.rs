use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Cancelled,
    Refunded,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Cancelled => "Cancelled",
            TransactionStatus::Refunded => "Refunded",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-of-sale record as served by the transaction feed.
///
/// Field names follow the feed's column names. Natural identifiers are kept
/// as strings even when the feed serves them as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "Transaction_ID", deserialize_with = "natural_id")]
    pub transaction_id: String,
    #[serde(rename = "Transaction_DateTime")]
    pub timestamp: String,

    #[serde(rename = "Product_ID", deserialize_with = "natural_id")]
    pub product_id: String,
    #[serde(rename = "Customer_ID", deserialize_with = "natural_id")]
    pub customer_id: String,
    #[serde(rename = "Staff_ID", deserialize_with = "natural_id")]
    pub staff_id: String,
    #[serde(rename = "Supplier_ID", deserialize_with = "natural_id")]
    pub supplier_id: String,

    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Product_Type")]
    pub product_type: String,
    #[serde(rename = "Unit_Price", default)]
    pub unit_price: Option<Decimal>,

    #[serde(rename = "Order_Type")]
    pub order_type: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Transaction_Status")]
    pub status: TransactionStatus,

    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Total_Amount")]
    pub total_amount: Decimal,
    #[serde(rename = "Discount_Applied")]
    pub discount_applied: Decimal,
    #[serde(rename = "Delivery_Time_Min")]
    pub delivery_time_min: f64,
    #[serde(rename = "Customer_Rating")]
    pub customer_rating: f64,
    #[serde(rename = "Inventory_Level")]
    pub inventory_level: i64,

    #[serde(rename = "Customer_Age")]
    pub customer_age: i64,
    #[serde(rename = "Customer_Gender")]
    pub customer_gender: String,
}

impl RawTransaction {
    /// Shape checks that serde cannot express. Returns a description of the
    /// first violation.
    pub fn check_shape(&self) -> Result<(), String> {
        let ids = [
            ("Transaction_ID", &self.transaction_id),
            ("Product_ID", &self.product_id),
            ("Customer_ID", &self.customer_id),
            ("Staff_ID", &self.staff_id),
            ("Supplier_ID", &self.supplier_id),
        ];
        if let Some((name, _)) = ids.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("{name} is empty"));
        }
        if self.total_amount.is_sign_negative() {
            return Err(format!("Total_Amount {} is negative", self.total_amount));
        }
        if self.discount_applied.is_sign_negative() {
            return Err(format!(
                "Discount_Applied {} is negative",
                self.discount_applied
            ));
        }
        if !(self.delivery_time_min.is_finite() && self.delivery_time_min >= 0.0) {
            return Err(format!(
                "Delivery_Time_Min {} is not a non-negative number",
                self.delivery_time_min
            ));
        }
        if !self.customer_rating.is_finite() {
            return Err("Customer_Rating is not a number".to_string());
        }
        Ok(())
    }
}

/// Response body of the transaction feed.
///
/// `total_records` counts the collection before any filter is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEnvelope {
    pub total_records: usize,
    #[serde(default)]
    pub returned_records: Option<usize>,
    pub data: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NaturalId {
    Text(String),
    Int(i64),
    Float(f64),
}

fn natural_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NaturalId::deserialize(deserializer)? {
        NaturalId::Text(s) => s,
        NaturalId::Int(i) => i.to_string(),
        // pandas widens integer id columns with gaps to float
        NaturalId::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        NaturalId::Float(f) => f.to_string(),
    })
}
