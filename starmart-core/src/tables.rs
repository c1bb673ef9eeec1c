//! Relational layout of the star schema.

use crate::{
    aggregates::{
        Aggregates, CustomerMetrics, ProductTypeDistribution, RevenueByDimension,
        StatusByOrderType,
    },
    dimensions::{CustomerRow, DateRow, Dimensions, ProductRow, StaffRow, SupplierRow},
    facts::FactTransaction,
};
use starmart_types::{
    errors::types::TypeError,
    types::{FieldDefinition, FieldType, Record, Schema, Table},
};

pub const DIM_PRODUCT: &str = "dim_product";
pub const DIM_CUSTOMER: &str = "dim_customer";
pub const DIM_DATE: &str = "dim_date";
pub const DIM_STAFF: &str = "dim_staff";
pub const DIM_SUPPLIER: &str = "dim_supplier";
pub const FACT_TRANSACTIONS: &str = "fact_transactions";
pub const AGG_REVENUE_BY_DIMENSION: &str = "agg_kpi_revenue_by_dimension";
pub const AGG_STATUS_BY_ORDER_TYPE: &str = "agg_kpi_status_by_order_type";
pub const AGG_CUSTOMER_METRICS: &str = "agg_customer_metrics";
pub const AGG_PRODUCT_TYPE_DISTRIBUTION: &str = "agg_product_type_distribution";

/// Every warehouse table, in publish order.
pub const TABLE_NAMES: [&str; 10] = [
    DIM_PRODUCT,
    DIM_CUSTOMER,
    DIM_DATE,
    DIM_STAFF,
    DIM_SUPPLIER,
    FACT_TRANSACTIONS,
    AGG_REVENUE_BY_DIMENSION,
    AGG_STATUS_BY_ORDER_TYPE,
    AGG_CUSTOMER_METRICS,
    AGG_PRODUCT_TYPE_DISTRIBUTION,
];

/// A row type that maps onto one warehouse table.
pub trait TableRow {
    const TABLE: &'static str;

    fn schema() -> Result<Schema, TypeError>;

    fn to_record(&self) -> Record;
}

pub fn to_table<R: TableRow>(rows: &[R]) -> Result<Table, TypeError> {
    let table = Table::new(
        R::TABLE,
        R::schema()?,
        rows.iter().map(TableRow::to_record).collect(),
    );
    table.validate()?;
    Ok(table)
}

fn column(name: &str, typ: FieldType) -> FieldDefinition {
    FieldDefinition::new(name, typ, false)
}

impl TableRow for ProductRow {
    const TABLE: &'static str = DIM_PRODUCT;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("product_key", FieldType::UInt), true)
            .field(column("product_id", FieldType::String), false)
            .field(column("product_name", FieldType::String), false)
            .field(column("category", FieldType::String), false)
            .field(column("brand", FieldType::String), false)
            .field(column("model", FieldType::String), false)
            .field(column("product_type", FieldType::String), false)
            .field(FieldDefinition::new("unit_price", FieldType::Decimal, true), false)
            .index("idx_dim_product_category", &["category"])?
            .index("idx_dim_product_brand", &["brand"])?;
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.product_key.into(),
            self.product_id.as_str().into(),
            self.product_name.as_str().into(),
            self.category.as_str().into(),
            self.brand.as_str().into(),
            self.model.as_str().into(),
            self.product_type.as_str().into(),
            self.unit_price.into(),
        ])
    }
}

impl TableRow for CustomerRow {
    const TABLE: &'static str = DIM_CUSTOMER;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("customer_key", FieldType::UInt), true)
            .field(column("customer_id", FieldType::String), false)
            .field(column("customer_age", FieldType::Int), false)
            .field(column("customer_gender", FieldType::String), false)
            .field(column("age_group", FieldType::String), false)
            .index("idx_dim_customer_age_group", &["age_group"])?;
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.customer_key.into(),
            self.customer_id.as_str().into(),
            self.customer_age.into(),
            self.customer_gender.as_str().into(),
            self.age_group.as_str().into(),
        ])
    }
}

impl TableRow for DateRow {
    const TABLE: &'static str = DIM_DATE;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("date_key", FieldType::UInt), true)
            .field(column("full_date", FieldType::Date), false)
            .field(column("year", FieldType::Int), false)
            .field(column("quarter", FieldType::UInt), false)
            .field(column("month", FieldType::UInt), false)
            .field(column("month_name", FieldType::String), false)
            .field(column("week", FieldType::UInt), false)
            .field(column("day", FieldType::UInt), false)
            .field(column("day_of_week", FieldType::UInt), false)
            .field(column("day_name", FieldType::String), false)
            .field(column("is_weekend", FieldType::Boolean), false)
            .field(column("year_month", FieldType::String), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.date_key.into(),
            self.full_date.into(),
            i64::from(self.year).into(),
            u64::from(self.quarter).into(),
            u64::from(self.month).into(),
            self.month_name.as_str().into(),
            u64::from(self.week).into(),
            u64::from(self.day).into(),
            u64::from(self.day_of_week).into(),
            self.day_name.as_str().into(),
            self.is_weekend.into(),
            self.year_month.as_str().into(),
        ])
    }
}

impl TableRow for StaffRow {
    const TABLE: &'static str = DIM_STAFF;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("staff_key", FieldType::UInt), true)
            .field(column("staff_id", FieldType::String), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![self.staff_key.into(), self.staff_id.as_str().into()])
    }
}

impl TableRow for SupplierRow {
    const TABLE: &'static str = DIM_SUPPLIER;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("supplier_key", FieldType::UInt), true)
            .field(column("supplier_id", FieldType::String), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.supplier_key.into(),
            self.supplier_id.as_str().into(),
        ])
    }
}

impl TableRow for FactTransaction {
    const TABLE: &'static str = FACT_TRANSACTIONS;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("product_key", FieldType::UInt), false)
            .field(column("customer_key", FieldType::UInt), false)
            .field(column("date_key", FieldType::UInt), false)
            .field(column("staff_key", FieldType::UInt), false)
            .field(column("supplier_key", FieldType::UInt), false)
            .field(column("transaction_id", FieldType::String), false)
            .field(column("transaction_datetime", FieldType::Timestamp), false)
            .field(column("order_type", FieldType::String), false)
            .field(column("payment_method", FieldType::String), false)
            .field(column("transaction_status", FieldType::String), false)
            .field(column("quantity", FieldType::UInt), false)
            .field(column("total_amount", FieldType::Decimal), false)
            .field(column("discount_applied", FieldType::Decimal), false)
            .field(column("delivery_time_min", FieldType::Float), false)
            .field(column("customer_rating", FieldType::Float), false)
            .field(column("inventory_level", FieldType::Int), false)
            .index("idx_fact_product", &["product_key"])?
            .index("idx_fact_customer", &["customer_key"])?
            .index("idx_fact_date", &["date_key"])?
            .index("idx_fact_order_type", &["order_type"])?
            .index("idx_fact_status", &["transaction_status"])?;
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.product_key.into(),
            self.customer_key.into(),
            self.date_key.into(),
            self.staff_key.into(),
            self.supplier_key.into(),
            self.transaction_id.as_str().into(),
            self.transaction_datetime.into(),
            self.order_type.as_str().into(),
            self.payment_method.as_str().into(),
            self.transaction_status.as_str().into(),
            u64::from(self.quantity).into(),
            self.total_amount.into(),
            self.discount_applied.into(),
            self.delivery_time_min.into(),
            self.customer_rating.into(),
            self.inventory_level.into(),
        ])
    }
}

impl TableRow for RevenueByDimension {
    const TABLE: &'static str = AGG_REVENUE_BY_DIMENSION;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("dimension", FieldType::String), false)
            .field(column("dimension_value", FieldType::String), false)
            .field(column("total_amount", FieldType::Decimal), false)
            .field(column("transaction_count", FieldType::UInt), false)
            .field(column("avg_transaction_value", FieldType::Decimal), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.dimension.into(),
            self.dimension_value.as_str().into(),
            self.total_amount.into(),
            self.transaction_count.into(),
            self.avg_transaction_value.into(),
        ])
    }
}

impl TableRow for StatusByOrderType {
    const TABLE: &'static str = AGG_STATUS_BY_ORDER_TYPE;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("order_type", FieldType::String), false)
            .field(column("transaction_status", FieldType::String), false)
            .field(column("record_count", FieldType::UInt), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.order_type.as_str().into(),
            self.transaction_status.as_str().into(),
            self.record_count.into(),
        ])
    }
}

impl TableRow for CustomerMetrics {
    const TABLE: &'static str = AGG_CUSTOMER_METRICS;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("age_group", FieldType::String), false)
            .field(column("gender", FieldType::String), false)
            .field(column("year_month", FieldType::String), false)
            .field(column("avg_discount_applied", FieldType::Decimal), false)
            .field(column("avg_customer_rating", FieldType::Float), false)
            .field(column("transaction_count", FieldType::UInt), false)
            .field(column("total_revenue", FieldType::Decimal), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.age_group.as_str().into(),
            self.gender.as_str().into(),
            self.year_month.as_str().into(),
            self.avg_discount_applied.into(),
            self.avg_customer_rating.into(),
            self.transaction_count.into(),
            self.total_revenue.into(),
        ])
    }
}

impl TableRow for ProductTypeDistribution {
    const TABLE: &'static str = AGG_PRODUCT_TYPE_DISTRIBUTION;

    fn schema() -> Result<Schema, TypeError> {
        let mut schema = Schema::new();
        schema
            .field(column("dimension", FieldType::String), false)
            .field(column("dimension_value", FieldType::String), false)
            .field(column("product_type", FieldType::String), false)
            .field(column("record_count", FieldType::UInt), false)
            .field(column("total_revenue", FieldType::Decimal), false);
        Ok(schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            self.dimension.into(),
            self.dimension_value.as_str().into(),
            self.product_type.as_str().into(),
            self.record_count.into(),
            self.total_revenue.into(),
        ])
    }
}

/// Lays out a complete build as tables, in [`TABLE_NAMES`] order.
pub fn star_schema(
    dimensions: &Dimensions,
    facts: &[FactTransaction],
    aggregates: &Aggregates,
) -> Result<Vec<Table>, TypeError> {
    Ok(vec![
        to_table(&dimensions.product.rows)?,
        to_table(&dimensions.customer.rows)?,
        to_table(&dimensions.date.rows)?,
        to_table(&dimensions.staff.rows)?,
        to_table(&dimensions.supplier.rows)?,
        to_table(facts)?,
        to_table(&aggregates.revenue_by_dimension)?,
        to_table(&aggregates.status_by_order_type)?,
        to_table(&aggregates.customer_metrics)?,
        to_table(&aggregates.product_type_distribution)?,
    ])
}
