use crate::{
    dimensions::{CustomerRow, DateRow, Dimensions, ProductRow},
    facts::FactTransaction,
};
use starmart_types::{
    errors::pipeline::AggregateError,
    ingestion_types::TransactionStatus,
    rust_decimal::Decimal,
    tracing::info,
};
use std::collections::BTreeMap;

/// Product attributes aggregates are broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProductAttribute {
    Category,
    Brand,
    Model,
    ProductName,
}

impl ProductAttribute {
    /// Value of the `dimension` column.
    pub fn label(&self) -> &'static str {
        match self {
            ProductAttribute::Category => "Category",
            ProductAttribute::Brand => "Brand",
            ProductAttribute::Model => "Model",
            ProductAttribute::ProductName => "Product_Name",
        }
    }

    fn value<'a>(&self, product: &'a ProductRow) -> &'a str {
        match self {
            ProductAttribute::Category => &product.category,
            ProductAttribute::Brand => &product.brand,
            ProductAttribute::Model => &product.model,
            ProductAttribute::ProductName => &product.product_name,
        }
    }
}

const REVENUE_ATTRIBUTES: [ProductAttribute; 3] = [
    ProductAttribute::Category,
    ProductAttribute::Brand,
    ProductAttribute::Model,
];

const DISTRIBUTION_ATTRIBUTES: [ProductAttribute; 4] = [
    ProductAttribute::Category,
    ProductAttribute::Brand,
    ProductAttribute::Model,
    ProductAttribute::ProductName,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueByDimension {
    pub dimension: &'static str,
    pub dimension_value: String,
    pub total_amount: Decimal,
    pub transaction_count: u64,
    pub avg_transaction_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusByOrderType {
    pub order_type: String,
    pub transaction_status: TransactionStatus,
    pub record_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    pub age_group: String,
    pub gender: String,
    pub year_month: String,
    pub avg_discount_applied: Decimal,
    pub avg_customer_rating: f64,
    pub transaction_count: u64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTypeDistribution {
    pub dimension: &'static str,
    pub dimension_value: String,
    pub product_type: String,
    pub record_count: u64,
    pub total_revenue: Decimal,
}

/// The four rollups. They are computed together and published together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    pub revenue_by_dimension: Vec<RevenueByDimension>,
    pub status_by_order_type: Vec<StatusByOrderType>,
    pub customer_metrics: Vec<CustomerMetrics>,
    pub product_type_distribution: Vec<ProductTypeDistribution>,
}

/// Running sums of one group.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    count: u64,
    amount: Decimal,
    discount: Decimal,
    rating: f64,
}

impl Totals {
    fn add(&mut self, fact: &FactTransaction, aggregate: &'static str) -> Result<(), AggregateError> {
        let overflow = || AggregateError::Overflow { aggregate };
        self.count = self.count.checked_add(1).ok_or_else(overflow)?;
        self.amount = self
            .amount
            .checked_add(fact.total_amount)
            .ok_or_else(overflow)?;
        self.discount = self
            .discount
            .checked_add(fact.discount_applied)
            .ok_or_else(overflow)?;
        self.rating += fact.customer_rating;
        Ok(())
    }

    fn avg(sum: Decimal, count: u64, aggregate: &'static str) -> Result<Decimal, AggregateError> {
        sum.checked_div(Decimal::from(count))
            .ok_or(AggregateError::Overflow { aggregate })
    }
}

/// A fact with the dimension rows it references.
struct JoinedFact<'a> {
    fact: &'a FactTransaction,
    product: &'a ProductRow,
    customer: &'a CustomerRow,
    date: &'a DateRow,
}

fn lookup<'a, R>(
    rows: &'a [R],
    key: u64,
    row_key: impl Fn(&R) -> u64,
    table: &'static str,
) -> Result<&'a R, AggregateError> {
    rows.binary_search_by_key(&key, row_key)
        .map(|idx| &rows[idx])
        .map_err(|_| AggregateError::DanglingKey { table, key })
}

fn join<'a>(
    facts: &'a [FactTransaction],
    dimensions: &'a Dimensions,
) -> Result<Vec<JoinedFact<'a>>, AggregateError> {
    facts
        .iter()
        .map(|fact| {
            Ok(JoinedFact {
                fact,
                product: lookup(
                    &dimensions.product.rows,
                    fact.product_key,
                    |row| row.product_key,
                    "dim_product",
                )?,
                customer: lookup(
                    &dimensions.customer.rows,
                    fact.customer_key,
                    |row| row.customer_key,
                    "dim_customer",
                )?,
                date: lookup(
                    &dimensions.date.rows,
                    fact.date_key,
                    |row| row.date_key,
                    "dim_date",
                )?,
            })
        })
        .collect()
}

fn revenue_by_dimension(
    completed: &[&JoinedFact],
) -> Result<Vec<RevenueByDimension>, AggregateError> {
    const NAME: &str = "agg_kpi_revenue_by_dimension";
    let mut rows = vec![];
    for attribute in REVENUE_ATTRIBUTES {
        let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
        for joined in completed {
            groups
                .entry(attribute.value(joined.product))
                .or_default()
                .add(joined.fact, NAME)?;
        }
        for (value, totals) in groups {
            rows.push(RevenueByDimension {
                dimension: attribute.label(),
                dimension_value: value.to_owned(),
                total_amount: totals.amount,
                transaction_count: totals.count,
                avg_transaction_value: Totals::avg(totals.amount, totals.count, NAME)?,
            });
        }
    }
    Ok(rows)
}

fn status_by_order_type(facts: &[FactTransaction]) -> Result<Vec<StatusByOrderType>, AggregateError> {
    let mut groups: BTreeMap<(&str, TransactionStatus), u64> = BTreeMap::new();
    for fact in facts {
        let count = groups
            .entry((fact.order_type.as_str(), fact.transaction_status))
            .or_default();
        *count = count.checked_add(1).ok_or(AggregateError::Overflow {
            aggregate: "agg_kpi_status_by_order_type",
        })?;
    }
    Ok(groups
        .into_iter()
        .map(|((order_type, status), count)| StatusByOrderType {
            order_type: order_type.to_owned(),
            transaction_status: status,
            record_count: count,
        })
        .collect())
}

fn customer_metrics(completed: &[&JoinedFact]) -> Result<Vec<CustomerMetrics>, AggregateError> {
    const NAME: &str = "agg_customer_metrics";
    let mut groups: BTreeMap<(&str, &str, &str), Totals> = BTreeMap::new();
    for joined in completed {
        let key = (
            joined.customer.age_group.as_str(),
            joined.customer.customer_gender.as_str(),
            joined.date.year_month.as_str(),
        );
        groups.entry(key).or_default().add(joined.fact, NAME)?;
    }
    groups
        .into_iter()
        .map(|((age_group, gender, year_month), totals)| {
            Ok(CustomerMetrics {
                age_group: age_group.to_owned(),
                gender: gender.to_owned(),
                year_month: year_month.to_owned(),
                avg_discount_applied: Totals::avg(totals.discount, totals.count, NAME)?,
                avg_customer_rating: totals.rating / totals.count as f64,
                transaction_count: totals.count,
                total_revenue: totals.amount,
            })
        })
        .collect()
}

fn product_type_distribution(
    completed: &[&JoinedFact],
) -> Result<Vec<ProductTypeDistribution>, AggregateError> {
    const NAME: &str = "agg_product_type_distribution";
    let mut rows = vec![];
    for attribute in DISTRIBUTION_ATTRIBUTES {
        let mut groups: BTreeMap<(&str, &str), Totals> = BTreeMap::new();
        for joined in completed {
            let key = (
                attribute.value(joined.product),
                joined.product.product_type.as_str(),
            );
            groups.entry(key).or_default().add(joined.fact, NAME)?;
        }
        rows.extend(
            groups
                .into_iter()
                .map(|((value, product_type), totals)| ProductTypeDistribution {
                    dimension: attribute.label(),
                    dimension_value: value.to_owned(),
                    product_type: product_type.to_owned(),
                    record_count: totals.count,
                    total_revenue: totals.amount,
                }),
        );
    }
    Ok(rows)
}

/// Computes all four rollups from the facts joined to their dimensions.
///
/// Status counts cover every fact; the other rollups cover completed
/// transactions only. Any failure discards every rollup.
pub fn build_aggregates(
    facts: &[FactTransaction],
    dimensions: &Dimensions,
) -> Result<Aggregates, AggregateError> {
    let joined = join(facts, dimensions)?;
    let completed: Vec<&JoinedFact> = joined
        .iter()
        .filter(|j| j.fact.transaction_status.is_completed())
        .collect();

    let aggregates = Aggregates {
        revenue_by_dimension: revenue_by_dimension(&completed)?,
        status_by_order_type: status_by_order_type(facts)?,
        customer_metrics: customer_metrics(&completed)?,
        product_type_distribution: product_type_distribution(&completed)?,
    };
    info!(
        "Built aggregates over {} facts ({} completed)",
        facts.len(),
        completed.len()
    );
    Ok(aggregates)
}
