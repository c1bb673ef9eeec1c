use super::fixtures::{example_batch, raw, transformed};
use crate::{
    aggregates::build_aggregates,
    dimensions::build_dimensions,
    facts::build_facts,
    tables::{star_schema, TABLE_NAMES},
    transform::{transform, EntityKeys},
};
use starmart_types::{
    errors::pipeline::{AggregateError, FactError, TransformError},
    ingestion_types::TransactionStatus,
    models::config::ValidationPolicy,
    rust_decimal::Decimal,
};
use std::collections::HashSet;

#[test]
fn example_batch_builds_expected_star_schema() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();

    assert_eq!(facts.len(), 3);
    assert_eq!(dimensions.date.rows.len(), 6);
    assert_eq!(dimensions.date.rows[0].date_key, 20240105);
    assert_eq!(dimensions.date.rows[5].date_key, 20240110);

    let categories: Vec<_> = aggregates
        .revenue_by_dimension
        .iter()
        .filter(|row| row.dimension == "Category")
        .map(|row| {
            (
                row.dimension_value.as_str(),
                row.total_amount,
                row.transaction_count,
            )
        })
        .collect();
    assert_eq!(
        categories,
        vec![
            ("Accessory", Decimal::new(50, 0), 1),
            ("Phone", Decimal::new(1000, 0), 1),
        ]
    );

    let status_total: u64 = aggregates
        .status_by_order_type
        .iter()
        .map(|row| row.record_count)
        .sum();
    assert_eq!(status_total, 3);

    let age_groups: Vec<_> = batch.iter().map(|t| t.age_group).collect();
    assert_eq!(age_groups, vec!["26-35", "36-45", "18-25"]);
}

#[test]
fn facts_preserve_row_count_and_order() {
    let mut batch = vec![];
    for i in 0..50 {
        let mut txn = raw(&i.to_string(), &format!("2024-02-{:02} 09:00:00", i % 28 + 1));
        txn.product_id = format!("P-{}", i % 7);
        txn.customer_id = format!("C-{}", i % 11);
        txn.staff_id = format!("S-{}", i % 3);
        batch.push(txn);
    }
    let batch = transformed(batch);
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();

    assert_eq!(facts.len(), batch.len());
    for (fact, transaction) in facts.iter().zip(&batch) {
        assert_eq!(fact.transaction_id, transaction.raw.transaction_id);
    }
    assert_eq!(dimensions.product.rows.len(), 7);
    assert_eq!(dimensions.customer.rows.len(), 11);
    assert_eq!(dimensions.staff.rows.len(), 3);
    assert_eq!(dimensions.supplier.rows.len(), 1);
}

#[test]
fn fact_foreign_keys_exist_in_dimensions() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();

    let products: HashSet<_> = dimensions.product.rows.iter().map(|r| r.product_key).collect();
    let customers: HashSet<_> = dimensions.customer.rows.iter().map(|r| r.customer_key).collect();
    let staff: HashSet<_> = dimensions.staff.rows.iter().map(|r| r.staff_key).collect();
    let suppliers: HashSet<_> = dimensions.supplier.rows.iter().map(|r| r.supplier_key).collect();
    let dates: HashSet<_> = dimensions.date.rows.iter().map(|r| r.date_key).collect();

    for fact in &facts {
        assert!(products.contains(&fact.product_key));
        assert!(customers.contains(&fact.customer_key));
        assert!(staff.contains(&fact.staff_key));
        assert!(suppliers.contains(&fact.supplier_key));
        assert!(dates.contains(&fact.date_key));
    }
}

#[test]
fn category_revenue_matches_completed_fact_total() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();

    let completed: Decimal = facts
        .iter()
        .filter(|f| f.transaction_status == TransactionStatus::Completed)
        .map(|f| f.total_amount)
        .sum();
    for dimension in ["Category", "Brand", "Model"] {
        let total: Decimal = aggregates
            .revenue_by_dimension
            .iter()
            .filter(|row| row.dimension == dimension)
            .map(|row| row.total_amount)
            .sum();
        assert_eq!(total, completed, "{dimension}");
    }
}

#[test]
fn status_counts_include_cancelled_but_revenue_does_not() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();

    assert!(aggregates
        .status_by_order_type
        .iter()
        .any(|row| row.transaction_status == TransactionStatus::Cancelled
            && row.order_type == "In-Store"
            && row.record_count == 1));
    assert!(!aggregates
        .revenue_by_dimension
        .iter()
        .any(|row| row.dimension_value == "iPhone 15 Pro"));
    assert!(!aggregates
        .product_type_distribution
        .iter()
        .any(|row| row.dimension_value == "iPhone 15 Pro 256GB"));
}

#[test]
fn customer_metrics_and_product_type_distribution() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();

    let metrics: Vec<_> = aggregates
        .customer_metrics
        .iter()
        .map(|row| {
            (
                row.age_group.as_str(),
                row.gender.as_str(),
                row.year_month.as_str(),
                row.transaction_count,
                row.total_revenue,
            )
        })
        .collect();
    assert_eq!(
        metrics,
        vec![
            ("18-25", "Female", "2024-01", 1, Decimal::new(50, 0)),
            ("26-35", "Female", "2024-01", 1, Decimal::new(1000, 0)),
        ]
    );
    assert_eq!(aggregates.customer_metrics[0].avg_discount_applied, Decimal::new(5, 0));
    assert_eq!(aggregates.customer_metrics[0].avg_customer_rating, 5.0);

    let names: Vec<_> = aggregates
        .product_type_distribution
        .iter()
        .filter(|row| row.dimension == "Product_Name")
        .map(|row| (row.dimension_value.as_str(), row.product_type.as_str(), row.record_count))
        .collect();
    assert_eq!(
        names,
        vec![
            ("PowerCore 10000", "Refurbished", 1),
            ("iPhone 15 128GB", "New", 1),
        ]
    );
}

#[test]
fn averages_are_per_group() {
    let mut batch = vec![
        raw("1", "2024-03-01 10:00:00"),
        raw("2", "2024-03-02 10:00:00"),
    ];
    batch[1].total_amount = Decimal::new(500, 0);
    let batch = transformed(batch);
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();

    let phone = &aggregates.revenue_by_dimension[0];
    assert_eq!(phone.dimension, "Category");
    assert_eq!(phone.transaction_count, 2);
    assert_eq!(phone.total_amount, Decimal::new(1500, 0));
    assert_eq!(phone.avg_transaction_value, Decimal::new(750, 0));
}

#[test]
fn rebuilding_same_batch_is_identical() {
    let build = || {
        let batch = transformed(example_batch());
        let dimensions = build_dimensions(&batch).unwrap();
        let facts = build_facts(&batch, &dimensions).unwrap();
        let aggregates = build_aggregates(&facts, &dimensions).unwrap();
        star_schema(&dimensions, &facts, &aggregates).unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn star_schema_lays_out_every_table() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let facts = build_facts(&batch, &dimensions).unwrap();
    let aggregates = build_aggregates(&facts, &dimensions).unwrap();
    let tables = star_schema(&dimensions, &facts, &aggregates).unwrap();

    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, TABLE_NAMES);

    let product = &tables[0];
    assert_eq!(product.schema.primary_index, vec![0]);
    assert_eq!(product.schema.secondary_indexes.len(), 2);
    let fact = &tables[5];
    assert_eq!(fact.records.len(), 3);
    assert_eq!(fact.schema.secondary_indexes.len(), 5);
}

#[test]
fn facts_against_foreign_dimensions_fail_key_resolution() {
    let batch = transformed(example_batch());
    let mut other = example_batch();
    for txn in &mut other {
        txn.supplier_id = "SUP-OTHER".to_string();
    }
    let dimensions = build_dimensions(&transformed(other)).unwrap();

    assert_eq!(
        build_facts(&batch, &dimensions).unwrap_err(),
        FactError::KeyResolution {
            transaction_id: "1".to_string(),
            dimension: "supplier",
            natural_key: "SUP-1".to_string(),
        }
    );
}

#[test]
fn aggregates_reject_dangling_keys() {
    let batch = transformed(example_batch());
    let dimensions = build_dimensions(&batch).unwrap();
    let mut facts = build_facts(&batch, &dimensions).unwrap();
    facts[1].product_key = 99;

    assert_eq!(
        build_aggregates(&facts, &dimensions).unwrap_err(),
        AggregateError::DanglingKey {
            table: "dim_product",
            key: 99
        }
    );
}

#[test]
fn out_of_range_age_aborts_by_default() {
    let mut batch = example_batch();
    batch[1].customer_age = 0;

    let error = transform(batch, ValidationPolicy::Abort).unwrap_err();
    assert_eq!(
        error,
        TransformError::AgeOutOfRange {
            transaction_id: "2".to_string(),
            age: 0
        }
    );
}

#[test]
fn reject_policy_drops_invalid_rows() {
    let mut batch = example_batch();
    batch[1].customer_age = 101;
    batch[2].timestamp = "yesterday".to_string();

    let output = transform(batch, ValidationPolicy::Reject).unwrap();
    assert_eq!(output.transactions.len(), 1);
    assert_eq!(output.rejected.len(), 2);
    assert_eq!(output.rejected[0].transaction_id(), "2");
    assert!(matches!(
        output.rejected[1],
        TransformError::InvalidTimestamp { .. }
    ));

    let dimensions = build_dimensions(&output.transactions).unwrap();
    let facts = build_facts(&output.transactions, &dimensions).unwrap();
    assert_eq!(facts.len(), output.transactions.len());
}

#[test]
fn transformed_rows_carry_calendar_fields_and_unresolved_keys() {
    let batch = transformed(example_batch());
    let first = &batch[0];
    assert_eq!((first.year, first.month, first.day), (2024, 1, 5));
    assert_eq!(first.year_month, "2024-01");
    assert_eq!(first.keys, EntityKeys::default());
}
