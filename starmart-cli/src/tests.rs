use crate::cli::{apply_env_overrides, load_config_from_file, parse_config};
use crate::errors::{ErrorKind, OrchestrationError};
use crate::simple::SimpleOrchestrator;

use starmart_core::tables::{AGG_STATUS_BY_ORDER_TYPE, DIM_DATE, FACT_TRANSACTIONS, TABLE_NAMES};
use starmart_sink_sqlite::Warehouse;
use starmart_types::models::{
    config::{Config, ValidationPolicy},
    source::{FileSourceConfig, HttpSourceConfig, SourceConfig},
    warehouse::WarehouseConfig,
};
use starmart_types::serde_json::{self, json, Value};
use std::path::Path;
use std::sync::Arc;
use tempdir::TempDir;
use tokio::runtime::Runtime;

fn record(id: u32, timestamp: &str) -> Value {
    json!({
        "Transaction_ID": id,
        "Transaction_DateTime": timestamp,
        "Product_ID": "P-1",
        "Customer_ID": format!("C-{id}"),
        "Staff_ID": "S-1",
        "Supplier_ID": "SUP-1",
        "Category": "Phone",
        "Brand": "Apple",
        "Model": "iPhone 15",
        "Product_Name": "iPhone 15 128GB",
        "Product_Type": "New",
        "Unit_Price": 1000,
        "Order_Type": "Online",
        "Payment_Method": "Card",
        "Transaction_Status": "Completed",
        "Quantity": 1,
        "Total_Amount": 1000,
        "Discount_Applied": 0,
        "Delivery_Time_Min": 30,
        "Customer_Rating": 4.0,
        "Inventory_Level": 10,
        "Customer_Age": 30,
        "Customer_Gender": "Female"
    })
}

/// A completed phone sale, a cancelled phone sale and a completed
/// accessory sale between 2024-01-05 and 2024-01-10.
fn example_feed() -> Vec<Value> {
    let first = record(1, "2024-01-05 10:00:00");

    let mut second = record(2, "2024-01-07 12:30:00");
    second["Transaction_Status"] = json!("Cancelled");
    second["Product_ID"] = json!("P-2");
    second["Model"] = json!("iPhone 15 Pro");
    second["Product_Name"] = json!("iPhone 15 Pro 256GB");
    second["Order_Type"] = json!("In-Store");
    second["Total_Amount"] = json!(500);
    second["Customer_Age"] = json!(40);

    let mut third = record(3, "2024-01-10 18:45:00");
    third["Product_ID"] = json!("P-3");
    third["Category"] = json!("Accessory");
    third["Brand"] = json!("Anker");
    third["Model"] = json!("PowerCore");
    third["Product_Name"] = json!("PowerCore 10000");
    third["Unit_Price"] = Value::Null;
    third["Total_Amount"] = json!(50);
    third["Customer_Age"] = json!(22);

    vec![first, second, third]
}

fn write_feed(dir: &Path, name: &str, records: &[Value]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn orchestrator(source: SourceConfig, warehouse: &Path) -> SimpleOrchestrator {
    let config = Config {
        source,
        warehouse: WarehouseConfig {
            path: warehouse.to_string_lossy().into_owned(),
        },
        ..Default::default()
    };
    SimpleOrchestrator::new(config, Arc::new(Runtime::new().unwrap()))
}

fn file_source(path: String) -> SourceConfig {
    SourceConfig::File(FileSourceConfig {
        path,
        datetime_format: None,
    })
}

fn file_orchestrator(dir: &TempDir, records: &[Value]) -> SimpleOrchestrator {
    let feed = write_feed(dir.path(), "feed.json", records);
    orchestrator(file_source(feed), &dir.path().join("warehouse.db"))
}

#[test]
fn run_publishes_every_table() {
    let dir = TempDir::new("starmart").unwrap();
    let starmart = file_orchestrator(&dir, &example_feed());

    let summary = starmart.run().unwrap();

    assert_eq!(summary.extracted, 3);
    assert_eq!(summary.rejected, 0);
    assert!(summary.failed_indexes.is_empty());
    let names: Vec<&str> = summary
        .row_counts
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, TABLE_NAMES);
    assert_eq!(summary.row_count("dim_product"), Some(3));
    assert_eq!(summary.row_count("dim_customer"), Some(3));
    assert_eq!(summary.row_count(DIM_DATE), Some(6));
    assert_eq!(summary.row_count("dim_staff"), Some(1));
    assert_eq!(summary.row_count("dim_supplier"), Some(1));
    assert_eq!(summary.row_count(FACT_TRANSACTIONS), Some(3));
    assert_eq!(summary.row_count(AGG_STATUS_BY_ORDER_TYPE), Some(2));
}

#[test]
fn published_revenue_counts_completed_transactions_only() {
    let dir = TempDir::new("starmart").unwrap();
    let starmart = file_orchestrator(&dir, &example_feed());
    starmart.run().unwrap();

    let warehouse = Warehouse::open(&starmart.config.warehouse.path).unwrap();
    let conn = warehouse.connection();
    let category_revenue: f64 = conn
        .query_row(
            "SELECT SUM(total_amount) FROM agg_kpi_revenue_by_dimension WHERE dimension = 'Category'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let completed_revenue: f64 = conn
        .query_row(
            "SELECT SUM(total_amount) FROM fact_transactions WHERE transaction_status = 'Completed'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(category_revenue, 1050.0);
    assert_eq!(category_revenue, completed_revenue);

    let cancelled: i64 = conn
        .query_row(
            "SELECT record_count FROM agg_kpi_status_by_order_type \
             WHERE order_type = 'In-Store' AND transaction_status = 'Cancelled'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(cancelled, 1);
    let status_total: i64 = conn
        .query_row(
            "SELECT SUM(record_count) FROM agg_kpi_status_by_order_type",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(status_total, 3);
}

#[test]
fn rerunning_unchanged_feed_is_idempotent() {
    let dir = TempDir::new("starmart").unwrap();
    let starmart = file_orchestrator(&dir, &example_feed());

    starmart.run().unwrap();
    let snapshot = |name: &str| {
        Warehouse::open(&starmart.config.warehouse.path)
            .unwrap()
            .fetch_rows(name)
            .unwrap()
    };
    let first: Vec<_> = TABLE_NAMES.iter().map(|name| snapshot(*name)).collect();

    starmart.run().unwrap();
    let second: Vec<_> = TABLE_NAMES.iter().map(|name| snapshot(*name)).collect();

    assert_eq!(first, second);
}

#[test]
fn unreachable_feed_leaves_previous_warehouse_intact() {
    let dir = TempDir::new("starmart").unwrap();
    let warehouse = dir.path().join("warehouse.db");
    file_orchestrator(&dir, &example_feed()).run().unwrap();

    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let http = orchestrator(
        SourceConfig::Http(HttpSourceConfig {
            url: format!("http://127.0.0.1:{port}/transactions"),
            timeout_secs: Some(2),
            ..Default::default()
        }),
        &warehouse,
    );

    let err = http.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnreachable);

    let counts = http.stats().unwrap();
    assert_eq!(counts[5], (FACT_TRANSACTIONS.to_string(), Some(3)));
    assert!(counts.iter().all(|(_, count)| count.is_some()));
}

#[test]
fn stats_on_missing_warehouse_creates_nothing() {
    let dir = TempDir::new("starmart").unwrap();
    let warehouse = dir.path().join("warehouse.db");
    let starmart = orchestrator(file_source("feed.json".to_string()), &warehouse);

    let counts = starmart.stats().unwrap();

    assert_eq!(counts.len(), TABLE_NAMES.len());
    assert!(counts.iter().all(|(_, count)| count.is_none()));
    assert!(!warehouse.exists());
}

#[test]
fn feed_connection_is_checked_before_extract() {
    use std::io::{Read, Write};

    let dir = TempDir::new("starmart").unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/transactions", listener.local_addr().unwrap());
    let server = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let n = socket.read(&mut buf).unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .unwrap();
        request.lines().next().unwrap_or_default().to_string()
    });
    let starmart = orchestrator(
        SourceConfig::Http(HttpSourceConfig {
            url,
            timeout_secs: Some(5),
            ..Default::default()
        }),
        &dir.path().join("warehouse.db"),
    );

    let err = starmart.run().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceUnreachable);
    assert!(err.to_string().starts_with("[extract]"));
    assert_eq!(
        server.join().unwrap(),
        "GET /transactions?limit=1&offset=0 HTTP/1.1"
    );
}

#[test]
fn failures_are_classified() {
    let dir = TempDir::new("starmart").unwrap();

    let missing = orchestrator(
        file_source(dir.path().join("nope.json").to_string_lossy().into_owned()),
        &dir.path().join("warehouse.db"),
    );
    assert_eq!(missing.run().unwrap_err().kind(), ErrorKind::SourceUnreachable);

    let mut bad = record(1, "2024-01-05 10:00:00");
    bad["Quantity"] = json!("many");
    let malformed = file_orchestrator(&dir, &[bad]);
    assert_eq!(
        malformed.run().unwrap_err().kind(),
        ErrorKind::SourceMalformed
    );

    let empty = file_orchestrator(&dir, &[]);
    let err = empty.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyBatch);
    assert!(matches!(err, OrchestrationError::Dimension(_)));

    let mut elderly = record(1, "2024-01-05 10:00:00");
    elderly["Customer_Age"] = json!(130);
    let invalid = file_orchestrator(&dir, &[elderly]);
    assert_eq!(invalid.run().unwrap_err().kind(), ErrorKind::Validation);

    // nothing was ever published
    let counts = invalid.stats().unwrap();
    assert!(counts.iter().all(|(_, count)| count.is_none()));
}

#[test]
fn reject_policy_publishes_remaining_rows() {
    let dir = TempDir::new("starmart").unwrap();
    let mut feed = example_feed();
    feed[1]["Customer_Age"] = json!(0);
    let mut starmart = file_orchestrator(&dir, &feed);
    starmart.config.validation = ValidationPolicy::Reject;

    let summary = starmart.run().unwrap();

    assert_eq!(summary.extracted, 3);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.row_count(FACT_TRANSACTIONS), Some(2));
    // the calendar still spans the surviving transactions
    assert_eq!(summary.row_count(DIM_DATE), Some(6));
}

#[test]
fn csv_feed_runs_end_to_end() {
    let dir = TempDir::new("starmart").unwrap();
    let header = "Transaction_ID,Transaction_DateTime,Product_ID,Customer_ID,Staff_ID,Supplier_ID,\
Category,Brand,Model,Product_Name,Product_Type,Unit_Price,Order_Type,Payment_Method,\
Transaction_Status,Quantity,Total_Amount,Discount_Applied,Delivery_Time_Min,Customer_Rating,\
Inventory_Level,Customer_Age,Customer_Gender";
    let rows = [
        "1,05/01/2024 10:00,P-1,C-1,S-1,SUP-1,Phone,Apple,iPhone 15,iPhone 15 128GB,New,1000,Online,Card,Completed,1,1000,0,30,4.0,10,30,Female",
        "2,06/01/2024 11:15,P-1,C-2,S-2,SUP-1,Phone,Apple,iPhone 15,iPhone 15 128GB,New,1000,In-Store,Cash,Refunded,1,1000,0,0,3.5,9,50,Male",
    ];
    let path = dir.path().join("feed.csv");
    std::fs::write(&path, format!("{header}\n{}\n", rows.join("\n"))).unwrap();
    let starmart = orchestrator(
        file_source(path.to_string_lossy().into_owned()),
        &dir.path().join("warehouse.db"),
    );

    let summary = starmart.run().unwrap();

    assert_eq!(summary.row_count(FACT_TRANSACTIONS), Some(2));
    assert_eq!(summary.row_count(DIM_DATE), Some(2));
    assert_eq!(summary.row_count("dim_staff"), Some(2));
}

#[test]
fn config_template_reads_environment() {
    std::env::set_var("STARMART_TEST_FEED_HOST", "feed.internal:9000");
    let config = parse_config(
        r#"
app_name: pos
source: !Http
  url: "http://{{STARMART_TEST_FEED_HOST}}/transactions"
  page_size: 500
warehouse:
  path: out.db
validation: Reject
"#,
    )
    .unwrap();

    assert_eq!(config.app_name, "pos");
    assert_eq!(config.warehouse.path, "out.db");
    assert_eq!(config.validation, ValidationPolicy::Reject);
    match config.source {
        SourceConfig::Http(http) => {
            assert_eq!(http.url, "http://feed.internal:9000/transactions");
            assert_eq!(http.page_size, Some(500));
        }
        other => panic!("unexpected source {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected() {
    assert!(parse_config("warehouse:\n  path: out.db\n  mode: fast\n").is_err());
    assert!(parse_config("source: {{#if}}").is_err());
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = TempDir::new("starmart").unwrap();
    let path = dir.path().join("starmart.yaml");
    let config = load_config_from_file(&path.to_string_lossy()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn environment_overrides_source_and_warehouse() {
    let mut config = Config {
        source: file_source("feed.csv".to_string()),
        ..Default::default()
    };
    apply_env_overrides(&mut config, |key| match key {
        "STARMART_FEED_URL" => Some("http://10.0.0.5/transactions".to_string()),
        "STARMART_WAREHOUSE_PATH" => Some("/tmp/dw.db".to_string()),
        _ => None,
    });

    assert_eq!(
        config.source,
        SourceConfig::Http(HttpSourceConfig {
            url: "http://10.0.0.5/transactions".to_string(),
            ..Default::default()
        })
    );
    assert_eq!(config.warehouse.path, "/tmp/dw.db");

    let untouched = Config::default();
    let mut config = untouched.clone();
    apply_env_overrides(&mut config, |_| None);
    assert_eq!(config, untouched);
}
