use crate::errors::OrchestrationError;
use crate::summary::RunSummary;

use starmart_core::{
    aggregates::build_aggregates,
    dimensions::build_dimensions,
    facts::build_facts,
    tables::{star_schema, TABLE_NAMES},
    transform::{transform, TransformOutput},
};
use starmart_ingestion::get_connector;
use starmart_sink_sqlite::Warehouse;
use starmart_types::models::config::Config;
use starmart_types::tracing::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;

#[derive(Clone)]
pub struct SimpleOrchestrator {
    pub config: Config,
    pub runtime: Arc<Runtime>,
}

impl SimpleOrchestrator {
    pub fn new(config: Config, runtime: Arc<Runtime>) -> Self {
        Self { config, runtime }
    }

    /// Rebuilds the whole warehouse from the current feed.
    ///
    /// The warehouse handle is held for the whole run. On any failure the
    /// previously published tables are left as they were.
    pub fn run(&self) -> Result<RunSummary, OrchestrationError> {
        let started = Instant::now();
        let mut warehouse = Warehouse::open(&self.config.warehouse.path)?;

        let connector = get_connector(self.config.source.clone())?;
        info!(
            "[extract] Reading {} source {}",
            connector.type_name(),
            connector.address()
        );
        self.runtime.block_on(connector.validate_connection())?;
        let raw = self.runtime.block_on(connector.extract())?;
        let extracted = raw.len();
        info!("[extract] {} transactions", extracted);

        let TransformOutput {
            transactions,
            rejected,
        } = transform(raw, self.config.validation)?;
        if !rejected.is_empty() {
            warn!("[transform] Rejected {} transactions", rejected.len());
        }
        info!("[transform] {} transactions", transactions.len());

        let dimensions = build_dimensions(&transactions)?;
        info!(
            "[dimensions] {} products, {} customers, {} dates, {} staff, {} suppliers",
            dimensions.product.rows.len(),
            dimensions.customer.rows.len(),
            dimensions.date.rows.len(),
            dimensions.staff.rows.len(),
            dimensions.supplier.rows.len()
        );

        let facts = build_facts(&transactions, &dimensions)?;
        info!("[facts] {} rows", facts.len());

        let aggregates = build_aggregates(&facts, &dimensions)?;
        info!(
            "[aggregates] {} revenue groups, {} customers",
            aggregates.revenue_by_dimension.len(),
            aggregates.customer_metrics.len()
        );

        let tables = star_schema(&dimensions, &facts, &aggregates)?;
        let report = warehouse.publish(&tables)?;
        info!("[load] Published {} tables to {}", tables.len(), warehouse.path());

        Ok(RunSummary {
            extracted,
            rejected: rejected.len(),
            row_counts: report.row_counts,
            failed_indexes: report.failed_indexes,
            elapsed: started.elapsed(),
        })
    }

    /// Row counts of the published warehouse tables, `None` for tables
    /// that were never published. Never creates or modifies the warehouse.
    pub fn stats(&self) -> Result<Vec<(String, Option<u64>)>, OrchestrationError> {
        let path = &self.config.warehouse.path;
        if !Path::new(path).exists() {
            return Ok(TABLE_NAMES
                .iter()
                .map(|name| (name.to_string(), None))
                .collect());
        }
        let warehouse = Warehouse::open_read_only(path)?;
        Ok(warehouse.row_counts(&TABLE_NAMES)?)
    }
}
