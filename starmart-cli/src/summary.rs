use starmart_types::prettytable::{row, table, Table};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub rejected: usize,
    /// Published row count per table, in publish order.
    pub row_counts: Vec<(String, u64)>,
    pub failed_indexes: Vec<String>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn row_count(&self, table_name: &str) -> Option<u64> {
        self.row_counts
            .iter()
            .find(|(name, _)| name == table_name)
            .map(|(_, count)| *count)
    }

    pub fn convert_to_table(&self) -> Table {
        let mut table = table!(["table", "rows"]);
        for (name, count) in &self.row_counts {
            table.add_row(row![name, count]);
        }
        table.add_row(row!["extracted", self.extracted]);
        table.add_row(row!["rejected", self.rejected]);
        if !self.failed_indexes.is_empty() {
            table.add_row(row!["failed indexes", self.failed_indexes.join(", ")]);
        }
        table.add_row(row!["elapsed", format!("{:.2?}", self.elapsed)]);
        table
    }
}

pub fn stats_table(row_counts: &[(String, Option<u64>)]) -> Table {
    let mut table = table!(["table", "rows"]);
    for (name, count) in row_counts {
        match count {
            Some(count) => table.add_row(row![name, count]),
            None => table.add_row(row![name, "missing"]),
        };
    }
    table
}
