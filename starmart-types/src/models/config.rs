use super::{
    source::SourceConfig, telemetry::TelemetryConfig, warehouse::WarehouseConfig,
};
use crate::constants::DEFAULT_APP_NAME;
use prettytable::Table as PrettyTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
/// The configuration for a warehouse build
pub struct Config {
    #[serde(default = "default_app_name")]
    /// name of the app, used in log output
    pub app_name: String,

    #[serde(default)]
    /// where transactions are extracted from
    pub source: SourceConfig,

    #[serde(default)]
    /// where the star schema is published
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    /// what to do with rows that fail derivation
    pub validation: ValidationPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            source: SourceConfig::default(),
            warehouse: WarehouseConfig::default(),
            validation: ValidationPolicy::default(),
            telemetry: None,
        }
    }
}

pub fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_owned()
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum ValidationPolicy {
    /// Fail the whole run on the first row that cannot be derived.
    #[default]
    Abort,
    /// Drop rows that cannot be derived and keep going.
    Reject,
}

impl Config {
    pub fn convert_to_table(&self) -> PrettyTable {
        let mut table = table!();

        table.add_row(row!["name", self.app_name]);
        table.add_row(row!["source", self.source.convert_to_table()]);
        table.add_row(row!["warehouse", self.warehouse.path]);
        table.add_row(row!["validation", format!("{:?}", self.validation)]);
        if let Some(telemetry) = &self.telemetry {
            table.add_row(row!["log format", format!("{:?}", telemetry.format)]);
        }

        table
    }
}
