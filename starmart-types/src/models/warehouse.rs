use crate::constants::DEFAULT_WAREHOUSE_PATH;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    #[serde(default = "default_warehouse_path")]
    /// SQLite database file holding the star schema
    pub path: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
        }
    }
}

pub fn default_warehouse_path() -> String {
    DEFAULT_WAREHOUSE_PATH.to_owned()
}
