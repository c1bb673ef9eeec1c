use crate::constants::{DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL};
use prettytable::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub enum SourceConfig {
    /// In yaml, present as tag: `!Http`
    Http(HttpSourceConfig),
    /// In yaml, present as tag: `!File`
    File(FileSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http(HttpSourceConfig::default())
    }
}

impl SourceConfig {
    /// Human readable address used in logs and error messages.
    pub fn address(&self) -> &str {
        match self {
            SourceConfig::Http(config) => &config.url,
            SourceConfig::File(config) => &config.path,
        }
    }

    pub fn convert_to_table(&self) -> Table {
        match self {
            SourceConfig::Http(config) => config.convert_to_table(),
            SourceConfig::File(config) => config.convert_to_table(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct HttpSourceConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Per request timeout. Default: 30s
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Read the feed with `limit`/`offset` pages of this size instead of one request
    pub page_size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: None,
            page_size: None,
            category: None,
            brand: None,
            order_type: None,
        }
    }
}

pub fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_owned()
}

pub fn default_feed_timeout_secs() -> u64 {
    DEFAULT_FEED_TIMEOUT_SECS
}

impl HttpSourceConfig {
    pub fn convert_to_table(&self) -> Table {
        let mut table = table!(
            ["type", "http"],
            ["url", self.url],
            [
                "timeout",
                format!(
                    "{}s",
                    self.timeout_secs.unwrap_or_else(default_feed_timeout_secs)
                )
            ]
        );
        if let Some(page_size) = self.page_size {
            table.add_row(row!["page_size", page_size]);
        }
        for (name, filter) in [
            ("category", &self.category),
            ("brand", &self.brand),
            ("order_type", &self.order_type),
        ] {
            if let Some(value) = filter {
                table.add_row(row![name, value]);
            }
        }
        table
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSourceConfig {
    /// `.csv` or `.json` file with feed records
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// chrono format of `Transaction_DateTime` in csv files. Default: `%d/%m/%Y %H:%M`
    pub datetime_format: Option<String>,
}

impl FileSourceConfig {
    pub fn convert_to_table(&self) -> Table {
        table!(["type", "file"], ["path", self.path])
    }
}
