pub const DEFAULT_CONFIG_PATH: &str = "starmart.yaml";
pub const DEFAULT_APP_NAME: &str = "starmart";
pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:8000/transactions";
pub const DEFAULT_WAREHOUSE_PATH: &str = "mobile_shop_dw.db";
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;

/// Timestamp layout the feed serves and the warehouse stores.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Layout of `Transaction_DateTime` in the raw CSV exports.
pub const CSV_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

pub const FEED_URL_ENV: &str = "STARMART_FEED_URL";
pub const WAREHOUSE_PATH_ENV: &str = "STARMART_WAREHOUSE_PATH";
