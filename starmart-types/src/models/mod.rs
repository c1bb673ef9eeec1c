pub mod config;
pub mod source;
pub mod telemetry;
pub mod warehouse;
