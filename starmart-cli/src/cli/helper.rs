use crate::errors::CliError;
use crate::simple::SimpleOrchestrator as Starmart;

use handlebars::Handlebars;
use starmart_types::constants::{FEED_URL_ENV, WAREHOUSE_PATH_ENV};
use starmart_types::models::{
    config::Config,
    source::{HttpSourceConfig, SourceConfig},
};
use starmart_types::serde_yaml;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub fn init_starmart(config_path: &str) -> Result<Starmart, CliError> {
    let runtime = Runtime::new().map_err(CliError::FailedToCreateTokioRuntime)?;
    let mut config = load_config_from_file(config_path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(Starmart::new(config, Arc::new(runtime)))
}

/// Loads the config at `config_path`, or the defaults when there is no such file.
pub fn load_config_from_file(config_path: &str) -> Result<Config, CliError> {
    let path = Path::new(config_path);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileSystem(path.to_path_buf(), e))?;
    parse_config(&contents)
}

/// Renders `config_template` with the process environment, then parses it.
pub fn parse_config(config_template: &str) -> Result<Config, CliError> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("config", config_template)
        .map_err(|e| CliError::FailedToParseYaml(Box::new(e)))?;

    let mut data = BTreeMap::new();

    for (key, value) in std::env::vars() {
        data.insert(key, value);
    }

    let config_str = handlebars
        .render("config", &data)
        .map_err(|e| CliError::FailedToParseYaml(Box::new(e)))?;

    let config: Config = serde_yaml::from_str(&config_str)
        .map_err(|e: serde_yaml::Error| CliError::FailedToParseYaml(Box::new(e)))?;

    Ok(config)
}

/// `STARMART_FEED_URL` points the run at an HTTP feed, replacing a file
/// source. `STARMART_WAREHOUSE_PATH` replaces the warehouse location.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(FEED_URL_ENV) {
        match &mut config.source {
            SourceConfig::Http(http) => http.url = url,
            SourceConfig::File(_) => {
                config.source = SourceConfig::Http(HttpSourceConfig {
                    url,
                    ..Default::default()
                })
            }
        }
    }
    if let Some(path) = lookup(WAREHOUSE_PATH_ENV) {
        config.warehouse.path = path;
    }
}

pub const LOGO: &str = r#"
 ___ _____ _   ___ __  __   _   ___ _____
/ __|_   _/_\ | _ \  \/  | /_\ | _ \_   _|
\__ \ | |/ _ \|   / |\/| |/ _ \|   / | |
|___/ |_/_/ \_\_|_\_|  |_/_/ \_\_|_\ |_|
"#;

pub const DESCRIPTION: &str = r#"Rebuilds a point-of-sale star schema warehouse from a transaction feed.

 If no sub commands are passed, starmart runs a full rebuild.
"#;
