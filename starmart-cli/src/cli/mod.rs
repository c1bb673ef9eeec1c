mod helper;
pub mod types;
pub use helper::{
    apply_env_overrides, init_starmart, load_config_from_file, parse_config, DESCRIPTION, LOGO,
};
