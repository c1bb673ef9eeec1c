use clap::Parser;
use starmart_cli::cli::init_starmart;
use starmart_cli::cli::types::{Cli, Commands};
use starmart_cli::errors::OrchestrationError;
use starmart_cli::set_panic_hook;
use starmart_cli::summary::stats_table;
use starmart_tracing::{init_telemetry, init_telemetry_closure};
use starmart_types::tracing::error;
use std::process;

fn main() {
    set_panic_hook();

    if let Err(e) = run() {
        // The global subscriber may not be installed yet.
        init_telemetry_closure(None, None, || error!("{}", e));
        process::exit(1);
    }
}

fn run() -> Result<(), OrchestrationError> {
    let cli = Cli::parse();

    let starmart = init_starmart(&cli.config_path)?;
    init_telemetry(
        Some(&starmart.config.app_name),
        starmart.config.telemetry.clone(),
    );

    match cli.cmd.unwrap_or(Commands::Run) {
        Commands::Run => {
            let summary = starmart.run()?;
            summary.convert_to_table().printstd();
        }
        Commands::Stats => {
            let row_counts = starmart.stats()?;
            stats_table(&row_counts).printstd();
        }
        Commands::Config => {
            starmart.config.convert_to_table().printstd();
        }
    }
    Ok(())
}
