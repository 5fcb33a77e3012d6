use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use twin_cost::{config, init_tracing};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Fall back to default logging when the config is broken so the error still gets reported
    let cfg = config::load_config(&args.config);
    match &cfg {
        Ok(cfg) => init_tracing(&cfg.logging.level, &cfg.logging.format),
        Err(_) => init_tracing("warn", "text"),
    }

    match args.command {
        cli::Commands::Estimate(estimate) => commands::estimate::execute(&cfg?, estimate)?,
        cli::Commands::Pricing { action } => match action {
            cli::PricingCommands::Validate { file } => commands::pricing::validate(&cfg?, file)?,
            cli::PricingCommands::Show { file } => commands::pricing::show(&cfg?, file)?,
        },
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg?)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config, &cfg?)?,
        },
        cli::Commands::Version => {
            println!("twin-cost v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
