use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "twin-cost",
    version,
    about = "Monthly cost estimator for IoT Digital Twin pipelines"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "twin-cost.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Estimate monthly costs and recommend the cheapest architecture
    Estimate(EstimateArgs),

    /// Pricing document commands
    Pricing {
        #[command(subcommand)]
        action: PricingCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PricingCommands {
    /// Load and validate the pricing document
    Validate {
        /// Pricing file (defaults to the configured path)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print a per-service summary of the pricing document
    Show {
        /// Pricing file (defaults to the configured path)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Workload parameters; `--workload` replaces every flag below it
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Workload file (JSON or TOML, camelCase keys)
    #[arg(short, long)]
    pub workload: Option<PathBuf>,

    /// Pricing file overriding the configured path
    #[arg(short, long)]
    pub pricing: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Number of IoT devices
    #[arg(long, default_value = "100")]
    pub devices: f64,

    /// Minutes between two messages of one device
    #[arg(long, default_value = "5")]
    pub interval: f64,

    /// Average message size in KB
    #[arg(long, default_value = "1")]
    pub message_size: f64,

    /// Months data stays in hot storage
    #[arg(long, default_value = "1")]
    pub hot_months: f64,

    /// Months data stays in cool storage
    #[arg(long, default_value = "3")]
    pub cool_months: f64,

    /// Months data stays in archive storage
    #[arg(long, default_value = "12")]
    pub archive_months: f64,

    /// Number of 3D scene entities (implies a 3D model is needed)
    #[arg(long)]
    pub entities: Option<f64>,

    /// Dashboard editors
    #[arg(long, default_value = "2")]
    pub editors: f64,

    /// Dashboard viewers
    #[arg(long, default_value = "5")]
    pub viewers: f64,

    /// Dashboard refreshes per hour
    #[arg(long, default_value = "4")]
    pub refreshes_per_hour: f64,

    /// Hours per day dashboards are in use
    #[arg(long, default_value = "8")]
    pub active_hours: f64,
}
