use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::path::Path;
use tracing::info;
use twin_cost::config::Config;
use twin_cost::error::{CostError, ErrorReport};
use twin_cost::layers::Layer;
use twin_cost::pricing::load_pricing_file;
use twin_cost::{ArchitectureRecommender, Provider, Recommendation, RecommenderOptions, WorkloadInput};

use crate::cli::{EstimateArgs, OutputFormat};

/// Shorter cool retention triggers early-deletion charges
const MIN_COOL_MONTHS: f64 = 1.0;
/// Shorter archive retention triggers early-deletion charges
const MIN_ARCHIVE_MONTHS: f64 = 6.0;

/// Execute the estimate command
///
/// With `--format json` a failure is also printed to stdout as an error record
pub fn execute(cfg: &Config, args: EstimateArgs) -> Result<()> {
    let format = args.format;
    match run(cfg, args) {
        Err(err) if format == OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error_report(&err))?);
            Err(err)
        }
        other => other,
    }
}

fn error_report(err: &anyhow::Error) -> ErrorReport {
    match err.downcast_ref::<CostError>() {
        Some(cost_error) => ErrorReport::from(cost_error),
        None => ErrorReport {
            error: "error",
            message: format!("{:#}", err),
        },
    }
}

fn run(cfg: &Config, args: EstimateArgs) -> Result<()> {
    let workload = match &args.workload {
        Some(path) => read_workload(path)?,
        None => workload_from_args(&args),
    };
    check_minimum_retention(&workload)?;

    let pricing_path = args.pricing.as_deref().unwrap_or(cfg.pricing.path.as_path());
    let pricing = load_pricing_file(pricing_path)?;

    let options = RecommenderOptions {
        twin_query_model: cfg.twin_management.query_model,
    };
    let recommendation = ArchitectureRecommender::new(&pricing.table, options).recommend(&workload)?;
    info!(
        pricing_fingerprint = %pricing.fingerprint,
        total_monthly_cost = recommendation.total_monthly_cost,
        "Estimate completed"
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recommendation)?),
        OutputFormat::Table => print_report(&recommendation),
    }
    Ok(())
}

fn workload_from_args(args: &EstimateArgs) -> WorkloadInput {
    WorkloadInput {
        devices: args.devices,
        interval_minutes: args.interval,
        message_size_kb: args.message_size,
        hot_months: args.hot_months,
        cool_months: args.cool_months,
        archive_months: args.archive_months,
        entity_count: args.entities,
        editors: args.editors,
        viewers: args.viewers,
        dashboard_refreshes_per_hour: args.refreshes_per_hour,
        dashboard_active_hours_per_day: args.active_hours,
    }
}

/// Read a workload file; `.json` is parsed as JSON, anything else as TOML
fn read_workload(path: &Path) -> Result<WorkloadInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workload file {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let workload = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid workload JSON in {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Invalid workload TOML in {}", path.display()))?
    };
    Ok(workload)
}

fn check_minimum_retention(workload: &WorkloadInput) -> twin_cost::Result<()> {
    if workload.cool_months < MIN_COOL_MONTHS {
        return Err(CostError::invalid_input(format!(
            "Cool storage retention must be at least {} month, got {}",
            MIN_COOL_MONTHS, workload.cool_months
        )));
    }
    if workload.archive_months < MIN_ARCHIVE_MONTHS {
        return Err(CostError::invalid_input(format!(
            "Archive storage retention must be at least {} months, got {}",
            MIN_ARCHIVE_MONTHS, workload.archive_months
        )));
    }
    Ok(())
}

/// Provider the recommendation picked for `layer`
fn chosen_provider(recommendation: &Recommendation, layer: Layer) -> Option<Provider> {
    match layer {
        Layer::Acquisition | Layer::Processing => Some(recommendation.feeder),
        Layer::TwinManagement => Some(recommendation.twin_management),
        Layer::Visualization => Some(recommendation.visualization),
        storage => {
            let tier = storage.storage_tier()?;
            recommendation
                .storage_path
                .nodes
                .iter()
                .find(|node| node.tier == tier)
                .map(|node| node.provider)
        }
    }
}

fn build_layer_table(recommendation: &Recommendation) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("LAYER").fg(Color::Cyan)];
    header.extend(
        Provider::ALL
            .iter()
            .map(|p| Cell::new(format!("{} $/MONTH", p).to_uppercase()).fg(Color::Cyan)),
    );
    header.push(Cell::new("CHOSEN").fg(Color::Cyan));
    table.set_header(header);

    for comparison in &recommendation.layers {
        let chosen = chosen_provider(recommendation, comparison.layer);
        let mut row = vec![Cell::new(comparison.layer.to_string())];
        for provider in Provider::ALL {
            let cell = match comparison.result(provider) {
                Some(result) => {
                    let cell = Cell::new(format!("{:.2}", result.total_monthly_cost()));
                    if chosen == Some(provider) {
                        cell.fg(Color::Green)
                    } else {
                        cell
                    }
                }
                None => Cell::new("n/a").fg(Color::DarkGrey),
            };
            row.push(cell);
        }
        row.push(Cell::new(chosen.map_or_else(|| "-".to_string(), |p| p.to_string())));
        table.add_row(row);
    }

    table
}

fn print_report(recommendation: &Recommendation) {
    if let Some(acquisition) = recommendation.layer(Layer::Acquisition) {
        if let Some(messages) = acquisition
            .results
            .first()
            .and_then(|r| r.total_messages_per_month())
        {
            println!("{}: {:.0}", "Messages per month".cyan(), messages);
        }
    }
    println!();

    println!("{}", "Monthly cost per layer:".bold());
    println!("{}", build_layer_table(recommendation));
    println!();

    println!(
        "{}: {} (${:.2})",
        "Storage path".cyan(),
        recommendation.storage_path.labels().join(" → "),
        recommendation.storage_path.total_cost
    );
    println!(
        "{}: {}",
        "Recommended architecture".green().bold(),
        recommendation.path_labels().join(" → ")
    );
    println!(
        "{}: ${:.2}",
        "Total monthly cost".green().bold(),
        recommendation.total_monthly_cost
    );
}
