use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::path::PathBuf;
use tracing::info;
use twin_cost::config::Config;
use twin_cost::pricing::{load_pricing_file, LoadedPricing, PricingTable};

fn load(cfg: &Config, file: Option<PathBuf>) -> Result<LoadedPricing> {
    let path = file.unwrap_or_else(|| cfg.pricing.path.clone());
    Ok(load_pricing_file(path)?)
}

/// Execute the pricing validate command
pub fn validate(cfg: &Config, file: Option<PathBuf>) -> Result<()> {
    println!("{}", "Validating pricing document...".yellow());

    let pricing = load(cfg, file)?;

    println!("{}", "✓ Pricing document is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Source: {}", pricing.source);
    println!("  SHA-256: {}", pricing.fingerprint);
    println!(
        "  Egress tiers: AWS {}, Azure {}",
        pricing.table.aws.transfer.tiers.len(),
        pricing.table.azure.transfer.tiers.len()
    );

    info!("Pricing validation successful");
    Ok(())
}

/// Execute the pricing show command
pub fn show(cfg: &Config, file: Option<PathBuf>) -> Result<()> {
    let pricing = load(cfg, file)?;

    println!("{} {}", "Pricing document:".green().bold(), pricing.source);
    println!("{} {}", "SHA-256:".dimmed(), pricing.fingerprint);
    println!("{}", build_summary_table(&pricing.table));
    Ok(())
}

/// One row per layer and provider with the headline prices
fn summary_rows(table: &PricingTable) -> Vec<[String; 4]> {
    let aws = &table.aws;
    let azure = &table.azure;
    let row = |layer: &str, provider: &str, service: &str, detail: String| {
        [layer.to_string(), provider.to_string(), service.to_string(), detail]
    };

    vec![
        row(
            "Data Acquisition",
            "AWS",
            "IoT Core",
            format!(
                "${}/device, {} message tiers",
                aws.iot_core.price_per_device_and_month,
                aws.iot_core.message_tiers.tiers.len()
            ),
        ),
        row(
            "Data Acquisition",
            "Azure",
            "IoT Hub",
            format!("{} capacity bands", azure.iot_hub.capacity_bands.len()),
        ),
        row(
            "Data Processing",
            "AWS",
            "Lambda",
            format!(
                "${}/request, ${}/GB-s",
                aws.lambda.request_price, aws.lambda.duration_price
            ),
        ),
        row(
            "Data Processing",
            "Azure",
            "Functions",
            format!(
                "${}/request, ${}/GB-s",
                azure.functions.request_price, azure.functions.duration_price
            ),
        ),
        row(
            "Hot Storage",
            "AWS",
            "DynamoDB",
            format!("${}/GB-month", aws.dynamo_db.storage_price),
        ),
        row(
            "Hot Storage",
            "Azure",
            "Cosmos DB",
            format!(
                "{} RU/s floor, ${}/GB-month",
                azure.cosmos_db.minimum_request_units, azure.cosmos_db.storage_price
            ),
        ),
        row(
            "Cool Storage",
            "AWS",
            "S3 Infrequent Access",
            format!("${}/GB-month", aws.s3_infrequent_access.storage_price),
        ),
        row(
            "Cool Storage",
            "Azure",
            "Blob Storage (cool)",
            format!("${}/GB-month", azure.blob_storage_cool.storage_price),
        ),
        row(
            "Archive Storage",
            "AWS",
            "S3 Glacier Deep Archive",
            format!("${}/GB-month", aws.s3_glacier_deep_archive.storage_price),
        ),
        row(
            "Archive Storage",
            "Azure",
            "Blob Storage (archive)",
            format!("${}/GB-month", azure.blob_storage_archive.storage_price),
        ),
        row(
            "Twin Management",
            "AWS",
            "IoT TwinMaker",
            format!(
                "${}/entity, ${}/query",
                aws.iot_twin_maker.entity_price, aws.iot_twin_maker.query_price
            ),
        ),
        row(
            "Twin Management",
            "Azure",
            "Digital Twins",
            format!(
                "${}/operation, {} query-unit bands",
                azure.digital_twins.operation_price,
                azure.digital_twins.query_unit_tiers.len()
            ),
        ),
        row(
            "Data Visualization",
            "AWS",
            "Managed Grafana",
            format!(
                "${}/editor, ${}/viewer",
                aws.managed_grafana.editor_price, aws.managed_grafana.viewer_price
            ),
        ),
        row(
            "Data Visualization",
            "Azure",
            "Managed Grafana",
            format!(
                "${}/user, ${}/hour",
                azure.managed_grafana.user_price, azure.managed_grafana.hourly_price
            ),
        ),
    ]
}

fn build_summary_table(pricing: &PricingTable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("LAYER").fg(Color::Cyan),
        Cell::new("PROVIDER").fg(Color::Cyan),
        Cell::new("SERVICE").fg(Color::Cyan),
        Cell::new("PRICES").fg(Color::Cyan),
    ]);
    for row in summary_rows(pricing) {
        table.add_row(row.into_iter().map(Cell::new).collect::<Vec<_>>());
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use twin_cost::pricing::parse_pricing_json;

    const PRICING: &str = include_str!("../../pricing.json");

    #[test]
    fn test_summary_covers_every_layer_and_provider() {
        let table = parse_pricing_json(PRICING).unwrap();
        let rows = summary_rows(&table);
        assert_eq!(rows.len(), 14);
        assert!(rows.iter().any(|r| r[2] == "Cosmos DB" && r[3].contains("400")));
        assert_eq!(build_summary_table(&table).row_iter().count(), 14);
    }

    #[test]
    fn test_file_argument_overrides_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(PRICING.as_bytes()).unwrap();

        let mut cfg = Config::default();
        cfg.pricing.path = PathBuf::from("/nonexistent/pricing.json");
        assert!(load(&cfg, None).is_err());

        let loaded = load(&cfg, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(loaded.fingerprint.len(), 64);
    }
}
