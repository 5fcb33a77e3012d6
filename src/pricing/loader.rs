use crate::error::{CostError, Result};
use crate::pricing::models::{CapacityBand, PricingTable, QueryUnitBand};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Pricing table together with the fingerprint of the document it came from
#[derive(Debug, Clone)]
pub struct LoadedPricing {
    pub table: PricingTable,
    pub fingerprint: String,
    pub source: String,
}

/// Read, parse and validate a pricing document from disk
pub fn load_pricing_file(path: impl AsRef<Path>) -> Result<LoadedPricing> {
    let path = path.as_ref();
    info!("Loading pricing data from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        CostError::configuration(format!("Failed to read pricing file {}: {}", path.display(), e))
    })?;
    debug!("Read {} bytes of pricing data", content.len());

    let table = parse_pricing_json(&content)?;
    let fingerprint = calculate_hash(&content);
    info!(fingerprint = %fingerprint, "Pricing data loaded");

    Ok(LoadedPricing {
        table,
        fingerprint,
        source: path.display().to_string(),
    })
}

/// Parse pricing JSON and validate it
pub fn parse_pricing_json(json: &str) -> Result<PricingTable> {
    let table: PricingTable = serde_json::from_str(json)
        .map_err(|e| CostError::configuration(format!("Failed to parse pricing JSON: {}", e)))?;
    validate_pricing(&table)?;
    Ok(table)
}

/// Calculate SHA256 hash of content
pub fn calculate_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check every tier list, band list and flat price of the table
pub fn validate_pricing(table: &PricingTable) -> Result<()> {
    let aws = &table.aws;
    let azure = &table.azure;

    aws.transfer.validate("aws.transfer")?;
    azure.transfer.validate("azure.transfer")?;
    aws.iot_core.message_tiers.validate("aws.iotCore.messageTiers")?;

    check_prices(
        "aws.iotCore",
        &[
            ("pricePerDeviceAndMonth", aws.iot_core.price_per_device_and_month),
            ("priceRulesTriggered", aws.iot_core.price_rules_triggered),
        ],
    )?;
    check_positive("aws.iotCore.billingMessageSizeKb", aws.iot_core.billing_message_size_kb)?;
    check_positive("azure.iotHub.billingMessageSizeKb", azure.iot_hub.billing_message_size_kb)?;
    validate_capacity_bands("azure.iotHub.capacityBands", &azure.iot_hub.capacity_bands)?;

    for (name, serverless) in [("aws.lambda", &aws.lambda), ("azure.functions", &azure.functions)] {
        check_prices(
            name,
            &[
                ("requestPrice", serverless.request_price),
                ("durationPrice", serverless.duration_price),
                ("freeRequests", serverless.free_requests),
                ("freeComputeTime", serverless.free_compute_time),
                ("executionDurationMs", serverless.execution_duration_ms),
                ("allocatedMemoryMb", serverless.allocated_memory_mb),
            ],
        )?;
    }

    check_prices(
        "aws.dynamoDb",
        &[
            ("writePrice", aws.dynamo_db.write_price),
            ("readPrice", aws.dynamo_db.read_price),
            ("storagePrice", aws.dynamo_db.storage_price),
            ("freeStorage", aws.dynamo_db.free_storage),
        ],
    )?;
    check_prices(
        "azure.cosmosDb",
        &[
            ("minimumRequestUnits", azure.cosmos_db.minimum_request_units),
            ("rusPerWrite", azure.cosmos_db.rus_per_write),
            ("rusPerRead", azure.cosmos_db.rus_per_read),
            ("storagePrice", azure.cosmos_db.storage_price),
            ("requestPrice", azure.cosmos_db.request_price),
            ("messageSizeMultiplierStep", azure.cosmos_db.message_size_multiplier_step),
        ],
    )?;
    check_prices(
        "aws.s3InfrequentAccess",
        &[
            ("storagePrice", aws.s3_infrequent_access.storage_price),
            ("upfrontPrice", aws.s3_infrequent_access.upfront_price),
            ("requestPrice", aws.s3_infrequent_access.request_price),
            ("dataRetrievalPrice", aws.s3_infrequent_access.data_retrieval_price),
            ("transferCostFromDynamoDb", aws.s3_infrequent_access.transfer_cost_from_dynamo_db),
            ("transferCostFromCosmosDb", aws.s3_infrequent_access.transfer_cost_from_cosmos_db),
        ],
    )?;
    check_prices(
        "azure.blobStorageCool",
        &[
            ("storagePrice", azure.blob_storage_cool.storage_price),
            ("writePrice", azure.blob_storage_cool.write_price),
            ("readPrice", azure.blob_storage_cool.read_price),
            ("dataRetrievalPrice", azure.blob_storage_cool.data_retrieval_price),
            ("transferCostFromCosmosDb", azure.blob_storage_cool.transfer_cost_from_cosmos_db),
            (
                "freeTransferFromCosmosDbGb",
                azure.blob_storage_cool.free_transfer_from_cosmos_db_gb,
            ),
        ],
    )?;
    check_prices(
        "aws.s3GlacierDeepArchive",
        &[
            ("storagePrice", aws.s3_glacier_deep_archive.storage_price),
            ("lifecycleAndWritePrice", aws.s3_glacier_deep_archive.lifecycle_and_write_price),
            ("dataRetrievalPrice", aws.s3_glacier_deep_archive.data_retrieval_price),
        ],
    )?;
    check_prices(
        "azure.blobStorageArchive",
        &[
            ("storagePrice", azure.blob_storage_archive.storage_price),
            ("writePrice", azure.blob_storage_archive.write_price),
            ("dataRetrievalPrice", azure.blob_storage_archive.data_retrieval_price),
        ],
    )?;
    check_prices(
        "aws.iotTwinMaker",
        &[
            ("entityPrice", aws.iot_twin_maker.entity_price),
            (
                "unifiedDataAccessApiCallsPrice",
                aws.iot_twin_maker.unified_data_access_api_calls_price,
            ),
            ("queryPrice", aws.iot_twin_maker.query_price),
        ],
    )?;
    check_prices(
        "azure.digitalTwins",
        &[
            ("operationPrice", azure.digital_twins.operation_price),
            ("queryPrice", azure.digital_twins.query_price),
        ],
    )?;
    validate_query_unit_bands(
        "azure.digitalTwins.queryUnitTiers",
        &azure.digital_twins.query_unit_tiers,
    )?;
    check_prices(
        "aws.managedGrafana",
        &[
            ("editorPrice", aws.managed_grafana.editor_price),
            ("viewerPrice", aws.managed_grafana.viewer_price),
        ],
    )?;
    check_prices(
        "azure.managedGrafana",
        &[
            ("userPrice", azure.managed_grafana.user_price),
            ("hourlyPrice", azure.managed_grafana.hourly_price),
        ],
    )?;

    debug!("Pricing table passed validation");
    Ok(())
}

fn check_prices(service: &str, entries: &[(&str, f64)]) -> Result<()> {
    for (field, value) in entries {
        if !value.is_finite() || *value < 0.0 {
            return Err(CostError::configuration(format!(
                "{}.{} must be a non-negative number, got {}",
                service, field, value
            )));
        }
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CostError::configuration(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_capacity_bands(name: &str, bands: &[CapacityBand]) -> Result<()> {
    if bands.is_empty() {
        return Err(CostError::configuration(format!("{}: band list is empty", name)));
    }
    let last = bands.len() - 1;
    let mut previous: Option<f64> = None;
    for (idx, band) in bands.iter().enumerate() {
        check_positive(&format!("{}[{}].threshold", name, idx), band.threshold)?;
        check_prices(name, &[("price", band.price)])?;
        match band.limit {
            Some(limit) => {
                check_prices(name, &[("limit", limit)])?;
                if previous.is_some_and(|p| limit <= p) {
                    return Err(CostError::configuration(format!(
                        "{}: band limits must be strictly ascending",
                        name
                    )));
                }
                previous = Some(limit);
            }
            None if idx != last => {
                return Err(CostError::configuration(format!(
                    "{}: only the final band may be unbounded",
                    name
                )));
            }
            None => {}
        }
    }
    Ok(())
}

/// Bands cover whole device counts without gaps or overlaps; only the last one is open
fn validate_query_unit_bands(name: &str, bands: &[QueryUnitBand]) -> Result<()> {
    if bands.is_empty() {
        return Err(CostError::configuration(format!("{}: band list is empty", name)));
    }
    let last = bands.len() - 1;
    for (idx, band) in bands.iter().enumerate() {
        check_prices(name, &[("lower", band.lower), ("value", band.value)])?;
        match (band.upper, bands.get(idx + 1)) {
            (Some(upper), next) => {
                if !upper.is_finite() || upper < band.lower {
                    return Err(CostError::configuration(format!(
                        "{}: upper bound {} is below lower bound {}",
                        name, upper, band.lower
                    )));
                }
                match next {
                    Some(next) if next.lower != upper + 1.0 => {
                        return Err(CostError::configuration(format!(
                            "{}[{}]: band starts at {}, expected {}",
                            name,
                            idx + 1,
                            next.lower,
                            upper + 1.0
                        )));
                    }
                    Some(_) => {}
                    None => {
                        return Err(CostError::configuration(format!(
                            "{}: the final band must be unbounded",
                            name
                        )));
                    }
                }
            }
            (None, _) if idx != last => {
                return Err(CostError::configuration(format!(
                    "{}: only the final band may be unbounded",
                    name
                )));
            }
            (None, _) => {}
        }
    }
    Ok(())
}
