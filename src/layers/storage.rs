//! Hot, cool and archive storage cost models.
//!
//! Each tier consumes the result of the layer in front of it: hot storage the
//! processing result, cool storage the hot result, archive the cool result.
//! The stored data volume is carried through unchanged so the transfer edges
//! can price moving it onward.

use crate::error::Result;
use crate::layers::{Layer, LayerCostResult};
use crate::pricing::models::{
    BlobStorageArchivePricing, BlobStorageCoolPricing, CosmosDbPricing, DynamoDbPricing,
    GlacierDeepArchivePricing, S3InfrequentAccessPricing,
};
use crate::pricing::{tiered, PricingTable, TierSchedule};
use crate::provider::{Provider, StorageNode, StorageTier};
use crate::workload::{WorkloadInput, DAYS_PER_MONTH, HOURS_PER_MONTH};
use tracing::debug;

/// Extra half month of hot data kept while the monthly move to cool storage runs
const HOT_RETENTION_BUFFER_MONTHS: f64 = 0.5;
const SECONDS_PER_MONTH: f64 = DAYS_PER_MONTH * 24.0 * 60.0 * 60.0;
/// Cool objects are written in 100 MB chunks
const OBJECT_CHUNK_MB: f64 = 100.0;
/// Share of cool data read back each month
const COOL_RETRIEVAL_FRACTION: f64 = 0.1;
/// Share of archived data expected to be restored
const ARCHIVE_RETRIEVAL_FRACTION: f64 = 0.01;

/// Monthly cost of one storage node, fed by the result of the previous layer
pub fn compute(
    node: StorageNode,
    upstream: &LayerCostResult,
    workload: &WorkloadInput,
    pricing: &PricingTable,
) -> Result<LayerCostResult> {
    let data_size_in_gb = upstream.require_data_size()?;

    let cost = match (node.tier, node.provider) {
        (StorageTier::Hot, Provider::Aws) => dynamo_db_cost(
            data_size_in_gb,
            upstream.require_messages()?,
            workload.message_size_kb,
            workload.hot_months,
            &pricing.aws.dynamo_db,
        )?,
        (StorageTier::Hot, Provider::Azure) => cosmos_db_cost(
            data_size_in_gb,
            upstream.require_messages()?,
            workload.message_size_kb,
            workload.hot_months,
            &pricing.azure.cosmos_db,
        ),
        (StorageTier::Cool, Provider::Aws) => s3_infrequent_access_cost(
            data_size_in_gb,
            workload.cool_months,
            &pricing.aws.s3_infrequent_access,
        ),
        (StorageTier::Cool, Provider::Azure) => blob_cool_cost(
            data_size_in_gb,
            workload.cool_months,
            &pricing.azure.blob_storage_cool,
        ),
        (StorageTier::Archive, Provider::Aws) => glacier_deep_archive_cost(
            data_size_in_gb,
            workload.archive_months,
            &pricing.aws.s3_glacier_deep_archive,
        ),
        (StorageTier::Archive, Provider::Azure) => blob_archive_cost(
            data_size_in_gb,
            workload.archive_months,
            &pricing.azure.blob_storage_archive,
        ),
    };
    debug!(node = %node, data_size_in_gb, cost, "storage cost");

    Ok(LayerCostResult::new(Layer::storage(node.tier), node.provider, cost)?
        .with_data_size(data_size_in_gb))
}

/// Document store: per-unit writes and reads plus storage above the free allowance
fn dynamo_db_cost(
    data_size_in_gb: f64,
    messages: f64,
    message_size_kb: f64,
    months: f64,
    pricing: &DynamoDbPricing,
) -> Result<f64> {
    let stored_gb = data_size_in_gb * (months + HOT_RETENTION_BUFFER_MONTHS);

    let write_units = messages * message_size_kb;
    let read_units = messages / 2.0;

    let storage_schedule = TierSchedule::flat(pricing.free_storage * months, pricing.storage_price);
    let storage_cost = tiered::evaluate(stored_gb, &storage_schedule)?.ceil();

    Ok(pricing.write_price * write_units + pricing.read_price * read_units + storage_cost)
}

/// Provisioned-throughput table store with a request-unit floor.
///
/// The message-size multiplier is an empirical approximation of the vendor
/// calculator once throughput rises above the floor.
fn cosmos_db_cost(
    data_size_in_gb: f64,
    messages: f64,
    message_size_kb: f64,
    months: f64,
    pricing: &CosmosDbPricing,
) -> f64 {
    let stored_gb = data_size_in_gb * (months + HOT_RETENTION_BUFFER_MONTHS);

    let writes_per_second = messages / SECONDS_PER_MONTH;
    let reads_per_second = writes_per_second;
    let projected = (writes_per_second * pricing.rus_per_write
        + reads_per_second * pricing.rus_per_read)
        .ceil();

    let mut request_units = pricing.minimum_request_units;
    let mut multiplier = 1.0;
    if projected > request_units {
        request_units = projected;
        multiplier += (message_size_kb - 1.0).max(0.0) * pricing.message_size_multiplier_step;
    }

    HOURS_PER_MONTH * request_units * pricing.request_price * multiplier
        + stored_gb * pricing.storage_price
}

fn object_chunks(data_size_in_gb: f64) -> f64 {
    (data_size_in_gb * 1024.0 / OBJECT_CHUNK_MB).ceil()
}

/// Infrequent-access object storage: initial put and lifecycle transition per chunk
fn s3_infrequent_access_cost(
    data_size_in_gb: f64,
    months: f64,
    pricing: &S3InfrequentAccessPricing,
) -> f64 {
    let requests = object_chunks(data_size_in_gb) * 2.0;
    let retrieved_gb = data_size_in_gb * months * COOL_RETRIEVAL_FRACTION + data_size_in_gb;

    pricing.storage_price * data_size_in_gb * months
        + pricing.upfront_price * data_size_in_gb * months
        + pricing.request_price * requests
        + pricing.data_retrieval_price * retrieved_gb
}

fn blob_cool_cost(data_size_in_gb: f64, months: f64, pricing: &BlobStorageCoolPricing) -> f64 {
    let writes = object_chunks(data_size_in_gb);
    let reads = writes * COOL_RETRIEVAL_FRACTION;
    let retrieved_gb = data_size_in_gb * COOL_RETRIEVAL_FRACTION + data_size_in_gb;

    pricing.storage_price * data_size_in_gb * months
        + writes * pricing.write_price
        + reads * pricing.read_price
        + retrieved_gb * pricing.data_retrieval_price
}

/// Deep archive: one put plus one lifecycle request per GB
fn glacier_deep_archive_cost(
    data_size_in_gb: f64,
    months: f64,
    pricing: &GlacierDeepArchivePricing,
) -> f64 {
    let stored_gb = data_size_in_gb * months;
    let requests = data_size_in_gb * 2.0;
    let retrieved_gb = stored_gb * ARCHIVE_RETRIEVAL_FRACTION;

    stored_gb * pricing.storage_price
        + requests * pricing.lifecycle_and_write_price
        + retrieved_gb * pricing.data_retrieval_price
}

fn blob_archive_cost(data_size_in_gb: f64, months: f64, pricing: &BlobStorageArchivePricing) -> f64 {
    let stored_gb = data_size_in_gb * months;
    let writes = data_size_in_gb;
    let retrieved_gb = stored_gb * ARCHIVE_RETRIEVAL_FRACTION;

    stored_gb * pricing.storage_price
        + writes * pricing.write_price
        + retrieved_gb * pricing.data_retrieval_price
}
