use crate::pricing::tiered::TierSchedule;
use serde::{Deserialize, Serialize};

/// Complete pricing document, keyed provider -> service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    pub aws: AwsPricing,
    pub azure: AzurePricing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsPricing {
    /// Public-internet egress
    pub transfer: TierSchedule,
    pub iot_core: IotCorePricing,
    pub lambda: ServerlessPricing,
    pub dynamo_db: DynamoDbPricing,
    pub s3_infrequent_access: S3InfrequentAccessPricing,
    pub s3_glacier_deep_archive: GlacierDeepArchivePricing,
    pub iot_twin_maker: TwinMakerPricing,
    pub managed_grafana: PerSeatGrafanaPricing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePricing {
    /// Public-internet egress
    pub transfer: TierSchedule,
    pub iot_hub: IotHubPricing,
    pub functions: ServerlessPricing,
    pub cosmos_db: CosmosDbPricing,
    pub blob_storage_cool: BlobStorageCoolPricing,
    pub blob_storage_archive: BlobStorageArchivePricing,
    pub digital_twins: DigitalTwinsPricing,
    pub managed_grafana: WorkspaceGrafanaPricing,
}

/// Per-message broker with tiered message pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IotCorePricing {
    pub price_per_device_and_month: f64,
    pub price_rules_triggered: f64,
    /// Messages larger than this are billed as several messages
    pub billing_message_size_kb: f64,
    pub message_tiers: TierSchedule,
}

/// Broker billed in capacity units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IotHubPricing {
    pub billing_message_size_kb: f64,
    pub capacity_bands: Vec<CapacityBand>,
}

/// Volume band of a capacity-unit tariff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBand {
    /// Highest monthly message volume served by this band; `None` for the last band
    #[serde(default)]
    pub limit: Option<f64>,
    /// Messages included in one unit
    pub threshold: f64,
    /// Monthly price of one unit
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerlessPricing {
    pub request_price: f64,
    /// Price per GB-second
    pub duration_price: f64,
    pub free_requests: f64,
    /// Free GB-seconds per month
    pub free_compute_time: f64,
    #[serde(default = "default_execution_duration_ms")]
    pub execution_duration_ms: f64,
    #[serde(default = "default_allocated_memory_mb")]
    pub allocated_memory_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbPricing {
    pub write_price: f64,
    pub read_price: f64,
    pub storage_price: f64,
    /// Free GB per month
    pub free_storage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosDbPricing {
    pub minimum_request_units: f64,
    pub rus_per_write: f64,
    pub rus_per_read: f64,
    pub storage_price: f64,
    /// Price per provisioned RU/s per hour
    pub request_price: f64,
    /// Request price growth per KB above 1 KB, calibrated against the vendor calculator
    #[serde(default = "default_message_size_multiplier_step")]
    pub message_size_multiplier_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3InfrequentAccessPricing {
    pub storage_price: f64,
    pub upfront_price: f64,
    pub request_price: f64,
    pub data_retrieval_price: f64,
    pub transfer_cost_from_dynamo_db: f64,
    pub transfer_cost_from_cosmos_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobStorageCoolPricing {
    pub storage_price: f64,
    pub write_price: f64,
    pub read_price: f64,
    pub data_retrieval_price: f64,
    pub transfer_cost_from_cosmos_db: f64,
    #[serde(default = "default_free_transfer_from_cosmos_db_gb")]
    pub free_transfer_from_cosmos_db_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlacierDeepArchivePricing {
    pub storage_price: f64,
    pub lifecycle_and_write_price: f64,
    pub data_retrieval_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobStorageArchivePricing {
    pub storage_price: f64,
    pub write_price: f64,
    pub data_retrieval_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinMakerPricing {
    pub entity_price: f64,
    pub unified_data_access_api_calls_price: f64,
    pub query_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalTwinsPricing {
    pub operation_price: f64,
    pub query_price: f64,
    pub query_unit_tiers: Vec<QueryUnitBand>,
}

/// Query units charged per query for a device-count band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryUnitBand {
    pub lower: f64,
    #[serde(default)]
    pub upper: Option<f64>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerSeatGrafanaPricing {
    pub editor_price: f64,
    pub viewer_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceGrafanaPricing {
    pub user_price: f64,
    pub hourly_price: f64,
}

fn default_execution_duration_ms() -> f64 {
    100.0
}

fn default_allocated_memory_mb() -> f64 {
    128.0
}

fn default_message_size_multiplier_step() -> f64 {
    0.05
}

fn default_free_transfer_from_cosmos_db_gb() -> f64 {
    5.0
}
