use crate::error::{CostError, Result};
use crate::layers::{Layer, LayerCostResult};
use crate::pricing::models::{DigitalTwinsPricing, QueryUnitBand, TwinMakerPricing};
use crate::pricing::PricingTable;
use crate::provider::Provider;
use crate::workload::{WorkloadInput, DAYS_PER_MONTH};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Polling cadence of the legacy query model: once per minute, all month
const POLLS_PER_MONTH: f64 = 60.0 * 24.0 * DAYS_PER_MONTH;

/// How query volume against the twin service is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TwinQueryModel {
    /// Queries issued by dashboards: refreshes per hour x active hours x 30 days
    #[default]
    Dashboard,
    /// Every entity (or device group) polled once per minute; dashboard parameters are ignored
    ContinuousPolling,
}

impl std::str::FromStr for TwinQueryModel {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dashboard" => Ok(Self::Dashboard),
            "continuous-polling" => Ok(Self::ContinuousPolling),
            other => Err(CostError::configuration(format!(
                "unknown twin query model '{}', expected 'dashboard' or 'continuous-polling'",
                other
            ))),
        }
    }
}

/// Monthly cost of the twin management layer
pub fn compute(
    provider: Provider,
    workload: &WorkloadInput,
    pricing: &PricingTable,
    model: TwinQueryModel,
) -> Result<LayerCostResult> {
    let messages = workload.monthly_messages();
    if model == TwinQueryModel::Dashboard && workload.dashboard_queries_per_month() == 0.0 {
        warn!(%provider, "no dashboard queries configured; twin query cost is zero");
    }

    let cost = match provider {
        Provider::Aws => entity_graph_cost(workload, messages, &pricing.aws.iot_twin_maker, model),
        Provider::Azure => {
            data_update_cost(workload, messages, &pricing.azure.digital_twins, model)?
        }
    };
    debug!(%provider, ?model, cost, "twin management cost");

    Ok(LayerCostResult::new(Layer::TwinManagement, provider, cost)?.with_messages(messages))
}

/// Entity-graph service: per entity, per data-access call and per query
fn entity_graph_cost(
    workload: &WorkloadInput,
    messages: f64,
    pricing: &TwinMakerPricing,
    model: TwinQueryModel,
) -> f64 {
    let entities = workload.entities();
    let queries = match model {
        TwinQueryModel::Dashboard => workload.dashboard_queries_per_month(),
        TwinQueryModel::ContinuousPolling => entities * POLLS_PER_MONTH,
    };

    entities * pricing.entity_price
        + messages * pricing.unified_data_access_api_calls_price
        + queries * pricing.query_price
}

/// Data-update service: per operation plus query units stepped by device count
fn data_update_cost(
    workload: &WorkloadInput,
    messages: f64,
    pricing: &DigitalTwinsPricing,
    model: TwinQueryModel,
) -> Result<f64> {
    let update_cost = messages * pricing.operation_price;

    match model {
        TwinQueryModel::Dashboard => {
            let queries = workload.dashboard_queries_per_month();
            let query_units = query_units_for(workload.devices, &pricing.query_unit_tiers)?;
            Ok(update_cost
                + workload.message_size_kb.ceil() * queries * pricing.operation_price
                + query_units * pricing.query_price * queries)
        }
        TwinQueryModel::ContinuousPolling => {
            let device_groups = workload.devices / DAYS_PER_MONTH;
            Ok(update_cost + device_groups * POLLS_PER_MONTH * pricing.query_price)
        }
    }
}

/// Query units of the band with the highest lower bound not above `devices`
///
/// The loader rejects gaps between bands, so this is the band whose
/// `lower..=upper` range holds `devices`; a fractional count between two
/// bands stays in the lower one.
fn query_units_for(devices: f64, bands: &[QueryUnitBand]) -> Result<f64> {
    bands
        .iter()
        .rev()
        .find(|band| devices >= band.lower)
        .or_else(|| bands.first())
        .map(|band| band.value)
        .ok_or_else(|| CostError::configuration("azure.digitalTwins.queryUnitTiers is empty"))
}
