use crate::error::{CostError, Result};
use crate::layers::{Layer, LayerCostResult};
use crate::pricing::models::{IotCorePricing, IotHubPricing};
use crate::pricing::{tiered, PricingTable};
use crate::provider::Provider;
use crate::workload::{kb_to_gb, WorkloadInput};
use tracing::debug;

/// Each routed message triggers one rule and one action
const RULE_EXECUTIONS_PER_MESSAGE: f64 = 2.0;

/// Monthly cost of ingesting device messages through the provider's broker
pub fn compute(
    provider: Provider,
    workload: &WorkloadInput,
    pricing: &PricingTable,
) -> Result<LayerCostResult> {
    let messages = workload.monthly_messages();
    let data_size_in_gb = kb_to_gb(messages, workload.message_size_kb).ceil();

    let cost = match provider {
        Provider::Aws => per_message_cost(workload, messages, &pricing.aws.iot_core)?,
        Provider::Azure => capacity_unit_cost(workload, messages, &pricing.azure.iot_hub)?,
    };
    debug!(%provider, messages, cost, "acquisition cost");

    Ok(LayerCostResult::new(Layer::Acquisition, provider, cost)?
        .with_messages(messages)
        .with_data_size(data_size_in_gb))
}

/// Messages above the billing size are billed once per started billing unit
fn billable_messages(messages: f64, message_size_kb: f64, billing_size_kb: f64) -> f64 {
    if message_size_kb > billing_size_kb {
        messages * (message_size_kb / billing_size_kb).ceil()
    } else {
        messages
    }
}

fn per_message_cost(workload: &WorkloadInput, messages: f64, pricing: &IotCorePricing) -> Result<f64> {
    let billable = billable_messages(messages, workload.message_size_kb, pricing.billing_message_size_kb);

    let device_fee = workload.devices * pricing.price_per_device_and_month;
    let rules_fee = RULE_EXECUTIONS_PER_MESSAGE * billable * pricing.price_rules_triggered;
    let messaging_fee = tiered::evaluate(billable, &pricing.message_tiers)?;

    Ok(device_fee + rules_fee + messaging_fee)
}

fn capacity_unit_cost(workload: &WorkloadInput, messages: f64, pricing: &IotHubPricing) -> Result<f64> {
    let billable = billable_messages(messages, workload.message_size_kb, pricing.billing_message_size_kb);

    let band = pricing
        .capacity_bands
        .iter()
        .find(|band| band.limit.map_or(true, |limit| billable <= limit))
        .or_else(|| pricing.capacity_bands.last())
        .ok_or_else(|| CostError::configuration("azure.iotHub.capacityBands is empty"))?;

    let units = if billable > band.threshold {
        (billable / band.threshold).ceil()
    } else {
        1.0
    };
    Ok(units * band.price)
}
