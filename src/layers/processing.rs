use crate::error::Result;
use crate::layers::{Layer, LayerCostResult};
use crate::pricing::models::ServerlessPricing;
use crate::pricing::PricingTable;
use crate::provider::Provider;
use crate::workload::{kb_to_gb, WorkloadInput};
use tracing::debug;

/// Monthly cost of running one serverless function execution per message.
///
/// Both providers share the formula; only their pricing entries differ.
pub fn compute(
    provider: Provider,
    workload: &WorkloadInput,
    pricing: &PricingTable,
) -> Result<LayerCostResult> {
    let serverless = match provider {
        Provider::Aws => &pricing.aws.lambda,
        Provider::Azure => &pricing.azure.functions,
    };

    let executions = workload.monthly_executions();
    let cost = serverless_cost(executions, serverless);
    debug!(%provider, executions, cost, "processing cost");

    Ok(LayerCostResult::new(Layer::Processing, provider, cost)?
        .with_messages(executions)
        .with_data_size(kb_to_gb(executions, workload.message_size_kb)))
}

fn serverless_cost(executions: f64, pricing: &ServerlessPricing) -> f64 {
    let request_cost = (executions - pricing.free_requests).max(0.0) * pricing.request_price;

    let compute_seconds = executions * pricing.execution_duration_ms / 1000.0;
    let gb_seconds = compute_seconds * pricing.allocated_memory_mb / 1024.0;
    let duration_cost = (gb_seconds - pricing.free_compute_time).max(0.0) * pricing.duration_price;

    request_cost + duration_cost
}
