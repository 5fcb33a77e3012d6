use crate::error::Result;
use crate::layers::{Layer, LayerCostResult};
use crate::pricing::PricingTable;
use crate::provider::Provider;
use crate::workload::{WorkloadInput, HOURS_PER_MONTH};

/// Monthly cost of the managed dashboard service
pub fn compute(
    provider: Provider,
    workload: &WorkloadInput,
    pricing: &PricingTable,
) -> Result<LayerCostResult> {
    let cost = match provider {
        // flat per seat
        Provider::Aws => {
            let grafana = &pricing.aws.managed_grafana;
            workload.editors * grafana.editor_price + workload.viewers * grafana.viewer_price
        }
        // per user plus an always-on workspace
        Provider::Azure => {
            let grafana = &pricing.azure.managed_grafana;
            (workload.editors + workload.viewers) * grafana.user_price
                + grafana.hourly_price * HOURS_PER_MONTH
        }
    };

    LayerCostResult::new(Layer::Visualization, provider, cost)
}
