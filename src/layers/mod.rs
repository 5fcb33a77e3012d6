//! Per-layer monthly cost models.
//!
//! Each layer exposes a `compute` function taking the provider variant, the
//! workload and the pricing table. Provider specifics live in one private
//! function per provider, selected by `match`.

pub mod acquisition;
pub mod processing;
pub mod storage;
pub mod twin_management;
pub mod visualization;

use crate::error::{CostError, Result};
use crate::provider::{Provider, StorageTier};
use serde::Serialize;
use std::fmt;

/// Pipeline layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Layer {
    Acquisition,
    Processing,
    HotStorage,
    CoolStorage,
    ArchiveStorage,
    TwinManagement,
    Visualization,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Acquisition,
        Layer::Processing,
        Layer::HotStorage,
        Layer::CoolStorage,
        Layer::ArchiveStorage,
        Layer::TwinManagement,
        Layer::Visualization,
    ];

    pub fn storage(tier: StorageTier) -> Layer {
        match tier {
            StorageTier::Hot => Layer::HotStorage,
            StorageTier::Cool => Layer::CoolStorage,
            StorageTier::Archive => Layer::ArchiveStorage,
        }
    }

    pub fn storage_tier(self) -> Option<StorageTier> {
        match self {
            Layer::HotStorage => Some(StorageTier::Hot),
            Layer::CoolStorage => Some(StorageTier::Cool),
            Layer::ArchiveStorage => Some(StorageTier::Archive),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Acquisition => "Data Acquisition",
            Self::Processing => "Data Processing",
            Self::HotStorage => "Hot Storage",
            Self::CoolStorage => "Cool Storage",
            Self::ArchiveStorage => "Archive Storage",
            Self::TwinManagement => "Twin Management",
            Self::Visualization => "Data Visualization",
        };
        write!(f, "{}", name)
    }
}

/// Monthly cost of one layer under one provider.
///
/// Built once per evaluation; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerCostResult {
    layer: Layer,
    provider: Provider,
    total_monthly_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_messages_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_size_in_gb: Option<f64>,
}

impl LayerCostResult {
    pub(crate) fn new(layer: Layer, provider: Provider, total_monthly_cost: f64) -> Result<Self> {
        if !total_monthly_cost.is_finite() || total_monthly_cost < 0.0 {
            return Err(CostError::configuration(format!(
                "{} cost for {} evaluated to {}; check the pricing table",
                layer, provider, total_monthly_cost
            )));
        }
        Ok(Self {
            layer,
            provider,
            total_monthly_cost,
            total_messages_per_month: None,
            data_size_in_gb: None,
        })
    }

    pub(crate) fn with_messages(mut self, messages: f64) -> Self {
        self.total_messages_per_month = Some(messages);
        self
    }

    pub(crate) fn with_data_size(mut self, data_size_in_gb: f64) -> Self {
        self.data_size_in_gb = Some(data_size_in_gb);
        self
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn total_monthly_cost(&self) -> f64 {
        self.total_monthly_cost
    }

    pub fn total_messages_per_month(&self) -> Option<f64> {
        self.total_messages_per_month
    }

    pub fn data_size_in_gb(&self) -> Option<f64> {
        self.data_size_in_gb
    }

    /// Data volume carried forward to the next layer, required for storage chaining
    pub(crate) fn require_data_size(&self) -> Result<f64> {
        self.data_size_in_gb.ok_or_else(|| {
            CostError::configuration(format!(
                "{} result for {} carries no data volume",
                self.layer, self.provider
            ))
        })
    }

    pub(crate) fn require_messages(&self) -> Result<f64> {
        self.total_messages_per_month.ok_or_else(|| {
            CostError::configuration(format!(
                "{} result for {} carries no message volume",
                self.layer, self.provider
            ))
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pricing::{parse_pricing_json, PricingTable};

    pub fn pricing() -> PricingTable {
        parse_pricing_json(include_str!("../../pricing.json")).unwrap()
    }

    pub fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }
}
