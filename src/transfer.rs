//! Data transfer fees between pipeline endpoints.
//!
//! Cross-provider moves pay the source provider's tiered internet egress.
//! Same-provider moves are free unless the destination service charges for
//! ingesting from a specific source service.

use crate::error::{CostError, Result};
use crate::pricing::{tiered, PricingTable};
use crate::provider::{Provider, StorageNode, StorageTier};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// A place data leaves from or arrives at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Acquisition(Provider),
    Processing(Provider),
    Storage(StorageNode),
    TwinManagement(Provider),
    Visualization(Provider),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquisition(p) => write!(f, "{}_Acquisition", p),
            Self::Processing(p) => write!(f, "{}_Processing", p),
            Self::Storage(node) => write!(f, "{}", node),
            Self::TwinManagement(p) => write!(f, "{}_TwinManagement", p),
            Self::Visualization(p) => write!(f, "{}_Visualization", p),
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Public-internet egress out of `provider`, billed through its tier table
pub fn internet_egress(provider: Provider, data_size_in_gb: f64, pricing: &PricingTable) -> Result<f64> {
    let schedule = match provider {
        Provider::Aws => &pricing.aws.transfer,
        Provider::Azure => &pricing.azure.transfer,
    };
    tiered::evaluate(data_size_in_gb, schedule)
}

/// Monthly fee for moving `data_size_in_gb` from `source` to `dest`.
///
/// Only pipeline-adjacent pairs are priced; anything else is an input error.
pub fn egress_cost(
    source: Endpoint,
    dest: Endpoint,
    data_size_in_gb: f64,
    pricing: &PricingTable,
) -> Result<f64> {
    if !data_size_in_gb.is_finite() || data_size_in_gb < 0.0 {
        return Err(CostError::invalid_input(format!(
            "transfer volume from {} to {} must be a non-negative number, got {}",
            source, dest, data_size_in_gb
        )));
    }

    let cost = match (source, dest) {
        (Endpoint::Acquisition(from), Endpoint::Processing(to))
        | (Endpoint::TwinManagement(from), Endpoint::Visualization(to))
            if from == to =>
        {
            0.0
        }
        (Endpoint::Processing(from), Endpoint::Storage(to)) if to.tier == StorageTier::Hot => {
            cross_provider(from, to.provider, data_size_in_gb, pricing)?
        }
        (Endpoint::Storage(from), Endpoint::Storage(to)) => {
            storage_move(from, to, data_size_in_gb, pricing)?
        }
        _ => {
            return Err(CostError::invalid_input(format!(
                "no transfer is priced from {} to {}",
                source, dest
            )))
        }
    };
    debug!(%source, %dest, data_size_in_gb, cost, "transfer cost");
    Ok(cost)
}

fn cross_provider(from: Provider, to: Provider, data_size_in_gb: f64, pricing: &PricingTable) -> Result<f64> {
    if from == to {
        Ok(0.0)
    } else {
        internet_egress(from, data_size_in_gb, pricing)
    }
}

fn storage_move(from: StorageNode, to: StorageNode, data_size_in_gb: f64, pricing: &PricingTable) -> Result<f64> {
    if from.tier.next() != Some(to.tier) {
        return Err(CostError::invalid_input(format!(
            "storage moves go one tier down, not {} to {}",
            from, to
        )));
    }

    match (from.tier, from.provider, to.provider) {
        (StorageTier::Hot, Provider::Aws, Provider::Aws) => {
            Ok(data_size_in_gb * pricing.aws.s3_infrequent_access.transfer_cost_from_dynamo_db)
        }
        (StorageTier::Hot, Provider::Azure, Provider::Aws) => {
            let ingest = data_size_in_gb * pricing.aws.s3_infrequent_access.transfer_cost_from_cosmos_db;
            Ok(ingest + internet_egress(Provider::Azure, data_size_in_gb, pricing)?)
        }
        (StorageTier::Hot, Provider::Azure, Provider::Azure) => {
            let blob = &pricing.azure.blob_storage_cool;
            let billable = (data_size_in_gb - blob.free_transfer_from_cosmos_db_gb).max(0.0);
            Ok(billable * blob.transfer_cost_from_cosmos_db)
        }
        _ => cross_provider(from.provider, to.provider, data_size_in_gb, pricing),
    }
}

/// One priced move between two endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCost {
    pub from: Endpoint,
    pub to: Endpoint,
    pub data_size_in_gb: f64,
    pub cost: f64,
}

/// Every priced move of one evaluation, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransferCostMatrix {
    entries: Vec<TransferCost>,
}

impl TransferCostMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price the move and record it
    pub fn insert(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        data_size_in_gb: f64,
        pricing: &PricingTable,
    ) -> Result<f64> {
        let cost = egress_cost(from, to, data_size_in_gb, pricing)?;
        self.record(from, to, data_size_in_gb, cost);
        Ok(cost)
    }

    /// Record an already priced move, replacing an earlier entry for the same pair
    pub fn record(&mut self, from: Endpoint, to: Endpoint, data_size_in_gb: f64, cost: f64) {
        let entry = TransferCost {
            from,
            to,
            data_size_in_gb,
            cost,
        };
        match self.entries.iter_mut().find(|e| e.from == from && e.to == to) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, from: Endpoint, to: Endpoint) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.from == from && e.to == to)
            .map(|e| e.cost)
    }

    pub fn entries(&self) -> &[TransferCost] {
        &self.entries
    }
}
