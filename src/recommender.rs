//! End-to-end architecture recommendation.
//!
//! Every layer is evaluated for every provider, the storage tiers go through
//! the cheapest-path search, and the remaining layers are picked greedily.

use crate::error::{CostError, Result};
use crate::graph::CostGraph;
use crate::layers::twin_management::TwinQueryModel;
use crate::layers::{
    acquisition, processing, storage, twin_management, visualization, Layer, LayerCostResult,
};
use crate::path::{cheapest_path, PathResult};
use crate::pricing::PricingTable;
use crate::provider::{Provider, StorageNode, StorageTier};
use crate::transfer::{Endpoint, TransferCostMatrix};
use crate::workload::WorkloadInput;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommenderOptions {
    pub twin_query_model: TwinQueryModel,
}

/// Every provider's result for one layer, in canonical provider order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerComparison {
    pub layer: Layer,
    pub results: Vec<LayerCostResult>,
}

impl LayerComparison {
    pub fn result(&self, provider: Provider) -> Option<&LayerCostResult> {
        self.results.iter().find(|r| r.provider() == provider)
    }
}

/// Role a segment plays in the recommended architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Feeder,
    Storage(StorageTier),
    TwinManagement,
    Visualization,
    TwinAndVisualization,
}

/// One labelled step of the recommended architecture, e.g. `AWS_Feeder`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub provider: Provider,
    pub kind: SegmentKind,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SegmentKind::Feeder => write!(f, "{}_Feeder", self.provider),
            SegmentKind::Storage(tier) => write!(f, "{}_{}", self.provider, tier),
            SegmentKind::TwinManagement => write!(f, "{}_TwinManagement", self.provider),
            SegmentKind::Visualization => write!(f, "{}_Visualization", self.provider),
            SegmentKind::TwinAndVisualization => {
                write!(f, "{}_TwinManagement+Visualization", self.provider)
            }
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub layers: Vec<LayerComparison>,
    pub transfers: TransferCostMatrix,
    pub storage_path: PathResult,
    pub feeder: Provider,
    pub twin_management: Provider,
    pub visualization: Provider,
    pub path: Vec<PathSegment>,
    pub total_monthly_cost: f64,
}

impl Recommendation {
    pub fn layer(&self, layer: Layer) -> Option<&LayerComparison> {
        self.layers.iter().find(|c| c.layer == layer)
    }

    pub fn path_labels(&self) -> Vec<String> {
        self.path.iter().map(|segment| segment.to_string()).collect()
    }
}

/// Produces recommendations against one immutable pricing table
pub struct ArchitectureRecommender<'a> {
    pricing: &'a PricingTable,
    options: RecommenderOptions,
}

impl<'a> ArchitectureRecommender<'a> {
    pub fn new(pricing: &'a PricingTable, options: RecommenderOptions) -> Self {
        Self { pricing, options }
    }

    pub fn recommend(&self, workload: &WorkloadInput) -> Result<Recommendation> {
        workload.validate()?;
        let pricing = self.pricing;

        let acquisition = per_provider(|p| acquisition::compute(p, workload, pricing))?;
        let processing = per_provider(|p| processing::compute(p, workload, pricing))?;

        // each provider's tiers chain from its own processing result
        let mut hot = Vec::with_capacity(Provider::ALL.len());
        let mut cool = Vec::with_capacity(Provider::ALL.len());
        let mut archive = Vec::with_capacity(Provider::ALL.len());
        for (i, provider) in Provider::ALL.into_iter().enumerate() {
            let h = storage::compute(
                StorageNode::new(StorageTier::Hot, provider),
                &processing[i],
                workload,
                pricing,
            )?;
            let c = storage::compute(StorageNode::new(StorageTier::Cool, provider), &h, workload, pricing)?;
            let a = storage::compute(
                StorageNode::new(StorageTier::Archive, provider),
                &c,
                workload,
                pricing,
            )?;
            hot.push(h);
            cool.push(c);
            archive.push(a);
        }

        let storage_results: Vec<LayerCostResult> =
            hot.iter().chain(&cool).chain(&archive).cloned().collect();
        let graph = CostGraph::build(&storage_results, pricing)?;
        let storage_path = cheapest_path(
            &graph,
            &StorageNode::in_tier(StorageTier::Hot),
            &StorageNode::in_tier(StorageTier::Archive),
        )?;
        let first_storage = storage_path
            .start()
            .ok_or_else(|| CostError::GraphUnreachable("storage path is empty".to_string()))?;

        let mut transfers = TransferCostMatrix::new();
        for provider in Provider::ALL {
            transfers.record(
                Endpoint::Acquisition(provider),
                Endpoint::Processing(provider),
                0.0,
                0.0,
            );
        }
        for (i, provider) in Provider::ALL.into_iter().enumerate() {
            let volume = processing[i].require_data_size()?;
            for hot_node in StorageNode::in_tier(StorageTier::Hot) {
                transfers.insert(
                    Endpoint::Processing(provider),
                    Endpoint::Storage(hot_node),
                    volume,
                    pricing,
                )?;
            }
        }
        for (from, edge) in graph.edges() {
            transfers.record(
                Endpoint::Storage(from),
                Endpoint::Storage(edge.to),
                graph.node(from).data_size_in_gb,
                edge.weight,
            );
        }

        let mut feeder_costs = [(Provider::Aws, 0.0), (Provider::Azure, 0.0)];
        for (i, provider) in Provider::ALL.into_iter().enumerate() {
            let edge = feeder_edge(&transfers, provider, first_storage)?;
            let pre_storage = acquisition[i].total_monthly_cost() + processing[i].total_monthly_cost();
            feeder_costs[i] = (provider, pre_storage + edge);
        }
        let feeder = Provider::cheaper_of(feeder_costs);
        debug!(?feeder_costs, %feeder, "feeder selection");

        let twin_providers: Vec<Provider> = if workload.needs_3d_model() {
            Provider::ALL.into_iter().filter(|p| p.supports_3d_scenes()).collect()
        } else {
            Provider::ALL.to_vec()
        };
        let twin = twin_providers
            .iter()
            .map(|&p| twin_management::compute(p, workload, pricing, self.options.twin_query_model))
            .collect::<Result<Vec<_>>>()?;
        let twin_choice = cheapest_result(&twin)?;

        let viz = per_provider(|p| visualization::compute(p, workload, pricing))?;
        let viz_choice = cheapest_result(&viz)?;

        for provider in Provider::ALL {
            transfers.record(
                Endpoint::TwinManagement(provider),
                Endpoint::Visualization(provider),
                0.0,
                0.0,
            );
        }

        let mut path = vec![PathSegment {
            provider: feeder,
            kind: SegmentKind::Feeder,
        }];
        path.extend(storage_path.nodes.iter().map(|node| PathSegment {
            provider: node.provider,
            kind: SegmentKind::Storage(node.tier),
        }));
        if twin_choice.provider() == viz_choice.provider() {
            path.push(PathSegment {
                provider: twin_choice.provider(),
                kind: SegmentKind::TwinAndVisualization,
            });
        } else {
            path.push(PathSegment {
                provider: twin_choice.provider(),
                kind: SegmentKind::TwinManagement,
            });
            path.push(PathSegment {
                provider: viz_choice.provider(),
                kind: SegmentKind::Visualization,
            });
        }

        let total_monthly_cost = feeder_costs[feeder.index()].1
            + storage_path.total_cost
            + twin_choice.total_monthly_cost()
            + viz_choice.total_monthly_cost();

        let recommendation = Recommendation {
            layers: vec![
                LayerComparison {
                    layer: Layer::Acquisition,
                    results: acquisition,
                },
                LayerComparison {
                    layer: Layer::Processing,
                    results: processing,
                },
                LayerComparison {
                    layer: Layer::HotStorage,
                    results: hot,
                },
                LayerComparison {
                    layer: Layer::CoolStorage,
                    results: cool,
                },
                LayerComparison {
                    layer: Layer::ArchiveStorage,
                    results: archive,
                },
                LayerComparison {
                    layer: Layer::TwinManagement,
                    results: twin,
                },
                LayerComparison {
                    layer: Layer::Visualization,
                    results: viz,
                },
            ],
            transfers,
            storage_path,
            feeder,
            twin_management: twin_choice.provider(),
            visualization: viz_choice.provider(),
            path,
            total_monthly_cost,
        };

        info!(
            path = ?recommendation.path_labels(),
            total_monthly_cost,
            "architecture recommended"
        );
        Ok(recommendation)
    }
}

fn per_provider(
    compute: impl FnMut(Provider) -> Result<LayerCostResult>,
) -> Result<Vec<LayerCostResult>> {
    Provider::ALL.into_iter().map(compute).collect()
}

/// Priced move from a provider's processing layer into the first storage node
fn feeder_edge(
    transfers: &TransferCostMatrix,
    provider: Provider,
    first_storage: StorageNode,
) -> Result<f64> {
    transfers
        .get(Endpoint::Processing(provider), Endpoint::Storage(first_storage))
        .ok_or_else(|| {
            CostError::configuration(format!(
                "no transfer priced from {} to {}",
                Endpoint::Processing(provider),
                first_storage
            ))
        })
}

/// Cheapest result; results are in canonical order so the first wins a tie
fn cheapest_result(results: &[LayerCostResult]) -> Result<LayerCostResult> {
    results
        .iter()
        .fold(None, |best: Option<&LayerCostResult>, r| match best {
            Some(b) if b.total_monthly_cost() <= r.total_monthly_cost() => Some(b),
            _ => Some(r),
        })
        .cloned()
        .ok_or_else(|| CostError::configuration("no provider evaluated for layer"))
}
