//! Layered storage cost graph.
//!
//! Six nodes (three tiers x two providers) live in a fixed arena indexed by
//! [`StorageNode::index`]. Edges only run from one tier to the next, so the
//! graph is acyclic and every node of a lower tier is reachable from either
//! hot node.

use crate::error::{CostError, Result};
use crate::layers::LayerCostResult;
use crate::pricing::PricingTable;
use crate::provider::StorageNode;
use crate::transfer::{egress_cost, Endpoint};
use tracing::debug;

/// A storage node with its own monthly cost and the data volume it hands on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub node: StorageNode,
    pub cost: f64,
    pub data_size_in_gb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: StorageNode,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct CostGraph {
    nodes: Vec<GraphNode>,
    adjacency: Vec<Vec<Edge>>,
}

impl CostGraph {
    /// Build the graph from one storage result per node, pricing every edge
    /// with the transfer model
    pub fn build(results: &[LayerCostResult], pricing: &PricingTable) -> Result<Self> {
        let mut slots: Vec<Option<GraphNode>> = vec![None; StorageNode::COUNT];
        for result in results {
            let tier = result.layer().storage_tier().ok_or_else(|| {
                CostError::configuration(format!("{} is not a storage layer", result.layer()))
            })?;
            let node = StorageNode::new(tier, result.provider());
            slots[node.index()] = Some(GraphNode {
                node,
                cost: result.total_monthly_cost(),
                data_size_in_gb: result.require_data_size()?,
            });
        }

        let nodes = StorageNode::all()
            .map(|node| {
                slots[node.index()].ok_or_else(|| {
                    CostError::configuration(format!("no storage cost for {}", node))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::layered(nodes, |from, to| {
            egress_cost(
                Endpoint::Storage(from.node),
                Endpoint::Storage(to),
                from.data_size_in_gb,
                pricing,
            )
        })
    }

    /// Graph with explicit node costs (in arena order) and edge weights
    pub fn from_costs(
        node_costs: [f64; StorageNode::COUNT],
        edge_weight: impl Fn(StorageNode, StorageNode) -> f64,
    ) -> Result<Self> {
        let nodes = StorageNode::all()
            .map(|node| GraphNode {
                node,
                cost: node_costs[node.index()],
                data_size_in_gb: 0.0,
            })
            .collect();
        Self::layered(nodes, |from, to| Ok(edge_weight(from.node, to)))
    }

    fn layered(
        nodes: Vec<GraphNode>,
        mut weight: impl FnMut(&GraphNode, StorageNode) -> Result<f64>,
    ) -> Result<Self> {
        for node in &nodes {
            check_weight(node.cost, || format!("node {}", node.node))?;
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for from in &nodes {
            let Some(next_tier) = from.node.tier.next() else {
                continue;
            };
            for to in StorageNode::in_tier(next_tier) {
                let edge_weight = weight(from, to)?;
                check_weight(edge_weight, || format!("edge {} -> {}", from.node, to))?;
                debug!(from = %from.node, %to, weight = edge_weight, "storage edge");
                adjacency[from.node.index()].push(Edge {
                    to,
                    weight: edge_weight,
                });
            }
        }

        Ok(Self { nodes, adjacency })
    }

    pub fn node(&self, node: StorageNode) -> &GraphNode {
        &self.nodes[node.index()]
    }

    pub fn node_cost(&self, node: StorageNode) -> f64 {
        self.nodes[node.index()].cost
    }

    /// Outgoing edges, destinations in canonical provider order
    pub fn neighbors(&self, node: StorageNode) -> &[Edge] {
        &self.adjacency[node.index()]
    }

    pub fn edge_weight(&self, from: StorageNode, to: StorageNode) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.weight)
    }

    /// All edges as (source, edge) in arena order
    pub fn edges(&self) -> impl Iterator<Item = (StorageNode, &Edge)> + '_ {
        self.nodes
            .iter()
            .flat_map(move |n| self.neighbors(n.node).iter().map(move |e| (n.node, e)))
    }
}

fn check_weight(value: f64, what: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CostError::configuration(format!(
            "{} has invalid cost {}",
            what(),
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Provider, StorageTier};

    #[test]
    fn test_edges_only_join_adjacent_tiers() {
        let graph = CostGraph::from_costs([1.0; StorageNode::COUNT], |_, _| 0.5).unwrap();
        assert_eq!(graph.edges().count(), 8);
        for (from, edge) in graph.edges() {
            assert_eq!(from.tier.next(), Some(edge.to.tier));
        }

        let archive = StorageNode::new(StorageTier::Archive, Provider::Aws);
        assert!(graph.neighbors(archive).is_empty());
    }

    #[test]
    fn test_edge_lookup() {
        let graph = CostGraph::from_costs([0.0; StorageNode::COUNT], |from, to| {
            (from.index() * 10 + to.index()) as f64
        })
        .unwrap();
        let hot = StorageNode::new(StorageTier::Hot, Provider::Azure);
        let cool = StorageNode::new(StorageTier::Cool, Provider::Aws);
        let archive = StorageNode::new(StorageTier::Archive, Provider::Aws);
        assert_eq!(graph.edge_weight(hot, cool), Some(12.0));
        assert_eq!(graph.edge_weight(hot, archive), None);
    }

    #[test]
    fn test_negative_weights_are_rejected() {
        let mut costs = [1.0; StorageNode::COUNT];
        costs[3] = -1.0;
        assert!(CostGraph::from_costs(costs, |_, _| 0.0).is_err());
        assert!(CostGraph::from_costs([1.0; StorageNode::COUNT], |_, _| f64::NAN).is_err());
    }

    #[test]
    fn test_build_requires_every_node() {
        let table = crate::layers::test_support::pricing();
        assert!(matches!(
            CostGraph::build(&[], &table),
            Err(CostError::Configuration(_))
        ));
    }
}
