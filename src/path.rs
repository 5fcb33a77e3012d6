//! Cheapest hot-to-archive route through the storage cost graph.

use crate::error::{CostError, Result};
use crate::graph::CostGraph;
use crate::provider::StorageNode;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// Ordered storage route with its accumulated node and edge cost
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub nodes: Vec<StorageNode>,
    pub total_cost: f64,
}

impl PathResult {
    pub fn labels(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.to_string()).collect()
    }

    pub fn start(&self) -> Option<StorageNode> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<StorageNode> {
        self.nodes.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    node: StorageNode,
    cost: f64,
}

impl Eq for State {}

impl Ord for State {
    // Min-heap on cost; equal costs pop the lower arena index first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Search from every start node at once (each seeded with its own node cost)
/// and return the cheapest route to any end node.
///
/// Equal costs resolve toward the lower arena index, i.e. the canonical
/// provider order, both for the end node and for each predecessor.
pub fn cheapest_path(graph: &CostGraph, starts: &[StorageNode], ends: &[StorageNode]) -> Result<PathResult> {
    let mut dist = [f64::INFINITY; StorageNode::COUNT];
    let mut parent: [Option<StorageNode>; StorageNode::COUNT] = [None; StorageNode::COUNT];
    let mut heap = BinaryHeap::new();

    for &start in starts {
        let cost = graph.node_cost(start);
        if cost < dist[start.index()] {
            dist[start.index()] = cost;
            heap.push(State { node: start, cost });
        }
    }

    while let Some(State { node, cost }) = heap.pop() {
        // Skip stale entries
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.neighbors(node) {
            let next = edge.to;
            let candidate = cost + edge.weight + graph.node_cost(next);
            let current = dist[next.index()];

            if candidate < current {
                dist[next.index()] = candidate;
                parent[next.index()] = Some(node);
                heap.push(State {
                    node: next,
                    cost: candidate,
                });
            } else if candidate == current
                && parent[next.index()].is_some_and(|p| node.index() < p.index())
            {
                parent[next.index()] = Some(node);
            }
        }
    }

    let mut sorted_ends = ends.to_vec();
    sorted_ends.sort_by_key(|node| node.index());
    let end = sorted_ends
        .into_iter()
        .filter(|node| dist[node.index()].is_finite())
        .fold(None, |best: Option<StorageNode>, node| match best {
            Some(b) if dist[b.index()] <= dist[node.index()] => Some(b),
            _ => Some(node),
        })
        .ok_or_else(|| {
            CostError::GraphUnreachable(format!(
                "none of {} end nodes is reachable from {} start nodes",
                ends.len(),
                starts.len()
            ))
        })?;

    let mut nodes = vec![end];
    let mut current = end;
    while let Some(prev) = parent[current.index()] {
        if nodes.len() > StorageNode::COUNT {
            return Err(CostError::GraphUnreachable(format!(
                "predecessor chain from {} does not terminate",
                end
            )));
        }
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();

    let path = PathResult {
        nodes,
        total_cost: dist[end.index()],
    };
    debug!(path = ?path.labels(), total_cost = path.total_cost, "cheapest storage path");
    Ok(path)
}
