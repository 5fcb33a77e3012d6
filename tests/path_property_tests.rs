/// Property tests for the storage path search and the tiered evaluator
use proptest::prelude::*;
use twin_cost::{
    graph::CostGraph,
    path::cheapest_path,
    pricing::{evaluate, parse_pricing_json, Tier, TierSchedule},
    ArchitectureRecommender, Provider, RecommenderOptions, StorageNode, StorageTier,
    WorkloadInput,
};

/// Cost of every hot -> cool -> archive combination
fn brute_force(graph: &CostGraph) -> Vec<(Vec<StorageNode>, f64)> {
    let mut paths = Vec::new();
    for hot in StorageNode::in_tier(StorageTier::Hot) {
        for cool in StorageNode::in_tier(StorageTier::Cool) {
            for archive in StorageNode::in_tier(StorageTier::Archive) {
                let cost = graph.node_cost(hot)
                    + graph.edge_weight(hot, cool).unwrap()
                    + graph.node_cost(cool)
                    + graph.edge_weight(cool, archive).unwrap()
                    + graph.node_cost(archive);
                paths.push((vec![hot, cool, archive], cost));
            }
        }
    }
    paths
}

fn edge_key(from: StorageNode, to: StorageNode) -> usize {
    from.index() * StorageNode::COUNT + to.index()
}

proptest! {
    #[test]
    fn prop_selected_path_is_never_beaten(
        node_costs in prop::array::uniform6(0.0f64..1000.0),
        edge_costs in prop::collection::vec(0.0f64..100.0, StorageNode::COUNT * StorageNode::COUNT),
    ) {
        let graph = CostGraph::from_costs(node_costs, |from, to| edge_costs[edge_key(from, to)]).unwrap();
        let path = cheapest_path(
            &graph,
            &StorageNode::in_tier(StorageTier::Hot),
            &StorageNode::in_tier(StorageTier::Archive),
        )
        .unwrap();

        let all = brute_force(&graph);
        prop_assert_eq!(all.len(), 8);
        let best = all.iter().map(|(_, cost)| *cost).fold(f64::INFINITY, f64::min);
        prop_assert!(path.total_cost <= best + 1e-9);

        // the reported cost matches the reported nodes
        let own = all.iter().find(|(nodes, _)| *nodes == path.nodes).unwrap();
        prop_assert!((own.1 - path.total_cost).abs() < 1e-9);
    }

    #[test]
    fn prop_path_has_three_connected_nodes(
        node_costs in prop::array::uniform6(0.0f64..50.0),
        cross_provider in 0.0f64..20.0,
    ) {
        let graph = CostGraph::from_costs(node_costs, |from, to| {
            if from.provider == to.provider { 0.0 } else { cross_provider }
        })
        .unwrap();
        let path = cheapest_path(
            &graph,
            &StorageNode::in_tier(StorageTier::Hot),
            &StorageNode::in_tier(StorageTier::Archive),
        )
        .unwrap();

        prop_assert_eq!(path.nodes.len(), 3);
        prop_assert_eq!(path.nodes[0].tier, StorageTier::Hot);
        prop_assert_eq!(path.nodes[2].tier, StorageTier::Archive);
        for pair in path.nodes.windows(2) {
            prop_assert!(graph.edge_weight(pair[0], pair[1]).is_some());
        }
    }

    #[test]
    fn prop_tiered_cost_is_monotonic(
        free in 0.0f64..100.0,
        a in 0.0f64..1_000_000.0,
        b in 0.0f64..1_000_000.0,
    ) {
        let schedule = TierSchedule::new(
            free,
            vec![
                Tier::bounded(1_000.0, 0.09),
                Tier::bounded(50_000.0, 0.085),
                Tier::unbounded(0.05),
            ],
        );
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(evaluate(low, &schedule).unwrap() <= evaluate(high, &schedule).unwrap());
    }

    #[test]
    fn prop_layer_costs_are_non_negative(
        devices in 1.0f64..20_000.0,
        interval in 0.5f64..120.0,
        size in 0.1f64..64.0,
        hot in 0.0f64..6.0,
        extra_cool in 0.0f64..12.0,
        extra_archive in 0.0f64..60.0,
        entities in prop::option::of(0.0f64..500.0),
        editors in 0.0f64..50.0,
        viewers in 0.0f64..200.0,
        refreshes in 0.0f64..60.0,
        hours in 0.0f64..24.0,
    ) {
        let table = parse_pricing_json(include_str!("../pricing.json")).unwrap();
        let workload = WorkloadInput {
            devices,
            interval_minutes: interval,
            message_size_kb: size,
            hot_months: hot,
            cool_months: hot + extra_cool,
            archive_months: hot + extra_cool + extra_archive,
            entity_count: entities,
            editors,
            viewers,
            dashboard_refreshes_per_hour: refreshes,
            dashboard_active_hours_per_day: hours,
        };
        let recommendation = ArchitectureRecommender::new(&table, RecommenderOptions::default())
            .recommend(&workload)
            .unwrap();

        for comparison in &recommendation.layers {
            for result in &comparison.results {
                prop_assert!(result.total_monthly_cost() >= 0.0);
            }
        }
        for entry in recommendation.transfers.entries() {
            prop_assert!(entry.cost >= 0.0);
        }
        prop_assert!(Provider::ALL.contains(&recommendation.feeder));
    }
}
