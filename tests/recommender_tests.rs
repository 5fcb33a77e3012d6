/// Integration tests for the end-to-end recommendation against the shipped pricing document
use twin_cost::{
    error::CostError,
    layers::{twin_management::TwinQueryModel, Layer},
    pricing::{parse_pricing_json, PricingTable},
    ArchitectureRecommender, Provider, Recommendation, RecommenderOptions, StorageTier,
    WorkloadInput,
};

fn pricing() -> PricingTable {
    parse_pricing_json(include_str!("../pricing.json")).unwrap()
}

fn scenario_workload() -> WorkloadInput {
    WorkloadInput {
        devices: 100.0,
        interval_minutes: 5.0,
        message_size_kb: 1.0,
        hot_months: 1.0,
        cool_months: 3.0,
        archive_months: 12.0,
        entity_count: None,
        editors: 2.0,
        viewers: 5.0,
        dashboard_refreshes_per_hour: 4.0,
        dashboard_active_hours_per_day: 8.0,
    }
}

fn recommend(workload: &WorkloadInput) -> Result<Recommendation, CostError> {
    let table = pricing();
    ArchitectureRecommender::new(&table, RecommenderOptions::default()).recommend(workload)
}

#[test]
fn test_reference_scenario() {
    let recommendation = recommend(&scenario_workload()).unwrap();

    let acquisition = recommendation.layer(Layer::Acquisition).unwrap();
    for result in &acquisition.results {
        assert_eq!(result.total_messages_per_month(), Some(864_000.0));
    }

    let processing = recommendation.layer(Layer::Processing).unwrap();
    for result in &processing.results {
        assert_eq!(result.total_messages_per_month(), Some(876_000.0));
    }

    for comparison in &recommendation.layers {
        assert_eq!(comparison.results.len(), 2, "{} missing a provider", comparison.layer);
        for result in &comparison.results {
            assert!(
                result.total_monthly_cost() >= 0.0,
                "{} {} is negative",
                comparison.layer,
                result.provider()
            );
        }
    }

    // feeder, hot, cool, archive, twin management + visualization
    assert_eq!(recommendation.path.len(), 5);
    let labels = recommendation.path_labels();
    assert!(labels[0].ends_with("_Feeder"));
    assert!(labels[1].ends_with("_Hot"));
    assert!(labels[2].ends_with("_Cool"));
    assert!(labels[3].ends_with("_Archive"));
    assert_eq!(labels[4], "AWS_TwinManagement+Visualization");

    assert_eq!(recommendation.storage_path.nodes.len(), 3);
    assert!(recommendation.total_monthly_cost > 0.0);
}

#[test]
fn test_recommendation_is_idempotent() {
    let table = pricing();
    let recommender = ArchitectureRecommender::new(&table, RecommenderOptions::default());
    let workload = scenario_workload();

    let first = serde_json::to_string(&recommender.recommend(&workload).unwrap()).unwrap();
    let second = serde_json::to_string(&recommender.recommend(&workload).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_hot_longer_than_cool_is_rejected() {
    let mut workload = scenario_workload();
    workload.hot_months = 4.0;
    let err = recommend(&workload).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(_)));
    assert!(err.to_string().contains("cool storage duration"));
}

#[test]
fn test_equal_retentions_are_accepted() {
    let mut workload = scenario_workload();
    workload.hot_months = 6.0;
    workload.cool_months = 6.0;
    workload.archive_months = 6.0;
    assert!(recommend(&workload).is_ok());
}

#[test]
fn test_non_positive_acquisition_parameters_are_rejected() {
    for field in ["devices", "interval", "size"] {
        let mut workload = scenario_workload();
        match field {
            "devices" => workload.devices = 0.0,
            "interval" => workload.interval_minutes = 0.0,
            _ => workload.message_size_kb = -1.0,
        }
        assert!(
            matches!(recommend(&workload), Err(CostError::InvalidInput(_))),
            "{} not rejected",
            field
        );
    }
}

#[test]
fn test_overflowing_fleet_is_invalid_input() {
    let mut workload = scenario_workload();
    workload.devices = 1e306;
    let err = recommend(&workload).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(_)), "got {:?}", err);

    let mut workload = scenario_workload();
    workload.interval_minutes = 1e-305;
    assert!(matches!(recommend(&workload), Err(CostError::InvalidInput(_))));
}

#[test]
fn test_3d_model_selects_entity_graph_provider() {
    let mut workload = scenario_workload();
    workload.entity_count = Some(50.0);
    let recommendation = recommend(&workload).unwrap();

    assert_eq!(recommendation.twin_management, Provider::Aws);
    let twin = recommendation.layer(Layer::TwinManagement).unwrap();
    assert_eq!(twin.results.len(), 1);
    assert!(recommendation
        .path_labels()
        .iter()
        .any(|label| label.starts_with("AWS_TwinManagement")));
}

#[test]
fn test_query_models_differ_only_in_twin_layer() {
    let table = pricing();
    let workload = scenario_workload();
    let dashboard = ArchitectureRecommender::new(&table, RecommenderOptions::default())
        .recommend(&workload)
        .unwrap();
    let polling = ArchitectureRecommender::new(
        &table,
        RecommenderOptions {
            twin_query_model: TwinQueryModel::ContinuousPolling,
        },
    )
    .recommend(&workload)
    .unwrap();

    for layer in Layer::ALL {
        let a = dashboard.layer(layer).unwrap();
        let b = polling.layer(layer).unwrap();
        if layer == Layer::TwinManagement {
            assert_ne!(a, b);
        } else {
            assert_eq!(a, b);
        }
    }
    assert_eq!(dashboard.storage_path, polling.storage_path);
}

#[test]
fn test_large_fleet_still_produces_full_path() {
    let mut workload = scenario_workload();
    workload.devices = 50_000.0;
    workload.interval_minutes = 1.0;
    workload.message_size_kb = 8.0;
    let recommendation = recommend(&workload).unwrap();

    let tiers: Vec<StorageTier> = recommendation
        .storage_path
        .nodes
        .iter()
        .map(|node| node.tier)
        .collect();
    assert_eq!(tiers, StorageTier::ALL.to_vec());
    assert!(recommendation.path.len() == 5 || recommendation.path.len() == 6);
}

#[test]
fn test_json_output_shape() {
    let recommendation = recommend(&scenario_workload()).unwrap();
    let value = serde_json::to_value(&recommendation).unwrap();

    assert!(value["layers"].is_array());
    assert!(value["transfers"].is_array());
    assert_eq!(value["storagePath"]["nodes"].as_array().unwrap().len(), 3);
    assert!(value["totalMonthlyCost"].is_number());
    assert_eq!(value["path"][4], "AWS_TwinManagement+Visualization");
    assert_eq!(value["layers"][0]["layer"], "acquisition");
    assert!(value["layers"][0]["results"][0]["totalMessagesPerMonth"].is_number());
}
