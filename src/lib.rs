pub mod config;
pub mod error;
pub mod graph;
pub mod layers;
pub mod path;
pub mod pricing;
pub mod provider;
pub mod recommender;
pub mod transfer;
pub mod workload;

pub use error::{CostError, Result};
pub use provider::{Provider, StorageNode, StorageTier};
pub use recommender::{ArchitectureRecommender, Recommendation, RecommenderOptions};
pub use workload::WorkloadInput;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `level` when set. Logs go to stderr so JSON output on
/// stdout stays machine-readable. Can only be called once per process.
pub fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
