//! Command implementations for the CLI
//!
//! - estimate: run the recommender for one workload
//! - pricing: validate and summarize the pricing document
//! - config: configuration display and validation

pub mod config;
pub mod estimate;
pub mod pricing;
