pub mod loader;
pub mod models;
pub mod tiered;

pub use loader::{calculate_hash, load_pricing_file, parse_pricing_json, validate_pricing, LoadedPricing};
pub use models::PricingTable;
pub use tiered::{evaluate, Tier, TierSchedule};
