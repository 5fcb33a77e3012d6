//! Closed enumerations for cloud providers and storage tiers.
//!
//! Every per-provider formula in the crate dispatches on [`Provider`] with a
//! `match`, so adding a provider means extending this enum and supplying one
//! function per layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud provider. Declaration order is the canonical order used for every tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
}

impl Provider {
    /// All providers in canonical order
    pub const ALL: [Provider; 2] = [Provider::Aws, Provider::Azure];

    pub fn index(self) -> usize {
        match self {
            Self::Aws => 0,
            Self::Azure => 1,
        }
    }

    /// Whether the provider's twin service can host 3D scene entities
    pub fn supports_3d_scenes(self) -> bool {
        matches!(self, Self::Aws)
    }

    /// Pick the cheaper of two providers, preferring canonical order on equal cost
    pub fn cheaper_of(costs: [(Provider, f64); 2]) -> Provider {
        let [(first, first_cost), (second, second_cost)] = costs;
        let ((a, a_cost), (b, b_cost)) = if first <= second {
            ((first, first_cost), (second, second_cost))
        } else {
            ((second, second_cost), (first, first_cost))
        };
        if b_cost < a_cost {
            b
        } else {
            a
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws => write!(f, "AWS"),
            Self::Azure => write!(f, "Azure"),
        }
    }
}

/// Storage temperature class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    Hot,
    Cool,
    Archive,
}

impl StorageTier {
    pub const ALL: [StorageTier; 3] = [StorageTier::Hot, StorageTier::Cool, StorageTier::Archive];

    pub fn index(self) -> usize {
        match self {
            Self::Hot => 0,
            Self::Cool => 1,
            Self::Archive => 2,
        }
    }

    /// The tier data moves into after this one
    pub fn next(self) -> Option<StorageTier> {
        match self {
            Self::Hot => Some(Self::Cool),
            Self::Cool => Some(Self::Archive),
            Self::Archive => None,
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hot => write!(f, "Hot"),
            Self::Cool => write!(f, "Cool"),
            Self::Archive => write!(f, "Archive"),
        }
    }
}

/// One (tier, provider) storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageNode {
    pub tier: StorageTier,
    pub provider: Provider,
}

impl StorageNode {
    pub const COUNT: usize = StorageTier::ALL.len() * Provider::ALL.len();

    pub fn new(tier: StorageTier, provider: Provider) -> Self {
        Self { tier, provider }
    }

    /// Dense arena index: tiers are laid out in order, providers in canonical order within a tier
    pub fn index(self) -> usize {
        self.tier.index() * Provider::ALL.len() + self.provider.index()
    }

    /// All nodes ordered by arena index
    pub fn all() -> impl Iterator<Item = StorageNode> {
        StorageTier::ALL
            .into_iter()
            .flat_map(|tier| Provider::ALL.into_iter().map(move |p| StorageNode::new(tier, p)))
    }

    pub fn in_tier(tier: StorageTier) -> [StorageNode; 2] {
        Provider::ALL.map(|p| StorageNode::new(tier, p))
    }
}

impl fmt::Display for StorageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.provider, self.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_indices_are_dense_and_ordered() {
        let indices: Vec<usize> = StorageNode::all().map(|n| n.index()).collect();
        assert_eq!(indices, (0..StorageNode::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_node_label() {
        let node = StorageNode::new(StorageTier::Cool, Provider::Azure);
        assert_eq!(node.to_string(), "Azure_Cool");
    }

    #[test]
    fn test_cheaper_of_prefers_canonical_order_on_tie() {
        assert_eq!(
            Provider::cheaper_of([(Provider::Azure, 1.0), (Provider::Aws, 1.0)]),
            Provider::Aws
        );
        assert_eq!(
            Provider::cheaper_of([(Provider::Aws, 2.0), (Provider::Azure, 1.0)]),
            Provider::Azure
        );
    }

    #[test]
    fn test_tier_progression() {
        assert_eq!(StorageTier::Hot.next(), Some(StorageTier::Cool));
        assert_eq!(StorageTier::Archive.next(), None);
    }
}
