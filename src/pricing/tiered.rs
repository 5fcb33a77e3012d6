use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

/// One band of a cumulative pricing schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Cumulative upper bound of the band, measured on the billable quantity.
    /// `None` marks the unbounded final band.
    #[serde(default)]
    pub limit: Option<f64>,
    /// Price per unit inside the band
    pub price: f64,
}

impl Tier {
    pub fn bounded(limit: f64, price: f64) -> Self {
        Self {
            limit: Some(limit),
            price,
        }
    }

    pub fn unbounded(price: f64) -> Self {
        Self { limit: None, price }
    }
}

/// Free allowance followed by ordered price bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSchedule {
    #[serde(default)]
    pub free_allowance: f64,
    pub tiers: Vec<Tier>,
}

impl TierSchedule {
    pub fn new(free_allowance: f64, tiers: Vec<Tier>) -> Self {
        Self {
            free_allowance,
            tiers,
        }
    }

    /// A single unbounded band billed after `free_allowance`
    pub fn flat(free_allowance: f64, price: f64) -> Self {
        Self::new(free_allowance, vec![Tier::unbounded(price)])
    }

    /// Check ordering and sign invariants of the schedule
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(CostError::configuration(format!("{}: tier list is empty", name)));
        }
        if !self.free_allowance.is_finite() || self.free_allowance < 0.0 {
            return Err(CostError::configuration(format!(
                "{}: free allowance must be a non-negative number",
                name
            )));
        }

        let mut previous: Option<f64> = None;
        let last = self.tiers.len() - 1;
        for (idx, tier) in self.tiers.iter().enumerate() {
            if !tier.price.is_finite() || tier.price < 0.0 {
                return Err(CostError::configuration(format!(
                    "{}: tier {} has a negative or non-finite price",
                    name,
                    idx + 1
                )));
            }
            match tier.limit {
                Some(limit) => {
                    if !limit.is_finite() || limit < 0.0 {
                        return Err(CostError::configuration(format!(
                            "{}: tier {} has a negative or non-finite limit",
                            name,
                            idx + 1
                        )));
                    }
                    if previous.is_some_and(|p| limit <= p) {
                        return Err(CostError::configuration(format!(
                            "{}: tier limits must be strictly ascending",
                            name
                        )));
                    }
                    previous = Some(limit);
                }
                None if idx != last => {
                    return Err(CostError::configuration(format!(
                        "{}: only the final tier may be unbounded",
                        name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Price `quantity` against a tiered schedule.
///
/// The free allowance is consumed first, then each band is filled up to its
/// limit at its price. Anything beyond the last bounded limit is billed at the
/// final band's price.
pub fn evaluate(quantity: f64, schedule: &TierSchedule) -> Result<f64> {
    if quantity.is_nan() || quantity < 0.0 {
        return Err(CostError::invalid_input(format!(
            "tiered quantity must be non-negative, got {}",
            quantity
        )));
    }
    let last = schedule
        .tiers
        .last()
        .ok_or_else(|| CostError::configuration("tier list is empty"))?;

    if quantity <= schedule.free_allowance {
        return Ok(0.0);
    }
    let billable = quantity - schedule.free_allowance;

    let mut cost = 0.0;
    let mut floor = 0.0;
    for tier in &schedule.tiers {
        let ceiling = tier.limit.unwrap_or(f64::INFINITY);
        if billable <= ceiling {
            return Ok(cost + (billable - floor) * tier.price);
        }
        cost += (ceiling - floor) * tier.price;
        floor = ceiling;
    }

    // spill past the last bounded band
    Ok(cost + (billable - floor) * last.price)
}
