use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic position of the business running an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Input for creating a new offer; id and redemption count are assigned by the core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub business_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Location,
    pub max_redemptions: u32,
    pub range_in_km: f64,
}

/// A time-boxed, capacity-limited promotional offer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub business_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Location,
    pub max_redemptions: u32,
    pub current_redemptions: u32,
    /// Visibility radius intended by the business. Advisory only; discovery
    /// filters on the customer's distance bound instead.
    pub range_in_km: f64,
}

impl Offer {
    /// Create a validated offer with a fresh id and zero redemptions
    pub fn new(input: NewOffer) -> Result<Self, OfferError> {
        let offer = Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            business_name: input.business_name,
            start_date: input.start_date,
            end_date: input.end_date,
            location: input.location,
            max_redemptions: input.max_redemptions,
            current_redemptions: 0,
            range_in_km: input.range_in_km,
        };
        offer.validate()?;
        Ok(offer)
    }

    /// Re-check construction invariants on an already-materialized offer
    /// (e.g. one deserialized from an external store). Invalid values are
    /// rejected, never clamped.
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.start_date >= self.end_date {
            return Err(OfferError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.max_redemptions == 0 {
            return Err(OfferError::InvalidCapacity);
        }
        if self.current_redemptions > self.max_redemptions {
            return Err(OfferError::RedemptionsOverCapacity {
                current: self.current_redemptions,
                max: self.max_redemptions,
            });
        }
        if !self.range_in_km.is_finite() || self.range_in_km < 0.0 {
            return Err(OfferError::InvalidRange(self.range_in_km));
        }
        Ok(())
    }

    /// Redemptions still available before the offer sells out
    pub fn remaining_capacity(&self) -> u32 {
        self.max_redemptions.saturating_sub(self.current_redemptions)
    }

    /// Fraction of capacity already claimed
    pub fn redemption_ratio(&self) -> f64 {
        self.current_redemptions as f64 / self.max_redemptions as f64
    }
}

/// Construction-time invariant violations
#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("start date {start} is not before end date {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("max redemptions must be positive")]
    InvalidCapacity,

    #[error("redemption count {current} exceeds capacity {max}")]
    RedemptionsOverCapacity { current: u32, max: u32 },

    #[error("visibility range must be a non-negative number of km: {0}")]
    InvalidRange(f64),
}
