use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Offer;

/// Hours before the end date at which an offer counts as ending soon
pub const ENDING_SOON_WINDOW_HOURS: i64 = 24;

/// Redemption ratio at which an offer counts as near capacity
pub const NEAR_CAPACITY_RATIO: f64 = 0.70;

/// Display status derived from time and redemption state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferDisplayStatus {
    Expired,
    FullyRedeemed,
    Scheduled,
    EndingSoon,
    NearCapacity,
    Active,
}

/// Derive the display status of an offer at a caller-supplied instant.
///
/// Pure and total; the wall clock is never consulted. The checks run in
/// strict priority order and the first match wins, so a sold-out offer
/// reports `FullyRedeemed` even when it is also about to end.
pub fn compute_status(offer: &Offer, now: DateTime<Utc>) -> OfferDisplayStatus {
    if now > offer.end_date {
        return OfferDisplayStatus::Expired;
    }
    if offer.current_redemptions >= offer.max_redemptions {
        return OfferDisplayStatus::FullyRedeemed;
    }
    if now < offer.start_date {
        return OfferDisplayStatus::Scheduled;
    }
    if offer.end_date - now < Duration::hours(ENDING_SOON_WINDOW_HOURS) {
        return OfferDisplayStatus::EndingSoon;
    }
    if offer.redemption_ratio() >= NEAR_CAPACITY_RATIO {
        return OfferDisplayStatus::NearCapacity;
    }
    OfferDisplayStatus::Active
}
