use std::cmp::Ordering;

use dealscope_offer::Offer;

use crate::distance::DistanceProvider;
use crate::query::{DiscoveryQuery, QueryError, SortMode};

/// Filter and order a catalog snapshot for display.
///
/// Pure over its inputs: the same snapshot, query and distances always
/// produce the same sequence, and nothing is mutated.
pub fn discover(
    offers: &[Offer],
    query: &DiscoveryQuery,
    distances: &dyn DistanceProvider,
) -> Result<Vec<Offer>, QueryError> {
    query.validate()?;

    let needle = query.search_text.to_lowercase();

    let mut results: Vec<Offer> = offers
        .iter()
        .filter(|offer| matches_text(offer, &needle))
        .filter(|offer| within_distance(offer, query.max_distance_km, distances))
        .cloned()
        .collect();

    // Stable sort: equal keys keep catalog order, ids break exact ties
    results.sort_by(|a, b| compare(a, b, query.sort_mode));

    Ok(results)
}

fn matches_text(offer: &Offer, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    offer.title.to_lowercase().contains(needle)
        || offer.business_name.to_lowercase().contains(needle)
}

fn within_distance(
    offer: &Offer,
    max_distance_km: Option<f64>,
    distances: &dyn DistanceProvider,
) -> bool {
    let Some(max_km) = max_distance_km else {
        return true;
    };
    // Unknown distance never hides an otherwise-matching offer
    match distances.distance_to(&offer.location) {
        Some(km) => km <= max_km,
        None => true,
    }
}

fn compare(a: &Offer, b: &Offer, mode: SortMode) -> Ordering {
    let by_key = match mode {
        SortMode::Newest => b.start_date.cmp(&a.start_date),
        SortMode::Oldest => a.start_date.cmp(&b.start_date),
        SortMode::EndingSoon => a.end_date.cmp(&b.end_date),
        SortMode::MostRedemptions => b.current_redemptions.cmp(&a.current_redemptions),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}
