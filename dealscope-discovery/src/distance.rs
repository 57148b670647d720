use dealscope_offer::Location;

/// External source of user-to-offer distances, in kilometres.
///
/// The core never computes geodesic distance itself and never blocks for
/// it; callers hand in a snapshot alongside the catalog. Distance may be
/// unknown for any offer, and the discovery engine never excludes an offer
/// for lacking one.
pub trait DistanceProvider: Send + Sync {
    fn distance_to(&self, location: &Location) -> Option<f64>;
}

/// Provider for when location services are off or unavailable
pub struct NoDistances;

impl DistanceProvider for NoDistances {
    fn distance_to(&self, _location: &Location) -> Option<f64> {
        None
    }
}

impl<F> DistanceProvider for F
where
    F: Fn(&Location) -> Option<f64> + Send + Sync,
{
    fn distance_to(&self, location: &Location) -> Option<f64> {
        self(location)
    }
}
