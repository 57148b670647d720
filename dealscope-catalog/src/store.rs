use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use dealscope_offer::{Offer, OfferError};

/// Read access to a catalog of offers.
///
/// Returned offers are point-in-time snapshots; a snapshot's redemption
/// count never exceeds its capacity.
#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>, StoreError>;

    async fn list_offers(&self) -> Result<Vec<Offer>, StoreError>;
}

/// Catalog access errors. The in-memory catalog is infallible; the variant
/// exists so database-backed implementations fit behind the same trait.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("offer already in catalog: {0}")]
    DuplicateOffer(Uuid),

    #[error(transparent)]
    InvalidOffer(#[from] OfferError),
}

/// Stored offer: the immutable definition plus the live redemption counter.
/// The counter is written only by the redemption ledger.
pub(crate) struct OfferRecord {
    pub(crate) offer: Offer,
    pub(crate) redeemed: AtomicU32,
}

impl OfferRecord {
    fn snapshot(&self) -> Offer {
        let mut offer = self.offer.clone();
        offer.current_redemptions = self.redeemed.load(Ordering::Acquire);
        offer
    }
}

struct CatalogInner {
    records: HashMap<Uuid, Arc<OfferRecord>>,
    // Insertion order, so snapshots list offers in catalog order
    order: Vec<Uuid>,
}

/// In-memory offer catalog.
///
/// The map lock guards membership only; redemption counts are per-offer
/// atomics, so claims against different offers never block each other.
pub struct InMemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CatalogInner {
                records: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogInner> {
        // Counter invariants live in the atomics, so a poisoned membership
        // lock is still safe to recover
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Add an offer to the catalog. The stored counter starts from the
    /// offer's current count so pre-existing campaigns can be loaded.
    pub fn insert_offer(&self, offer: Offer) -> Result<(), CatalogError> {
        offer.validate()?;
        let mut inner = self.write();
        if inner.records.contains_key(&offer.id) {
            return Err(CatalogError::DuplicateOffer(offer.id));
        }
        let id = offer.id;
        let redeemed = AtomicU32::new(offer.current_redemptions);
        inner
            .records
            .insert(id, Arc::new(OfferRecord { offer, redeemed }));
        inner.order.push(id);
        Ok(())
    }

    /// Remove an offer; hook for the external archival flow. Returns whether
    /// the offer was present.
    pub fn remove_offer(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let removed = inner.records.remove(&id).is_some();
        if removed {
            inner.order.retain(|other| *other != id);
        }
        removed
    }

    /// Sweep offers whose end date lies more than `retention` before `now`.
    /// Returns the number removed. When and how often to sweep is the
    /// caller's retention policy.
    pub fn prune_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let mut guard = self.write();
        let inner = &mut *guard;
        let before = inner.records.len();
        inner.records.retain(|_, record| record.offer.end_date >= cutoff);
        let records = &inner.records;
        inner.order.retain(|id| records.contains_key(id));
        before - records.len()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Live record handle for the redemption ledger
    pub(crate) fn record(&self, id: Uuid) -> Option<Arc<OfferRecord>> {
        self.read().records.get(&id).cloned()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OfferStore for InMemoryCatalog {
    async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>, StoreError> {
        Ok(self.read().records.get(&id).map(|record| record.snapshot()))
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, StoreError> {
        let inner = self.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .map(|record| record.snapshot())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dealscope_offer::{Location, NewOffer};

    fn sample_offer(title: &str, end: DateTime<Utc>) -> Offer {
        Offer::new(NewOffer {
            title: title.to_string(),
            description: "Show this offer at checkout.".to_string(),
            business_name: "City Fashion Boutique".to_string(),
            start_date: end - Duration::days(30),
            end_date: end,
            location: Location {
                lat: 37.7749,
                lng: -122.4194,
                address: "789 Oak St".to_string(),
            },
            max_redemptions: 100,
            range_in_km: 10.0,
        })
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let catalog = InMemoryCatalog::new();
        let offer = sample_offer("10% Off First Purchase", now() + Duration::days(5));
        let id = offer.id;

        catalog.insert_offer(offer).unwrap();
        let snapshot = catalog.get_offer(id).await.unwrap().unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.current_redemptions, 0);

        assert!(catalog.get_offer(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let catalog = InMemoryCatalog::new();
        let offer = sample_offer("10% Off First Purchase", now() + Duration::days(5));
        let id = offer.id;

        catalog.insert_offer(offer.clone()).unwrap();
        assert!(matches!(
            catalog.insert_offer(offer),
            Err(CatalogError::DuplicateOffer(dup)) if dup == id
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_offer_rejected_on_insert() {
        let catalog = InMemoryCatalog::new();
        let mut offer = sample_offer("10% Off First Purchase", now() + Duration::days(5));
        offer.current_redemptions = offer.max_redemptions + 5;

        assert!(matches!(
            catalog.insert_offer(offer),
            Err(CatalogError::InvalidOffer(_))
        ));
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let catalog = InMemoryCatalog::new();
        for title in ["Coffee Deal", "Bakery Special", "Coffee Bundle"] {
            catalog
                .insert_offer(sample_offer(title, now() + Duration::days(5)))
                .unwrap();
        }

        let titles: Vec<String> = catalog
            .list_offers()
            .await
            .unwrap()
            .into_iter()
            .map(|offer| offer.title)
            .collect();
        assert_eq!(titles, ["Coffee Deal", "Bakery Special", "Coffee Bundle"]);
    }

    #[tokio::test]
    async fn test_remove_offer() {
        let catalog = InMemoryCatalog::new();
        let offer = sample_offer("50% Off Second Item", now() + Duration::days(5));
        let id = offer.id;
        catalog.insert_offer(offer).unwrap();

        assert!(catalog.remove_offer(id));
        assert!(!catalog.remove_offer(id));
        assert!(catalog.list_offers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prune_respects_retention_window() {
        let catalog = InMemoryCatalog::new();
        // Ended 10 days ago: past a 7-day retention window
        let stale = sample_offer("Old Promo", now() - Duration::days(10));
        // Ended yesterday: still inside the window
        let recent = sample_offer("Recent Promo", now() - Duration::days(1));
        let live = sample_offer("Live Promo", now() + Duration::days(5));
        let recent_id = recent.id;

        catalog.insert_offer(stale).unwrap();
        catalog.insert_offer(recent).unwrap();
        catalog.insert_offer(live).unwrap();

        let removed = catalog.prune_expired(now(), Duration::days(7));
        assert_eq!(removed, 1);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get_offer(recent_id).await.unwrap().is_some());
    }
}
