use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::store::InMemoryCatalog;

/// The sole writer of redemption counts.
///
/// Construction over the catalog grants it the per-offer counters; nothing
/// else in the workspace can reach them.
pub struct RedemptionLedger {
    catalog: Arc<InMemoryCatalog>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("offer not found: {0}")]
    OfferNotFound(Uuid),

    /// Expected business outcome once an offer sells out; callers should not
    /// retry it.
    #[error("offer {offer_id} is at capacity ({max_redemptions} redemptions)")]
    CapacityExceeded {
        offer_id: Uuid,
        max_redemptions: u32,
    },
}

impl RedemptionLedger {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self { catalog }
    }

    /// Claim one redemption against an offer and return the new count.
    ///
    /// The capacity check and the increment are a single compare-and-swap on
    /// the offer's counter, so under any interleaving of concurrent claims
    /// exactly the remaining capacity succeeds and the count never passes
    /// the maximum. Claims against different offers share no lock.
    pub fn try_redeem(&self, offer_id: Uuid) -> Result<u32, LedgerError> {
        let record = self
            .catalog
            .record(offer_id)
            .ok_or(LedgerError::OfferNotFound(offer_id))?;

        let max = record.offer.max_redemptions;
        let mut current = record.redeemed.load(Ordering::Acquire);
        loop {
            if current >= max {
                debug!(%offer_id, max_redemptions = max, "redemption refused: offer at capacity");
                return Err(LedgerError::CapacityExceeded {
                    offer_id,
                    max_redemptions: max,
                });
            }
            match record.redeemed.compare_exchange(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    debug!(%offer_id, new_count = current + 1, "redemption recorded");
                    return Ok(current + 1);
                }
                // Lost the race; re-check against the observed count
                Err(observed) => current = observed,
            }
        }
    }
}
