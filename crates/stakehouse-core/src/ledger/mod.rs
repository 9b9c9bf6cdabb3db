mod book;

pub use book::{Amount, OfferBook, StakeRecord};

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::LedgerError;
use crate::metrics::Metrics;

/// Best stake per `(offer, user)`, partitioned by offer.
///
/// Offers appear on first submission and are never removed. Updates lock a
/// single `(offer, user)` entry inside the offer's book.
pub struct OfferLedger {
    offers: DashMap<String, Arc<OfferBook>>,
    metrics: Arc<Metrics>,
}

impl OfferLedger {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            offers: DashMap::new(),
            metrics,
        }
    }

    /// Record `amount` for `user_id` on `offer_id`, keeping the maximum.
    /// Returns `true` when the stored value changed.
    pub fn submit(&self, offer_id: &str, user_id: &str, amount: Amount) -> Result<bool, LedgerError> {
        if offer_id.is_empty() {
            return Err(LedgerError::EmptyOfferId);
        }
        if user_id.is_empty() {
            return Err(LedgerError::EmptyUserId);
        }

        let changed = self.book(offer_id).raise(user_id, amount);
        if changed {
            self.metrics.inc_accepted();
        } else {
            self.metrics.inc_ignored();
        }
        debug!(offer_id, user_id, amount, changed, "stake submitted");
        Ok(changed)
    }

    /// Up to `limit` records for `offer_id`, highest amount first, ties by
    /// user id ascending. Unknown offers yield an empty list.
    pub fn top_stakes(&self, offer_id: &str, limit: usize) -> Result<Vec<StakeRecord>, LedgerError> {
        if offer_id.is_empty() {
            return Err(LedgerError::EmptyOfferId);
        }
        // Clone the Arc so the outer shard lock is not held while ranking.
        let Some(book) = self.offers.get(offer_id).map(|r| Arc::clone(r.value())) else {
            return Ok(Vec::new());
        };
        Ok(book.top(limit))
    }

    pub fn best_stake(&self, offer_id: &str, user_id: &str) -> Option<Amount> {
        self.offers.get(offer_id)?.best(user_id)
    }

    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    pub fn stake_count(&self, offer_id: &str) -> usize {
        self.offers.get(offer_id).map_or(0, |b| b.len())
    }

    fn book(&self, offer_id: &str) -> Arc<OfferBook> {
        if let Some(book) = self.offers.get(offer_id) {
            return Arc::clone(book.value());
        }
        Arc::clone(self.offers.entry(offer_id.to_owned()).or_default().value())
    }
}
