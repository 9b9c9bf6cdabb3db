use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::cmp::Ordering;

pub type Amount = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeRecord {
    pub user_id: String,
    pub amount: Amount,
}

/// Highest stake per user for a single offer.
#[derive(Debug, Default)]
pub struct OfferBook {
    stakes: DashMap<String, Amount>,
}

impl OfferBook {
    /// Store `amount` if it beats the current value. Atomic per user.
    pub fn raise(&self, user_id: &str, amount: Amount) -> bool {
        match self.stakes.entry(user_id.to_owned()) {
            Entry::Occupied(mut occ) => {
                if amount > *occ.get() {
                    *occ.get_mut() = amount;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(amount);
                true
            }
        }
    }

    pub fn best(&self, user_id: &str) -> Option<Amount> {
        self.stakes.get(user_id).map(|r| *r.value())
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    pub fn top(&self, limit: usize) -> Vec<StakeRecord> {
        if limit == 0 {
            return Vec::new();
        }
        let mut records: Vec<StakeRecord> = self
            .stakes
            .iter()
            .map(|r| StakeRecord {
                user_id: r.key().clone(),
                amount: *r.value(),
            })
            .collect();

        if records.len() > limit {
            records.select_nth_unstable_by(limit - 1, rank);
            records.truncate(limit);
        }
        records.sort_unstable_by(rank);
        records
    }
}

fn rank(a: &StakeRecord, b: &StakeRecord) -> Ordering {
    b.amount
        .cmp(&a.amount)
        .then_with(|| a.user_id.cmp(&b.user_id))
}
