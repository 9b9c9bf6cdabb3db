use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{ExpiryPolicy, SessionConfig};
use crate::error::SessionError;
use crate::metrics::Metrics;
use crate::session::entry::{Session, SessionEntry};

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub sessions_removed: usize,
    pub stale_tokens_removed: usize,
}

/// Issues, resolves and expires session tokens.
///
/// Lock order is `sessions` -> `tokens` -> `stale`. Code paths that touch
/// more than one of them take locks in that order or release the first
/// guard before acquiring the next.
pub struct SessionDirectory {
    /// user_id -> current token and expiry
    sessions: DashMap<String, SessionEntry>,
    /// token -> user_id
    tokens: DashMap<String, String>,
    /// Tokens superseded after expiry; their reverse entries wait for a sweep.
    stale: Mutex<Vec<String>>,
    cfg: SessionConfig,
    clock: Arc<dyn Clock>,
    metrics: Arc<Metrics>,
}

impl SessionDirectory {
    pub fn new(cfg: SessionConfig, clock: Arc<dyn Clock>, metrics: Arc<Metrics>) -> Self {
        Self {
            sessions: DashMap::new(),
            tokens: DashMap::new(),
            stale: Mutex::new(Vec::new()),
            cfg,
            clock,
            metrics,
        }
    }

    /// Return the live token for `user_id`, minting one if there is none.
    ///
    /// The check-and-set runs while holding the entry lock for `user_id`, so
    /// concurrent callers for the same user always agree on one token.
    pub fn issue_or_reuse(&self, user_id: &str) -> Result<Session, SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::EmptyUserId);
        }
        let now = self.clock.now_ms();

        match self.sessions.entry(user_id.to_owned()) {
            Entry::Occupied(mut occ) if !occ.get().is_expired(now) => {
                let entry = occ.get_mut();
                if self.cfg.sliding_expiry {
                    entry.extend_to(self.expiry_from(now));
                }
                self.metrics.inc_reused();
                debug!(user_id, expires_at_ms = entry.expires_at_ms, "session reused");
                Ok(Session::from_entry(user_id, entry))
            }
            Entry::Occupied(mut occ) => {
                let fresh = self.mint(user_id, now);
                let superseded = occ.insert(fresh.clone());
                self.stale.lock().push(superseded.token);
                debug!(user_id, "expired session superseded");
                Ok(Session::from_entry(user_id, &fresh))
            }
            Entry::Vacant(vacant) => {
                let fresh = self.mint(user_id, now);
                vacant.insert(fresh.clone());
                debug!(user_id, "session minted");
                Ok(Session::from_entry(user_id, &fresh))
            }
        }
    }

    /// Map a token back to its user id.
    pub fn resolve(&self, token: &str) -> Result<String, SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let Some(user_id) = self.tokens.get(token).map(|r| r.value().clone()) else {
            self.metrics.inc_rejected();
            return Err(SessionError::UnknownToken);
        };

        if self.cfg.expiry_policy == ExpiryPolicy::Strict {
            let now = self.clock.now_ms();
            let live = self
                .sessions
                .get(&user_id)
                .is_some_and(|e| e.token == token && !e.is_expired(now));
            if !live {
                self.metrics.inc_rejected();
                return Err(SessionError::ExpiredToken);
            }
        }
        Ok(user_id)
    }

    /// Remove sessions that are expired as of now, plus reverse entries of
    /// superseded tokens.
    ///
    /// Expired keys are snapshotted first and each one is removed only if it
    /// is still expired, so a session reissued mid-sweep survives.
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now_ms();
        let expired = self.expired_user_ids(now);
        let report = SweepReport {
            sessions_removed: self.remove_expired(&expired, now),
            stale_tokens_removed: self.drain_stale(),
        };

        self.metrics.record_sweep(
            report.sessions_removed as u64,
            report.stale_tokens_removed as u64,
        );
        report
    }

    /// User ids whose session is expired as of `now`.
    pub fn expired_user_ids(&self, now: u64) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|r| r.value().is_expired(now))
            .map(|r| r.key().clone())
            .collect()
    }

    /// Remove each listed session that is still expired as of `now`, along
    /// with its reverse entry. Returns how many were removed.
    pub fn remove_expired(&self, user_ids: &[String], now: u64) -> usize {
        let mut removed = 0;
        for user_id in user_ids {
            if let Some((_, entry)) = self
                .sessions
                .remove_if(user_id, |_, e| e.is_expired(now))
            {
                self.tokens.remove(&entry.token);
                removed += 1;
            }
        }
        removed
    }

    /// Drop reverse entries of tokens superseded after expiry.
    pub fn drain_stale(&self) -> usize {
        let stale = std::mem::take(&mut *self.stale.lock());
        stale
            .into_iter()
            .filter(|token| self.tokens.remove(token).is_some())
            .count()
    }

    /// Copy of the forward entry for `user_id`, expired or not.
    pub fn session(&self, user_id: &str) -> Option<Session> {
        self.sessions
            .get(user_id)
            .map(|e| Session::from_entry(user_id, e.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn expiry_from(&self, now: u64) -> u64 {
        now.saturating_add(self.cfg.ttl_ms)
    }

    // Called with the `sessions` entry lock held.
    fn mint(&self, user_id: &str, now: u64) -> SessionEntry {
        let token = Uuid::new_v4().to_string();
        let previous = self.tokens.insert(token.clone(), user_id.to_owned());
        assert!(previous.is_none(), "session token collision on {token}");
        self.metrics.inc_minted();
        SessionEntry {
            token,
            expires_at_ms: self.expiry_from(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::collections::HashSet;
    use std::time::Duration;

    const TTL_MS: u64 = 1_000;

    fn directory_with(policy: ExpiryPolicy, sliding: bool) -> (SessionDirectory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let cfg = SessionConfig {
            ttl_ms: TTL_MS,
            expiry_policy: policy,
            sliding_expiry: sliding,
        };
        let dir = SessionDirectory::new(cfg, clock.clone(), Arc::new(Metrics::new()));
        (dir, clock)
    }

    fn directory() -> (SessionDirectory, Arc<ManualClock>) {
        directory_with(ExpiryPolicy::Lazy, true)
    }

    #[test]
    fn test_reissue_within_ttl_returns_same_token() {
        let (dir, clock) = directory();
        let first = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(500));
        let second = dir.issue_or_reuse("alice").unwrap();

        assert_eq!(first.token, second.token);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.token_count(), 1);
    }

    #[test]
    fn test_sliding_expiry_extends_on_reuse() {
        let (dir, clock) = directory();
        let first = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(600));
        let second = dir.issue_or_reuse("alice").unwrap();

        assert_eq!(second.expires_at_ms, first.expires_at_ms + 600);

        // Still live past the original expiry
        clock.advance(Duration::from_millis(600));
        assert_eq!(dir.issue_or_reuse("alice").unwrap().token, first.token);
    }

    #[test]
    fn test_fixed_expiry_keeps_original_deadline() {
        let (dir, clock) = directory_with(ExpiryPolicy::Lazy, false);
        let first = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(600));
        let second = dir.issue_or_reuse("alice").unwrap();
        assert_eq!(second.expires_at_ms, first.expires_at_ms);

        clock.advance(Duration::from_millis(600));
        let third = dir.issue_or_reuse("alice").unwrap();
        assert_ne!(third.token, first.token);
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let (dir, _) = directory();
        assert_eq!(dir.issue_or_reuse(""), Err(SessionError::EmptyUserId));
        assert!(dir.is_empty());
    }

    #[test]
    fn test_resolve_round_trip_and_unknown_token() {
        let (dir, _) = directory();
        let s = dir.issue_or_reuse("bob").unwrap();
        assert_eq!(dir.resolve(&s.token).unwrap(), "bob");

        let never_issued = Uuid::new_v4().to_string();
        assert_eq!(dir.resolve(&never_issued), Err(SessionError::UnknownToken));
        assert_eq!(dir.resolve(""), Err(SessionError::EmptyToken));
    }

    #[test]
    fn test_lazy_policy_resolves_expired_until_swept() {
        let (dir, clock) = directory();
        let s = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(TTL_MS * 5));

        assert_eq!(dir.resolve(&s.token).unwrap(), "alice");

        let report = dir.sweep();
        assert_eq!(report.sessions_removed, 1);
        assert_eq!(dir.resolve(&s.token), Err(SessionError::UnknownToken));
        assert!(dir.is_empty());
        assert_eq!(dir.token_count(), 0);
    }

    #[test]
    fn test_strict_policy_rejects_expired_before_sweep() {
        let (dir, clock) = directory_with(ExpiryPolicy::Strict, true);
        let s = dir.issue_or_reuse("alice").unwrap();
        assert_eq!(dir.resolve(&s.token).unwrap(), "alice");

        clock.advance(Duration::from_millis(TTL_MS));
        assert_eq!(dir.resolve(&s.token), Err(SessionError::ExpiredToken));
    }

    #[test]
    fn test_strict_policy_rejects_superseded_token() {
        let (dir, clock) = directory_with(ExpiryPolicy::Strict, true);
        let old = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(TTL_MS * 2));
        let new = dir.issue_or_reuse("alice").unwrap();

        assert_ne!(old.token, new.token);
        assert_eq!(dir.resolve(&old.token), Err(SessionError::ExpiredToken));
        assert_eq!(dir.resolve(&new.token).unwrap(), "alice");
    }

    #[test]
    fn test_superseded_token_cleaned_by_sweep() {
        let (dir, clock) = directory();
        let old = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(TTL_MS * 2));
        let new = dir.issue_or_reuse("alice").unwrap();

        // Lazy: the leaked reverse entry still resolves
        assert_eq!(dir.token_count(), 2);
        assert_eq!(dir.resolve(&old.token).unwrap(), "alice");

        let report = dir.sweep();
        assert_eq!(report.sessions_removed, 0);
        assert_eq!(report.stale_tokens_removed, 1);
        assert_eq!(dir.resolve(&old.token), Err(SessionError::UnknownToken));
        assert_eq!(dir.resolve(&new.token).unwrap(), "alice");
    }

    #[test]
    fn test_reissue_between_snapshot_and_removal_survives() {
        let (dir, clock) = directory();
        let old = dir.issue_or_reuse("alice").unwrap();
        clock.advance(Duration::from_millis(TTL_MS * 2));

        let now = clock.now_ms();
        let expired = dir.expired_user_ids(now);
        assert_eq!(expired, vec!["alice".to_string()]);

        // alice logs in again after the snapshot was taken
        let new = dir.issue_or_reuse("alice").unwrap();
        assert_ne!(new.token, old.token);

        assert_eq!(dir.remove_expired(&expired, now), 0);
        assert_eq!(dir.drain_stale(), 1);

        assert_eq!(dir.resolve(&new.token).unwrap(), "alice");
        assert_eq!(dir.session("alice").unwrap().token, new.token);
        assert_eq!(dir.resolve(&old.token), Err(SessionError::UnknownToken));
        assert_eq!(dir.token_count(), 1);
    }

    #[test]
    fn test_sweep_keeps_live_sessions() {
        let (dir, clock) = directory();
        let early = dir.issue_or_reuse("early").unwrap();
        clock.advance(Duration::from_millis(TTL_MS / 2));
        let late = dir.issue_or_reuse("late").unwrap();
        clock.advance(Duration::from_millis(TTL_MS / 2));

        let report = dir.sweep();
        assert_eq!(report.sessions_removed, 1);
        assert!(dir.session("early").is_none());
        assert_eq!(dir.session("late").unwrap().token, late.token);
        assert_eq!(dir.resolve(&early.token), Err(SessionError::UnknownToken));
        assert_eq!(dir.resolve(&late.token).unwrap(), "late");
    }

    #[test]
    fn test_concurrent_issue_mints_single_token() {
        let (dir, _) = directory();
        let tokens: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| dir.issue_or_reuse("alice").unwrap().token))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let distinct: HashSet<_> = tokens.into_iter().collect();
        assert_eq!(distinct.len(), 1);
        assert_eq!(dir.token_count(), 1);
    }

    #[test]
    fn test_concurrent_users_get_distinct_tokens() {
        let (dir, _) = directory();
        std::thread::scope(|scope| {
            for t in 0..8 {
                let dir = &dir;
                scope.spawn(move || {
                    for i in 0..50 {
                        let user = format!("user-{t}-{i}");
                        let s = dir.issue_or_reuse(&user).unwrap();
                        assert_eq!(dir.resolve(&s.token).unwrap(), user);
                    }
                });
            }
        });
        assert_eq!(dir.len(), 400);
        assert_eq!(dir.token_count(), 400);
    }
}
