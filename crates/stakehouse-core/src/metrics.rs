use crate::clock::{Clock, SystemClock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    start_ms: u64,
    pub sessions_minted_total: AtomicU64,
    pub sessions_reused_total: AtomicU64,
    pub tokens_rejected_total: AtomicU64,
    pub sweeps_total: AtomicU64,
    pub sessions_swept_total: AtomicU64,
    pub stale_tokens_swept_total: AtomicU64,
    pub stakes_accepted_total: AtomicU64,
    pub stakes_ignored_total: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_ms: u64,
    pub sessions_minted_total: u64,
    pub sessions_reused_total: u64,
    pub tokens_rejected_total: u64,
    pub sweeps_total: u64,
    pub sessions_swept_total: u64,
    pub stale_tokens_swept_total: u64,
    pub stakes_accepted_total: u64,
    pub stakes_ignored_total: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_ms: SystemClock.now_ms(),
            sessions_minted_total: AtomicU64::new(0),
            sessions_reused_total: AtomicU64::new(0),
            tokens_rejected_total: AtomicU64::new(0),
            sweeps_total: AtomicU64::new(0),
            sessions_swept_total: AtomicU64::new(0),
            stale_tokens_swept_total: AtomicU64::new(0),
            stakes_accepted_total: AtomicU64::new(0),
            stakes_ignored_total: AtomicU64::new(0),
        }
    }

    pub fn uptime_ms(&self) -> u64 {
        SystemClock.now_ms().saturating_sub(self.start_ms)
    }

    pub fn inc_minted(&self) {
        self.sessions_minted_total.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_reused(&self) {
        self.sessions_reused_total.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_rejected(&self) {
        self.tokens_rejected_total.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_sweep(&self, sessions: u64, stale_tokens: u64) {
        self.sweeps_total.fetch_add(1, Ordering::Relaxed);
        self.sessions_swept_total.fetch_add(sessions, Ordering::Relaxed);
        self.stale_tokens_swept_total
            .fetch_add(stale_tokens, Ordering::Relaxed);
    }
    pub fn inc_accepted(&self) {
        self.stakes_accepted_total.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_ignored(&self) {
        self.stakes_ignored_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_ms: self.uptime_ms(),
            sessions_minted_total: self.sessions_minted_total.load(Ordering::Relaxed),
            sessions_reused_total: self.sessions_reused_total.load(Ordering::Relaxed),
            tokens_rejected_total: self.tokens_rejected_total.load(Ordering::Relaxed),
            sweeps_total: self.sweeps_total.load(Ordering::Relaxed),
            sessions_swept_total: self.sessions_swept_total.load(Ordering::Relaxed),
            stale_tokens_swept_total: self.stale_tokens_swept_total.load(Ordering::Relaxed),
            stakes_accepted_total: self.stakes_accepted_total.load(Ordering::Relaxed),
            stakes_ignored_total: self.stakes_ignored_total.load(Ordering::Relaxed),
        }
    }
}
