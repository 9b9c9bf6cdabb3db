use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SESSION_TTL_MS: u64 = 600_000;
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 3_600_000;
pub const DEFAULT_TOP_K: usize = 20;

/// How `resolve` treats a token whose session has expired but not been swept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Any token still in the reverse index resolves. Expired tokens only stop
    /// resolving once the sweeper has removed them.
    #[default]
    Lazy,
    /// A token resolves only while it is the current token of a live session.
    Strict,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_ms: u64,
    pub expiry_policy: ExpiryPolicy,
    /// Push the expiry forward when a live session is reissued.
    pub sliding_expiry: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_SESSION_TTL_MS,
            expiry_policy: ExpiryPolicy::Lazy,
            sliding_expiry: true,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    pub interval_ms: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl SweeperConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Number of entries returned by the high-stakes query.
    pub top_k: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}
