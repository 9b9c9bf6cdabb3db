use serde::Serialize;

/// Forward-map value: the user's current token and when it stops being live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub token: String,
    pub expires_at_ms: u64,
}

impl SessionEntry {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at_ms
    }

    /// Move the expiry to `candidate` if that is later. Never shortens.
    pub fn extend_to(&mut self, candidate: u64) {
        self.expires_at_ms = self.expires_at_ms.max(candidate);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub token: String,
    pub expires_at_ms: u64,
}

impl Session {
    pub(crate) fn from_entry(user_id: &str, entry: &SessionEntry) -> Self {
        Self {
            user_id: user_id.to_owned(),
            token: entry.token.clone(),
            expires_at_ms: entry.expires_at_ms,
        }
    }
}
