use std::sync::Arc;

use stakehouse_core::{Clock, Metrics, OfferLedger, SessionDirectory, Sweeper, SystemClock};

use crate::config::Settings;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionDirectory>,
    pub ledger: Arc<OfferLedger>,
    pub metrics: Arc<Metrics>,
    pub top_k: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let sessions = Arc::new(SessionDirectory::new(
            settings.session.clone(),
            clock,
            metrics.clone(),
        ));
        let ledger = Arc::new(OfferLedger::new(metrics.clone()));
        Self {
            sessions,
            ledger,
            metrics,
            top_k: settings.ledger.top_k,
        }
    }

    pub fn sweeper(&self, settings: &Settings) -> Sweeper {
        Sweeper::new(self.sessions.clone(), settings.sweeper.interval())
    }
}
