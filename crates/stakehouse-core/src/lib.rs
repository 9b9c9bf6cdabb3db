//! # Stakehouse Core
//!
//! In-memory session directory, offer ledger and the background sweeper that
//! expires sessions. Everything here is synchronous and lock-scoped per key;
//! the HTTP layer lives in `stakehouse-server`.

pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod session;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ExpiryPolicy, LedgerConfig, SessionConfig, SweeperConfig};
pub use error::{LedgerError, SessionError};
pub use ledger::{Amount, OfferLedger, StakeRecord};
pub use metrics::{Metrics, MetricsSnapshot};
pub use session::{Session, SessionDirectory, SweepReport};
pub use sweeper::Sweeper;
