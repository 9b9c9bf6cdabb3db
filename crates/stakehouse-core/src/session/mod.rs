mod directory;
mod entry;

pub use directory::{SessionDirectory, SweepReport};
pub use entry::{Session, SessionEntry};
