//! Shared test fakes for the Stratologia applications backend.

mod clock;
mod notifier;
mod store;

pub use clock::{FixedClock, SteppingClock, fixed_instant};
pub use notifier::{FailingNotifier, RecordingNotifier};
pub use store::{FailingStore, InMemoryStore};
