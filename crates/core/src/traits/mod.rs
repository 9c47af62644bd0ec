//! Core traits
//!
//! - `Clock`: time source for relative dates and TTL checks
//! - `ContextStore`: pluggable storage for active dialogues

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::ContextStore;
