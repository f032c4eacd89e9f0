//! Snapshot diff domain models

mod change;

pub use change::*;
