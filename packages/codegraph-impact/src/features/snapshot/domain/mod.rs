//! Snapshot domain models

mod snapshot;
mod symbol;

pub use snapshot::*;
pub use symbol::*;
