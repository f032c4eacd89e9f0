//! Downstream impact resolution
//!
//! Turns a changed file and its impacted export names into a ranked list of
//! affected files, each backed by tiered evidence.

mod resolver;
mod types;
mod usage;

pub use resolver::DownstreamResolver;
pub use types::*;
pub use usage::{LocalRef, UsageScan};
