mod differ;
mod export_diff;
mod rename;
pub mod rules;

pub use differ::SnapshotDiffer;
pub use export_diff::diff_exports;
pub use rename::{rename_hints, similarity};
pub use rules::{classify_modification, RuleMatch};
