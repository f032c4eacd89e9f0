//! Pipeline orchestration

pub mod orchestrator;
pub mod result;

pub use orchestrator::ChangeAnalyzer;
pub use result::ChangeReport;
