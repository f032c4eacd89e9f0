//! Reverse dependency and export graphs
//!
//! - [`ProjectScanner`] walks a root and builds a [`ProjectGraph`]
//! - [`ResolverChain`] resolves specifiers (tsconfig `paths`/`baseUrl`, then relative)
//! - [`ReverseDependencyGraph`] answers "who imports this file" with line evidence
//! - [`ExportGraph`] maps barrel re-exports back to declaring modules
//! - [`GraphStore`] owns the current graph and swaps rebuilt ones in atomically

mod dep_graph;
mod export_graph;
mod graph_store;
mod module_resolver;
mod project_graph;
mod scanner;
mod specifiers;
mod tsconfig;
mod types;

pub use dep_graph::{ImportEdge, ReverseDependencyGraph};
pub use export_graph::{ExportGraph, ReexportVia, Reexposure};
pub use graph_store::GraphStore;
pub use module_resolver::{
    FileProbe, ModuleResolver, RelativeResolver, ResolverChain, TsConfigResolver,
};
pub use project_graph::ProjectGraph;
pub use scanner::ProjectScanner;
pub use specifiers::{extract_references, references_from_snapshot, references_from_text};
pub use tsconfig::{PathAlias, TsConfig};
pub use types::*;
