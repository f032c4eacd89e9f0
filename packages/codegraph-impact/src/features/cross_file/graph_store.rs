//! Graph store
//!
//! Owns the current [`ProjectGraph`] of one root. Readers clone an `Arc` and
//! keep using it while a rebuild runs; the rebuilt graph is constructed
//! outside the lock and swapped in whole.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::project_graph::ProjectGraph;
use super::scanner::ProjectScanner;
use crate::errors::Result;

pub struct GraphStore {
    root: PathBuf,
    scanner: ProjectScanner,
    current: RwLock<Option<Arc<ProjectGraph>>>,
}

impl GraphStore {
    pub fn new(root: impl Into<PathBuf>, scanner: ProjectScanner) -> Self {
        Self {
            root: root.into(),
            scanner,
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current graph, if one has been built
    pub fn current(&self) -> Option<Arc<ProjectGraph>> {
        self.current.read().clone()
    }

    /// Current graph, building it first when absent
    pub fn get_or_build(&self) -> Result<Arc<ProjectGraph>> {
        if let Some(graph) = self.current() {
            return Ok(graph);
        }
        self.rebuild()
    }

    /// Scan the root again and replace the current graph
    pub fn rebuild(&self) -> Result<Arc<ProjectGraph>> {
        let graph = Arc::new(self.scanner.scan(&self.root)?);
        *self.current.write() = Some(Arc::clone(&graph));
        debug!(root = %self.root.display(), "graph swapped in");
        Ok(graph)
    }

    /// Drop the current graph; the next `get_or_build` rescans
    pub fn invalidate(&self) {
        self.current.write().take();
    }
}
