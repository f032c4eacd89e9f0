//! Reverse dependency graph
//!
//! File graph on petgraph. An edge `A → B` means A imports B and carries the
//! earliest 0-based line in A naming B. Dependents are incoming neighbors.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::shared::models::CanonicalPath;

/// Edge weight: earliest line in the importer naming the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub line: u32,
}

/// Serialized form: plain ordered lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EdgeList {
    files: Vec<CanonicalPath>,
    edges: Vec<(CanonicalPath, CanonicalPath, u32)>,
}

/// Import graph keyed by canonical path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "EdgeList", from = "EdgeList")]
pub struct ReverseDependencyGraph {
    graph: DiGraph<CanonicalPath, ImportEdge>,
    path_to_node: HashMap<CanonicalPath, NodeIndex>,
}

impl ReverseDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file node (idempotent)
    pub fn add_file(&mut self, path: &CanonicalPath) -> NodeIndex {
        if let Some(&idx) = self.path_to_node.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.clone());
        self.path_to_node.insert(path.clone(), idx);
        idx
    }

    /// Record that `importer` names `target` on `line`; the earliest line wins
    pub fn add_import(&mut self, importer: &CanonicalPath, target: &CanonicalPath, line: u32) {
        if importer == target {
            return;
        }
        let from = self.add_file(importer);
        let to = self.add_file(target);
        match self.graph.find_edge(from, to) {
            Some(edge) => {
                let weight = &mut self.graph[edge];
                weight.line = weight.line.min(line);
            }
            None => {
                self.graph.add_edge(from, to, ImportEdge { line });
            }
        }
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.path_to_node.contains_key(path)
    }

    /// Files importing `target` directly, sorted
    pub fn get_dependents(&self, target: &CanonicalPath) -> Vec<CanonicalPath> {
        self.neighbors(target, Direction::Incoming)
    }

    /// Files `file` imports directly, sorted
    pub fn get_dependencies(&self, file: &CanonicalPath) -> Vec<CanonicalPath> {
        self.neighbors(file, Direction::Outgoing)
    }

    fn neighbors(&self, path: &CanonicalPath, direction: Direction) -> Vec<CanonicalPath> {
        let Some(&idx) = self.path_to_node.get(path) else {
            return Vec::new();
        };
        let set: BTreeSet<CanonicalPath> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        set.into_iter().collect()
    }

    /// Every file reaching `target` through imports, in BFS order
    pub fn get_transitive_dependents(&self, target: &CanonicalPath) -> Vec<CanonicalPath> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([target.clone()]);
        visited.insert(target.clone());

        while let Some(current) = queue.pop_front() {
            for dependent in self.get_dependents(&current) {
                if visited.insert(dependent.clone()) {
                    order.push(dependent.clone());
                    queue.push_back(dependent);
                }
            }
        }
        order
    }

    /// Earliest 0-based line in `importer` naming `target`
    pub fn import_line(&self, target: &CanonicalPath, importer: &CanonicalPath) -> Option<u32> {
        let from = *self.path_to_node.get(importer)?;
        let to = *self.path_to_node.get(target)?;
        self.graph.find_edge(from, to).map(|e| self.graph[e].line)
    }

    /// Import cycles (strongly connected components with more than one file)
    pub fn cycles(&self) -> Vec<Vec<CanonicalPath>> {
        let mut cycles: Vec<Vec<CanonicalPath>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut paths: Vec<CanonicalPath> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                paths.sort();
                paths
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }

    /// target → importers
    pub fn reverse_map(&self) -> BTreeMap<CanonicalPath, BTreeSet<CanonicalPath>> {
        let mut map: BTreeMap<CanonicalPath, BTreeSet<CanonicalPath>> = BTreeMap::new();
        for edge in self.graph.edge_references() {
            map.entry(self.graph[edge.target()].clone())
                .or_default()
                .insert(self.graph[edge.source()].clone());
        }
        map
    }

    /// target → importer → earliest 0-based line
    pub fn line_evidence(&self) -> BTreeMap<CanonicalPath, BTreeMap<CanonicalPath, u32>> {
        let mut map: BTreeMap<CanonicalPath, BTreeMap<CanonicalPath, u32>> = BTreeMap::new();
        for edge in self.graph.edge_references() {
            map.entry(self.graph[edge.target()].clone())
                .or_default()
                .insert(self.graph[edge.source()].clone(), edge.weight().line);
        }
        map
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl From<ReverseDependencyGraph> for EdgeList {
    fn from(graph: ReverseDependencyGraph) -> Self {
        let mut files: Vec<CanonicalPath> = graph.path_to_node.keys().cloned().collect();
        files.sort();
        let mut edges: Vec<(CanonicalPath, CanonicalPath, u32)> = graph
            .graph
            .edge_references()
            .map(|e| {
                (
                    graph.graph[e.source()].clone(),
                    graph.graph[e.target()].clone(),
                    e.weight().line,
                )
            })
            .collect();
        edges.sort();
        EdgeList { files, edges }
    }
}

impl From<EdgeList> for ReverseDependencyGraph {
    fn from(list: EdgeList) -> Self {
        let mut graph = ReverseDependencyGraph::new();
        for file in &list.files {
            graph.add_file(file);
        }
        for (importer, target, line) in &list.edges {
            graph.add_import(importer, target, *line);
        }
        graph
    }
}
