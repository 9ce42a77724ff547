//! Read-only graph view over a resolved import.

use std::collections::{HashMap, HashSet};
use std::fmt;

use nestor_core::dependency::DependencyScope;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::import::ResolvedImport;
use crate::library::LibraryId;
use crate::synth::ModuleId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Module(ModuleId),
    Library { id: LibraryId, name: String },
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(id) => write!(f, "{id}"),
            Self::Library { name, .. } => write!(f, "{name} (library)"),
        }
    }
}

/// Module and library dependencies as a petgraph digraph.
pub struct ModuleGraph {
    graph: DiGraph<GraphNode, DependencyScope>,
    modules: HashMap<ModuleId, NodeIndex>,
}

impl ModuleGraph {
    pub fn from_import(import: &ResolvedImport) -> Self {
        let mut graph = DiGraph::new();
        let mut modules = HashMap::new();
        let mut libraries: HashMap<LibraryId, NodeIndex> = HashMap::new();

        for id in import.modules.keys() {
            let idx = graph.add_node(GraphNode::Module(id.clone()));
            modules.insert(id.clone(), idx);
        }
        for module in import.modules.values() {
            let Some(&from) = modules.get(&module.id) else {
                continue;
            };
            for dep in &module.module_dependencies {
                if let Some(&to) = modules.get(&dep.target) {
                    graph.add_edge(from, to, dep.scope);
                }
            }
            for dep in &module.library_dependencies {
                let Some(library) = import.libraries.get(dep.library) else {
                    continue;
                };
                let to = *libraries.entry(dep.library).or_insert_with(|| {
                    graph.add_node(GraphNode::Library {
                        id: library.id,
                        name: library.presentable_name.clone(),
                    })
                });
                graph.add_edge(from, to, dep.scope);
            }
        }
        Self { graph, modules }
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.modules.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    /// Direct dependencies, sorted by display name.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, DependencyScope)> {
        let mut deps: Vec<(NodeIndex, DependencyScope)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()))
            .collect();
        deps.sort_by_key(|(idx, scope)| (self.graph[*idx].to_string(), *scope));
        deps
    }

    /// Modules depending directly on `idx`.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<&ModuleId> {
        let mut out: Vec<&ModuleId> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|e| match &self.graph[e.source()] {
                GraphNode::Module(id) => Some(id),
                GraphNode::Library { .. } => None,
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Render the dependencies of `root` as a tree.
    pub fn print_tree(&self, root: NodeIndex, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[root]);
        let mut visited = HashSet::new();
        visited.insert(root);
        let deps = self.dependencies_of(root);
        let count = deps.len();
        for (i, (child, scope)) in deps.iter().enumerate() {
            self.print_subtree(
                &mut output,
                *child,
                *scope,
                "",
                i == count - 1,
                1,
                max_depth,
                &mut visited,
            );
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        scope: DependencyScope,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if scope == DependencyScope::Compile {
            output.push_str(&format!("{prefix}{connector}{node}\n"));
        } else {
            output.push_str(&format!("{prefix}{connector}{node} [{scope}]\n"));
        }

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, (child, child_scope)) in deps.iter().enumerate() {
            self.print_subtree(
                output,
                *child,
                *child_scope,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }
}
