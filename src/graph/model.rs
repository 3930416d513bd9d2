use super::edge::{EdgeId, EdgeOutput, WorkflowEdge};
use super::node::{MAX_BRANCHES, NodeId, NodeKind, WorkflowNode};
use crate::error::GraphError;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The workflow graph: an arena of typed nodes plus adjacency indices over
/// the edges.
///
/// The graph enforces only structural integrity of its own collections
/// (endpoints exist, each named output routes to one destination, config is
/// shape-consistent). Semantic rules — exactly one start node, reachability,
/// cycle policy — belong to [`validate`](crate::validation::validate), and
/// traversal semantics belong to the routing engine, so a graph may hold
/// incomplete or invalid structure while it is being authored.
///
/// Adjacency is indexed eagerly on every mutation rather than re-derived by
/// scanning the edge list, since reachability and cycle checks run on every
/// save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct WorkflowGraph {
    nodes: AHashMap<NodeId, WorkflowNode>,
    edges: AHashMap<EdgeId, WorkflowEdge>,
    // Declaration order, kept for deterministic validation reports.
    node_order: Vec<NodeId>,
    edge_order: Vec<EdgeId>,
    outgoing: AHashMap<NodeId, Vec<EdgeId>>,
    incoming: AHashMap<NodeId, Vec<EdgeId>>,
    next_node_id: u32,
    next_edge_id: u32,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with a fresh id.
    ///
    /// Incomplete config (e.g. a role node with no role picked yet) is
    /// accepted; only shape-inconsistent config is rejected: duplicate field
    /// or branch ids, or more than [`MAX_BRANCHES`] branches.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, GraphError> {
        check_config(&kind)?;
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(
            id,
            WorkflowNode {
                id,
                label: label.into(),
                kind,
            },
        );
        self.node_order.push(id);
        Ok(id)
    }

    /// Replaces the kind (and config) of an existing node.
    ///
    /// Edges are left untouched; callers changing a conditional's branch set
    /// should pair this with [`remove_edges_from`](Self::remove_edges_from)
    /// so stale branch edges do not linger as validation errors.
    pub fn update_config(&mut self, id: NodeId, kind: NodeKind) -> Result<(), GraphError> {
        check_config(&kind)?;
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        node.kind = kind;
        Ok(())
    }

    /// Connects `source` to `target` through the given output.
    ///
    /// Fails if either endpoint is missing, if the output is already routed
    /// to some target — deliberately including a second edge to the *same*
    /// target, which would be a pointless duplicate — or if the edge would
    /// leave an end node or enter the start node.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        output: EdgeOutput,
    ) -> Result<EdgeId, GraphError> {
        let source_kind = &self
            .nodes
            .get(&source)
            .ok_or(GraphError::UnknownNode(source))?
            .kind;
        let target_kind = &self
            .nodes
            .get(&target)
            .ok_or(GraphError::UnknownNode(target))?
            .kind;
        if matches!(source_kind, NodeKind::End) {
            return Err(GraphError::InvalidConfig {
                kind: "edge",
                message: "an end node cannot have outgoing connections".to_string(),
            });
        }
        if matches!(target_kind, NodeKind::Start) {
            return Err(GraphError::InvalidConfig {
                kind: "edge",
                message: "a start node cannot have incoming connections".to_string(),
            });
        }
        if let Some(existing) = self
            .outgoing_edges(source)
            .find(|edge| edge.output == output)
        {
            return Err(GraphError::DuplicateHandleTarget {
                source_node: source,
                output: output.to_string(),
                existing_target: existing.target,
            });
        }
        Ok(self.push_edge(source, target, output, None))
    }

    /// Inserts an edge checking only that both endpoints exist.
    ///
    /// This is the import path for externally authored graphs: duplicate
    /// outputs and terminal-node violations are deliberately let through so
    /// that [`validate`](crate::validation::validate) can report every
    /// conflict at once instead of the import aborting at the first one.
    pub fn insert_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        output: EdgeOutput,
        label: Option<String>,
    ) -> Result<EdgeId, GraphError> {
        if !self.nodes.contains_key(&source) {
            return Err(GraphError::UnknownNode(source));
        }
        if !self.nodes.contains_key(&target) {
            return Err(GraphError::UnknownNode(target));
        }
        Ok(self.push_edge(source, target, output, label))
    }

    fn push_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        output: EdgeOutput,
        label: Option<String>,
    ) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(
            id,
            WorkflowEdge {
                id,
                source,
                target,
                output,
                label,
            },
        );
        self.edge_order.push(id);
        self.outgoing.entry(source).or_default().push(id);
        self.incoming.entry(target).or_default().push(id);
        id
    }

    /// Removes a node and every edge where it appears as source or target.
    pub fn remove_node(&mut self, id: NodeId) -> Result<WorkflowNode, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        let incident: Vec<EdgeId> = self
            .outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .chain(self.incoming.get(&id).into_iter().flatten())
            .copied()
            .collect();
        for edge_id in incident {
            self.remove_edge(edge_id);
        }
        self.outgoing.remove(&id);
        self.incoming.remove(&id);
        self.node_order.retain(|n| *n != id);
        Ok(node)
    }

    /// Removes one edge, detaching it from both adjacency indices.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<WorkflowEdge> {
        let edge = self.edges.remove(&id)?;
        if let Some(list) = self.outgoing.get_mut(&edge.source) {
            list.retain(|e| *e != id);
        }
        if let Some(list) = self.incoming.get_mut(&edge.target) {
            list.retain(|e| *e != id);
        }
        self.edge_order.retain(|e| *e != id);
        Some(edge)
    }

    /// Removes every edge leaving `id`, returning how many were removed.
    ///
    /// Used when a conditional node's branch set changes, so edges whose
    /// branch no longer exists do not linger as dangling references.
    pub fn remove_edges_from(&mut self, id: NodeId) -> usize {
        let leaving: Vec<EdgeId> = self
            .outgoing
            .get(&id)
            .map(|list| list.clone())
            .unwrap_or_default();
        for edge_id in &leaving {
            self.remove_edge(*edge_id);
        }
        leaving.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&WorkflowNode> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&WorkflowEdge> {
        self.edges.get(&id)
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &WorkflowEdge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `id`, in the order they were added.
    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &WorkflowEdge> {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    /// Edges entering `id`, in the order they were added.
    pub fn incoming_edges(&self, id: NodeId) -> impl Iterator<Item = &WorkflowEdge> {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    /// The first node declared with kind `Start`, if any.
    pub fn start_node(&self) -> Option<&WorkflowNode> {
        self.nodes().find(|n| matches!(n.kind, NodeKind::Start))
    }

    /// Every node reachable from `id` by following edges forward, including
    /// `id` itself. Returns an empty set for an unknown id.
    pub fn reachable_from(&self, id: NodeId) -> AHashSet<NodeId> {
        let mut seen = AHashSet::new();
        if !self.nodes.contains_key(&id) {
            return seen;
        }
        let mut queue = VecDeque::from([id]);
        seen.insert(id);
        while let Some(current) = queue.pop_front() {
            for edge in self.outgoing_edges(current) {
                if self.nodes.contains_key(&edge.target) && seen.insert(edge.target) {
                    queue.push_back(edge.target);
                }
            }
        }
        seen
    }
}

/// Shape-consistency check applied on every node insertion or reconfiguration.
fn check_config(kind: &NodeKind) -> Result<(), GraphError> {
    match kind {
        NodeKind::Form(config) => {
            if let Some(dup) = config.fields.iter().map(|f| &f.id).duplicates().next() {
                return Err(GraphError::InvalidConfig {
                    kind: "form",
                    message: format!("duplicate field id '{}'", dup),
                });
            }
        }
        NodeKind::Conditional(config) => {
            if config.branches.len() > MAX_BRANCHES {
                return Err(GraphError::BranchLimit {
                    limit: MAX_BRANCHES,
                    got: config.branches.len(),
                });
            }
            if let Some(dup) = config.branches.iter().map(|b| &b.id).duplicates().next() {
                return Err(GraphError::InvalidConfig {
                    kind: "conditional",
                    message: format!("duplicate branch id '{}'", dup),
                });
            }
        }
        NodeKind::Start | NodeKind::End | NodeKind::Role(_) | NodeKind::Approval(_) => {}
    }
    Ok(())
}

/// Flat serialization mirror of [`WorkflowGraph`]. The adjacency indices and
/// id counters are derived state and are rebuilt on deserialization.
#[derive(Serialize, Deserialize, Clone)]
struct GraphSnapshot {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
}

impl From<WorkflowGraph> for GraphSnapshot {
    fn from(graph: WorkflowGraph) -> Self {
        GraphSnapshot {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().cloned().collect(),
        }
    }
}

impl From<GraphSnapshot> for WorkflowGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = WorkflowGraph::default();
        for node in snapshot.nodes {
            graph.next_node_id = graph.next_node_id.max(node.id.0 + 1);
            graph.node_order.push(node.id);
            graph.nodes.insert(node.id, node);
        }
        for edge in snapshot.edges {
            graph.next_edge_id = graph.next_edge_id.max(edge.id.0 + 1);
            graph.next_node_id = graph
                .next_node_id
                .max(edge.source.0 + 1)
                .max(edge.target.0 + 1);
            graph.edge_order.push(edge.id);
            graph.outgoing.entry(edge.source).or_default().push(edge.id);
            graph.incoming.entry(edge.target).or_default().push(edge.id);
            graph.edges.insert(edge.id, edge);
        }
        graph
    }
}
