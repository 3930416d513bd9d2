use crate::graph::{BranchId, Decision, EdgeId, NodeId};
use thiserror::Error;

/// A single finding of the validation engine.
///
/// Issues are data, not control flow: [`validate`](super::validate) always
/// returns the complete list so the authoring UI can render every problem at
/// once. [`is_warning`](Self::is_warning) splits the taxonomy into blocking
/// errors and non-blocking warnings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("Workflow has no start node")]
    MissingStart,

    #[error("Workflow has {0} start nodes, expected exactly one")]
    MultipleStart(usize),

    #[error("Workflow has no end node")]
    MissingEnd,

    #[error("Node '{label}' ({node}) cannot be reached from the start node")]
    UnreachableNode { node: NodeId, label: String },

    #[error("Node '{label}' ({node}) has no incoming connections")]
    OrphanNode { node: NodeId, label: String },

    #[error("Node '{label}' ({node}) has no outgoing connections")]
    DeadEnd { node: NodeId, label: String },

    #[error("End node '{label}' ({node}) has outgoing connections")]
    EdgeFromEnd { node: NodeId, label: String },

    #[error("Start node '{label}' ({node}) has incoming connections")]
    EdgeIntoStart { node: NodeId, label: String },

    #[error("Role node '{label}' ({node}) has no role assigned")]
    UnconfiguredRole { node: NodeId, label: String },

    #[error("Approval node '{label}' ({node}) has no approver role assigned")]
    UnconfiguredApproval { node: NodeId, label: String },

    #[error("Form node '{label}' ({node}) needs a name and at least one field")]
    UnconfiguredForm { node: NodeId, label: String },

    #[error("Conditional node '{label}' ({node}) has no branches configured")]
    UnconfiguredConditional { node: NodeId, label: String },

    #[error("Branch '{branch}' of conditional node '{label}' ({node}) has no outgoing edge")]
    UnwiredBranch {
        node: NodeId,
        label: String,
        branch: BranchId,
    },

    #[error(
        "Edge {edge} leaves conditional node '{label}' ({node}) through branch '{branch}', which is not configured on the node"
    )]
    DanglingEdgeReference {
        node: NodeId,
        label: String,
        edge: EdgeId,
        branch: BranchId,
    },

    #[error(
        "Conditional node '{label}' ({node}) is not fed by an upstream form node carrying its source field"
    )]
    DisconnectedConditional { node: NodeId, label: String },

    #[error("Cycle through the edge leaving node '{label}' ({node}) is not an approval rejection loop")]
    DisallowedCycle { node: NodeId, label: String },

    #[error("Approval node '{label}' ({node}) routes decision '{decision}' to more than one target")]
    DuplicateDecisionTarget {
        node: NodeId,
        label: String,
        decision: Decision,
    },
}

impl ValidationIssue {
    /// Warnings surface to the author but do not block saving the graph.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ValidationIssue::UnconfiguredConditional { .. } | ValidationIssue::UnwiredBranch { .. }
        )
    }

    /// Stable machine-readable code for UI mapping and log filtering.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::MissingStart => "missing_start",
            ValidationIssue::MultipleStart(_) => "multiple_start",
            ValidationIssue::MissingEnd => "missing_end",
            ValidationIssue::UnreachableNode { .. } => "unreachable_node",
            ValidationIssue::OrphanNode { .. } => "orphan_node",
            ValidationIssue::DeadEnd { .. } => "dead_end",
            ValidationIssue::EdgeFromEnd { .. } => "edge_from_end",
            ValidationIssue::EdgeIntoStart { .. } => "edge_into_start",
            ValidationIssue::UnconfiguredRole { .. } => "unconfigured_role",
            ValidationIssue::UnconfiguredApproval { .. } => "unconfigured_approval",
            ValidationIssue::UnconfiguredForm { .. } => "unconfigured_form",
            ValidationIssue::UnconfiguredConditional { .. } => "unconfigured_conditional",
            ValidationIssue::UnwiredBranch { .. } => "unwired_branch",
            ValidationIssue::DanglingEdgeReference { .. } => "dangling_edge_reference",
            ValidationIssue::DisconnectedConditional { .. } => "disconnected_conditional",
            ValidationIssue::DisallowedCycle { .. } => "disallowed_cycle",
            ValidationIssue::DuplicateDecisionTarget { .. } => "duplicate_decision_target",
        }
    }
}
