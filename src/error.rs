use crate::graph::{BranchId, Decision, FieldId, NodeId};
use thiserror::Error;

/// Errors raised by graph mutation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' does not exist in the graph")]
    UnknownNode(NodeId),

    // Not named `source`: thiserror reserves that field for error chaining.
    #[error("Output '{output}' of node '{source_node}' is already routed to node '{existing_target}'")]
    DuplicateHandleTarget {
        source_node: NodeId,
        output: String,
        existing_target: NodeId,
    },

    #[error("Invalid {kind} node configuration: {message}")]
    InvalidConfig {
        kind: &'static str,
        message: String,
    },

    #[error("A conditional node may declare at most {limit} branches, got {got}")]
    BranchLimit { limit: usize, got: usize },
}

/// Runtime faults of the routing engine. Every variant is fatal to the
/// running instance: it marks a template defect that escaped validation and
/// needs operator correction, so the engine never retries or guesses a
/// fallback path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingFault {
    #[error("Node '{0}' referenced by the running instance does not exist in the graph")]
    MissingNode(NodeId),

    #[error("Approval node '{node}' has no outgoing edge for decision '{decision}'")]
    NoRouteForDecision { node: NodeId, decision: Decision },

    #[error("No branch of conditional node '{node}' matched the value '{value}'")]
    NoBranchMatched { node: NodeId, value: String },

    #[error("Branch '{branch}' of conditional node '{node}' matched but has no outgoing edge")]
    NoRouteForBranch { node: NodeId, branch: BranchId },

    #[error("Conditional node '{node}' has no source form field bound")]
    UnboundConditional { node: NodeId },

    #[error(
        "Conditional node '{node}' reads field '{field}' of form node '{form_node}', but the instance holds no submission for that form"
    )]
    MissingFormValue {
        node: NodeId,
        form_node: NodeId,
        field: FieldId,
    },

    #[error("Node '{node}' has no outgoing edge to advance along")]
    NoOutgoingEdge { node: NodeId },

    #[error("Instance in state '{state}' cannot accept event '{event}'")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },

    #[error("Instance cycled through node '{node}' without reaching external input or an end node")]
    RunawayLoop { node: NodeId },
}

/// Errors raised while converting an external editor format into a
/// [`WorkflowGraph`](crate::graph::WorkflowGraph).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Unknown node type '{0}' in imported definition")]
    UnknownNodeType(String),

    #[error("Edge '{edge}' references undefined node id '{node}'")]
    UnknownNodeRef { edge: String, node: String },

    #[error("Invalid imported data: {0}")]
    Malformed(String),
}

/// Errors raised when freezing, saving or loading a workflow template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Cannot freeze a template from a graph with {0} validation error(s)")]
    InvalidGraph(usize),

    #[error("Template file I/O failed: {0}")]
    Io(String),

    #[error("Template encoding failed: {0}")]
    Encode(String),

    #[error("Template decoding failed: {0}")]
    Decode(String),
}
