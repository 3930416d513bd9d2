use super::node::{BranchId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an edge inside a [`WorkflowGraph`](super::WorkflowGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Outcome of an approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which named output of the source node an edge leaves through.
///
/// `Default` is the single anonymous output of start, role and form nodes.
/// `Decision` edges leave approval nodes; `Branch` edges leave conditional
/// nodes through one configured branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOutput {
    Default,
    Decision(Decision),
    Branch(BranchId),
}

impl fmt::Display for EdgeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOutput::Default => f.write_str("default"),
            EdgeOutput::Decision(d) => write!(f, "{}", d),
            EdgeOutput::Branch(b) => write!(f, "branch:{}", b),
        }
    }
}

/// A directed connection between two workflow nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub output: EdgeOutput,
    /// Optional display label from the authoring UI; not interpreted here.
    #[serde(default)]
    pub label: Option<String>,
}

impl WorkflowEdge {
    /// The decision this edge routes, if it leaves an approval node.
    pub fn decision(&self) -> Option<Decision> {
        match self.output {
            EdgeOutput::Decision(d) => Some(d),
            _ => None,
        }
    }

    /// The branch this edge routes, if it leaves a conditional node.
    pub fn branch(&self) -> Option<&BranchId> {
        match &self.output {
            EdgeOutput::Branch(b) => Some(b),
            _ => None,
        }
    }
}
