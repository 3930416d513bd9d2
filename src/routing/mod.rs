//! The runtime routing engine.
//!
//! A running instance is tracked as an [`InstanceState`] plus an
//! [`InstanceContext`] of accumulated decisions and form submissions.
//! [`step`] is a pure function over `(graph, state, context, event)`: it
//! produces a fresh [`StepOutcome`] instead of mutating anything in place,
//! which makes it idempotent for a given input and safe to call from
//! concurrent advancement requests as long as the caller serializes the
//! steps of each individual instance. Persisting state between steps and
//! delivering each external event exactly once are the caller's job.

mod condition;
mod engine;

use crate::error::RoutingFault;
use crate::graph::{Decision, FieldId, NodeId, WorkflowGraph};
use ahash::AHashMap;
use engine::StepEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a running instance currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstanceState {
    /// At a node the engine can process without external input.
    Active(NodeId),
    /// Blocked at an approval node until a decision arrives.
    AwaitingApproval(NodeId),
    /// Blocked at a form node until field values arrive.
    AwaitingFormSubmission(NodeId),
    /// Reached an end node; terminal.
    Completed,
}

impl InstanceState {
    pub fn name(&self) -> &'static str {
        match self {
            InstanceState::Active(_) => "active",
            InstanceState::AwaitingApproval(_) => "awaiting_approval",
            InstanceState::AwaitingFormSubmission(_) => "awaiting_form_submission",
            InstanceState::Completed => "completed",
        }
    }

    /// The node the instance sits at, unless it already completed.
    pub fn current_node(&self) -> Option<NodeId> {
        match self {
            InstanceState::Active(n)
            | InstanceState::AwaitingApproval(n)
            | InstanceState::AwaitingFormSubmission(n) => Some(*n),
            InstanceState::Completed => None,
        }
    }
}

/// An input to one routing step: either the internal clock tick that moves
/// the instance through non-blocking nodes, or an external event delivered
/// by the orchestration layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    /// Process the current node without external input.
    Advance,
    /// An approver's verdict for the awaited approval node.
    Decision(Decision),
    /// Submitted field values for the awaited form node.
    FormSubmission(HashMap<FieldId, FieldValue>),
}

impl StepEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StepEvent::Advance => "advance",
            StepEvent::Decision(_) => "decision",
            StepEvent::FormSubmission(_) => "form_submission",
        }
    }
}

/// A runtime value submitted for one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Selected options of a multiselect field.
    Selection(Vec<String>),
    /// The field was left blank.
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Selection(options) => options.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// Numeric view of the value, parsing text on the fly.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) | FieldValue::Selection(_) | FieldValue::Empty => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Selection(options) => f.write_str(&options.join(", ")),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// Everything an instance has accumulated so far: form submissions keyed by
/// the form node that collected them, and the approval decision history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceContext {
    submissions: AHashMap<NodeId, AHashMap<FieldId, FieldValue>>,
    decisions: Vec<(NodeId, Decision)>,
}

impl InstanceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored submission of one form node, if it was ever submitted.
    pub fn submission(&self, form_node: NodeId) -> Option<&AHashMap<FieldId, FieldValue>> {
        self.submissions.get(&form_node)
    }

    /// Approval decisions in the order they were taken.
    pub fn decisions(&self) -> &[(NodeId, Decision)] {
        &self.decisions
    }

    pub(crate) fn record_submission(
        &mut self,
        form_node: NodeId,
        values: HashMap<FieldId, FieldValue>,
    ) {
        // A re-visited form (rejection loop) overwrites its earlier values.
        self.submissions.insert(form_node, values.into_iter().collect());
    }

    pub(crate) fn record_decision(&mut self, node: NodeId, decision: Decision) {
        self.decisions.push((node, decision));
    }
}

/// The result of one successful routing step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: InstanceState,
    pub context: InstanceContext,
}

/// Creates the initial state of a fresh instance of `graph`, positioned at
/// its start node. Returns `None` when the graph has no start node, which a
/// validated template never has.
pub fn initial_state(graph: &WorkflowGraph) -> Option<InstanceState> {
    graph.start_node().map(|start| InstanceState::Active(start.id))
}

/// Applies one event to one instance state, yielding the next state and
/// context or an instance-fatal [`RoutingFault`].
///
/// The engine performs no retries and guesses no fallback path: a fault
/// means the template needs human correction, and the caller should persist
/// it for operator review.
pub fn step(
    graph: &WorkflowGraph,
    state: &InstanceState,
    context: &InstanceContext,
    event: StepEvent,
) -> Result<StepOutcome, RoutingFault> {
    StepEngine::new(graph).apply(state, context, event)
}

/// Repeatedly applies [`StepEvent::Advance`] until the instance blocks on
/// external input or completes.
///
/// Automatic transitions are bounded by the node count; exceeding the bound
/// means a cycle without any pausing node slipped past validation, and the
/// instance faults instead of spinning forever.
pub fn advance_to_rest(
    graph: &WorkflowGraph,
    state: &InstanceState,
    context: &InstanceContext,
) -> Result<StepOutcome, RoutingFault> {
    let mut outcome = StepOutcome {
        state: state.clone(),
        context: context.clone(),
    };
    let mut steps = 0usize;
    while let InstanceState::Active(node) = outcome.state {
        if steps > graph.node_count() {
            return Err(RoutingFault::RunawayLoop { node });
        }
        steps += 1;
        outcome = step(graph, &outcome.state, &outcome.context, StepEvent::Advance)?;
    }
    Ok(outcome)
}
