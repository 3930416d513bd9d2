use super::{FieldValue, InstanceContext, InstanceState, StepEvent, StepOutcome};
use crate::error::RoutingFault;
use crate::graph::{
    ConditionalConfig, Decision, FieldId, NodeId, NodeKind, WorkflowGraph, WorkflowNode,
};
use std::collections::HashMap;

/// The single-step transition engine over one graph snapshot.
pub(super) struct StepEngine<'a> {
    graph: &'a WorkflowGraph,
}

impl<'a> StepEngine<'a> {
    pub(super) fn new(graph: &'a WorkflowGraph) -> Self {
        Self { graph }
    }

    pub(super) fn apply(
        &self,
        state: &InstanceState,
        context: &InstanceContext,
        event: StepEvent,
    ) -> Result<StepOutcome, RoutingFault> {
        match state {
            InstanceState::Active(node_id) => {
                let node = self.node(*node_id)?;
                match event {
                    StepEvent::Advance => self.advance_from(node, context.clone()),
                    other => Err(RoutingFault::UnexpectedEvent {
                        state: state.name(),
                        event: other.name(),
                    }),
                }
            }
            InstanceState::AwaitingApproval(node_id) => {
                let node = self.node(*node_id)?;
                match event {
                    StepEvent::Decision(decision) => {
                        self.apply_decision(node, context.clone(), decision)
                    }
                    other => Err(RoutingFault::UnexpectedEvent {
                        state: state.name(),
                        event: other.name(),
                    }),
                }
            }
            InstanceState::AwaitingFormSubmission(node_id) => {
                let node = self.node(*node_id)?;
                match event {
                    StepEvent::FormSubmission(values) => {
                        self.apply_submission(node, context.clone(), values)
                    }
                    other => Err(RoutingFault::UnexpectedEvent {
                        state: state.name(),
                        event: other.name(),
                    }),
                }
            }
            InstanceState::Completed => Err(RoutingFault::UnexpectedEvent {
                state: state.name(),
                event: event.name(),
            }),
        }
    }

    fn node(&self, id: NodeId) -> Result<&WorkflowNode, RoutingFault> {
        self.graph.node(id).ok_or(RoutingFault::MissingNode(id))
    }

    /// Processes an `Active` node. Role and start nodes auto-advance along
    /// their single successor; approval and form nodes park the instance to
    /// await external input; a conditional routes on its stored form value;
    /// an end node completes the instance.
    fn advance_from(
        &self,
        node: &WorkflowNode,
        context: InstanceContext,
    ) -> Result<StepOutcome, RoutingFault> {
        let state = match &node.kind {
            NodeKind::Start | NodeKind::Role(_) => {
                InstanceState::Active(self.single_successor(node.id)?)
            }
            NodeKind::Approval(_) => InstanceState::AwaitingApproval(node.id),
            NodeKind::Form(_) => InstanceState::AwaitingFormSubmission(node.id),
            NodeKind::Conditional(config) => {
                InstanceState::Active(self.route_conditional(node.id, config, &context)?)
            }
            NodeKind::End => InstanceState::Completed,
        };
        Ok(StepOutcome { state, context })
    }

    /// Routes an awaited approval along the edge wired for `decision`.
    fn apply_decision(
        &self,
        node: &WorkflowNode,
        mut context: InstanceContext,
        decision: Decision,
    ) -> Result<StepOutcome, RoutingFault> {
        let edge = self
            .graph
            .outgoing_edges(node.id)
            .find(|edge| edge.decision() == Some(decision))
            .ok_or(RoutingFault::NoRouteForDecision {
                node: node.id,
                decision,
            })?;
        context.record_decision(node.id, decision);
        Ok(StepOutcome {
            state: InstanceState::Active(edge.target),
            context,
        })
    }

    /// Stores the submitted values keyed by the form node, then advances
    /// along the form's single successor. Forms never branch themselves;
    /// branching happens downstream at a conditional node.
    fn apply_submission(
        &self,
        node: &WorkflowNode,
        mut context: InstanceContext,
        values: HashMap<FieldId, FieldValue>,
    ) -> Result<StepOutcome, RoutingFault> {
        context.record_submission(node.id, values);
        Ok(StepOutcome {
            state: InstanceState::Active(self.single_successor(node.id)?),
            context,
        })
    }

    /// Evaluates the branches of a conditional node in declaration order and
    /// routes along the first match. No implicit default path exists: no
    /// match is a fault, not a silent stall.
    fn route_conditional(
        &self,
        node_id: NodeId,
        config: &ConditionalConfig,
        context: &InstanceContext,
    ) -> Result<NodeId, RoutingFault> {
        if config.branches.is_empty() {
            return Err(RoutingFault::NoBranchMatched {
                node: node_id,
                value: String::new(),
            });
        }

        let (Some(form_node), Some(field)) = (config.source_form_node, &config.source_field)
        else {
            return Err(RoutingFault::UnboundConditional { node: node_id });
        };
        let submission =
            context
                .submission(form_node)
                .ok_or_else(|| RoutingFault::MissingFormValue {
                    node: node_id,
                    form_node,
                    field: field.clone(),
                })?;
        // A submitted form with this field left blank evaluates as empty,
        // so is_empty branches still apply.
        let value = submission.get(field).cloned().unwrap_or(FieldValue::Empty);

        for branch in &config.branches {
            if !branch.condition.matches(&value) {
                continue;
            }
            let edge = self
                .graph
                .outgoing_edges(node_id)
                .find(|edge| edge.branch() == Some(&branch.id))
                .ok_or_else(|| RoutingFault::NoRouteForBranch {
                    node: node_id,
                    branch: branch.id.clone(),
                })?;
            return Ok(edge.target);
        }

        Err(RoutingFault::NoBranchMatched {
            node: node_id,
            value: value.to_string(),
        })
    }

    /// The single real successor of a start, role or form node.
    fn single_successor(&self, node_id: NodeId) -> Result<NodeId, RoutingFault> {
        self.graph
            .outgoing_edges(node_id)
            .next()
            .map(|edge| edge.target)
            .ok_or(RoutingFault::NoOutgoingEdge { node: node_id })
    }
}
