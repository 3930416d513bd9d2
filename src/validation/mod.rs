//! Static analysis over a workflow graph.
//!
//! [`validate`] is a pure function: it never mutates the graph and never
//! fails. Every check runs — there is no short-circuiting — so the caller
//! receives the full list of problems in one pass, and both errors and
//! warnings come out in node-declaration order to keep reports deterministic.

pub mod issue;

pub use issue::ValidationIssue;

use crate::graph::{Decision, EdgeOutput, NodeId, NodeKind, WorkflowGraph};
use ahash::AHashMap;
use itertools::Itertools;

/// The complete outcome of validating one graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Blocking problems; a graph with any of these must not be activated.
    pub errors: Vec<ValidationIssue>,
    /// Non-blocking findings; surfaced but saving is still allowed.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, issue: ValidationIssue) {
        if issue.is_warning() {
            self.warnings.push(issue);
        } else {
            self.errors.push(issue);
        }
    }
}

/// Validates a workflow graph for save-time feedback.
///
/// Note that role staffing ("does this role have at least one user") is
/// deliberately not checked here; that is an activation-time concern handled
/// by [`check_activation`](crate::directory::check_activation), so drafts can
/// be built before staffing is finalized.
pub fn validate(graph: &WorkflowGraph) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_entry_and_exit(graph, &mut report);
    check_reachability(graph, &mut report);
    check_connectivity(graph, &mut report);
    check_config_completeness(graph, &mut report);
    check_branch_wiring(graph, &mut report);
    check_cycles(graph, &mut report);
    check_duplicate_decisions(graph, &mut report);

    report
}

/// Checks 1 and 2: exactly one start node, at least one end node.
fn check_entry_and_exit(graph: &WorkflowGraph, report: &mut ValidationReport) {
    let starts = graph
        .nodes()
        .filter(|n| matches!(n.kind, NodeKind::Start))
        .count();
    match starts {
        0 => report.push(ValidationIssue::MissingStart),
        1 => {}
        n => report.push(ValidationIssue::MultipleStart(n)),
    }

    let ends = graph
        .nodes()
        .filter(|n| matches!(n.kind, NodeKind::End))
        .count();
    if ends == 0 {
        report.push(ValidationIssue::MissingEnd);
    }
}

/// Check 3: every node must be reachable from the start node.
///
/// Skipped when there is not exactly one start node; the entry check already
/// reported that, and there is no meaningful root to search from.
fn check_reachability(graph: &WorkflowGraph, report: &mut ValidationReport) {
    let mut starts = graph.nodes().filter(|n| matches!(n.kind, NodeKind::Start));
    let (Some(start), None) = (starts.next(), starts.next()) else {
        return;
    };
    let reachable = graph.reachable_from(start.id);
    for node in graph.nodes() {
        if !reachable.contains(&node.id) {
            report.push(ValidationIssue::UnreachableNode {
                node: node.id,
                label: node.label.clone(),
            });
        }
    }
}

/// Check 4: no orphans (non-start node without inputs) and no dead ends
/// (non-end node without outputs), and the inverse rule on terminal nodes:
/// no edge leaves an end node or enters the start node. `add_edge` already
/// refuses the latter two, but the lenient import path admits them, so they
/// must surface here.
fn check_connectivity(graph: &WorkflowGraph, report: &mut ValidationReport) {
    for node in graph.nodes() {
        let has_incoming = graph.incoming_edges(node.id).next().is_some();
        let has_outgoing = graph.outgoing_edges(node.id).next().is_some();
        match &node.kind {
            NodeKind::Start => {
                if has_incoming {
                    report.push(ValidationIssue::EdgeIntoStart {
                        node: node.id,
                        label: node.label.clone(),
                    });
                }
            }
            NodeKind::End => {
                if has_outgoing {
                    report.push(ValidationIssue::EdgeFromEnd {
                        node: node.id,
                        label: node.label.clone(),
                    });
                }
            }
            _ => {}
        }
        if !matches!(node.kind, NodeKind::Start) && !has_incoming {
            report.push(ValidationIssue::OrphanNode {
                node: node.id,
                label: node.label.clone(),
            });
        }
        if !matches!(node.kind, NodeKind::End) && !has_outgoing {
            report.push(ValidationIssue::DeadEnd {
                node: node.id,
                label: node.label.clone(),
            });
        }
    }
}

/// Check 5: per-type config completeness.
fn check_config_completeness(graph: &WorkflowGraph, report: &mut ValidationReport) {
    for node in graph.nodes() {
        match &node.kind {
            NodeKind::Role(config) if config.role_id.is_none() => {
                report.push(ValidationIssue::UnconfiguredRole {
                    node: node.id,
                    label: node.label.clone(),
                });
            }
            NodeKind::Approval(config) if config.approver_role_id.is_none() => {
                report.push(ValidationIssue::UnconfiguredApproval {
                    node: node.id,
                    label: node.label.clone(),
                });
            }
            NodeKind::Form(config)
                if config.fields.is_empty() || config.form_name.trim().is_empty() =>
            {
                report.push(ValidationIssue::UnconfiguredForm {
                    node: node.id,
                    label: node.label.clone(),
                });
            }
            // A conditional with no branches is tolerated at save time; one
            // eventual default path may still be wired up later.
            NodeKind::Conditional(config) if config.branches.is_empty() => {
                report.push(ValidationIssue::UnconfiguredConditional {
                    node: node.id,
                    label: node.label.clone(),
                });
            }
            _ => {}
        }
    }
}

/// Check 6: branch/edge cross-references on conditional nodes.
///
/// An edge whose branch no longer exists on the node is an error (it would
/// route on a stale predicate); a branch with no edge is only a warning. A
/// conditional with branches must also be fed by an upstream form node that
/// actually carries the referenced field.
fn check_branch_wiring(graph: &WorkflowGraph, report: &mut ValidationReport) {
    for node in graph.nodes() {
        let NodeKind::Conditional(config) = &node.kind else {
            continue;
        };

        for edge in graph.outgoing_edges(node.id) {
            if let EdgeOutput::Branch(branch) = &edge.output
                && config.branch(branch).is_none()
            {
                report.push(ValidationIssue::DanglingEdgeReference {
                    node: node.id,
                    label: node.label.clone(),
                    edge: edge.id,
                    branch: branch.clone(),
                });
            }
        }

        if !config.branches.is_empty() && !has_upstream_form_source(graph, node.id, config) {
            report.push(ValidationIssue::DisconnectedConditional {
                node: node.id,
                label: node.label.clone(),
            });
        }

        for branch in &config.branches {
            let wired = graph
                .outgoing_edges(node.id)
                .any(|edge| edge.branch() == Some(&branch.id));
            if !wired {
                report.push(ValidationIssue::UnwiredBranch {
                    node: node.id,
                    label: node.label.clone(),
                    branch: branch.id.clone(),
                });
            }
        }
    }
}

fn has_upstream_form_source(
    graph: &WorkflowGraph,
    conditional: NodeId,
    config: &crate::graph::ConditionalConfig,
) -> bool {
    let (Some(form_id), Some(field_id)) = (config.source_form_node, &config.source_field) else {
        return false;
    };
    let Some(form_node) = graph.node(form_id) else {
        return false;
    };
    let NodeKind::Form(form_config) = &form_node.kind else {
        return false;
    };
    if form_config.field(field_id).is_none() {
        return false;
    }
    // Upstream means the form reaches the conditional, directly or transitively.
    graph.reachable_from(form_id).contains(&conditional)
}

/// Check 7: cycle policy. A depth-first search with in-progress marking finds
/// back-edges; the only tolerated back-edge is an approval node's `rejected`
/// decision looping work back to an earlier step, so those edges are excluded
/// from the traversal entirely.
fn check_cycles(graph: &WorkflowGraph, report: &mut ValidationReport) {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    fn visit(
        graph: &WorkflowGraph,
        node: NodeId,
        marks: &mut AHashMap<NodeId, Mark>,
        report: &mut ValidationReport,
    ) {
        marks.insert(node, Mark::InProgress);
        for edge in graph.outgoing_edges(node) {
            if is_rejection_loop_edge(graph, node, &edge.output) {
                continue;
            }
            if !graph.contains_node(edge.target) {
                continue;
            }
            match marks.get(&edge.target) {
                Some(Mark::InProgress) => {
                    let label = graph.node(node).map(|n| n.label.clone()).unwrap_or_default();
                    report.push(ValidationIssue::DisallowedCycle { node, label });
                }
                Some(Mark::Done) => {}
                None => visit(graph, edge.target, marks, report),
            }
        }
        marks.insert(node, Mark::Done);
    }

    let mut marks = AHashMap::new();
    let roots: Vec<NodeId> = graph.nodes().map(|n| n.id).collect();
    for root in roots {
        if !marks.contains_key(&root) {
            visit(graph, root, &mut marks, report);
        }
    }
}

fn is_rejection_loop_edge(graph: &WorkflowGraph, source: NodeId, output: &EdgeOutput) -> bool {
    matches!(output, EdgeOutput::Decision(Decision::Rejected))
        && graph
            .node(source)
            .is_some_and(|n| matches!(n.kind, NodeKind::Approval(_)))
}

/// Check 8: each decision outcome of an approval node may be wired at most
/// once. Wiring neither outcome, or only one, is allowed.
fn check_duplicate_decisions(graph: &WorkflowGraph, report: &mut ValidationReport) {
    for node in graph.nodes() {
        if !matches!(node.kind, NodeKind::Approval(_)) {
            continue;
        }
        let counts = graph
            .outgoing_edges(node.id)
            .filter_map(|edge| edge.decision())
            .counts();
        for decision in [Decision::Approved, Decision::Rejected] {
            if counts.get(&decision).copied().unwrap_or(0) > 1 {
                report.push(ValidationIssue::DuplicateDecisionTarget {
                    node: node.id,
                    label: node.label.clone(),
                    decision,
                });
            }
        }
    }
}
