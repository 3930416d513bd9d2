//! Routing engine tests: auto-advancement, approval decisions, conditional
//! first-match routing and the fault taxonomy.
mod common;
use common::*;
use keiro::prelude::*;

#[test]
fn test_auto_advance_to_approval() {
    let flow = create_approval_flow();
    let state = initial_state(&flow.graph).unwrap();
    assert_eq!(state, InstanceState::Active(flow.start));

    let resting = advance_to_rest(&flow.graph, &state, &InstanceContext::new()).unwrap();
    assert_eq!(resting.state, InstanceState::AwaitingApproval(flow.review));
}

#[test]
fn test_approval_routes_by_decision() {
    let flow = create_approval_flow();
    let waiting = InstanceState::AwaitingApproval(flow.review);
    let context = InstanceContext::new();

    let approved = step(
        &flow.graph,
        &waiting,
        &context,
        StepEvent::Decision(Decision::Approved),
    )
    .unwrap();
    assert_eq!(approved.state, InstanceState::Active(flow.done));

    let rejected = step(
        &flow.graph,
        &waiting,
        &context,
        StepEvent::Decision(Decision::Rejected),
    )
    .unwrap();
    assert_eq!(rejected.state, InstanceState::Active(flow.draft));
}

#[test]
fn test_decision_history_is_recorded() {
    let flow = create_approval_flow();
    let waiting = InstanceState::AwaitingApproval(flow.review);
    let outcome = step(
        &flow.graph,
        &waiting,
        &InstanceContext::new(),
        StepEvent::Decision(Decision::Rejected),
    )
    .unwrap();
    assert_eq!(outcome.context.decisions(), &[(flow.review, Decision::Rejected)]);
}

#[test]
fn test_fault_on_unwired_decision() {
    let mut flow = create_approval_flow();
    let rejected_edge = flow
        .graph
        .outgoing_edges(flow.review)
        .find(|e| e.decision() == Some(Decision::Rejected))
        .map(|e| e.id)
        .unwrap();
    flow.graph.remove_edge(rejected_edge);

    let fault = step(
        &flow.graph,
        &InstanceState::AwaitingApproval(flow.review),
        &InstanceContext::new(),
        StepEvent::Decision(Decision::Rejected),
    )
    .unwrap_err();
    assert_eq!(
        fault,
        RoutingFault::NoRouteForDecision {
            node: flow.review,
            decision: Decision::Rejected,
        }
    );
}

#[test]
fn test_form_submission_is_stored_and_advances() {
    let flow = create_conditional_flow();
    let state = initial_state(&flow.graph).unwrap();
    let resting = advance_to_rest(&flow.graph, &state, &InstanceContext::new()).unwrap();
    assert_eq!(resting.state, InstanceState::AwaitingFormSubmission(flow.form));

    let submitted = step(
        &flow.graph,
        &resting.state,
        &resting.context,
        StepEvent::FormSubmission(amount_submission(20.0)),
    )
    .unwrap();
    assert_eq!(submitted.state, InstanceState::Active(flow.gate));
    assert!(submitted.context.submission(flow.form).is_some());
}

#[test]
fn test_conditional_first_match_wins() {
    let flow = create_conditional_flow();
    // 20 satisfies both "> 10" and "> 5"; declaration order decides.
    let outcome = run_with_amount(&flow, 20.0).unwrap();
    assert_eq!(outcome.state, InstanceState::Completed);

    // Re-route manually to observe the intermediate hop.
    let mut context = InstanceContext::new();
    let resting = advance_to_rest(
        &flow.graph,
        &initial_state(&flow.graph).unwrap(),
        &context,
    )
    .unwrap();
    context = resting.context;
    let submitted = step(
        &flow.graph,
        &resting.state,
        &context,
        StepEvent::FormSubmission(amount_submission(20.0)),
    )
    .unwrap();
    let routed = step(
        &flow.graph,
        &submitted.state,
        &submitted.context,
        StepEvent::Advance,
    )
    .unwrap();
    assert_eq!(routed.state, InstanceState::Active(flow.end_high));
}

#[test]
fn test_conditional_second_branch() {
    let flow = create_conditional_flow();
    let submitted = submit_amount(&flow, 7.0);
    let routed = step(
        &flow.graph,
        &submitted.state,
        &submitted.context,
        StepEvent::Advance,
    )
    .unwrap();
    assert_eq!(routed.state, InstanceState::Active(flow.end_mid));
}

#[test]
fn test_fault_when_no_branch_matches() {
    let flow = create_conditional_flow();
    let submitted = submit_amount(&flow, 3.0);
    let fault = step(
        &flow.graph,
        &submitted.state,
        &submitted.context,
        StepEvent::Advance,
    )
    .unwrap_err();
    assert_eq!(
        fault,
        RoutingFault::NoBranchMatched {
            node: flow.gate,
            value: "3".to_string(),
        }
    );
}

#[test]
fn test_fault_on_missing_form_submission() {
    let flow = create_conditional_flow();
    // Jump straight to the gate without ever submitting the form.
    let fault = step(
        &flow.graph,
        &InstanceState::Active(flow.gate),
        &InstanceContext::new(),
        StepEvent::Advance,
    )
    .unwrap_err();
    assert!(matches!(
        fault,
        RoutingFault::MissingFormValue { node, form_node, .. }
            if node == flow.gate && form_node == flow.form
    ));
}

#[test]
fn test_fault_on_matched_but_unwired_branch() {
    let mut flow = create_conditional_flow();
    let high_edge = flow
        .graph
        .outgoing_edges(flow.gate)
        .find(|e| e.branch() == Some(&BranchId("b-high".to_string())))
        .map(|e| e.id)
        .unwrap();
    flow.graph.remove_edge(high_edge);

    let submitted = submit_amount(&flow, 20.0);
    let fault = step(
        &flow.graph,
        &submitted.state,
        &submitted.context,
        StepEvent::Advance,
    )
    .unwrap_err();
    assert_eq!(
        fault,
        RoutingFault::NoRouteForBranch {
            node: flow.gate,
            branch: BranchId("b-high".to_string()),
        }
    );
}

#[test]
fn test_fault_on_unexpected_event() {
    let flow = create_approval_flow();
    let fault = step(
        &flow.graph,
        &InstanceState::Active(flow.start),
        &InstanceContext::new(),
        StepEvent::Decision(Decision::Approved),
    )
    .unwrap_err();
    assert_eq!(
        fault,
        RoutingFault::UnexpectedEvent {
            state: "active",
            event: "decision",
        }
    );

    let completed = step(
        &flow.graph,
        &InstanceState::Completed,
        &InstanceContext::new(),
        StepEvent::Advance,
    )
    .unwrap_err();
    assert_eq!(
        completed,
        RoutingFault::UnexpectedEvent {
            state: "completed",
            event: "advance",
        }
    );
}

#[test]
fn test_fault_on_missing_node() {
    let flow = create_approval_flow();
    let fault = step(
        &flow.graph,
        &InstanceState::Active(NodeId(99)),
        &InstanceContext::new(),
        StepEvent::Advance,
    )
    .unwrap_err();
    assert_eq!(fault, RoutingFault::MissingNode(NodeId(99)));
}

#[test]
fn test_step_is_pure() {
    let flow = create_approval_flow();
    let waiting = InstanceState::AwaitingApproval(flow.review);
    let context = InstanceContext::new();
    let first = step(
        &flow.graph,
        &waiting,
        &context,
        StepEvent::Decision(Decision::Approved),
    )
    .unwrap();
    let second = step(
        &flow.graph,
        &waiting,
        &context,
        StepEvent::Decision(Decision::Approved),
    )
    .unwrap();
    assert_eq!(first, second);
    // The caller's context is untouched.
    assert!(context.decisions().is_empty());
}

#[test]
fn test_runaway_cycle_faults_instead_of_spinning() {
    let mut graph = WorkflowGraph::new();
    let start = graph.add_node("Start", NodeKind::Start).unwrap();
    let a = graph
        .add_node("A", NodeKind::Role(RoleConfig::default()))
        .unwrap();
    let b = graph
        .add_node("B", NodeKind::Role(RoleConfig::default()))
        .unwrap();
    graph.add_edge(start, a, EdgeOutput::Default).unwrap();
    graph.add_edge(a, b, EdgeOutput::Default).unwrap();
    graph.add_edge(b, a, EdgeOutput::Default).unwrap();

    let fault = advance_to_rest(
        &graph,
        &InstanceState::Active(start),
        &InstanceContext::new(),
    )
    .unwrap_err();
    assert!(matches!(fault, RoutingFault::RunawayLoop { .. }));
}

// --- helpers ---

fn submit_amount(flow: &ConditionalFlow, amount: f64) -> StepOutcome {
    let resting = advance_to_rest(
        &flow.graph,
        &initial_state(&flow.graph).unwrap(),
        &InstanceContext::new(),
    )
    .unwrap();
    step(
        &flow.graph,
        &resting.state,
        &resting.context,
        StepEvent::FormSubmission(amount_submission(amount)),
    )
    .unwrap()
}

fn run_with_amount(flow: &ConditionalFlow, amount: f64) -> Result<StepOutcome> {
    let submitted = submit_amount(flow, amount);
    Ok(advance_to_rest(
        &flow.graph,
        &submitted.state,
        &submitted.context,
    )?)
}
