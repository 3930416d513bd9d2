//! Common test utilities for building workflow graphs and directories.
use keiro::prelude::*;

/// The canonical approval workflow:
/// `Start -> Role(Writer) -> Approval(Manager)`, with `approved` routed to an
/// end node and `rejected` looping back to the writer for revision.
#[allow(dead_code)]
pub struct ApprovalFlow {
    pub graph: WorkflowGraph,
    pub start: NodeId,
    pub draft: NodeId,
    pub review: NodeId,
    pub done: NodeId,
}

#[allow(dead_code)]
pub fn create_approval_flow() -> ApprovalFlow {
    let mut graph = WorkflowGraph::new();
    let start = graph.add_node("Start", NodeKind::Start).unwrap();
    let draft = graph
        .add_node(
            "Draft",
            NodeKind::Role(RoleConfig {
                role_id: Some(RoleId("writer".to_string())),
                role_name: "Writer".to_string(),
            }),
        )
        .unwrap();
    let review = graph
        .add_node(
            "Review",
            NodeKind::Approval(ApprovalConfig {
                approver_role_id: Some(RoleId("manager".to_string())),
                approver_role_name: "Manager".to_string(),
            }),
        )
        .unwrap();
    let done = graph.add_node("Done", NodeKind::End).unwrap();

    graph.add_edge(start, draft, EdgeOutput::Default).unwrap();
    graph.add_edge(draft, review, EdgeOutput::Default).unwrap();
    graph
        .add_edge(review, done, EdgeOutput::Decision(Decision::Approved))
        .unwrap();
    graph
        .add_edge(review, draft, EdgeOutput::Decision(Decision::Rejected))
        .unwrap();

    ApprovalFlow {
        graph,
        start,
        draft,
        review,
        done,
    }
}

/// A form-fed conditional workflow:
/// `Start -> Form(amount) -> Conditional -> {High: End, Mid: End}` with the
/// branches `amount > 10` declared before `amount > 5`.
#[allow(dead_code)]
pub struct ConditionalFlow {
    pub graph: WorkflowGraph,
    pub start: NodeId,
    pub form: NodeId,
    pub gate: NodeId,
    pub end_high: NodeId,
    pub end_mid: NodeId,
}

#[allow(dead_code)]
pub fn amount_field() -> FieldId {
    FieldId("amount".to_string())
}

#[allow(dead_code)]
pub fn create_conditional_flow() -> ConditionalFlow {
    let mut graph = WorkflowGraph::new();
    let start = graph.add_node("Start", NodeKind::Start).unwrap();
    let form = graph
        .add_node(
            "Request",
            NodeKind::Form(FormConfig {
                form_name: "Request".to_string(),
                fields: vec![FormField {
                    id: amount_field(),
                    label: "Amount".to_string(),
                    field_type: FieldType::Number,
                    options: vec![],
                }],
            }),
        )
        .unwrap();
    let gate = graph
        .add_node(
            "Amount gate",
            NodeKind::Conditional(ConditionalConfig {
                source_form_node: Some(form),
                source_field: Some(amount_field()),
                branches: vec![
                    Branch {
                        id: BranchId("b-high".to_string()),
                        label: "High".to_string(),
                        condition: Condition::GreaterThan {
                            value: "10".to_string(),
                        },
                        color: "#e11".to_string(),
                    },
                    Branch {
                        id: BranchId("b-mid".to_string()),
                        label: "Mid".to_string(),
                        condition: Condition::GreaterThan {
                            value: "5".to_string(),
                        },
                        color: "#1e1".to_string(),
                    },
                ],
            }),
        )
        .unwrap();
    let end_high = graph.add_node("Done (high)", NodeKind::End).unwrap();
    let end_mid = graph.add_node("Done (mid)", NodeKind::End).unwrap();

    graph.add_edge(start, form, EdgeOutput::Default).unwrap();
    graph.add_edge(form, gate, EdgeOutput::Default).unwrap();
    graph
        .add_edge(gate, end_high, EdgeOutput::Branch(BranchId("b-high".to_string())))
        .unwrap();
    graph
        .add_edge(gate, end_mid, EdgeOutput::Branch(BranchId("b-mid".to_string())))
        .unwrap();

    ConditionalFlow {
        graph,
        start,
        form,
        gate,
        end_high,
        end_mid,
    }
}

/// Submits `amount` for the conditional flow's form.
#[allow(dead_code)]
pub fn amount_submission(amount: f64) -> HashMap<FieldId, FieldValue> {
    let mut values = HashMap::new();
    values.insert(amount_field(), FieldValue::Number(amount));
    values
}

/// A directory where both roles of the approval flow are staffed.
#[allow(dead_code)]
pub fn create_staffed_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_role(
            Role {
                id: RoleId("writer".to_string()),
                name: "Writer".to_string(),
                department_id: Some("editorial".to_string()),
            },
            3,
        )
        .with_role(
            Role {
                id: RoleId("manager".to_string()),
                name: "Manager".to_string(),
                department_id: None,
            },
            1,
        )
}
