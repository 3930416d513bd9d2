//! # Keiro - Workflow Graph Validation and Routing Engine
//!
//! **Keiro** models workflows as directed graphs of typed nodes — start,
//! role assignment, approval gate, form collection, conditional branch, end —
//! and provides the two engines the surrounding application needs: static
//! validation of an authored graph, and runtime routing of a running
//! instance through it.
//!
//! ## Core Workflow
//!
//! 1.  **Author or import a graph**: build a [`WorkflowGraph`](graph::WorkflowGraph)
//!     through its mutation API, or convert an editor's JSON export with the
//!     [`IntoWorkflow`](template::IntoWorkflow) trait.
//! 2.  **Validate**: [`validate`](validation::validate) returns every blocking
//!     error and non-blocking warning at once, in deterministic order, for
//!     save-time feedback.
//! 3.  **Freeze**: a graph with no validation errors becomes an immutable
//!     [`WorkflowTemplate`](template::WorkflowTemplate); the activation-time
//!     staffing check runs against the caller's
//!     [`RoleDirectory`](directory::RoleDirectory).
//! 4.  **Route**: each running instance is a `(state, context)` pair advanced
//!     one step at a time by the pure [`step`](routing::step) function, which
//!     either produces the next state or surfaces an instance-fatal
//!     [`RoutingFault`](error::RoutingFault).
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//!
//! fn main() -> keiro::prelude::Result<()> {
//!     let mut graph = WorkflowGraph::new();
//!     let start = graph.add_node("Start", NodeKind::Start)?;
//!     let draft = graph.add_node(
//!         "Draft",
//!         NodeKind::Role(RoleConfig {
//!             role_id: Some(RoleId("writer".into())),
//!             role_name: "Writer".into(),
//!         }),
//!     )?;
//!     let review = graph.add_node(
//!         "Review",
//!         NodeKind::Approval(ApprovalConfig {
//!             approver_role_id: Some(RoleId("manager".into())),
//!             approver_role_name: "Manager".into(),
//!         }),
//!     )?;
//!     let done = graph.add_node("Done", NodeKind::End)?;
//!
//!     graph.add_edge(start, draft, EdgeOutput::Default)?;
//!     graph.add_edge(draft, review, EdgeOutput::Default)?;
//!     graph.add_edge(review, done, EdgeOutput::Decision(Decision::Approved))?;
//!     // A rejection sends the work back for revision; this is the one
//!     // cycle shape validation tolerates.
//!     graph.add_edge(review, draft, EdgeOutput::Decision(Decision::Rejected))?;
//!
//!     let report = validate(&graph);
//!     assert!(report.is_valid());
//!
//!     // Run an instance: auto-advance to the approval gate, approve, finish.
//!     let state = initial_state(&graph).expect("validated graph has a start node");
//!     let resting = advance_to_rest(&graph, &state, &InstanceContext::new())?;
//!     assert_eq!(resting.state, InstanceState::AwaitingApproval(review));
//!
//!     let decided = step(
//!         &graph,
//!         &resting.state,
//!         &resting.context,
//!         StepEvent::Decision(Decision::Approved),
//!     )?;
//!     let finished = advance_to_rest(&graph, &decided.state, &decided.context)?;
//!     assert_eq!(finished.state, InstanceState::Completed);
//!     Ok(())
//! }
//! ```

pub mod directory;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod routing;
pub mod template;
pub mod validation;
