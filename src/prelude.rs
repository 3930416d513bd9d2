//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions of the keiro crate,
//! so downstream code can `use keiro::prelude::*;` instead of importing each
//! item individually.

// Graph model
pub use crate::graph::{
    ApprovalConfig, Branch, BranchId, Condition, ConditionalConfig, Decision, EdgeId, EdgeOutput,
    FieldId, FieldType, FormConfig, FormField, NodeId, NodeKind, RoleConfig, RoleId, WorkflowEdge,
    WorkflowGraph, WorkflowNode,
};

// Validation
pub use crate::validation::{ValidationIssue, ValidationReport, validate};

// Routing
pub use crate::routing::{
    FieldValue, InstanceContext, InstanceState, StepEvent, StepOutcome, advance_to_rest,
    initial_state, step,
};

// Role directory and activation
pub use crate::directory::{
    ActivationIssue, InMemoryDirectory, Role, RoleDirectory, check_activation,
};

// Templates and conversion
pub use crate::template::{EditorExport, IntoWorkflow, WorkflowTemplate};

// Error types
pub use crate::error::{ConversionError, GraphError, RoutingFault, TemplateError};

// Standard library re-exports commonly used with this crate
pub use std::collections::HashMap;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
