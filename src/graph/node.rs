use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node inside a [`WorkflowGraph`](super::WorkflowGraph).
///
/// Ids are allocated by the graph arena and are never reused within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier of a role in the external role directory. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub String);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a field inside a form node's field list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub String);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a branch configured on a conditional node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub String);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single step of a workflow. The config payload lives on the kind variant,
/// so a node can never carry config for the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
}

/// The type of a workflow node together with its type-specific configuration.
///
/// Config may be incomplete while a graph is being authored (e.g. a role node
/// with no role picked yet); [`validate`](crate::validation::validate) flags
/// incomplete config, the graph model itself does not reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Start,
    End,
    Role(RoleConfig),
    Approval(ApprovalConfig),
    Form(FormConfig),
    Conditional(ConditionalConfig),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Role(_) => "role",
            NodeKind::Approval(_) => "approval",
            NodeKind::Form(_) => "form",
            NodeKind::Conditional(_) => "conditional",
        }
    }
}

/// Config of a role-assignment node: the role the step is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub role_id: Option<RoleId>,
    pub role_name: String,
}

/// Config of an approval gate. Every approval node implicitly exposes the two
/// decision outcomes `approved` and `rejected`; no branch setup is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalConfig {
    pub approver_role_id: Option<RoleId>,
    pub approver_role_name: String,
}

/// Config of a form-collection node: an ordered list of typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    pub form_name: String,
    pub fields: Vec<FormField>,
}

impl FormConfig {
    pub fn field(&self, id: &FieldId) -> Option<&FormField> {
        self.fields.iter().find(|f| &f.id == id)
    }
}

/// A typed field definition inside a form node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub id: FieldId,
    pub label: String,
    pub field_type: FieldType,
    /// Enumerated choices for `Dropdown` / `MultiSelect` fields, empty otherwise.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    #[serde(rename = "textarea")]
    TextArea,
    Email,
    Url,
    Number,
    Date,
    Dropdown,
    #[serde(rename = "multiselect")]
    MultiSelect,
    Checkbox,
}

/// The most branches a single conditional node may declare.
pub const MAX_BRANCHES: usize = 5;

/// Config of a conditional branch point. Branch predicates read one field of
/// one upstream form node; branches are evaluated in declaration order and
/// the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalConfig {
    pub source_form_node: Option<NodeId>,
    pub source_field: Option<FieldId>,
    pub branches: Vec<Branch>,
}

impl ConditionalConfig {
    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| &b.id == id)
    }
}

/// A named condition attached to a conditional node. Each branch maps its
/// predicate to at most one outgoing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub label: String,
    pub condition: Condition,
    /// Display color carried through for the authoring UI; not interpreted here.
    #[serde(default)]
    pub color: String,
}

/// A branch predicate over a form field value.
///
/// Comparison values are stored as strings, exactly as the authoring editor
/// produces them; numeric conditions parse them at evaluation time. The
/// matching logic lives in [`Condition::matches`](crate::routing), next to
/// the routing engine that applies it.
///
/// Externally tagged on the wire: template artifacts go through bincode,
/// which cannot decode internally tagged enums. The editor's `conditionType`
/// string is mapped separately during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals { value: String },
    Contains { value: String },
    StartsWith { value: String },
    EndsWith { value: String },
    GreaterThan { value: String },
    LessThan { value: String },
    GreaterOrEqual { value: String },
    LessOrEqual { value: String },
    /// Inclusive range check between `low` and `high`.
    Between { low: String, high: String },
    IsEmpty,
    IsNotEmpty,
    IsChecked,
    IsNotChecked,
}

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Equals { .. } => "equals",
            Condition::Contains { .. } => "contains",
            Condition::StartsWith { .. } => "starts_with",
            Condition::EndsWith { .. } => "ends_with",
            Condition::GreaterThan { .. } => "greater_than",
            Condition::LessThan { .. } => "less_than",
            Condition::GreaterOrEqual { .. } => "greater_or_equal",
            Condition::LessOrEqual { .. } => "less_or_equal",
            Condition::Between { .. } => "between",
            Condition::IsEmpty => "is_empty",
            Condition::IsNotEmpty => "is_not_empty",
            Condition::IsChecked => "is_checked",
            Condition::IsNotChecked => "is_not_checked",
        }
    }
}
