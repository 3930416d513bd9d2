use crate::error::ConversionError;
use crate::graph::{
    ApprovalConfig, Branch, BranchId, Condition, ConditionalConfig, Decision, EdgeOutput, FieldId,
    FieldType, FormConfig, FormField, NodeId, NodeKind, RoleConfig, RoleId, WorkflowGraph,
};
use ahash::AHashMap;
use serde::Deserialize;

/// A trait for custom editor formats that can be converted into a canonical
/// [`WorkflowGraph`].
///
/// This is the extension point that keeps the engine format-agnostic: the
/// authoring UI's export shape is owned by the surrounding application, and
/// an `IntoWorkflow` impl provides the translation layer. The crate ships
/// [`EditorExport`] as one ready-made importer for the common
/// flow-editor JSON shape.
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a workflow graph.
    ///
    /// Conversion is deliberately lenient about semantic problems (duplicate
    /// decision edges, missing start node, ...): those belong to
    /// [`validate`](crate::validation::validate), which reports them all at
    /// once. Only structurally unusable input fails here.
    fn into_workflow(self) -> Result<WorkflowGraph, ConversionError>;
}

/// The flow-editor JSON export: nodes with a string id, a type tag and a
/// loose `data` bag; edges with string endpoints and an optional
/// `sourceHandle`.
#[derive(Debug, Deserialize)]
pub struct EditorExport {
    pub nodes: Vec<EditorNode>,
    pub edges: Vec<EditorEdge>,
}

#[derive(Debug, Deserialize)]
pub struct EditorNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: EditorNodeData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditorNodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, alias = "roleId")]
    pub role_id: Option<String>,
    #[serde(default, alias = "roleName")]
    pub role_name: Option<String>,
    #[serde(default, alias = "approverRoleId")]
    pub approver_role_id: Option<String>,
    #[serde(default, alias = "approverRoleName")]
    pub approver_role_name: Option<String>,
    #[serde(default, alias = "formName")]
    pub form_name: Option<String>,
    #[serde(default, alias = "formFields")]
    pub form_fields: Vec<EditorFormField>,
    #[serde(default, alias = "sourceFormNodeId")]
    pub source_form_node_id: Option<String>,
    #[serde(default, alias = "sourceFormFieldId")]
    pub source_form_field_id: Option<String>,
    #[serde(default)]
    pub conditions: Vec<EditorBranch>,
}

#[derive(Debug, Deserialize)]
pub struct EditorFormField {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditorBranch {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(alias = "conditionType")]
    pub condition_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, alias = "value2")]
    pub value2: Option<String>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct EditorEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, alias = "sourceHandle")]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub data: EditorEdgeData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditorEdgeData {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, alias = "conditionValue")]
    pub condition_value: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
}

impl IntoWorkflow for EditorExport {
    fn into_workflow(self) -> Result<WorkflowGraph, ConversionError> {
        let mut graph = WorkflowGraph::new();
        let mut ids: AHashMap<String, NodeId> = AHashMap::new();
        // Conditionals reference their source form by editor id; resolved in
        // a second pass once every node id is mapped.
        let mut pending_sources: Vec<(NodeId, String)> = Vec::new();

        for node in &self.nodes {
            let kind = convert_kind(node)?;
            let id = graph
                .add_node(node.data.label.clone(), kind)
                .map_err(|e| ConversionError::Malformed(e.to_string()))?;
            if ids.insert(node.id.clone(), id).is_some() {
                return Err(ConversionError::Malformed(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            if let Some(source) = &node.data.source_form_node_id {
                pending_sources.push((id, source.clone()));
            }
        }

        for (node_id, source) in pending_sources {
            let Some(node) = graph.node(node_id) else { continue };
            let NodeKind::Conditional(config) = &node.kind else {
                continue;
            };
            // A source referencing a node absent from the export stays
            // unbound; validation reports the disconnected conditional.
            let mut config = config.clone();
            config.source_form_node = ids.get(&source).copied();
            graph
                .update_config(node_id, NodeKind::Conditional(config))
                .map_err(|e| ConversionError::Malformed(e.to_string()))?;
        }

        for edge in &self.edges {
            let source = *ids
                .get(&edge.source)
                .ok_or_else(|| ConversionError::UnknownNodeRef {
                    edge: edge.id.clone(),
                    node: edge.source.clone(),
                })?;
            let target = *ids
                .get(&edge.target)
                .ok_or_else(|| ConversionError::UnknownNodeRef {
                    edge: edge.id.clone(),
                    node: edge.target.clone(),
                })?;
            let output = convert_output(edge);
            graph
                .insert_edge(source, target, output, edge.data.label.clone())
                .map_err(|e| ConversionError::Malformed(e.to_string()))?;
        }

        Ok(graph)
    }
}

fn convert_kind(node: &EditorNode) -> Result<NodeKind, ConversionError> {
    let data = &node.data;
    let kind = match node.node_type.as_str() {
        "start" => NodeKind::Start,
        "end" => NodeKind::End,
        // "department" and "sync" are the legacy spelling of a role
        // assignment step; normalized here and excluded from new paths.
        "role" | "department" | "sync" => NodeKind::Role(RoleConfig {
            role_id: data.role_id.clone().map(RoleId),
            role_name: data.role_name.clone().unwrap_or_default(),
        }),
        "approval" => NodeKind::Approval(ApprovalConfig {
            approver_role_id: data.approver_role_id.clone().map(RoleId),
            approver_role_name: data.approver_role_name.clone().unwrap_or_default(),
        }),
        "form" => NodeKind::Form(FormConfig {
            form_name: data.form_name.clone().unwrap_or_default(),
            fields: data
                .form_fields
                .iter()
                .map(|field| FormField {
                    id: FieldId(field.id.clone()),
                    label: field.label.clone(),
                    field_type: field.field_type,
                    options: field.options.clone(),
                })
                .collect(),
        }),
        "conditional" => NodeKind::Conditional(ConditionalConfig {
            // Node reference resolved in the second pass.
            source_form_node: None,
            source_field: data.source_form_field_id.clone().map(FieldId),
            branches: data
                .conditions
                .iter()
                .map(convert_branch)
                .collect::<Result<_, _>>()?,
        }),
        other => return Err(ConversionError::UnknownNodeType(other.to_string())),
    };
    Ok(kind)
}

fn convert_branch(branch: &EditorBranch) -> Result<Branch, ConversionError> {
    let value = branch.value.clone();
    let condition = match branch.condition_type.as_str() {
        "equals" => Condition::Equals { value },
        "contains" => Condition::Contains { value },
        "starts_with" => Condition::StartsWith { value },
        "ends_with" => Condition::EndsWith { value },
        "greater_than" => Condition::GreaterThan { value },
        "less_than" => Condition::LessThan { value },
        "greater_or_equal" => Condition::GreaterOrEqual { value },
        "less_or_equal" => Condition::LessOrEqual { value },
        "between" => Condition::Between {
            low: value,
            high: branch.value2.clone().unwrap_or_default(),
        },
        "is_empty" => Condition::IsEmpty,
        "is_not_empty" => Condition::IsNotEmpty,
        "is_checked" => Condition::IsChecked,
        "is_not_checked" => Condition::IsNotChecked,
        other => {
            return Err(ConversionError::Malformed(format!(
                "branch '{}' has unknown condition type '{}'",
                branch.id, other
            )));
        }
    };
    Ok(Branch {
        id: BranchId(branch.id.clone()),
        label: branch.label.clone(),
        condition,
        color: branch.color.clone(),
    })
}

/// Maps the editor's `sourceHandle`/`data` fields onto a typed edge output.
/// Approval edges carry `decision`; conditional edges name a branch either
/// through the handle or through `conditionValue`.
fn convert_output(edge: &EditorEdge) -> EdgeOutput {
    let decision = edge
        .data
        .decision
        .as_deref()
        .or(edge.source_handle.as_deref());
    match decision {
        Some("approved") => return EdgeOutput::Decision(Decision::Approved),
        Some("rejected") => return EdgeOutput::Decision(Decision::Rejected),
        _ => {}
    }
    if let Some(branch) = edge
        .source_handle
        .clone()
        .or_else(|| edge.data.condition_value.clone())
    {
        return EdgeOutput::Branch(BranchId(branch));
    }
    EdgeOutput::Default
}
