//! The role-directory boundary and the activation-time staffing check.
//!
//! Save-time validation never consults the directory, by design: drafts may
//! reference roles before staffing is finalized. Only when a template is
//! activated for a project does [`check_activation`] verify that every
//! referenced role exists and has at least one assigned user.

use crate::graph::{NodeId, NodeKind, RoleId, WorkflowGraph};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role as the surrounding application knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub department_id: Option<String>,
}

/// Read-only view of the surrounding application's role/user directory.
pub trait RoleDirectory {
    fn roles(&self) -> Vec<Role>;

    /// How many users currently hold the role. Unknown roles count as zero.
    fn assigned_user_count(&self, role: &RoleId) -> usize;
}

/// A problem found by the activation check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActivationIssue {
    #[error("Node '{label}' ({node}) references role '{role}', which does not exist in the directory")]
    UnknownRole {
        node: NodeId,
        label: String,
        role: RoleId,
    },

    #[error("Node '{label}' ({node}) references role '{role}', which has no assigned users")]
    UnstaffedRole {
        node: NodeId,
        label: String,
        role: RoleId,
    },
}

/// Verifies every role referenced by the graph against the directory.
///
/// Returns all findings in node-declaration order; an empty list means the
/// graph may be activated (assuming it also passed
/// [`validate`](crate::validation::validate)). Unconfigured role references
/// are skipped here — validation already reports those.
pub fn check_activation(graph: &WorkflowGraph, directory: &dyn RoleDirectory) -> Vec<ActivationIssue> {
    let known: AHashMap<RoleId, Role> = directory
        .roles()
        .into_iter()
        .map(|role| (role.id.clone(), role))
        .collect();

    let mut issues = Vec::new();
    for node in graph.nodes() {
        let role_id = match &node.kind {
            NodeKind::Role(config) => config.role_id.as_ref(),
            NodeKind::Approval(config) => config.approver_role_id.as_ref(),
            _ => None,
        };
        let Some(role_id) = role_id else { continue };

        if !known.contains_key(role_id) {
            issues.push(ActivationIssue::UnknownRole {
                node: node.id,
                label: node.label.clone(),
                role: role_id.clone(),
            });
        } else if directory.assigned_user_count(role_id) == 0 {
            issues.push(ActivationIssue::UnstaffedRole {
                node: node.id,
                label: node.label.clone(),
                role: role_id.clone(),
            });
        }
    }
    issues
}

/// A directory backed by in-memory data; handy for tests and offline tools.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    roles: Vec<Role>,
    assignments: AHashMap<RoleId, usize>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role, assigned_users: usize) -> Self {
        self.assignments.insert(role.id.clone(), assigned_users);
        self.roles.push(role);
        self
    }
}

impl RoleDirectory for InMemoryDirectory {
    fn roles(&self) -> Vec<Role> {
        self.roles.clone()
    }

    fn assigned_user_count(&self, role: &RoleId) -> usize {
        self.assignments.get(role).copied().unwrap_or(0)
    }
}
