use crate::error::TemplateError;
use crate::graph::WorkflowGraph;
use crate::validation::validate;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A frozen, validated workflow graph ready to be adopted by projects.
///
/// A template is only constructible from a graph whose validation report has
/// no errors, and is immutable afterwards; editing means converting back to
/// a graph, changing it and freezing again.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkflowTemplate {
    name: String,
    graph: WorkflowGraph,
}

impl WorkflowTemplate {
    /// Validates `graph` and freezes it under `name`.
    ///
    /// Warnings do not block freezing; errors do.
    pub fn freeze(name: impl Into<String>, graph: WorkflowGraph) -> Result<Self, TemplateError> {
        let report = validate(&graph);
        if !report.is_valid() {
            return Err(TemplateError::InvalidGraph(report.errors.len()));
        }
        Ok(Self {
            name: name.into(),
            graph,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Hands the graph back out for a new edit-and-refreeze cycle.
    pub fn into_graph(self) -> WorkflowGraph {
        self.graph
    }

    /// Saves the template to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), TemplateError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path)
            .map_err(|e| TemplateError::Io(format!("could not create file '{}': {}", path, e)))?;
        file.write_all(&bytes)
            .map_err(|e| TemplateError::Io(format!("could not write to file '{}': {}", path, e)))?;
        Ok(())
    }

    /// Loads a template from a file.
    pub fn from_file(path: &str) -> Result<Self, TemplateError> {
        let mut file = fs::File::open(path)
            .map_err(|e| TemplateError::Io(format!("could not open file '{}': {}", path, e)))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| TemplateError::Io(format!("could not read from file '{}': {}", path, e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        encode_to_vec(self, standard()).map_err(|e| TemplateError::Encode(e.to_string()))
    }

    /// Deserializes a template from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplateError> {
        decode_from_slice(bytes, standard())
            .map(|(template, _)| template) // bincode 2 returns (data, bytes_read)
            .map_err(|e| TemplateError::Decode(e.to_string()))
    }
}
