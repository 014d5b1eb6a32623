//! Reading, writing and checking diagram node lists.
//!
//! Diagrams are exchanged as JSON, either a bare array of nodes or an object
//! with a `nodes` array:
//!
//! ```json
//! { "nodes": [ { "id": "vpc", "kind": { "type": "vpc" } } ] }
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use stratus_core::node::{DiagramNode, NodeKind};

use crate::{StratusError, layout::hierarchy::Hierarchy};

#[derive(Deserialize)]
#[serde(untagged)]
enum DiagramDocument {
    Nodes(Vec<DiagramNode>),
    Wrapped { nodes: Vec<DiagramNode> },
}

/// An ordered list of diagram nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
}

impl Diagram {
    pub fn new(nodes: Vec<DiagramNode>) -> Self {
        Self { nodes }
    }

    /// Parses a diagram from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Document`] when the text is neither a node
    /// array nor an object with a `nodes` array.
    pub fn from_json(json: &str) -> Result<Self, StratusError> {
        let document: DiagramDocument = serde_json::from_str(json)
            .map_err(|err| StratusError::new_document_error(err, json))?;
        let nodes = match document {
            DiagramDocument::Nodes(nodes) | DiagramDocument::Wrapped { nodes } => nodes,
        };
        debug!(nodes = nodes.len(); "Parsed diagram");
        Ok(Self { nodes })
    }

    /// Serializes the diagram as a pretty-printed `{ "nodes": [...] }` object.
    pub fn to_json_pretty(&self) -> Result<String, StratusError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }
}

/// Checks that `nodes` form a well-shaped forest.
///
/// Layout tolerates every problem reported here; callers that want strict
/// input run this first. Dangling parent ids are only logged.
///
/// # Errors
///
/// Returns [`StratusError::Graph`] for a repeated id, a node nested inside a
/// service, or a parent cycle.
pub fn check_hierarchy(nodes: &[DiagramNode]) -> Result<(), StratusError> {
    let hierarchy = Hierarchy::new(nodes);

    for (idx, node) in nodes.iter().enumerate() {
        if hierarchy.index_of(node.id()) != Some(idx) {
            return Err(StratusError::Graph(format!(
                "duplicate node id `{}`",
                node.id()
            )));
        }
    }

    for (idx, node) in nodes.iter().enumerate() {
        if let Some(parent) = hierarchy.parent(idx) {
            if matches!(nodes[parent].kind(), NodeKind::Service { .. }) {
                return Err(StratusError::Graph(format!(
                    "node `{}` is nested inside service `{}`",
                    node.id(),
                    nodes[parent].id()
                )));
            }
        }

        // Walks from below a cycle stop after every node; a member of the
        // cycle reports it.
        let mut current = hierarchy.parent(idx);
        let mut steps = 0;
        while let Some(ancestor) = current {
            if ancestor == idx {
                return Err(StratusError::Graph(format!(
                    "parent cycle through node `{}`",
                    node.id()
                )));
            }
            if steps > nodes.len() {
                break;
            }
            current = hierarchy.parent(ancestor);
            steps += 1;
        }
    }

    Ok(())
}
