//! Index-based view of the `parent_id` forest.

use std::collections::HashMap;

use log::warn;

use stratus_core::node::DiagramNode;

/// Parent and child links between nodes, addressed by their index in the
/// input slice.
///
/// A `parent_id` that names no node, or the node itself, is treated as
/// absent. When ids repeat, the first node with the id is the one children
/// attach to.
#[derive(Debug)]
pub(crate) struct Hierarchy<'a> {
    index: HashMap<&'a str, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl<'a> Hierarchy<'a> {
    pub(crate) fn new(nodes: &'a [DiagramNode]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            index.entry(node.id()).or_insert(idx);
        }

        let mut parents = vec![None; nodes.len()];
        let mut children = vec![Vec::new(); nodes.len()];

        for (idx, node) in nodes.iter().enumerate() {
            let Some(parent_id) = node.parent_id() else {
                continue;
            };
            match index.get(parent_id) {
                Some(&parent) if parent != idx => {
                    parents[idx] = Some(parent);
                    children[parent].push(idx);
                }
                Some(_) => {
                    warn!(node_id = node.id(); "Node is its own parent, treating it as unparented");
                }
                None => {
                    warn!(
                        node_id = node.id(),
                        parent_id;
                        "Parent not found, treating node as unparented"
                    );
                }
            }
        }

        Self {
            index,
            parents,
            children,
        }
    }

    /// Index of the first node with `id`.
    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn parent(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    /// Direct children of `idx`, in input order.
    pub(crate) fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub(crate) fn is_root(&self, idx: usize) -> bool {
        self.parents[idx].is_none()
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::node::{NodeKind, SubnetPolarity};

    use super::*;

    #[test]
    fn test_links_children_in_input_order() {
        let nodes = vec![
            DiagramNode::new("vpc", NodeKind::Vpc),
            DiagramNode::new("b", NodeKind::subnet(SubnetPolarity::Private)).with_parent("vpc"),
            DiagramNode::new("a", NodeKind::subnet(SubnetPolarity::Public)).with_parent("vpc"),
        ];
        let hierarchy = Hierarchy::new(&nodes);

        assert_eq!(hierarchy.children(0), &[1, 2]);
        assert_eq!(hierarchy.parent(2), Some(0));
        assert!(hierarchy.is_root(0));
    }

    #[test]
    fn test_dangling_and_self_parents_are_roots() {
        let nodes = vec![
            DiagramNode::new("web", NodeKind::service("ec2")).with_parent("missing"),
            DiagramNode::new("loop", NodeKind::Vpc).with_parent("loop"),
        ];
        let hierarchy = Hierarchy::new(&nodes);

        assert!(hierarchy.is_root(0));
        assert!(hierarchy.is_root(1));
        assert!(hierarchy.children(1).is_empty());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let nodes = vec![
            DiagramNode::new("net", NodeKind::Vpc),
            DiagramNode::new("net", NodeKind::Vpc),
            DiagramNode::new("web", NodeKind::service("ec2")).with_parent("net"),
        ];
        let hierarchy = Hierarchy::new(&nodes);

        assert_eq!(hierarchy.index_of("net"), Some(0));
        assert_eq!(hierarchy.children(0), &[2]);
        assert!(hierarchy.children(1).is_empty());
    }
}
