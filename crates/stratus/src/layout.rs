//! Bottom-up layout of VPC diagrams.
//!
//! The engine recomputes positions and sizes from the inside out:
//!
//! ```text
//! services  → tiered rows inside each subnet     (subnet sizes)
//! subnets   → public row above private row       (VPC sizes)
//! externals → stacked to the right of the VPCs
//! ```
//!
//! Parented nodes are positioned relative to their parent's top-left corner.
//! Nodes the engine has no opinion about (security groups, gateways attached
//! directly to a VPC, nested containers) keep their incoming position.
//!
//! The input slice is never modified; [`layout`] returns an owned copy.

pub(crate) mod hierarchy;
mod subnet;
mod vpc;

use log::{debug, info};

use stratus_core::{
    catalog,
    geometry::{Bounds, Point},
    node::{DiagramNode, NodeKind},
};

use crate::config::LayoutConfig;

use hierarchy::Hierarchy;
use vpc::VpcChildren;

/// Lays out diagrams with a fixed [`LayoutConfig`].
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns a copy of `nodes` with recomputed positions and sizes.
    ///
    /// Without a VPC node the copy is returned unchanged. A `parent_id` that
    /// names no node is treated as absent.
    pub fn layout(&self, nodes: &[DiagramNode]) -> Vec<DiagramNode> {
        let mut out = nodes.to_vec();

        if !nodes.iter().any(|node| matches!(node.kind(), NodeKind::Vpc)) {
            debug!(nodes = nodes.len(); "No VPC in diagram, skipping layout");
            return out;
        }

        let hierarchy = Hierarchy::new(nodes);

        for (idx, node) in nodes.iter().enumerate() {
            if !matches!(node.kind(), NodeKind::Subnet { .. }) {
                continue;
            }
            let services: Vec<usize> = hierarchy
                .children(idx)
                .iter()
                .copied()
                .filter(|&child| matches!(nodes[child].kind(), NodeKind::Service { .. }))
                .collect();
            let size = subnet::layout_services(&mut out, &services, &self.config);
            out[idx].set_size(size);
        }

        let mut vpc_extent: Option<Bounds> = None;
        for (idx, node) in nodes.iter().enumerate() {
            if !matches!(node.kind(), NodeKind::Vpc) {
                continue;
            }
            let children = VpcChildren::classify(nodes, hierarchy.children(idx));
            let size = vpc::layout_vpc(&mut out, &children, &self.config);
            out[idx].set_size(size);

            if hierarchy.is_root(idx) {
                let bounds = out[idx].position().to_bounds(size);
                vpc_extent = Some(vpc_extent.map_or(bounds, |extent| extent.merge(&bounds)));
            }
        }

        let externals = self.stack_externals(&mut out, &hierarchy, vpc_extent);

        info!(nodes = out.len(), externals; "Diagram laid out");

        out
    }

    /// Stacks unparented services that do not belong in a VPC to the right
    /// of the top-level VPCs. Returns how many were moved.
    fn stack_externals(
        &self,
        nodes: &mut [DiagramNode],
        hierarchy: &Hierarchy<'_>,
        vpc_extent: Option<Bounds>,
    ) -> usize {
        let Some(extent) = vpc_extent else {
            return 0;
        };

        let bbox = self.config.node_bounding_box();
        let x = extent.max_x() + self.config.external_gap;
        let mut count = 0;

        for (idx, node) in nodes.iter_mut().enumerate() {
            if !hierarchy.is_root(idx) || !is_external(node.kind()) {
                continue;
            }
            let y = extent.min_y()
                + self.config.node_padding
                + count as f32 * (bbox.height() + self.config.external_gap);
            node.set_position(Point::new(x, y));
            node.set_size(self.config.node_size());
            count += 1;
        }

        count
    }
}

/// Services outside the catalog count as external.
fn is_external(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::Service { service } => {
            catalog::lookup(service).is_none_or(|metadata| !metadata.is_vpc_resource())
        }
        _ => false,
    }
}

/// Lays out `nodes` with `config`.
///
/// See [`LayoutEngine::layout`].
///
/// # Examples
///
/// ```
/// # use stratus::{config::LayoutConfig, layout::layout};
/// # use stratus::node::{DiagramNode, NodeKind, SubnetPolarity};
/// let nodes = vec![
///     DiagramNode::new("vpc", NodeKind::Vpc),
///     DiagramNode::new("public", NodeKind::subnet(SubnetPolarity::Public)).with_parent("vpc"),
///     DiagramNode::new("web", NodeKind::service("ec2")).with_parent("public"),
/// ];
///
/// let laid_out = layout(&nodes, &LayoutConfig::default());
/// assert_eq!(laid_out[1].position().x(), 20.0);
/// assert_eq!(laid_out[0].size().width(), 210.0);
/// ```
pub fn layout(nodes: &[DiagramNode], config: &LayoutConfig) -> Vec<DiagramNode> {
    LayoutEngine::new(config.clone()).layout(nodes)
}
