//! Subnet rows and load balancers inside a VPC.

use log::debug;

use stratus_core::{
    catalog,
    geometry::{Point, Size},
    node::{DiagramNode, NodeKind, SubnetPolarity},
};

use crate::config::LayoutConfig;

/// Direct children of a VPC that the VPC pass moves.
#[derive(Debug, Default)]
pub(super) struct VpcChildren {
    pub(super) load_balancers: Vec<usize>,
    pub(super) public: Vec<usize>,
    pub(super) private: Vec<usize>,
}

impl VpcChildren {
    /// Sorts `children` into load balancers and subnet rows. Generic subnets
    /// join the private row; every other child is left alone.
    pub(super) fn classify(nodes: &[DiagramNode], children: &[usize]) -> Self {
        let mut sorted = Self::default();
        for &idx in children {
            match nodes[idx].kind() {
                kind @ NodeKind::Subnet { .. } => match kind.polarity() {
                    Some(SubnetPolarity::Public) => sorted.public.push(idx),
                    _ => sorted.private.push(idx),
                },
                NodeKind::Service { service } if is_load_balancer(service) => {
                    sorted.load_balancers.push(idx)
                }
                _ => {}
            }
        }
        sorted
    }
}

fn is_load_balancer(service_id: &str) -> bool {
    catalog::lookup(service_id).is_some_and(|metadata| metadata.id().is_load_balancer())
}

/// Places one row of subnets starting at `(x, y)` and stretches them to the
/// tallest one. Returns the row height, or zero for an empty row.
fn place_row(nodes: &mut [DiagramNode], row: &[usize], y: f32, config: &LayoutConfig) -> f32 {
    let height = row
        .iter()
        .map(|&idx| nodes[idx].size().height())
        .fold(0.0, f32::max);

    let mut x = config.vpc_padding;
    for &idx in row {
        let node = &mut nodes[idx];
        let size = node.size().with_height(height);
        node.set_position(Point::new(x, y));
        node.set_size(size);
        x += size.width() + config.subnet_gap_x;
    }

    height
}

/// Positions the subnets and load balancers of one VPC and returns its size.
///
/// Subnet sizes must already be final.
pub(super) fn layout_vpc(
    nodes: &mut [DiagramNode],
    children: &VpcChildren,
    config: &LayoutConfig,
) -> Size {
    let row_y = if children.load_balancers.is_empty() {
        config.vpc_header_height
    } else {
        config.vpc_header_height + config.load_balancer_band()
    };

    let public_height = place_row(nodes, &children.public, row_y, config);
    let private_y = if children.public.is_empty() {
        row_y
    } else {
        row_y + public_height + config.subnet_gap_y
    };
    place_row(nodes, &children.private, private_y, config);

    let subnets = children.public.iter().chain(&children.private);
    let mut size = subnets
        .map(|&idx| {
            let bounds = nodes[idx].position().to_bounds(nodes[idx].size());
            Size::new(bounds.max_x(), bounds.max_y())
        })
        .reduce(Size::max)
        .map_or_else(
            || {
                Size::new(
                    config.subnet_min_width + 2.0 * config.vpc_padding,
                    row_y + config.subnet_min_height + config.vpc_padding,
                )
            },
            |extent| {
                Size::new(
                    extent.width() + config.vpc_padding,
                    extent.height() + config.vpc_padding,
                )
            },
        );

    if !children.load_balancers.is_empty() {
        let bbox = config.node_bounding_box();
        let row_width = children.load_balancers.len() as f32 * bbox.width();
        size = size.max(Size::new(row_width + 2.0 * config.vpc_padding, 0.0));

        let start_x = (size.width() - row_width) / 2.0;
        for (i, &idx) in children.load_balancers.iter().enumerate() {
            let node = &mut nodes[idx];
            node.set_position(Point::new(
                start_x + i as f32 * bbox.width() + config.node_padding,
                config.vpc_header_height + config.node_padding,
            ));
            node.set_size(config.node_size());
        }
    }

    debug!(
        public = children.public.len(),
        private = children.private.len(),
        load_balancers = children.load_balancers.len(),
        width = size.width(),
        height = size.height();
        "Laid out VPC"
    );

    size
}
