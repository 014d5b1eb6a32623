//! Tiered placement of services inside a subnet.

use std::collections::BTreeMap;

use log::debug;

use stratus_core::{
    catalog,
    geometry::{Point, Size},
    node::DiagramNode,
};

use crate::config::LayoutConfig;

/// Positions the `services` of one subnet and returns the subnet's size.
///
/// Services are grouped into one row per tier, lowest tier on top, keeping
/// input order inside a row. Each row is centred in the subnet.
pub(super) fn layout_services(
    nodes: &mut [DiagramNode],
    services: &[usize],
    config: &LayoutConfig,
) -> Size {
    if services.is_empty() {
        return config.subnet_min_size();
    }

    let mut tiers: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for &idx in services {
        let tier = nodes[idx]
            .kind()
            .service_id()
            .map_or(catalog::COMPUTE_TIER, catalog::tier_of);
        tiers.entry(tier).or_default().push(idx);
    }

    let bbox = config.node_bounding_box();
    let widest = tiers.values().map(Vec::len).max().unwrap_or(0);
    let width = config
        .subnet_min_width
        .max(2.0 * config.subnet_padding + widest as f32 * bbox.width());

    let mut running_y = config.subnet_header_height;
    for row in tiers.values() {
        let start_x = (width - row.len() as f32 * bbox.width()) / 2.0;
        for (i, &idx) in row.iter().enumerate() {
            let node = &mut nodes[idx];
            node.set_position(Point::new(
                start_x + i as f32 * bbox.width() + config.node_padding,
                running_y + config.node_padding,
            ));
            node.set_size(config.node_size());
        }
        running_y += bbox.height();
    }

    let height = config
        .subnet_min_height
        .max(running_y + config.subnet_padding);

    debug!(services = services.len(), rows = tiers.len(), width, height; "Laid out subnet");

    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use stratus_core::node::NodeKind;

    use super::*;

    fn services(ids: &[&str]) -> Vec<DiagramNode> {
        ids.iter()
            .enumerate()
            .map(|(i, service)| DiagramNode::new(format!("n{i}"), NodeKind::service(*service)))
            .collect()
    }

    #[test]
    fn test_empty_subnet_gets_min_size() {
        let size = layout_services(&mut [], &[], &LayoutConfig::default());
        assert_eq!(size, Size::new(150.0, 120.0));
    }

    #[test]
    fn test_single_row_is_centred() {
        let mut nodes = services(&["ec2", "ecs"]);
        let size = layout_services(&mut nodes, &[0, 1], &LayoutConfig::default());

        assert_approx_eq!(f32, size.width(), 300.0);
        assert_approx_eq!(f32, size.height(), 158.0);

        // (300 - 260) / 2 = 20 start, + 15 padding
        assert_approx_eq!(f32, nodes[0].position().x(), 35.0);
        assert_approx_eq!(f32, nodes[1].position().x(), 165.0);
        assert_approx_eq!(f32, nodes[0].position().y(), 43.0);
        assert_eq!(nodes[0].size(), Size::new(100.0, 80.0));
    }

    #[test]
    fn test_tiers_stack_top_to_bottom() {
        let mut nodes = services(&["rds", "alb", "ec2", "ec2"]);
        let size = layout_services(&mut nodes, &[0, 1, 2, 3], &LayoutConfig::default());

        let y = |idx: usize| nodes[idx].position().y();
        assert!(y(1) < y(2));
        assert!(y(2) < y(0));
        assert_approx_eq!(f32, y(2), y(3));

        // three rows: 28 + 3 * 110 + 20
        assert_approx_eq!(f32, size.height(), 378.0);
    }

    #[test]
    fn test_unknown_service_uses_compute_tier() {
        let mut nodes = services(&["mainframe", "ec2"]);
        layout_services(&mut nodes, &[0, 1], &LayoutConfig::default());

        assert_approx_eq!(f32, nodes[0].position().y(), nodes[1].position().y());
    }

    #[test]
    fn test_rows_do_not_overlap() {
        let mut nodes = services(&["ec2", "ecs", "eks", "fargate", "rds"]);
        let idx: Vec<usize> = (0..nodes.len()).collect();
        let config = LayoutConfig::default();
        let size = layout_services(&mut nodes, &idx, &config);

        assert!(size.width() >= 2.0 * config.subnet_padding + 4.0 * 130.0);
        for a in 0..nodes.len() {
            let bounds_a = nodes[a].position().to_bounds(nodes[a].size());
            for b in (a + 1)..nodes.len() {
                let bounds_b = nodes[b].position().to_bounds(nodes[b].size());
                assert!(!bounds_a.intersects(&bounds_b), "{a} overlaps {b}");
            }
        }
    }
}
