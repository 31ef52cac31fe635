use planar_geom::algorithm::locate::PointLocator;
use planar_geom::{Geometry, Location};

use crate::graph::OverlayGraph;
use crate::op::{is_result_of_op, OverlayOpCode};

/// Collects result points: nodes whose label satisfies the operation
/// predicate and whose coordinate is not already covered by a result line
/// or area. Isolated nodes qualify for every operation; nodes on edges
/// qualify only for intersection (where two boundaries may cross in a
/// single point that contributes no edge).
pub fn build_points(
    graph: &OverlayGraph,
    op: OverlayOpCode,
    result_lines_and_areas: &[&Geometry],
    locator: &PointLocator,
) -> Vec<Geometry> {
    let mut points = Vec::new();
    for &nk in &graph.node_order {
        let node = &graph.nodes[nk];
        // nodes whose incident edge linework is in the result are included
        // in that linework already
        let incident_in_result = node
            .star
            .iter()
            .any(|&dk| graph.edges[graph.dir_edges[dk].edge].in_result);
        if incident_in_result {
            continue;
        }
        if !(node.is_isolated() || op == OverlayOpCode::Intersection) {
            continue;
        }
        let label = node.label;
        if !is_result_of_op(label.on_location(0), label.on_location(1), op) {
            continue;
        }
        let covered = result_lines_and_areas
            .iter()
            .any(|geom| locator.locate(&node.coord, geom) != Location::Exterior);
        if !covered {
            points.push(Geometry::Point(Some(node.coord)));
        }
    }
    points
}
