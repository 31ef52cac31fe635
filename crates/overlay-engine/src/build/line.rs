use planar_geom::algorithm::locate::PointLocator;
use planar_geom::Geometry;

use crate::graph::{EdgeKey, OverlayGraph};
use crate::op::{is_result_of_op, OverlayOpCode};

/// Collects result line edges: edges carrying only linework whose label
/// satisfies the operation predicate and which are not covered by a result
/// area. For intersection, area-boundary edges whose areas merely touch
/// contribute their linework as well.
pub fn build_lines(
    graph: &mut OverlayGraph,
    op: OverlayOpCode,
    result_areas: &[Geometry],
    locator: &PointLocator,
) -> Vec<Geometry> {
    find_covered_line_edges(graph, result_areas, locator);

    let mut line_edges: Vec<EdgeKey> = Vec::new();
    for dk in graph.dir_edge_order.clone() {
        collect_line_edge(graph, dk, op, &mut line_edges);
        collect_boundary_touch_edge(graph, dk, op, &mut line_edges);
    }

    let mut lines = Vec::new();
    for ek in line_edges {
        graph.edges[ek].in_result = true;
        lines.push(Geometry::LineString(graph.edges[ek].coords.clone()));
    }
    lines
}

/// Marks every line edge as covered or not by the result areas. Nodes
/// that carry result area edges decide coverage for their line edges by
/// the angular-sector scan; remaining line edges fall back to a
/// point-in-area test.
fn find_covered_line_edges(
    graph: &mut OverlayGraph,
    result_areas: &[Geometry],
    locator: &PointLocator,
) {
    for nk in graph.node_order.clone() {
        graph.find_covered_line_edges(nk);
    }
    for dk in graph.dir_edge_order.clone() {
        let ek = graph.dir_edges[dk].edge;
        if graph.is_line_edge(dk) && graph.edges[ek].covered.is_none() {
            let p = graph.dir_edges[dk].p0;
            let covered = result_areas
                .iter()
                .any(|area| locator.locate(&p, area) != planar_geom::Location::Exterior);
            graph.edges[ek].covered = Some(covered);
        }
    }
}

fn collect_line_edge(
    graph: &mut OverlayGraph,
    dk: crate::graph::DirEdgeKey,
    op: OverlayOpCode,
    line_edges: &mut Vec<EdgeKey>,
) {
    if !graph.is_line_edge(dk) {
        return;
    }
    let de = &graph.dir_edges[dk];
    let label = de.label;
    let ek = de.edge;
    if de.visited {
        return;
    }
    if !is_result_of_op(label.on_location(0), label.on_location(1), op) {
        return;
    }
    if graph.edges[ek].covered == Some(true) {
        return;
    }
    line_edges.push(ek);
    graph.set_visited_edge(dk);
}

/// Collects the linework of area edges where the two operand areas touch
/// along a boundary without overlapping. Only an intersection result
/// includes such shared boundary lines.
fn collect_boundary_touch_edge(
    graph: &mut OverlayGraph,
    dk: crate::graph::DirEdgeKey,
    op: OverlayOpCode,
    line_edges: &mut Vec<EdgeKey>,
) {
    if graph.is_line_edge(dk) {
        return;
    }
    let de = &graph.dir_edges[dk];
    let label = de.label;
    let ek = de.edge;
    if de.visited {
        return;
    }
    if graph.is_interior_area_edge(dk) {
        return;
    }
    // linework already emitted as a result line
    if graph.edges[ek].in_result {
        return;
    }
    debug_assert!(
        !(graph.dir_edges[dk].in_result
            || graph.dir_edges[graph.dir_edges[dk].sym].in_result)
            || !graph.edges[ek].in_result
    );
    if op == OverlayOpCode::Intersection
        && is_result_of_op(label.on_location(0), label.on_location(1), op)
    {
        line_edges.push(ek);
        graph.set_visited_edge(dk);
    }
}
