use planar_geom::algorithm::intersector::RobustLineIntersector;
use planar_geom::{Geometry, PrecisionModel};
use tracing::debug;

use super::source::OperandGraph;
use super::NodedInput;
use crate::graph::edge::Edge;

/// Classic robust noding: self-intersections are computed within each
/// operand, then intersections between the operands, all with a robust
/// line intersector parameterized by the noding precision model. Every
/// edge is then split at its collected intersection points.
pub fn node_classic(g0: &Geometry, g1: &Geometry, pm: &PrecisionModel) -> NodedInput {
    let mut src0 = OperandGraph::build(0, g0, None);
    let mut src1 = OperandGraph::build(1, g1, None);
    let mut li = RobustLineIntersector::with_precision_model(*pm);

    compute_self_intersections(&mut src0, &mut li);
    compute_self_intersections(&mut src1, &mut li);
    compute_cross_intersections(&mut src0, &mut src1, &mut li);

    let mut edges = Vec::new();
    src0.add_split_edges(&mut edges);
    src1.add_split_edges(&mut edges);
    debug!(split_edges = edges.len(), "classic noding complete");

    NodedInput {
        edges,
        operand_nodes: [src0.into_nodes(), src1.into_nodes()],
    }
}

/// Computes self-intersections within one operand and records them as
/// explicit operand nodes. For polygonal operands, same-edge tests are
/// skipped: a valid ring only self-touches at vertices, which the
/// cross-edge tests already report.
pub(crate) fn compute_self_intersections(src: &mut OperandGraph, li: &mut RobustLineIntersector) {
    let n = src.edges.len();
    for i in 0..n {
        if !src.is_polygonal() {
            add_same_edge_intersections(li, &mut src.edges[i]);
        }
        for j in i + 1..n {
            let (head, tail) = src.edges.split_at_mut(j);
            add_edge_pair_intersections(li, &mut head[i], &mut tail[0]);
        }
    }
    src.add_self_intersection_nodes();
}

/// Computes intersections between the edges of the two operands.
pub(crate) fn compute_cross_intersections(
    src0: &mut OperandGraph,
    src1: &mut OperandGraph,
    li: &mut RobustLineIntersector,
) {
    for e0 in &mut src0.edges {
        for e1 in &mut src1.edges {
            add_edge_pair_intersections(li, e0, e1);
        }
    }
}

/// Records intersections between all segment pairs of two distinct edges.
fn add_edge_pair_intersections(li: &mut RobustLineIntersector, e0: &mut Edge, e1: &mut Edge) {
    if !e0.envelope().intersects(&e1.envelope()) {
        return;
    }
    for i0 in 0..e0.num_segments() {
        for i1 in 0..e1.num_segments() {
            li.compute_intersection(
                &e0.coords[i0],
                &e0.coords[i0 + 1],
                &e1.coords[i1],
                &e1.coords[i1 + 1],
            );
            if li.has_intersection() {
                e0.add_intersections(li, i0, 0);
                e1.add_intersections(li, i1, 1);
            }
        }
    }
}

/// Records self-intersections within a single edge, skipping the trivial
/// endpoint touches of adjacent segments (and of the closing segment pair
/// of a ring).
fn add_same_edge_intersections(li: &mut RobustLineIntersector, edge: &mut Edge) {
    let n = edge.num_segments();
    if n < 2 {
        return;
    }
    let coords = edge.coords.clone();
    let closed = edge.is_closed();
    for i0 in 0..n {
        for i1 in i0 + 1..n {
            li.compute_intersection(&coords[i0], &coords[i0 + 1], &coords[i1], &coords[i1 + 1]);
            if !li.has_intersection() {
                continue;
            }
            let trivial = li.intersection_count() == 1
                && (i1 == i0 + 1 || (closed && i0 == 0 && i1 == n - 1));
            if !trivial {
                edge.add_intersections(li, i0, 0);
                // re-add for the second segment of the pair
                edge.add_intersections(li, i1, 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_geom::{Coordinate, Polygon};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            vec![c(x0, y0), c(x1, y0), c(x1, y1), c(x0, y1), c(x0, y0)],
            vec![],
        ))
    }

    #[test]
    fn test_overlapping_squares_are_noded() {
        let noded = node_classic(
            &square(0.0, 0.0, 10.0, 10.0),
            &square(5.0, 5.0, 15.0, 15.0),
            &PrecisionModel::Floating,
        );
        // each ring is split at its start point and the two crossing points
        assert_eq!(noded.edges.len(), 6);
        let crossing_count = noded
            .edges
            .iter()
            .flat_map(|e| &e.coords)
            .filter(|p| p.equals_2d(&c(10.0, 5.0)) || p.equals_2d(&c(5.0, 10.0)))
            .count();
        assert!(crossing_count >= 4, "both crossings appear on both rings");
    }

    #[test]
    fn test_disjoint_inputs_pass_through() {
        let noded = node_classic(
            &square(0.0, 0.0, 1.0, 1.0),
            &square(2.0, 2.0, 3.0, 3.0),
            &PrecisionModel::Floating,
        );
        assert_eq!(noded.edges.len(), 2);
        assert_eq!(noded.edges[0].num_points(), 5);
    }

    #[test]
    fn test_self_crossing_line_is_noded() {
        let bowtie = Geometry::LineString(vec![
            c(0.0, 0.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 10.0),
        ]);
        let empty = Geometry::GeometryCollection(vec![]);
        let noded = node_classic(&bowtie, &empty, &PrecisionModel::Floating);
        // the crossing (5, 5) lies on two segments, giving three pieces
        assert_eq!(noded.edges.len(), 3);
        assert!(noded
            .edges
            .iter()
            .any(|e| e.coords.iter().any(|p| p.equals_2d(&c(5.0, 5.0)))));
        // the crossing is recorded as an explicit operand node
        assert!(noded.operand_nodes[0]
            .iter()
            .any(|(p, _)| p.equals_2d(&c(5.0, 5.0))));
    }
}
