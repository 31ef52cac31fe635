use planar_geom::algorithm::distance::point_to_segment;
use planar_geom::algorithm::intersector::RobustLineIntersector;
use planar_geom::{Coordinate, Geometry, PrecisionModel};
use tracing::debug;

use super::classic::node_classic;
use super::source::OperandGraph;
use super::NodedInput;
use crate::graph::edge::Edge;

/// The division factor applied to the grid cell size to obtain the
/// near-vertex nearness tolerance. Load-bearing: the tolerance must be
/// exactly `1 / (scale * 10)`.
const NEARNESS_FACTOR: f64 = 10.0;

/// Snap-rounding noding: all input coordinates are rounded to the fixed
/// grid of `pm`, and the intersection detector also treats *near-vertex*
/// situations as intersections. This prevents a segment endpoint that is
/// extremely close to another segment from crossing it after snapping
/// without a node being introduced.
///
/// Falls back to classic noding if `pm` is not a fixed model, since there
/// is no grid to snap to.
pub fn node_snap_rounded(g0: &Geometry, g1: &Geometry, pm: &PrecisionModel) -> NodedInput {
    let scale = match pm.scale() {
        Some(scale) => scale,
        None => return node_classic(g0, g1, pm),
    };
    let nearness_tol = 1.0 / scale / NEARNESS_FACTOR;

    let mut src0 = OperandGraph::build(0, g0, Some(pm));
    let mut src1 = OperandGraph::build(1, g1, Some(pm));
    let mut adder = SnapIntersectionAdder {
        li: RobustLineIntersector::with_precision_model(*pm),
        nearness_tol,
    };

    // node everything against everything, self pairs included: the
    // interior-intersection gate discards trivial vertex touches
    let n0 = src0.edges.len();
    for i in 0..n0 {
        adder.process_same_edge(&mut src0.edges[i]);
        for j in i + 1..n0 {
            let (head, tail) = src0.edges.split_at_mut(j);
            adder.process_edge_pair(&mut head[i], &mut tail[0]);
        }
    }
    src0.add_self_intersection_nodes();
    let n1 = src1.edges.len();
    for i in 0..n1 {
        adder.process_same_edge(&mut src1.edges[i]);
        for j in i + 1..n1 {
            let (head, tail) = src1.edges.split_at_mut(j);
            adder.process_edge_pair(&mut head[i], &mut tail[0]);
        }
    }
    src1.add_self_intersection_nodes();
    for e0 in &mut src0.edges {
        for e1 in &mut src1.edges {
            adder.process_edge_pair(e0, e1);
        }
    }

    let mut edges = Vec::new();
    src0.add_split_edges(&mut edges);
    src1.add_split_edges(&mut edges);
    debug!(split_edges = edges.len(), scale, "snap-rounding noding complete");

    NodedInput {
        edges,
        operand_nodes: [src0.into_nodes(), src1.into_nodes()],
    }
}

/// Finds interior intersections between segments on the snapped grid,
/// additionally treating very near vertex-segment situations as
/// intersections.
struct SnapIntersectionAdder {
    li: RobustLineIntersector,
    nearness_tol: f64,
}

impl SnapIntersectionAdder {
    fn process_edge_pair(&mut self, e0: &mut Edge, e1: &mut Edge) {
        if !e0.envelope().intersects(&e1.envelope()) {
            return;
        }
        for i0 in 0..e0.num_segments() {
            for i1 in 0..e1.num_segments() {
                self.process_segments(e0, i0, e1, i1);
            }
        }
    }

    /// Self-intersections within one edge. Adjacent-segment vertex touches
    /// are discarded by the interior-intersection gate and the near-vertex
    /// endpoint guards.
    fn process_same_edge(&mut self, edge: &mut Edge) {
        let coords = edge.coords.clone();
        let n = edge.num_segments();
        for i0 in 0..n {
            for i1 in i0 + 1..n {
                let (p00, p01) = (coords[i0], coords[i0 + 1]);
                let (p10, p11) = (coords[i1], coords[i1 + 1]);
                self.li.compute_intersection(&p00, &p01, &p10, &p11);
                if self.li.has_intersection() && self.li.is_interior_intersection() {
                    edge.add_intersections(&self.li, i0, 0);
                    edge.add_intersections(&self.li, i1, 1);
                }
                self.process_near_vertex(&p00, edge, i1, &p10, &p11);
                self.process_near_vertex(&p01, edge, i1, &p10, &p11);
                self.process_near_vertex(&p10, edge, i0, &p00, &p01);
                self.process_near_vertex(&p11, edge, i0, &p00, &p01);
            }
        }
    }

    fn process_segments(&mut self, e0: &mut Edge, i0: usize, e1: &mut Edge, i1: usize) {
        let p00 = e0.coords[i0];
        let p01 = e0.coords[i0 + 1];
        let p10 = e1.coords[i1];
        let p11 = e1.coords[i1 + 1];

        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if self.li.has_intersection() && self.li.is_interior_intersection() {
            e0.add_intersections(&self.li, i0, 0);
            e1.add_intersections(&self.li, i1, 1);
        }

        // near-vertex situations are treated as intersections as well, to
        // avoid robustness failures after snapping
        self.process_near_vertex(&p00, e1, i1, &p10, &p11);
        self.process_near_vertex(&p01, e1, i1, &p10, &p11);
        self.process_near_vertex(&p10, e0, i0, &p00, &p01);
        self.process_near_vertex(&p11, e0, i0, &p00, &p01);
    }

    /// If the endpoint `p` of one segment is near the *interior* of the
    /// other segment, add it as an intersection. Points that are also near
    /// one of that segment's endpoints are skipped, since snapping them
    /// would introduce zigs in the linework.
    fn process_near_vertex(
        &mut self,
        p: &Coordinate,
        edge: &mut Edge,
        seg_index: usize,
        p0: &Coordinate,
        p1: &Coordinate,
    ) {
        if p.distance_to(p0) < self.nearness_tol {
            return;
        }
        if p.distance_to(p1) < self.nearness_tol {
            return;
        }
        if point_to_segment(p, p0, p1) < self.nearness_tol {
            let dist = planar_geom::algorithm::intersector::compute_edge_distance(p, p0, p1);
            edge.add_intersection(*p, seg_index, dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_geom::Polygon;

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
    fn test_vertices_snapped_to_grid() {
        let a = Geometry::LineString(vec![c(0.01, 0.02), c(9.98, 0.01)]);
        let b = Geometry::GeometryCollection(vec![]);
        let noded = node_snap_rounded(&a, &b, &PrecisionModel::fixed(1.0));
        assert_eq!(noded.edges[0].coords, vec![c(0.0, 0.0), c(10.0, 0.0)]);
    }

    #[test]
    fn test_crossings_land_on_grid() {
        let a = Geometry::LineString(vec![c(0.0, 0.0), c(10.0, 10.0)]);
        let b = Geometry::LineString(vec![c(0.0, 10.0), c(10.0, 0.4)]);
        let noded = node_snap_rounded(&a, &b, &PrecisionModel::fixed(1.0));
        for e in &noded.edges {
            for p in &e.coords {
                assert_eq!(p.x, p.x.round());
                assert_eq!(p.y, p.y.round());
            }
        }
    }

    #[test]
    fn test_near_vertex_becomes_node() {
        // the endpoint (10, 0) lies ~0.0999 below the shallow segment:
        // within tau = 1/(1*10) of its interior, and farther than tau
        // from both of its endpoints, so it is added as a node
        let a = Geometry::LineString(vec![c(0.0, 0.0), c(100.0, 1.0)]);
        let b = Geometry::LineString(vec![c(10.0, 0.0), c(10.0, -5.0)]);
        let noded = node_snap_rounded(&a, &b, &PrecisionModel::fixed(1.0));
        let a_pieces: Vec<&Edge> = noded
            .edges
            .iter()
            .filter(|e| e.coords.iter().any(|p| p.equals_2d(&c(0.0, 0.0))))
            .collect();
        assert!(
            a_pieces.iter().any(|e| e
                .coords
                .iter()
                .any(|p| p.equals_2d(&c(10.0, 0.0)))),
            "near vertex was not noded into the shallow segment"
        );
    }

    #[test]
    fn test_non_fixed_model_falls_back_to_classic() {
        let noded = node_snap_rounded(
            &square(0.0, 0.0, 10.0, 10.0),
            &square(5.0, 5.0, 15.0, 15.0),
            &PrecisionModel::Floating,
        );
        assert_eq!(noded.edges.len(), 6);
    }
}
