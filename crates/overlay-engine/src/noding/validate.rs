use planar_geom::algorithm::intersector::RobustLineIntersector;

use crate::error::TopologyError;
use crate::graph::edge::Edge;

/// Checks that a set of edges is fully noded: any two segments share at
/// most a common endpoint. Raised violations indicate a robustness failure
/// in the noder; the caller may retry the overlay with snap-rounding.
///
/// This test is slow (it examines every segment pair) but is necessary to
/// catch robustness failures with classic noding.
pub fn validate_noding(edges: &[Edge]) -> Result<(), TopologyError> {
    let mut li = RobustLineIntersector::new();
    for (i, e0) in edges.iter().enumerate() {
        for e1 in &edges[i..] {
            check_edge_pair(&mut li, e0, e1)?;
        }
    }
    Ok(())
}

fn check_edge_pair(
    li: &mut RobustLineIntersector,
    e0: &Edge,
    e1: &Edge,
) -> Result<(), TopologyError> {
    let same_edge = std::ptr::eq(e0, e1);
    for i0 in 0..e0.num_segments() {
        for i1 in 0..e1.num_segments() {
            if same_edge && i1 <= i0 {
                continue;
            }
            let p00 = e0.coords[i0];
            let p01 = e0.coords[i0 + 1];
            let p10 = e1.coords[i1];
            let p11 = e1.coords[i1 + 1];

            li.compute_intersection(&p00, &p01, &p10, &p11);
            if !li.has_intersection() {
                continue;
            }
            let pt = li.intersection(0);
            if li.is_proper() || li.intersection_count() == 2 {
                return Err(TopologyError::at("found non-noded intersection", pt));
            }
            // a single-point intersection must be an endpoint of both segments
            let endpoint_of_0 = pt.equals_2d(&p00) || pt.equals_2d(&p01);
            let endpoint_of_1 = pt.equals_2d(&p10) || pt.equals_2d(&p11);
            if !(endpoint_of_0 && endpoint_of_1) {
                return Err(TopologyError::at("found non-noded intersection", pt));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Label;
    use planar_geom::{Coordinate, Location};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn edge(pts: &[(f64, f64)]) -> Edge {
        Edge::new(
            pts.iter().map(|&(x, y)| c(x, y)).collect(),
            Label::line_at(0, Location::Interior),
        )
    }

    #[test]
    fn test_properly_noded_edges_pass() {
        let edges = vec![
            edge(&[(0.0, 0.0), (5.0, 5.0)]),
            edge(&[(5.0, 5.0), (10.0, 0.0)]),
            edge(&[(5.0, 5.0), (5.0, 10.0)]),
        ];
        assert!(validate_noding(&edges).is_ok());
    }

    #[test]
    fn test_crossing_segments_fail() {
        let edges = vec![
            edge(&[(0.0, 0.0), (10.0, 10.0)]),
            edge(&[(0.0, 10.0), (10.0, 0.0)]),
        ];
        let err = validate_noding(&edges).unwrap_err();
        assert!(err.to_string().contains("non-noded"));
        assert_eq!(err.coordinate, Some(c(5.0, 5.0)));
    }

    #[test]
    fn test_vertex_in_interior_fails() {
        let edges = vec![
            edge(&[(0.0, 0.0), (10.0, 0.0)]),
            edge(&[(5.0, 0.0), (5.0, 5.0)]),
        ];
        assert!(validate_noding(&edges).is_err());
    }

    #[test]
    fn test_collinear_overlap_fails() {
        let edges = vec![
            edge(&[(0.0, 0.0), (10.0, 0.0)]),
            edge(&[(5.0, 0.0), (15.0, 0.0)]),
        ];
        assert!(validate_noding(&edges).is_err());
    }
}
