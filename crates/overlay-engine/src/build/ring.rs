use planar_geom::algorithm::orientation;
use planar_geom::{Coordinate, Envelope, Polygon};

use crate::error::TopologyError;
use crate::graph::{DirEdgeKey, OverlayGraph, RingKind};

/// A cycle of in-result directed edges. Traced with the result interior on
/// the right-hand side, so a ring enclosing interior runs CW and a CCW
/// ring is a hole.
#[derive(Debug)]
pub struct EdgeRing {
    pub id: usize,
    pub kind: RingKind,
    pub dir_edges: Vec<DirEdgeKey>,
    pub pts: Vec<Coordinate>,
    pub is_hole: bool,
    /// For holes: the shell ring this hole is assigned to.
    pub shell: Option<usize>,
    /// For shells: the holes assigned to this ring.
    pub holes: Vec<usize>,
}

impl EdgeRing {
    /// Walks the ring starting from `start`, following the `next` links of
    /// `kind`, collecting coordinates and stamping each visited edge with
    /// the ring id. A broken or inconsistent link surface is a topology
    /// error.
    pub fn trace(
        graph: &mut OverlayGraph,
        start: DirEdgeKey,
        kind: RingKind,
        id: usize,
    ) -> Result<EdgeRing, TopologyError> {
        let mut dir_edges = Vec::new();
        let mut pts: Vec<Coordinate> = Vec::new();
        let mut de = start;
        let mut is_first = true;

        loop {
            if graph.dir_edges[de].ring_of(kind) == Some(id) {
                return Err(TopologyError::at(
                    "directed edge visited twice during ring building",
                    graph.dir_edges[de].p0,
                ));
            }
            debug_assert!(graph.dir_edges[de].label.is_area());
            dir_edges.push(de);

            let edge_key = graph.dir_edges[de].edge;
            let forward = graph.dir_edges[de].is_forward;
            let coords = &graph.edges[edge_key].coords;
            if forward {
                let from = if is_first { 0 } else { 1 };
                pts.extend_from_slice(&coords[from..]);
            } else {
                let from = if is_first { coords.len() - 1 } else { coords.len() - 2 };
                pts.extend(coords[..=from].iter().rev());
            }
            is_first = false;

            match kind {
                RingKind::Maximal => graph.dir_edges[de].ring = Some(id),
                RingKind::Minimal => graph.dir_edges[de].min_ring = Some(id),
            }

            let next = match kind {
                RingKind::Maximal => graph.dir_edges[de].next,
                RingKind::Minimal => graph.dir_edges[de].next_min,
            };
            let Some(next) = next else {
                return Err(TopologyError::at(
                    "found null DirectedEdge during ring building",
                    graph.dir_edges[de].p1,
                ));
            };
            if next == start {
                break;
            }
            de = next;
        }

        let is_hole = orientation::is_ccw(&pts);
        Ok(EdgeRing {
            id,
            kind,
            dir_edges,
            pts,
            is_hole,
            shell: None,
            holes: Vec::new(),
        })
    }

    /// Twice the highest count of this ring's outgoing edges at any of its
    /// nodes. Greater than 2 means the ring touches itself at a node and
    /// must be decomposed into minimal rings.
    pub fn max_node_degree(&self, graph: &OverlayGraph) -> usize {
        let mut max_degree = 0;
        for &dk in &self.dir_edges {
            let nk = graph.dir_edges[dk].origin;
            let degree = graph.outgoing_degree(nk, self.id);
            max_degree = max_degree.max(degree);
        }
        max_degree * 2
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_coordinates(&self.pts)
    }

    pub fn area(&self) -> f64 {
        orientation::signed_area(&self.pts).abs()
    }

    /// Emits the polygon for a shell ring with its assigned holes,
    /// normalized to a CCW exterior and CW holes.
    pub fn to_polygon(&self, rings: &[EdgeRing]) -> Polygon {
        let exterior = oriented(&self.pts, true);
        let interiors = self
            .holes
            .iter()
            .map(|&h| oriented(&rings[h].pts, false))
            .collect();
        Polygon::new(exterior, interiors)
    }
}

fn oriented(ring: &[Coordinate], ccw: bool) -> Vec<Coordinate> {
    if orientation::is_ccw(ring) != ccw {
        ring.iter().rev().copied().collect()
    } else {
        ring.to_vec()
    }
}
