use planar_geom::algorithm::locate::locate_point_in_ring;
use planar_geom::{Coordinate, Geometry, Location};
use tracing::debug;

use super::ring::EdgeRing;
use crate::error::TopologyError;
use crate::graph::{OverlayGraph, RingKind};

/// Links result area edges into maximal edge rings, decomposes
/// self-touching rings into minimal rings, classifies shells and holes,
/// and assigns free holes to their containing shells.
pub fn build_polygons(graph: &mut OverlayGraph) -> Result<Vec<Geometry>, TopologyError> {
    for nk in graph.node_order.clone() {
        graph.link_result_directed_edges(nk)?;
    }

    let mut rings: Vec<EdgeRing> = Vec::new();
    let mut max_ring_ids = Vec::new();
    for dk in graph.dir_edge_order.clone() {
        let de = &graph.dir_edges[dk];
        if de.in_result && de.label.is_area() && de.ring.is_none() {
            let id = rings.len();
            let ring = EdgeRing::trace(graph, dk, RingKind::Maximal, id)?;
            rings.push(ring);
            max_ring_ids.push(id);
        }
    }

    let mut shells: Vec<usize> = Vec::new();
    let mut free_holes: Vec<usize> = Vec::new();
    let mut simple_rings: Vec<usize> = Vec::new();

    for id in max_ring_ids {
        if rings[id].max_node_degree(graph) > 2 {
            let min_ring_ids = decompose_maximal_ring(graph, &mut rings, id)?;
            assign_shells_and_holes(&mut rings, min_ring_ids, &mut shells, &mut free_holes);
        } else {
            simple_rings.push(id);
        }
    }
    for id in simple_rings {
        if rings[id].is_hole {
            free_holes.push(id);
        } else {
            shells.push(id);
        }
    }

    place_free_holes(&mut rings, &shells, free_holes)?;
    debug!(
        shells = shells.len(),
        rings = rings.len(),
        "polygon rings assembled"
    );

    Ok(shells
        .iter()
        .map(|&sid| Geometry::Polygon(rings[sid].to_polygon(&rings)))
        .collect())
}

/// Re-links a self-touching maximal ring at every node it passes through,
/// then traces the resulting minimal rings.
fn decompose_maximal_ring(
    graph: &mut OverlayGraph,
    rings: &mut Vec<EdgeRing>,
    id: usize,
) -> Result<Vec<usize>, TopologyError> {
    for dk in rings[id].dir_edges.clone() {
        let nk = graph.dir_edges[dk].origin;
        graph.link_minimal_directed_edges(nk, id);
    }
    let mut min_ring_ids = Vec::new();
    for dk in rings[id].dir_edges.clone() {
        if graph.dir_edges[dk].min_ring.is_none() {
            let min_id = rings.len();
            let ring = EdgeRing::trace(graph, dk, RingKind::Minimal, min_id)?;
            rings.push(ring);
            min_ring_ids.push(min_id);
        }
    }
    Ok(min_ring_ids)
}

/// The minimal rings of one maximal ring are either one shell plus its
/// adjacent holes, or a set of holes connected only through containment
/// (free holes, placed later).
fn assign_shells_and_holes(
    rings: &mut [EdgeRing],
    min_ring_ids: Vec<usize>,
    shells: &mut Vec<usize>,
    free_holes: &mut Vec<usize>,
) {
    let shell_ids: Vec<usize> = min_ring_ids
        .iter()
        .copied()
        .filter(|&id| !rings[id].is_hole)
        .collect();
    debug_assert!(shell_ids.len() <= 1, "found two shells in minimal ring list");
    match shell_ids.first() {
        Some(&shell) => {
            for id in min_ring_ids {
                if rings[id].is_hole {
                    rings[id].shell = Some(shell);
                    rings[shell].holes.push(id);
                }
            }
            shells.push(shell);
        }
        None => free_holes.extend(min_ring_ids),
    }
}

/// Assigns each free hole to the smallest shell that properly contains
/// it. Free holes are always properly contained in their parent shell
/// (holes touching the shell were part of its maximal ring), so a single
/// interior point test suffices.
fn place_free_holes(
    rings: &mut [EdgeRing],
    shells: &[usize],
    free_holes: Vec<usize>,
) -> Result<(), TopologyError> {
    for hole in free_holes {
        if rings[hole].shell.is_some() {
            continue;
        }
        let shell = find_containing_shell(rings, hole, shells).ok_or_else(|| {
            TopologyError::at("unable to assign free hole to a shell", rings[hole].pts[0])
        })?;
        rings[hole].shell = Some(shell);
        rings[shell].holes.push(hole);
    }
    Ok(())
}

/// The smallest-area shell whose ring strictly contains the hole.
fn find_containing_shell(rings: &[EdgeRing], hole: usize, shells: &[usize]) -> Option<usize> {
    let hole_env = rings[hole].envelope();
    let mut best: Option<usize> = None;
    let mut best_area = f64::INFINITY;

    for &sid in shells {
        let shell_env = rings[sid].envelope();
        // a hole's envelope can never equal its shell's (this also guards
        // against testing a ring against itself)
        if shell_env == hole_env {
            continue;
        }
        if !shell_env.contains(&hole_env) {
            continue;
        }
        let test_pt = point_not_in_ring(&rings[hole].pts, &rings[sid].pts);
        if locate_point_in_ring(&test_pt, &rings[sid].pts) == Location::Interior {
            let area = rings[sid].area();
            if best.is_none() || area < best_area {
                best = Some(sid);
                best_area = area;
            }
        }
    }
    best
}

/// A point of `pts` that is not a vertex of `ring`, so that strict
/// containment can be decided; falls back to the first point.
fn point_not_in_ring(pts: &[Coordinate], ring: &[Coordinate]) -> Coordinate {
    *pts.iter()
        .find(|p| !ring.iter().any(|r| r.equals_2d(p)))
        .unwrap_or(&pts[0])
}
