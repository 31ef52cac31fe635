use std::collections::HashMap;

use tracing::debug;

use crate::graph::edge::Edge;
use crate::topology::Position;

/// Deduplicates noded edges by coordinate sequence (up to reversal),
/// merging labels and accumulating signed depths, then detects and
/// replaces dimensionally collapsed edges.
#[derive(Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    index: HashMap<Vec<(u64, u64)>, usize>,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a list of noded edges and resolves depths and collapses,
    /// producing the final edge set for the overlay graph.
    pub fn merge_edges(noded: Vec<Edge>) -> Vec<Edge> {
        let mut table = EdgeTable::new();
        for e in noded {
            table.insert(e);
        }
        table.compute_labels_from_depths();
        table.replace_collapsed_edges();
        debug!(merged_edges = table.edges.len(), "edge table merged");
        table.into_edges()
    }

    /// Inserts an edge, merging it into an equal existing edge if one is
    /// present. A reversed duplicate has its label flipped before the
    /// merge so that its side locations align with the resident edge. The
    /// first duplicate initializes the resident's depths from its own
    /// label.
    pub fn insert(&mut self, e: Edge) {
        let key = e.canonical_key();
        match self.index.get(&key) {
            Some(&i) => {
                let existing = &mut self.edges[i];
                let mut label_to_merge = e.label;
                if !existing.is_pointwise_equal(&e) {
                    label_to_merge.flip();
                }
                if existing.depth.is_null() {
                    let resident_label = existing.label;
                    existing.depth.add_label(&resident_label);
                }
                existing.depth.add_label(&label_to_merge);
                existing.label.merge(&label_to_merge);
            }
            None => {
                self.index.insert(key, self.edges.len());
                self.edges.push(e);
            }
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// Rewrites the labels of merged edges from their normalized depths.
    /// A zero depth delta means the edge has equal locations on both sides
    /// and has dimensionally collapsed to a line; otherwise the side
    /// locations are set from the depths (positive depth = Interior).
    pub fn compute_labels_from_depths(&mut self) {
        for e in &mut self.edges {
            // only edges with duplicates can have collapsed
            if e.depth.is_null() {
                continue;
            }
            e.depth.normalize();
            let mut collapsed = false;
            for operand in 0..2 {
                if !e.label.is_null(operand)
                    && e.label.is_area()
                    && !e.depth.is_null_at(operand)
                {
                    if e.depth.delta(operand) == 0 {
                        e.label.to_line(operand);
                        collapsed = true;
                    } else {
                        debug_assert!(!e.depth.is_null_at_pos(operand, Position::Left));
                        debug_assert!(!e.depth.is_null_at_pos(operand, Position::Right));
                        e.label.set_location(
                            operand,
                            Position::Left,
                            e.depth.location_at(operand, Position::Left),
                        );
                        e.label.set_location(
                            operand,
                            Position::Right,
                            e.depth.location_at(operand, Position::Right),
                        );
                    }
                }
            }
            // fully collapsed only when no operand retains an actual area
            // labelling (an area-sized slot with no locations is not one)
            let retains_area =
                (0..2).any(|operand| e.label.is_area_at(operand) && !e.label.is_null(operand));
            e.collapsed = collapsed && !retains_area;
        }
    }

    /// Removes collapsed edges and re-inserts their line-edge
    /// replacements at the end of the table.
    pub fn replace_collapsed_edges(&mut self) {
        let mut replacements = Vec::new();
        self.edges.retain(|e| {
            if e.collapsed {
                replacements.push(e.collapsed_edge());
                false
            } else {
                true
            }
        });
        if !replacements.is_empty() {
            // positional index is stale from here on; only the edge list
            // itself is consumed downstream
            self.index.clear();
            self.edges.extend(replacements);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Label;
    use planar_geom::{Coordinate, Location};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn boundary_edge(pts: &[(f64, f64)], operand: usize, left: Location, right: Location) -> Edge {
        Edge::new(
            pts.iter().map(|&(x, y)| c(x, y)).collect(),
            Label::area_at(operand, Location::Boundary, left, right),
        )
    }

    #[test]
    fn test_distinct_edges_kept() {
        let mut table = EdgeTable::new();
        table.insert(boundary_edge(
            &[(0.0, 0.0), (1.0, 0.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        table.insert(boundary_edge(
            &[(1.0, 0.0), (1.0, 1.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        assert_eq!(table.edges().len(), 2);
    }

    #[test]
    fn test_cross_operand_duplicate_merges_labels() {
        // A and B share a boundary segment, traversed in the same direction
        let mut table = EdgeTable::new();
        table.insert(boundary_edge(
            &[(0.0, 0.0), (1.0, 0.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        table.insert(boundary_edge(
            &[(0.0, 0.0), (1.0, 0.0)],
            1,
            Location::Exterior,
            Location::Interior,
        ));
        assert_eq!(table.edges().len(), 1);
        let label = table.edges()[0].label;
        assert_eq!(label.location(0, Position::Right), Some(Location::Interior));
        assert_eq!(label.location(1, Position::Right), Some(Location::Interior));
    }

    #[test]
    fn test_reversed_duplicate_is_flipped_before_merge() {
        let mut table = EdgeTable::new();
        table.insert(boundary_edge(
            &[(0.0, 0.0), (1.0, 0.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        // same segment from operand 1, reversed: its left side faces what
        // is the resident's right side
        table.insert(boundary_edge(
            &[(1.0, 0.0), (0.0, 0.0)],
            1,
            Location::Interior,
            Location::Exterior,
        ));
        let label = table.edges()[0].label;
        assert_eq!(label.location(1, Position::Right), Some(Location::Interior));
    }

    #[test]
    fn test_same_operand_opposed_duplicate_collapses() {
        // two polygons of one operand sharing an edge: interior on both
        // sides, so the shared boundary collapses to a line
        let mut table = EdgeTable::new();
        table.insert(boundary_edge(
            &[(0.0, 0.0), (1.0, 0.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        table.insert(boundary_edge(
            &[(1.0, 0.0), (0.0, 0.0)],
            0,
            Location::Exterior,
            Location::Interior,
        ));
        table.compute_labels_from_depths();
        assert!(table.edges()[0].collapsed);
        table.replace_collapsed_edges();
        let label = table.edges()[0].label;
        assert!(label.is_line_at(0));
        assert_eq!(label.on_location(0), Some(Location::Boundary));
        assert!(!table.edges()[0].collapsed);
    }
}
