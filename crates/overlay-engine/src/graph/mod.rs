//! The overlay planar graph: nodes keyed by coordinate, each holding a
//! star of outgoing directed edges ordered counterclockwise. Nodes, edges,
//! and directed edges live in arenas and refer to each other by handle.

pub mod edge;
pub mod edge_table;

use std::collections::HashMap;

use planar_geom::algorithm::locate::{locate_point_in_areas, PointLocator};
use planar_geom::algorithm::orientation::orientation_index;
use planar_geom::{Coordinate, Geometry, Location};
use slotmap::{new_key_type, SlotMap};

use crate::error::TopologyError;
use crate::topology::{Label, Position};
use edge::Edge;

new_key_type! {
    pub struct EdgeKey;
    pub struct DirEdgeKey;
    pub struct NodeKey;
}

/// An edge traversed in one direction. The twin (`sym`) traverses the same
/// edge the other way; `next` and `next_min` are the result-ring links.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    pub edge: EdgeKey,
    pub origin: NodeKey,
    pub sym: DirEdgeKey,
    pub next: Option<DirEdgeKey>,
    pub next_min: Option<DirEdgeKey>,
    pub label: Label,
    pub is_forward: bool,
    pub in_result: bool,
    pub visited: bool,
    /// The maximal edge ring this edge has been assigned to.
    pub ring: Option<usize>,
    /// The minimal edge ring this edge has been assigned to.
    pub min_ring: Option<usize>,
    /// First two points in the direction of travel; fix the outgoing
    /// azimuth at the origin node.
    pub p0: Coordinate,
    pub p1: Coordinate,
    quadrant: u8,
}

impl DirectedEdge {
    fn new(edge: EdgeKey, p0: Coordinate, p1: Coordinate, label: Label, is_forward: bool) -> Self {
        Self {
            edge,
            origin: NodeKey::default(),
            sym: DirEdgeKey::default(),
            next: None,
            next_min: None,
            label,
            is_forward,
            in_result: false,
            visited: false,
            ring: None,
            min_ring: None,
            p0,
            p1,
            quadrant: quadrant(p1.x - p0.x, p1.y - p0.y),
        }
    }

    fn dx(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    fn dy(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    pub fn ring_of(&self, kind: RingKind) -> Option<usize> {
        match kind {
            RingKind::Maximal => self.ring,
            RingKind::Minimal => self.min_ring,
        }
    }
}

/// Discriminates the two ring-tracing modes: maximal rings follow the
/// `next` links laid down at result linking, minimal rings follow the
/// `next_min` links laid down when a maximal ring is decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Maximal,
    Minimal,
}

/// A graph node: a coordinate, its own label, and the star of outgoing
/// directed edges in CCW order of azimuth.
#[derive(Debug, Clone)]
pub struct Node {
    pub coord: Coordinate,
    pub label: Label,
    pub star: Vec<DirEdgeKey>,
}

impl Node {
    pub fn is_isolated(&self) -> bool {
        self.star.is_empty()
    }
}

/// The noded planar graph of one overlay invocation.
#[derive(Debug, Default)]
pub struct OverlayGraph {
    pub edges: SlotMap<EdgeKey, Edge>,
    pub dir_edges: SlotMap<DirEdgeKey, DirectedEdge>,
    pub nodes: SlotMap<NodeKey, Node>,
    /// Directed edges in insertion order (forward then reverse, per edge).
    pub dir_edge_order: Vec<DirEdgeKey>,
    /// Nodes in insertion order.
    pub node_order: Vec<NodeKey>,
    node_lookup: HashMap<(u64, u64), NodeKey>,
}

impl OverlayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Construction ───────────────────────────────────────────────────

    /// Inserts an edge and its two directed edges, splicing each into the
    /// star of its origin node.
    pub fn add_edge(&mut self, edge: Edge) {
        debug_assert!(edge.num_points() >= 2);
        let n = edge.num_points();
        let (p0, p1) = (edge.coords[0], edge.coords[1]);
        let (q0, q1) = (edge.coords[n - 1], edge.coords[n - 2]);
        let label = edge.label;

        let ek = self.edges.insert(edge);
        let fwd = self
            .dir_edges
            .insert(DirectedEdge::new(ek, p0, p1, label, true));
        let rev = self
            .dir_edges
            .insert(DirectedEdge::new(ek, q0, q1, label.flipped(), false));
        self.dir_edges[fwd].sym = rev;
        self.dir_edges[rev].sym = fwd;
        self.dir_edge_order.push(fwd);
        self.dir_edge_order.push(rev);
        self.attach_to_origin(fwd);
        self.attach_to_origin(rev);
    }

    pub fn find_or_add_node(&mut self, coord: Coordinate) -> NodeKey {
        if let Some(&nk) = self.node_lookup.get(&coord.hash_key()) {
            return nk;
        }
        let nk = self.nodes.insert(Node {
            coord,
            label: Label::empty(),
            star: Vec::new(),
        });
        self.node_lookup.insert(coord.hash_key(), nk);
        self.node_order.push(nk);
        nk
    }

    /// Copies an operand's explicit nodes into the graph. The operand's
    /// node location overrides anything previously computed for that
    /// operand, so that e.g. a crossing point that is also an input vertex
    /// keeps its boundary-rule classification.
    pub fn copy_operand_nodes(&mut self, operand: usize, nodes: &[(Coordinate, Location)]) {
        for (coord, loc) in nodes {
            let nk = self.find_or_add_node(*coord);
            self.nodes[nk].label.set_on_location(operand, *loc);
        }
    }

    fn attach_to_origin(&mut self, dk: DirEdgeKey) {
        let coord = self.dir_edges[dk].p0;
        let nk = self.find_or_add_node(coord);
        self.dir_edges[dk].origin = nk;

        // splice into the star, keeping CCW order of outgoing azimuth
        let star = &self.nodes[nk].star;
        let mut insert_at = star.len();
        for (i, &other) in star.iter().enumerate() {
            if self.compare_direction(dk, other) == std::cmp::Ordering::Less {
                insert_at = i;
                break;
            }
        }
        self.nodes[nk].star.insert(insert_at, dk);
    }

    /// Total order on outgoing direction: by quadrant, then by robust
    /// orientation within the quadrant. Ascending order is CCW from the
    /// positive x-axis.
    fn compare_direction(&self, a: DirEdgeKey, b: DirEdgeKey) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        let (ea, eb) = (&self.dir_edges[a], &self.dir_edges[b]);
        if ea.dx() == eb.dx() && ea.dy() == eb.dy() {
            return Ordering::Equal;
        }
        match ea.quadrant.cmp(&eb.quadrant) {
            Ordering::Equal => match orientation_index(&eb.p0, &eb.p1, &ea.p1) {
                1 => Ordering::Greater,
                -1 => Ordering::Less,
                _ => Ordering::Equal,
            },
            other => other,
        }
    }

    pub fn degree(&self, nk: NodeKey) -> usize {
        self.nodes[nk].star.len()
    }

    // ─── Labelling ──────────────────────────────────────────────────────

    /// Computes complete two-operand labels for every directed edge and
    /// node: side-label propagation around each star, twin-label merging,
    /// and node-label aggregation. Stars with no edges from one operand
    /// fall back to locating the node against that operand's geometry.
    pub fn compute_labelling(&mut self, inputs: [&Geometry; 2]) -> Result<(), TopologyError> {
        let node_keys = self.node_order.clone();
        for &nk in &node_keys {
            self.compute_star_labelling(nk, inputs)?;
        }
        self.merge_sym_labels();
        self.update_node_labelling();
        Ok(())
    }

    fn compute_star_labelling(
        &mut self,
        nk: NodeKey,
        inputs: [&Geometry; 2],
    ) -> Result<(), TopologyError> {
        self.propagate_side_labels(nk, 0)?;
        self.propagate_side_labels(nk, 1)?;

        // A line label with a Boundary On location marks a dimensional
        // collapse of that operand at this node; edges with missing
        // locations for such an operand are exterior to it.
        let star = self.nodes[nk].star.clone();
        let mut has_collapse = [false, false];
        for &dk in &star {
            let label = self.dir_edges[dk].label;
            for operand in 0..2 {
                if label.is_line_at(operand)
                    && label.on_location(operand) == Some(Location::Boundary)
                {
                    has_collapse[operand] = true;
                }
            }
        }

        let coord = self.nodes[nk].coord;
        let mut located: [Option<Location>; 2] = [None, None];
        for &dk in &star {
            for operand in 0..2 {
                if self.dir_edges[dk].label.is_any_null(operand) {
                    // only area containment matters for side locations, so
                    // the fallback ignores lineal and puntal components
                    let loc = if has_collapse[operand] {
                        Location::Exterior
                    } else {
                        *located[operand]
                            .get_or_insert_with(|| locate_point_in_areas(&coord, inputs[operand]))
                    };
                    self.dir_edges[dk]
                        .label
                        .set_all_locations_if_null(operand, loc);
                }
            }
        }
        Ok(())
    }

    /// Walks the star in CCW order, filling unknown side locations from
    /// the labelled neighbours. Since the star is ordered CCW, moving from
    /// one edge to the next crosses from its right side to its left side.
    fn propagate_side_labels(&mut self, nk: NodeKey, operand: usize) -> Result<(), TopologyError> {
        let star = self.nodes[nk].star.clone();

        // start from the location of the last labelled Left side, if any
        let mut start_loc = None;
        for &dk in &star {
            let label = &self.dir_edges[dk].label;
            if label.is_area_at(operand) {
                if let Some(left) = label.location(operand, Position::Left) {
                    start_loc = Some(left);
                }
            }
        }
        let Some(start_loc) = start_loc else {
            // no labelled sides for this operand at this node
            return Ok(());
        };

        let node_coord = self.nodes[nk].coord;
        let mut curr_loc = start_loc;
        for &dk in &star {
            let label = &mut self.dir_edges[dk].label;
            if label.on_location(operand).is_none() {
                label.set_on_location(operand, curr_loc);
            }
            if !label.is_area_at(operand) {
                continue;
            }
            let left = label.location(operand, Position::Left);
            match label.location(operand, Position::Right) {
                Some(right) => {
                    if right != curr_loc {
                        return Err(TopologyError::at("side location conflict", node_coord));
                    }
                    debug_assert!(left.is_some(), "found single null side");
                    curr_loc = left.unwrap_or(curr_loc);
                }
                None => {
                    debug_assert!(left.is_none(), "found single null side");
                    label.set_location(operand, Position::Right, curr_loc);
                    label.set_location(operand, Position::Left, curr_loc);
                }
            }
        }
        Ok(())
    }

    /// Merges each directed edge's label with its twin's, flipped so that
    /// the twin's side locations align spatially. Edges from only one
    /// operand pick up the other operand's location inferred at the twin's
    /// origin.
    fn merge_sym_labels(&mut self) {
        for &dk in &self.dir_edge_order.clone() {
            let sym_label = self.dir_edges[self.dir_edges[dk].sym].label.flipped();
            self.dir_edges[dk].label.merge(&sym_label);
        }
    }

    /// Merges the aggregate label of each star into its node's label. A
    /// node lying on any incident edge of an operand is interior to that
    /// operand unless an explicit node position says otherwise.
    fn update_node_labelling(&mut self) {
        for &nk in &self.node_order.clone() {
            let mut star_label = Label::empty();
            for &dk in &self.nodes[nk].star {
                let edge_label = self.edges[self.dir_edges[dk].edge].label;
                for operand in 0..2 {
                    if matches!(
                        edge_label.on_location(operand),
                        Some(Location::Interior) | Some(Location::Boundary)
                    ) {
                        star_label.set_on_location(operand, Location::Interior);
                    }
                }
            }
            self.nodes[nk].label.merge(&star_label);
        }
    }

    /// Labels isolated nodes by locating them against the operand whose
    /// slot is missing, then completes incident edge labels from the node
    /// labels.
    pub fn label_incomplete_nodes(&mut self, inputs: [&Geometry; 2], locator: &PointLocator) {
        for &nk in &self.node_order.clone() {
            if self.nodes[nk].is_isolated() {
                let target = if self.nodes[nk].label.is_null(0) { 0 } else { 1 };
                let loc = locator.locate(&self.nodes[nk].coord, inputs[target]);
                self.nodes[nk].label.set_on_location(target, loc);
            }
            let node_label = self.nodes[nk].label;
            for &dk in &self.nodes[nk].star.clone() {
                for operand in 0..2 {
                    if let Some(loc) = node_label.on_location(operand) {
                        self.dir_edges[dk]
                            .label
                            .set_all_locations_if_null(operand, loc);
                    }
                }
            }
        }
    }

    // ─── Result selection ───────────────────────────────────────────────

    /// An interior-area edge lies in the interior of the area of both
    /// operands; such edges are dimensional-collapse artifacts and never
    /// form part of a result boundary.
    pub fn is_interior_area_edge(&self, dk: DirEdgeKey) -> bool {
        let label = &self.dir_edges[dk].label;
        (0..2).all(|operand| {
            label.is_area_at(operand)
                && label.location(operand, Position::Left) == Some(Location::Interior)
                && label.location(operand, Position::Right) == Some(Location::Interior)
        })
    }

    /// A line edge carries only linework: line-labelled on some operand
    /// and not interior to either operand's area.
    pub fn is_line_edge(&self, dk: DirEdgeKey) -> bool {
        let label = &self.dir_edges[dk].label;
        let is_line = label.is_line_at(0) || label.is_line_at(1);
        let exterior_if_area_0 =
            !label.is_area_at(0) || label.all_positions_equal(0, Location::Exterior);
        let exterior_if_area_1 =
            !label.is_area_at(1) || label.all_positions_equal(1, Location::Exterior);
        is_line && exterior_if_area_0 && exterior_if_area_1
    }

    /// Marks a directed edge and its twin as visited.
    pub fn set_visited_edge(&mut self, dk: DirEdgeKey) {
        let sym = self.dir_edges[dk].sym;
        self.dir_edges[dk].visited = true;
        self.dir_edges[sym].visited = true;
    }

    /// If a directed edge and its twin are both in the result, the edge is
    /// a shared boundary the boolean operation has cancelled; clear both.
    pub fn cancel_duplicate_result_edges(&mut self) {
        for &dk in &self.dir_edge_order {
            let sym = self.dir_edges[dk].sym;
            if self.dir_edges[dk].in_result && self.dir_edges[sym].in_result {
                self.dir_edges[dk].in_result = false;
                self.dir_edges[sym].in_result = false;
            }
        }
    }

    /// The star's edges that carry a result area on either side, in CCW
    /// order.
    fn result_area_edges(&self, nk: NodeKey) -> Vec<DirEdgeKey> {
        self.nodes[nk]
            .star
            .iter()
            .copied()
            .filter(|&dk| {
                self.dir_edges[dk].in_result || self.dir_edges[self.dir_edges[dk].sym].in_result
            })
            .collect()
    }

    /// Links each in-result incoming edge to the next in-result outgoing
    /// edge in CCW order, forming the `next` pointers that ring tracing
    /// follows.
    pub fn link_result_directed_edges(&mut self, nk: NodeKey) -> Result<(), TopologyError> {
        let result_edges = self.result_area_edges(nk);

        let mut first_out: Option<DirEdgeKey> = None;
        let mut incoming: Option<DirEdgeKey> = None;
        let mut linking = false;

        for &next_out in &result_edges {
            let next_in = self.dir_edges[next_out].sym;
            if !self.dir_edges[next_out].label.is_area() {
                continue;
            }
            if first_out.is_none() && self.dir_edges[next_out].in_result {
                first_out = Some(next_out);
            }
            if !linking {
                if !self.dir_edges[next_in].in_result {
                    continue;
                }
                incoming = Some(next_in);
                linking = true;
            } else {
                if !self.dir_edges[next_out].in_result {
                    continue;
                }
                self.dir_edges[incoming.expect("linking state")].next = Some(next_out);
                incoming = None;
                linking = false;
            }
        }
        if linking {
            let Some(first_out) = first_out else {
                return Err(TopologyError::at(
                    "no outgoing dirEdge found",
                    self.nodes[nk].coord,
                ));
            };
            debug_assert!(
                self.dir_edges[first_out].in_result,
                "unable to link last incoming dirEdge"
            );
            self.dir_edges[incoming.expect("linking state")].next = Some(first_out);
        }
        Ok(())
    }

    /// Links the edges of one maximal ring into minimal rings at this
    /// node: each of the ring's incoming edges is linked to the next of
    /// the ring's outgoing edges in CW order.
    pub fn link_minimal_directed_edges(&mut self, nk: NodeKey, max_ring: usize) {
        let result_edges = self.result_area_edges(nk);

        let mut first_out: Option<DirEdgeKey> = None;
        let mut incoming: Option<DirEdgeKey> = None;
        let mut linking = false;

        for &next_out in result_edges.iter().rev() {
            let next_in = self.dir_edges[next_out].sym;
            if first_out.is_none() && self.dir_edges[next_out].ring == Some(max_ring) {
                first_out = Some(next_out);
            }
            if !linking {
                if self.dir_edges[next_in].ring != Some(max_ring) {
                    continue;
                }
                incoming = Some(next_in);
                linking = true;
            } else {
                if self.dir_edges[next_out].ring != Some(max_ring) {
                    continue;
                }
                self.dir_edges[incoming.expect("linking state")].next_min = Some(next_out);
                incoming = None;
                linking = false;
            }
        }
        if linking {
            let first_out = first_out.expect("found null for first outgoing dirEdge");
            debug_assert_eq!(
                self.dir_edges[first_out].ring,
                Some(max_ring),
                "unable to link last incoming dirEdge"
            );
            self.dir_edges[incoming.expect("linking state")].next_min = Some(first_out);
        }
    }

    /// The number of this ring's outgoing edges at the node.
    pub fn outgoing_degree(&self, nk: NodeKey, ring: usize) -> usize {
        self.nodes[nk]
            .star
            .iter()
            .filter(|&&dk| self.dir_edges[dk].ring == Some(ring))
            .count()
    }

    // ─── Line coverage ──────────────────────────────────────────────────

    /// Determines coverage of line edges at a node that also has result
    /// area edges: traversing the star CCW, track whether the current
    /// angular sector is inside or outside the result area, and mark line
    /// edges accordingly. Line edges at nodes without area edges are left
    /// undetermined.
    pub fn find_covered_line_edges(&mut self, nk: NodeKey) {
        let star = self.nodes[nk].star.clone();

        // find a starting location by scanning for an area edge
        let mut start_loc: Option<Location> = None;
        for &next_out in &star {
            let next_in = self.dir_edges[next_out].sym;
            if !self.is_line_edge(next_out) {
                if self.dir_edges[next_out].in_result {
                    start_loc = Some(Location::Interior);
                    break;
                }
                if self.dir_edges[next_in].in_result {
                    start_loc = Some(Location::Exterior);
                    break;
                }
            }
        }
        let Some(start_loc) = start_loc else {
            return;
        };

        let mut curr_loc = start_loc;
        for &next_out in &star {
            let next_in = self.dir_edges[next_out].sym;
            if self.is_line_edge(next_out) {
                let ek = self.dir_edges[next_out].edge;
                self.edges[ek].covered = Some(curr_loc == Location::Interior);
            } else {
                if self.dir_edges[next_out].in_result {
                    curr_loc = Location::Exterior;
                }
                if self.dir_edges[next_in].in_result {
                    curr_loc = Location::Interior;
                }
            }
        }
    }
}

/// Quadrant of a direction vector: 0 = NE, 1 = NW, 2 = SW, 3 = SE,
/// numbered CCW from the positive x-axis.
fn quadrant(dx: f64, dy: f64) -> u8 {
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}
