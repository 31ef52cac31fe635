use std::collections::HashMap;

use planar_geom::algorithm::orientation;
use planar_geom::{Coordinate, Geometry, Location, PrecisionModel};

use crate::graph::edge::Edge;
use crate::topology::Label;

/// An explicit node of one operand: a vertex position carrying the
/// operand's location there. Linestring endpoints obey the OGC-SFS rule:
/// a point is on the boundary iff it ends an odd number of components.
#[derive(Debug, Clone, Copy)]
struct OperandNode {
    coord: Coordinate,
    location: Location,
    boundary_count: usize,
}

/// The edges and explicit nodes contributed by a single operand geometry.
/// Edges carry their initial topology label: polygon boundaries are
/// labelled Boundary with Interior/Exterior sides determined by ring
/// orientation, linestrings are labelled Interior.
#[derive(Debug)]
pub struct OperandGraph {
    pub operand: usize,
    pub edges: Vec<Edge>,
    /// Ring edges of a valid polygonal operand can only self-intersect at
    /// vertices, so same-edge intersection tests are skipped for them.
    is_polygonal: bool,
    nodes: Vec<OperandNode>,
    node_index: HashMap<(u64, u64), usize>,
}

impl OperandGraph {
    /// Builds the operand's edges and explicit nodes. When `snap` is set,
    /// every input coordinate is first rounded to the fixed grid (the
    /// snap-rounding pathway).
    pub fn build(operand: usize, geom: &Geometry, snap: Option<&PrecisionModel>) -> Self {
        let mut graph = Self {
            operand,
            edges: Vec::new(),
            is_polygonal: geom.is_polygonal(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
        };
        graph.add_geometry(geom, snap);
        graph
    }

    fn add_geometry(&mut self, geom: &Geometry, snap: Option<&PrecisionModel>) {
        match geom {
            Geometry::Point(Some(c)) => {
                let c = snapped(c, snap);
                self.insert_point(c, Location::Interior);
            }
            Geometry::Point(None) => {}
            Geometry::LineString(coords) => self.add_line_string(coords, snap),
            Geometry::Polygon(poly) => {
                self.add_polygon_ring(&poly.exterior, Location::Exterior, Location::Interior, snap);
                for hole in &poly.interiors {
                    self.add_polygon_ring(hole, Location::Interior, Location::Exterior, snap);
                }
            }
            Geometry::MultiPoint(pts) => {
                for c in pts {
                    self.insert_point(snapped(c, snap), Location::Interior);
                }
            }
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    self.add_line_string(l, snap);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for p in polys {
                    self.add_polygon_ring(&p.exterior, Location::Exterior, Location::Interior, snap);
                    for hole in &p.interiors {
                        self.add_polygon_ring(hole, Location::Interior, Location::Exterior, snap);
                    }
                }
            }
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    self.add_geometry(part, snap);
                }
            }
        }
    }

    fn add_line_string(&mut self, coords: &[Coordinate], snap: Option<&PrecisionModel>) {
        let coords = clean_coords(coords, snap);
        if coords.len() < 2 {
            return;
        }
        let first = coords[0];
        let last = coords[coords.len() - 1];
        self.edges
            .push(Edge::new(coords, Label::line_at(self.operand, Location::Interior)));
        self.insert_boundary_point(first);
        self.insert_boundary_point(last);
    }

    /// `cw_left`/`cw_right` are the side locations when the ring is wound
    /// clockwise; they are swapped for a counterclockwise ring.
    fn add_polygon_ring(
        &mut self,
        ring: &[Coordinate],
        cw_left: Location,
        cw_right: Location,
        snap: Option<&PrecisionModel>,
    ) {
        let coords = clean_coords(ring, snap);
        // collapsed or degenerate rings contribute nothing
        if coords.len() < 4 {
            return;
        }
        let (left, right) = if orientation::is_ccw(&coords) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let start = coords[0];
        self.edges.push(Edge::new(
            coords,
            Label::area_at(self.operand, Location::Boundary, left, right),
        ));
        self.insert_point(start, Location::Boundary);
    }

    fn insert_point(&mut self, coord: Coordinate, location: Location) {
        match self.node_index.get(&coord.hash_key()) {
            Some(&i) => self.nodes[i].location = location,
            None => {
                self.node_index.insert(coord.hash_key(), self.nodes.len());
                self.nodes.push(OperandNode {
                    coord,
                    location,
                    boundary_count: 0,
                });
            }
        }
    }

    fn insert_boundary_point(&mut self, coord: Coordinate) {
        match self.node_index.get(&coord.hash_key()) {
            Some(&i) => {
                let node = &mut self.nodes[i];
                node.boundary_count += 1;
                node.location = if node.boundary_count % 2 == 1 {
                    Location::Boundary
                } else {
                    Location::Interior
                };
            }
            None => {
                self.node_index.insert(coord.hash_key(), self.nodes.len());
                self.nodes.push(OperandNode {
                    coord,
                    location: Location::Boundary,
                    boundary_count: 1,
                });
            }
        }
    }

    /// Registers an operand self-intersection point as an explicit node.
    /// An established boundary node is never demoted.
    pub(crate) fn add_self_intersection_node(&mut self, coord: Coordinate, edge_loc: Location) {
        if let Some(&i) = self.node_index.get(&coord.hash_key()) {
            if self.nodes[i].location == Location::Boundary {
                return;
            }
        }
        if edge_loc == Location::Boundary {
            self.insert_boundary_point(coord);
        } else {
            self.insert_point(coord, edge_loc);
        }
    }

    pub(crate) fn is_polygonal(&self) -> bool {
        self.is_polygonal
    }

    /// Registers every accumulated self-intersection point as an explicit
    /// node. Must run after self-noding and before cross-operand noding,
    /// so that only this operand's own intersections are recorded.
    pub(crate) fn add_self_intersection_nodes(&mut self) {
        let mut found: Vec<(Coordinate, Location)> = Vec::new();
        for edge in &self.edges {
            let edge_loc = edge
                .label
                .on_location(self.operand)
                .unwrap_or(Location::Interior);
            for ei in edge.intersections() {
                found.push((ei.coord, edge_loc));
            }
        }
        for (coord, loc) in found {
            self.add_self_intersection_node(coord, loc);
        }
    }

    /// Splits all edges at their recorded intersection points.
    pub fn add_split_edges(&self, out: &mut Vec<Edge>) {
        for edge in &self.edges {
            edge.add_split_edges(out);
        }
    }

    /// The operand's explicit nodes, in insertion order.
    pub fn into_nodes(self) -> Vec<(Coordinate, Location)> {
        self.nodes.into_iter().map(|n| (n.coord, n.location)).collect()
    }
}

fn snapped(c: &Coordinate, snap: Option<&PrecisionModel>) -> Coordinate {
    match snap {
        Some(pm) => pm.snapped(c),
        None => *c,
    }
}

/// Optionally snaps, then removes repeated consecutive points.
fn clean_coords(coords: &[Coordinate], snap: Option<&PrecisionModel>) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords {
        let c = snapped(c, snap);
        if out.last().map_or(true, |prev| !prev.equals_2d(&c)) {
            out.push(c);
        }
    }
    out
}
