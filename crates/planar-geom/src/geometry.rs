use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::algorithm::orientation;
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;

/// A polygon: one exterior ring plus zero or more interior rings (holes).
/// Rings are closed coordinate sequences (first point == last point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Coordinate>,
    pub interiors: Vec<Vec<Coordinate>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Coordinate>, interiors: Vec<Vec<Coordinate>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    pub fn empty() -> Self {
        Self {
            exterior: Vec::new(),
            interiors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_coordinates(&self.exterior)
    }

    pub fn area(&self) -> f64 {
        let mut area = orientation::signed_area(&self.exterior).abs();
        for hole in &self.interiors {
            area -= orientation::signed_area(hole).abs();
        }
        area
    }
}

/// A planar geometry value. Multi-part variants hold their parts directly;
/// heterogeneous results are `GeometryCollection`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Option<Coordinate>),
    LineString(Vec<Coordinate>),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The inherent dimension of the geometry type: 0 for puntal, 1 for
    /// lineal, 2 for polygonal. A collection has the maximum dimension of
    /// its parts, or -1 when it has none.
    pub fn dimension(&self) -> i32 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::GeometryCollection(parts) => {
                parts.iter().map(|g| g.dimension()).max().unwrap_or(-1)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(c) => c.is_none(),
            Geometry::LineString(coords) => coords.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPoint(pts) => pts.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| l.is_empty()),
            Geometry::MultiPolygon(polys) => polys.iter().all(|p| p.is_empty()),
            Geometry::GeometryCollection(parts) => parts.iter().all(|g| g.is_empty()),
        }
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        match self {
            Geometry::Point(Some(c)) => env.expand_to_include(c),
            Geometry::Point(None) => {}
            Geometry::LineString(coords) => env = Envelope::from_coordinates(coords),
            Geometry::Polygon(p) => env = p.envelope(),
            Geometry::MultiPoint(pts) => env = Envelope::from_coordinates(pts),
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    env.expand_to_include_envelope(&Envelope::from_coordinates(l));
                }
            }
            Geometry::MultiPolygon(polys) => {
                for p in polys {
                    env.expand_to_include_envelope(&p.envelope());
                }
            }
            Geometry::GeometryCollection(parts) => {
                for g in parts {
                    env.expand_to_include_envelope(&g.envelope());
                }
            }
        }
        env
    }

    /// Total area of the polygonal components.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(polys) => polys.iter().map(|p| p.area()).sum(),
            Geometry::GeometryCollection(parts) => parts.iter().map(|g| g.area()).sum(),
            _ => 0.0,
        }
    }

    /// Whether the geometry is polygonal (a `Polygon` or `MultiPolygon`).
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// Returns a canonical form of the geometry: rings start at their
    /// lexicographically least coordinate with exteriors CCW and holes CW,
    /// lines run in canonical direction, and multi-part components are
    /// sorted. Canonical forms of equal geometries compare equal, so this
    /// is the basis for geometry comparison in tests.
    pub fn normalized(&self) -> Geometry {
        match self {
            Geometry::Point(c) => Geometry::Point(*c),
            Geometry::LineString(coords) => Geometry::LineString(normalize_line(coords)),
            Geometry::Polygon(p) => Geometry::Polygon(normalize_polygon(p)),
            Geometry::MultiPoint(pts) => {
                let mut pts = pts.clone();
                pts.sort_by(Coordinate::compare);
                Geometry::MultiPoint(pts)
            }
            Geometry::MultiLineString(lines) => {
                let mut lines: Vec<Vec<Coordinate>> =
                    lines.iter().map(|l| normalize_line(l)).collect();
                lines.sort_by(|a, b| compare_coord_seq(a, b));
                Geometry::MultiLineString(lines)
            }
            Geometry::MultiPolygon(polys) => {
                let mut polys: Vec<Polygon> = polys.iter().map(normalize_polygon).collect();
                polys.sort_by(|a, b| compare_coord_seq(&a.exterior, &b.exterior));
                Geometry::MultiPolygon(polys)
            }
            Geometry::GeometryCollection(parts) => {
                let mut parts: Vec<Geometry> = parts.iter().map(|g| g.normalized()).collect();
                parts.sort_by(compare_geometry);
                Geometry::GeometryCollection(parts)
            }
        }
    }
}

fn normalize_line(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut line = coords.to_vec();
    let reversed: Vec<Coordinate> = line.iter().rev().copied().collect();
    if compare_coord_seq(&reversed, &line) == Ordering::Less {
        line = reversed;
    }
    line
}

fn normalize_polygon(p: &Polygon) -> Polygon {
    let exterior = normalize_ring(&p.exterior, true);
    let mut interiors: Vec<Vec<Coordinate>> =
        p.interiors.iter().map(|r| normalize_ring(r, false)).collect();
    interiors.sort_by(|a, b| compare_coord_seq(a, b));
    Polygon::new(exterior, interiors)
}

/// Rotates a closed ring to start at its least coordinate and orients it
/// CCW (`ccw == true`) or CW.
fn normalize_ring(ring: &[Coordinate], ccw: bool) -> Vec<Coordinate> {
    if ring.len() < 4 {
        return ring.to_vec();
    }
    // drop the closing point, rotate, then re-close
    let open = &ring[..ring.len() - 1];
    let min_index = open
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.compare(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut rotated: Vec<Coordinate> = Vec::with_capacity(ring.len());
    rotated.extend_from_slice(&open[min_index..]);
    rotated.extend_from_slice(&open[..min_index]);
    rotated.push(open[min_index]);
    if orientation::is_ccw(&rotated) != ccw {
        rotated.reverse();
    }
    rotated
}

fn compare_coord_seq(a: &[Coordinate], b: &[Coordinate]) -> Ordering {
    for (ca, cb) in a.iter().zip(b.iter()) {
        let ord = ca.compare(cb);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn type_rank(g: &Geometry) -> u8 {
    match g {
        Geometry::Point(_) => 0,
        Geometry::MultiPoint(_) => 1,
        Geometry::LineString(_) => 2,
        Geometry::MultiLineString(_) => 3,
        Geometry::Polygon(_) => 4,
        Geometry::MultiPolygon(_) => 5,
        Geometry::GeometryCollection(_) => 6,
    }
}

fn flatten_coords(g: &Geometry, out: &mut Vec<Coordinate>) {
    match g {
        Geometry::Point(Some(c)) => out.push(*c),
        Geometry::Point(None) => {}
        Geometry::LineString(coords) | Geometry::MultiPoint(coords) => {
            out.extend_from_slice(coords)
        }
        Geometry::Polygon(p) => {
            out.extend_from_slice(&p.exterior);
            for r in &p.interiors {
                out.extend_from_slice(r);
            }
        }
        Geometry::MultiLineString(lines) => {
            for l in lines {
                out.extend_from_slice(l);
            }
        }
        Geometry::MultiPolygon(polys) => {
            for p in polys {
                flatten_coords(&Geometry::Polygon(p.clone()), out);
            }
        }
        Geometry::GeometryCollection(parts) => {
            for part in parts {
                flatten_coords(part, out);
            }
        }
    }
}

fn compare_geometry(a: &Geometry, b: &Geometry) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    let mut ca = Vec::new();
    let mut cb = Vec::new();
    flatten_coords(a, &mut ca);
    flatten_coords(b, &mut cb);
    compare_coord_seq(&ca, &cb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coordinate> {
        pts.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
    }

    #[test]
    fn test_dimension() {
        assert_eq!(Geometry::Point(None).dimension(), 0);
        assert_eq!(Geometry::LineString(vec![]).dimension(), 1);
        assert_eq!(Geometry::Polygon(Polygon::empty()).dimension(), 2);
        assert_eq!(Geometry::GeometryCollection(vec![]).dimension(), -1);
        let gc = Geometry::GeometryCollection(vec![
            Geometry::Point(Some(Coordinate::ORIGIN)),
            Geometry::Polygon(Polygon::empty()),
        ]);
        assert_eq!(gc.dimension(), 2);
    }

    #[test]
    fn test_polygon_area_with_hole() {
        let shell = coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let hole = coords(&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)]);
        let p = Polygon::new(shell, vec![hole]);
        assert!((p.area() - 84.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_ring_equality() {
        // same square, different start points and orientations
        let a = Geometry::Polygon(Polygon::new(
            coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            vec![],
        ));
        let b = Geometry::Polygon(Polygon::new(
            coords(&[(1.0, 1.0), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
            vec![],
        ));
        assert_ne!(a, b);
        assert_eq!(a.normalized(), b.normalized());
    }

    #[test]
    fn test_normalized_line_direction() {
        let a = Geometry::LineString(coords(&[(0.0, 0.0), (5.0, 5.0)]));
        let b = Geometry::LineString(coords(&[(5.0, 5.0), (0.0, 0.0)]));
        assert_eq!(a.normalized(), b.normalized());
    }
}
