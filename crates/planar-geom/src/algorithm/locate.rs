use crate::algorithm::intersector::RobustLineIntersector;
use crate::algorithm::orientation::orientation_index;
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::geometry::{Geometry, Polygon};
use crate::location::Location;

/// Counts crossings of a horizontal ray extending rightward from a query
/// point with the segments of a ring, to determine the point's location.
/// Detects the on-boundary case exactly.
pub struct RayCrossingCounter {
    point: Coordinate,
    crossing_count: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    pub fn new(point: Coordinate) -> Self {
        Self {
            point,
            crossing_count: 0,
            on_segment: false,
        }
    }

    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    pub fn location(&self) -> Location {
        if self.on_segment {
            return Location::Boundary;
        }
        if self.crossing_count % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    /// Counts one segment against the ray. Call with successive ring
    /// segments; `p1` is the segment end nearer the ring start.
    pub fn count_segment(&mut self, p1: &Coordinate, p2: &Coordinate) {
        let p = &self.point;
        // segments strictly to the left of the point cannot cross the ray
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p.equals_2d(p2) {
            self.on_segment = true;
            return;
        }
        // horizontal segments count only if the point lies on them
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        // To avoid double-counting shared vertices, an upward edge includes
        // its start and excludes its end, while a downward edge excludes
        // its start and includes its end.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, p);
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            // re-orient so the effective segment direction is upward
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossing_count += 1;
            }
        }
    }
}

/// Locates a point relative to a closed ring.
pub fn locate_point_in_ring(p: &Coordinate, ring: &[Coordinate]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for i in 1..ring.len() {
        counter.count_segment(&ring[i], &ring[i - 1]);
        if counter.is_on_segment() {
            return counter.location();
        }
    }
    counter.location()
}

/// Tests whether a point lies on any segment of a polyline.
pub fn is_on_line(p: &Coordinate, coords: &[Coordinate]) -> bool {
    let mut li = RobustLineIntersector::new();
    for i in 1..coords.len() {
        li.compute_point_intersection(p, &coords[i - 1], &coords[i]);
        if li.has_intersection() {
            return true;
        }
    }
    false
}

/// Locates a point considering only the polygonal components of a
/// geometry; lineal and puntal components are transparent. Used for the
/// side-location fallback of edge labelling, where only area containment
/// matters.
pub fn locate_point_in_areas(p: &Coordinate, geom: &Geometry) -> Location {
    match geom {
        Geometry::Polygon(poly) => PointLocator::new().locate_in_polygon(p, poly),
        Geometry::MultiPolygon(polys) => {
            for poly in polys {
                let loc = PointLocator::new().locate_in_polygon(p, poly);
                if loc != Location::Exterior {
                    return loc;
                }
            }
            Location::Exterior
        }
        Geometry::GeometryCollection(parts) => {
            for part in parts {
                let loc = locate_point_in_areas(p, part);
                if loc != Location::Exterior {
                    return loc;
                }
            }
            Location::Exterior
        }
        _ => Location::Exterior,
    }
}

/// Classifies a coordinate against a geometry of any type, under the
/// OGC-SFS boundary rule (a point is on the boundary of a collection iff
/// it lies on an odd number of component boundaries).
///
/// Pure and stateless; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLocator;

impl PointLocator {
    pub fn new() -> Self {
        PointLocator
    }

    pub fn locate(&self, p: &Coordinate, geom: &Geometry) -> Location {
        if geom.is_empty() {
            return Location::Exterior;
        }
        // atomic lineal and polygonal geometries have a direct answer
        if let Geometry::LineString(coords) = geom {
            return self.locate_on_line(p, coords);
        }
        if let Geometry::Polygon(poly) = geom {
            return self.locate_in_polygon(p, poly);
        }

        let mut is_in = false;
        let mut boundary_count = 0usize;
        self.compute_location(p, geom, &mut is_in, &mut boundary_count);
        // OGC-SFS boundary determination rule
        if boundary_count % 2 == 1 {
            return Location::Boundary;
        }
        if boundary_count > 0 || is_in {
            return Location::Interior;
        }
        Location::Exterior
    }

    fn compute_location(
        &self,
        p: &Coordinate,
        geom: &Geometry,
        is_in: &mut bool,
        boundary_count: &mut usize,
    ) {
        let mut update = |loc: Location| {
            if loc == Location::Interior {
                *is_in = true;
            }
            if loc == Location::Boundary {
                *boundary_count += 1;
            }
        };
        match geom {
            Geometry::Point(Some(c)) => {
                if c.equals_2d(p) {
                    update(Location::Interior);
                }
            }
            Geometry::Point(None) => {}
            Geometry::LineString(coords) => update(self.locate_on_line(p, coords)),
            Geometry::Polygon(poly) => update(self.locate_in_polygon(p, poly)),
            Geometry::MultiPoint(pts) => {
                for c in pts {
                    if c.equals_2d(p) {
                        update(Location::Interior);
                    }
                }
            }
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    update(self.locate_on_line(p, l));
                }
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    update(self.locate_in_polygon(p, poly));
                }
            }
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    self.compute_location(p, part, is_in, boundary_count);
                }
            }
        }
    }

    fn locate_on_line(&self, p: &Coordinate, coords: &[Coordinate]) -> Location {
        if coords.is_empty() {
            return Location::Exterior;
        }
        if !Envelope::from_coordinates(coords).intersects_coordinate(p) {
            return Location::Exterior;
        }
        let closed = coords.len() > 1 && coords[0].equals_2d(&coords[coords.len() - 1]);
        if !closed && (p.equals_2d(&coords[0]) || p.equals_2d(&coords[coords.len() - 1])) {
            return Location::Boundary;
        }
        if is_on_line(p, coords) {
            return Location::Interior;
        }
        Location::Exterior
    }

    pub(crate) fn locate_in_polygon(&self, p: &Coordinate, poly: &Polygon) -> Location {
        if poly.is_empty() {
            return Location::Exterior;
        }
        match self.locate_in_ring(p, &poly.exterior) {
            Location::Exterior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Interior => {}
        }
        for hole in &poly.interiors {
            match self.locate_in_ring(p, hole) {
                Location::Interior => return Location::Exterior,
                Location::Boundary => return Location::Boundary,
                Location::Exterior => {}
            }
        }
        Location::Interior
    }

    fn locate_in_ring(&self, p: &Coordinate, ring: &[Coordinate]) -> Location {
        if !Envelope::from_coordinates(ring).intersects_coordinate(p) {
            return Location::Exterior;
        }
        locate_point_in_ring(p, ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Coordinate> {
        vec![c(x0, y0), c(x1, y0), c(x1, y1), c(x0, y1), c(x0, y0)]
    }

    #[test]
    fn test_locate_in_ring() {
        let ring = square(0.0, 0.0, 10.0, 10.0);
        assert_eq!(locate_point_in_ring(&c(5.0, 5.0), &ring), Location::Interior);
        assert_eq!(locate_point_in_ring(&c(15.0, 5.0), &ring), Location::Exterior);
        assert_eq!(locate_point_in_ring(&c(10.0, 5.0), &ring), Location::Boundary);
        assert_eq!(locate_point_in_ring(&c(0.0, 0.0), &ring), Location::Boundary);
    }

    #[test]
    fn test_locate_polygon_with_hole() {
        let poly = Polygon::new(square(0.0, 0.0, 10.0, 10.0), vec![square(3.0, 3.0, 7.0, 7.0)]);
        let locator = PointLocator::new();
        let geom = Geometry::Polygon(poly);
        assert_eq!(locator.locate(&c(1.0, 1.0), &geom), Location::Interior);
        assert_eq!(locator.locate(&c(5.0, 5.0), &geom), Location::Exterior);
        assert_eq!(locator.locate(&c(3.0, 5.0), &geom), Location::Boundary);
        assert_eq!(locator.locate(&c(-1.0, 5.0), &geom), Location::Exterior);
    }

    #[test]
    fn test_locate_on_linestring() {
        let line = Geometry::LineString(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)]);
        let locator = PointLocator::new();
        assert_eq!(locator.locate(&c(5.0, 0.0), &line), Location::Interior);
        assert_eq!(locator.locate(&c(0.0, 0.0), &line), Location::Boundary);
        assert_eq!(locator.locate(&c(10.0, 10.0), &line), Location::Boundary);
        assert_eq!(locator.locate(&c(5.0, 1.0), &line), Location::Exterior);
    }

    #[test]
    fn test_boundary_rule_mod2() {
        // two linestrings sharing an endpoint: the shared point lies on an
        // even number of boundaries, so it is in the interior
        let ml = Geometry::MultiLineString(vec![
            vec![c(0.0, 0.0), c(5.0, 0.0)],
            vec![c(5.0, 0.0), c(10.0, 5.0)],
        ]);
        let locator = PointLocator::new();
        assert_eq!(locator.locate(&c(5.0, 0.0), &ml), Location::Interior);
        assert_eq!(locator.locate(&c(0.0, 0.0), &ml), Location::Boundary);
    }

    #[test]
    fn test_locate_point_geometry() {
        let locator = PointLocator::new();
        let pt = Geometry::Point(Some(c(2.0, 3.0)));
        assert_eq!(locator.locate(&c(2.0, 3.0), &pt), Location::Interior);
        assert_eq!(locator.locate(&c(2.0, 4.0), &pt), Location::Exterior);
        assert_eq!(
            locator.locate(&c(0.0, 0.0), &Geometry::Point(None)),
            Location::Exterior
        );
    }
}
