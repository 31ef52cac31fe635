use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::geometry::{Geometry, Polygon};
use crate::precision::PrecisionModel;

/// Constructs geometry values under a given precision model. The factory of
/// the first operand is used for all overlay results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryFactory {
    pub precision: PrecisionModel,
}

impl GeometryFactory {
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    pub fn create_point(&self, c: Coordinate) -> Geometry {
        Geometry::Point(Some(c))
    }

    pub fn create_empty_point(&self) -> Geometry {
        Geometry::Point(None)
    }

    pub fn create_line_string(&self, coords: Vec<Coordinate>) -> Geometry {
        Geometry::LineString(coords)
    }

    pub fn create_empty_line_string(&self) -> Geometry {
        Geometry::LineString(Vec::new())
    }

    pub fn create_polygon(&self, exterior: Vec<Coordinate>, interiors: Vec<Vec<Coordinate>>) -> Geometry {
        Geometry::Polygon(Polygon::new(exterior, interiors))
    }

    pub fn create_empty_polygon(&self) -> Geometry {
        Geometry::Polygon(Polygon::empty())
    }

    pub fn create_multi_point(&self, pts: Vec<Coordinate>) -> Geometry {
        Geometry::MultiPoint(pts)
    }

    pub fn create_multi_line_string(&self, lines: Vec<Vec<Coordinate>>) -> Geometry {
        Geometry::MultiLineString(lines)
    }

    pub fn create_multi_polygon(&self, polys: Vec<Polygon>) -> Geometry {
        Geometry::MultiPolygon(polys)
    }

    pub fn create_geometry_collection(&self, parts: Vec<Geometry>) -> Geometry {
        Geometry::GeometryCollection(parts)
    }

    /// Builds the most specific geometry possible from a list of parts:
    /// an empty list yields an empty collection, a single part is returned
    /// bare, a homogeneous list becomes the matching Multi geometry, and a
    /// mixed list becomes a collection.
    pub fn build_geometry(&self, mut parts: Vec<Geometry>) -> Geometry {
        if parts.is_empty() {
            return self.create_geometry_collection(parts);
        }
        if parts.len() == 1 {
            return parts.pop().expect("non-empty");
        }
        if parts.iter().all(|g| matches!(g, Geometry::Point(_))) {
            let pts = parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(c) => c,
                    _ => unreachable!(),
                })
                .collect();
            return Geometry::MultiPoint(pts);
        }
        if parts.iter().all(|g| matches!(g, Geometry::LineString(_))) {
            let lines = parts
                .into_iter()
                .map(|g| match g {
                    Geometry::LineString(l) => l,
                    _ => unreachable!(),
                })
                .collect();
            return Geometry::MultiLineString(lines);
        }
        if parts.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
            let polys = parts
                .into_iter()
                .map(|g| match g {
                    Geometry::Polygon(p) => p,
                    _ => unreachable!(),
                })
                .collect();
            return Geometry::MultiPolygon(polys);
        }
        self.create_geometry_collection(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_geometry_single() {
        let f = GeometryFactory::default();
        let p = f.create_point(Coordinate::new(1.0, 2.0));
        assert_eq!(f.build_geometry(vec![p.clone()]), p);
    }

    #[test]
    fn test_build_geometry_homogeneous() {
        let f = GeometryFactory::default();
        let parts = vec![
            f.create_point(Coordinate::new(1.0, 2.0)),
            f.create_point(Coordinate::new(3.0, 4.0)),
        ];
        match f.build_geometry(parts) {
            Geometry::MultiPoint(pts) => assert_eq!(pts.len(), 2),
            other => panic!("expected MultiPoint, got {other:?}"),
        }
    }

    #[test]
    fn test_build_geometry_mixed() {
        let f = GeometryFactory::default();
        let parts = vec![
            f.create_point(Coordinate::new(1.0, 2.0)),
            f.create_line_string(vec![Coordinate::ORIGIN, Coordinate::new(1.0, 1.0)]),
        ];
        assert!(matches!(
            f.build_geometry(parts),
            Geometry::GeometryCollection(_)
        ));
    }
}
