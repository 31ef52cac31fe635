//! End-to-end overlay scenarios with literal coordinates.

use overlay_engine::{
    difference, intersection, overlay, sym_difference, union_of, OverlayOpCode, OverlayOptions,
};
use planar_geom::{Coordinate, Geometry, Polygon, PrecisionModel};

fn c(x: f64, y: f64) -> Coordinate {
    Coordinate::new(x, y)
}

fn coords(pts: &[(f64, f64)]) -> Vec<Coordinate> {
    pts.iter().map(|&(x, y)| c(x, y)).collect()
}

fn poly(shell: &[(f64, f64)]) -> Geometry {
    Geometry::Polygon(Polygon::new(coords(shell), vec![]))
}

fn poly_with_holes(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Geometry {
    Geometry::Polygon(Polygon::new(
        coords(shell),
        holes.iter().map(|h| coords(h)).collect(),
    ))
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    poly(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
}

fn assert_geom_eq(actual: &Geometry, expected: &Geometry) {
    assert_eq!(
        actual.normalized(),
        expected.normalized(),
        "geometries differ\n  actual: {actual:?}\n  expected: {expected:?}"
    );
}

fn square_a() -> Geometry {
    square(0.0, 0.0, 10.0, 10.0)
}

fn square_b() -> Geometry {
    square(5.0, 5.0, 15.0, 15.0)
}

#[test]
fn union_of_overlapping_squares() {
    let result = union_of(&square_a(), &square_b()).unwrap();
    let expected = poly(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 5.0),
        (15.0, 5.0),
        (15.0, 15.0),
        (5.0, 15.0),
        (5.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ]);
    assert_geom_eq(&result, &expected);
    assert!((result.area() - 175.0).abs() < 1e-9);
}

#[test]
fn intersection_of_overlapping_squares() {
    let result = intersection(&square_a(), &square_b()).unwrap();
    let expected = poly(&[
        (5.0, 5.0),
        (10.0, 5.0),
        (10.0, 10.0),
        (5.0, 10.0),
        (5.0, 5.0),
    ]);
    assert_geom_eq(&result, &expected);
    assert!((result.area() - 25.0).abs() < 1e-9);
}

#[test]
fn difference_of_overlapping_squares() {
    let result = difference(&square_a(), &square_b()).unwrap();
    let expected = poly(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 5.0),
        (5.0, 5.0),
        (5.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ]);
    assert_geom_eq(&result, &expected);
    assert!((result.area() - 75.0).abs() < 1e-9);
}

#[test]
fn sym_difference_of_overlapping_squares() {
    let result = sym_difference(&square_a(), &square_b()).unwrap();
    match &result {
        Geometry::MultiPolygon(polys) => {
            assert_eq!(polys.len(), 2);
            for p in polys {
                assert!((p.area() - 75.0).abs() < 1e-9);
            }
        }
        other => panic!("expected MultiPolygon, got {other:?}"),
    }
    assert!((result.area() - 150.0).abs() < 1e-9);
}

#[test]
fn union_of_disjoint_squares_preserves_both() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(2.0, 2.0, 3.0, 3.0);
    let result = union_of(&a, &b).unwrap();
    match &result {
        Geometry::MultiPolygon(polys) => assert_eq!(polys.len(), 2),
        other => panic!("expected MultiPolygon, got {other:?}"),
    }
    let expected = Geometry::MultiPolygon(vec![
        Polygon::new(
            coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            vec![],
        ),
        Polygon::new(
            coords(&[(2.0, 2.0), (3.0, 2.0), (3.0, 3.0), (2.0, 3.0), (2.0, 2.0)]),
            vec![],
        ),
    ]);
    assert_geom_eq(&result, &expected);
}

#[test]
fn intersection_of_line_with_containing_polygon() {
    let line = Geometry::LineString(coords(&[(0.0, 0.0), (10.0, 10.0)]));
    let result = intersection(&line, &square_a()).unwrap();
    assert_geom_eq(
        &result,
        &Geometry::LineString(coords(&[(0.0, 0.0), (10.0, 10.0)])),
    );
}

#[test]
fn intersection_clips_crossing_line() {
    let line = Geometry::LineString(coords(&[(-5.0, 5.0), (15.0, 5.0)]));
    let result = intersection(&line, &square_a()).unwrap();
    assert_geom_eq(
        &result,
        &Geometry::LineString(coords(&[(0.0, 5.0), (10.0, 5.0)])),
    );
}

#[test]
fn union_with_island_in_hole_uses_free_hole_placement() {
    let a = poly_with_holes(
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
        &[&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)]],
    );
    let b = square(4.0, 4.0, 6.0, 6.0);
    let result = union_of(&a, &b).unwrap();
    match &result {
        Geometry::MultiPolygon(polys) => {
            assert_eq!(polys.len(), 2);
            let with_hole = polys.iter().find(|p| !p.interiors.is_empty()).unwrap();
            assert_eq!(with_hole.interiors.len(), 1);
        }
        other => panic!("expected MultiPolygon, got {other:?}"),
    }
    // 100 - 16 (hole) + 4 (island)
    assert!((result.area() - 88.0).abs() < 1e-9);
}

#[test]
fn difference_cuts_hole() {
    let result = difference(&square_a(), &square(3.0, 3.0, 7.0, 7.0)).unwrap();
    let expected = poly_with_holes(
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
        &[&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)]],
    );
    assert_geom_eq(&result, &expected);
    assert!((result.area() - 84.0).abs() < 1e-9);
}

#[test]
fn intersection_of_corner_touching_squares_is_a_point() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(1.0, 1.0, 2.0, 2.0);
    let result = intersection(&a, &b).unwrap();
    assert_geom_eq(&result, &Geometry::Point(Some(c(1.0, 1.0))));
}

#[test]
fn intersection_of_edge_touching_squares_is_a_line() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(1.0, 0.0, 2.0, 1.0);
    let result = intersection(&a, &b).unwrap();
    assert_geom_eq(
        &result,
        &Geometry::LineString(coords(&[(1.0, 0.0), (1.0, 1.0)])),
    );
}

#[test]
fn adjacent_squares_union_drops_shared_boundary() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(1.0, 0.0, 2.0, 1.0);
    let result = union_of(&a, &b).unwrap();
    // a single polygon of area 2; the ring may retain the (collinear)
    // noding vertices at x=1, so compare by area and shape class
    assert!(matches!(result, Geometry::Polygon(_)));
    assert!((result.area() - 2.0).abs() < 1e-9);
}

// ─── Identity and empty-operand behavior ────────────────────────────────

fn empty() -> Geometry {
    Geometry::GeometryCollection(vec![])
}

#[test]
fn union_with_empty_is_identity() {
    let result = union_of(&square_a(), &empty()).unwrap();
    assert_geom_eq(&result, &square_a());
}

#[test]
fn intersection_with_empty_is_empty_collection() {
    let result = intersection(&square_a(), &empty()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.dimension(), -1);
    assert!(matches!(result, Geometry::GeometryCollection(_)));
}

#[test]
fn difference_with_empty_is_identity() {
    let result = difference(&square_a(), &empty()).unwrap();
    assert_geom_eq(&result, &square_a());
}

#[test]
fn sym_difference_with_empty_is_identity() {
    let result = sym_difference(&square_a(), &empty()).unwrap();
    assert_geom_eq(&result, &square_a());
}

#[test]
fn empty_results_have_operation_dimension() {
    let a = square_a();
    let b = square(20.0, 20.0, 30.0, 30.0);
    // disjoint intersection: empty of dimension min(2, 2) = 2
    let result = intersection(&a, &b).unwrap();
    assert!(result.is_empty());
    assert!(matches!(result, Geometry::Polygon(_)));

    // difference removing everything: empty of the left dimension
    let result = difference(&a, &square(-5.0, -5.0, 15.0, 15.0)).unwrap();
    assert!(result.is_empty());
    assert!(matches!(result, Geometry::Polygon(_)));

    let line = Geometry::LineString(coords(&[(20.0, 0.0), (30.0, 0.0)]));
    let result = intersection(&a, &line).unwrap();
    assert!(result.is_empty());
    assert!(matches!(result, Geometry::LineString(_)));
}

#[test]
fn result_elements_are_ordered_points_lines_polygons() {
    let a = square_a();
    let b = Geometry::GeometryCollection(vec![
        Geometry::Point(Some(c(0.0, 0.0))),
        Geometry::LineString(coords(&[(2.0, -5.0), (2.0, 5.0)])),
        square(3.0, 3.0, 5.0, 5.0),
    ]);
    let result = intersection(&a, &b).unwrap();
    match &result {
        Geometry::GeometryCollection(parts) => {
            assert_eq!(parts.len(), 3);
            assert!(matches!(parts[0], Geometry::Point(_)));
            assert!(matches!(parts[1], Geometry::LineString(_)));
            assert!(matches!(parts[2], Geometry::Polygon(_)));
        }
        other => panic!("expected GeometryCollection, got {other:?}"),
    }
}

#[test]
fn point_inside_polygon_intersection() {
    let pt = Geometry::Point(Some(c(5.0, 5.0)));
    let result = intersection(&pt, &square_a()).unwrap();
    assert_geom_eq(&result, &pt);

    let outside = Geometry::Point(Some(c(50.0, 50.0)));
    let result = intersection(&outside, &square_a()).unwrap();
    assert!(result.is_empty());
}

// ─── Snap-rounding ──────────────────────────────────────────────────────

#[test]
fn snap_rounding_produces_same_result_on_integral_input() {
    let options = OverlayOptions {
        noding_precision: Some(PrecisionModel::fixed(1.0)),
        validate_noding: None,
    };
    let result = overlay(&square_a(), &square_b(), OverlayOpCode::Union, &options).unwrap();
    assert!((result.area() - 175.0).abs() < 1e-9);
    let classic = union_of(&square_a(), &square_b()).unwrap();
    assert_geom_eq(&result, &classic);
}

#[test]
fn snap_rounding_rounds_result_to_grid() {
    let a = square(0.1, 0.1, 10.1, 10.1);
    let b = square(5.2, 5.2, 15.2, 15.2);
    let options = OverlayOptions {
        noding_precision: Some(PrecisionModel::fixed(1.0)),
        validate_noding: None,
    };
    let result = overlay(&a, &b, OverlayOpCode::Intersection, &options).unwrap();
    match &result {
        Geometry::Polygon(p) => {
            for pt in &p.exterior {
                assert_eq!(pt.x, pt.x.round());
                assert_eq!(pt.y, pt.y.round());
            }
        }
        other => panic!("expected Polygon, got {other:?}"),
    }
}

#[test]
fn validator_can_be_forced_on_for_snap_rounding() {
    let options = OverlayOptions {
        noding_precision: Some(PrecisionModel::fixed(1.0)),
        validate_noding: Some(true),
    };
    let result = overlay(&square_a(), &square_b(), OverlayOpCode::Union, &options).unwrap();
    assert!((result.area() - 175.0).abs() < 1e-9);
}
