use crate::coordinate::Coordinate;

/// Distance from point `p` to the line segment `a`-`b`.
pub fn point_to_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    if a.x == b.x && a.y == b.y {
        return p.distance_to(a);
    }

    let len2 = (b.x - a.x) * (b.x - a.x) + (b.y - a.y) * (b.y - a.y);
    // projection parameter of p onto the line through a and b
    let r = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len2;
    if r <= 0.0 {
        return p.distance_to(a);
    }
    if r >= 1.0 {
        return p.distance_to(b);
    }

    let s = ((a.y - p.y) * (b.x - a.x) - (a.x - p.x) * (b.y - a.y)) / len2;
    s.abs() * len2.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = point_to_segment(&c(5.0, 3.0), &c(0.0, 0.0), &c(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_beyond_endpoints() {
        let d = point_to_segment(&c(-3.0, 4.0), &c(0.0, 0.0), &c(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let d = point_to_segment(&c(3.0, 4.0), &c(0.0, 0.0), &c(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
