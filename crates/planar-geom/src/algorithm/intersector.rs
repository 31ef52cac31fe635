use crate::algorithm::distance::point_to_segment;
use crate::algorithm::orientation::orientation_index;
use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::precision::PrecisionModel;

/// Classification of a segment-segment intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    None,
    /// The segments intersect in a single point.
    Point,
    /// The segments are collinear and overlap in a (possibly degenerate)
    /// sub-segment; two intersection points are reported.
    Collinear,
}

/// Computes intersections between line segments using robust orientation
/// predicates. An instance holds the state of the most recent computation
/// and is queried through the accessor methods.
#[derive(Debug, Clone)]
pub struct RobustLineIntersector {
    precision: Option<PrecisionModel>,
    input: [[Coordinate; 2]; 2],
    int_pts: [Coordinate; 2],
    kind: IntersectionKind,
    proper: bool,
}

impl Default for RobustLineIntersector {
    fn default() -> Self {
        Self::new()
    }
}

impl RobustLineIntersector {
    pub fn new() -> Self {
        Self {
            precision: None,
            input: [[Coordinate::ORIGIN; 2]; 2],
            int_pts: [Coordinate::ORIGIN; 2],
            kind: IntersectionKind::None,
            proper: false,
        }
    }

    pub fn with_precision_model(pm: PrecisionModel) -> Self {
        let mut li = Self::new();
        li.set_precision_model(Some(pm));
        li
    }

    /// Intersection points computed for proper intersections are rounded
    /// to this precision model.
    pub fn set_precision_model(&mut self, pm: Option<PrecisionModel>) {
        self.precision = pm;
    }

    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    pub fn intersection_count(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    pub fn intersection(&self, i: usize) -> Coordinate {
        self.int_pts[i]
    }

    /// A proper intersection lies in the interior of both segments.
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// Tests whether any intersection point lies in the interior of either
    /// input segment (i.e. is not an endpoint of it).
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    pub fn is_interior_intersection_of(&self, input_index: usize) -> bool {
        for i in 0..self.intersection_count() {
            let pt = self.int_pts[i];
            if !(pt.equals_2d(&self.input[input_index][0])
                || pt.equals_2d(&self.input[input_index][1]))
            {
                return true;
            }
        }
        false
    }

    /// The edge distance of intersection point `int_index` along input
    /// segment `segment_index`, used for ordering split points.
    pub fn edge_distance(&self, segment_index: usize, int_index: usize) -> f64 {
        compute_edge_distance(
            &self.int_pts[int_index],
            &self.input[segment_index][0],
            &self.input[segment_index][1],
        )
    }

    /// Computes the intersection of the point `p` with the segment
    /// `p1`-`p2`. Only `has_intersection` and `is_proper` are meaningful
    /// afterwards.
    pub fn compute_point_intersection(&mut self, p: &Coordinate, p1: &Coordinate, p2: &Coordinate) {
        self.proper = false;
        self.int_pts[0] = *p;
        // envelope test is cheaper than the orientation tests
        if Envelope::segment_intersects_point(p1, p2, p)
            && orientation_index(p1, p2, p) == 0
            && orientation_index(p2, p1, p) == 0
        {
            self.proper = !(p.equals_2d(p1) || p.equals_2d(p2));
            self.kind = IntersectionKind::Point;
            return;
        }
        self.kind = IntersectionKind::None;
    }

    /// Computes the intersection of segments `p1`-`p2` and `q1`-`q2`.
    pub fn compute_intersection(
        &mut self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) {
        self.input = [[*p1, *p2], [*q1, *q2]];
        self.kind = self.compute_intersect(p1, p2, q1, q2);
    }

    fn compute_intersect(
        &mut self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> IntersectionKind {
        self.proper = false;

        if !Envelope::segments_intersect(p1, p2, q1, q2) {
            return IntersectionKind::None;
        }

        // for each endpoint, compute which side of the other segment it lies on
        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return IntersectionKind::None;
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return IntersectionKind::None;
        }

        let collinear = pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0;
        if collinear {
            return self.compute_collinear_intersection(p1, p2, q1, q2);
        }

        // The segments intersect in a single point. If the intersection is
        // at an endpoint, copy the endpoint exactly rather than computing
        // it, for robustness.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // check for two equal endpoints first
            if p1.equals_2d(q1) || p1.equals_2d(q2) {
                self.int_pts[0] = *p1;
            } else if p2.equals_2d(q1) || p2.equals_2d(q2) {
                self.int_pts[0] = *p2;
            } else if pq1 == 0 {
                self.int_pts[0] = *q1;
            } else if pq2 == 0 {
                self.int_pts[0] = *q2;
            } else if qp1 == 0 {
                self.int_pts[0] = *p1;
            } else {
                self.int_pts[0] = *p2;
            }
        } else {
            self.proper = true;
            self.int_pts[0] = self.compute_intersection_point(p1, p2, q1, q2);
        }
        IntersectionKind::Point
    }

    fn compute_collinear_intersection(
        &mut self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> IntersectionKind {
        let q1_in_p = Envelope::segment_intersects_point(p1, p2, q1);
        let q2_in_p = Envelope::segment_intersects_point(p1, p2, q2);
        let p1_in_q = Envelope::segment_intersects_point(q1, q2, p1);
        let p2_in_q = Envelope::segment_intersects_point(q1, q2, p2);

        if q1_in_p && q2_in_p {
            self.int_pts = [*q1, *q2];
            return IntersectionKind::Collinear;
        }
        if p1_in_q && p2_in_q {
            self.int_pts = [*p1, *p2];
            return IntersectionKind::Collinear;
        }
        if q1_in_p && p1_in_q {
            self.int_pts = [*q1, *p1];
            return if q1.equals_2d(p1) && !q2_in_p && !p2_in_q {
                IntersectionKind::Point
            } else {
                IntersectionKind::Collinear
            };
        }
        if q1_in_p && p2_in_q {
            self.int_pts = [*q1, *p2];
            return if q1.equals_2d(p2) && !q2_in_p && !p1_in_q {
                IntersectionKind::Point
            } else {
                IntersectionKind::Collinear
            };
        }
        if q2_in_p && p1_in_q {
            self.int_pts = [*q2, *p1];
            return if q2.equals_2d(p1) && !q1_in_p && !p2_in_q {
                IntersectionKind::Point
            } else {
                IntersectionKind::Collinear
            };
        }
        if q2_in_p && p2_in_q {
            self.int_pts = [*q2, *p2];
            return if q2.equals_2d(p2) && !q1_in_p && !p1_in_q {
                IntersectionKind::Point
            } else {
                IntersectionKind::Collinear
            };
        }
        IntersectionKind::None
    }

    /// Computes a proper intersection point, falling back to the nearest
    /// endpoint if the computed point escapes both segment envelopes (a
    /// sign of numerical ill-conditioning).
    fn compute_intersection_point(
        &self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> Coordinate {
        let mut int_pt = match homogeneous_intersection(p1, p2, q1, q2) {
            Some(pt) => pt,
            None => nearest_endpoint(p1, p2, q1, q2),
        };
        if !self.is_in_segment_envelopes(&int_pt) {
            int_pt = nearest_endpoint(p1, p2, q1, q2);
        }
        if let Some(pm) = &self.precision {
            pm.snap(&mut int_pt);
        }
        int_pt
    }

    fn is_in_segment_envelopes(&self, pt: &Coordinate) -> bool {
        let env0 = Envelope::from_corners(&self.input[0][0], &self.input[0][1]);
        let env1 = Envelope::from_corners(&self.input[1][0], &self.input[1][1]);
        env0.intersects_coordinate(pt) && env1.intersects_coordinate(pt)
    }
}

/// Intersection of the lines through two segments, computed in homogeneous
/// coordinates after translating to the midpoint of the overlap envelope
/// (conditioning that greatly reduces cancellation error). Returns `None`
/// when the lines are parallel or the computation overflows.
fn homogeneous_intersection(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Option<Coordinate> {
    let min_x0 = p1.x.min(p2.x);
    let max_x0 = p1.x.max(p2.x);
    let min_y0 = p1.y.min(p2.y);
    let max_y0 = p1.y.max(p2.y);
    let min_x1 = q1.x.min(q2.x);
    let max_x1 = q1.x.max(q2.x);
    let min_y1 = q1.y.min(q2.y);
    let max_y1 = q1.y.max(q2.y);

    let mid_x = (min_x0.max(min_x1) + max_x0.min(max_x1)) / 2.0;
    let mid_y = (min_y0.max(min_y1) + max_y0.min(max_y1)) / 2.0;

    let p1x = p1.x - mid_x;
    let p1y = p1.y - mid_y;
    let p2x = p2.x - mid_x;
    let p2y = p2.y - mid_y;
    let q1x = q1.x - mid_x;
    let q1y = q1.y - mid_y;
    let q2x = q2.x - mid_x;
    let q2y = q2.y - mid_y;

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if x_int.is_nan() || x_int.is_infinite() || y_int.is_nan() || y_int.is_infinite() {
        return None;
    }
    Some(Coordinate::new(x_int + mid_x, y_int + mid_y))
}

/// The endpoint closest to the other segment. Used as the intersection
/// point when the true intersection is numerically unobtainable; by
/// definition it is then within tolerance of the correct result.
fn nearest_endpoint(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Coordinate {
    let mut nearest = *p1;
    let mut min_dist = point_to_segment(p1, q1, q2);

    let dist = point_to_segment(p2, q1, q2);
    if dist < min_dist {
        min_dist = dist;
        nearest = *p2;
    }
    let dist = point_to_segment(q1, p1, p2);
    if dist < min_dist {
        min_dist = dist;
        nearest = *q1;
    }
    let dist = point_to_segment(q2, p1, p2);
    if dist < min_dist {
        nearest = *q2;
    }
    nearest
}

/// A robust measure of how far along a segment an intersection point lies,
/// comparable for points on the same segment. Not a true distance; it is
/// computed from the dominant ordinate delta to avoid the rounding errors
/// a Euclidean distance would introduce.
pub fn compute_edge_distance(p: &Coordinate, p0: &Coordinate, p1: &Coordinate) -> f64 {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();

    if p.equals_2d(p0) {
        return 0.0;
    }
    if p.equals_2d(p1) {
        return if dx > dy { dx } else { dy };
    }

    let pdx = (p.x - p0.x).abs();
    let pdy = (p.y - p0.y).abs();
    let mut dist = if dx > dy { pdx } else { pdy };
    // a non-endpoint must never report distance 0
    if dist == 0.0 {
        dist = pdx.max(pdy);
    }
    dist
}
