//! Robust classification of segment/segment intersections.

use arrayvec::ArrayVec;

use crate::geom::{Coord, Envelope};
use crate::num::{on_segment, orientation, Orientation};
use crate::precision::PrecisionModel;
use crate::NodingError;

/// The kind of intersection between two closed segments.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IntersectionKind {
    /// The segments share no points.
    None,
    /// The segments share exactly one point.
    Point,
    /// The segments are collinear and share a sub-segment.
    Collinear,
}

/// Computes intersections between line segments, robustly.
///
/// The orientation tests behind the classification are exact (see
/// [`crate::num::orientation`]), so the *kind* of intersection is always
/// correct. Only the reported coordinate of a proper intersection is subject
/// to roundoff, and it is rounded through the configured precision model.
///
/// The intersector is an accumulator: call
/// [`compute_intersection`](RobustLineIntersector::compute_intersection) and
/// then query the result. This lets callers that probe many segment pairs
/// reuse one intersector, and lets [`crate::SegmentString`] pull intersection
/// points straight out of it.
#[derive(Clone, Debug)]
pub struct RobustLineIntersector {
    precision: PrecisionModel,
    kind: IntersectionKind,
    points: ArrayVec<Coord, 2>,
    proper: bool,
    inputs: [Coord; 4],
}

impl Default for RobustLineIntersector {
    fn default() -> Self {
        Self::new()
    }
}

impl RobustLineIntersector {
    /// A new intersector with a floating (identity) precision model.
    pub fn new() -> Self {
        RobustLineIntersector {
            precision: PrecisionModel::Floating,
            kind: IntersectionKind::None,
            points: ArrayVec::new(),
            proper: false,
            inputs: [Coord::new(0.0, 0.0); 4],
        }
    }

    /// Set the precision model that proper intersection points are rounded
    /// through.
    pub fn set_precision_model(&mut self, pm: PrecisionModel) {
        self.precision = pm;
    }

    /// Classify the intersection of the closed segments `[p1, p2]` and
    /// `[q1, q2]`, storing the result for the query methods.
    ///
    /// The only error is the defensive [`NodingError::RobustnessFailure`],
    /// which requires the orientation predicate to contradict itself and so
    /// cannot occur.
    pub fn compute_intersection(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> Result<(), NodingError> {
        self.kind = IntersectionKind::None;
        self.points.clear();
        self.proper = false;
        self.inputs = [*p1, *p2, *q1, *q2];

        // Degenerate (point) segments get containment tests instead of
        // orientation tests, which would report them as collinear with
        // everything.
        if p1 == p2 {
            if on_segment(p1, q1, q2) {
                self.kind = IntersectionKind::Point;
                self.points.push(*p1);
            }
            return Ok(());
        }
        if q1 == q2 {
            if on_segment(q1, p1, p2) {
                self.kind = IntersectionKind::Point;
                self.points.push(*q1);
            }
            return Ok(());
        }

        if !Envelope::of_segment(p1, p2).intersects(&Envelope::of_segment(q1, q2)) {
            return Ok(());
        }

        let pq1 = orientation(p1, p2, q1);
        let pq2 = orientation(p1, p2, q2);
        if (pq1 == Orientation::Clockwise && pq2 == Orientation::Clockwise)
            || (pq1 == Orientation::CounterClockwise && pq2 == Orientation::CounterClockwise)
        {
            return Ok(());
        }

        let qp1 = orientation(q1, q2, p1);
        let qp2 = orientation(q1, q2, p2);
        if (qp1 == Orientation::Clockwise && qp2 == Orientation::Clockwise)
            || (qp1 == Orientation::CounterClockwise && qp2 == Orientation::CounterClockwise)
        {
            return Ok(());
        }

        let q_on_p_line = pq1 == Orientation::Collinear && pq2 == Orientation::Collinear;
        let p_on_q_line = qp1 == Orientation::Collinear && qp2 == Orientation::Collinear;
        if q_on_p_line != p_on_q_line {
            // Two distinct segments on a common carrier line must read as
            // collinear from both sides.
            return Err(NodingError::RobustnessFailure {
                a0: *p1,
                a1: *p2,
                b0: *q1,
                b1: *q2,
            });
        }

        if q_on_p_line {
            self.compute_collinear(p1, p2, q1, q2);
            return Ok(());
        }

        if pq1 == Orientation::Collinear
            || pq2 == Orientation::Collinear
            || qp1 == Orientation::Collinear
            || qp2 == Orientation::Collinear
        {
            // Exactly one endpoint lies on the other segment.
            let int_pt = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == Orientation::Collinear {
                *q1
            } else if pq2 == Orientation::Collinear {
                *q2
            } else if qp1 == Orientation::Collinear {
                *p1
            } else {
                *p2
            };
            self.kind = IntersectionKind::Point;
            self.points.push(int_pt);
            return Ok(());
        }

        // All four orientations are strict and both segments straddle the
        // other's carrier line: a proper crossing.
        let mut int_pt = compute_proper_point(p1, p2, q1, q2);
        self.precision.round_coord(&mut int_pt);
        // Rounding can push the point outside the segments; fall back to the
        // endpoint nearest the crossing neighbourhood.
        if !in_both_envelopes(&int_pt, p1, p2, q1, q2) {
            int_pt = central_endpoint(p1, p2, q1, q2);
        }
        self.kind = IntersectionKind::Point;
        self.proper = true;
        self.points.push(int_pt);
        Ok(())
    }

    fn compute_collinear(&mut self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) {
        // All four points share a carrier line, so "on the segment" reduces
        // to an envelope test; collect the endpoints interior to the other
        // segment and dedupe.
        let mut pts: ArrayVec<Coord, 2> = ArrayVec::new();
        let mut push = |p: &Coord| {
            if !pts.iter().any(|q| q == p) && !pts.is_full() {
                pts.push(*p);
            }
        };
        let env_p = Envelope::of_segment(p1, p2);
        let env_q = Envelope::of_segment(q1, q2);
        if env_p.contains_point(q1) {
            push(q1);
        }
        if env_p.contains_point(q2) {
            push(q2);
        }
        if env_q.contains_point(p1) {
            push(p1);
        }
        if env_q.contains_point(p2) {
            push(p2);
        }

        pts.sort();
        match pts.len() {
            0 => {}
            1 => {
                self.kind = IntersectionKind::Point;
                self.points = pts;
            }
            _ => {
                self.kind = IntersectionKind::Collinear;
                self.points = pts;
            }
        }
    }

    /// Did the last computation find an intersection?
    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    /// The kind of the last computed intersection.
    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    /// The number of intersection points found: 0, 1, or 2.
    pub fn intersection_num(&self) -> usize {
        self.points.len()
    }

    /// The `k`-th intersection point of the last computation.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.intersection_num()`.
    pub fn intersection(&self, k: usize) -> Coord {
        self.points[k]
    }

    /// Was the last intersection proper (interior to both segments)?
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// Does any intersection point lie in the interior of either segment?
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    /// Does any intersection point lie in the interior of the segment with
    /// the given input index (0 for `[p1, p2]`, 1 for `[q1, q2]`)?
    pub fn is_interior_intersection_of(&self, segment_index: usize) -> bool {
        let a = &self.inputs[segment_index * 2];
        let b = &self.inputs[segment_index * 2 + 1];
        self.points.iter().any(|p| p != a && p != b)
    }
}

fn in_both_envelopes(p: &Coord, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> bool {
    Envelope::of_segment(p1, p2).contains_point(p) && Envelope::of_segment(q1, q2).contains_point(p)
}

/// Computes the crossing point of two segments known (by exact orientation
/// tests) to cross properly.
///
/// To reduce cancellation, all four points are first translated by the
/// midpoint of the segment with the smaller envelope, so the arithmetic
/// happens near the origin.
fn compute_proper_point(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let env_p = Envelope::of_segment(p1, p2);
    let env_q = Envelope::of_segment(q1, q2);
    let (mx, my) = if env_p.width().max(env_p.height()) <= env_q.width().max(env_q.height()) {
        (env_p.centre_x(), env_p.centre_y())
    } else {
        (env_q.centre_x(), env_q.centre_y())
    };

    let (p1x, p1y) = (p1.x - mx, p1.y - my);
    let (p2x, p2y) = (p2.x - mx, p2.y - my);
    let (q1x, q1y) = (q1.x - mx, q1.y - my);
    let (q2x, q2y) = (q2.x - mx, q2.y - my);

    let dpx = p2x - p1x;
    let dpy = p2y - p1y;
    let dqx = q2x - q1x;
    let dqy = q2y - q1y;

    let denom = dpx * dqy - dpy * dqx;
    if denom == 0.0 {
        // The exact predicate says the segments cross, but the f64 cross
        // product has underflowed to zero.
        return central_endpoint(p1, p2, q1, q2);
    }

    let t = ((q1x - p1x) * dqy - (q1y - p1y) * dqx) / denom;
    let t = t.clamp(0.0, 1.0);
    Coord::new(p1x + t * dpx + mx, p1y + t * dpy + my)
}

/// The input endpoint nearest the centroid of all four endpoints.
///
/// Used as a last-resort intersection location when rounding has pushed the
/// computed crossing outside the segments.
fn central_endpoint(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let centre = Coord::new(
        (p1.x + p2.x + q1.x + q2.x) / 4.0,
        (p1.y + p2.y + q1.y + q2.y) / 4.0,
    );
    let mut best = *p1;
    let mut best_dist = centre.distance(p1);
    for p in [p2, q1, q2] {
        let d = centre.distance(p);
        if d < best_dist {
            best_dist = d;
            best = *p;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::{grid_coord, Reasonable};
    use proptest::prelude::*;

    fn compute(p1: (f64, f64), p2: (f64, f64), q1: (f64, f64), q2: (f64, f64)) -> RobustLineIntersector {
        let mut li = RobustLineIntersector::new();
        li.compute_intersection(&p1.into(), &p2.into(), &q1.into(), &q2.into())
            .unwrap();
        li
    }

    #[test]
    fn disjoint() {
        let li = compute((0.0, 0.0), (1.0, 1.0), (5.0, 5.0), (6.0, 5.0));
        assert_eq!(li.kind(), IntersectionKind::None);
        assert!(!li.has_intersection());
        assert_eq!(li.intersection_num(), 0);
    }

    #[test]
    fn proper_cross() {
        let li = compute((0.0, 0.0), (10.0, 10.0), (0.0, 10.0), (10.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::Point);
        assert!(li.is_proper());
        assert!(li.is_interior_intersection());
        assert_eq!(li.intersection(0), Coord::new(5.0, 5.0));
    }

    #[test]
    fn endpoint_touch_is_improper() {
        // T-junction: q1 lies in the interior of p.
        let li = compute((0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (5.0, 5.0));
        assert_eq!(li.kind(), IntersectionKind::Point);
        assert!(!li.is_proper());
        assert!(li.is_interior_intersection());
        assert!(li.is_interior_intersection_of(0));
        assert!(!li.is_interior_intersection_of(1));
        assert_eq!(li.intersection(0), Coord::new(5.0, 0.0));
    }

    #[test]
    fn shared_endpoint_is_not_interior() {
        let li = compute((0.0, 0.0), (10.0, 0.0), (10.0, 0.0), (10.0, 5.0));
        assert_eq!(li.kind(), IntersectionKind::Point);
        assert!(!li.is_proper());
        assert!(!li.is_interior_intersection());
    }

    #[test]
    fn collinear_overlap() {
        let li = compute((0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (15.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::Collinear);
        assert_eq!(li.intersection_num(), 2);
        assert_eq!(li.intersection(0), Coord::new(5.0, 0.0));
        assert_eq!(li.intersection(1), Coord::new(10.0, 0.0));
    }

    #[test]
    fn collinear_disjoint() {
        let li = compute((0.0, 0.0), (1.0, 0.0), (5.0, 0.0), (9.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::None);
    }

    #[test]
    fn collinear_touching_at_point() {
        let li = compute((0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (9.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::Point);
        assert_eq!(li.intersection(0), Coord::new(5.0, 0.0));
    }

    #[test]
    fn contained_collinear() {
        let li = compute((0.0, 0.0), (10.0, 0.0), (2.0, 0.0), (8.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::Collinear);
        assert_eq!(li.intersection(0), Coord::new(2.0, 0.0));
        assert_eq!(li.intersection(1), Coord::new(8.0, 0.0));
    }

    #[test]
    fn degenerate_point_segment() {
        let li = compute((3.0, 0.0), (3.0, 0.0), (0.0, 0.0), (10.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::Point);
        assert_eq!(li.intersection(0), Coord::new(3.0, 0.0));

        let li = compute((3.0, 1.0), (3.0, 1.0), (0.0, 0.0), (10.0, 0.0));
        assert_eq!(li.kind(), IntersectionKind::None);
    }

    #[test]
    fn rounding_through_precision_model() {
        let mut li = RobustLineIntersector::new();
        li.set_precision_model(PrecisionModel::fixed(1.0));
        li.compute_intersection(
            &(0.0, 0.0).into(),
            &(10.0, 1.0).into(),
            &(3.0, 1.0).into(),
            &(3.0, -1.0).into(),
        )
        .unwrap();
        assert!(li.is_proper());
        let p = li.intersection(0);
        assert_eq!(p.x, p.x.round());
        assert_eq!(p.y, p.y.round());
    }

    fn segment_pair() -> impl Strategy<Value = (Coord, Coord, Coord, Coord)> {
        (grid_coord(), grid_coord(), grid_coord(), grid_coord())
    }

    proptest! {
        #[test]
        fn symmetry((p1, p2, q1, q2) in segment_pair()) {
            let mut a = RobustLineIntersector::new();
            let mut b = RobustLineIntersector::new();
            a.compute_intersection(&p1, &p2, &q1, &q2).unwrap();
            b.compute_intersection(&q1, &q2, &p1, &p2).unwrap();

            prop_assert_eq!(a.kind(), b.kind());
            let mut pts_a: Vec<_> = (0..a.intersection_num()).map(|k| a.intersection(k)).collect();
            let mut pts_b: Vec<_> = (0..b.intersection_num()).map(|k| b.intersection(k)).collect();
            pts_a.sort();
            pts_b.sort();
            prop_assert_eq!(pts_a, pts_b);
        }

        #[test]
        fn intersection_point_is_on_both_envelopes((p1, p2, q1, q2) in segment_pair()) {
            let mut li = RobustLineIntersector::new();
            li.compute_intersection(&p1, &p2, &q1, &q2).unwrap();
            for k in 0..li.intersection_num() {
                let p = li.intersection(k);
                prop_assert!(Envelope::of_segment(&p1, &p2).contains_point(&p));
                prop_assert!(Envelope::of_segment(&q1, &q2).contains_point(&p));
            }
        }

        #[test]
        fn swapping_endpoints_preserves_kind(
            a in Coord::reasonable(),
            b in Coord::reasonable(),
            c in Coord::reasonable(),
            d in Coord::reasonable(),
        ) {
            let mut fwd = RobustLineIntersector::new();
            let mut rev = RobustLineIntersector::new();
            fwd.compute_intersection(&a, &b, &c, &d).unwrap();
            rev.compute_intersection(&b, &a, &d, &c).unwrap();
            prop_assert_eq!(fwd.kind(), rev.kind());
        }
    }
}
