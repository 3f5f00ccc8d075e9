//! Postcondition checking for noded arrangements.

use crate::geom::Envelope;
use crate::intersect::{IntersectionKind, RobustLineIntersector};
use crate::segment_string::SegmentString;
use crate::NodingError;

/// Verifies that a collection of substrings is fully noded.
///
/// The checks, each with its own failure kind:
///
/// - no duplicate substrings (identical or reversed vertex sequences) —
///   [`NodingError::TopologyCollapse`];
/// - no collinear overlap between distinct segments —
///   [`NodingError::CollinearOverlap`];
/// - every intersection point between two segments is an endpoint of both
///   (this covers both proper crossings and a vertex of one substring lying
///   in the interior of another) — [`NodingError::InteriorIntersection`].
///
/// The classification of each segment pair rests on the exact orientation
/// predicate, so the validator cannot be fooled by near-degenerate
/// geometry; it is meant for tests and postcondition assertions, not for
/// hot paths.
pub struct NodingValidator<'a, D> {
    strings: &'a [SegmentString<D>],
}

impl<'a, D> NodingValidator<'a, D> {
    /// A validator over the given substrings.
    pub fn new(strings: &'a [SegmentString<D>]) -> Self {
        NodingValidator { strings }
    }

    /// Run all checks, returning the first violation found.
    pub fn check_valid(&self) -> Result<(), NodingError> {
        self.check_duplicates()?;
        self.check_segment_interactions()?;
        Ok(())
    }

    fn check_duplicates(&self) -> Result<(), NodingError> {
        for (i, a) in self.strings.iter().enumerate() {
            for b in &self.strings[i + 1..] {
                let pts_a = a.coordinates();
                let pts_b = b.coordinates();
                let forward = pts_a == pts_b;
                let reversed =
                    pts_a.len() == pts_b.len() && pts_a.iter().rev().eq(pts_b.iter());
                if forward || reversed {
                    return Err(NodingError::TopologyCollapse {
                        coord: pts_a[0],
                        string: i,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_segment_interactions(&self) -> Result<(), NodingError> {
        let mut li = RobustLineIntersector::new();
        for (si, a) in self.strings.iter().enumerate() {
            for (sj, b) in self.strings.iter().enumerate().skip(si) {
                for i in 0..a.size() - 1 {
                    for j in 0..b.size() - 1 {
                        if si == sj && i >= j {
                            continue;
                        }
                        self.check_segment_pair(&mut li, (a, i), (b, j))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_segment_pair(
        &self,
        li: &mut RobustLineIntersector,
        (a, i): (&SegmentString<D>, usize),
        (b, j): (&SegmentString<D>, usize),
    ) -> Result<(), NodingError> {
        let p0 = a.coordinate(i);
        let p1 = a.coordinate(i + 1);
        let q0 = b.coordinate(j);
        let q1 = b.coordinate(j + 1);
        if !Envelope::of_segment(p0, p1).intersects(&Envelope::of_segment(q0, q1)) {
            return Ok(());
        }

        li.compute_intersection(p0, p1, q0, q1)?;
        match li.kind() {
            IntersectionKind::None => Ok(()),
            IntersectionKind::Collinear => Err(NodingError::CollinearOverlap {
                p0: li.intersection(0),
                p1: li.intersection(1),
            }),
            IntersectionKind::Point => {
                let p = li.intersection(0);
                let endpoint_of_both =
                    (p == *p0 || p == *p1) && (p == *q0 || p == *q1) && !li.is_proper();
                if endpoint_of_both {
                    Ok(())
                } else {
                    Err(NodingError::InteriorIntersection { coord: p })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(pts: &[(f64, f64)]) -> SegmentString<()> {
        SegmentString::new(pts.iter().map(|&p| p.into()).collect(), ()).unwrap()
    }

    fn check(strings: &[SegmentString<()>]) -> Result<(), NodingError> {
        NodingValidator::new(strings).check_valid()
    }

    #[test]
    fn noded_cross_is_valid() {
        let strings = [
            string(&[(0.0, 0.0), (5.0, 5.0)]),
            string(&[(5.0, 5.0), (10.0, 10.0)]),
            string(&[(0.0, 10.0), (5.0, 5.0)]),
            string(&[(5.0, 5.0), (10.0, 0.0)]),
        ];
        assert!(check(&strings).is_ok());
    }

    #[test]
    fn proper_crossing_is_reported() {
        let strings = [
            string(&[(0.0, 0.0), (10.0, 10.0)]),
            string(&[(0.0, 10.0), (10.0, 0.0)]),
        ];
        assert!(matches!(
            check(&strings),
            Err(NodingError::InteriorIntersection { coord }) if coord == (5.0, 5.0).into()
        ));
    }

    #[test]
    fn endpoint_in_interior_is_reported() {
        let strings = [
            string(&[(0.0, 0.0), (10.0, 0.0)]),
            string(&[(5.0, 0.0), (5.0, 5.0)]),
        ];
        assert!(matches!(
            check(&strings),
            Err(NodingError::InteriorIntersection { coord }) if coord == (5.0, 0.0).into()
        ));
    }

    #[test]
    fn collinear_overlap_is_reported() {
        let strings = [
            string(&[(0.0, 0.0), (10.0, 0.0)]),
            string(&[(5.0, 0.0), (15.0, 0.0)]),
        ];
        assert!(matches!(
            check(&strings),
            Err(NodingError::CollinearOverlap { .. })
        ));
    }

    #[test]
    fn duplicates_are_reported() {
        let strings = [
            string(&[(0.0, 0.0), (10.0, 0.0)]),
            string(&[(10.0, 0.0), (0.0, 0.0)]),
        ];
        assert!(matches!(
            check(&strings),
            Err(NodingError::TopologyCollapse { string: 0, .. })
        ));
    }

    #[test]
    fn chained_substrings_are_valid() {
        let strings = [
            string(&[(0.0, 0.0), (5.0, 0.0)]),
            string(&[(5.0, 0.0), (10.0, 0.0)]),
            string(&[(5.0, 0.0), (5.0, 5.0)]),
        ];
        assert!(check(&strings).is_ok());
    }

    #[test]
    fn interior_vertex_touch_is_reported() {
        // The second string's interior vertex lies on the first string's
        // interior: noded at neither end, so invalid.
        let strings = [
            string(&[(0.0, 0.0), (10.0, 0.0)]),
            string(&[(3.0, 5.0), (5.0, 0.0), (7.0, 5.0)]),
        ];
        assert!(matches!(
            check(&strings),
            Err(NodingError::InteriorIntersection { .. })
        ));
    }
}
