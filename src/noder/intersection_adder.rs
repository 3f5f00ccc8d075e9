//! A segment intersector that collects interior intersections and registers
//! them as nodes.

use crate::geom::Coord;
use crate::intersect::RobustLineIntersector;
use crate::noder::SegmentIntersector;
use crate::segment_string::SegmentString;
use crate::NodingError;

/// Finds every *interior* intersection among the processed segment pairs,
/// recording the distinct intersection points and registering each on both
/// participating segment strings.
///
/// This is the Phase 1 workhorse of snap rounding: the collected points
/// become hot-pixel centres.
pub struct IntersectionAdder {
    li: RobustLineIntersector,
    interior_intersections: Vec<Coord>,
}

impl IntersectionAdder {
    /// A new adder computing intersections with `li`.
    pub fn new(li: RobustLineIntersector) -> Self {
        IntersectionAdder {
            li,
            interior_intersections: Vec::new(),
        }
    }

    /// The distinct interior intersection points found so far.
    pub fn interior_intersections(&self) -> &[Coord] {
        &self.interior_intersections
    }
}

impl<D> SegmentIntersector<D> for IntersectionAdder {
    fn process_intersections(
        &mut self,
        strings: &mut [SegmentString<D>],
        (s0, i0): (usize, usize),
        (s1, i1): (usize, usize),
    ) -> Result<(), NodingError> {
        // A segment has no interior intersection with itself.
        if s0 == s1 && i0 == i1 {
            return Ok(());
        }

        let p00 = *strings[s0].coordinate(i0);
        let p01 = *strings[s0].coordinate(i0 + 1);
        let p10 = *strings[s1].coordinate(i1);
        let p11 = *strings[s1].coordinate(i1 + 1);

        self.li.compute_intersection(&p00, &p01, &p10, &p11)?;
        if self.li.has_intersection() && self.li.is_interior_intersection() {
            for k in 0..self.li.intersection_num() {
                let p = self.li.intersection(k);
                if !self.interior_intersections.contains(&p) {
                    self.interior_intersections.push(p);
                }
            }
            strings[s0].add_intersections_from(&self.li, i0, 0);
            strings[s1].add_intersections_from(&self.li, i1, 1);
        }
        Ok(())
    }
}
