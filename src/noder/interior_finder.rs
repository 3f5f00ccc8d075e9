//! A segment intersector that searches for a single interior intersection.

use crate::geom::Coord;
use crate::intersect::RobustLineIntersector;
use crate::noder::SegmentIntersector;
use crate::segment_string::SegmentString;
use crate::NodingError;

/// Finds an interior intersection in a set of segment strings, if one
/// exists. Only the first intersection found is reported, and the search
/// stops there.
///
/// This is the probe behind noding validity checks: a fully noded
/// arrangement has no interior intersections at all.
pub struct InteriorIntersectionFinder {
    li: RobustLineIntersector,
    check_end_segments_only: bool,
    intersection: Option<Coord>,
    segments: [Coord; 4],
}

impl InteriorIntersectionFinder {
    /// A new finder computing intersections with `li`.
    pub fn new(li: RobustLineIntersector) -> Self {
        InteriorIntersectionFinder {
            li,
            check_end_segments_only: false,
            intersection: None,
            segments: [Coord::new(0.0, 0.0); 4],
        }
    }

    /// Restrict the search to pairs involving an end segment of a string.
    ///
    /// When upstream processing has guaranteed that interior segments are
    /// correctly noded, any residual failure can only involve an end
    /// segment, and skipping the rest is a large saving.
    pub fn set_check_end_segments_only(&mut self, on: bool) {
        self.check_end_segments_only = on;
    }

    /// Was an interior intersection found?
    pub fn has_intersection(&self) -> bool {
        self.intersection.is_some()
    }

    /// The interior intersection found, if any.
    ///
    /// Due to roundoff the location may not be exact.
    pub fn interior_intersection(&self) -> Option<Coord> {
        self.intersection
    }

    /// The endpoints of the intersecting segments, as
    /// `[p00, p01, p10, p11]`.
    pub fn intersection_segments(&self) -> &[Coord; 4] {
        &self.segments
    }

    fn is_end_segment<D>(s: &SegmentString<D>, index: usize) -> bool {
        index == 0 || index >= s.size() - 2
    }
}

impl<D> SegmentIntersector<D> for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        strings: &mut [SegmentString<D>],
        (s0, i0): (usize, usize),
        (s1, i1): (usize, usize),
    ) -> Result<(), NodingError> {
        if self.has_intersection() {
            return Ok(());
        }
        if s0 == s1 && i0 == i1 {
            return Ok(());
        }

        if self.check_end_segments_only
            && !Self::is_end_segment(&strings[s0], i0)
            && !Self::is_end_segment(&strings[s1], i1)
        {
            return Ok(());
        }

        let p00 = *strings[s0].coordinate(i0);
        let p01 = *strings[s0].coordinate(i0 + 1);
        let p10 = *strings[s1].coordinate(i1);
        let p11 = *strings[s1].coordinate(i1 + 1);

        self.li.compute_intersection(&p00, &p01, &p10, &p11)?;
        if self.li.has_intersection() && self.li.is_interior_intersection() {
            self.segments = [p00, p01, p10, p11];
            self.intersection = Some(self.li.intersection(0));
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.has_intersection()
    }
}
