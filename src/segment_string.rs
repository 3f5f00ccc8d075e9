//! Segment strings: polylines that accumulate intersection points.

use malachite::Rational;

use crate::geom::Coord;
use crate::intersect::RobustLineIntersector;
use crate::num::exact_param;
use crate::NodingError;

/// An intersection point registered on a segment string.
///
/// Asserts "insert a vertex at `coord` on the segment starting at vertex
/// `seg_index`". The point need not lie exactly on that segment: snap
/// rounding registers pixel centres, which sit up to half a grid diagonal
/// away.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentNode {
    /// Index of the segment (i.e. of its first vertex) the node lies on.
    pub seg_index: usize,
    /// The vertex to be inserted.
    pub coord: Coord,
}

/// An ordered sequence of at least two coordinates, plus an accumulator of
/// intersection points and an opaque user-data payload.
///
/// The vertex sequence is read-only after construction; all mutation goes
/// through the intersection list. Once a noding run has registered every
/// intersection, [`SegmentString::noded_substrings`] cuts the polylines at
/// their nodes.
///
/// The payload `D` is never inspected; it is cloned onto each substring so
/// that callers can map noded output back to whatever produced it.
#[derive(Clone, Debug)]
pub struct SegmentString<D> {
    pts: Vec<Coord>,
    data: D,
    nodes: Vec<SegmentNode>,
}

impl<D> SegmentString<D> {
    /// Create a segment string from a vertex sequence.
    ///
    /// Fails with [`NodingError::InvalidInput`] if the sequence has fewer
    /// than two distinct points or any non-finite ordinate.
    pub fn new(pts: Vec<Coord>, data: D) -> Result<Self, NodingError> {
        if let Some(p) = pts.iter().find(|p| !p.is_finite()) {
            return Err(NodingError::InvalidInput {
                reason: "non-finite ordinate",
                coord: Some(*p),
            });
        }
        let distinct = pts.first().map_or(false, |p0| pts.iter().any(|p| p != p0));
        if !distinct {
            return Err(NodingError::InvalidInput {
                reason: "segment string needs at least 2 distinct points",
                coord: pts.first().copied(),
            });
        }
        Ok(SegmentString {
            pts,
            data,
            nodes: Vec::new(),
        })
    }

    pub(crate) fn new_unchecked(pts: Vec<Coord>, data: D) -> Self {
        debug_assert!(pts.len() >= 2);
        SegmentString {
            pts,
            data,
            nodes: Vec::new(),
        }
    }

    /// The number of vertices.
    pub fn size(&self) -> usize {
        self.pts.len()
    }

    /// The vertex sequence.
    pub fn coordinates(&self) -> &[Coord] {
        &self.pts
    }

    /// The `i`-th vertex.
    pub fn coordinate(&self, i: usize) -> &Coord {
        &self.pts[i]
    }

    pub(crate) fn coordinates_mut(&mut self) -> &mut [Coord] {
        &mut self.pts
    }

    /// The user-data payload.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Consume the string, returning its payload.
    pub fn into_data(self) -> D {
        self.data
    }

    /// The intersection points registered so far.
    pub fn nodes(&self) -> &[SegmentNode] {
        &self.nodes
    }

    /// Register the intersection point `p` on segment `seg_index`.
    ///
    /// Duplicate `(seg_index, p)` entries are collapsed.
    ///
    /// # Panics
    ///
    /// Panics if `seg_index` does not name a segment.
    pub fn add_intersection(&mut self, p: Coord, seg_index: usize) {
        assert!(seg_index < self.pts.len() - 1);
        let node = SegmentNode {
            seg_index,
            coord: p,
        };
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    /// Register all intersection points held by a populated intersector,
    /// skipping pure vertex intersections.
    ///
    /// `geom_index` names which of the intersector's two input segments
    /// belongs to this string (0 or 1), and `seg_index` is that segment's
    /// index within this string.
    pub fn add_intersections_from(
        &mut self,
        li: &RobustLineIntersector,
        seg_index: usize,
        geom_index: usize,
    ) {
        for k in 0..li.intersection_num() {
            self.add_intersection_from(li, seg_index, geom_index, k);
        }
    }

    /// Register the `k`-th intersection point held by a populated
    /// intersector, unless it is an endpoint of the named segment.
    pub fn add_intersection_from(
        &mut self,
        li: &RobustLineIntersector,
        seg_index: usize,
        _geom_index: usize,
        k: usize,
    ) {
        let p = li.intersection(k);
        if p == self.pts[seg_index] || p == self.pts[seg_index + 1] {
            return;
        }
        self.add_intersection(p, seg_index);
    }

    /// Cut every string at its registered nodes, producing the noded
    /// substrings.
    ///
    /// Nodes are ordered along each segment by their (exact) projection
    /// parameter, ties keeping insertion order; the implicit endpoint
    /// vertices of each string are always nodes. Consecutive duplicate
    /// coordinates are dropped, and substrings left with fewer than two
    /// points are discarded. Substrings appear in the order of their parents
    /// and carry a clone of the parent payload.
    pub fn noded_substrings(strings: &[SegmentString<D>]) -> Vec<SegmentString<D>>
    where
        D: Clone,
    {
        let mut out = Vec::new();
        for s in strings {
            s.split_at_nodes(&mut out);
        }
        out
    }

    fn split_at_nodes(&self, out: &mut Vec<SegmentString<D>>)
    where
        D: Clone,
    {
        let last_seg = self.pts.len() - 2;

        // The parameter of a node along its segment; zero-length segments
        // (possible only in hand-built input) order their nodes by insertion.
        let param = |n: &SegmentNode| -> Rational {
            let a = &self.pts[n.seg_index];
            let b = &self.pts[n.seg_index + 1];
            if a == b {
                Rational::from(0)
            } else {
                exact_param(&n.coord, a, b)
            }
        };

        let mut nodes: Vec<&SegmentNode> = self.nodes.iter().collect();
        nodes.sort_by_cached_key(|n| (n.seg_index, param(n)));

        let start = SegmentNode {
            seg_index: 0,
            coord: self.pts[0],
        };
        let end = SegmentNode {
            seg_index: last_seg,
            coord: self.pts[last_seg + 1],
        };

        let mut prev = &start;
        for n in nodes.iter().copied().chain(std::iter::once(&end)) {
            self.emit_substring(prev, n, out);
            prev = n;
        }
    }

    fn emit_substring(&self, n1: &SegmentNode, n2: &SegmentNode, out: &mut Vec<SegmentString<D>>)
    where
        D: Clone,
    {
        let mut pts = Vec::with_capacity(n2.seg_index - n1.seg_index + 2);
        pts.push(n1.coord);
        for i in (n1.seg_index + 1)..=n2.seg_index {
            pts.push(self.pts[i]);
        }
        pts.push(n2.coord);
        pts.dedup();

        if pts.len() >= 2 {
            out.push(SegmentString::new_unchecked(pts, self.data.clone()));
        }
    }
}

impl<D: Clone> SegmentString<D> {
    /// Build segment strings from a Bézier path, flattening curves to
    /// polylines within `tolerance`.
    ///
    /// Each subpath becomes one string (closed subpaths repeat their first
    /// point); subpaths with fewer than two distinct points are skipped.
    pub fn from_bez_path(
        path: &kurbo::BezPath,
        tolerance: f64,
        data: D,
    ) -> Result<Vec<SegmentString<D>>, NodingError> {
        let mut polylines: Vec<Vec<Coord>> = Vec::new();
        let mut first: Option<Coord> = None;
        kurbo::flatten(
            path.elements().iter().copied(),
            tolerance,
            |el| match el {
                kurbo::PathEl::MoveTo(p) => {
                    first = Some(Coord::new(p.x, p.y));
                    polylines.push(vec![Coord::new(p.x, p.y)]);
                }
                kurbo::PathEl::LineTo(p) => {
                    if let Some(poly) = polylines.last_mut() {
                        poly.push(Coord::new(p.x, p.y));
                    }
                }
                kurbo::PathEl::ClosePath => {
                    if let (Some(poly), Some(f)) = (polylines.last_mut(), first) {
                        poly.push(f);
                    }
                }
                // flatten only emits moves, lines and closes
                _ => {}
            },
        );

        let mut out = Vec::new();
        for mut poly in polylines {
            poly.dedup();
            if poly.len() >= 2 && poly.iter().any(|p| p != &poly[0]) {
                out.push(SegmentString::new(poly, data.clone())?);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(pts: &[(f64, f64)]) -> SegmentString<()> {
        SegmentString::new(pts.iter().map(|&p| p.into()).collect(), ()).unwrap()
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(SegmentString::new(vec![], ()).is_err());
        assert!(SegmentString::new(vec![(1.0, 1.0).into()], ()).is_err());
        assert!(SegmentString::new(vec![(1.0, 1.0).into(), (1.0, 1.0).into()], ()).is_err());
        assert!(SegmentString::new(vec![(1.0, 1.0).into(), (f64::NAN, 0.0).into()], ()).is_err());
    }

    #[test]
    fn duplicate_nodes_collapse() {
        let mut s = string(&[(0.0, 0.0), (10.0, 0.0)]);
        s.add_intersection((5.0, 0.0).into(), 0);
        s.add_intersection((5.0, 0.0).into(), 0);
        assert_eq!(s.nodes().len(), 1);
    }

    #[test]
    fn no_nodes_yields_whole_string() {
        let s = string(&[(0.0, 0.0), (10.0, 0.0), (20.0, 5.0)]);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].coordinates(), s.coordinates());
    }

    #[test]
    fn split_at_interior_node() {
        let mut s = string(&[(0.0, 0.0), (10.0, 0.0)]);
        s.add_intersection((5.0, 0.0).into(), 0);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].coordinates(), &[(0.0, 0.0).into(), (5.0, 0.0).into()]);
        assert_eq!(subs[1].coordinates(), &[(5.0, 0.0).into(), (10.0, 0.0).into()]);
    }

    #[test]
    fn nodes_sort_along_segment_regardless_of_insertion() {
        let mut s = string(&[(0.0, 0.0), (10.0, 0.0)]);
        s.add_intersection((7.0, 0.0).into(), 0);
        s.add_intersection((2.0, 0.0).into(), 0);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        let cuts: Vec<_> = subs.iter().map(|s| s.coordinate(0).x).collect();
        assert_eq!(cuts, vec![0.0, 2.0, 7.0]);
    }

    #[test]
    fn node_at_existing_vertex_is_absorbed() {
        let mut s = string(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        s.add_intersection((5.0, 5.0).into(), 0);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].coordinates(), &[(0.0, 0.0).into(), (5.0, 5.0).into()]);
        assert_eq!(subs[1].coordinates(), &[(5.0, 5.0).into(), (10.0, 0.0).into()]);
    }

    #[test]
    fn off_segment_node_bends_the_substring() {
        // A snapped node sits one pixel off the segment it cuts.
        let mut s = string(&[(0.0, 0.0), (10.0, 0.0)]);
        s.add_intersection((5.0, 1.0).into(), 0);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].coordinates(), &[(0.0, 0.0).into(), (5.0, 1.0).into()]);
        assert_eq!(subs[1].coordinates(), &[(5.0, 1.0).into(), (10.0, 0.0).into()]);
    }

    #[test]
    fn payload_reaches_every_substring() {
        let mut s = SegmentString::new(
            vec![(0.0, 0.0).into(), (10.0, 0.0).into()],
            "road-17".to_owned(),
        )
        .unwrap();
        s.add_intersection((4.0, 0.0).into(), 0);
        let subs = SegmentString::noded_substrings(std::slice::from_ref(&s));
        assert!(subs.iter().all(|s| s.data() == "road-17"));
    }

    #[test]
    fn vertex_intersections_filtered_from_intersector() {
        let mut li = RobustLineIntersector::new();
        li.compute_intersection(
            &(0.0, 0.0).into(),
            &(10.0, 0.0).into(),
            &(10.0, 0.0).into(),
            &(10.0, 5.0).into(),
        )
        .unwrap();
        assert!(li.has_intersection());

        let mut s = string(&[(0.0, 0.0), (10.0, 0.0)]);
        s.add_intersections_from(&li, 0, 0);
        assert!(s.nodes().is_empty());
    }

    #[test]
    fn from_bez_path_lines() {
        let mut path = kurbo::BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.close_path();

        let strings = SegmentString::from_bez_path(&path, 0.1, ()).unwrap();
        assert_eq!(strings.len(), 1);
        let pts = strings[0].coordinates();
        assert_eq!(pts.first(), pts.last());
        assert_eq!(pts.len(), 4);
    }
}
