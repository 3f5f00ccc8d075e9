//! The snap-rounding noder.

use crate::geom::Coord;
use crate::intersect::RobustLineIntersector;
use crate::noder::{HotPixel, IntersectionAdder, McIndexNoder, Noder};
use crate::precision::PrecisionModel;
use crate::segment_string::SegmentString;
use crate::NodingError;

/// Computes a rounded, fully noded arrangement from a set of segment
/// strings, using snap rounding (Hobby; Guibas & Marimont).
///
/// Snap rounding assumes all vertices lie on a uniform grid: the precision
/// model must be fixed, and every input vertex must already be rounded to
/// it (this is checked eagerly, and violations surface as
/// [`NodingError::PrecisionMismatch`]). On an integer grid the result is
/// fully robust; [`crate::ScaledNoder`] produces such input from arbitrary
/// floating-point coordinates.
///
/// The computation runs in three phases:
///
/// 1. find all interior intersections with an index-backed pass;
/// 2. snap every segment passing through an intersection's hot pixel;
/// 3. snap every segment passing through a *vertex's* hot pixel, noding the
///    vertex itself too when it caused a snap.
///
/// Together, phases 2 and 3 guarantee that any two output segments that come
/// near each other either share a snapped vertex or pass through disjoint
/// pixels.
pub struct SnapRoundingNoder<D> {
    pm: PrecisionModel,
    strings: Vec<SegmentString<D>>,
}

impl<D> SnapRoundingNoder<D> {
    /// A new snap-rounding noder over the given fixed precision model.
    pub fn new(pm: PrecisionModel) -> Self {
        SnapRoundingNoder {
            pm,
            strings: Vec::new(),
        }
    }

    fn validate_input(&self, strings: &[SegmentString<D>]) -> Result<(), NodingError> {
        let scale = self.pm.scale();
        if !self.pm.is_fixed() || !(scale > 0.0) || !scale.is_finite() {
            return Err(NodingError::InvalidInput {
                reason: "snap rounding requires a fixed precision model with positive scale",
                coord: None,
            });
        }
        for s in strings {
            for p in s.coordinates() {
                if !self.pm.is_precise(p) {
                    return Err(NodingError::PrecisionMismatch { coord: *p });
                }
            }
        }
        Ok(())
    }

    /// Phase 1: find all interior intersections, registering them on the
    /// strings as a side effect and returning the distinct points.
    fn find_interior_intersections(&mut self) -> Result<Vec<Coord>, NodingError> {
        let mut li = RobustLineIntersector::new();
        li.set_precision_model(self.pm);

        let mut noder = McIndexNoder::new(IntersectionAdder::new(li));
        noder.compute_nodes(std::mem::take(&mut self.strings))?;
        let (adder, strings) = noder.into_parts();
        self.strings = strings;
        Ok(adder.interior_intersections().to_vec())
    }

    /// Phase 2: snap every segment passing through an intersection hot
    /// pixel.
    fn compute_intersection_snaps(&mut self, snap_pts: &[Coord]) -> Result<(), NodingError> {
        let scale = self.pm.scale();
        for pt in snap_pts {
            let pixel = HotPixel::new(*pt, scale);
            for s in &mut self.strings {
                for i in 0..s.size() - 1 {
                    add_snapped_node(&pixel, s, i)?;
                }
            }
        }
        Ok(())
    }

    /// Phase 3: snap every segment passing through a vertex hot pixel.
    fn compute_vertex_snaps(&mut self) -> Result<(), NodingError> {
        for e0 in 0..self.strings.len() {
            for e1 in 0..self.strings.len() {
                self.compute_vertex_snaps_pair(e0, e1)?;
            }
        }
        Ok(())
    }

    fn compute_vertex_snaps_pair(&mut self, e0: usize, e1: usize) -> Result<(), NodingError> {
        let scale = self.pm.scale();
        let pts0 = self.strings[e0].coordinates().to_vec();
        for (i0, p0) in pts0.iter().enumerate().take(pts0.len() - 1) {
            let pixel = HotPixel::new(*p0, scale);
            for i1 in 0..self.strings[e1].size() - 1 {
                // Don't snap a vertex to its own segment.
                if e0 == e1 && i0 == i1 {
                    continue;
                }
                if add_snapped_node(&pixel, &mut self.strings[e1], i1)? {
                    // A vertex that caused a snap elsewhere must itself
                    // become a node.
                    self.strings[e0].add_intersection(*p0, i0);
                }
            }
        }
        Ok(())
    }
}

/// Registers the pixel centre as a node on segment `i` of `s` if that
/// segment passes through the pixel. Returns whether a node was added.
fn add_snapped_node<D>(
    pixel: &HotPixel,
    s: &mut SegmentString<D>,
    i: usize,
) -> Result<bool, NodingError> {
    let p0 = *s.coordinate(i);
    let p1 = *s.coordinate(i + 1);
    if pixel.intersects(&p0, &p1)? {
        s.add_intersection(*pixel.centre(), i);
        return Ok(true);
    }
    Ok(false)
}

impl<D> Noder<D> for SnapRoundingNoder<D> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<(), NodingError> {
        self.validate_input(&strings)?;
        self.strings = strings;

        let intersections = self.find_interior_intersections()?;
        self.compute_intersection_snaps(&intersections)?;
        self.compute_vertex_snaps()?;
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<SegmentString<D>>
    where
        D: Clone,
    {
        SegmentString::noded_substrings(&self.strings)
    }
}
