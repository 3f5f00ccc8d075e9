//! A wrapper that lifts a noder's input into the integer domain.

use crate::geom::Coord;
use crate::noder::Noder;
use crate::segment_string::SegmentString;
use crate::NodingError;

/// Wraps a noder, transforming its input into the integer domain and its
/// output back.
///
/// Snap-rounding noders are only robust on an integer grid; this wrapper
/// lets clients hand them arbitrary floating-point input. On the way in,
/// every ordinate is mapped through `round((v - offset) * scale_factor)`;
/// on the way out, substring coordinates are rescaled in place through the
/// inverse map. The offsets shift the working origin, buying extra digits
/// of precision for inputs far from zero.
///
/// Scaling collapses zero-length segments: consecutive duplicate vertices
/// are removed, and a string whose vertices all land on one grid point is
/// dropped entirely.
pub struct ScaledNoder<N> {
    noder: N,
    scale_factor: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<N> ScaledNoder<N> {
    /// Wrap `noder`, scaling by `scale_factor` around the origin.
    pub fn new(noder: N, scale_factor: f64) -> Self {
        Self::with_offsets(noder, scale_factor, 0.0, 0.0)
    }

    /// Wrap `noder`, scaling by `scale_factor` around `(offset_x, offset_y)`.
    pub fn with_offsets(noder: N, scale_factor: f64, offset_x: f64, offset_y: f64) -> Self {
        ScaledNoder {
            noder,
            scale_factor,
            offset_x,
            offset_y,
        }
    }

    /// Is the input already integral, making scaling a no-op?
    pub fn is_integer_precision(&self) -> bool {
        self.scale_factor == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    fn scale<D>(&self, strings: Vec<SegmentString<D>>) -> Vec<SegmentString<D>> {
        strings
            .into_iter()
            .filter_map(|s| {
                let mut pts: Vec<Coord> = s
                    .coordinates()
                    .iter()
                    .map(|p| {
                        Coord::with_z(
                            ((p.x - self.offset_x) * self.scale_factor).round(),
                            ((p.y - self.offset_y) * self.scale_factor).round(),
                            p.z,
                        )
                    })
                    .collect();
                pts.dedup();
                // A fully collapsed string has no segments left to node.
                (pts.len() >= 2).then(|| SegmentString::new_unchecked(pts, s.into_data()))
            })
            .collect()
    }

    fn rescale<D>(&self, strings: &mut [SegmentString<D>]) {
        for s in strings {
            for p in s.coordinates_mut() {
                p.x = p.x / self.scale_factor + self.offset_x;
                p.y = p.y / self.scale_factor + self.offset_y;
            }
        }
    }
}

impl<D, N: Noder<D>> Noder<D> for ScaledNoder<N> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<(), NodingError> {
        if !(self.scale_factor > 0.0) || !self.scale_factor.is_finite() {
            return Err(NodingError::InvalidInput {
                reason: "scale factor must be positive and finite",
                coord: None,
            });
        }
        let strings = if self.is_integer_precision() {
            strings
        } else {
            self.scale(strings)
        };
        self.noder.compute_nodes(strings)
    }

    fn noded_substrings(&self) -> Vec<SegmentString<D>>
    where
        D: Clone,
    {
        let mut subs = self.noder.noded_substrings();
        if !self.is_integer_precision() {
            self.rescale(&mut subs);
        }
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noder::SnapRoundingNoder;
    use crate::precision::PrecisionModel;

    fn string(pts: &[(f64, f64)]) -> SegmentString<()> {
        SegmentString::new(pts.iter().map(|&p| p.into()).collect(), ()).unwrap()
    }

    fn scaled(scale: f64) -> ScaledNoder<SnapRoundingNoder<()>> {
        ScaledNoder::new(SnapRoundingNoder::new(PrecisionModel::fixed(1.0)), scale)
    }

    #[test]
    fn rejects_bad_scale_factor() {
        for bad in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let mut noder = scaled(bad);
            let err = noder
                .compute_nodes(vec![string(&[(0.0, 0.0), (1.0, 0.0)])])
                .unwrap_err();
            assert!(matches!(err, NodingError::InvalidInput { .. }));
        }
    }

    #[test]
    fn scale_one_passes_input_through() {
        let mut noder = scaled(1.0);
        noder
            .compute_nodes(vec![
                string(&[(0.0, 0.0), (10.0, 10.0)]),
                string(&[(0.0, 10.0), (10.0, 0.0)]),
            ])
            .unwrap();
        assert_eq!(noder.noded_substrings().len(), 4);
    }

    #[test]
    fn fractional_input_is_noded_and_rescaled() {
        let mut noder = scaled(100.0);
        noder
            .compute_nodes(vec![
                string(&[(0.12, 0.34), (0.99, 0.34)]),
                string(&[(0.5, 0.0), (0.5, 1.0)]),
            ])
            .unwrap();
        let subs = noder.noded_substrings();
        assert_eq!(subs.len(), 4);

        // All output ordinates are back at the original magnitude, on the
        // 1/100 grid.
        for s in &subs {
            for p in s.coordinates() {
                assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
                assert_eq!((p.x * 100.0).round() / 100.0, p.x);
                assert_eq!((p.y * 100.0).round() / 100.0, p.y);
            }
        }
        // The junction is at (0.5, 0.34) exactly.
        let junction = Coord::new(0.5, 0.34);
        assert_eq!(
            subs.iter()
                .filter(|s| s.coordinates().contains(&junction))
                .count(),
            4
        );
    }

    #[test]
    fn zero_length_segments_are_dropped_at_scaling() {
        let mut noder = scaled(1.0e-2);
        // At scale 0.01 these two vertices land on the same grid point, so
        // the string collapses and is dropped.
        let collapsing = string(&[(3.0, 3.0), (4.0, 4.0)]);
        let surviving = string(&[(0.0, 0.0), (500.0, 0.0)]);
        noder.compute_nodes(vec![collapsing, surviving]).unwrap();
        assert_eq!(noder.noded_substrings().len(), 1);
    }

    #[test]
    fn offsets_shift_the_working_origin() {
        let mut noder = ScaledNoder::with_offsets(
            SnapRoundingNoder::new(PrecisionModel::fixed(1.0)),
            100.0,
            -1000.0,
            -1000.0,
        );
        noder
            .compute_nodes(vec![
                string(&[(-1000.12, -1000.34), (-999.01, -1000.34)]),
                string(&[(-999.5, -1001.0), (-999.5, -1000.0)]),
            ])
            .unwrap();
        let subs = noder.noded_substrings();
        assert_eq!(subs.len(), 4);
        let junction = Coord::new(-999.5, -1000.34);
        assert_eq!(
            subs.iter()
                .filter(|s| s.coordinates().contains(&junction))
                .count(),
            4
        );
    }
}
