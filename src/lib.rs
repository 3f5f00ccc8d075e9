#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod chain;
mod geom;
mod intersect;
mod num;
mod precision;
mod segment_string;
mod strtree;
mod validate;

pub mod noder;

pub use geom::{Coord, Envelope};
pub use intersect::{IntersectionKind, RobustLineIntersector};
pub use noder::{
    HotPixel, InteriorIntersectionFinder, IntersectionAdder, McIndexNoder, Noder, ScaledNoder,
    SegmentIntersector, SnapRoundingNoder,
};
pub use precision::PrecisionModel;
pub use segment_string::{SegmentNode, SegmentString};
pub use validate::NodingValidator;

/// The ways a noding run can fail.
///
/// All failures surface as the error value of a `compute_nodes` call (or of
/// a validator check); nothing is retried internally.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NodingError {
    /// The input was malformed: a degenerate segment string, a non-finite
    /// ordinate, or an unusable scale factor.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: &'static str,
        /// The offending coordinate, when one exists.
        coord: Option<Coord>,
    },

    /// A vertex off the precision grid was fed to snap rounding without a
    /// scaling wrapper.
    #[error("vertex off the precision grid: {coord:?}")]
    PrecisionMismatch {
        /// The vertex that is not on the grid.
        coord: Coord,
    },

    /// Rounding has merged independent components: two substrings came out
    /// identical.
    #[error("rounding collapsed topology at {coord:?} (substring {string})")]
    TopologyCollapse {
        /// A coordinate of the collapsed substring.
        coord: Coord,
        /// The index of the collapsed substring.
        string: usize,
    },

    /// The orientation predicate contradicted itself.
    ///
    /// This cannot happen with the exact predicate in use; the variant is a
    /// defensive diagnostic.
    #[error("inconsistent orientation signs for segments {a0:?}-{a1:?} and {b0:?}-{b1:?}")]
    RobustnessFailure {
        /// First endpoint of the first segment.
        a0: Coord,
        /// Second endpoint of the first segment.
        a1: Coord,
        /// First endpoint of the second segment.
        b0: Coord,
        /// Second endpoint of the second segment.
        b1: Coord,
    },

    /// Two distinct segments overlap collinearly.
    #[error("collinear overlap between {p0:?} and {p1:?}")]
    CollinearOverlap {
        /// One end of the shared sub-segment.
        p0: Coord,
        /// The other end of the shared sub-segment.
        p1: Coord,
    },

    /// Two segments intersect at a point that is not an endpoint of both.
    #[error("interior intersection at {coord:?}")]
    InteriorIntersection {
        /// The intersection point.
        coord: Coord,
    },
}

/// Produce the fully noded, snap-rounded arrangement of a set of segment
/// strings.
///
/// Input coordinates are scaled by `scale_factor` onto the integer grid
/// (`scale_factor` is the number of grid cells per input unit), snap-rounded
/// there, and scaled back. A `scale_factor` of 1 means the input is already
/// integral; fractional input at scale 1 is rejected with
/// [`NodingError::PrecisionMismatch`].
///
/// Output vertices may move by up to `sqrt(2) / (2 * scale_factor)` from
/// their input positions; that is the price of robustness.
pub fn snap_round<D: Clone>(
    strings: Vec<SegmentString<D>>,
    scale_factor: f64,
) -> Result<Vec<SegmentString<D>>, NodingError> {
    let mut noder = ScaledNoder::new(
        SnapRoundingNoder::new(PrecisionModel::fixed(1.0)),
        scale_factor,
    );
    noder.compute_nodes(strings)?;
    Ok(noder.noded_substrings())
}
