//! Noders: algorithms that compute the intersection nodes of a collection of
//! segment strings.
//!
//! The main entry points are [`SnapRoundingNoder`] (for input already on an
//! integer grid) and [`ScaledNoder`] (which lifts arbitrary floating-point
//! input onto such a grid and back). [`McIndexNoder`] is the index-backed
//! single pass over candidate segment pairs that both of them build on; it
//! is parameterised by a [`SegmentIntersector`] strategy saying what to do
//! with each pair.

mod hot_pixel;
mod interior_finder;
mod intersection_adder;
mod mc_index;
mod scaled;
mod snap_round;

pub use hot_pixel::HotPixel;
pub use interior_finder::InteriorIntersectionFinder;
pub use intersection_adder::IntersectionAdder;
pub use mc_index::McIndexNoder;
pub use scaled::ScaledNoder;
pub use snap_round::SnapRoundingNoder;

use crate::segment_string::SegmentString;
use crate::NodingError;

/// Computes the noding of a collection of segment strings.
///
/// A noder is used in two steps: [`compute_nodes`](Noder::compute_nodes)
/// takes ownership of the input and registers intersection nodes on it, and
/// [`noded_substrings`](Noder::noded_substrings) extracts the resulting
/// substrings. The two-step shape lets wrappers (like [`ScaledNoder`])
/// transform the strings on the way in and the substrings on the way out.
pub trait Noder<D> {
    /// Register intersection nodes for (and take ownership of) the given
    /// segment strings.
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<(), NodingError>;

    /// The noded substrings implied by the accumulated intersection lists.
    fn noded_substrings(&self) -> Vec<SegmentString<D>>
    where
        D: Clone;
}

/// A strategy invoked on each candidate segment pair of a noding pass.
///
/// `a` and `b` are `(string index, segment index)` pairs into `strings`.
/// Implementations may mutate the named strings (to register intersection
/// nodes) but must leave the rest of the collection alone.
pub trait SegmentIntersector<D> {
    /// Observe one candidate pair.
    fn process_intersections(
        &mut self,
        strings: &mut [SegmentString<D>],
        a: (usize, usize),
        b: (usize, usize),
    ) -> Result<(), NodingError>;

    /// An early-termination hint: once this returns true, the noding pass
    /// may stop feeding pairs.
    fn is_done(&self) -> bool {
        false
    }
}
