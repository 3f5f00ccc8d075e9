//! The index-backed single-pass noder.

use crate::chain::{chains_of, overlapping_segments, MonotoneChain};
use crate::noder::{Noder, SegmentIntersector};
use crate::segment_string::SegmentString;
use crate::strtree::StrTree;
use crate::NodingError;

/// A single-pass noder that prunes candidate segment pairs with monotone
/// chains in an STR-tree.
///
/// Every chain is queried against the index; each envelope-overlapping chain
/// pair is refined (by midpoint subdivision) down to its overlapping segment
/// pairs, which are handed to the configured [`SegmentIntersector`]. What
/// "noding" means is therefore entirely up to the intersector: it may
/// register nodes on the strings, merely collect intersection points, or
/// stop the pass early via [`SegmentIntersector::is_done`].
pub struct McIndexNoder<D, S> {
    intersector: S,
    strings: Vec<SegmentString<D>>,
}

impl<D, S> McIndexNoder<D, S> {
    /// A new noder driving the given segment intersector.
    pub fn new(intersector: S) -> Self {
        McIndexNoder {
            intersector,
            strings: Vec::new(),
        }
    }

    /// A reference to the segment intersector.
    pub fn intersector(&self) -> &S {
        &self.intersector
    }

    /// Decompose into the intersector and the noded strings.
    pub fn into_parts(self) -> (S, Vec<SegmentString<D>>) {
        (self.intersector, self.strings)
    }
}

impl<D, S: SegmentIntersector<D>> Noder<D> for McIndexNoder<D, S> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<(), NodingError> {
        self.strings = strings;

        let mut chains: Vec<MonotoneChain> = Vec::new();
        for (i, s) in self.strings.iter().enumerate() {
            chains.extend(chains_of(s.coordinates(), i));
        }
        let tree = StrTree::new(chains.iter().enumerate().map(|(i, c)| (c.env, i)).collect());

        let mut candidates: Vec<usize> = Vec::new();
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (ci, c) in chains.iter().enumerate() {
            if self.intersector.is_done() {
                break;
            }
            candidates.clear();
            tree.query(&c.env, &mut |i| candidates.push(i));

            for &di in &candidates {
                // Process each chain pair once; a chain never intersects
                // itself (that's what monotone means).
                if di <= ci {
                    continue;
                }
                let d = &chains[di];

                pairs.clear();
                overlapping_segments(
                    self.strings[c.string].coordinates(),
                    c,
                    self.strings[d.string].coordinates(),
                    d,
                    &mut |i, j| pairs.push((i, j)),
                );
                for &(i, j) in &pairs {
                    self.intersector.process_intersections(
                        &mut self.strings,
                        (c.string, i),
                        (d.string, j),
                    )?;
                    if self.intersector.is_done() {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<SegmentString<D>>
    where
        D: Clone,
    {
        SegmentString::noded_substrings(&self.strings)
    }
}
