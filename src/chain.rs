//! Monotone chains: runs of segments whose direction stays in one quadrant.
//!
//! A monotone chain can be summarised by the envelope of its two extreme
//! vertices, and two chains' overlapping segment pairs can be found by
//! alternating midpoint subdivision. Both facts together make chains a good
//! unit for spatial indexing: far fewer envelopes than segments, with cheap
//! refinement down to the segment level.

use crate::geom::{Coord, Envelope};

/// The quadrant of a direction vector.
///
/// 0 = NE, 1 = NW, 2 = SW, 3 = SE; a zero component counts as positive.
fn quadrant(dx: f64, dy: f64) -> u8 {
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

/// A maximal monotone run of segments within one segment string.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    /// Index of the owning segment string within the noding run.
    pub string: usize,
    /// Index of the first vertex of the chain.
    pub start: usize,
    /// Index of the last vertex of the chain (`start < end`).
    pub end: usize,
    /// The chain's envelope: the rectangle spanned by its extreme vertices.
    pub env: Envelope,
}

/// Decompose a vertex sequence into maximal monotone chains.
pub fn chains_of(pts: &[Coord], string: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }

    let mut start = 0;
    while start < pts.len() - 1 {
        let chain_quad = quadrant(pts[start + 1].x - pts[start].x, pts[start + 1].y - pts[start].y);
        let mut end = start + 1;
        while end + 1 < pts.len()
            && quadrant(pts[end + 1].x - pts[end].x, pts[end + 1].y - pts[end].y) == chain_quad
        {
            end += 1;
        }
        chains.push(MonotoneChain {
            string,
            start,
            end,
            env: Envelope::of_segment(&pts[start], &pts[end]),
        });
        start = end;
    }
    chains
}

/// Visit every envelope-overlapping segment pair between two chains.
///
/// `visit(i, j)` receives a segment index of the first chain's string and one
/// of the second's. The search recursively halves whichever chain ranges are
/// still longer than one segment, pruning halves whose extreme-vertex
/// envelopes miss each other; monotonicity is what makes the extreme-vertex
/// envelope valid for the whole range.
pub fn overlapping_segments(
    pts0: &[Coord],
    c0: &MonotoneChain,
    pts1: &[Coord],
    c1: &MonotoneChain,
    visit: &mut impl FnMut(usize, usize),
) {
    overlap_rec(pts0, c0.start, c0.end, pts1, c1.start, c1.end, visit)
}

#[allow(clippy::too_many_arguments)]
fn overlap_rec(
    pts0: &[Coord],
    s0: usize,
    e0: usize,
    pts1: &[Coord],
    s1: usize,
    e1: usize,
    visit: &mut impl FnMut(usize, usize),
) {
    let env0 = Envelope::of_segment(&pts0[s0], &pts0[e0]);
    let env1 = Envelope::of_segment(&pts1[s1], &pts1[e1]);
    if !env0.intersects(&env1) {
        return;
    }

    if e0 - s0 == 1 && e1 - s1 == 1 {
        visit(s0, s1);
        return;
    }

    let m0 = (s0 + e0) / 2;
    let m1 = (s1 + e1) / 2;
    if s0 < m0 {
        if s1 < m1 {
            overlap_rec(pts0, s0, m0, pts1, s1, m1, visit);
        }
        if m1 < e1 {
            overlap_rec(pts0, s0, m0, pts1, m1, e1, visit);
        }
    }
    if m0 < e0 {
        if s1 < m1 {
            overlap_rec(pts0, m0, e0, pts1, s1, m1, visit);
        }
        if m1 < e1 {
            overlap_rec(pts0, m0, e0, pts1, m1, e1, visit);
        }
    }
}
