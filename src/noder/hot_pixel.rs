//! Hot pixels: the grid cells that snap points own.

use crate::geom::{Coord, Envelope};
use crate::intersect::RobustLineIntersector;
use crate::NodingError;

/// The square cell of one grid unit centred on a snap point.
///
/// A hot pixel owns its interior, its bottom and left edges, and its
/// bottom-left corner; the top and right boundaries belong to the
/// neighbouring pixels. This half-open rule is what lets snap ownership
/// partition the plane: every point of the plane lies in exactly one pixel.
///
/// Hot pixels are ephemeral: one is built per snap point, queried against
/// the segments near it, and dropped.
#[derive(Clone, Debug)]
pub struct HotPixel {
    centre: Coord,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    env: Envelope,
}

impl HotPixel {
    /// The pixel of width `1 / scale` centred on `centre`.
    pub fn new(centre: Coord, scale: f64) -> Self {
        let half = 0.5 / scale;
        let (min_x, min_y) = (centre.x - half, centre.y - half);
        let (max_x, max_y) = (centre.x + half, centre.y + half);
        HotPixel {
            centre,
            min_x,
            min_y,
            max_x,
            max_y,
            env: Envelope {
                min_x,
                min_y,
                max_x,
                max_y,
            },
        }
    }

    /// The snap point this pixel is centred on.
    pub fn centre(&self) -> &Coord {
        &self.centre
    }

    /// Does this pixel own the point `p`?
    ///
    /// Applies the half-open rule: bottom and left boundaries are in, top
    /// and right are out.
    pub fn contains(&self, p: &Coord) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }

    /// Does the closed segment `[p0, p1]` intersect this pixel?
    ///
    /// "Intersect" honours the half-open rule: contact confined to the top
    /// or right boundary does not count. The test runs the segment against
    /// the pixel's tolerance square: a proper crossing of any edge is an
    /// intersection, as is an endpoint inside the pixel, as is (non-proper)
    /// contact with both the left and the bottom edge, which pins down the
    /// owned bottom-left corner.
    pub fn intersects(&self, p0: &Coord, p1: &Coord) -> Result<bool, NodingError> {
        if !self.env.intersects(&Envelope::of_segment(p0, p1)) {
            return Ok(false);
        }
        if self.contains(p0) || self.contains(p1) {
            return Ok(true);
        }

        let top_right = Coord::new(self.max_x, self.max_y);
        let top_left = Coord::new(self.min_x, self.max_y);
        let bottom_left = Coord::new(self.min_x, self.min_y);
        let bottom_right = Coord::new(self.max_x, self.min_y);

        let mut li = RobustLineIntersector::new();
        let mut touches_left = false;
        let mut touches_bottom = false;

        li.compute_intersection(p0, p1, &top_left, &top_right)?;
        if li.is_proper() {
            return Ok(true);
        }

        li.compute_intersection(p0, p1, &top_left, &bottom_left)?;
        if li.is_proper() {
            return Ok(true);
        }
        if li.has_intersection() {
            touches_left = true;
        }

        li.compute_intersection(p0, p1, &bottom_left, &bottom_right)?;
        if li.is_proper() {
            return Ok(true);
        }
        if li.has_intersection() {
            touches_bottom = true;
        }

        li.compute_intersection(p0, p1, &bottom_right, &top_right)?;
        if li.is_proper() {
            return Ok(true);
        }

        Ok(touches_left && touches_bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(x: f64, y: f64) -> HotPixel {
        HotPixel::new(Coord::new(x, y), 1.0)
    }

    fn intersects(hp: &HotPixel, p0: (f64, f64), p1: (f64, f64)) -> bool {
        hp.intersects(&p0.into(), &p1.into()).unwrap()
    }

    #[test]
    fn ownership_is_half_open() {
        let hp = pixel(0.0, 0.0);
        assert!(hp.contains(&Coord::new(0.0, 0.0)));
        assert!(hp.contains(&Coord::new(-0.5, -0.5)));
        assert!(hp.contains(&Coord::new(-0.5, 0.0)));
        assert!(!hp.contains(&Coord::new(0.5, 0.0)));
        assert!(!hp.contains(&Coord::new(0.0, 0.5)));
        assert!(!hp.contains(&Coord::new(0.5, 0.5)));
    }

    #[test]
    fn far_segment_misses() {
        let hp = pixel(0.0, 0.0);
        assert!(!intersects(&hp, (5.0, 5.0), (6.0, 5.0)));
    }

    #[test]
    fn crossing_segment_hits() {
        let hp = pixel(5.0, 5.0);
        assert!(intersects(&hp, (0.0, 5.0), (10.0, 5.0)));
        assert!(intersects(&hp, (5.0, 0.0), (5.0, 10.0)));
        assert!(intersects(&hp, (0.0, 0.0), (10.0, 10.0)));
    }

    #[test]
    fn segment_ending_inside_hits() {
        let hp = pixel(5.0, 5.0);
        assert!(intersects(&hp, (0.0, 0.0), (5.0, 5.0)));
        assert!(intersects(&hp, (5.2, 4.8), (10.0, 0.0)));
    }

    #[test]
    fn tangent_to_top_or_right_misses() {
        let hp = pixel(0.0, 0.0);
        // Collinear along the top boundary.
        assert!(!intersects(&hp, (-2.0, 0.5), (2.0, 0.5)));
        // Collinear along the right boundary.
        assert!(!intersects(&hp, (0.5, -2.0), (0.5, 2.0)));
        // Touching only the top-right corner.
        assert!(!intersects(&hp, (0.0, 1.0), (1.0, 0.0)));
    }

    #[test]
    fn tangent_to_bottom_or_left_hits() {
        let hp = pixel(0.0, 0.0);
        // Collinear along the bottom boundary.
        assert!(intersects(&hp, (-2.0, -0.5), (2.0, -0.5)));
        // Collinear along the left boundary.
        assert!(intersects(&hp, (-0.5, -2.0), (-0.5, 2.0)));
        // Passing exactly through the bottom-left corner.
        assert!(intersects(&hp, (-1.0, 0.0), (0.0, -1.0)));
    }

    #[test]
    fn scale_shrinks_the_pixel() {
        let hp = HotPixel::new(Coord::new(5.0, 5.0), 10.0);
        assert!(intersects(&hp, (4.96, 4.0), (4.96, 6.0)));
        assert!(!intersects(&hp, (4.8, 4.0), (4.8, 6.0)));
    }
}
