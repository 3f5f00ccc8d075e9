//! Precision models: the grids that produced coordinates are rounded onto.

use crate::geom::Coord;

/// A specification of the grid that coordinates are rounded onto.
///
/// Precision models are plain values; clone them freely. The snap-rounding
/// machinery only guarantees robustness for a fixed model with `scale >= 1`
/// whose input vertices already lie on the grid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PrecisionModel {
    /// Full double precision; `make_precise` is the identity.
    Floating,
    /// Single precision: ordinates are rounded through `f32`.
    FloatingSingle,
    /// Fixed precision: `make_precise(v) = round(v * scale) / scale`.
    ///
    /// `scale` is the number of grid cells per unit, so larger scales mean
    /// finer grids. It must be positive.
    Fixed {
        /// Grid cells per unit.
        scale: f64,
    },
}

impl PrecisionModel {
    /// A fixed-precision model with the given scale.
    pub fn fixed(scale: f64) -> Self {
        PrecisionModel::Fixed { scale }
    }

    /// The scale factor, or 0 for the floating models.
    pub fn scale(&self) -> f64 {
        match self {
            PrecisionModel::Fixed { scale } => *scale,
            _ => 0.0,
        }
    }

    /// Is this a fixed-precision model?
    pub fn is_fixed(&self) -> bool {
        matches!(self, PrecisionModel::Fixed { .. })
    }

    /// Round a single ordinate onto this model's grid.
    ///
    /// Rounding is half-away-from-zero (`f64::round`), matching the
    /// scaling wrapper, so the two always agree on where grid points are.
    pub fn make_precise(&self, v: f64) -> f64 {
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::FloatingSingle => v as f32 as f64,
            PrecisionModel::Fixed { scale } => (v * scale).round() / scale,
        }
    }

    /// Round the topological ordinates of `c` onto this model's grid.
    ///
    /// `z` is left untouched.
    pub fn round_coord(&self, c: &mut Coord) {
        c.x = self.make_precise(c.x);
        c.y = self.make_precise(c.y);
    }

    /// Does `c` already lie on this model's grid?
    pub fn is_precise(&self, c: &Coord) -> bool {
        self.make_precise(c.x) == c.x && self.make_precise(c.y) == c.y
    }
}
