//! Geometric primitives: coordinates and envelopes.

/// A two-dimensional coordinate, with an optional measure in `z`.
///
/// Only `x` and `y` participate in equality, ordering, and topology; `z` is
/// carried along unchanged so that callers can thread elevations (or any
/// other per-vertex measure) through a noding run.
#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Coord {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
    /// An extra ordinate that never affects topology. NaN when absent.
    pub z: f64,
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Coord {}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        cheap_cmp(self.x, other.x).then_with(|| cheap_cmp(self.y, other.y))
    }
}

impl PartialOrd for Coord {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares two floats, collapsing unordered (NaN) cases to `Equal`.
///
/// All public entry points validate that inputs are finite, so the NaN
/// case never decides anything; collapsing it keeps the comparison cheap.
#[inline(always)]
fn cheap_cmp(a: f64, b: f64) -> std::cmp::Ordering {
    if a < b {
        std::cmp::Ordering::Less
    } else if a > b {
        std::cmp::Ordering::Greater
    } else {
        std::cmp::Ordering::Equal
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Coord {
    /// Create a new coordinate with no `z` ordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Coord { x, y, z: f64::NAN }
    }

    /// Create a new coordinate carrying a `z` ordinate.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Coord { x, y, z }
    }

    /// The Euclidean distance to `other`, ignoring `z`.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Are both topological ordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

/// An axis-aligned bounding rectangle.
///
/// Envelopes are closed on all sides. A degenerate envelope (a point or a
/// horizontal/vertical sliver) is fine; an envelope is never empty.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    /// Smallest `x` coordinate.
    pub min_x: f64,
    /// Smallest `y` coordinate.
    pub min_y: f64,
    /// Largest `x` coordinate.
    pub max_x: f64,
    /// Largest `y` coordinate.
    pub max_y: f64,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:?}..{:?}] x [{:?}..{:?}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

impl Envelope {
    /// The envelope of a single point.
    pub fn of_point(p: &Coord) -> Self {
        Envelope {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// The envelope of the segment from `p` to `q`.
    pub fn of_segment(p: &Coord, q: &Coord) -> Self {
        Envelope {
            min_x: p.x.min(q.x),
            min_y: p.y.min(q.y),
            max_x: p.x.max(q.x),
            max_y: p.y.max(q.y),
        }
    }

    /// The envelope of a non-empty slice of points.
    ///
    /// Returns `None` for an empty slice.
    pub fn of_points(pts: &[Coord]) -> Option<Self> {
        let (first, rest) = pts.split_first()?;
        let mut env = Envelope::of_point(first);
        for p in rest {
            env.expand_to_include(p);
        }
        Some(env)
    }

    /// Grow this envelope (if necessary) to cover `p`.
    pub fn expand_to_include(&mut self, p: &Coord) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grow this envelope (if necessary) to cover all of `other`.
    pub fn expand_to_include_env(&mut self, other: &Envelope) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow this envelope by `d` on every side.
    pub fn expand_by(&mut self, d: f64) {
        self.min_x -= d;
        self.min_y -= d;
        self.max_x += d;
        self.max_y += d;
    }

    /// Do the two (closed) envelopes share at least one point?
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Does this (closed) envelope contain `p`?
    pub fn contains_point(&self, p: &Coord) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// The centre of the `x` extent.
    pub fn centre_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    /// The centre of the `y` extent.
    pub fn centre_y(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    /// The `x` extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// The `y` extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
