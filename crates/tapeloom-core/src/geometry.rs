//! Geometric primitives for the automaton diagram.
//!
//! This module provides the [`Point`] type used for node centers, curve
//! anchors and control points, together with the small amount of vector
//! math the curve engine needs.
//!
//! # Coordinate System
//!
//! Tapeloom shares the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward, so "above a node" means a smaller `y`
//!
//! Angles are in radians. A positive rotation turns `+X` towards `+Y`,
//! which appears clockwise on screen.

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// A 2D point, also used as a free vector.
///
/// # Examples
///
/// ```
/// # use tapeloom_core::geometry::Point;
/// let center = Point::new(100.0, 50.0);
/// let offset = Point::new(0.0, -25.0);
///
/// let above = center.add_point(offset);
/// assert_eq!(above.y(), 25.0);
/// assert_eq!(center.distance(above), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The unit vector pointing up the screen.
    pub fn up() -> Self {
        Self::new(0.0, -1.0)
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Length of the point seen as a vector from the origin.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Returns the unit vector with the same direction, or `None` for a
    /// vector too short to carry a direction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tapeloom_core::geometry::Point;
    /// let unit = Point::new(3.0, 4.0).normalized().unwrap();
    /// assert!((unit.x() - 0.6).abs() < 1e-6);
    /// assert!((unit.y() - 0.8).abs() < 1e-6);
    ///
    /// assert!(Point::default().normalized().is_none());
    /// ```
    pub fn normalized(self) -> Option<Self> {
        let length = self.hypot();
        if !length.is_finite() || length < DIRECTION_EPSILON {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Rotates the vector by `angle` radians around the origin.
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Angle of the vector measured from `+X`, in `(-π, π]`.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        self.add_point(other.sub_point(self).scale(t))
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        self.lerp(other, 0.5)
    }

    /// Snaps the point onto a square grid of the given pitch.
    ///
    /// Each axis is floored to a multiple of `pitch`, so every point inside a
    /// cell lands on that cell's top-left corner, negative coordinates
    /// included. A non-positive pitch disables snapping.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tapeloom_core::geometry::Point;
    /// let snapped = Point::new(17.0, -3.0).snap_to_grid(10.0);
    /// assert_eq!(snapped, Point::new(10.0, -10.0));
    /// ```
    pub fn snap_to_grid(self, pitch: f32) -> Self {
        if pitch <= 0.0 {
            return self;
        }
        Self {
            x: (self.x / pitch).floor() * pitch,
            y: (self.y / pitch).floor() * pitch,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}
