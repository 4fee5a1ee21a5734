//! Point and point-cloud frame types.
//!
//! [`Point`] is a plain `[x, y, z]` coordinate triple and
//! [`PointCloudImage`] is an ordered sequence of them. Both serialize as
//! bare JSON arrays so that `[[1, 2, 3], [4, 5, 6]]` is a valid image.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single 3D coordinate `(x, y, z)`.
///
/// No unit, range, or precision constraint is attached. On the wire a
/// point is an array of exactly three numbers; any other arity is a
/// decode error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point([f64; 3]);

impl Point {
    /// Creates a point from its three coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    /// X coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.0[0]
    }

    /// Y coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.0[1]
    }

    /// Z coordinate.
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.0[2]
    }

    /// Returns the coordinates as an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        self.0
    }
}

impl From<[f64; 3]> for Point {
    fn from(coords: [f64; 3]) -> Self {
        Self(coords)
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x(), self.y(), self.z())
    }
}

/// One frame of point-cloud data.
///
/// Order is transmission order. An empty image is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointCloudImage(Vec<Point>);

impl PointCloudImage {
    /// Creates an empty image.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of points in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the frame holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points in transmission order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Appends a point at the end of the frame.
    pub fn push(&mut self, point: impl Into<Point>) {
        self.0.push(point.into());
    }

    /// Consumes the image and returns the underlying points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for PointCloudImage {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl<P: Into<Point>> FromIterator<P> for PointCloudImage {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PointCloudImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, point) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{point}")?;
        }
        f.write_str("]")
    }
}
