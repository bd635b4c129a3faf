//! Geometric primitives for page-space analysis.
//!
//! This module provides the geometric types shared by every pipeline stage
//! for positioning regions, nodes and paragraphs on a scanned page.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate, used for centres and distances
//! - [`Bounds`] - An axis-aligned pixel bounding box `[x1, y1, x2, y2]`
//!
//! # Coordinate System
//!
//! Bounds live in image pixel space, the same space the image decoder and
//! the OCR adapter report in:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the image at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Every [`Bounds`] satisfies `x1 <= x2` and `y1 <= y2`. Combining two
//! bounds always takes their union, never their intersection.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when raw coordinates do not describe a valid box.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("inverted bounding box [{0}, {1}, {2}, {3}]: expected x1 <= x2 and y1 <= y2")]
    Inverted(i32, i32, i32, i32),
}

/// A 2D point in page coordinate space.
///
/// Points carry `f32` coordinates because centres of integer boxes land on
/// half pixels.
///
/// # Examples
///
/// ```
/// # use inkgraph_core::geometry::Point;
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
///
/// assert_eq!(a.distance(b), 5.0);
/// assert_eq!(b.sub_point(a).x(), 3.0);
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

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Subtracts another point from this point, returning the delta vector
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// An axis-aligned bounding box in image pixel space.
///
/// Serialized as the four-element array `[x1, y1, x2, y2]`, which is the
/// shape every persisted artifact and the OCR adapter use. Deserialization
/// rejects inverted boxes.
///
/// # Examples
///
/// ```
/// # use inkgraph_core::geometry::Bounds;
/// let header = Bounds::new(0, 0, 100, 30);
/// let body = Bounds::new(10, 40, 130, 120);
///
/// let page = header.merge(&body);
/// assert_eq!(page.to_array(), [0, 0, 130, 120]);
/// assert_eq!(page.width(), 130);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct Bounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Bounds {
    /// Creates bounds from two corners.
    ///
    /// Coordinates are reordered when necessary so the result always has
    /// `min <= max` on both axes.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Creates bounds from a top-left corner and a size, the layout
    /// returned by a contour's bounding rectangle.
    pub fn from_top_left(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> i32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> i32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> i32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> i32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> i32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> i32 {
        self.max_y - self.min_y
    }

    /// Returns the covered area in square pixels
    pub fn area(self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        )
    }

    /// Returns the `[x1, y1, x2, y2]` array form
    pub fn to_array(self) -> [i32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkgraph_core::geometry::Bounds;
    /// let a = Bounds::new(0, 0, 60, 20);
    /// let b = Bounds::new(62, 0, 130, 20);
    /// assert_eq!(a.merge(&b), Bounds::new(0, 0, 130, 20));
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns a copy grown by `margin` pixels on every side
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns the length of the horizontal overlap, or 0 when the
    /// projections onto the x-axis are disjoint
    pub fn horizontal_overlap(&self, other: &Self) -> i32 {
        (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0)
    }

    /// Returns the length of the vertical overlap, or 0 when disjoint
    pub fn vertical_overlap(&self, other: &Self) -> i32 {
        (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0)
    }

    /// Checks whether `other` intersects this box grown by `threshold`.
    ///
    /// The overlap must be strictly positive on both axes, so boxes that
    /// merely touch along an edge do not count at `threshold == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkgraph_core::geometry::Bounds;
    /// let a = Bounds::new(0, 0, 10, 10);
    /// let b = Bounds::new(35, 0, 45, 10);
    /// assert!(!a.is_near(&b, 0));
    /// assert!(a.is_near(&b, 30));
    /// ```
    pub fn is_near(&self, other: &Self, threshold: i32) -> bool {
        let grown = self.expand(threshold);
        grown.horizontal_overlap(other) > 0 && grown.vertical_overlap(other) > 0
    }

    /// Checks whether a point lies strictly inside the bounds (edges excluded)
    pub fn contains_strict(&self, point: Point) -> bool {
        (self.min_x as f32) < point.x()
            && point.x() < (self.max_x as f32)
            && (self.min_y as f32) < point.y()
            && point.y() < (self.max_y as f32)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl TryFrom<[i32; 4]> for Bounds {
    type Error = GeometryError;

    fn try_from([x1, y1, x2, y2]: [i32; 4]) -> Result<Self, Self::Error> {
        if x1 > x2 || y1 > y2 {
            return Err(GeometryError::Inverted(x1, y1, x2, y2));
        }
        Ok(Self {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        })
    }
}

impl From<Bounds> for [i32; 4] {
    fn from(bounds: Bounds) -> Self {
        bounds.to_array()
    }
}

/// Folds an iterator of bounds into their union, or `None` when empty.
pub fn union_all(bounds: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
    bounds.into_iter().reduce(|acc, b| acc.merge(&b))
}
