//! Vector shape.

use super::{ShapeClass, ShapeId, ShapeResult, ShapeTrait, checked_id};
use kurbo::{Point, Vec2};
use serde::Serialize;

/// A vector from a tail point to a head point.
///
/// Rendered as a line with a marker on the head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vector {
    id: ShapeId,
    color: String,
    start: Point,
    end: Point,
}

impl Vector {
    /// Create a new vector from `(x1, y1)` to `(x2, y2)`.
    pub fn new(
        id: impl Into<ShapeId>,
        color: impl Into<String>,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> ShapeResult<Self> {
        Self::from_points(id, color, Point::new(x1, y1), Point::new(x2, y2))
    }

    /// Create a new vector between two points.
    pub fn from_points(
        id: impl Into<ShapeId>,
        color: impl Into<String>,
        start: Point,
        end: Point,
    ) -> ShapeResult<Self> {
        Ok(Self {
            id: checked_id(id)?,
            color: color.into(),
            start,
            end,
        })
    }

    /// Create a vector anchored at the origin.
    pub fn from_origin(id: impl Into<ShapeId>, color: impl Into<String>, head: Vec2) -> ShapeResult<Self> {
        Self::from_points(id, color, Point::ORIGIN, head.to_point())
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Displacement from tail to head.
    pub fn components(&self) -> Vec2 {
        self.end - self.start
    }
}

impl ShapeTrait for Vector {
    fn id(&self) -> &str {
        &self.id
    }

    fn class(&self) -> ShapeClass {
        ShapeClass::Vector
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }
}
