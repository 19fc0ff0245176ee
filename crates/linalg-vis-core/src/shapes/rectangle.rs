//! Rectangle shape.

use super::{Polygon, ShapeClass, ShapeId, ShapeResult, ShapeTrait};
use kurbo::{Point, Rect};
use serde::Serialize;

/// A rectangle, stored as the four-corner polygon derived from its
/// position and size.
///
/// Corners run `(x, y)`, `(x, y + h)`, `(x + w, y + h)`, `(x + w, y)`, so
/// the outline never crosses itself. Note this is not the raw
/// `(x, y)`, `(x, y + h)`, `(x + w, y)`, `(x + w, y + h)` listing, which
/// would draw a bowtie.
///
/// Rectangles share the polygon render path, so under a shearing matrix
/// they become parallelograms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rectangle {
    outline: Polygon,
    position: Point,
    width: f64,
    height: f64,
}

impl Rectangle {
    /// Create a new rectangle with a corner at `(x, y)`.
    pub fn new(
        id: impl Into<ShapeId>,
        color: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> ShapeResult<Self> {
        let corners = vec![
            Point::new(x, y),
            Point::new(x, y + height),
            Point::new(x + width, y + height),
            Point::new(x + width, y),
        ];
        Ok(Self {
            outline: Polygon::new(id, color, corners)?,
            position: Point::new(x, y),
            width,
            height,
        })
    }

    /// Create a rectangle covering a kurbo Rect.
    pub fn from_rect(id: impl Into<ShapeId>, color: impl Into<String>, rect: Rect) -> ShapeResult<Self> {
        Self::new(id, color, rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The derived corner polygon.
    pub fn as_polygon(&self) -> &Polygon {
        &self.outline
    }

    pub fn corners(&self) -> &[Point] {
        self.outline.vertices()
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> &str {
        self.outline.id()
    }

    fn class(&self) -> ShapeClass {
        ShapeClass::Rectangle
    }

    fn color(&self) -> &str {
        self.outline.color()
    }

    fn points(&self) -> Vec<Point> {
        self.outline.points()
    }
}
