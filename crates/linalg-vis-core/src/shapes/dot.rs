//! Dot shape.

use super::{ShapeClass, ShapeId, ShapeResult, ShapeTrait, checked_id};
use kurbo::Point;
use serde::Serialize;

/// A single point, drawn as a small filled marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dot {
    id: ShapeId,
    color: String,
    position: Point,
}

impl Dot {
    /// Create a new dot at `(x, y)`.
    pub fn new(id: impl Into<ShapeId>, color: impl Into<String>, x: f64, y: f64) -> ShapeResult<Self> {
        Ok(Self {
            id: checked_id(id)?,
            color: color.into(),
            position: Point::new(x, y),
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl ShapeTrait for Dot {
    fn id(&self) -> &str {
        &self.id
    }

    fn class(&self) -> ShapeClass {
        ShapeClass::Dot
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn points(&self) -> Vec<Point> {
        vec![self.position]
    }
}
