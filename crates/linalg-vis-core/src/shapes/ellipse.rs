//! Ellipse shape.

use super::{ShapeClass, ShapeId, ShapeResult, ShapeTrait, checked_id};
use kurbo::{Ellipse as KurboEllipse, Point};
use serde::Serialize;

/// An axis-aligned ellipse in relative coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ellipse {
    id: ShapeId,
    color: String,
    center: Point,
    radius_x: f64,
    radius_y: f64,
}

impl Ellipse {
    /// Create a new ellipse centered at `(cx, cy)` with radii `rx`, `ry`.
    pub fn new(
        id: impl Into<ShapeId>,
        color: impl Into<String>,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    ) -> ShapeResult<Self> {
        Ok(Self {
            id: checked_id(id)?,
            color: color.into(),
            center: Point::new(cx, cy),
            radius_x: rx.abs(),
            radius_y: ry.abs(),
        })
    }

    /// Create a circle.
    pub fn circle(id: impl Into<ShapeId>, color: impl Into<String>, center: Point, radius: f64) -> ShapeResult<Self> {
        Self::new(id, color, center.x, center.y, radius, radius)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Horizontal radius.
    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    /// Vertical radius.
    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> &str {
        &self.id
    }

    fn class(&self) -> ShapeClass {
        ShapeClass::Ellipse
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn points(&self) -> Vec<Point> {
        vec![self.center]
    }
}
