//! Shape definitions for the coordinate board.
//!
//! Shapes only hold *relative* coordinates: the untransformed geometry the user
//! entered. The board matrix and axis scales are applied at render time, so the
//! same shape is drawn differently whenever the global state changes.

mod dot;
mod ellipse;
mod polygon;
mod rectangle;
mod vector;

pub use dot::Dot;
pub use ellipse::Ellipse;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use vector::Vector;

use kurbo::Point;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Identifier of a shape, unique among the shapes currently on the board.
pub type ShapeId = String;

/// Shape construction errors.
///
/// These signal a programming error in the caller; a shape that fails
/// construction is never published to the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("Shape id must not be empty")]
    EmptyId,
    #[error("The id \"{0}\" is already in use")]
    DuplicateId(ShapeId),
    #[error("The id \"{0}\" is reserved for the board")]
    ReservedId(ShapeId),
    #[error("Polygon \"{id}\" needs at least 2 points, got {count}")]
    TooFewPoints { id: ShapeId, count: usize },
}

/// Result type for shape construction.
pub type ShapeResult<T> = Result<T, ShapeError>;

pub(crate) fn checked_id(id: impl Into<ShapeId>) -> ShapeResult<ShapeId> {
    let id = id.into();
    if id.is_empty() {
        return Err(ShapeError::EmptyId);
    }
    Ok(id)
}

/// Semantic category of a shape, used for grouping and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    Vector,
    Dot,
    Ellipse,
    Rectangle,
    Polygon,
}

impl ShapeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeClass::Vector => "vector",
            ShapeClass::Dot => "dot",
            ShapeClass::Ellipse => "ellipse",
            ShapeClass::Rectangle => "rectangle",
            ShapeClass::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> &str;

    /// Get the semantic category.
    fn class(&self) -> ShapeClass;

    /// Get the CSS color string handed to the renderer.
    fn color(&self) -> &str;

    /// Get the relative points that define this shape.
    fn points(&self) -> Vec<Point>;
}

/// Closed set of drawable shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Vector(Vector),
    Dot(Dot),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl Shape {
    pub fn id(&self) -> &str {
        match self {
            Shape::Vector(s) => s.id(),
            Shape::Dot(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Rectangle(s) => s.id(),
            Shape::Polygon(s) => s.id(),
        }
    }

    pub fn class(&self) -> ShapeClass {
        match self {
            Shape::Vector(s) => s.class(),
            Shape::Dot(s) => s.class(),
            Shape::Ellipse(s) => s.class(),
            Shape::Rectangle(s) => s.class(),
            Shape::Polygon(s) => s.class(),
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Shape::Vector(s) => s.color(),
            Shape::Dot(s) => s.color(),
            Shape::Ellipse(s) => s.color(),
            Shape::Rectangle(s) => s.color(),
            Shape::Polygon(s) => s.color(),
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match self {
            Shape::Vector(s) => s.points(),
            Shape::Dot(s) => s.points(),
            Shape::Ellipse(s) => s.points(),
            Shape::Rectangle(s) => s.points(),
            Shape::Polygon(s) => s.points(),
        }
    }

    /// One-line description: class, id and color.
    pub fn summary(&self) -> String {
        let geometry = match self {
            Shape::Vector(v) => format!(
                "({}, {}) -> ({}, {})",
                v.start().x,
                v.start().y,
                v.end().x,
                v.end().y
            ),
            Shape::Dot(d) => format!("({}, {})", d.position().x, d.position().y),
            Shape::Ellipse(e) => format!(
                "center ({}, {}) radii {} x {}",
                e.center().x,
                e.center().y,
                e.radius_x(),
                e.radius_y()
            ),
            Shape::Rectangle(r) => format!(
                "at ({}, {}) size {} x {}",
                r.position().x,
                r.position().y,
                r.width(),
                r.height()
            ),
            Shape::Polygon(p) => format!("{} points", p.len()),
        };
        format!("{} {} [{}] {}", self.class(), self.id(), self.color(), geometry)
    }

    /// Check if this shape is drawn through the polygon path.
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Shape::Rectangle(_) | Shape::Polygon(_))
    }
}

impl From<Vector> for Shape {
    fn from(shape: Vector) -> Self {
        Shape::Vector(shape)
    }
}

impl From<Dot> for Shape {
    fn from(shape: Dot) -> Self {
        Shape::Dot(shape)
    }
}

impl From<Ellipse> for Shape {
    fn from(shape: Ellipse) -> Self {
        Shape::Ellipse(shape)
    }
}

impl From<Rectangle> for Shape {
    fn from(shape: Rectangle) -> Self {
        Shape::Rectangle(shape)
    }
}

impl From<Polygon> for Shape {
    fn from(shape: Polygon) -> Self {
        Shape::Polygon(shape)
    }
}
