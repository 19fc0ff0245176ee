//! Linear transform engine: applies the board matrix to relative shape
//! coordinates without touching the shapes themselves.

use crate::matrix::Matrix2;
use crate::shapes::Shape;
use kurbo::Point;

/// Apply `matrix` to `point` (column-vector convention).
pub fn apply_transform(matrix: &Matrix2, point: Point) -> Point {
    matrix.apply(point)
}

/// Uniform factor applied to ellipse radii.
///
/// This is `|det(M)|`, not a true affine ellipse transform: under shearing or
/// non-uniform matrices an ellipse keeps its axis-aligned orientation.
pub fn radius_scale(matrix: &Matrix2) -> f64 {
    matrix.determinant().abs()
}

/// Shape geometry after the matrix has been applied, before axis scaling.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Vector: line from `start` to `end`, marker on `end`.
    Segment { start: Point, end: Point },
    /// Dot marker.
    Marker { center: Point },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Polygon { points: Vec<Point> },
}

impl Geometry {
    /// Check that every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Geometry::Segment { start, end } => finite(start) && finite(end),
            Geometry::Marker { center } => finite(center),
            Geometry::Ellipse {
                center,
                radius_x,
                radius_y,
            } => finite(center) && radius_x.is_finite() && radius_y.is_finite(),
            Geometry::Polygon { points } => points.iter().all(finite),
        }
    }
}

/// Compute the transformed geometry of a shape.
pub fn transform_shape(shape: &Shape, matrix: &Matrix2) -> Geometry {
    match shape {
        Shape::Vector(v) => Geometry::Segment {
            start: apply_transform(matrix, v.start()),
            end: apply_transform(matrix, v.end()),
        },
        Shape::Dot(d) => Geometry::Marker {
            center: apply_transform(matrix, d.position()),
        },
        Shape::Ellipse(e) => {
            let scale = radius_scale(matrix);
            Geometry::Ellipse {
                center: apply_transform(matrix, e.center()),
                radius_x: e.radius_x() * scale,
                radius_y: e.radius_y() * scale,
            }
        }
        Shape::Rectangle(r) => transform_polygon(r.corners(), matrix),
        Shape::Polygon(p) => transform_polygon(p.vertices(), matrix),
    }
}

fn transform_polygon(points: &[Point], matrix: &Matrix2) -> Geometry {
    Geometry::Polygon {
        points: points.iter().map(|&p| apply_transform(matrix, p)).collect(),
    }
}
