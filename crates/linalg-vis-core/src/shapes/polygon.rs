//! Polygon shape.

use super::{ShapeClass, ShapeError, ShapeId, ShapeResult, ShapeTrait, checked_id};
use kurbo::{BezPath, Point};
use serde::Serialize;

/// Minimum number of points a polygon accepts.
pub const MIN_POLYGON_POINTS: usize = 2;

/// A filled polygon through an ordered list of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    id: ShapeId,
    color: String,
    points: Vec<Point>,
}

impl Polygon {
    /// Create a new polygon. Fails with fewer than two points.
    pub fn new(id: impl Into<ShapeId>, color: impl Into<String>, points: Vec<Point>) -> ShapeResult<Self> {
        let id = checked_id(id)?;
        if points.len() < MIN_POLYGON_POINTS {
            return Err(ShapeError::TooFewPoints {
                id,
                count: points.len(),
            });
        }
        Ok(Self {
            id,
            color: color.into(),
            points,
        })
    }

    /// Create a polygon from `(x, y)` pairs.
    pub fn from_coords(id: impl Into<ShapeId>, color: impl Into<String>, coords: &[(f64, f64)]) -> ShapeResult<Self> {
        let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Self::new(id, color, points)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed outline path through the vertices.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }
}

impl ShapeTrait for Polygon {
    fn id(&self) -> &str {
        &self.id
    }

    fn class(&self) -> ShapeClass {
        ShapeClass::Polygon
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_creation() {
        let poly = Polygon::from_coords("p", "orange", &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.vertices()[1], Point::new(1.0, 0.0));
    }

    #[test]
    fn test_two_points_accepted() {
        assert!(Polygon::from_coords("p", "orange", &[(0.0, 0.0), (1.0, 1.0)]).is_ok());
    }

    #[test]
    fn test_too_few_points() {
        let err = Polygon::from_coords("p", "orange", &[(0.0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::TooFewPoints {
                id: "p".to_string(),
                count: 1
            }
        );
        assert!(Polygon::new("q", "orange", Vec::new()).is_err());
    }

    #[test]
    fn test_path_is_closed() {
        let poly = Polygon::from_coords("p", "orange", &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]).unwrap();
        let path = poly.to_path();
        assert_eq!(path.elements().len(), 4);
        assert!(matches!(path.elements().last(), Some(kurbo::PathEl::ClosePath)));
    }
}
