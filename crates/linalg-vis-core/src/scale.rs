//! Axis scale mapper: real-valued board coordinates to pixels.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis scale errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("Axis range must be a positive finite number, got {0}")]
    InvalidRange(f64),
    #[error("Viewport extent {extent} leaves no room inside margin {margin}")]
    ViewportTooSmall { extent: f64, margin: f64 },
    #[error("Axis range {range} exceeds the maximum range {max_range}")]
    RangeTooLarge { range: f64, max_range: f64 },
}

/// Upper bound on grid lines per axis.
pub const MAX_GRID_TICKS: usize = 201;

/// Check a zoom range against the largest range the board offers.
pub fn check_range(range: f64, max_range: f64) -> Result<f64, ScaleError> {
    if !(range.is_finite() && range > 0.0) {
        return Err(ScaleError::InvalidRange(range));
    }
    if range > max_range {
        return Err(ScaleError::RangeTooLarge { range, max_range });
    }
    Ok(range)
}

/// Direction of an axis on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Domain increases to the right, like pixel x.
    Horizontal,
    /// Domain increases upward while pixel y increases downward.
    Vertical,
}

/// Linear mapping from the symmetric domain `[-range, range]` to a pixel
/// interval inside the viewport margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    range: f64,
    /// Pixel position of `-range`.
    start: f64,
    /// Pixel position of `range`.
    end: f64,
    orientation: Orientation,
}

impl AxisScale {
    /// Create a scale over pixel bounds `[lo, hi]` shrunk by `margin` on
    /// both sides.
    pub fn new(range: f64, lo: f64, hi: f64, margin: f64, orientation: Orientation) -> Result<Self, ScaleError> {
        if !(range.is_finite() && range > 0.0) {
            return Err(ScaleError::InvalidRange(range));
        }
        let extent = hi - lo;
        if !(extent.is_finite() && margin.is_finite()) || margin < 0.0 || 2.0 * margin >= extent {
            return Err(ScaleError::ViewportTooSmall { extent, margin });
        }
        let (start, end) = match orientation {
            Orientation::Horizontal => (lo + margin, hi - margin),
            Orientation::Vertical => (hi - margin, lo + margin),
        };
        Ok(Self {
            range,
            start,
            end,
            orientation,
        })
    }

    /// X scale across a viewport of the given width.
    pub fn horizontal(range: f64, width: f64, margin: f64) -> Result<Self, ScaleError> {
        Self::new(range, 0.0, width, margin, Orientation::Horizontal)
    }

    /// Y scale across a viewport of the given height (inverted).
    pub fn vertical(range: f64, height: f64, margin: f64) -> Result<Self, ScaleError> {
        Self::new(range, 0.0, height, margin, Orientation::Vertical)
    }

    /// Map a domain value to a pixel coordinate.
    pub fn map(&self, value: f64) -> f64 {
        self.start + (value + self.range) / (2.0 * self.range) * (self.end - self.start)
    }

    /// Map a pixel coordinate back to the domain.
    pub fn invert(&self, pixel: f64) -> f64 {
        (pixel - self.start) / (self.end - self.start) * (2.0 * self.range) - self.range
    }

    /// Domain half-width.
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Pixel positions of `-range` and `range`.
    pub fn pixel_bounds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Pixel position of the domain origin.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Pixel length of one domain unit.
    pub fn pixels_per_unit(&self) -> f64 {
        (self.end - self.start).abs() / (2.0 * self.range)
    }

    /// Grid positions: every even integer in `[-range, range]`. Wide ranges
    /// double the spacing until at most [`MAX_GRID_TICKS`] positions remain.
    pub fn grid_ticks(&self) -> Vec<f64> {
        let mut step = 2.0;
        while 2.0 * (self.range / step).floor() + 1.0 > MAX_GRID_TICKS as f64 {
            step *= 2.0;
        }
        let half = (self.range / step).floor() as usize;
        let first = -(half as f64) * step;
        (0..=2 * half).map(|k| first + k as f64 * step).collect()
    }

    /// Dash pattern length for grid lines; grows as the view zooms in.
    pub fn dash_density(&self, max_range: f64) -> f64 {
        max_range / self.range
    }
}

/// Viewport dimensions in pixels, plus the margin kept free on each side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self { width, height, margin }
    }

    /// Build the x and y scales for a symmetric range.
    pub fn scales(&self, range: f64) -> Result<(AxisScale, AxisScale), ScaleError> {
        Ok((
            AxisScale::horizontal(range, self.width, self.margin)?,
            AxisScale::vertical(range, self.height, self.margin)?,
        ))
    }
}

/// Map a transformed board point to pixel space.
pub fn to_pixel(point: Point, x_scale: &AxisScale, y_scale: &AxisScale) -> Point {
    Point::new(x_scale.map(point.x), y_scale.map(point.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_viewport() {
        let x = AxisScale::horizontal(15.0, 400.0, 20.0).unwrap();
        assert!((x.map(0.0) - 200.0).abs() < 1e-9);
        assert!((x.map(15.0) - 380.0).abs() < 1e-9);
        assert!((x.map(-15.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_is_inverted() {
        let y = AxisScale::vertical(15.0, 400.0, 20.0).unwrap();
        assert!((y.map(15.0) - 20.0).abs() < 1e-9);
        assert!((y.map(-15.0) - 380.0).abs() < 1e-9);
        assert!((y.map(0.0) - y.midpoint()).abs() < 1e-9);
        assert!(y.map(1.0) < y.map(0.0));
    }

    #[test]
    fn test_linear_between_endpoints() {
        let x = AxisScale::new(10.0, 100.0, 600.0, 50.0, Orientation::Horizontal).unwrap();
        assert!((x.map(-10.0) - 150.0).abs() < 1e-9);
        assert!((x.map(10.0) - 550.0).abs() < 1e-9);
        assert!((x.map(0.0) - 350.0).abs() < 1e-9);
        assert!((x.map(5.0) - 450.0).abs() < 1e-9);
        assert!((x.pixels_per_unit() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_invert_roundtrip() {
        let y = AxisScale::vertical(7.5, 300.0, 10.0).unwrap();
        for value in [-7.5, -1.0, 0.0, 3.25, 7.5] {
            assert!((y.invert(y.map(value)) - value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            AxisScale::horizontal(0.0, 400.0, 20.0),
            Err(ScaleError::InvalidRange(0.0))
        );
        assert!(AxisScale::horizontal(-1.0, 400.0, 20.0).is_err());
        assert!(AxisScale::horizontal(f64::NAN, 400.0, 20.0).is_err());
        assert_eq!(
            AxisScale::horizontal(5.0, 40.0, 20.0),
            Err(ScaleError::ViewportTooSmall {
                extent: 40.0,
                margin: 20.0
            })
        );
    }

    #[test]
    fn test_grid_ticks_even_integers() {
        let x = AxisScale::horizontal(15.0, 400.0, 20.0).unwrap();
        let ticks = x.grid_ticks();
        assert_eq!(ticks.first(), Some(&-14.0));
        assert_eq!(ticks.last(), Some(&14.0));
        assert_eq!(ticks.len(), 15);
        assert!(ticks.contains(&0.0));

        let x = AxisScale::horizontal(4.0, 400.0, 20.0).unwrap();
        assert_eq!(x.grid_ticks(), vec![-4.0, -2.0, 0.0, 2.0, 4.0]);

        let x = AxisScale::horizontal(0.5, 400.0, 20.0).unwrap();
        assert_eq!(x.grid_ticks(), vec![0.0]);
    }

    #[test]
    fn test_grid_ticks_bounded_for_wide_range() {
        let x = AxisScale::horizontal(1e12, 400.0, 20.0).unwrap();
        let ticks = x.grid_ticks();
        assert!(ticks.len() <= MAX_GRID_TICKS);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|t| t.abs() <= 1e12));

        let x = AxisScale::horizontal(200.0, 400.0, 20.0).unwrap();
        assert_eq!(x.grid_ticks().len(), MAX_GRID_TICKS);
        let x = AxisScale::horizontal(202.0, 400.0, 20.0).unwrap();
        assert_eq!(x.grid_ticks().len(), 101);
    }

    #[test]
    fn test_check_range() {
        assert_eq!(check_range(30.0, 30.0), Ok(30.0));
        assert_eq!(
            check_range(31.0, 30.0),
            Err(ScaleError::RangeTooLarge {
                range: 31.0,
                max_range: 30.0
            })
        );
        assert_eq!(check_range(0.0, 30.0), Err(ScaleError::InvalidRange(0.0)));
    }

    #[test]
    fn test_dash_density_coarsens_with_range() {
        let near = AxisScale::horizontal(5.0, 400.0, 20.0).unwrap();
        let far = AxisScale::horizontal(30.0, 400.0, 20.0).unwrap();
        assert!((near.dash_density(30.0) - 6.0).abs() < 1e-9);
        assert!((far.dash_density(30.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_scales() {
        let (x, y) = Viewport::new(400.0, 300.0, 20.0).scales(15.0).unwrap();
        let origin = to_pixel(Point::ORIGIN, &x, &y);
        assert!((origin.x - 200.0).abs() < 1e-9);
        assert!((origin.y - 150.0).abs() < 1e-9);
        assert_eq!(y.orientation(), Orientation::Vertical);
    }
}
