//! Drawing surface abstraction.
//!
//! The reconciler only needs to create named groups, draw primitives into
//! them at absolute pixel coordinates, and remove groups by id.

use kurbo::Point;
use serde::Serialize;
use thiserror::Error;

/// Drawing surface errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("A group with id \"{0}\" is already drawn")]
    DuplicateGroup(String),
    #[error("No group with id \"{0}\"")]
    UnknownGroup(String),
    #[error("Draw failed: {0}")]
    DrawFailed(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Stroke and fill for a primitive. Colors are CSS color strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub fill: Option<String>,
    /// Dash length in pixels; `None` for a solid stroke.
    pub dash: Option<f64>,
}

impl Style {
    /// A filled primitive without outline.
    pub fn filled(color: &str) -> Self {
        Self {
            stroke: None,
            stroke_width: 0.0,
            fill: Some(color.to_string()),
            dash: None,
        }
    }

    /// A stroked primitive without fill.
    pub fn stroked(color: &str, width: f64) -> Self {
        Self {
            stroke: Some(color.to_string()),
            stroke_width: width,
            fill: None,
            dash: None,
        }
    }

    pub fn with_fill(mut self, color: &str) -> Self {
        self.fill = Some(color.to_string());
        self
    }

    pub fn with_dash(mut self, dash: f64) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// Handle to a drawn group, identified by the id it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupHandle {
    id: String,
    class: String,
}

impl GroupHandle {
    pub fn new(class: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            class: class.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class(&self) -> &str {
        &self.class
    }
}

/// Capability surface of a drawing library.
///
/// Implementations can retain primitives for export (SVG, Vello scenes) or
/// forward them to an immediate-mode backend.
pub trait DrawingSurface {
    /// Create an empty group. Ids must be unique among drawn groups.
    fn draw_group(&mut self, class: &str, id: &str) -> SurfaceResult<GroupHandle>;

    fn draw_line(&mut self, group: &GroupHandle, from: Point, to: Point, style: &Style) -> SurfaceResult<()>;

    fn draw_circle(&mut self, group: &GroupHandle, center: Point, radius: f64, style: &Style) -> SurfaceResult<()>;

    fn draw_ellipse(
        &mut self,
        group: &GroupHandle,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        style: &Style,
    ) -> SurfaceResult<()>;

    fn draw_polygon(&mut self, group: &GroupHandle, points: &[Point], style: &Style) -> SurfaceResult<()>;

    fn draw_text(&mut self, group: &GroupHandle, at: Point, text: &str, style: &Style) -> SurfaceResult<()>;

    /// Remove a group and everything drawn into it. Returns false if no such
    /// group exists, which is not an error.
    fn remove_by_id(&mut self, id: &str) -> bool;
}
