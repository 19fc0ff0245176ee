//! Scene renderer and reconciler.
//!
//! Every pass removes all previously drawn shape groups and redraws the
//! current collection from scratch. The axis group is rebuilt only when the
//! scales change.

use crate::surface::{DrawingSurface, GroupHandle, Style, SurfaceError};
use kurbo::Point;
use linalg_vis_core::config::BoardConfig;
use linalg_vis_core::scale::to_pixel;
use linalg_vis_core::{AxisScale, Geometry, Matrix2, Shape, ShapeId, transform_shape};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub use linalg_vis_core::store::AXIS_GROUP_ID;
const AXIS_GROUP_CLASS: &str = "axis";

/// Marker radius for dots and vector heads, in pixels.
const MARKER_RADIUS: f64 = 3.0;
const VECTOR_STROKE_WIDTH: f64 = 2.0;
const GRID_STROKE_WIDTH: f64 = 0.5;
const AXIS_STROKE_WIDTH: f64 = 1.0;
const ORIGIN_RADIUS: f64 = 2.0;
/// Offset of tick labels from the axis line.
const LABEL_OFFSET: f64 = 12.0;

/// Errors that abort drawing a single shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Shape id \"{0}\" appears more than once in the collection")]
    DuplicateId(ShapeId),
    #[error("Shape id \"{0}\" is reserved for the axis group")]
    ReservedId(ShapeId),
    #[error("Shape \"{0}\" has non-finite pixel coordinates")]
    NonFinite(ShapeId),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render state of a shape id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    NotRendered,
    Rendered,
}

/// Colors and limits for the axis grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub grid_color: String,
    pub axis_color: String,
    pub max_range: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::from(&BoardConfig::default())
    }
}

impl From<&BoardConfig> for SceneStyle {
    fn from(config: &BoardConfig) -> Self {
        Self {
            grid_color: config.grid_color.clone(),
            axis_color: config.axis_color.clone(),
            max_range: config.max_range,
        }
    }
}

/// Inputs for one reconciliation pass, borrowed from the store.
#[derive(Debug, Clone, Copy)]
pub struct SceneInputs<'a> {
    pub matrix: &'a Matrix2,
    pub shapes: &'a [Shape],
    pub x_scale: &'a AxisScale,
    pub y_scale: &'a AxisScale,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Shapes drawn in this pass.
    pub drawn: usize,
    /// Shapes skipped, with the reason.
    pub skipped: Vec<(ShapeId, RenderError)>,
    /// Whether the axis group was rebuilt.
    pub axes_redrawn: bool,
}

/// Draws the board onto a [`DrawingSurface`], keeping an explicit id to
/// group-handle map of what is currently on the surface.
pub struct SceneRenderer<S: DrawingSurface> {
    surface: S,
    style: SceneStyle,
    rendered: HashMap<ShapeId, GroupHandle>,
    draw_order: Vec<ShapeId>,
    axis_scales: Option<(AxisScale, AxisScale)>,
    passes: u64,
}

impl<S: DrawingSurface> SceneRenderer<S> {
    pub fn new(surface: S, style: SceneStyle) -> Self {
        Self {
            surface,
            style,
            rendered: HashMap::new(),
            draw_order: Vec::new(),
            axis_scales: None,
            passes: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Number of reconciliation passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    pub fn state(&self, id: &str) -> RenderState {
        if self.rendered.contains_key(id) {
            RenderState::Rendered
        } else {
            RenderState::NotRendered
        }
    }

    /// Ids currently drawn, in draw order.
    pub fn rendered_ids(&self) -> &[ShapeId] {
        &self.draw_order
    }

    /// Full pass: erase every drawn shape, then draw the given collection.
    pub fn reconcile(&mut self, inputs: &SceneInputs<'_>) -> PassReport {
        self.passes += 1;
        let mut report = PassReport::default();

        if self.axis_scales != Some((*inputs.x_scale, *inputs.y_scale)) {
            match self.draw_axes(inputs.x_scale, inputs.y_scale) {
                Ok(()) => report.axes_redrawn = true,
                Err(e) => log::warn!("Failed to draw axes: {e}"),
            }
        }

        for id in std::mem::take(&mut self.draw_order) {
            self.rendered.remove(&id);
            self.surface.remove_by_id(&id);
        }

        let mut seen = HashSet::new();
        for shape in inputs.shapes {
            let id = shape.id();
            if id == AXIS_GROUP_ID {
                log::warn!("Skipping shape \"{id}\": reserved id");
                report.skipped.push((id.to_string(), RenderError::ReservedId(id.to_string())));
                continue;
            }
            if !seen.insert(id) {
                log::warn!("Skipping shape \"{id}\": id already drawn in this pass");
                report.skipped.push((id.to_string(), RenderError::DuplicateId(id.to_string())));
                continue;
            }
            match self.draw_shape(shape, inputs) {
                Ok(handle) => {
                    self.rendered.insert(id.to_string(), handle);
                    self.draw_order.push(id.to_string());
                    report.drawn += 1;
                }
                Err(e) => {
                    log::warn!("Skipping shape \"{id}\": {e}");
                    report.skipped.push((id.to_string(), e));
                }
            }
        }

        log::debug!(
            "Reconciliation pass {}: {} drawn, {} skipped",
            self.passes,
            report.drawn,
            report.skipped.len()
        );
        report
    }

    /// Erase one shape's primitives right away. Ids this renderer did not
    /// draw, including the axis group, are left alone.
    pub fn erase(&mut self, id: &str) -> bool {
        if self.rendered.remove(id).is_none() {
            return false;
        }
        self.draw_order.retain(|drawn| drawn != id);
        self.surface.remove_by_id(id);
        true
    }

    fn draw_shape(&mut self, shape: &Shape, inputs: &SceneInputs<'_>) -> RenderResult<GroupHandle> {
        let geometry = transform_shape(shape, inputs.matrix);
        let pixels = to_pixel_geometry(&geometry, inputs.x_scale, inputs.y_scale);
        if !pixels.is_finite() {
            return Err(RenderError::NonFinite(shape.id().to_string()));
        }

        let group = self.surface.draw_group(shape.class().as_str(), shape.id())?;
        if let Err(e) = self.draw_geometry(&group, &pixels, shape.color()) {
            // Leave nothing half-drawn behind.
            self.surface.remove_by_id(shape.id());
            return Err(e.into());
        }
        Ok(group)
    }

    /// Draw geometry that is already in pixel space.
    fn draw_geometry(&mut self, group: &GroupHandle, pixels: &Geometry, color: &str) -> Result<(), SurfaceError> {
        match pixels {
            Geometry::Segment { start, end } => {
                self.surface
                    .draw_line(group, *start, *end, &Style::stroked(color, VECTOR_STROKE_WIDTH))?;
                self.surface.draw_circle(
                    group,
                    *end,
                    MARKER_RADIUS,
                    &Style::stroked(color, 1.0).with_fill(color),
                )
            }
            Geometry::Marker { center } => {
                self.surface
                    .draw_circle(group, *center, MARKER_RADIUS, &Style::filled(color))
            }
            Geometry::Ellipse {
                center,
                radius_x,
                radius_y,
            } => self
                .surface
                .draw_ellipse(group, *center, *radius_x, *radius_y, &Style::filled(color)),
            Geometry::Polygon { points } => self.surface.draw_polygon(group, points, &Style::filled(color)),
        }
    }

    /// Rebuild the grid, axis lines, tick labels and origin marker.
    pub fn draw_axes(&mut self, x: &AxisScale, y: &AxisScale) -> Result<(), SurfaceError> {
        self.surface.remove_by_id(AXIS_GROUP_ID);
        self.axis_scales = None;

        let group = self.surface.draw_group(AXIS_GROUP_CLASS, AXIS_GROUP_ID)?;
        let (left, right) = x.pixel_bounds();
        let (bottom, top) = y.pixel_bounds();
        let origin = Point::new(x.map(0.0), y.map(0.0));

        let grid = Style::stroked(&self.style.grid_color, GRID_STROKE_WIDTH)
            .with_dash(x.dash_density(self.style.max_range));
        let axis = Style::stroked(&self.style.axis_color, AXIS_STROKE_WIDTH);
        let label = Style::filled(&self.style.axis_color);

        for tick in x.grid_ticks() {
            let px = x.map(tick);
            self.surface
                .draw_line(&group, Point::new(px, top), Point::new(px, bottom), &grid)?;
            // The origin gets a single shared label below.
            if tick != 0.0 {
                self.surface.draw_text(
                    &group,
                    Point::new(px, origin.y + LABEL_OFFSET),
                    &format_tick(tick),
                    &label,
                )?;
            }
        }
        for tick in y.grid_ticks() {
            let py = y.map(tick);
            self.surface
                .draw_line(&group, Point::new(left, py), Point::new(right, py), &grid)?;
            if tick != 0.0 {
                self.surface.draw_text(
                    &group,
                    Point::new(origin.x - LABEL_OFFSET, py),
                    &format_tick(tick),
                    &label,
                )?;
            }
        }

        self.surface
            .draw_line(&group, Point::new(left, origin.y), Point::new(right, origin.y), &axis)?;
        self.surface
            .draw_line(&group, Point::new(origin.x, top), Point::new(origin.x, bottom), &axis)?;
        self.surface
            .draw_circle(&group, origin, ORIGIN_RADIUS, &Style::filled(&self.style.axis_color))?;
        self.surface.draw_text(
            &group,
            Point::new(origin.x - LABEL_OFFSET, origin.y + LABEL_OFFSET),
            "0",
            &label,
        )?;

        self.axis_scales = Some((*x, *y));
        Ok(())
    }
}

/// Map transformed geometry to pixels. Ellipse radii go from domain units
/// to pixels per axis.
fn to_pixel_geometry(geometry: &Geometry, x: &AxisScale, y: &AxisScale) -> Geometry {
    match geometry {
        Geometry::Segment { start, end } => Geometry::Segment {
            start: to_pixel(*start, x, y),
            end: to_pixel(*end, x, y),
        },
        Geometry::Marker { center } => Geometry::Marker {
            center: to_pixel(*center, x, y),
        },
        Geometry::Ellipse {
            center,
            radius_x,
            radius_y,
        } => Geometry::Ellipse {
            center: to_pixel(*center, x, y),
            radius_x: radius_x * x.pixels_per_unit(),
            radius_y: radius_y * y.pixels_per_unit(),
        },
        Geometry::Polygon { points } => Geometry::Polygon {
            points: points.iter().map(|p| to_pixel(*p, x, y)).collect(),
        },
    }
}

fn format_tick(value: f64) -> String {
    format!("{}", value as i64)
}
