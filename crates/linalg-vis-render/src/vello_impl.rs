//! Vello scene building from a retained scene.

use crate::retained::{Primitive, RetainedScene};
use crate::surface::Style;
use kurbo::{Affine, BezPath, Circle, Ellipse, Line, Shape as KurboShape, Stroke};
use peniko::color::{Srgb, parse_color};
use peniko::{Color, Fill};
use vello::Scene;

/// Builds a [`vello::Scene`] from drawn groups. Text primitives are skipped;
/// glyph layout is left to the host application.
pub struct VelloSceneBuilder {
    scene: Scene,
    transform: Affine,
}

impl Default for VelloSceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSceneBuilder {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            transform: Affine::IDENTITY,
        }
    }

    /// Scale pixel coordinates, e.g. for HiDPI output.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.transform = Affine::scale(scale);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the built scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Rebuild the scene from every group, back to front.
    pub fn build(&mut self, retained: &RetainedScene) {
        self.scene.reset();
        for group in retained.groups() {
            for primitive in &group.primitives {
                self.render_primitive(primitive);
            }
        }
    }

    fn render_primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Line { from, to, style } => {
                self.render_path(&Line::new(*from, *to).to_path(0.1), style);
            }
            Primitive::Circle { center, radius, style } => {
                self.render_path(&Circle::new(*center, *radius).to_path(0.1), style);
            }
            Primitive::Ellipse {
                center,
                radius_x,
                radius_y,
                style,
            } => {
                let ellipse = Ellipse::new(*center, (*radius_x, *radius_y), 0.0);
                self.render_path(&ellipse.to_path(0.1), style);
            }
            Primitive::Polygon { points, style } => {
                let mut path = BezPath::new();
                if let Some((first, rest)) = points.split_first() {
                    path.move_to(*first);
                    for p in rest {
                        path.line_to(*p);
                    }
                    path.close_path();
                }
                self.render_path(&path, style);
            }
            Primitive::Text { .. } => {}
        }
    }

    fn render_path(&mut self, path: &BezPath, style: &Style) {
        if let Some(fill) = &style.fill {
            self.scene
                .fill(Fill::NonZero, self.transform, css_color(fill), None, path);
        }
        if let Some(stroke_color) = &style.stroke {
            let mut stroke = Stroke::new(style.stroke_width);
            if let Some(dash) = style.dash {
                stroke = stroke.with_dashes(0.0, [dash, dash]);
            }
            self.scene
                .stroke(&stroke, self.transform, css_color(stroke_color), None, path);
        }
    }
}

/// Parse a CSS color string, falling back to black.
pub fn css_color(text: &str) -> Color {
    match parse_color(text) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("Unrecognized color \"{text}\" ({e}), using black");
            Color::BLACK
        }
    }
}
