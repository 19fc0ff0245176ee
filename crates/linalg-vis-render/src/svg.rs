//! SVG export of a retained scene.

use crate::retained::{DrawnGroup, Primitive, RetainedScene};
use crate::surface::Style;
use kurbo::Point;
use std::fmt::Write;

/// Render the scene as a standalone SVG document. Groups become `<g>`
/// elements carrying their id and class, in draw order.
pub fn to_svg(scene: &RetainedScene, width: f64, height: f64, background: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        escape(background)
    );
    for group in scene.groups() {
        write_group(&mut out, group);
    }
    out.push_str("</svg>\n");
    out
}

fn write_group(out: &mut String, group: &DrawnGroup) {
    let _ = writeln!(
        out,
        r#"  <g id="{}" class="{}">"#,
        escape(group.handle.id()),
        escape(group.handle.class())
    );
    for primitive in &group.primitives {
        out.push_str("    ");
        write_primitive(out, primitive);
        out.push('\n');
    }
    out.push_str("  </g>\n");
}

fn write_primitive(out: &mut String, primitive: &Primitive) {
    let _ = match primitive {
        Primitive::Line { from, to, style } => write!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            style_attrs(style)
        ),
        Primitive::Circle { center, radius, style } => write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{radius}"{}/>"#,
            center.x,
            center.y,
            style_attrs(style)
        ),
        Primitive::Ellipse {
            center,
            radius_x,
            radius_y,
            style,
        } => write!(
            out,
            r#"<ellipse cx="{}" cy="{}" rx="{radius_x}" ry="{radius_y}"{}/>"#,
            center.x,
            center.y,
            style_attrs(style)
        ),
        Primitive::Polygon { points, style } => write!(
            out,
            r#"<polygon points="{}"{}/>"#,
            points_attr(points),
            style_attrs(style)
        ),
        Primitive::Text { at, text, style } => write!(
            out,
            r#"<text x="{}" y="{}" font-size="10" text-anchor="middle"{}>{}</text>"#,
            at.x,
            at.y,
            style_attrs(style),
            escape(text)
        ),
    };
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = String::new();
    match &style.fill {
        Some(fill) => {
            let _ = write!(attrs, r#" fill="{}""#, escape(fill));
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            escape(stroke),
            style.stroke_width
        );
    }
    if let Some(dash) = style.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{dash}""#);
    }
    attrs
}

/// Escape text for use in attribute values and element content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
