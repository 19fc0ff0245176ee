//! In-memory drawing surface that keeps every drawn group.

use crate::surface::{DrawingSurface, GroupHandle, Style, SurfaceError, SurfaceResult};
use kurbo::Point;
use serde::Serialize;

/// One drawn primitive, in absolute pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        style: Style,
    },
    Circle {
        center: Point,
        radius: f64,
        style: Style,
    },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        style: Style,
    },
    Polygon {
        points: Vec<Point>,
        style: Style,
    },
    Text {
        at: Point,
        text: String,
        style: Style,
    },
}

/// A group and its primitives, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawnGroup {
    pub handle: GroupHandle,
    pub primitives: Vec<Primitive>,
}

/// Retained scene: groups in the order they were drawn (back to front).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetainedScene {
    groups: Vec<DrawnGroup>,
    #[serde(skip)]
    removals: usize,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[DrawnGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&DrawnGroup> {
        self.groups.iter().find(|g| g.handle.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.group(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.handle.id()).collect()
    }

    /// Total number of primitives across all groups.
    pub fn primitive_count(&self) -> usize {
        self.groups.iter().map(|g| g.primitives.len()).sum()
    }

    /// Number of successful group removals so far.
    pub fn removals(&self) -> usize {
        self.removals
    }

    /// Serialize the drawn groups as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn push(&mut self, group: &GroupHandle, primitive: Primitive) -> SurfaceResult<()> {
        let target = self
            .groups
            .iter_mut()
            .find(|g| g.handle == *group)
            .ok_or_else(|| SurfaceError::UnknownGroup(group.id().to_string()))?;
        target.primitives.push(primitive);
        Ok(())
    }
}

impl DrawingSurface for RetainedScene {
    fn draw_group(&mut self, class: &str, id: &str) -> SurfaceResult<GroupHandle> {
        if self.contains(id) {
            return Err(SurfaceError::DuplicateGroup(id.to_string()));
        }
        let handle = GroupHandle::new(class, id);
        self.groups.push(DrawnGroup {
            handle: handle.clone(),
            primitives: Vec::new(),
        });
        Ok(handle)
    }

    fn draw_line(&mut self, group: &GroupHandle, from: Point, to: Point, style: &Style) -> SurfaceResult<()> {
        self.push(
            group,
            Primitive::Line {
                from,
                to,
                style: style.clone(),
            },
        )
    }

    fn draw_circle(&mut self, group: &GroupHandle, center: Point, radius: f64, style: &Style) -> SurfaceResult<()> {
        self.push(
            group,
            Primitive::Circle {
                center,
                radius,
                style: style.clone(),
            },
        )
    }

    fn draw_ellipse(
        &mut self,
        group: &GroupHandle,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        style: &Style,
    ) -> SurfaceResult<()> {
        self.push(
            group,
            Primitive::Ellipse {
                center,
                radius_x,
                radius_y,
                style: style.clone(),
            },
        )
    }

    fn draw_polygon(&mut self, group: &GroupHandle, points: &[Point], style: &Style) -> SurfaceResult<()> {
        self.push(
            group,
            Primitive::Polygon {
                points: points.to_vec(),
                style: style.clone(),
            },
        )
    }

    fn draw_text(&mut self, group: &GroupHandle, at: Point, text: &str, style: &Style) -> SurfaceResult<()> {
        self.push(
            group,
            Primitive::Text {
                at,
                text: text.to_string(),
                style: style.clone(),
            },
        )
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.handle.id() != id);
        let removed = self.groups.len() != before;
        if removed {
            self.removals += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_into_group() {
        let mut scene = RetainedScene::new();
        let group = scene.draw_group("dot", "shape-1").unwrap();
        scene
            .draw_circle(&group, Point::new(10.0, 10.0), 3.0, &Style::filled("red"))
            .unwrap();
        assert_eq!(scene.ids(), vec!["shape-1"]);
        assert_eq!(scene.primitive_count(), 1);
        assert_eq!(scene.group("shape-1").unwrap().handle.class(), "dot");
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mut scene = RetainedScene::new();
        scene.draw_group("dot", "a").unwrap();
        assert_eq!(
            scene.draw_group("dot", "a"),
            Err(SurfaceError::DuplicateGroup("a".to_string()))
        );
    }

    #[test]
    fn test_unknown_group() {
        let mut scene = RetainedScene::new();
        let stale = GroupHandle::new("dot", "gone");
        let err = scene
            .draw_circle(&stale, Point::ORIGIN, 1.0, &Style::filled("red"))
            .unwrap_err();
        assert_eq!(err, SurfaceError::UnknownGroup("gone".to_string()));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut scene = RetainedScene::new();
        scene.draw_group("dot", "a").unwrap();
        assert!(scene.remove_by_id("a"));
        assert!(!scene.remove_by_id("a"));
        assert_eq!(scene.removals(), 1);
        assert!(scene.groups().is_empty());
    }

    #[test]
    fn test_json_dump_tags_primitives() {
        let mut scene = RetainedScene::new();
        let group = scene.draw_group("vector", "v").unwrap();
        scene
            .draw_line(&group, Point::ORIGIN, Point::new(1.0, 1.0), &Style::stroked("red", 2.0))
            .unwrap();
        let json = scene.to_json().unwrap();
        assert!(json.contains("\"kind\": \"line\""));
        assert!(json.contains("\"id\": \"v\""));
    }
}
