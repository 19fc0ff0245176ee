//! linalg-vis Render Library
//!
//! Drawing surface abstraction, the scene reconciler, and exporters.
//! The Vello scene builder is behind the `vello-renderer` feature.

pub mod board;
mod retained;
pub mod scene;
mod surface;
pub mod svg;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use board::Board;
pub use retained::{DrawnGroup, Primitive, RetainedScene};
pub use scene::{AXIS_GROUP_ID, PassReport, RenderError, RenderResult, RenderState, SceneInputs, SceneRenderer, SceneStyle};
pub use surface::{DrawingSurface, GroupHandle, Style, SurfaceError, SurfaceResult};
pub use svg::to_svg;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{VelloSceneBuilder, css_color};
