//! linalg-vis Core Library
//!
//! Shapes in relative coordinates, the 2x2 board matrix, axis scales and the
//! reactive store that ties them together.

pub mod command;
pub mod config;
pub mod matrix;
pub mod scale;
pub mod shapes;
pub mod store;
pub mod transform;

pub use command::{Command, CommandError};
pub use config::{BoardConfig, ConfigError};
pub use matrix::{EigenDecomposition, Eigenvalues, Matrix2, MatrixError};
pub use scale::{AxisScale, Orientation, ScaleError, Viewport};
pub use shapes::{Shape, ShapeClass, ShapeError, ShapeId, ShapeTrait};
pub use store::{BoardStore, Signal, StoreError, StoreResult, Subscription};
pub use transform::{Geometry, apply_transform, radius_scale, transform_shape};
