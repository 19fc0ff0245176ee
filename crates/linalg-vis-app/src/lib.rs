//! linalg-vis Application
//!
//! Line-oriented command shell over a board with a retained scene.

mod session;

pub use session::{Flow, Session, SessionError};
