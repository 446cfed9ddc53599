//! Camera module.
//!
//! The camera lives outside the scene arena and is owned by the caller.
//! The renderer refreshes its world matrix once per frame.

mod camera;

pub use camera::PerspectiveCamera;
