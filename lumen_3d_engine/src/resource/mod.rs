/// Resource module - pure CPU-side data consumed by the scene and renderer
///
/// - **Color**: 8-bit RGBA color with normalization for uploads
/// - **Geometry**: validated vertex/index data, box and sphere producers
/// - **Material**: closed set of shading models with their shader sources

pub mod color;
pub mod geometry;
pub mod material;

pub use color::Color;
pub use geometry::Geometry;
pub use material::{Material, PhongMaterial, BasicMaterial, ShaderSource};
