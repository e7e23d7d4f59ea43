//! Rendering adapter: turns wave field state into drawable data.
//!
//! # Invariants
//! - Renderers and meshes read the field; they never mutate it.
//! - A mesh refresh must complete before the next `update` or `disturb`.
//!
//! [`SurfaceMesh`] holds the GPU-ready vertex and index buffers;
//! [`TextRenderer`] draws an ASCII height map for terminals and tests.

mod mesh;
mod renderer;

pub use mesh::{MeshError, SurfaceMesh, SurfaceVertex};
pub use renderer::{Renderer, TextRenderer};
