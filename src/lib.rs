extern crate nalgebra as na;

pub mod aabb;
pub mod algebra;
pub mod camera;
pub mod distributions;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod mesh;
pub mod rendering;
pub mod scene;
pub mod shading;
pub mod utils;
pub mod wavefront;

#[cfg(test)]
mod tests;

pub use camera::{Camera, RenderOptions};
pub use error::{Error, Result};
pub use framebuffer::Framebuffer;
pub use mesh::Mesh;
pub use rendering::{render, render_with_progress};
pub use scene::{Color, Light, Material, MaterialId, Primitive, Scene};
