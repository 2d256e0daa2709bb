//! `wgpu` renderer for the uyuni-lake scene.
//!
//! Draws the backdrop straight to the target, renders the filtered container
//! (background sprite and skeleton) offscreen and composites it back through
//! the water-reflection shader.

mod compositor;
mod quad;
mod reflection;
mod skeleton;
mod texture;

pub use compositor::*;
pub use quad::*;
pub use reflection::*;
pub use skeleton::*;
pub use texture::*;

#[cfg(test)]
mod compositor_tests;
