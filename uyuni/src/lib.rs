//! Renderer-agnostic core of the uyuni-lake scene.
//!
//! Holds the parameter store edited by the debug panel, the scene graph, the
//! per-frame update and the debounced resize logic. GPU work lives in
//! `uyuni-wgpu` and the browser glue in `uyuni-web`.

#![forbid(unsafe_code)]

mod config;
mod error;
mod filter;
mod frame;
mod layout;
mod panel;
mod params;
mod resize;
mod scene;

pub use config::*;
pub use error::*;
pub use filter::*;
pub use frame::*;
pub use layout::*;
pub use panel::*;
pub use params::*;
pub use resize::*;
pub use scene::*;

#[cfg(test)]
mod config_tests;

#[cfg(test)]
mod frame_tests;

#[cfg(test)]
mod layout_tests;


#[cfg(test)]
mod resize_tests;
