#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed [`tessera_core::Graphic`] and window loop.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in headless CI environments. The adapter
//! therefore depends on macroquad without its default `audio` feature.
//!
//! Engine images are uploaded to GPU textures the first time they are drawn
//! and cached by [`tessera_core::ImageId`], so shared rasters are uploaded once.

mod graphic;
mod viewer;

pub use graphic::{to_macroquad_color, to_macroquad_rect, MacroquadGraphic, TextureCache};
pub use viewer::{extrapolation, FrameInput, Viewer, ViewerControl};
