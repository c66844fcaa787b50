#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Height-indexed recoloring of sprites and tile sheets.
//!
//! A [`RasterDefinition`] lists per-channel control points. Generation turns
//! one source image into the rasters of a [`RasterSet`], and
//! [`RasterPolicy`] selects a raster from a vertical position. Sets are
//! generated once per sheet and pattern and shared through
//! [`RasterCache`].

pub mod cache;
pub mod definition;
pub mod generate;
pub mod policy;
pub mod set;

pub use cache::{RasterCache, RasterKey};
pub use definition::{ChannelRamp, RasterDefinition, MAX_DELTA};
pub use generate::is_protected;
pub use policy::{RasterPolicy, MAX_RASTERS};
pub use set::RasterSet;
