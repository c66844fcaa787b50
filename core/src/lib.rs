#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tessera engine.
//!
//! This crate defines the collaborator surface every other crate builds on:
//! [`Media`] handles for named resources, the [`Graphic`] drawing surface,
//! shared [`Image`] buffers, geometry, timers driven by a [`Clock`], and the
//! explicit [`Services`] registry a scene hands to its features. All fallible
//! operations report an [`EngineError`].

pub mod error;
pub mod geom;
pub mod graphic;
pub mod math;
pub mod media;
pub mod services;
pub mod timing;

pub use error::{EngineError, Result};
pub use geom::{Localizable, Probe, Rectangle};
pub use glam::DVec2;
pub use graphic::{ColorRgba, DrawCall, Graphic, Image, ImageId, RecordingGraphic};
pub use media::{Media, ResourceRoot};
pub use services::Services;
pub use timing::{Clock, ManualClock, SystemClock, Timing};

/// Version all on-disk resources must declare.
pub const RESOURCE_VERSION: u32 = 1;

/// Rejects resources that declare an unsupported schema version.
pub fn check_version(resource: &str, version: u32) -> Result<()> {
    if version == RESOURCE_VERSION {
        Ok(())
    } else {
        Err(EngineError::invalid(
            resource,
            format!("unsupported version {version}, expected {RESOURCE_VERSION}"),
        ))
    }
}
