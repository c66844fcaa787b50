//! Raster definition resource: per-channel control points.

use serde::{Deserialize, Serialize};
use tessera_core::{check_version, EngineError, Result};

/// Largest channel delta a control point may carry.
pub const MAX_DELTA: i32 = 255;

/// On-disk raster definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RasterDefinition {
    /// Schema version.
    pub version: u32,
    /// Red channel control points.
    pub red: Vec<i32>,
    /// Green channel control points.
    pub green: Vec<i32>,
    /// Blue channel control points.
    pub blue: Vec<i32>,
}

impl RasterDefinition {
    /// Checks the version and control points, producing the channel ramps.
    pub fn ramps(&self, resource: &str) -> Result<[ChannelRamp; 3]> {
        check_version(resource, self.version)?;
        Ok([
            ChannelRamp::new(resource, "red", &self.red)?,
            ChannelRamp::new(resource, "green", &self.green)?,
            ChannelRamp::new(resource, "blue", &self.blue)?,
        ])
    }
}

/// Ordered control points of one color channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRamp {
    points: Vec<i32>,
}

impl ChannelRamp {
    fn new(resource: &str, channel: &str, points: &[i32]) -> Result<Self> {
        if points.is_empty() {
            return Err(EngineError::invalid(
                resource,
                format!("{channel} channel has no control points"),
            ));
        }
        if let Some(point) = points.iter().find(|point| point.abs() > MAX_DELTA) {
            return Err(EngineError::invalid(
                resource,
                format!("{channel} control point {point} exceeds {MAX_DELTA}"),
            ));
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }

    /// Channel delta at the 1-based raster `position` out of `count`.
    ///
    /// The control points are spread evenly over `1..=count` and linearly
    /// interpolated; positions outside the range are clamped.
    #[must_use]
    pub fn at(&self, position: u32, count: u32) -> i32 {
        let last = self.points.len() - 1;
        if last == 0 || count <= 1 {
            return self.points[0];
        }
        let position = position.clamp(1, count);
        let scaled = u64::from(position - 1) * last as u64;
        let span = u64::from(count - 1);
        let low = usize::try_from(scaled / span).unwrap_or(last).min(last);
        let high = (low + 1).min(last);
        let remainder = (scaled % span) as f64 / span as f64;

        let from = f64::from(self.points[low]);
        let to = f64::from(self.points[high]);
        (from + (to - from) * remainder).round() as i32
    }
}
