//! Recoloring of a source image into raster variants.

use image::{Rgba, RgbaImage};
use tessera_core::Image;

use crate::{definition::ChannelRamp, policy::RasterPolicy};

/// Start and end delta of each channel for one raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Shift {
    start: [i32; 3],
    end: [i32; 3],
}

/// Reports whether a pixel keeps its color under every raster.
///
/// Fully transparent, pure black and pure white pixels mark outlines and
/// holes.
#[must_use]
pub fn is_protected(pixel: &Rgba<u8>) -> bool {
    let [red, green, blue, alpha] = pixel.0;
    alpha == 0 || [red, green, blue] == [0, 0, 0] || [red, green, blue] == [255, 255, 255]
}

/// Generates every raster of `source` in lookup order.
#[must_use]
pub fn generate(source: &Image, ramps: &[ChannelRamp; 3], policy: RasterPolicy) -> Vec<Image> {
    let passes: &[bool] = if policy.smooth() {
        &[false, true]
    } else {
        &[false]
    };
    let count = policy.count();

    let mut rasters = Vec::with_capacity(policy.generated() as usize);
    for &mirrored in passes {
        for position in 1..=count {
            let shift = shift_for(ramps, position, count, mirrored);
            rasters.push(Image::new(recolor(source.pixels(), shift, policy.smooth())));
        }
    }
    rasters
}

fn shift_for(ramps: &[ChannelRamp; 3], position: u32, count: u32, mirrored: bool) -> Shift {
    let (from, to) = if mirrored {
        (count + 1 - position, (count - position).max(1))
    } else {
        (position, (position + 1).min(count))
    };
    let mut shift = Shift {
        start: [0; 3],
        end: [0; 3],
    };
    for (channel, ramp) in ramps.iter().enumerate() {
        shift.start[channel] = ramp.at(from, count);
        shift.end[channel] = ramp.at(to, count);
    }
    shift
}

fn recolor(source: &RgbaImage, shift: Shift, smooth: bool) -> RgbaImage {
    let height = i64::from(source.height().max(1));
    let mut target = source.clone();
    for (_, y, pixel) in target.enumerate_pixels_mut() {
        if is_protected(pixel) {
            continue;
        }
        for channel in 0..3 {
            let delta = if smooth {
                let start = i64::from(shift.start[channel]);
                let end = i64::from(shift.end[channel]);
                start + (end - start) * i64::from(y) / height
            } else {
                i64::from(shift.start[channel])
            };
            let value = (i64::from(pixel.0[channel]) + delta).clamp(0, 255);
            pixel.0[channel] = value as u8;
        }
    }
    target
}
