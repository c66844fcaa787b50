//! Drawing surface contract and shared image buffers.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::geom::Rectangle;

/// RGBA color with byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRgba {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel, `0` being fully transparent.
    pub alpha: u8,
}

impl ColorRgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Creates a color from its four channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Channels in `[r, g, b, a]` order.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Builds a color from `[r, g, b, a]` channels.
    #[must_use]
    pub const fn from_array(channels: [u8; 4]) -> Self {
        Self::new(channels[0], channels[1], channels[2], channels[3])
    }
}

/// Process-unique identity of an [`Image`] buffer.
///
/// Graphics backends key their uploaded textures on this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Immutable RGBA pixel buffer shared between every consumer.
#[derive(Clone, Debug)]
pub struct Image {
    id: ImageId,
    pixels: Arc<RgbaImage>,
}

impl Image {
    /// Wraps a pixel buffer, assigning it a fresh identity.
    #[must_use]
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: ImageId::next(),
            pixels: Arc::new(pixels),
        }
    }

    /// Identity of the buffer.
    #[must_use]
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Underlying pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copies a rectangular region into a new image, clipped to the bounds.
    #[must_use]
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);
        let view = image::imageops::crop_imm(self.pixels.as_ref(), x, y, width, height);
        Self::new(view.to_image())
    }
}

/// Immediate-mode 2D drawing surface.
///
/// Engine code renders exclusively through this trait; adapters decide how the
/// calls reach a toolkit canvas.
pub trait Graphic {
    /// Fills `area` with the current color, discarding what was drawn there.
    fn clear(&mut self, area: Rectangle);

    /// Selects the color used by subsequent shape calls.
    fn set_color(&mut self, color: ColorRgba);

    /// Draws a rectangle outline, or a filled rectangle when `fill` is set.
    fn draw_rect(&mut self, area: Rectangle, fill: bool);

    /// Draws the whole image with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Image, x: i32, y: i32);

    /// Draws the `source` region of the image with its top-left corner at `(x, y)`.
    fn draw_image_region(&mut self, image: &Image, source: Rectangle, x: i32, y: i32);
}

/// Single call captured by [`RecordingGraphic`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// Area cleared with the given color.
    Clear {
        /// Cleared area.
        area: Rectangle,
        /// Color active at the time of the call.
        color: ColorRgba,
    },
    /// Rectangle drawn with the given color.
    Rect {
        /// Drawn area.
        area: Rectangle,
        /// Color active at the time of the call.
        color: ColorRgba,
        /// Whether the rectangle was filled.
        fill: bool,
    },
    /// Whole image drawn.
    Image {
        /// Identity of the drawn image.
        image: ImageId,
        /// Destination column.
        x: i32,
        /// Destination row.
        y: i32,
    },
    /// Image region drawn.
    ImageRegion {
        /// Identity of the drawn image.
        image: ImageId,
        /// Source area within the image.
        source: Rectangle,
        /// Destination column.
        x: i32,
        /// Destination row.
        y: i32,
    },
}

/// Headless [`Graphic`] that records every call in order.
#[derive(Debug)]
pub struct RecordingGraphic {
    color: ColorRgba,
    calls: Vec<DrawCall>,
}

impl Default for RecordingGraphic {
    fn default() -> Self {
        Self {
            color: ColorRgba::BLACK,
            calls: Vec::new(),
        }
    }
}

impl RecordingGraphic {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Graphic for RecordingGraphic {
    fn clear(&mut self, area: Rectangle) {
        self.calls.push(DrawCall::Clear {
            area,
            color: self.color,
        });
    }

    fn set_color(&mut self, color: ColorRgba) {
        self.color = color;
    }

    fn draw_rect(&mut self, area: Rectangle, fill: bool) {
        self.calls.push(DrawCall::Rect {
            area,
            color: self.color,
            fill,
        });
    }

    fn draw_image(&mut self, image: &Image, x: i32, y: i32) {
        self.calls.push(DrawCall::Image {
            image: image.id(),
            x,
            y,
        });
    }

    fn draw_image_region(&mut self, image: &Image, source: Rectangle, x: i32, y: i32) {
        self.calls.push(DrawCall::ImageRegion {
            image: image.id(),
            source,
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_receive_distinct_identities() {
        let first = Image::new(RgbaImage::new(2, 2));
        let second = Image::new(RgbaImage::new(2, 2));
        assert_ne!(first.id(), second.id());
        assert_eq!(first.clone().id(), first.id());
    }

    #[test]
    fn region_is_clipped_to_bounds() {
        let image = Image::new(RgbaImage::new(8, 4));
        let region = image.region(6, 2, 10, 10);
        assert_eq!((region.width(), region.height()), (2, 2));
    }

    #[test]
    fn recorder_captures_active_color() {
        let mut graphic = RecordingGraphic::new();
        let area = Rectangle::new(0.0, 0.0, 4.0, 4.0);
        graphic.set_color(ColorRgba::WHITE);
        graphic.draw_rect(area, true);

        assert_eq!(
            graphic.calls(),
            &[DrawCall::Rect {
                area,
                color: ColorRgba::WHITE,
                fill: true,
            }]
        );
    }
}
