use std::collections::{hash_map::Entry, HashMap};

use macroquad::{
    color::Color,
    math::Rect,
    shapes::{draw_rectangle, draw_rectangle_lines},
    texture::{draw_texture_ex, DrawTextureParams, FilterMode, Texture2D},
};
use tessera_core::{ColorRgba, Graphic, Image, ImageId, Rectangle};
use tracing::warn;

/// Converts an engine color into a macroquad color.
#[must_use]
pub fn to_macroquad_color(color: ColorRgba) -> Color {
    Color::from_rgba(color.red, color.green, color.blue, color.alpha)
}

/// Converts an engine rectangle into a macroquad rectangle.
#[must_use]
pub fn to_macroquad_rect(area: Rectangle) -> Rect {
    Rect::new(
        area.x as f32,
        area.y as f32,
        area.width as f32,
        area.height as f32,
    )
}

/// Uploaded textures keyed by the identity of their source image.
#[derive(Debug)]
pub struct TextureCache<T> {
    textures: HashMap<ImageId, T>,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }
}

impl<T> TextureCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture of `image`, uploading it on first use.
    ///
    /// A failed upload is not cached and is retried on the next call.
    pub fn get_or_upload(
        &mut self,
        image: &Image,
        upload: impl FnOnce(&Image) -> Option<T>,
    ) -> Option<&T> {
        match self.textures.entry(image.id()) {
            Entry::Occupied(entry) => Some(entry.into_mut()),
            Entry::Vacant(entry) => upload(image).map(|texture| &*entry.insert(texture)),
        }
    }

    /// Drops the texture of an image no longer drawn.
    pub fn remove(&mut self, id: ImageId) -> Option<T> {
        self.textures.remove(&id)
    }

    /// Number of cached textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Reports whether nothing was uploaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn upload(image: &Image) -> Option<Texture2D> {
    let (Ok(width), Ok(height)) = (u16::try_from(image.width()), u16::try_from(image.height()))
    else {
        warn!(
            width = image.width(),
            height = image.height(),
            "image too large for a texture"
        );
        return None;
    };
    let texture = Texture2D::from_rgba8(width, height, image.pixels().as_raw());
    texture.set_filter(FilterMode::Nearest);
    Some(texture)
}

/// [`Graphic`] drawing into the current macroquad frame.
#[derive(Debug)]
pub struct MacroquadGraphic {
    color: ColorRgba,
    textures: TextureCache<Texture2D>,
}

impl Default for MacroquadGraphic {
    fn default() -> Self {
        Self {
            color: ColorRgba::WHITE,
            textures: TextureCache::new(),
        }
    }
}

impl MacroquadGraphic {
    /// Creates a graphic with an empty texture cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploaded textures.
    #[must_use]
    pub fn textures(&self) -> &TextureCache<Texture2D> {
        &self.textures
    }

    fn draw(&mut self, image: &Image, x: i32, y: i32, source: Option<Rect>) {
        let Some(texture) = self.textures.get_or_upload(image, upload).copied() else {
            return;
        };
        let params = DrawTextureParams {
            source,
            ..DrawTextureParams::default()
        };
        draw_texture_ex(texture, x as f32, y as f32, macroquad::color::WHITE, params);
    }
}

impl Graphic for MacroquadGraphic {
    fn clear(&mut self, area: Rectangle) {
        let area = to_macroquad_rect(area);
        draw_rectangle(area.x, area.y, area.w, area.h, to_macroquad_color(self.color));
    }

    fn set_color(&mut self, color: ColorRgba) {
        self.color = color;
    }

    fn draw_rect(&mut self, area: Rectangle, fill: bool) {
        let area = to_macroquad_rect(area);
        let color = to_macroquad_color(self.color);
        if fill {
            draw_rectangle(area.x, area.y, area.w, area.h, color);
        } else {
            draw_rectangle_lines(area.x, area.y, area.w, area.h, 1.0, color);
        }
    }

    fn draw_image(&mut self, image: &Image, x: i32, y: i32) {
        self.draw(image, x, y, None);
    }

    fn draw_image_region(&mut self, image: &Image, source: Rectangle, x: i32, y: i32) {
        self.draw(image, x, y, Some(to_macroquad_rect(source)));
    }
}
