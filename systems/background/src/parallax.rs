use tessera_core::{math, Graphic, Image, Rectangle};

use crate::BackgroundComponent;

/// Horizontal bands of one sprite scrolling at depth-dependent speeds.
///
/// The sprite is cut into `bands` rows of equal height. Band `i` scrolls at
/// `speed * i * coefficient`, so the top band stays still and lower bands
/// drift faster. Each band is drawn twice side by side to tile seamlessly.
#[derive(Clone, Debug)]
pub struct Parallax {
    sprite: Image,
    x: f64,
    y: f64,
    coefficient: f64,
    band_height: u32,
    offsets: Vec<f64>,
    offset_y: f64,
}

impl Parallax {
    /// Creates `bands` bands drawn from `(x, y)`.
    #[must_use]
    pub fn new(sprite: Image, bands: u32, coefficient: f64, x: f64, y: f64) -> Self {
        let bands = bands.clamp(1, sprite.height().max(1));
        let band_height = sprite.height() / bands;
        Self {
            sprite,
            x,
            y,
            coefficient,
            band_height,
            offsets: vec![0.0; bands as usize],
            offset_y: 0.0,
        }
    }

    /// Horizontal offset of each band, within `[0, sprite width)`.
    #[must_use]
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }
}

impl BackgroundComponent for Parallax {
    fn update(&mut self, offset_x: f64, offset_y: f64, speed: f64, extrp: f64) {
        let width = f64::from(self.sprite.width());
        for (band, offset) in self.offsets.iter_mut().enumerate() {
            let band_speed = speed * band as f64 * self.coefficient;
            *offset = math::wrap(*offset + offset_x + band_speed * extrp, 0.0, width);
        }
        self.offset_y = offset_y;
    }

    fn render(&self, g: &mut dyn Graphic) {
        let width = f64::from(self.sprite.width());
        for (band, offset) in self.offsets.iter().enumerate() {
            let top = band as u32 * self.band_height;
            let source = Rectangle::new(0.0, f64::from(top), width, f64::from(self.band_height));
            let x = (self.x - offset).floor() as i32;
            let y = (self.y + f64::from(top) + self.offset_y).floor() as i32;
            g.draw_image_region(&self.sprite, source, x, y);
            g.draw_image_region(&self.sprite, source, x + self.sprite.width() as i32, y);
        }
    }
}
