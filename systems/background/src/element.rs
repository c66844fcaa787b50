use tessera_core::{Graphic, Image};

use crate::BackgroundComponent;

/// Static image following only the vertical offset.
#[derive(Clone, Debug)]
pub struct BackgroundElement {
    image: Image,
    x: f64,
    y: f64,
    offset_y: f64,
}

impl BackgroundElement {
    /// Creates an element drawn at `(x, y)` plus the vertical offset.
    #[must_use]
    pub fn new(image: Image, x: f64, y: f64) -> Self {
        Self {
            image,
            x,
            y,
            offset_y: 0.0,
        }
    }
}

impl BackgroundComponent for BackgroundElement {
    fn update(&mut self, _offset_x: f64, offset_y: f64, _speed: f64, _extrp: f64) {
        self.offset_y = offset_y;
    }

    fn render(&self, g: &mut dyn Graphic) {
        g.draw_image(
            &self.image,
            self.x.floor() as i32,
            (self.y + self.offset_y).floor() as i32,
        );
    }
}
