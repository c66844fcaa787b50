use tessera_core::{math, Graphic, Image};

use crate::BackgroundComponent;

/// Row of clouds scrolling at its own speed.
#[derive(Clone, Debug)]
pub struct CloudLine {
    image: Image,
    y: f64,
    speed: f64,
    offset: f64,
}

impl CloudLine {
    /// Creates a line drawn at `y`, scrolling at `speed` times the background speed.
    #[must_use]
    pub fn new(image: Image, y: f64, speed: f64) -> Self {
        Self {
            image,
            y,
            speed,
            offset: 0.0,
        }
    }

    /// Horizontal offset within `[0, image width)`.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }
}

/// Independent cloud lines wrapped horizontally.
#[derive(Clone, Debug, Default)]
pub struct Clouds {
    lines: Vec<CloudLine>,
    offset_y: f64,
}

impl Clouds {
    /// Creates clouds from their lines, drawn in order.
    #[must_use]
    pub fn new(lines: Vec<CloudLine>) -> Self {
        Self {
            lines,
            offset_y: 0.0,
        }
    }

    /// Cloud lines.
    #[must_use]
    pub fn lines(&self) -> &[CloudLine] {
        &self.lines
    }
}

impl BackgroundComponent for Clouds {
    fn update(&mut self, offset_x: f64, offset_y: f64, speed: f64, extrp: f64) {
        for line in &mut self.lines {
            let width = f64::from(line.image.width());
            line.offset = math::wrap(line.offset + offset_x + line.speed * speed * extrp, 0.0, width);
        }
        self.offset_y = offset_y;
    }

    fn render(&self, g: &mut dyn Graphic) {
        for line in &self.lines {
            let x = (-line.offset).floor() as i32;
            let y = (line.y + self.offset_y).floor() as i32;
            g.draw_image(&line.image, x, y);
            g.draw_image(&line.image, x + line.image.width() as i32, y);
        }
    }
}
