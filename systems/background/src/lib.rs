#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scrolling backgrounds driven by a speed and a vertical position.
//!
//! A [`Background`] turns the camera height into a pixel offset and forwards
//! it to its [`BackgroundComponent`] layers, rendered back to front in the
//! order they were added.

mod clouds;
mod element;
mod parallax;

use tessera_core::{EngineError, Graphic, Result};

pub use clouds::{CloudLine, Clouds};
pub use element::BackgroundElement;
pub use parallax::Parallax;

/// Layer of a [`Background`].
pub trait BackgroundComponent {
    /// Advances the layer. `offset_y` is the vertical offset in pixels.
    fn update(&mut self, offset_x: f64, offset_y: f64, speed: f64, extrp: f64);

    /// Draws the layer.
    fn render(&self, g: &mut dyn Graphic);
}

/// Ordered stack of background layers.
pub struct Background {
    min_y: f64,
    max_y: f64,
    height: f64,
    offset_y: f64,
    components: Vec<Box<dyn BackgroundComponent>>,
}

impl Background {
    /// Creates a background mapping `[min_y, max_y]` onto `height` pixels.
    pub fn new(min_y: f64, max_y: f64, height: f64) -> Result<Self> {
        if !(min_y.is_finite() && max_y.is_finite() && min_y < max_y) {
            return Err(EngineError::invalid(
                "background",
                format!("vertical range {min_y}..{max_y} is empty"),
            ));
        }
        if !(height.is_finite() && height >= 0.0) {
            return Err(EngineError::invalid(
                "background",
                format!("height {height} must be a non-negative number"),
            ));
        }
        Ok(Self {
            min_y,
            max_y,
            height,
            offset_y: 0.0,
            components: Vec::new(),
        })
    }

    /// Appends a layer drawn above the existing ones.
    pub fn add_component(&mut self, component: impl BackgroundComponent + 'static) {
        self.components.push(Box::new(component));
    }

    /// Vertical offset forwarded during the last update.
    #[must_use]
    pub const fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Advances every layer for camera height `y`.
    pub fn update(&mut self, speed: f64, y: f64, extrp: f64) {
        let y = y.clamp(self.min_y, self.max_y);
        self.offset_y = (y - self.min_y) / (self.max_y - self.min_y) * self.height;
        for component in &mut self.components {
            component.update(0.0, self.offset_y, speed, extrp);
        }
    }

    /// Draws every layer in order.
    pub fn render(&self, g: &mut dyn Graphic) {
        for component in &self.components {
            component.render(g);
        }
    }
}

impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background")
            .field("min_y", &self.min_y)
            .field("max_y", &self.max_y)
            .field("height", &self.height)
            .field("components", &self.components.len())
            .finish()
    }
}
