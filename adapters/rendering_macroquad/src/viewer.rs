use std::time::Duration;

use anyhow::Result;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use tessera_core::{ColorRgba, DVec2};

use crate::graphic::{to_macroquad_color, MacroquadGraphic};

/// Ticks per second the engine's per-tick speeds are expressed in.
const DEFAULT_TICK_RATE: f64 = 60.0;

/// Converts a frame duration into the engine's extrapolation factor.
///
/// An extrapolation of `1.0` stands for exactly one tick at `tick_rate`.
#[must_use]
pub fn extrapolation(dt: Duration, tick_rate: f64) -> f64 {
    dt.as_secs_f64() * tick_rate
}

/// Input sampled at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Duration of the previous frame.
    pub dt: Duration,
    /// Extrapolation factor for `dt`.
    pub extrp: f64,
    /// Held arrow keys as a unit-axis direction, `y` pointing down.
    pub direction: DVec2,
}

impl FrameInput {
    fn poll(dt: Duration, tick_rate: f64) -> Self {
        let axis = |negative: KeyCode, positive: KeyCode| {
            f64::from(i8::from(is_key_down(positive)) - i8::from(is_key_down(negative)))
        };
        Self {
            dt,
            extrp: extrapolation(dt, tick_rate),
            direction: DVec2::new(
                axis(KeyCode::Left, KeyCode::Right),
                axis(KeyCode::Up, KeyCode::Down),
            ),
        }
    }
}

/// Decision returned by the frame closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerControl {
    /// Keep the window open.
    Continue,
    /// Close the window after this frame.
    Quit,
}

/// Window running a per-frame update and render closure.
#[derive(Clone, Debug)]
pub struct Viewer {
    title: String,
    width: i32,
    height: i32,
    clear_color: ColorRgba,
    tick_rate: f64,
    swap_interval: Option<i32>,
}

impl Viewer {
    /// Creates a viewer with a 960x720 window.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 960,
            height: 720,
            clear_color: ColorRgba::BLACK,
            tick_rate: DEFAULT_TICK_RATE,
            swap_interval: None,
        }
    }

    /// Overrides the window size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Overrides the color the window is cleared with every frame.
    #[must_use]
    pub fn with_clear_color(mut self, color: ColorRgba) -> Self {
        self.clear_color = color;
        self
    }

    /// Overrides the tick rate used to compute extrapolation.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Requests a specific swap interval, `0` disabling vsync.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: i32) -> Self {
        self.swap_interval = Some(swap_interval);
        self
    }

    /// Opens the window and calls `frame` once per frame until it asks to
    /// quit or `Escape`/`Q` is pressed.
    pub fn run<F>(self, mut frame: F) -> Result<()>
    where
        F: FnMut(&FrameInput, &mut MacroquadGraphic) -> ViewerControl + 'static,
    {
        let Self {
            title,
            width,
            height,
            clear_color,
            tick_rate,
            swap_interval,
        } = self;

        let mut config = macroquad::window::Conf {
            window_title: title,
            window_width: width,
            window_height: height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut graphic = MacroquadGraphic::new();
            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }
                macroquad::window::clear_background(background);

                let dt = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let input = FrameInput::poll(dt, tick_rate);
                if frame(&input, &mut graphic) == ViewerControl::Quit {
                    break;
                }
                macroquad::window::next_frame().await;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_tick_is_one_extrapolation_unit() {
        let tick = Duration::from_secs_f64(1.0 / 60.0);
        assert!((extrapolation(tick, 60.0) - 1.0).abs() < 1e-9);
        assert_eq!(extrapolation(Duration::from_millis(500), 60.0), 30.0);
        assert_eq!(extrapolation(Duration::ZERO, 60.0), 0.0);
    }
}
