use tessera_core::{Graphic, Image, Localizable, Rectangle, Result, Services};

use crate::{
    animation::{AnimState, Animation, Animator},
    feature::Feature,
    featurable::Featurable,
};

use super::Transformable;

/// Sprite sheet played by an [`Animator`].
///
/// Frames are laid out left to right, top to bottom, each `frame_width` by
/// `frame_height` pixels.
#[derive(Clone, Debug)]
pub struct Animatable {
    sheet: Image,
    frame_width: u32,
    frame_height: u32,
    animator: Animator,
}

impl Animatable {
    /// Creates an animatable over `sheet`.
    #[must_use]
    pub fn new(sheet: Image, frame_width: u32, frame_height: u32) -> Self {
        Self {
            sheet,
            frame_width: frame_width.max(1),
            frame_height: frame_height.max(1),
            animator: Animator::new(),
        }
    }

    /// Starts an animation.
    pub fn play(&mut self, animation: Animation) {
        self.animator.play(animation);
    }

    /// Stops playback.
    pub fn stop(&mut self) {
        self.animator.stop();
    }

    /// Frame currently shown.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.animator.frame()
    }

    /// Playback state.
    #[must_use]
    pub const fn state(&self) -> AnimState {
        self.animator.state()
    }

    /// Reports whether the animation reached its end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.animator.is_finished()
    }

    /// Sheet area holding `frame`.
    #[must_use]
    pub fn frame_area(&self, frame: u32) -> Rectangle {
        let columns = (self.sheet.width() / self.frame_width).max(1);
        Rectangle::new(
            f64::from((frame % columns) * self.frame_width),
            f64::from((frame / columns) * self.frame_height),
            f64::from(self.frame_width),
            f64::from(self.frame_height),
        )
    }
}

impl Feature for Animatable {
    fn prepare(&mut self, owner: &mut Featurable, _services: &Services) -> Result<()> {
        let _ = owner.require::<Transformable>()?;
        Ok(())
    }

    fn update(&mut self, extrp: f64, _owner: &mut Featurable, _services: &Services) {
        self.animator.update(extrp);
    }

    fn render(&self, g: &mut dyn Graphic, owner: &Featurable) {
        let Some(transformable) = owner.try_feature::<Transformable>() else {
            return;
        };
        let location = transformable.location();
        g.draw_image_region(
            &self.sheet,
            self.frame_area(self.frame()),
            location.x.floor() as i32,
            location.y.floor() as i32,
        );
    }
}
