//! Frame animations and their player.

use serde::{Deserialize, Serialize};
use tessera_core::{EngineError, Result};

/// Frame range played at a fixed speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Animation {
    /// First frame.
    pub first: u32,
    /// Last frame, inclusive.
    pub last: u32,
    /// Frames advanced per tick.
    pub speed: f64,
    /// Plays backwards once the last frame is reached.
    #[serde(default)]
    pub reverse: bool,
    /// Starts over instead of finishing.
    #[serde(default)]
    pub repeat: bool,
}

impl Animation {
    /// Creates a validated animation.
    pub fn new(first: u32, last: u32, speed: f64, reverse: bool, repeat: bool) -> Result<Self> {
        let animation = Self {
            first,
            last,
            speed,
            reverse,
            repeat,
        };
        animation.validate("animation")?;
        Ok(animation)
    }

    /// Rejects empty frame ranges and non-positive speeds.
    pub fn validate(&self, resource: &str) -> Result<()> {
        if self.first > self.last {
            return Err(EngineError::invalid(
                resource,
                format!("first frame {} after last frame {}", self.first, self.last),
            ));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(EngineError::invalid(
                resource,
                format!("speed {} must be positive", self.speed),
            ));
        }
        Ok(())
    }
}

/// Playback state of an [`Animator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimState {
    /// Nothing is playing.
    Stopped,
    /// Playing forwards.
    Playing,
    /// Playing backwards after reaching the last frame.
    Reversing,
    /// Reached its end and holds the final frame.
    Finished,
}

/// Plays one [`Animation`] at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct Animator {
    animation: Option<Animation>,
    current: f64,
    state: AnimState,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Creates a stopped animator showing frame zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            animation: None,
            current: 0.0,
            state: AnimState::Stopped,
        }
    }

    /// Starts `animation` from its first frame.
    pub fn play(&mut self, animation: Animation) {
        self.current = f64::from(animation.first);
        self.animation = Some(animation);
        self.state = AnimState::Playing;
    }

    /// Stops playback, keeping the current frame.
    pub fn stop(&mut self) {
        self.state = AnimState::Stopped;
    }

    /// Advances playback.
    pub fn update(&mut self, extrp: f64) {
        let Some(animation) = self.animation else {
            return;
        };
        let first = f64::from(animation.first);
        let last = f64::from(animation.last);
        let step = animation.speed * extrp;

        match self.state {
            AnimState::Playing => {
                self.current += step;
                if self.current >= last + 1.0 {
                    if animation.reverse {
                        self.current = last;
                        self.state = AnimState::Reversing;
                    } else if animation.repeat {
                        self.current = first;
                    } else {
                        self.current = last;
                        self.state = AnimState::Finished;
                    }
                }
            }
            AnimState::Reversing => {
                self.current -= step;
                if self.current < first {
                    self.current = first;
                    self.state = if animation.repeat {
                        AnimState::Playing
                    } else {
                        AnimState::Finished
                    };
                }
            }
            AnimState::Stopped | AnimState::Finished => {}
        }
    }

    /// Frame currently shown.
    #[must_use]
    pub fn frame(&self) -> u32 {
        match self.animation {
            Some(animation) => {
                let frame = self.current.floor().max(0.0) as u32;
                frame.clamp(animation.first, animation.last)
            }
            None => 0,
        }
    }

    /// Playback state.
    #[must_use]
    pub const fn state(&self) -> AnimState {
        self.state
    }

    /// Reports whether a non-repeating animation reached its end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == AnimState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_animation_finishes_on_last_frame() {
        let mut animator = Animator::new();
        animator.play(Animation::new(2, 4, 1.0, false, false).expect("valid"));
        let frames: Vec<_> = (0..4)
            .map(|_| {
                let frame = animator.frame();
                animator.update(1.0);
                frame
            })
            .collect();
        assert_eq!(frames, vec![2, 3, 4, 4]);
        assert!(animator.is_finished());
    }

    #[test]
    fn repeating_animation_wraps_to_first_frame() {
        let mut animator = Animator::new();
        animator.play(Animation::new(0, 1, 1.0, false, true).expect("valid"));
        animator.update(1.0);
        animator.update(1.0);
        assert_eq!(animator.frame(), 0);
        assert_eq!(animator.state(), AnimState::Playing);
    }

    #[test]
    fn reversing_animation_plays_back_then_finishes() {
        let mut animator = Animator::new();
        animator.play(Animation::new(0, 2, 1.0, true, false).expect("valid"));
        for _ in 0..3 {
            animator.update(1.0);
        }
        assert_eq!(animator.state(), AnimState::Reversing);
        assert_eq!(animator.frame(), 2);

        for _ in 0..3 {
            animator.update(1.0);
        }
        assert!(animator.is_finished());
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn animation_documents_default_their_flags() {
        let animation: Animation =
            toml::from_str("first = 1\nlast = 3\nspeed = 0.25\n").expect("valid document");
        assert!(!animation.reverse && !animation.repeat);
        assert!(animation.validate("walk").is_ok());
        assert!(toml::from_str::<Animation>("first = 1\nlast = 3\nspeed = 1.0\nloop = true\n").is_err());
    }

    #[test]
    fn invalid_animations_are_rejected() {
        assert!(Animation::new(5, 1, 1.0, false, false).is_err());
        assert!(Animation::new(0, 1, 0.0, false, false).is_err());
    }
}
