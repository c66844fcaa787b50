//! Built-in features.

mod animatable;
mod collidable;
mod rasterable;
mod transformable;

pub use animatable::Animatable;
pub use collidable::Collidable;
pub use rasterable::Rasterable;
pub use transformable::Transformable;
