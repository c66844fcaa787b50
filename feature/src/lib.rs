#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Feature composition runtime.
//!
//! A [`Featurable`] is an identity carrying at most one [`Feature`] per
//! concrete type. A [`Handler`] owns a scene's featurables and drives them
//! through update and render passes using components registered in the
//! order the scene chooses. [`StateHandler`] provides declarative state
//! machines whose transitions are evaluated after every update.

pub mod animation;
pub mod component;
pub mod factory;
pub mod featurable;
pub mod feature;
pub mod features;
pub mod handler;
pub mod producer;
pub mod state;

pub use animation::{AnimState, Animation, Animator};
pub use component::{ComponentCollision, ComponentRefreshable, ComponentRendererLayer};
pub use factory::FactoryRegistry;
pub use featurable::{Featurable, FeaturableId};
pub use feature::{AsAny, Feature};
pub use features::{Animatable, Collidable, Rasterable, Transformable};
pub use handler::{ComponentRenderer, ComponentUpdater, Featurables, Handler, HandlerCommand};
pub use producer::{Producer, Producible, ProductionEvent, ProductionItem};
pub use state::{State, StateHandler, StateTarget};
