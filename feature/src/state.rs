//! Declarative state machine driven by two frame phases.

use std::{collections::HashMap, fmt, hash::Hash};

use tracing::warn;

/// Node of a [`StateHandler`].
pub trait State<M> {
    /// Called once when the state becomes current.
    fn enter(&mut self, model: &mut M) {
        let _ = model;
    }

    /// Called every frame while the state is current.
    fn update(&mut self, model: &mut M, extrp: f64) {
        let _ = (model, extrp);
    }

    /// Called once when the state stops being current.
    fn exit(&mut self, model: &mut M) {
        let _ = model;
    }
}

/// Destination of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateTarget<K> {
    /// A specific state.
    State(K),
    /// The state that was current before the current one.
    Previous,
}

type Predicate<M> = Box<dyn Fn(&M) -> bool>;

struct Transition<K, M> {
    target: StateTarget<K>,
    predicate: Predicate<M>,
}

/// Runs the current state and switches states between frames.
///
/// [`StateHandler::update`] only runs the current state. Transitions are
/// evaluated by [`StateHandler::post_update`], in declaration order, and the
/// first satisfied predicate wins. A state requested through
/// [`StateHandler::change_state`] takes precedence over the transitions.
pub struct StateHandler<K, M> {
    states: HashMap<K, Box<dyn State<M>>>,
    transitions: HashMap<K, Vec<Transition<K, M>>>,
    current: Option<K>,
    previous: Option<K>,
    requested: Option<K>,
}

impl<K, M> Default for StateHandler<K, M> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            transitions: HashMap::new(),
            current: None,
            previous: None,
            requested: None,
        }
    }
}

impl<K, M> StateHandler<K, M>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a handler without states.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the state reached through `key`.
    pub fn add_state(&mut self, key: K, state: impl State<M> + 'static) {
        let _ = self.states.insert(key, Box::new(state));
    }

    /// Declares a transition out of `from`, taken when `predicate` holds.
    pub fn add_transition(
        &mut self,
        from: K,
        target: StateTarget<K>,
        predicate: impl Fn(&M) -> bool + 'static,
    ) {
        self.transitions.entry(from).or_default().push(Transition {
            target,
            predicate: Box::new(predicate),
        });
    }

    /// Requests a switch to `key` at the next [`StateHandler::post_update`].
    pub fn change_state(&mut self, key: K) {
        self.requested = Some(key);
    }

    /// Runs the current state, if any.
    pub fn update(&mut self, model: &mut M, extrp: f64) {
        if let Some(state) = self.current.and_then(|key| self.states.get_mut(&key)) {
            state.update(model, extrp);
        }
    }

    /// Applies a requested change or the first satisfied transition.
    pub fn post_update(&mut self, model: &mut M) {
        let next = match self.requested.take() {
            Some(key) => Some(key),
            None => self.evaluate(model),
        };
        let Some(next) = next else {
            return;
        };
        if !self.states.contains_key(&next) {
            warn!(state = ?next, "transition to unregistered state ignored");
            return;
        }

        if let Some(state) = self.current.and_then(|key| self.states.get_mut(&key)) {
            state.exit(model);
        }
        self.previous = self.current;
        self.current = Some(next);
        if let Some(state) = self.states.get_mut(&next) {
            state.enter(model);
        }
    }

    fn evaluate(&self, model: &M) -> Option<K> {
        let current = self.current?;
        self.transitions
            .get(&current)?
            .iter()
            .filter(|transition| (transition.predicate)(model))
            .find_map(|transition| match transition.target {
                StateTarget::State(key) => Some(key),
                StateTarget::Previous => self.previous,
            })
    }

    /// Reports whether `key` is the current state.
    #[must_use]
    pub fn is_state(&self, key: K) -> bool {
        self.current == Some(key)
    }

    /// Current state, if any.
    #[must_use]
    pub const fn current(&self) -> Option<K> {
        self.current
    }

    /// State that was current before the current one.
    #[must_use]
    pub const fn previous(&self) -> Option<K> {
        self.previous
    }
}

impl<K: fmt::Debug, M> fmt::Debug for StateHandler<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandler")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("requested", &self.requested)
            .field("states", &self.states.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Key {
        Idle,
        Walk,
        Attack,
    }

    #[derive(Debug, Default)]
    struct Model {
        log: Vec<String>,
        speed: f64,
        attack_pressed: bool,
        attack_done: bool,
    }

    struct Logging(&'static str);

    impl State<Model> for Logging {
        fn enter(&mut self, model: &mut Model) {
            model.log.push(format!("enter {}", self.0));
        }

        fn update(&mut self, model: &mut Model, _extrp: f64) {
            model.log.push(format!("update {}", self.0));
        }

        fn exit(&mut self, model: &mut Model) {
            model.log.push(format!("exit {}", self.0));
        }
    }

    fn machine() -> StateHandler<Key, Model> {
        let mut handler = StateHandler::new();
        handler.add_state(Key::Idle, Logging("idle"));
        handler.add_state(Key::Walk, Logging("walk"));
        handler.add_state(Key::Attack, Logging("attack"));
        handler.add_transition(Key::Idle, StateTarget::State(Key::Attack), |m: &Model| {
            m.attack_pressed
        });
        handler.add_transition(Key::Idle, StateTarget::State(Key::Walk), |m: &Model| {
            m.speed > 0.0
        });
        handler.add_transition(Key::Walk, StateTarget::State(Key::Attack), |m: &Model| {
            m.attack_pressed
        });
        handler.add_transition(Key::Attack, StateTarget::Previous, |m: &Model| m.attack_done);
        handler
    }

    #[test]
    fn fresh_handler_is_inert() {
        let mut handler = machine();
        let mut model = Model::default();
        handler.update(&mut model, 1.0);
        handler.post_update(&mut model);
        assert!(model.log.is_empty());
        assert_eq!(handler.current(), None);
    }

    #[test]
    fn change_state_applies_at_post_update() {
        let mut handler = machine();
        let mut model = Model::default();
        handler.change_state(Key::Idle);
        assert!(!handler.is_state(Key::Idle));
        handler.update(&mut model, 1.0);
        assert!(!handler.is_state(Key::Idle));

        handler.post_update(&mut model);
        assert!(handler.is_state(Key::Idle));
        assert_eq!(model.log, vec!["enter idle"]);
    }

    #[test]
    fn first_declared_transition_wins() {
        let mut handler = machine();
        let mut model = Model::default();
        handler.change_state(Key::Idle);
        handler.post_update(&mut model);

        model.speed = 2.0;
        model.attack_pressed = true;
        handler.post_update(&mut model);
        assert!(handler.is_state(Key::Attack));
        assert_eq!(model.log, vec!["enter idle", "exit idle", "enter attack"]);
    }

    #[test]
    fn previous_target_returns_to_predecessor() {
        let mut handler = machine();
        let mut model = Model::default();
        handler.change_state(Key::Walk);
        handler.post_update(&mut model);

        model.attack_pressed = true;
        handler.post_update(&mut model);
        assert!(handler.is_state(Key::Attack));

        model.attack_pressed = false;
        model.attack_done = true;
        handler.update(&mut model, 1.0);
        handler.post_update(&mut model);
        assert!(handler.is_state(Key::Walk));
        assert_eq!(
            model.log,
            vec![
                "enter walk",
                "exit walk",
                "enter attack",
                "update attack",
                "exit attack",
                "enter walk"
            ]
        );
    }

    #[test]
    fn transitions_wait_for_predicates() {
        let mut handler = machine();
        let mut model = Model::default();
        handler.change_state(Key::Idle);
        handler.post_update(&mut model);
        for _ in 0..3 {
            handler.update(&mut model, 1.0);
            handler.post_update(&mut model);
        }
        assert!(handler.is_state(Key::Idle));
        assert_eq!(model.log.iter().filter(|line| *line == "enter idle").count(), 1);
    }
}
