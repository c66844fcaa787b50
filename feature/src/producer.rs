//! Stepwise production queues.

use std::collections::VecDeque;

use tessera_core::{EngineError, Result, Services};

use crate::{feature::Feature, featurable::Featurable};

/// Item waiting in a production queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductionItem {
    /// Factory tag of the produced featurable.
    pub kind: String,
    /// Steps required to complete the item.
    pub steps: u32,
}

/// Progress notification emitted by a [`Producer`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProductionEvent {
    /// Production of the head item began.
    Started {
        /// Tag of the item.
        kind: String,
    },
    /// Production advanced.
    Progressed {
        /// Tag of the item.
        kind: String,
        /// Accumulated steps.
        progress: f64,
        /// Steps required.
        steps: u32,
    },
    /// The head item completed and left the queue.
    Completed {
        /// Tag of the item.
        kind: String,
    },
    /// The head item cannot start yet.
    Blocked {
        /// Tag of the item.
        kind: String,
    },
    /// The queue ran empty.
    Idle,
}

type Check = Box<dyn Fn(&Featurable, &ProductionItem) -> bool>;

/// FIFO production queue advancing `speed` steps per tick.
///
/// While the head item waits to start, the production check is re-evaluated
/// every tick.
pub struct Producer {
    queue: VecDeque<ProductionItem>,
    speed: f64,
    progress: f64,
    producing: bool,
    blocked: bool,
    check: Option<Check>,
    events: Vec<ProductionEvent>,
}

impl Producer {
    /// Creates a producer advancing `speed` steps per tick.
    pub fn new(speed: f64) -> Result<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(EngineError::invalid(
                "producer",
                format!("production speed {speed} must be positive"),
            ));
        }
        Ok(Self {
            queue: VecDeque::new(),
            speed,
            progress: 0.0,
            producing: false,
            blocked: false,
            check: None,
            events: Vec::new(),
        })
    }

    /// Installs the check that decides whether the head item may start.
    #[must_use]
    pub fn with_check(
        mut self,
        check: impl Fn(&Featurable, &ProductionItem) -> bool + 'static,
    ) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Appends an item to the queue.
    pub fn enqueue(&mut self, item: ProductionItem) {
        self.queue.push_back(item);
    }

    /// Items still queued, head first.
    pub fn queue(&self) -> impl Iterator<Item = &ProductionItem> {
        self.queue.iter()
    }

    /// Reports whether the head item is being produced.
    #[must_use]
    pub const fn is_producing(&self) -> bool {
        self.producing
    }

    /// Accumulated steps of the head item.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Drains the events emitted since the last call.
    ///
    /// Undrained progress of one item collapses into its latest
    /// [`ProductionEvent::Progressed`], so the buffer grows with the number of
    /// items produced rather than with the number of ticks.
    pub fn take_events(&mut self) -> Vec<ProductionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances production by one tick.
    pub fn step(&mut self, extrp: f64, can_produce: impl Fn(&ProductionItem) -> bool) {
        let Some(head) = self.queue.front() else {
            return;
        };

        if !self.producing {
            if !can_produce(head) {
                if !self.blocked {
                    self.blocked = true;
                    self.events.push(ProductionEvent::Blocked {
                        kind: head.kind.clone(),
                    });
                }
                return;
            }
            self.blocked = false;
            self.producing = true;
            self.progress = 0.0;
            self.events.push(ProductionEvent::Started {
                kind: head.kind.clone(),
            });
        }

        let steps = f64::from(head.steps);
        self.progress = (self.progress + self.speed * extrp.max(0.0)).min(steps);
        match self.events.last_mut() {
            Some(ProductionEvent::Progressed { kind, progress, .. }) if *kind == head.kind => {
                *progress = self.progress;
            }
            _ => self.events.push(ProductionEvent::Progressed {
                kind: head.kind.clone(),
                progress: self.progress,
                steps: head.steps,
            }),
        }

        if self.progress >= steps {
            if let Some(done) = self.queue.pop_front() {
                self.events.push(ProductionEvent::Completed { kind: done.kind });
            }
            self.producing = false;
            self.progress = 0.0;
            if self.queue.is_empty() {
                self.events.push(ProductionEvent::Idle);
            }
        }
    }
}

impl Feature for Producer {
    fn update(&mut self, extrp: f64, owner: &mut Featurable, _services: &Services) {
        let check = self.check.take();
        self.step(extrp, |item| {
            check.as_ref().map_or(true, |check| check(owner, item))
        });
        self.check = check;
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("queue", &self.queue)
            .field("speed", &self.speed)
            .field("progress", &self.progress)
            .field("producing", &self.producing)
            .finish()
    }
}

/// Marks a featurable as something a [`Producer`] can build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Producible {
    kind: String,
    steps: u32,
}

impl Producible {
    /// Creates a producible of factory tag `kind` taking `steps` steps.
    #[must_use]
    pub fn new(kind: &str, steps: u32) -> Self {
        Self {
            kind: kind.to_owned(),
            steps,
        }
    }

    /// Factory tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Steps required.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Queue entry producing another featurable like this one.
    #[must_use]
    pub fn item(&self) -> ProductionItem {
        ProductionItem {
            kind: self.kind.clone(),
            steps: self.steps,
        }
    }
}

impl Feature for Producible {}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str, steps: u32) -> ProductionItem {
        ProductionItem {
            kind: kind.to_owned(),
            steps,
        }
    }

    #[test]
    fn queue_completes_items_in_order() {
        let mut producer = Producer::new(1.0).expect("valid speed");
        producer.enqueue(item("peasant", 2));
        producer.enqueue(item("footman", 1));

        for _ in 0..4 {
            producer.step(1.0, |_| true);
        }
        let completed: Vec<_> = producer
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                ProductionEvent::Completed { kind } => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec!["peasant".to_owned(), "footman".to_owned()]);
        assert!(!producer.is_producing());
    }

    #[test]
    fn events_follow_the_production_lifecycle() {
        let mut producer = Producer::new(0.5).expect("valid speed");
        producer.enqueue(item("farm", 1));
        producer.step(1.0, |_| true);
        assert_eq!(
            producer.take_events(),
            vec![
                ProductionEvent::Started {
                    kind: "farm".to_owned()
                },
                ProductionEvent::Progressed {
                    kind: "farm".to_owned(),
                    progress: 0.5,
                    steps: 1
                },
            ]
        );

        producer.step(1.0, |_| true);
        assert_eq!(
            producer.take_events(),
            vec![
                ProductionEvent::Progressed {
                    kind: "farm".to_owned(),
                    progress: 1.0,
                    steps: 1
                },
                ProductionEvent::Completed {
                    kind: "farm".to_owned()
                },
                ProductionEvent::Idle,
            ]
        );
    }

    #[test]
    fn undrained_progress_collapses_per_item() {
        let mut producer = Producer::new(1.0).expect("valid speed");
        producer.enqueue(item("castle", 500));
        for _ in 0..400 {
            producer.step(1.0, |_| true);
        }
        let events = producer.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            ProductionEvent::Progressed {
                kind: "castle".to_owned(),
                progress: 400.0,
                steps: 500
            }
        );
    }

    #[test]
    fn blocked_head_is_rechecked_every_tick() {
        let mut producer = Producer::new(1.0).expect("valid speed");
        producer.enqueue(item("tower", 3));
        let checks = std::cell::Cell::new(0);
        for _ in 0..3 {
            producer.step(1.0, |_| {
                checks.set(checks.get() + 1);
                false
            });
        }
        assert_eq!(checks.get(), 3);
        assert_eq!(
            producer.take_events(),
            vec![ProductionEvent::Blocked {
                kind: "tower".to_owned()
            }]
        );

        producer.step(1.0, |_| true);
        assert!(producer.is_producing());
        assert_eq!(producer.progress(), 1.0);
    }

    #[test]
    fn progress_never_decreases_while_producing() {
        let mut producer = Producer::new(0.75).expect("valid speed");
        producer.enqueue(item("wall", 5));
        let mut last = 0.0;
        while producer.queue().count() > 0 {
            producer.step(1.0, |_| true);
            if producer.is_producing() {
                assert!(producer.progress() >= last);
                last = producer.progress();
            }
        }
        assert_eq!(producer.progress(), 0.0);
    }
}
