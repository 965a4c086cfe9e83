//! Compilation event bus.
//!
//! Stages publish observable events (currently function decoration in
//! codegen) without knowing who listens. The host driver subscribes sinks
//! for telemetry; tests subscribe a recorder.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// An observable compilation event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    /// A lowered function received effect-derived decorations.
    FunctionDecorated {
        name: String,
        effects: Vec<String>,
    },
}

type Sink = Box<dyn Fn(&Event)>;

/// Publish/subscribe hub for [`Event`]s within one compilation.
///
/// Single-threaded by design -- the pipeline is synchronous, so sinks run
/// inline at the publish site.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Sink>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink invoked for every subsequently published event.
    pub fn subscribe(&mut self, sink: impl Fn(&Event) + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Subscribe a recorder that accumulates every published event.
    /// Returns the shared buffer for later inspection.
    pub fn subscribe_recorder(&mut self) -> Rc<RefCell<Vec<Event>>> {
        let buffer: Rc<RefCell<Vec<Event>>> = Rc::default();
        let handle = Rc::clone(&buffer);
        self.subscribe(move |event| handle.borrow_mut().push(event.clone()));
        buffer
    }

    /// Deliver `event` to every sink, in subscription order.
    pub fn publish(&self, event: Event) {
        for sink in &self.sinks {
            sink(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_sees_published_events() {
        let mut bus = EventBus::new();
        let recorded = bus.subscribe_recorder();

        bus.publish(Event::FunctionDecorated {
            name: "add".into(),
            effects: vec!["constexpr".into()],
        });

        let events = recorded.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            Event::FunctionDecorated {
                name: "add".into(),
                effects: vec!["constexpr".into()],
            }
        );
    }

    #[test]
    fn publish_without_sinks_is_a_no_op() {
        let bus = EventBus::new();
        bus.publish(Event::FunctionDecorated {
            name: "f".into(),
            effects: vec![],
        });
    }

    #[test]
    fn sinks_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order: Rc<RefCell<Vec<u8>>> = Rc::default();
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        bus.subscribe(move |_| first.borrow_mut().push(1));
        bus.subscribe(move |_| second.borrow_mut().push(2));

        bus.publish(Event::FunctionDecorated {
            name: "f".into(),
            effects: vec![],
        });
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
