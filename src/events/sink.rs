use std::{cell::RefCell, rc::Rc};

use super::Event;

/// Receiver of canvas [`Event`]s.
pub trait EventSink {
    fn send(&self, event: Event);
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F: Fn(Event)> EventSink for FnSink<F> {
    fn send(&self, event: Event) {
        (self.0)(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Rc<S> {
    fn send(&self, event: Event) {
        (**self).send(event);
    }
}

#[cfg(feature = "events")]
impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        if self.try_send(event).is_err() {
            log::debug!("event receiver is gone, dropping event");
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the collected events.
    pub fn take(&self) -> Vec<Event> {
        self.events.take()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn send(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}
