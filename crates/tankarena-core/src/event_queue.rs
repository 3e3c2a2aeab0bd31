//! Append-only event buffer.
//!
//! Producers push owned [`Event`]s with [`EventQueue::register_event`]; a
//! single consumer drains them in insertion order between ticks. The queue
//! is a transport: it never reorders, deduplicates or inspects events.
//!
//! # Example
//!
//! ```
//! use tankarena_core::entity::EntityId;
//! use tankarena_core::event::{Event, EventKind};
//! use tankarena_core::event_queue::EventQueue;
//!
//! let mut queue = EventQueue::new();
//! queue.register_event(Event::level_loaded(1));
//! queue.register_event(Event::entity_moved(EntityId::new(0, 0)));
//!
//! let kinds: Vec<_> = queue.drain().map(|e| e.kind()).collect();
//! assert_eq!(kinds, vec![EventKind::LevelLoaded, EventKind::EntityMoved]);
//! assert!(queue.is_empty());
//! ```

use std::collections::vec_deque;
use std::collections::VecDeque;

use crate::event::{Event, EventKind};

/// FIFO buffer of owned events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Appends `event` to the tail.
    pub fn register_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Drains every event in insertion order.
    pub fn drain(&mut self) -> vec_deque::Drain<'_, Event> {
        self.events.drain(..)
    }

    /// Drains every event into a vector, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Iterates over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    /// Number of pending events of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards every pending event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Extend<Event> for EventQueue {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
