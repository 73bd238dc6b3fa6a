//! In-process event routing
//!
//! [`Dispatcher`] maps event categories, and optionally (category, change)
//! pairs, to ordered handler lists. It is a plain owned value: hold one per
//! session, there is no global registry. Registration is the only mutation;
//! dispatching never changes the registry, so a handler cannot re-register
//! from inside a dispatch pass (the borrow checker forbids it).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::error::Error;
use crate::event::{Event, EventStream, EventType};

/// What a handler wants the current dispatch pass to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Keep running the remaining handlers for this key
    Continue,
    /// Skip the remaining handlers for this key, for this event only
    Stop,
}

/// A registered event handler
///
/// Handler identity is the `Rc` allocation: registering the same `Handler`
/// value twice under one key is a no-op, while two separately built handlers
/// are always distinct, even if their closures are identical.
pub type Handler = Rc<RefCell<dyn FnMut(&Event) -> HandlerOutcome>>;

/// Wrap a closure into a registrable [`Handler`]
pub fn handler(f: impl FnMut(&Event) -> HandlerOutcome + 'static) -> Handler {
    Rc::new(RefCell::new(f))
}

/// Routing key for handler registration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    /// Every event of a category
    Category(EventType),
    /// Only events of a category with the given change subtype
    Change(EventType, String),
}

/// Ordered registry routing decoded events to handlers
///
/// # Example
///
/// ```ignore
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.on_change(EventType::Window, "focus", handler(|event| {
///     println!("focus moved: {event:?}");
///     HandlerOutcome::Continue
/// }));
/// let stream = Connection::connect()?.subscribe(&[EventType::Window])?;
/// dispatcher.run(stream)?;
/// ```
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<HandlerKey, Vec<Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `key`
    ///
    /// Handlers run in registration order. Registering a handler that is
    /// already present under the same key is a no-op.
    pub fn register(&mut self, key: HandlerKey, handler: Handler) {
        let list = self.handlers.entry(key).or_default();
        if list.iter().any(|existing| Rc::ptr_eq(existing, &handler)) {
            return;
        }
        list.push(handler);
    }

    /// Register a handler for every event of a category
    pub fn on(&mut self, event_type: EventType, handler: Handler) {
        self.register(HandlerKey::Category(event_type), handler);
    }

    /// Register a handler for one change subtype of a category
    pub fn on_change(&mut self, event_type: EventType, change: &str, handler: Handler) {
        self.register(HandlerKey::Change(event_type, change.to_string()), handler);
    }

    /// Run the handlers registered for `event`
    ///
    /// Category-level handlers run first, then handlers keyed on the event's
    /// change subtype, if it carries one. Within each list a
    /// [`HandlerOutcome::Stop`] skips the rest of that list for this event
    /// only; the next dispatch runs the full list again.
    pub fn dispatch(&self, event: &Event) {
        let event_type = event.event_type();
        trace!(?event_type, change = event.change(), "dispatching event");

        self.run_list(&HandlerKey::Category(event_type), event);
        if let Some(change) = event.change() {
            self.run_list(&HandlerKey::Change(event_type, change.to_string()), event);
        }
    }

    fn run_list(&self, key: &HandlerKey, event: &Event) {
        let Some(list) = self.handlers.get(key) else {
            return;
        };
        for handler in list {
            if handler.borrow_mut()(event) == HandlerOutcome::Stop {
                break;
            }
        }
    }

    /// Pull events from `stream` and dispatch each, until the stream ends
    /// or yields an error
    pub fn run(&self, stream: EventStream) -> Result<(), Error> {
        for event in stream {
            self.dispatch(&event?);
        }
        Ok(())
    }
}
