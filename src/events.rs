//! The synthetic event layer shared by the engine and its adapters.
//!
//! Renderers convert native host events into [`Event`] values and feed them to
//! the [`Invoker`] the engine registered for that node and event name. The
//! invoker is a stable indirection: it is handed to the host exactly once, and
//! later renders swap the callback it holds without re-registering anything.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// A callback bound to an event prop, shared between vnode descriptions.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// A host event as seen by handlers.
#[derive(Clone, Debug)]
pub struct Event {
    /// Lower-case event name, e.g. `click`.
    pub name: String,
    /// When the host observed the event. Invokers drop events that precede
    /// their own attach time.
    pub timestamp: Instant,
}

impl Event {
    /// An event stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::at(name, Instant::now())
    }

    /// An event with an explicit timestamp, for hosts that record the real
    /// observation time (and for tests that need to synthesize stale events).
    pub fn at(name: impl Into<String>, timestamp: Instant) -> Self {
        Self {
            name: name.into(),
            timestamp,
        }
    }
}

/// The callback side of a listener prop: one handler, or an ordered list that
/// is invoked front to back.
#[derive(Clone)]
pub enum ListenerCallback {
    Single(EventHandler),
    List(Vec<EventHandler>),
}

impl ListenerCallback {
    pub fn invoke(&self, event: &Event) {
        match self {
            ListenerCallback::Single(handler) => handler(event),
            ListenerCallback::List(handlers) => {
                for handler in handlers {
                    handler(event);
                }
            }
        }
    }

    /// Pointer identity, the same notion of "changed" the diff uses for
    /// listener props.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ListenerCallback::Single(a), ListenerCallback::Single(b)) => Rc::ptr_eq(a, b),
            (ListenerCallback::List(a), ListenerCallback::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ListenerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerCallback::Single(_) => f.write_str("ListenerCallback::Single(..)"),
            ListenerCallback::List(handlers) => {
                write!(f, "ListenerCallback::List(len = {})", handlers.len())
            }
        }
    }
}

/// The stable object registered with a host's event-binding primitive.
///
/// One invoker exists per (node, event name). Rebinding a handler goes through
/// [`Invoker::replace`], which also refreshes the attach timestamp, so an
/// event that was already in flight when the handler changed never reaches the
/// new handler.
#[derive(Debug)]
pub struct Invoker {
    value: RefCell<ListenerCallback>,
    attached: Cell<Instant>,
}

impl Invoker {
    pub(crate) fn new(value: ListenerCallback) -> Self {
        Self {
            value: RefCell::new(value),
            attached: Cell::new(Instant::now()),
        }
    }

    /// Swap the callback without touching the host registration.
    pub(crate) fn replace(&self, value: ListenerCallback) {
        *self.value.borrow_mut() = value;
        self.attached.set(Instant::now());
    }

    /// Deliver an event. Events stamped at or before the attach time are
    /// discarded: they describe interactions with a tree this handler never
    /// saw.
    pub fn dispatch(&self, event: &Event) {
        if event.timestamp <= self.attached.get() {
            tracing::trace!(name = %event.name, "dropping event older than its handler");
            return;
        }
        let callback = self.value.borrow().clone();
        callback.invoke(event);
    }
}
