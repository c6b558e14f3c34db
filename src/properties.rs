//! Prop values and the rules for applying them to a host node.
//!
//! A prop name resolves, in order: an `on*` name becomes an event listener,
//! `class` takes the platform's class fast path, a name the platform exposes
//! as a native property is set as one, and everything else falls back to a
//! string attribute. The engine applies these rules; the platform only
//! answers `is_property` / `is_boolean_property`.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::arena::NodeId;
use crate::dom::RealDom;
use crate::events::{EventHandler, Invoker, ListenerCallback};
use crate::renderer::Renderer;

/// The value carried by a [`Prop`](crate::nodes::Prop).
///
/// `None` is a real value: diffing a prop down to `None` clears the native
/// property rather than leaving a stale one behind.
#[derive(Clone, Default)]
pub enum PropValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Listener(ListenerCallback),
    #[default]
    None,
}

impl PropValue {
    /// Wrap a single event handler.
    pub fn listener(handler: impl Fn(&crate::events::Event) + 'static) -> Self {
        PropValue::Listener(ListenerCallback::Single(Rc::new(handler)))
    }

    /// Wrap a list of handlers, invoked front to back.
    pub fn listeners(handlers: Vec<EventHandler>) -> Self {
        PropValue::Listener(ListenerCallback::List(handlers))
    }

    /// The value as a string, for attribute serialization.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            PropValue::Text(s) => Some(Cow::Borrowed(s)),
            PropValue::Int(n) => Some(Cow::Owned(n.to_string())),
            PropValue::Float(n) => Some(Cow::Owned(n.to_string())),
            PropValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            PropValue::Listener(_) | PropValue::None => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Listener(a), PropValue::Listener(b)) => a.ptr_eq(b),
            (PropValue::None, PropValue::None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            PropValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            PropValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Listener(cb) => f.debug_tuple("Listener").field(cb).finish(),
            PropValue::None => f.write_str("None"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// `onClick` -> `click`. Anything not shaped like an event name passes
/// through to the normal prop path.
fn event_name(prop: &str) -> Option<String> {
    let tail = prop.strip_prefix("on")?;
    if tail.is_empty() {
        return None;
    }
    Some(tail.to_lowercase())
}

impl<B: RealDom> Renderer<B> {
    /// Apply one prop change to a host node. `None` models removal; equal
    /// values short-circuit upstream.
    pub(crate) fn patch_prop(
        &mut self,
        id: NodeId,
        node: &B::Node,
        name: &str,
        new: Option<&PropValue>,
    ) {
        if let Some(event) = event_name(name) {
            self.patch_listener(id, node, &event, new);
            return;
        }

        if name == "class" {
            let class = new.and_then(PropValue::as_text).unwrap_or(Cow::Borrowed(""));
            self.backend.set_class(node, &class);
            return;
        }

        if self.backend.is_property(node, name) {
            match new {
                Some(value) => {
                    // An empty-string boolean property means "present", as in
                    // `disabled=""`.
                    let coerced;
                    let value = if self.backend.is_boolean_property(node, name)
                        && matches!(value, PropValue::Text(s) if s.is_empty())
                    {
                        coerced = PropValue::Bool(true);
                        &coerced
                    } else {
                        value
                    };
                    self.backend.set_property(node, name, value);
                }
                None => self.backend.set_property(node, name, &PropValue::None),
            }
            return;
        }

        match new.and_then(PropValue::as_text) {
            Some(text) => self.backend.set_attribute(node, name, &text),
            None => self.backend.remove_attribute(node, name),
        }
    }

    /// Keep the per-(node, event) invoker in sync with the latest callback.
    /// The invoker itself is registered with the platform exactly once and
    /// mutated in place afterwards, so rebinding a handler never churns the
    /// platform's listener table.
    fn patch_listener(&mut self, id: NodeId, node: &B::Node, event: &str, new: Option<&PropValue>) {
        let callback = match new {
            Some(PropValue::Listener(cb)) => Some(cb.clone()),
            Some(other) => {
                tracing::warn!(event, value = ?other, "non-listener value for event prop, ignoring");
                None
            }
            None => None,
        };

        let slots = self.listeners.entry(id).or_default();
        match (slots.get(event), callback) {
            (Some(invoker), Some(cb)) => invoker.replace(cb),
            (None, Some(cb)) => {
                let invoker = Rc::new(Invoker::new(cb));
                slots.insert(event.to_string(), invoker.clone());
                self.backend.add_event_listener(node, event, invoker);
            }
            (Some(_), None) => {
                if let Some(invoker) = slots.remove(event) {
                    self.backend.remove_event_listener(node, event, &invoker);
                }
            }
            (None, None) => {}
        }
    }
}
