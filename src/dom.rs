//! The adapter boundary between the engine and a concrete host tree.
//!
//! The engine never touches a real UI technology. Every structural or
//! attribute change flows through [`RealDom`], so one diffing core can drive
//! a browser DOM, a terminal, a scene graph, or the in-memory tree used by
//! the test suite.

use std::fmt::Debug;
use std::rc::Rc;

use crate::events::Invoker;
use crate::properties::PropValue;

/// Operations a host platform must provide.
///
/// The engine calls these in a specific discipline:
/// - nodes are fully configured (props, listeners, children) before they are
///   inserted into their parent;
/// - `insert` with `anchor: None` appends, otherwise the node lands
///   immediately before the anchor;
/// - `remove` on a node that is not attached anywhere is a no-op, not an
///   error.
pub trait RealDom {
    /// The platform's node handle. Cheap to clone; equality means "same host
    /// node".
    type Node: Clone + PartialEq + Debug;

    /// Create a detached element with the given tag.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a detached text node with the given content.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Replace the content of a text node.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Replace *all* children of an element with a single text run. An empty
    /// string clears the element.
    fn set_element_text(&mut self, node: &Self::Node, text: &str);

    /// Attach `node` under `parent`, before `anchor` when given, otherwise at
    /// the end. A node that is already attached elsewhere moves.
    fn insert(&mut self, node: &Self::Node, parent: &Self::Node, anchor: Option<&Self::Node>);

    /// Detach `node` from its parent. Does nothing when already detached.
    fn remove(&mut self, node: &Self::Node);

    /// Set a native property. `PropValue::None` clears it back to the
    /// platform default.
    fn set_property(&mut self, node: &Self::Node, name: &str, value: &PropValue);

    /// Set an attribute to a string value.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute entirely.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Set the class list. The platform may route this through a faster path
    /// than generic attributes.
    fn set_class(&mut self, node: &Self::Node, value: &str);

    /// Whether `name` exists as a native property on this node, e.g. `value`
    /// on an input. Decides property-vs-attribute routing.
    fn is_property(&self, node: &Self::Node, name: &str) -> bool;

    /// Whether the property is boolean-typed, e.g. `disabled`.
    fn is_boolean_property(&self, node: &Self::Node, name: &str) -> bool;

    /// Register the invoker for `event` on this node. Called at most once per
    /// (node, event) pair; callback swaps happen inside the invoker.
    fn add_event_listener(&mut self, node: &Self::Node, event: &str, invoker: Rc<Invoker>);

    /// Unregister the invoker for `event`.
    fn remove_event_listener(&mut self, node: &Self::Node, event: &str, invoker: &Rc<Invoker>);
}
