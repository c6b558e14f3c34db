//! Arbor: renderer-agnostic virtual tree reconciliation.
//!
//! Callers describe a UI tree declaratively as a graph of [`VNode`] values and
//! hand it to [`Renderer::render`]. The engine diffs the new description
//! against the previously rendered one and applies the minimal set of
//! mutations to a live host tree. All host access goes through the [`RealDom`]
//! adapter trait, so the same engine drives a browser DOM, a terminal scene
//! graph, or the in-memory [`MemoryDom`] used by the test-suite.
//!
//! ```rust
//! use arbor::{create_renderer, Container, MemoryDom, VNode};
//!
//! let dom = MemoryDom::new();
//! let mut renderer = create_renderer(dom.clone());
//! let mut container = Container::new(dom.create_root());
//!
//! renderer.render(
//!     Some(VNode::element("div").prop("id", "app").text_content("hello")),
//!     &mut container,
//! );
//!
//! // Rendering `None` tears the tree back down.
//! renderer.render(None, &mut container);
//! ```
//!
//! The engine is fully synchronous: a call to `render` runs to completion with
//! no scheduling, suspension, or background work.

mod arena;
mod diff;
mod dom;
mod events;
mod memory;
mod nodes;
mod properties;
mod renderer;

pub use crate::arena::{HostArena, NodeId};
pub use crate::dom::RealDom;
pub use crate::events::{Event, EventHandler, Invoker, ListenerCallback};
pub use crate::memory::{MemoryDom, MemoryNode, Op};
pub use crate::nodes::{Children, Prop, VComponent, VElement, VFragment, VNode, VNodeKind, VText};
pub use crate::properties::PropValue;
pub use crate::renderer::{create_renderer, Container, Renderer};

/// A glob-importable set of the types most applications touch.
pub mod prelude {
    pub use crate::{
        create_renderer, Container, Event, PropValue, RealDom, Renderer, VNode,
    };
}
