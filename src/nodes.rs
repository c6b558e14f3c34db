//! The virtual node graph: lightweight descriptions of what the host tree
//! should look like.
//!
//! A [`VNode`] is pure data plus one piece of engine-owned bookkeeping: the
//! `mount` cell holding the [`NodeId`] of the host node it currently
//! materializes as. The cell is empty until the node is mounted, and patching
//! *moves* the id from the old vnode to the new one, never copies it.

use std::cell::Cell;

use crate::arena::NodeId;
use crate::events::{EventHandler, ListenerCallback};
use crate::properties::PropValue;

/// One node of a declarative UI tree.
#[derive(Debug)]
pub struct VNode {
    pub kind: VNodeKind,
    /// Stable identity among siblings, used to match nodes across renders
    /// independently of position. Unique per sibling list when present.
    pub key: Option<String>,
    mount: Cell<Option<NodeId>>,
}

/// The closed set of node kinds the engine understands.
#[derive(Clone, Debug)]
pub enum VNodeKind {
    Element(VElement),
    Text(VText),
    Fragment(VFragment),
    /// Declared for forward compatibility; the engine currently skips these
    /// with a warning. See [`VComponent`].
    Component(VComponent),
}

#[derive(Clone, Debug)]
pub struct VElement {
    pub tag: String,
    pub props: Vec<Prop>,
    pub children: Children,
}

#[derive(Clone, Debug)]
pub struct VText {
    pub text: String,
}

/// A grouping node with no host representation of its own; its children land
/// directly in the surrounding container.
#[derive(Clone, Debug)]
pub struct VFragment {
    pub children: Children,
}

/// Descriptor for a user-defined component. A stable extension point: the
/// variant exists so trees can carry components today, but the engine does not
/// yet expand them.
#[derive(Clone, Debug)]
pub struct VComponent {
    pub name: &'static str,
}

/// A single attribute, property, or event binding on an element.
#[derive(Clone, Debug)]
pub struct Prop {
    pub name: String,
    pub value: PropValue,
}

/// What an element (or fragment) contains. The three shapes diff differently,
/// so this is a real variant type rather than an inferred one.
#[derive(Clone, Debug, Default)]
pub enum Children {
    /// No children at all.
    #[default]
    None,
    /// A single run of text, set through the adapter's `set_element_text`.
    Text(String),
    /// An ordered list of child vnodes.
    Nodes(Vec<VNode>),
}

impl VNode {
    /// An element node with the given tag and no props or children.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::from_kind(VNodeKind::Element(VElement {
            tag: tag.into(),
            props: Vec::new(),
            children: Children::None,
        }))
    }

    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(VNodeKind::Text(VText { text: text.into() }))
    }

    /// A fragment wrapping an ordered list of children.
    pub fn fragment(children: Vec<VNode>) -> Self {
        Self::from_kind(VNodeKind::Fragment(VFragment {
            children: Children::Nodes(children),
        }))
    }

    /// A component placeholder. Rendering one is currently a no-op.
    pub fn component(name: &'static str) -> Self {
        Self::from_kind(VNodeKind::Component(VComponent { name }))
    }

    fn from_kind(kind: VNodeKind) -> Self {
        Self {
            kind,
            key: None,
            mount: Cell::new(None),
        }
    }

    /// Attach a sibling key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a prop. Only meaningful on element nodes.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        match &mut self.kind {
            VNodeKind::Element(el) => el.props.push(Prop {
                name: name.into(),
                value: value.into(),
            }),
            _ => debug_assert!(false, "props only apply to element nodes"),
        }
        self
    }

    /// Bind an event handler, e.g. `.on("click", |_| ...)`. Sugar for a
    /// `on<event>` listener prop.
    pub fn on(self, event: &str, handler: impl Fn(&crate::events::Event) + 'static) -> Self {
        let handler: EventHandler = std::rc::Rc::new(handler);
        self.prop(
            format!("on{event}"),
            PropValue::Listener(ListenerCallback::Single(handler)),
        )
    }

    /// Replace the children with an ordered list.
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        match &mut self.kind {
            VNodeKind::Element(el) => el.children = Children::Nodes(children),
            VNodeKind::Fragment(frag) => frag.children = Children::Nodes(children),
            _ => debug_assert!(false, "children only apply to element and fragment nodes"),
        }
        self
    }

    /// Replace the children with a single text run.
    pub fn text_content(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            VNodeKind::Element(el) => el.children = Children::Text(text.into()),
            VNodeKind::Fragment(frag) => frag.children = Children::Text(text.into()),
            _ => debug_assert!(false, "text content only applies to element and fragment nodes"),
        }
        self
    }

    pub(crate) fn mount(&self) -> Option<NodeId> {
        self.mount.get()
    }

    pub(crate) fn set_mount(&self, id: NodeId) {
        debug_assert!(self.mount.get().is_none(), "vnode mounted twice");
        self.mount.set(Some(id));
    }

    /// Take the mount id out of this vnode, transferring ownership of the
    /// host node to the caller.
    pub(crate) fn take_mount(&self) -> Option<NodeId> {
        self.mount.take()
    }
}

/// Cloning copies the description only. The clone is unmounted: mount ids are
/// owned by exactly one vnode and never duplicated.
impl Clone for VNode {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            key: self.key.clone(),
            mount: Cell::new(None),
        }
    }
}

impl Children {
    /// The child list, when this is the list shape.
    pub fn as_nodes(&self) -> Option<&[VNode]> {
        match self {
            Children::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }
}
