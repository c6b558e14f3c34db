//! An in-memory host tree.
//!
//! [`MemoryDom`] is a complete [`RealDom`] backend with no real platform
//! behind it: nodes live in a slab, structure is parent/child indices, and
//! every adapter call is recorded as an [`Op`]. The test-suite renders
//! against it and asserts on the recorded op sequence, the same way one
//! would assert on a mutation log.
//!
//! Handles are cheap clones of one shared tree, so tests keep a `MemoryDom`
//! for inspection while the renderer owns another.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slab::Slab;

use crate::dom::RealDom;
use crate::events::{Event, Invoker};
use crate::properties::PropValue;

/// Names the in-memory tree exposes as native properties rather than
/// attributes, mirroring the common host-platform set.
const NATIVE_PROPERTIES: &[&str] = &[
    "id", "value", "form", "disabled", "checked", "hidden", "selected", "multiple", "muted",
];

const BOOLEAN_PROPERTIES: &[&str] = &[
    "disabled", "checked", "hidden", "selected", "multiple", "muted",
];

/// Handle to a node in a [`MemoryDom`] tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MemoryNode(usize);

impl MemoryNode {
    pub fn id(&self) -> usize {
        self.0
    }
}

/// One recorded adapter call. Ids are the raw slab indices of the nodes
/// involved.
#[derive(Clone, PartialEq, Debug)]
pub enum Op {
    CreateElement { id: usize, tag: String },
    CreateText { id: usize, text: String },
    SetText { id: usize, text: String },
    SetElementText { id: usize, text: String },
    Insert { id: usize, parent: usize, anchor: Option<usize> },
    Remove { id: usize },
    SetProperty { id: usize, name: String, value: PropValue },
    SetAttribute { id: usize, name: String, value: String },
    RemoveAttribute { id: usize, name: String },
    SetClass { id: usize, value: String },
    AddListener { id: usize, event: String },
    RemoveListener { id: usize, event: String },
}

#[derive(Clone, Debug, PartialEq)]
enum NodeKind {
    Element { tag: String },
    Text,
}

struct NodeData {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
    text: String,
    attrs: FxHashMap<String, String>,
    props: FxHashMap<String, PropValue>,
    class: String,
    listeners: FxHashMap<String, Rc<Invoker>>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            text: String::new(),
            attrs: FxHashMap::default(),
            props: FxHashMap::default(),
            class: String::new(),
            listeners: FxHashMap::default(),
        }
    }
}

#[derive(Default)]
struct Tree {
    nodes: Slab<NodeData>,
    ops: Vec<Op>,
}

impl Tree {
    fn detach(&mut self, id: usize) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&child| child != id);
        }
    }
}

/// The shared in-memory host tree.
#[derive(Clone, Default)]
pub struct MemoryDom {
    inner: Rc<RefCell<Tree>>,
}

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.inner.borrow();
        f.debug_struct("MemoryDom")
            .field("nodes", &tree.nodes.len())
            .field("pending_ops", &tree.ops.len())
            .finish()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to render into. Not recorded as an op, so
    /// op logs start with the engine's own work.
    pub fn create_root(&self) -> MemoryNode {
        let mut tree = self.inner.borrow_mut();
        let id = tree.nodes.insert(NodeData::new(NodeKind::Element {
            tag: "root".to_string(),
        }));
        MemoryNode(id)
    }

    /// Drain and return every op recorded since the last call.
    pub fn take_ops(&self) -> Vec<Op> {
        std::mem::take(&mut self.inner.borrow_mut().ops)
    }

    /// Fire an event at a node, running whatever invoker is registered for
    /// `event.name`. The tree is not borrowed while the handler runs.
    pub fn dispatch(&self, node: MemoryNode, event: &Event) {
        let invoker = self.inner.borrow().nodes[node.0].listeners.get(&event.name).cloned();
        if let Some(invoker) = invoker {
            invoker.dispatch(event);
        }
    }

    pub fn children_of(&self, node: MemoryNode) -> Vec<MemoryNode> {
        self.inner.borrow().nodes[node.0]
            .children
            .iter()
            .map(|&id| MemoryNode(id))
            .collect()
    }

    pub fn parent_of(&self, node: MemoryNode) -> Option<MemoryNode> {
        self.inner.borrow().nodes[node.0].parent.map(MemoryNode)
    }

    /// The tag of an element node, `None` for text nodes.
    pub fn tag_of(&self, node: MemoryNode) -> Option<String> {
        match &self.inner.borrow().nodes[node.0].kind {
            NodeKind::Element { tag } => Some(tag.clone()),
            NodeKind::Text => None,
        }
    }

    /// Text content: the node's own text for text nodes, the element text
    /// set through `set_element_text` otherwise.
    pub fn text_of(&self, node: MemoryNode) -> String {
        self.inner.borrow().nodes[node.0].text.clone()
    }

    pub fn attr_of(&self, node: MemoryNode, name: &str) -> Option<String> {
        self.inner.borrow().nodes[node.0].attrs.get(name).cloned()
    }

    pub fn prop_of(&self, node: MemoryNode, name: &str) -> Option<PropValue> {
        self.inner.borrow().nodes[node.0].props.get(name).cloned()
    }

    pub fn class_of(&self, node: MemoryNode) -> String {
        self.inner.borrow().nodes[node.0].class.clone()
    }

    pub fn has_listener(&self, node: MemoryNode, event: &str) -> bool {
        self.inner.borrow().nodes[node.0].listeners.contains_key(event)
    }
}

impl RealDom for MemoryDom {
    type Node = MemoryNode;

    fn create_element(&mut self, tag: &str) -> MemoryNode {
        let mut tree = self.inner.borrow_mut();
        let id = tree.nodes.insert(NodeData::new(NodeKind::Element {
            tag: tag.to_string(),
        }));
        tree.ops.push(Op::CreateElement {
            id,
            tag: tag.to_string(),
        });
        MemoryNode(id)
    }

    fn create_text(&mut self, text: &str) -> MemoryNode {
        let mut tree = self.inner.borrow_mut();
        let mut data = NodeData::new(NodeKind::Text);
        data.text = text.to_string();
        let id = tree.nodes.insert(data);
        tree.ops.push(Op::CreateText {
            id,
            text: text.to_string(),
        });
        MemoryNode(id)
    }

    fn set_text(&mut self, node: &MemoryNode, text: &str) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0].text = text.to_string();
        tree.ops.push(Op::SetText {
            id: node.0,
            text: text.to_string(),
        });
    }

    fn set_element_text(&mut self, node: &MemoryNode, text: &str) {
        let mut tree = self.inner.borrow_mut();
        let children = std::mem::take(&mut tree.nodes[node.0].children);
        for child in children {
            tree.nodes[child].parent = None;
        }
        tree.nodes[node.0].text = text.to_string();
        tree.ops.push(Op::SetElementText {
            id: node.0,
            text: text.to_string(),
        });
    }

    fn insert(&mut self, node: &MemoryNode, parent: &MemoryNode, anchor: Option<&MemoryNode>) {
        if anchor == Some(node) {
            return;
        }
        let mut tree = self.inner.borrow_mut();
        tree.detach(node.0);
        let position = match anchor {
            Some(anchor) => tree.nodes[parent.0]
                .children
                .iter()
                .position(|&child| child == anchor.0),
            None => None,
        };
        match position {
            Some(position) => tree.nodes[parent.0].children.insert(position, node.0),
            None => tree.nodes[parent.0].children.push(node.0),
        }
        tree.nodes[node.0].parent = Some(parent.0);
        tree.ops.push(Op::Insert {
            id: node.0,
            parent: parent.0,
            anchor: anchor.map(|a| a.0),
        });
    }

    fn remove(&mut self, node: &MemoryNode) {
        let mut tree = self.inner.borrow_mut();
        if tree.nodes[node.0].parent.is_none() {
            // Already detached; removing again is defined to do nothing.
            return;
        }
        tree.detach(node.0);
        tree.ops.push(Op::Remove { id: node.0 });
    }

    fn set_property(&mut self, node: &MemoryNode, name: &str, value: &PropValue) {
        let mut tree = self.inner.borrow_mut();
        if matches!(value, PropValue::None) {
            tree.nodes[node.0].props.remove(name);
        } else {
            tree.nodes[node.0]
                .props
                .insert(name.to_string(), value.clone());
        }
        tree.ops.push(Op::SetProperty {
            id: node.0,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn set_attribute(&mut self, node: &MemoryNode, name: &str, value: &str) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
        tree.ops.push(Op::SetAttribute {
            id: node.0,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, node: &MemoryNode, name: &str) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0].attrs.remove(name);
        tree.ops.push(Op::RemoveAttribute {
            id: node.0,
            name: name.to_string(),
        });
    }

    fn set_class(&mut self, node: &MemoryNode, value: &str) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0].class = value.to_string();
        tree.ops.push(Op::SetClass {
            id: node.0,
            value: value.to_string(),
        });
    }

    fn is_property(&self, node: &MemoryNode, name: &str) -> bool {
        let tree = self.inner.borrow();
        let NodeKind::Element { tag } = &tree.nodes[node.0].kind else {
            return false;
        };
        // `form` reflects a read-only property on inputs, so it has to go
        // through the attribute path there.
        if name == "form" && tag == "input" {
            return false;
        }
        NATIVE_PROPERTIES.contains(&name)
    }

    fn is_boolean_property(&self, node: &MemoryNode, name: &str) -> bool {
        let tree = self.inner.borrow();
        matches!(tree.nodes[node.0].kind, NodeKind::Element { .. })
            && BOOLEAN_PROPERTIES.contains(&name)
    }

    fn add_event_listener(&mut self, node: &MemoryNode, event: &str, invoker: Rc<Invoker>) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0].listeners.insert(event.to_string(), invoker);
        tree.ops.push(Op::AddListener {
            id: node.0,
            event: event.to_string(),
        });
    }

    fn remove_event_listener(&mut self, node: &MemoryNode, event: &str, _invoker: &Rc<Invoker>) {
        let mut tree = self.inner.borrow_mut();
        tree.nodes[node.0].listeners.remove(event);
        tree.ops.push(Op::RemoveListener {
            id: node.0,
            event: event.to_string(),
        });
    }
}
