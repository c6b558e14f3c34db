//! The public facade: a [`Renderer`] owns a platform backend plus the
//! bookkeeping that maps vnodes to host nodes, and [`Container`] remembers
//! the last tree rendered into a given host root.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::arena::{HostArena, NodeId};
use crate::dom::RealDom;
use crate::events::Invoker;
use crate::nodes::VNode;

/// Drives one host tree through a [`RealDom`] backend.
pub struct Renderer<B: RealDom> {
    pub(crate) backend: B,
    pub(crate) nodes: HostArena<B::Node>,
    pub(crate) listeners: FxHashMap<NodeId, FxHashMap<String, Rc<Invoker>>>,
}

/// A host root together with the vnode tree currently rendered into it.
pub struct Container<N> {
    host: N,
    vnode: Option<VNode>,
}

/// Build a renderer around a platform backend.
pub fn create_renderer<B: RealDom>(backend: B) -> Renderer<B> {
    Renderer {
        backend,
        nodes: HostArena::default(),
        listeners: FxHashMap::default(),
    }
}

impl<B: RealDom> Renderer<B> {
    /// Render `vnode` into `container`, diffing against whatever the
    /// container held from the previous call. `None` clears the container,
    /// unmounting the stored tree.
    pub fn render(&mut self, vnode: Option<VNode>, container: &mut Container<B::Node>) {
        if let Some(new) = vnode.as_ref() {
            let host = container.host.clone();
            self.patch(container.vnode.as_ref(), new, &host, None);
        } else if let Some(old) = container.vnode.take() {
            self.unmount(&old);
        }
        container.vnode = vnode;
    }

    /// Reuse server-produced host content instead of building it. Not wired
    /// up yet: logs and leaves the container untouched.
    pub fn hydrate(&mut self, vnode: Option<VNode>, container: &mut Container<B::Node>) {
        let _ = (vnode, container);
        tracing::warn!("hydration is not implemented, ignoring");
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of live host nodes tracked by this renderer. Drops back to
    /// zero once everything rendered has been unmounted.
    pub fn mounted_node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<N> Container<N> {
    pub fn new(host: N) -> Self {
        Self { host, vnode: None }
    }

    pub fn host(&self) -> &N {
        &self.host
    }

    /// The tree rendered by the most recent [`Renderer::render`] call.
    pub fn stored(&self) -> Option<&VNode> {
        self.vnode.as_ref()
    }
}
