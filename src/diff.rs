//! The diffing engine: reconcile an old vnode tree against a new one,
//! emitting the minimal set of adapter calls to morph the host tree.
//!
//! Dispatch is by node kind. Two nodes of the same shape (same kind, and for
//! elements the same tag) patch in place; a shape change tears the old tree
//! down and mounts the new one fresh. Keyed child lists reconcile through a
//! longest-increasing-subsequence pass so reorders move only the nodes that
//! actually have to move.

use longest_increasing_subsequence::lis;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::arena::NodeId;
use crate::dom::RealDom;
use crate::nodes::{Children, Prop, VElement, VFragment, VNode, VNodeKind, VText};
use crate::renderer::Renderer;

/// Sentinel in the new->old index map for children with no match.
const NO_MATCH: usize = usize::MAX;

fn same_shape(old: &VNode, new: &VNode) -> bool {
    match (&old.kind, &new.kind) {
        (VNodeKind::Text(_), VNodeKind::Text(_)) => true,
        (VNodeKind::Fragment(_), VNodeKind::Fragment(_)) => true,
        (VNodeKind::Element(a), VNodeKind::Element(b)) => a.tag == b.tag,
        (VNodeKind::Component(a), VNodeKind::Component(b)) => a.name == b.name,
        _ => false,
    }
}

impl<B: RealDom> Renderer<B> {
    /// Reconcile `new` against `old` inside `container`. Freshly created
    /// hosts land before `anchor`, or at the end when `anchor` is `None`.
    pub(crate) fn patch(
        &mut self,
        mut old: Option<&VNode>,
        new: &VNode,
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        if let Some(prev) = old {
            if !same_shape(prev, new) {
                self.unmount(prev);
                old = None;
            }
        }

        match &new.kind {
            VNodeKind::Text(text) => match old {
                Some(prev) => self.patch_text(prev, new, text, container, anchor),
                None => self.mount_text(new, text, container, anchor),
            },
            VNodeKind::Element(el) => match old {
                Some(prev) => self.patch_element(prev, new, el, container, anchor),
                None => self.mount_element(new, el, container, anchor),
            },
            VNodeKind::Fragment(frag) => match old {
                Some(prev) => self.patch_fragment(prev, frag, container, anchor),
                None => self.mount_fragment(frag, container, anchor),
            },
            VNodeKind::Component(comp) => {
                tracing::warn!(name = comp.name, "component nodes are not expanded yet, skipping");
            }
        }
    }

    fn mount_text(&mut self, vnode: &VNode, text: &VText, container: &B::Node, anchor: Option<&B::Node>) {
        let host = self.backend.create_text(&text.text);
        let id = self.nodes.allocate(host.clone());
        vnode.set_mount(id);
        self.backend.insert(&host, container, anchor);
    }

    fn patch_text(
        &mut self,
        prev: &VNode,
        new: &VNode,
        text: &VText,
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        let Some(id) = prev.take_mount() else {
            // Old vnode never made it into the host tree; mount from scratch.
            self.mount_text(new, text, container, anchor);
            return;
        };
        new.set_mount(id);

        if let VNodeKind::Text(old_text) = &prev.kind {
            if old_text.text == text.text {
                return;
            }
        }
        let host = self.nodes[id].clone();
        self.backend.set_text(&host, &text.text);
    }

    /// Hosts are configured completely (props, listeners, children) while
    /// still detached, then inserted in one move.
    fn mount_element(&mut self, vnode: &VNode, el: &VElement, container: &B::Node, anchor: Option<&B::Node>) {
        let host = self.backend.create_element(&el.tag);
        let id = self.nodes.allocate(host.clone());
        vnode.set_mount(id);

        for prop in &el.props {
            self.patch_prop(id, &host, &prop.name, Some(&prop.value));
        }

        match &el.children {
            Children::None => {}
            Children::Text(text) => self.backend.set_element_text(&host, text),
            Children::Nodes(children) => {
                for child in children {
                    self.patch(None, child, &host, None);
                }
            }
        }

        self.backend.insert(&host, container, anchor);
    }

    fn patch_element(
        &mut self,
        prev: &VNode,
        new: &VNode,
        el: &VElement,
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        let Some(id) = prev.take_mount() else {
            self.mount_element(new, el, container, anchor);
            return;
        };
        new.set_mount(id);
        let host = self.nodes[id].clone();

        let no_props: Vec<Prop> = Vec::new();
        let no_children = Children::None;
        let (old_props, old_children) = match &prev.kind {
            VNodeKind::Element(old_el) => (&old_el.props[..], &old_el.children),
            _ => (&no_props[..], &no_children),
        };

        self.diff_props(id, &host, old_props, &el.props);
        self.patch_children(old_children, &el.children, &host, None);
    }

    fn mount_fragment(&mut self, frag: &VFragment, container: &B::Node, anchor: Option<&B::Node>) {
        match &frag.children {
            Children::None => {}
            Children::Text(text) => self.backend.set_element_text(container, text),
            Children::Nodes(children) => {
                for child in children {
                    self.patch(None, child, container, anchor);
                }
            }
        }
    }

    fn patch_fragment(
        &mut self,
        prev: &VNode,
        frag: &VFragment,
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        let no_children = Children::None;
        let old_children = match &prev.kind {
            VNodeKind::Fragment(old_frag) => &old_frag.children,
            _ => &no_children,
        };
        self.patch_children(old_children, &frag.children, container, anchor);
    }

    /// Both prop walks are quadratic over the prop lists. Lists are tiny in
    /// practice, and the nested scan beats hashing at that size.
    fn diff_props(&mut self, id: NodeId, host: &B::Node, old: &[Prop], new: &[Prop]) {
        'added: for new_prop in new {
            for old_prop in old {
                if old_prop.name == new_prop.name {
                    if old_prop.value != new_prop.value {
                        self.patch_prop(id, host, &new_prop.name, Some(&new_prop.value));
                    }
                    continue 'added;
                }
            }
            self.patch_prop(id, host, &new_prop.name, Some(&new_prop.value));
        }

        'removed: for old_prop in old {
            for new_prop in new {
                if old_prop.name == new_prop.name {
                    continue 'removed;
                }
            }
            self.patch_prop(id, host, &old_prop.name, None);
        }
    }

    fn patch_children(
        &mut self,
        old: &Children,
        new: &Children,
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        match (old, new) {
            (Children::None, Children::None) => {}
            (old, Children::Text(text)) => {
                if let Children::Nodes(old_nodes) = old {
                    for child in old_nodes {
                        self.unmount(child);
                    }
                }
                if let Children::Text(old_text) = old {
                    if old_text == text {
                        return;
                    }
                }
                self.backend.set_element_text(container, text);
            }
            (Children::Nodes(old_nodes), Children::Nodes(new_nodes)) => {
                self.diff_children(old_nodes, new_nodes, container, anchor);
            }
            (_, Children::Nodes(new_nodes)) => {
                // Old children were text or absent: wipe and mount fresh.
                self.backend.set_element_text(container, "");
                for child in new_nodes {
                    self.patch(None, child, container, anchor);
                }
            }
            (Children::Nodes(old_nodes), Children::None) => {
                for child in old_nodes {
                    self.unmount(child);
                }
            }
            (Children::Text(_), Children::None) => {
                self.backend.set_element_text(container, "");
            }
        }
    }

    fn diff_children(&mut self, old: &[VNode], new: &[VNode], container: &B::Node, anchor: Option<&B::Node>) {
        if new.is_empty() {
            for child in old {
                self.unmount(child);
            }
            return;
        }
        if old.is_empty() {
            for child in new {
                self.patch(None, child, container, anchor);
            }
            return;
        }

        let new_is_keyed = new[0].key.is_some();
        let old_is_keyed = old[0].key.is_some();
        debug_assert!(
            new.iter().all(|c| c.key.is_some() == new_is_keyed),
            "children within a list must be either all keyed or all unkeyed"
        );
        debug_assert!(
            old.iter().all(|c| c.key.is_some() == old_is_keyed),
            "children within a list must be either all keyed or all unkeyed"
        );

        if new_is_keyed && old_is_keyed {
            self.diff_keyed_children(old, new, container, anchor);
        } else {
            self.diff_non_keyed_children(old, new, container, anchor);
        }
    }

    /// Unkeyed lists reconcile by position: shared prefix patches pairwise,
    /// surplus new children mount at the tail, surplus old children go away.
    fn diff_non_keyed_children(
        &mut self,
        old: &[VNode],
        new: &[VNode],
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        let shared = old.len().min(new.len());
        for (old_child, new_child) in old.iter().zip(new.iter()) {
            self.patch(Some(old_child), new_child, container, anchor);
        }
        for child in &new[shared..] {
            self.patch(None, child, container, anchor);
        }
        for child in &old[shared..] {
            self.unmount(child);
        }
    }

    /// Keyed reconciliation. Matching is by key (first occurrence wins when
    /// keys collide), stale old children are unmounted in list order, and the
    /// survivors on a longest increasing subsequence of old indices stay put
    /// while everything else is moved or mounted in a single reverse walk.
    fn diff_keyed_children(
        &mut self,
        old: &[VNode],
        new: &[VNode],
        container: &B::Node,
        anchor: Option<&B::Node>,
    ) {
        #[cfg(debug_assertions)]
        for list in [old, new] {
            let keys: FxHashSet<&str> = list.iter().filter_map(|c| c.key.as_deref()).collect();
            debug_assert!(
                keys.len() == list.len(),
                "keys within a sibling list must be unique"
            );
        }

        let mut old_index_by_key: FxHashMap<&str, usize> = FxHashMap::default();
        for (j, child) in old.iter().enumerate() {
            if let Some(key) = child.key.as_deref() {
                old_index_by_key.entry(key).or_insert(j);
            }
        }

        // Each old child matches at most one new child.
        let mut new_index_to_old_index = vec![NO_MATCH; new.len()];
        let mut claimed = vec![false; old.len()];
        for (i, child) in new.iter().enumerate() {
            if let Some(&j) = child.key.as_deref().and_then(|key| old_index_by_key.get(key)) {
                if !claimed[j] {
                    claimed[j] = true;
                    new_index_to_old_index[i] = j;
                }
            }
        }

        // Old children with no successor go away first, in list order.
        for (j, child) in old.iter().enumerate() {
            if !claimed[j] {
                self.unmount(child);
            }
        }

        // Children whose old indices form an increasing run are already in
        // the right relative order and never move.
        let stable: FxHashSet<usize> = lis(&new_index_to_old_index).into_iter().collect();

        // Walk backwards so the anchor (first host of the child just
        // processed) is always already in its final position.
        let mut anchor = anchor.cloned();
        for i in (0..new.len()).rev() {
            let new_child = &new[i];
            let j = new_index_to_old_index[i];
            if j == NO_MATCH {
                self.patch(None, new_child, container, anchor.as_ref());
            } else {
                self.patch(Some(&old[j]), new_child, container, anchor.as_ref());
                if !stable.contains(&i) {
                    let mut hosts: SmallVec<[B::Node; 4]> = SmallVec::new();
                    self.collect_hosts(new_child, &mut hosts);
                    for host in &hosts {
                        self.backend.insert(host, container, anchor.as_ref());
                    }
                }
            }
            if let Some(first) = self.find_first_host(new_child) {
                anchor = Some(first);
            }
        }
    }

    /// Tear a vnode out of the host tree. Elements remove their own host in
    /// one call and reclaim descendants silently; fragments remove each child
    /// individually since they have no host of their own. Unmounting a vnode
    /// that was never mounted is a no-op.
    pub(crate) fn unmount(&mut self, vnode: &VNode) {
        match &vnode.kind {
            VNodeKind::Text(_) => {
                if let Some(id) = vnode.take_mount() {
                    self.remove_host(id);
                }
            }
            VNodeKind::Element(el) => {
                if let Some(id) = vnode.take_mount() {
                    self.reclaim_children(&el.children);
                    self.remove_host(id);
                }
            }
            VNodeKind::Fragment(frag) => {
                if let Some(children) = frag.children.as_nodes() {
                    for child in children {
                        self.unmount(child);
                    }
                }
            }
            VNodeKind::Component(_) => {}
        }
    }

    fn remove_host(&mut self, id: NodeId) {
        self.listeners.remove(&id);
        if let Some(host) = self.nodes.reclaim(id) {
            self.backend.remove(&host);
        }
    }

    fn reclaim_children(&mut self, children: &Children) {
        if let Children::Nodes(nodes) = children {
            for child in nodes {
                self.reclaim_tree(child);
            }
        }
    }

    /// Release arena slots and listener tables for a subtree whose hosts
    /// leave the tree with their ancestor, without emitting removals.
    fn reclaim_tree(&mut self, vnode: &VNode) {
        match &vnode.kind {
            VNodeKind::Element(el) => {
                self.reclaim_children(&el.children);
                if let Some(id) = vnode.take_mount() {
                    self.listeners.remove(&id);
                    self.nodes.reclaim(id);
                }
            }
            VNodeKind::Text(_) => {
                if let Some(id) = vnode.take_mount() {
                    self.nodes.reclaim(id);
                }
            }
            VNodeKind::Fragment(frag) => self.reclaim_children(&frag.children),
            VNodeKind::Component(_) => {}
        }
    }

    /// The first host node this vnode materializes as, looking through
    /// fragments. `None` for empty fragments and unmounted nodes.
    fn find_first_host(&self, vnode: &VNode) -> Option<B::Node> {
        match &vnode.kind {
            VNodeKind::Element(_) | VNodeKind::Text(_) => {
                self.nodes.get(vnode.mount()?).cloned()
            }
            VNodeKind::Fragment(frag) => frag
                .children
                .as_nodes()?
                .iter()
                .find_map(|child| self.find_first_host(child)),
            VNodeKind::Component(_) => None,
        }
    }

    /// Every host node in this vnode's subtree root set, in order. For
    /// elements and text that is one node; fragments contribute each child.
    fn collect_hosts(&self, vnode: &VNode, hosts: &mut SmallVec<[B::Node; 4]>) {
        match &vnode.kind {
            VNodeKind::Element(_) | VNodeKind::Text(_) => {
                if let Some(host) = vnode.mount().and_then(|id| self.nodes.get(id)) {
                    hosts.push(host.clone());
                }
            }
            VNodeKind::Fragment(frag) => {
                if let Some(children) = frag.children.as_nodes() {
                    for child in children {
                        self.collect_hosts(child, hosts);
                    }
                }
            }
            VNodeKind::Component(_) => {}
        }
    }
}
