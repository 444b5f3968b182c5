use alloc::vec::Vec;

use slotmap::SlotMap;

use crate::{Error, NodeId, Result, WalkOptions};

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) payload: Option<T>, // `None` only for the root sentinel
    pub(crate) parent: Option<NodeId>,
    pub(crate) previous: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) expanded: bool,
}

impl<T> Node<T> {
    fn new(payload: Option<T>) -> Self {
        Self {
            payload,
            parent: None,
            previous: None,
            next: None,
            first_child: None,
            last_child: None,
            expanded: false,
        }
    }
}

/// An n-ary tree held in an arena, with node and row counts maintained on every edit.
///
/// The arena owns every node; links between nodes are [`NodeId`] handles. Nodes are created
/// detached with [`Tree::create`] and become part of the tree when attached under the root
/// (directly or through attached ancestors). The root is a sentinel: it has no payload, is
/// always expanded and is never counted.
///
/// Counts are kept by delta. Attaching or detaching a leaf costs O(depth); a node that
/// already has children additionally costs O(subtree size), since the subtree has to be
/// counted. Edits on subtrees that are not connected to the root leave the counts alone.
#[derive(Clone, Debug)]
pub struct Tree<T> {
    pub(crate) nodes: SlotMap<NodeId, Node<T>>,
    root: NodeId,
    node_count: usize,
    row_count: usize,
    invalidated: bool,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Self::root_sentinel());
        Self {
            nodes,
            root,
            node_count: 0,
            row_count: 0,
            invalidated: false,
        }
    }

    fn root_sentinel() -> Node<T> {
        let mut root = Node::new(None);
        root.expanded = true;
        root
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of nodes reachable from the root through expanded nodes only.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Allocates a detached node.
    pub fn create(&mut self, payload: T) -> NodeId {
        self.nodes.insert(Node::new(Some(payload)))
    }

    /// Frees a detached node together with its subtree and returns its payload.
    pub fn discard(&mut self, node: NodeId) -> Result<T> {
        if node == self.root {
            return Err(Error::RootNode);
        }
        if self.node(node)?.parent.is_some() {
            return Err(Error::AlreadyAttached(node));
        }

        let mut doomed = Vec::new();
        self.accept(node, WalkOptions::all(), |id| {
            doomed.push(id);
            crate::Control::Continue
        });
        let mut payload = None;
        for id in doomed {
            if let Some(removed) = self.nodes.remove(id) {
                if id == node {
                    payload = removed.payload;
                }
            }
        }
        payload.ok_or(Error::UnknownNode(node))
    }

    /// Drops the whole structure and starts over with a fresh root.
    ///
    /// Every handle issued so far becomes stale.
    pub fn clear(&mut self) {
        vdebug!(nodes = self.nodes.len(), "Tree::clear");
        self.nodes.clear();
        self.root = self.nodes.insert(Self::root_sentinel());
        self.node_count = 0;
        self.row_count = 0;
        self.invalidated = true;
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node)?.payload.as_ref()
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node)?.payload.as_mut()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.first_child
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.last_child
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.next
    }

    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.previous
    }

    pub fn is_expanded(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.expanded)
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        self.first_child(node).is_some()
    }

    pub fn children(&self, node: NodeId) -> Children<'_, T> {
        Children {
            tree: self,
            next: self.first_child(node),
        }
    }

    /// Length of the ancestor chain: 0 for the root, 1 for its children.
    pub fn nest_level(&self, node: NodeId) -> usize {
        let mut level = 0;
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            level += 1;
            cur = self.parent(p);
        }
        level
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Whether `node` hangs off the root (the root itself counts as connected).
    pub fn is_connected(&self, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        let mut cur = node;
        loop {
            if cur == self.root {
                return true;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Whether `node` occupies a row: it is connected and every ancestor is expanded.
    pub fn is_row_visible(&self, node: NodeId) -> bool {
        node != self.root && self.parent(node).is_some_and(|p| self.exposes_children(p))
    }

    /// Number of nodes in the subtree rooted at `node`, `node` included. O(subtree size).
    pub fn subtree_size(&self, node: NodeId) -> usize {
        self.count(node, WalkOptions::all())
    }

    /// Rows `node`'s children would contribute if `node` were expanded and visible.
    pub fn visible_descendants(&self, node: NodeId) -> usize {
        self.children(node)
            .map(|child| self.count(child, WalkOptions::visible()))
            .sum()
    }

    /// Appends `node` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.link(parent, None, node)
    }

    /// Inserts `node` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        let reference = self.node(parent)?.first_child;
        self.link(parent, reference, node)
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or(Error::NotAttached(reference))?;
        self.link(parent, Some(reference), node)
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let r = self.node(reference)?;
        let parent = r.parent.ok_or(Error::NotAttached(reference))?;
        let next = r.next;
        self.link(parent, next, node)
    }

    /// Detaches `node` (and its subtree) from its parent.
    ///
    /// A non-root parent that loses its last child is collapsed.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let parent = self.node(node)?.parent.ok_or(Error::NotAttached(node))?;

        let connected = self.is_connected(parent);
        if connected {
            let nodes = self.subtree_size(node);
            debug_assert!(self.node_count >= nodes, "node_count underflow");
            self.node_count = self.node_count.saturating_sub(nodes);
            if self.exposes_children(parent) {
                let rows = self.count(node, WalkOptions::visible());
                debug_assert!(self.row_count >= rows, "row_count underflow");
                self.row_count = self.row_count.saturating_sub(rows);
            }
        }

        let (previous, next) = {
            let n = &mut self.nodes[node];
            let links = (n.previous, n.next);
            n.parent = None;
            n.previous = None;
            n.next = None;
            links
        };
        match previous {
            Some(p) => self.nodes[p].next = next,
            None => self.nodes[parent].first_child = next,
        }
        match next {
            Some(n) => self.nodes[n].previous = previous,
            None => self.nodes[parent].last_child = previous,
        }

        if parent != self.root {
            let p = &mut self.nodes[parent];
            if p.expanded && p.first_child.is_none() {
                p.expanded = false;
            }
        }

        if connected {
            self.invalidated = true;
        }
        Ok(())
    }

    /// Expands or collapses `node` and returns the resulting change in `row_count`.
    ///
    /// The root is always expanded; asking to collapse it is a no-op.
    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<isize> {
        let current = self.node(node)?.expanded;
        if node == self.root || current == expanded {
            return Ok(0);
        }

        self.nodes[node].expanded = expanded;

        let mut delta = 0isize;
        if self.is_row_visible(node) {
            let rows = self.visible_descendants(node);
            if expanded {
                self.row_count += rows;
                delta = rows as isize;
            } else {
                debug_assert!(self.row_count >= rows, "row_count underflow");
                self.row_count = self.row_count.saturating_sub(rows);
                delta = -(rows as isize);
            }
        }

        if self.is_connected(node) {
            self.invalidated = true;
        }
        Ok(delta)
    }

    pub fn toggle_expanded(&mut self, node: NodeId) -> Result<isize> {
        let expanded = self.node(node)?.expanded;
        self.set_expanded(node, !expanded)
    }

    /// Returns and resets the "connected structure changed" flag.
    pub fn take_invalidation(&mut self) -> bool {
        core::mem::take(&mut self.invalidated)
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub(crate) fn node(&self, node: NodeId) -> Result<&Node<T>> {
        self.nodes.get(node).ok_or(Error::UnknownNode(node))
    }

    /// Whether children of `node` occupy rows: `node` and all its ancestors are expanded and
    /// the chain ends at the root.
    fn exposes_children(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            let Some(n) = self.nodes.get(cur) else {
                return false;
            };
            if cur == self.root {
                return true;
            }
            if !n.expanded {
                return false;
            }
            match n.parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    fn link(&mut self, parent: NodeId, reference: Option<NodeId>, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::RootNode);
        }
        if self.node(node)?.parent.is_some() {
            return Err(Error::AlreadyAttached(node));
        }
        self.node(parent)?;
        if parent == node || self.is_ancestor(node, parent) {
            return Err(Error::WouldCycle { node, parent });
        }
        debug_assert!(
            reference.is_none_or(|r| self.parent(r) == Some(parent)),
            "insert reference must be a child of the parent"
        );

        let previous = match reference {
            Some(r) => self.nodes[r].previous,
            None => self.nodes[parent].last_child,
        };
        {
            let n = &mut self.nodes[node];
            n.parent = Some(parent);
            n.previous = previous;
            n.next = reference;
        }
        match previous {
            Some(p) => self.nodes[p].next = Some(node),
            None => self.nodes[parent].first_child = Some(node),
        }
        match reference {
            Some(r) => self.nodes[r].previous = Some(node),
            None => self.nodes[parent].last_child = Some(node),
        }

        if self.is_connected(parent) {
            self.node_count += self.subtree_size(node);
            if self.exposes_children(parent) {
                self.row_count += self.count(node, WalkOptions::visible());
            }
            self.invalidated = true;
        }
        Ok(())
    }
}

/// Iterator over the direct children of a node, first to last.
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<T> Iterator for Children<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.next_sibling(cur);
        Some(cur)
    }
}
