use alloc::vec::Vec;

use crate::{Control, NodeId, Tree, Walk, WalkMode, WalkOptions};

impl<T> Tree<T> {
    /// Visits `node`, then its descendants in document order.
    ///
    /// Returning [`Control::Stop`] from the visitor aborts an [`WalkMode::All`] walk with
    /// [`Walk::Stopped`]; in [`WalkMode::Any`] it prunes that node's subtree and the walk
    /// carries on with the remaining nodes, ending in [`Walk::Matched`].
    pub fn accept(
        &self,
        node: NodeId,
        options: WalkOptions,
        visitor: impl FnMut(NodeId) -> Control,
    ) -> Walk {
        if !self.contains(node) {
            return Walk::Completed;
        }
        let mut stack = Vec::new();
        stack.push(node);
        self.run(stack, options, visitor)
    }

    /// Same as [`Tree::accept`] but skips `node` itself.
    pub fn accept_children(
        &self,
        node: NodeId,
        options: WalkOptions,
        visitor: impl FnMut(NodeId) -> Control,
    ) -> Walk {
        let mut stack = Vec::new();
        self.push_children(node, options, &mut stack);
        self.run(stack, options, visitor)
    }

    /// Walks every node under the root.
    pub fn walk(&self, options: WalkOptions, visitor: impl FnMut(NodeId) -> Control) -> Walk {
        self.accept_children(self.root(), options, visitor)
    }

    /// Number of nodes [`Tree::accept`] would visit from `node`.
    pub fn count(&self, node: NodeId, options: WalkOptions) -> usize {
        let mut n = 0usize;
        self.accept(node, options.with_mode(WalkMode::All), |_| {
            n += 1;
            Control::Continue
        });
        n
    }

    /// The node following `node` in document order.
    ///
    /// With `visible_only`, children of collapsed nodes are skipped. A node hidden under a
    /// collapsed ancestor is first replaced by its highest collapsed ancestor.
    pub fn next_in_order(&self, node: NodeId, visible_only: bool) -> Option<NodeId> {
        let root = self.root();
        let mut start = node;
        if visible_only {
            let mut cur = self.parent(node);
            while let Some(p) = cur {
                if p == root {
                    break;
                }
                if !self.is_expanded(p) {
                    start = p;
                }
                cur = self.parent(p);
            }
        }

        let s = self.nodes.get(start)?;
        if let Some(child) = s.first_child {
            if !visible_only || s.expanded {
                return Some(child);
            }
        }
        if s.next.is_some() {
            return s.next;
        }

        let mut cur = s.parent;
        while let Some(p) = cur {
            if p == root {
                return None;
            }
            let pn = self.nodes.get(p)?;
            if pn.next.is_some() {
                return pn.next;
            }
            cur = pn.parent;
        }
        None
    }

    /// The node at 1-based document-order position `index`. O(n); use an [`IndexCursor`] to
    /// walk a range.
    pub fn node_at_index(&self, index: usize, visible_only: bool) -> Option<NodeId> {
        if index == 0 {
            return None;
        }
        let mut i = 0usize;
        let mut found = None;
        self.walk(WalkOptions::all().with_visible_only(visible_only), |id| {
            i += 1;
            if i == index {
                found = Some(id);
                Control::Stop
            } else {
                Control::Continue
            }
        });
        found
    }

    /// 1-based document-order position of `node`, the inverse of [`Tree::node_at_index`].
    pub fn index_of(&self, node: NodeId, visible_only: bool) -> Option<usize> {
        let mut i = 0usize;
        let walk = self.walk(WalkOptions::all().with_visible_only(visible_only), |id| {
            i += 1;
            if id == node {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        walk.is_stopped().then_some(i)
    }

    /// A cursor over positions `first..=last` (1-based).
    pub fn cursor(&self, first: usize, last: usize, visible_only: bool) -> IndexCursor<'_, T> {
        IndexCursor::new(self, first, last, visible_only)
    }

    fn run(
        &self,
        mut stack: Vec<NodeId>,
        options: WalkOptions,
        mut visitor: impl FnMut(NodeId) -> Control,
    ) -> Walk {
        let mut matched = false;
        while let Some(id) = stack.pop() {
            if visitor(id) == Control::Stop {
                match options.mode {
                    WalkMode::All => return Walk::Stopped,
                    WalkMode::Any => {
                        matched = true;
                        continue;
                    }
                }
            }
            self.push_children(id, options, &mut stack);
        }
        if matched {
            Walk::Matched
        } else {
            Walk::Completed
        }
    }

    // Pushes in reverse visiting order so the next child to visit ends up on top.
    fn push_children(&self, node: NodeId, options: WalkOptions, stack: &mut Vec<NodeId>) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        if options.visible_only && !n.expanded {
            return;
        }
        if options.reverse {
            let mut cur = n.first_child;
            while let Some(c) = cur {
                stack.push(c);
                cur = self.next_sibling(c);
            }
        } else {
            let mut cur = n.last_child;
            while let Some(c) = cur {
                stack.push(c);
                cur = self.prev_sibling(c);
            }
        }
    }
}

/// Forward cursor over a range of document-order positions.
///
/// Seeding costs one O(n) [`Tree::node_at_index`] scan; every further step is a
/// [`Tree::next_in_order`] call, so walking a window of `k` rows costs O(n + k) rather than
/// O(n * k).
#[derive(Clone, Debug)]
pub struct IndexCursor<'a, T> {
    tree: &'a Tree<T>,
    first: usize,
    last: usize,
    visible_only: bool,
    current: Option<NodeId>,
    index: usize, // 0 until seeded
}

impl<'a, T> IndexCursor<'a, T> {
    /// `last` is clamped to `row_count` (visible) or `node_count`; `first` starts at 1.
    pub fn new(tree: &'a Tree<T>, first: usize, last: usize, visible_only: bool) -> Self {
        let limit = if visible_only {
            tree.row_count()
        } else {
            tree.node_count()
        };
        Self {
            tree,
            first: first.max(1),
            last: last.min(limit),
            visible_only,
            current: None,
            index: 0,
        }
    }

    pub fn first_index(&self) -> usize {
        self.first
    }

    pub fn last_index(&self) -> usize {
        self.last
    }

    /// Position of the node last returned, 0 before seeding.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Seeds (or reseeds) the cursor at `first`.
    pub fn first(&mut self) -> Option<NodeId> {
        if self.first <= self.last {
            self.index = self.first;
            self.current = self.tree.node_at_index(self.first, self.visible_only);
        } else {
            self.index = self.last + 1;
            self.current = None;
        }
        self.current
    }
}

impl<T> Iterator for IndexCursor<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.index == 0 {
            return self.first();
        }
        if self.index <= self.last {
            self.index += 1;
        }
        self.current = match self.current {
            Some(cur) if self.index <= self.last => self.tree.next_in_order(cur, self.visible_only),
            _ => None,
        };
        self.current
    }
}
