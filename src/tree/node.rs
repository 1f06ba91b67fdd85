//! Tree storage and the root-walk primitives
//!
//! Nodes live in an arena indexed by [`NodeId`] and carry no parent
//! back-references; parent, sibling and depth relationships are recovered by
//! re-walking the tree from the root. This keeps the structure an acyclic
//! single-owner value that can be dropped and rebuilt wholesale when the
//! projection changes, with no dangling-reference hazard.

use crate::model::ElementRef;

/// Index of a node inside its [`TagTree`] arena.
pub type NodeId = usize;

/// A tree vertex: structural header or concrete tag occurrence.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display text baked in at construction time.
    pub label: String,
    /// Children in insertion order; never resorted.
    pub children: Vec<NodeId>,
    /// Whether the node's children are shown. Defaults to collapsed.
    pub expanded: bool,
    /// Back-reference to the element this node denotes, if any.
    ///
    /// Structural nodes (root, filename and group headers) carry `None`.
    /// Under the tag projections a tag node carries a representative
    /// occurrence *and* has children, so a set reference does not imply
    /// leafness; test `children.is_empty()` for that.
    pub reference: Option<ElementRef>,
}

impl Node {
    fn new(label: String, reference: Option<ElementRef>) -> Self {
        Self {
            label,
            children: Vec::new(),
            expanded: false,
            reference,
        }
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A materialized tree plus its cursor.
///
/// The cursor always identifies a node inside the arena; rebuilding a tree
/// means constructing a fresh `TagTree`, which starts with the cursor on the
/// root and every node collapsed.
#[derive(Debug, Clone)]
pub struct TagTree {
    nodes: Vec<Node>,
    root: NodeId,
    cursor: NodeId,
}

impl TagTree {
    /// Create a tree holding only a root node with the given label.
    #[must_use]
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_label.into(), None)],
            root: 0,
            cursor: 0,
        }
    }

    /// Append a new child under `parent` and return its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        reference: Option<ElementRef>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(label.into(), reference));
        self.nodes[parent].children.push(id);
        id
    }

    /// The root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The current cursor node id.
    #[must_use]
    pub const fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Move the cursor. `id` must belong to this tree.
    pub const fn set_cursor(&mut self, id: NodeId) {
        self.cursor = id;
    }

    /// Borrow a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Mutably borrow a node by id.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Pre-order walk from the root.
    ///
    /// The callback receives `(id, parent, depth)` and returns whether to
    /// descend into the node's children. This is the single primitive the
    /// navigation and search engines derive their views from.
    pub fn walk<F>(&self, mut f: F)
    where
        F: FnMut(NodeId, Option<NodeId>, usize) -> bool,
    {
        self.walk_inner(self.root, None, 0, &mut f);
    }

    fn walk_inner<F>(&self, id: NodeId, parent: Option<NodeId>, depth: usize, f: &mut F)
    where
        F: FnMut(NodeId, Option<NodeId>, usize) -> bool,
    {
        if f(id, parent, depth) {
            for &child in &self.nodes[id].children {
                self.walk_inner(child, Some(id), depth + 1, f);
            }
        }
    }

    /// Every node whose full ancestor chain is expanded, in display order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.visible_with_depth().into_iter().map(|(id, _)| id).collect()
    }

    /// Like [`Self::visible_nodes`], paired with each node's depth.
    #[must_use]
    pub fn visible_with_depth(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        self.walk(|id, _, depth| {
            out.push((id, depth));
            self.nodes[id].expanded
        });
        out
    }

    /// Every node at exactly `depth`, from the raw tree shape.
    ///
    /// Deliberately not gated by expand state: same-level movement is
    /// defined over the full enumeration and may select nodes whose
    /// ancestors are currently collapsed.
    #[must_use]
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(|id, _, d| {
            if d == depth {
                out.push(id);
            }
            d < depth
        });
        out
    }

    /// Depth of a node (root is 0), or `None` if the id is out of range.
    #[must_use]
    pub fn depth_of(&self, target: NodeId) -> Option<usize> {
        let mut found = None;
        self.walk(|id, _, depth| {
            if id == target {
                found = Some(depth);
            }
            found.is_none()
        });
        found
    }

    /// Immediate ancestor of a node, or `None` for the root.
    #[must_use]
    pub fn parent_of(&self, target: NodeId) -> Option<NodeId> {
        let mut found = None;
        self.walk(|id, parent, _| {
            if id == target {
                found = parent;
                return false;
            }
            found.is_none()
        });
        found
    }

    /// The full child list of the node's parent, in order.
    ///
    /// The root has no parent and yields a singleton list of itself.
    #[must_use]
    pub fn siblings_of(&self, target: NodeId) -> Vec<NodeId> {
        match self.parent_of(target) {
            Some(parent) => self.nodes[parent].children.clone(),
            None => vec![self.root],
        }
    }

    /// Node ids on the path from the root to `target`, both inclusive.
    #[must_use]
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        self.path_inner(self.root, target, &mut path);
        path
    }

    fn path_inner(&self, id: NodeId, target: NodeId, path: &mut Vec<NodeId>) -> bool {
        path.push(id);
        if id == target {
            return true;
        }
        for &child in &self.nodes[id].children {
            if self.path_inner(child, target, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Set the expand flag on a single node.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.nodes[id].expanded = expanded;
    }

    /// Flip the expand flag on a single node.
    pub fn toggle_expanded(&mut self, id: NodeId) {
        self.nodes[id].expanded = !self.nodes[id].expanded;
    }

    /// Set the expand flag on `id` and every descendant.
    ///
    /// Iterative worklist rather than recursion so nesting depth never
    /// bounds the operation.
    pub fn set_expanded_recursive(&mut self, id: NodeId, expanded: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.nodes[current].expanded = expanded;
            stack.extend_from_slice(&self.nodes[current].children);
        }
    }
}
