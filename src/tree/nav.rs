//! Cursor movement over a materialized tree
//!
//! Every operation is synchronous and total: when no valid target exists the
//! cursor stays put, never an error. Only the cursor and expand flags are
//! mutated; the tree shape is untouched.
//!
//! Same-level movement enumerates nodes at the cursor's depth over the raw
//! tree shape, so a jump can select a node whose ancestors are collapsed.
//! Callers that want the landing node on screen follow up with
//! [`TagTree::reveal_cursor`].

use super::node::TagTree;

impl TagTree {
    /// Move the cursor `n` rows down the visible list.
    ///
    /// No-op when the cursor itself is not visible.
    pub fn select_next(&mut self, n: usize) {
        let visible = self.visible_nodes();
        if let Some(pos) = visible.iter().position(|&id| id == self.cursor()) {
            let target = (pos + n).min(visible.len() - 1);
            self.set_cursor(visible[target]);
        }
    }

    /// Move the cursor `n` rows up the visible list.
    pub fn select_prev(&mut self, n: usize) {
        let visible = self.visible_nodes();
        if let Some(pos) = visible.iter().position(|&id| id == self.cursor()) {
            self.set_cursor(visible[pos.saturating_sub(n)]);
        }
    }

    /// Move to the next node at the cursor's depth, in raw walk order.
    pub fn move_down_same_level(&mut self) {
        let Some(depth) = self.depth_of(self.cursor()) else {
            return;
        };
        let level = self.nodes_at_depth(depth);
        if let Some(pos) = level.iter().position(|&id| id == self.cursor())
            && pos + 1 < level.len()
        {
            self.set_cursor(level[pos + 1]);
        }
    }

    /// Move to the previous node at the cursor's depth, in raw walk order.
    pub fn move_up_same_level(&mut self) {
        let Some(depth) = self.depth_of(self.cursor()) else {
            return;
        };
        let level = self.nodes_at_depth(depth);
        if let Some(pos) = level.iter().position(|&id| id == self.cursor())
            && pos > 0
        {
            self.set_cursor(level[pos - 1]);
        }
    }

    /// Collapse the cursor node if it is an expanded inner node, otherwise
    /// move to its parent.
    pub fn collapse_or_move_to_parent(&mut self) {
        let cursor = self.cursor();
        if !self.node(cursor).is_leaf() && self.node(cursor).expanded {
            self.set_expanded(cursor, false);
        } else {
            self.move_to_parent();
        }
    }

    /// Expand the cursor node if it is a collapsed inner node, otherwise
    /// move to its first child.
    pub fn expand_or_move_to_first_child(&mut self) {
        let cursor = self.cursor();
        if self.node(cursor).is_leaf() {
            return;
        }
        if self.node(cursor).expanded {
            let first = self.node(cursor).children[0];
            self.set_cursor(first);
        } else {
            self.set_expanded(cursor, true);
        }
    }

    /// Move to the cursor's parent. No-op on the root.
    pub fn move_to_parent(&mut self) {
        if let Some(parent) = self.parent_of(self.cursor()) {
            self.set_cursor(parent);
        }
    }

    /// Expand the cursor node and move to its first child. No-op on leaves.
    pub fn move_to_first_child(&mut self) {
        let cursor = self.cursor();
        if !self.node(cursor).is_leaf() {
            self.set_expanded(cursor, true);
            let first = self.node(cursor).children[0];
            self.set_cursor(first);
        }
    }

    /// Move to the first node of the cursor's sibling list.
    pub fn move_to_first_sibling(&mut self) {
        let siblings = self.siblings_of(self.cursor());
        if let Some(&first) = siblings.first() {
            self.set_cursor(first);
        }
    }

    /// Move to the last node of the cursor's sibling list.
    pub fn move_to_last_sibling(&mut self) {
        let siblings = self.siblings_of(self.cursor());
        if let Some(&last) = siblings.last() {
            self.set_cursor(last);
        }
    }

    /// Expand the cursor node and all of its siblings (not recursively).
    pub fn expand_siblings(&mut self) {
        for sibling in self.siblings_of(self.cursor()) {
            self.set_expanded(sibling, true);
        }
    }

    /// Collapse the cursor node and all of its siblings (not recursively).
    pub fn collapse_siblings(&mut self) {
        for sibling in self.siblings_of(self.cursor()) {
            self.set_expanded(sibling, false);
        }
    }

    /// Move the cursor to the root.
    pub fn jump_to_root(&mut self) {
        self.set_cursor(self.root());
    }

    /// Move the cursor to the last entry of the visible list.
    pub fn jump_to_last_visible(&mut self) {
        if let Some(&last) = self.visible_nodes().last() {
            self.set_cursor(last);
        }
    }

    /// Expand the whole subtree under the cursor, cursor node included.
    pub fn expand_cursor_recursive(&mut self) {
        self.set_expanded_recursive(self.cursor(), true);
    }

    /// Collapse the whole subtree under the cursor, cursor node included.
    pub fn collapse_cursor_recursive(&mut self) {
        self.set_expanded_recursive(self.cursor(), false);
    }

    /// Flip the cursor node's expand flag. No-op on leaves.
    pub fn toggle_cursor(&mut self) {
        let cursor = self.cursor();
        if !self.node(cursor).is_leaf() {
            self.toggle_expanded(cursor);
        }
    }

    /// Expand every ancestor of the cursor so it becomes visible.
    ///
    /// The cursor node's own flag is left alone; only the chain above it
    /// opens.
    pub fn reveal_cursor(&mut self) {
        let path = self.path_to(self.cursor());
        for &id in path.iter().rev().skip(1) {
            self.set_expanded(id, true);
        }
    }
}
