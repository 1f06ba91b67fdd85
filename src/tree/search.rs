//! Incremental cyclic substring search over the whole tree
//!
//! Matching ignores expand state entirely; a hit inside a collapsed subtree
//! is made visible by expanding its ancestor chain when the cursor jumps to
//! it. Cycling is anchored at the match nearest the cursor rather than the
//! first match in the tree, so search-as-you-type stays close to where the
//! user is.

use super::node::{NodeId, TagTree};

/// Queries shorter than this are treated as "no search active"; every search
/// operation becomes a no-op. Single characters over-match while typing.
pub const MIN_QUERY_LEN: usize = 2;

impl TagTree {
    /// All nodes whose lower-cased label contains the lower-cased query, in
    /// full pre-order walk order, plus the anchor index for cycling.
    ///
    /// The anchor is the index of the cursor itself when the cursor
    /// matches, otherwise the index of the match immediately preceding the
    /// cursor in walk order, falling back to 0 when the cursor precedes all
    /// matches.
    #[must_use]
    pub fn find_matches(&self, query: &str) -> (Vec<NodeId>, usize) {
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        let mut anchor = 0;
        self.walk(|id, _, _| {
            if self.node(id).label.to_lowercase().contains(&needle) {
                matches.push(id);
            }
            if id == self.cursor() {
                anchor = matches.len().saturating_sub(1);
            }
            true
        });
        (matches, anchor)
    }

    /// Jump to the match `offset` steps away from the cursor's anchor,
    /// wrapping around in either direction.
    ///
    /// With offset 0 this re-anchors to the match nearest the cursor, which
    /// is exactly what search-as-you-type wants on every query edit. When
    /// the selected node differs from the cursor, the cursor moves there and
    /// the path from the root is expanded so the match is visible.
    ///
    /// Returns whether the cursor moved. Queries below [`MIN_QUERY_LEN`]
    /// and queries without matches are no-ops.
    pub fn jump_to_nth_match(&mut self, query: &str, offset: isize) -> bool {
        if query.chars().count() < MIN_QUERY_LEN {
            return false;
        }
        let (matches, anchor) = self.find_matches(query);
        if matches.is_empty() {
            return false;
        }

        let len = matches.len() as isize;
        let index = (anchor as isize + offset).rem_euclid(len) as usize;
        let target = matches[index];
        if target == self.cursor() {
            return false;
        }

        self.set_cursor(target);
        self.expand_path_to(target);
        true
    }

    /// Jump to the next match after the cursor's anchor.
    pub fn jump_to_next_match(&mut self, query: &str) -> bool {
        self.jump_to_nth_match(query, 1)
    }

    /// Jump to the match before the cursor's anchor.
    pub fn jump_to_prev_match(&mut self, query: &str) -> bool {
        self.jump_to_nth_match(query, -1)
    }

    /// Expand every node on the path from the root to `target`, the target
    /// itself included.
    fn expand_path_to(&mut self, target: NodeId) {
        for id in self.path_to(target) {
            self.set_expanded(id, true);
        }
    }
}
