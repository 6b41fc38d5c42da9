//! Level-order row numbers for list and table views.
//!
//! Row 0 is the root; rows then run level by level, children in sibling
//! order. Every call walks the tree afresh, so callers doing many lookups
//! should collect [`level_order`] once and index into it.

use std::collections::VecDeque;

use super::node::Node;
use super::tree::Hierarchy;

/// All nodes in breadth-first order starting at the root.
pub fn level_order(hierarchy: &Hierarchy) -> Vec<&Node> {
    let mut out = Vec::with_capacity(hierarchy.node_count());
    let mut queue = VecDeque::from([hierarchy.root()]);
    while let Some(node) = queue.pop_front() {
        out.push(node);
        queue.extend(hierarchy.children(node));
    }
    out
}

/// Node displayed at `row`, or `None` for negative or out-of-range rows.
pub fn resolve_row(hierarchy: &Hierarchy, row: i64) -> Option<&Node> {
    let target = usize::try_from(row).ok()?;
    let mut queue = VecDeque::from([hierarchy.root()]);
    let mut current = 0usize;
    while let Some(node) = queue.pop_front() {
        if current == target {
            return Some(node);
        }
        current += 1;
        queue.extend(hierarchy.children(node));
    }
    None
}

/// Row at which `node` is displayed; `None` if it is not part of `hierarchy`.
pub fn row_of(hierarchy: &Hierarchy, node: &Node) -> Option<usize> {
    let mut queue = VecDeque::from([hierarchy.root()]);
    let mut current = 0usize;
    while let Some(candidate) = queue.pop_front() {
        if core::ptr::eq(candidate, node) {
            return Some(current);
        }
        current += 1;
        queue.extend(hierarchy.children(candidate));
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hierarchy::assemble::{assemble, NodeSet};
    use crate::hierarchy::id::IdScheme;

    fn tree() -> Hierarchy {
        let nodes = ["gen.0", "gen.0.0.0", "gen.0.1", "gen.0.0.1"]
            .iter()
            .map(|id| Node::new(*id))
            .collect();
        assemble(NodeSet::from_nodes(nodes), &IdScheme::default(), false).unwrap()
    }

    #[test]
    fn rows_follow_levels() {
        let h = tree();
        let ids: Vec<&str> = (0..5).map(|r| resolve_row(&h, r).unwrap().id()).collect();
        assert_eq!(ids, vec!["gen.0", "gen.0.0", "gen.0.1", "gen.0.0.0", "gen.0.0.1"]);
    }

    #[test]
    fn out_of_range_rows_are_none() {
        let h = tree();
        assert!(resolve_row(&h, -1).is_none());
        assert!(resolve_row(&h, 5).is_none());
        assert!(resolve_row(&h, i64::MAX).is_none());
    }

    #[test]
    fn row_of_inverts_resolve() {
        let h = tree();
        for (row, node) in level_order(&h).into_iter().enumerate() {
            assert_eq!(row_of(&h, node), Some(row));
            assert_eq!(resolve_row(&h, row as i64).map(Node::index), Some(node.index()));
        }
        let depths: Vec<usize> = level_order(&h).iter().map(|n| n.depth()).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn foreign_node_has_no_row() {
        let h = tree();
        let other = tree();
        assert!(row_of(&h, other.root()).is_none());
    }
}
