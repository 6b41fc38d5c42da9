//! Relation of a node to a focus node.
//!
//! Roles are decided from identifiers alone, so no traversal is needed and
//! the result is recomputed cheaply whenever the focus changes:
//!
//! ```text
//! focus = gen.0.1.2
//!
//! gen.0          IndirectParent
//! gen.0.1        DirectParent
//! gen.0.1.2      Current
//! gen.0.1.2.0    Child
//! gen.0.1.3      Other
//! ```

use core::fmt;

use super::node::Node;
use super::tree::Hierarchy;

/// A node's relation to the focus node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// The focus node itself.
    Current,
    /// The focus node's parent.
    DirectParent,
    /// Any other ancestor of the focus node.
    IndirectParent,
    /// Any descendant of the focus node.
    Child,
    /// Unrelated.
    Other,
}

impl Role {
    /// All roles in ranking order.
    pub const ALL: [Role; 5] = [
        Role::Current,
        Role::DirectParent,
        Role::IndirectParent,
        Role::Child,
        Role::Other,
    ];

    /// Stable numeric code (0 = `Current` .. 4 = `Other`).
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Current => "current",
            Role::DirectParent => "direct-parent",
            Role::IndirectParent => "indirect-parent",
            Role::Child => "child",
            Role::Other => "other",
        };
        f.write_str(name)
    }
}

/// Classify `candidate` relative to `focus`.
pub fn classify(hierarchy: &Hierarchy, focus: &Node, candidate: &Node) -> Role {
    let scheme = hierarchy.scheme();
    let (f, n) = (focus.id(), candidate.id());

    if scheme.same_id(n, f) {
        Role::Current
    } else if scheme.parent_of(f).is_ok_and(|p| scheme.same_id(n, p)) {
        Role::DirectParent
    } else if scheme.is_ancestor_of(n, f) {
        Role::IndirectParent
    } else if scheme.is_ancestor_of(f, n) {
        Role::Child
    } else {
        Role::Other
    }
}

/// Roles of every node relative to `focus`, in
/// [`Hierarchy::all_nodes`] order.
pub fn classify_all(hierarchy: &Hierarchy, focus: &Node) -> Vec<Role> {
    hierarchy
        .all_nodes()
        .iter()
        .map(|n| classify(hierarchy, focus, n))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hierarchy::assemble::{assemble, NodeSet};
    use crate::hierarchy::id::IdScheme;
    use proptest::prelude::*;

    fn tree(ids: &[&str]) -> Hierarchy {
        let nodes = ids.iter().map(|id| Node::new(*id)).collect();
        assemble(NodeSet::from_nodes(nodes), &IdScheme::default(), false).unwrap()
    }

    #[test]
    fn roles_around_focus() {
        let h = tree(&["gen.0", "gen.0.1.2.0", "gen.0.1.3", "gen.0.4"]);
        let focus = h.find_by_id("gen.0.1.2").unwrap();
        let role = |id: &str| classify(&h, focus, h.find_by_id(id).unwrap());

        assert_eq!(role("gen.0"), Role::IndirectParent);
        assert_eq!(role("gen.0.1"), Role::DirectParent);
        assert_eq!(role("gen.0.1.2"), Role::Current);
        assert_eq!(role("gen.0.1.2.0"), Role::Child);
        assert_eq!(role("gen.0.1.3"), Role::Other);
        assert_eq!(role("gen.0.4"), Role::Other);
    }

    #[test]
    fn mixed_case_segments_follow_links() {
        let h = tree(&["gen.0", "gen.0.a", "gen.0.A.1", "gen.0.A.1.2"]);
        let node = |id: &str| h.find_by_id(id).unwrap();
        let (a, a1, a12) = (node("gen.0.a"), node("gen.0.A.1"), node("gen.0.A.1.2"));

        assert_eq!(h.parent(a1).map(Node::id), Some("gen.0.a"));
        assert_eq!(classify(&h, a1, a), Role::DirectParent);
        assert_eq!(classify(&h, a, a1), Role::Child);
        assert_eq!(classify(&h, a12, a), Role::IndirectParent);
        assert_eq!(classify(&h, a, a12), Role::Child);
    }

    #[test]
    fn root_focus() {
        let h = tree(&["gen.0", "gen.0.1.1"]);
        let roles = classify_all(&h, h.root());
        assert_eq!(roles, vec![Role::Current, Role::Child, Role::Child]);
    }

    #[test]
    fn codes_follow_ranking() {
        let codes: Vec<u8> = Role::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
        assert_eq!(Role::DirectParent.to_string(), "direct-parent");
    }

    proptest! {
        #[test]
        fn roles_are_consistent(paths in proptest::collection::vec(proptest::collection::vec(0u8..3, 1..4), 1..10)) {
            let mut ids = vec!["gen.0".to_string()];
            for path in paths {
                let id = path.iter().fold("gen.0".to_string(), |acc, s| format!("{acc}.{s}"));
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let h = tree(&refs);
            let scheme = h.scheme();

            for focus in h.all_nodes() {
                prop_assert_eq!(classify(&h, focus, focus), Role::Current);
                let roles = classify_all(&h, focus);
                prop_assert_eq!(roles.iter().filter(|r| **r == Role::Current).count(), 1);
                for (node, role) in h.all_nodes().iter().zip(&roles) {
                    let is_parent = h.parent(focus).is_some_and(|p| p.index() == node.index());
                    prop_assert_eq!(*role == Role::DirectParent, is_parent);
                    prop_assert_eq!(
                        *role == Role::Child,
                        scheme.is_ancestor_of(focus.id(), node.id())
                    );
                }
            }
        }
    }
}
