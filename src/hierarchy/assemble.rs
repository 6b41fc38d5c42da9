//! Tree assembly with gap filling.
//!
//! Ingestion yields a flat list of nodes that carry identifiers but no links.
//! Assembly turns that list into a [`Hierarchy`]:
//!
//! 1. **Validate** the root sentinel (exactly one), identifier uniqueness and
//!    well-formedness.
//! 2. **Depth fill**: every missing ancestor implied by an identifier is
//!    synthesized, so each parent chain reaches the root.
//! 3. **Link** each node to the node named by its parent identifier and sort
//!    children by sibling index.
//! 4. **Breadth fill** (optional): under every parent, missing sibling
//!    indices in `0..=max` are synthesized.
//!
//! ```text
//! input:  gen.0   gen.0.0   gen.0.2.1
//!
//!                 gen.0
//!                /  |  \
//!         gen.0.0 gen.0.1* gen.0.2*      (* synthesized; gen.0.1 only
//!                             |              with breadth fill)
//!                         gen.0.2.0* gen.0.2.1
//! ```
//!
//! The result is re-indexed into depth-first pre-order.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tracing::debug;

use super::id::IdScheme;
use super::node::Node;
use super::tree::Hierarchy;
use crate::error::{Error, Result};

/// Unlinked nodes plus the per-load data that travels with them.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    /// Nodes in first-seen order.
    pub nodes: Vec<Node>,
    /// Class label histogram over all instances.
    pub class_counts: BTreeMap<String, usize>,
    /// Feature vector length.
    pub feature_count: usize,
    /// Feature column names from a header row.
    pub feature_names: Option<Vec<String>>,
}

impl NodeSet {
    /// Build a node set, deriving the class histogram and feature count from
    /// the nodes' instances.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut class_counts = BTreeMap::new();
        for inst in nodes.iter().flat_map(|n| n.instances()) {
            if let Some(class) = inst.class() {
                *class_counts.entry(class.to_string()).or_insert(0) += 1;
            }
        }
        let feature_count = nodes
            .iter()
            .flat_map(|n| n.instances())
            .next()
            .map_or(0, |inst| inst.features().len());
        Self {
            nodes,
            class_counts,
            feature_count,
            feature_names: None,
        }
    }

    /// Index of the first node named by the root sentinel.
    pub fn root_index(&self, scheme: &IdScheme) -> Option<usize> {
        self.nodes.iter().position(|n| scheme.is_root(n.id()))
    }
}

/// Link `set` into a complete tree.
///
/// Ancestors are always filled; sibling gaps only when `fill_breadth_gaps`.
pub fn assemble(set: NodeSet, scheme: &IdScheme, fill_breadth_gaps: bool) -> Result<Hierarchy> {
    let NodeSet {
        nodes,
        class_counts,
        feature_count,
        feature_names,
    } = set;
    let mut nodes: Vec<Node> = nodes.into_iter().map(Node::unlinked).collect();

    let roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| scheme.is_root(&n.id))
        .map(|(i, _)| i)
        .collect();
    let root = match roots.as_slice() {
        [root] => *root,
        _ => {
            return Err(Error::MissingOrDuplicateRoot {
                root: scheme.root.clone(),
                found: roots.len(),
            })
        }
    };

    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if !scheme.is_well_formed(&node.id) {
            return Err(Error::UnresolvableParent {
                id: node.id.clone(),
            });
        }
        if lookup.insert(scheme.key(&node.id), i).is_some() {
            return Err(Error::AmbiguousDuplicateIdentifier {
                id: node.id.clone(),
            });
        }
    }

    let explicit = nodes.len();
    fill_depth_gaps(&mut nodes, &mut lookup, scheme)?;
    link(&mut nodes, &lookup, scheme)?;
    if fill_breadth_gaps {
        fill_breadth(&mut nodes, &mut lookup, root, scheme)?;
    }

    let nodes = preorder(nodes, root);
    debug!(
        nodes = nodes.len(),
        explicit,
        synthesized = nodes.len() - explicit,
        fill_breadth_gaps,
        "assembled hierarchy"
    );
    Ok(Hierarchy::from_parts(
        nodes,
        class_counts,
        feature_count,
        feature_names,
        scheme.clone(),
    ))
}

/// Synthesize every missing ancestor, walking up from each explicit node
/// until an existing node is met.
fn fill_depth_gaps(
    nodes: &mut Vec<Node>,
    lookup: &mut HashMap<String, usize>,
    scheme: &IdScheme,
) -> Result<()> {
    for i in 0..nodes.len() {
        let mut id = nodes[i].id.clone();
        while !scheme.is_root(&id) {
            let parent = scheme.parent_of(&id)?.to_string();
            let key = scheme.key(&parent);
            if lookup.contains_key(&key) {
                break;
            }
            debug!(node = %parent, below = %id, "synthesizing missing ancestor");
            let _ = lookup.insert(key, nodes.len());
            nodes.push(Node::placeholder(parent.clone()));
            id = parent;
        }
    }
    Ok(())
}

fn link(nodes: &mut [Node], lookup: &HashMap<String, usize>, scheme: &IdScheme) -> Result<()> {
    for i in 0..nodes.len() {
        if scheme.is_root(&nodes[i].id) {
            continue;
        }
        let parent_key = scheme.key(scheme.parent_of(&nodes[i].id)?);
        let parent = lookup
            .get(&parent_key)
            .copied()
            .ok_or_else(|| Error::UnresolvableParent {
                id: nodes[i].id.clone(),
            })?;
        nodes[i].parent = Some(parent);
        nodes[parent].children.push(i);
    }
    for i in 0..nodes.len() {
        sort_children(nodes, i, scheme);
    }
    Ok(())
}

fn sort_children(nodes: &mut [Node], parent: usize, scheme: &IdScheme) {
    let mut children = std::mem::take(&mut nodes[parent].children);
    children.sort_by(|&a, &b| scheme.compare_siblings(&nodes[a].id, &nodes[b].id));
    nodes[parent].children = children;
}

/// Make sibling indices contiguous from 0 under every parent, visiting
/// parents breadth-first from the root.
fn fill_breadth(
    nodes: &mut Vec<Node>,
    lookup: &mut HashMap<String, usize>,
    root: usize,
    scheme: &IdScheme,
) -> Result<()> {
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        if nodes[current].children.is_empty() {
            continue;
        }

        let mut present = BTreeSet::new();
        for &child in &nodes[current].children {
            let ordinal = scheme.sibling_ordinal(&nodes[child].id).ok_or_else(|| {
                Error::NonNumericSiblingIndex {
                    id: nodes[child].id.clone(),
                }
            })?;
            if ordinal > scheme.max_sibling_index {
                return Err(Error::SiblingIndexOutOfRange {
                    id: nodes[child].id.clone(),
                    max: scheme.max_sibling_index,
                });
            }
            let _ = present.insert(ordinal);
            queue.push_back(child);
        }

        let max = present.last().copied().unwrap_or(0);
        for ordinal in (0..=max).filter(|o| !present.contains(o)) {
            let id = scheme.child_id(&nodes[current].id, ordinal);
            let key = scheme.key(&id);
            if lookup.contains_key(&key) {
                continue;
            }
            debug!(node = %id, "synthesizing missing sibling");
            let index = nodes.len();
            let _ = lookup.insert(key, index);
            let mut placeholder = Node::placeholder(id);
            placeholder.parent = Some(current);
            nodes.push(placeholder);
            nodes[current].children.push(index);
        }
        sort_children(nodes, current, scheme);
    }
    Ok(())
}

/// Reorder nodes into depth-first pre-order, rewriting links and depths.
fn preorder(nodes: Vec<Node>, root: usize) -> Vec<Node> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(nodes[i].children.iter().rev());
    }
    debug_assert_eq!(order.len(), nodes.len(), "every node reachable from root");

    let mut remap = vec![0usize; nodes.len()];
    for (new, &old) in order.iter().enumerate() {
        remap[old] = new;
    }

    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    let mut ordered: Vec<Node> = Vec::with_capacity(order.len());
    for (new, &old) in order.iter().enumerate() {
        let Some(mut node) = slots[old].take() else {
            continue;
        };
        node.index = new;
        node.parent = node.parent.map(|p| remap[p]);
        for child in node.children.iter_mut() {
            *child = remap[*child];
        }
        node.depth = node.parent.map_or(0, |p| ordered[p].depth + 1);
        ordered.push(node);
    }
    ordered
}
