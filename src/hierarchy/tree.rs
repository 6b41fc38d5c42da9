//! The assembled, read-only hierarchy.

use core::fmt;
use std::collections::{BTreeMap, HashMap};

use super::assemble::{assemble, NodeSet};
use super::id::IdScheme;
use super::node::{Instance, Node};
use crate::error::{Error, Result};

/// A complete tree of nodes reconstructed from flat records.
///
/// Built once by [`assemble`](super::assemble::assemble) and never mutated
/// afterwards; every accessor borrows immutably, so a `Hierarchy` can be
/// shared across threads.
///
/// Nodes are stored in depth-first pre-order with the root at index 0.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    lookup: HashMap<String, usize>,
    class_counts: BTreeMap<String, usize>,
    instance_count: usize,
    feature_count: usize,
    feature_names: Option<Vec<String>>,
    scheme: IdScheme,
}

impl Hierarchy {
    /// Wrap an already linked, pre-ordered node list.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        class_counts: BTreeMap<String, usize>,
        feature_count: usize,
        feature_names: Option<Vec<String>>,
        scheme: IdScheme,
    ) -> Self {
        let lookup = nodes
            .iter()
            .map(|n| (scheme.key(&n.id), n.index))
            .collect();
        let instance_count = nodes.iter().map(|n| n.instances.len()).sum();
        Self {
            nodes,
            lookup,
            class_counts,
            instance_count,
            feature_count,
            feature_names,
            scheme,
        }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// All nodes, original and synthesized, in depth-first pre-order.
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at `index` in [`all_nodes`](Self::all_nodes).
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Look up a node by identifier (case-insensitive).
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.lookup
            .get(&self.scheme.key(id))
            .map(|&i| &self.nodes[i])
    }

    /// Parent of `node`; `None` for the root.
    pub fn parent(&self, node: &Node) -> Option<&Node> {
        node.parent.map(|i| &self.nodes[i])
    }

    /// Children of `node` in ascending sibling order.
    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().map(move |&i| &self.nodes[i])
    }

    /// `node` and all its descendants, depth-first pre-order.
    pub fn subtree<'a>(&'a self, node: &'a Node) -> Vec<&'a Node> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(current.children.iter().rev().map(|&i| &self.nodes[i]));
        }
        out
    }

    /// Instances of `node` followed by those of every descendant.
    pub fn subtree_instances<'a>(&'a self, node: &'a Node) -> Vec<&'a Instance> {
        self.subtree(node)
            .into_iter()
            .flat_map(|n| n.instances.iter())
            .collect()
    }

    /// Occurrences of each class label across all instances.
    pub fn class_histogram(&self) -> &BTreeMap<String, usize> {
        &self.class_counts
    }

    /// Occurrences of one class label.
    ///
    /// With `with_inheritance`, counts of labels that are identifier
    /// descendants of `label` are added. `None` if the label never occurs.
    pub fn class_count(&self, label: &str, with_inheritance: bool) -> Option<usize> {
        let own = *self.class_counts.get(label)?;
        if !with_inheritance {
            return Some(own);
        }
        let inherited: usize = self
            .class_counts
            .iter()
            .filter(|(class, _)| self.scheme.is_ancestor_of(label, class))
            .map(|(_, &count)| count)
            .sum();
        Some(own + inherited)
    }

    /// Total number of instances.
    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    /// Total number of nodes, including synthesized ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes created by gap filling.
    pub fn synthesized_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.synthesized).count()
    }

    /// Length of every instance's feature vector.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Feature column names, if the input had a header row.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Identifier convention this hierarchy was built with.
    pub fn scheme(&self) -> &IdScheme {
        &self.scheme
    }

    /// Re-root `node` as a hierarchy of its own.
    ///
    /// Identifiers are rebased so that `node` becomes the scheme's root
    /// (`gen.0.2.1` under `gen.0.2` becomes `gen.0.1`). Without
    /// `with_subtree` only `node` and its instances are kept. The class
    /// histogram covers the kept instances; `self` is left untouched.
    pub fn sub_hierarchy(&self, node: &Node, with_subtree: bool) -> Result<Hierarchy> {
        let node = self.owned(node)?;
        let prefix = node.id.len();
        let members = if with_subtree {
            self.subtree(node)
        } else {
            vec![node]
        };
        let nodes = members
            .into_iter()
            .map(|n| {
                let id = format!("{}{}", self.scheme.root, &n.id[prefix..]);
                let instances = n.instances.iter().map(|i| i.rebased(id.as_str())).collect();
                Node {
                    synthesized: n.synthesized,
                    ..Node::new(id).with_instances(instances)
                }
            })
            .collect();
        self.reassemble(nodes)
    }

    /// Copy of this hierarchy without the node named `id` and its subtree.
    ///
    /// Removing the root fails with
    /// [`MissingOrDuplicateRoot`](Error::MissingOrDuplicateRoot).
    pub fn without(&self, id: &str) -> Result<Hierarchy> {
        if self.find_by_id(id).is_none() {
            return Err(Error::UnknownNode { id: id.to_string() });
        }
        let nodes = self
            .nodes
            .iter()
            .filter(|n| !self.scheme.same_id(&n.id, id) && !self.scheme.is_ancestor_of(id, &n.id))
            .cloned()
            .map(Node::unlinked)
            .collect();
        self.reassemble(nodes)
    }

    fn owned<'a>(&'a self, node: &Node) -> Result<&'a Node> {
        self.nodes
            .get(node.index)
            .filter(|n| core::ptr::eq(*n, node))
            .ok_or_else(|| Error::UnknownNode {
                id: node.id.clone(),
            })
    }

    fn reassemble(&self, nodes: Vec<Node>) -> Result<Hierarchy> {
        let set = NodeSet {
            feature_count: self.feature_count,
            feature_names: self.feature_names.clone(),
            ..NodeSet::from_nodes(nodes)
        };
        assemble(set, &self.scheme, false)
    }

    /// Clone every node with its links cleared, ready to be assembled again.
    pub fn detached_nodes(&self) -> Vec<Node> {
        self.nodes.iter().cloned().map(Node::unlinked).collect()
    }

    /// Features of `node` (and optionally its subtree) as a dense
    /// `instances x features` matrix.
    #[cfg(feature = "ndarray")]
    pub fn feature_matrix(&self, node: &Node, with_subtree: bool) -> ndarray::Array2<f64> {
        let instances: Vec<&Instance> = if with_subtree {
            self.subtree_instances(node)
        } else {
            node.instances.iter().collect()
        };
        let mut matrix = ndarray::Array2::zeros((instances.len(), self.feature_count));
        for (mut row, inst) in matrix.rows_mut().into_iter().zip(instances) {
            for (cell, &value) in row.iter_mut().zip(inst.features()) {
                *cell = value;
            }
        }
        matrix
    }

    /// Export the tree as a directed graph (parent -> child) weighted by
    /// node identifiers. Graph node indices match [`Node::index`].
    #[cfg(feature = "graph")]
    pub fn to_graph(&self) -> petgraph::graph::DiGraph<String, ()> {
        use petgraph::graph::{DiGraph, NodeIndex};

        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len().saturating_sub(1));
        for node in &self.nodes {
            let _ = graph.add_node(node.id.clone());
        }
        for node in &self.nodes {
            if let Some(parent) = node.parent {
                let _ = graph.add_edge(NodeIndex::new(parent), NodeIndex::new(node.index), ());
            }
        }
        graph
    }

    fn fmt_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &Node,
        prefix: &str,
        is_tail: bool,
    ) -> fmt::Result {
        writeln!(f, "{prefix}{}{node}", if is_tail { "L-- " } else { "|-- " })?;
        let child_prefix = format!("{prefix}{}", if is_tail { "    " } else { "|   " });
        let last = node.children.len().saturating_sub(1);
        for (i, &child) in node.children.iter().enumerate() {
            self.fmt_subtree(f, &self.nodes[child], &child_prefix, i == last)?;
        }
        Ok(())
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, self.root(), "", true)
    }
}
