//! Tree nodes and the data instances they own.

use core::fmt;

/// One input row: a feature vector attached to a node.
///
/// Instances are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    name: Option<String>,
    node_id: String,
    features: Vec<f64>,
    class: Option<String>,
}

impl Instance {
    /// Create an instance owned by `node_id`.
    pub fn new(node_id: impl Into<String>, features: Vec<f64>) -> Self {
        Self {
            name: None,
            node_id: node_id.into(),
            features,
            class: None,
        }
    }

    /// Attach a true-class label.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Copy of this instance owned by `node_id`.
    pub(crate) fn rebased(&self, node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            ..self.clone()
        }
    }

    /// Display name, if the input carried one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Identifier of the owning node.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Feature vector.
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// True-class label, if the input carried one.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}

/// A vertex of the hierarchy.
///
/// Nodes refer to their parent and children by index into
/// [`Hierarchy::all_nodes`](super::Hierarchy::all_nodes). Links are only
/// meaningful once the node belongs to an assembled hierarchy; a freshly
/// created node has none.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) index: usize,
    pub(crate) depth: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) instances: Vec<Instance>,
    pub(crate) synthesized: bool,
}

impl Node {
    /// Create an unlinked node for an identifier that appeared in the input.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            index: 0,
            depth: 0,
            parent: None,
            children: Vec::new(),
            instances: Vec::new(),
            synthesized: false,
        }
    }

    /// Create a placeholder node with no instances.
    pub(crate) fn placeholder(id: impl Into<String>) -> Self {
        Self {
            synthesized: true,
            ..Self::new(id)
        }
    }

    /// Replace the node's instances.
    pub fn with_instances(mut self, instances: Vec<Instance>) -> Self {
        self.instances = instances;
        self
    }

    pub(crate) fn push_instance(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// Clear structural links so the node can be assembled again.
    pub(crate) fn unlinked(mut self) -> Self {
        self.parent = None;
        self.children.clear();
        self
    }

    /// Node identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position in the owning hierarchy's node list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Depth in the tree (root = 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Index of the parent node; `None` for the root.
    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of child nodes in ascending sibling order.
    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }

    /// Instances owned directly by this node.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// True if the node was created by gap filling rather than read from input.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True if the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.id, self.instances.len())?;
        if self.synthesized {
            write!(f, "*")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_builders() {
        let inst = Instance::new("gen.0.1", vec![1.0, 2.0])
            .with_class("gen.0.1")
            .with_name("a");
        assert_eq!(inst.node_id(), "gen.0.1");
        assert_eq!(inst.features(), &[1.0, 2.0]);
        assert_eq!(inst.class(), Some("gen.0.1"));
        assert_eq!(inst.name(), Some("a"));
    }

    #[test]
    fn placeholder_is_marked() {
        let node = Node::placeholder("gen.0.3");
        assert!(node.is_synthesized());
        assert!(node.instances().is_empty());
        assert_eq!(node.to_string(), "gen.0.3(0)*");
    }
}
