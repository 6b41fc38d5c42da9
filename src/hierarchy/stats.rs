//! Structural statistics of an assembled hierarchy.

use std::collections::BTreeMap;

use super::tree::Hierarchy;

/// Shape summary of a hierarchy.
///
/// Levels are indexed by depth (0 = root).
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyStats {
    /// Number of levels (height + 1).
    pub num_levels: usize,
    /// Nodes per level.
    pub level_sizes: Vec<usize>,
    /// Leaves per level.
    pub leaves_per_level: Vec<usize>,
    /// Instances owned by nodes on each level.
    pub instances_per_level: Vec<usize>,
    /// Total nodes.
    pub total_nodes: usize,
    /// Total leaves.
    pub leaf_count: usize,
    /// Number of nodes having each child count.
    pub children_histogram: BTreeMap<usize, usize>,
    /// Average children per internal node.
    pub avg_fanout: f64,
    /// Largest child count.
    pub max_fanout: usize,
    /// Average depth of leaves.
    pub avg_path_length: f64,
}

impl HierarchyStats {
    /// Walk `hierarchy` once and collect its statistics.
    pub fn compute(hierarchy: &Hierarchy) -> Self {
        let nodes = hierarchy.all_nodes();
        let num_levels = nodes.iter().map(|n| n.depth() + 1).max().unwrap_or(0);

        let mut level_sizes = vec![0; num_levels];
        let mut leaves_per_level = vec![0; num_levels];
        let mut instances_per_level = vec![0; num_levels];
        let mut children_histogram = BTreeMap::new();
        let mut internal = 0usize;
        let mut total_children = 0usize;
        let mut leaf_depths = 0usize;

        for node in nodes {
            let depth = node.depth();
            let fanout = node.child_indices().len();
            level_sizes[depth] += 1;
            instances_per_level[depth] += node.instances().len();
            *children_histogram.entry(fanout).or_insert(0) += 1;
            if fanout == 0 {
                leaves_per_level[depth] += 1;
                leaf_depths += depth;
            } else {
                internal += 1;
                total_children += fanout;
            }
        }

        let leaf_count: usize = leaves_per_level.iter().sum();
        Self {
            num_levels,
            level_sizes,
            leaves_per_level,
            instances_per_level,
            total_nodes: nodes.len(),
            leaf_count,
            max_fanout: children_histogram.keys().next_back().copied().unwrap_or(0),
            children_histogram,
            avg_fanout: ratio(total_children, internal),
            avg_path_length: ratio(leaf_depths, leaf_count),
        }
    }

    /// Height of the tree (root-only tree = 0).
    pub fn height(&self) -> usize {
        self.num_levels.saturating_sub(1)
    }

    /// Widest level.
    pub fn max_width(&self) -> usize {
        self.level_sizes.iter().copied().max().unwrap_or(0)
    }

    /// Fraction of nodes that are leaves.
    pub fn leaf_ratio(&self) -> f64 {
        ratio(self.leaf_count, self.total_nodes)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
