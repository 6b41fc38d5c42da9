//! Structural health checks for assembled hierarchies.
//!
//! Assembly already guarantees the tree invariants; these checks verify them
//! independently, which is useful after round-tripping data through other
//! tools or when debugging a generator:
//! - exactly one root, every node reachable from it, no cycles
//! - parent and child links agree
//! - links agree with identifiers (parent path, depth)
//! - uniform feature width; placeholders own no instances
//!
//! # Example
//!
//! ```rust,ignore
//! use hiertree::{load, HealthCheck, LoadOptions};
//!
//! let h = load("clusters.csv", &LoadOptions::default())?;
//! let report = h.health_check();
//! if !report.is_healthy() {
//!     eprintln!("{report}");
//! }
//! ```

use std::collections::{HashMap, HashSet};

use super::node::Node;
use super::tree::Hierarchy;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational, not a problem.
    Info,
    /// Unusual but not invalid.
    Warning,
    /// An invariant is violated.
    Error,
    /// The structure is not a tree.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Identifier of the node involved, if any.
    pub node_id: Option<String>,
    /// Optional additional context.
    pub context: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            node_id: None,
            context: None,
        }
    }

    /// Attach the node this issue is about.
    pub fn with_node(mut self, id: impl Into<String>) -> Self {
        self.node_id = Some(id.into());
        self
    }

    /// Add context to this issue.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(id) = &self.node_id {
            write!(f, " (node {id})")?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " - {ctx}")?;
        }
        Ok(())
    }
}

/// Collected findings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Add an info-level issue.
    fn info(&mut self, message: impl Into<String>) {
        self.add(ValidationIssue::new(Severity::Info, message));
    }

    /// Add an error-level issue about one node.
    fn node_error(&mut self, node: &Node, message: impl Into<String>) {
        self.add(ValidationIssue::new(Severity::Error, message).with_node(node.id()));
    }

    /// Add a critical-level issue.
    fn critical(&mut self, message: impl Into<String>) {
        self.add(ValidationIssue::new(Severity::Critical, message));
    }

    /// No errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        !self.issues.iter().any(|i| i.severity >= Severity::Error)
    }

    /// No issues at all.
    fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues at or above `min_severity`.
    pub fn issues_at_level(&self, min_severity: Severity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity >= min_severity)
            .collect()
    }

    /// Issue count per severity.
    fn counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_default() += 1;
        }
        counts
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "Validation passed: no issues found");
        }

        let counts = self.counts();
        let parts: Vec<String> = [
            (Severity::Critical, "critical"),
            (Severity::Error, "errors"),
            (Severity::Warning, "warnings"),
            (Severity::Info, "info"),
        ]
        .iter()
        .filter_map(|(sev, name)| counts.get(sev).map(|c| format!("{c} {name}")))
        .collect();
        writeln!(f, "Validation report: {}", parts.join(", "))?;

        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Validation findings plus a shape summary.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation issues.
    pub validation: ValidationReport,
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of placeholder nodes.
    pub synthesized_count: usize,
    /// Deepest node depth.
    pub max_depth: usize,
    /// Average children per node.
    pub avg_branching_factor: f64,
}

impl HealthReport {
    /// No errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hierarchy Health Report")?;
        writeln!(f, "=======================")?;
        writeln!(
            f,
            "Nodes: {} ({} leaves, {} synthesized)",
            self.node_count, self.leaf_count, self.synthesized_count
        )?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        writeln!(f, "Avg branching factor: {:.2}", self.avg_branching_factor)?;
        writeln!(f)?;
        write!(f, "{}", self.validation)
    }
}

/// Types that can be health-checked.
pub trait HealthCheck {
    /// Perform a health check and return a report.
    fn health_check(&self) -> HealthReport;

    /// Quick check: returns true if healthy.
    fn is_healthy(&self) -> bool {
        self.health_check().is_healthy()
    }
}

impl HealthCheck for Hierarchy {
    fn health_check(&self) -> HealthReport {
        let nodes = self.all_nodes();
        let scheme = self.scheme();
        let mut validation = validate_tree_structure(nodes);

        let mut seen = HashSet::new();
        for node in nodes {
            if !seen.insert(scheme.key(node.id())) {
                validation.node_error(node, "duplicate identifier");
            }

            match scheme.depth_of(node.id()) {
                Ok(depth) if depth != node.depth() => validation.add(
                    ValidationIssue::new(Severity::Error, "depth disagrees with identifier")
                        .with_node(node.id())
                        .with_context(format!("stored {}, identifier {depth}", node.depth())),
                ),
                Ok(_) => {}
                Err(_) => validation.node_error(node, "malformed identifier"),
            }

            match (self.parent(node), scheme.parent_of(node.id())) {
                (Some(parent), Ok(expected)) if !scheme.same_id(parent.id(), expected) => {
                    validation.add(
                        ValidationIssue::new(Severity::Error, "parent link disagrees with identifier")
                            .with_node(node.id())
                            .with_context(format!("linked to {}, expected {expected}", parent.id())),
                    )
                }
                (None, _) if !scheme.is_root(node.id()) => {
                    validation.node_error(node, "parentless node is not the root sentinel")
                }
                _ => {}
            }

            if node.is_synthesized() && !node.instances().is_empty() {
                validation.node_error(node, "synthesized node owns instances");
            }
            for inst in node.instances() {
                if inst.features().len() != self.feature_count() {
                    validation.add(
                        ValidationIssue::new(Severity::Error, "feature width mismatch")
                            .with_node(node.id())
                            .with_context(format!(
                                "expected {}, found {}",
                                self.feature_count(),
                                inst.features().len()
                            )),
                    );
                }
                if !scheme.same_id(inst.node_id(), node.id()) {
                    validation.add(
                        ValidationIssue::new(Severity::Warning, "instance names another node")
                            .with_node(node.id())
                            .with_context(inst.node_id().to_string()),
                    );
                }
            }
        }

        let synthesized_count = self.synthesized_count();
        if synthesized_count > 0 {
            validation.info(format!("{synthesized_count} placeholder nodes"));
        }

        let node_count = nodes.len();
        let avg_branching_factor = if node_count == 0 {
            0.0
        } else {
            let total_children: usize = nodes.iter().map(|n| n.child_indices().len()).sum();
            total_children as f64 / node_count as f64
        };

        HealthReport {
            validation,
            node_count,
            leaf_count: nodes.iter().filter(|n| n.is_leaf()).count(),
            synthesized_count,
            max_depth: nodes.iter().map(Node::depth).max().unwrap_or(0),
            avg_branching_factor,
        }
    }
}

/// Check that the parent/child links of `nodes` form a single tree.
///
/// Links are indices into `nodes`.
pub fn validate_tree_structure(nodes: &[Node]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let roots: Vec<usize> = (0..nodes.len())
        .filter(|&i| nodes[i].parent_index().is_none())
        .collect();
    if roots.is_empty() {
        report.critical("no root node found - links form a cycle");
    } else if roots.len() > 1 {
        let ids: Vec<&str> = roots.iter().map(|&i| nodes[i].id()).collect();
        report.add(
            ValidationIssue::new(Severity::Error, "multiple roots found")
                .with_context(format!("{ids:?}")),
        );
    }

    for node in nodes {
        for &child in node.child_indices() {
            match nodes.get(child) {
                None => report.add(
                    ValidationIssue::new(Severity::Error, "child index does not exist")
                        .with_node(node.id())
                        .with_context(format!("missing child {child}")),
                ),
                Some(c) if c.parent_index() != Some(node.index()) => report.add(
                    ValidationIssue::new(
                        Severity::Error,
                        "parent lists child but child names another parent",
                    )
                    .with_node(c.id())
                    .with_context(format!("listed by {}", node.id())),
                ),
                Some(_) => {}
            }
        }
        if let Some(parent) = node.parent_index() {
            let listed = nodes
                .get(parent)
                .is_some_and(|p| p.child_indices().contains(&node.index()));
            if !listed {
                report.node_error(node, "child claims parent but parent doesn't list child");
            }
        }
    }

    // Walk from the roots; a node met twice means a cycle or a shared child.
    let mut reached = HashSet::new();
    let mut stack = roots;
    let mut revisited = false;
    while let Some(i) = stack.pop() {
        if !reached.insert(i) {
            revisited = true;
            continue;
        }
        if let Some(node) = nodes.get(i) {
            stack.extend(node.child_indices().iter().filter(|&&c| c < nodes.len()));
        }
    }
    if revisited {
        report.critical("node reached twice - cycle or shared child");
    }

    let orphans: Vec<&str> = nodes
        .iter()
        .filter(|n| !reached.contains(&n.index()))
        .map(Node::id)
        .collect();
    if !orphans.is_empty() {
        report.add(
            ValidationIssue::new(
                Severity::Error,
                format!("{} orphaned nodes not reachable from root", orphans.len()),
            )
            .with_context(format!("first few: {:?}", &orphans[..orphans.len().min(5)])),
        );
    }

    report
}
