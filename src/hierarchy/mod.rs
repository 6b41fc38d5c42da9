//! Tree structures reconstructed from path-like identifiers.
//!
//! # Identifiers carry the structure
//!
//! Every node is named by its path from the root, so the parent, depth and
//! sibling position of a node are all readable from its identifier:
//!
//! ```text
//! Identifier   │ Parent    │ Depth │ Sibling index
//! ─────────────┼───────────┼───────┼──────────────
//! gen.0        │ -         │ 0     │ -
//! gen.0.3      │ gen.0     │ 1     │ 3
//! gen.0.3.1    │ gen.0.3   │ 2     │ 1
//! ```
//!
//! Inputs need not mention every node on a path. [`assemble`] synthesizes
//! the missing ancestors (and, optionally, missing siblings) so that the
//! resulting [`Hierarchy`] is a complete tree.
//!
//! # Module Overview
//!
//! - [`id`]: identifier parsing and comparison ([`IdScheme`])
//! - [`node`]: [`Node`] and [`Instance`]
//! - [`assemble`]: linking and gap filling
//! - [`tree`]: the read-only [`Hierarchy`] aggregate
//! - [`role`]: a node's relation to a focus node
//! - [`rows`]: level-order row numbers
//! - [`stats`]: shape statistics
//! - [`validate`]: independent invariant checks

pub mod assemble;
pub mod id;
pub mod node;
pub mod role;
pub mod rows;
pub mod stats;
pub mod tree;
pub mod validate;

pub use assemble::{assemble, NodeSet};
pub use id::{IdScheme, DEFAULT_ROOT_ID, DEFAULT_SEPARATOR};
pub use node::{Instance, Node};
pub use role::{classify, classify_all, Role};
pub use rows::{level_order, resolve_row, row_of};
pub use stats::HierarchyStats;
pub use tree::Hierarchy;
pub use validate::{HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport};
