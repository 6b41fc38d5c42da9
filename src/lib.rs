//! # hiertree
//!
//! Rebuild a hierarchical clustering from flat, delimited records.
//!
//! Each record names the node it belongs to with a path-like identifier
//! (`gen.0.2.1`) and carries a feature vector, optionally preceded by a class
//! label and an instance name. Loading groups records into nodes, fills in
//! the nodes the input never mentions and returns an immutable
//! [`Hierarchy`] that can be queried, classified relative to a focus node,
//! or walked row by row.
//!
//! ```rust,no_run
//! use hiertree::{classify, load, resolve_row, LoadOptions};
//!
//! let options = LoadOptions::default().with_class_column(true);
//! let h = load("clusters.csv", &options)?;
//!
//! let focus = resolve_row(&h, 3).unwrap_or(h.root());
//! for node in h.all_nodes() {
//!     println!("{} {}", node.id(), classify(&h, focus, node));
//! }
//! # Ok::<(), hiertree::Error>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

/// Error types used across `hiertree`.
pub mod error;
pub mod hierarchy;
pub mod ingest;

#[cfg(test)]
mod load_tests;

pub use error::{Error, Result};
pub use hierarchy::{
    assemble, classify, classify_all, level_order, resolve_row, row_of, HealthCheck, HealthReport,
    Hierarchy, HierarchyStats, IdScheme, Instance, Node, NodeSet, Role,
};
pub use ingest::{read_records, write_records, LoadOptions, WriteOptions};

/// Load and assemble the hierarchy stored at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Hierarchy> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    build(BufReader::new(file), path, options)
}

/// Load and assemble a hierarchy from any buffered reader.
pub fn load_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Hierarchy> {
    build(reader, Path::new("<reader>"), options)
}

fn build<R: BufRead>(reader: R, source: &Path, options: &LoadOptions) -> Result<Hierarchy> {
    let set = ingest::read_records(reader, source, options)?;
    let hierarchy = hierarchy::assemble(set, &options.scheme, options.fill_breadth_gaps)?;
    info!(
        source = %source.display(),
        nodes = hierarchy.node_count(),
        instances = hierarchy.instance_count(),
        "hierarchy loaded"
    );
    Ok(hierarchy)
}
