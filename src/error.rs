use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for `hiertree`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while loading or assembling a hierarchy.
///
/// Loading is fail-fast: the first error aborts the load and no partial
/// hierarchy is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The input source could not be opened or read.
    #[error("cannot read hierarchy source '{}': {source}", path.display())]
    SourceUnavailable {
        /// Path (or stream label) of the source.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A record has the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}: {record:?}")]
    MalformedRecord {
        /// 1-based line number in the source.
        line: usize,
        /// Field count fixed by the first record.
        expected: usize,
        /// Field count of this record.
        found: usize,
        /// The offending line.
        record: String,
    },

    /// A feature token is not a floating point number.
    #[error("line {line}: feature {column} is not a number: {token:?}")]
    InvalidFeatureValue {
        /// 1-based line number in the source.
        line: usize,
        /// 0-based feature column.
        column: usize,
        /// The token that failed to parse.
        token: String,
    },

    /// The root sentinel is absent or appears more than once.
    #[error("expected exactly one root node '{root}', found {found}")]
    MissingOrDuplicateRoot {
        /// The configured root sentinel.
        root: String,
        /// Number of root nodes found.
        found: usize,
    },

    /// No parent path can be derived from this identifier.
    #[error("cannot derive a parent for node '{id}'")]
    UnresolvableParent {
        /// The offending identifier.
        id: String,
    },

    /// Two nodes share an identifier (case-insensitive).
    #[error("duplicate node identifier '{id}'")]
    AmbiguousDuplicateIdentifier {
        /// The duplicated identifier.
        id: String,
    },

    /// Breadth filling needs numeric sibling indices.
    #[error("node '{id}' has a non-numeric sibling index; cannot fill breadth gaps")]
    NonNumericSiblingIndex {
        /// The offending identifier.
        id: String,
    },

    /// A sibling index exceeds the configured maximum for breadth filling.
    #[error("node '{id}' has sibling index above {max}; refusing to fill breadth gaps")]
    SiblingIndexOutOfRange {
        /// The offending identifier.
        id: String,
        /// The configured maximum.
        max: u64,
    },

    /// A line is not valid UTF-8 text.
    #[error("line {line}: record is not valid UTF-8")]
    InvalidRecordEncoding {
        /// 1-based line number in the source.
        line: usize,
    },

    /// The node does not belong to this hierarchy.
    #[error("node '{id}' is not part of this hierarchy")]
    UnknownNode {
        /// Identifier of the node.
        id: String,
    },

    /// Load options could not be parsed.
    #[error("invalid load options in '{}': {source}", path.display())]
    InvalidConfig {
        /// Options file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether this error came from reading or parsing records, as opposed to
    /// assembling the tree.
    pub fn is_ingest_error(&self) -> bool {
        matches!(
            self,
            Error::SourceUnavailable { .. }
                | Error::MalformedRecord { .. }
                | Error::InvalidFeatureValue { .. }
                | Error::InvalidRecordEncoding { .. }
        )
    }
}
