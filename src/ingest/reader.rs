//! Delimited record parsing.
//!
//! One pass over the stream: every non-blank line becomes an [`Instance`]
//! attached to the node named in its first column. Rows naming the same
//! node (case-insensitively) are grouped regardless of position; the
//! first-seen spelling names the node.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead};
use std::path::Path;

use tracing::debug;

use super::options::LoadOptions;
use crate::error::{Error, Result};
use crate::hierarchy::assemble::NodeSet;
use crate::hierarchy::node::{Instance, Node};

/// Parse every record of `reader` into unlinked nodes.
///
/// `source` labels I/O errors. The first record fixes the field count; any
/// later record with a different count is rejected.
pub fn read_records<R: BufRead>(
    reader: R,
    source: &Path,
    options: &LoadOptions,
) -> Result<NodeSet> {
    let leading = options.leading_columns();
    let mut nodes: Vec<Node> = Vec::new();
    let mut groups: HashMap<String, usize> = HashMap::new();
    let mut class_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut header: Option<(usize, Vec<String>)> = None;
    let mut expected: Option<usize> = None;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|err| line_error(err, line_no, source))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(options.delimiter).map(str::trim).collect();

        if options.has_header && header.is_none() {
            let names = fields.iter().skip(leading).map(|s| s.to_string()).collect();
            header = Some((line_no, names));
            continue;
        }

        let arity = *expected.get_or_insert(fields.len());
        if fields.len() != arity || arity <= leading {
            return Err(Error::MalformedRecord {
                line: line_no,
                expected: arity.max(leading + 1),
                found: fields.len(),
                record: line.clone(),
            });
        }

        let features = fields[leading..]
            .iter()
            .enumerate()
            .map(|(column, token)| {
                token.parse::<f64>().map_err(|_| Error::InvalidFeatureValue {
                    line: line_no,
                    column,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let id = fields[0];
        let mut instance = Instance::new(id, features);
        let mut column = 1;
        if options.has_class_column {
            let class = fields[column];
            column += 1;
            if !class.is_empty() {
                *class_counts.entry(class.to_string()).or_insert(0) += 1;
                instance = instance.with_class(class);
            }
        }
        if options.has_name_column && !fields[column].is_empty() {
            instance = instance.with_name(fields[column]);
        }

        let key = options.scheme.key(id);
        let slot = match groups.get(&key) {
            Some(&slot) => slot,
            None => {
                debug!(line = line_no, id, "new node");
                nodes.push(Node::new(id));
                let _ = groups.insert(key, nodes.len() - 1);
                nodes.len() - 1
            }
        };
        nodes[slot].push_instance(instance);
    }

    let feature_count = expected.map_or(0, |arity| arity - leading);
    let feature_names = match header {
        Some((line, names)) if expected.is_some() && names.len() != feature_count => {
            return Err(Error::MalformedRecord {
                line,
                expected: feature_count + leading,
                found: names.len() + leading,
                record: names.join(&options.delimiter.to_string()),
            });
        }
        Some((_, names)) => Some(names),
        None => None,
    };

    Ok(NodeSet {
        nodes,
        class_counts,
        feature_count,
        feature_names,
    })
}

/// Classify a failed line read: undecodable text is the record's fault,
/// anything else means the source itself failed.
pub(crate) fn line_error(err: io::Error, line: usize, source: &Path) -> Error {
    if err.kind() == io::ErrorKind::InvalidData {
        Error::InvalidRecordEncoding { line }
    } else {
        Error::SourceUnavailable {
            path: source.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str, options: &LoadOptions) -> Result<NodeSet> {
        read_records(Cursor::new(text), Path::new("<test>"), options)
    }

    #[test]
    fn groups_rows_by_identifier() {
        let opts = LoadOptions::default().with_class_column(true);
        let set = read("gen.0;a;0.0\nGEN.0.1;b;1.0\n\ngen.0;a; 2.5 \ngen.0.1;;3.0\n", &opts).unwrap();

        assert_eq!(set.nodes.len(), 2);
        assert_eq!(set.nodes[0].instances().len(), 2);
        assert_eq!(set.nodes[1].id(), "GEN.0.1");
        assert_eq!(set.nodes[1].instances()[1].class(), None);
        assert_eq!(set.nodes[0].instances()[1].features(), &[2.5]);
        assert_eq!(set.feature_count, 1);
        assert_eq!(set.class_counts.get("a"), Some(&2));
        assert_eq!(set.class_counts.get("b"), Some(&1));
        assert_eq!(set.root_index(&opts.scheme), Some(0));
    }

    #[test]
    fn name_column_follows_class() {
        let opts = LoadOptions::default()
            .with_class_column(true)
            .with_name_column(true);
        let set = read("gen.0;c;first;1;2\n", &opts).unwrap();
        let inst = &set.nodes[0].instances()[0];
        assert_eq!(inst.class(), Some("c"));
        assert_eq!(inst.name(), Some("first"));
        assert_eq!(inst.features(), &[1.0, 2.0]);
    }

    #[test]
    fn arity_mismatch_is_malformed() {
        let err = read("gen.0;1;2\ngen.0.1;1\n", &LoadOptions::default()).unwrap_err();
        match err {
            Error::MalformedRecord { line, expected, found, .. } => {
                assert_eq!((line, expected, found), (2, 3, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn first_record_needs_a_feature() {
        let opts = LoadOptions::default().with_class_column(true);
        let err = read("gen.0;1\n", &opts).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 1, expected: 3, found: 2, .. }));
    }

    #[test]
    fn bad_feature_reports_column() {
        let err = read("gen.0;1.0;2.0\ngen.0.1;1.0;abc\n", &LoadOptions::default()).unwrap_err();
        match err {
            Error::InvalidFeatureValue { line, column, token } => {
                assert_eq!((line, column, token.as_str()), (2, 1, "abc"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_names_features() {
        let opts = LoadOptions::default().with_header(true).with_class_column(true);
        let set = read("\nid;class;width;height\ngen.0;x;1;2\n", &opts).unwrap();
        assert_eq!(
            set.feature_names.as_deref(),
            Some(&["width".to_string(), "height".to_string()][..])
        );
        assert_eq!(set.nodes.len(), 1);
    }

    #[test]
    fn header_width_must_match() {
        let opts = LoadOptions::default().with_header(true);
        let err = read("id;a\ngen.0;1;2\n", &opts).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn invalid_utf8_names_the_line() {
        let bytes = b"gen.0;1.0\ngen.0.\xff;2.0\n".to_vec();
        let err = read_records(Cursor::new(bytes), Path::new("<test>"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRecordEncoding { line: 2 }));
        assert!(err.is_ingest_error());
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        let set = read("\n  \n", &LoadOptions::default()).unwrap();
        assert!(set.nodes.is_empty());
        assert_eq!(set.feature_count, 0);
    }
}
