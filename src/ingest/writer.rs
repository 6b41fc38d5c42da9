//! Serialize a hierarchy back into the record format.

use std::io::{self, Write};

use super::options::{LoadOptions, DEFAULT_DELIMITER};
use crate::hierarchy::tree::Hierarchy;

/// Which columns [`write_records`] emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Field delimiter.
    pub delimiter: char,
    /// Emit the class label column (empty for unlabelled instances).
    pub class_column: bool,
    /// Emit the instance name column (empty for unnamed instances).
    pub name_column: bool,
    /// Emit a header row first.
    pub header: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            class_column: false,
            name_column: false,
            header: false,
        }
    }
}

impl WriteOptions {
    /// Columns that `options` will read back.
    pub fn matching(options: &LoadOptions) -> Self {
        Self {
            delimiter: options.delimiter,
            class_column: options.has_class_column,
            name_column: options.has_name_column,
            header: options.has_header,
        }
    }
}

/// Write every instance of `hierarchy`, nodes in pre-order.
///
/// Placeholder nodes own no instances and therefore produce no rows. Header
/// feature names come from the hierarchy, or `dimension_<i>` when it has none.
pub fn write_records<W: Write>(
    hierarchy: &Hierarchy,
    mut writer: W,
    options: &WriteOptions,
) -> io::Result<()> {
    let sep = options.delimiter.to_string();

    if options.header {
        let mut columns = vec!["id".to_string()];
        if options.class_column {
            columns.push("class".to_string());
        }
        if options.name_column {
            columns.push("name".to_string());
        }
        match hierarchy.feature_names() {
            Some(names) => columns.extend(names.iter().cloned()),
            None => columns.extend((0..hierarchy.feature_count()).map(|i| format!("dimension_{i}"))),
        }
        writeln!(writer, "{}", columns.join(&sep))?;
    }

    for node in hierarchy.all_nodes() {
        for inst in node.instances() {
            let mut fields = vec![node.id().to_string()];
            if options.class_column {
                fields.push(inst.class().unwrap_or_default().to_string());
            }
            if options.name_column {
                fields.push(inst.name().unwrap_or_default().to_string());
            }
            fields.extend(inst.features().iter().map(f64::to_string));
            writeln!(writer, "{}", fields.join(&sep))?;
        }
    }
    writer.flush()
}
