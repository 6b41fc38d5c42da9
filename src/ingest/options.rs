//! Load options: column layout, gap filling and the identifier scheme.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use super::reader::line_error;
use crate::hierarchy::id::IdScheme;

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = ';';

/// How to read a record stream.
///
/// All fields default, so an options file only needs the keys it changes:
///
/// ```json
/// { "has_class_column": true, "scheme": { "root": "root" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Column 1 holds a true-class label.
    pub has_class_column: bool,
    /// The column after the id (and class) holds an instance name.
    pub has_name_column: bool,
    /// The first non-blank line holds column names.
    pub has_header: bool,
    /// Synthesize missing sibling indices under every parent.
    pub fill_breadth_gaps: bool,
    /// Field delimiter.
    pub delimiter: char,
    /// Identifier convention.
    pub scheme: IdScheme,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_class_column: false,
            has_name_column: false,
            has_header: false,
            fill_breadth_gaps: false,
            delimiter: DEFAULT_DELIMITER,
            scheme: IdScheme::default(),
        }
    }
}

impl LoadOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether records carry a class label.
    pub fn with_class_column(mut self, yes: bool) -> Self {
        self.has_class_column = yes;
        self
    }

    /// Set whether records carry an instance name.
    pub fn with_name_column(mut self, yes: bool) -> Self {
        self.has_name_column = yes;
        self
    }

    /// Set whether the input starts with a header row.
    pub fn with_header(mut self, yes: bool) -> Self {
        self.has_header = yes;
        self
    }

    /// Set whether sibling gaps are filled.
    pub fn with_breadth_fill(mut self, yes: bool) -> Self {
        self.fill_breadth_gaps = yes;
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the identifier scheme.
    pub fn with_scheme(mut self, scheme: IdScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Number of columns before the first feature.
    pub fn leading_columns(&self) -> usize {
        1 + usize::from(self.has_class_column) + usize::from(self.has_name_column)
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default options with the column layout guessed from the file.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        Self::default().detected(path)
    }

    /// Guess the column layout of `path`, keeping this delimiter and scheme.
    pub fn detected(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        self.detected_from(BufReader::new(file), path)
    }

    /// Guess the column layout from the first two non-blank lines of `reader`.
    ///
    /// - header: the first column of line 1 is not a well-formed identifier
    /// - class column: column 1 of the first data line is a well-formed
    ///   identifier
    /// - name column: the column after that does not parse as a number
    ///
    /// With fewer than two lines the layout flags are left unchanged.
    pub fn detected_from<R: BufRead>(mut self, reader: R, source: &Path) -> Result<Self> {
        let mut lines = Vec::with_capacity(2);
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| line_error(err, i + 1, source))?;
            if !line.trim().is_empty() {
                lines.push(line);
                if lines.len() == 2 {
                    break;
                }
            }
        }
        if lines.len() < 2 {
            warn!(
                path = %source.display(),
                lines = lines.len(),
                "too few lines to detect layout, using configured options"
            );
            return Ok(self);
        }

        let delimiter = self.delimiter;
        let split = |line: &str| -> Vec<String> {
            line.split(delimiter).map(|t| t.trim().to_string()).collect()
        };
        let first = split(&lines[0]);
        self.has_header = !self.scheme.is_well_formed(&first[0]);
        let data = if self.has_header { split(&lines[1]) } else { first };

        self.has_class_column = data
            .get(1)
            .is_some_and(|token| self.scheme.is_well_formed(token));
        let name_column = 1 + usize::from(self.has_class_column);
        self.has_name_column = data
            .get(name_column)
            .is_some_and(|token| token.parse::<f64>().is_err());

        debug!(
            header = self.has_header,
            class = self.has_class_column,
            name = self.has_name_column,
            "detected record layout"
        );
        Ok(self)
    }
}
