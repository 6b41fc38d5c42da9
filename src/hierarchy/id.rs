//! Hierarchical node identifiers.
//!
//! A node identifier is the root sentinel followed by zero or more path
//! segments, each introduced by the separator:
//!
//! ```text
//! gen.0          depth 0 (root)
//! gen.0.2        depth 1, sibling index "2"
//! gen.0.2.0      depth 2, parent gen.0.2
//! ```
//!
//! The root sentinel is matched case-insensitively (ASCII), segments are
//! compared exactly. Everything here is a pure function of the strings; no
//! tree is consulted.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default root sentinel.
pub const DEFAULT_ROOT_ID: &str = "gen.0";
/// Path separator between segments.
pub const DEFAULT_SEPARATOR: char = '.';
/// Largest sibling index breadth filling will synthesize up to.
pub const DEFAULT_MAX_SIBLING_INDEX: u64 = 65_535;

/// The identifier convention of one hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdScheme {
    /// Identifier of the root node.
    pub root: String,
    /// Separator between path segments.
    pub separator: char,
    /// Upper bound on numeric sibling indices when filling breadth gaps.
    pub max_sibling_index: u64,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT_ID.to_string(),
            separator: DEFAULT_SEPARATOR,
            max_sibling_index: DEFAULT_MAX_SIBLING_INDEX,
        }
    }
}

impl IdScheme {
    /// Create a scheme with a custom root sentinel and separator.
    pub fn new(root: impl Into<String>, separator: char) -> Self {
        Self {
            root: root.into(),
            separator,
            max_sibling_index: DEFAULT_MAX_SIBLING_INDEX,
        }
    }

    /// Set the largest sibling index breadth filling accepts.
    pub fn with_max_sibling_index(mut self, max: u64) -> Self {
        self.max_sibling_index = max;
        self
    }

    /// Path segments below the root, or `None` if `id` is not well-formed.
    ///
    /// The root itself has no segments.
    pub fn segments<'a>(&self, id: &'a str) -> Option<Vec<&'a str>> {
        let head = id.get(..self.root.len())?;
        if !head.eq_ignore_ascii_case(&self.root) {
            return None;
        }
        let rest = &id[self.root.len()..];
        if rest.is_empty() {
            return Some(Vec::new());
        }
        let rest = rest.strip_prefix(self.separator)?;
        let segments: Vec<&str> = rest.split(self.separator).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments)
    }

    /// True if `id` is the root sentinel or a path below it.
    pub fn is_well_formed(&self, id: &str) -> bool {
        self.segments(id).is_some()
    }

    /// True if `id` names the root.
    pub fn is_root(&self, id: &str) -> bool {
        id.eq_ignore_ascii_case(&self.root)
    }

    /// Number of path segments (root = 0).
    pub fn depth_of(&self, id: &str) -> Result<usize> {
        self.segments(id)
            .map(|s| s.len())
            .ok_or_else(|| Error::UnresolvableParent { id: id.to_string() })
    }

    /// Identifier of the immediate parent: `id` with its last segment removed.
    ///
    /// Fails for the root and for malformed identifiers.
    pub fn parent_of<'a>(&self, id: &'a str) -> Result<&'a str> {
        let last = self
            .segments(id)
            .and_then(|s| s.last().copied())
            .ok_or_else(|| Error::UnresolvableParent { id: id.to_string() })?;
        let cut = id.len() - last.len() - self.separator.len_utf8();
        Ok(&id[..cut])
    }

    /// True iff `a`'s segments are a strict prefix of `b`'s, compared
    /// case-insensitively like whole identifiers.
    pub fn is_ancestor_of(&self, a: &str, b: &str) -> bool {
        match (self.segments(a), self.segments(b)) {
            (Some(a), Some(b)) => {
                a.len() < b.len() && a.iter().zip(&b).all(|(x, y)| x.eq_ignore_ascii_case(y))
            }
            _ => false,
        }
    }

    /// The last path segment, i.e. the position among siblings.
    ///
    /// `None` for the root and for malformed identifiers.
    pub fn sibling_index<'a>(&self, id: &'a str) -> Option<&'a str> {
        self.segments(id).and_then(|s| s.last().copied())
    }

    /// Numeric value of the sibling index, if it is a canonical unsigned
    /// integer (ASCII digits, no sign, no leading zero).
    pub fn sibling_ordinal(&self, id: &str) -> Option<u64> {
        self.sibling_index(id).and_then(ordinal)
    }

    /// Identifier of the child of `parent` at `segment`.
    pub fn child_id(&self, parent: &str, segment: impl core::fmt::Display) -> String {
        format!("{parent}{}{segment}", self.separator)
    }

    /// Case-insensitive identifier equality.
    pub fn same_id(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    /// Key used for identifier lookups.
    pub fn key(&self, id: &str) -> String {
        id.to_ascii_lowercase()
    }

    /// Order two siblings by their last segment.
    pub fn compare_siblings(&self, a: &str, b: &str) -> Ordering {
        match (self.sibling_index(a), self.sibling_index(b)) {
            (Some(x), Some(y)) => compare_segments(x, y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Order identifiers segment by segment; a prefix sorts first.
    ///
    /// This yields depth-first pre-order over a set of identifiers.
    pub fn compare_ids(&self, a: &str, b: &str) -> Ordering {
        match (self.segments(a), self.segments(b)) {
            (Some(x), Some(y)) => x
                .iter()
                .zip(y.iter())
                .map(|(l, r)| compare_segments(l, r))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| x.len().cmp(&y.len())),
            _ => a.cmp(b),
        }
    }
}

fn ordinal(segment: &str) -> Option<u64> {
    let canonical = segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// Numeric segments sort by value and before non-numeric ones.
fn compare_segments(a: &str, b: &str) -> Ordering {
    match (ordinal(a), ordinal(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
