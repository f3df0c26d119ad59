//! Footnotes and column spanners.

use serde::{Deserialize, Serialize};

/// Cell a footnote is attached to.
///
/// `column` is a column key (see [`ColumnDescriptor::key`](super::ColumnDescriptor::key)),
/// `row` a zero-based body row index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum FootnoteLocation {
    Header { column: String },
    Body { column: String, row: usize },
}

impl FootnoteLocation {
    /// Column key this location refers to
    pub fn column(&self) -> &str {
        match self {
            FootnoteLocation::Header { column } | FootnoteLocation::Body { column, .. } => column,
        }
    }

    /// Body row index, if this is a body location
    pub fn row(&self) -> Option<usize> {
        match self {
            FootnoteLocation::Header { .. } => None,
            FootnoteLocation::Body { row, .. } => Some(*row),
        }
    }
}

/// A note attached to one cell and listed below the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub location: FootnoteLocation,
    pub text: String,
    /// Reference symbol; numbered automatically when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<String>,
}

impl Footnote {
    /// Footnote on a column header
    pub fn header(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            location: FootnoteLocation::Header {
                column: column.into(),
            },
            text: text.into(),
            mark: None,
        }
    }

    /// Footnote on a body cell
    pub fn body(column: impl Into<String>, row: usize, text: impl Into<String>) -> Self {
        Self {
            location: FootnoteLocation::Body {
                column: column.into(),
                row,
            },
            text: text.into(),
            mark: None,
        }
    }

    /// Builder: use an explicit reference symbol
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.mark = Some(mark.into());
        self
    }
}

/// A label spanning a contiguous run of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spanner {
    pub label: String,
    /// Column keys covered, in any order
    pub columns: Vec<String>,
}

impl Spanner {
    pub fn new<I, S>(label: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}
