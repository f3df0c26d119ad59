//! Immutable tabular datasets.

use serde::{Deserialize, Serialize};

use super::value::Scalar;
use crate::error::TabkitError;
use crate::Result;

/// Wire form of a dataset, validated into a [`Dataset`] on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDataset {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Scalar>>,
}

/// An ordered sequence of rows sharing one ordered set of column names.
///
/// A dataset is validated when it is constructed and cannot be changed
/// afterwards. Every row holds exactly one value per column.
///
/// ```rust
/// use tabkit::{Dataset, Scalar};
///
/// let data = Dataset::new(
///     ["Rank", "Model"],
///     vec![vec![1.into(), "A".into()], vec![2.into(), "B".into()]],
/// )
/// .unwrap();
/// assert_eq!(data.row_count(), 2);
/// assert_eq!(data.value(1, "Model"), Some(&Scalar::text("B")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset", into = "RawDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl Dataset {
    /// Create a dataset from column names and positional rows.
    ///
    /// Fails with a configuration error if a column name repeats or a row
    /// does not have one value per column.
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Scalar>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        check_unique(&columns)?;

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(TabkitError::config(format!(
                "row {} has {} values but the dataset has {} columns",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Dataset { columns, rows })
    }

    /// Create a dataset from records of `(column, value)` pairs.
    ///
    /// Column order is taken from the first record. Later records may list
    /// their fields in any order but must carry exactly the same names.
    pub fn from_records<R, K, V>(records: R) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let fields: Vec<(String, Scalar)> = record
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();

            let names = columns.get_or_insert_with(|| {
                fields.iter().map(|(name, _)| name.clone()).collect()
            });

            let mut row = vec![Scalar::Missing; names.len()];
            let mut seen = vec![false; names.len()];
            for (name, value) in fields {
                let pos = names.iter().position(|c| *c == name).ok_or_else(|| {
                    TabkitError::config(format!(
                        "record {} has field '{}' not present in the first record",
                        index, name
                    ))
                })?;
                if seen[pos] {
                    return Err(TabkitError::config(format!(
                        "record {} repeats field '{}'",
                        index, name
                    )));
                }
                seen[pos] = true;
                row[pos] = value;
            }
            if let Some(pos) = seen.iter().position(|s| !s) {
                return Err(TabkitError::config(format!(
                    "record {} is missing field '{}'",
                    index, names[pos]
                )));
            }
            rows.push(row);
        }

        Dataset::new(columns.unwrap_or_default(), rows)
    }

    /// Column names in their native order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the native order
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value at a row for a named column
    pub fn value(&self, row: usize, column: &str) -> Option<&Scalar> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Positional values of one row
    pub fn row(&self, index: usize) -> Option<&[Scalar]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// All values of a column, top to bottom
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Scalar>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    for (i, name) in columns.iter().enumerate() {
        if columns[..i].contains(name) {
            return Err(TabkitError::config(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }
    Ok(())
}

impl TryFrom<RawDataset> for Dataset {
    type Error = TabkitError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::new(raw.columns, raw.rows)
    }
}

impl From<Dataset> for RawDataset {
    fn from(data: Dataset) -> Self {
        RawDataset {
            columns: data.columns,
            rows: data.rows,
        }
    }
}
