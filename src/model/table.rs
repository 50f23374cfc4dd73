//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabError};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => {
                // All NaNs compare equal, so they must hash alike
                // regardless of payload bits
                if f.is_nan() {
                    f64::NAN.to_bits().hash(state)
                } else {
                    f.to_bits().hash(state)
                }
            }
            CellValue::String(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The cell's type tag
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Fold integral floats to `Int` so values that compare equal also
    /// hash equal (`Hash` covers the discriminant, `PartialEq` does not).
    /// Required before using values as hash-map keys.
    pub fn normalized(&self) -> CellValue {
        match self {
            CellValue::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f <= i64::MAX as f64 =>
            {
                CellValue::Int(*f as i64)
            }
            other => other.clone(),
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// An immutable table: an ordered sequence of rows over a fixed column set.
///
/// Construction validates that every row carries exactly one cell per
/// declared column and that column names are unique; joins and the
/// duplicate detector produce new tables rather than mutating inputs.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from column names and rows, inferring column types.
    pub fn new(
        name: impl Into<String>,
        column_names: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let name = name.into();

        for (i, col_name) in column_names.iter().enumerate() {
            if column_names[..i].contains(col_name) {
                return Err(TabError::DuplicateColumn {
                    table: name,
                    column: col_name.clone(),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.cells.len() != column_names.len() {
                return Err(TabError::SchemaMismatch {
                    table: name,
                    row: i,
                    expected: column_names.len(),
                    found: row.cells.len(),
                });
            }
        }

        let mut columns: Vec<Column> = column_names
            .into_iter()
            .enumerate()
            .map(|(i, n)| Column::new(n, i))
            .collect();
        infer_column_types(&mut columns, &rows);

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// The table's label, used in error messages (usually the file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column definitions in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All rows in input order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name, failing with `ColumnNotFound`
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| TabError::ColumnNotFound {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Cell at (row, column name), if both exist
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A copy of this table with one column renamed.
    pub fn renamed(&self, old: &str, new: &str) -> Result<Table> {
        self.require_column(old)?;
        let names: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.name == old {
                    new.to_string()
                } else {
                    c.name.clone()
                }
            })
            .collect();
        Table::new(self.name.clone(), names, self.rows.clone())
    }

    /// A copy of this table with a new label.
    pub fn with_name(mut self, name: impl Into<String>) -> Table {
        self.name = name.into();
        self
    }
}

/// Widen each column's type over the values it holds
fn infer_column_types(columns: &mut [Column], rows: &[Row]) {
    for (col_idx, col) in columns.iter_mut().enumerate() {
        let mut inferred = CellType::Null;
        for row in rows {
            if let Some(cell) = row.cells.get(col_idx) {
                inferred = inferred.widen(cell.cell_type());
            }
        }
        col.inferred_type = inferred;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_construction_validates_row_arity() {
        let err = Table::new(
            "bands",
            names(&["name", "band"]),
            vec![Row::new(vec!["Mick".into()], 1)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TabError::SchemaMismatch {
                table: "bands".into(),
                row: 0,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_construction_rejects_duplicate_columns() {
        let err = Table::new("t", names(&["a", "a"]), vec![]).unwrap_err();
        assert_eq!(
            err,
            TabError::DuplicateColumn {
                table: "t".into(),
                column: "a".into(),
            }
        );
    }

    #[test]
    fn test_column_types_are_inferred() {
        let table = Table::new(
            "t",
            names(&["n", "x"]),
            vec![
                Row::new(vec![CellValue::Int(1), CellValue::Null], 1),
                Row::new(vec![CellValue::Float(2.5), "hi".into()], 2),
            ],
        )
        .unwrap();
        assert_eq!(table.column("n").unwrap().inferred_type, CellType::Float);
        assert_eq!(table.column("x").unwrap().inferred_type, CellType::String);
    }

    #[test]
    fn test_renamed() {
        let table = Table::new(
            "t",
            names(&["name", "plays"]),
            vec![Row::new(vec!["John".into(), "guitar".into()], 1)],
        )
        .unwrap();
        let renamed = table.renamed("name", "MusicalArtist").unwrap();
        assert_eq!(
            renamed.column_names().collect::<Vec<_>>(),
            vec!["MusicalArtist", "plays"]
        );
        assert!(table.renamed("missing", "x").is_err());
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        assert_eq!(CellValue::Int(2), CellValue::Float(2.0));
        assert_ne!(CellValue::Int(2), CellValue::Float(2.5));
        assert_eq!(CellValue::Null, CellValue::Null);
    }

    #[test]
    fn test_nan_payloads_hash_alike() {
        fn fx_hash(value: &CellValue) -> u64 {
            use std::hash::Hasher;
            let mut hasher = rustc_hash::FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        }

        // Quiet NaN with a non-canonical payload
        let odd_nan = CellValue::Float(f64::from_bits(0x7ff8_0000_0000_0001));
        let nan = CellValue::Float(f64::NAN);
        assert_eq!(odd_nan, nan);
        assert_eq!(fx_hash(&odd_nan), fx_hash(&nan));
    }
}
