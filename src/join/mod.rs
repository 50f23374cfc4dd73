//! Join evaluation: specs, options, and the left/inner join engine

mod index;

use crate::error::{Result, TabError};
use crate::model::{CellValue, Row, Table};

pub use index::{JoinKey, KeyIndex};

/// Which rows survive the join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Keep every left row; unmatched right columns are null-filled
    Left,
    /// Keep only rows with a match on both sides
    Inner,
}

/// Key-column mapping between two tables.
///
/// `left[i]` matches `right[i]`; the lists must have the same non-zero
/// length.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    left: Vec<String>,
    right: Vec<String>,
}

impl JoinSpec {
    /// Join on columns carrying the same name in both tables
    pub fn on<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let left: Vec<String> = columns.into_iter().map(Into::into).collect();
        let right = left.clone();
        Self { left, right }
    }

    /// Join left key columns against differently-named right key columns
    pub fn mapped<I, J, S, T>(left: I, right: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            left: left.into_iter().map(Into::into).collect(),
            right: right.into_iter().map(Into::into).collect(),
        }
    }

    pub fn left_keys(&self) -> &[String] {
        &self.left
    }

    pub fn right_keys(&self) -> &[String] {
        &self.right
    }

    fn validate(&self) -> Result<()> {
        if self.left.is_empty() || self.left.len() != self.right.len() {
            return Err(TabError::JoinSpecArityMismatch {
                left: self.left.len(),
                right: self.right.len(),
            });
        }
        Ok(())
    }
}

/// Tunable join semantics
#[derive(Debug, Clone)]
pub struct JoinOptions {
    /// Treat null key values as equal to each other (off by default,
    /// matching standard relational semantics)
    pub null_equals_null: bool,
    /// Suffix appended to a surviving right column whose name collides
    /// with a left column
    pub collision_suffix: String,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            null_equals_null: false,
            collision_suffix: "_right".to_string(),
        }
    }
}

/// Join engine carrying the configured semantics
pub struct JoinEngine {
    options: JoinOptions,
}

impl JoinEngine {
    pub fn new(options: JoinOptions) -> Self {
        Self { options }
    }

    /// Join `left` against `right` under `spec`.
    ///
    /// Output rows preserve left-table order; a left row with several
    /// right matches fans out over them in right-table order. Right key
    /// columns are dropped from the output (their values are equal to
    /// the left key by construction).
    pub fn join(
        &self,
        left: &Table,
        right: &Table,
        spec: &JoinSpec,
        kind: JoinKind,
    ) -> Result<Table> {
        spec.validate()?;

        let left_key_cols = resolve_columns(left, spec.left_keys())?;
        let right_key_cols = resolve_columns(right, spec.right_keys())?;

        // Right columns that survive into the output, with any renames
        let carried: Vec<usize> = (0..right.column_count())
            .filter(|i| !right_key_cols.contains(i))
            .collect();
        let mut out_names: Vec<String> = left.column_names().map(String::from).collect();
        for &i in &carried {
            let name = disambiguate(
                &right.columns()[i].name,
                &self.options.collision_suffix,
                &out_names,
            );
            out_names.push(name);
        }

        let index = KeyIndex::build(right, &right_key_cols, self.options.null_equals_null);

        let mut out_rows = Vec::new();
        for lrow in left.rows() {
            let matches = index::extract_key(lrow, &left_key_cols, self.options.null_equals_null)
                .and_then(|key| index.get(&key));
            match matches {
                Some(bucket) => {
                    for &ri in bucket {
                        let rrow = &right.rows()[ri];
                        let mut cells = lrow.cells.clone();
                        cells.extend(carried.iter().map(|&i| rrow.cells[i].clone()));
                        out_rows.push(Row::new(cells, lrow.source_line));
                    }
                }
                None => {
                    if kind == JoinKind::Left {
                        let mut cells = lrow.cells.clone();
                        cells.extend(carried.iter().map(|_| CellValue::Null));
                        out_rows.push(Row::new(cells, lrow.source_line));
                    }
                }
            }
        }

        let name = format!("{}_{}", left.name(), right.name());
        Table::new(name, out_names, out_rows)
    }
}

/// Left join with default options
pub fn left_join(left: &Table, right: &Table, spec: &JoinSpec) -> Result<Table> {
    JoinEngine::new(JoinOptions::default()).join(left, right, spec, JoinKind::Left)
}

/// Inner join with default options
pub fn inner_join(left: &Table, right: &Table, spec: &JoinSpec) -> Result<Table> {
    JoinEngine::new(JoinOptions::default()).join(left, right, spec, JoinKind::Inner)
}

/// Resolve key names to column indices, failing before any join work
fn resolve_columns(table: &Table, names: &[String]) -> Result<Vec<usize>> {
    names.iter().map(|n| table.require_column(n)).collect()
}

/// Suffix a colliding name; fall back to numeric suffixes if the
/// suffixed name still collides
fn disambiguate(name: &str, suffix: &str, taken: &[String]) -> String {
    if !taken.iter().any(|n| n == name) {
        return name.to_string();
    }
    let mut candidate = format!("{name}{suffix}");
    let mut n = 2;
    while taken.iter().any(|t| *t == candidate) {
        candidate = format!("{name}{suffix}_{n}");
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn musicians() -> Table {
        Table::new(
            "musicians",
            names(&["name", "band"]),
            vec![
                Row::new(vec!["Mick".into(), "Stones".into()], 1),
                Row::new(vec!["John".into(), "Beatles".into()], 2),
                Row::new(vec!["Paul".into(), "Beatles".into()], 3),
            ],
        )
        .unwrap()
    }

    fn instruments() -> Table {
        Table::new(
            "instruments",
            names(&["name", "plays"]),
            vec![
                Row::new(vec!["John".into(), "guitar".into()], 1),
                Row::new(vec!["Paul".into(), "bass".into()], 2),
                Row::new(vec!["Keith".into(), "guitar".into()], 3),
            ],
        )
        .unwrap()
    }

    fn column(table: &Table, name: &str) -> Vec<CellValue> {
        let idx = table.column_index(name).unwrap();
        table.rows().iter().map(|r| r.cells[idx].clone()).collect()
    }

    #[test]
    fn test_inner_join_keeps_matched_rows() {
        let joined = inner_join(&musicians(), &instruments(), &JoinSpec::on(["name"])).unwrap();
        assert_eq!(joined.row_count(), 2);
        assert_eq!(
            joined.column_names().collect::<Vec<_>>(),
            vec!["name", "band", "plays"]
        );
        assert_eq!(column(&joined, "name"), vec!["John".into(), "Paul".into()]);
        assert_eq!(column(&joined, "plays"), vec!["guitar".into(), "bass".into()]);
    }

    #[test]
    fn test_left_join_null_fills_unmatched_rows() {
        let joined = left_join(&musicians(), &instruments(), &JoinSpec::on(["name"])).unwrap();
        assert_eq!(joined.row_count(), 3);
        assert_eq!(
            column(&joined, "plays"),
            vec![CellValue::Null, "guitar".into(), "bass".into()]
        );
    }

    #[test]
    fn test_duplicate_right_keys_fan_out() {
        let mut rows: Vec<Row> = instruments().rows().to_vec();
        rows.push(Row::new(vec!["John".into(), "flute".into()], 4));
        let right = Table::new("instruments", names(&["name", "plays"]), rows).unwrap();

        let joined = left_join(&musicians(), &right, &JoinSpec::on(["name"])).unwrap();
        assert_eq!(joined.row_count(), 4);
        assert_eq!(
            column(&joined, "name"),
            vec!["Mick".into(), "John".into(), "John".into(), "Paul".into()]
        );
        // matches appear in right-table order
        assert_eq!(
            column(&joined, "plays"),
            vec![CellValue::Null, "guitar".into(), "flute".into(), "bass".into()]
        );
    }

    #[test]
    fn test_mapped_keys_match_renamed_column() {
        let renamed = instruments().renamed("name", "MusicalArtist").unwrap();
        let spec = JoinSpec::mapped(["name"], ["MusicalArtist"]);
        let joined = left_join(&musicians(), &renamed, &spec).unwrap();

        let baseline = left_join(&musicians(), &instruments(), &JoinSpec::on(["name"])).unwrap();
        assert_eq!(
            joined.column_names().collect::<Vec<_>>(),
            baseline.column_names().collect::<Vec<_>>()
        );
        assert_eq!(joined.rows(), baseline.rows());
    }

    #[test]
    fn test_multi_column_keys_match_as_tuples() {
        // Right rows deliberately out of left order, with decoys that
        // agree on only one of the two key columns
        let right = Table::new(
            "credits",
            names(&["MusicalArtist", "band", "plays"]),
            vec![
                Row::new(vec!["Paul".into(), "Beatles".into(), "bass".into()], 1),
                Row::new(vec!["Mick".into(), "Beatles".into(), "tambourine".into()], 2),
                Row::new(vec!["John".into(), "Wings".into(), "drums".into()], 3),
                Row::new(vec!["John".into(), "Beatles".into(), "guitar".into()], 4),
            ],
        )
        .unwrap();
        let spec = JoinSpec::mapped(["name", "band"], ["MusicalArtist", "band"]);

        let inner = inner_join(&musicians(), &right, &spec).unwrap();
        assert_eq!(inner.row_count(), 2);
        assert_eq!(column(&inner, "name"), vec!["John".into(), "Paul".into()]);
        assert_eq!(column(&inner, "plays"), vec!["guitar".into(), "bass".into()]);
        // both right key columns are dropped
        assert_eq!(
            inner.column_names().collect::<Vec<_>>(),
            vec!["name", "band", "plays"]
        );

        let outer = left_join(&musicians(), &right, &spec).unwrap();
        assert_eq!(outer.row_count(), 3);
        assert_eq!(
            column(&outer, "plays"),
            vec![CellValue::Null, "guitar".into(), "bass".into()]
        );
    }

    #[test]
    fn test_colliding_right_column_gets_suffix() {
        let left = Table::new(
            "l",
            names(&["id", "note"]),
            vec![Row::new(vec![CellValue::Int(1), "left".into()], 1)],
        )
        .unwrap();
        let right = Table::new(
            "r",
            names(&["id", "note"]),
            vec![Row::new(vec![CellValue::Int(1), "right".into()], 1)],
        )
        .unwrap();

        let joined = inner_join(&left, &right, &JoinSpec::on(["id"])).unwrap();
        assert_eq!(
            joined.column_names().collect::<Vec<_>>(),
            vec!["id", "note", "note_right"]
        );
        assert_eq!(column(&joined, "note_right"), vec!["right".into()]);
    }

    #[test]
    fn test_null_keys_never_match_by_default() {
        let left = Table::new(
            "l",
            names(&["k", "a"]),
            vec![Row::new(vec![CellValue::Null, CellValue::Int(1)], 1)],
        )
        .unwrap();
        let right = Table::new(
            "r",
            names(&["k", "b"]),
            vec![Row::new(vec![CellValue::Null, CellValue::Int(2)], 1)],
        )
        .unwrap();
        let spec = JoinSpec::on(["k"]);

        assert_eq!(inner_join(&left, &right, &spec).unwrap().row_count(), 0);
        let l = left_join(&left, &right, &spec).unwrap();
        assert_eq!(l.row_count(), 1);
        assert_eq!(column(&l, "b"), vec![CellValue::Null]);

        let opts = JoinOptions {
            null_equals_null: true,
            ..Default::default()
        };
        let engine = JoinEngine::new(opts);
        let joined = engine.join(&left, &right, &spec, JoinKind::Inner).unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(column(&joined, "b"), vec![CellValue::Int(2)]);
    }

    #[test]
    fn test_spec_arity_is_checked() {
        let err = inner_join(
            &musicians(),
            &instruments(),
            &JoinSpec::mapped(["name"], ["name", "plays"]),
        )
        .unwrap_err();
        assert_eq!(err, TabError::JoinSpecArityMismatch { left: 1, right: 2 });

        let err = inner_join(
            &musicians(),
            &instruments(),
            &JoinSpec::on(Vec::<String>::new()),
        )
        .unwrap_err();
        assert_eq!(err, TabError::JoinSpecArityMismatch { left: 0, right: 0 });
    }

    #[test]
    fn test_missing_key_column_fails_fast() {
        let err = inner_join(&musicians(), &instruments(), &JoinSpec::on(["plays"])).unwrap_err();
        assert_eq!(
            err,
            TabError::ColumnNotFound {
                table: "musicians".into(),
                column: "plays".into(),
            }
        );
    }

    #[test]
    fn test_inner_rows_are_left_rows_without_null_fill() {
        let left = musicians();
        let mut rows: Vec<Row> = instruments().rows().to_vec();
        rows.push(Row::new(vec!["John".into(), "flute".into()], 4));
        let right = Table::new("instruments", names(&["name", "plays"]), rows).unwrap();
        let spec = JoinSpec::on(["name"]);

        let inner = inner_join(&left, &right, &spec).unwrap();
        let outer = left_join(&left, &right, &spec).unwrap();

        let plays_idx = outer.column_index("plays").unwrap();
        let unfilled: Vec<&Row> = outer
            .rows()
            .iter()
            .filter(|r| !r.cells[plays_idx].is_null())
            .collect();
        assert_eq!(inner.rows().iter().collect::<Vec<_>>(), unfilled);
        assert!(inner.row_count() <= left.row_count() * right.row_count());
        assert!(outer.row_count() >= left.row_count());
    }
}
