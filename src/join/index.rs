//! Key extraction and the right-side probe index

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::model::{CellValue, Row, Table};

/// The tuple of values a row holds at its key columns.
///
/// Values are normalized before storage so that `Eq` and `Hash` agree:
/// `CellValue`'s equality treats `Int(2)` and `Float(2.0)` as equal, but
/// its hash covers the discriminant, so integral floats are folded to
/// `Int` here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey(Vec<CellValue>);

impl JoinKey {
    pub fn values(&self) -> &[CellValue] {
        &self.0
    }
}

/// Extract a row's key tuple at the given column indices.
///
/// Returns `None` when the tuple contains a null and `null_equals_null`
/// is off: such a row can never match, so it is kept out of the index
/// and skipped on the probe side.
pub(crate) fn extract_key(
    row: &Row,
    key_columns: &[usize],
    null_equals_null: bool,
) -> Option<JoinKey> {
    let mut values = Vec::with_capacity(key_columns.len());
    for &idx in key_columns {
        let cell = row.get(idx)?;
        if cell.is_null() && !null_equals_null {
            return None;
        }
        values.push(cell.normalized());
    }
    Some(JoinKey(values))
}

/// Multimap from key tuple to the row indices sharing it, in input order.
pub struct KeyIndex {
    buckets: IndexMap<JoinKey, Vec<usize>, FxBuildHasher>,
}

impl KeyIndex {
    /// Build the index in a single pass over the table's rows.
    pub fn build(table: &Table, key_columns: &[usize], null_equals_null: bool) -> Self {
        let mut buckets: IndexMap<JoinKey, Vec<usize>, FxBuildHasher> = IndexMap::default();
        for (idx, row) in table.rows().iter().enumerate() {
            if let Some(key) = extract_key(row, key_columns, null_equals_null) {
                buckets.entry(key).or_default().push(idx);
            }
        }
        Self { buckets }
    }

    /// Row indices whose key equals `key`, in input order.
    pub fn get(&self, key: &JoinKey) -> Option<&[usize]> {
        self.buckets.get(key).map(|v| v.as_slice())
    }

    /// Number of distinct keys in the index
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn table(rows: Vec<Vec<CellValue>>) -> Table {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row::new(cells, i + 1))
            .collect();
        Table::new(
            "t",
            vec!["k".to_string(), "v".to_string()],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_buckets_preserve_input_order() {
        let t = table(vec![
            vec!["a".into(), CellValue::Int(1)],
            vec!["b".into(), CellValue::Int(2)],
            vec!["a".into(), CellValue::Int(3)],
        ]);
        let index = KeyIndex::build(&t, &[0], false);
        let key = extract_key(&t.rows()[0], &[0], false).unwrap();
        assert_eq!(index.get(&key), Some(&[0, 2][..]));
    }

    #[test]
    fn test_null_keys_excluded_by_default() {
        let t = table(vec![
            vec![CellValue::Null, CellValue::Int(1)],
            vec!["a".into(), CellValue::Int(2)],
        ]);
        let index = KeyIndex::build(&t, &[0], false);
        assert_eq!(index.len(), 1);

        let index = KeyIndex::build(&t, &[0], true);
        assert_eq!(index.len(), 2);
        let null_key = extract_key(&t.rows()[0], &[0], true).unwrap();
        assert_eq!(index.get(&null_key), Some(&[0][..]));
    }

    #[test]
    fn test_integral_floats_match_ints() {
        let t = table(vec![
            vec![CellValue::Float(2.0), CellValue::Int(1)],
            vec![CellValue::Int(2), CellValue::Int(2)],
        ]);
        let index = KeyIndex::build(&t, &[0], false);
        assert_eq!(index.len(), 1);
    }
}
