//! Duplicate-row detection over check-column value tuples

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::model::{CellValue, Row, Table};

/// Column appended to the result with each tuple's occurrence count
const COUNT_COLUMN: &str = "dupe_count";

/// Rows whose check-column tuple occurs more than once.
///
/// An empty `check` list means every column. The result keeps the
/// original row order and carries a `dupe_count` column with the tuple's
/// total occurrence count; nulls count as ordinary values here (two null
/// tuples are duplicates of each other).
pub fn find_dupes(table: &Table, check: &[String]) -> Result<Table> {
    let check_cols: Vec<usize> = if check.is_empty() {
        (0..table.column_count()).collect()
    } else {
        check
            .iter()
            .map(|name| table.require_column(name))
            .collect::<Result<_>>()?
    };

    // First pass: count occurrences of every tuple
    let mut counts: FxHashMap<Vec<CellValue>, usize> = FxHashMap::default();
    for row in table.rows() {
        let tuple: Vec<CellValue> = check_cols.iter().map(|&i| row.cells[i].normalized()).collect();
        *counts.entry(tuple).or_insert(0) += 1;
    }

    // Second pass: keep rows whose tuple repeats, tagging the count
    let mut out_rows = Vec::new();
    for row in table.rows() {
        let tuple: Vec<CellValue> = check_cols.iter().map(|&i| row.cells[i].normalized()).collect();
        let count = counts[&tuple];
        if count > 1 {
            let mut cells = row.cells.clone();
            cells.push(CellValue::Int(count as i64));
            out_rows.push(Row::new(cells, row.source_line));
        }
    }

    let mut names: Vec<String> = table.column_names().map(String::from).collect();
    names.push(count_column_name(&names));
    Table::new(table.name().to_string(), names, out_rows)
}

/// Pick a count-column name that does not collide with the input's
fn count_column_name(taken: &[String]) -> String {
    if !taken.iter().any(|n| n == COUNT_COLUMN) {
        return COUNT_COLUMN.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{COUNT_COLUMN}_{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
