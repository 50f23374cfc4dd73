//! Column-header normalization

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::model::Table;

/// Normalize a single raw header into a snake_case identifier.
///
/// Lower-cases, collapses runs of non-alphanumeric characters to a
/// single underscore, trims separators at the ends, and prefixes an `x`
/// when the result would start with a digit or be empty. Idempotent:
/// cleaning an already-clean name returns it unchanged.
pub fn clean_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        return "x".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'x');
    }
    out
}

/// Normalize a list of headers, disambiguating collisions with `_2`,
/// `_3`, … in order of appearance. The first occurrence keeps the base
/// name.
pub fn clean_names<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let base = clean_name(name.as_ref());
        let mut candidate = base.clone();
        let mut n = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// A copy of the table with cleaned column names.
pub fn clean_table(table: &Table) -> Result<Table> {
    let raw: Vec<&str> = table.column_names().collect();
    Table::new(
        table.name().to_string(),
        clean_names(&raw),
        table.rows().to_vec(),
    )
}
