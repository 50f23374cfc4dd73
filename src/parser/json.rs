//! JSON array-of-objects loader

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde_json::Value;

use crate::model::{CellValue, Row, Table};

use super::{table_label, Loader};

/// Loader for JSON array files
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let value: Value = serde_json::from_reader(reader).context("Failed to parse JSON file")?;

        // Handle both arrays and single objects
        let array = match value {
            Value::Array(arr) => arr,
            Value::Object(_) => vec![value],
            _ => bail!("JSON must be an array or object"),
        };

        // Columns are the union of keys, in first-seen order
        let mut column_names: IndexSet<String> = IndexSet::new();
        for item in &array {
            if let Value::Object(obj) = item {
                for key in obj.keys() {
                    column_names.insert(key.clone());
                }
            }
        }
        if column_names.is_empty() {
            bail!("JSON array contains no objects");
        }

        let mut rows = Vec::new();
        for (line_num, item) in array.iter().enumerate() {
            let cells = match item {
                Value::Object(obj) => column_names
                    .iter()
                    .map(|key| json_value_to_cell(obj.get(key)))
                    .collect(),
                _ => {
                    // Non-object item in array: put in first column
                    let mut cells = vec![json_value_to_cell(Some(item))];
                    cells.resize(column_names.len(), CellValue::Null);
                    cells
                }
            };
            rows.push(Row::new(cells, line_num + 1));
        }

        let names: Vec<String> = column_names.into_iter().collect();
        Table::new(table_label(path), names, rows)
            .with_context(|| format!("Invalid table in {}", path.display()))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => {
            // Try parsing as date/datetime
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return CellValue::Date(date);
            }
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return CellValue::DateTime(dt);
            }
            CellValue::String(Cow::Owned(s.clone()))
        }
        // Nested structures are kept as their JSON text
        Some(other) => CellValue::String(Cow::Owned(other.to_string())),
    }
}
