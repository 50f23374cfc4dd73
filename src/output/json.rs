//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde_json::{Map, Value};
use termcolor::WriteColor;

use crate::model::{CellValue, Table};

use super::TableRenderer;

/// JSON renderer: an array of one object per row
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer for JsonOutput {
    fn render(&self, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        let rows: Vec<Value> = table
            .rows()
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (col, cell) in table.columns().iter().zip(&row.cells) {
                    obj.insert(col.name.clone(), cell_to_json(cell));
                }
                Value::Object(obj)
            })
            .collect();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &rows)?;
        } else {
            serde_json::to_writer(&mut *writer, &rows)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => Value::from(*i),
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::String(s) => Value::String(s.to_string()),
        CellValue::Date(d) => Value::String(d.to_string()),
        CellValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
    }
}
