//! Aligned terminal table output

use std::io::Write;

use anyhow::Result;
use termcolor::{ColorSpec, WriteColor};

use crate::model::Table;

use super::TableRenderer;

/// Terminal output with box-drawing alignment and a bold header
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer for TerminalOutput {
    fn render(&self, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        if table.row_count() == 0 {
            writeln!(
                writer,
                "{} (no rows)",
                table.column_names().collect::<Vec<_>>().join(", ")
            )?;
            return Ok(());
        }

        let header: Vec<String> = table.column_names().map(String::from).collect();
        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.cells.iter().map(|c| c.display().into_owned()).collect())
            .collect();

        let mut col_widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < col_widths.len() {
                    col_widths[i] = col_widths[i].max(cell.len());
                }
            }
        }

        writeln!(writer, "{}", border(&col_widths, '┌', '┬', '┐'))?;

        writer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(writer, "{}", format_row(&header, &col_widths))?;
        writer.reset()?;

        writeln!(writer, "{}", border(&col_widths, '├', '┼', '┤'))?;
        for row in &rows {
            writeln!(writer, "{}", format_row(row, &col_widths))?;
        }
        writeln!(writer, "{}", border(&col_widths, '└', '┴', '┘'))?;

        Ok(())
    }
}

/// One horizontal border line
fn border(col_widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (i, width) in col_widths.iter().enumerate() {
        out.push_str(&"─".repeat(*width + 2));
        if i < col_widths.len() - 1 {
            out.push(mid);
        }
    }
    out.push(right);
    out
}

/// One padded cell line
fn format_row(cells: &[String], col_widths: &[usize]) -> String {
    let mut out = String::new();
    out.push('│');
    for (i, cell) in cells.iter().enumerate() {
        let width = col_widths.get(i).copied().unwrap_or(0);
        out.push_str(&format!(" {:width$} │", cell, width = width));
    }
    out
}
