//! Rendering of result tables

mod json;
mod terminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::model::Table;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for table renderers
pub trait TableRenderer {
    /// Render a table to a writer
    fn render(&self, table: &Table, writer: &mut dyn WriteColor) -> Result<()>;
}

/// Factory for creating renderers
pub struct OutputFactory;

impl OutputFactory {
    /// Create a renderer for the given format
    pub fn create(format: OutputFormat) -> Box<dyn TableRenderer> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a table to stdout, coloring when it is a terminal
pub fn render_to_stdout(table: &Table, format: OutputFormat) -> Result<()> {
    let renderer = OutputFactory::create(format);
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    renderer.render(table, &mut stdout)
}
