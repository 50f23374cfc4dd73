//! tabjoin - Relational joins for small tabular data
//!
//! A library and CLI for left/inner joins with configurable key-column
//! mapping, duplicate-row detection, and column-header cleaning over
//! tables loaded from CSV, TSV, or JSON.

pub mod clean;
pub mod config;
pub mod dupes;
pub mod error;
pub mod join;
pub mod model;
pub mod output;
pub mod parser;

pub use clean::{clean_name, clean_names, clean_table};
pub use config::JoinConfig;
pub use dupes::find_dupes;
pub use error::TabError;
pub use join::{inner_join, left_join, JoinKind, JoinOptions, JoinSpec};
pub use model::Table;
