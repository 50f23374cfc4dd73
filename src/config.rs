//! Configuration handling for tabjoin

use std::path::PathBuf;

use crate::join::{JoinKind, JoinOptions};

/// Output format for result tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a join run
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// Path to the left table
    pub left_file: PathBuf,
    /// Path to the right table
    pub right_file: PathBuf,
    /// Key columns in the left table
    pub left_keys: Vec<String>,
    /// Key columns in the right table, positionally matching `left_keys`
    pub right_keys: Vec<String>,
    /// Left or inner join
    pub kind: JoinKind,
    /// Treat null key values as equal
    pub null_equals_null: bool,
    /// Suffix for right columns colliding with a left column name
    pub collision_suffix: String,
    /// Output format
    pub output_format: OutputFormat,
}

impl JoinConfig {
    /// Create a new config with file paths and defaults
    pub fn new(left_file: PathBuf, right_file: PathBuf) -> Self {
        let defaults = JoinOptions::default();
        Self {
            left_file,
            right_file,
            left_keys: Vec::new(),
            right_keys: Vec::new(),
            kind: JoinKind::Left,
            null_equals_null: defaults.null_equals_null,
            collision_suffix: defaults.collision_suffix,
            output_format: OutputFormat::default(),
        }
    }

    /// Join on the same column names in both tables
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.left_keys = keys.clone();
        self.right_keys = keys;
        self
    }

    /// Join with a left-to-right key mapping
    pub fn with_mapped_keys(mut self, left: Vec<String>, right: Vec<String>) -> Self {
        self.left_keys = left;
        self.right_keys = right;
        self
    }

    /// Set the join kind
    pub fn with_kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// Treat null key values as equal to each other
    pub fn with_null_equals_null(mut self, enabled: bool) -> Self {
        self.null_equals_null = enabled;
        self
    }

    /// Set the collision suffix
    pub fn with_collision_suffix(mut self, suffix: String) -> Self {
        self.collision_suffix = suffix;
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// The join semantics this config describes
    pub fn join_options(&self) -> JoinOptions {
        JoinOptions {
            null_equals_null: self.null_equals_null,
            collision_suffix: self.collision_suffix.clone(),
        }
    }
}
