//! Background catalog types.
//!
//! The catalog is the static, ordered list of backgrounds a user can pick from.
//! It is built once at startup and never mutated afterwards.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A selectable background image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    /// Button label shown to the user (e.g., "White ⬜"). Matched exactly.
    pub label: String,
    /// Path to the image file on disk.
    pub path: PathBuf,
}

impl Background {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Short name used in confirmations: the first word of the label.
    ///
    /// "White ⬜" becomes "White". Falls back to the whole label when it
    /// contains no whitespace-separated word.
    pub fn display_name(&self) -> &str {
        self.label.split_whitespace().next().unwrap_or(&self.label)
    }
}

/// Ordered, immutable mapping from label to background.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundCatalog {
    entries: Vec<Background>,
}

impl BackgroundCatalog {
    /// Build a catalog, rejecting blank and duplicate labels.
    ///
    /// All problems are reported together in a single [`ConfigError::Invalid`].
    pub fn new(entries: Vec<Background>) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        if entries.is_empty() {
            problems.push("background catalog is empty".to_string());
        }

        for entry in &entries {
            if entry.label.trim().is_empty() {
                problems.push(format!(
                    "background at '{}' has a blank label",
                    entry.path.display()
                ));
            } else if !seen.insert(entry.label.as_str()) {
                problems.push(format!("duplicate background label '{}'", entry.label));
            }
        }

        if problems.is_empty() {
            Ok(Self { entries })
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Find the background whose label equals `text` exactly.
    pub fn lookup(&self, text: &str) -> Option<&Background> {
        self.entries.iter().find(|b| b.label == text)
    }

    /// Labels in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|b| b.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Background> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
