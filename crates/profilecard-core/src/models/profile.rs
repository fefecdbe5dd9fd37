//! Profile info entries rendered next to the ASCII art

use serde::{Deserialize, Serialize};

/// One line of the info block. Entries without a value render as a bare label, which is how
/// headings, separators and blank spacer lines are expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoEntry {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl InfoEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    /// Label-only entry (heading, separator, spacer)
    pub fn heading(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
        }
    }

    /// Value to render, treating an empty string like an absent value
    pub fn rendered_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}
