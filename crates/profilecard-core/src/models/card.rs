//! Statistics scraped from the profile summary badge
//!
//! The badge is an SVG whose text nodes carry the numbers we want. Extraction is positional:
//! the first three text nodes are headings, the next five are the values below, in this order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Labels of the values carried by the badge, in badge order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardLabel {
    #[serde(rename = "Total Stars")]
    TotalStars,
    #[serde(rename = "Commits")]
    Commits,
    #[serde(rename = "Total PRs")]
    TotalPrs,
    #[serde(rename = "Total Issues")]
    TotalIssues,
    #[serde(rename = "Contributions")]
    Contributions,
}

impl CardLabel {
    /// Positional label table. Entry `i` belongs to text node `i + CardLabel::SKIPPED_NODES`.
    pub const ORDER: [CardLabel; 5] = [
        CardLabel::TotalStars,
        CardLabel::Commits,
        CardLabel::TotalPrs,
        CardLabel::TotalIssues,
        CardLabel::Contributions,
    ];

    /// Number of leading text nodes that never carry data
    pub const SKIPPED_NODES: usize = 3;

    /// Label for the text node at `position` in document order, if any
    pub fn at_node(position: usize) -> Option<CardLabel> {
        position
            .checked_sub(Self::SKIPPED_NODES)
            .and_then(|i| Self::ORDER.get(i).copied())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardLabel::TotalStars => "Total Stars",
            CardLabel::Commits => "Commits",
            CardLabel::TotalPrs => "Total PRs",
            CardLabel::TotalIssues => "Total Issues",
            CardLabel::Contributions => "Contributions",
        }
    }
}

impl fmt::Display for CardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed badge values. Labels whose node had no digits are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    values: BTreeMap<CardLabel, u64>,
}

impl CardStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: CardLabel, value: u64) {
        self.values.insert(label, value);
    }

    pub fn get(&self, label: CardLabel) -> Option<u64> {
        self.values.get(&label).copied()
    }

    pub fn commits(&self) -> Option<u64> {
        self.get(CardLabel::Commits)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardLabel, u64)> + '_ {
        self.values.iter().map(|(label, value)| (*label, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_node_skips_headings() {
        assert_eq!(CardLabel::at_node(0), None);
        assert_eq!(CardLabel::at_node(2), None);
        assert_eq!(CardLabel::at_node(3), Some(CardLabel::TotalStars));
        assert_eq!(CardLabel::at_node(4), Some(CardLabel::Commits));
        assert_eq!(CardLabel::at_node(7), Some(CardLabel::Contributions));
        assert_eq!(CardLabel::at_node(8), None);
    }

    #[test]
    fn test_serializes_with_badge_labels() {
        let mut stats = CardStats::new();
        stats.insert(CardLabel::TotalPrs, 9);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"Total PRs\":9"));
    }
}
