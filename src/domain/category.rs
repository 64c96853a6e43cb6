//! Trade categories and keyword-based classification.
//!
//! A trade is either part of the trader's plan (`Strategy`), an unplanned
//! reaction (`Impulse`), or could not be classified (`Unknown`). Both the English
//! and Russian spellings are accepted on input; storage always uses English.

use super::error::ValidationError;
use crate::ports::config_port::ConfigPort;
use std::fmt;
use std::str::FromStr;

/// Variant order is the order categories appear within a date in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Strategy,
    Impulse,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Strategy, Category::Impulse, Category::Unknown];

    /// Map any accepted spelling to a category.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "strategy" | "стратегия" => Some(Category::Strategy),
            "impulse" | "импульс" => Some(Category::Impulse),
            "unknown" | "неизвестно" => Some(Category::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Strategy => "strategy",
            Category::Impulse => "impulse",
            Category::Unknown => "unknown",
        }
    }

    /// Every stored spelling, for matching rows written by older clients.
    pub fn spellings(&self) -> [&'static str; 2] {
        match self {
            Category::Strategy => ["strategy", "стратегия"],
            Category::Impulse => ["impulse", "импульс"],
            Category::Unknown => ["unknown", "неизвестно"],
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::normalize(s).ok_or_else(|| ValidationError::Category(s.trim().to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_STRATEGY_TAGS: &[&str] = &["стратегия", "strategy", "план", "plan"];
pub const DEFAULT_IMPULSE_TAGS: &[&str] = &[
    "фомо", "fomo", "импульс", "impulse", "отыгрыш", "revenge", "тильт", "tilt",
];

/// Keyword lists used to classify a trade from its tags and comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTags {
    pub strategy: Vec<String>,
    pub impulse: Vec<String>,
}

impl Default for CategoryTags {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY_TAGS.iter().map(|s| s.to_string()).collect(),
            impulse: DEFAULT_IMPULSE_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CategoryTags {
    /// Reads `[categories] strategy_tags` / `impulse_tags`, falling back to the
    /// built-in lists for whichever key is absent.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            strategy: config
                .get_string("categories", "strategy_tags")
                .map(|s| parse_tag_list(&s))
                .unwrap_or(defaults.strategy),
            impulse: config
                .get_string("categories", "impulse_tags")
                .map(|s| parse_tag_list(&s))
                .unwrap_or(defaults.impulse),
        }
    }

    /// Strategy keywords win over impulse keywords when both occur.
    pub fn classify(&self, text: &str) -> Category {
        let text = text.to_lowercase();
        if self.strategy.iter().any(|tag| text.contains(tag.as_str())) {
            Category::Strategy
        } else if self.impulse.iter().any(|tag| text.contains(tag.as_str())) {
            Category::Impulse
        } else {
            Category::Unknown
        }
    }
}

pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
