use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// User-authored substring rule. `match_text` is stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(rename = "match")]
    pub match_text: String,
    pub category: String,
}

impl CategoryRule {
    /// Builds a rule, normalising the match text to trimmed lowercase.
    pub fn new(match_text: &str, category: &str) -> Result<Self> {
        let match_text = match_text.trim().to_lowercase();
        let category = category.trim();
        if match_text.is_empty() {
            return Err(Error::invalid_input("Category rule match text is required"));
        }
        if category.is_empty() {
            return Err(Error::invalid_input("Category rule category is required"));
        }
        Ok(Self {
            match_text,
            category: category.to_string(),
        })
    }

    /// Case-insensitive substring test against already-lowercased text.
    pub fn matches(&self, lowered_text: &str) -> bool {
        !self.match_text.is_empty() && lowered_text.contains(&self.match_text.to_lowercase())
    }
}
