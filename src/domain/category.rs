//! Expense categories.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Categorises a ledger record.
///
/// The five named variants are the ones offered for entry. Any other text
/// read back from disk is kept verbatim as `Custom` so loading never rejects
/// a file over an unfamiliar label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Other,
    Custom(String),
}

impl Category {
    /// Categories offered when entering a new expense.
    pub const STANDARD: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
            Category::Custom(label) => label,
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, Category::Custom(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching is exact and case-sensitive: `food` is a custom label, not `Food`.
impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Food" => Category::Food,
            "Transport" => Category::Transport,
            "Utilities" => Category::Utilities,
            "Entertainment" => Category::Entertainment,
            "Other" => Category::Other,
            other => Category::Custom(other.to_string()),
        })
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_labels_round_trip() {
        for category in Category::STANDARD {
            let parsed = Category::from(category.to_string());
            assert_eq!(parsed, category);
            assert!(parsed.is_standard());
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!(Category::from("food"), Category::Custom("food".into()));
        assert_ne!(Category::from("food"), Category::Food);
    }

    #[test]
    fn custom_labels_are_preserved() {
        let category = Category::from("Pets");
        assert_eq!(category.as_str(), "Pets");
        assert!(!category.is_standard());
    }
}
