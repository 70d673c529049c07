use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories offered during setup. Any other category text is accepted too.
pub const CATEGORY_SUGGESTIONS: &[&str] = &[
    "Retail",
    "Food & Beverage",
    "Fashion",
    "Services",
    "Agriculture",
    "Transport",
    "Other",
];

/// The business the ledger is kept for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl Profile {
    pub fn new(name: &str, category: &str) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::MissingName);
        }
        Ok(Self {
            name: name.to_string(),
            category: category.trim().to_string(),
        })
    }

    /// A profile read back from storage must still satisfy `new`'s rules.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn is_suggested_category(&self) -> bool {
        CATEGORY_SUGGESTIONS
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&self.category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    MissingName,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::MissingName => write!(f, "business name is required"),
        }
    }
}

impl std::error::Error for ProfileError {}
