use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::CategoryId;

/// A trivia subject offered on the category picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
    pub description: &'static str,
}

const QUIZ_BLURB: &str = "10-question quiz";

const CATALOG: [Category; 6] = [
    Category::builtin(17, "Science"),
    Category::builtin(19, "Math"),
    Category::builtin(23, "History"),
    Category::builtin(27, "Animals"),
    Category::builtin(22, "Geography"),
    Category::builtin(9, "General Knowledge"),
];

impl Category {
    const fn builtin(id: u32, name: &'static str) -> Self {
        Self {
            id: CategoryId::new(id),
            name,
            description: QUIZ_BLURB,
        }
    }

    /// Built-in subjects, in picker order.
    #[must_use]
    pub fn catalog() -> &'static [Category] {
        &CATALOG
    }

    #[must_use]
    pub fn find(id: CategoryId) -> Option<&'static Category> {
        CATALOG.iter().find(|category| category.id == id)
    }

    /// Case-insensitive substring search over category names.
    ///
    /// A blank query returns the whole catalog.
    #[must_use]
    pub fn search(query: &str) -> Vec<&'static Category> {
        let needle = query.trim().to_lowercase();
        CATALOG
            .iter()
            .filter(|category| category.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// URL/asset friendly slug ("General Knowledge" -> "general-knowledge").
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// Lowercases, maps `&` to `and`, and collapses every other non-alphanumeric run into `-`.
#[must_use]
pub fn slugify(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('&', "and");
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Trivia difficulty filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError {
    raw: String,
}

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty: {}", self.raw)
    }
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_string() }),
        }
    }
}
