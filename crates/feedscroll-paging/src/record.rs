//! The record model shared by the store, the projector and the views.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Shown in place of a record image that failed to load.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/320x320?text=No+Image";

/// Identity of a [`Record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

impl TryFrom<String> for Difficulty {
    type Error = UnknownDifficulty;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One fetched record. Immutable once fetched; identity is `id`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(alias = "name")]
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub meal_type: Vec<String>,
    #[serde(default, alias = "image")]
    pub image_url: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub calories_per_serving: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

impl Record {
    /// Builds a record with only the fields the core cares about.
    pub fn new(
        id: impl Into<RecordId>,
        title: impl Into<String>,
        difficulty: Difficulty,
        meal_type: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let id = id.into();
        Self {
            id,
            title: title.into(),
            difficulty,
            meal_type: meal_type.into_iter().map(Into::into).collect(),
            image_url: String::new(),
            cuisine: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            calories_per_serving: None,
            rating: None,
            review_count: None,
        }
    }

    pub fn has_meal_type(&self, tag: &str) -> bool {
        self.meal_type.iter().any(|entry| entry == tag)
    }

    /// The image to show, falling back to the placeholder once loading failed
    /// or when the record carries no image.
    pub fn image_or_placeholder(&self, load_failed: bool) -> &str {
        if load_failed || self.image_url.is_empty() {
            PLACEHOLDER_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Total preparation plus cooking time, when both are known.
    pub fn total_time_minutes(&self) -> Option<u32> {
        Some(self.prep_time_minutes? + self.cook_time_minutes?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" MEDIUM ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn image_falls_back_to_placeholder() {
        let mut record = Record::new(1, "Toast", Difficulty::Easy, ["Breakfast"]);
        assert_eq!(record.image_or_placeholder(false), PLACEHOLDER_IMAGE_URL);

        record.image_url = "https://cdn.example/toast.webp".into();
        assert_eq!(record.image_or_placeholder(false), "https://cdn.example/toast.webp");
        assert_eq!(record.image_or_placeholder(true), PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn total_time_needs_both_parts() {
        let mut record = Record::new(1, "Stew", Difficulty::Medium, ["Dinner"]);
        record.prep_time_minutes = Some(15);
        assert_eq!(record.total_time_minutes(), None);
        record.cook_time_minutes = Some(45);
        assert_eq!(record.total_time_minutes(), Some(60));
    }
}
