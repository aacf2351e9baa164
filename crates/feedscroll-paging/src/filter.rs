//! Filter projection over the canonical list.
//!
//! [`project`] is pure: it never touches the store and always produces a
//! (possibly empty) order-preserving subset of its input.

use std::fmt;
use std::str::FromStr;

use crate::record::Record;

/// Difficulty selector exposed to the presentation layer.
///
/// Only `all`, `easy` and `medium` are selectable; there is no `hard` entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DifficultySelector {
    #[default]
    All,
    Easy,
    Medium,
}

impl DifficultySelector {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultySelector::All => "all",
            DifficultySelector::Easy => "easy",
            DifficultySelector::Medium => "medium",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MealTypeSelector {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
}

impl MealTypeSelector {
    pub fn as_str(self) -> &'static str {
        match self {
            MealTypeSelector::Breakfast => "breakfast",
            MealTypeSelector::Lunch => "lunch",
            MealTypeSelector::Dinner => "dinner",
        }
    }

    /// The capitalized tag records carry in their meal-type set.
    pub fn tag(self) -> &'static str {
        match self {
            MealTypeSelector::Breakfast => "Breakfast",
            MealTypeSelector::Lunch => "Lunch",
            MealTypeSelector::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unsupported {kind} selector `{value}`")]
    Unsupported { kind: &'static str, value: String },
}

impl FromStr for DifficultySelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DifficultySelector::All),
            "easy" => Ok(DifficultySelector::Easy),
            "medium" => Ok(DifficultySelector::Medium),
            _ => Err(SelectorError::Unsupported {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for MealTypeSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealTypeSelector::Breakfast),
            "lunch" => Ok(MealTypeSelector::Lunch),
            "dinner" => Ok(MealTypeSelector::Dinner),
            _ => Err(SelectorError::Unsupported {
                kind: "meal type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DifficultySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MealTypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two independent selector values. Defaults to `breakfast/all`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterSelectors {
    pub difficulty: DifficultySelector,
    pub meal_type: MealTypeSelector,
}

impl FilterSelectors {
    pub fn new(difficulty: DifficultySelector, meal_type: MealTypeSelector) -> Self {
        Self {
            difficulty,
            meal_type,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let difficulty_ok = match self.difficulty {
            DifficultySelector::All => true,
            selected => record
                .difficulty
                .as_str()
                .eq_ignore_ascii_case(selected.as_str()),
        };
        difficulty_ok && record.has_meal_type(self.meal_type.tag())
    }
}

impl fmt::Display for FilterSelectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.meal_type, self.difficulty)
    }
}

/// Derives the filtered view: difficulty first, then meal-type membership.
pub fn project(canonical: &[Record], selectors: &FilterSelectors) -> Vec<Record> {
    canonical
        .iter()
        .filter(|record| selectors.matches(record))
        .cloned()
        .collect()
}
