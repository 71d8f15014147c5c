use super::draft::{RecipeDraft, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user acting on a request (author, liker).
///
/// Always passed explicitly by the caller; the crate keeps no session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single ingredient line of a recipe.
///
/// Only `name` takes part in ingredient search. `quantity` is free text
/// ("200g", "1 bunch") and is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: String,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    /// Both name and quantity are non-blank.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && !self.quantity.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub step_number: u32,
    pub instruction: String,
}

impl RecipeStep {
    pub fn new(step_number: u32, instruction: impl Into<String>) -> Self {
        Self {
            step_number,
            instruction: instruction.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
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

impl FromStr for Difficulty {
    type Err = RecipeError;

    /// Parses a difficulty level, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RecipeError::InvalidDifficulty(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored recipe document.
///
/// Recipes are built from a validated [`RecipeDraft`] through
/// [`Recipe::from_draft`], or deserialized from JSON/YAML documents. Fields
/// serialize in camelCase to match the mobile client's payloads.
///
/// # Examples
///
/// ```
/// use cookmate_core::{Recipe, RecipeDraft, RecipeIngredient, RecipeStep, UserId};
///
/// let draft = RecipeDraft {
///     title: "Tomato Salad".to_string(),
///     description: "A quick summer salad".to_string(),
///     ingredients: vec![RecipeIngredient::new("Tomatoes", "3")],
///     steps: vec![RecipeStep::new(1, "Slice the tomatoes thinly")],
///     cooking_time: 10,
///     category: "Lunch".to_string(),
///     ..Default::default()
/// };
///
/// let recipe = Recipe::from_draft(draft, UserId::new("u1"))?;
/// assert_eq!(recipe.cooking_time_display(), "10 min");
/// # Ok::<(), cookmate_core::RecipeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default = "RecipeId::generate")]
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    /// Minutes
    pub cooking_time: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub author: UserId,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe from a draft on behalf of `author`.
    ///
    /// The draft is validated as-is; call [`RecipeDraft::sanitized`] first
    /// to clean user input.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Validation` listing every invalid field.
    pub fn from_draft(draft: RecipeDraft, author: UserId) -> Result<Self, RecipeError> {
        draft.validate().map_err(RecipeError::Validation)?;

        let now = Utc::now();
        Ok(Recipe {
            id: RecipeId::generate(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            ingredients: draft.ingredients,
            steps: draft.steps,
            cooking_time: draft.cooking_time,
            difficulty: draft.difficulty.unwrap_or_default(),
            category: draft.category.trim().to_string(),
            image: draft.image,
            author,
            likes: Vec::new(),
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Renders the cooking time for display, e.g. `"1h 30min"`.
    pub fn cooking_time_display(&self) -> String {
        format_cooking_time(self.cooking_time)
    }

    /// Renders the ingredient list as `"2 Tomatoes, 1 bunch Basil"`.
    pub fn ingredients_summary(&self) -> String {
        self.ingredients
            .iter()
            .map(|i| format!("{} {}", i.quantity, i.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Index of the first ingredient with a blank name or quantity, if any.
    pub fn first_malformed_ingredient(&self) -> Option<usize> {
        self.ingredients.iter().position(|i| !i.is_well_formed())
    }
}

/// Formats a duration in minutes as `"N/A"`, `"45 min"`, `"2h"` or `"1h 30min"`.
pub fn format_cooking_time(minutes: u32) -> String {
    if minutes == 0 {
        return "N/A".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min");
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {remaining}min")
    }
}

/// Errors that can occur when building recipes.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Invalid recipe: {0}")]
    Validation(ValidationErrors),

    #[error("Unknown difficulty level: {0}")]
    InvalidDifficulty(String),
}
