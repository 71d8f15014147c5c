use super::recipe::{Difficulty, RecipeIngredient, RecipeStep};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default cap on the length of any sanitized text field.
pub const DEFAULT_MAX_INPUT_LEN: usize = 1000;

/// Minimum length of a step instruction kept by [`RecipeDraft::sanitized`].
pub const MIN_STEP_INSTRUCTION_LEN: usize = 10;

const MIN_TITLE_LEN: usize = 3;
const MIN_DESCRIPTION_LEN: usize = 10;

/// Caller-supplied fields of a new recipe.
///
/// Everything the store assigns itself (id, author, likes, timestamps) is
/// absent. `tags` accepts either a list or a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    pub cooking_time: u32,
    pub difficulty: Option<Difficulty>,
    pub category: String,
    pub image: String,
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// Checks every field and reports all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`], keyed by the camelCase
    /// field name, when any field is invalid.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            errors.insert("title", "Title must be at least 3 characters");
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            errors.insert("description", "Description must be at least 10 characters");
        }
        if self.cooking_time == 0 {
            errors.insert("cookingTime", "Cooking time must be greater than 0");
        }
        if self.category.trim().is_empty() {
            errors.insert("category", "Category is required");
        }

        if self.ingredients.is_empty() {
            errors.insert("ingredients", "At least one ingredient is required");
        } else if !self.ingredients.iter().all(RecipeIngredient::is_well_formed) {
            errors.insert("ingredients", "Every ingredient needs a name and a quantity");
        }

        if !self.steps.iter().any(|s| !s.instruction.trim().is_empty()) {
            errors.insert("steps", "At least one cooking step is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns a cleaned copy of the draft.
    ///
    /// Text fields are trimmed, stripped of `<` and `>` and cut to
    /// `max_len` characters. Incomplete ingredients and steps shorter than
    /// [`MIN_STEP_INSTRUCTION_LEN`] are dropped, and the remaining steps are
    /// renumbered from 1.
    pub fn sanitized(&self, max_len: usize) -> RecipeDraft {
        let ingredients = self
            .ingredients
            .iter()
            .filter(|i| i.is_well_formed())
            .map(|i| {
                RecipeIngredient::new(
                    sanitize_input(&i.name, max_len),
                    sanitize_input(&i.quantity, max_len),
                )
            })
            .collect();

        let steps = self
            .steps
            .iter()
            .filter(|s| s.instruction.trim().chars().count() >= MIN_STEP_INSTRUCTION_LEN)
            .zip(1..)
            .map(|(s, number)| RecipeStep::new(number, sanitize_input(&s.instruction, max_len)))
            .collect();

        RecipeDraft {
            title: sanitize_input(&self.title, max_len),
            description: sanitize_input(&self.description, max_len),
            ingredients,
            steps,
            cooking_time: self.cooking_time,
            difficulty: self.difficulty,
            category: sanitize_input(&self.category, max_len),
            image: self.image.trim().to_string(),
            tags: self
                .tags
                .iter()
                .map(|t| sanitize_input(t, max_len))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// Trims `input`, removes angle brackets and truncates to `max_len` chars.
pub fn sanitize_input(input: &str, max_len: usize) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(max_len)
        .collect()
}

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub(crate) fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

/// Accepts `tags: [a, b]` as well as `tags: "a, b"`.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<TagsInput>::deserialize(deserializer)? {
        Some(TagsInput::List(list)) => list,
        Some(TagsInput::Joined(joined)) => joined
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };
    Ok(tags)
}
