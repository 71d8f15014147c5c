mod draft;
mod recipe;

pub use draft::{
    sanitize_input, RecipeDraft, ValidationErrors, DEFAULT_MAX_INPUT_LEN,
    MIN_STEP_INSTRUCTION_LEN,
};
pub use recipe::{
    format_cooking_time, Difficulty, Recipe, RecipeError, RecipeId, RecipeIngredient, RecipeStep,
    UserId,
};
