//! Ingredient-match ranking.
//!
//! Given the ingredients a user has at hand, recipes are ordered by how many
//! of their own ingredients contain one of those pantry terms. Matching is
//! plain case-insensitive substring containment: `"tomato"` matches
//! `"Cherry Tomatoes"`.

use crate::config::RankingConfig;
use crate::{Recipe, RecipeId, RecipeIngredient};
use std::cmp::Reverse;
use thiserror::Error;
use tracing::debug;

mod model;

pub use model::*;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Ingredients parameter is required")]
    InvalidQuery,

    #[error("Recipe {recipe} has a malformed ingredient at position {index}")]
    MalformedCandidate { recipe: RecipeId, index: usize },

    #[error("Failed to build ingredient pattern: {0}")]
    PatternError(#[from] regex::Error),
}

/// Ranks `candidates` against raw pantry terms.
///
/// Terms are trimmed and lower-cased, blank ones are ignored. Each recipe
/// gets a match count: the number of its ingredients whose name contains at
/// least one term. Recipes are returned by descending match count; recipes
/// with equal counts keep their input order, and recipes without any match
/// are kept at the end.
///
/// # Errors
///
/// Returns `SearchError::InvalidQuery` if no non-blank term is given.
///
/// # Examples
///
/// ```
/// use cookmate_core::{rank, Recipe, RecipeIngredient};
/// # use cookmate_core::{RecipeDraft, RecipeStep, UserId};
/// # fn recipe(title: &str, ingredients: &[(&str, &str)]) -> Recipe {
/// #     Recipe::from_draft(RecipeDraft {
/// #         title: title.to_string(),
/// #         description: "A recipe for testing".to_string(),
/// #         ingredients: ingredients.iter().map(|(n, q)| RecipeIngredient::new(*n, *q)).collect(),
/// #         steps: vec![RecipeStep::new(1, "Cook it")],
/// #         cooking_time: 10,
/// #         category: "Dinner".to_string(),
/// #         ..Default::default()
/// #     }, UserId::new("u1")).unwrap()
/// # }
///
/// let bruschetta = recipe("Bruschetta", &[("Tomatoes", "2"), ("Basil", "1 bunch")]);
/// let caprese = recipe("Caprese", &[("Mozzarella Cheese", "200g"), ("Tomato", "1")]);
///
/// let ranked = rank(["Tomato", "cheese"], vec![bruschetta, caprese])?;
/// assert_eq!(ranked[0].recipe.title, "Caprese");
/// assert_eq!(ranked[0].match_count, 2);
/// assert_eq!(ranked[1].match_count, 1);
/// # Ok::<(), cookmate_core::SearchError>(())
/// ```
pub fn rank<I, S>(pantry_terms: I, candidates: Vec<Recipe>) -> Result<Vec<RankedRecipe>, SearchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let query = PantryQuery::new(pantry_terms)?;
    Ok(rank_query(&query, candidates))
}

/// Ranks `candidates` against an already normalized query.
pub fn rank_query(query: &PantryQuery, candidates: Vec<Recipe>) -> Vec<RankedRecipe> {
    let mut ranked: Vec<RankedRecipe> = candidates
        .into_iter()
        .map(|recipe| RankedRecipe {
            match_count: count_matches(query, &recipe.ingredients),
            recipe,
        })
        .collect();

    // `sort_by_key` is stable, ties keep their input order
    ranked.sort_by_key(|r| Reverse(r.match_count));

    debug!(
        terms = ?query.terms(),
        candidates = ranked.len(),
        best = ranked.first().map(|r| r.match_count).unwrap_or(0),
        "ranked recipes by ingredient matches"
    );
    ranked
}

/// Ranks with configurable post-processing.
///
/// With `drop_unmatched` set, recipes whose match count is zero are removed
/// from the ranked result.
pub fn rank_with(
    query: &PantryQuery,
    candidates: Vec<Recipe>,
    config: &RankingConfig,
) -> Vec<RankedRecipe> {
    let mut ranked = rank_query(query, candidates);
    if config.drop_unmatched {
        ranked.retain(|r| r.match_count > 0);
    }
    ranked
}

/// Counts ingredients whose name contains at least one query term.
///
/// An ingredient counts once no matter how many terms it contains.
pub fn count_matches(query: &PantryQuery, ingredients: &[RecipeIngredient]) -> usize {
    ingredients
        .iter()
        .filter(|ingredient| query.matches(&ingredient.name))
        .count()
}

/// Splits a comma-separated ingredient parameter into raw terms.
///
/// The terms are not normalized; pass them to [`rank`] or
/// [`PantryQuery::new`].
pub fn split_pantry_query(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// Rejects candidates holding an ingredient with a blank name or quantity.
///
/// Meant for ingestion boundaries; the ranker itself assumes well-formed
/// candidates.
pub fn validate_candidates(candidates: &[Recipe]) -> Result<(), SearchError> {
    for recipe in candidates {
        if let Some(index) = recipe.first_malformed_ingredient() {
            return Err(SearchError::MalformedCandidate {
                recipe: recipe.id.clone(),
                index,
            });
        }
    }
    Ok(())
}
