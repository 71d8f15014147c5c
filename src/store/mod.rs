//! Recipe storage.
//!
//! [`RecipeStore`] is the capability the ingredient search needs from a
//! backend: hand back every recipe that might match a set of ingredient
//! patterns. [`RecipeBook`] is the in-memory implementation, which also
//! covers the rest of the recipe workflow (create, list, like).

use crate::config::{CookmateConfig, RankingConfig};
use crate::fetcher::{load_recipes, FetchError};
use crate::search::{rank_with, PantryQuery, RankedRecipe, SearchError};
use crate::{Recipe, RecipeDraft, RecipeError, RecipeId, UserId};
use camino::Utf8Path;
use chrono::Utc;
use regex::Regex;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::{debug, info};

mod model;

pub use model::*;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    #[error("Recipe already exists: {0}")]
    Duplicate(RecipeId),

    #[error(transparent)]
    RecipeError(#[from] RecipeError),

    #[error(transparent)]
    SearchError(#[from] SearchError),

    #[error("Failed to load recipes: {0}")]
    FetchError(#[from] FetchError),
}

/// A source of candidate recipes for ingredient search.
///
/// Implementations may return more recipes than strictly match; ranking
/// does not depend on how tight the pre-filter is.
pub trait RecipeStore {
    /// Returns recipes having at least one ingredient name matched by any
    /// of `patterns`.
    fn candidates_matching(&self, patterns: &[Regex]) -> Vec<Recipe>;

    /// Returns every stored recipe.
    fn all_recipes(&self) -> Vec<Recipe>;
}

/// Searches `store` for recipes using the pantry terms of `query`.
///
/// Candidates come from the store's pattern pre-filter and are then ranked
/// by match count.
pub fn search_store<S: RecipeStore + ?Sized>(
    store: &S,
    query: &PantryQuery,
    config: &RankingConfig,
) -> Result<Vec<RankedRecipe>, SearchError> {
    let patterns = query.patterns()?;
    let candidates = store.candidates_matching(&patterns);
    debug!(
        terms = ?query.terms(),
        candidates = candidates.len(),
        "pre-filtered recipes by ingredient patterns"
    );
    Ok(rank_with(query, candidates, config))
}

/// In-memory recipe collection kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    config: CookmateConfig,
}

impl RecipeBook {
    pub fn new(config: CookmateConfig) -> Self {
        Self {
            recipes: Vec::new(),
            config,
        }
    }

    /// Creates a book seeded with the recipe documents found under `base_dir`.
    pub fn from_dir(base_dir: &Utf8Path, config: CookmateConfig) -> Result<Self, StoreError> {
        let mut book = Self::new(config);
        for recipe in load_recipes(base_dir)? {
            book.insert(recipe)?;
        }
        info!(%base_dir, count = book.len(), "seeded recipe book");
        Ok(book)
    }

    pub fn config(&self) -> &CookmateConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Adds an already built recipe.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if a recipe with the same id exists.
    pub fn insert(&mut self, recipe: Recipe) -> Result<(), StoreError> {
        if self.position(&recipe.id).is_some() {
            return Err(StoreError::Duplicate(recipe.id));
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Sanitizes and validates `draft`, then stores it as a new recipe by `author`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecipeError` with every invalid field when the
    /// sanitized draft does not validate.
    pub fn create(&mut self, draft: &RecipeDraft, author: UserId) -> Result<Recipe, StoreError> {
        let draft = draft.sanitized(self.config.max_input_len);
        let recipe = Recipe::from_draft(draft, author)?;
        info!(id = %recipe.id, author = %recipe.author, "created recipe");

        self.insert(recipe.clone())?;
        Ok(recipe)
    }

    pub fn get(&self, id: &RecipeId) -> Result<&Recipe, StoreError> {
        self.recipes
            .iter()
            .find(|r| r.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Lists recipes newest first, filtered and paged by `query`.
    ///
    /// Page numbers below 1 are treated as 1 and a zero limit as 1. A page
    /// past the end is empty but still reports the totals.
    pub fn list(&self, query: &ListQuery) -> Page {
        let words: Vec<String> = query
            .search
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let matching: Vec<&Recipe> = self
            .newest_first()
            .into_iter()
            .filter(|r| match &query.category {
                Some(category) => r.category == *category,
                None => true,
            })
            .filter(|r| words.is_empty() || matches_text(r, &words))
            .collect();

        let current = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(self.config.page_size).max(1);
        let total = matching.len();

        let recipes = matching
            .into_iter()
            .skip((current - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        Page {
            recipes,
            pagination: Pagination {
                current,
                pages: total.div_ceil(limit),
                total,
            },
        }
    }

    /// Recipes written by `author`, newest first.
    pub fn by_author(&self, author: &UserId) -> Vec<Recipe> {
        self.newest_first()
            .into_iter()
            .filter(|r| r.author == *author)
            .cloned()
            .collect()
    }

    /// Likes the recipe for `user`, or removes the like if already present.
    pub fn toggle_like(&mut self, id: &RecipeId, user: &UserId) -> Result<LikeStatus, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let recipe = &mut self.recipes[index];

        let liked = match recipe.likes.iter().position(|u| u == user) {
            Some(existing) => {
                recipe.likes.remove(existing);
                false
            }
            None => {
                recipe.likes.push(user.clone());
                true
            }
        };
        recipe.updated_at = Utc::now();

        info!(%id, %user, liked, "updated like status");
        Ok(LikeStatus {
            liked,
            likes_count: recipe.likes.len(),
        })
    }

    /// Finds recipes by a comma-separated ingredient list, best matches first.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidQuery` (wrapped) when the list holds no
    /// ingredient.
    pub fn search_by_ingredients(&self, ingredients: &str) -> Result<Vec<RankedRecipe>, StoreError> {
        let query = PantryQuery::parse(ingredients)?;
        Ok(self.search(&query)?)
    }

    pub fn search(&self, query: &PantryQuery) -> Result<Vec<RankedRecipe>, SearchError> {
        search_store(self, query, &self.config.ranking)
    }

    fn position(&self, id: &RecipeId) -> Option<usize> {
        self.recipes.iter().position(|r| r.id == *id)
    }

    fn newest_first(&self) -> Vec<&Recipe> {
        // later insertions win ties on equal timestamps
        let mut recipes: Vec<&Recipe> = self.recipes.iter().rev().collect();
        recipes.sort_by_key(|r| Reverse(r.created_at));
        recipes
    }
}

impl RecipeStore for RecipeBook {
    fn candidates_matching(&self, patterns: &[Regex]) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| {
                // patterns run on the lower-cased name, as the ranker compares
                recipe.ingredients.iter().any(|i| {
                    let name = i.name.to_lowercase();
                    patterns.iter().any(|p| p.is_match(&name))
                })
            })
            .cloned()
            .collect()
    }

    fn all_recipes(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }
}

fn matches_text(recipe: &Recipe, words: &[String]) -> bool {
    let haystacks = [
        recipe.title.to_lowercase(),
        recipe.description.to_lowercase(),
        recipe.category.to_lowercase(),
    ];
    words
        .iter()
        .any(|word| haystacks.iter().any(|h| h.contains(word.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecipeIngredient, RecipeStep};

    fn create_test_draft(title: &str, category: &str, ingredients: &[&str]) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            description: format!("Homemade {title} for the family"),
            ingredients: ingredients
                .iter()
                .map(|name| RecipeIngredient::new(*name, "1"))
                .collect(),
            steps: vec![RecipeStep::new(1, "Cook everything slowly")],
            cooking_time: 30,
            category: category.to_string(),
            ..Default::default()
        }
    }

    fn setup_test_book() -> RecipeBook {
        let mut book = RecipeBook::default();
        let chef = UserId::new("chef");
        let baker = UserId::new("baker");

        book.create(
            &create_test_draft("Pancakes", "Breakfast", &["Flour", "Eggs", "Milk"]),
            baker.clone(),
        )
        .unwrap();
        book.create(
            &create_test_draft("Tomato Soup", "Lunch", &["Tomatoes", "Onion"]),
            chef.clone(),
        )
        .unwrap();
        book.create(
            &create_test_draft("Caprese", "Lunch", &["Mozzarella Cheese", "Tomato", "Basil"]),
            chef,
        )
        .unwrap();
        book.create(
            &create_test_draft("Omelette", "Breakfast", &["Eggs", "Cheese"]),
            baker,
        )
        .unwrap();
        book
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_create_and_get() {
        let mut book = RecipeBook::default();
        let recipe = book
            .create(&create_test_draft("  <Chili> ", "Dinner", &["Beans"]), UserId::new("u1"))
            .unwrap();

        assert_eq!(recipe.title, "Chili");
        assert_eq!(book.get(&recipe.id).unwrap(), &recipe);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_create_invalid() {
        let mut book = RecipeBook::default();
        let result = book.create(&RecipeDraft::default(), UserId::new("u1"));

        assert!(matches!(
            result,
            Err(StoreError::RecipeError(RecipeError::Validation(_)))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_get_not_found() {
        let book = setup_test_book();
        let result = book.get(&RecipeId::new("missing"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut book = setup_test_book();
        let existing = book.all_recipes().remove(0);
        assert!(matches!(book.insert(existing), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let book = setup_test_book();
        let page = book.list(&ListQuery::default());

        assert_eq!(
            titles(&page.recipes),
            vec!["Omelette", "Caprese", "Tomato Soup", "Pancakes"]
        );
        assert_eq!(
            page.pagination,
            Pagination {
                current: 1,
                pages: 1,
                total: 4
            }
        );
    }

    #[test]
    fn test_list_pagination() {
        let book = setup_test_book();
        let query = ListQuery {
            page: Some(2),
            limit: Some(3),
            ..Default::default()
        };
        let page = book.list(&query);

        assert_eq!(titles(&page.recipes), vec!["Pancakes"]);
        assert_eq!(page.pagination.pages, 2);
        assert_eq!(page.pagination.total, 4);
    }

    #[test]
    fn test_list_page_out_of_range() {
        let book = setup_test_book();
        let query = ListQuery {
            page: Some(9),
            ..Default::default()
        };
        let page = book.list(&query);

        assert!(page.recipes.is_empty());
        assert_eq!(page.pagination.total, 4);
    }

    #[test]
    fn test_list_clamps_page_and_limit() {
        let book = setup_test_book();
        let query = ListQuery {
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        };
        let page = book.list(&query);

        assert_eq!(page.recipes.len(), 1);
        assert_eq!(page.pagination.current, 1);
        assert_eq!(page.pagination.pages, 4);
    }

    #[test]
    fn test_list_by_category_and_search() {
        let book = setup_test_book();

        let lunch = book.list(&ListQuery {
            category: Some("Lunch".to_string()),
            ..Default::default()
        });
        assert_eq!(titles(&lunch.recipes), vec!["Caprese", "Tomato Soup"]);

        let soup = book.list(&ListQuery {
            search: Some("SOUP".to_string()),
            ..Default::default()
        });
        assert_eq!(titles(&soup.recipes), vec!["Tomato Soup"]);

        let breakfast_text = book.list(&ListQuery {
            search: Some("breakfast".to_string()),
            category: Some("Lunch".to_string()),
            ..Default::default()
        });
        assert!(breakfast_text.recipes.is_empty());
    }

    #[test]
    fn test_by_author() {
        let book = setup_test_book();
        let recipes = book.by_author(&UserId::new("baker"));
        assert_eq!(titles(&recipes), vec!["Omelette", "Pancakes"]);
        assert!(book.by_author(&UserId::new("nobody")).is_empty());
    }

    #[test]
    fn test_toggle_like() {
        let mut book = setup_test_book();
        let id = book.list(&ListQuery::default()).recipes[0].id.clone();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        let status = book.toggle_like(&id, &alice).unwrap();
        assert_eq!(status, LikeStatus { liked: true, likes_count: 1 });

        let status = book.toggle_like(&id, &bob).unwrap();
        assert_eq!(status, LikeStatus { liked: true, likes_count: 2 });

        let status = book.toggle_like(&id, &alice).unwrap();
        assert_eq!(status, LikeStatus { liked: false, likes_count: 1 });

        let recipe = book.get(&id).unwrap();
        assert!(recipe.is_liked_by(&bob));
        assert!(!recipe.is_liked_by(&alice));
        assert!(recipe.updated_at >= recipe.created_at);
    }

    #[test]
    fn test_toggle_like_not_found() {
        let mut book = setup_test_book();
        let result = book.toggle_like(&RecipeId::new("missing"), &UserId::new("alice"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_search_by_ingredients() {
        let book = setup_test_book();
        let ranked = book.search_by_ingredients("tomato, cheese").unwrap();

        let found: Vec<(&str, usize)> = ranked
            .iter()
            .map(|r| (r.recipe.title.as_str(), r.match_count))
            .collect();
        assert_eq!(
            found,
            vec![("Caprese", 2), ("Tomato Soup", 1), ("Omelette", 1)]
        );
    }

    #[test]
    fn test_search_by_ingredients_excludes_unrelated() {
        let book = setup_test_book();
        let ranked = book.search_by_ingredients("flour").unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].recipe.title, "Pancakes");

        assert!(book.search_by_ingredients("saffron").unwrap().is_empty());
    }

    #[test]
    fn test_search_by_ingredients_requires_terms() {
        let book = setup_test_book();
        let result = book.search_by_ingredients(" , ");
        assert!(matches!(
            result,
            Err(StoreError::SearchError(SearchError::InvalidQuery))
        ));
    }

    #[test]
    fn test_search_with_special_characters() {
        let mut book = RecipeBook::default();
        book.create(
            &create_test_draft("Hot Sauce", "Condiment", &["Chili (dried)"]),
            UserId::new("u1"),
        )
        .unwrap();

        let ranked = book.search_by_ingredients("(dried)").unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_count, 1);
    }

    #[test]
    fn test_search_matches_full_lowercase_names() {
        let mut book = RecipeBook::default();
        book.create(
            &create_test_draft("Kebab", "Dinner", &["İSOT BİBERİ"]),
            UserId::new("u1"),
        )
        .unwrap();

        let query = PantryQuery::new(["İsot"]).unwrap();
        let direct = crate::search::rank_query(&query, book.all_recipes());
        assert_eq!(direct[0].match_count, 1);

        let ranked = book.search_by_ingredients("İsot").unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_count, 1);
    }

    struct FullScan(Vec<Recipe>);

    impl RecipeStore for FullScan {
        fn candidates_matching(&self, _patterns: &[Regex]) -> Vec<Recipe> {
            self.all_recipes()
        }

        fn all_recipes(&self) -> Vec<Recipe> {
            self.0.clone()
        }
    }

    #[test]
    fn test_search_store_full_scan_keeps_unmatched() {
        let store = FullScan(setup_test_book().all_recipes());
        let query = PantryQuery::new(["basil"]).unwrap();

        let ranked = search_store(&store, &query, &RankingConfig::default()).unwrap();
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0].recipe.title, "Caprese");
        assert!(ranked[1..].iter().all(|r| r.match_count == 0));

        let config = RankingConfig {
            drop_unmatched: true,
        };
        let ranked = search_store(&store, &query, &config).unwrap();
        assert_eq!(ranked.len(), 1);
    }
}
