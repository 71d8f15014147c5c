//! UniFFI bindings for the mobile apps (iOS, Android).
//!
//! This module provides FFI-safe types and functions for use with UniFFI.
//! Identifiers cross the boundary as plain strings, timestamps as RFC 3339
//! strings and counts as `u64`.

use crate::config::{ConfigError, CookmateConfig};
use crate::fetcher::FetchError;
use crate::model::{
    format_cooking_time as format_cooking_time_internal, Difficulty, Recipe, RecipeDraft,
    RecipeError, RecipeId, RecipeIngredient, RecipeStep, UserId,
};
use crate::search::{
    rank as rank_internal, split_pantry_query as split_internal, RankedRecipe, SearchError,
};
use crate::store::{LikeStatus, ListQuery, Page, RecipeBook, StoreError};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum CookmateError {
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Recipe not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl From<SearchError> for CookmateError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidQuery => CookmateError::InvalidQuery {
                message: e.to_string(),
            },
            SearchError::MalformedCandidate { .. } => CookmateError::Validation {
                message: e.to_string(),
            },
            SearchError::PatternError(_) => CookmateError::InvalidQuery {
                message: e.to_string(),
            },
        }
    }
}

impl From<RecipeError> for CookmateError {
    fn from(e: RecipeError) -> Self {
        CookmateError::Validation {
            message: e.to_string(),
        }
    }
}

impl From<FetchError> for CookmateError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::IoError(_) | FetchError::GlobError(_) | FetchError::PatternError(_) => {
                CookmateError::IoError {
                    message: e.to_string(),
                }
            }
            FetchError::JsonError { .. } | FetchError::YamlError { .. } => {
                CookmateError::ParseError {
                    message: e.to_string(),
                }
            }
            FetchError::InvalidRecipe { .. } => CookmateError::Validation {
                message: e.to_string(),
            },
            FetchError::InvalidPath(p) => CookmateError::NotFound {
                message: p.to_string(),
            },
        }
    }
}

impl From<StoreError> for CookmateError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => CookmateError::NotFound {
                message: id.to_string(),
            },
            StoreError::Duplicate(_) => CookmateError::Validation {
                message: e.to_string(),
            },
            StoreError::RecipeError(e) => e.into(),
            StoreError::SearchError(e) => e.into(),
            StoreError::FetchError(e) => e.into(),
        }
    }
}

impl From<ConfigError> for CookmateError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::IoError(_) => CookmateError::IoError {
                message: e.to_string(),
            },
            ConfigError::YamlError(_) => CookmateError::ParseError {
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiIngredient {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiStep {
    /// One-indexed
    pub step_number: u32,
    pub instruction: String,
}

/// FFI-safe representation of a stored recipe.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<FfiIngredient>,
    pub steps: Vec<FfiStep>,
    /// Minutes
    pub cooking_time: u32,
    /// "Easy", "Medium" or "Hard"
    pub difficulty: String,
    pub category: String,
    pub image: String,
    pub author: String,
    /// Ids of users who liked the recipe
    pub likes: Vec<String>,
    pub tags: Vec<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// The fields a user fills in when adding a recipe.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<FfiIngredient>,
    pub steps: Vec<FfiStep>,
    pub cooking_time: u32,
    pub difficulty: Option<String>,
    pub category: String,
    pub image: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRankedRecipe {
    pub recipe: FfiRecipe,
    /// Number of the recipe's ingredients matching the pantry terms
    pub match_count: u64,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPage {
    pub recipes: Vec<FfiRecipe>,
    pub current: u64,
    pub pages: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct FfiLikeStatus {
    pub liked: bool,
    pub likes_count: u64,
}

impl From<&RecipeIngredient> for FfiIngredient {
    fn from(i: &RecipeIngredient) -> Self {
        FfiIngredient {
            name: i.name.clone(),
            quantity: i.quantity.clone(),
        }
    }
}

impl From<FfiIngredient> for RecipeIngredient {
    fn from(i: FfiIngredient) -> Self {
        RecipeIngredient::new(i.name, i.quantity)
    }
}

impl From<FfiStep> for RecipeStep {
    fn from(s: FfiStep) -> Self {
        RecipeStep::new(s.step_number, s.instruction)
    }
}

impl From<&Recipe> for FfiRecipe {
    fn from(r: &Recipe) -> Self {
        FfiRecipe {
            id: r.id.to_string(),
            title: r.title.clone(),
            description: r.description.clone(),
            ingredients: r.ingredients.iter().map(FfiIngredient::from).collect(),
            steps: r
                .steps
                .iter()
                .map(|s| FfiStep {
                    step_number: s.step_number,
                    instruction: s.instruction.clone(),
                })
                .collect(),
            cooking_time: r.cooking_time,
            difficulty: r.difficulty.to_string(),
            category: r.category.clone(),
            image: r.image.clone(),
            author: r.author.to_string(),
            likes: r.likes.iter().map(|u| u.to_string()).collect(),
            tags: r.tags.clone(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<FfiRecipe> for Recipe {
    type Error = CookmateError;

    fn try_from(r: FfiRecipe) -> Result<Self, Self::Error> {
        Ok(Recipe {
            id: RecipeId::new(r.id),
            title: r.title,
            description: r.description,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
            steps: r.steps.into_iter().map(Into::into).collect(),
            cooking_time: r.cooking_time,
            difficulty: r.difficulty.parse::<Difficulty>()?,
            category: r.category,
            image: r.image,
            author: UserId::new(r.author),
            likes: r.likes.into_iter().map(UserId::new).collect(),
            tags: r.tags,
            created_at: parse_timestamp(&r.created_at)?,
            updated_at: parse_timestamp(&r.updated_at)?,
        })
    }
}

impl TryFrom<FfiRecipeDraft> for RecipeDraft {
    type Error = CookmateError;

    fn try_from(d: FfiRecipeDraft) -> Result<Self, Self::Error> {
        let difficulty = d
            .difficulty
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Difficulty>())
            .transpose()?;

        Ok(RecipeDraft {
            title: d.title,
            description: d.description,
            ingredients: d.ingredients.into_iter().map(Into::into).collect(),
            steps: d.steps.into_iter().map(Into::into).collect(),
            cooking_time: d.cooking_time,
            difficulty,
            category: d.category,
            image: d.image,
            tags: d.tags,
        })
    }
}

impl From<&RankedRecipe> for FfiRankedRecipe {
    fn from(r: &RankedRecipe) -> Self {
        FfiRankedRecipe {
            recipe: FfiRecipe::from(&r.recipe),
            match_count: r.match_count as u64,
        }
    }
}

impl From<&Page> for FfiPage {
    fn from(p: &Page) -> Self {
        FfiPage {
            recipes: p.recipes.iter().map(FfiRecipe::from).collect(),
            current: p.pagination.current as u64,
            pages: p.pagination.pages as u64,
            total: p.pagination.total as u64,
        }
    }
}

impl From<LikeStatus> for FfiLikeStatus {
    fn from(s: LikeStatus) -> Self {
        FfiLikeStatus {
            liked: s.liked,
            likes_count: s.likes_count as u64,
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CookmateError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CookmateError::ParseError {
            message: format!("Invalid timestamp {value:?}: {e}"),
        })
}

/// Thread-safe recipe book shared with the app.
///
/// Reads (listing, search) run concurrently; writes take an exclusive lock.
#[derive(uniffi::Object)]
pub struct FfiRecipeBook {
    inner: RwLock<RecipeBook>,
}

#[uniffi::export]
impl FfiRecipeBook {
    /// Creates an empty book with default settings.
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        Arc::new(FfiRecipeBook::with_book(RecipeBook::default()))
    }

    /// Creates a book seeded from the recipe documents under `base_dir`.
    ///
    /// `config_path` optionally points at a YAML configuration file.
    #[uniffi::constructor]
    pub fn from_dir(base_dir: String, config_path: Option<String>) -> Result<Arc<Self>, CookmateError> {
        let config = match config_path {
            Some(path) => CookmateConfig::from_path(Utf8Path::new(&path))?,
            None => CookmateConfig::default(),
        };
        let book = RecipeBook::from_dir(Utf8Path::new(&base_dir), config)?;
        Ok(Arc::new(FfiRecipeBook::with_book(book)))
    }

    /// Number of stored recipes.
    pub fn len(&self) -> u64 {
        self.read().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Adds a recipe written by `author`.
    pub fn create(&self, draft: FfiRecipeDraft, author: String) -> Result<FfiRecipe, CookmateError> {
        let draft = RecipeDraft::try_from(draft)?;
        let recipe = self.write().create(&draft, UserId::new(author))?;
        Ok(FfiRecipe::from(&recipe))
    }

    pub fn get(&self, id: String) -> Result<FfiRecipe, CookmateError> {
        let book = self.read();
        let recipe = book.get(&RecipeId::new(id))?;
        Ok(FfiRecipe::from(recipe))
    }

    /// Lists recipes newest first.
    pub fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
        category: Option<String>,
    ) -> FfiPage {
        let query = ListQuery {
            page: page.map(|p| p as usize),
            limit: limit.map(|l| l as usize),
            search,
            category,
        };
        FfiPage::from(&self.read().list(&query))
    }

    /// Recipes written by `author`, newest first.
    pub fn my_recipes(&self, author: String) -> Vec<FfiRecipe> {
        self.read()
            .by_author(&UserId::new(author))
            .iter()
            .map(FfiRecipe::from)
            .collect()
    }

    /// Likes or unlikes a recipe on behalf of `user`.
    pub fn toggle_like(&self, id: String, user: String) -> Result<FfiLikeStatus, CookmateError> {
        let status = self
            .write()
            .toggle_like(&RecipeId::new(id), &UserId::new(user))?;
        Ok(status.into())
    }

    /// Finds recipes by a comma-separated ingredient list, best matches first.
    pub fn search_by_ingredients(&self, ingredients: String) -> Result<Vec<FfiRankedRecipe>, CookmateError> {
        let ranked = self.read().search_by_ingredients(&ingredients)?;
        Ok(ranked.iter().map(FfiRankedRecipe::from).collect())
    }
}

impl FfiRecipeBook {
    fn with_book(book: RecipeBook) -> Self {
        FfiRecipeBook {
            inner: RwLock::new(book),
        }
    }

    // Poisoning is ignored, no book operation leaves partial state behind.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, RecipeBook> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RecipeBook> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Exported FFI Functions
// ============================================================================

/// Ranks recipes by how many of their ingredients match the pantry terms.
///
/// # Arguments
/// * `pantry_terms` - Ingredient names the user has; blank entries are ignored
/// * `candidates` - Recipes to rank
///
/// # Returns
/// The candidates ordered by descending match count, ties in input order.
#[uniffi::export]
pub fn rank_recipes(
    pantry_terms: Vec<String>,
    candidates: Vec<FfiRecipe>,
) -> Result<Vec<FfiRankedRecipe>, CookmateError> {
    let candidates = candidates
        .into_iter()
        .map(Recipe::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let ranked = rank_internal(&pantry_terms, candidates)?;
    Ok(ranked.iter().map(FfiRankedRecipe::from).collect())
}

/// Splits a comma-separated ingredient list as typed by the user.
#[uniffi::export]
pub fn split_pantry_query(raw: String) -> Vec<String> {
    split_internal(&raw)
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Formats a cooking time in minutes for display.
#[uniffi::export]
pub fn format_cooking_time(minutes: u32) -> String {
    format_cooking_time_internal(minutes)
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn ffi_draft(title: &str, ingredients: &[&str]) -> FfiRecipeDraft {
        FfiRecipeDraft {
            title: title.to_string(),
            description: format!("{title} from the test kitchen"),
            ingredients: ingredients
                .iter()
                .map(|name| FfiIngredient {
                    name: name.to_string(),
                    quantity: "1".to_string(),
                })
                .collect(),
            steps: vec![FfiStep {
                step_number: 1,
                instruction: "Prepare and serve warm".to_string(),
            }],
            cooking_time: 25,
            difficulty: Some("easy".to_string()),
            category: "Dinner".to_string(),
            image: String::new(),
            tags: vec![],
        }
    }

    #[test]
    fn test_book_create_and_search() {
        let book = FfiRecipeBook::new();
        book.create(ffi_draft("Bruschetta", &["Tomatoes", "Basil"]), "u1".to_string())
            .unwrap();
        book.create(
            ffi_draft("Caprese", &["Mozzarella Cheese", "Tomato"]),
            "u2".to_string(),
        )
        .unwrap();

        let ranked = book
            .search_by_ingredients("Tomato, cheese".to_string())
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].recipe.title, "Caprese");
        assert_eq!(ranked[0].match_count, 2);
        assert_eq!(ranked[1].match_count, 1);
        assert_eq!(ranked[1].recipe.difficulty, "Easy");
    }

    #[test]
    fn test_book_search_invalid_query() {
        let book = FfiRecipeBook::new();
        let result = book.search_by_ingredients(" ,".to_string());
        assert!(matches!(result, Err(CookmateError::InvalidQuery { .. })));
    }

    #[test]
    fn test_book_create_invalid() {
        let book = FfiRecipeBook::new();
        let mut draft = ffi_draft("Stew", &["Beef"]);
        draft.cooking_time = 0;

        let result = book.create(draft, "u1".to_string());
        assert!(matches!(result, Err(CookmateError::Validation { .. })));
        assert!(book.is_empty());
    }

    #[test]
    fn test_book_unknown_difficulty() {
        let book = FfiRecipeBook::new();
        let mut draft = ffi_draft("Stew", &["Beef"]);
        draft.difficulty = Some("Impossible".to_string());

        let result = book.create(draft, "u1".to_string());
        assert!(matches!(result, Err(CookmateError::Validation { .. })));
    }

    #[test]
    fn test_book_like_and_list() {
        let book = FfiRecipeBook::new();
        let recipe = book
            .create(ffi_draft("Stew", &["Beef"]), "u1".to_string())
            .unwrap();

        let status = book.toggle_like(recipe.id.clone(), "u2".to_string()).unwrap();
        assert_eq!(
            status,
            FfiLikeStatus {
                liked: true,
                likes_count: 1
            }
        );
        assert_eq!(book.get(recipe.id.clone()).unwrap().likes, vec!["u2"]);

        let page = book.list(None, None, None, Some("Dinner".to_string()));
        assert_eq!(page.total, 1);
        assert_eq!(page.pages, 1);
        assert_eq!(book.my_recipes("u1".to_string()).len(), 1);

        let missing = book.toggle_like("missing".to_string(), "u2".to_string());
        assert!(matches!(missing, Err(CookmateError::NotFound { .. })));
    }

    #[test]
    fn test_book_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().to_str().unwrap();
        let recipes_dir = format!("{temp_path}/recipes");
        fs::create_dir_all(&recipes_dir).unwrap();

        fs::write(
            format!("{recipes_dir}/omelette.yaml"),
            indoc! {r#"
                title: Omelette
                description: Cheese and mushroom omelette
                ingredients:
                  - name: Eggs
                    quantity: "3"
                  - name: Cheese
                    quantity: 50g
                steps:
                  - stepNumber: 1
                    instruction: Whisk and fry the eggs
                cookingTime: 10
                category: Breakfast
                author: chef
            "#},
        )
        .unwrap();
        let config_path = format!("{temp_path}/cookmate.yml");
        fs::write(&config_path, "page_size: 5\n").unwrap();

        let book = FfiRecipeBook::from_dir(recipes_dir, Some(config_path)).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.search_by_ingredients("egg".to_string()).unwrap().len(), 1);
    }

    #[test]
    fn test_book_from_dir_bad_config() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().to_str().unwrap().to_string();

        let result = FfiRecipeBook::from_dir(temp_path, Some("/nonexistent/cookmate.yml".into()));
        assert!(matches!(result, Err(CookmateError::IoError { .. })));
    }

    #[test]
    fn test_rank_recipes_round_trip() {
        let book = FfiRecipeBook::new();
        let a = book
            .create(ffi_draft("Recipe A", &["Tomatoes", "Basil"]), "u1".to_string())
            .unwrap();
        let b = book
            .create(
                ffi_draft("Recipe B", &["Mozzarella Cheese", "Tomato"]),
                "u1".to_string(),
            )
            .unwrap();

        let ranked = rank_recipes(
            vec!["Tomato".to_string(), "cheese".to_string()],
            vec![a.clone(), b.clone()],
        )
        .unwrap();
        assert_eq!(ranked[0].recipe, b);
        assert_eq!(ranked[1].recipe, a);
    }

    #[test]
    fn test_rank_recipes_invalid() {
        let result = rank_recipes(vec![" ".to_string(), String::new()], vec![]);
        assert!(matches!(result, Err(CookmateError::InvalidQuery { .. })));
    }

    #[test]
    fn test_rank_recipes_bad_timestamp() {
        let book = FfiRecipeBook::new();
        let mut recipe = book
            .create(ffi_draft("Stew", &["Beef"]), "u1".to_string())
            .unwrap();
        recipe.created_at = "yesterday".to_string();

        let result = rank_recipes(vec!["beef".to_string()], vec![recipe]);
        assert!(matches!(result, Err(CookmateError::ParseError { .. })));
    }

    #[test]
    fn test_split_pantry_query() {
        assert_eq!(
            split_pantry_query(" eggs, ,flour ".to_string()),
            vec!["eggs", "flour"]
        );
    }

    #[test]
    fn test_format_cooking_time() {
        assert_eq!(format_cooking_time(75), "1h 15min");
    }

    #[test]
    fn test_library_version() {
        let version = library_version();
        assert!(!version.is_empty());
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }
}
