pub mod config;
pub mod fetcher;
pub mod ffi;
pub mod model;
pub mod search;
pub mod store;

pub use config::{ConfigError, CookmateConfig, RankingConfig};
pub use fetcher::{get_recipe, load_recipe, load_recipes, FetchError};
pub use model::*;
pub use search::{
    count_matches, rank, rank_query, rank_with, split_pantry_query, validate_candidates,
    PantryQuery, RankedRecipe, SearchError,
};
pub use store::{
    search_store, LikeStatus, ListQuery, Page, Pagination, RecipeBook, RecipeStore, StoreError,
};

uniffi::setup_scaffolding!();
