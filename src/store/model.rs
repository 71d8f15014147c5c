use crate::Recipe;
use serde::{Deserialize, Serialize};

/// Filters and paging for [`RecipeBook::list`](super::RecipeBook::list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// One-indexed page number, defaults to 1
    pub page: Option<usize>,
    /// Page size, defaults to the configured page size
    pub limit: Option<usize>,
    /// Whitespace-separated words looked up in title, description and category
    pub search: Option<String>,
    /// Exact category name
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
}

/// One page of a recipe listing, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub recipes: Vec<Recipe>,
    pub pagination: Pagination,
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    /// True if the user likes the recipe after the toggle
    pub liked: bool,
    pub likes_count: usize,
}
