use super::SearchError;
use crate::Recipe;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Normalized pantry terms of an ingredient search.
///
/// Terms are trimmed and lower-cased; blank terms are dropped. A query
/// always holds at least one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryQuery {
    terms: Vec<String>,
}

impl PantryQuery {
    /// Builds a query from raw pantry terms.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidQuery` when no term is left after
    /// dropping blank ones.
    pub fn new<I, S>(terms: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Err(SearchError::InvalidQuery);
        }
        Ok(Self { terms })
    }

    /// Builds a query from a comma-separated list such as `"tomato, basil"`.
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        Self::new(super::split_pantry_query(raw))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// True when the ingredient name contains at least one term, ignoring case.
    pub fn matches(&self, ingredient_name: &str) -> bool {
        let name = ingredient_name.to_lowercase();
        self.terms.iter().any(|term| name.contains(term.as_str()))
    }

    /// Case-insensitive literal patterns for store-side pre-filtering.
    pub fn patterns(&self) -> Result<Vec<Regex>, SearchError> {
        self.terms
            .iter()
            .map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
                    .map_err(SearchError::from)
            })
            .collect()
    }
}

/// A recipe paired with the number of its ingredients matching a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_count: usize,
}
