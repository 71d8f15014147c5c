//! Recipe document loading.
//!
//! This module reads recipe documents from the filesystem. A document is a
//! single [`Recipe`] serialized as JSON (`.json`) or YAML (`.yaml`, `.yml`)
//! with the same camelCase field names the mobile client uses. Missing ids
//! and timestamps are filled in on load.

use crate::search::{validate_candidates, SearchError};
use crate::Recipe;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File extensions recognized as recipe documents, in lookup order.
pub const RECIPE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Errors that can occur when loading recipe documents.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read recipe file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read directory: {0}")]
    GlobError(#[from] glob::GlobError),

    #[error("Failed to create glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Failed to parse recipe {path}: {source}")]
    JsonError {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse recipe {path}: {source}")]
    YamlError {
        path: Utf8PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid recipe in {path}: {source}")]
    InvalidRecipe {
        path: Utf8PathBuf,
        source: SearchError,
    },

    #[error("Invalid recipe path: {0}")]
    InvalidPath(Utf8PathBuf),
}

/// Loads a single recipe document.
///
/// The format is chosen from the file extension.
///
/// # Errors
///
/// Returns `FetchError::InvalidPath` for unsupported extensions, a parse
/// error for malformed documents, and `FetchError::InvalidRecipe` when an
/// ingredient has a blank name or quantity.
pub fn load_recipe(path: &Utf8Path) -> Result<Recipe, FetchError> {
    let recipe: Recipe = match path.extension() {
        Some("json") => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|source| FetchError::JsonError {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("yaml" | "yml") => {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content).map_err(|source| FetchError::YamlError {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => return Err(FetchError::InvalidPath(path.to_path_buf())),
    };

    validate_candidates(std::slice::from_ref(&recipe)).map_err(|source| {
        warn!(%path, error = %source, "rejected recipe document");
        FetchError::InvalidRecipe {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(recipe)
}

/// Loads every recipe document under `base_dir`, recursively.
///
/// Documents are returned sorted by path. A directory that does not exist
/// yields no recipes.
pub fn load_recipes(base_dir: &Utf8Path) -> Result<Vec<Recipe>, FetchError> {
    let mut paths = Vec::new();
    for ext in RECIPE_EXTENSIONS {
        let pattern = base_dir.join(format!("**/*.{ext}"));
        for entry in glob::glob(pattern.as_str())? {
            let path = Utf8PathBuf::from_path_buf(entry?).map_err(|_| {
                FetchError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Path contains invalid UTF-8",
                ))
            })?;
            paths.push(path);
        }
    }
    paths.sort();

    let recipes = paths
        .iter()
        .map(|path| load_recipe(path))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(%base_dir, count = recipes.len(), "loaded recipe documents");
    Ok(recipes)
}

/// Searches for and loads a recipe document by name.
///
/// The base directories are searched in order. A name with an extension is
/// used as-is; otherwise each of [`RECIPE_EXTENSIONS`] is tried.
///
/// # Examples
///
/// ```no_run
/// use cookmate_core::get_recipe;
/// use camino::Utf8PathBuf;
///
/// let dirs = vec![Utf8PathBuf::from("./seed"), Utf8PathBuf::from("./drafts")];
/// let recipe = get_recipe(dirs, Utf8PathBuf::from("pancakes"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn get_recipe<P: AsRef<Utf8Path>>(
    base_dirs: impl IntoIterator<Item = P>,
    name: P,
) -> Result<Recipe, FetchError> {
    let name = name.as_ref();

    for base_dir in base_dirs {
        let base_dir = base_dir.as_ref();
        if name.extension().is_some() {
            let recipe_path = base_dir.join(name);
            if recipe_path.exists() {
                return load_recipe(&recipe_path);
            }
        } else {
            for ext in RECIPE_EXTENSIONS {
                let recipe_path = base_dir.join(format!("{name}.{ext}"));
                if recipe_path.exists() {
                    return load_recipe(&recipe_path);
                }
            }
        }
    }

    Err(FetchError::InvalidPath(name.to_path_buf()))
}
