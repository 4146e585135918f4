// Recipe corpus: loading, normalization and image resolution

pub mod images;
pub mod loader;
pub mod models;

pub use images::{CategoryImages, ImageIndex};
pub use loader::{load_recipes, LoadReport, LoaderOptions, MissingValue};
pub use models::{RawRecord, Recipe, SourceFormat};

use crate::error::{Error, Result};

/// The full recipe collection, built once and never mutated.
///
/// Every recipe's `id` equals its position, so lookups are index access.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    recipes: Vec<Recipe>,
}

impl Corpus {
    /// Build a corpus, renumbering ids to match positions
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        for (position, recipe) in recipes.iter_mut().enumerate() {
            recipe.id = position;
        }
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn get(&self, id: usize) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Like [`Corpus::get`], with a typed not-found error for callers that
    /// map it to a response
    pub fn lookup(&self, id: usize) -> Result<&Recipe> {
        self.get(id)
            .ok_or_else(|| Error::NotFound(format!("Recipe {id} not found")))
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}
