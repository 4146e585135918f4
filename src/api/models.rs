use serde::{Deserialize, Serialize};

use crate::corpus::Recipe;
use crate::recommend::FilterParams;

/// Search form fields. Blank filters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl SearchRequest {
    pub fn filters(&self) -> FilterParams {
        FilterParams {
            diet: self.diet.clone(),
            difficulty: self.difficulty.clone(),
            time_limit: self.time.clone(),
        }
    }
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RecipeCard>,
    pub total: usize,
}

/// Recipe summary for result lists
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCard {
    pub id: usize,
    pub name: String,
    pub image: String,
    pub diet: String,
    pub difficulty: Option<String>,
    pub time: Option<u32>,
}

impl From<Recipe> for RecipeCard {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            diet: recipe.diet,
            difficulty: recipe.difficulty,
            time: recipe.time,
        }
    }
}

/// Today's specials
#[derive(Debug, Clone, Serialize)]
pub struct SpecialsResponse {
    pub date: String,
    pub specials: Vec<RecipeCard>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub recipes: usize,
}
