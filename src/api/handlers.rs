use axum::{
    extract::{Path, Query, State},
    Form, Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{api::models::*, corpus::Recipe, recommend::Recommender, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

/// POST /api/search - Rank recipes for a form submission
pub async fn search_form(
    State(state): State<AppState>,
    Form(request): Form<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    search(&state, request)
}

/// GET /api/search - Same as the form, from query parameters
pub async fn search_query(
    State(state): State<AppState>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    search(&state, request)
}

fn search(state: &AppState, request: SearchRequest) -> Result<Json<SearchResponse>> {
    debug!("Search request: {:?}", request);

    let recipes = state
        .recommender
        .recommend(&request.ingredients, &request.filters())?;
    let results: Vec<RecipeCard> = recipes
        .iter()
        .map(|r| RecipeCard::from(state.recommender.for_display(r)))
        .collect();

    Ok(Json(SearchResponse {
        query: request.ingredients,
        total: results.len(),
        results,
    }))
}

/// GET /api/recipes/:id - Full recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> Result<Json<Recipe>> {
    debug!("Get recipe request: {}", id);

    let recipe = state.recommender.recipe(id)?;
    Ok(Json(state.recommender.for_display(&recipe)))
}

/// GET /api/specials - Today's specials
pub async fn get_specials(State(state): State<AppState>) -> Result<Json<SpecialsResponse>> {
    debug!("Get specials request");

    let specials = state
        .recommender
        .todays_specials()
        .iter()
        .map(|r| RecipeCard::from(state.recommender.for_display(r)))
        .collect();

    Ok(Json(SpecialsResponse {
        date: state.recommender.today().to_string(),
        specials,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        recipes: state.recommender.corpus().len(),
    }))
}
