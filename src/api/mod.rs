// JSON surface over the recommender

pub mod handlers;
pub mod models;
pub mod routes;
