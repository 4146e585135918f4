use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;
use crate::recommend::CATEGORY_URL_PREFIX;

/// Create the router with all endpoints
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let api_routes = Router::new()
        .route(
            "/search",
            get(api_handlers::search_query).post(api_handlers::search_form),
        )
        .route("/recipes/:id", get(api_handlers::get_recipe))
        .route("/specials", get(api_handlers::get_specials))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .with_state(state);

    // Image assets under the same paths the recipes display
    let mut static_routes = Router::new();
    let prefix = settings.images.url_prefix.trim_matches('/');
    if !prefix.is_empty() {
        static_routes = static_routes
            .nest_service(&format!("/{prefix}"), ServeDir::new(&settings.images.image_dir));
    }
    if let Some(dir) = &settings.images.category_dir {
        static_routes =
            static_routes.nest_service(&format!("/{CATEGORY_URL_PREFIX}"), ServeDir::new(dir));
    }

    Router::new()
        .merge(health_routes)
        .merge(static_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.server.max_request_body_size,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, ImageConfig, RecommendConfig, ServerConfig};
    use crate::corpus::{fixtures::recipe, Corpus};
    use crate::recommend::Recommender;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_request_body_size: 65536,
            },
            corpus: CorpusConfig {
                recipes_path: "unused.csv".into(),
                ingredient_delimiter: ',',
            },
            images: ImageConfig::default(),
            recommend: RecommendConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_routes_exist() {
        let settings = create_test_settings();
        let corpus = Corpus::new(vec![recipe("Tomato Soup", &["tomato", "onion"])]);
        let state = AppState {
            recommender: Arc::new(Recommender::new(corpus, settings.recommend.clone())),
        };
        let app = create_router(state, &settings);

        for uri in ["/health", "/api/specials", "/api/recipes/0", "/api/search?ingredients=onion"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}
