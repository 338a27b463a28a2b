use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod history;
pub mod models;
pub mod routes;
pub mod search;
pub mod store;

use crate::config::Config;
use crate::store::ArticleStore;

/// Shared, immutable state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: ArticleStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: ArticleStore::new(config.data_source.clone()),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Financial Research API",
        version = "0.1.0",
        description = "Browse, categorize and search financial research articles"
    ),
    paths(
        health_check,
        routes::articles::list_articles,
        routes::articles::get_article,
        routes::articles::search_articles,
        routes::articles::popular_articles,
        routes::articles::related_articles,
        routes::articles::search_suggestions,
        routes::categories::list_categories,
        routes::categories::column_stats,
        routes::categories::list_industries,
        routes::categories::get_industry,
        routes::categories::macro_economy,
        routes::categories::investment_strategy
    ),
    components(schemas(
        models::Article,
        models::Column,
        models::FullContent,
        models::ArticleStat,
        models::SearchIndexEntry,
        models::CategorySummary,
        classify::Bucket,
        classify::IndustryStats,
        classify::KeywordCount,
        search::ColumnCount,
        routes::categories::IndustryOverview,
        routes::categories::IndustryDetail,
        routes::categories::MacroEconomyResponse,
        routes::categories::InvestmentStrategyResponse
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(config: &Config) -> Router {
    let state = AppState::new(config);

    let api_routes = Router::new()
        .route("/api/articles", get(routes::list_articles))
        .route("/api/articles/search", get(routes::search_articles))
        .route("/api/articles/popular", get(routes::popular_articles))
        .route("/api/articles/{id}", get(routes::get_article))
        .route("/api/articles/{id}/related", get(routes::related_articles))
        .route("/api/search/suggestions", get(routes::search_suggestions))
        .route("/api/categories", get(routes::list_categories))
        .route("/api/columns", get(routes::column_stats))
        .route("/api/industries", get(routes::list_industries))
        .route("/api/industries/{name}", get(routes::get_industry))
        .route("/api/macro-economy", get(routes::macro_economy))
        .route("/api/investment-strategy", get(routes::investment_strategy))
        .with_state(state);

    // Only the data routes are rate limited; health and docs stay open.
    let api_routes = match &config.rate_limit {
        Some(limit) => {
            let replenish_ms = (60_000 / u64::from(limit.per_minute)).max(1);
            let governor_conf = GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .per_millisecond(replenish_ms)
                .burst_size(limit.burst)
                .finish();
            match governor_conf {
                Some(conf) => api_routes.layer(GovernorLayer {
                    config: Arc::new(conf),
                }),
                None => {
                    tracing::warn!("Invalid rate limit settings {:?}; rate limiting disabled", limit);
                    api_routes
                }
            }
        }
        None => api_routes,
    };

    let mut app = Router::new()
        .merge(api_routes)
        .route("/health", get(health_check));

    if config.enable_docs {
        app = app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
