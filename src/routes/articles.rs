use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::models::Article;
use crate::search;
use crate::AppState;

const POPULAR_LIMIT: usize = 10;
const RELATED_LIMIT: usize = 5;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Whitespace-separated keywords; every keyword must match. Empty returns all articles.
    #[serde(default)]
    #[param(required = false)]
    q: String,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidRequest("Invalid article ID".to_string()))
}

/// List all articles, newest first
#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "All articles sorted by creation time, newest first", body = [Article])
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> Json<Vec<Article>> {
    Json(state.store.articles().await)
}

/// Get a single article with its full content
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article found", body = Article),
        (status = 400, description = "Id is not a number"),
        (status = 404, description = "No article with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let id = parse_id(&id)?;
    state
        .store
        .article(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Article".to_string()))
}

/// Keyword search ranked by relevance
#[utoipa::path(
    get,
    path = "/api/articles/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching articles, most relevant first", body = [Article])
    ),
    description = "Every keyword must appear in the title, brief or column name. Results are ranked by 3 points per keyword in the title, 2 in the brief and 1 in the column name; ties keep newest-first order."
)]
#[tracing::instrument(skip(state, query), fields(q = %query.q))]
pub async fn search_articles(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Article>> {
    let (articles, index) =
        futures::future::join(state.store.articles(), state.store.search_index()).await;

    let results = if index.is_empty() {
        search::search(&articles, &query.q)
    } else {
        search::search_with_index(&articles, &index, &query.q)
    };
    tracing::info!("Search matched {} of {} articles", results.len(), articles.len());
    Json(results)
}

/// Most-read articles
#[utoipa::path(
    get,
    path = "/api/articles/popular",
    responses(
        (status = 200, description = "Up to 10 articles with the highest read counts", body = [Article])
    )
)]
pub async fn popular_articles(State(state): State<AppState>) -> Json<Vec<Article>> {
    let articles = state.store.articles().await;
    Json(search::popular_articles(&articles, POPULAR_LIMIT))
}

/// Other articles from the same column
#[utoipa::path(
    get,
    path = "/api/articles/{id}/related",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Up to 5 articles of the same column, most-read first", body = [Article]),
        (status = 400, description = "Id is not a number"),
        (status = 404, description = "No article with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn related_articles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Article>>, AppError> {
    let id = parse_id(&id)?;
    let articles = state.store.articles().await;
    let column = articles
        .iter()
        .find(|article| article.id == id)
        .map(|article| article.column.name.clone())
        .ok_or_else(|| AppError::NotFound("Article".to_string()))?;

    Ok(Json(search::related_articles(&articles, id, &column, RELATED_LIMIT)))
}

/// Column and title suggestions for a partial query
#[utoipa::path(
    get,
    path = "/api/search/suggestions",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to 8 suggestions; empty for queries shorter than 2 characters", body = [String])
    )
)]
pub async fn search_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<String>> {
    let articles = state.store.articles().await;
    Json(search::suggestions(&articles, &query.q))
}
