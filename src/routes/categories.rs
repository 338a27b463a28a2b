use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::classify::{self, Bucket, KeywordCount, INDUSTRY_CATEGORIES, OTHER};
use crate::error::AppError;
use crate::models::{Article, CategorySummary};
use crate::search::{self, ColumnCount};
use crate::AppState;

const DEFAULT_INDUSTRY_LIMIT: usize = 5;
const MACRO_LATEST_LIMIT: usize = 6;
const STRATEGY_HIGHLIGHT_LIMIT: usize = 4;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndustryQuery {
    /// Number of latest and popular articles to return (default: 5)
    #[serde(default = "default_industry_limit")]
    #[param(required = false)]
    limit: usize,
}

fn default_industry_limit() -> usize {
    DEFAULT_INDUSTRY_LIMIT
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndustryOverview {
    /// Industry name, or 其他 for unmatched articles
    pub name: String,
    pub count: usize,
    /// Total reads across the industry's articles
    pub read_num: u64,
    /// Most recent articles of the industry
    pub latest: Vec<Article>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndustryDetail {
    pub name: String,
    pub count: usize,
    pub read_num: u64,
    pub latest: Vec<Article>,
    /// Most-read articles with a non-zero read count
    pub popular: Vec<Article>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MacroEconomyResponse {
    /// Articles mentioning any macro-economy keyword, newest first
    pub articles: Vec<Article>,
    pub latest: Vec<Article>,
    /// Up to 10 keywords ranked by number of articles mentioning them
    pub keyword_stats: Vec<KeywordCount>,
    pub total_read_num: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStrategyResponse {
    /// Articles mentioning any investment-strategy keyword, newest first
    pub articles: Vec<Article>,
    pub latest: Vec<Article>,
    /// Most-read strategy articles with a non-zero read count
    pub popular: Vec<Article>,
    /// Report-type buckets that contain at least one article
    pub buckets: Vec<Bucket>,
    pub total_read_num: u64,
}

/// Columns with their articles, as published in categories.json
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "One entry per column", body = [CategorySummary])
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    Json(state.store.categories().await)
}

/// Article counts per column
#[utoipa::path(
    get,
    path = "/api/columns",
    responses(
        (status = 200, description = "Column names with article counts, in first-seen order", body = [ColumnCount])
    )
)]
pub async fn column_stats(State(state): State<AppState>) -> Json<Vec<ColumnCount>> {
    let articles = state.store.articles().await;
    Json(search::column_stats(&articles))
}

/// Articles bucketed by industry keywords
#[utoipa::path(
    get,
    path = "/api/industries",
    responses(
        (status = 200, description = "Every industry in fixed order with 其他 last", body = [IndustryOverview])
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_industries(State(state): State<AppState>) -> Json<Vec<IndustryOverview>> {
    let articles = state.store.articles().await;
    let overview = classify::categorize_by_industry(&articles)
        .into_iter()
        .map(|bucket| IndustryOverview {
            count: bucket.articles.len(),
            read_num: bucket.articles.iter().map(Article::read_num).sum(),
            latest: bucket
                .articles
                .into_iter()
                .take(DEFAULT_INDUSTRY_LIMIT)
                .collect(),
            name: bucket.name,
        })
        .collect();
    Json(overview)
}

/// Latest and most-read articles of one industry
#[utoipa::path(
    get,
    path = "/api/industries/{name}",
    params(
        ("name" = String, Path, description = "Industry name, e.g. 化工, or 其他"),
        IndustryQuery
    ),
    responses(
        (status = 200, description = "Industry found", body = IndustryDetail),
        (status = 404, description = "Unknown industry")
    )
)]
#[tracing::instrument(skip(state, query))]
pub async fn get_industry(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<IndustryQuery>,
) -> Result<Json<IndustryDetail>, AppError> {
    if name != OTHER && !INDUSTRY_CATEGORIES.iter().any(|(industry, _)| *industry == name) {
        return Err(AppError::NotFound(format!("Industry {}", name)));
    }

    let articles = state.store.articles().await;
    let stats = classify::industry_stats(&articles)
        .into_iter()
        .find(|(industry, _)| *industry == name)
        .map(|(_, stats)| stats)
        .unwrap_or_default();

    Ok(Json(IndustryDetail {
        count: stats.count,
        read_num: stats.read_num,
        latest: classify::latest_industry_articles(&articles, &name, query.limit),
        popular: classify::popular_industry_articles(&articles, &name, query.limit),
        name,
    }))
}

/// Macro-economy articles and keyword frequencies
#[utoipa::path(
    get,
    path = "/api/macro-economy",
    responses(
        (status = 200, description = "Macro-economy overview", body = MacroEconomyResponse)
    )
)]
pub async fn macro_economy(State(state): State<AppState>) -> Json<MacroEconomyResponse> {
    let articles = state.store.articles().await;
    let macro_articles = classify::macro_economy_articles(&articles);

    Json(MacroEconomyResponse {
        keyword_stats: classify::macro_keyword_stats(&macro_articles),
        total_read_num: macro_articles.iter().map(Article::read_num).sum(),
        latest: macro_articles.iter().take(MACRO_LATEST_LIMIT).cloned().collect(),
        articles: macro_articles,
    })
}

/// Investment-strategy articles grouped by report type
#[utoipa::path(
    get,
    path = "/api/investment-strategy",
    responses(
        (status = 200, description = "Investment-strategy overview", body = InvestmentStrategyResponse)
    )
)]
pub async fn investment_strategy(State(state): State<AppState>) -> Json<InvestmentStrategyResponse> {
    let articles = state.store.articles().await;
    let buckets = classify::strategy_buckets(&articles)
        .into_iter()
        .filter(|bucket| !bucket.articles.is_empty())
        .collect();

    let strategy_articles = classify::investment_strategy_articles(&articles);

    Json(InvestmentStrategyResponse {
        latest: strategy_articles.iter().take(STRATEGY_HIGHLIGHT_LIMIT).cloned().collect(),
        popular: search::popular_articles(&strategy_articles, STRATEGY_HIGHLIGHT_LIMIT),
        total_read_num: strategy_articles.iter().map(Article::read_num).sum(),
        articles: strategy_articles,
        buckets,
    })
}
