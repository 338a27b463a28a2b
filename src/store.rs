//! Read-only access to the static JSON snapshot.
//!
//! The snapshot is either a directory on disk or the same layout served over HTTP.
//! Every public read degrades to an empty list or `None` on failure after logging
//! the cause; callers never see store errors.

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::DataSource;
use crate::error::AppError;
use crate::models::{sort_by_created_desc, Article, CategorySummary, SearchIndexEntry};

pub const ARTICLES_FILE: &str = "articles.json";
pub const ARTICLES_DIR: &str = "articles";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const CATEGORIES_FILE: &str = "categories.json";

pub fn article_file(id: i64) -> String {
    format!("{}/{}.json", ARTICLES_DIR, id)
}

#[derive(Debug, Clone)]
pub struct ArticleStore {
    source: DataSource,
    client: Client,
}

impl ArticleStore {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            client: Client::new(),
        }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(DataSource::Disk(dir.into()))
    }

    /// All articles, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn articles(&self) -> Vec<Article> {
        match self.read_json::<Vec<Article>>(ARTICLES_FILE).await {
            Ok(mut articles) => {
                sort_by_created_desc(&mut articles);
                tracing::debug!("Loaded {} articles", articles.len());
                articles
            }
            Err(e) => {
                tracing::error!("Error reading articles: {}", e);
                Vec::new()
            }
        }
    }

    /// A single article with its full content, `None` when missing or unreadable.
    #[tracing::instrument(skip(self))]
    pub async fn article(&self, id: i64) -> Option<Article> {
        match self.read_json::<Article>(&article_file(id)).await {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::warn!("Error reading article {}: {}", id, e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_index(&self) -> Vec<SearchIndexEntry> {
        self.read_json(SEARCH_INDEX_FILE).await.unwrap_or_else(|e| {
            tracing::error!("Error reading search index: {}", e);
            Vec::new()
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn categories(&self) -> Vec<CategorySummary> {
        self.read_json(CATEGORIES_FILE).await.unwrap_or_else(|e| {
            tracing::error!("Error reading categories: {}", e);
            Vec::new()
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, AppError> {
        let bytes = match &self.source {
            DataSource::Disk(dir) => read_file(dir, relative).await?,
            DataSource::Http(base) => self.fetch(base, relative).await?,
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch(&self, base: &Url, relative: &str) -> Result<Vec<u8>, AppError> {
        let url = base
            .join(relative)
            .map_err(|e| AppError::StoreError(format!("invalid data url for {}: {}", relative, e)))?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(AppError::StoreError(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

async fn read_file(dir: &Path, relative: &str) -> Result<Vec<u8>, AppError> {
    let path = dir.join(relative);
    tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::StoreError(format!("{}: {}", path.display(), e)))
}
