//! Keyword search and ranking over an in-memory article snapshot.
//!
//! A query is lowercased and split on whitespace. An article matches when every
//! token occurs in its title, brief or column name. Matches are ranked by a
//! weighted hit count: 3 per token found in the title, 2 in the brief, 1 in the
//! column name.

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{sort_by_created_desc, Article, SearchIndexEntry};

pub const TITLE_WEIGHT: u32 = 3;
pub const BRIEF_WEIGHT: u32 = 2;
pub const CATEGORY_WEIGHT: u32 = 1;

const MIN_SUGGESTION_QUERY_CHARS: usize = 2;
const MAX_SUGGESTIONS: usize = 8;

/// Lowercased search fields of one article
#[derive(Debug, Clone, Copy)]
struct Fields<'a> {
    title: &'a str,
    brief: &'a str,
    category: &'a str,
}

impl Fields<'_> {
    fn contains(&self, token: &str) -> bool {
        self.title.contains(token) || self.brief.contains(token) || self.category.contains(token)
    }

    fn score(&self, tokens: &[String]) -> u32 {
        tokens
            .iter()
            .map(|token| {
                let mut score = 0;
                if self.title.contains(token.as_str()) {
                    score += TITLE_WEIGHT;
                }
                if self.brief.contains(token.as_str()) {
                    score += BRIEF_WEIGHT;
                }
                if self.category.contains(token.as_str()) {
                    score += CATEGORY_WEIGHT;
                }
                score
            })
            .sum()
    }
}

struct Lowered {
    title: String,
    brief: String,
    category: String,
}

impl Lowered {
    fn of(article: &Article) -> Self {
        Self {
            title: article.title.to_lowercase(),
            brief: article.brief.to_lowercase(),
            category: article.column.name.to_lowercase(),
        }
    }

    fn fields(&self) -> Fields<'_> {
        Fields {
            title: &self.title,
            brief: &self.brief,
            category: &self.category,
        }
    }
}

/// Lowercases and splits a query into whitespace-separated tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// True when every token occurs in at least one of the article's fields.
pub fn matches_all(article: &Article, tokens: &[String]) -> bool {
    let lowered = Lowered::of(article);
    let fields = lowered.fields();
    tokens.iter().all(|token| fields.contains(token))
}

pub fn relevance_score(article: &Article, tokens: &[String]) -> u32 {
    Lowered::of(article).fields().score(tokens)
}

fn rank(candidates: Vec<Article>, tokens: &[String]) -> Vec<Article> {
    let mut scored: Vec<(u32, Article)> = candidates
        .into_iter()
        .map(|article| (relevance_score(&article, tokens), article))
        .collect();
    // sort_by is stable; equal scores keep their incoming order.
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, article)| article).collect()
}

/// Searches `articles` for `query`.
///
/// A blank query returns every article, newest first.
pub fn search(articles: &[Article], query: &str) -> Vec<Article> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        let mut all = articles.to_vec();
        sort_by_created_desc(&mut all);
        return all;
    }

    let candidates = articles
        .iter()
        .filter(|article| matches_all(article, &tokens))
        .cloned()
        .collect();
    rank(candidates, &tokens)
}

/// Searches using a precomputed index for membership and the full articles for ranking.
///
/// Articles keep the order of `articles` before ranking, so the result matches
/// [`search`] whenever the index is the projection of `articles`.
pub fn search_with_index(articles: &[Article], index: &[SearchIndexEntry], query: &str) -> Vec<Article> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        let mut all = articles.to_vec();
        sort_by_created_desc(&mut all);
        return all;
    }

    let matching: HashSet<i64> = index
        .iter()
        .filter(|entry| {
            let fields = Fields {
                title: &entry.title,
                brief: &entry.brief,
                category: &entry.category,
            };
            tokens.iter().all(|token| fields.contains(token))
        })
        .map(|entry| entry.id)
        .collect();

    let candidates = articles
        .iter()
        .filter(|article| matching.contains(&article.id))
        .cloned()
        .collect();
    rank(candidates, &tokens)
}

/// Column names and titles containing `query`, columns first, at most eight.
pub fn suggestions(articles: &[Article], query: &str) -> Vec<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
        return Vec::new();
    }
    let needle = trimmed.to_lowercase();

    let mut seen: HashSet<String> = HashSet::new();
    let columns = articles.iter().map(|article| &article.column.name);
    let titles = articles.iter().map(|article| &article.title);

    columns
        .chain(titles)
        .filter(|text| text.to_lowercase().contains(&needle))
        .filter(|text| seen.insert(text.to_string()))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

fn by_read_num_desc(mut articles: Vec<Article>, limit: usize) -> Vec<Article> {
    articles.sort_by(|a, b| b.read_num().cmp(&a.read_num()));
    articles.truncate(limit);
    articles
}

/// Most-read articles; articles without a read count are skipped.
pub fn popular_articles(articles: &[Article], limit: usize) -> Vec<Article> {
    let read: Vec<Article> = articles
        .iter()
        .filter(|article| article.read_num() > 0)
        .cloned()
        .collect();
    by_read_num_desc(read, limit)
}

/// Other articles of the same column, most-read first.
pub fn related_articles(articles: &[Article], id: i64, column: &str, limit: usize) -> Vec<Article> {
    let related: Vec<Article> = articles
        .iter()
        .filter(|article| article.column.name == column && article.id != id)
        .cloned()
        .collect();
    by_read_num_desc(related, limit)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ColumnCount {
    pub name: String,
    pub count: usize,
}

/// Article count per column name, in first-seen order.
pub fn column_stats(articles: &[Article]) -> Vec<ColumnCount> {
    let mut stats: Vec<ColumnCount> = Vec::new();
    for article in articles {
        match stats.iter_mut().find(|entry| entry.name == article.column.name) {
            Some(entry) => entry.count += 1,
            None => stats.push(ColumnCount {
                name: article.column.name.clone(),
                count: 1,
            }),
        }
    }
    stats
}
