//! Builds the static JSON snapshot served by the API from a raw article dump.
//!
//! Input layout:
//!   <source>/all_complete_articles.json
//!   <source>/individual/<id>_<anything>.json
//!
//! Output layout (see [`crate::store`]):
//!   <out>/articles.json, <out>/articles/<id>.json, <out>/search-index.json,
//!   <out>/categories.json

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{sort_by_created_desc, Article, CategorySummary, SearchIndexEntry};
use crate::store::{ARTICLES_DIR, ARTICLES_FILE, CATEGORIES_FILE, SEARCH_INDEX_FILE};

pub const ALL_ARTICLES_FILE: &str = "all_complete_articles.json";
pub const INDIVIDUAL_DIR: &str = "individual";

static INDIVIDUAL_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)_").expect("valid regex literal"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateReport {
    pub articles: usize,
    pub individual_files: usize,
    pub categories: usize,
}

/// Extracts the article id from an individual file name like `123_title.json`.
pub fn individual_file_id(file_name: &str) -> Option<&str> {
    if !file_name.ends_with(".json") {
        return None;
    }
    INDIVIDUAL_FILE_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// One summary per distinct column, in first-seen order of the newest-first list.
pub fn build_categories(sorted: &[Article]) -> Vec<CategorySummary> {
    let mut names: Vec<&str> = Vec::new();
    for article in sorted {
        if !names.contains(&article.column.name.as_str()) {
            names.push(&article.column.name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let articles: Vec<Article> = sorted
                .iter()
                .filter(|article| article.column.name == name)
                .cloned()
                .collect();
            CategorySummary {
                name: name.to_string(),
                count: articles.len(),
                articles,
            }
        })
        .collect()
}

pub fn build_search_index(sorted: &[Article]) -> Vec<SearchIndexEntry> {
    sorted.iter().map(SearchIndexEntry::from).collect()
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Generates the full snapshot from `source` into `out`, creating directories as needed.
pub fn generate_static_data(source: &Path, out: &Path) -> Result<GenerateReport> {
    let articles_dir = out.join(ARTICLES_DIR);
    fs::create_dir_all(&articles_dir)
        .with_context(|| format!("creating {}", articles_dir.display()))?;

    let all_path = source.join(ALL_ARTICLES_FILE);
    let raw = fs::read_to_string(&all_path)
        .with_context(|| format!("reading {}", all_path.display()))?;
    let articles: Vec<Article> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", all_path.display()))?;

    let mut sorted = articles.clone();
    sort_by_created_desc(&mut sorted);

    write_pretty(&out.join(ARTICLES_FILE), &sorted)?;
    tracing::info!("Generated article list: {} articles", sorted.len());

    let individual_dir = source.join(INDIVIDUAL_DIR);
    let mut individual_files = 0;
    let entries = fs::read_dir(&individual_dir)
        .with_context(|| format!("listing {}", individual_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", individual_dir.display()))?;
        let file_name = entry.file_name();
        let Some(id) = file_name.to_str().and_then(individual_file_id) else {
            tracing::debug!("Skipping {:?}", file_name);
            continue;
        };
        let target = articles_dir.join(format!("{}.json", id));
        fs::copy(entry.path(), &target)
            .with_context(|| format!("copying {} to {}", entry.path().display(), target.display()))?;
        individual_files += 1;
    }
    tracing::info!("Generated article files: {}", individual_files);

    write_pretty(&out.join(SEARCH_INDEX_FILE), &build_search_index(&sorted))?;
    tracing::info!("Generated search index");

    let categories = build_categories(&sorted);
    write_pretty(&out.join(CATEGORIES_FILE), &categories)?;
    tracing::info!("Generated category data: {} categories", categories.len());

    Ok(GenerateReport {
        articles: sorted.len(),
        individual_files,
        categories: categories.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individual_file_names() {
        assert_eq!(individual_file_id("123_化工周报.json"), Some("123"));
        assert_eq!(individual_file_id("7_.json"), Some("7"));
        assert_eq!(individual_file_id("abc_123.json"), None);
        assert_eq!(individual_file_id("123.json"), None);
        assert_eq!(individual_file_id("123_notes.txt"), None);
    }
}
