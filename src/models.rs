use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Treats an explicit `null` like a missing key. Dumps carry `"brief": null`
/// and `"readNum": null` on some records.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Publisher-assigned column (topic label) of an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Column {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read_num: u64,
}

/// Full body of an article as stored in the per-article files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brief: String,
    /// HTML body of the report
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub column: Option<Column>,
    #[serde(default)]
    pub article_stat: Option<ArticleStat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_saved: bool,
}

/// A single research report record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brief: String,
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column_id: i64,
    pub column: Column,
    #[serde(rename = "full_content", default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<FullContent>,
}

impl Article {
    /// Read count from the embedded article stats, 0 when absent
    pub fn read_num(&self) -> u64 {
        self.full_content
            .as_ref()
            .and_then(|content| content.article_stat.as_ref())
            .map(|stat| stat.read_num)
            .unwrap_or(0)
    }

    /// Lowercased `title brief` text the keyword tables are matched against
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.brief).to_lowercase()
    }

    /// Parsed creation time; unparseable timestamps sort as the oldest
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Precomputed lowercase projection of an article used for search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub id: i64,
    pub title: String,
    pub brief: String,
    pub category: String,
    pub created_at: String,
}

impl From<&Article> for SearchIndexEntry {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.to_lowercase(),
            brief: article.brief.to_lowercase(),
            category: article.column.name.to_lowercase(),
            created_at: article.created_at.clone(),
        }
    }
}

/// Column with all of its articles, as stored in `categories.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub articles: Vec<Article>,
}

/// Sorts articles newest first. The sort is stable so equal timestamps keep input order.
pub fn sort_by_created_desc(articles: &mut [Article]) {
    articles.sort_by_key(|article| std::cmp::Reverse(article.created_at_utc()));
}

/// Parses the timestamp formats found in article dumps.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d"].iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
    })
}
