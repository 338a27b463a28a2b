#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use finresearch::config::Config;
use finresearch::generate::{generate_static_data, ALL_ARTICLES_FILE, INDIVIDUAL_DIR};
use finresearch::models::Article;
use serde_json::{json, Value};
use tempfile::TempDir;

static INIT: Once = Once::new();

// Initialize tracing for tests - only once
pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

fn article_json(
    id: i64,
    title: &str,
    brief: &str,
    column: (i64, &str),
    created_at: &str,
    read_num: Option<u64>,
) -> Value {
    let mut article = json!({
        "id": id,
        "top": 0,
        "featured": 0,
        "title": title,
        "brief": brief,
        "createdAt": created_at,
        "updatedAt": created_at,
        "deletedAt": null,
        "columnId": column.0,
        "column": {"id": column.0, "name": column.1},
    });
    if let Some(read_num) = read_num {
        article["full_content"] = json!({
            "id": id,
            "top": 0,
            "featured": 0,
            "title": title,
            "brief": brief,
            "content": format!("<p>{}</p>", brief),
            "createdAt": created_at,
            "updatedAt": created_at,
            "deletedAt": null,
            "column": {"id": column.0, "name": column.1},
            "articleStat": {"id": id, "readNum": read_num},
            "isSaved": false
        });
    }
    article
}

/// Raw dump in its original (unsorted) order.
///
/// Newest first this is 102, 104, 101, 105, 103.
pub fn raw_articles() -> Vec<Value> {
    vec![
        article_json(
            101,
            "化工行业周报：基础化工景气分析",
            "化工品价格回升",
            (1, "行业研究"),
            "2024-05-03T08:00:00.000Z",
            Some(500),
        ),
        article_json(
            102,
            "美联储议息会议点评",
            "利率维持不变，美元走弱",
            (2, "宏观研究"),
            "2024-05-05T08:00:00.000Z",
            Some(1200),
        ),
        article_json(
            103,
            "半导体行业深度分析",
            "AI 芯片需求旺盛",
            (1, "行业研究"),
            "2024-05-01T08:00:00.000Z",
            Some(800),
        ),
        article_json(
            104,
            "市场展望：二季度配置建议",
            "关注化工与消费",
            (3, "策略研究"),
            "2024-05-04T08:00:00.000Z",
            None,
        ),
        article_json(
            105,
            "晨会纪要",
            "",
            (4, "晨会"),
            "2024-05-02T08:00:00.000Z",
            Some(50),
        ),
    ]
}

pub fn fixture_articles() -> Vec<Article> {
    raw_articles()
        .into_iter()
        .map(|value| serde_json::from_value(value).expect("fixture article"))
        .collect()
}

pub fn ids(articles: &[Article]) -> Vec<i64> {
    articles.iter().map(|article| article.id).collect()
}

pub fn ids_of(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("json array")
        .iter()
        .map(|article| article["id"].as_i64().expect("article id"))
        .collect()
}

/// Writes the raw dump layout (`all_complete_articles.json` and `individual/`) into `dir`.
pub fn write_source(dir: &Path) {
    let individual = dir.join(INDIVIDUAL_DIR);
    fs::create_dir_all(&individual).unwrap();

    let articles = raw_articles();
    fs::write(
        dir.join(ALL_ARTICLES_FILE),
        serde_json::to_string_pretty(&articles).unwrap(),
    )
    .unwrap();

    for article in &articles {
        let id = article["id"].as_i64().unwrap();
        let name = format!("{}_{}.json", id, article["title"].as_str().unwrap().replace('：', "_"));
        fs::write(individual.join(name), serde_json::to_string(article).unwrap()).unwrap();
    }

    // Files the generator must skip
    fs::write(individual.join("notes.txt"), "not an article").unwrap();
    fs::write(individual.join("index.json"), "{}").unwrap();
}

/// A generated snapshot in a temporary directory
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        write_source(&source);
        generate_static_data(&source, &dir.path().join("data")).unwrap();
        Self { dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config(&self) -> Config {
        Config::for_data_dir(self.data_dir())
    }
}
