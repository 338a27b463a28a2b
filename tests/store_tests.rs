mod common;

use std::fs;
use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use finresearch::config::DataSource;
use finresearch::store::ArticleStore;
use url::Url;

use common::{ids, Fixture};

// Serves a snapshot directory over HTTP, like a static file host would
async fn serve_file(State(root): State<PathBuf>, Path(path): Path<String>) -> Result<Vec<u8>, StatusCode> {
    fs::read(root.join(path)).map_err(|_| StatusCode::NOT_FOUND)
}

async fn spawn_static_host(root: PathBuf) -> (Url, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/data/{*path}", get(serve_file))
        .with_state(root);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = Url::parse(&format!("http://{}/data/", addr)).unwrap();
    (base, handle)
}

#[tokio::test]
async fn test_http_store_reads_snapshot() {
    let fixture = Fixture::new();
    let (base, server) = spawn_static_host(fixture.data_dir()).await;
    let store = ArticleStore::new(DataSource::Http(base));

    assert_eq!(ids(&store.articles().await), vec![102, 104, 101, 105, 103]);
    assert_eq!(store.search_index().await.len(), 5);
    assert_eq!(store.article(101).await.map(|a| a.id), Some(101));
    assert!(store.article(999).await.is_none());

    server.abort();
}

#[tokio::test]
async fn test_http_store_unreachable_degrades_to_empty() {
    common::setup();
    // Bind and drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{}/data/", addr)).unwrap();
    let store = ArticleStore::new(DataSource::Http(base));
    assert!(store.articles().await.is_empty());
    assert!(store.categories().await.is_empty());
    assert!(store.article(1).await.is_none());
}

#[tokio::test]
async fn test_corrupt_files_degrade_to_empty() {
    let fixture = Fixture::new();
    let data = fixture.data_dir();
    fs::write(data.join("articles.json"), "[{\"id\": 1,").unwrap();
    fs::write(data.join("search-index.json"), "not json").unwrap();
    fs::write(data.join("articles").join("101.json"), "{}").unwrap();

    let store = ArticleStore::from_dir(&data);
    assert!(store.articles().await.is_empty());
    assert!(store.search_index().await.is_empty());
    assert!(store.article(101).await.is_none());
    // Untouched files still load
    assert_eq!(store.categories().await.len(), 4);
    assert!(store.article(102).await.is_some());
}

#[tokio::test]
async fn test_null_fields_do_not_drop_the_list() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let articles = serde_json::json!([
        {
            "id": 1, "title": "化工周报", "brief": null,
            "createdAt": "2024-05-01T08:00:00Z",
            "column": {"id": 1, "name": "行业研究"},
            "full_content": {"articleStat": {"id": 1, "readNum": null}}
        },
        {
            "id": 2, "title": "宏观点评", "brief": "利率",
            "createdAt": "2024-05-02T08:00:00Z",
            "column": {"id": 2, "name": "宏观研究"}
        }
    ]);
    fs::write(dir.path().join("articles.json"), articles.to_string()).unwrap();

    let loaded = ArticleStore::from_dir(dir.path()).articles().await;
    assert_eq!(ids(&loaded), vec![2, 1]);
    assert_eq!(loaded[1].brief, "");
    assert_eq!(loaded[1].read_num(), 0);
}
