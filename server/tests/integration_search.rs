use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use fts_core::dump::load_path;
use fts_core::Document;
use fts_server::{build_app, build_state};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn tiny_corpus() -> Vec<Document> {
    vec![
        Document::new(0, "the quick brown fox jumps over the lazy dog").with_title("Fox"),
        Document::new(1, "the man went to the store to get a dog").with_title("Man").with_url("https://example.com/man"),
        Document::new(2, "lion is the king of the jungle").with_title("Lion"),
    ]
}

fn app() -> Router {
    build_app(build_state(tiny_corpus(), Some("secret".into())).unwrap())
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn batch(token: Option<&str>, docs: &Value) -> Request<Body> {
    let mut req = Request::post("/index/batch").header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("X-ADMIN-TOKEN", t);
    }
    req.body(Body::from(docs.to_string())).unwrap()
}

fn hit_ids(json: &Value) -> Vec<u64> {
    json["results"].as_array().unwrap().iter().map(|h| h["doc_id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn search_returns_ascending_matches() {
    let (status, body) = get(app(), "/search?q=dog").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["matched"], true);
    assert_eq!(json["total_hits"], 2);
    assert_eq!(hit_ids(&json), vec![0, 1]);
    assert_eq!(json["results"][1]["url"], "https://example.com/man");
    assert!(json["results"][0]["snippet"].as_str().unwrap().contains("<em>dog</em>"));
}

#[tokio::test]
async fn search_limits_results_but_reports_total() {
    let (_, body) = get(app(), "/search?q=dog&k=1").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(hit_ids(&json), vec![0]);
}

#[tokio::test]
async fn unknown_term_is_unmatched() {
    let (status, body) = get(app(), "/search?q=dog%20elephant").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["matched"], false);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn empty_intersection_is_matched_but_empty() {
    let (_, body) = get(app(), "/search?q=fox%20lion").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["matched"], true);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn doc_lookup() {
    let (status, body) = get(app(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "Lion");

    let (status, _) = get(app(), "/doc/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_requires_token() {
    let docs = serde_json::json!([{ "id": 3, "text": "elephant" }]);
    let (status, _) = call(app(), batch(None, &docs)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(app(), batch(Some("wrong"), &docs)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_appends_and_rejects_out_of_order() {
    let app = app();
    let docs = serde_json::json!([{ "id": 3, "text": "an elephant met a dog", "title": "Elephant" }]);
    let (status, body) = call(app.clone(), batch(Some("secret"), &docs)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["added"], 1);
    assert_eq!(json["last_doc_id"], 3);

    let (_, body) = get(app.clone(), "/search?q=dog").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(hit_ids(&json), vec![0, 1, 3]);

    let stale = serde_json::json!([{ "id": 1, "text": "zebra" }]);
    let (status, _) = call(app.clone(), batch(Some("secret"), &stale)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, body) = get(app, "/search?q=zebra").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["matched"], false);
}

#[tokio::test]
async fn serves_documents_loaded_from_dump() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("abstract.xml"),
        "<feed><doc><title>Wikipedia: Wildcat</title><url>https://en.wikipedia.org/wiki/Wildcat</url>\
         <abstract>The wildcat is a small wild cat species.</abstract></doc></feed>",
    )
    .unwrap();
    let docs = load_path(dir.path()).unwrap();
    let app = build_app(build_state(docs, None).unwrap());

    let (_, body) = get(app, "/search?q=Small%20wild%20cat").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(hit_ids(&json), vec![0]);
    assert_eq!(json["results"][0]["title"], "Wikipedia: Wildcat");
}
