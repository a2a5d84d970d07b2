use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use fts_core::{DocId, Document, InvertedIndex, SearchOutcome, SharedIndex};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SNIPPET_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// False when a query term is not indexed or the query has no terms.
    pub matched: bool,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SharedIndex>,
    pub docs: Arc<RwLock<HashMap<DocId, Document>>>,
    pub admin_token: Option<String>,
}

/// Index `documents` (ids must be strictly ascending) and keep them for presentation.
pub fn build_state(documents: Vec<Document>, admin_token: Option<String>) -> Result<AppState> {
    let mut index = InvertedIndex::new();
    index.add_checked(&documents)?;
    let docs = documents.into_iter().map(|d| (d.id, d)).collect();
    Ok(AppState { index: Arc::new(index.into()), docs: Arc::new(RwLock::new(docs)), admin_token })
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/batch", post(index_batch))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let outcome = state.index.search(&params.q);
    let matched = !outcome.is_no_match();
    if let SearchOutcome::NoMatch(reason) = &outcome {
        tracing::debug!(query = %params.q, ?reason, "no match");
    }

    let total_hits = outcome.len();
    let k = params.k.clamp(1, 100);
    // Raw query words, used for highlighting only
    let raw_terms: Vec<String> = params
        .q
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    let docs = state.docs.read();
    let results = outcome
        .doc_ids()
        .iter()
        .take(k)
        .filter_map(|doc_id| docs.get(doc_id))
        .map(|doc| SearchHit {
            doc_id: doc.id,
            title: doc.title.clone(),
            url: doc.url.clone(),
            snippet: snippet(&doc.text, &raw_terms),
        })
        .collect();

    Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), matched, total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let docs = state.docs.read();
    let doc = docs.get(&doc_id).ok_or((StatusCode::NOT_FOUND, format!("document {doc_id} not found")))?;
    Ok(Json(serde_json::json!({
        "doc_id": doc.id,
        "title": doc.title,
        "url": doc.url,
        "text": doc.text,
    })))
}

async fn index_batch(State(state): State<AppState>, headers: HeaderMap, Json(batch): Json<Vec<Document>>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    // Held across the index write so /doc never lags behind /search.
    let mut docs = state.docs.write();
    state.index.add_checked(&batch).map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;
    let added = batch.len();
    docs.extend(batch.into_iter().map(|d| (d.id, d)));
    drop(docs);

    let stats = state.index.stats();
    tracing::info!(added, num_terms = stats.num_terms, "indexed batch");
    Ok(Json(serde_json::json!({
        "added": added,
        "num_documents": stats.num_documents,
        "num_terms": stats.num_terms,
        "last_doc_id": stats.last_doc_id,
    })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

/// Window of `text` around the first raw query word, or its opening characters.
fn snippet(text: &str, raw_terms: &[String]) -> Option<String> {
    if text.is_empty() { return None; }
    let first_idx = raw_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .find_map(|t| case_insensitive(t).and_then(|re| re.find(text)).map(|m| m.start()));
    let snippet = match first_idx {
        Some(idx) => {
            let start = floor_char_boundary(text, idx.saturating_sub(SNIPPET_CHARS / 2));
            let end = floor_char_boundary(text, (idx + SNIPPET_CHARS).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(SNIPPET_CHARS).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

fn case_insensitive(term: &str) -> Option<regex::Regex> {
    regex::RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let alternatives: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if alternatives.is_empty() {
        return snippet.to_string();
    }
    match case_insensitive_alternation(&alternatives) {
        Some(pat) => pat.replace_all(snippet, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).into_owned(),
        None => snippet.to_string(),
    }
}

fn case_insensitive_alternation(escaped: &[String]) -> Option<regex::Regex> {
    regex::RegexBuilder::new(&escaped.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}
