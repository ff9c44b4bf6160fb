//! In-process fixture of the Common Sense API.
//!
//! Serves `GET /v3/{platform}/{*path}` from a read-only `Catalog`. It checks
//! credentials, pages lists in id order and applies `fields` projection.
//! Failures come back as `{"statusCode": N, "error": "..."}` with the same
//! HTTP status, the way the hosted service reports them.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_APP_ID: &str = "test-app";

const PLATFORMS: [&str; 3] = ["global", "education", "media"];
const DEFAULT_LIMIT: usize = 10;
const DEFAULT_PAGE: usize = 1;

/// Settings for the standalone binary.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub port: u16,
    pub client_id: String,
    pub app_id: String,
}

impl MockConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        Self {
            port,
            client_id: std::env::var("MOCK_CLIENT_ID").unwrap_or_else(|_| TEST_CLIENT_ID.to_string()),
            app_id: std::env::var("MOCK_APP_ID").unwrap_or_else(|_| TEST_APP_ID.to_string()),
        }
    }
}

/// Records served by the fixture, keyed by collection and vocabulary name.
#[derive(Debug, Clone)]
pub struct Catalog {
    client_id: String,
    app_id: String,
    collections: BTreeMap<String, Vec<Value>>,
    vocabularies: BTreeMap<String, Vec<Value>>,
}

impl Catalog {
    pub fn new(client_id: &str, app_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            app_id: app_id.to_string(),
            collections: BTreeMap::new(),
            vocabularies: BTreeMap::new(),
        }
    }

    /// 20 products, 12 records of every other education type, user 1 and two
    /// vocabularies.
    pub fn seeded(client_id: &str, app_id: &str) -> Self {
        let mut catalog = Self::new(client_id, app_id);
        catalog.insert_collection("products", records("Product", "product", 20));
        catalog.insert_collection("blogs", records("Blog", "blog", 12));
        catalog.insert_collection("app_flows", records("App Flow", "app_flow", 12));
        catalog.insert_collection("lists", records("List", "list", 12));
        catalog.insert_collection("user_reviews", records("User Review", "user_review", 12));
        catalog.insert_collection("boards", records("Board", "board", 12));
        catalog.insert_collection(
            "users",
            vec![json!({
                "id": 1,
                "first_name": "testing",
                "last_name": "tester",
                "display_name": "testing t.",
                "status": 1,
                "created": 1_400_000_000,
            })],
        );
        catalog.insert_vocabulary("grades", terms(&["Pre-K", "K", "1", "2", "3", "4", "5"]));
        catalog.insert_vocabulary("subjects", terms(&["Math", "Science", "English", "Arts"]));
        catalog
    }

    /// Records are served sorted by `id`.
    pub fn insert_collection(&mut self, name: &str, mut records: Vec<Value>) {
        records.sort_by_key(|record| record["id"].as_u64().unwrap_or(u64::MAX));
        self.collections.insert(name.to_string(), records);
    }

    pub fn insert_vocabulary(&mut self, name: &str, terms: Vec<Value>) {
        self.vocabularies.insert(name.to_string(), terms);
    }

    fn authorized(&self, query: &ApiQuery) -> bool {
        query.client_id.as_deref() == Some(self.client_id.as_str())
            && query.app_id.as_deref() == Some(self.app_id.as_str())
    }
}

fn records(label: &str, kind: &str, count: u64) -> Vec<Value> {
    (1..=count)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("{label} #{id}"),
                "type": kind,
                "status": 1,
                "created": 1_400_000_000 + id * 86_400,
            })
        })
        .collect()
}

fn terms(names: &[&str]) -> Vec<Value> {
    names
        .iter()
        .zip(1u64..)
        .map(|(name, id)| json!({ "id": id, "name": name }))
        .collect()
}

pub type Db = Arc<Catalog>;

/// Query parameters the service understands. Anything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuery {
    pub client_id: Option<String>,
    pub app_id: Option<String>,
    pub fields: Option<String>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

impl ApiQuery {
    fn fields(&self) -> Vec<&str> {
        self.fields
            .as_deref()
            .map(|fields| fields.split(',').filter(|f| !f.is_empty()).collect())
            .unwrap_or_default()
    }

    fn window(&self) -> (usize, usize) {
        let limit = self.limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT);
        let page = self.page.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE);
        ((page - 1).saturating_mul(limit), limit)
    }
}

type ApiResponse = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with(Catalog::seeded(TEST_CLIENT_ID, TEST_APP_ID))
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/v3/{platform}/{*path}", get(dispatch))
        .fallback(fallback)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog)).await
}

async fn dispatch(
    State(db): State<Db>,
    Path((platform, path)): Path<(String, String)>,
    Query(query): Query<ApiQuery>,
) -> ApiResponse {
    tracing::debug!(%platform, %path, limit = ?query.limit, page = ?query.page, "request");

    if !db.authorized(&query) {
        return error(StatusCode::UNAUTHORIZED);
    }
    if !PLATFORMS.contains(&platform.as_str()) {
        return error(StatusCode::NOT_FOUND);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["terms", vocabulary] => match db.vocabularies.get(*vocabulary) {
            Some(terms) => list(terms.iter(), &query),
            None => error(StatusCode::NOT_FOUND),
        },
        ["search", collection, text] => match db.collections.get(*collection) {
            Some(records) => {
                let needle = text.to_lowercase();
                let hits = records.iter().filter(|record| {
                    record["title"]
                        .as_str()
                        .is_some_and(|title| title.to_lowercase().contains(&needle))
                });
                list(hits, &query)
            }
            None => error(StatusCode::NOT_FOUND),
        },
        [collection] => match db.collections.get(*collection) {
            Some(records) => list(records.iter(), &query),
            None => error(StatusCode::NOT_FOUND),
        },
        [collection, id] => {
            let record = db.collections.get(*collection).and_then(|records| {
                let id: u64 = id.parse().ok()?;
                records.iter().find(|record| record["id"].as_u64() == Some(id))
            });
            match record {
                Some(record) => (
                    StatusCode::OK,
                    Json(json!({
                        "statusCode": 200,
                        "response": project(record, &query.fields()),
                    })),
                ),
                None => error(StatusCode::NOT_FOUND),
            }
        }
        _ => error(StatusCode::NOT_FOUND),
    }
}

async fn fallback() -> ApiResponse {
    error(StatusCode::NOT_FOUND)
}

fn list<'a>(records: impl Iterator<Item = &'a Value>, query: &ApiQuery) -> ApiResponse {
    let records: Vec<&Value> = records.collect();
    let (offset, limit) = query.window();
    let fields = query.fields();
    let page: Vec<Value> = records
        .iter()
        .skip(offset)
        .take(limit)
        .map(|record| project(record, &fields))
        .collect();
    (
        StatusCode::OK,
        Json(json!({
            "statusCode": 200,
            "count": records.len(),
            "response": page,
        })),
    )
}

/// Keep only the requested keys. An empty field list keeps everything.
pub fn project(record: &Value, fields: &[&str]) -> Value {
    match record {
        Value::Object(map) if !fields.is_empty() => {
            let kept: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| fields.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Value::Object(kept)
        }
        _ => record.clone(),
    }
}

fn error(status: StatusCode) -> ApiResponse {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
        })),
    )
}
