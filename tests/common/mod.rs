// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fakes of the token service and the Strava API.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_sync::config::Config;
use strava_sync::db::Database;
use strava_sync::services::{BrokerClient, CredentialManager, StravaClient, SyncService};

pub const ATHLETE_ID: i64 = 12345;

/// Bind an ephemeral local port and serve `router` on it.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
#[allow(dead_code)]
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ─── Token service ───────────────────────────────────────────────────────────

/// How the fake token service answers.
#[derive(Clone)]
#[allow(dead_code)]
pub enum BrokerReply {
    /// 200 with a new numbered token pair each call
    Fresh,
    /// Fixed status and body
    Fixed(StatusCode, Value),
    /// Answer `Fresh` after sleeping
    Slow(Duration),
}

pub struct FakeBroker {
    pub reply: BrokerReply,
    pub refresh_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub received: Mutex<Vec<Value>>,
}

impl FakeBroker {
    #[allow(dead_code)]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
pub async fn spawn_broker(reply: BrokerReply) -> (String, Arc<FakeBroker>) {
    let state = Arc::new(FakeBroker {
        reply,
        refresh_calls: AtomicUsize::new(0),
        exchange_calls: AtomicUsize::new(0),
        received: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/refresh-token", post(refresh_token))
        .route("/exchange-token", post(exchange_token))
        .with_state(state.clone());

    (serve(router).await, state)
}

async fn refresh_token(
    State(state): State<Arc<FakeBroker>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    state.received.lock().unwrap().push(body);
    broker_answer(&state.reply, n, None).await
}

async fn exchange_token(
    State(state): State<Arc<FakeBroker>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = state.exchange_calls.fetch_add(1, Ordering::SeqCst) + 1;
    state.received.lock().unwrap().push(body);
    let athlete = json!({ "id": ATHLETE_ID, "firstname": "Test" });
    broker_answer(&state.reply, n, Some(athlete)).await
}

async fn broker_answer(
    reply: &BrokerReply,
    n: usize,
    athlete: Option<Value>,
) -> (StatusCode, Json<Value>) {
    match reply {
        BrokerReply::Fixed(status, body) => (*status, Json(body.clone())),
        BrokerReply::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            (StatusCode::OK, Json(fresh_tokens(n, athlete)))
        }
        BrokerReply::Fresh => (StatusCode::OK, Json(fresh_tokens(n, athlete))),
    }
}

fn fresh_tokens(n: usize, athlete: Option<Value>) -> Value {
    let mut body = json!({
        "access_token": format!("access_{}", n),
        "refresh_token": format!("refresh_{}", n),
        "expires_at": chrono::Utc::now().timestamp() + 21600,
    });
    if let Some(athlete) = athlete {
        body["athlete"] = athlete;
    }
    body
}

// ─── Strava API ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStrava {
    /// Sizes of pages 1, 2, ...; later pages are empty
    pub page_sizes: Vec<usize>,
    /// Answer 500 for this page number
    pub failing_page: Option<u32>,
    /// Answer 500 for athlete stats
    pub stats_fail: bool,
    pub list_requests: AtomicUsize,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl FakeStrava {
    #[allow(dead_code)]
    pub fn with_pages(page_sizes: Vec<usize>) -> Self {
        Self {
            page_sizes,
            ..Default::default()
        }
    }

    #[allow(dead_code)]
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    /// Record the bearer token; `None` means the request is unauthorized.
    fn authorize(&self, headers: &HeaderMap) -> Option<()> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .to_string();
        self.tokens_seen.lock().unwrap().push(token);
        Some(())
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    per_page: u32,
}

#[allow(dead_code)]
pub async fn spawn_strava(fake: FakeStrava) -> (String, Arc<FakeStrava>) {
    let state = Arc::new(fake);

    let router = Router::new()
        .route("/athlete", get(athlete))
        .route("/athletes/{id}/stats", get(athlete_stats))
        .route("/athlete/activities", get(list_activities))
        .route("/activities/{id}", get(activity_detail))
        .with_state(state.clone());

    (serve(router).await, state)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Authorization Error" })),
    )
}

async fn athlete(
    State(state): State<Arc<FakeStrava>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if state.authorize(&headers).is_none() {
        return unauthorized();
    }
    (StatusCode::OK, Json(athlete_json()))
}

async fn athlete_stats(
    State(state): State<Arc<FakeStrava>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if state.authorize(&headers).is_none() {
        return unauthorized();
    }
    if state.stats_fail || id != ATHLETE_ID {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "stats unavailable" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "biggest_ride_distance": 160934.4,
            "biggest_climb_elevation_gain": 1432.0,
            "all_ride_totals": { "count": 42 }
        })),
    )
}

async fn list_activities(
    State(state): State<Arc<FakeStrava>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.list_requests.fetch_add(1, Ordering::SeqCst);
    if state.authorize(&headers).is_none() {
        return unauthorized();
    }
    if state.failing_page == Some(query.page) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "upstream exploded" })),
        );
    }

    let size = state
        .page_sizes
        .get(query.page as usize - 1)
        .copied()
        .unwrap_or(0);
    let first = i64::from((query.page - 1) * query.per_page) + 1;
    let page: Vec<Value> = (first..first + size as i64)
        .map(|id| activity_json(id, &format!("Activity {}", id)))
        .collect();
    (StatusCode::OK, Json(Value::Array(page)))
}

async fn activity_detail(
    State(state): State<Arc<FakeStrava>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if state.authorize(&headers).is_none() {
        return unauthorized();
    }
    let mut detail = activity_json(id, &format!("Detailed {}", id));
    detail["description"] = json!("Full detail payload");
    detail["kudos_count"] = json!(99);
    (StatusCode::OK, Json(detail))
}

pub fn athlete_json() -> Value {
    json!({
        "id": ATHLETE_ID,
        "firstname": "Test",
        "lastname": "Athlete",
        "city": "Palo Alto",
        "country": "United States",
        "weight": 70.0,
        "bikes": [
            { "id": "b100", "name": "Road Bike", "distance": 12000.0 },
            { "id": "b200", "name": "Gravel Bike", "distance": 3400.0 }
        ],
        "shoes": [
            { "id": "g300", "name": "Trail Shoes", "brand_name": "Hoka" }
        ]
    })
}

pub fn activity_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Ride",
        "sport_type": "Ride",
        "start_date": "2024-01-15T10:00:00Z",
        "distance": 10000.0 + id as f64,
        "moving_time": 1800,
        "elapsed_time": 2000,
        "total_elevation_gain": 120.0,
        "average_speed": 5.5,
        "max_speed": 12.1,
        "has_heartrate": false,
        "kudos_count": 1,
        "achievement_count": 0,
        "pr_count": 0
    })
}

// ─── Wiring ──────────────────────────────────────────────────────────────────

pub type TestSync = SyncService<StravaClient, BrokerClient>;

/// Sync service against the given fakes and an in-memory store.
#[allow(dead_code)]
pub fn test_sync(broker_url: &str, api_url: &str, fallback: Option<&str>) -> TestSync {
    let config = Config::test_default(broker_url, api_url);
    test_sync_with_db(&config, fallback, Database::open_in_memory().unwrap())
}

#[allow(dead_code)]
pub fn test_sync_with_db(config: &Config, fallback: Option<&str>, db: Database) -> TestSync {
    let broker = BrokerClient::new(config).unwrap();
    let api = StravaClient::new(config).unwrap();
    let credentials = CredentialManager::new(broker, fallback.map(String::from));
    SyncService::new(api, credentials, db)
}
