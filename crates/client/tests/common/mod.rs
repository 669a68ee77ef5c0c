//! Shared test harness: a stub hotel-operations API served by axum, plus
//! small polling helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

/// Credentials the stub accepts.
pub const TEST_EMAIL: &str = "manager@grandlodge.test";
pub const TEST_PASSWORD: &str = "hunter2!";

/// Permission tags granted by the stub's login response.
pub const TEST_PERMISSIONS: &[&str] = &["view_dashboard", "view_booking", "view_hall"];

/// Behavior knobs and observation points for the stub API.
///
/// Knobs are interior-mutable so tests can adjust them mid-run through
/// the `Arc` returned by [`spawn_stub`].
pub struct StubApi {
    /// Lifetime of minted login tokens, in seconds (may be negative).
    pub token_ttl_secs: AtomicI64,
    /// Shape of `/booking/count`: `{count}` when true, bare array otherwise.
    pub count_as_object: AtomicBool,
    /// When set, protected endpoints reply with this status and body
    /// instead of their normal payload.
    pub forced_response: Mutex<Option<(u16, Value)>>,
    /// Requests that reached a protected endpoint.
    pub protected_hits: AtomicUsize,
    /// Authorization header observed on the last protected request.
    pub last_authorization: Mutex<Option<String>>,
}

impl Default for StubApi {
    fn default() -> Self {
        Self {
            token_ttl_secs: AtomicI64::new(3600),
            count_as_object: AtomicBool::new(true),
            forced_response: Mutex::new(None),
            protected_hits: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
        }
    }
}

/// Mint an HS256 token shaped like the real API's bearer tokens.
pub fn mint_token(ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({ "sub": "64aa01", "iat": now, "exp": now + ttl_secs });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"stub-secret"),
    )
    .expect("encoding should succeed")
}

/// Serve the stub on an ephemeral port; returns the knobs and base URL.
pub async fn spawn_stub(stub: StubApi) -> (Arc<StubApi>, String) {
    let stub = Arc::new(stub);
    let app = Router::new()
        .route("/login", post(login))
        .route("/booking", get(bookings))
        .route("/booking/count", get(booking_count))
        .route("/hall", get(halls))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("an ephemeral port should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub server should run");
    });

    (stub, format!("http://{addr}"))
}

/// Poll `condition` every 50ms until it holds or `timeout` elapses.
pub async fn wait_until<F>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    condition()
}

/// Install a test-friendly tracing subscriber (idempotent).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concierge_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

async fn login(State(stub): State<Arc<StubApi>>, Json(body): Json<Value>) -> impl IntoResponse {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if email == TEST_EMAIL && password == TEST_PASSWORD {
        let ttl = stub.token_ttl_secs.load(Ordering::SeqCst);
        let response = json!({
            "success": true,
            "result": {
                "_id": "64aa01",
                "name": "Front Desk Manager",
                "email": TEST_EMAIL,
                "role": "r-2",
                "token": mint_token(ttl),
                "roleData": { "permissions": TEST_PERMISSIONS },
            },
        });
        (StatusCode::OK, Json(response))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid email or password" })),
        )
    }
}

/// Record a protected-endpoint hit; returns the forced response, if set.
fn record_hit(stub: &StubApi, headers: &HeaderMap) -> Option<Response> {
    stub.protected_hits.fetch_add(1, Ordering::SeqCst);
    *stub.last_authorization.lock().expect("lock poisoned") = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    stub.forced_response
        .lock()
        .expect("lock poisoned")
        .clone()
        .map(|(status, body)| {
            (
                StatusCode::from_u16(status).expect("status must be valid"),
                Json(body),
            )
                .into_response()
        })
}

async fn booking_count(State(stub): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    if let Some(forced) = record_hit(&stub, &headers) {
        return forced;
    }
    if stub.count_as_object.load(Ordering::SeqCst) {
        Json(json!({ "count": 42 })).into_response()
    } else {
        Json(json!([{ "id": "b-1" }, { "id": "b-2" }])).into_response()
    }
}

async fn bookings(State(stub): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    if let Some(forced) = record_hit(&stub, &headers) {
        return forced;
    }
    Json(json!([
        { "id": "b-1", "hall": "Grand Ballroom", "date": "2026-09-01" },
        { "id": "b-2", "hall": "Garden Terrace", "date": "2026-09-03" },
    ]))
    .into_response()
}

async fn halls(State(stub): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    if let Some(forced) = record_hit(&stub, &headers) {
        return forced;
    }
    Json(json!({ "result": [{ "name": "Grand Ballroom", "capacity": 240 }] })).into_response()
}
