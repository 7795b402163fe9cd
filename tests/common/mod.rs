use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "tok";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct StubData {
    pub users: Vec<Value>,
    pub next_id: i64,
    pub seen: Vec<Seen>,
}

type Shared = Arc<Mutex<StubData>>;

/// Admin backend stand-in speaking the same JSON contract, one per test.
pub struct StubServer {
    pub base_url: String,
    pub data: Shared,
}

impl StubServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let data: Shared = Arc::new(Mutex::new(StubData {
            next_id: 1,
            ..StubData::default()
        }));

        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/register", post(register))
            .route("/api/v1/admin/user", get(list_users).post(create_user))
            .route("/api/v1/admin/user/:id", put(update_user).delete(delete_user))
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url, data })
    }

    pub fn seed_user(&self, username: &str) -> i64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id;
        data.next_id += 1;
        data.users.push(json!({
            "id": id,
            "username": username,
            "email": format!("{username}@example.com"),
        }));
        id
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.data.lock().unwrap().seen.clone()
    }

    pub fn last_seen(&self) -> Seen {
        self.seen().last().cloned().expect("no requests recorded")
    }
}

fn record(data: &Shared, method: &'static str, path: String, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    data.lock().unwrap().seen.push(Seen {
        method,
        path,
        authorization,
        body,
    });
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {VALID_TOKEN}"))
        .unwrap_or(false)
}

async fn login(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&data, "POST", "/api/v1/auth/login".to_string(), &headers, body.clone());

    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("a"), Some("b")) => {
            Json(json!({ "data": { "access_token": VALID_TOKEN } })).into_response()
        }
        (Some("notoken"), _) => Json(json!({ "data": {} })).into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

async fn register(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&data, "POST", "/api/v1/auth/register".to_string(), &headers, body.clone());

    match body["username"].as_str() {
        Some("taken") => error(StatusCode::CONFLICT, "Username already exists"),
        Some("silent") => StatusCode::BAD_REQUEST.into_response(),
        _ => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully" })),
        )
            .into_response(),
    }
}

async fn list_users(State(data): State<Shared>, headers: HeaderMap) -> Response {
    record(&data, "GET", "/api/v1/admin/user".to_string(), &headers, Value::Null);

    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let users = data.lock().unwrap().users.clone();
    Json(json!({ "data": users })).into_response()
}

async fn create_user(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&data, "POST", "/api/v1/admin/user".to_string(), &headers, body.clone());

    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if body["email"].as_str().map(|e| !e.contains('@')).unwrap_or(true) {
        return error(StatusCode::BAD_REQUEST, "Email is invalid");
    }

    let mut data = data.lock().unwrap();
    let user = json!({
        "id": data.next_id,
        "username": body["username"],
        "email": body["email"],
    });
    data.next_id += 1;
    data.users.push(user.clone());
    (StatusCode::CREATED, Json(json!({ "data": user }))).into_response()
}

async fn update_user(
    State(data): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&data, "PUT", format!("/api/v1/admin/user/{id}"), &headers, body.clone());

    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let mut data = data.lock().unwrap();
    let Some(user) = data.users.iter_mut().find(|u| u["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "User not found");
    };
    user["username"] = body["username"].clone();
    user["email"] = body["email"].clone();
    Json(json!({ "data": user.clone() })).into_response()
}

async fn delete_user(
    State(data): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    record(&data, "DELETE", format!("/api/v1/admin/user/{id}"), &headers, Value::Null);

    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if id == 13 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response();
    }

    let mut data = data.lock().unwrap();
    let before = data.users.len();
    data.users.retain(|u| u["id"] != id);
    if data.users.len() == before {
        return error(StatusCode::NOT_FOUND, "User not found");
    }
    StatusCode::NO_CONTENT.into_response()
}
