// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fake of the marketplace API, served by axum on a random port.

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use getsetride::config::Config;
use getsetride::models::{Role, User};
use getsetride::session::{MemoryStorage, Session, SessionStore};
use getsetride::Marketplace;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Token the fake server accepts.
pub const VALID_TOKEN: &str = "tok-123";

/// Password the fake server accepts for any email.
#[allow(dead_code)]
pub const VALID_PASSWORD: &str = "secret";

/// How the fake answers `POST /bookings`.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingMode {
    #[default]
    Created,
    /// 500 with a message
    ServerError,
    /// 200 with `{"success": false}`
    Unsuccessful,
    /// 400 with a message
    Rejected,
    /// 403: token accepted, action not allowed
    Forbidden,
    /// 401 even for a valid token
    TokenRejected,
}

/// What the fake server has seen, for assertions.
#[derive(Default)]
pub struct FakeApi {
    pub booking_calls: AtomicUsize,
    pub booking_mode: Mutex<BookingMode>,
    pub last_auth: Mutex<Option<String>>,
    pub last_query: Mutex<Option<String>>,
    pub deleted_images: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn set_booking_mode(&self, mode: BookingMode) {
        *self.booking_mode.lock().unwrap() = mode;
    }

    pub fn booking_calls(&self) -> usize {
        self.booking_calls.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

type Shared = Arc<FakeApi>;

/// Start the fake API. Returns its base URL (ending in `/api`) and its state.
#[allow(dead_code)]
pub async fn spawn_api() -> (String, Shared) {
    let state: Shared = Arc::new(FakeApi::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/my-bookings", get(my_bookings))
        .route("/api/bookings/{id}/cancel", put(cancel_booking))
        .route("/api/cars", get(list_cars))
        .route("/api/cars/{id}", get(get_car))
        .route("/api/chatbot/suggestions", get(suggestions))
        .route("/api/upload/{id}", delete(delete_image))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake API");
    let addr = listener.local_addr().expect("Fake API has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake API stopped");
    });

    (format!("http://{}/api", addr), state)
}

/// The user behind `VALID_TOKEN`.
#[allow(dead_code)]
pub fn test_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: None,
        role: Role::Renter,
        join_date: None,
    }
}

/// A store holding a session with the given token.
#[allow(dead_code)]
pub fn session_with_token(token: &str) -> SessionStore {
    let session = Session {
        token: token.to_string(),
        user: test_user(),
    };
    SessionStore::restore(Arc::new(MemoryStorage::with_session(session)))
}

/// A store holding a session the fake server accepts.
#[allow(dead_code)]
pub fn logged_in_session() -> SessionStore {
    session_with_token(VALID_TOKEN)
}

/// Every gateway wired against `base_url`.
#[allow(dead_code)]
pub fn marketplace(base_url: &str, session: SessionStore) -> Marketplace {
    let config = Config {
        api_base_url: base_url.to_string(),
        ..Config::test_default()
    };
    Marketplace::new(config, session).expect("Failed to build marketplace")
}

fn user_json() -> Value {
    json!({
        "_id": "u1",
        "name": "Asha Rao",
        "email": "asha@example.com",
        "role": "renter",
        "createdAt": "2024-01-15T10:30:00Z"
    })
}

fn car_json() -> Value {
    json!({
        "_id": "c1",
        "brand": "Hyundai",
        "model": "Creta",
        "year": 2022,
        "category": "suv",
        "transmission": "automatic",
        "fuelType": "petrol",
        "seats": 5,
        "pricePerDay": 2500,
        "location": {"city": "Delhi", "state": "DL"},
        "features": ["AC", "GPS"],
        "isActive": true,
        "host": {"_id": "h1", "name": "Ravi"}
    })
}

fn booking_json(id: &str, body: &Value, status: &str) -> Value {
    json!({
        "_id": id,
        "car": body.get("carId").cloned().unwrap_or(json!("c1")),
        "startDate": body.get("startDate").cloned().unwrap_or(json!("2024-06-01")),
        "endDate": body.get("endDate").cloned().unwrap_or(json!("2024-06-03")),
        "pickupTime": body.get("pickupTime").cloned().unwrap_or(json!("10:00")),
        "dropoffTime": body.get("dropoffTime").cloned().unwrap_or(json!("10:00")),
        "totalPrice": 5250,
        "status": status
    })
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

/// Record the Authorization header and reject anything but `VALID_TOKEN`.
fn authorize(state: &FakeApi, headers: &HeaderMap) -> Result<(), Response> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_auth.lock().unwrap() = auth.clone();

    let expected = format!("Bearer {}", VALID_TOKEN);
    if auth.as_deref() == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, "Token expired"))
    }
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    *state.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if body.get("password").and_then(Value::as_str) != Some(VALID_PASSWORD) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    Json(json!({"success": true, "token": VALID_TOKEN, "user": user_json()})).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    let mut user = user_json();
    if let Some(email) = body.get("email") {
        user["email"] = email.clone();
    }
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "token": VALID_TOKEN, "user": user})),
    )
        .into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    Json(json!({"success": true, "user": user_json()})).into_response()
}

async fn create_booking(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let n = state.booking_calls.fetch_add(1, Ordering::SeqCst) + 1;

    let mode = *state.booking_mode.lock().unwrap();
    match mode {
        BookingMode::Created => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "booking": booking_json(&format!("b{}", n), &body, "pending")
            })),
        )
            .into_response(),
        BookingMode::ServerError => failure(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"),
        BookingMode::Unsuccessful => failure(StatusCode::OK, "Car is already booked for these dates"),
        BookingMode::Rejected => failure(StatusCode::BAD_REQUEST, "Car is not available"),
        BookingMode::Forbidden => failure(StatusCode::FORBIDDEN, "Hosts cannot book their own cars"),
        BookingMode::TokenRejected => failure(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn my_bookings(
    State(state): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    *state.last_query.lock().unwrap() = query;

    let bookings = vec![
        booking_json("b1", &json!({}), "confirmed"),
        booking_json("b2", &json!({"startDate": "2024-07-01", "endDate": "2024-07-02"}), "cancelled"),
    ];
    Json(json!({"success": true, "bookings": bookings})).into_response()
}

async fn cancel_booking(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let mut booking = booking_json(&id, &json!({}), "cancelled");
    booking["cancellationReason"] = body.get("reason").cloned().unwrap_or(Value::Null);
    Json(json!({"success": true, "booking": booking})).into_response()
}

async fn list_cars(State(state): State<Shared>, RawQuery(query): RawQuery) -> Response {
    *state.last_query.lock().unwrap() = query;
    Json(json!({
        "success": true,
        "cars": [car_json()],
        "total": 1,
        "totalPages": 1,
        "currentPage": 1
    }))
    .into_response()
}

async fn get_car(Path(id): Path<String>) -> Response {
    if id == "c1" {
        Json(json!({"success": true, "car": car_json()})).into_response()
    } else {
        failure(StatusCode::NOT_FOUND, "Car not found")
    }
}

async fn suggestions() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Service Unavailable").into_response()
}

async fn delete_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    state.deleted_images.lock().unwrap().push(id);
    Json(json!({"success": true, "message": "Image deleted"})).into_response()
}
